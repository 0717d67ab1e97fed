//! Stable DTOs and capability interfaces shared across the probekit workspace.
//!
//! This crate is intentionally boring:
//! - descriptive metadata attached to every input definition
//! - the severity scale
//! - the `Resolver` capability consumed by both sub-compilers

#![forbid(unsafe_code)]

mod info;
mod resolver;

pub use info::{Info, Severity};
pub use resolver::Resolver;
