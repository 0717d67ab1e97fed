//! The catalogue: where untrusted definition files become typed, validated,
//! executable artifacts.
//!
//! The pipeline is linear: [`read_input`] (generic parse, schema validation,
//! typed decode), [`Input::classify`] (template or workflow, never a silent
//! default), [`Input::compile`] (dispatch to the kind-specific sub-compiler).
//! [`Catalogue`] supplies the concrete resolver and recursive compiler the
//! sub-compilers are handed.

#![forbid(unsafe_code)]

mod catalogue;
mod input;
mod read;

pub use catalogue::Catalogue;
pub use input::{ClassifyError, CompileError, CompiledInput, Input, InputKind};
pub use read::{parse_input, read_input, ReadError};
