//! Template payloads: definitions describing direct network/protocol checks.
//!
//! The model mirrors the on-disk shape and is permissive; strictness lives in
//! the compiler, which turns loosely-typed requests into validated, executable
//! forms.

#![forbid(unsafe_code)]

mod compile;
mod model;

pub use compile::{
    CompiledDnsRequest, CompiledHttpRequest, CompiledMatcher, CompiledTemplate, MatcherKind,
    Method, RecordType, TemplateCompileOptions, TemplateError,
};
pub use model::{DnsRequest, HttpRequest, Matcher, Template};
