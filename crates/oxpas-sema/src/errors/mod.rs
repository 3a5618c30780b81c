// errors/mod.rs
//! Semantic resolution errors (E3xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error("ambiguous reference to '{name}'")]
    #[diagnostic(
        code(E3001),
        help("candidates: {candidates}; add a cast or qualify the call")
    )]
    AmbiguousReference {
        name: String,
        candidates: String,
        #[label("more than one declaration matches")]
        span: SourceSpan,
    },

    #[error("cannot complete forward type '{name}' owned by another unit")]
    #[diagnostic(code(E3002))]
    ForeignMutation { name: String },

    #[error("'{name}' is not a forward declaration")]
    #[diagnostic(code(E3003))]
    NotAForwardType { name: String },

    #[error("scope #{scope} is not a file scope")]
    #[diagnostic(code(E3004))]
    NotAFileScope { scope: u32 },

    #[error("unknown platform '{name}'")]
    #[diagnostic(code(E3010), help("known platforms: {known}"))]
    UnknownPlatform { name: String, known: String },

    #[error("invalid platform configuration: {message}")]
    #[diagnostic(code(E3011))]
    PlatformConfig { message: String },
}
