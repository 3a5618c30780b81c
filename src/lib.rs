// src/lib.rs
//
// Semantic name and overload resolution for Object Pascal.
//
// The work happens in the member crates; this crate ties them together and
// renders resolution errors as diagnostics.

pub mod report;

pub use oxpas_identity as identity;
pub use oxpas_sema as sema;
pub use oxpas_syntax as syntax;

pub use oxpas_identity::{DeclId, NodeId, ScopeId, Span, UnitId};
pub use oxpas_sema::{
    CompilationDb, CompilationDbBuilder, NameOccurrence, Platform, Resolution, ResolvedUnit,
    SemanticError, TypeId, UnitResolver,
};
pub use oxpas_syntax::{AstBuilder, Expr, NameReference};
