// lib.rs
//
// Identity primitives shared by the syntax tree and the semantic graph:
// case-insensitive symbols, source spans, and arena handles.

mod entities;
mod intern;
mod qualified;
mod span;
mod symbol;

pub use entities::{DeclId, NodeId, ScopeId, UnitId};
pub use intern::Interner;
pub use qualified::QualifiedName;
pub use span::Span;
pub use symbol::Symbol;
