// lib.rs
//
// Expression-shaped syntax consumed by the resolver.

pub mod ast;
mod builder;
mod operators;

pub use ast::*;
pub use builder::AstBuilder;
pub use operators::{BinaryOp, UnaryOp};
pub use oxpas_identity::{NodeId, Span};
