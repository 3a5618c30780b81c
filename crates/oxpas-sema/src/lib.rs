// lib.rs
//
// Semantic resolution for Object Pascal: the type model, the scope graph,
// operator synthesis, overload resolution and name resolution.

pub mod compilation_db;
pub mod errors;
pub mod invocation;
pub mod node_map;
pub mod numeric_model;
pub mod occurrence;
pub mod operators;
pub mod platform;
pub mod resolution;
mod resolve;
pub mod symbols;
pub mod system;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod type_arena;
pub mod type_display;
pub mod unit_resolver;

pub use compilation_db::{CompilationDb, CompilationDbBuilder};
pub use errors::SemanticError;
pub use node_map::{NodeData, NodeMap};
pub use occurrence::{NameOccurrence, OccurrenceId, OccurrenceIndex};
pub use platform::Platform;
pub use resolution::Resolution;
pub use resolve::is_method_visible_from;
pub use symbols::{
    DeclKind, Declaration, Parameter, RoutineBuilder, RoutineKind, SymbolTable, VariableKind,
    Visibility,
};
pub use system::SystemUnit;
pub use type_arena::{TypeArena, TypeId};
pub use type_display::{display_signature, display_type_id};
pub use unit_resolver::{ResolvedUnit, UnitResolver};
