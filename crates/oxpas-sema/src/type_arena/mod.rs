// type_arena/mod.rs
//
// Interned type system using TypeId handles.
//
// - TypeId: u32 handle (Copy, trivial Eq/Hash), intrinsic types at fixed indices
// - TypeArena: per-compilation storage, deduplicating structural types
// - SemaType: the canonical type representation using TypeId for child types

mod arena;
mod query;
mod relations;
pub mod sema_type;
mod substitution;
pub mod type_id;

pub use arena::*;
pub use sema_type::*;
pub use substitution::Substitutions;
pub use type_id::*;
