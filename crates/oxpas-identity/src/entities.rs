//! Handles into the per-unit arenas.
//!
//! Scopes, declarations and types reference each other in cycles; every
//! cross-reference goes through one of these indices instead of a pointer.

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(u32);

        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            pub fn index(self) -> u32 {
                self.0
            }
        }
    };
}

define_entity_id! {
    /// Identity for a scope (file, type, method, local or the unknown sentinel)
    pub struct ScopeId;
}

define_entity_id! {
    /// Identity for a declaration (variable, routine, type, property, unit, ...)
    pub struct DeclId;
}

define_entity_id! {
    /// Identity for a compilation unit
    pub struct UnitId;
}

define_entity_id! {
    /// Identity for a syntax node, allocated by the tree builder
    pub struct NodeId;
}
