// compilation_db.rs
//
// The type arena and scope graph of a compilation, shared between unit
// resolutions.
//
// Both halves are Arc-wrapped. A unit resolver works on a clone of the
// database; its first write copies the affected half (Arc::make_mut), so the
// graphs of imported units are never mutated through a shared handle and can
// be read from several threads at once.

use std::sync::Arc;

use oxpas_identity::{ScopeId, UnitId};

use crate::platform::Platform;
use crate::symbols::SymbolTable;
use crate::system::{self, SystemUnit};
use crate::type_arena::TypeArena;

/// Type arena, scope graph and platform of one compilation.
///
/// # Usage
/// ```ignore
/// let mut db = CompilationDb::builder().platform(Platform::preset("win64")?).build();
/// let (unit, file_scope) = db.add_unit("Main");
/// let (types, symbols) = db.parts_mut();
/// let (_, foo, _) = symbols.declare_struct(types, file_scope, "TFoo", StructKind::Class, None);
/// ```
#[derive(Debug, Clone)]
pub struct CompilationDb {
    pub types: Arc<TypeArena>,
    pub symbols: Arc<SymbolTable>,
    pub platform: Platform,
    system: SystemUnit,
    implicit_system_import: bool,
}

impl CompilationDb {
    /// A database for the default platform with the System unit loaded.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> CompilationDbBuilder {
        CompilationDbBuilder::default()
    }

    /// Mutable access to the type arena (copy-on-write).
    #[inline]
    pub fn types_mut(&mut self) -> &mut TypeArena {
        Arc::make_mut(&mut self.types)
    }

    /// Mutable access to the scope graph (copy-on-write).
    #[inline]
    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        Arc::make_mut(&mut self.symbols)
    }

    /// Both halves at once, for construction code that touches both.
    pub fn parts_mut(&mut self) -> (&mut TypeArena, &mut SymbolTable) {
        (
            Arc::make_mut(&mut self.types),
            Arc::make_mut(&mut self.symbols),
        )
    }

    pub fn system(&self) -> &SystemUnit {
        &self.system
    }

    /// Create a unit. Unless disabled, its file scope imports System.
    pub fn add_unit(&mut self, name: &str) -> (UnitId, ScopeId) {
        let system_scope = self.system.file_scope;
        let implicit = self.implicit_system_import;
        let symbols = self.symbols_mut();
        let (unit, scope) = symbols.add_unit(name);
        if implicit {
            symbols.add_import(scope, "System", Some(system_scope));
        }
        (unit, scope)
    }

    /// True if the two handles share the same scope graph allocation.
    pub fn shares_symbols_with(&self, other: &CompilationDb) -> bool {
        Arc::ptr_eq(&self.symbols, &other.symbols)
    }
}

impl Default for CompilationDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`CompilationDb`].
#[derive(Debug, Clone)]
pub struct CompilationDbBuilder {
    platform: Platform,
    implicit_system_import: bool,
}

impl Default for CompilationDbBuilder {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            implicit_system_import: true,
        }
    }
}

impl CompilationDbBuilder {
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Whether new units import System without a `uses` entry (default on).
    pub fn implicit_system_import(mut self, enabled: bool) -> Self {
        self.implicit_system_import = enabled;
        self
    }

    pub fn build(self) -> CompilationDb {
        let mut types = TypeArena::new(&self.platform);
        let mut symbols = SymbolTable::new();
        let system = system::bootstrap(&mut types, &mut symbols);
        tracing::debug!(
            pointer_size = self.platform.pointer_size,
            native_int_weak_alias = self.platform.native_int_weak_alias,
            "compilation database created"
        );
        CompilationDb {
            types: Arc::new(types),
            symbols: Arc::new(symbols),
            platform: self.platform,
            system,
            implicit_system_import: self.implicit_system_import,
        }
    }
}
