// testing.rs
//
// Test fixtures: a compilation database with one unit under test, plus
// shorthands for building the declarations resolver tests need.

use std::sync::Once;

use oxpas_identity::{DeclId, ScopeId, UnitId};
use oxpas_syntax::AstBuilder;
use tracing_subscriber::EnvFilter;

use crate::compilation_db::CompilationDb;
use crate::errors::SemanticError;
use crate::platform::Platform;
use crate::symbols::{RoutineBuilder, SymbolTable, VariableKind, Visibility};
use crate::type_arena::{StructKind, TypeArena, TypeId};
use crate::unit_resolver::UnitResolver;

static TRACING: Once = Once::new();

/// Install a fmt subscriber filtered by `OXPAS_LOG`, once per process.
/// Does nothing when the variable is unset.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let Ok(filter) = EnvFilter::try_from_env("OXPAS_LOG") else {
            return;
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// A compilation with one unit under test.
///
/// ```ignore
/// let mut fx = Fixture::new("Main");
/// let (_, foo, foo_scope) = fx.class(fx.file, "TFoo", None);
/// let expr = fx.ast.path("TFoo");
/// let mut resolver = fx.resolver()?;
/// resolver.resolve_expression(&expr, fx.file)?;
/// ```
#[derive(Debug)]
pub struct Fixture {
    pub db: CompilationDb,
    pub unit: UnitId,
    pub file: ScopeId,
    pub ast: AstBuilder,
}

impl Fixture {
    pub fn new(unit_name: &str) -> Self {
        Self::with_platform(unit_name, Platform::default())
    }

    pub fn with_platform(unit_name: &str, platform: Platform) -> Self {
        init_tracing();
        let mut db = CompilationDb::builder().platform(platform).build();
        let (unit, file) = db.add_unit(unit_name);
        Self {
            db,
            unit,
            file,
            ast: AstBuilder::new(),
        }
    }

    pub fn types(&mut self) -> &mut TypeArena {
        self.db.types_mut()
    }

    pub fn symbols(&mut self) -> &mut SymbolTable {
        self.db.symbols_mut()
    }

    pub fn tobject(&self) -> TypeId {
        self.db.system().tobject
    }

    /// Another unit of the same compilation.
    pub fn add_unit(&mut self, name: &str) -> (UnitId, ScopeId) {
        self.db.add_unit(name)
    }

    /// `uses <name>` in `file`, bound to `target`.
    pub fn import(&mut self, file: ScopeId, name: &str, target: ScopeId) -> DeclId {
        self.symbols().add_import(file, name, Some(target))
    }

    /// A class descending from `super_type`, TObject by default.
    pub fn class(
        &mut self,
        scope: ScopeId,
        name: &str,
        super_type: Option<TypeId>,
    ) -> (DeclId, TypeId, ScopeId) {
        let super_type = super_type.unwrap_or(self.tobject());
        let (types, symbols) = self.db.parts_mut();
        symbols.declare_struct(types, scope, name, StructKind::Class, Some(super_type))
    }

    pub fn record(&mut self, scope: ScopeId, name: &str) -> (DeclId, TypeId, ScopeId) {
        let (types, symbols) = self.db.parts_mut();
        symbols.declare_struct(types, scope, name, StructKind::Record, None)
    }

    /// A public variable; a field when `scope` is a type scope.
    pub fn variable(&mut self, scope: ScopeId, name: &str, ty: TypeId) -> DeclId {
        let symbols = self.symbols();
        let kind = if symbols.scope(scope).is_type_scope() {
            VariableKind::Field
        } else {
            VariableKind::Global
        };
        symbols.declare_variable(scope, name, ty, kind, Visibility::Public)
    }

    pub fn routine(&mut self, scope: ScopeId, routine: RoutineBuilder) -> DeclId {
        let (types, symbols) = self.db.parts_mut();
        routine.declare(symbols, types, scope)
    }

    /// The body scope of `routine`, implemented in this unit. Pass the
    /// declaring type's scope for methods.
    pub fn method_scope(&mut self, routine: DeclId, type_scope: Option<ScopeId>) -> ScopeId {
        let file = self.file;
        self.symbols().add_method_scope(file, Some(routine), type_scope)
    }

    /// A resolver for the unit under test over the current database.
    pub fn resolver(&self) -> Result<UnitResolver, SemanticError> {
        UnitResolver::new(&self.db, self.file)
    }
}
