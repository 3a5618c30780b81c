// system.rs
//
// The implicitly imported System unit: intrinsic type names, TObject, the
// Boolean constants and the intrinsic routines whose result type depends on
// their arguments.

use oxpas_identity::{ScopeId, UnitId};

use crate::symbols::{
    Parameter, ReturnSpec, RoutineBuilder, SymbolTable, VariableKind, Visibility,
};
use crate::type_arena::{ParamMode, StructKind, TypeArena, TypeId};

/// Handles to the System declarations the resolver refers to directly.
#[derive(Debug, Clone, Copy)]
pub struct SystemUnit {
    pub unit: UnitId,
    pub file_scope: ScopeId,
    pub tobject: TypeId,
    pub tclass: TypeId,
    pub iinterface: TypeId,
}

const INTRINSIC_TYPES: &[(&str, TypeId)] = &[
    ("ShortInt", TypeId::SHORTINT),
    ("SmallInt", TypeId::SMALLINT),
    ("Integer", TypeId::INTEGER),
    ("Int64", TypeId::INT64),
    ("Byte", TypeId::BYTE),
    ("Word", TypeId::WORD),
    ("Cardinal", TypeId::CARDINAL),
    ("UInt64", TypeId::UINT64),
    ("NativeInt", TypeId::NATIVEINT),
    ("NativeUInt", TypeId::NATIVEUINT),
    ("Single", TypeId::SINGLE),
    ("Double", TypeId::DOUBLE),
    ("Extended", TypeId::EXTENDED),
    ("Currency", TypeId::CURRENCY),
    ("Comp", TypeId::COMP),
    ("Boolean", TypeId::BOOLEAN),
    ("ByteBool", TypeId::BYTEBOOL),
    ("WordBool", TypeId::WORDBOOL),
    ("LongBool", TypeId::LONGBOOL),
    ("AnsiChar", TypeId::ANSICHAR),
    ("WideChar", TypeId::WIDECHAR),
    ("AnsiString", TypeId::ANSISTRING),
    ("UnicodeString", TypeId::UNICODESTRING),
    ("ShortString", TypeId::SHORTSTRING),
    ("WideString", TypeId::WIDESTRING),
    ("Variant", TypeId::VARIANT),
    ("Pointer", TypeId::POINTER),
    ("PAnsiChar", TypeId::PANSICHAR),
    ("PWideChar", TypeId::PWIDECHAR),
    // Weak aliases share the target's id
    ("Char", TypeId::CHAR),
    ("String", TypeId::STRING),
    ("PChar", TypeId::PWIDECHAR),
    ("Int8", TypeId::SHORTINT),
    ("Int16", TypeId::SMALLINT),
    ("Int32", TypeId::INTEGER),
    ("UInt8", TypeId::BYTE),
    ("UInt16", TypeId::WORD),
    ("UInt32", TypeId::CARDINAL),
    ("LongInt", TypeId::INTEGER),
    ("LongWord", TypeId::CARDINAL),
    ("Real", TypeId::DOUBLE),
];

/// Populate the System unit. Must run before any other unit is added so
/// that System is unit 0.
pub fn bootstrap(types: &mut TypeArena, symbols: &mut SymbolTable) -> SystemUnit {
    let (unit, scope) = symbols.add_unit("System");

    for &(name, ty) in INTRINSIC_TYPES {
        symbols.declare_type(scope, name, ty);
    }

    let (_, iinterface, _) =
        symbols.declare_struct(types, scope, "IInterface", StructKind::Interface, None);

    let (_, tobject, tobject_scope) =
        symbols.declare_struct(types, scope, "TObject", StructKind::Class, None);
    RoutineBuilder::constructor("Create").declare(symbols, types, tobject_scope);
    RoutineBuilder::procedure("Free").declare(symbols, types, tobject_scope);
    RoutineBuilder::procedure("Destroy").declare(symbols, types, tobject_scope);
    RoutineBuilder::function("ClassName", TypeId::STRING)
        .class_method()
        .declare(symbols, types, tobject_scope);
    let tclass = types.class_reference(tobject);
    symbols.declare_type(scope, "TClass", tclass);

    for name in ["True", "False"] {
        symbols.declare_variable(
            scope,
            name,
            TypeId::BOOLEAN,
            VariableKind::Constant,
            Visibility::Public,
        );
    }

    declare_intrinsic_routines(types, symbols, scope);

    tracing::debug!(decls = symbols.decl_count(), "System unit bootstrapped");
    SystemUnit {
        unit,
        file_scope: scope,
        tobject,
        tclass,
        iinterface,
    }
}

fn declare_intrinsic_routines(types: &mut TypeArena, symbols: &mut SymbolTable, scope: ScopeId) {
    let untyped = |name: &str| Parameter::new(name, TypeId::UNTYPED);
    let optional_int = |name: &str| Parameter::new(name, TypeId::INTEGER).with_default();

    let routines = [
        RoutineBuilder::function("Abs", TypeId::UNTYPED)
            .param(untyped("X"))
            .returns_spec(ReturnSpec::ArgumentType(0)),
        RoutineBuilder::function("Copy", TypeId::UNTYPED)
            .param(untyped("S"))
            .param(optional_int("Index"))
            .param(optional_int("Count"))
            .returns_spec(ReturnSpec::ArgumentType(0)),
        RoutineBuilder::function("High", TypeId::UNTYPED)
            .param(untyped("X"))
            .returns_spec(ReturnSpec::OrdinalBound(0)),
        RoutineBuilder::function("Low", TypeId::UNTYPED)
            .param(untyped("X"))
            .returns_spec(ReturnSpec::OrdinalBound(0)),
        RoutineBuilder::function("Length", TypeId::INTEGER).param(untyped("S")),
        RoutineBuilder::function("Ord", TypeId::INTEGER).param(untyped("X")),
        RoutineBuilder::function("Chr", TypeId::CHAR).param(Parameter::new("X", TypeId::BYTE)),
        RoutineBuilder::function("SizeOf", TypeId::INTEGER).param(untyped("X")),
        RoutineBuilder::function("Assigned", TypeId::BOOLEAN).param(untyped("P")),
        RoutineBuilder::procedure("Inc")
            .param(untyped("X").with_mode(ParamMode::Var))
            .param(optional_int("N")),
        RoutineBuilder::procedure("Dec")
            .param(untyped("X").with_mode(ParamMode::Var))
            .param(optional_int("N")),
    ];
    for routine in routines {
        routine.declare(symbols, types, scope);
    }
}
