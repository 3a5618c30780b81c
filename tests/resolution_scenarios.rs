// tests/resolution_scenarios.rs
//
// End-to-end resolution over a fixture compilation: overload selection,
// inherited calls, operator synthesis, visibility, chains and the
// guarantees a driver relies on when resolving units side by side.

use oxpas::sema::operators::OperatorSynthesizer;
use oxpas::sema::symbols::{Parameter, RoutineBuilder, Visibility};
use oxpas::sema::testing::Fixture;
use oxpas::sema::type_arena::{HelperKind, TypeIdVec};
use oxpas::sema::{
    CompilationDb, Resolution, SemanticError, TypeId, UnitResolver, is_method_visible_from,
};
use oxpas::syntax::{BinaryOp, Expr, PrimaryPart};
use oxpas::{DeclId, ScopeId};

fn call(fx: &mut Fixture, image: &str, args: Vec<Expr>) -> (Expr, oxpas::NameReference) {
    let name = fx.ast.name_ref(image);
    let args = fx.ast.args_part(args);
    let expr = fx.ast.primary(vec![PrimaryPart::Name(name.clone()), args]);
    (expr, name)
}

fn resolve(
    db: &CompilationDb,
    file: ScopeId,
    expr: &Expr,
    scope: ScopeId,
) -> (TypeId, oxpas::ResolvedUnit) {
    let mut resolver = UnitResolver::new(db, file).unwrap();
    let ty = resolver.resolve_expression(expr, scope).unwrap();
    (ty, resolver.finish())
}

/// `Foo(Integer)` and `Foo(string)` in Main.
fn foo_overloads(fx: &mut Fixture) -> (DeclId, DeclId) {
    let file = fx.file;
    let int_foo = fx.routine(
        file,
        RoutineBuilder::procedure("Foo")
            .param(Parameter::new("Value", TypeId::INTEGER))
            .overload(),
    );
    let str_foo = fx.routine(
        file,
        RoutineBuilder::procedure("Foo")
            .param(Parameter::new("Value", TypeId::STRING))
            .overload(),
    );
    (int_foo, str_foo)
}

#[test]
fn scenario_a_string_literal_picks_string_overload() {
    let mut fx = Fixture::new("Main");
    let (int_foo, str_foo) = foo_overloads(&mut fx);

    let arg = fx.ast.string("abc");
    let (expr, name) = call(&mut fx, "Foo", vec![arg]);
    let (_, unit) = resolve(&fx.db, fx.file, &expr, fx.file);

    assert_eq!(unit.decl_of(name.segments[0].id), Some(str_foo));
    assert_ne!(unit.decl_of(name.segments[0].id), Some(int_foo));
}

#[test]
fn scenario_b_common_ancestor_argument_is_ambiguous() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, base, _) = fx.class(file, "TBase", None);
    let (_, a, _) = fx.class(file, "TDerivedA", Some(base));
    let (_, b, _) = fx.class(file, "TDerivedB", Some(base));
    for ty in [a, b] {
        fx.routine(
            file,
            RoutineBuilder::procedure("Foo").param(Parameter::new("X", ty)).overload(),
        );
    }
    fx.variable(file, "Item", base);

    let arg = fx.ast.path("Item");
    let (expr, _) = call(&mut fx, "Foo", vec![arg]);
    let mut resolver = fx.resolver().unwrap();
    let err = resolver.resolve_expression(&expr, file).unwrap_err();

    let SemanticError::AmbiguousReference { name, candidates, .. } = err else {
        panic!("expected an ambiguity, got {err:?}");
    };
    assert_eq!(name, "Foo");
    assert!(candidates.contains("TDerivedA") && candidates.contains("TDerivedB"), "{candidates}");
}

#[test]
fn scenario_c_bare_inherited_skips_the_helper() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, base, base_scope) = fx.class(file, "TBase", None);
    let base_bar = fx.routine(base_scope, RoutineBuilder::procedure("Bar"));
    let (_, child, child_scope) = fx.class(file, "TChild", Some(base));
    let child_bar = fx.routine(child_scope, RoutineBuilder::procedure("Bar"));
    let (types, symbols) = fx.db.parts_mut();
    let (_, _, helper_scope) =
        symbols.declare_helper(types, file, "TChildHelper", HelperKind::Class, child, None);
    fx.routine(helper_scope, RoutineBuilder::procedure("Bar"));

    let body = fx.method_scope(child_bar, Some(child_scope));
    let inherited = fx.ast.inherited_part();
    let marker = inherited.id();
    let expr = fx.ast.primary(vec![inherited]);
    let (_, unit) = resolve(&fx.db, file, &expr, body);

    assert_eq!(unit.decl_of(marker), Some(base_bar));
}

#[test]
fn scenario_d_integer_operators_synthesize_ladder_signatures() {
    let mut fx = Fixture::new("Main");
    let symbols = fx.db.symbols.clone();
    let mut synth = OperatorSynthesizer::new(fx.types(), &symbols);

    let same_width = synth.binary(BinaryOp::Add, TypeId::SHORTINT, TypeId::SHORTINT);
    assert!(same_width.contains_signature(&[TypeId::SHORTINT, TypeId::SHORTINT], TypeId::SHORTINT));

    let mixed = synth.binary(BinaryOp::Add, TypeId::INTEGER, TypeId::CARDINAL);
    assert!(mixed.contains_signature(&[TypeId::INT64, TypeId::INT64], TypeId::INT64));

    // The resolver picks those signatures for typed operands
    let file = fx.file;
    let variables = [
        ("X", TypeId::SHORTINT),
        ("Y", TypeId::SHORTINT),
        ("I", TypeId::INTEGER),
        ("C", TypeId::CARDINAL),
    ];
    for (name, ty) in variables {
        fx.variable(file, name, ty);
    }
    for (left, right, expected) in [("X", "Y", TypeId::SHORTINT), ("I", "C", TypeId::INT64)] {
        let l = fx.ast.path(left);
        let r = fx.ast.path(right);
        let expr = fx.ast.binary(l, BinaryOp::Add, r);
        let (ty, unit) = resolve(&fx.db, file, &expr, file);
        assert_eq!(ty, expected, "{left} + {right}");
        assert_eq!(unit.type_of(expr.id), expected);
    }
}

#[test]
fn visibility_table() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, owner, _) = fx.class(file, "TOwner", None);
    let (_, descendant, _) = fx.class(file, "TDescendant", Some(owner));
    let (_, unrelated, _) = fx.class(file, "TUnrelated", None);
    let (types, symbols) = fx.db.parts_mut();
    let (_, helper, _) =
        symbols.declare_helper(types, file, "TOwnerHelper", HelperKind::Class, owner, None);
    let types = &fx.db.types;

    use Visibility::*;
    let levels = [StrictPrivate, Private, StrictProtected, Protected, Public, Published];
    let table = [
        (owner, true, [true, true, true, true, true, true]),
        (owner, false, [true, true, true, true, true, true]),
        (descendant, true, [false, true, true, true, true, true]),
        (descendant, false, [false, false, true, true, true, true]),
        (unrelated, true, [false, true, false, true, true, true]),
        (unrelated, false, [false, false, false, false, true, true]),
        // Helpers see everything but private members of the type they extend
        (helper, true, [false, false, true, true, true, true]),
        (helper, false, [false, false, true, true, true, true]),
    ];
    for (from, same_unit, expected) in table {
        for (visibility, expected) in levels.into_iter().zip(expected) {
            assert_eq!(
                is_method_visible_from(types, from, owner, visibility, same_unit),
                expected,
                "{} -> TOwner, {visibility:?}, same unit: {same_unit}",
                oxpas::sema::display_type_id(from, types),
            );
        }
    }
}

#[test]
fn chain_round_trip() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, ta, ta_scope) = fx.record(file, "TA");
    let (_, tb, tb_scope) = fx.record(file, "TB");
    let a = fx.variable(file, "A", ta);
    let b = fx.variable(ta_scope, "B", tb);
    let c = fx.variable(tb_scope, "C", TypeId::INTEGER);

    let expr = fx.ast.path("A.B.C");
    let name = expr.as_bare_name().unwrap().clone();
    let (ty, unit) = resolve(&fx.db, file, &expr, file);

    assert_eq!(ty, TypeId::INTEGER);
    let bound: Vec<_> = name.segments.iter().filter_map(|s| unit.decl_of(s.id)).collect();
    assert_eq!(bound, vec![a, b, c]);
}

#[test]
fn resolution_is_idempotent_and_deterministic() {
    let mut fx = Fixture::new("Main");
    let (_, str_foo) = foo_overloads(&mut fx);
    let arg = fx.ast.string("abc");
    let (expr, name) = call(&mut fx, "Foo", vec![arg]);

    let file = fx.file;
    let count = fx.variable(file, "Count", TypeId::INTEGER);
    let count_name = fx.ast.name_ref("count");
    let mut resolver = fx.resolver().unwrap();
    let first = resolver.resolve_name(&count_name, file).unwrap();
    let second = resolver.resolve_name(&count_name, file).unwrap();
    assert_eq!(first, Resolution::Resolved(count));
    assert_eq!(first, second);
    // The second pass over the same node adds no reference
    assert_eq!(resolver.finish().references(count).count(), 1);

    let runs: Vec<_> = (0..3)
        .map(|_| resolve(&fx.db, fx.file, &expr, fx.file).1.decl_of(name.segments[0].id))
        .collect();
    assert_eq!(runs, vec![Some(str_foo); 3]);
}

#[test]
fn constraint_search_stops_at_first_constraint_with_candidates() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, first, first_scope) = fx.class(file, "TFirst", None);
    let (_, second, second_scope) = fx.class(file, "TSecond", None);
    fx.routine(first_scope, RoutineBuilder::procedure("Run"));
    let wanted = fx.routine(
        second_scope,
        RoutineBuilder::procedure("Run").param(Parameter::new("Count", TypeId::INTEGER)),
    );
    let (types, symbols) = fx.db.parts_mut();
    let (_, t) = symbols.declare_type_parameter(types, file, "T", &[first, second]);
    fx.variable(file, "X", t);

    let one = fx.ast.int(1);
    let (expr, _) = call(&mut fx, "X.Run", vec![one]);
    let (ty, unit) = resolve(&fx.db, file, &expr, file);
    assert_eq!(ty, TypeId::UNKNOWN);
    assert!(!unit.occurrences().is_referenced(wanted));
}

#[test]
fn unit_qualified_reference_falls_back_to_unit_names() {
    let mut fx = Fixture::new("Main");
    let (_, lib) = fx.add_unit("System.SysUtils");
    let upper = fx.routine(
        lib,
        RoutineBuilder::function("UpperCase", TypeId::STRING)
            .param(Parameter::new("S", TypeId::STRING)),
    );
    let file = fx.file;
    fx.import(file, "System.SysUtils", lib);

    let arg = fx.ast.string("abc");
    let (expr, name) = call(&mut fx, "System.SysUtils.UpperCase", vec![arg]);
    let (ty, unit) = resolve(&fx.db, file, &expr, file);
    assert_eq!(ty, TypeId::STRING);
    assert_eq!(unit.decl_of(name.segments[2].id), Some(upper));
}

#[test]
fn local_routine_beats_same_signature_import() {
    let mut fx = Fixture::new("Main");
    let (_, lib) = fx.add_unit("Lib");
    let imported = fx.routine(
        lib,
        RoutineBuilder::function("Trim", TypeId::INTEGER)
            .param(Parameter::new("S", TypeId::STRING))
            .overload(),
    );
    let file = fx.file;
    fx.import(file, "Lib", lib);
    let local = fx.routine(
        file,
        RoutineBuilder::function("Trim", TypeId::STRING)
            .param(Parameter::new("S", TypeId::STRING))
            .overload(),
    );

    let arg = fx.ast.string("abc");
    let (expr, name) = call(&mut fx, "Trim", vec![arg]);
    let (ty, unit) = resolve(&fx.db, file, &expr, file);
    assert_eq!(ty, TypeId::STRING);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(local));
    assert_eq!(unit.references(imported).count(), 0);

    // Called from Lib, the same pair resolves to Lib's own routine
    let arg = fx.ast.string("abc");
    let (expr, name) = call(&mut fx, "Trim", vec![arg]);
    fx.import(lib, "Main", file);
    let (ty, unit) = resolve(&fx.db, lib, &expr, lib);
    assert_eq!(ty, TypeId::INTEGER);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(imported));
}

#[test]
fn forward_completion_is_confined_to_the_resolved_unit() {
    let mut fx = Fixture::new("Main");
    let (lib_unit, _) = fx.add_unit("Lib");
    let main_unit = fx.unit;
    let own = fx.types().new_forward("TNode", main_unit);
    let foreign = fx.types().new_forward("TLink", lib_unit);
    let (_, node, _) = fx.class(fx.file, "TNode", None);

    let mut resolver = fx.resolver().unwrap();
    assert!(matches!(
        resolver.complete_forward_type(foreign, node),
        Err(SemanticError::ForeignMutation { .. })
    ));
    assert!(matches!(
        resolver.complete_forward_type(TypeId::INTEGER, node),
        Err(SemanticError::NotAForwardType { .. })
    ));
    resolver.complete_forward_type(own, node).unwrap();
    assert!(!resolver.db().types.is_forward(own));
    assert!(fx.db.types.is_forward(own));
}

#[test]
fn method_name_binds_generic_implementation() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, foo, foo_scope) = fx.class(file, "TFoo", None);
    let (types, symbols) = fx.db.parts_mut();
    let (t_decl, t) = symbols.declare_type_parameter(types, foo_scope, "T", &[foo]);
    let bar = fx.routine(
        foo_scope,
        RoutineBuilder::function("Bar", TypeId::BOOLEAN)
            .param(Parameter::new("Value", t))
            .type_params(vec![t_decl]),
    );
    let body = fx.symbols().add_method_scope(file, Some(bar), Some(foo_scope));
    let written_t = fx.types().new_type_parameter("T", TypeIdVec::new());

    let name = fx.ast.name_ref("TFoo.Bar<T>");
    let mut resolver = fx.resolver().unwrap();
    let found = resolver
        .resolve_method_name(&name, body, &[written_t], TypeId::BOOLEAN, false)
        .unwrap();
    assert_eq!(found, Resolution::Resolved(bar));

    let wrong = fx.ast.name_ref("TFoo.Bar<T>");
    let missing = resolver
        .resolve_method_name(&wrong, body, &[written_t], TypeId::STRING, false)
        .unwrap();
    assert_eq!(missing, Resolution::Unresolved);
}

#[test]
fn units_resolve_concurrently_over_a_shared_database() {
    let mut fx = Fixture::new("Main");
    let (_, str_foo) = foo_overloads(&mut fx);
    let (other_unit, other_file) = fx.add_unit("Other");
    let other_foo = fx.routine(
        other_file,
        RoutineBuilder::function("Foo", TypeId::INTEGER)
            .param(Parameter::new("Value", TypeId::STRING)),
    );
    let main_file = fx.file;
    let db = fx.db.clone();

    let arg = fx.ast.string("abc");
    let (main_expr, main_name) = call(&mut fx, "Foo", vec![arg]);
    let arg = fx.ast.string("xyz");
    let (other_expr, other_name) = call(&mut fx, "Foo", vec![arg]);

    let (main, other) = std::thread::scope(|s| {
        let main = s.spawn(|| resolve(&db, main_file, &main_expr, main_file));
        let other = s.spawn(|| resolve(&db, other_file, &other_expr, other_file));
        (main.join().unwrap(), other.join().unwrap())
    });

    assert_eq!(main.1.decl_of(main_name.segments[0].id), Some(str_foo));
    assert_eq!(other.1.decl_of(other_name.segments[0].id), Some(other_foo));
    assert_eq!(other.0, TypeId::INTEGER);
    assert_eq!(other.1.unit(), other_unit);
    // Resolving never touches the shared graph
    assert!(db.shares_symbols_with(&fx.db));
}
