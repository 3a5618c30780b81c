use oxpas_identity::{DeclId, ScopeId};
use oxpas_syntax::{BinaryOp, Expr, NameReference, PrimaryPart};

use crate::errors::SemanticError;
use crate::resolution::Resolution;
use crate::symbols::{Parameter, RoutineBuilder, Visibility};
use crate::testing::Fixture;
use crate::type_arena::{ArrayKind, HelperKind, ParamType, ProceduralKind, TypeId, TypeIdVec};
use crate::unit_resolver::ResolvedUnit;

fn resolve(fx: &Fixture, expr: &Expr, scope: ScopeId) -> (TypeId, ResolvedUnit) {
    let mut resolver = fx.resolver().unwrap();
    let ty = resolver.resolve_expression(expr, scope).unwrap();
    (ty, resolver.finish())
}

/// `name(args)`, keeping the name reference for node lookups.
fn call(fx: &mut Fixture, image: &str, args: Vec<Expr>) -> (Expr, NameReference) {
    let name = fx.ast.name_ref(image);
    let args = fx.ast.args_part(args);
    let expr = fx.ast.primary(vec![PrimaryPart::Name(name.clone()), args]);
    (expr, name)
}

fn path(fx: &mut Fixture, image: &str) -> (Expr, NameReference) {
    let name = fx.ast.name_ref(image);
    let expr = fx.ast.primary(vec![PrimaryPart::Name(name.clone())]);
    (expr, name)
}

#[test]
fn chain_binds_every_link() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, a_ty, a_scope) = fx.record(file, "TA");
    let (_, b_ty, b_scope) = fx.record(file, "TB");
    let a = fx.variable(file, "A", a_ty);
    let b = fx.variable(a_scope, "B", b_ty);
    let c = fx.variable(b_scope, "C", TypeId::WORD);

    let (expr, name) = path(&mut fx, "A.B.C");
    let (ty, unit) = resolve(&fx, &expr, file);

    assert_eq!(ty, TypeId::WORD);
    assert_eq!(unit.type_of(expr.id), TypeId::WORD);
    let bound: Vec<_> = name.segments.iter().map(|s| unit.decl_of(s.id)).collect();
    assert_eq!(bound, vec![Some(a), Some(b), Some(c)]);

    let first = unit.references(a).next().unwrap();
    assert!(first.qualifies_next);
    assert!(first.next.is_some());
    assert!(!unit.references(c).next().unwrap().qualifies_next);
}

#[test]
fn string_argument_selects_string_overload() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let int_foo = fx.routine(
        file,
        RoutineBuilder::function("Foo", TypeId::BOOLEAN)
            .param(Parameter::new("Value", TypeId::INTEGER))
            .overload(),
    );
    let str_foo = fx.routine(
        file,
        RoutineBuilder::function("Foo", TypeId::STRING)
            .param(Parameter::new("Value", TypeId::STRING))
            .overload(),
    );

    let arg = fx.ast.string("hello");
    let (expr, name) = call(&mut fx, "Foo", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);

    assert_eq!(ty, TypeId::STRING);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(str_foo));
    assert!(!unit.occurrences().is_referenced(int_foo));
    assert!(unit.references(str_foo).next().unwrap().explicit_invocation);
}

#[test]
fn sibling_overloads_with_ancestor_argument_are_ambiguous() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, base, _) = fx.class(file, "TBase", None);
    let (_, derived_a, _) = fx.class(file, "TDerivedA", Some(base));
    let (_, derived_b, _) = fx.class(file, "TDerivedB", Some(base));
    for ty in [derived_a, derived_b] {
        fx.routine(
            file,
            RoutineBuilder::procedure("Foo").param(Parameter::new("Item", ty)).overload(),
        );
    }
    fx.variable(file, "Item", base);

    let arg = fx.ast.path("Item");
    let (expr, _) = call(&mut fx, "Foo", vec![arg]);
    let err = fx.resolver().unwrap().resolve_expression(&expr, file).unwrap_err();
    assert!(matches!(err, SemanticError::AmbiguousReference { ref name, .. } if name == "Foo"));
}

#[test]
fn bare_inherited_skips_helper() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, base, base_scope) = fx.class(file, "TBase", None);
    let base_bar = fx.routine(base_scope, RoutineBuilder::procedure("Bar"));
    let (_, child, child_scope) = fx.class(file, "TChild", Some(base));
    let child_bar = fx.routine(child_scope, RoutineBuilder::procedure("Bar"));
    let (types, symbols) = fx.db.parts_mut();
    let (_, _, helper_scope) =
        symbols.declare_helper(types, file, "TChildHelper", HelperKind::Class, child, None);
    let helper_bar = fx.routine(helper_scope, RoutineBuilder::procedure("Bar"));

    let body = fx.method_scope(child_bar, Some(child_scope));
    let part = fx.ast.inherited_part();
    let marker = part.id();
    let expr = fx.ast.primary(vec![part]);
    let (_, unit) = resolve(&fx, &expr, body);

    assert_eq!(unit.decl_of(marker), Some(base_bar));
    assert!(!unit.occurrences().is_referenced(helper_bar));
    assert!(!unit.occurrences().is_referenced(child_bar));
}

#[test]
fn named_inherited_searches_super_type() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, base, base_scope) = fx.class(file, "TBase", None);
    let base_count = fx.routine(base_scope, RoutineBuilder::function("Count", TypeId::INTEGER));
    let (_, _, child_scope) = fx.class(file, "TChild", Some(base));
    let child_count = fx.routine(child_scope, RoutineBuilder::function("Count", TypeId::INTEGER));

    let body = fx.method_scope(child_count, Some(child_scope));
    let inherited = fx.ast.inherited_part();
    let name = fx.ast.name_ref("Count");
    let expr = fx.ast.primary(vec![inherited, PrimaryPart::Name(name.clone())]);
    let (ty, unit) = resolve(&fx, &expr, body);

    assert_eq!(ty, TypeId::INTEGER);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(base_count));
}

#[test]
fn type_parameter_stops_at_first_constraint_with_candidates() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, first, first_scope) = fx.class(file, "TFirst", None);
    let (_, second, second_scope) = fx.class(file, "TSecond", None);
    let first_value = fx.variable(first_scope, "Value", TypeId::INTEGER);
    fx.variable(second_scope, "Value", TypeId::STRING);
    let other = fx.variable(second_scope, "Other", TypeId::DOUBLE);
    fx.routine(first_scope, RoutineBuilder::procedure("Run"));
    fx.routine(
        second_scope,
        RoutineBuilder::procedure("Run").param(Parameter::new("N", TypeId::INTEGER)),
    );

    let (types, symbols) = fx.db.parts_mut();
    let (_, t) = symbols.declare_type_parameter(types, file, "T", &[first, second]);
    fx.variable(file, "X", t);

    let (value, value_name) = path(&mut fx, "X.Value");
    let (ty, unit) = resolve(&fx, &value, file);
    assert_eq!(ty, TypeId::INTEGER);
    assert_eq!(unit.decl_of(value_name.segments[1].id), Some(first_value));

    let (expr, other_name) = path(&mut fx, "X.Other");
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::DOUBLE);
    assert_eq!(unit.decl_of(other_name.segments[1].id), Some(other));

    // TFirst.Run is found first and rejected by arity; TSecond is not tried
    let one = fx.ast.int(1);
    let (run, run_name) = call(&mut fx, "X.Run", vec![one]);
    let (ty, unit) = resolve(&fx, &run, file);
    assert_eq!(ty, TypeId::UNKNOWN);
    assert_eq!(unit.decl_of(run_name.segments[1].id), None);
}

#[test]
fn helper_methods_apply_to_intrinsic_values() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (types, symbols) = fx.db.parts_mut();
    let (_, _, helper_scope) = symbols.declare_helper(
        types,
        file,
        "TStringHelper",
        HelperKind::Record,
        TypeId::STRING,
        None,
    );
    let to_upper = fx.routine(helper_scope, RoutineBuilder::function("ToUpper", TypeId::STRING));
    fx.variable(file, "S", TypeId::STRING);

    let (expr, name) = path(&mut fx, "S.ToUpper");
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::STRING);
    assert_eq!(unit.decl_of(name.segments[1].id), Some(to_upper));
}

#[test]
fn dotted_unit_name_qualifies_reference() {
    let mut fx = Fixture::new("Main");
    let (_, lib) = fx.add_unit("Lib.Strings");
    let trim = fx.routine(
        lib,
        RoutineBuilder::function("Trim", TypeId::STRING).param(Parameter::new("S", TypeId::STRING)),
    );
    let import = fx.import(fx.file, "Lib.Strings", lib);

    let arg = fx.ast.string("  padded  ");
    let (expr, name) = call(&mut fx, "lib.strings.Trim", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, fx.file);

    assert_eq!(ty, TypeId::STRING);
    assert_eq!(unit.decl_of(name.segments[2].id), Some(trim));
    let unit_ref = unit.references(import).next().unwrap();
    assert_eq!(unit_ref.image, "lib.strings");
    assert_eq!(unit_ref.node, name.segments[1].id);
}

#[test]
fn unknown_name_leaves_unknown_type() {
    let mut fx = Fixture::new("Main");
    let arg = fx.ast.path("Missing");
    let (expr, name) = call(&mut fx, "Nowhere.Foo", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, fx.file);
    assert_eq!(ty, TypeId::UNKNOWN);
    assert_eq!(unit.decl_of(name.segments[0].id), None);
    assert!(unit.occurrences().iter().all(|o| o.declaration.is_none()));
}

#[test]
fn indexer_uses_default_array_property() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, list, list_scope) = fx.class(file, "TStringList", None);
    let items = fx.symbols().declare_property(
        list_scope,
        "Strings",
        TypeId::STRING,
        vec![Parameter::new("Index", TypeId::INTEGER)],
        true,
        Visibility::Public,
    );
    fx.variable(file, "List", list);

    let list_part = fx.ast.name_part("List");
    let index = fx.ast.int(0);
    let index_part = fx.ast.index_part(vec![index]);
    let index_id = index_part.id();
    let expr = fx.ast.primary(vec![list_part, index_part]);
    let (ty, unit) = resolve(&fx, &expr, file);

    assert_eq!(ty, TypeId::STRING);
    let implicit = unit.references(items).next().unwrap();
    assert_eq!(implicit.node, index_id);
    assert_eq!(implicit.image, "Strings");
}

#[test]
fn string_and_array_indexing() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let ints = fx.types().dynamic_array(TypeId::INTEGER);
    fx.variable(file, "Ints", ints);
    fx.variable(file, "Text", TypeId::ANSISTRING);

    for (image, expected) in [("Ints", TypeId::INTEGER), ("Text", TypeId::ANSICHAR)] {
        let head = fx.ast.name_part(image);
        let index = fx.ast.int(1);
        let index = fx.ast.index_part(vec![index]);
        let expr = fx.ast.primary(vec![head, index]);
        let (ty, _) = resolve(&fx, &expr, file);
        assert_eq!(ty, expected, "{image}[1]");
    }
}

#[test]
fn pointer_dereference_reaches_record_fields() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, rec, rec_scope) = fx.record(file, "TRec");
    let field = fx.variable(rec_scope, "Size", TypeId::CARDINAL);
    let ptr = fx.types().pointer_to(rec);
    fx.variable(file, "P", ptr);

    let head = fx.ast.name_part("P");
    let deref = fx.ast.deref_part();
    let name = fx.ast.name_ref("Size");
    let expr = fx.ast.primary(vec![head, deref, PrimaryPart::Name(name.clone())]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::CARDINAL);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(field));

    // Member access through a pointer dereferences implicitly
    let (expr, _) = path(&mut fx, "P.Size");
    let (ty, _) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::CARDINAL);
}

#[test]
fn type_identifier_with_one_argument_is_a_cast() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (foo_decl, foo, _) = fx.class(file, "TFoo", None);
    let tobject = fx.tobject();
    fx.variable(file, "Obj", tobject);

    let arg = fx.ast.path("Obj");
    let (expr, name) = call(&mut fx, "TFoo", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, foo);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(foo_decl));
}

#[test]
fn class_reference_value_casts_only_one_argument() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, foo, _) = fx.class(file, "TFoo", None);
    let tobject = fx.tobject();
    fx.variable(file, "Obj", tobject);
    let second = fx.variable(file, "Other", tobject);

    let meta = fx.ast.path("TFoo");
    let paren = fx.ast.paren_part(meta);
    let args = vec![fx.ast.path("Obj")];
    let args = fx.ast.args_part(args);
    let expr = fx.ast.primary(vec![paren, args]);
    assert_eq!(resolve(&fx, &expr, file).0, foo);

    let meta = fx.ast.path("TFoo");
    let paren = fx.ast.paren_part(meta);
    let args = vec![fx.ast.path("Obj"), fx.ast.path("Other")];
    let args = fx.ast.args_part(args);
    let expr = fx.ast.primary(vec![paren, args]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_ne!(ty, foo);
    // The arguments are still resolved
    assert_eq!(unit.references(second).count(), 1);
}

#[test]
fn constructor_call_types_as_class() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, foo, _) = fx.class(file, "TFoo", None);

    let (expr, _) = path(&mut fx, "TFoo.Create");
    let (ty, _) = resolve(&fx, &expr, file);
    assert_eq!(ty, foo);

    let (expr, _) = call(&mut fx, "TFoo.Create", Vec::new());
    let (ty, _) = resolve(&fx, &expr, file);
    assert_eq!(ty, foo);
}

#[test]
fn explicit_dynamic_array_create() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let bytes = fx.types().new_named_array("TBytes", ArrayKind::Dynamic, TypeId::BYTE);
    fx.symbols().declare_type(file, "TBytes", bytes);

    let args = vec![fx.ast.int(1), fx.ast.int(2)];
    let (expr, _) = call(&mut fx, "TBytes.Create", args);
    let (ty, _) = resolve(&fx, &expr, file);
    assert_eq!(ty, bytes);
}

#[test]
fn procedural_variable_call_types_as_result() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let func = fx.types().procedural(
        ProceduralKind::Reference,
        [ParamType::value(TypeId::INTEGER)],
        TypeId::STRING,
    );
    let callback = fx.variable(file, "Format", func);

    let arg = fx.ast.int(42);
    let (expr, name) = call(&mut fx, "Format", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::STRING);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(callback));
}

#[test]
fn routine_name_assigned_to_procedural_type_is_a_method_reference() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let tobject = fx.tobject();
    fx.routine(
        file,
        RoutineBuilder::procedure("Handler")
            .param(Parameter::new("Value", TypeId::INTEGER))
            .overload(),
    );
    let by_sender = fx.routine(
        file,
        RoutineBuilder::procedure("Handler").param(Parameter::new("Sender", tobject)).overload(),
    );
    let notify = fx.types().procedural(
        ProceduralKind::Reference,
        [ParamType::value(tobject)],
        TypeId::VOID,
    );

    let (expr, name) = path(&mut fx, "Handler");
    let mut resolver = fx.resolver().unwrap();
    resolver.resolve_expression_as(&expr, file, Some(notify)).unwrap();
    let unit = resolver.finish();

    assert_eq!(unit.decl_of(name.segments[0].id), Some(by_sender));
    let occurrence = unit.references(by_sender).next().unwrap();
    assert!(occurrence.method_reference);
    assert!(!occurrence.explicit_invocation);
}

#[test]
fn bare_routine_argument_resolves_against_parameter_type() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let callback = fx
        .types()
        .procedural(ProceduralKind::Procedure, [ParamType::value(TypeId::STRING)], TypeId::VOID);
    let register = fx.routine(
        file,
        RoutineBuilder::procedure("Register").param(Parameter::new("Callback", callback)),
    );
    let log = fx.routine(
        file,
        RoutineBuilder::procedure("Log").param(Parameter::new("Message", TypeId::STRING)),
    );

    let arg = fx.ast.path("Log");
    let arg_name = arg.as_bare_name().unwrap().clone();
    let (expr, name) = call(&mut fx, "Register", vec![arg]);
    let (_, unit) = resolve(&fx, &expr, file);

    assert_eq!(unit.decl_of(name.segments[0].id), Some(register));
    assert_eq!(unit.decl_of(arg_name.segments[0].id), Some(log));
    assert!(unit.references(log).next().unwrap().method_reference);
}

#[test]
fn intrinsic_routines_compute_their_result() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    fx.variable(file, "Ratio", TypeId::DOUBLE);
    let names = fx.types().dynamic_array(TypeId::STRING);
    fx.variable(file, "Names", names);

    let arg = fx.ast.path("Ratio");
    let (abs, _) = call(&mut fx, "Abs", vec![arg]);
    assert_eq!(resolve(&fx, &abs, file).0, TypeId::DOUBLE);

    let arg = fx.ast.path("Names");
    let (high, _) = call(&mut fx, "High", vec![arg]);
    assert_eq!(resolve(&fx, &high, file).0, TypeId::INTEGER);

    let arg = fx.ast.path("Integer");
    let (low, _) = call(&mut fx, "Low", vec![arg]);
    assert_eq!(resolve(&fx, &low, file).0, TypeId::INTEGER);
}

#[test]
fn private_method_of_unrelated_foreign_class_is_hidden() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, lib) = fx.add_unit("Lib");
    let (_, lib_class, lib_scope) = fx.class(lib, "TLibClass", None);
    fx.routine(lib_scope, RoutineBuilder::procedure("Secret").visibility(Visibility::Private));
    let open = fx.routine(lib_scope, RoutineBuilder::procedure("Open"));
    fx.import(file, "Lib", lib);

    let (_, _, main_scope) = fx.class(file, "TMain", None);
    let run = fx.routine(main_scope, RoutineBuilder::procedure("Run"));
    let body = fx.method_scope(run, Some(main_scope));
    fx.variable(body, "Other", lib_class);

    let (secret, secret_name) = path(&mut fx, "Other.Secret");
    let (_, unit) = resolve(&fx, &secret, body);
    assert_eq!(unit.decl_of(secret_name.segments[1].id), None);

    let (expr, open_name) = path(&mut fx, "Other.Open");
    let (_, unit) = resolve(&fx, &expr, body);
    assert_eq!(unit.decl_of(open_name.segments[1].id), Some(open));
}

#[test]
fn operators_type_through_synthesized_signatures() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    fx.variable(file, "A", TypeId::SHORTINT);
    fx.variable(file, "B", TypeId::SHORTINT);
    fx.variable(file, "I", TypeId::INTEGER);
    fx.variable(file, "C", TypeId::CARDINAL);
    fx.variable(file, "V", TypeId::VARIANT);

    let cases = [
        ("A", BinaryOp::Add, "B", TypeId::SHORTINT),
        ("I", BinaryOp::Add, "C", TypeId::INT64),
        ("I", BinaryOp::And, "C", TypeId::CARDINAL),
        ("I", BinaryOp::LessThan, "C", TypeId::BOOLEAN),
        // (Variant, Variant) ties with the Integer ladder and is synthesized
        // first
        ("V", BinaryOp::Add, "I", TypeId::VARIANT),
    ];
    for (left, op, right, expected) in cases {
        let l = fx.ast.path(left);
        let r = fx.ast.path(right);
        let expr = fx.ast.binary(l, op, r);
        assert_eq!(resolve(&fx, &expr, file).0, expected, "{left} {op:?} {right}");
    }
}

#[test]
fn class_operator_overload_is_selected() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, point, point_scope) = fx.record(file, "TPoint");
    let add = fx.routine(
        point_scope,
        RoutineBuilder::operator("Add", point)
            .params([Parameter::new("Left", point), Parameter::new("Right", point)]),
    );
    fx.variable(file, "P", point);
    fx.variable(file, "Q", point);

    let l = fx.ast.path("P");
    let r = fx.ast.path("Q");
    let expr = fx.ast.binary(l, BinaryOp::Add, r);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, point);
    // Operator overloads are not referenced by name
    assert!(!unit.occurrences().is_referenced(add));
}

#[test]
fn is_and_as() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, foo, _) = fx.class(file, "TFoo", None);
    let tobject = fx.tobject();
    fx.variable(file, "Obj", tobject);

    let l = fx.ast.path("Obj");
    let r = fx.ast.path("TFoo");
    let is = fx.ast.binary(l, BinaryOp::Is, r);
    assert_eq!(resolve(&fx, &is, file).0, TypeId::BOOLEAN);

    let l = fx.ast.path("Obj");
    let r = fx.ast.path("TFoo");
    let as_expr = fx.ast.binary(l, BinaryOp::As, r);
    assert_eq!(resolve(&fx, &as_expr, file).0, foo);
}

#[test]
fn explicit_generic_arguments_specialize_signature() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (types, symbols) = fx.db.parts_mut();
    let (t_decl, t) = symbols.declare_type_parameter(types, file, "T", &[]);
    let identity = fx.routine(
        file,
        RoutineBuilder::function("Identity", t)
            .param(Parameter::new("Value", t))
            .type_params(vec![t_decl]),
    );

    let arg = fx.ast.int(7);
    let (expr, name) = call(&mut fx, "Identity<Integer>", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::INTEGER);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(identity));
    let occurrence = unit.references(identity).next().unwrap();
    assert_eq!(occurrence.type_arguments, Some(vec![TypeId::INTEGER]));
}

/// `TBox<T>` with a `Value: T` field and two `Put` overloads.
fn generic_box(fx: &mut Fixture) -> (DeclId, DeclId) {
    let file = fx.file;
    let (box_decl, _, box_scope) = fx.class(file, "TBox", None);
    let (types, symbols) = fx.db.parts_mut();
    let (t_decl, t) = symbols.declare_type_parameter(types, box_scope, "T", &[]);
    symbols.set_type_params(box_decl, vec![t_decl]);
    fx.variable(box_scope, "Value", t);
    let put_t = fx.routine(
        box_scope,
        RoutineBuilder::function("Put", TypeId::BOOLEAN).param(Parameter::new("V", t)).overload(),
    );
    let put_double = fx.routine(
        box_scope,
        RoutineBuilder::function("Put", TypeId::INTEGER)
            .param(Parameter::new("V", TypeId::DOUBLE))
            .overload(),
    );
    (put_t, put_double)
}

#[test]
fn specialized_type_arguments_reach_members() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    generic_box(&mut fx);

    let (expr, _) = path(&mut fx, "TBox<Integer>.Create.Value");
    let (ty, _) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::INTEGER);

    let (expr, _) = path(&mut fx, "TBox<string>.Create.Value");
    let (ty, _) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::STRING);
}

#[test]
fn specialized_parameter_no_longer_accepts_any_argument() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (put_t, put_double) = generic_box(&mut fx);
    fx.variable(file, "N", TypeId::INTEGER);

    // `Put(V: string)` rejects an Integer, leaving the Double overload
    let arg = fx.ast.path("N");
    let (expr, name) = call(&mut fx, "TBox<string>.Create.Put", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::INTEGER);
    assert_eq!(unit.decl_of(name.segments[2].id), Some(put_double));

    let arg = fx.ast.path("N");
    let (expr, name) = call(&mut fx, "TBox<Integer>.Create.Put", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::BOOLEAN);
    assert_eq!(unit.decl_of(name.segments[2].id), Some(put_t));
}

#[test]
fn regular_routine_wins_tie_with_inferred_generic() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (types, symbols) = fx.db.parts_mut();
    let (t_decl, t) = symbols.declare_type_parameter(types, file, "T", &[]);
    let generic = fx.routine(
        file,
        RoutineBuilder::function("Show", TypeId::BOOLEAN)
            .param(Parameter::new("V", t))
            .type_params(vec![t_decl])
            .overload(),
    );
    let regular = fx.routine(
        file,
        RoutineBuilder::function("Show", TypeId::INTEGER)
            .param(Parameter::new("V", TypeId::INTEGER))
            .overload(),
    );
    fx.variable(file, "N", TypeId::INTEGER);

    // Show<Integer> ranks the same as Show(Integer)
    let arg = fx.ast.path("N");
    let (expr, name) = call(&mut fx, "Show", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::INTEGER);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(regular));

    let arg = fx.ast.string("abc");
    let (expr, name) = call(&mut fx, "Show", vec![arg]);
    let (ty, unit) = resolve(&fx, &expr, file);
    assert_eq!(ty, TypeId::BOOLEAN);
    assert_eq!(unit.decl_of(name.segments[0].id), Some(generic));
}

#[test]
fn method_name_declares_forward_type_parameters() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (_, base, _) = fx.class(file, "TBase", None);
    let (foo_decl, _, foo_scope) = fx.class(file, "TFoo", None);
    let (types, symbols) = fx.db.parts_mut();
    let (t_decl, t) = symbols.declare_type_parameter(types, foo_scope, "T", &[base]);
    let bar = fx.routine(
        foo_scope,
        RoutineBuilder::procedure("Bar")
            .param(Parameter::new("Item", t))
            .type_params(vec![t_decl]),
    );
    // A non-generic overload with the same name must not match
    fx.routine(
        foo_scope,
        RoutineBuilder::procedure("Bar").param(Parameter::new("Item", TypeId::INTEGER)).overload(),
    );

    let body = fx.symbols().add_method_scope(file, Some(bar), Some(foo_scope));
    let header_t = fx.types().new_type_parameter("t", TypeIdVec::new());
    let name = fx.ast.name_ref("TFoo.Bar<T>");

    let mut resolver = fx.resolver().unwrap();
    let resolution = resolver
        .resolve_method_name(&name, body, &[header_t], TypeId::UNKNOWN, false)
        .unwrap();
    assert_eq!(resolution, Resolution::Resolved(bar));

    let unit = resolver.finish();
    assert_eq!(unit.decl_of(name.segments[0].id), Some(foo_decl));
    let symbols = &unit.db().symbols;
    let t_symbol = symbols.lookup_symbol("T").unwrap();
    let [forward] = symbols.scope(body).lookup(t_symbol) else {
        panic!("expected one forward type parameter");
    };
    let forward_ty = symbols.decl(*forward).ty().unwrap();
    assert_eq!(unit.db().types.constraints(forward_ty), &[base]);

    // The caller's database is untouched
    assert!(fx.db.symbols.scope(body).lookup(t_symbol).is_empty());
}

#[test]
fn resolve_name_reports_outcome() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (foo_decl, _, _) = fx.class(file, "TFoo", None);

    let mut resolver = fx.resolver().unwrap();
    let found = fx.ast.name_ref("TFoo");
    assert_eq!(resolver.resolve_name(&found, file).unwrap(), Resolution::Resolved(foo_decl));
    let missing = fx.ast.name_ref("TFoo.Nope");
    assert_eq!(resolver.resolve_name(&missing, file).unwrap(), Resolution::Unresolved);
}

#[test]
fn forward_types_complete_only_in_own_unit() {
    let mut fx = Fixture::new("Main");
    let file = fx.file;
    let (lib_unit, _) = fx.add_unit("Lib");
    let unit = fx.unit;
    let own = fx.types().new_forward("TNode", unit);
    let foreign = fx.types().new_forward("TOther", lib_unit);
    let (_, node, _) = fx.class(file, "TNode", None);

    let mut resolver = fx.resolver().unwrap();
    resolver.complete_forward_type(own, node).unwrap();
    assert!(resolver.db().types.is_class(own));
    assert!(matches!(
        resolver.complete_forward_type(own, node),
        Err(SemanticError::NotAForwardType { .. })
    ));
    assert!(matches!(
        resolver.complete_forward_type(foreign, node),
        Err(SemanticError::ForeignMutation { .. })
    ));
    // Completion stays private to the resolver
    assert!(fx.db.types.is_forward(own));
}

#[test]
fn resolver_requires_file_scope() {
    let mut fx = Fixture::new("Main");
    let (_, _, type_scope) = fx.class(fx.file, "TFoo", None);
    let err = crate::unit_resolver::UnitResolver::new(&fx.db, type_scope).unwrap_err();
    assert!(matches!(err, SemanticError::NotAFileScope { .. }));
    assert!(crate::unit_resolver::UnitResolver::new(&fx.db, ScopeId::new(9999)).is_err());
}
