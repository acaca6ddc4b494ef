use super::*;
use crate::ModelError;

fn int_ref(builder: &mut TypeTableBuilder) -> TypeRef {
    TypeRef::Definition(builder.add_type(TypeDecl::structure("Int32")))
}

#[test]
fn test_keys_are_sequential_and_valid() {
    let mut builder = TypeTableBuilder::new();
    let a = builder.add_type(TypeDecl::class("A"));
    let b = builder.add_type(TypeDecl::class("B"));

    assert!(a.is_valid());
    assert_eq!(b.0, a.0 + 1);
    assert!(!TypeId::INVALID.is_valid());

    let table = builder.build().expect("valid model");
    assert_eq!(table.type_count(), 2);
    assert!(table.type_def(TypeId::INVALID).is_none());
}

#[test]
fn test_transitive_derivation() {
    let mut builder = TypeTableBuilder::new();
    let a = builder.add_type(TypeDecl::class("A"));
    let b = builder.add_type(TypeDecl::class("B").with_bases([a]));
    let c = builder.add_type(TypeDecl::class("C").with_bases([b]));
    let table = builder.build().expect("valid model");

    assert!(table.is_derived_from(c, a));
    assert!(table.is_derived_from(c, b));
    assert!(table.is_derived_from(c, c));
    assert!(!table.is_derived_from(a, c));
}

#[test]
fn test_derivation_through_interfaces() {
    let mut builder = TypeTableBuilder::new();
    let ibase = builder.add_type(TypeDecl::interface("IBase"));
    let iderived = builder.add_type(TypeDecl::interface("IDerived").with_bases([ibase]));
    let class = builder.add_type(TypeDecl::class("Impl").with_bases([iderived]));
    let table = builder.build().expect("valid model");

    assert!(table.is_derived_from(class, ibase));
    assert!(!table.is_derived_from(ibase, class));
}

#[test]
fn test_linearization_is_base_first() {
    let mut builder = TypeTableBuilder::new();
    let a = builder.add_type(TypeDecl::class("A"));
    let b = builder.add_type(TypeDecl::interface("B").with_bases([a]));
    let c = builder.add_type(TypeDecl::interface("C").with_bases([a]));
    let d = builder.add_type(TypeDecl::interface("D").with_bases([b, c]));
    let table = builder.build().expect("valid model");

    // Diamond: A is visited once, before both of its derived types.
    assert_eq!(table.linearize(d), vec![a, b, c, d]);
}

#[test]
fn test_class_linearization_skips_interfaces() {
    let mut builder = TypeTableBuilder::new();
    let object = builder.add_type(TypeDecl::class("Object"));
    let iface = builder.add_type(TypeDecl::interface("IFoo"));
    let class = builder.add_type(TypeDecl::class("Foo").with_bases([object, iface]));
    let tp = builder.add_type(TypeDecl::type_parameter("T").with_bases([class, iface]));
    let table = builder.build().expect("valid model");

    assert_eq!(table.linearize(class), vec![object, class]);
    // Type parameters see their whole constraint set.
    assert_eq!(table.linearize(tp), vec![object, iface, class, tp]);
}

#[test]
fn test_members_enumerated_base_first_in_declaration_order() {
    let mut builder = TypeTableBuilder::new();
    let int = int_ref(&mut builder);
    let base = builder.add_type(TypeDecl::class("Base"));
    let derived = builder.add_type(TypeDecl::class("Derived").with_bases([base]));
    let d1 = builder.add_member(derived, MemberDecl::field("X", int.clone()));
    let b1 = builder.add_member(base, MemberDecl::field("X", int.clone()));
    let b2 = builder.add_member(base, MemberDecl::method("X", int));
    let table = builder.build().expect("valid model");

    let members = table.members(derived, &mut |_: &MemberDef| true);
    assert_eq!(members, vec![b1, b2, d1]);

    let methods = table.members(derived, &mut |m: &MemberDef| m.is_method());
    assert_eq!(methods, vec![b2]);
}

#[test]
fn test_nested_types_registered_from_back_reference() {
    let mut builder = TypeTableBuilder::new();
    let outer_id = TypeId(2);
    let inner = builder.add_type(TypeDecl::class("Inner").nested_in(outer_id));
    let outer = builder.add_type(TypeDecl::class("Outer"));
    assert_eq!(outer, outer_id);
    let table = builder.build().expect("valid model");

    let outer_def = table.type_def(outer).expect("outer exists");
    assert_eq!(outer_def.nested_types, vec![inner]);
    assert_eq!(table.nested_types(outer, &mut |_: &TypeDef| true), vec![inner]);
}

#[test]
fn test_dangling_base_is_rejected() {
    let mut builder = TypeTableBuilder::new();
    builder.add_type(TypeDecl::class("Orphan").with_bases([TypeId(99)]));

    let err = builder.build().expect_err("dangling base");
    assert!(matches!(err, ModelError::UnknownType { .. }));
}

#[test]
fn test_cyclic_inheritance_is_rejected() {
    let mut builder = TypeTableBuilder::new();
    let a = TypeId(1);
    let b = TypeId(2);
    builder.add_type(TypeDecl::class("A").with_bases([b]));
    builder.add_type(TypeDecl::class("B").with_bases([a]));

    let err = builder.build().expect_err("cycle");
    assert!(matches!(err, ModelError::CyclicHierarchy(_)));
    assert!(err.is_invalid_state());
}

#[test]
fn test_module_visibility() {
    let mut builder = TypeTableBuilder::new();
    let core = builder.add_module("Core");
    let tests = builder.add_module("Core.Tests");
    let app = builder.add_module("App");
    builder.grant_internals(core, tests);
    let table = builder.build().expect("valid model");

    assert!(table.is_internally_visible(core, core));
    assert!(table.is_internally_visible(core, tests));
    assert!(!table.is_internally_visible(core, app));
    assert!(!table.is_internally_visible(tests, core));
}

#[test]
fn test_resolve_type_refs() {
    let mut builder = TypeTableBuilder::new();
    let int = int_ref(&mut builder);
    let handler = builder.add_type(TypeDecl::delegate("Handler"));
    let missing = builder.unresolved("Missing");
    let table = builder.build().expect("valid model");

    let TypeRef::Definition(int_id) = int else {
        panic!("expected definition");
    };
    assert_eq!(table.resolve_type_ref(&int), ResolvedType::Definition(int_id));
    assert_eq!(table.resolve_type_ref(&TypeRef::Dynamic), ResolvedType::Dynamic);
    assert_eq!(
        table.resolve_type_ref(&TypeRef::MethodTypeParameter(1)),
        ResolvedType::MethodTypeParameter(1)
    );
    assert!(matches!(
        table.resolve_type_ref(&missing),
        ResolvedType::Unknown(name) if table.name(name) == "Missing"
    ));
    assert!(table.is_delegate(handler));
    assert!(!table.is_delegate(int_id));
}

#[test]
fn test_accessibility_codes_round_trip_through_names() {
    assert_eq!(Accessibility::try_from(4).ok(), Some(Accessibility::Protected));
    assert_eq!(
        "protectedInternal".parse::<Accessibility>().ok(),
        Some(Accessibility::ProtectedOrInternal)
    );
    assert_eq!(Accessibility::ProtectedAndInternal.code(), 2);

    let err = Accessibility::try_from(7).expect_err("unknown code");
    assert!(err.is_invalid_state());
    assert!("friend".parse::<Accessibility>().is_err());
}

#[test]
fn test_nested_type_inherits_enclosing_module() {
    let mut builder = TypeTableBuilder::new();
    let core = builder.add_module("Core");
    let tools = builder.add_module("Tools");
    let outer = builder.add_type(TypeDecl::class("Outer").in_module(core));
    let middle = builder.add_type(TypeDecl::class("Middle").nested_in(outer));
    let inner = builder.add_type(TypeDecl::class("Inner").nested_in(middle));
    let pinned = builder.add_type(TypeDecl::class("Pinned").nested_in(outer).in_module(tools));
    let loose = builder.add_type(TypeDecl::class("Loose"));
    let table = builder.build().expect("valid model");

    let module_of = |ty: TypeId| table.type_def(ty).and_then(|def| def.module);
    assert_eq!(module_of(middle), Some(core));
    assert_eq!(module_of(inner), Some(core));
    assert_eq!(module_of(pinned), Some(tools));
    assert_eq!(module_of(loose), None);
}

#[test]
fn test_deep_chain_walks_reach_the_root() {
    let mut builder = TypeTableBuilder::new();
    let root = builder.add_type(TypeDecl::class("L0"));
    let mut leaf = root;
    for level in 1..5_000 {
        leaf = builder.add_type(TypeDecl::class(format!("L{level}")).with_bases([leaf]));
    }
    let table = builder.build().expect("valid model");

    assert!(table.is_derived_from(leaf, root));
    let order = table.linearize(leaf);
    assert_eq!(order.len(), 5_000);
    assert_eq!(order.first(), Some(&root));
    assert_eq!(order.last(), Some(&leaf));
}
