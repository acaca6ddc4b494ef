use super::*;
use crate::fixtures::Fixture;
use crate::{MemberCandidate, TypeCandidate};
use nomen_model::{MemberId, ResolvedType, TypeTable};

fn survivors<'a>(table: &'a TypeTable, types: &[TypeId], members: &[MemberId]) -> Candidates<'a> {
    Candidates {
        types: types
            .iter()
            .enumerate()
            .map(|(ordinal, &id)| TypeCandidate {
                id,
                ordinal: ordinal as u32,
                def: table.type_def(id).expect("type"),
            })
            .collect(),
        members: members
            .iter()
            .enumerate()
            .map(|(ordinal, &id)| MemberCandidate {
                id,
                ordinal: ordinal as u32,
                def: table.member(id).expect("member"),
            })
            .collect(),
    }
}

struct Model {
    table: TypeTable,
    owner: TypeId,
    int: TypeId,
    first: TypeId,
    second: TypeId,
    field: MemberId,
    property: MemberId,
    method_a: MemberId,
    method_b: MemberId,
}

fn model() -> Model {
    let mut fx = Fixture::new();
    let owner = fx.class("Owner", &[]);
    let int = fx.int;
    let first = fx.nested_class(owner, "X");
    let second = fx.nested_class(owner, "Y");
    let field = fx.field(owner, "F", int);
    let property = fx.field(owner, "P", int);
    let method_a = fx.method(owner, "M", &[]);
    let method_b = fx.method(owner, "M", &[int]);
    Model {
        table: fx.build(),
        owner,
        int,
        first,
        second,
        field,
        property,
        method_a,
        method_b,
    }
}

fn classify(m: &Model, types: &[TypeId], members: &[MemberId]) -> ResolveResult {
    ResultClassifier::new(&m.table).classify(&survivors(&m.table, types, members), m.owner, "X", 0)
}

#[test]
fn test_single_type() {
    let m = model();
    assert_eq!(classify(&m, &[m.first], &[]), ResolveResult::Type(m.first));
}

#[test]
fn test_several_types_report_the_first() {
    let m = model();
    assert_eq!(
        classify(&m, &[m.first, m.second], &[]),
        ResolveResult::AmbiguousType(m.first)
    );
}

#[test]
fn test_type_next_to_member_is_ambiguous() {
    let m = model();
    let result = classify(&m, &[m.first], &[m.field]);
    assert_eq!(result, ResolveResult::AmbiguousType(m.first));
    assert!(result.is_ambiguous());
}

#[test]
fn test_single_non_method() {
    let m = model();
    assert_eq!(
        classify(&m, &[], &[m.field]),
        ResolveResult::Member {
            member: m.field,
            return_type: ResolvedType::Definition(m.int),
        }
    );
}

#[test]
fn test_several_non_methods_report_the_first() {
    let m = model();
    assert_eq!(
        classify(&m, &[], &[m.property, m.field]),
        ResolveResult::Member {
            member: m.property,
            return_type: ResolvedType::Definition(m.int),
        }
    );
}

#[test]
fn test_methods_form_a_group_in_order() {
    let m = model();
    let result = classify(&m, &[], &[m.method_b, m.method_a]);
    assert_eq!(result, ResolveResult::MethodGroup(vec![m.method_b, m.method_a]));
    assert_eq!(result.methods(), &[m.method_b, m.method_a]);
    assert_eq!(result.kind_name(), "methodGroup");
}

#[test]
fn test_non_method_among_methods_is_ambiguous_member() {
    let m = model();
    assert_eq!(
        classify(&m, &[], &[m.method_a, m.field, m.property, m.method_b]),
        ResolveResult::AmbiguousMember {
            member: m.field,
            return_type: ResolvedType::Definition(m.int),
        }
    );
}

#[test]
fn test_nothing_survives() {
    let m = model();
    let result = ResultClassifier::new(&m.table).classify(
        &survivors(&m.table, &[], &[]),
        m.owner,
        "Missing",
        2,
    );
    assert_eq!(
        result,
        ResolveResult::UnknownMember {
            receiver: m.owner,
            name: "Missing".to_string(),
            arity: 2,
        }
    );
    assert!(result.is_unknown());
    assert!(result.methods().is_empty());
}
