use super::*;
use crate::args::Query;

fn report(kind: &str, found: bool, entries: &[&str]) -> Report {
    Report {
        query: Query::Lookup,
        receiver: "Derived".to_string(),
        name: Some("Make".to_string()),
        arity: 2,
        invocation: true,
        kind: kind.to_string(),
        found,
        ambiguous: false,
        entries: entries.iter().map(|e| e.to_string()).collect(),
        return_type: None,
    }
}

#[test]
fn renders_method_group_without_color() {
    let reporter = Reporter::new(false);
    let rendered = reporter.render(&report(
        "methodGroup",
        true,
        &["Base.Make<,>(Int32): Void", "Derived.Make<,>(): Void"],
    ));

    assert_eq!(
        rendered,
        "Derived.Make<,>(...) - methodGroup\n  Base.Make<,>(Int32): Void\n  Derived.Make<,>(): Void"
    );
}

#[test]
fn renders_member_with_return_type() {
    let mut member = report("member", true, &["Base.Foo: Int32"]);
    member.name = Some("Foo".to_string());
    member.arity = 0;
    member.invocation = false;
    member.return_type = Some("Int32".to_string());

    let rendered = Reporter::new(false).render(&member);

    assert_eq!(rendered, "Derived.Foo - member\n  Base.Foo: Int32\n  -> Int32");
}

#[test]
fn renders_not_found() {
    let rendered = Reporter::new(false).render(&report("unknownMember", false, &[]));

    assert_eq!(rendered, "Derived.Make<,>(...) - unknownMember: nothing found");
}

#[test]
fn color_changes_only_decoration() {
    colored::control::set_override(true);
    let plain = Reporter::new(false).render(&report("member", true, &["Base.Make: Int32"]));
    let colored = Reporter::new(true).render(&report("member", true, &["Base.Make: Int32"]));
    colored::control::unset_override();

    assert_ne!(plain, colored);
    assert!(colored.contains("Base.Make: Int32"));
    assert!(!plain.contains('\u{1b}'));
}
