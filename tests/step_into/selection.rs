use crate::common::{candidate_names, dest, names, resolver};
use stepseer::config::EngineConfig;
use stepseer::debugger::disasm::listing::Listing;

const CHAIN_SOURCE: &str = "package main\n\nfunc main() {\n\tobj.build(arg(x)).run(y)\n}\n";

fn chain_listing() -> Listing {
    let mut listing = Listing::default();
    listing.push("main.go", 4, 0x10, "call main.arg(SB)", dest("main.arg"));
    listing.push(
        "main.go",
        4,
        0x20,
        "call main.(*Obj).build(SB)",
        dest("main.(*Obj).build"),
    );
    listing.push(
        "main.go",
        4,
        0x30,
        "call main.(*Obj).run(SB)",
        dest("main.(*Obj).run"),
    );
    listing
}

#[test]
fn test_innermost_wins() {
    struct TestCase {
        column: u64,
        pc: u64,
        expected: Option<&'static str>,
    }
    let (mut resolver, _) = resolver(CHAIN_SOURCE, chain_listing(), names([]), names([]));

    let test_cases = vec![
        TestCase {
            column: 13,
            pc: 0,
            expected: Some("arg"),
        },
        TestCase {
            column: 7,
            pc: 0,
            expected: Some("obj.build"),
        },
        TestCase {
            column: 3,
            pc: 0,
            expected: Some("obj.build"),
        },
        TestCase {
            column: 21,
            pc: 0,
            expected: Some("main.(*Obj).run"),
        },
        TestCase {
            column: 16,
            pc: 0,
            expected: Some("main.(*Obj).run"),
        },
        TestCase {
            column: 23,
            pc: 0,
            expected: None,
        },
    ];

    for tc in test_cases {
        let selected = resolver
            .resolve(tc.pc, "main.go", 4, tc.column)
            .map(|c| c.name().to_string());
        assert_eq!(selected.as_deref(), tc.expected, "column {}", tc.column);
    }

    let widths = resolver
        .candidates()
        .iter()
        .map(|c| c.column_interval())
        .collect::<Vec<_>>();
    assert_eq!(widths, vec![(12, 15), (2, 11), (2, 23)]);
}

#[test]
fn test_already_executed_filter() {
    struct TestCase {
        column: u64,
        pc: u64,
        expected: Option<&'static str>,
    }
    let (mut resolver, _) = resolver(CHAIN_SOURCE, chain_listing(), names([]), names([]));

    let test_cases = vec![
        TestCase {
            column: 13,
            pc: 0x10,
            expected: Some("arg"),
        },
        TestCase {
            column: 14,
            pc: 0x11,
            expected: Some("main.(*Obj).run"),
        },
        TestCase {
            column: 7,
            pc: 0x21,
            expected: Some("main.(*Obj).run"),
        },
        TestCase {
            column: 8,
            pc: 0x31,
            expected: None,
        },
    ];

    for tc in test_cases {
        let selected = resolver
            .resolve(tc.pc, "main.go", 4, tc.column)
            .map(|c| c.name().to_string());
        assert_eq!(
            selected.as_deref(),
            tc.expected,
            "column {} pc {:#x}",
            tc.column,
            tc.pc
        );
    }
}

#[test]
fn test_unique_names() {
    let mut listing = Listing::default();
    listing.push("main.go", 3, 0x10, "call main.f(SB)", dest("main.f"));
    listing.push("main.go", 3, 0x20, "call main.f(SB)", dest("main.f"));
    let (mut resolver, _) = resolver(
        "package main\nfunc main() {\n\tf(f(1))\n}\n",
        listing,
        names([]),
        names([]),
    );

    assert_eq!(resolver.resolve(0, "main.go", 3, 4).unwrap().name(), "f");
    let outer = resolver.resolve(0, "main.go", 3, 2).unwrap();
    assert_eq!(outer.name(), "f#1");
    assert_eq!(outer.instruction().pc, 0x20);
    assert_eq!(candidate_names(&resolver), vec!["f", "f#1"]);
}

#[test]
fn test_truncated_expression() {
    let mut listing = Listing::default();
    listing.push("main.go", 3, 0x10, "call", dest("main.(*Registry).lookupService"));
    listing.push("main.go", 3, 0x20, "call", dest("main.handle"));
    let (resolver, _) = resolver(
        "package main\nfunc main() {\n\thandle(s.registry.lookupService(name))\n}\n",
        listing,
        names([]),
        names(["main.handle"]),
    );
    let mut resolver = resolver.with_config(EngineConfig {
        expr_width: 10,
        ..EngineConfig::default()
    });

    let width = resolver.config().expr_width;
    let candidate = resolver.resolve(0, "main.go", 3, 12).unwrap();
    assert_eq!(candidate.name(), "s.registry.lookupService");
    assert_eq!(candidate.expr_string_truncated(width), "s.registry...");
}

#[test]
fn test_line_ends_terminate_statements() {
    let source = r#"package main

func main() {
	v := compute()
	*out = v
	z := f(g(x), h(y))
	x := a
	(*p).m(k(y))
}
"#;
    let mut listing = Listing::default();
    listing.push("main.go", 6, 0x100, "call main.g(SB)", dest("main.g"));
    listing.push("main.go", 6, 0x108, "call main.h(SB)", dest("main.h"));
    listing.push("main.go", 6, 0x110, "call main.f(SB)", dest("main.f"));
    listing.push("main.go", 8, 0x200, "call main.k(SB)", dest("main.k"));
    listing.push("main.go", 8, 0x210, "call main.(*T).m(SB)", dest("main.(*T).m"));
    let (mut resolver, _) = resolver(source, listing, names([]), names(["f", "g", "h", "k"]));

    let g = resolver.resolve(0x100, "main.go", 6, 9).unwrap();
    assert_eq!(g.name(), "g");
    assert_eq!(g.instruction().pc, 0x100);

    // `a` is not called with `(*p)` from the next line
    let k = resolver.resolve(0x200, "main.go", 8, 9).unwrap();
    assert_eq!(k.name(), "k");
    let m = resolver.resolve(0x200, "main.go", 8, 3).unwrap();
    assert_eq!(m.column_interval(), (2, 8));
    assert_eq!(m.instruction().pc, 0x210);
    assert_eq!(resolver.candidates().len(), 2);
}
