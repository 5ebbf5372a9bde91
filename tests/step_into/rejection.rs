use crate::common::{dest, names, resolver, CallCounter, MemorySource};
use crate::E2E_SOURCE;
use stepseer::debugger::disasm::listing::Listing;
use stepseer::debugger::disasm::{CallInstruction, LineDisassembler};
use stepseer::debugger::{Error, StepIntoResolver};

#[test]
fn test_count_mismatch_rejection() {
    let mut listing = Listing::default();
    listing.push("main.go", 4, 0x104, "call main.g(SB)", dest("main.g"));
    listing.push("main.go", 4, 0x111, "call main.f(SB)", dest("main.f"));
    let (mut resolver, _) = resolver(E2E_SOURCE, listing, names([]), names([]));

    for column in 1..=20 {
        assert!(resolver.resolve(0, "main.go", 4, column).is_none());
        assert!(resolver.candidates().is_empty());
        assert!(!resolver.is_valid());
    }
}

#[test]
fn test_name_mismatch_rejects_whole_line() {
    let mut listing = Listing::default();
    listing.push("main.go", 4, 0x104, "call main.g(SB)", dest("main.g"));
    listing.push("main.go", 4, 0x10c, "call main.k(SB)", dest("main.k"));
    listing.push("main.go", 4, 0x111, "call main.f(SB)", dest("main.f"));
    let (mut resolver, _) = resolver(
        E2E_SOURCE,
        listing,
        names([]),
        names(["main.f", "main.g", "main.h"]),
    );

    // g itself matches, but the line is rejected as a whole
    assert!(resolver.resolve(0, "main.go", 4, 9).is_none());
    assert!(resolver.candidates().is_empty());
}

#[test]
fn test_closure_tolerance() {
    let source = "package main\n\nfunc main() {\n\tdo(g(x))\n}\n";
    let listing = |first: &str| {
        let mut listing = Listing::default();
        listing.push("main.go", 4, 0x10, "call", dest("main.g"));
        listing.push("main.go", 4, 0x20, "call", dest(first));
        listing
    };

    let (mut tolerant, _) = resolver(
        source,
        listing("main.main.func1"),
        names([]),
        names(["main.do", "main.g"]),
    );
    let candidate = tolerant.resolve(0, "main.go", 4, 2).unwrap();
    assert_eq!(candidate.name(), "main.do");
    assert_eq!(candidate.instruction().pc, 0x20);

    let (mut strict, _) = resolver(
        source,
        listing("main.other"),
        names([]),
        names(["main.do", "main.g"]),
    );
    assert!(strict.resolve(0, "main.go", 4, 2).is_none());
    assert!(strict.candidates().is_empty());
}

#[test]
fn test_deferred_and_async_calls_excluded() {
    let source = r#"package main

func main() {
	defer f(g(x), h(y))
	go f(g(x), h(y))
	z := f(g(x)); defer h(y)
}
"#;
    let mut listing = Listing::default();
    for line in [4, 5] {
        listing.push("main.go", line, 0x10, "call", dest("main.g"));
        listing.push("main.go", line, 0x20, "call", dest("main.h"));
        listing.push("main.go", line, 0x30, "call", dest("runtime.deferprocStack"));
    }
    listing.push("main.go", 6, 0x40, "call", dest("main.g"));
    listing.push("main.go", 6, 0x50, "call", dest("main.f"));
    listing.push("main.go", 6, 0x60, "call", dest("runtime.deferprocStack"));
    let (mut resolver, counter) = resolver(source, listing, names([]), names([]));

    assert!(resolver.resolve(0, "main.go", 4, 10).is_none());
    assert!(resolver.resolve(0, "main.go", 5, 7).is_none());
    assert_eq!(counter.disassemblies.get(), 0);

    resolver.resolve(0, "main.go", 6, 0);
    let names = resolver
        .candidates()
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["g", "f"]);
}

#[test]
fn test_type_conversions_and_builtins_excluded() {
    let source = "package main\n\nfunc main() {\n\ts := string(T(load(n))) + fmt(len(b))\n}\n";
    let mut listing = Listing::default();
    listing.push("main.go", 4, 0x10, "call", dest("main.load"));
    listing.push("main.go", 4, 0x20, "call", dest("runtime.slicebytetostring"));
    listing.push("main.go", 4, 0x30, "call", dest("main.fmt"));
    listing.push("main.go", 4, 0x40, "call", dest("runtime.concatstring2"));
    let (mut resolver, _) = resolver(source, listing, names(["main.T", "string"]), names([]));

    resolver.resolve(0, "main.go", 4, 0);
    let names = resolver
        .candidates()
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>();
    // sorted by callee width
    assert_eq!(names, vec!["fmt", "load"]);
}

#[test]
fn test_parse_failure() {
    let (mut resolver, counter) = resolver(
        "package main\nfunc main() {\n\tz := f(g(x)\n}\n",
        Listing::default(),
        names([]),
        names([]),
    );
    assert!(resolver.resolve(0, "main.go", 3, 7).is_none());
    assert!(resolver.candidates().is_empty());
    assert_eq!(counter.disassemblies.get(), 0);
}

#[test]
fn test_disassembly_failure() {
    let (mut resolver, counter) = resolver(
        E2E_SOURCE,
        Listing::default(),
        names([]),
        names(["f", "g", "h"]),
    );
    assert!(resolver.resolve(0x100, "main.go", 4, 9).is_none());
    assert!(resolver.candidates().is_empty());
    assert!(!resolver.is_valid());
    assert_eq!(counter.disassemblies.get(), 1);
}

#[test]
fn test_fatal_disassembly_failure() {
    struct Broken;
    impl LineDisassembler for Broken {
        fn disassemble_line(&self, _: &str, _: u64, _: u64) -> Result<Vec<CallInstruction>, Error> {
            Err(Error::DisAsmInit(capstone::Error::CustomError("mode")))
        }
    }

    let source = MemorySource::new(CallCounter::default()).with_file("main.go", E2E_SOURCE);
    let mut resolver = StepIntoResolver::new(source, Broken, names([]), names([]));
    assert!(resolver.resolve(0x100, "main.go", 4, 9).is_none());
    assert!(resolver.candidates().is_empty());
    assert!(!resolver.is_valid());
}
