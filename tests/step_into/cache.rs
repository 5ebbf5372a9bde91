use crate::common::{names, resolver};
use crate::{e2e_listing, E2E_SOURCE};

#[test]
fn test_cache_idempotence() {
    let (mut resolver, counter) = resolver(
        E2E_SOURCE,
        e2e_listing(),
        names([]),
        names(["f", "g", "h"]),
    );

    let first = resolver.resolve(0x100, "main.go", 4, 9).cloned().unwrap();
    let first_list = resolver.candidates().to_vec();
    assert_eq!(counter.parses.get(), 1);
    assert_eq!(counter.disassemblies.get(), 1);

    let second = resolver.resolve(0x100, "main.go", 4, 9).cloned().unwrap();
    assert_eq!(counter.parses.get(), 1);
    assert_eq!(counter.disassemblies.get(), 1);
    assert_eq!(first.name(), second.name());
    assert_eq!(first.column_interval(), second.column_interval());
    assert_eq!(
        first_list.iter().map(|c| c.name()).collect::<Vec<_>>(),
        resolver
            .candidates()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
    );

    // cached selection does not depend on the program counter
    let cached = resolver.resolve(0x10c, "main.go", 4, 9).unwrap();
    assert_eq!(cached.name(), "g");
    assert_eq!(counter.parses.get(), 1);

    resolver.resolve(0x100, "main.go", 4, 15);
    assert_eq!(counter.parses.get(), 2);
    assert_eq!(counter.disassemblies.get(), 2);
}

#[test]
fn test_invalidate() {
    let (mut resolver, counter) = resolver(
        E2E_SOURCE,
        e2e_listing(),
        names([]),
        names(["f", "g", "h"]),
    );

    assert_eq!(resolver.resolve(0x100, "main.go", 4, 9).unwrap().name(), "g");
    resolver.invalidate();
    assert!(resolver.candidates().is_empty());
    assert!(!resolver.is_valid());

    // g is already executed, nothing under the column anymore
    assert!(resolver.resolve(0x108, "main.go", 4, 9).is_none());
    assert_eq!(counter.parses.get(), 2);
    assert_eq!(resolver.candidates().len(), 3);
}

#[test]
fn test_failed_query_is_cached() {
    let (mut resolver, counter) = resolver(
        E2E_SOURCE,
        e2e_listing(),
        names([]),
        names([]),
    );

    assert!(resolver.resolve(0, "other.go", 4, 9).is_none());
    assert!(resolver.resolve(0, "other.go", 4, 9).is_none());
    assert_eq!(counter.parses.get(), 1);
    assert_eq!(counter.disassemblies.get(), 0);
    assert!(!resolver.is_valid());
}
