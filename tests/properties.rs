//! Whole-batch properties

mod common;

use common::{run, run_with_sourcepath};
use strata_core::driver::order_units;
use strata_workspace::{CompilerConfig, SourceUnit, TreeState};

fn mixed_units() -> Vec<SourceUnit> {
    [
        ("b/B.strata", "package b; class B {}"),
        ("a/module-info.strata", "module a { }"),
        ("a/A.strata", "package a; class A {}"),
        ("b/module-info.stratac", "module b { }"),
        ("c/C.strata", "package c; class C {}"),
    ]
    .into_iter()
    .map(|(name, text)| SourceUnit::new(name, text))
    .collect()
}

fn names(units: &[SourceUnit]) -> Vec<&str> {
    units.iter().map(SourceUnit::name).collect()
}

#[test]
fn test_ordering_keeps_units_and_puts_descriptors_first() {
    let original = mixed_units();
    let ordered = order_units(original.clone());

    let mut before = names(&original);
    let mut after = names(&ordered);
    before.sort_unstable();
    after.sort_unstable();
    assert_eq!(before, after);

    let first_ordinary = ordered.iter().position(|u| !u.is_module_descriptor()).unwrap();
    assert!(ordered[first_ordinary..].iter().all(|u| !u.is_module_descriptor()));
    assert_eq!(names(&order_units(ordered.clone())), names(&ordered));
}

#[test]
fn test_tolerant_keeps_exactly_the_well_formed_units() {
    let files = [
        ("src/Ok1.strata", "class Ok1 {}"),
        ("src/Bad1.strata", "class Bad1 { int x }"),
        ("src/Ok2.strata", "class Ok2 { void f() { } }"),
        ("src/Bad2.strata", "class Bad2 { void f() { if ( } }"),
    ];
    let outcome = run(CompilerConfig::tolerant(), &files);

    assert_eq!(outcome.names(), vec!["src/Ok1.strata", "src/Ok2.strata"]);
    assert_eq!(
        outcome.warnings(),
        vec![
            "Syntax error detected in: src/Bad1.strata".to_string(),
            "Syntax error detected in: src/Bad2.strata".to_string(),
        ]
    );
}

#[test]
fn test_every_completed_unit_emitted_once() {
    let outcome = run(
        CompilerConfig::strict(),
        &[
            ("src/A.strata", "class A { B b; }"),
            ("src/B.strata", "class B { int f() { return missing; } }"),
            ("src/C.strata", "class C { int x }"),
        ],
    );

    assert_eq!(outcome.emitted(), outcome.names());
    for tree in &outcome.output.trees {
        assert!(!tree.needs_investigation, "{}", tree.file_name());
        assert_eq!(tree.state(), TreeState::Analyzed);
    }
}

#[test]
fn test_units_discovered_mid_run_are_processed() {
    let outcome = run_with_sourcepath(
        CompilerConfig::strict(),
        &[("src/app/Main.strata", "package app; import lib.First; class Main { First f; }")],
        &[
            ("lib/lib/First.strata", "package lib; class First { Second next; }"),
            ("lib/lib/Second.strata", "package lib; class Second { int f() { return 2; } }"),
        ],
        &["lib"],
    );

    assert_eq!(
        outcome.names(),
        vec![
            "src/app/Main.strata",
            "lib/lib/First.strata",
            "lib/lib/Second.strata",
        ]
    );
    assert_eq!(outcome.emitted(), outcome.names());
    assert!(!outcome.output.has_errors());
}

#[test]
fn test_aggregation_matches_processing_list() {
    let outcome = run_with_sourcepath(
        CompilerConfig::strict(),
        &[
            ("src/a/module-info.strata", "module a { }"),
            ("src/a/A.strata", "package a; import b.B; class A { B b; }"),
        ],
        &[("lib/b/B.strata", "package b; class B {}")],
        &["lib"],
    );

    assert_eq!(outcome.output.units, 3);
    assert_eq!(outcome.output.trees.len(), outcome.output.results.len());
}
