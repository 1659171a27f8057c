//! End-to-end batch scenarios

mod common;

use common::run;
use strata_workspace::{Category, CompilerConfig, TreeState};

const GOOD: (&str, &str) = ("src/Counter.strata", "class Counter { int n; void inc() { n = n + 1; } }");
const BROKEN: (&str, &str) = ("src/Broken.strata", "class Broken { int f() { return 1 } }");

#[test]
fn test_clean_batch() {
    let outcome = run(
        CompilerConfig::strict(),
        &[
            ("src/shapes/Shape.strata", "package shapes; abstract class Shape { abstract int area(); }"),
            (
                "src/shapes/Square.strata",
                "package shapes; class Square extends Shape { int side; int area() { return side * side; } }",
            ),
            (
                "src/shapes/Report.strata",
                "package shapes; class Report { int total(Shape a, Shape b) { return a.area() + b.area(); } }",
            ),
        ],
    );

    assert_eq!(outcome.output.trees.len(), 3);
    assert!(outcome.output.trees.iter().all(|t| t.state() == TreeState::Analyzed));
    assert_eq!(outcome.output.diagnostics().count(), 0);
}

#[test]
fn test_descriptor_submitted_last_is_processed_first() {
    let outcome = run(
        CompilerConfig::strict(),
        &[
            ("app/Main.strata", "package app; class Main {}"),
            ("app/module-info.strata", "module app { exports app; }"),
        ],
    );

    assert_eq!(outcome.names(), vec!["app/module-info.strata", "app/Main.strata"]);
    assert_eq!(outcome.emitted(), vec!["app/module-info.strata", "app/Main.strata"]);
    assert!(!outcome.output.has_errors());
}

#[test]
fn test_tolerant_drops_unit_with_syntax_error() {
    let outcome = run(CompilerConfig::tolerant(), &[GOOD, BROKEN]);

    assert_eq!(outcome.names(), vec!["src/Counter.strata"]);
    assert!(outcome.output.tree("src/Broken.strata").is_none());
    assert_eq!(
        outcome.warnings(),
        vec!["Syntax error detected in: src/Broken.strata".to_string()]
    );
}

#[test]
fn test_strict_keeps_unit_with_syntax_error() {
    let outcome = run(CompilerConfig::strict(), &[GOOD, BROKEN]);

    assert_eq!(outcome.names(), vec!["src/Counter.strata", "src/Broken.strata"]);
    let broken = outcome.output.tree("src/Broken.strata").unwrap();
    assert!(broken.result.has_errors_in(Category::Syntax));
    assert_eq!(broken.state(), TreeState::Analyzed);
    assert!(outcome.warnings().is_empty());
}
