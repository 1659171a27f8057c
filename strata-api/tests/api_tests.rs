//! Batch compilation through the public API

mod common;

use common::{capturing, project};
use std::sync::Arc;
use strata_api::{
    compile_batch, expand_sources, CompilerConfig, MemoryFileSystem, RunConfig, StrataError, TreeState,
};
use strata_log::Level;
use strata_vfs::VirtualFileSystem;

#[test]
fn test_compile_clean_project() {
    let vfs = project(&[
        ("/src/geo/Point.strata", "package geo; class Point { int x; int y; }"),
        (
            "/src/geo/Shapes.strata",
            "package geo; class Shapes { int sum(Point p) { return p.x + p.y; } }",
        ),
    ]);

    let output = compile_batch(
        vfs,
        &["/src/geo/Point.strata", "/src/geo/Shapes.strata"],
        &RunConfig::default(),
    )
    .unwrap();

    assert_eq!(output.units, 2);
    assert!(!output.has_errors());
    assert_eq!(output.results.len(), 2);
    assert!(output.trees.iter().all(|t| t.state() == TreeState::Analyzed));
}

#[test]
fn test_unit_problems_do_not_fail_the_call() {
    let vfs = project(&[("/src/A.strata", "class A { int f() { return missing; } }")]);

    let output = compile_batch(vfs, &["/src/A.strata"], &RunConfig::default()).unwrap();

    assert!(output.has_errors());
    assert_eq!(output.errors, 1);
    let (file, diagnostic) = output.diagnostics().next().unwrap();
    assert_eq!(file, "/src/A.strata");
    assert_eq!(diagnostic.message, "missing cannot be resolved to a variable");
}

#[test]
fn test_missing_source_fails_before_compiling() {
    let vfs = project(&[("/src/A.strata", "class A {}")]);

    let err = compile_batch(vfs, &["/src/A.strata", "/src/B.strata"], &RunConfig::default()).unwrap_err();

    assert!(matches!(err, StrataError::Vfs(_)));
    assert_eq!(err.stage(), "loading");
}

#[test]
fn test_sourcepath_supplies_referenced_types() {
    let vfs = project(&[
        ("/src/app/Main.strata", "package app; import lib.Util; class Main { Util u; }"),
        ("/lib/lib/Util.strata", "package lib; class Util {}"),
    ]);
    let config = RunConfig::default().with_sourcepath(["/lib"]);

    let output = compile_batch(vfs, &["/src/app/Main.strata"], &config).unwrap();

    assert!(!output.has_errors(), "{:?}", output.diagnostics().collect::<Vec<_>>());
    assert_eq!(output.units, 2);
    assert!(output.tree("/lib/lib/Util.strata").is_some());
    assert_eq!(output.results.len(), 2);
}

#[test]
fn test_without_sourcepath_reference_stays_unresolved() {
    let vfs = project(&[
        ("/src/app/Main.strata", "package app; import lib.Util; class Main { Util u; }"),
        ("/lib/lib/Util.strata", "package lib; class Util {}"),
    ]);

    let output = compile_batch(vfs, &["/src/app/Main.strata"], &RunConfig::default()).unwrap();

    assert_eq!(output.units, 1);
    assert!(output.has_errors());
}

#[test]
fn test_unreadable_sourcepath_unit_aborts() {
    let fs = MemoryFileSystem::new();
    fs.insert("/src/Main.strata", b"import Util; class Main { Util u; }".to_vec());
    fs.insert("/lib/Util.strata", vec![0xff, 0xfe, 0xfd]);
    let vfs: Arc<dyn VirtualFileSystem> = Arc::new(fs);

    let err = compile_batch(vfs, &["/src/Main.strata"], &RunConfig::default().with_sourcepath(["/lib"]))
        .unwrap_err();

    assert!(matches!(err, StrataError::Environment(_)));
    assert!(err.to_string().starts_with("Compilation aborted:"));
}

#[test]
fn test_tolerant_run_drops_broken_units() {
    let vfs = project(&[
        ("/src/Good.strata", "class Good {}"),
        ("/src/Bad.strata", "class Bad { int f( { }"),
    ]);
    let (config, ring) = capturing(RunConfig::new(CompilerConfig::tolerant()));

    let output = compile_batch(vfs, &["/src/Good.strata", "/src/Bad.strata"], &config).unwrap();

    assert_eq!(output.units, 1);
    assert!(!output.has_errors());
    assert_eq!(
        ring.messages_at(Level::Warn),
        vec!["Syntax error detected in: /src/Bad.strata".to_string()]
    );
}

#[test]
fn test_expand_directories() {
    let vfs = project(&[
        ("/src/b/B.strata", "class B {}"),
        ("/src/a/A.strata", "class A {}"),
        ("/src/notes.txt", "not a source"),
        ("/other/C.strata", "class C {}"),
    ]);

    let files = expand_sources(vfs.as_ref(), &["/src", "/other/C.strata"]).unwrap();

    let files: Vec<_> = files.iter().map(|p| p.to_string_lossy().into_owned()).collect();
    assert_eq!(files, vec!["/src/a/A.strata", "/src/b/B.strata", "/other/C.strata"]);
}
