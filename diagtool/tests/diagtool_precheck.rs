use predicates::prelude::predicate;

#[allow(dead_code)]
mod common;
use common::*;

#[test]
fn test_precheck_always_fails() {
    let helper = DiagtoolTestHelper::new();

    let results = helper.run_command(&["precheck", "-o", &helper.output_path()]);
    results.failure().code(1).stdout(predicate::str::contains(
        "Precheck feature is not supported on Windows.",
    ));

    // no workspace is staged either
    assert!(helper.run_workdirs().is_empty());
}

#[test]
fn test_precheck_fails_without_any_options_too() {
    let helper = DiagtoolTestHelper::new();

    let results = helper.run_command(&["precheck"]);
    results.failure().code(1).stdout(predicate::str::contains(
        "Precheck feature is not supported on Windows.",
    ));
}
