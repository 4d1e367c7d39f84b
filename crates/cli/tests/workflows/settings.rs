//! `ib config` against the repository cache

use crate::common::TestRepo;
use crate::ib;
use anyhow::Result;

#[test]
fn test_list_shows_defaults() -> Result<()> {
    let repo = TestRepo::with_projects()?;

    let result = ib!(repo.root(), "config", "list").assert_success()?;

    assert!(result.contains_stdout("source_extension"));
    assert!(result.contains_stdout("cbproj"));
    assert!(result.contains_stdout("compiler.args_after"));
    // Listing never creates the cache
    assert!(repo.cache().is_none());

    Ok(())
}

#[test]
fn test_get_default_value() -> Result<()> {
    let repo = TestRepo::with_projects()?;

    let result = ib!(repo.root(), "config", "get", "source_extension").assert_success()?;
    assert_eq!(result.stdout, "cpp\n");

    let result = ib!(repo.root(), "config", "get", "bootstrap_interval_hours").assert_success()?;
    assert_eq!(result.stdout, "4\n");

    Ok(())
}

#[test]
fn test_set_then_get() -> Result<()> {
    let repo = TestRepo::with_projects()?;

    ib!(repo.root(), "config", "set", "scan_concurrency", "8").assert_success()?;
    let result = ib!(repo.root(), "config", "get", "scan_concurrency").assert_success()?;

    assert_eq!(result.stdout, "8\n");
    assert_eq!(repo.cache().unwrap()["settings"]["scan_concurrency"], 8);

    Ok(())
}

#[test]
fn test_set_with_explicit_path() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    let elsewhere = tempfile::TempDir::new()?;
    let root = repo.root().display().to_string();

    ib!(elsewhere.path(), "config", root.as_str(), "set", "project_extension", ".bpr")
        .assert_success()?;

    assert_eq!(repo.cache().unwrap()["settings"]["project_extension"], "bpr");
    assert!(!elsewhere.path().join(".intellibuild.json").exists());

    Ok(())
}

#[test]
fn test_invalid_value_is_rejected() -> Result<()> {
    let repo = TestRepo::with_projects()?;

    let result = ib!(repo.root(), "config", "set", "bootstrap_interval_hours", "0").assert_failure()?;
    assert!(result.contains_stderr("Invalid configuration value"));

    let result = ib!(repo.root(), "config", "set", "candidate_scope", "everything").assert_failure()?;
    assert!(result.contains_stderr("Invalid configuration value"));

    assert!(repo.cache().is_none());

    Ok(())
}

#[test]
fn test_unknown_key_is_rejected() -> Result<()> {
    let repo = TestRepo::with_projects()?;

    let result = ib!(repo.root(), "config", "get", "no_such_key").assert_failure()?;
    assert!(result.contains_stderr("Unknown setting"));

    ib!(repo.root(), "config", "set", "no_such_key", "1").assert_failure()?;

    Ok(())
}

#[test]
fn test_changing_scope_clears_cached_map() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.touch("src/shared.cpp")?;
    ib!(repo.root(), "run", "--yes").assert_success()?;
    assert!(repo.cached_references("App.cbproj").is_some());

    let result = ib!(repo.root(), "config", "set", "candidate_scope", "all_sources").assert_success()?;
    assert!(result.contains_stdout("Cached dependencies cleared"));
    assert!(repo.cache().unwrap().get("project_file_map").is_none());

    let result = ib!(repo.root(), "run", "--yes").assert_success()?;
    assert!(result.contains_stdout("rebuild (no usable cache)"));

    Ok(())
}

#[test]
fn test_unrelated_setting_keeps_cached_map() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.touch("src/shared.cpp")?;
    ib!(repo.root(), "run", "--yes").assert_success()?;

    ib!(repo.root(), "config", "set", "scan_concurrency", "2").assert_success()?;

    assert!(repo.cached_references("App.cbproj").is_some());
    let result = ib!(repo.root(), "run", "--yes").assert_success()?;
    assert!(result.contains_stdout("incremental"));

    Ok(())
}

#[test]
fn test_corrupt_cache_is_not_overwritten() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.write(".intellibuild.json", "{ broken")?;

    ib!(repo.root(), "config", "set", "scan_concurrency", "2").assert_failure()?;

    assert_eq!(
        std::fs::read_to_string(repo.path(".intellibuild.json"))?,
        "{ broken"
    );

    Ok(())
}

#[test]
fn test_unknown_fields_survive_runs() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.write(
        ".intellibuild.json",
        r#"{"team_notes": {"owner": "build"}, "settings": {"future_knob": 3}}"#,
    )?;
    repo.touch("lib/util.cpp")?;

    ib!(repo.root(), "run", "--yes").assert_success()?;
    ib!(repo.root(), "config", "set", "scan_concurrency", "4").assert_success()?;

    let cache = repo.cache().unwrap();
    assert_eq!(cache["team_notes"]["owner"], "build");
    assert_eq!(cache["settings"]["future_knob"], 3);
    assert_eq!(cache["settings"]["scan_concurrency"], 4);

    Ok(())
}

#[test]
fn test_unrecognized_option_survives_run() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.write(
        ".intellibuild.json",
        r#"{
            "settings": {"candidate_scope": "future_scope", "compiler": {"program": "msbuild"}},
            "added_later": 1
        }"#,
    )?;

    ib!(repo.root(), "run", "--dry-run").assert_success()?;

    let cache = repo.cache().unwrap();
    assert_eq!(cache["settings"]["candidate_scope"], "future_scope");
    assert_eq!(cache["settings"]["compiler"]["program"], "msbuild");
    assert_eq!(cache["added_later"], 1);

    let result = ib!(repo.root(), "config", "get", "candidate_scope").assert_success()?;
    assert_eq!(result.stdout, "future_scope\n");

    Ok(())
}

#[test]
fn test_undecodable_settings_survive_run() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.write(
        ".intellibuild.json",
        r#"{"settings": {"scan_concurrency": "eight", "bootstrap_script": "setup.sh"}}"#,
    )?;
    repo.touch("lib/util.cpp")?;

    let result = ib!(repo.root(), "run", "--yes").assert_success()?;
    assert_eq!(result.planned_lines().len(), 1);

    let cache = repo.cache().unwrap();
    assert_eq!(cache["settings"]["scan_concurrency"], "eight");
    assert_eq!(cache["settings"]["bootstrap_script"], "setup.sh");
    assert!(repo.cached_references("lib/Lib.cbproj").is_some());

    // Editing would overwrite what could not be read
    let result = ib!(repo.root(), "config", "set", "scan_concurrency", "2").assert_failure()?;
    assert!(result.contains_stderr("could not be decoded"));

    Ok(())
}
