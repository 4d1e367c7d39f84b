//! `ib status` is read-only

use crate::common::TestRepo;
use crate::ib;
use anyhow::Result;

#[test]
fn test_status_reports_without_writing() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.touch("src/shared.cpp")?;

    let result = ib!(repo.root(), "status").assert_success()?;

    assert!(result.contains_stdout("Changed sources (1)"));
    assert!(result.contains_stdout("shared.cpp"));
    assert!(result.contains_stdout("rebuild (no usable cache)"));
    assert!(result.contains_stdout("Would build (2)"));
    assert!(result.contains_stdout("lib/Lib.cbproj"));
    assert!(repo.cache().is_none());

    Ok(())
}

#[test]
fn test_status_after_run_is_incremental() -> Result<()> {
    let repo = TestRepo::with_projects()?;
    repo.touch("lib/util.cpp")?;
    ib!(repo.root(), "run", "--yes").assert_success()?;
    let before = std::fs::read_to_string(repo.path(".intellibuild.json"))?;

    let result = ib!(repo.root(), "status").assert_success()?;

    assert!(result.contains_stdout("incremental (cached dependencies)"));
    assert!(result.contains_stdout("Would build (1)"));
    assert_eq!(std::fs::read_to_string(repo.path(".intellibuild.json"))?, before);

    Ok(())
}

#[test]
fn test_status_clean_tree() -> Result<()> {
    let repo = TestRepo::with_projects()?;

    let result = ib!(repo.root(), "status").assert_success()?;

    assert!(result.contains_stdout("Changed sources (0)"));
    assert!(result.contains_stdout("Nothing to build"));

    Ok(())
}

#[test]
fn test_status_outside_repository_fails() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;

    let result = ib!(temp_dir.path(), "status").assert_failure()?;
    assert!(result.contains_stderr("Failed to open repository"));

    Ok(())
}
