//! Git repository fixtures for end-to-end runs
//!
//! A `TestRepo` is a committed git working tree in a temp dir holding a
//! small C++Builder-style layout:
//!
//! ```text
//! App.cbproj          -> src/main.cpp, src/shared.cpp
//! lib/Lib.cbproj      -> lib/util.cpp, src/shared.cpp
//! tools/Tool.cbproj   -> tools/tool.cpp
//! ```

use anyhow::{Context, Result};
use git2::{IndexAddOption, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const APP_PROJECT: &str = r#"<Project>
  <ItemGroup>
    <CppCompile Include="src\main.cpp"/>
    <CppCompile Include="src\shared.cpp"/>
  </ItemGroup>
</Project>
"#;

pub const LIB_PROJECT: &str = r#"<Project>
  <ItemGroup>
    <CppCompile Include="util.cpp"/>
    <CppCompile Include="..\src\shared.cpp"/>
  </ItemGroup>
</Project>
"#;

pub const TOOL_PROJECT: &str = r#"<Project>
  <ItemGroup>
    <CppCompile Include="tool.cpp"/>
  </ItemGroup>
</Project>
"#;

/// Committed git working tree in a temp dir
pub struct TestRepo {
    _temp_dir: TempDir,
    root: PathBuf,
    repo: Repository,
}

impl TestRepo {
    /// Empty repository with the cache file ignored
    pub fn empty() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temp dir")?;
        let root = temp_dir.path().canonicalize()?;
        let repo = Repository::init(&root).context("Failed to init repository")?;

        let fixture = Self {
            _temp_dir: temp_dir,
            root,
            repo,
        };
        fixture.write(".gitignore", ".intellibuild.json\n")?;
        Ok(fixture)
    }

    /// Repository with the standard three-project layout, all committed
    pub fn with_projects() -> Result<Self> {
        let fixture = Self::empty()?;
        fixture.write("App.cbproj", APP_PROJECT)?;
        fixture.write("src/main.cpp", "int main() { return 0; }\n")?;
        fixture.write("src/shared.cpp", "int shared() { return 1; }\n")?;
        fixture.write("lib/Lib.cbproj", LIB_PROJECT)?;
        fixture.write("lib/util.cpp", "int util() { return 2; }\n")?;
        fixture.write("tools/Tool.cbproj", TOOL_PROJECT)?;
        fixture.write("tools/tool.cpp", "int tool() { return 3; }\n")?;
        fixture.commit_all("initial")?;
        Ok(fixture)
    }

    /// Absolute, canonical working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a file in the tree
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", rel))
    }

    /// Append a line to an existing file so git reports it modified
    pub fn touch(&self, rel: &str) -> Result<()> {
        let path = self.path(rel);
        let mut content = fs::read_to_string(&path)?;
        content.push_str("// touched\n");
        fs::write(&path, content)?;
        Ok(())
    }

    /// Stage everything and commit
    pub fn commit_all(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now("Test", "test@example.com")?;
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(())
    }

    /// Parsed cache file, if one was written
    pub fn cache(&self) -> Option<serde_json::Value> {
        let content = fs::read_to_string(self.path(".intellibuild.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Cached references for a project, sorted
    pub fn cached_references(&self, rel_project: &str) -> Option<Vec<String>> {
        let cache = self.cache()?;
        let key = self.path(rel_project).display().to_string();
        let list = cache["project_file_map"][key.as_str()].as_array()?.clone();
        Some(
            list.into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Expected plan line for a project
    pub fn plan_line(&self, rel_project: &str, sources: &[&str]) -> String {
        format!(
            "Compiling {} for files: [{}]",
            self.path(rel_project).display(),
            sources.join(" ")
        )
    }

    /// Write an executable shell script
    #[cfg(unix)]
    pub fn write_script(&self, rel: &str, body: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;
        let path = self.path(rel);
        self.write(rel, &format!("#!/bin/sh\n{}\n", body))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }
}
