use std::path::{Path, PathBuf};
use crate::errors::ProveError;
use tracing::debug;

pub const SOURCE_FILE_NAME: &str = "Target.sol";
pub const TEST_FILE_NAME: &str = "Exploit.t.sol";

const FOUNDRY_TOML: &str = r#"[profile.default]
src = "src"
test = "test"
out = "out"
libs = []
"#;

/// The shared staging directory. One audit at a time writes to it.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
    mocks_source: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>, mocks_source: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), mocks_source: mocks_source.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn test_dir(&self) -> PathBuf {
        self.root.join("test")
    }

    pub fn source_path(&self) -> PathBuf {
        self.src_dir().join(SOURCE_FILE_NAME)
    }

    pub fn test_path(&self) -> PathBuf {
        self.test_dir().join(TEST_FILE_NAME)
    }

    /// Test file path relative to the sandbox root, as the toolchain expects.
    pub fn relative_test_path(&self) -> String {
        format!("test/{}", TEST_FILE_NAME)
    }

    pub async fn ensure_layout(&self) -> Result<(), ProveError> {
        tokio::fs::create_dir_all(self.src_dir().join("mocks")).await?;
        tokio::fs::create_dir_all(self.test_dir()).await?;
        let manifest = self.root.join("foundry.toml");
        if !manifest.exists() {
            tokio::fs::write(&manifest, FOUNDRY_TOML).await?;
        }
        Ok(())
    }

    /// Remove build artifacts and a harness left over from a previous audit,
    /// which would otherwise be compiled against the new source.
    pub async fn clean(&self, artifacts: bool) -> Result<(), ProveError> {
        if artifacts {
            for dir in ["out", "cache"] {
                let path = self.root.join(dir);
                if path.exists() {
                    debug!(path = %path.display(), "Removing build artifacts");
                    tokio::fs::remove_dir_all(&path).await?;
                }
            }
        }
        let stale = self.test_path();
        if stale.exists() {
            tokio::fs::remove_file(&stale).await?;
        }
        Ok(())
    }

    /// Copy every `.sol` fixture into `src/mocks`. Returns the number copied.
    pub async fn install_mocks(&self) -> Result<usize, ProveError> {
        if !self.mocks_source.is_dir() {
            return Err(ProveError::Config(format!(
                "Mock library not found at {}",
                self.mocks_source.display()
            )));
        }
        let target = self.src_dir().join("mocks");
        let mut entries = tokio::fs::read_dir(&self.mocks_source).await?;
        let mut copied = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("sol") {
                continue;
            }
            if let Some(name) = path.file_name() {
                tokio::fs::copy(&path, target.join(name)).await?;
                copied += 1;
            }
        }
        debug!(count = copied, "Installed mock fixtures");
        Ok(copied)
    }

    pub async fn write_source(&self, code: &str) -> Result<PathBuf, ProveError> {
        let path = self.source_path();
        tokio::fs::write(&path, code).await?;
        Ok(path)
    }

    pub async fn write_test(&self, code: &str) -> Result<PathBuf, ProveError> {
        tokio::fs::create_dir_all(self.test_dir()).await?;
        let path = self.test_path();
        tokio::fs::write(&path, code).await?;
        Ok(path)
    }
}
