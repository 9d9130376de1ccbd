//! Staging directories for building-block runs.
//!
//! Wrapped tools expect their files under fixed, convention-derived names.
//! A `Sandbox` is a uniquely named directory where inputs are copied in under
//! those names and outputs are copied back out to the caller's paths. When a
//! run is containerized the sandbox is mounted on a volume path, and command
//! lines must reference files through that path instead of the host one.

use crate::error::{BiobbError, Result};
use crate::file_utils;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub struct Sandbox {
    host_dir: PathBuf,
    volume_dir: Option<PathBuf>,
}

impl Sandbox {
    /// Create a uniquely named staging directory under `root`.
    pub async fn create(root: &Path) -> Result<Self> {
        let host_dir = root.join(Uuid::new_v4().simple().to_string());
        tokio::fs::create_dir_all(&host_dir).await?;
        debug!("Created sandbox {}", host_dir.display());
        Ok(Self {
            host_dir,
            volume_dir: None,
        })
    }

    /// Mount point of the sandbox inside a container; command paths returned
    /// by [`Sandbox::command_path`] will be rooted there.
    pub fn with_volume(mut self, volume: impl Into<PathBuf>) -> Self {
        self.volume_dir = Some(volume.into());
        self
    }

    pub fn host_dir(&self) -> &Path {
        &self.host_dir
    }

    /// Host-side path of a sandbox file.
    pub fn host_path(&self, name: &str) -> PathBuf {
        self.host_dir.join(name)
    }

    /// Path of a sandbox file as the tool must see it.
    pub fn command_path(&self, name: &str) -> PathBuf {
        match &self.volume_dir {
            Some(volume) => volume.join(name),
            None => self.host_dir.join(name),
        }
    }

    /// Same as [`Sandbox::command_path`], rendered as a command-line argument.
    pub fn command_arg(&self, name: &str) -> String {
        self.command_path(name).to_string_lossy().into_owned()
    }

    /// Copy an input file into the sandbox under the given internal name.
    /// Staged names are unique within one sandbox; reusing a name would
    /// silently replace a previously staged input.
    pub async fn stage(&self, external: &Path, internal_name: &str) -> Result<()> {
        if !file_utils::nonempty(external) {
            return Err(BiobbError::MissingInput(external.to_path_buf()));
        }
        let target = self.host_path(internal_name);
        if target.exists() {
            return Err(BiobbError::DuplicateStage(internal_name.to_string()));
        }
        tokio::fs::copy(external, target).await?;
        debug!("Staged {} as {}", external.display(), internal_name);
        Ok(())
    }

    /// Write generated content (control files) into the sandbox.
    pub async fn write(&self, internal_name: &str, contents: &str) -> Result<()> {
        tokio::fs::write(self.host_path(internal_name), contents).await?;
        debug!("Wrote {} into the sandbox", internal_name);
        Ok(())
    }

    /// Copy a produced file out of the sandbox to the caller's path, creating
    /// parent directories as needed.
    pub async fn collect(&self, internal_name: &str, external: &Path) -> Result<()> {
        let produced = self.host_path(internal_name);
        if !produced.exists() {
            return Err(BiobbError::MissingOutput(internal_name.to_string()));
        }
        file_utils::ensure_parent(external)?;
        tokio::fs::copy(&produced, external).await?;
        debug!("Collected {} into {}", internal_name, external.display());
        Ok(())
    }

    /// Copy a produced file out of the sandbox if the tool created it.
    pub async fn collect_optional(&self, internal_name: &str, external: &Path) -> Result<bool> {
        if !self.host_path(internal_name).exists() {
            return Ok(false);
        }
        self.collect(internal_name, external).await?;
        Ok(true)
    }

    /// Remove the staging directory. Failures are logged, not propagated.
    pub async fn cleanup(&self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.host_dir).await {
            warn!("Could not remove sandbox {}: {}", self.host_dir.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_stage_copies_under_internal_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("receptor.pdb");
        std::fs::write(&input, b"ATOM").unwrap();

        let sandbox = Sandbox::create(dir.path()).await.unwrap();
        sandbox.stage(&input, "1PPE_rec.pdb").await.unwrap();

        let staged = sandbox.host_path("1PPE_rec.pdb");
        assert_eq!(std::fs::read_to_string(staged).unwrap(), "ATOM");
    }

    #[tokio::test]
    async fn test_stage_rejects_missing_and_empty_inputs() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::create(dir.path()).await.unwrap();

        let missing = dir.path().join("missing.pdb");
        let err = sandbox.stage(&missing, "x.pdb").await.unwrap_err();
        assert!(matches!(err, BiobbError::MissingInput(_)));

        let empty = dir.path().join("empty.pdb");
        std::fs::write(&empty, b"").unwrap();
        let err = sandbox.stage(&empty, "x.pdb").await.unwrap_err();
        assert!(matches!(err, BiobbError::MissingInput(_)));
    }

    #[tokio::test]
    async fn test_stage_rejects_reused_internal_names() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("receptor/protein.pdb");
        let second = dir.path().join("ligand/protein.pdb");
        std::fs::create_dir_all(first.parent().unwrap()).unwrap();
        std::fs::create_dir_all(second.parent().unwrap()).unwrap();
        std::fs::write(&first, b"RECEPTOR").unwrap();
        std::fs::write(&second, b"LIGAND").unwrap();

        let sandbox = Sandbox::create(dir.path()).await.unwrap();
        sandbox.stage(&first, "protein.pdb").await.unwrap();
        let err = sandbox.stage(&second, "protein.pdb").await.unwrap_err();
        assert!(matches!(err, BiobbError::DuplicateStage(_)));

        // The first staged copy is left untouched.
        let staged = sandbox.host_path("protein.pdb");
        assert_eq!(std::fs::read_to_string(staged).unwrap(), "RECEPTOR");
    }

    #[tokio::test]
    async fn test_command_path_uses_volume_when_mounted() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::create(dir.path()).await.unwrap();
        assert!(sandbox.command_path("1PPE.rot").starts_with(sandbox.host_dir()));

        let mounted = Sandbox::create(dir.path()).await.unwrap().with_volume("/data");
        assert_eq!(mounted.command_arg("1PPE.rot"), "/data/1PPE.rot");
        assert!(mounted.host_path("1PPE.rot").starts_with(dir.path()));
    }

    #[tokio::test]
    async fn test_collect_creates_parents_and_flags_missing_outputs() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::create(dir.path()).await.unwrap();
        sandbox.write("1PPE.ene", "Conf RANK\n1 1\n").await.unwrap();

        let out = dir.path().join("results/energies.ene");
        sandbox.collect("1PPE.ene", &out).await.unwrap();
        assert!(out.is_file());

        let err = sandbox.collect("1PPE.rst", &out).await.unwrap_err();
        assert!(matches!(err, BiobbError::MissingOutput(_)));

        assert!(!sandbox.collect_optional("1PPE.rst", &out).await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup_removes_the_directory() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::create(dir.path()).await.unwrap();
        sandbox.write("scratch.txt", "tmp").await.unwrap();

        let host_dir = sandbox.host_dir().to_path_buf();
        sandbox.cleanup().await;
        assert!(!host_dir.exists());
    }
}
