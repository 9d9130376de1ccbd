//! Wrapper for the pyDock makePDB module, which materializes the docking
//! poses of a rank range as PDB structure files.
//!
//! pyDock names each pose `<docking_name>_<conformation>.pdb`, so the set of
//! files a run will produce is predicted up front by filtering the energy
//! ranking table. The produced poses are delivered as a single zip archive.

use crate::common::{
    default_binary_path, default_docking_name, pose_file_names, DockingNames, PreparedComplex,
};
use biobb_common::command::{ContainerOptions, ExecutionReport, ToolCommand};
use biobb_common::error::{BiobbError, Result};
use biobb_common::file_utils;
use biobb_common::props::CommonProperties;
use biobb_common::sandbox::Sandbox;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakePdbProperties {
    /// Name for the docking; must match the one used during setup.
    #[serde(default = "default_docking_name")]
    pub docking_name: String,
    /// First rank of the energy ranking to generate structures from.
    #[serde(default = "default_rank1")]
    pub rank1: u32,
    /// Last rank of the energy ranking to generate structures from; set equal
    /// to `rank1` to generate a single structure.
    #[serde(default = "default_rank2")]
    pub rank2: u32,
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    #[serde(flatten)]
    pub common: CommonProperties,
}

fn default_rank1() -> u32 {
    1
}

fn default_rank2() -> u32 {
    10
}

impl Default for MakePdbProperties {
    fn default() -> Self {
        Self {
            docking_name: default_docking_name(),
            rank1: default_rank1(),
            rank2: default_rank2(),
            binary_path: default_binary_path(),
            common: CommonProperties::default(),
        }
    }
}

/// Wrapper for pyDock makePDB execution.
pub struct MakePdb {
    inputs: PreparedComplex,
    input_rot_path: PathBuf,
    input_ene_path: PathBuf,
    output_zip_path: PathBuf,
    props: MakePdbProperties,
}

impl MakePdb {
    pub fn new(
        inputs: PreparedComplex,
        input_rot_path: impl Into<PathBuf>,
        input_ene_path: impl Into<PathBuf>,
        output_zip_path: impl Into<PathBuf>,
        props: MakePdbProperties,
    ) -> Self {
        Self {
            inputs,
            input_rot_path: input_rot_path.into(),
            input_ene_path: input_ene_path.into(),
            output_zip_path: output_zip_path.into(),
            props,
        }
    }

    /// Run pyDock makePDB, archiving the generated pose structures into the
    /// configured zip path.
    pub async fn launch(&self) -> Result<ExecutionReport> {
        if self.props.common.restart && file_utils::nonempty(&self.output_zip_path) {
            info!("Restart is enabled and all outputs exist, skipping makePDB");
            return Ok(ExecutionReport::skipped());
        }

        let names = DockingNames::new(&self.props.docking_name);
        let poses = pose_file_names(&names, &self.input_ene_path, self.props.rank1, self.props.rank2)?;
        if poses.is_empty() {
            return Err(BiobbError::Config(format!(
                "no conformations ranked between {} and {} in {}",
                self.props.rank1,
                self.props.rank2,
                self.input_ene_path.display()
            )));
        }

        // pyDock resolves pose outputs relative to the working directory, so
        // in container mode the volume and working dir are pinned.
        let container = ContainerOptions::from_properties(&self.props.common)?.map(|mut options| {
            options.volume_path = "/data".to_string();
            options.working_dir = Some("/".to_string());
            options
        });

        let mut sandbox = Sandbox::create(&self.props.common.sandbox_path).await?;
        if let Some(options) = &container {
            sandbox = sandbox.with_volume(options.volume_path.clone());
        }

        self.inputs.stage(&sandbox, &names).await?;
        sandbox.stage(&self.input_rot_path, &names.rot()).await?;
        sandbox.stage(&self.input_ene_path, &names.ene()).await?;

        let mut command = ToolCommand::new(&self.props.binary_path)
            .arg(sandbox.command_arg(names.stem()))
            .arg("makePDB")
            .arg(self.props.rank1.to_string())
            .arg(self.props.rank2.to_string())
            .logs(
                self.props.common.out_log_path.clone(),
                self.props.common.err_log_path.clone(),
            );
        if let Some(options) = container {
            command = command.container(options, sandbox.host_dir());
        }
        let report = command.execute().await?;

        let mut pose_paths = Vec::with_capacity(poses.len());
        for pose in &poses {
            let produced = sandbox.host_path(pose);
            if !produced.exists() {
                return Err(BiobbError::MissingOutput(pose.clone()));
            }
            pose_paths.push(produced);
        }
        file_utils::zip_files(&self.output_zip_path, &pose_paths)?;
        info!(
            "Archived {} pose structures into {}",
            pose_paths.len(),
            self.output_zip_path.display()
        );

        if self.props.common.remove_tmp {
            sandbox.cleanup().await;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn prepared_in(dir: &Path) -> PreparedComplex {
        let inputs = PreparedComplex {
            rec_pdb: dir.join("prepared_receptor.pdb"),
            rec_pdb_h: dir.join("prepared_receptor.pdb.H"),
            rec_amber: dir.join("prepared_receptor.pdb.amber"),
            lig_pdb: dir.join("prepared_ligand.pdb"),
            lig_pdb_h: dir.join("prepared_ligand.pdb.H"),
            lig_amber: dir.join("prepared_ligand.pdb.amber"),
        };
        for path in [
            &inputs.rec_pdb,
            &inputs.rec_pdb_h,
            &inputs.rec_amber,
            &inputs.lig_pdb,
            &inputs.lig_pdb_h,
            &inputs.lig_amber,
        ] {
            std::fs::write(path, b"ATOM").unwrap();
        }
        inputs
    }

    #[tokio::test]
    async fn test_restart_skips_when_the_archive_exists() {
        let dir = tempdir().unwrap();
        let zip_out = dir.path().join("poses.zip");
        std::fs::write(&zip_out, b"PK").unwrap();

        let mut props = MakePdbProperties::default();
        props.common.restart = true;

        let report = MakePdb::new(
            prepared_in(dir.path()),
            dir.path().join("poses.rot"),
            dir.path().join("energies.ene"),
            &zip_out,
            props,
        )
        .launch()
        .await
        .unwrap();
        assert!(report.skipped);
    }

    #[tokio::test]
    async fn test_empty_rank_selection_is_rejected_before_running() {
        let dir = tempdir().unwrap();
        let ene = dir.path().join("energies.ene");
        std::fs::write(&ene, "Conf RANK\n1 50\n").unwrap();
        let rot = dir.path().join("poses.rot");
        std::fs::write(&rot, b"rot").unwrap();

        let mut props = MakePdbProperties::default();
        props.common.sandbox_path = dir.path().join("sandbox");

        let err = MakePdb::new(
            prepared_in(dir.path()),
            &rot,
            &ene,
            dir.path().join("poses.zip"),
            props,
        )
        .launch()
        .await
        .unwrap_err();
        assert!(err.to_string().contains("no conformations"));
    }

    #[tokio::test]
    async fn test_inverted_rank_range_is_rejected() {
        let dir = tempdir().unwrap();
        let ene = dir.path().join("energies.ene");
        std::fs::write(&ene, "Conf RANK\n1 1\n").unwrap();

        let mut props = MakePdbProperties::default();
        props.rank1 = 9;
        props.rank2 = 3;

        let err = MakePdb::new(
            prepared_in(dir.path()),
            dir.path().join("poses.rot"),
            &ene,
            dir.path().join("poses.zip"),
            props,
        )
        .launch()
        .await
        .unwrap_err();
        assert!(err.to_string().contains("rank1"));
    }
}
