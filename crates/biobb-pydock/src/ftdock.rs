//! Wrapper for the pyDock ftdock module, which samples rigid-body docking
//! poses with FTDock and converts them into pyDock rotations.

use crate::common::{default_binary_path, default_docking_name, DockingNames};
use biobb_common::command::{ContainerOptions, ExecutionReport, ToolCommand};
use biobb_common::error::Result;
use biobb_common::file_utils;
use biobb_common::props::CommonProperties;
use biobb_common::sandbox::Sandbox;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtdockProperties {
    /// Name for the docking; must match the one used during setup.
    #[serde(default = "default_docking_name")]
    pub docking_name: String,
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    #[serde(flatten)]
    pub common: CommonProperties,
}

impl Default for FtdockProperties {
    fn default() -> Self {
        Self {
            docking_name: default_docking_name(),
            binary_path: default_binary_path(),
            common: CommonProperties::default(),
        }
    }
}

/// Wrapper for pyDock ftdock execution.
pub struct Ftdock {
    input_rec_path: PathBuf,
    input_lig_path: PathBuf,
    output_ftdock_path: PathBuf,
    output_rot_path: PathBuf,
    props: FtdockProperties,
}

impl Ftdock {
    pub fn new(
        input_rec_path: impl Into<PathBuf>,
        input_lig_path: impl Into<PathBuf>,
        output_ftdock_path: impl Into<PathBuf>,
        output_rot_path: impl Into<PathBuf>,
        props: FtdockProperties,
    ) -> Self {
        Self {
            input_rec_path: input_rec_path.into(),
            input_lig_path: input_lig_path.into(),
            output_ftdock_path: output_ftdock_path.into(),
            output_rot_path: output_rot_path.into(),
            props,
        }
    }

    /// Run pyDock ftdock, writing the sampling table and the rotation file to
    /// the configured output paths.
    pub async fn launch(&self) -> Result<ExecutionReport> {
        let outputs = [self.output_ftdock_path.as_path(), self.output_rot_path.as_path()];
        if self.props.common.restart && file_utils::outputs_ready(outputs) {
            info!("Restart is enabled and all outputs exist, skipping ftdock");
            return Ok(ExecutionReport::skipped());
        }

        let names = DockingNames::new(&self.props.docking_name);
        let container = ContainerOptions::from_properties(&self.props.common)?;

        let mut sandbox = Sandbox::create(&self.props.common.sandbox_path).await?;
        if let Some(options) = &container {
            sandbox = sandbox.with_volume(options.volume_path.clone());
        }

        sandbox.stage(&self.input_rec_path, &names.rec_pdb()).await?;
        sandbox.stage(&self.input_lig_path, &names.lig_pdb()).await?;

        let mut command = ToolCommand::new(&self.props.binary_path)
            .arg(sandbox.command_arg(names.stem()))
            .arg("ftdock")
            .logs(
                self.props.common.out_log_path.clone(),
                self.props.common.err_log_path.clone(),
            );
        if let Some(options) = container {
            command = command.container(options, sandbox.host_dir());
        }
        let report = command.execute().await?;

        sandbox.collect(&names.ftdock(), &self.output_ftdock_path).await?;
        sandbox.collect(&names.rot(), &self.output_rot_path).await?;

        if self.props.common.remove_tmp {
            sandbox.cleanup().await;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_restart_skips_when_outputs_exist() {
        let dir = tempdir().unwrap();
        let ftdock_out = dir.path().join("docking.ftdock");
        let rot_out = dir.path().join("docking.rot");
        std::fs::write(&ftdock_out, b"ftdock").unwrap();
        std::fs::write(&rot_out, b"rot").unwrap();

        let mut props = FtdockProperties::default();
        props.common.restart = true;

        let report = Ftdock::new(
            dir.path().join("receptor.pdb"),
            dir.path().join("ligand.pdb"),
            &ftdock_out,
            &rot_out,
            props,
        )
        .launch()
        .await
        .unwrap();
        assert!(report.skipped);
    }

    #[tokio::test]
    async fn test_missing_input_is_reported() {
        let dir = tempdir().unwrap();
        let mut props = FtdockProperties::default();
        props.common.sandbox_path = dir.path().join("sandbox");

        let err = Ftdock::new(
            dir.path().join("receptor.pdb"),
            dir.path().join("ligand.pdb"),
            dir.path().join("docking.ftdock"),
            dir.path().join("docking.rot"),
            props,
        )
        .launch()
        .await
        .unwrap_err();
        assert!(err.to_string().contains("receptor.pdb"));
    }
}
