//! Wrapper for the pyDock dockser module, which scores every docking pose in
//! a rotation file with the pyDock energy function.

use crate::common::{default_binary_path, default_docking_name, DockingNames, PreparedComplex};
use biobb_common::command::{ContainerOptions, ExecutionReport, ToolCommand};
use biobb_common::error::Result;
use biobb_common::file_utils;
use biobb_common::props::CommonProperties;
use biobb_common::sandbox::Sandbox;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockserProperties {
    /// Name for the docking; must match the one used during setup.
    #[serde(default = "default_docking_name")]
    pub docking_name: String,
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    #[serde(flatten)]
    pub common: CommonProperties,
}

impl Default for DockserProperties {
    fn default() -> Self {
        Self {
            docking_name: default_docking_name(),
            binary_path: default_binary_path(),
            common: CommonProperties::default(),
        }
    }
}

/// Wrapper for pyDock dockser execution.
pub struct Dockser {
    inputs: PreparedComplex,
    input_rot_path: PathBuf,
    output_ene_path: PathBuf,
    props: DockserProperties,
}

impl Dockser {
    pub fn new(
        inputs: PreparedComplex,
        input_rot_path: impl Into<PathBuf>,
        output_ene_path: impl Into<PathBuf>,
        props: DockserProperties,
    ) -> Self {
        Self {
            inputs,
            input_rot_path: input_rot_path.into(),
            output_ene_path: output_ene_path.into(),
            props,
        }
    }

    /// Run pyDock dockser, writing the energy ranking table to the configured
    /// output path.
    pub async fn launch(&self) -> Result<ExecutionReport> {
        if self.props.common.restart && file_utils::nonempty(&self.output_ene_path) {
            info!("Restart is enabled and all outputs exist, skipping dockser");
            return Ok(ExecutionReport::skipped());
        }

        let names = DockingNames::new(&self.props.docking_name);
        let container = ContainerOptions::from_properties(&self.props.common)?;

        let mut sandbox = Sandbox::create(&self.props.common.sandbox_path).await?;
        if let Some(options) = &container {
            sandbox = sandbox.with_volume(options.volume_path.clone());
        }

        self.inputs.stage(&sandbox, &names).await?;
        sandbox.stage(&self.input_rot_path, &names.rot()).await?;

        let mut command = ToolCommand::new(&self.props.binary_path)
            .arg(sandbox.command_arg(names.stem()))
            .arg("dockser")
            .logs(
                self.props.common.out_log_path.clone(),
                self.props.common.err_log_path.clone(),
            );
        if let Some(options) = container {
            command = command.container(options, sandbox.host_dir());
        }
        let report = command.execute().await?;

        sandbox.collect(&names.ene(), &self.output_ene_path).await?;

        if self.props.common.remove_tmp {
            sandbox.cleanup().await;
        }
        Ok(report)
    }
}
