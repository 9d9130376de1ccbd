//! Wrapper for the pyDock oda module, which computes the optimal desolvation
//! patch on a protein surface to predict potential binding interface sites.

use crate::common::default_binary_path;
use biobb_common::command::{ContainerOptions, ExecutionReport, ToolCommand};
use biobb_common::error::Result;
use biobb_common::file_utils;
use biobb_common::props::CommonProperties;
use biobb_common::sandbox::Sandbox;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination paths for the surface analysis results.
#[derive(Debug, Clone)]
pub struct OdaOutputs {
    pub oda: PathBuf,
    pub oda_h: PathBuf,
    pub oda_amber: PathBuf,
    pub oda_tab: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OdaProperties {
    /// Name for the protein subunit; pyDock derives the output file names
    /// from it.
    #[serde(default = "default_subunit_name")]
    pub subunit_name: String,
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    #[serde(flatten)]
    pub common: CommonProperties,
}

fn default_subunit_name() -> String {
    "subunit_name".to_string()
}

impl Default for OdaProperties {
    fn default() -> Self {
        Self {
            subunit_name: default_subunit_name(),
            binary_path: default_binary_path(),
            common: CommonProperties::default(),
        }
    }
}

/// Wrapper for pyDock oda execution.
pub struct Oda {
    input_structure_path: PathBuf,
    outputs: OdaOutputs,
    props: OdaProperties,
}

impl Oda {
    pub fn new(
        input_structure_path: impl Into<PathBuf>,
        outputs: OdaOutputs,
        props: OdaProperties,
    ) -> Self {
        Self {
            input_structure_path: input_structure_path.into(),
            outputs,
            props,
        }
    }

    /// Run pyDock oda, writing the surface analysis files to the configured
    /// output paths.
    pub async fn launch(&self) -> Result<ExecutionReport> {
        if self.props.common.restart && file_utils::outputs_ready(self.output_paths()) {
            info!("Restart is enabled and all outputs exist, skipping oda");
            return Ok(ExecutionReport::skipped());
        }

        let subunit = &self.props.subunit_name;
        let staged = format!("{subunit}.pdb");
        let container = ContainerOptions::from_properties(&self.props.common)?;

        let mut sandbox = Sandbox::create(&self.props.common.sandbox_path).await?;
        if let Some(options) = &container {
            sandbox = sandbox.with_volume(options.volume_path.clone());
        }

        sandbox.stage(&self.input_structure_path, &staged).await?;

        // Unlike the docking modules, oda takes the staged structure file
        // itself as its argument, not the docking name.
        let mut command = ToolCommand::new(&self.props.binary_path)
            .arg(sandbox.command_arg(&staged))
            .arg("oda")
            .logs(
                self.props.common.out_log_path.clone(),
                self.props.common.err_log_path.clone(),
            );
        if let Some(options) = container {
            command = command.container(options, sandbox.host_dir());
        }
        let report = command.execute().await?;

        sandbox
            .collect(&format!("{subunit}.pdb.oda"), &self.outputs.oda)
            .await?;
        sandbox
            .collect(&format!("{subunit}.pdb.oda.H"), &self.outputs.oda_h)
            .await?;
        sandbox
            .collect(&format!("{subunit}.oda.amber"), &self.outputs.oda_amber)
            .await?;
        sandbox
            .collect(&format!("{subunit}.pdb.oda.ODAtab"), &self.outputs.oda_tab)
            .await?;

        if self.props.common.remove_tmp {
            sandbox.cleanup().await;
        }
        Ok(report)
    }

    fn output_paths(&self) -> [&Path; 4] {
        [
            self.outputs.oda.as_path(),
            self.outputs.oda_h.as_path(),
            self.outputs.oda_amber.as_path(),
            self.outputs.oda_tab.as_path(),
        ]
    }
}
