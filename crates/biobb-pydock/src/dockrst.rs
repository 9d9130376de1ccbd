//! Wrapper for the pyDock dockrst module, which rescores docking poses with
//! experimental distance restraints and combines the result with the energy
//! ranking.

use crate::common::{
    build_ini, default_binary_path, default_docking_name, default_ligand_map, default_receptor_map,
    ChainMap, DockingNames, IniSection, PreparedComplex,
};
use biobb_common::command::{ContainerOptions, ExecutionReport, ToolCommand};
use biobb_common::error::Result;
use biobb_common::file_utils;
use biobb_common::props::CommonProperties;
use biobb_common::sandbox::Sandbox;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockrstProperties {
    /// Name for the docking; must match the one used during setup.
    #[serde(default = "default_docking_name")]
    pub docking_name: String,
    /// Receptor chain entries (`mol`, `newmol`) plus the `restr` restraint,
    /// written as `<newmol>.<AminoAcid>.<number>` (for example `A.Arg.45`).
    #[serde(default = "default_receptor_map")]
    pub receptor: ChainMap,
    /// Ligand chain entries (`mol`, `newmol`, `restr`).
    #[serde(default = "default_ligand_map")]
    pub ligand: ChainMap,
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    #[serde(flatten)]
    pub common: CommonProperties,
}

impl Default for DockrstProperties {
    fn default() -> Self {
        Self {
            docking_name: default_docking_name(),
            receptor: default_receptor_map(),
            ligand: default_ligand_map(),
            binary_path: default_binary_path(),
            common: CommonProperties::default(),
        }
    }
}

/// Wrapper for pyDock dockrst execution.
pub struct Dockrst {
    inputs: PreparedComplex,
    input_rot_path: PathBuf,
    input_ene_path: PathBuf,
    output_rst_path: PathBuf,
    output_ene_rst_path: PathBuf,
    props: DockrstProperties,
}

impl Dockrst {
    pub fn new(
        inputs: PreparedComplex,
        input_rot_path: impl Into<PathBuf>,
        input_ene_path: impl Into<PathBuf>,
        output_rst_path: impl Into<PathBuf>,
        output_ene_rst_path: impl Into<PathBuf>,
        props: DockrstProperties,
    ) -> Self {
        Self {
            inputs,
            input_rot_path: input_rot_path.into(),
            input_ene_path: input_ene_path.into(),
            output_rst_path: output_rst_path.into(),
            output_ene_rst_path: output_ene_rst_path.into(),
            props,
        }
    }

    /// Run pyDock dockrst, writing the restraint scoring and the combined
    /// ranking to the configured output paths.
    pub async fn launch(&self) -> Result<ExecutionReport> {
        let outputs = [self.output_rst_path.as_path(), self.output_ene_rst_path.as_path()];
        if self.props.common.restart && file_utils::outputs_ready(outputs) {
            info!("Restart is enabled and all outputs exist, skipping dockrst");
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
        sandbox.stage(&self.input_ene_path, &names.ene()).await?;

        let receptor = IniSection::new(&self.props.receptor).file("pdb", &names.rec_pdb());
        let ligand = IniSection::new(&self.props.ligand).file("pdb", &names.lig_pdb());
        sandbox
            .write(&names.ini(), &build_ini(&receptor, &ligand, None))
            .await?;

        let mut command = ToolCommand::new(&self.props.binary_path)
            .arg(sandbox.command_arg(names.stem()))
            .arg("dockrst")
            .logs(
                self.props.common.out_log_path.clone(),
                self.props.common.err_log_path.clone(),
            );
        if let Some(options) = container {
            command = command.container(options, sandbox.host_dir());
        }
        let report = command.execute().await?;

        sandbox.collect(&names.rst(), &self.output_rst_path).await?;
        sandbox.collect(&names.ene_rst(), &self.output_ene_rst_path).await?;

        if self.props.common.remove_tmp {
            sandbox.cleanup().await;
        }
        Ok(report)
    }
}
