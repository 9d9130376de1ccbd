//! Wrapper for the pyDock setup module, which prepares the receptor and
//! ligand structures for the docking process.

use crate::common::{
    build_ini, default_binary_path, default_docking_name, default_ligand_map, default_receptor_map,
    staged_name, ChainMap, DockingNames, IniSection,
};
use biobb_common::command::{ContainerOptions, ExecutionReport, ToolCommand};
use biobb_common::error::{BiobbError, Result};
use biobb_common::file_utils;
use biobb_common::props::CommonProperties;
use biobb_common::sandbox::Sandbox;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Structures to prepare: a PDB file per subunit or AMBER coordinates plus
/// topology, and an optional reference complex.
#[derive(Debug, Clone, Default)]
pub struct SetupInputs {
    pub rec_pdb: Option<PathBuf>,
    pub rec_coords: Option<PathBuf>,
    pub rec_top: Option<PathBuf>,
    pub lig_pdb: Option<PathBuf>,
    pub lig_coords: Option<PathBuf>,
    pub lig_top: Option<PathBuf>,
    pub reference: Option<PathBuf>,
}

/// Destination paths for the prepared structures.
#[derive(Debug, Clone)]
pub struct SetupOutputs {
    pub rec_pdb: PathBuf,
    pub rec_pdb_h: PathBuf,
    pub rec_amber: PathBuf,
    pub lig_pdb: PathBuf,
    pub lig_pdb_h: PathBuf,
    pub lig_amber: PathBuf,
    pub reference: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupProperties {
    /// Name for the docking; pyDock derives every file name from it.
    #[serde(default = "default_docking_name")]
    pub docking_name: String,
    /// Receptor chain entries (`mol`, `newmol`).
    #[serde(default = "default_receptor_map")]
    pub receptor: ChainMap,
    /// Ligand chain entries (`mol`, `newmol`), with a `newmol` different from
    /// the receptor one.
    #[serde(default = "default_ligand_map")]
    pub ligand: ChainMap,
    /// Reference chain entries (`recmol`, `ligmol`), used when a reference
    /// complex is provided.
    #[serde(default)]
    pub reference: Option<ChainMap>,
    #[serde(default = "default_binary_path")]
    pub binary_path: String,
    #[serde(flatten)]
    pub common: CommonProperties,
}

impl Default for SetupProperties {
    fn default() -> Self {
        Self {
            docking_name: default_docking_name(),
            receptor: default_receptor_map(),
            ligand: default_ligand_map(),
            reference: None,
            binary_path: default_binary_path(),
            common: CommonProperties::default(),
        }
    }
}

/// Wrapper for pyDock setup execution.
#[derive(Debug)]
pub struct Setup {
    inputs: SetupInputs,
    outputs: SetupOutputs,
    props: SetupProperties,
}

impl Setup {
    pub fn new(inputs: SetupInputs, outputs: SetupOutputs, props: SetupProperties) -> Result<Self> {
        check_subunit("receptor", &inputs.rec_pdb, &inputs.rec_coords, &inputs.rec_top)?;
        check_subunit("ligand", &inputs.lig_pdb, &inputs.lig_coords, &inputs.lig_top)?;
        Ok(Self {
            inputs,
            outputs,
            props,
        })
    }

    /// Run pyDock setup, writing the prepared structures to the configured
    /// output paths.
    pub async fn launch(&self) -> Result<ExecutionReport> {
        if self.props.common.restart && file_utils::outputs_ready(self.output_paths()) {
            info!("Restart is enabled and all outputs exist, skipping setup");
            return Ok(ExecutionReport::skipped());
        }

        let names = DockingNames::new(&self.props.docking_name);
        let container = ContainerOptions::from_properties(&self.props.common)?;

        let mut sandbox = Sandbox::create(&self.props.common.sandbox_path).await?;
        if let Some(options) = &container {
            sandbox = sandbox.with_volume(options.volume_path.clone());
        }

        let receptor = stage_subunit(
            &sandbox,
            &self.inputs.rec_pdb,
            &self.inputs.rec_coords,
            &self.inputs.rec_top,
            &self.props.receptor,
        )
        .await?;
        let ligand = stage_subunit(
            &sandbox,
            &self.inputs.lig_pdb,
            &self.inputs.lig_coords,
            &self.inputs.lig_top,
            &self.props.ligand,
        )
        .await?;
        let reference = match &self.inputs.reference {
            Some(path) => {
                let name = staged_name(path)?;
                sandbox.stage(path, &name).await?;
                let items = self.props.reference.clone().unwrap_or_default();
                Some(IniSection::new(&items).file("pdb", &name))
            }
            None => None,
        };

        sandbox
            .write(&names.ini(), &build_ini(&receptor, &ligand, reference.as_ref()))
            .await?;

        let mut command = ToolCommand::new(&self.props.binary_path)
            .arg(sandbox.command_arg(names.stem()))
            .arg("setup")
            .logs(
                self.props.common.out_log_path.clone(),
                self.props.common.err_log_path.clone(),
            );
        if let Some(options) = container {
            command = command.container(options, sandbox.host_dir());
        }
        let report = command.execute().await?;

        sandbox.collect(&names.rec_pdb(), &self.outputs.rec_pdb).await?;
        sandbox.collect(&names.rec_pdb_h(), &self.outputs.rec_pdb_h).await?;
        sandbox.collect(&names.rec_amber(), &self.outputs.rec_amber).await?;
        sandbox.collect(&names.lig_pdb(), &self.outputs.lig_pdb).await?;
        sandbox.collect(&names.lig_pdb_h(), &self.outputs.lig_pdb_h).await?;
        sandbox.collect(&names.lig_amber(), &self.outputs.lig_amber).await?;
        if let Some(reference_out) = &self.outputs.reference {
            sandbox.collect_optional(&names.ref_pdb(), reference_out).await?;
        }

        if self.props.common.remove_tmp {
            sandbox.cleanup().await;
        }
        Ok(report)
    }

    /// Outputs the restart predicate checks. The reference output is
    /// excluded: the tool may legitimately never produce it, and collection
    /// treats it as optional.
    fn output_paths(&self) -> [&Path; 6] {
        [
            self.outputs.rec_pdb.as_path(),
            self.outputs.rec_pdb_h.as_path(),
            self.outputs.rec_amber.as_path(),
            self.outputs.lig_pdb.as_path(),
            self.outputs.lig_pdb_h.as_path(),
            self.outputs.lig_amber.as_path(),
        ]
    }
}

/// Stage one subunit and describe it in its INI section: either the PDB file,
/// or the AMBER coordinates and topology pair.
async fn stage_subunit(
    sandbox: &Sandbox,
    pdb: &Option<PathBuf>,
    coords: &Option<PathBuf>,
    top: &Option<PathBuf>,
    items: &ChainMap,
) -> Result<IniSection> {
    let mut section = IniSection::new(items);
    if let Some(pdb) = pdb {
        let name = staged_name(pdb)?;
        sandbox.stage(pdb, &name).await?;
        section = section.file("pdb", &name);
    } else if let (Some(coords), Some(top)) = (coords, top) {
        let coords_name = staged_name(coords)?;
        sandbox.stage(coords, &coords_name).await?;
        let top_name = staged_name(top)?;
        sandbox.stage(top, &top_name).await?;
        section = section.file("coords", &coords_name).file("top", &top_name);
    }
    Ok(section)
}

fn check_subunit(
    label: &str,
    pdb: &Option<PathBuf>,
    coords: &Option<PathBuf>,
    top: &Option<PathBuf>,
) -> Result<()> {
    if pdb.is_some() || (coords.is_some() && top.is_some()) {
        return Ok(());
    }
    Err(BiobbError::Config(format!(
        "{label} needs either a PDB file or both AMBER coordinates and topology"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn outputs_in(dir: &Path) -> SetupOutputs {
        SetupOutputs {
            rec_pdb: dir.join("prepared_receptor.pdb"),
            rec_pdb_h: dir.join("prepared_receptor.pdb.H"),
            rec_amber: dir.join("prepared_receptor.pdb.amber"),
            lig_pdb: dir.join("prepared_ligand.pdb"),
            lig_pdb_h: dir.join("prepared_ligand.pdb.H"),
            lig_amber: dir.join("prepared_ligand.pdb.amber"),
            reference: None,
        }
    }

    #[test]
    fn test_new_rejects_subunits_without_structure() {
        let dir = tempdir().unwrap();
        let inputs = SetupInputs {
            rec_pdb: Some(dir.path().join("receptor.pdb")),
            ..SetupInputs::default()
        };
        let err = Setup::new(inputs, outputs_in(dir.path()), SetupProperties::default()).unwrap_err();
        assert!(err.to_string().contains("ligand"));
    }

    #[test]
    fn test_new_accepts_amber_coordinates_with_topology() {
        let dir = tempdir().unwrap();
        let inputs = SetupInputs {
            rec_pdb: Some(dir.path().join("receptor.pdb")),
            lig_coords: Some(dir.path().join("ligand.inpcrd")),
            lig_top: Some(dir.path().join("ligand.prmtop")),
            ..SetupInputs::default()
        };
        assert!(Setup::new(inputs, outputs_in(dir.path()), SetupProperties::default()).is_ok());
    }

    #[test]
    fn test_new_rejects_coordinates_without_topology() {
        let dir = tempdir().unwrap();
        let inputs = SetupInputs {
            rec_coords: Some(dir.path().join("receptor.inpcrd")),
            lig_pdb: Some(dir.path().join("ligand.pdb")),
            ..SetupInputs::default()
        };
        let err = Setup::new(inputs, outputs_in(dir.path()), SetupProperties::default()).unwrap_err();
        assert!(err.to_string().contains("receptor"));
    }

    #[tokio::test]
    async fn test_subunits_sharing_a_basename_are_rejected() {
        let dir = tempdir().unwrap();
        let rec = dir.path().join("receptor/protein.pdb");
        let lig = dir.path().join("ligand/protein.pdb");
        std::fs::create_dir_all(rec.parent().unwrap()).unwrap();
        std::fs::create_dir_all(lig.parent().unwrap()).unwrap();
        std::fs::write(&rec, b"RECEPTOR").unwrap();
        std::fs::write(&lig, b"LIGAND").unwrap();

        let inputs = SetupInputs {
            rec_pdb: Some(rec),
            lig_pdb: Some(lig),
            ..SetupInputs::default()
        };
        let mut props = SetupProperties::default();
        props.common.sandbox_path = dir.path().join("sandboxes");

        let err = Setup::new(inputs, outputs_in(dir.path()), props)
            .unwrap()
            .launch()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already staged"));
    }

    #[tokio::test]
    async fn test_restart_skips_when_outputs_exist() {
        let dir = tempdir().unwrap();
        let outputs = outputs_in(dir.path());
        for path in [
            &outputs.rec_pdb,
            &outputs.rec_pdb_h,
            &outputs.rec_amber,
            &outputs.lig_pdb,
            &outputs.lig_pdb_h,
            &outputs.lig_amber,
        ] {
            std::fs::write(path, b"ATOM").unwrap();
        }

        let inputs = SetupInputs {
            rec_pdb: Some(dir.path().join("receptor.pdb")),
            lig_pdb: Some(dir.path().join("ligand.pdb")),
            ..SetupInputs::default()
        };
        let mut props = SetupProperties::default();
        props.common.restart = true;

        let report = Setup::new(inputs, outputs, props)
            .unwrap()
            .launch()
            .await
            .unwrap();
        assert!(report.skipped);
    }

    #[tokio::test]
    async fn test_restart_ignores_the_optional_reference_output() {
        let dir = tempdir().unwrap();
        let mut outputs = outputs_in(dir.path());
        outputs.reference = Some(dir.path().join("prepared_reference.pdb"));
        for path in [
            &outputs.rec_pdb,
            &outputs.rec_pdb_h,
            &outputs.rec_amber,
            &outputs.lig_pdb,
            &outputs.lig_pdb_h,
            &outputs.lig_amber,
        ] {
            std::fs::write(path, b"ATOM").unwrap();
        }

        let inputs = SetupInputs {
            rec_pdb: Some(dir.path().join("receptor.pdb")),
            lig_pdb: Some(dir.path().join("ligand.pdb")),
            ..SetupInputs::default()
        };
        let mut props = SetupProperties::default();
        props.common.restart = true;

        // The reference output was never produced, the six prepared files
        // are still enough to short-circuit.
        let report = Setup::new(inputs, outputs, props)
            .unwrap()
            .launch()
            .await
            .unwrap();
        assert!(report.skipped);
    }
}
