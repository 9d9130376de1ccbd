//! Command-line interface: one subcommand per pyDock building block.
//!
//! Every subcommand takes the block's input/output paths as flags; the
//! properties come from `--config`, either a file path or an inline YAML/JSON
//! literal, with `--step` selecting a section of a workflow configuration.

use crate::common::PreparedComplex;
use crate::dockrst::{Dockrst, DockrstProperties};
use crate::dockser::{Dockser, DockserProperties};
use crate::ftdock::{Ftdock, FtdockProperties};
use crate::make_pdb::{MakePdb, MakePdbProperties};
use crate::oda::{Oda, OdaOutputs, OdaProperties};
use crate::setup::{Setup, SetupInputs, SetupOutputs, SetupProperties};
use biobb_common::command::ExecutionReport;
use biobb_common::config::ConfReader;
use biobb_common::error::Result;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "biobb-pydock", version, about = "BioExcel building blocks for the pyDock protein-protein docking suite")]
pub struct Cli {
    /// Configuration file path or inline YAML/JSON literal.
    #[arg(long, global = true, default_value = "{}", value_name = "CONFIG")]
    pub config: String,

    /// Step section of a workflow configuration to read the properties from.
    #[arg(long, global = true, value_name = "STEP")]
    pub step: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prepare receptor and ligand structures for docking (pyDock setup).
    Setup(SetupArgs),
    /// Sample rigid-body docking poses with FFT (pyDock ftdock).
    Ftdock(FtdockArgs),
    /// Score every docking pose with the pyDock energy function (pyDock dockser).
    Dockser(DockserArgs),
    /// Generate PDB structures for a rank range of poses (pyDock makePDB).
    MakePdb(MakePdbArgs),
    /// Rescore docking poses with distance restraints (pyDock dockrst).
    Dockrst(DockrstArgs),
    /// Predict binding interface sites from surface desolvation (pyDock oda).
    Oda(OdaArgs),
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Receptor PDB file (the largest of the two proteins).
    #[arg(long, value_name = "FILE")]
    pub input_rec_pdb_path: Option<PathBuf>,
    /// Receptor AMBER coordinates file; provide together with the topology
    /// as an alternative to the PDB file.
    #[arg(long, value_name = "FILE", requires = "input_rec_top_path")]
    pub input_rec_coords_path: Option<PathBuf>,
    /// Receptor AMBER topology file.
    #[arg(long, value_name = "FILE", requires = "input_rec_coords_path")]
    pub input_rec_top_path: Option<PathBuf>,
    /// Ligand PDB file (will be rotated and translated).
    #[arg(long, value_name = "FILE")]
    pub input_lig_pdb_path: Option<PathBuf>,
    /// Ligand AMBER coordinates file.
    #[arg(long, value_name = "FILE", requires = "input_lig_top_path")]
    pub input_lig_coords_path: Option<PathBuf>,
    /// Ligand AMBER topology file.
    #[arg(long, value_name = "FILE", requires = "input_lig_coords_path")]
    pub input_lig_top_path: Option<PathBuf>,
    /// Reference complex PDB file.
    #[arg(long, value_name = "FILE")]
    pub input_ref_path: Option<PathBuf>,
    /// Prepared receptor PDB file.
    #[arg(long, value_name = "FILE")]
    pub output_rec_path: PathBuf,
    /// Prepared receptor PDB file with hydrogens.
    #[arg(long, value_name = "FILE")]
    pub output_rec_h_path: PathBuf,
    /// Receptor AMBER parameters for each atom.
    #[arg(long, value_name = "FILE")]
    pub output_rec_amber_path: PathBuf,
    /// Prepared ligand PDB file.
    #[arg(long, value_name = "FILE")]
    pub output_lig_path: PathBuf,
    /// Prepared ligand PDB file with hydrogens.
    #[arg(long, value_name = "FILE")]
    pub output_lig_h_path: PathBuf,
    /// Ligand AMBER parameters for each atom.
    #[arg(long, value_name = "FILE")]
    pub output_lig_amber_path: PathBuf,
    /// Prepared reference PDB file.
    #[arg(long, value_name = "FILE")]
    pub output_ref_path: Option<PathBuf>,
}

/// The six prepared structure files produced by setup, shared by the scoring
/// subcommands.
#[derive(Debug, Args)]
pub struct PreparedArgs {
    /// Prepared receptor PDB file from setup.
    #[arg(long, value_name = "FILE")]
    pub input_rec_path: PathBuf,
    /// Prepared receptor PDB file with hydrogens.
    #[arg(long, value_name = "FILE")]
    pub input_rec_h_path: PathBuf,
    /// Receptor AMBER parameters for each atom.
    #[arg(long, value_name = "FILE")]
    pub input_rec_amber_path: PathBuf,
    /// Prepared ligand PDB file from setup.
    #[arg(long, value_name = "FILE")]
    pub input_lig_path: PathBuf,
    /// Prepared ligand PDB file with hydrogens.
    #[arg(long, value_name = "FILE")]
    pub input_lig_h_path: PathBuf,
    /// Ligand AMBER parameters for each atom.
    #[arg(long, value_name = "FILE")]
    pub input_lig_amber_path: PathBuf,
}

impl PreparedArgs {
    fn into_inputs(self) -> PreparedComplex {
        PreparedComplex {
            rec_pdb: self.input_rec_path,
            rec_pdb_h: self.input_rec_h_path,
            rec_amber: self.input_rec_amber_path,
            lig_pdb: self.input_lig_path,
            lig_pdb_h: self.input_lig_h_path,
            lig_amber: self.input_lig_amber_path,
        }
    }
}

#[derive(Debug, Args)]
pub struct FtdockArgs {
    /// Prepared receptor PDB file from setup.
    #[arg(long, value_name = "FILE")]
    pub input_rec_path: PathBuf,
    /// Prepared ligand PDB file from setup.
    #[arg(long, value_name = "FILE")]
    pub input_lig_path: PathBuf,
    /// FTDock sampling output.
    #[arg(long, value_name = "FILE")]
    pub output_ftdock_path: PathBuf,
    /// Transformation matrix for all docking poses.
    #[arg(long, value_name = "FILE")]
    pub output_rot_path: PathBuf,
}

#[derive(Debug, Args)]
pub struct DockserArgs {
    #[command(flatten)]
    pub prepared: PreparedArgs,
    /// Transformation matrix for all docking poses.
    #[arg(long, value_name = "FILE")]
    pub input_rot_path: PathBuf,
    /// Energy ranking of the docking poses.
    #[arg(long, value_name = "FILE")]
    pub output_ene_path: PathBuf,
}

#[derive(Debug, Args)]
pub struct MakePdbArgs {
    #[command(flatten)]
    pub prepared: PreparedArgs,
    /// Transformation matrix for all docking poses.
    #[arg(long, value_name = "FILE")]
    pub input_rot_path: PathBuf,
    /// Energy ranking of the docking poses.
    #[arg(long, value_name = "FILE")]
    pub input_ene_path: PathBuf,
    /// Zip archive with the generated pose structures.
    #[arg(long, value_name = "FILE")]
    pub output_zip_path: PathBuf,
}

#[derive(Debug, Args)]
pub struct DockrstArgs {
    #[command(flatten)]
    pub prepared: PreparedArgs,
    /// Transformation matrix for all docking poses.
    #[arg(long, value_name = "FILE")]
    pub input_rot_path: PathBuf,
    /// Energy ranking of the docking poses.
    #[arg(long, value_name = "FILE")]
    pub input_ene_path: PathBuf,
    /// Restraint-based scoring of each docking pose.
    #[arg(long, value_name = "FILE")]
    pub output_rst_path: PathBuf,
    /// Energy ranking combined with the restraint scoring.
    #[arg(long, value_name = "FILE")]
    pub output_ene_rst_path: PathBuf,
}

#[derive(Debug, Args)]
pub struct OdaArgs {
    /// Protein PDB file to analyze.
    #[arg(long, value_name = "FILE")]
    pub input_structure_path: PathBuf,
    /// Structure annotated with the surface desolvation values.
    #[arg(long, value_name = "FILE")]
    pub output_oda_path: PathBuf,
    /// Annotated structure with hydrogens.
    #[arg(long, value_name = "FILE")]
    pub output_oda_h_path: PathBuf,
    /// AMBER parameters of the analyzed structure.
    #[arg(long, value_name = "FILE")]
    pub output_oda_amber_path: PathBuf,
    /// Per-residue table of optimal docking area values.
    #[arg(long, value_name = "FILE")]
    pub output_oda_tab_path: PathBuf,
}

/// Resolve the properties mapping for this invocation and deserialize it into
/// the block's typed properties.
fn block_properties<T: DeserializeOwned>(config: &str, step: Option<&str>) -> Result<T> {
    let reader = ConfReader::load(config)?;
    let value = match step {
        Some(step) => reader.step_properties(step)?,
        None => reader.properties(),
    };
    Ok(serde_json::from_value(value)?)
}

/// Dispatch one parsed invocation to its building block.
pub async fn run(cli: Cli) -> Result<ExecutionReport> {
    let config = cli.config.as_str();
    let step = cli.step.as_deref();

    let report = match cli.command {
        Command::Setup(args) => {
            let props: SetupProperties = block_properties(config, step)?;
            let inputs = SetupInputs {
                rec_pdb: args.input_rec_pdb_path,
                rec_coords: args.input_rec_coords_path,
                rec_top: args.input_rec_top_path,
                lig_pdb: args.input_lig_pdb_path,
                lig_coords: args.input_lig_coords_path,
                lig_top: args.input_lig_top_path,
                reference: args.input_ref_path,
            };
            let outputs = SetupOutputs {
                rec_pdb: args.output_rec_path,
                rec_pdb_h: args.output_rec_h_path,
                rec_amber: args.output_rec_amber_path,
                lig_pdb: args.output_lig_path,
                lig_pdb_h: args.output_lig_h_path,
                lig_amber: args.output_lig_amber_path,
                reference: args.output_ref_path,
            };
            Setup::new(inputs, outputs, props)?.launch().await?
        }
        Command::Ftdock(args) => {
            let props: FtdockProperties = block_properties(config, step)?;
            Ftdock::new(
                args.input_rec_path,
                args.input_lig_path,
                args.output_ftdock_path,
                args.output_rot_path,
                props,
            )
            .launch()
            .await?
        }
        Command::Dockser(args) => {
            let props: DockserProperties = block_properties(config, step)?;
            Dockser::new(
                args.prepared.into_inputs(),
                args.input_rot_path,
                args.output_ene_path,
                props,
            )
            .launch()
            .await?
        }
        Command::MakePdb(args) => {
            let props: MakePdbProperties = block_properties(config, step)?;
            MakePdb::new(
                args.prepared.into_inputs(),
                args.input_rot_path,
                args.input_ene_path,
                args.output_zip_path,
                props,
            )
            .launch()
            .await?
        }
        Command::Dockrst(args) => {
            let props: DockrstProperties = block_properties(config, step)?;
            Dockrst::new(
                args.prepared.into_inputs(),
                args.input_rot_path,
                args.input_ene_path,
                args.output_rst_path,
                args.output_ene_rst_path,
                props,
            )
            .launch()
            .await?
        }
        Command::Oda(args) => {
            let props: OdaProperties = block_properties(config, step)?;
            let outputs = OdaOutputs {
                oda: args.output_oda_path,
                oda_h: args.output_oda_h_path,
                oda_amber: args.output_oda_amber_path,
                oda_tab: args.output_oda_tab_path,
            };
            Oda::new(args.input_structure_path, outputs, props).launch().await?
        }
    };

    if report.skipped {
        info!("Step skipped, outputs already present");
    }
    Ok(report)
}
