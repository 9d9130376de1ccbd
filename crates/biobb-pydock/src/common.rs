//! Shared pyDock glue: the internal file-name convention, INI control files
//! and energy-ranking tables.
//!
//! pyDock derives every file it reads and writes from the docking name, so
//! each block stages its inputs under these names and looks up its outputs
//! the same way.

use biobb_common::error::{BiobbError, Result};
use biobb_common::sandbox::Sandbox;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Free-form section entries for the pyDock INI file
/// (`mol`, `newmol`, `restr`, `recmol`, `ligmol`, ...).
pub type ChainMap = BTreeMap<String, String>;

pub(crate) fn default_docking_name() -> String {
    "docking_name".to_string()
}

pub(crate) fn default_binary_path() -> String {
    "pydock3".to_string()
}

pub(crate) fn default_receptor_map() -> ChainMap {
    ChainMap::from([("mol".to_string(), "A".to_string()), ("newmol".to_string(), "A".to_string())])
}

pub(crate) fn default_ligand_map() -> ChainMap {
    ChainMap::from([("mol".to_string(), "A".to_string()), ("newmol".to_string(), "B".to_string())])
}

/// Basename under which an input file is staged when the tool accepts
/// arbitrary names (the setup module).
pub(crate) fn staged_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| BiobbError::Config(format!("input path has no file name: {}", path.display())))
}

/// File names pyDock derives from the docking name.
#[derive(Debug, Clone)]
pub struct DockingNames {
    name: String,
}

impl DockingNames {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The docking name itself, passed to pyDock as the project argument.
    pub fn stem(&self) -> &str {
        &self.name
    }

    pub fn ini(&self) -> String {
        format!("{}.ini", self.name)
    }

    pub fn rec_pdb(&self) -> String {
        format!("{}_rec.pdb", self.name)
    }

    pub fn rec_pdb_h(&self) -> String {
        format!("{}_rec.pdb.H", self.name)
    }

    pub fn rec_amber(&self) -> String {
        format!("{}_rec.pdb.amber", self.name)
    }

    pub fn lig_pdb(&self) -> String {
        format!("{}_lig.pdb", self.name)
    }

    pub fn lig_pdb_h(&self) -> String {
        format!("{}_lig.pdb.H", self.name)
    }

    pub fn lig_amber(&self) -> String {
        format!("{}_lig.pdb.amber", self.name)
    }

    pub fn ref_pdb(&self) -> String {
        format!("{}_ref.pdb", self.name)
    }

    pub fn ftdock(&self) -> String {
        format!("{}.ftdock", self.name)
    }

    pub fn rot(&self) -> String {
        format!("{}.rot", self.name)
    }

    pub fn ene(&self) -> String {
        format!("{}.ene", self.name)
    }

    pub fn rst(&self) -> String {
        format!("{}.rst", self.name)
    }

    pub fn ene_rst(&self) -> String {
        format!("{}.eneRST", self.name)
    }

    /// Pose structure file written by makePDB for one conformation.
    pub fn pose(&self, conf: &str) -> String {
        format!("{}_{}.pdb", self.name, conf)
    }
}

/// The six files pyDock setup produces for a receptor/ligand pair. The
/// scoring modules take all of them and stage them back under the names
/// setup gave them.
#[derive(Debug, Clone)]
pub struct PreparedComplex {
    pub rec_pdb: PathBuf,
    pub rec_pdb_h: PathBuf,
    pub rec_amber: PathBuf,
    pub lig_pdb: PathBuf,
    pub lig_pdb_h: PathBuf,
    pub lig_amber: PathBuf,
}

impl PreparedComplex {
    /// Stage the six prepared files under their internal names.
    pub async fn stage(&self, sandbox: &Sandbox, names: &DockingNames) -> Result<()> {
        sandbox.stage(&self.rec_pdb, &names.rec_pdb()).await?;
        sandbox.stage(&self.rec_pdb_h, &names.rec_pdb_h()).await?;
        sandbox.stage(&self.rec_amber, &names.rec_amber()).await?;
        sandbox.stage(&self.lig_pdb, &names.lig_pdb()).await?;
        sandbox.stage(&self.lig_pdb_h, &names.lig_pdb_h()).await?;
        sandbox.stage(&self.lig_amber, &names.lig_amber()).await?;
        Ok(())
    }
}

/// One section of the pyDock INI control file: file entries first, then the
/// chain entries in deterministic order.
#[derive(Debug, Clone, Default)]
pub struct IniSection {
    files: Vec<(String, String)>,
    items: ChainMap,
}

impl IniSection {
    pub fn new(items: &ChainMap) -> Self {
        Self {
            files: Vec::new(),
            items: items.clone(),
        }
    }

    pub fn file(mut self, key: &str, name: &str) -> Self {
        self.files.push((key.to_string(), name.to_string()));
        self
    }
}

/// Render the INI control file consumed by the setup and dockrst modules.
pub fn build_ini(receptor: &IniSection, ligand: &IniSection, reference: Option<&IniSection>) -> String {
    let mut lines = Vec::new();
    push_section(&mut lines, "receptor", receptor);
    push_section(&mut lines, "ligand", ligand);
    if let Some(reference) = reference {
        push_section(&mut lines, "reference", reference);
    }
    lines.join("\n") + "\n"
}

fn push_section(lines: &mut Vec<String>, header: &str, section: &IniSection) {
    lines.push(format!("[{header}]"));
    for (key, name) in &section.files {
        lines.push(format!("{key} = {name}"));
    }
    for (key, value) in &section.items {
        lines.push(format!("{key} = {value}"));
    }
}

/// Conformation ids whose rank falls within `rank1..=rank2` in a dockser
/// energy table, in file order. The table is whitespace-separated with a
/// header row naming at least the `Conf` and `RANK` columns.
pub fn conformations_in_rank_range(ene_path: &Path, rank1: u32, rank2: u32) -> Result<Vec<String>> {
    if rank1 > rank2 {
        return Err(BiobbError::Config(format!(
            "rank1 ({rank1}) is greater than rank2 ({rank2})"
        )));
    }

    let text = std::fs::read_to_string(ene_path)?;
    let mut rows = text.lines().filter(|line| !line.trim().is_empty());
    let header = rows
        .next()
        .ok_or_else(|| table_error(ene_path, "the table is empty"))?;
    let columns: Vec<&str> = header.split_whitespace().collect();
    let conf_idx = columns
        .iter()
        .position(|c| *c == "Conf")
        .ok_or_else(|| table_error(ene_path, "missing Conf column"))?;
    let rank_idx = columns
        .iter()
        .position(|c| *c == "RANK")
        .ok_or_else(|| table_error(ene_path, "missing RANK column"))?;

    let mut conformations = Vec::new();
    for row in rows {
        let fields: Vec<&str> = row.split_whitespace().collect();
        if fields.len() <= conf_idx.max(rank_idx) {
            return Err(table_error(ene_path, &format!("truncated row: {row}")));
        }
        let rank: u32 = fields[rank_idx]
            .parse()
            .map_err(|_| table_error(ene_path, &format!("unparsable rank: {}", fields[rank_idx])))?;
        if (rank1..=rank2).contains(&rank) {
            conformations.push(fields[conf_idx].to_string());
        }
    }
    Ok(conformations)
}

/// Pose structure file names makePDB will create for the given rank range.
pub fn pose_file_names(
    names: &DockingNames,
    ene_path: &Path,
    rank1: u32,
    rank2: u32,
) -> Result<Vec<String>> {
    Ok(conformations_in_rank_range(ene_path, rank1, rank2)?
        .iter()
        .map(|conf| names.pose(conf))
        .collect())
}

fn table_error(path: &Path, reason: &str) -> BiobbError {
    BiobbError::Table {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
