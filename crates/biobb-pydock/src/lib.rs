//! biobb-pydock — BioExcel building blocks wrapping the pyDock
//! protein-protein docking suite.
//!
//! Each pyDock module is exposed as a building block: a typed unit that takes
//! explicit input/output file paths plus a properties mapping, stages its
//! inputs into a disposable sandbox under the file names pyDock expects, runs
//! the external `pydock3` binary (optionally through docker or singularity),
//! and relays the produced files back to the caller's paths.
//!
//! The docking computation itself lives entirely in pyDock; this crate owns
//! only the glue around it.

pub mod cli;
pub mod common;
pub mod dockrst;
pub mod dockser;
pub mod ftdock;
pub mod make_pdb;
pub mod oda;
pub mod setup;

pub use dockrst::{Dockrst, DockrstProperties};
pub use dockser::{Dockser, DockserProperties};
pub use ftdock::{Ftdock, FtdockProperties};
pub use make_pdb::{MakePdb, MakePdbProperties};
pub use oda::{Oda, OdaOutputs, OdaProperties};
pub use setup::{Setup, SetupInputs, SetupOutputs, SetupProperties};

/// Package version, kept in lockstep with the README version line.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
