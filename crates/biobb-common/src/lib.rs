//! biobb-common — Shared engine for BioExcel building-block wrappers.
//!
//! A building block wraps one module of an external tool behind a uniform
//! calling convention: explicit input/output file paths plus a properties
//! mapping. This crate provides the pieces every block is built from — the
//! configuration reader, the staging sandbox, the tool command runner with
//! container wrapping, and the common workflow properties.

pub mod command;
pub mod config;
pub mod error;
pub mod file_utils;
pub mod props;
pub mod sandbox;

// Re-export the types blocks are written against
pub use command::{ContainerOptions, ExecutionReport, ToolCommand};
pub use config::ConfReader;
pub use error::{BiobbError, Result};
pub use props::CommonProperties;
pub use sandbox::Sandbox;
