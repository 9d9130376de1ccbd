//! External tool invocation, with optional container wrapping.

use crate::error::{BiobbError, Result};
use crate::file_utils;
use crate::props::CommonProperties;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Outcome of a building-block run.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub skipped: bool,
    pub return_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub command: String,
}

impl ExecutionReport {
    /// Report for a run short-circuited by the restart property.
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            return_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            command: String::new(),
        }
    }
}

/// Container runtime settings for a wrapped invocation.
#[derive(Debug, Clone)]
pub struct ContainerOptions {
    pub runtime_path: String,
    pub image: String,
    pub volume_path: String,
    pub working_dir: Option<String>,
    pub user_id: Option<String>,
    pub shell_path: String,
    pub generic_command: String,
}

impl ContainerOptions {
    /// Extract container options from common properties. Returns `None` when
    /// no container runtime is configured.
    pub fn from_properties(props: &CommonProperties) -> Result<Option<Self>> {
        let Some(runtime_path) = props.container_path.clone() else {
            return Ok(None);
        };
        let image = props.container_image.clone().ok_or_else(|| {
            BiobbError::Config("container_path is set but container_image is missing".to_string())
        })?;
        Ok(Some(Self {
            runtime_path,
            image,
            volume_path: props.container_volume_path.clone(),
            working_dir: props.container_working_dir.clone(),
            user_id: props.container_user_id.clone(),
            shell_path: props.container_shell_path.clone(),
            generic_command: props.container_generic_command.clone(),
        }))
    }

    fn runtime_kind(&self) -> Result<RuntimeKind> {
        let base = Path::new(&self.runtime_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if base.contains("docker") {
            Ok(RuntimeKind::Docker)
        } else if base.contains("singularity") {
            Ok(RuntimeKind::Singularity)
        } else {
            Err(BiobbError::Config(format!(
                "unsupported container runtime: {}",
                self.runtime_path
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuntimeKind {
    Docker,
    Singularity,
}

/// Builder and runner for one invocation of the wrapped binary.
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    container: Option<(ContainerOptions, PathBuf)>,
    out_log: Option<PathBuf>,
    err_log: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            container: None,
            out_log: None,
            err_log: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Wrap the command in a container runtime, mounting `host_dir` on the
    /// configured volume path.
    pub fn container(mut self, options: ContainerOptions, host_dir: &Path) -> Self {
        self.container = Some((options, host_dir.to_path_buf()));
        self
    }

    /// Persist the captured streams to these files after the run.
    pub fn logs(mut self, out_log: Option<PathBuf>, err_log: Option<PathBuf>) -> Self {
        self.out_log = out_log;
        self.err_log = err_log;
        self
    }

    /// The argv actually spawned: either the bare tool command, or the
    /// container runtime running `shell -c "<tool command>"` with the sandbox
    /// mounted on the volume path.
    fn assemble(&self) -> Result<(String, Vec<String>)> {
        let Some((options, host_dir)) = &self.container else {
            return Ok((self.program.clone(), self.args.clone()));
        };

        let inner = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        let bind = format!("{}:{}", host_dir.display(), options.volume_path);

        let mut argv = vec![options.generic_command.clone()];
        match options.runtime_kind()? {
            RuntimeKind::Docker => {
                argv.push("-v".to_string());
                argv.push(bind);
                if let Some(working_dir) = &options.working_dir {
                    argv.push("-w".to_string());
                    argv.push(working_dir.clone());
                }
                if let Some(user_id) = &options.user_id {
                    argv.push("--user".to_string());
                    argv.push(user_id.clone());
                }
            }
            RuntimeKind::Singularity => {
                argv.push("-e".to_string());
                argv.push("--bind".to_string());
                argv.push(bind);
            }
        }
        argv.push(options.image.clone());
        argv.push(options.shell_path.clone());
        argv.push("-c".to_string());
        argv.push(inner);

        Ok((options.runtime_path.clone(), argv))
    }

    /// Spawn the command and wait for it, capturing both streams. Non-zero
    /// exit codes become errors carrying the captured stderr.
    pub async fn execute(self) -> Result<ExecutionReport> {
        let (program, args) = self.assemble()?;
        let command_line = render(&program, &args);
        info!("Executing: {}", command_line);

        let output = Command::new(&program)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    BiobbError::BinaryNotFound(program.clone())
                } else {
                    BiobbError::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if let Some(path) = &self.out_log {
            file_utils::ensure_parent(path)?;
            tokio::fs::write(path, &stdout).await?;
        }
        if let Some(path) = &self.err_log {
            file_utils::ensure_parent(path)?;
            tokio::fs::write(path, &stderr).await?;
        }

        if !output.status.success() {
            return Err(BiobbError::ToolFailure {
                tool: program,
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        debug!("Tool finished: {}", command_line);
        Ok(ExecutionReport {
            skipped: false,
            return_code: output.status.code().unwrap_or(0),
            stdout,
            stderr,
            command: command_line,
        })
    }
}

/// Human-readable command line; arguments containing spaces are quoted.
fn render(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(|part| {
            if part.contains(' ') {
                format!("\"{part}\"")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
