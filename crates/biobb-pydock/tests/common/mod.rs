//! Shared helpers for the integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable shell script standing in for the `pydock3` binary.
/// The script receives the command path (sandbox dir + docking name) as `$1`
/// and the module name as `$2`, exactly like the real tool.
pub fn fake_pydock(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("pydock3");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Create a non-empty placeholder input file.
pub fn write_input(path: &Path) {
    std::fs::write(path, b"ATOM      1  N   GLU A   1\n").unwrap();
}
