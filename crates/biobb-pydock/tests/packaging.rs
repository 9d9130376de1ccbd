//! Packaging-integrity checks: the documented version and license must match
//! what the workspace actually ships.

use std::path::Path;

fn workspace_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().parent().unwrap()
}

#[test]
fn test_package_version_is_the_documented_one() {
    assert_eq!(biobb_pydock::VERSION, "3.9.0");
    assert_eq!(env!("CARGO_PKG_VERSION"), "3.9.0");
}

#[test]
fn test_readme_version_line_matches_the_package() {
    let readme = std::fs::read_to_string(workspace_root().join("README.md")).unwrap();
    assert!(
        readme.contains("v3.9.0 2022.4"),
        "README version line disagrees with the package version"
    );
}

#[test]
fn test_license_file_names_the_apache_license() {
    let license = std::fs::read_to_string(workspace_root().join("LICENSE")).unwrap();
    assert!(license.contains("Apache License"));
    assert!(license.contains("Version 2.0"));
}
