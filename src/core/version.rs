//! Version management for MSBuild-style projects.
//!
//! The version lives as `<MajorVersion>`, `<MinorVersion>` and
//! `<PatchVersion>` elements in a `Directory.Build.props` file at the
//! project root. All reads and writes go through regex capture patterns so
//! the rest of the file is never rewritten, only the element values.

use crate::core::constants::walk_source_files;
use crate::core::error::{Error, Result};
use crate::core::git;
use crate::log_status;
use crate::utils::parser;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Build-configuration file holding the version elements.
pub const DEFAULT_PROPS_FILE: &str = "Directory.Build.props";

/// Version reported when no props file exists yet.
const FALLBACK_VERSION: &str = "0.1.0";

fn element_pattern(element: &str) -> String {
    format!(r"<{0}>(\d+)</{0}>", element)
}

fn props_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_PROPS_FILE)
}

/// Enumerate MSBuild project files under `root`, excluding build output.
pub fn find_project_files(root: &Path) -> Vec<PathBuf> {
    walk_source_files(root, "csproj")
}

/// Read the current version from the props file. A missing file reports
/// the fallback version; missing elements default to `0`.
pub fn current_version(root: &Path) -> String {
    let Ok(content) = fs::read_to_string(props_path(root)) else {
        return FALLBACK_VERSION.to_string();
    };

    let major = parser::extract_first(&content, &element_pattern("MajorVersion"))
        .unwrap_or_else(|| "0".to_string());
    let minor = parser::extract_first(&content, &element_pattern("MinorVersion"))
        .unwrap_or_else(|| "0".to_string());
    let patch = parser::extract_first(&content, &element_pattern("PatchVersion"))
        .unwrap_or_else(|| "0".to_string());

    format!("{}.{}.{}", major, minor, patch)
}

/// Validate a plain `x.y.z` version string.
fn validate_version(version: &str) -> Result<semver::Version> {
    let parsed = semver::Version::parse(version)
        .map_err(|_| Error::InvalidVersion(format!("{} (use x.y.z format)", version)))?;

    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(Error::InvalidVersion(format!(
            "{} (pre-release and build metadata not supported)",
            version
        )));
    }

    Ok(parsed)
}

/// Result of setting or bumping the version.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionChange {
    pub old_version: String,
    pub new_version: String,
}

/// Set the version in the props file directly.
pub fn set_version(root: &Path, new_version: &str) -> Result<VersionChange> {
    let parsed = validate_version(new_version)?;

    let path = props_path(root);
    if !path.exists() {
        return Err(Error::VersionFileNotFound(path.display().to_string()));
    }

    let old_version = current_version(root);
    let mut content = fs::read_to_string(&path)?;
    let mut replaced_total = 0;

    let elements = [
        ("MajorVersion", parsed.major.to_string()),
        ("MinorVersion", parsed.minor.to_string()),
        ("PatchVersion", parsed.patch.to_string()),
    ];

    for (element, value) in &elements {
        let pattern = element_pattern(element);
        let (updated, count) = parser::replace_all(&content, &pattern, value)
            .ok_or_else(|| Error::Other(format!("Invalid version pattern: {}", pattern)))?;
        content = updated;
        replaced_total += count;
    }

    if replaced_total == 0 {
        return Err(Error::Other(format!(
            "No version elements found in {}",
            path.display()
        )));
    }

    fs::write(&path, &content)?;
    log_status!(
        "version",
        "Updated version to {} in {}",
        new_version,
        DEFAULT_PROPS_FILE
    );

    Ok(VersionChange {
        old_version,
        new_version: new_version.to_string(),
    })
}

/// Increment a semver version string.
/// part: "patch", "minor", or "major"
pub fn increment_version(version: &str, part: &str) -> Option<String> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let major: u32 = parts[0].parse().ok()?;
    let minor: u32 = parts[1].parse().ok()?;
    let patch: u32 = parts[2].parse().ok()?;

    let (new_major, new_minor, new_patch) = match part {
        "patch" => (major, minor, patch + 1),
        "minor" => (major, minor + 1, 0),
        "major" => (major + 1, 0, 0),
        _ => return None,
    };

    Some(format!("{}.{}.{}", new_major, new_minor, new_patch))
}

/// Bump the version in the props file by the given part.
pub fn bump_version(root: &Path, part: &str) -> Result<VersionChange> {
    let old_version = current_version(root);
    let new_version = increment_version(&old_version, part).ok_or_else(|| {
        Error::InvalidVersion(format!("cannot bump '{}' by '{}'", old_version, part))
    })?;

    set_version(root, &new_version)?;

    Ok(VersionChange {
        old_version,
        new_version,
    })
}

// ============================================================================
// Build metadata
// ============================================================================

/// Build metadata written to build-info.json. Field names are the on-disk
/// JSON keys consumed by CI scripts.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: String,
    pub build_number: String,
    pub full_version: String,
    pub timestamp: String,
    pub git_commit: String,
    pub git_branch: String,
}

/// Timestamp-based build number, `YYMMDD.HHMM`.
pub fn generate_build_number() -> String {
    Local::now().format("%y%m%d.%H%M").to_string()
}

/// Assemble build metadata for the project and write it to
/// `build-info.json` in the root. Git details fall back to `unknown`
/// outside a repository.
pub fn create_build_info(root: &Path) -> Result<BuildInfo> {
    let version = current_version(root);
    let build_number = generate_build_number();

    let info = BuildInfo {
        full_version: format!("{}-build.{}", version, build_number),
        timestamp: Local::now().to_rfc3339(),
        git_commit: git::head_commit(root).unwrap_or_else(|| "unknown".to_string()),
        git_branch: git::current_branch(root).unwrap_or_else(|| "unknown".to_string()),
        version,
        build_number,
    };

    let path = root.join("build-info.json");
    fs::write(&path, serde_json::to_string_pretty(&info)?)?;
    log_status!("version", "Created build info: {}", path.display());

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use tempfile::TempDir;

    const PROPS: &str = "<Project>\n  <PropertyGroup>\n    <MajorVersion>1</MajorVersion>\n    <MinorVersion>2</MinorVersion>\n    <PatchVersion>3</PatchVersion>\n  </PropertyGroup>\n</Project>\n";

    fn write_props(dir: &TempDir) {
        fs::write(dir.path().join(DEFAULT_PROPS_FILE), PROPS).unwrap();
    }

    #[test]
    fn current_version_reads_elements() {
        let dir = TempDir::new().unwrap();
        write_props(&dir);
        assert_eq!(current_version(dir.path()), "1.2.3");
    }

    #[test]
    fn current_version_falls_back_without_props() {
        let dir = TempDir::new().unwrap();
        assert_eq!(current_version(dir.path()), "0.1.0");
    }

    #[test]
    fn set_version_rewrites_only_elements() {
        let dir = TempDir::new().unwrap();
        write_props(&dir);

        let change = set_version(dir.path(), "2.0.1").unwrap();
        assert_eq!(change.old_version, "1.2.3");
        assert_eq!(change.new_version, "2.0.1");

        let content = fs::read_to_string(dir.path().join(DEFAULT_PROPS_FILE)).unwrap();
        assert!(content.contains("<MajorVersion>2</MajorVersion>"));
        assert!(content.contains("<MinorVersion>0</MinorVersion>"));
        assert!(content.contains("<PatchVersion>1</PatchVersion>"));
        // Surrounding structure untouched
        assert!(content.contains("<Project>"));
        assert!(content.contains("<PropertyGroup>"));
    }

    #[test]
    fn set_version_rejects_invalid_format() {
        let dir = TempDir::new().unwrap();
        write_props(&dir);
        assert!(set_version(dir.path(), "1.2").is_err());
        assert!(set_version(dir.path(), "1.2.3-rc.1").is_err());
        assert!(set_version(dir.path(), "abc").is_err());
    }

    #[test]
    fn set_version_errors_without_props_file() {
        let dir = TempDir::new().unwrap();
        let err = set_version(dir.path(), "1.0.0").unwrap_err();
        assert_eq!(err.code(), "VERSION_FILE_NOT_FOUND");
    }

    #[test]
    fn increment_version_matrix() {
        assert_eq!(increment_version("1.2.3", "patch"), Some("1.2.4".into()));
        assert_eq!(increment_version("1.2.3", "minor"), Some("1.3.0".into()));
        assert_eq!(increment_version("1.2.3", "major"), Some("2.0.0".into()));
        assert_eq!(increment_version("1.2.3", "nope"), None);
        assert_eq!(increment_version("1.2", "patch"), None);
    }

    #[test]
    fn bump_version_updates_file() {
        let dir = TempDir::new().unwrap();
        write_props(&dir);

        let change = bump_version(dir.path(), "minor").unwrap();
        assert_eq!(change.old_version, "1.2.3");
        assert_eq!(change.new_version, "1.3.0");
        assert_eq!(current_version(dir.path()), "1.3.0");
    }

    #[test]
    fn build_number_has_timestamp_shape() {
        let number = generate_build_number();
        assert!(Regex::new(r"^\d{6}\.\d{4}$").unwrap().is_match(&number));
    }

    #[test]
    fn create_build_info_writes_json() {
        let dir = TempDir::new().unwrap();
        write_props(&dir);

        let info = create_build_info(dir.path()).unwrap();
        assert_eq!(info.version, "1.2.3");
        assert!(info.full_version.starts_with("1.2.3-build."));

        let written = fs::read_to_string(dir.path().join("build-info.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["version"], "1.2.3");
        assert!(json["build_number"].is_string());
        assert!(json["git_commit"].is_string());
    }

    #[test]
    fn find_project_files_skips_build_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("App.csproj"), "<Project/>").unwrap();
        let obj = dir.path().join("obj");
        fs::create_dir_all(&obj).unwrap();
        fs::write(obj.join("Gen.csproj"), "<Project/>").unwrap();

        let files = find_project_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("App.csproj"));
    }
}
