//! Run configuration
//!
//! Everything a run needs is carried in an explicit [`Config`] built from
//! the command line (and its environment fallbacks) in `main`.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use zfsprops::DesiredState;

/// Configuration for a single reconciliation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the desired-state JSON document
    pub state_file: Option<PathBuf>,
    /// `zfs` executable to invoke
    pub zfs_bin: String,
}

impl Config {
    /// Resolve the desired-state location, expanding a leading `~`
    ///
    /// Fails before any state is read when no location was given.
    pub fn state_path(&self) -> Result<PathBuf> {
        let path = self.state_file.as_ref().ok_or_else(|| {
            zfsprops::Error::Configuration(
                "no desired state file given (use --state or set EXPECTED_STATE)".to_string(),
            )
        })?;

        let raw = path.to_string_lossy();
        let expanded = shellexpand::tilde(&raw);
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Load the desired-state document
    pub fn load_desired(&self) -> Result<DesiredState> {
        let path = self.state_path()?;
        log::info!("Reading desired state from {}", path.display());
        load_desired_from(&path)
    }
}

/// Read and decode a desired-state document from disk
pub fn load_desired_from(path: &Path) -> Result<DesiredState> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    DesiredState::from_json_str(&content)
        .with_context(|| format!("Invalid desired state in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(state_file: Option<PathBuf>) -> Config {
        Config {
            state_file,
            zfs_bin: "zfs".to_string(),
        }
    }

    #[test]
    fn test_missing_state_file_is_configuration_error() {
        let err = config(None).state_path().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<zfsprops::Error>(),
            Some(zfsprops::Error::Configuration(_))
        ));
    }

    #[test]
    fn test_load_desired() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"datasets": {{"tank": {{"ignored_properties": [], "properties": {{"atime": "off"}}}}}}}}"#
        )
        .unwrap();

        let desired = config(Some(file.path().to_path_buf()))
            .load_desired()
            .unwrap();

        assert_eq!(desired.datasets["tank"].properties["atime"], "off");
    }

    #[test]
    fn test_load_desired_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_desired_from(&path).unwrap_err();
        assert!(err.to_string().contains("Could not read"));
    }

    #[test]
    fn test_load_desired_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = load_desired_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid desired state"));
    }

    #[test]
    fn test_state_path_expands_tilde() {
        let path = config(Some(PathBuf::from("~/zfs/state.json")))
            .state_path()
            .unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("zfs/state.json"));
    }
}
