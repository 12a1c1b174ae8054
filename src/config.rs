//! Run configuration and symbol table loading
//!
//! The scanner consumes a small JSON config naming the dataset, the symbol
//! table, and the report mode, plus a JSON array of symbol names indexed
//! by the records' symbol field.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Report mode
///
/// Mode B adds the `Violation` column to every report, flagging pairs
/// where parent and similar belong to the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Mode {
    A,
    B,
}

/// Scanner run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the binary trade dataset
    pub dataset_path: PathBuf,

    /// Path to the JSON symbol-name table
    pub symbols_path: PathBuf,

    /// Report mode
    pub mode: Mode,
}

impl Config {
    /// Load and parse the JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether reports carry the violation column
    pub fn violation_reporting(&self) -> bool {
        self.mode == Mode::B
    }
}

/// Load the symbol-name table (a JSON array of strings)
pub fn load_symbols(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Configuration errors; all fatal at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config or symbol file missing/unreadable
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config or symbol file is not the expected JSON shape
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dataset_path": "dataset.bin", "symbols_path": "symbols.json", "mode": "B"}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("dataset.bin"));
        assert_eq!(config.mode, Mode::B);
        assert!(config.violation_reporting());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dataset_path": "d.bin", "symbols_path": "s.json", "mode": "C"}}"#
        )
        .unwrap();

        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_config_is_read_error() {
        assert!(matches!(
            Config::load("definitely/not/here.json"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_symbol_table_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["EURUSD", "GBPUSD", "XAUUSD"]"#).unwrap();

        let symbols = load_symbols(file.path()).unwrap();
        assert_eq!(symbols, vec!["EURUSD", "GBPUSD", "XAUUSD"]);
    }
}
