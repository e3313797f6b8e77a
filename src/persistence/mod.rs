//! JSON file persistence shared by tuning, settings and high scores
//!
//! Writes go through a temporary sibling file that is renamed into place, so
//! a crash mid-write leaves the previous file intact.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize to pretty JSON and write atomically (tmp file, then rename)
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = path.with_extension("json.tmp");
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("infinite_bounce_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_write_then_read() {
        let path = scratch_path("persist");
        let mut value = BTreeMap::new();
        value.insert("waves".to_string(), 3u32);

        write_json(&path, &value).unwrap();
        let loaded: BTreeMap<String, u32> = read_json(&path).unwrap();
        assert_eq!(loaded.get("waves"), Some(&3));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = scratch_path("does_not_exist");
        let result: ConfigResult<BTreeMap<String, u32>> = read_json(&path);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let path = scratch_path("garbage");
        std::fs::write(&path, "not json").unwrap();
        let result: ConfigResult<BTreeMap<String, u32>> = read_json(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unencodable_value_is_serialize_error() {
        let path = scratch_path("unencodable");
        // JSON object keys must be strings
        let mut value = BTreeMap::new();
        value.insert((1u32, 2u32), 3u32);

        let result = write_json(&path, &value);
        assert!(matches!(result, Err(ConfigError::Serialize { .. })));
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("failed to serialize"));
        assert!(!path.exists());
    }
}
