use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::paths;
use crate::errors::PipelineError;
use crate::taxonomy::{RegionPatterns, WeaponTerms};

/// Compression codec applied to the exported artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    /// Gzip, the default and the codec implied by the default output name.
    Gzip,
    /// Snappy, faster but larger.
    Snappy,
    /// No compression.
    None,
}

/// Top-level pipeline configuration.
///
/// Every field has a sensible default; a configuration file only needs the
/// keys it wants to override.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path of the source JSON feed.
    pub input_path: PathBuf,
    /// Path of the exported parquet artifact.
    pub output_path: PathBuf,
    /// Compression applied to the artifact.
    pub compression: CompressionCodec,
    /// Region cascade patterns; defaults cover all 25 regions.
    pub regions: RegionPatterns,
    /// Weapon category term lists; defaults cover the known feed vocabulary.
    pub weapons: WeaponTerms,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(paths::DEFAULT_INPUT),
            output_path: PathBuf::from(paths::DEFAULT_OUTPUT),
            compression: CompressionCodec::Gzip,
            regions: RegionPatterns::default(),
            weapons: WeaponTerms::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration overlay from a JSON file. Keys missing from the
    /// file keep their default values.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|err| {
            PipelineError::Configuration(format!(
                "cannot read config file '{}': {err}",
                path.display()
            ))
        })?;
        serde_json::from_str(&text).map_err(|err| {
            PipelineError::Configuration(format!(
                "cannot parse config file '{}': {err}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_assets() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, PathBuf::from(paths::DEFAULT_INPUT));
        assert_eq!(config.output_path, PathBuf::from(paths::DEFAULT_OUTPUT));
        assert_eq!(config.compression, CompressionCodec::Gzip);
        assert_eq!(config.regions.oblasts.len(), 25);
    }

    #[test]
    fn partial_file_overlays_defaults() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"output_path": "out.parquet", "compression": "snappy"}"#,
        )
        .expect("failed to write config");

        let config = PipelineConfig::from_file(&path).expect("config loads");
        assert_eq!(config.output_path, PathBuf::from("out.parquet"));
        assert_eq!(config.compression, CompressionCodec::Snappy);
        // Untouched keys keep their defaults.
        assert_eq!(config.input_path, PathBuf::from(paths::DEFAULT_INPUT));
        assert_eq!(config.weapons.handguns.len(), 15);
    }

    #[test]
    fn unreadable_or_malformed_files_are_configuration_errors() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let missing = PipelineConfig::from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(PipelineError::Configuration(_))));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("failed to write file");
        let broken = PipelineConfig::from_file(&path);
        assert!(matches!(broken, Err(PipelineError::Configuration(_))));
    }
}
