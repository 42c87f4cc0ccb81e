use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SnrError};

/// One original/compressed pair plus the metadata shown in the reports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    pub original: PathBuf,
    pub compressed: PathBuf,
    pub algorithm: String,
    pub size_mb: f64,
    pub duration_sec: u32,
    pub bitrate_kbps: u32,
}

impl CatalogEntry {
    pub fn new(
        original: impl Into<PathBuf>,
        compressed: impl Into<PathBuf>,
        algorithm: impl Into<String>,
        size_mb: f64,
        duration_sec: u32,
        bitrate_kbps: u32,
    ) -> Self {
        Self {
            original: original.into(),
            compressed: compressed.into(),
            algorithm: algorithm.into(),
            size_mb,
            duration_sec,
            bitrate_kbps,
        }
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_sec as f64 / 60.0
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    name: Option<String>,
    #[serde(default, rename = "entry")]
    entries: Vec<CatalogEntry>,
}

/// Immutable, ordered list of entries to measure.
///
/// Relative entry paths are resolved against `base_dir`.
#[derive(Debug, Clone)]
pub struct Catalog {
    name: Option<String>,
    base_dir: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>, base_dir: impl Into<PathBuf>) -> Result<Self> {
        if entries.is_empty() {
            return Err(SnrError::Catalog("catalog has no entries".to_string()));
        }
        for entry in &entries {
            if entry.algorithm.trim().is_empty() {
                return Err(SnrError::Catalog(format!(
                    "entry for {} has an empty algorithm label",
                    entry.original.display()
                )));
            }
            if !entry.size_mb.is_finite() || entry.size_mb < 0.0 {
                return Err(SnrError::Catalog(format!(
                    "entry {} has an invalid size_mb: {}",
                    entry.algorithm, entry.size_mb
                )));
            }
        }
        Ok(Self {
            name: None,
            base_dir: base_dir.into(),
            entries,
        })
    }

    /// The four reference pairs measured by default.
    pub fn builtin(base_dir: impl Into<PathBuf>) -> Self {
        let entries = vec![
            CatalogEntry::new("elliot-og.wav", "elliot-mp3.mp3", "ELLIOT-MP3", 2.53, 2 * 60 + 36, 128),
            CatalogEntry::new("flow-og.wav", "flow-aac.aac", "FLOW-AAC", 3.14, 3 * 60 + 25, 160),
            CatalogEntry::new("sinatra-og.wav", "sinatra-flac.flac", "SINATRA-FLAC", 16.00, 3 * 60 + 14, 1000),
            CatalogEntry::new("waltz-og.wav", "waltz-ogg.ogg", "WALTZ-OGG", 2.60, 3 * 60 + 50, 192),
        ];
        Self {
            name: Some("builtin".to_string()),
            base_dir: base_dir.into(),
            entries,
        }
    }

    /// Parse a catalog from TOML text.
    ///
    /// ```toml
    /// name = "listening test"
    ///
    /// [[entry]]
    /// original = "elliot-og.wav"
    /// compressed = "elliot-mp3.mp3"
    /// algorithm = "ELLIOT-MP3"
    /// size_mb = 2.53
    /// duration_sec = 156
    /// bitrate_kbps = 128
    /// ```
    pub fn from_toml_str(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| SnrError::Catalog(e.to_string()))?;
        let mut catalog = Self::new(file.entries, base_dir)?;
        catalog.name = file.name;
        Ok(catalog)
    }

    /// Read a catalog file; its entries resolve relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SnrError::Catalog(format!("{}: {}", path.display(), e)))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut catalog = Self::from_toml_str(&text, base_dir)?;
        if catalog.name.is_none() {
            catalog.name = Some(path.display().to_string());
        }
        Ok(catalog)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn original_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.base_dir.join(&entry.original)
    }

    pub fn compressed_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.base_dir.join(&entry.compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin(".");
        let labels: Vec<&str> = catalog.entries().iter().map(|e| e.algorithm.as_str()).collect();
        assert_eq!(labels, ["ELLIOT-MP3", "FLOW-AAC", "SINATRA-FLAC", "WALTZ-OGG"]);
        assert_eq!(catalog.entries()[0].duration_sec, 156);
        assert_eq!(catalog.entries()[2].bitrate_kbps, 1000);
        assert!((catalog.entries()[3].duration_min() - 230.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_toml_preserves_order() {
        let text = r#"
            name = "pairs"

            [[entry]]
            original = "b.wav"
            compressed = "b.ogg"
            algorithm = "B-OGG"
            size_mb = 1.5
            duration_sec = 90
            bitrate_kbps = 192

            [[entry]]
            original = "a.wav"
            compressed = "a.mp3"
            algorithm = "A-MP3"
            size_mb = 2.0
            duration_sec = 120
            bitrate_kbps = 128
        "#;
        let catalog = Catalog::from_toml_str(text, "/music").unwrap();
        assert_eq!(catalog.name(), Some("pairs"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].algorithm, "B-OGG");
        assert_eq!(catalog.entries()[1].algorithm, "A-MP3");
        assert_eq!(
            catalog.original_path(&catalog.entries()[0]),
            PathBuf::from("/music/b.wav")
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Catalog::from_toml_str("name = \"empty\"", "."),
            Err(SnrError::Catalog(_))
        ));
    }

    #[test]
    fn test_missing_field_rejected() {
        let text = r#"
            [[entry]]
            original = "a.wav"
            compressed = "a.mp3"
            algorithm = "A-MP3"
        "#;
        assert!(matches!(
            Catalog::from_toml_str(text, "."),
            Err(SnrError::Catalog(_))
        ));
    }

    #[test]
    fn test_load_resolves_against_file_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
            [[entry]]
            original = "x.wav"
            compressed = "x.flac"
            algorithm = "X-FLAC"
            size_mb = 10.0
            duration_sec = 60
            bitrate_kbps = 900
            "#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.base_dir(), dir.path());
        assert_eq!(
            catalog.compressed_path(&catalog.entries()[0]),
            dir.path().join("x.flac")
        );
    }
}
