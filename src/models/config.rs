use crate::error::ConfigError;
use crate::models::FontFamily;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_ENV: &str = "IMAGEGENE_CONFIG";

/// Application configuration loaded from YAML
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Font lookup
    #[serde(default)]
    pub fonts: FontConfig,

    /// Encoder settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where fonts come from.
///
/// Family files are resolved relative to `directory`. When a file is not
/// there and `system_fonts` is on, the system font database is queried for
/// `fallback_family` with the family's weight and style.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FontConfig {
    #[serde(default = "default_font_dir")]
    pub directory: PathBuf,

    #[serde(default = "default_fallback_family")]
    pub fallback_family: String,

    #[serde(default = "default_true")]
    pub system_fonts: bool,

    /// Per-family file overrides; families not listed use their default file
    #[serde(default)]
    pub families: BTreeMap<FontFamily, PathBuf>,
}

fn default_font_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_fallback_family() -> String {
    "Arial".to_string()
}

fn default_true() -> bool {
    true
}

impl FontConfig {
    /// Path of the file backing `family`
    pub fn file_for(&self, family: FontFamily) -> PathBuf {
        let file = self
            .families
            .get(&family)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(family.default_file()));
        self.directory.join(file)
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            directory: default_font_dir(),
            fallback_family: default_fallback_family(),
            system_fonts: true,
            families: FontFamily::ALL
                .into_iter()
                .map(|family| (family, PathBuf::from(family.default_file())))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// JPEG quality, 1-100
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_jpeg_quality() -> u8 {
    100
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.output.jpeg_quality = config.output.jpeg_quality.clamp(1, 100);
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Pick the config path: the explicit one, else `$IMAGEGENE_CONFIG`
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Load configuration, falling back to defaults on any problem
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = Self::resolve_path(explicit) else {
            tracing::debug!("No config file given, using defaults");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    font_dir = %config.fonts.directory.display(),
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.fonts.directory, PathBuf::from("fonts"));
        assert_eq!(config.fonts.fallback_family, "Arial");
        assert!(config.fonts.system_fonts);
        assert_eq!(config.fonts.families.len(), 5);
        assert_eq!(config.output.jpeg_quality, 100);
    }

    #[test]
    fn test_file_for_default_families() {
        let config = FontConfig::default();
        assert_eq!(
            config.file_for(FontFamily::BoldItalic),
            PathBuf::from("fonts/arialbi.ttf")
        );
        assert_eq!(
            config.file_for(FontFamily::Black),
            PathBuf::from("fonts/arialblk.ttf")
        );
    }

    #[test]
    fn test_parse_partial_overrides() {
        let yaml = r#"
fonts:
  directory: /usr/share/fonts/custom
  families:
    bold: DejaVuSans-Bold.ttf
output:
  jpeg_quality: 85
"#;
        let config = AppConfig::parse(yaml).unwrap();

        assert_eq!(
            config.fonts.file_for(FontFamily::Bold),
            PathBuf::from("/usr/share/fonts/custom/DejaVuSans-Bold.ttf")
        );
        // Unlisted families keep their default file names
        assert_eq!(
            config.fonts.file_for(FontFamily::Regular),
            PathBuf::from("/usr/share/fonts/custom/arial.ttf")
        );
        assert_eq!(config.fonts.fallback_family, "Arial");
        assert_eq!(config.output.jpeg_quality, 85);
    }

    #[test]
    fn test_parse_empty_mapping() {
        assert_eq!(AppConfig::parse("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_jpeg_quality_clamped() {
        let config = AppConfig::parse("output:\n  jpeg_quality: 0\n").unwrap();
        assert_eq!(config.output.jpeg_quality, 1);
    }

    #[test]
    fn test_unknown_family_rejected() {
        let yaml = "fonts:\n  families:\n    condensed: x.ttf\n";
        assert!(matches!(
            AppConfig::parse(yaml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/imagegene.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_falls_back_on_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fonts: [this is not a mapping").unwrap();

        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fonts:\n  system_fonts: false").unwrap();

        let config = AppConfig::load(Some(file.path()));
        assert!(!config.fonts.system_fonts);
    }
}
