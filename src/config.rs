use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Rows shown in each console preview.
    pub preview_rows: usize,
    /// Directory the downloadable workbook is written to.
    pub output_dir: String,
    /// How long a generated report stays retrievable.
    pub report_ttl_secs: u64,
    /// Inputs larger than this are refused before parsing.
    pub max_input_bytes: u64,
    pub log_level: String,
}

/// Defaults, then `summarizer.toml` (or `path` when given), then
/// `SUMMARIZER_*` environment variables.
pub fn load_configuration(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(p) => ConfigFile::from(p).required(true),
        None => ConfigFile::with_name("summarizer").required(false),
    };
    Config::builder()
        .set_default("preview_rows", 5_i64)?
        .set_default("output_dir", ".")?
        .set_default("report_ttl_secs", 3600_i64)?
        .set_default("max_input_bytes", 200 * 1024 * 1024_i64)?
        .set_default("log_level", "info")?
        .add_source(file)
        .add_source(Environment::with_prefix("SUMMARIZER"))
        .build()?
        .try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "preview_rows = 12\noutput_dir = \"reports\"\n").unwrap();

        let cfg = load_configuration(Some(path.as_path())).unwrap();
        assert_eq!(cfg.preview_rows, 12);
        assert_eq!(cfg.output_dir, "reports");
        assert_eq!(cfg.report_ttl_secs, 3600);
        assert_eq!(cfg.max_input_bytes, 200 * 1024 * 1024);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_configuration(Some(dir.path().join("absent.toml").as_path())).is_err());
    }
}
