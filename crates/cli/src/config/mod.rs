use clap::Args;
use engine::DigitWidth;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/lotto.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 2 or 3.
    pub width: u8,
    pub level: String,
    pub ledger: String,
    pub pretty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 2,
            level: "info".to_string(),
            ledger: "ledger.json".to_string(),
            pretty: true,
        }
    }
}

impl AppConfig {
    pub fn digit_width(&self) -> Result<DigitWidth> {
        Ok(DigitWidth::try_from(self.width)?)
    }
}

#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the product width (2 or 3).
    #[arg(long, global = true)]
    pub width: Option<u8>,
    /// Override the ledger file path.
    #[arg(long, global = true)]
    pub ledger: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long, global = true)]
    pub level: Option<String>,
    /// Pretty-print JSON output.
    #[arg(long, global = true, conflicts_with = "compact")]
    pub pretty: bool,
    /// Print JSON output on one line.
    #[arg(long, global = true)]
    pub compact: bool,
}

pub fn load(overrides: &Overrides) -> Result<AppConfig> {
    let config_path = overrides.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LOTTO"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(width) = overrides.width {
        settings.width = width;
    }
    if let Some(ledger) = &overrides.ledger {
        settings.ledger = ledger.clone();
    }
    if let Some(level) = &overrides.level {
        settings.level = level.clone();
    }
    if overrides.pretty {
        settings.pretty = true;
    }
    if overrides.compact {
        settings.pretty = false;
    }

    settings.digit_width()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotto.toml");
        std::fs::write(&path, "width = 3\nledger = \"from-file.json\"\n").unwrap();

        let overrides = Overrides {
            config: Some(path.display().to_string()),
            ledger: Some("flag.json".to_string()),
            ..Overrides::default()
        };
        let settings = load(&overrides).unwrap();
        assert_eq!(settings.width, 3);
        assert_eq!(settings.ledger, "flag.json");
        assert_eq!(settings.level, "info");
    }

    #[test]
    fn output_flags_override_pretty_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotto.toml");
        std::fs::write(&path, "pretty = true\n").unwrap();

        let compact = Overrides {
            config: Some(path.display().to_string()),
            compact: true,
            ..Overrides::default()
        };
        assert!(!load(&compact).unwrap().pretty);

        std::fs::write(&path, "pretty = false\n").unwrap();
        let pretty = Overrides {
            config: Some(path.display().to_string()),
            pretty: true,
            ..Overrides::default()
        };
        assert!(load(&pretty).unwrap().pretty);
    }

    #[test]
    fn rejects_unknown_width() {
        let overrides = Overrides {
            config: Some("does-not-exist".to_string()),
            width: Some(4),
            ..Overrides::default()
        };
        assert!(load(&overrides).is_err());
    }
}
