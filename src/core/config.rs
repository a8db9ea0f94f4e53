use super::rate::Rate;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_ECB_BASE_URL: &str = "https://data-api.ecb.europa.eu/service";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EcbProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub ecb: Option<EcbProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            ecb: Some(EcbProviderConfig {
                base_url: DEFAULT_ECB_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Upstream series key per rate. Replaces the built-in set when present.
    #[serde(default = "Rate::default_series")]
    pub series: BTreeMap<Rate, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            series: Rate::default_series(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "ecbrates", "ecbrates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn ecb_base_url(&self) -> &str {
        self.providers
            .ecb
            .as_ref()
            .map_or(DEFAULT_ECB_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.ecb_base_url(), DEFAULT_ECB_BASE_URL);
        assert_eq!(config.series, Rate::default_series());

        let yaml_str_with_overrides = r#"
providers:
  ecb:
    base_url: "http://example.com/ecb"
series:
  DFR: "FM.D.U2.EUR.4F.KR.DFR.LEV"
  "€STR": "EST.B.EU000A2X2A25.WT"
  ESTR: "EST.B.EU000A2X2A25.WT"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str_with_overrides).unwrap();
        assert_eq!(config.ecb_base_url(), "http://example.com/ecb");
        assert_eq!(config.series.len(), 2);
        assert_eq!(config.series[&Rate::Dfr], "FM.D.U2.EUR.4F.KR.DFR.LEV");
        assert!(config.series.contains_key(&Rate::Estr));
    }

    #[test]
    fn test_series_keys_accept_parse_spellings() {
        let yaml_str = r#"
series:
  dfr: "FM.D.U2.EUR.4F.KR.DFR.LEV"
  MRO_FIXED: "FM.D.U2.EUR.4F.KR.MRR_FR.LEV"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.series[&Rate::Dfr], "FM.D.U2.EUR.4F.KR.DFR.LEV");
        assert_eq!(config.series[&Rate::MroFixed], "FM.D.U2.EUR.4F.KR.MRR_FR.LEV");
    }

    #[test]
    fn test_unknown_rate_is_rejected() {
        let yaml_str = r#"
series:
  SONIA: "IUDSOIA"
"#;
        let result: Result<AppConfig, _> = serde_yaml::from_str(yaml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "providers:\n  ecb:\n    base_url: \"http://localhost:1234\"\n",
        )?;

        let config = AppConfig::load_from_path(&config_path)?;
        assert_eq!(config.ecb_base_url(), "http://localhost:1234");
        assert_eq!(config.series.len(), 6);

        let missing = AppConfig::load_from_path(temp_dir.path().join("missing.yaml"));
        assert!(
            missing
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
        Ok(())
    }
}
