use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use ns_registry::{GenesisConfig, RegistryConfig};

/// Everything `nsr apply` reads from its configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub genesis: GenesisConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.registry.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_types::{Address, Amount};
    use std::io::Write;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn full_config() {
        let alice = Address::derive(b"alice");
        let text = format!(
            r#"
[registry]
floor_price = "3"
max_name_length = 32

[[genesis.balances]]
address = "{alice}"
amount = "100"
"#
        );
        let config = AppConfig::parse(&text).unwrap();
        assert_eq!(config.registry.floor_price, Amount::new(3));
        assert_eq!(config.registry.max_name_length, 32);
        assert_eq!(config.registry.max_value_length, 0);
        assert_eq!(config.genesis.balances.len(), 1);
        assert_eq!(config.genesis.balances[0].address, alice);
    }

    #[test]
    fn zero_floor_price_is_rejected() {
        let err = AppConfig::parse("[registry]\nfloor_price = \"0\"\n").unwrap_err();
        assert!(err.to_string().contains("floor_price"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nmax_value_length = 8").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.registry.max_value_length, 8);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = AppConfig::load(Path::new("/nonexistent/nsr.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/nsr.toml"));
    }
}
