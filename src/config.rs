//! Application configuration: YAML file with environment overrides,
//! falling back to the stock checklist defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::errors::HudError;
use crate::policy::AuditPolicy;

const TOGGLE_KEY_ENV: &str = "AUDITHUD_TOGGLE_KEY";
const LCP_BUDGET_ENV: &str = "AUDITHUD_LCP_BUDGET_MS";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HudConfig {
    /// Audit thresholds; defaults mirror the stock checklist.
    pub audit: AuditPolicy,
}

/// Load configuration from the given path, or from
/// `<config_dir>/audithud/config.yaml`, or fall back to defaults.
/// Environment overrides apply last either way.
pub async fn load_config(path: Option<&PathBuf>) -> Result<HudConfig, HudError> {
    let config_path = match path {
        Some(path) => path.clone(),
        None => match dirs::config_dir() {
            Some(mut dir) => {
                dir.push("audithud");
                dir.push("config.yaml");
                dir
            }
            None => {
                warn!("No config directory on this host, using defaults");
                let mut config = HudConfig::default();
                apply_env_overrides(&mut config);
                return Ok(config);
            }
        },
    };

    let mut config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .map_err(|err| HudError::config(err.to_string()))?;
        let config: HudConfig =
            serde_yaml::from_str(&content).map_err(|err| HudError::config(err.to_string()))?;
        info!("Loaded configuration from: {}", config_path.display());
        config
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        HudConfig::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut HudConfig) {
    if let Ok(key) = std::env::var(TOGGLE_KEY_ENV) {
        match key.trim().chars().next() {
            Some(ch) => config.audit.toggle_key = ch.to_ascii_lowercase(),
            None => warn!("Ignoring empty {}", TOGGLE_KEY_ENV),
        }
    }
    if let Ok(budget) = std::env::var(LCP_BUDGET_ENV) {
        match budget.trim().parse::<u64>() {
            Ok(ms) => config.audit.lcp_budget_ms = ms,
            Err(_) => warn!("Ignoring invalid {}: {}", LCP_BUDGET_ENV, budget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_stock_policy() {
        let config = HudConfig::default();
        assert_eq!(config.audit.lcp_budget_ms, 2500);
        assert_eq!(config.audit.toggle_key, 'g');
    }

    #[test]
    fn yaml_overrides_selected_fields() {
        let config: HudConfig = serde_yaml::from_str(
            "audit:\n  lcp_budget_ms: 3000\n  toggle_key: h\n",
        )
        .unwrap();
        assert_eq!(config.audit.lcp_budget_ms, 3000);
        assert_eq!(config.audit.toggle_key, 'h');
        // untouched fields keep their defaults
        assert_eq!(config.audit.min_contrast, 4.5);
    }

    #[test]
    fn env_overrides_apply() {
        std::env::set_var(TOGGLE_KEY_ENV, "Q");
        std::env::set_var(LCP_BUDGET_ENV, "4000");
        let mut config = HudConfig::default();
        apply_env_overrides(&mut config);
        std::env::remove_var(TOGGLE_KEY_ENV);
        std::env::remove_var(LCP_BUDGET_ENV);

        assert_eq!(config.audit.toggle_key, 'q');
        assert_eq!(config.audit.lcp_budget_ms, 4000);
    }
}
