//! Config command - show or edit configuration

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::schema::parse_flag;
use crate::config::{Config, ConfigManager};
use crate::error::{BridgeError, BridgeResult};
use crate::ui::{self, UiContext};

/// Keys accepted by `config set`
const SETTABLE_KEYS: [&str; 15] = [
    "general.log_format",
    "general.audit_log",
    "upstream.base_url",
    "upstream.username",
    "upstream.password",
    "upstream.timeout_secs",
    "upstream.v1_path",
    "upstream.v2_path",
    "upstream.probe_lookup",
    "resolver.enable_mock_data",
    "resolver.use_mock_data_first",
    "resolver.sandbox_applies_to_live",
    "cache.backend",
    "cache.real_data_ttl_secs",
    "cache.mock_data_ttl_secs",
];

/// `effective` carries env overrides; `set` edits only what is on disk
pub async fn execute(
    args: ConfigArgs,
    manager: &ConfigManager,
    effective: &Config,
) -> BridgeResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(effective)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, &key, &value).await?,
    }
    Ok(())
}

/// Copy of the config that is safe to print
fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    if !shown.upstream.password.is_empty() {
        shown.upstream.password = "********".to_string();
    }
    shown
}

fn show_config(config: &Config) -> BridgeResult<()> {
    println!("{}", toml::to_string_pretty(&masked(config))?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> BridgeResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> BridgeResult<()> {
    let ctx = UiContext::detect();
    let mut config = manager.load().await?;

    if !apply_key(&mut config, key, value)? {
        ui::step_error_detail(&ctx, "Unknown config key", key);
        ui::remark(&ctx, "Valid keys:");
        for key in SETTABLE_KEYS {
            ui::remark(&ctx, &format!("  {}", key));
        }
        return Ok(());
    }
    config.validate()?;

    manager.save(&config).await?;
    let shown = if key == "upstream.password" {
        "********"
    } else {
        value
    };
    ui::step_ok(&ctx, &format!("Set {} = {}", key, shown));
    Ok(())
}

/// Returns false for unknown keys
fn apply_key(config: &mut Config, key: &str, value: &str) -> BridgeResult<bool> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["general", "log_format"] => config.general.log_format = value.to_string(),
        ["general", "audit_log"] => config.general.audit_log = parse_flag(key, value)?,

        ["upstream", "base_url"] => config.upstream.base_url = value.to_string(),
        ["upstream", "username"] => config.upstream.username = value.to_string(),
        ["upstream", "password"] => config.upstream.password = value.to_string(),
        ["upstream", "timeout_secs"] => config.upstream.timeout_secs = parse_number(key, value)?,
        ["upstream", "v1_path"] => config.upstream.v1_path = value.to_string(),
        ["upstream", "v2_path"] => config.upstream.v2_path = value.to_string(),
        ["upstream", "probe_lookup"] => config.upstream.probe_lookup = value.to_string(),

        ["resolver", "enable_mock_data"] => {
            config.resolver.enable_mock_data = parse_flag(key, value)?
        }
        ["resolver", "use_mock_data_first"] => {
            config.resolver.use_mock_data_first = parse_flag(key, value)?
        }
        ["resolver", "sandbox_applies_to_live"] => {
            config.resolver.sandbox_applies_to_live = parse_flag(key, value)?
        }

        ["cache", "backend"] => {
            config.cache.backend = value
                .parse()
                .map_err(|e: String| BridgeError::config(format!("{}: {}", key, e)))?
        }
        ["cache", "real_data_ttl_secs"] => {
            config.cache.real_data_ttl_secs = parse_number(key, value)?
        }
        ["cache", "mock_data_ttl_secs"] => {
            config.cache.mock_data_ttl_secs = parse_number(key, value)?
        }

        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_number(key: &str, value: &str) -> BridgeResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| BridgeError::config(format!("{} is not a number: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackend;
    use tempfile::TempDir;

    #[test]
    fn password_is_masked() {
        let mut config = Config::default();
        config.upstream.password = "hunter2".to_string();
        let shown = toml::to_string_pretty(&masked(&config)).unwrap();
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("********"));
    }

    #[test]
    fn apply_known_keys() {
        let mut config = Config::default();
        assert!(apply_key(&mut config, "cache.backend", "memory").unwrap());
        assert!(apply_key(&mut config, "resolver.use_mock_data_first", "yes").unwrap());
        assert!(apply_key(&mut config, "upstream.timeout_secs", "30").unwrap());
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config.resolver.use_mock_data_first);
        assert_eq!(config.upstream.timeout_secs, 30);
    }

    #[test]
    fn apply_rejects_bad_values() {
        let mut config = Config::default();
        assert!(!apply_key(&mut config, "vm.name", "x").unwrap());
        assert!(apply_key(&mut config, "upstream.timeout_secs", "soon").is_err());
        assert!(apply_key(&mut config, "cache.backend", "redis").is_err());
    }

    #[tokio::test]
    async fn set_value_persists() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));

        set_value(&manager, "upstream.username", "school-admin")
            .await
            .unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.upstream.username, "school-admin");
    }

    #[tokio::test]
    async fn set_value_validates() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));

        let err = set_value(&manager, "cache.real_data_ttl_secs", "10")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be shorter"));
        assert!(!manager.path().exists());
    }
}
