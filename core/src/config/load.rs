use std::path::{Path, PathBuf};

use super::env_file::parse_env_file;
use super::types::{AppConfig, BackendConfig};

/// Get the default crewkit data directory: ~/.crewkit
pub fn get_crewkit_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".crewkit"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.crewkit/config.toml (highest)
    let data_dir = get_crewkit_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./crewkit.toml (current directory)
    let local_config = Path::new("crewkit.toml");

    let cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_layers(cfg, &data_dir, |key| std::env::var(key).ok())
}

/// Loads an explicitly named config file, then layers the secrets file and environment.
pub fn load_explicit(path: &Path) -> anyhow::Result<AppConfig> {
    let cfg = load_from_path(path)?;
    apply_env_layers(cfg, &get_crewkit_data_dir()?, |key| std::env::var(key).ok())
}

/// Secrets file first, then `env_lookup` (the process environment in production).
///
/// An empty `env_file` falls back to `./.env`, then `<data_dir>/.env`.
pub fn apply_env_layers<F>(
    mut cfg: AppConfig,
    data_dir: &Path,
    env_lookup: F,
) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if cfg.env_file.trim().is_empty() {
        cfg.env_file = if Path::new(".env").exists() {
            ".env".to_string()
        } else {
            data_dir.join(".env").to_string_lossy().to_string()
        };
    }

    let env_path = PathBuf::from(&cfg.env_file);
    if env_path.exists() {
        let pairs = parse_env_file(&env_path)?;
        tracing::debug!(path = %env_path.display(), keys = pairs.len(), "loaded env file");
        apply_overrides(&mut cfg, |key| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        });
    }
    apply_overrides(&mut cfg, env_lookup);

    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Applies credential and model overrides looked up by variable name.
///
/// The lookup is a closure so callers can feed a parsed secrets file or the
/// process environment; nothing is ever written back to the environment.
pub fn apply_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| lookup(*k))
            .find(|v| !v.trim().is_empty())
    };

    if let Some(v) = get(&["CREWKIT_BACKEND"]) {
        match v.trim() {
            "dry-run" => cfg.backend = BackendConfig::DryRun(Default::default()),
            "openai" if !matches!(cfg.backend, BackendConfig::OpenAi(_)) => {
                cfg.backend = BackendConfig::OpenAi(Default::default())
            }
            _ => {}
        }
    }

    if let BackendConfig::OpenAi(ref mut oai) = cfg.backend {
        if let Some(v) = get(&["CREWKIT_API_KEY", "OPENAI_API_KEY"]) {
            oai.api_key = Some(v);
        }
        if let Some(v) = get(&["CREWKIT_BASE_URL", "OPENAI_BASE_URL"]) {
            oai.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get(&["CREWKIT_MODEL", "MODEL"]) {
            oai.model = v;
        }
    }

    if let Some(v) = get(&["CREWKIT_LOG"]) {
        cfg.logging.level = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn overrides_fill_openai_credentials() {
        let mut cfg = AppConfig::default();
        apply_overrides(
            &mut cfg,
            lookup_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("CREWKIT_BASE_URL", "http://localhost:8080/"),
                ("MODEL", "Llama-3.2-3B-Instruct-Q4_K_M"),
            ]),
        );

        let BackendConfig::OpenAi(oai) = &cfg.backend else {
            panic!("expected openai backend");
        };
        assert_eq!(oai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(oai.base_url, "http://localhost:8080");
        assert_eq!(oai.model, "Llama-3.2-3B-Instruct-Q4_K_M");
    }

    #[test]
    fn crewkit_key_wins_over_openai_key() {
        let mut cfg = AppConfig::default();
        apply_overrides(
            &mut cfg,
            lookup_from(&[("OPENAI_API_KEY", "sk-openai"), ("CREWKIT_API_KEY", "sk-crewkit")]),
        );
        let BackendConfig::OpenAi(oai) = &cfg.backend else {
            panic!("expected openai backend");
        };
        assert_eq!(oai.api_key.as_deref(), Some("sk-crewkit"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let mut cfg = AppConfig::default();
        apply_overrides(&mut cfg, lookup_from(&[("CREWKIT_MODEL", "  ")]));
        let BackendConfig::OpenAi(oai) = &cfg.backend else {
            panic!("expected openai backend");
        };
        assert_eq!(oai.model, "gpt-4o-mini");
    }

    #[test]
    fn backend_switch_to_dry_run() {
        let mut cfg = AppConfig::default();
        apply_overrides(&mut cfg, lookup_from(&[("CREWKIT_BACKEND", "dry-run")]));
        assert_eq!(cfg.backend.provider_name(), "dry-run");
    }

    #[test]
    fn env_file_named_in_config_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = dir.path().join("secrets.env");
        std::fs::write(&secrets, "OPENAI_API_KEY=sk-from-file\nCREWKIT_MODEL=llama3\n").unwrap();
        let cfg = AppConfig {
            env_file: secrets.to_string_lossy().to_string(),
            ..AppConfig::default()
        };

        let cfg = apply_env_layers(cfg, dir.path(), lookup_from(&[("CREWKIT_MODEL", "qwen")])).unwrap();
        let BackendConfig::OpenAi(oai) = &cfg.backend else {
            panic!("expected openai backend");
        };
        assert_eq!(oai.api_key.as_deref(), Some("sk-from-file"));
        assert_eq!(oai.model, "qwen");
    }

    #[test]
    fn missing_env_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig {
            env_file: dir.path().join("absent.env").to_string_lossy().to_string(),
            ..AppConfig::default()
        };
        assert!(apply_env_layers(cfg, dir.path(), lookup_from(&[])).is_ok());
    }

    #[test]
    fn load_from_path_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crewkit.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.logging.level, "debug");
    }
}
