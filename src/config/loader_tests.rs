//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// RAII guard that removes an environment variable on creation and drop.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
fn default_config_path_contains_notiview_config_toml() {
    if let Some(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(
            path_str.contains("notiview") && path_str.ends_with("config.toml"),
            "got: {}",
            path_str
        );
    }
}

#[test]
fn default_log_path_ends_with_notiview_log() {
    let path = default_log_path();
    assert!(path.to_string_lossy().ends_with("notiview.log"), "got: {:?}", path);
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(result, Ok(None), "Missing config file is not an error");
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("notiview_test_config.toml");
    let toml_content = r#"
theme = "light"
cell_width_px = 9
max_idle_templates = 2
log_file_path = "/tmp/notiview-test.log"

[keybindings]
clear = "Ctrl+k"
"#;
    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("valid TOML")
        .expect("file exists");

    assert_eq!(config.theme, Some("light".to_string()));
    assert_eq!(config.cell_width_px, Some(9));
    assert_eq!(config.max_idle_templates, Some(2));
    assert_eq!(
        config.log_file_path,
        Some(PathBuf::from("/tmp/notiview-test.log"))
    );
    assert_eq!(
        config.keybindings,
        Some(BTreeMap::from([("clear".to_string(), "Ctrl+k".to_string())]))
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("notiview_test_invalid.toml");
    fs::write(&config_path, "this is not valid TOML ][}{").expect("Failed to write config");

    match load_config_file(&config_path) {
        Err(ConfigError::ParseError { path, .. }) => assert_eq!(path, config_path),
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_rejects_unknown_fields() {
    let config_path = env::temp_dir().join("notiview_test_unknown.toml");
    fs::write(&config_path, "follow = true\n").expect("Failed to write config");

    assert!(matches!(
        load_config_file(&config_path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::remove_file(config_path).ok();
}

#[test]
fn merge_config_without_file_uses_defaults() {
    let resolved = merge_config(None);
    assert_eq!(resolved, ResolvedConfig::default());
    assert_eq!(resolved.theme, "dark");
    assert_eq!(resolved.cell_width_px, 7);
    assert_eq!(resolved.max_idle_templates, 8);
}

#[test]
fn merge_config_keeps_defaults_for_missing_fields() {
    let file = ConfigFile {
        theme: Some("high-contrast".to_string()),
        ..ConfigFile::default()
    };
    let resolved = merge_config(Some(file));
    let defaults = ResolvedConfig::default();

    assert_eq!(resolved.theme, "high-contrast");
    assert_eq!(resolved.cell_width_px, defaults.cell_width_px);
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
}

#[test]
fn key_bindings_surface_invalid_overrides() {
    let config = ResolvedConfig {
        keybindings: BTreeMap::from([("scroll_sideways".to_string(), "h".to_string())]),
        ..ResolvedConfig::default()
    };
    assert!(matches!(
        config.key_bindings(),
        Err(ConfigError::InvalidKey { .. })
    ));
}

#[test]
#[serial(notiview_theme)]
fn apply_env_overrides_respects_notiview_theme() {
    let _guard = EnvGuard::new(THEME_ENV);
    env::set_var(THEME_ENV, "light");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result.theme, "light");
}

#[test]
#[serial(notiview_theme)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(THEME_ENV);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(notiview_theme)]
fn cli_theme_beats_env_theme() {
    let _guard = EnvGuard::new(THEME_ENV);
    env::set_var(THEME_ENV, "light");

    let config = apply_cli_overrides(
        apply_env_overrides(ResolvedConfig::default()),
        Some("high-contrast".to_string()),
    );

    assert_eq!(config.theme, "high-contrast");
}

#[test]
#[serial(notiview_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let temp_dir = env::temp_dir();
    let explicit_path = temp_dir.join("notiview_explicit.toml");
    let env_path = temp_dir.join("notiview_env.toml");
    fs::write(&explicit_path, r#"theme = "explicit""#).expect("write explicit config");
    fs::write(&env_path, r#"theme = "from-env""#).expect("write env config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .expect("valid")
        .expect("exists");
    assert_eq!(config.theme, Some("explicit".to_string()));

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(notiview_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let env_path = env::temp_dir().join("notiview_env_only.toml");
    fs::write(&env_path, r#"theme = "from-env""#).expect("write env config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None)
        .expect("valid")
        .expect("exists");
    assert_eq!(config.theme, Some("from-env".to_string()));

    fs::remove_file(env_path).ok();
}

#[test]
#[serial(notiview_config)]
fn load_config_with_precedence_missing_env_file_is_not_an_error() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    env::set_var(CONFIG_ENV, "/nonexistent/notiview.toml");

    assert_eq!(load_config_with_precedence(None), Ok(None));
}
