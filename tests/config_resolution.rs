//! Integration tests for config discovery and environment layering.
//!
//! Every test points `HOME` and `XDG_CONFIG_HOME` at a temp directory so the
//! developer's own config never leaks in.

use std::path::Path;

use gelf::config::{ColorMode, Config, ConfigError};
use gelf::env::Env;
use gelf::models::ProviderName;

fn isolated_env(home: &Path, extra: &[(&str, &str)]) -> Env {
    let home = home.to_string_lossy().to_string();
    let xdg = format!("{home}/.config");
    let mut vars = vec![("HOME".to_string(), home), ("XDG_CONFIG_HOME".to_string(), xdg)];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Env::mock(vars)
}

#[test]
fn defaults_without_any_file() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();

    let config = Config::load(cwd.path(), None, &isolated_env(home.path(), &[])).unwrap();
    assert!(config.source.is_none());
    assert_eq!(config.commit_model(), "gemini-2.5-flash");
    assert_eq!(config.review_model(), "gemini-2.5-pro");
    assert_eq!(config.provider.api_key, None);
}

#[test]
fn project_file_beats_home_file() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".gelf.yml"), "commit:\n  language: german\n").unwrap();
    std::fs::write(cwd.path().join("gelf.yml"), "commit:\n  language: japanese\n").unwrap();

    let config = Config::load(cwd.path(), None, &isolated_env(home.path(), &[])).unwrap();
    assert_eq!(config.commit.language, "japanese");
    assert_eq!(config.source.as_deref(), Some(cwd.path().join("gelf.yml").as_path()));
}

#[test]
fn xdg_file_is_found_before_home_dotfile() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    let xdg_dir = home.path().join(".config").join("gelf");
    std::fs::create_dir_all(&xdg_dir).unwrap();
    std::fs::write(xdg_dir.join("gelf.yml"), "review:\n  max_concurrent: 2\n").unwrap();
    std::fs::write(home.path().join(".gelf.yml"), "review:\n  max_concurrent: 9\n").unwrap();

    let config = Config::load(cwd.path(), None, &isolated_env(home.path(), &[])).unwrap();
    assert_eq!(config.review.max_concurrent, 2);
}

#[test]
fn files_are_not_merged() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(".gelf.yml"), "color: never\n").unwrap();
    std::fs::write(cwd.path().join("gelf.yaml"), "review:\n  language: french\n").unwrap();

    let config = Config::load(cwd.path(), None, &isolated_env(home.path(), &[])).unwrap();
    assert_eq!(config.review.language, "french");
    assert_eq!(config.color, ColorMode::Auto);
}

#[test]
fn explicit_path_skips_discovery() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(cwd.path().join("gelf.yml"), "commit:\n  model: pro\n").unwrap();
    let explicit = home.path().join("custom.yml");
    std::fs::write(&explicit, "model:\n  flash: my-flash\n").unwrap();

    let config =
        Config::load(cwd.path(), Some(&explicit), &isolated_env(home.path(), &[])).unwrap();
    assert_eq!(config.commit_model(), "my-flash");
}

#[test]
fn missing_explicit_path_is_an_error() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("nope.yml");
    let err = Config::load(home.path(), Some(&missing), &isolated_env(home.path(), &[]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn malformed_yaml_names_the_file() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(cwd.path().join("gelf.yml"), "review: [unclosed\n").unwrap();

    let err = Config::load(cwd.path(), None, &isolated_env(home.path(), &[])).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFile { .. }));
    assert!(err.to_string().contains("gelf.yml"));
}

#[test]
fn api_key_precedence() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(cwd.path().join("gelf.yml"), "provider:\n  api_key: from-file\n").unwrap();

    // Provider variable loses to the config file.
    let env = isolated_env(home.path(), &[("GEMINI_API_KEY", "from-provider-var")]);
    let config = Config::load(cwd.path(), None, &env).unwrap();
    assert_eq!(config.provider.api_key.as_deref(), Some("from-file"));

    // Credentials file beats the config file.
    let creds = home.path().join("key.txt");
    std::fs::write(&creds, "from-credentials\n").unwrap();
    let creds_str = creds.to_string_lossy().to_string();
    let env = isolated_env(home.path(), &[("GELF_CREDENTIALS", creds_str.as_str())]);
    let config = Config::load(cwd.path(), None, &env).unwrap();
    assert_eq!(config.provider.api_key.as_deref(), Some("from-credentials"));

    // GELF_API_KEY beats everything.
    let env = isolated_env(
        home.path(),
        &[("GELF_API_KEY", "from-env"), ("GELF_CREDENTIALS", creds_str.as_str())],
    );
    let config = Config::load(cwd.path(), None, &env).unwrap();
    assert_eq!(config.provider.api_key.as_deref(), Some("from-env"));
}

#[test]
fn provider_variable_used_without_other_sources() {
    let home = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();
    let env = isolated_env(
        home.path(),
        &[("GELF_PROVIDER", "anthropic"), ("ANTHROPIC_API_KEY", "sk-ant")],
    );

    let config = Config::load(cwd.path(), None, &env).unwrap();
    assert_eq!(config.provider.name, ProviderName::Anthropic);
    assert_eq!(config.provider.api_key.as_deref(), Some("sk-ant"));
}

#[test]
fn unknown_provider_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let env = isolated_env(home.path(), &[("GELF_PROVIDER", "carrier-pigeon")]);
    let err = Config::load(home.path(), None, &env).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnv { name: "GELF_PROVIDER", .. }));
}

#[test]
fn display_yaml_redacts_the_key() {
    let home = tempfile::tempdir().unwrap();
    let env = isolated_env(home.path(), &[("GELF_API_KEY", "super-secret")]);
    let config = Config::load(home.path(), None, &env).unwrap();

    let shown = config.to_display_yaml();
    assert!(!shown.contains("super-secret"));
    assert!(shown.contains("[REDACTED]"));
}
