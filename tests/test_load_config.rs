use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use article_sync::load_config::load_config;

const VARS: [&str; 5] = [
    "SERVICE_USERNAME",
    "SERVICE_PASSWORD",
    "SERVICE_URL",
    "AUTH_KEY",
    "ARTICLES_DIR",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

/// A static config file plus secrets from the environment produces complete credentials.
#[test]
#[serial]
fn file_values_are_combined_with_env_secrets() {
    clear_env();
    let config_yaml = r#"
articles_dir: ./content/posts
service:
  url: https://cms.example.com
  username: editor
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    env::set_var("SERVICE_PASSWORD", "top-secret");
    env::set_var("AUTH_KEY", "key-1");

    let config = load_config(Some(config_file.path())).expect("Config should load");

    assert_eq!(config.articles_dir, PathBuf::from("./content/posts"));
    assert_eq!(config.credentials.service_url, "https://cms.example.com");
    assert_eq!(config.credentials.username, "editor");
    assert_eq!(config.credentials.password, "top-secret");
    assert_eq!(config.credentials.auth_key, "key-1");
    assert!(config.credentials.is_complete());
    clear_env();
}

#[test]
#[serial]
fn environment_wins_over_the_file() {
    clear_env();
    let config_file = NamedTempFile::new().expect("temp file");
    write(
        config_file.path(),
        "articles_dir: from-file\nservice:\n  url: https://file.example.com\n  username: file-user\n",
    )
    .unwrap();

    env::set_var("SERVICE_URL", "https://env.example.com");
    env::set_var("SERVICE_USERNAME", "  env-user  ");
    env::set_var("ARTICLES_DIR", "from-env");

    let config = load_config(Some(config_file.path())).unwrap();
    assert_eq!(config.credentials.service_url, "https://env.example.com");
    assert_eq!(config.credentials.username, "env-user");
    assert_eq!(config.articles_dir, PathBuf::from("from-env"));
    clear_env();
}

#[test]
#[serial]
fn no_file_and_no_env_gives_blank_credentials() {
    clear_env();
    // Blank values count as unset.
    env::set_var("AUTH_KEY", "   ");

    let config = load_config(None).unwrap();
    assert_eq!(config.articles_dir, PathBuf::from("."));
    assert!(config.credentials.username.is_empty());
    assert!(config.credentials.auth_key.is_empty());
    assert!(config.credentials.require_auth_key().is_err());
    clear_env();
}

#[test]
#[serial]
fn empty_file_is_the_default_config() {
    clear_env();
    let config_file = NamedTempFile::new().expect("temp file");
    let config = load_config(Some(config_file.path())).unwrap();
    assert_eq!(config.articles_dir, PathBuf::from("."));
    assert!(config.credentials.service_url.is_empty());
}

/// If the config file is not valid YAML, load_config errors and reports as such.
#[test]
#[serial]
fn invalid_yaml_is_an_error() {
    clear_env();
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "service: [not, closed").unwrap();

    let err = load_config(Some(config_file.path())).unwrap_err();
    assert!(
        format!("{err:#}").contains("Failed to parse config YAML"),
        "got: {err:#}"
    );
}

#[test]
#[serial]
fn missing_file_is_an_error() {
    clear_env();
    let err = load_config(Some(std::path::Path::new("/no/such/config.yaml"))).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read config file"));
}
