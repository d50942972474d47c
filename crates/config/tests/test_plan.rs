//! Test plan for the `frontdesk-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use frontdesk_config::{load, validate_base_url, ApiConfig, AppConfig, SessionConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "FRONTDESK_CONFIG",
    "FRONTDESK__API__BASE_URL",
    "FRONTDESK__API__REQUEST_TIMEOUT_SECONDS",
    "FRONTDESK__API__VERIFY_PATH",
    "FRONTDESK__API__USER_AGENT",
    "FRONTDESK__SESSION__TOKEN_PATH",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            vars: Vec::new(),
            original_dir: None,
        }
    }

    fn reset_environment(&mut self) {
        for key in ENV_VARS_TO_RESET {
            self.remove_var(key);
        }
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(&path, contents).expect("failed to write config file");
    path
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.api.base_url, defaults.api.base_url);
    assert_eq!(
        config.api.request_timeout_seconds,
        defaults.api.request_timeout_seconds
    );
    assert_eq!(config.api.verify_path, defaults.api.verify_path);
    assert_eq!(config.session.token_path, defaults.session.token_path);
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "frontdesk.toml",
        r#"
        [api]
        base_url = "https://first.example/api"
        "#,
    );
    write_config_file(
        temp_dir.path(),
        "config/frontdesk.toml",
        r#"
        [api]
        base_url = "https://second.example/api"
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.api.base_url, "https://first.example/api");
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "frontdesk.toml",
        r#"
        [api]
        request_timeout_seconds = 5

        [session]
        token_path = "/var/lib/frontdesk/token"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.api.request_timeout_seconds, 5);
    assert_eq!(config.api.base_url, defaults.api.base_url);
    assert_eq!(config.api.verify_path, defaults.api.verify_path);
    assert_eq!(config.session.token_path, "/var/lib/frontdesk/token");
}

#[test]
#[serial]
fn load_reads_explicit_config_path_from_environment() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    let path = write_config_file(
        temp_dir.path(),
        "elsewhere/custom.toml",
        r#"
        [api]
        verify_path = "auth/me"
        "#,
    );
    ctx.set_var("FRONTDESK_CONFIG", path.display().to_string());

    let config = load().expect("configuration load should honour FRONTDESK_CONFIG");
    assert_eq!(config.api.verify_path, "auth/me");
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "frontdesk.toml",
        r#"
        [api]
        base_url = "http://localhost:5000/api"
        request_timeout_seconds = 10
        "#,
    );

    ctx.set_var("FRONTDESK__API__BASE_URL", "https://hotel.example/api");
    ctx.set_var("FRONTDESK__API__REQUEST_TIMEOUT_SECONDS", "45");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.api.base_url, "https://hotel.example/api");
    assert_eq!(config.api.request_timeout_seconds, 45);
}

#[test]
#[serial]
fn load_rejects_unusable_base_url() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    ctx.set_var("FRONTDESK__API__BASE_URL", "ftp://hotel.example/api");

    let error = load().expect_err("non-http base url should be rejected");
    assert!(
        error.to_string().contains("http or https"),
        "unexpected error message: {error}"
    );
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.reset_environment();
    ctx.set_current_dir(temp_dir.path());

    write_config_file(
        temp_dir.path(),
        "frontdesk.toml",
        r#"
        [api]
        request_timeout_seconds = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
#[serial]
fn resolved_token_path_expands_home_prefix() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.set_var("HOME", temp_dir.path().display().to_string());

    let session = SessionConfig::default();
    assert_eq!(
        session.resolved_token_path(),
        temp_dir.path().join(".frontdesk/session_token")
    );
}

#[test]
fn validate_base_url_rejects_garbage() {
    assert!(validate_base_url("not a url").is_err());
    assert!(validate_base_url("https://hotel.example/api").is_ok());
}

#[test]
fn api_config_defaults_point_at_local_backend() {
    let defaults = ApiConfig::default();
    assert_eq!(defaults.base_url, "http://localhost:5000/api");
    assert_eq!(defaults.verify_path, "protected");
    assert!(defaults.user_agent.starts_with("frontdesk/"));
}
