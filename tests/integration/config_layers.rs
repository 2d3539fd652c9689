//! Configuration precedence: defaults, global file, environment, explicit file

use super::test_utils::with_isolated_env;
use bucketbrowser::config::ConfigLoader;
use std::fs;
use tempfile::TempDir;

fn write_global(test_dir: &TempDir, contents: &str) {
    let dir = test_dir.path().join("config").join("bucketbrowser");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_global_file_is_picked_up() {
    let test_dir = TempDir::new().unwrap();
    write_global(&test_dir, "[browser]\nno_value = true\nsplit_width = 100\n");

    let config = with_isolated_env(&test_dir, &[], || ConfigLoader::load(None).unwrap());
    assert!(config.browser.no_value);
    assert_eq!(config.browser.split_width, 100);
    assert_eq!(config.browser.open_timeout, "1s");
}

#[test]
fn test_environment_beats_global_file() {
    let test_dir = TempDir::new().unwrap();
    write_global(&test_dir, "[browser]\nopen_timeout = \"3s\"\n");

    let config = with_isolated_env(
        &test_dir,
        &[("BUCKETBROWSER_BROWSER__OPEN_TIMEOUT", "500ms")],
        || ConfigLoader::load(None).unwrap(),
    );
    assert_eq!(config.browser.open_timeout, "500ms");
}

#[test]
fn test_explicit_file_beats_environment() {
    let test_dir = TempDir::new().unwrap();
    let explicit = test_dir.path().join("explicit.toml");
    fs::write(&explicit, "[browser]\nread_only = true\nopen_timeout = \"2s\"\n").unwrap();

    let config = with_isolated_env(
        &test_dir,
        &[("BUCKETBROWSER_BROWSER__OPEN_TIMEOUT", "500ms")],
        || ConfigLoader::load(Some(&explicit)).unwrap(),
    );
    assert!(config.browser.read_only);
    assert_eq!(config.browser.open_timeout, "2s");
}

#[test]
fn test_global_path_follows_xdg_config_home() {
    let test_dir = TempDir::new().unwrap();
    let path = with_isolated_env(&test_dir, &[], ConfigLoader::global_config_path).unwrap();
    assert!(path.starts_with(test_dir.path().join("config")));
}
