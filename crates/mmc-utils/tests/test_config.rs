//! Tests for configuration handling.

use mmc_ir::{BuildOptions, NamingConvention};
use mmc_utils::{Config, CONFIG_FILE};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_new() {
    let config = Config::new("test-model");
    assert_eq!(config.package.name, "test-model");
    assert_eq!(config.package.version, "0.1.0");
    assert_eq!(config.package.edition, "2024");
    assert_eq!(config.analysis.ref_association, "Reference");
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);

    let mut config = Config::new("test-model");
    config.analysis.naming_conventions = vec![NamingConvention::Snake];
    config.save(&config_path).unwrap();

    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_analysis_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);
    fs::write(
        &config_path,
        "[package]\nname = \"minimal\"\nversion = \"1.0.0\"\n",
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.package.edition, "2024");
    assert_eq!(config.build_options().unwrap(), BuildOptions::default());
}

#[test]
fn test_analysis_section() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);
    fs::write(
        &config_path,
        r#"
[package]
name = "aas"
version = "3.0.0"

[analysis]
ref_association = "ModelReference"
naming_conventions = ["upper_camel", "snake"]
"#,
    )
    .unwrap();

    let options = Config::load(&config_path).unwrap().build_options().unwrap();
    assert_eq!(options.ref_association, "ModelReference");
    assert_eq!(
        options.naming_conventions,
        [NamingConvention::UpperCamel, NamingConvention::Snake]
    );
}

#[test]
fn test_invalid_analysis_is_rejected() {
    let mut config = Config::new("broken");
    config.analysis.ref_association = "Model Reference".to_string();
    let error = config.build_options().unwrap_err();
    assert!(error.to_string().contains("Invalid ref_association"));

    let mut config = Config::new("broken");
    config.analysis.naming_conventions.clear();
    assert!(config.build_options().is_err());
}

#[test]
fn test_unknown_naming_convention_fails_to_parse() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE);
    fs::write(
        &config_path,
        "[package]\nname = \"x\"\nversion = \"0.1.0\"\n\n[analysis]\nnaming_conventions = [\"kebab\"]\n",
    )
    .unwrap();

    assert!(Config::load(&config_path).is_err());
}

#[test]
fn test_config_find_from() {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path();

    let config = Config::new("find-test");
    config.save(project_dir.join(CONFIG_FILE)).unwrap();

    let sub_dir = project_dir.join("model").join("classes");
    fs::create_dir_all(&sub_dir).unwrap();

    let (found_config, found_dir) = Config::find_from(&sub_dir).unwrap();
    assert_eq!(found_config.package.name, "find-test");
    assert_eq!(found_dir, project_dir);
}
