use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use fsops::{CONFIG_ENV, ConfigSource, LogLevel, load_config};

#[test]
#[serial]
fn env_var_selects_config_file() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(
        &cfg_path,
        "<config>\n  <log_level>info</log_level>\n  <threads>3</threads>\n</config>\n",
    )
    .unwrap();

    // Set env for this process; serialize to avoid cross-test interference
    unsafe {
        std::env::set_var(CONFIG_ENV, &cfg_path);
    }
    let result = load_config(None);
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    let (cfg, source) = result.unwrap();
    assert_eq!(source, ConfigSource::Env(cfg_path));
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.threads, 3);
}

#[test]
#[serial]
fn explicit_path_beats_env() {
    let td = tempdir().unwrap();
    let env_cfg = td.path().join("env.xml");
    let flag_cfg = td.path().join("flag.xml");
    fs::write(&env_cfg, "<config><json>true</json></config>").unwrap();
    fs::write(&flag_cfg, "<config><json>false</json></config>").unwrap();

    unsafe {
        std::env::set_var(CONFIG_ENV, &env_cfg);
    }
    let result = load_config(Some(&flag_cfg));
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }

    let (cfg, source) = result.unwrap();
    assert_eq!(source, ConfigSource::Explicit(flag_cfg));
    assert!(!cfg.json);
}

#[test]
#[serial]
fn env_pointing_nowhere_is_an_error() {
    let td = tempdir().unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, td.path().join("absent.xml"));
    }
    let result = load_config(None);
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
    assert!(result.is_err());
}

#[test]
#[serial]
fn malformed_env_config_is_an_error() {
    let td = tempdir().unwrap();
    let p = td.path().join("broken.xml");
    fs::write(&p, "<config><threads>many</threads></config>").unwrap();
    unsafe {
        std::env::set_var(CONFIG_ENV, &p);
    }
    let result = load_config(None);
    unsafe {
        std::env::remove_var(CONFIG_ENV);
    }
    assert!(result.is_err());
}
