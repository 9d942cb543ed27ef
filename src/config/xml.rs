//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Search order: explicit `--config` path, `$FSOPS_CONFIG`, then the
//!   platform default path.
//!
//! Notes:
//! - An explicitly named file must exist; a missing default file just means
//!   built-in defaults.
//! - Unknown XML fields are a hard error so typos surface early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{CONFIG_ENV, default_config_path};
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    json: Option<bool>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    threads: Option<usize>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    follow_links: Option<bool>,
}

// Custom deserializers that trim surrounding whitespace
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number: '{s}'"))),
    }
}

fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => match s.as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("invalid boolean: '{s}'"))),
        },
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Env(PathBuf),
    Default(PathBuf),
    BuiltIn,
}

// Map XmlConfig -> Config
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref() {
        let s = s.trim();
        if !s.is_empty() {
            cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        }
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    cfg.json = parsed.json.unwrap_or(false);
    cfg.threads = parsed.threads.unwrap_or(1).max(1);
    cfg.follow_links = parsed.follow_links.unwrap_or(false);
    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Resolve and load the effective config file.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, ConfigSource)> {
    if let Some(p) = explicit {
        if !p.exists() {
            bail!("config file '{}' does not exist", p.display());
        }
        let cfg = load_config_from_xml_path(p)?;
        return Ok((cfg, ConfigSource::Explicit(p.to_path_buf())));
    }

    if let Some(p) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        let p = PathBuf::from(p);
        if !p.exists() {
            bail!("{CONFIG_ENV} points to '{}', which does not exist", p.display());
        }
        let cfg = load_config_from_xml_path(&p)?;
        return Ok((cfg, ConfigSource::Env(p)));
    }

    match default_config_path() {
        Some(p) if p.exists() => {
            let cfg = load_config_from_xml_path(&p)?;
            Ok((cfg, ConfigSource::Default(p)))
        }
        other => {
            debug!(path = ?other, "no config file; using built-in defaults");
            Ok((Config::default(), ConfigSource::BuiltIn))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let p = dir.join("config.xml");
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn parses_all_fields() {
        let td = tempdir().unwrap();
        let p = write(
            td.path(),
            "<config>\n  <log_level> debug </log_level>\n  <log_file>/tmp/fsops.log</log_file>\n  <json>true</json>\n  <threads> 4 </threads>\n  <follow_links>yes</follow_links>\n</config>\n",
        );
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file.as_deref(), Some(Path::new("/tmp/fsops.log")));
        assert!(cfg.json);
        assert_eq!(cfg.threads, 4);
        assert!(cfg.follow_links);
    }

    #[test]
    fn empty_config_is_defaults() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config></config>");
        assert_eq!(load_config_from_xml_path(&p).unwrap(), Config::default());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><colour>red</colour></config>");
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"), "got: {err:#}");
    }

    #[test]
    fn zero_threads_become_one() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><threads>0</threads></config>");
        assert_eq!(load_config_from_xml_path(&p).unwrap().threads, 1);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let td = tempdir().unwrap();
        assert!(load_config(Some(&td.path().join("nope.xml"))).is_err());
    }
}
