//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Global logging flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::mode::Mode;
use crate::paths::DEFAULT_UNIQUE_START;

/// Recursive, mode-preserving file and directory operations.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Recursive, mode-preserving file and directory operations")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Read settings from this XML file instead of $FSOPS_CONFIG or the default location.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List a directory (materialized, optionally sorted).
    Ls(ListArgs),
    /// Stream a directory walk, one entry per line.
    Walk {
        #[command(flatten)]
        list: ListArgs,
        /// Stop after N entries.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// Copy a file, directory tree or symlink.
    Cp {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dst: PathBuf,
    },
    /// Move (rename, or copy+delete across filesystems).
    Mv {
        #[arg(value_hint = ValueHint::AnyPath)]
        src: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        dst: PathBuf,
    },
    /// Delete a file or a whole tree. Missing paths are fine.
    Rm {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Truncate a file or clear a directory (creating a directory if missing).
    Empty {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Create a directory and its parents.
    Mkdir {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        /// Octal mode applied exactly, e.g. 755 or 0o700.
        #[arg(short, long)]
        mode: Option<Mode>,
    },
    /// Ensure a file exists without touching its content.
    Touch {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        #[arg(short, long)]
        mode: Option<Mode>,
    },
    /// Write DATA to a file, creating parents.
    Write {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        data: String,
        #[arg(short, long)]
        mode: Option<Mode>,
    },
    /// Print a path that does not exist yet, derived from PATH.
    Unique {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        /// First numeric suffix to try.
        #[arg(long, default_value_t = DEFAULT_UNIQUE_START)]
        start: u64,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(value_hint = ValueHint::DirPath)]
    pub path: PathBuf,
    #[arg(short, long)]
    pub recursive: bool,
    /// Regular files only.
    #[arg(long, conflicts_with = "dirs")]
    pub files: bool,
    /// Directories only.
    #[arg(long)]
    pub dirs: bool,
    /// Print root-joined paths instead of relative ones.
    #[arg(long)]
    pub prepend: bool,
    /// Concurrent directory reads (default from config, else 1).
    #[arg(long)]
    pub threads: Option<usize>,
    #[arg(long)]
    pub sort: bool,
    #[arg(long)]
    pub follow_links: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(f) = &self.log_file {
            cfg.log_file = Some(f.clone());
        }
        if self.json {
            cfg.json = true;
        }
        match &self.command {
            Command::Ls(list) | Command::Walk { list, .. } => {
                if let Some(n) = list.threads {
                    cfg.threads = n.max(1);
                }
                if list.follow_links {
                    cfg.follow_links = true;
                }
            }
            _ => {}
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from(["fsops", "ls", "/tmp", "-r", "--debug"]).unwrap();
        assert!(args.debug);
        assert!(matches!(args.command, Command::Ls(ref l) if l.recursive));
    }

    #[test]
    fn mode_parses_octal() {
        let args = Args::try_parse_from(["fsops", "mkdir", "x", "--mode", "0o750"]).unwrap();
        match args.command {
            Command::Mkdir { mode, .. } => assert_eq!(mode, Some(Mode::from(0o750))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bad_mode_is_rejected() {
        assert!(Args::try_parse_from(["fsops", "mkdir", "x", "--mode", "rwx"]).is_err());
    }

    #[test]
    fn overrides_apply() {
        let args =
            Args::try_parse_from(["fsops", "--log-level", "quiet", "walk", ".", "--threads", "0"]).unwrap();
        let mut cfg = Config::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.log_level, LogLevel::Quiet);
        assert_eq!(cfg.threads, 1);
    }

    #[test]
    fn files_and_dirs_conflict() {
        assert!(Args::try_parse_from(["fsops", "ls", ".", "--files", "--dirs"]).is_err());
    }
}
