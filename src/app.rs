//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler,
//! and dispatches the subcommand to the library.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use fsops::cli::{Args, Command, ListArgs};
use fsops::output as out;
use fsops::{Config, Walk, WalkOptions, load_config, shutdown};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let (mut cfg, source) = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cfg.json)
        .context("initialize logging")?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("received interrupt; stopping");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install interrupt handler")?;
    }

    debug!(?source, ?cfg, "configuration loaded");

    let result = dispatch(&args.command, &cfg);
    if let Err(e) = &result {
        warn!(error = %format!("{e:#}"), "command failed");
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn dispatch(command: &Command, cfg: &Config) -> Result<()> {
    match command {
        Command::Ls(list) => {
            let opts = walk_options(list, cfg);
            let items = if list.files {
                fsops::list_files(&list.path, &opts)?
            } else if list.dirs {
                fsops::list_dirs(&list.path, &opts)?
            } else {
                fsops::list_all(&list.path, &opts)?
            };
            for p in items {
                out::print_user(&p.display().to_string());
            }
        }
        Command::Walk { list, limit } => stream(list, *limit, cfg)?,
        Command::Cp { src, dst } => {
            fsops::copy(src, dst)?;
            info!(src = %src.display(), dst = %dst.display(), "copied");
        }
        Command::Mv { src, dst } => {
            fsops::move_path(src, dst)?;
            info!(src = %src.display(), dst = %dst.display(), "moved");
        }
        Command::Rm { path } => {
            fsops::delete(path)?;
            info!(path = %path.display(), "deleted");
        }
        Command::Empty { path } => {
            fsops::empty(path)?;
            info!(path = %path.display(), "emptied");
        }
        Command::Mkdir { path, mode } => {
            fsops::create_dir(path, *mode)?;
            info!(path = %path.display(), mode = ?mode, "directory ready");
        }
        Command::Touch { path, mode } => {
            let existed = fsops::ensure_file(path, *mode)?;
            info!(path = %path.display(), existed, "file ready");
        }
        Command::Write { path, data, mode } => {
            fsops::create_file(path, data.as_bytes(), *mode)?;
            info!(path = %path.display(), bytes = data.len(), "written");
        }
        Command::Unique { path, start } => {
            let p = fsops::unique_path(path, *start)?;
            out::print_user(&p.display().to_string());
        }
    }
    Ok(())
}

fn walk_options(list: &ListArgs, cfg: &Config) -> WalkOptions {
    let opts = WalkOptions::new()
        .recursive(list.recursive)
        .prepend_dir(list.prepend)
        .threads(cfg.threads)
        .follow_links(cfg.follow_links);
    if list.sort { opts.sorted() } else { opts }
}

/// Print entries as they are discovered. Ctrl-C and `--limit` both end the
/// walk through its abort handle.
fn stream(list: &ListArgs, limit: Option<usize>, cfg: &Config) -> Result<()> {
    let mut opts = walk_options(list, cfg);
    if list.files {
        opts = opts.filter(|e| e.is_file());
    } else if list.dirs {
        opts = opts.filter(|e| e.is_dir());
    }

    let mut walk = Walk::new(&list.path, &opts)?;
    shutdown::register_abort(walk.abort_handle());
    let mut seen = 0usize;
    let outcome = (|| -> Result<()> {
        while limit.is_none_or(|n| seen < n) {
            let Some(item) = walk.next() else { break };
            out::print_user(&item?.display().to_string());
            seen += 1;
        }
        Ok(())
    })();
    walk.abort();
    shutdown::clear_abort();

    if shutdown::is_requested() {
        warn!(entries = seen, "walk interrupted");
    } else {
        debug!(entries = seen, "walk finished");
    }
    outcome
}
