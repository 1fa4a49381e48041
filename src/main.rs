// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context as _, Result};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use moneydash::commands::{self, Context};
use moneydash::config::{Backend, Config};
use moneydash::{cli, utils};

fn init_logging(m: &clap::ArgMatches) {
    let level = if m.get_flag("quiet") {
        "error"
    } else {
        match m.get_count("verbose") {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn init(config: &Config, explicit: Option<&Path>) -> Result<()> {
    if config.store.backend == Backend::Sqlite {
        let path = config.sqlite_path()?;
        moneydash::db::open_or_init(&path)?;
        println!("Database initialized at {}", path.display());
    }
    let cfg_path = match explicit {
        Some(p) => p.to_path_buf(),
        None => Config::default_path()?,
    };
    if !cfg_path.exists() {
        if let Some(parent) = cfg_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&cfg_path, Config::default_toml())
            .with_context(|| format!("Failed to write {}", cfg_path.display()))?;
        println!("Wrote default config to {}", cfg_path.display());
    }
    Ok(())
}

fn run() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_logging(&matches);
    debug!("moneydash v{}", env!("CARGO_PKG_VERSION"));

    let cfg_path = matches.get_one::<String>("config").map(Path::new);
    let config = Config::resolve(cfg_path)?;
    let today = match matches.get_one::<String>("today") {
        Some(s) => utils::parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let ctx = Context {
        today,
        display: config.display.clone(),
    };

    if let Some(("init", _)) = matches.subcommand() {
        return init(&config, cfg_path);
    }

    let store = config.open_store()?;
    let store = store.as_ref();
    info!(backend = ?config.store.backend, %today, "store opened");

    match matches.subcommand() {
        Some(("income", sub)) => commands::income::handle(store, sub, &ctx)?,
        Some(("expense", sub)) => commands::expenses::handle(store, sub, &ctx)?,
        Some(("reserve", sub)) => commands::reserve::handle(store, sub, &ctx)?,
        Some(("credit", sub)) => commands::credits::handle(store, sub, &ctx)?,
        Some(("service", sub)) => commands::services::handle(store, sub, &ctx)?,
        Some(("budget", sub)) => commands::budget::handle(store, sub, &ctx)?,
        Some(("gift", sub)) => commands::gifts::handle(store, sub, &ctx)?,
        Some(("wallet", sub)) => commands::wallet::handle(store, sub, &ctx)?,
        Some(("balance", sub)) => commands::balance::handle(store, sub, &ctx)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(store, sub, &ctx)?,
        Some(("export", sub)) => commands::exporter::handle(store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
