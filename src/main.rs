// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use budgetclip::{cli, commands, mirror, notify, sync};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mirror = mirror::Mirror::open_default()?;
    let mut session = sync::Session::open(mirror, Box::new(notify::ConsoleNotifier))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Mirror initialized at {}", mirror::mirror_path()?.display());
        }
        Some(("auth", sub)) => commands::auth::handle(&mut session, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut session, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut session, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut session, sub)?,
        Some(("currency", sub)) => commands::currency::handle(&mut session, sub)?,
        Some(("report", sub)) => commands::reports::handle(&session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&session, sub)?,
        Some(("undo", _)) => commands::history::undo(&mut session)?,
        Some(("redo", _)) => commands::history::redo(&mut session)?,
        Some(("alert", sub)) => commands::alerts::handle(&mut session, sub)?,
        Some(("sync", _)) => commands::syncer::handle(&mut session)?,
        Some(("doctor", _)) => commands::doctor::handle(&session)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
