// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs::File;

use anyhow::{Context, Result};

use crate::export::{default_export_name, write_csv};
use crate::sync::Session;

pub fn handle(session: &Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(session, sub),
        _ => Ok(()),
    }
}

fn export_transactions(session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let transactions = session.store().transactions();
    if transactions.is_empty() {
        println!("No transactions to export");
        return Ok(());
    }
    let out = match sub.get_one::<String>("out") {
        Some(path) => path.clone(),
        None => default_export_name(chrono::Utc::now().date_naive()),
    };
    let file = File::create(&out).with_context(|| format!("Create export file {}", out))?;
    write_csv(file, transactions)?;
    println!("Exported {} transactions to {}", transactions.len(), out);
    Ok(())
}
