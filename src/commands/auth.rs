// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::sync::{Identity, Session};

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("sign-in", sub)) => {
            let user = sub.get_one::<String>("user").unwrap();
            let server = sub.get_one::<String>("server").unwrap();
            session.sign_in_http(user, server)?;
            println!("Signed in as '{}' against {}", user, server);
        }
        Some(("sign-out", _)) => {
            session.sign_out()?;
            println!("Signed out; using the local mirror");
        }
        Some(("status", _)) => {
            match session.identity() {
                Identity::SignedOut => println!("Signed out (local mirror only)"),
                Identity::SignedIn { user } => {
                    let server = session
                        .mirror()
                        .sync_identity()?
                        .map(|(_, s)| s)
                        .unwrap_or_else(|| "(unsaved)".to_string());
                    println!("Signed in as '{}' against {}", user, server);
                }
            }
            println!("Base currency: {}", session.base_currency());
            println!(
                "{} transactions, {} budgets",
                session.store().transactions().len(),
                session.store().budgets().len()
            );
        }
        _ => {}
    }
    Ok(())
}
