// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::sync::Session;
use crate::utils::pretty_table;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let keys = session.active_alerts();
            if keys.is_empty() {
                println!("No active alerts");
            } else {
                let data = keys.into_iter().map(|k| vec![k]).collect();
                println!("{}", pretty_table(&["Alert Key"], data));
            }
        }
        Some(("dismiss", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            if session.dismiss_alert(key)? {
                println!("Alert dismissed");
            } else {
                println!("No active alert with key '{}'", key);
            }
        }
        _ => {}
    }
    Ok(())
}
