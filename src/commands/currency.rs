// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::sync::Session;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let code = sub.get_one::<String>("code").unwrap();
            session.set_base_currency(code)?;
            println!("Base currency set to {}", session.base_currency());
        }
        _ => println!("Base currency: {}", session.base_currency()),
    }
    Ok(())
}
