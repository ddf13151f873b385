// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::TxKind;
use crate::store::{is_default_category, DEFAULT_CATEGORIES};
use crate::sync::Session;
use crate::utils::pretty_table;

pub fn handle(session: &mut Session, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            if is_default_category(name) {
                println!("'{}' is a default category", name);
            } else if session.register_category(name)? {
                println!("Added category '{}'", name);
            } else {
                println!("Category '{}' already registered", name);
            }
        }
        Some(("list", sub)) => {
            if let Some(kind) = sub.get_one::<String>("type") {
                let kind = TxKind::parse(kind)?;
                let data = session
                    .store()
                    .category_options(kind)
                    .into_iter()
                    .map(|c| vec![c])
                    .collect();
                println!("{}", pretty_table(&["Category"], data));
            } else {
                let mut data: Vec<Vec<String>> = DEFAULT_CATEGORIES
                    .iter()
                    .map(|c| vec![c.to_string(), "default".to_string()])
                    .collect();
                for c in session.store().categories() {
                    if !is_default_category(c) {
                        data.push(vec![c.clone(), "custom".to_string()]);
                    }
                }
                println!("{}", pretty_table(&["Category", "Origin"], data));
            }
        }
        _ => {}
    }
    Ok(())
}
