// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::sync::{Identity, Session};

pub fn handle(session: &mut Session) -> Result<()> {
    match session.identity() {
        Identity::SignedIn { .. } => {
            session.pump()?;
            println!("Pulled latest remote snapshots");
        }
        Identity::SignedOut => {
            if session.poll_mirror()? {
                println!("Reloaded local data changed by another session");
            } else {
                println!("Local data already up to date");
            }
        }
    }
    Ok(())
}
