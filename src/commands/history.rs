// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::sync::Session;

pub fn undo(session: &mut Session) -> Result<()> {
    if session.undo()? {
        session.check_budgets()?;
        println!("Undo performed");
    } else {
        println!("Nothing to undo");
    }
    Ok(())
}

pub fn redo(session: &mut Session) -> Result<()> {
    if session.redo()? {
        session.check_budgets()?;
        println!("Redo performed");
    } else {
        println!("Nothing to redo");
    }
    Ok(())
}
