// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::ActionEntry;

pub const MAX_HISTORY: usize = 50;

/// Bounded undo/redo stacks over reversible user actions. Recording a new
/// user action clears the redo stack; replay moves entries between the two
/// stacks and never records.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActionLog {
    undo: VecDeque<ActionEntry>,
    redo: Vec<ActionEntry>,
    #[serde(skip)]
    replaying: bool,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: ActionEntry) {
        if self.replaying {
            return;
        }
        self.undo.push_back(entry);
        if self.undo.len() > MAX_HISTORY {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn pop_undo(&mut self) -> Option<ActionEntry> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<ActionEntry> {
        self.redo.pop()
    }

    pub fn push_redo(&mut self, entry: ActionEntry) {
        self.redo.push(entry);
    }

    /// Return an entry to the undo stack after replay; no trim, no redo
    /// clearing.
    pub fn restore_undo(&mut self, entry: ActionEntry) {
        self.undo.push_back(entry);
    }

    /// Undo and redo must be serialized: a second invocation while a replay
    /// is still pending is ignored, never interleaved.
    pub fn begin_replay(&mut self) -> bool {
        if self.replaying {
            return false;
        }
        self.replaying = true;
        true
    }

    pub fn end_replay(&mut self) {
        self.replaying = false;
    }
}
