// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use crate::notify::Notifier;

/// Persistent alerts are standing conditions: each key is raised at most
/// once and stays active until explicitly dismissed. Re-triggering an active
/// key is a no-op.
#[derive(Debug, Default)]
pub struct AlertCenter {
    active: BTreeSet<String>,
}

impl AlertCenter {
    pub fn from_keys(active: BTreeSet<String>) -> Self {
        AlertCenter { active }
    }

    pub fn keys(&self) -> &BTreeSet<String> {
        &self.active
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.contains(key)
    }

    pub fn trigger(&mut self, key: &str, message: &str, notifier: &mut dyn Notifier) -> bool {
        if self.active.contains(key) {
            return false;
        }
        self.active.insert(key.to_string());
        notifier.alert(message, key);
        true
    }

    pub fn dismiss(&mut self, key: &str) -> bool {
        self.active.remove(key)
    }
}
