// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// Outward collaborator interface: transient toasts, persistent keyed alerts
/// and a change signal for whatever projects the record store into a view.
pub trait Notifier {
    fn toast(&mut self, message: &str, severity: Severity);

    fn alert(&mut self, message: &str, key: &str);

    fn changed(&mut self) {}
}

/// Console collaborator for the CLI. The view re-renders per invocation, so
/// the change signal has nothing to do here.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn toast(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("{}", message),
            Severity::Warning => eprintln!("warning: {}", message),
        }
    }

    fn alert(&mut self, message: &str, key: &str) {
        println!("ALERT: {}", message);
        println!("  (dismiss with: budgetclip alert dismiss '{}')", key);
    }
}

#[derive(Debug, Default)]
pub struct NotifierLog {
    pub toasts: Vec<(String, Severity)>,
    pub alerts: Vec<(String, String)>,
    pub changes: usize,
}

/// Capturing collaborator; clones share one buffer so a caller can hand a
/// handle to a session and keep reading what was emitted.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    inner: Rc<RefCell<NotifierLog>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Ref<'_, NotifierLog> {
        self.inner.borrow()
    }
}

impl Notifier for MemoryNotifier {
    fn toast(&mut self, message: &str, severity: Severity) {
        self.inner
            .borrow_mut()
            .toasts
            .push((message.to_string(), severity));
    }

    fn alert(&mut self, message: &str, key: &str) {
        self.inner
            .borrow_mut()
            .alerts
            .push((message.to_string(), key.to_string()));
    }

    fn changed(&mut self) {
        self.inner.borrow_mut().changes += 1;
    }
}
