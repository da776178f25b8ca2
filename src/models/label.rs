// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label state machine.
//!
//! Holds the currently active label and switches it on mapped key presses.
//! Unmapped keys are silently ignored; the quit key is the dispatcher's
//! concern and never reaches this component's map.

use std::collections::BTreeMap;

/// The active label and its key bindings.
#[derive(Debug, Clone)]
pub struct LabelState {
    bindings: BTreeMap<char, String>,
    current: String,
}

impl LabelState {
    /// Create a new state machine with the given bindings and start label.
    pub fn new(bindings: BTreeMap<char, String>, default_label: String) -> Self {
        Self {
            bindings,
            current: default_label,
        }
    }

    /// Switch the active label if `code` is a mapped key.
    ///
    /// Returns `true` when the label changed. Any key outside the binding
    /// map (including codes that are not valid characters) is a no-op.
    pub fn on_key(&mut self, code: i32) -> bool {
        let Some(key) = u32::try_from(code).ok().and_then(char::from_u32) else {
            return false;
        };
        match self.bindings.get(&key) {
            Some(label) => {
                self.current = label.clone();
                log::info!("Active label set to '{}'", self.current);
                true
            }
            None => false,
        }
    }

    /// The label applied to subsequent captures.
    pub fn current(&self) -> &str {
        &self.current
    }
}
