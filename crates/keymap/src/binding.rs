//! Per-controller button bindings and their persisted JSON form.
//!
//! The persisted blob is a single JSON object keyed by controller identity:
//!
//! ```json
//! { "Xbox Wireless Controller": { "0": "stream-screenshot-capture", "5": "stream-menu-toggle" } }
//! ```
//!
//! Older blobs stored each profile as an array indexed by button ordinal
//! (`[null, "stream-menu-toggle"]`); both forms are accepted on load.

use crate::action::ShortcutAction;
use gamepad::{ButtonIndex, ControllerIdentity};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Button to action bindings of one controller identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileBindings {
    actions: BTreeMap<ButtonIndex, ShortcutAction>,
}

impl ProfileBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, button: ButtonIndex) -> Option<ShortcutAction> {
        self.actions.get(&button).copied()
    }

    /// Bind or unbind `button`. Returns the previous action.
    pub fn set(
        &mut self,
        button: ButtonIndex,
        action: Option<ShortcutAction>,
    ) -> Option<ShortcutAction> {
        match action {
            Some(action) => self.actions.insert(button, action),
            None => self.actions.remove(&button),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Bound buttons in ascending ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (ButtonIndex, ShortcutAction)> + '_ {
        self.actions.iter().map(|(button, action)| (*button, *action))
    }

    fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(button, action)| {
                (
                    button.ordinal().to_string(),
                    Value::String(action.id().to_owned()),
                )
            })
            .collect();
        Value::Object(map)
    }

    fn from_json(value: &Value) -> Option<Self> {
        let mut bindings = ProfileBindings::new();
        match value {
            Value::Object(entries) => {
                for (ordinal, action) in entries {
                    let button = ordinal.parse::<u16>().ok().and_then(ButtonIndex::from_ordinal);
                    bindings.insert_persisted(button, action);
                }
            }
            Value::Array(slots) => {
                for (ordinal, action) in slots.iter().enumerate() {
                    let button = u16::try_from(ordinal).ok().and_then(ButtonIndex::from_ordinal);
                    bindings.insert_persisted(button, action);
                }
            }
            _ => return None,
        }
        Some(bindings)
    }

    fn insert_persisted(&mut self, button: Option<ButtonIndex>, raw: &Value) {
        if raw.is_null() {
            return;
        }
        match (button, raw.as_str().and_then(ShortcutAction::from_id)) {
            (Some(button), Some(action)) if !button.is_home() => {
                self.actions.insert(button, action);
            }
            _ => debug!(?button, %raw, "dropping unknown persisted binding"),
        }
    }
}

impl FromIterator<(ButtonIndex, ShortcutAction)> for ProfileBindings {
    fn from_iter<T: IntoIterator<Item = (ButtonIndex, ShortcutAction)>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// Every stored profile, in insertion order.
pub type ProfileTable = IndexMap<ControllerIdentity, ProfileBindings>;

/// Serialize a whole table. Empty profiles are skipped.
pub fn encode_table(table: &ProfileTable) -> String {
    let map: Map<String, Value> = table
        .iter()
        .filter(|(_, bindings)| !bindings.is_empty())
        .map(|(identity, bindings)| (identity.as_str().to_owned(), bindings.to_json()))
        .collect();
    Value::Object(map).to_string()
}

/// Parse a persisted table.
///
/// Fails (returns `Err`) only when the blob is not a JSON object; malformed
/// individual profiles, unknown buttons and unknown action ids are dropped.
pub fn decode_table(blob: &str) -> Result<ProfileTable, serde_json::Error> {
    let root: Map<String, Value> = serde_json::from_str(blob)?;
    let mut table = ProfileTable::new();
    for (identity, profile) in &root {
        match ProfileBindings::from_json(profile) {
            Some(bindings) if !bindings.is_empty() => {
                table.insert(ControllerIdentity::from(identity.as_str()), bindings);
            }
            Some(_) => {}
            None => debug!(%identity, "dropping malformed persisted profile"),
        }
    }
    Ok(table)
}
