//! Persisted shortcut profiles, one per controller identity.
//!
//! The whole table lives under a single storage key and is rewritten on every
//! mutation. Loading never fails: an unreadable or malformed blob leaves the
//! store empty, and the next successful save replaces it.

use crate::action::ShortcutAction;
use crate::binding::{decode_table, encode_table, ProfileBindings, ProfileTable};
use crate::error::KeymapError;
use crate::storage::{KeyValueStore, MemoryStorage};
use gamepad::{ButtonIndex, ControllerIdentity, ControllerSnapshot};
use tracing::{debug, info, warn};

/// Default storage key of the profile table.
pub const DEFAULT_STORAGE_KEY: &str = "controller_shortcuts";

/// Builder for creating a [`ProfileStore`].
pub struct ProfileStoreBuilder {
    storage: Option<Box<dyn KeyValueStore>>,
    key: String,
    reserved: Vec<ControllerIdentity>,
}

impl ProfileStoreBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            storage: None,
            key: DEFAULT_STORAGE_KEY.to_owned(),
            reserved: Vec::new(),
        }
    }

    /// Set the backing storage. Defaults to an in-memory store.
    pub fn with_storage(mut self, storage: impl KeyValueStore + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Set the key the table is stored under.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Hide an identity from [`ProfileStore::list_profiles`].
    pub fn reserve_identity(mut self, identity: impl Into<ControllerIdentity>) -> Self {
        self.reserved.push(identity.into());
        self
    }

    /// Build the store and load the persisted table.
    pub fn build(self) -> ProfileStore {
        let mut store = ProfileStore {
            storage: self
                .storage
                .unwrap_or_else(|| Box::new(MemoryStorage::new())),
            key: self.key,
            reserved: self.reserved,
            profiles: ProfileTable::new(),
        };
        store.reload();
        store
    }
}

impl Default for ProfileStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Store of button to action bindings keyed by controller identity.
pub struct ProfileStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
    reserved: Vec<ControllerIdentity>,
    profiles: ProfileTable,
}

impl ProfileStore {
    /// Create a new builder.
    pub fn builder() -> ProfileStoreBuilder {
        ProfileStoreBuilder::new()
    }

    /// Bindings of `identity`; empty when no profile exists.
    pub fn get_actions(&self, identity: &ControllerIdentity) -> ProfileBindings {
        self.profiles.get(identity).cloned().unwrap_or_default()
    }

    /// Borrowing lookup; `None` when no profile exists.
    pub fn bindings(&self, identity: &ControllerIdentity) -> Option<&ProfileBindings> {
        self.profiles.get(identity)
    }

    pub fn action_for(
        &self,
        identity: &ControllerIdentity,
        button: ButtonIndex,
    ) -> Option<ShortcutAction> {
        self.profiles.get(identity)?.get(button)
    }

    /// Bind (`Some`) or unbind (`None`) `button` for `identity`, then prune
    /// empty profiles and persist the whole table.
    ///
    /// The in-memory table is updated even when persisting fails.
    pub fn set_action(
        &mut self,
        identity: &ControllerIdentity,
        button: ButtonIndex,
        action: Option<ShortcutAction>,
    ) -> Result<(), KeymapError> {
        if button.is_home() {
            warn!(%identity, "ignoring binding on the reserved home button");
            return Ok(());
        }

        let previous = self
            .profiles
            .entry(identity.clone())
            .or_default()
            .set(button, action);
        self.profiles.retain(|_, bindings| !bindings.is_empty());

        info!(
            %identity,
            %button,
            action = action.map(ShortcutAction::id).unwrap_or("none"),
            previous = previous.map(ShortcutAction::id).unwrap_or("none"),
            "shortcut binding updated"
        );
        self.save()
    }

    /// Stored identities in insertion order, reserved identities excluded.
    pub fn list_profiles(&self) -> Vec<ControllerIdentity> {
        self.profiles
            .keys()
            .filter(|identity| !self.reserved.contains(identity))
            .cloned()
            .collect()
    }

    /// Identities a user can pick a profile for: connected, non-virtual
    /// controllers, de-duplicated and ordered by controller index.
    pub fn selectable_identities(
        &self,
        connected: &[ControllerSnapshot],
    ) -> Vec<ControllerIdentity> {
        let mut controllers: Vec<&ControllerSnapshot> = connected
            .iter()
            .filter(|snapshot| !snapshot.is_virtual)
            .collect();
        controllers.sort_by_key(|snapshot| snapshot.index);

        let mut identities: Vec<ControllerIdentity> = Vec::new();
        for snapshot in controllers {
            if !identities.contains(&snapshot.identity) {
                identities.push(snapshot.identity.clone());
            }
        }
        identities
    }

    /// Re-read the table from storage. Failures leave the store empty.
    pub fn reload(&mut self) {
        self.profiles = match self.storage.load(&self.key) {
            Ok(Some(blob)) => match decode_table(&blob) {
                Ok(table) => table,
                Err(err) => {
                    warn!(key = %self.key, "discarding malformed shortcut profiles: {err}");
                    ProfileTable::new()
                }
            },
            Ok(None) => ProfileTable::new(),
            Err(err) => {
                warn!(key = %self.key, "failed to read shortcut profiles: {err}");
                ProfileTable::new()
            }
        };
        debug!(profiles = self.profiles.len(), "shortcut profiles loaded");
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    fn save(&mut self) -> Result<(), KeymapError> {
        let blob = encode_table(&self.profiles);
        self.storage.save(&self.key, &blob).inspect_err(|err| {
            warn!(key = %self.key, "failed to persist shortcut profiles: {err}");
        })
    }
}
