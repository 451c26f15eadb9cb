//! The key-value container models are saved into.

use super::error::CheckpointError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Version identifier for the saved state format
pub const SAVED_STATE_VERSION: u32 = 1;

/// Opaque key-value container handed to `save_state` and `restore_state`.
///
/// Values are stored as JSON text so the container itself can be encoded in
/// either a readable (JSON) or compact (binary) form.
///
/// # Example
///
/// ```rust
/// use tether::checkpoint::SavedState;
///
/// let mut state = SavedState::new();
/// state.put("counter", &42u32).unwrap();
///
/// let bytes = state.to_bytes().unwrap();
/// let restored = SavedState::from_bytes(&bytes).unwrap();
/// assert_eq!(restored.get::<u32>("counter").unwrap(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    /// Saved state format version
    version: u32,

    /// Unique identifier of this container
    id: String,

    /// When an entry was last written
    updated_at: DateTime<Utc>,

    entries: BTreeMap<String, String>,
}

impl Default for SavedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SavedState {
    pub fn new() -> Self {
        Self {
            version: SAVED_STATE_VERSION,
            id: Uuid::new_v4().to_string(),
            updated_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), CheckpointError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))?;
        self.entries.insert(key.to_string(), encoded);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Read the entry under `key`, or `None` if there is none.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CheckpointError> {
        self.entries
            .get(key)
            .map(|encoded| {
                serde_json::from_str(encoded)
                    .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
            })
            .transpose()
    }

    /// Remove the entry under `key`, returning whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let state: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        state.validate()
    }

    /// Encode in the compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode from the compact binary form, rejecting unsupported versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let state: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        state.validate()
    }

    fn validate(self) -> Result<Self, CheckpointError> {
        if self.version != SAVED_STATE_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: SAVED_STATE_VERSION,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Playlist {
        name: String,
        tracks: Vec<u32>,
    }

    fn playlist() -> Playlist {
        Playlist {
            name: "morning".to_string(),
            tracks: vec![3, 1, 4],
        }
    }

    #[test]
    fn new_state_is_empty_and_current_version() {
        let state = SavedState::new();
        assert!(state.is_empty());
        assert_eq!(state.version(), SAVED_STATE_VERSION);
        assert!(!state.id().is_empty());
    }

    #[test]
    fn put_then_get_returns_value() {
        let mut state = SavedState::new();
        state.put("playlist", &playlist()).unwrap();

        assert!(state.contains_key("playlist"));
        assert_eq!(state.get::<Playlist>("playlist").unwrap(), Some(playlist()));
    }

    #[test]
    fn get_missing_key_is_none() {
        let state = SavedState::new();
        assert_eq!(state.get::<String>("absent").unwrap(), None);
    }

    #[test]
    fn get_with_wrong_type_fails() {
        let mut state = SavedState::new();
        state.put("playlist", &playlist()).unwrap();

        let result = state.get::<u64>("playlist");
        assert!(matches!(result, Err(CheckpointError::DeserializationFailed(_))));
    }

    #[test]
    fn remove_reports_whether_entry_existed() {
        let mut state = SavedState::new();
        state.put("key", "value").unwrap();

        assert!(state.remove("key"));
        assert!(!state.remove("key"));
        assert!(state.is_empty());
    }

    #[test]
    fn json_encoding_preserves_entries() {
        let mut state = SavedState::new();
        state.put("playlist", &playlist()).unwrap();

        let json = state.to_json().unwrap();
        let restored = SavedState::from_json(&json).unwrap();

        assert_eq!(restored, state);
    }

    #[test]
    fn binary_encoding_preserves_entries() {
        let mut state = SavedState::new();
        state.put("playlist", &playlist()).unwrap();
        state.put("position", &12u64).unwrap();

        let bytes = state.to_bytes().unwrap();
        let restored = SavedState::from_bytes(&bytes).unwrap();

        assert_eq!(restored, state);
        assert_eq!(restored.keys().collect::<Vec<_>>(), vec!["playlist", "position"]);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut state = SavedState::new();
        state.version = SAVED_STATE_VERSION + 1;
        let json = serde_json::to_string(&state).unwrap();

        let result = SavedState::from_json(&json);
        assert!(matches!(
            result,
            Err(CheckpointError::UnsupportedVersion { found, supported })
                if found == SAVED_STATE_VERSION + 1 && supported == SAVED_STATE_VERSION
        ));
    }

    #[test]
    fn corrupt_bytes_fail_to_decode() {
        let result = SavedState::from_bytes(&[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(CheckpointError::DeserializationFailed(_))));
    }
}
