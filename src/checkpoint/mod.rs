//! Model persistence across view and process recreation.
//!
//! A host may tear down a view (and even the whole process) and later
//! recreate it. [`ModelSaveRestore`] is the strategy a controller uses to
//! write its model into a [`SavedState`] before that happens and to read it
//! back afterwards; it also supplies the model a fresh controller starts
//! from.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

pub mod error;
mod saved_state;

pub use error::CheckpointError;
pub use saved_state::{SavedState, SAVED_STATE_VERSION};

/// Default, save and restore strategy for a model.
///
/// Stateless: a controller consults it on `start` (for the default model),
/// `save_state` and `restore_state`, and nowhere else.
pub trait ModelSaveRestore<M>: Send + Sync {
    /// The model to start from when nothing was restored or run before.
    fn default_model(&self) -> M;

    /// Write `model` into `out`.
    fn save_model(&self, model: &M, out: &mut SavedState) -> Result<(), CheckpointError>;

    /// Read a model back out of `input`.
    fn restore_model(&self, input: &SavedState) -> Result<M, CheckpointError>;
}

/// Saves the whole model under a single key using its serde representation.
///
/// Restoring from a container without that key fails with
/// [`CheckpointError::MissingEntry`].
///
/// # Example
///
/// ```rust
/// use tether::checkpoint::{ModelSaveRestore, SavedState, SerdeSaveRestore};
///
/// let strategy = SerdeSaveRestore::new("model", || 0u32);
/// let mut state = SavedState::new();
///
/// strategy.save_model(&7, &mut state).unwrap();
/// assert_eq!(strategy.restore_model(&state).unwrap(), 7);
/// assert_eq!(strategy.default_model(), 0);
/// ```
pub struct SerdeSaveRestore<M, D> {
    key: String,
    default: D,
    _phantom: PhantomData<fn() -> M>,
}

impl<M, D> SerdeSaveRestore<M, D>
where
    D: Fn() -> M,
{
    pub fn new(key: impl Into<String>, default: D) -> Self {
        Self {
            key: key.into(),
            default,
            _phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<M, D> ModelSaveRestore<M> for SerdeSaveRestore<M, D>
where
    M: Serialize + DeserializeOwned,
    D: Fn() -> M + Send + Sync,
{
    fn default_model(&self) -> M {
        (self.default)()
    }

    fn save_model(&self, model: &M, out: &mut SavedState) -> Result<(), CheckpointError> {
        out.put(&self.key, model)
    }

    fn restore_model(&self, input: &SavedState) -> Result<M, CheckpointError> {
        input
            .get(&self.key)?
            .ok_or_else(|| CheckpointError::MissingEntry {
                key: self.key.clone(),
            })
    }
}
