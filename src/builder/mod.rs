//! Builder API for ergonomic controller construction.
//!
//! [`ControllerBuilder`] assembles a controller from its collaborators and
//! validates that the required ones are present. [`controller`] and
//! [`mapping_controller`] cover the common case of "a loop, a persistence
//! strategy, and the default view runner".

mod controller;
pub mod error;

pub use controller::{ControllerBuilder, DEFAULT_VIEW_RUNNER};
pub use error::BuildError;

use crate::checkpoint::ModelSaveRestore;
use crate::controller::{LoopController, MappingController};
use crate::loops::LoopFactory;

/// Create a controller delivering models on the default view runner.
///
/// # Example
///
/// ```
/// use tether::builder::controller;
/// use tether::checkpoint::SerdeSaveRestore;
/// use tether::controller::Controller;
/// use tether::loops::UpdateLoopFactory;
///
/// let controller = controller(
///     UpdateLoopFactory::new(|count: &u64, step: u64| count + step),
///     SerdeSaveRestore::new("count", || 0u64),
/// )
/// .unwrap();
///
/// assert!(!controller.is_running());
/// ```
pub fn controller<M, E, L, S>(
    loop_factory: L,
    save_restore: S,
) -> Result<LoopController<M, E>, BuildError>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
    L: LoopFactory<M, E> + 'static,
    S: ModelSaveRestore<M> + 'static,
{
    ControllerBuilder::new()
        .loop_factory(loop_factory)
        .save_restore(save_restore)
        .build()
}

/// Create a controller whose views receive `mapper(model)` instead of the
/// model itself.
///
/// # Example
///
/// ```
/// use tether::builder::mapping_controller;
/// use tether::checkpoint::SerdeSaveRestore;
/// use tether::controller::Controller;
/// use tether::loops::UpdateLoopFactory;
///
/// let controller = mapping_controller(
///     UpdateLoopFactory::new(|count: &u64, step: u64| count + step),
///     SerdeSaveRestore::new("count", || 0u64),
///     |count: u64| format!("{count} items"),
/// )
/// .unwrap();
///
/// assert!(!controller.is_running());
/// ```
pub fn mapping_controller<M, V, E, L, S, F>(
    loop_factory: L,
    save_restore: S,
    mapper: F,
) -> Result<MappingController<LoopController<M, E>, M, V>, BuildError>
where
    M: Clone + Send + 'static,
    V: 'static,
    E: Send + 'static,
    L: LoopFactory<M, E> + 'static,
    S: ModelSaveRestore<M> + 'static,
    F: Fn(M) -> V + Send + Sync + 'static,
{
    Ok(MappingController::new(
        controller(loop_factory, save_restore)?,
        mapper,
    ))
}
