//! Build errors for the controller builder.

use thiserror::Error;

/// Errors that can occur when building a controller.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Loop factory not specified. Call .loop_factory(factory) before .build()")]
    MissingLoopFactory,

    #[error("Model persistence not specified. Call .save_restore(strategy) before .build()")]
    MissingSaveRestore,

    #[error("Failed to spawn the default view work runner: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}
