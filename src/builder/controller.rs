//! Builder for constructing controllers.

use crate::builder::error::BuildError;
use crate::checkpoint::ModelSaveRestore;
use crate::controller::LoopController;
use crate::loops::LoopFactory;
use crate::runners::{WorkRunner, WorkRunners};
use std::sync::Arc;

/// Name of the worker thread behind the default work runner.
pub const DEFAULT_VIEW_RUNNER: &str = "tether-view";

/// Builder for constructing controllers with a fluent API.
///
/// The loop factory and the persistence strategy are required. The work
/// runner defaults to a [`SingleThreadWorkRunner`](crate::runners::SingleThreadWorkRunner)
/// named [`DEFAULT_VIEW_RUNNER`].
pub struct ControllerBuilder<M, E> {
    loop_factory: Option<Arc<dyn LoopFactory<M, E>>>,
    save_restore: Option<Arc<dyn ModelSaveRestore<M>>>,
    work_runner: Option<Arc<dyn WorkRunner>>,
}

impl<M, E> ControllerBuilder<M, E>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            loop_factory: None,
            save_restore: None,
            work_runner: None,
        }
    }

    /// Set the factory loops are created from (required).
    pub fn loop_factory<L>(mut self, factory: L) -> Self
    where
        L: LoopFactory<M, E> + 'static,
    {
        self.loop_factory = Some(Arc::new(factory));
        self
    }

    /// Set the model persistence strategy (required).
    pub fn save_restore<S>(mut self, strategy: S) -> Self
    where
        S: ModelSaveRestore<M> + 'static,
    {
        self.save_restore = Some(Arc::new(strategy));
        self
    }

    /// Set the runner models are delivered to the view on.
    pub fn work_runner(mut self, runner: Arc<dyn WorkRunner>) -> Self {
        self.work_runner = Some(runner);
        self
    }

    /// Build the controller.
    /// Returns an error if required parts are missing.
    pub fn build(self) -> Result<LoopController<M, E>, BuildError> {
        let loop_factory = self.loop_factory.ok_or(BuildError::MissingLoopFactory)?;
        let save_restore = self.save_restore.ok_or(BuildError::MissingSaveRestore)?;
        let work_runner = match self.work_runner {
            Some(runner) => runner,
            None => WorkRunners::single_thread(DEFAULT_VIEW_RUNNER)?,
        };

        Ok(LoopController::new(loop_factory, save_restore, work_runner))
    }
}

impl<M, E> Default for ControllerBuilder<M, E>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
