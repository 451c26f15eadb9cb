//! The lifecycle-bound controller.

use super::error::ControllerError;
use super::view::{EventConsumer, ViewHandle};
use super::Controller;
use crate::checkpoint::{ModelSaveRestore, SavedState};
use crate::core::{
    Connection, ControllerState, Disposable, LifecycleHistory, LifecycleTransition, Operation,
};
use crate::loops::{Loop, LoopFactory};
use crate::runners::WorkRunner;
use crate::sync::lock;
use chrono::Utc;
use std::mem;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Binds a loop to a view whose lifecycle is driven from outside.
///
/// The controller creates a fresh loop every time it starts and disposes it
/// every time it stops, carrying the latest model across the gap. Models
/// reach the view only through the controller's [`WorkRunner`].
///
/// Dropping a controller tears it down: a running loop is disposed, an
/// attached view is disposed, and so is the work runner.
pub struct LoopController<M, E> {
    id: Uuid,
    loop_factory: Arc<dyn LoopFactory<M, E>>,
    save_restore: Arc<dyn ModelSaveRestore<M>>,
    work_runner: Arc<dyn WorkRunner>,
    phase: Phase<M, E>,
    current_model: Arc<Mutex<Option<M>>>,
    pending_restore: Option<M>,
    history: LifecycleHistory,
}

/// Lifecycle state together with the resources that exist in it.
enum Phase<M, E> {
    Init,
    Created(Attachment<M, E>),
    Running(Attachment<M, E>, ActiveLoop<M, E>),
}

/// What a connected view contributed.
struct Attachment<M, E> {
    view: Arc<ViewHandle<M>>,
    events: EventConsumer<E>,
}

impl<M, E> Attachment<M, E> {
    fn release(self) {
        self.events.close();
        self.view.dispose();
    }
}

struct ActiveLoop<M, E> {
    handle: Arc<dyn Loop<M, E>>,
    subscription: Box<dyn Disposable>,
}

impl<M, E> ActiveLoop<M, E> {
    fn dispose(self) {
        self.subscription.dispose();
        self.handle.dispose();
    }
}

impl<M, E> LoopController<M, E>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
{
    pub fn new(
        loop_factory: Arc<dyn LoopFactory<M, E>>,
        save_restore: Arc<dyn ModelSaveRestore<M>>,
        work_runner: Arc<dyn WorkRunner>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loop_factory,
            save_restore,
            work_runner,
            phase: Phase::Init,
            current_model: Arc::new(Mutex::new(None)),
            pending_restore: None,
            history: LifecycleHistory::new(),
        }
    }

    /// Identifier used to tell controllers apart in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// State-changing operations performed so far.
    pub fn history(&self) -> &LifecycleHistory {
        &self.history
    }

    /// The most recent model a loop emitted, if any loop ever ran.
    pub fn current_model(&self) -> Option<M> {
        lock(&self.current_model).clone()
    }

    fn guard(&self, operation: Operation) -> Result<(), ControllerError> {
        let state = self.state();
        if operation.permitted_from(state) {
            return Ok(());
        }
        tracing::debug!(controller = %self.id, %operation, %state, "rejected lifecycle call");
        Err(ControllerError::IllegalTransition { operation, state })
    }

    fn record(&mut self, operation: Operation, from: ControllerState) {
        let to = operation.target(from);
        self.history = self.history.record(LifecycleTransition {
            operation,
            from,
            to,
            timestamp: Utc::now(),
        });
        tracing::debug!(controller = %self.id, %operation, %from, %to, "lifecycle transition");
    }

    /// Restored model first, then the model of the previous run, then the default.
    fn initial_model(&mut self) -> M {
        if let Some(restored) = self.pending_restore.take() {
            tracing::debug!(controller = %self.id, "starting from restored model");
            return restored;
        }
        if let Some(current) = self.current_model() {
            tracing::debug!(controller = %self.id, "resuming from most recent model");
            return current;
        }
        self.save_restore.default_model()
    }

    fn launch(&self, attachment: &Attachment<M, E>, model: M) -> ActiveLoop<M, E> {
        let handle = self.loop_factory.start_from(model);

        let current = Arc::clone(&self.current_model);
        let runner = Arc::clone(&self.work_runner);
        let view = Arc::clone(&attachment.view);
        let subscription = handle.observe(Box::new(move |model: M| {
            *lock(&current) = Some(model.clone());
            let view = Arc::clone(&view);
            runner.post(Box::new(move || view.deliver(model)));
        }));

        let target = Arc::clone(&handle);
        attachment
            .events
            .forward_to(Arc::new(move |event: E| target.dispatch_event(event)));

        tracing::debug!(controller = %self.id, "loop started");
        ActiveLoop {
            handle,
            subscription,
        }
    }
}

impl<M, E> Controller<M, E> for LoopController<M, E>
where
    M: Clone + Send + 'static,
    E: Send + 'static,
{
    fn connect<V, C>(&mut self, view: V) -> Result<(), ControllerError>
    where
        V: FnOnce(EventConsumer<E>) -> Option<C>,
        C: Connection<M> + 'static,
    {
        self.guard(Operation::Connect)?;

        let events = EventConsumer::new();
        let Some(connection) = view(events.clone()) else {
            events.close();
            tracing::warn!(controller = %self.id, "view factory returned no connection");
            return Err(ControllerError::ContractViolation(
                "view factory returned no connection",
            ));
        };

        self.phase = Phase::Created(Attachment {
            view: Arc::new(ViewHandle::new(Box::new(connection))),
            events,
        });
        self.record(Operation::Connect, ControllerState::Init);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), ControllerError> {
        self.guard(Operation::Disconnect)?;

        match mem::replace(&mut self.phase, Phase::Init) {
            Phase::Created(attachment) => attachment.release(),
            other => {
                self.phase = other;
                return Err(ControllerError::IllegalTransition {
                    operation: Operation::Disconnect,
                    state: self.state(),
                });
            }
        }

        self.pending_restore = None;
        self.record(Operation::Disconnect, ControllerState::Created);
        Ok(())
    }

    fn start(&mut self) -> Result<(), ControllerError> {
        self.guard(Operation::Start)?;

        let attachment = match mem::replace(&mut self.phase, Phase::Init) {
            Phase::Created(attachment) => attachment,
            other => {
                self.phase = other;
                return Err(ControllerError::IllegalTransition {
                    operation: Operation::Start,
                    state: self.state(),
                });
            }
        };

        let model = self.initial_model();
        let active = self.launch(&attachment, model);
        self.phase = Phase::Running(attachment, active);
        self.record(Operation::Start, ControllerState::Created);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ControllerError> {
        self.guard(Operation::Stop)?;

        let attachment = match mem::replace(&mut self.phase, Phase::Init) {
            Phase::Running(attachment, active) => {
                attachment.events.idle();
                active.dispose();
                attachment
            }
            other => {
                self.phase = other;
                return Err(ControllerError::IllegalTransition {
                    operation: Operation::Stop,
                    state: self.state(),
                });
            }
        };

        tracing::debug!(controller = %self.id, "loop disposed");
        self.phase = Phase::Created(attachment);
        self.record(Operation::Stop, ControllerState::Running);
        Ok(())
    }

    fn save_state(&self, out: Option<&mut SavedState>) -> Result<(), ControllerError> {
        self.guard(Operation::SaveState)?;
        let Some(out) = out else {
            return Ok(());
        };

        let model = self
            .pending_restore
            .clone()
            .or_else(|| self.current_model())
            .unwrap_or_else(|| self.save_restore.default_model());
        self.save_restore.save_model(&model, out)?;
        Ok(())
    }

    fn restore_state(&mut self, input: Option<&SavedState>) -> Result<(), ControllerError> {
        self.guard(Operation::RestoreState)?;
        let Some(input) = input else {
            return Ok(());
        };

        self.pending_restore = Some(self.save_restore.restore_model(input)?);
        tracing::debug!(controller = %self.id, "model restored, pending next start");
        Ok(())
    }

    fn state(&self) -> ControllerState {
        match self.phase {
            Phase::Init => ControllerState::Init,
            Phase::Created(_) => ControllerState::Created,
            Phase::Running(..) => ControllerState::Running,
        }
    }
}

impl<M, E> Drop for LoopController<M, E> {
    fn drop(&mut self) {
        match mem::replace(&mut self.phase, Phase::Init) {
            Phase::Init => {}
            Phase::Created(attachment) => attachment.release(),
            Phase::Running(attachment, active) => {
                attachment.events.idle();
                active.dispose();
                attachment.release();
            }
        }
        self.work_runner.dispose();
    }
}
