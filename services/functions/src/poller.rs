//! Background dispatcher that runs the schedule pass on a fixed interval.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crm_store::RowStore;

use crate::domain::repository::WorkflowExecutor;
use crate::usecase::schedule::ScheduleAutomationUseCase;

pub struct SchedulePoller<S: RowStore, W: WorkflowExecutor> {
    usecase: ScheduleAutomationUseCase<S, W>,
    poll_interval: Duration,
}

impl<S, W> SchedulePoller<S, W>
where
    S: RowStore,
    W: WorkflowExecutor + 'static,
{
    /// Start polling in the background. The first pass runs immediately.
    pub fn spawn(store: S, executor: W, poll_interval: Duration) -> JoinHandle<()> {
        let poller = Self {
            usecase: ScheduleAutomationUseCase { store, executor },
            poll_interval,
        };
        tokio::spawn(async move {
            poller.start().await;
        })
    }

    async fn start(&self) {
        info!(poll_interval = ?self.poll_interval, "starting schedule poller");

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = self.usecase.execute(Utc::now()).await {
                error!(error = %e, "schedule pass failed");
            }
        }
    }
}

/// How a supervised background task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskExit {
    Returned,
    Panicked,
    Cancelled,
}

/// Wait for `handle` and log its end at `error`. The poller loops forever,
/// so any exit means scheduled automations have stopped firing.
pub async fn supervise(name: &'static str, handle: JoinHandle<()>) -> TaskExit {
    let exit = match handle.await {
        Ok(()) => TaskExit::Returned,
        Err(e) if e.is_panic() => TaskExit::Panicked,
        Err(_) => TaskExit::Cancelled,
    };
    error!(task = name, ?exit, "background task ended");
    exit
}
