//! # Status polling
//!
//! Keeps a proposal's lifecycle stage fresh by re-reading its on-chain state
//! on a fixed interval.
//!
//! A poller runs as one tokio task. Each tick awaits its read before the
//! next tick is considered, so there is never more than one read in flight
//! and state is only ever replaced by the latest completed read. Polling
//! ends when:
//!
//! * the proposal is processed (no stage can follow `Completed`);
//! * a read fails, the error is published and nothing is retried;
//! * the handle is stopped or dropped.
//!
//! A stopped poller can be spawned again to resume.

use crate::{
    error::StatusError,
    reader::{ProposalReader, ProposalSnapshot},
    settings::PollerSettings,
};
use dao_core::{Clock, LifecycleStage, StageInputs, StatusDeriver, VotingWindow};
use dao_multicall::EthCall;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

/// What subscribers see.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Latest completed read.
    pub snapshot: Option<ProposalSnapshot>,
    /// Stage derived from `snapshot`, `None` until the first read completes.
    pub stage: Option<LifecycleStage>,
    /// Set when a read failed; polling has stopped.
    pub error: Option<Arc<StatusError>>,
    /// Number of completed reads.
    pub fetches: u64,
}

pub struct StatusPoller<T: ?Sized, C> {
    reader: ProposalReader<T>,
    window: VotingWindow,
    clock: C,
    deriver: StatusDeriver,
    interval: Duration,
}

impl<T, C> StatusPoller<T, C>
where
    T: EthCall + ?Sized,
    C: Clock,
{
    pub fn new(
        reader: ProposalReader<T>,
        window: VotingWindow,
        clock: C,
        settings: &PollerSettings,
    ) -> Self {
        StatusPoller {
            reader,
            window,
            clock,
            deriver: settings.deriver(),
            interval: settings.poll_interval(),
        }
    }

    pub fn window(&self) -> VotingWindow {
        self.window
    }

    /// The voting window comes from the off-chain proposal and may only be
    /// known after the poller was created.
    pub fn set_window(&mut self, window: VotingWindow) {
        self.window = window;
    }

    pub fn derive(&self, snapshot: &ProposalSnapshot) -> LifecycleStage {
        let inputs = StageInputs {
            proposal: snapshot.proposal,
            window: self.window,
            tally: snapshot.tally.clone(),
            vote_result: snapshot.vote_result,
            now: self.clock.now(),
        };
        self.deriver.derive(&inputs)
    }

    /// Read once and derive the stage, without any timer.
    pub async fn poll_once(&mut self) -> Result<(ProposalSnapshot, LifecycleStage), StatusError> {
        let snapshot = self.reader.fetch().await?;
        let stage = self.derive(&snapshot);
        debug!(
            proposal = ?self.reader.proposal_id(),
            block = %snapshot.block_number,
            %stage,
            "proposal status refreshed"
        );
        Ok((snapshot, stage))
    }
}

impl<T, C> StatusPoller<T, C>
where
    T: EthCall + ?Sized + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Start polling on the current tokio runtime. The first read happens
    /// right away.
    pub fn spawn(self) -> PollerHandle<T, C> {
        let (state_tx, state_rx) = watch::channel(PollState::default());
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(state_tx, stop_rx));
        PollerHandle {
            state: state_rx,
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    async fn run(
        mut self,
        state: watch::Sender<PollState>,
        mut stop: oneshot::Receiver<()>,
    ) -> Self {
        // a zero period panics in tokio
        let mut ticker = time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let failure = loop {
            tokio::select! {
                biased;
                _ = &mut stop => break None,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = &mut stop => break None,
                outcome = self.poll_once() => outcome,
            };

            match outcome {
                Ok((snapshot, stage)) => {
                    state.send_modify(|current| {
                        current.snapshot = Some(snapshot);
                        current.stage = Some(stage);
                        current.fetches += 1;
                    });
                    if stage.is_final() {
                        info!(
                            proposal = ?self.reader.proposal_id(),
                            "proposal processed, polling ends"
                        );
                        break None;
                    }
                }
                Err(error) => break Some(error),
            }
        };

        // the timer goes before anything is reported
        drop(ticker);

        match failure {
            Some(error) => {
                warn!(proposal = ?self.reader.proposal_id(), %error, "polling stopped on error");
                state.send_modify(|current| current.error = Some(Arc::new(error)));
            }
            None => debug!(proposal = ?self.reader.proposal_id(), "polling task finished"),
        }

        self
    }
}

/// Owner side of a running poller. Dropping it cancels the task.
pub struct PollerHandle<T: ?Sized, C> {
    state: watch::Receiver<PollState>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<StatusPoller<T, C>>>,
}

impl<T: ?Sized, C> PollerHandle<T, C> {
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// A copy of the latest published state.
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// The task ended on its own (completed or failed) or was stopped.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop polling and wait for the task to wind down. Returns the poller
    /// so it can be spawned again, or `None` if the task panicked.
    pub async fn stop(mut self) -> Option<StatusPoller<T, C>> {
        if let Some(stop) = self.stop.take() {
            // the task may have finished already
            let _ = stop.send(());
        }
        let task = self.task.take()?;
        match task.await {
            Ok(poller) => Some(poller),
            Err(error) => {
                warn!(%error, "polling task did not finish cleanly");
                None
            }
        }
    }
}

impl<T: ?Sized, C> Drop for PollerHandle<T, C> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
