//! The session loop and its handle.
//!
//! One spawned task owns the [`Game`] and the [`StateStore`]. Everything
//! that can change state reaches it through a single `select!` loop:
//!
//! - **Commands** from [`SessionHandle`] clones (action, purchase,
//!   snapshot, reset, flush, shutdown), each answered on a oneshot channel.
//! - **Ticks** from a fixed-period timer, one time unit apart.
//! - **Flush deadlines** from the [`FlushScheduler`].
//!
//! Because the loop handles one event at a time, no operation can observe
//! another half-applied, and callers on any task or thread see the same
//! serial order of mutations.
//!
//! # Reset
//!
//! A reset cancels the pending flush, clears the store, installs the
//! default game, and restarts the tick timer from a full period, all inside
//! one loop iteration. No write scheduled for the old state can land after
//! it.
//!
//! # Shutdown
//!
//! [`SessionHandle::shutdown`], or dropping every handle, ends the loop.
//! Any change not yet written is saved before the task finishes.

use std::sync::Arc;

use chrono::Utc;
use clicker_economy::purchase::PurchaseError;
use clicker_economy::{UnknownUpgradePolicy, UpgradeCatalog};
use clicker_store::{StateStore, StoreError};
use clicker_types::{EconomySnapshot, UpgradeId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::game::{ActionOutcome, Game, Purchased};
use crate::persist::FlushScheduler;
use crate::tick;

/// Capacity of the command queue. Senders wait when it is full.
const COMMAND_CAPACITY: usize = 64;

/// Errors returned by [`SessionHandle`] calls.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session loop has stopped.
    #[error("session has stopped")]
    Closed,

    /// A purchase was rejected. State is unchanged.
    #[error("purchase rejected: {source}")]
    Purchase {
        /// The rejection reason.
        #[from]
        source: PurchaseError,
    },

    /// An explicit flush could not be written.
    #[error("save failed: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// Final state of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Economy at the moment the loop stopped.
    pub snapshot: EconomySnapshot,
    /// Ticks processed by this run of the loop.
    pub ticks: u64,
    /// Whether the exit flush succeeded (also true when nothing was pending).
    pub saved_on_exit: bool,
}

/// Requests handled by the session loop.
#[derive(Debug)]
enum Command {
    Action {
        reply: oneshot::Sender<ActionOutcome>,
    },
    Purchase {
        upgrade_id: UpgradeId,
        reply: oneshot::Sender<Result<Purchased, PurchaseError>>,
    },
    Snapshot {
        reply: oneshot::Sender<EconomySnapshot>,
    },
    Reset {
        reply: oneshot::Sender<EconomySnapshot>,
    },
    Flush {
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    Shutdown {
        reply: oneshot::Sender<SessionReport>,
    },
}

/// Cloneable handle for talking to a running session.
///
/// Every call waits only for the loop to process it, never for a timer.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Apply one manual action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn trigger_action(&self) -> Result<ActionOutcome, SessionError> {
        self.request(|reply| Command::Action { reply }).await
    }

    /// Buy one level of `upgrade_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Purchase`] if the purchase is rejected, or
    /// [`SessionError::Closed`] if the session has stopped.
    pub async fn purchase_upgrade(&self, upgrade_id: &str) -> Result<Purchased, SessionError> {
        let upgrade_id = UpgradeId::from(upgrade_id);
        let outcome = self
            .request(|reply| Command::Purchase { upgrade_id, reply })
            .await?;
        Ok(outcome?)
    }

    /// Current economy view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn snapshot(&self) -> Result<EconomySnapshot, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Discard all progress and start over. Returns the fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has stopped.
    pub async fn reset_game(&self) -> Result<EconomySnapshot, SessionError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Write the current state now instead of waiting for the window.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the write fails, or
    /// [`SessionError::Closed`] if the session has stopped.
    pub async fn flush(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::Flush { reply }).await??;
        Ok(())
    }

    /// Stop the session, saving anything pending first.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session had already stopped.
    pub async fn shutdown(&self) -> Result<SessionReport, SessionError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Whether the session loop has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_closed| SessionError::Closed)?;
        response.await.map_err(|_dropped| SessionError::Closed)
    }
}

/// Build the starting [`Game`] from whatever `store` holds.
///
/// A missing record starts a fresh game. An unreadable one is logged and
/// also starts fresh; it is overwritten by the first flush.
pub fn load_game(
    catalog: Arc<UpgradeCatalog>,
    store: &mut dyn StateStore,
    policy: UnknownUpgradePolicy,
) -> Game {
    match store.load() {
        Ok(Some(record)) => Game::restore(catalog, record, policy),
        Ok(None) => {
            info!("No saved game found, starting fresh");
            Game::new(catalog)
        }
        Err(e) => {
            warn!(error = %e, "Saved game unreadable, starting fresh");
            Game::new(catalog)
        }
    }
}

/// Spawn the session loop on the current tokio runtime.
///
/// Returns the handle for issuing commands and the task, which resolves
/// to the [`SessionReport`] once the loop has stopped and flushed.
pub fn spawn_session<S>(
    game: Game,
    store: S,
    config: &SessionConfig,
) -> (SessionHandle, JoinHandle<SessionReport>)
where
    S: StateStore + 'static,
{
    let (commands, receiver) = mpsc::channel(COMMAND_CAPACITY);
    let session = Session::new(game, store, config);
    let task = tokio::spawn(session.run(receiver));
    (SessionHandle { commands }, task)
}

/// State owned by the loop task.
struct Session<S> {
    game: Game,
    store: S,
    ticker: Interval,
    flush: FlushScheduler,
    ticks: u64,
}

impl<S: StateStore> Session<S> {
    fn new(game: Game, store: S, config: &SessionConfig) -> Self {
        let period = config.tick_period();
        let now = Instant::now();
        let mut ticker = time::interval_at(now.checked_add(period).unwrap_or(now), period);
        // Late ticks are all delivered: passive income is owed per period.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        Self {
            game,
            store,
            ticker,
            flush: FlushScheduler::new(config.save_debounce()),
            ticks: 0,
        }
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> SessionReport {
        info!(
            balance = self.game.state().balance,
            per_action_yield = self.game.rates().per_action_yield,
            per_interval_yield = self.game.rates().per_interval_yield,
            "Session started"
        );

        let mut shutdown_reply = None;
        loop {
            let flush_at = self.flush.deadline();
            tokio::select! {
                // Timers first, so a tick that is already due is applied
                // before a command that arrives in the same instant.
                biased;

                _ = self.ticker.tick() => self.on_tick(),

                () = time::sleep_until(flush_at.unwrap_or_else(Instant::now)), if flush_at.is_some() => {
                    let _ = self.flush_now();
                }

                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("All session handles dropped");
                        break;
                    };
                    if let Some(reply) = self.handle(command) {
                        shutdown_reply = Some(reply);
                        break;
                    }
                }
            }
        }

        let saved_on_exit = !self.flush.is_dirty() || self.flush_now().is_ok();
        let report = SessionReport {
            snapshot: self.game.snapshot(),
            ticks: self.ticks,
            saved_on_exit,
        };
        info!(
            ticks = report.ticks,
            balance = report.snapshot.balance,
            lifetime_earned = report.snapshot.lifetime_earned,
            saved_on_exit,
            "Session stopped"
        );
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(report.clone());
        }
        report
    }

    fn on_tick(&mut self) {
        let summary = tick::run_tick(&mut self.game);
        self.ticks = self.ticks.saturating_add(1);
        // Playtime moved even when nothing was credited.
        self.flush.mark_dirty(Instant::now());
        if summary.credited > 0 {
            debug!(
                credited = summary.credited,
                balance = summary.balance,
                "Passive income"
            );
        }
    }

    /// Apply one command. Returns the reply channel when it asks the loop
    /// to stop.
    fn handle(&mut self, command: Command) -> Option<oneshot::Sender<SessionReport>> {
        match command {
            Command::Action { reply } => {
                let outcome = self.game.trigger_action();
                self.flush.mark_dirty(Instant::now());
                let _ = reply.send(outcome);
            }
            Command::Purchase { upgrade_id, reply } => {
                let outcome = self.game.purchase_upgrade(upgrade_id.as_str());
                if outcome.is_ok() {
                    self.flush.mark_dirty(Instant::now());
                }
                let _ = reply.send(outcome);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.game.snapshot());
            }
            Command::Reset { reply } => {
                self.reset();
                let _ = reply.send(self.game.snapshot());
            }
            Command::Flush { reply } => {
                let _ = reply.send(self.flush_now());
            }
            Command::Shutdown { reply } => return Some(reply),
        }
        None
    }

    fn reset(&mut self) {
        self.flush.cancel();
        if let Err(e) = self.store.clear() {
            // The old record is still on disk; overwrite it at the next window.
            warn!(error = %e, "Failed to clear saved game during reset");
            self.flush.mark_dirty(Instant::now());
        }
        self.game.reset();
        self.ticker.reset();
    }

    fn flush_now(&mut self) -> Result<(), StoreError> {
        let mut record = self.game.to_persisted();
        record.saved_at = Some(Utc::now());
        let result = self.store.save(&record);
        match &result {
            Ok(()) => debug!(balance = record.balance, "Game saved"),
            Err(e) => warn!(error = %e, "Save failed, retrying next window"),
        }
        self.flush.flushed(result.is_ok(), Instant::now());
        result
    }
}
