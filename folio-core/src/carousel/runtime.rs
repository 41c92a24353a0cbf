//! Tokio wiring for the carousel engine.
//!
//! Timers and frames are spawned tasks that post [`CarouselMessage`]s back to
//! the engine task over an unbounded channel. Cancelling a handle aborts its
//! task; a message that was already in flight carries a ticket the engine no
//! longer recognises and is dropped there.

use folio_model::PortfolioItem;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::CarouselConfig;
use super::engine::{BoxedSurface, CarouselEngine, CarouselSnapshot};
use super::messages::CarouselMessage;
use super::scheduler::{Scheduler, TaskHandle, Ticket};
use super::update::update;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("carousel runtime has stopped")]
    Stopped,
    #[error("carousel runtime task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Spawns timer and frame tasks on the ambient tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<CarouselMessage>,
    frame_interval: Duration,
}

impl TokioScheduler {
    pub fn new(
        tx: mpsc::UnboundedSender<CarouselMessage>,
        frame_interval: Duration,
    ) -> Self {
        Self { tx, frame_interval }
    }
}

/// Aborts the backing task on cancel or drop.
#[derive(Debug)]
pub struct TokioTaskHandle {
    abort: AbortHandle,
}

impl TaskHandle for TokioTaskHandle {
    fn cancel(&mut self) {
        self.abort.abort();
    }
}

impl Drop for TokioTaskHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TokioTaskHandle;

    fn every(&mut self, period: Duration, ticket: Ticket) -> TokioTaskHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(CarouselMessage::AutoAdvance(ticket)).is_err() {
                    break;
                }
            }
        });
        TokioTaskHandle {
            abort: task.abort_handle(),
        }
    }

    fn next_frame(&mut self, ticket: Ticket) -> TokioTaskHandle {
        let tx = self.tx.clone();
        let frame = self.frame_interval;
        let task = tokio::spawn(async move {
            sleep(frame).await;
            let _ = tx.send(CarouselMessage::Frame(ticket));
        });
        TokioTaskHandle {
            abort: task.abort_handle(),
        }
    }
}

/// Engine running on its own task.
#[derive(Debug)]
pub struct CarouselRuntime {
    tx: mpsc::UnboundedSender<CarouselMessage>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl CarouselRuntime {
    /// Mount `surface` with `items` and start processing messages.
    pub fn spawn(
        config: CarouselConfig,
        items: Arc<[PortfolioItem]>,
        surface: BoxedSurface,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(tx.clone(), config.frame_interval());
        let mut engine = CarouselEngine::new(config, scheduler);
        engine.set_items(items);
        engine.attach(surface);

        let (snapshot_tx, snapshots) = watch::channel(engine.snapshot());
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    msg = rx.recv() => {
                        let Some(msg) = msg else { break };
                        update(&mut engine, msg);
                        snapshot_tx.send_replace(engine.snapshot());
                    }
                }
            }
            engine.shutdown();
            snapshot_tx.send_replace(engine.snapshot());
            debug!("carousel runtime stopped");
        });

        Self {
            tx,
            snapshots,
            shutdown,
            task,
        }
    }

    pub fn send(&self, msg: CarouselMessage) -> Result<(), RuntimeError> {
        if self.shutdown.is_cancelled() {
            return Err(RuntimeError::Stopped);
        }
        self.tx.send(msg).map_err(|_| RuntimeError::Stopped)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> CarouselSnapshot {
        *self.snapshots.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshots.clone()
    }

    /// Unmount: cancel every schedule and wait for the engine task to exit.
    pub async fn shutdown(mut self) -> Result<(), RuntimeError> {
        self.shutdown.cancel();
        (&mut self.task).await.map_err(|err| {
            warn!("carousel runtime did not exit cleanly: {err}");
            RuntimeError::from(err)
        })
    }
}

impl Drop for CarouselRuntime {
    /// Dropping the handle unmounts the carousel; the engine task cancels its
    /// timer and frame on the way out.
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
