//! Cancellable scheduling primitives used by the engine.
//!
//! The engine only ever asks for two things: a recurring auto-advance timer
//! and a one-shot "next frame" step. Every request carries a [`Ticket`] that
//! comes back with the callback so late deliveries can be told apart from the
//! live schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    AutoAdvance,
    Frame,
}

/// Identity of one scheduling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub kind: TaskKind,
    pub seq: u64,
}

/// Mints monotonically increasing tickets.
#[derive(Debug, Default, Clone)]
pub struct TicketMint {
    next: u64,
}

impl TicketMint {
    pub fn mint(&mut self, kind: TaskKind) -> Ticket {
        self.next += 1;
        Ticket {
            kind,
            seq: self.next,
        }
    }
}

/// Handle to a scheduled task. `cancel` must be idempotent.
pub trait TaskHandle {
    fn cancel(&mut self);
}

/// Timer / frame source the engine schedules against.
pub trait Scheduler {
    type Handle: TaskHandle;

    /// Fire `ticket` every `period`, first fire one full period from now.
    fn every(&mut self, period: Duration, ticket: Ticket) -> Self::Handle;

    /// Fire `ticket` once on the next animation frame.
    fn next_frame(&mut self, ticket: Ticket) -> Self::Handle;
}

/// Deterministic scheduler: nothing fires until the caller says so.
///
/// Clones share the same queue, so a test can keep one clone while the
/// engine owns another.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

#[derive(Debug, Default)]
struct ManualQueue {
    tasks: Vec<ManualTask>,
    scheduled_timers: usize,
    scheduled_frames: usize,
}

#[derive(Debug)]
struct ManualTask {
    ticket: Ticket,
    period: Option<Duration>,
    cancelled: Arc<AtomicBool>,
}

impl ManualTask {
    fn is_live(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct ManualHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle for ManualHandle {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualQueue> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn push(&self, ticket: Ticket, period: Option<Duration>) -> ManualHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut queue = self.lock();
        match ticket.kind {
            TaskKind::AutoAdvance => queue.scheduled_timers += 1,
            TaskKind::Frame => queue.scheduled_frames += 1,
        }
        queue.tasks.retain(ManualTask::is_live);
        queue.tasks.push(ManualTask {
            ticket,
            period,
            cancelled: cancelled.clone(),
        });
        ManualHandle { cancelled }
    }

    /// Live (not cancelled) recurring timer, if any.
    pub fn live_timer(&self) -> Option<Ticket> {
        self.live(TaskKind::AutoAdvance).into_iter().next()
    }

    /// Period of the live recurring timer.
    pub fn live_timer_period(&self) -> Option<Duration> {
        self.lock()
            .tasks
            .iter()
            .find(|t| t.is_live() && t.ticket.kind == TaskKind::AutoAdvance)
            .and_then(|t| t.period)
    }

    /// Live tickets of `kind` in scheduling order.
    pub fn live(&self, kind: TaskKind) -> Vec<Ticket> {
        self.lock()
            .tasks
            .iter()
            .filter(|t| t.is_live() && t.ticket.kind == kind)
            .map(|t| t.ticket)
            .collect()
    }

    /// Number of live tasks across both kinds.
    pub fn live_count(&self) -> usize {
        self.lock().tasks.iter().filter(|t| t.is_live()).count()
    }

    /// Consume the oldest pending frame. Frames are one-shot.
    pub fn take_frame(&self) -> Option<Ticket> {
        let mut queue = self.lock();
        let pos = queue
            .tasks
            .iter()
            .position(|t| t.is_live() && t.ticket.kind == TaskKind::Frame)?;
        Some(queue.tasks.remove(pos).ticket)
    }

    /// Total timers ever requested.
    pub fn timers_scheduled(&self) -> usize {
        self.lock().scheduled_timers
    }

    /// Total frames ever requested.
    pub fn frames_scheduled(&self) -> usize {
        self.lock().scheduled_frames
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn every(&mut self, period: Duration, ticket: Ticket) -> ManualHandle {
        self.push(ticket, Some(period))
    }

    fn next_frame(&mut self, ticket: Ticket) -> ManualHandle {
        self.push(ticket, None)
    }
}
