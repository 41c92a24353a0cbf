//! Carousel engine: auto-advance, drag, and momentum over one scroll surface.
//!
//! At most one of {auto-advance timer, momentum frame} is scheduled at any
//! instant. Entering a drag cancels both; a settled glide restarts the timer.
//! `current_index` only moves on auto-advance and is never reconciled with
//! the scroll offset a drag or glide leaves behind.

use folio_model::PortfolioItem;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use super::config::CarouselConfig;
use super::mode::{CarouselMode, DragState, ModeKind};
use super::scheduler::{Scheduler, TaskHandle, TaskKind, Ticket, TicketMint};
use super::surface::{ScrollBehavior, ScrollSurface};

/// Boxed surface the engine can own on any thread.
pub type BoxedSurface = Box<dyn ScrollSurface + Send>;

struct Scheduled<H> {
    ticket: Ticket,
    handle: H,
}

/// Point-in-time view of the engine for renderers and observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarouselSnapshot {
    pub current_index: Option<usize>,
    pub scroll_offset: f32,
    pub mode: ModeKind,
    pub velocity: f32,
    pub item_count: usize,
    pub auto_scheduled: bool,
    pub momentum_scheduled: bool,
}

impl Default for CarouselSnapshot {
    fn default() -> Self {
        Self {
            current_index: None,
            scroll_offset: 0.0,
            mode: ModeKind::Auto,
            velocity: 0.0,
            item_count: 0,
            auto_scheduled: false,
            momentum_scheduled: false,
        }
    }
}

pub struct CarouselEngine<S: Scheduler> {
    config: CarouselConfig,
    scheduler: S,
    surface: Option<BoxedSurface>,
    items: Arc<[PortfolioItem]>,
    current_index: usize,
    mode: CarouselMode,
    auto_timer: Option<Scheduled<S::Handle>>,
    momentum_frame: Option<Scheduled<S::Handle>>,
    tickets: TicketMint,
}

impl<S: Scheduler> fmt::Debug for CarouselEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselEngine")
            .field("config", &self.config)
            .field("mounted", &self.surface.is_some())
            .field("items", &self.items.len())
            .field("current_index", &self.current_index)
            .field("mode", &self.mode)
            .field("auto_scheduled", &self.auto_timer.is_some())
            .field("momentum_scheduled", &self.momentum_frame.is_some())
            .finish()
    }
}

impl<S: Scheduler> CarouselEngine<S> {
    pub fn new(config: CarouselConfig, scheduler: S) -> Self {
        Self {
            config,
            scheduler,
            surface: None,
            items: Arc::from(Vec::new()),
            current_index: 0,
            mode: CarouselMode::Auto,
            auto_timer: None,
            momentum_frame: None,
            tickets: TicketMint::default(),
        }
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn items(&self) -> &Arc<[PortfolioItem]> {
        &self.items
    }

    pub fn mode(&self) -> CarouselMode {
        self.mode
    }

    /// Current velocity, 0 when the mode does not track one.
    pub fn velocity(&self) -> f32 {
        self.mode.velocity().unwrap_or(0.0)
    }

    /// Item last targeted by auto-advance; `None` for an empty list.
    pub fn current_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.current_index)
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_auto_scheduled(&self) -> bool {
        self.auto_timer.is_some()
    }

    pub fn is_momentum_scheduled(&self) -> bool {
        self.momentum_frame.is_some()
    }

    pub fn scroll_offset(&self) -> Option<f32> {
        self.surface.as_ref().map(|s| s.scroll_offset())
    }

    pub fn surface(&self) -> Option<&(dyn ScrollSurface + Send)> {
        self.surface.as_deref()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            current_index: self.current_index(),
            scroll_offset: self.scroll_offset().unwrap_or(0.0),
            mode: self.mode.kind(),
            velocity: self.velocity(),
            item_count: self.items.len(),
            auto_scheduled: self.is_auto_scheduled(),
            momentum_scheduled: self.is_momentum_scheduled(),
        }
    }

    // ---- lifecycle ----

    /// Mount the scroll container and start auto-advance if possible.
    pub fn attach(&mut self, mut surface: BoxedSurface) {
        self.cancel_all();
        self.mode = CarouselMode::Auto;
        surface.sync_len(self.items.len());
        self.surface = Some(surface);
        debug!(items = self.items.len(), "carousel surface attached");
        self.schedule_auto();
    }

    /// Unmount the container, tearing down every schedule.
    pub fn detach(&mut self) -> Option<BoxedSurface> {
        self.cancel_all();
        self.mode = CarouselMode::Auto;
        let surface = self.surface.take();
        if surface.is_some() {
            debug!("carousel surface detached");
        }
        surface
    }

    /// Replace the item list. A list with a new identity resets the index
    /// and restarts auto-advance from a fresh interval.
    pub fn set_items(&mut self, items: Arc<[PortfolioItem]>) {
        if Arc::ptr_eq(&self.items, &items) {
            return;
        }
        self.cancel_all();
        self.mode = CarouselMode::Auto;
        self.current_index = 0;
        self.items = items;
        if let Some(surface) = self.surface.as_mut() {
            surface.sync_len(self.items.len());
        }
        debug!(items = self.items.len(), "carousel items replaced");
        self.schedule_auto();
    }

    /// Ensure auto-advance is running when nothing else is.
    pub fn start(&mut self) {
        if matches!(self.mode, CarouselMode::Auto) && self.auto_timer.is_none() {
            self.schedule_auto();
        }
    }

    /// Cancel everything and drop the surface.
    pub fn shutdown(&mut self) {
        self.detach();
    }

    /// Propagate a container resize and re-evaluate the viewport gate.
    pub fn resize(&mut self, viewport_extent: f32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.resize(viewport_extent);
        if !matches!(self.mode, CarouselMode::Auto) {
            return;
        }
        if self.can_auto_advance() {
            if self.auto_timer.is_none() {
                self.schedule_auto();
            }
        } else {
            self.cancel_auto();
        }
    }

    // ---- input ----

    pub fn pointer_down(&mut self, x: f32) {
        self.begin_drag(x);
    }

    pub fn pointer_move(&mut self, x: f32) {
        self.drag_to(x);
    }

    pub fn pointer_up(&mut self) {
        self.release();
    }

    pub fn pointer_leave(&mut self) {
        self.release();
    }

    pub fn touch_start(&mut self, x: f32) {
        self.begin_drag(x);
    }

    pub fn touch_move(&mut self, x: f32) {
        self.drag_to(x);
    }

    pub fn touch_end(&mut self) {
        self.release();
    }

    fn begin_drag(&mut self, x: f32) {
        if self.items.is_empty() {
            return;
        }
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let baseline = surface.scroll_offset();
        self.cancel_all();
        self.mode = CarouselMode::Dragging(DragState {
            start_x: x,
            baseline,
            velocity: 0.0,
        });
        trace!(x, baseline, "drag started");
    }

    fn drag_to(&mut self, x: f32) {
        let CarouselMode::Dragging(drag) = &mut self.mode else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let delta = (x - drag.start_x) * self.config.drag_gain;
        let target = drag.baseline - delta;
        let previous = surface.scroll_offset();
        surface.set_scroll_offset(target);
        drag.velocity = target - previous;
        trace!(x, target, velocity = drag.velocity, "drag moved");
    }

    fn release(&mut self) {
        let CarouselMode::Dragging(drag) = self.mode else {
            return;
        };
        self.mode = CarouselMode::Momentum {
            velocity: drag.velocity,
        };
        debug!(velocity = drag.velocity, "drag released, gliding");
        self.schedule_frame();
    }

    // ---- scheduled callbacks ----

    /// Auto-advance timer fired.
    pub fn on_auto_advance(&mut self, ticket: Ticket) {
        if !self
            .auto_timer
            .as_ref()
            .is_some_and(|t| t.ticket == ticket)
        {
            trace!(?ticket, "stale auto-advance ignored");
            return;
        }
        if self.items.is_empty() {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        self.current_index = (self.current_index + 1) % self.items.len();
        if let Some(offset) = surface.item_offset(self.current_index) {
            surface.scroll_to(offset, ScrollBehavior::Smooth);
        }
        debug!(index = self.current_index, "auto-advanced");
    }

    /// Momentum animation frame fired.
    pub fn on_frame(&mut self, ticket: Ticket) {
        if !self
            .momentum_frame
            .as_ref()
            .is_some_and(|f| f.ticket == ticket)
        {
            trace!(?ticket, "stale frame ignored");
            return;
        }
        // One-shot: it has fired, nothing left to cancel.
        self.momentum_frame = None;

        let CarouselMode::Momentum { velocity } = self.mode else {
            return;
        };
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let offset = surface.scroll_offset() + velocity;
        surface.set_scroll_offset(offset);
        let velocity = velocity * self.config.decay;

        if velocity.abs() > self.config.min_velocity {
            self.mode = CarouselMode::Momentum { velocity };
            self.schedule_frame();
        } else {
            self.mode = CarouselMode::Auto;
            debug!("momentum settled, resuming auto-advance");
            self.schedule_auto();
        }
    }

    // ---- scheduling ----

    fn can_auto_advance(&self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.surface.as_ref().is_some_and(|s| {
            self.config.auto_advance_enabled_for(s.viewport_extent())
        })
    }

    fn schedule_auto(&mut self) {
        self.cancel_auto();
        if !self.can_auto_advance() {
            return;
        }
        let ticket = self.tickets.mint(TaskKind::AutoAdvance);
        let handle = self
            .scheduler
            .every(self.config.auto_advance_interval(), ticket);
        self.auto_timer = Some(Scheduled { ticket, handle });
        trace!(?ticket, "auto-advance scheduled");
    }

    fn schedule_frame(&mut self) {
        self.cancel_momentum();
        let ticket = self.tickets.mint(TaskKind::Frame);
        let handle = self.scheduler.next_frame(ticket);
        self.momentum_frame = Some(Scheduled { ticket, handle });
    }

    fn cancel_auto(&mut self) {
        if let Some(mut timer) = self.auto_timer.take() {
            timer.handle.cancel();
        }
    }

    fn cancel_momentum(&mut self) {
        if let Some(mut frame) = self.momentum_frame.take() {
            frame.handle.cancel();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel_auto();
        self.cancel_momentum();
    }
}

impl<S: Scheduler> Drop for CarouselEngine<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::scheduler::ManualScheduler;
    use crate::carousel::surface::StripLayout;
    use std::time::Duration;

    fn items(n: usize) -> Arc<[PortfolioItem]> {
        (0..n)
            .map(|i| {
                PortfolioItem::new(
                    format!("item-{i}"),
                    format!("Project {i}"),
                    "desc",
                    format!("https://img.example/{i}.png"),
                )
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn mounted(
        config: CarouselConfig,
        n: usize,
    ) -> (CarouselEngine<ManualScheduler>, ManualScheduler) {
        let sched = ManualScheduler::new();
        let mut engine = CarouselEngine::new(config, sched.clone());
        engine.set_items(items(n));
        engine.attach(Box::new(StripLayout::new(300.0, 200.0, 20.0)));
        (engine, sched)
    }

    fn fire_auto(
        engine: &mut CarouselEngine<ManualScheduler>,
        sched: &ManualScheduler,
    ) {
        let ticket = sched.live_timer().expect("auto timer should be live");
        engine.on_auto_advance(ticket);
    }

    /// Drain momentum frames, returning how many ran.
    fn run_momentum(
        engine: &mut CarouselEngine<ManualScheduler>,
        sched: &ManualScheduler,
    ) -> u32 {
        let mut steps = 0;
        while let Some(frame) = sched.take_frame() {
            engine.on_frame(frame);
            steps += 1;
            assert!(steps < 10_000, "momentum never settled");
        }
        steps
    }

    #[test]
    fn auto_advance_visits_next_items_and_wraps() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 3);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(sched.live_timer_period(), Some(Duration::from_millis(4_000)));

        let mut seen = Vec::new();
        for _ in 0..3 {
            fire_auto(&mut engine, &sched);
            seen.push(engine.current_index().unwrap());
        }
        assert_eq!(seen, vec![1, 2, 0]);
    }

    #[test]
    fn auto_advance_scrolls_item_leading_edge_into_view() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 3);
        fire_auto(&mut engine, &sched);
        assert_eq!(engine.scroll_offset(), Some(220.0));
        fire_auto(&mut engine, &sched);
        // Leading edge is 440, clamped to the container's max scroll.
        assert_eq!(engine.scroll_offset(), Some(340.0));
        fire_auto(&mut engine, &sched);
        assert_eq!(engine.scroll_offset(), Some(0.0));
    }

    #[test]
    fn n_fires_return_to_start_for_any_length() {
        for n in 1..=7 {
            let (mut engine, sched) = mounted(CarouselConfig::default(), n);
            fire_auto(&mut engine, &sched);
            let start = engine.current_index();
            for _ in 0..n {
                fire_auto(&mut engine, &sched);
            }
            assert_eq!(engine.current_index(), start, "length {n}");
        }
    }

    #[test]
    fn empty_list_schedules_nothing() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 0);
        engine.start();
        engine.pointer_down(10.0);
        engine.pointer_move(50.0);
        engine.pointer_up();

        assert_eq!(engine.current_index(), None);
        assert_eq!(engine.mode(), CarouselMode::Auto);
        assert_eq!(sched.timers_scheduled(), 0);
        assert_eq!(sched.frames_scheduled(), 0);
    }

    #[test]
    fn missing_surface_makes_every_operation_a_noop() {
        let sched = ManualScheduler::new();
        let mut engine = CarouselEngine::new(CarouselConfig::default(), sched.clone());
        engine.set_items(items(3));
        engine.start();
        engine.touch_start(100.0);
        engine.touch_move(20.0);
        engine.touch_end();
        engine.resize(400.0);

        assert_eq!(engine.scroll_offset(), None);
        assert_eq!(engine.mode(), CarouselMode::Auto);
        assert_eq!(sched.timers_scheduled(), 0);
        assert_eq!(sched.frames_scheduled(), 0);
    }

    #[test]
    fn drag_applies_gain_against_baseline() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 3);
        engine.pointer_down(100.0);
        assert!(!engine.is_auto_scheduled());
        assert_eq!(sched.live_count(), 0);

        engine.pointer_move(70.0);
        assert_eq!(engine.scroll_offset(), Some(45.0));
        assert_eq!(engine.velocity(), 45.0);

        engine.pointer_move(60.0);
        assert_eq!(engine.scroll_offset(), Some(60.0));
        assert_eq!(engine.velocity(), 15.0);
    }

    #[test]
    fn momentum_decays_then_resumes_auto_once() {
        let config = CarouselConfig {
            drag_gain: 2.0,
            ..Default::default()
        };
        let (mut engine, sched) = mounted(config, 20);
        engine.pointer_down(100.0);
        engine.pointer_move(95.0);
        assert_eq!(engine.velocity(), 10.0);

        let timers_before = sched.timers_scheduled();
        engine.pointer_up();
        assert_eq!(engine.mode(), CarouselMode::Momentum { velocity: 10.0 });
        assert!(engine.is_momentum_scheduled());
        assert!(!engine.is_auto_scheduled());

        let steps = run_momentum(&mut engine, &sched);
        assert_eq!(steps, config.momentum_step_bound(10.0));
        assert_eq!(engine.mode(), CarouselMode::Auto);
        assert_eq!(sched.timers_scheduled(), timers_before + 1);
        assert_eq!(sched.live_timer_period(), Some(Duration::from_millis(4_000)));

        // Glide sum: 10 * (1 - 0.95^59) / 0.05 ~= 190.3 on top of the drag.
        let offset = engine.scroll_offset().unwrap();
        assert!((offset - 200.3).abs() < 0.5, "offset {offset}");
    }

    #[test]
    fn momentum_terminates_within_log_bound() {
        for decay in [0.5_f32, 0.8, 0.95, 0.99] {
            for v0 in [0.6_f32, 3.0, 10.0, 42.0, 250.0] {
                let config = CarouselConfig {
                    drag_gain: 1.0,
                    decay,
                    ..Default::default()
                };
                let (mut engine, sched) = mounted(config, 50);
                engine.pointer_down(0.0);
                engine.pointer_move(-v0);
                assert_eq!(engine.velocity(), v0);

                let timers_before = sched.timers_scheduled();
                engine.pointer_leave();
                let steps = run_momentum(&mut engine, &sched);
                assert!(
                    steps <= config.momentum_step_bound(v0),
                    "decay {decay} v0 {v0}: {steps} steps"
                );
                assert_eq!(sched.timers_scheduled(), timers_before + 1);
                assert!(engine.is_auto_scheduled());
            }
        }
    }

    #[test]
    fn never_more_than_one_schedule_alive() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 5);
        let check = |engine: &CarouselEngine<ManualScheduler>| {
            assert!(sched.live_count() <= 1);
            assert!(!(engine.is_auto_scheduled() && engine.is_momentum_scheduled()));
        };

        check(&engine);
        fire_auto(&mut engine, &sched);
        check(&engine);

        engine.pointer_down(200.0);
        assert_eq!(sched.live_count(), 0);
        engine.pointer_move(150.0);
        check(&engine);
        engine.pointer_up();
        check(&engine);

        // Interrupt the glide halfway with a new drag.
        for _ in 0..3 {
            let frame = sched.take_frame().unwrap();
            engine.on_frame(frame);
            check(&engine);
        }
        engine.touch_start(10.0);
        assert_eq!(sched.live_count(), 0);
        assert_eq!(engine.velocity(), 0.0);
        engine.touch_move(40.0);
        engine.touch_end();
        check(&engine);
        run_momentum(&mut engine, &sched);
        check(&engine);
        assert!(engine.is_auto_scheduled());
    }

    #[test]
    fn stale_callbacks_are_ignored() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 5);
        let old_timer = sched.live_timer().unwrap();

        engine.pointer_down(200.0);
        engine.pointer_move(100.0);
        engine.pointer_up();
        let frame = sched.live(TaskKind::Frame)[0];

        engine.pointer_down(100.0);
        let offset = engine.scroll_offset();
        engine.on_frame(frame);
        engine.on_auto_advance(old_timer);

        assert!(engine.mode().is_dragging());
        assert_eq!(engine.scroll_offset(), offset);
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn resumed_auto_continues_from_last_index_not_scroll_position() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 6);
        fire_auto(&mut engine, &sched);
        assert_eq!(engine.current_index(), Some(1));

        engine.pointer_down(300.0);
        engine.pointer_move(0.0);
        engine.pointer_up();
        run_momentum(&mut engine, &sched);
        assert_eq!(engine.current_index(), Some(1));

        fire_auto(&mut engine, &sched);
        assert_eq!(engine.current_index(), Some(2));
        assert_eq!(engine.scroll_offset(), Some(440.0));
    }

    #[test]
    fn release_without_movement_settles_in_one_frame() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 3);
        engine.pointer_down(50.0);
        engine.pointer_up();
        assert_eq!(run_momentum(&mut engine, &sched), 1);
        assert!(engine.is_auto_scheduled());
    }

    #[test]
    fn stray_moves_and_releases_are_ignored() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 3);
        engine.pointer_move(500.0);
        engine.pointer_leave();
        engine.touch_end();
        assert_eq!(engine.mode(), CarouselMode::Auto);
        assert_eq!(engine.scroll_offset(), Some(0.0));
        assert_eq!(sched.frames_scheduled(), 0);
        assert!(engine.is_auto_scheduled());
    }

    #[test]
    fn new_item_list_resets_index_and_timer() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 4);
        fire_auto(&mut engine, &sched);
        fire_auto(&mut engine, &sched);
        let old_timer = sched.live_timer().unwrap();

        let same = engine.items().clone();
        engine.set_items(same);
        assert_eq!(engine.current_index(), Some(2));
        assert_eq!(sched.live_timer(), Some(old_timer));

        engine.set_items(items(2));
        assert_eq!(engine.current_index(), Some(0));
        let new_timer = sched.live_timer().unwrap();
        assert_ne!(new_timer, old_timer);
        assert_eq!(sched.live_count(), 1);

        engine.on_auto_advance(old_timer);
        assert_eq!(engine.current_index(), Some(0));
    }

    #[test]
    fn replacing_items_mid_glide_cancels_momentum() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 4);
        engine.pointer_down(300.0);
        engine.pointer_move(200.0);
        engine.pointer_up();
        assert!(engine.is_momentum_scheduled());

        engine.set_items(items(0));
        assert_eq!(sched.live_count(), 0);
        assert_eq!(engine.mode(), CarouselMode::Auto);
        assert_eq!(engine.current_index(), None);
    }

    #[test]
    fn detach_cancels_all_schedules() {
        let (mut engine, sched) = mounted(CarouselConfig::default(), 4);
        let timer = sched.live_timer().unwrap();
        assert!(engine.detach().is_some());
        assert_eq!(sched.live_count(), 0);

        engine.on_auto_advance(timer);
        engine.pointer_down(0.0);
        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(engine.mode(), CarouselMode::Auto);

        engine.attach(Box::new(StripLayout::new(300.0, 200.0, 20.0)));
        assert!(engine.is_auto_scheduled());
        engine.shutdown();
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn dropping_engine_cancels_timer() {
        let (engine, sched) = mounted(CarouselConfig::default(), 4);
        assert_eq!(sched.live_count(), 1);
        drop(engine);
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn viewport_gate_follows_resize() {
        let config = CarouselConfig {
            auto_advance_max_viewport: Some(768.0),
            ..Default::default()
        };
        let sched = ManualScheduler::new();
        let mut engine = CarouselEngine::new(config, sched.clone());
        engine.set_items(items(3));
        engine.attach(Box::new(StripLayout::new(1280.0, 200.0, 20.0)));
        assert!(!engine.is_auto_scheduled());

        engine.resize(375.0);
        assert!(engine.is_auto_scheduled());
        engine.resize(1024.0);
        assert!(!engine.is_auto_scheduled());
        assert_eq!(sched.live_count(), 0);

        // Dragging still works on wide viewports.
        engine.pointer_down(100.0);
        assert!(engine.mode().is_dragging());
    }
}
