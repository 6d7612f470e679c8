//! Notification lifecycle management.
//!
//! A single slot holds the notification on screen. Each notification walks
//! `Created → Entering → Steady → Dismissing` and is then removed, which frees
//! the slot and promotes the head of the queue after a short pause.
//!
//! What happens when `notify` is called while the slot is taken depends on the
//! [`DisplayPolicy`]: `Preempt` replaces the current element at once (no exit
//! animation), `Queue` parks the request in a FIFO that holds at most one
//! request per category.

use std::collections::VecDeque;
use std::time::Duration;

use skycast_core::NotificationsConfig;

use crate::notification::{Category, ElementId, NotificationRequest, NotificationView, Notify, Visual};
use crate::scheduler::{Scheduler, TimerEvent, TimerHandle, TimerKind, TimerQueue};
use crate::surface::Surface;

pub use skycast_core::NotificationPolicy as DisplayPolicy;

/// Fixed delays of the notification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    /// Stand-in for "next animation frame".
    pub frame: Duration,
    /// From mount until the exit transition starts.
    pub display: Duration,
    /// Length of the entrance and exit transitions.
    pub transition: Duration,
    /// From removal until the next queued request is shown.
    pub promotion_delay: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(16),
            display: Duration::from_millis(2000),
            transition: Duration::from_millis(300),
            promotion_delay: Duration::from_millis(100),
        }
    }
}

impl From<&NotificationsConfig> for NotificationTiming {
    fn from(config: &NotificationsConfig) -> Self {
        Self {
            frame: Duration::from_millis(config.frame_ms),
            display: Duration::from_millis(config.display_ms),
            transition: Duration::from_millis(config.transition_ms),
            promotion_delay: Duration::from_millis(config.promotion_delay_ms),
        }
    }
}

/// Lifecycle phase of the active notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted hidden, waiting for the next frame.
    Created,
    /// Entrance transition running.
    Entering,
    /// Fully visible.
    Steady,
    /// Exit transition running.
    Dismissing,
}

#[derive(Debug)]
struct Active {
    id: ElementId,
    request: NotificationRequest,
    phase: Phase,
    timers: Vec<TimerHandle>,
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Idle,
    Showing(Active),
    /// Between a removal and the promoted request being shown.
    Promoting {
        ticket: ElementId,
        request: NotificationRequest,
        timer: TimerHandle,
    },
}

/// Owns the notification queue and the single on-screen slot.
pub struct NotificationManager<S: Scheduler, V: Surface> {
    scheduler: S,
    surface: V,
    timing: NotificationTiming,
    policy: DisplayPolicy,
    queue: VecDeque<NotificationRequest>,
    slot: Slot,
    next_id: u64,
}

impl<S: Scheduler, V: Surface> NotificationManager<S, V> {
    pub fn new(scheduler: S, surface: V, timing: NotificationTiming, policy: DisplayPolicy) -> Self {
        Self {
            scheduler,
            surface,
            timing,
            policy,
            queue: VecDeque::new(),
            slot: Slot::Idle,
            next_id: 0,
        }
    }

    /// Show `message`, or queue it when the policy says so.
    pub fn notify(&mut self, message: impl Into<String>, category: Category) {
        self.submit(NotificationRequest::new(message, category));
    }

    pub fn submit(&mut self, request: NotificationRequest) {
        if self.policy == DisplayPolicy::Queue && self.slot_taken() {
            self.enqueue(request);
            return;
        }
        self.clear_slot();
        self.show(request);
    }

    /// Feed a fired timer back into the state machine.
    ///
    /// Events addressed to an element that is no longer active are ignored.
    pub fn handle_timer(&mut self, handle: TimerHandle, event: TimerEvent) {
        if event.kind == TimerKind::Promote {
            self.on_promote(event.target);
            return;
        }

        let Slot::Showing(active) = &mut self.slot else {
            tracing::trace!("Ignoring {:?} for {}: nothing showing", event.kind, event.target);
            return;
        };
        if active.id != event.target {
            tracing::trace!("Ignoring stale {:?} for {}", event.kind, event.target);
            return;
        }
        active.timers.retain(|h| *h != handle);

        match (event.kind, active.phase) {
            (TimerKind::Frame, Phase::Created) => {
                active.phase = Phase::Entering;
                self.surface
                    .transition(active.id, Visual::Shown, self.timing.transition);
                let settled = self.scheduler.schedule(
                    self.timing.transition,
                    TimerEvent::new(active.id, TimerKind::Settled),
                );
                active.timers.push(settled);
            }
            (TimerKind::Settled, Phase::Entering) => {
                active.phase = Phase::Steady;
            }
            (TimerKind::Dismiss, Phase::Created | Phase::Entering | Phase::Steady) => {
                tracing::debug!("Dismissing notification {}", active.id);
                active.phase = Phase::Dismissing;
                for timer in active.timers.drain(..) {
                    self.scheduler.cancel(timer);
                }
                self.surface
                    .transition(active.id, Visual::Hidden, self.timing.transition);
                let remove = self.scheduler.schedule(
                    self.timing.transition,
                    TimerEvent::new(active.id, TimerKind::Remove),
                );
                active.timers.push(remove);
            }
            (TimerKind::Remove, Phase::Dismissing) => {
                self.remove_active();
            }
            (kind, phase) => {
                tracing::trace!("Ignoring {:?} in phase {:?}", kind, phase);
            }
        }
    }

    /// Whether a notification currently occupies the slot.
    pub fn is_showing(&self) -> bool {
        matches!(self.slot, Slot::Showing(_))
    }

    /// The request on screen, if any.
    pub fn current(&self) -> Option<&NotificationRequest> {
        match &self.slot {
            Slot::Showing(active) => Some(&active.request),
            _ => None,
        }
    }

    pub fn current_id(&self) -> Option<ElementId> {
        match &self.slot {
            Slot::Showing(active) => Some(active.id),
            _ => None,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match &self.slot {
            Slot::Showing(active) => Some(active.phase),
            _ => None,
        }
    }

    /// Whether a queued request is waiting out the promotion delay.
    pub fn is_promotion_pending(&self) -> bool {
        matches!(self.slot, Slot::Promoting { .. })
    }

    /// Queued requests in promotion order.
    pub fn queued(&self) -> impl Iterator<Item = &NotificationRequest> {
        self.queue.iter()
    }

    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    pub fn policy(&self) -> DisplayPolicy {
        self.policy
    }

    pub fn timing(&self) -> NotificationTiming {
        self.timing
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    /// Drop everything: unmount the active element, cancel its timers and
    /// forget the queue.
    pub fn clear(&mut self) {
        self.clear_slot();
        self.queue.clear();
    }

    fn slot_taken(&self) -> bool {
        !matches!(self.slot, Slot::Idle)
    }

    fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    fn enqueue(&mut self, request: NotificationRequest) {
        if let Some(existing) = self
            .queue
            .iter_mut()
            .find(|queued| queued.category() == request.category())
        {
            tracing::debug!("Replacing queued {} notification", request.category());
            *existing = request;
        } else {
            tracing::debug!("Queueing {} notification", request.category());
            self.queue.push_back(request);
        }
    }

    /// Forced replacement: no exit animation.
    fn clear_slot(&mut self) {
        match std::mem::take(&mut self.slot) {
            Slot::Idle => {}
            Slot::Showing(active) => {
                tracing::debug!("Preempting notification {}", active.id);
                for timer in active.timers {
                    self.scheduler.cancel(timer);
                }
                self.surface.unmount(active.id);
            }
            Slot::Promoting { ticket, timer, .. } => {
                tracing::debug!("Dropping pending promotion {}", ticket);
                self.scheduler.cancel(timer);
            }
        }
    }

    fn show(&mut self, request: NotificationRequest) {
        let id = self.allocate_id();
        tracing::debug!(
            "Showing {} notification {}: {}",
            request.category(),
            id,
            request.message()
        );

        let view = NotificationView::new(id, &request);
        let frame = self
            .scheduler
            .schedule(self.timing.frame, TimerEvent::new(id, TimerKind::Frame));
        let dismiss = self
            .scheduler
            .schedule(self.timing.display, TimerEvent::new(id, TimerKind::Dismiss));
        self.slot = Slot::Showing(Active {
            id,
            request,
            phase: Phase::Created,
            timers: vec![frame, dismiss],
        });
        self.surface.mount(&view);
    }

    fn remove_active(&mut self) {
        let Slot::Showing(active) = std::mem::take(&mut self.slot) else {
            return;
        };
        for timer in active.timers {
            self.scheduler.cancel(timer);
        }
        self.surface.unmount(active.id);
        tracing::debug!("Removed notification {}", active.id);

        if let Some(next) = self.queue.pop_front() {
            let ticket = self.allocate_id();
            let timer = self.scheduler.schedule(
                self.timing.promotion_delay,
                TimerEvent::new(ticket, TimerKind::Promote),
            );
            self.slot = Slot::Promoting {
                ticket,
                request: next,
                timer,
            };
        }
    }

    fn on_promote(&mut self, target: ElementId) {
        match std::mem::take(&mut self.slot) {
            Slot::Promoting {
                ticket, request, ..
            } if ticket == target => {
                tracing::debug!("Promoting queued {} notification", request.category());
                self.submit(request);
            }
            other => {
                tracing::trace!("Ignoring stale promotion {}", target);
                self.slot = other;
            }
        }
    }
}

impl<V: Surface> NotificationManager<TimerQueue, V> {
    /// Manager driven by an in-memory [`TimerQueue`].
    pub fn with_timer_queue(surface: V, timing: NotificationTiming, policy: DisplayPolicy) -> Self {
        Self::new(TimerQueue::new(), surface, timing, policy)
    }

    /// Let `by` pass, firing every timer that comes due on the way.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        self.advance_to(until);
    }

    /// Fire every timer due at or before `until`, including timers scheduled
    /// by the ones that fire.
    pub fn advance_to(&mut self, until: Duration) {
        while let Some((handle, event)) = self.scheduler.pop_due(until) {
            self.handle_timer(handle, event);
        }
        self.scheduler.advance_clock(until);
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }
}

impl<S: Scheduler, V: Surface> Notify for parking_lot::Mutex<NotificationManager<S, V>> {
    fn submit(&self, request: NotificationRequest) {
        self.lock().submit(request);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceEvent};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn manager(policy: DisplayPolicy) -> (NotificationManager<TimerQueue, RecordingSurface>, RecordingSurface) {
        let surface = RecordingSurface::new();
        let manager = NotificationManager::with_timer_queue(
            surface.clone(),
            NotificationTiming::default(),
            policy,
        );
        (manager, surface)
    }

    #[test]
    fn test_lifecycle_phases() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("Loading weather data...", Category::Info);

        assert!(m.is_showing());
        assert_eq!(m.phase(), Some(Phase::Created));
        assert_eq!(surface.mounted_count(), 1);
        assert!(surface.visible().is_empty());

        m.advance(ms(16));
        assert_eq!(m.phase(), Some(Phase::Entering));
        assert_eq!(surface.visible().len(), 1);

        m.advance(ms(300));
        assert_eq!(m.phase(), Some(Phase::Steady));

        m.advance_to(ms(2000));
        assert_eq!(m.phase(), Some(Phase::Dismissing));
        assert!(surface.visible().is_empty());
        assert_eq!(surface.mounted_count(), 1);

        m.advance(ms(300));
        assert!(!m.is_showing());
        assert_eq!(m.phase(), None);
        assert_eq!(surface.mounted_count(), 0);
        assert!(m.scheduler().is_empty());
    }

    #[test]
    fn test_two_calls_leave_only_the_second() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("first", Category::Info);
        m.notify("second", Category::Error);

        let mounted = surface.elements();
        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].view.message, "second");
        assert_eq!(mounted[0].view.category, Category::Error);

        m.advance(ms(16));
        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view.message, "second");
    }

    #[test]
    fn test_forced_replacement_skips_exit_animation() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("first", Category::Info);
        m.advance(ms(500));
        let first = m.current_id().unwrap();

        m.notify("second", Category::Success);
        let events = surface.events();
        assert!(!events.contains(&SurfaceEvent::Transitioned(first, Visual::Hidden)));
        assert!(events.contains(&SurfaceEvent::Unmounted(first)));
    }

    #[test]
    fn test_auto_removal_within_display_plus_transition() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("done", Category::Success);

        m.advance(ms(2299));
        assert_eq!(surface.mounted_count(), 1);

        m.advance(ms(1));
        assert_eq!(surface.mounted_count(), 0);
        assert!(!m.is_showing());
    }

    #[test]
    fn test_pending_dismissal_never_hits_replacement() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("first", Category::Info);
        m.advance(ms(1500));

        m.notify("second", Category::Success);
        let second = m.current_id().unwrap();

        // First notification's dismissal would have fired at 2000ms.
        m.advance_to(ms(2400));
        assert_eq!(m.current_id(), Some(second));
        assert_eq!(m.phase(), Some(Phase::Steady));
        assert_eq!(surface.visible().len(), 1);

        // Second one leaves on its own schedule: 1500 + 2000 + 300.
        m.advance_to(ms(3799));
        assert_eq!(surface.mounted_count(), 1);
        m.advance_to(ms(3800));
        assert_eq!(surface.mounted_count(), 0);
    }

    #[test]
    fn test_notify_during_exit_transition_replaces() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("first", Category::Info);
        m.advance(ms(2100));
        assert_eq!(m.phase(), Some(Phase::Dismissing));

        m.notify("second", Category::Warning);
        assert_eq!(m.phase(), Some(Phase::Created));
        m.advance(ms(250));
        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view.message, "second");
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("first", Category::Info);
        let first = m.current_id().unwrap();
        m.notify("second", Category::Info);

        m.handle_timer(
            TimerHandle(999),
            TimerEvent::new(first, TimerKind::Dismiss),
        );
        assert_eq!(m.phase(), Some(Phase::Created));
        assert_eq!(surface.mounted_count(), 1);
    }

    #[test]
    fn test_empty_message_is_shown() {
        let (mut m, surface) = manager(DisplayPolicy::Preempt);
        m.notify("", Category::default());
        assert_eq!(surface.elements()[0].view.category, Category::Success);
        assert_eq!(surface.elements()[0].view.message, "");
    }

    #[test]
    fn test_preempt_policy_never_queues() {
        let (mut m, _surface) = manager(DisplayPolicy::Preempt);
        for i in 0..5 {
            m.notify(format!("n{i}"), Category::Info);
        }
        assert_eq!(m.queued_count(), 0);
        assert_eq!(m.current().map(|r| r.message()), Some("n4"));
    }

    #[test]
    fn test_queue_policy_waits_for_slot() {
        let (mut m, surface) = manager(DisplayPolicy::Queue);
        m.notify("loading", Category::Info);
        m.notify("done", Category::Success);

        assert_eq!(m.current().map(|r| r.message()), Some("loading"));
        assert_eq!(m.queued_count(), 1);
        assert_eq!(surface.mounted_count(), 1);
    }

    #[test]
    fn test_queue_deduplicates_by_category_in_place() {
        let (mut m, _surface) = manager(DisplayPolicy::Queue);
        m.notify("showing", Category::Info);
        m.notify("warn 1", Category::Warning);
        m.notify("err", Category::Error);
        m.notify("warn 2", Category::Warning);

        let queued: Vec<_> = m.queued().map(|r| (r.category(), r.message())).collect();
        assert_eq!(
            queued,
            vec![(Category::Warning, "warn 2"), (Category::Error, "err")]
        );
    }

    #[test]
    fn test_promotion_after_removal_and_delay() {
        let (mut m, surface) = manager(DisplayPolicy::Queue);
        m.notify("first", Category::Info);
        m.notify("second", Category::Success);

        m.advance_to(ms(2300));
        assert!(!m.is_showing());
        assert!(m.is_promotion_pending());
        assert_eq!(surface.mounted_count(), 0);
        assert_eq!(m.queued_count(), 0);

        m.advance(ms(99));
        assert!(!m.is_showing());

        m.advance(ms(1));
        assert!(m.is_showing());
        assert_eq!(m.current().map(|r| r.message()), Some("second"));
        assert_eq!(surface.elements()[0].view.message, "second");
    }

    #[test]
    fn test_queue_drains_in_fifo_order() {
        let (mut m, surface) = manager(DisplayPolicy::Queue);
        m.notify("a", Category::Info);
        m.notify("b", Category::Warning);
        m.notify("c", Category::Error);

        let mut shown = Vec::new();
        for _ in 0..3 {
            if let Some(current) = m.current() {
                shown.push(current.message().to_string());
            }
            m.advance(ms(2400));
        }
        assert_eq!(shown, vec!["a", "b", "c"]);
        assert_eq!(surface.mounted_count(), 0);
        assert!(!m.is_showing());
    }

    #[test]
    fn test_queue_policy_queues_during_promotion_delay() {
        let (mut m, _surface) = manager(DisplayPolicy::Queue);
        m.notify("a", Category::Info);
        m.notify("b", Category::Warning);
        m.advance_to(ms(2350));
        assert!(m.is_promotion_pending());

        m.notify("c", Category::Error);
        assert!(!m.is_showing());
        assert_eq!(m.queued_count(), 1);

        m.advance_to(ms(2400));
        assert_eq!(m.current().map(|r| r.message()), Some("b"));
    }

    #[test]
    fn test_clear_cancels_pending_promotion() {
        let surface = RecordingSurface::new();
        let mut m = NotificationManager::with_timer_queue(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Queue,
        );
        m.notify("a", Category::Info);
        m.notify("b", Category::Warning);
        m.advance_to(ms(2350));
        assert!(m.is_promotion_pending());

        m.clear();
        assert!(!m.is_promotion_pending());
        assert!(m.scheduler().is_empty());
        m.advance(ms(1000));
        assert_eq!(surface.mounted_count(), 0);
    }

    #[test]
    fn test_showing_flag_matches_slot() {
        let (mut m, surface) = manager(DisplayPolicy::Queue);
        m.notify("a", Category::Info);
        m.notify("b", Category::Error);
        for _ in 0..60 {
            assert_eq!(m.is_showing(), m.current().is_some());
            assert!(surface.mounted_count() <= 1);
            if m.is_showing() {
                assert_eq!(surface.mounted_count(), 1);
            }
            m.advance(ms(50));
        }
    }

    #[test]
    fn test_timing_from_config() {
        let config = NotificationsConfig {
            display_ms: 500,
            ..NotificationsConfig::default()
        };
        let timing = NotificationTiming::from(&config);
        assert_eq!(timing.display, ms(500));
        assert_eq!(timing.transition, ms(300));
    }

    #[test]
    fn test_mutex_manager_implements_notify() {
        let surface = RecordingSurface::new();
        let m = parking_lot::Mutex::new(NotificationManager::with_timer_queue(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Preempt,
        ));
        m.notify("hi", Category::Warning);
        assert_eq!(surface.elements()[0].view.category, Category::Warning);
    }
}
