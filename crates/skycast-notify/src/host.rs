//! Tokio host for the notification manager.
//!
//! One task owns the manager. Callers hold a cheap [`NotifierHandle`] and send
//! requests over an unbounded channel, so `notify` never waits. The task
//! sleeps until the next timer is due or a request arrives.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::manager::{DisplayPolicy, NotificationManager, NotificationTiming};
use crate::notification::{NotificationRequest, Notify};
use crate::scheduler::TimerQueue;
use crate::surface::Surface;

#[derive(Debug)]
enum Command {
    Show(NotificationRequest),
}

/// Sending side of a running notifier task.
#[derive(Debug, Clone)]
pub struct NotifierHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl NotifierHandle {
    /// True once the notifier task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Notify for NotifierHandle {
    fn submit(&self, request: NotificationRequest) {
        if self.tx.send(Command::Show(request)).is_err() {
            tracing::warn!("Notifier stopped, dropping notification");
        }
    }
}

/// Spawn the notifier task on the current tokio runtime.
///
/// The task ends once every [`NotifierHandle`] is dropped, after taking any
/// visible notification off the surface.
pub fn spawn_notifier<V>(
    surface: V,
    timing: NotificationTiming,
    policy: DisplayPolicy,
) -> (NotifierHandle, JoinHandle<()>)
where
    V: Surface + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let manager = NotificationManager::with_timer_queue(surface, timing, policy);
    let task = tokio::spawn(run(manager, rx));
    (NotifierHandle { tx }, task)
}

async fn run<V: Surface>(
    mut manager: NotificationManager<TimerQueue, V>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let origin = Instant::now();
    tracing::debug!("Notifier started");

    loop {
        let next_due = manager.next_due();
        let deadline = origin + next_due.unwrap_or_default();

        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Show(request)) => {
                    manager.advance_to(origin.elapsed());
                    manager.submit(request);
                }
                None => break,
            },
            _ = tokio::time::sleep_until(deadline), if next_due.is_some() => {
                manager.advance_to(origin.elapsed());
            }
        }
    }

    manager.clear();
    tracing::debug!("Notifier stopped");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::notification::Category;
    use crate::surface::RecordingSurface;
    use std::time::Duration;

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_appears_and_leaves() {
        let surface = RecordingSurface::new();
        let (notifier, _task) = spawn_notifier(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Preempt,
        );

        notifier.notify("Loading weather data...", Category::Info);
        settle(50).await;
        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view.category, Category::Info);

        settle(2300).await;
        assert_eq!(surface.mounted_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_call_wins() {
        let surface = RecordingSurface::new();
        let (notifier, _task) = spawn_notifier(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Preempt,
        );

        notifier.notify("first", Category::Info);
        notifier.notify("second", Category::Success);
        settle(50).await;

        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view.message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_outlives_first_dismissal() {
        let surface = RecordingSurface::new();
        let (notifier, _task) = spawn_notifier(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Preempt,
        );

        notifier.notify("first", Category::Info);
        settle(1500).await;
        notifier.notify("second", Category::Success);
        settle(1000).await;

        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view.message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_policy_promotes() {
        let surface = RecordingSurface::new();
        let (notifier, _task) = spawn_notifier(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Queue,
        );

        notifier.notify("first", Category::Info);
        notifier.notify("second", Category::Success);
        settle(50).await;
        assert_eq!(surface.visible()[0].view.message, "first");

        settle(2400).await;
        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].view.message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_task_and_clears() {
        let surface = RecordingSurface::new();
        let (notifier, task) = spawn_notifier(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Preempt,
        );

        notifier.notify("bye", Category::Warning);
        settle(50).await;
        assert_eq!(surface.mounted_count(), 1);

        drop(notifier);
        task.await.unwrap();
        assert_eq!(surface.mounted_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_reports_stopped_task() {
        let surface = RecordingSurface::new();
        let (notifier, task) = spawn_notifier(
            surface.clone(),
            NotificationTiming::default(),
            DisplayPolicy::Preempt,
        );
        assert!(!notifier.is_closed());

        task.abort();
        let _ = task.await;
        assert!(notifier.is_closed());

        // Sending after the task is gone is logged, not a panic.
        notifier.notify("late", Category::Info);
        assert_eq!(surface.mounted_count(), 0);
    }
}
