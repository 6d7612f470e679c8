//! On-screen notifications for Skycast.
//!
//! A [`NotificationManager`] owns one display slot and a small queue, and is
//! driven by a [`Scheduler`] so its timing can be tested without waiting on a
//! real clock. [`spawn_notifier`] runs it on a tokio task for real use.

pub mod host;
pub mod manager;
pub mod notification;
pub mod scheduler;
pub mod surface;

pub use host::{spawn_notifier, NotifierHandle};
pub use manager::{DisplayPolicy, NotificationManager, NotificationTiming, Phase};
pub use notification::{
    Category, ElementId, NotificationRequest, NotificationStyle, NotificationView, Notify, Visual,
};
pub use scheduler::{Scheduler, TimerEvent, TimerHandle, TimerKind, TimerQueue};
pub use surface::{MountedElement, RecordingSurface, Surface, SurfaceEvent, TerminalSurface};
