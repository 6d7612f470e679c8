//! Where notification elements live while they are on screen.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::notification::{Category, ElementId, NotificationView, Visual};

/// Display target for notification elements.
///
/// The manager guarantees at most one element is mounted at a time.
pub trait Surface {
    /// Insert an element. It starts out `Visual::Hidden`.
    fn mount(&mut self, view: &NotificationView);

    /// Animate an element's opacity and offset to `visual` over `duration`.
    fn transition(&mut self, id: ElementId, visual: Visual, duration: Duration);

    /// Take an element off the surface immediately.
    fn unmount(&mut self, id: ElementId);
}

/// One element as currently drawn on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct MountedElement {
    pub view: NotificationView,
    pub visual: Visual,
}

/// Operation log entry of a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Mounted(ElementId),
    Transitioned(ElementId, Visual),
    Unmounted(ElementId),
}

#[derive(Debug, Default)]
struct RecordedState {
    elements: Vec<MountedElement>,
    events: Vec<SurfaceEvent>,
}

/// In-memory surface. Clones share state, so one clone can be handed to the
/// manager and another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<RecordedState>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements currently mounted, in mount order.
    pub fn elements(&self) -> Vec<MountedElement> {
        self.state.lock().elements.clone()
    }

    /// Mounted elements whose visual state is `Shown`.
    pub fn visible(&self) -> Vec<MountedElement> {
        self.state
            .lock()
            .elements
            .iter()
            .filter(|e| e.visual == Visual::Shown)
            .cloned()
            .collect()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.state.lock().events.clone()
    }

    pub fn mounted_count(&self) -> usize {
        self.state.lock().elements.len()
    }
}

impl Surface for RecordingSurface {
    fn mount(&mut self, view: &NotificationView) {
        let mut state = self.state.lock();
        state.elements.push(MountedElement {
            view: view.clone(),
            visual: Visual::Hidden,
        });
        state.events.push(SurfaceEvent::Mounted(view.id));
    }

    fn transition(&mut self, id: ElementId, visual: Visual, _duration: Duration) {
        let mut state = self.state.lock();
        if let Some(element) = state.elements.iter_mut().find(|e| e.view.id == id) {
            element.visual = visual;
        }
        state.events.push(SurfaceEvent::Transitioned(id, visual));
    }

    fn unmount(&mut self, id: ElementId) {
        let mut state = self.state.lock();
        state.elements.retain(|e| e.view.id != id);
        state.events.push(SurfaceEvent::Unmounted(id));
    }
}

/// Writes one line per notification as it finishes entering.
pub struct TerminalSurface<W: Write> {
    out: W,
    pending: Option<(ElementId, Category, String)>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, pending: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    fn print(&mut self, category: Category, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{} [{}] {}", category.glyph(), category, message)?;
        self.out.flush()
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn mount(&mut self, view: &NotificationView) {
        self.pending = Some((view.id, view.category, view.message.clone()));
    }

    fn transition(&mut self, id: ElementId, visual: Visual, _duration: Duration) {
        if visual != Visual::Shown {
            return;
        }
        let Some((pending_id, category, message)) = self.pending.take() else {
            return;
        };
        if pending_id != id {
            return;
        }
        if let Err(e) = self.print(category, &message) {
            tracing::warn!("Failed to write notification: {}", e);
        }
    }

    fn unmount(&mut self, id: ElementId) {
        if matches!(&self.pending, Some((pending_id, _, _)) if *pending_id == id) {
            self.pending = None;
        }
    }
}
