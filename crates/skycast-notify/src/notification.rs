//! Notification data: categories, their styling, and the request/view types
//! that flow from callers through the manager onto a surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Severity category. Determines colours and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Success,
    Error,
    Warning,
    /// Also the fallback for any unrecognized category name.
    #[serde(other)]
    Info,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Success,
        Category::Error,
        Category::Warning,
        Category::Info,
    ];

    /// Parse a category name. Unknown names fall back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Category::Success,
            "error" => Category::Error,
            "warning" => Category::Warning,
            _ => Category::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Success => "success",
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Info => "info",
        }
    }

    /// Colours and icon for this category.
    pub fn style(&self) -> NotificationStyle {
        match self {
            Category::Success => NotificationStyle {
                background: "#f0fdf4",
                border: "#bbf7d0",
                text: "#166534",
                icon_class: "fa fa-check-circle",
                icon_color: "#16a34a",
            },
            Category::Error => NotificationStyle {
                background: "#fef2f2",
                border: "#fca5a5",
                text: "#991b1b",
                icon_class: "fa fa-times-circle",
                icon_color: "#dc2626",
            },
            Category::Warning => NotificationStyle {
                background: "#fffbeb",
                border: "#fed7aa",
                text: "#92400e",
                icon_class: "fa fa-exclamation-triangle",
                icon_color: "#f59e0b",
            },
            Category::Info => NotificationStyle {
                background: "#eff6ff",
                border: "#bfdbfe",
                text: "#1e40af",
                icon_class: "fa fa-info-circle",
                icon_color: "#2563eb",
            },
        }
    }

    /// Single-glyph icon for text surfaces.
    pub fn glyph(&self) -> char {
        match self {
            Category::Success => '✔',
            Category::Error => '✖',
            Category::Warning => '⚠',
            Category::Info => 'ℹ',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual styling of a notification element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub icon_class: &'static str,
    pub icon_color: &'static str,
}

/// A request to show a message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    message: String,
    category: Category,
}

impl NotificationRequest {
    pub fn new(message: impl Into<String>, category: Category) -> Self {
        Self {
            message: message.into(),
            category,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Category::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Category::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Category::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Category::Error)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Identifies one mounted notification element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Animated properties of an element: opacity and horizontal offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    /// Transparent, pushed 100px to the side. Elements mount like this.
    Hidden,
    /// Opaque and in place.
    Shown,
}

impl Visual {
    pub fn opacity(&self) -> f32 {
        match self {
            Visual::Hidden => 0.0,
            Visual::Shown => 1.0,
        }
    }

    pub fn offset_px(&self) -> i32 {
        match self {
            Visual::Hidden => 100,
            Visual::Shown => 0,
        }
    }
}

/// Everything a surface needs to draw one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub id: ElementId,
    pub message: String,
    pub category: Category,
    pub style: NotificationStyle,
}

impl NotificationView {
    pub(crate) fn new(id: ElementId, request: &NotificationRequest) -> Self {
        Self {
            id,
            message: request.message().to_string(),
            category: request.category(),
            style: request.category().style(),
        }
    }
}

/// The one entry point collaborators use to put a message on screen.
pub trait Notify {
    fn submit(&self, request: NotificationRequest);

    fn notify(&self, message: &str, category: Category) {
        self.submit(NotificationRequest::new(message, category));
    }
}

impl<T: Notify + ?Sized> Notify for Arc<T> {
    fn submit(&self, request: NotificationRequest) {
        (**self).submit(request);
    }
}

impl<T: Notify + ?Sized> Notify for &T {
    fn submit(&self, request: NotificationRequest) {
        (**self).submit(request);
    }
}
