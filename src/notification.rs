//! Diagnostics collected while reading or writing.
//!
//! Non-fatal conditions never abort a load or save. They are accumulated as
//! [`Notification`] items next to the best-effort result so the caller can
//! decide whether partial data is acceptable. After a load, inspect
//! [`CadDocument::notifications`](crate::document::CadDocument::notifications);
//! a save returns its own collection.

use std::fmt;

use crate::types::{DxfVersion, Handle};

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A pointer field whose handle never resolved.
    DanglingReference,
    /// An object or field skipped because the target version excludes it.
    UnsupportedVersion,
    /// An unrecognized section that was consumed and discarded.
    UnknownSection,
    /// Non-fatal warning (e.g., duplicate handle, unknown version string).
    Warning,
    /// Error that was recovered from in failsafe mode.
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference => write!(f, "DanglingReference"),
            Self::UnsupportedVersion => write!(f, "UnsupportedVersion"),
            Self::UnknownSection => write!(f, "UnknownSection"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Payload of a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    DanglingReference {
        /// Type name of the object holding the pointer.
        object_type: String,
        /// Handle of the object holding the pointer, or null.
        owner: Handle,
        /// Name of the pointer field.
        field: &'static str,
        /// Group code the pointer was read from.
        code: i32,
        /// The handle that matched no object.
        missing: Handle,
    },
    UnsupportedVersion {
        object_type: String,
        /// `None` when the whole object kind was skipped.
        field: Option<&'static str>,
        version: DxfVersion,
    },
    UnknownSection {
        name: String,
        skipped_pairs: usize,
    },
    Warning(String),
    Error(String),
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(kind: NotificationKind) -> Self {
        Self { kind }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning(message.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error(message.into()))
    }

    /// The category of this notification.
    pub fn notification_type(&self) -> NotificationType {
        match self.kind {
            NotificationKind::DanglingReference { .. } => NotificationType::DanglingReference,
            NotificationKind::UnsupportedVersion { .. } => NotificationType::UnsupportedVersion,
            NotificationKind::UnknownSection { .. } => NotificationType::UnknownSection,
            NotificationKind::Warning(_) => NotificationType::Warning,
            NotificationKind::Error(_) => NotificationType::Error,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.notification_type())?;
        match &self.kind {
            NotificationKind::DanglingReference {
                object_type,
                owner,
                field,
                code,
                missing,
            } => write!(
                f,
                "{} {:X}: field {} (code {}) points to missing handle {:X}",
                object_type, owner, field, code, missing
            ),
            NotificationKind::UnsupportedVersion {
                object_type,
                field: Some(field),
                version,
            } => write!(f, "{}.{} is not written at {}", object_type, field, version),
            NotificationKind::UnsupportedVersion {
                object_type,
                field: None,
                version,
            } => write!(f, "{} is not written at {}", object_type, version),
            NotificationKind::UnknownSection {
                name,
                skipped_pairs,
            } => write!(f, "section {} skipped ({} pairs)", name, skipped_pairs),
            NotificationKind::Warning(message) | NotificationKind::Error(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, kind: NotificationKind) {
        self.items.push(Notification::new(kind));
    }

    /// Record a warning message.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.items.push(Notification::warning(message));
    }

    /// Move every notification of `other` into this collection.
    pub fn extend(&mut self, other: NotificationCollection) {
        self.items.extend(other.items);
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| n.notification_type() == nt)
            .collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type() == nt)
    }

    /// Consume the collection into a `Vec`.
    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl Extend<Notification> for NotificationCollection {
    fn extend<I: IntoIterator<Item = Notification>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.warn("w1");
        c.notify(NotificationKind::Error("e1".into()));
        c.warn("w2");

        assert_eq!(c.len(), 3);
        assert_eq!(c.of_type(NotificationType::Warning).len(), 2);
        assert!(c.has_type(NotificationType::Error));
        assert!(!c.has_type(NotificationType::DanglingReference));
    }

    #[test]
    fn test_dangling_display() {
        let n = Notification::new(NotificationKind::DanglingReference {
            object_type: "SUNSTUDY".into(),
            owner: Handle::new(0x2A),
            field: "view",
            code: 341,
            missing: Handle::new(0xBEEF),
        });
        assert_eq!(n.notification_type(), NotificationType::DanglingReference);
        assert_eq!(
            n.to_string(),
            "[DanglingReference] SUNSTUDY 2A: field view (code 341) points to missing handle BEEF"
        );
    }

    #[test]
    fn test_unknown_section_display() {
        let n = Notification::new(NotificationKind::UnknownSection {
            name: "ACDSDATA".into(),
            skipped_pairs: 12,
        });
        assert_eq!(n.to_string(), "[UnknownSection] section ACDSDATA skipped (12 pairs)");
    }
}
