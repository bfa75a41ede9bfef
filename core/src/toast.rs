//! Transient notifications. Each toast lives on its own; there is no queue.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ErrorContext, MavigoError};

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastContainer {
    #[default]
    Normal,
    Important,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastAction<A> {
    pub label: String,
    pub action: A,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastSpec<A> {
    pub kind: ToastKind,
    pub message: String,
    pub container: ToastContainer,
    pub duration: Option<Duration>,
    pub action: Option<ToastAction<A>>,
}

impl<A> ToastSpec<A> {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            container: ToastContainer::Normal,
            duration: None,
            action: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    /// A failed operation. Link-class task failures warn instead of erroring.
    pub fn for_error(err: &MavigoError, context: ErrorContext) -> Self {
        let message = err.user_message(context);
        if err.needs_link(context) {
            Self::warning(message)
        } else {
            Self::error(message)
        }
    }

    pub fn important(mut self) -> Self {
        self.container = ToastContainer::Important;
        self
    }

    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_action(mut self, label: impl Into<String>, action: A) -> Self {
        self.action = Some(ToastAction {
            label: label.into(),
            action,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast<A> {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub container: ToastContainer,
    pub duration: Duration,
    pub action: Option<ToastAction<A>>,
    /// Hovered at least once; the timer no longer removes it.
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toasts<A> {
    next_id: ToastId,
    items: Vec<Toast<A>>,
    default_duration: Duration,
    important_duration: Duration,
}

impl<A> Toasts<A> {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            next_id: 1,
            items: Vec::new(),
            default_duration: config.toast_duration,
            important_duration: config.important_toast_duration,
        }
    }

    /// Adds a toast; the caller arms a timer for the returned duration and
    /// calls [`Toasts::expire`] when it fires.
    pub fn push(&mut self, spec: ToastSpec<A>) -> (ToastId, Duration) {
        let id = self.next_id;
        self.next_id += 1;
        let duration = spec.duration.unwrap_or(match spec.container {
            ToastContainer::Normal => self.default_duration,
            ToastContainer::Important => self.important_duration,
        });
        self.items.push(Toast {
            id,
            kind: spec.kind,
            message: spec.message,
            container: spec.container,
            duration,
            action: spec.action,
            pinned: false,
        });
        (id, duration)
    }

    pub fn pin(&mut self, id: ToastId) {
        if let Some(toast) = self.items.iter_mut().find(|t| t.id == id) {
            toast.pinned = true;
        }
    }

    /// Timer callback. Returns whether the toast went away.
    pub fn expire(&mut self, id: ToastId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id || t.pinned);
        self.items.len() != before
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    pub fn take_action(&mut self, id: ToastId) -> Option<A> {
        let index = self.items.iter().position(|t| t.id == id)?;
        self.items.remove(index).action.map(|a| a.action)
    }

    pub fn in_container(&self, container: ToastContainer) -> Vec<&Toast<A>> {
        self.items
            .iter()
            .filter(|t| t.container == container)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toasts() -> Toasts<&'static str> {
        Toasts::new(&ClientConfig::default())
    }

    #[test]
    fn test_task_auth_failure_is_a_warning() {
        let spec: ToastSpec<()> =
            ToastSpec::for_error(&MavigoError::AuthRequired { status: 403 }, ErrorContext::Tasks);
        assert_eq!(spec.kind, ToastKind::Warning);
        assert_eq!(spec.message, crate::error::LINK_GOOGLE_TASKS_MESSAGE);

        let spec: ToastSpec<()> = ToastSpec::for_error(&MavigoError::NotLinked, ErrorContext::General);
        assert_eq!(spec.kind, ToastKind::Warning);

        let spec: ToastSpec<()> =
            ToastSpec::for_error(&MavigoError::AuthRequired { status: 401 }, ErrorContext::Session);
        assert_eq!(spec.kind, ToastKind::Error);

        let spec: ToastSpec<()> =
            ToastSpec::for_error(&MavigoError::Network("offline".into()), ErrorContext::Tasks);
        assert_eq!(spec.kind, ToastKind::Error);
    }

    #[test]
    fn test_durations_follow_container_unless_overridden() {
        let mut t = toasts();
        let (_, normal) = t.push(ToastSpec::info("saved"));
        let (_, important) = t.push(ToastSpec::warning("link needed").important());
        let (_, custom) = t.push(ToastSpec::error("oops").lasting(Duration::from_secs(1)));
        assert_eq!(normal, Duration::from_secs(4));
        assert_eq!(important, Duration::from_secs(8));
        assert_eq!(custom, Duration::from_secs(1));
        assert_eq!(t.in_container(ToastContainer::Important).len(), 1);
        assert_eq!(t.in_container(ToastContainer::Normal).len(), 2);
    }

    #[test]
    fn test_pinned_toast_survives_timer() {
        let mut t = toasts();
        let (hovered, _) = t.push(ToastSpec::info("hover me"));
        let (plain, _) = t.push(ToastSpec::info("ignore me"));
        t.pin(hovered);

        assert!(!t.expire(hovered));
        assert!(t.expire(plain));
        assert_eq!(t.len(), 1);

        assert!(t.dismiss(hovered));
        assert!(t.is_empty());
    }

    #[test]
    fn test_action_removes_toast() {
        let mut t = toasts();
        let (id, _) = t.push(ToastSpec::info("tasks on route").with_action("Show", "show-tasks"));
        assert_eq!(t.take_action(id), Some("show-tasks"));
        assert!(t.is_empty());
        assert_eq!(t.take_action(id), None);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut t = toasts();
        let (a, _) = t.push(ToastSpec::info("a"));
        t.dismiss(a);
        let (b, _) = t.push(ToastSpec::info("b"));
        assert_ne!(a, b);
    }
}
