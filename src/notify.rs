//! Toast notifications stacked in the bottom-right corner.

use crate::models::{Severity, ToastMessage};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a toast stays fully visible.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(3000);
/// Length of the hide transition before a toast is removed.
pub const FADE_DURATION: Duration = Duration::from_millis(150);
/// Oldest toasts are evicted beyond this many.
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// Lifecycle of a single toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Shown,
    /// Hide transition started at the given instant.
    Hiding(Instant),
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: ToastMessage,
    pub shown_at: Instant,
    pub phase: ToastPhase,
}

impl Toast {
    /// Remaining visibility in `0.0..=1.0`, used to dim hiding toasts.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase {
            ToastPhase::Shown => 1.0,
            ToastPhase::Hiding(since) => {
                let t = now.saturating_duration_since(since).as_secs_f32()
                    / FADE_DURATION.as_secs_f32();
                (1.0 - t).clamp(0.0, 1.0)
            }
        }
    }
}

/// The shared container; exists only after the first notification.
#[derive(Debug, Default)]
pub struct ToastContainer {
    toasts: VecDeque<Toast>,
}

impl ToastContainer {
    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Owns the toast container and the timing of every toast in it.
#[derive(Debug)]
pub struct Notifier {
    container: Option<ToastContainer>,
    delay: Duration,
    max_visible: usize,
    next_id: u64,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, DEFAULT_MAX_VISIBLE)
    }
}

impl Notifier {
    pub fn new(delay: Duration, max_visible: usize) -> Self {
        Self {
            container: None,
            delay,
            max_visible: max_visible.max(1),
            next_id: 0,
        }
    }

    /// Show `text` with `severity`.
    pub fn notify(&mut self, text: impl Into<String>, severity: Severity) -> u64 {
        self.notify_at(ToastMessage::new(text, severity), Instant::now())
    }

    /// Show `message` as if posted at `now`. Returns the toast id.
    pub fn notify_at(&mut self, message: ToastMessage, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        debug!(id, severity = %message.severity, text = %message.text, "toast");

        let max_visible = self.max_visible;
        let container = self.container.get_or_insert_with(ToastContainer::default);
        container.toasts.push_back(Toast {
            id,
            message,
            shown_at: now,
            phase: ToastPhase::Shown,
        });
        while container.toasts.len() > max_visible {
            container.toasts.pop_front();
        }
        id
    }

    /// Start hiding the toast with `id` (the close button).
    pub fn dismiss(&mut self, id: u64, now: Instant) -> bool {
        let Some(container) = self.container.as_mut() else {
            return false;
        };
        match container.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if toast.phase == ToastPhase::Shown => {
                toast.phase = ToastPhase::Hiding(now);
                true
            }
            _ => false,
        }
    }

    /// Dismiss the most recent visible toast.
    pub fn dismiss_newest(&mut self, now: Instant) -> bool {
        let newest = self.container.as_ref().and_then(|c| {
            c.toasts
                .iter()
                .rev()
                .find(|t| t.phase == ToastPhase::Shown)
                .map(|t| t.id)
        });
        match newest {
            Some(id) => self.dismiss(id, now),
            None => false,
        }
    }

    /// Advance timers: start hiding expired toasts and drop fully hidden ones.
    pub fn tick(&mut self, now: Instant) {
        let delay = self.delay;
        let Some(container) = self.container.as_mut() else {
            return;
        };
        for toast in container.toasts.iter_mut() {
            if toast.phase == ToastPhase::Shown
                && now.saturating_duration_since(toast.shown_at) >= delay
            {
                toast.phase = ToastPhase::Hiding(toast.shown_at + delay);
            }
        }
        container.toasts.retain(|t| match t.phase {
            ToastPhase::Shown => true,
            ToastPhase::Hiding(since) => now.saturating_duration_since(since) < FADE_DURATION,
        });
    }

    /// The container, if any toast was ever shown.
    pub fn container(&self) -> Option<&ToastContainer> {
        self.container.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> ToastMessage {
        ToastMessage::new(text, Severity::Info)
    }

    #[test]
    fn test_container_created_lazily() {
        let mut notifier = Notifier::default();
        assert!(notifier.container().is_none());

        notifier.notify("hello", Severity::Success);
        assert_eq!(notifier.container().unwrap().len(), 1);
    }

    #[test]
    fn test_container_survives_empty() {
        let mut notifier = Notifier::default();
        let t0 = Instant::now();
        notifier.notify_at(msg("a"), t0);
        notifier.tick(t0 + Duration::from_secs(10));

        let container = notifier.container().unwrap();
        assert!(container.is_empty());
    }

    #[test]
    fn test_stacks_in_call_order() {
        let mut notifier = Notifier::default();
        let t0 = Instant::now();
        notifier.notify_at(msg("first"), t0);
        notifier.notify_at(msg("second"), t0);

        let texts: Vec<_> = notifier
            .container()
            .unwrap()
            .toasts()
            .map(|t| t.message.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_auto_dismiss_after_delay_then_removed() {
        let mut notifier = Notifier::default();
        let t0 = Instant::now();
        notifier.notify_at(msg("bye"), t0);

        notifier.tick(t0 + Duration::from_millis(2999));
        let toast = notifier.container().unwrap().toasts().next().unwrap().clone();
        assert_eq!(toast.phase, ToastPhase::Shown);

        notifier.tick(t0 + Duration::from_millis(3000));
        let toast = notifier.container().unwrap().toasts().next().unwrap().clone();
        assert!(matches!(toast.phase, ToastPhase::Hiding(_)));

        notifier.tick(t0 + Duration::from_millis(3000) + FADE_DURATION);
        assert!(notifier.container().unwrap().is_empty());
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut notifier = Notifier::new(DEFAULT_DELAY, 2);
        let t0 = Instant::now();
        for text in ["a", "b", "c"] {
            notifier.notify_at(msg(text), t0);
        }

        let texts: Vec<_> = notifier
            .container()
            .unwrap()
            .toasts()
            .map(|t| t.message.text.clone())
            .collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_dismiss_newest() {
        let mut notifier = Notifier::default();
        let t0 = Instant::now();
        notifier.notify_at(msg("old"), t0);
        let newest = notifier.notify_at(msg("new"), t0);

        assert!(notifier.dismiss_newest(t0));
        let hiding: Vec<_> = notifier
            .container()
            .unwrap()
            .toasts()
            .filter(|t| t.phase != ToastPhase::Shown)
            .map(|t| t.id)
            .collect();
        assert_eq!(hiding, vec![newest]);

        notifier.tick(t0 + FADE_DURATION);
        assert_eq!(notifier.container().unwrap().len(), 1);
    }

    #[test]
    fn test_opacity_fades() {
        let t0 = Instant::now();
        let toast = Toast {
            id: 0,
            message: msg("x"),
            shown_at: t0,
            phase: ToastPhase::Hiding(t0),
        };
        assert_eq!(toast.opacity(t0), 1.0);
        assert_eq!(toast.opacity(t0 + FADE_DURATION), 0.0);
    }
}
