//! Append-only action log and keystroke coalescing.

use chrono::Local;
use reel_common::{Action, ActionKind, ElementDescriptor};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Ordered, append-only record of actions.
///
/// Ids start at 1 and are assigned under the same lock as the append, so
/// concurrent writers always observe strictly increasing, gapless ids.
#[derive(Debug, Default)]
pub struct ActionLog {
    actions: Mutex<Vec<Action>>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `kind` and return its id.
    pub fn record(&self, kind: ActionKind) -> u64 {
        let mut actions = self.lock();
        let id = actions.len() as u64 + 1;
        actions.push(Action {
            id,
            timestamp: Local::now(),
            kind,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the log in append order.
    pub fn snapshot(&self) -> Vec<Action> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Action>> {
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keystrokes typed since the last commit event (click, enter, navigate or
/// finish), plus the element they were typed into.
#[derive(Debug, Default)]
pub struct TextBuffer {
    text: String,
    target: Option<ElementDescriptor>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn push_space(&mut self) {
        self.text.push(' ');
    }

    /// Remove the last character. No-op on an empty buffer. Erasing the
    /// last character also forgets the target, so the next keystroke
    /// resolves the element that has focus by then.
    pub fn backspace(&mut self) {
        self.text.pop();
        if self.text.is_empty() {
            self.target = None;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether a flush would produce an action.
    pub fn is_pending(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn target(&self) -> Option<&ElementDescriptor> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: ElementDescriptor) {
        self.target = Some(target);
    }

    /// Empty the buffer, returning the text and its target.
    pub fn take(&mut self) -> (String, Option<ElementDescriptor>) {
        (std::mem::take(&mut self.text), self.target.take())
    }

    /// Commit buffered text as one `TypeText` action and clear the buffer.
    ///
    /// Whitespace-only text is discarded. Text with no known target element
    /// is discarded with a warning, since an action without selectors could
    /// never be replayed.
    pub fn flush(&mut self, log: &ActionLog) -> Option<u64> {
        let (text, target) = self.take();

        if text.trim().is_empty() {
            return None;
        }

        match target {
            Some(element) => Some(log.record(ActionKind::TypeText { text, element })),
            None => {
                warn!(
                    "Dropping {} typed characters: no target element identified",
                    text.chars().count()
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_common::Selector;
    use std::sync::Arc;

    fn field() -> ElementDescriptor {
        ElementDescriptor {
            tag: "input".into(),
            id: String::new(),
            class_attribute: "input1".into(),
            text: String::new(),
            input_type: "text".into(),
            name: String::new(),
            selectors: vec![Selector::class("input1")],
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let log = ActionLog::new();
        assert_eq!(log.record(ActionKind::Enter), 1);
        assert_eq!(log.record(ActionKind::Enter), 2);
        let ids: Vec<u64> = log.snapshot().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn concurrent_appends_get_distinct_gapless_ids() {
        let log = Arc::new(ActionLog::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        log.record(ActionKind::Enter);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ids: Vec<u64> = log.snapshot().iter().map(|a| a.id).collect();
        assert_eq!(ids, (1..=400).collect::<Vec<u64>>());
    }

    #[test]
    fn flush_coalesces_into_one_action() {
        let log = ActionLog::new();
        let mut buffer = TextBuffer::new();
        buffer.set_target(field());
        for c in "hello".chars() {
            buffer.push(c);
        }

        assert_eq!(buffer.flush(&log), Some(1));
        assert!(buffer.is_empty());
        assert!(buffer.target().is_none());

        let actions = log.snapshot();
        assert_eq!(actions.len(), 1);
        match &actions[0].kind {
            ActionKind::TypeText { text, element } => {
                assert_eq!(text, "hello");
                assert_eq!(element.class_attribute, "input1");
            }
            other => panic!("expected type_text, got {:?}", other),
        }
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut buffer = TextBuffer::new();
        buffer.backspace();
        assert!(buffer.is_empty());

        buffer.push('a');
        buffer.push('b');
        buffer.backspace();
        buffer.backspace();
        buffer.backspace();
        assert_eq!(buffer.as_str(), "");
    }

    #[test]
    fn erasing_all_text_forgets_the_target() {
        let mut buffer = TextBuffer::new();
        buffer.set_target(field());
        buffer.push('a');
        buffer.push('b');

        buffer.backspace();
        assert!(buffer.target().is_some());
        buffer.backspace();
        assert!(buffer.target().is_none());
    }

    #[test]
    fn whitespace_and_untargeted_text_is_dropped() {
        let log = ActionLog::new();
        let mut buffer = TextBuffer::new();
        buffer.set_target(field());
        buffer.push(' ');
        assert!(!buffer.is_pending());
        assert_eq!(buffer.flush(&log), None);

        buffer.push('x');
        assert_eq!(buffer.flush(&log), None);
        assert!(buffer.is_empty());
        assert!(log.is_empty());
    }
}
