// src/ui/chat_view.rs
//! Display-side state of a chat. Fed by [`ChatEvent`]s, never touches the transcript.

use crate::modules::chat::{ChatEvent, ChatStatus, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Talksy",
        }
    }

    pub fn icon(&self) -> char {
        match self {
            Sender::User => 'U',
            Sender::Bot => 'B',
        }
    }
}

/// One rendered bubble: who said it and the Markdown to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub sender: Sender,
    pub markdown: String,
}

#[derive(Debug)]
pub struct ChatView {
    entries: Vec<ChatEntry>,
    input: String,
    input_enabled: bool,
    pending: bool,
    indicator_frame: usize,
    show_welcome: bool,
    suggestions: Vec<String>,
    suggestion_index: Option<usize>,
    /// Lines scrolled up from the newest entry; 0 follows the conversation.
    pub scroll_from_bottom: u16,
    /// Visible history rows, updated on every render.
    pub page_height: u16,
}

impl ChatView {
    pub fn new(suggestions: Vec<String>) -> Self {
        Self {
            entries: Vec::new(),
            input: String::new(),
            input_enabled: true,
            pending: false,
            indicator_frame: 0,
            show_welcome: true,
            suggestions,
            suggestion_index: None,
            scroll_from_bottom: 0,
            page_height: 0,
        }
    }

    /// Apply one event coming out of the chat actor.
    pub fn apply(&mut self, event: &ChatEvent) {
        match event {
            ChatEvent::MessageAppended(message) => match message.role {
                Role::User => self.push_entry(Sender::User, message.content.clone()),
                Role::Assistant => self.push_entry(Sender::Bot, message.content.clone()),
                Role::System => {}
            },
            ChatEvent::ErrorShown(reason) => {
                self.push_entry(Sender::Bot, format!("Error: {}", reason));
            }
            ChatEvent::StatusChanged(ChatStatus::Sending) => {
                self.pending = true;
                self.input_enabled = false;
                self.indicator_frame = 0;
            }
            ChatEvent::StatusChanged(ChatStatus::Idle) => {
                self.pending = false;
                self.input_enabled = true;
            }
            ChatEvent::Cleared => {
                self.entries.clear();
                self.show_welcome = true;
                self.suggestion_index = None;
                self.scroll_from_bottom = 0;
            }
            ChatEvent::RequestIssued(_) => {}
        }
    }

    pub fn push_entry(&mut self, sender: Sender, markdown: impl Into<String>) {
        // The welcome banner goes away with the first message.
        self.show_welcome = false;
        self.entries.push(ChatEntry { sender, markdown: markdown.into() });
        self.scroll_from_bottom = 0;
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn show_welcome(&self) -> bool {
        self.show_welcome
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestion_index(&self) -> Option<usize> {
        self.suggestion_index
    }

    pub fn push_char(&mut self, ch: char) {
        if self.input_enabled {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.input_enabled {
            self.input.pop();
        }
    }

    /// Take the typed text for sending. Blank input stays where it is and
    /// returns `None`. Input is locked until the session reports Idle.
    pub fn take_input(&mut self) -> Option<String> {
        if !self.input_enabled || self.input.trim().is_empty() {
            return None;
        }
        self.input_enabled = false;
        self.suggestion_index = None;
        Some(std::mem::take(&mut self.input).trim().to_string())
    }

    /// Put the next suggested prompt into the input box (welcome screen only).
    pub fn cycle_suggestion(&mut self) {
        if !self.show_welcome || !self.input_enabled || self.suggestions.is_empty() {
            return;
        }
        let next = match self.suggestion_index {
            Some(index) => (index + 1) % self.suggestions.len(),
            None => 0,
        };
        self.suggestion_index = Some(next);
        self.input = self.suggestions[next].clone();
    }

    pub fn scroll_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(1);
    }

    pub fn page_up(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(self.page_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(self.page_height.max(1));
    }

    /// Advance the typing animation. Returns true when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if self.pending {
            self.indicator_frame = self.indicator_frame.wrapping_add(1);
        }
        self.pending
    }

    pub fn indicator_text(&self) -> String {
        format!("{} is typing{}", Sender::Bot.label(), ".".repeat(self.indicator_frame % 3 + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::Message;

    fn view() -> ChatView {
        ChatView::new(vec!["first idea".into(), "second idea".into()])
    }

    #[test]
    fn test_exchange_renders_user_then_bot() {
        let mut view = view();
        view.apply(&ChatEvent::MessageAppended(Message::new_user("Hi")));
        view.apply(&ChatEvent::StatusChanged(ChatStatus::Sending));
        assert!(view.is_pending());
        assert!(!view.input_enabled());

        view.apply(&ChatEvent::MessageAppended(Message::new_assistant("Hello")));
        view.apply(&ChatEvent::StatusChanged(ChatStatus::Idle));

        assert_eq!(
            view.entries(),
            &[
                ChatEntry { sender: Sender::User, markdown: "Hi".into() },
                ChatEntry { sender: Sender::Bot, markdown: "Hello".into() },
            ]
        );
        assert!(!view.is_pending());
        assert!(view.input_enabled());
        assert!(!view.show_welcome());
    }

    #[test]
    fn test_error_becomes_bot_entry() {
        let mut view = view();
        view.apply(&ChatEvent::ErrorShown("API error: 500".into()));
        assert_eq!(view.entries()[0].sender, Sender::Bot);
        assert_eq!(view.entries()[0].markdown, "Error: API error: 500");
    }

    #[test]
    fn test_blank_input_is_kept_and_not_sent() {
        let mut view = view();
        view.push_char(' ');
        view.push_char(' ');

        assert_eq!(view.take_input(), None);
        assert_eq!(view.input(), "  ");
        assert!(view.input_enabled());
        assert!(view.entries().is_empty());
    }

    #[test]
    fn test_take_input_locks_until_idle() {
        let mut view = view();
        for ch in " Hi ".chars() {
            view.push_char(ch);
        }

        assert_eq!(view.take_input(), Some("Hi".to_string()));
        assert_eq!(view.input(), "");

        view.push_char('x');
        assert_eq!(view.input(), "");
        assert_eq!(view.take_input(), None);

        view.apply(&ChatEvent::StatusChanged(ChatStatus::Idle));
        view.push_char('x');
        assert_eq!(view.input(), "x");
    }

    #[test]
    fn test_suggestions_cycle_on_welcome_only() {
        let mut view = view();
        view.cycle_suggestion();
        assert_eq!(view.input(), "first idea");
        view.cycle_suggestion();
        assert_eq!(view.input(), "second idea");
        view.cycle_suggestion();
        assert_eq!(view.input(), "first idea");

        view.push_entry(Sender::User, "hello");
        view.cycle_suggestion();
        assert_eq!(view.input(), "first idea");
        assert_eq!(view.suggestion_index(), Some(0));
    }

    #[test]
    fn test_cleared_brings_back_welcome() {
        let mut view = view();
        view.push_entry(Sender::User, "Hi");
        view.scroll_up();

        view.apply(&ChatEvent::Cleared);

        assert!(view.entries().is_empty());
        assert!(view.show_welcome());
        assert_eq!(view.scroll_from_bottom, 0);
    }

    #[test]
    fn test_new_entry_snaps_to_bottom() {
        let mut view = view();
        view.scroll_up();
        view.scroll_up();
        view.scroll_down();
        assert_eq!(view.scroll_from_bottom, 1);

        view.push_entry(Sender::Bot, "news");
        assert_eq!(view.scroll_from_bottom, 0);
    }

    #[test]
    fn test_page_keys_move_by_visible_rows() {
        let mut view = view();
        view.page_height = 6;

        view.page_up();
        view.page_up();
        assert_eq!(view.scroll_from_bottom, 12);

        view.page_down();
        assert_eq!(view.scroll_from_bottom, 6);
        view.page_down();
        view.page_down();
        assert_eq!(view.scroll_from_bottom, 0);
    }

    #[test]
    fn test_indicator_animates_only_while_pending() {
        let mut view = view();
        assert!(!view.tick());

        view.apply(&ChatEvent::StatusChanged(ChatStatus::Sending));
        assert_eq!(view.indicator_text(), "Talksy is typing.");
        assert!(view.tick());
        assert_eq!(view.indicator_text(), "Talksy is typing..");
    }
}
