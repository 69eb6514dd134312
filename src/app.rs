use color_eyre::Result;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::modules::chat::{spawn_chat_session, ChatEvent, ChatHandle};
use crate::ui::chat_view::ChatView;
use crate::util::config::ChatConfig;
use crate::util::io::event::{AppEvent, Event, EventHandler};

/// Application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Shown in the title bar.
    pub model_label: String,
    /// What the user sees of the conversation.
    pub view: ChatView,
    /// Sends intents to the chat session.
    pub chat: ChatHandle,
    /// Events coming back from the chat session.
    pub chat_events: mpsc::UnboundedReceiver<ChatEvent>,
    /// Event handler.
    pub events: EventHandler,
}

impl App {
    /// Constructs a new instance of [`App`].
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let (chat, chat_events) = spawn_chat_session(config)?;

        Ok(Self {
            running: true,
            model_label: config.model.clone(),
            view: ChatView::new(config.suggestions.clone()),
            chat,
            chat_events,
            events: EventHandler::new(),
        })
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut needs_redraw = true;

        while self.running {
            if needs_redraw {
                terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
                // save power
                needs_redraw = false;
            }

            tokio::select! {
                event = self.events.next() => {
                    match event {
                        Ok(Event::Tick) => {
                            // Only the typing indicator animates.
                            needs_redraw = self.view.tick();
                        }
                        Ok(Event::Key(key_event)) => {
                            self.handle_key_events(key_event)?;
                            needs_redraw = true;
                        }
                        Ok(Event::Resize) => {
                            needs_redraw = true;
                        }
                        Ok(Event::App(app_event)) => {
                            self.handle_app_event(app_event);
                            needs_redraw = true;
                        }
                        Err(e) => error!("Event error: {}", e),
                    }
                }
                Some(chat_event) = self.chat_events.recv() => {
                    debug!(?chat_event, "chat event");
                    self.view.apply(&chat_event);
                    needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> Result<()> {
        if let Some(app_event) = key_to_app_event(key_event) {
            self.events.send(app_event);
        }
        Ok(())
    }

    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::ChatInput(ch) => self.view.push_char(ch),
            AppEvent::ChatBackspace => self.view.backspace(),
            AppEvent::ChatSubmit => self.submit_chat_message(),
            AppEvent::CycleSuggestion => self.view.cycle_suggestion(),
            AppEvent::ScrollChatUp => self.view.scroll_up(),
            AppEvent::ScrollChatDown => self.view.scroll_down(),
            AppEvent::PageChatUp => self.view.page_up(),
            AppEvent::PageChatDown => self.view.page_down(),
            AppEvent::ClearChat => {
                if self.view.input_enabled() {
                    self.chat.reset();
                }
            }
        }
    }

    pub fn submit_chat_message(&mut self) {
        if let Some(text) = self.view.take_input() {
            self.chat.submit(text);
        }
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

/// Map a key press to what it means on the chat screen.
pub fn key_to_app_event(key_event: KeyEvent) -> Option<AppEvent> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let app_event = match key_event.code {
        KeyCode::Esc => AppEvent::Quit,
        KeyCode::Char('c' | 'C') if key_event.modifiers == KeyModifiers::CONTROL => AppEvent::Quit,
        KeyCode::Char('l' | 'L') if key_event.modifiers == KeyModifiers::CONTROL => {
            AppEvent::ClearChat
        }
        // Shift is part of the character; any other modifier is a shortcut, not text.
        KeyCode::Char(ch) if key_event.modifiers - KeyModifiers::SHIFT == KeyModifiers::NONE => {
            AppEvent::ChatInput(ch)
        }
        KeyCode::Enter => AppEvent::ChatSubmit,
        KeyCode::Backspace => AppEvent::ChatBackspace,
        KeyCode::Tab => AppEvent::CycleSuggestion,
        KeyCode::Up => AppEvent::ScrollChatUp,
        KeyCode::Down => AppEvent::ScrollChatDown,
        KeyCode::PageUp => AppEvent::PageChatUp,
        KeyCode::PageDown => AppEvent::PageChatDown,
        _ => return None,
    };
    Some(app_event)
}
