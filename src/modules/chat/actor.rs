use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::client::CompletionClient;
use super::state::{ChatEvent, ChatIntent, ChatState, ChatStateMachine};

/// Cloneable front door to a running [`ChatActor`].
#[derive(Debug, Clone)]
pub struct ChatHandle {
    intent_tx: mpsc::UnboundedSender<ChatIntent>,
}

impl ChatHandle {
    pub fn submit(&self, text: impl Into<String>) {
        self.send(ChatIntent::Submit(text.into()));
    }

    pub fn reset(&self) {
        self.send(ChatIntent::Reset);
    }

    pub fn send(&self, intent: ChatIntent) {
        if self.intent_tx.send(intent).is_err() {
            warn!("chat actor is gone, dropping intent");
        }
    }
}

/// Owns one chat session and performs the side effects its transitions ask for.
pub struct ChatActor<C: CompletionClient> {
    state: ChatState,
    client: Arc<C>,
    intent_rx: mpsc::UnboundedReceiver<ChatIntent>,
    // Weak so the actor stops once every handle is dropped. In-flight calls
    // upgrade it to report their outcome.
    outcome_tx: mpsc::WeakUnboundedSender<ChatIntent>,
    event_tx: mpsc::UnboundedSender<ChatEvent>,
}

impl<C: CompletionClient> ChatActor<C> {
    pub fn new(
        state: ChatState,
        client: C,
        event_tx: mpsc::UnboundedSender<ChatEvent>,
    ) -> (Self, ChatHandle) {
        let (intent_tx, intent_rx) = mpsc::unbounded_channel();

        let actor = Self {
            state,
            client: Arc::new(client),
            intent_rx,
            outcome_tx: intent_tx.downgrade(),
            event_tx,
        };

        (actor, ChatHandle { intent_tx })
    }

    /// Run until every [`ChatHandle`] is dropped and no call is pending.
    /// Returns the final session state.
    pub async fn run(mut self) -> ChatState {
        info!(session = %self.state.session_id, "chat session started");

        while let Some(intent) = self.intent_rx.recv().await {
            self.process_intent(intent);
        }

        info!(
            session = %self.state.session_id,
            messages = self.state.transcript.len(),
            "chat session ended"
        );
        self.state
    }

    fn process_intent(&mut self, intent: ChatIntent) {
        debug!(?intent, status = ?self.state.status, "processing chat intent");

        // Pure state transition
        let (new_state, events) = ChatStateMachine::transition(self.state.clone(), intent);
        self.state = new_state;

        self.handle_side_effects(&events);

        for event in events {
            let _ = self.event_tx.send(event);
        }
    }

    fn handle_side_effects(&self, events: &[ChatEvent]) {
        for event in events {
            match event {
                ChatEvent::RequestIssued(request) => {
                    let Some(outcome_tx) = self.outcome_tx.upgrade() else {
                        warn!("no chat handles left, skipping completion call");
                        continue;
                    };
                    let client = Arc::clone(&self.client);
                    let request = request.clone();
                    let session = self.state.session_id.clone();

                    tokio::spawn(async move {
                        let outcome = match client.complete(request).await {
                            Ok(reply) => {
                                debug!(%session, chars = reply.len(), "completion succeeded");
                                ChatIntent::ReplyReceived(reply)
                            }
                            Err(e) => {
                                warn!(%session, error = %e, "completion failed");
                                ChatIntent::RequestFailed(e.to_string())
                            }
                        };
                        let _ = outcome_tx.send(outcome);
                    });
                }
                ChatEvent::Cleared => {
                    info!(session = %self.state.session_id, "chat cleared");
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use crate::error::{ChatError, Result};
    use crate::modules::chat::client::{CompletionRequest, GenerationParams};
    use crate::modules::chat::message::{Message, Role};
    use crate::modules::chat::state::ChatStatus;

    /// Scripted replies, optionally held back until released.
    struct MockClient {
        replies: Mutex<VecDeque<Result<String>>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockClient {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Arc::new(Mutex::new(Vec::new())),
                gate: None,
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }
    }

    impl CompletionClient for MockClient {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ChatError::MalformedBody("script exhausted".into())))
        }
    }

    fn new_state() -> ChatState {
        ChatState::new("You are Talksy.", GenerationParams::default())
    }

    async fn next_idle(events: &mut mpsc::UnboundedReceiver<ChatEvent>) -> Vec<ChatEvent> {
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            let done = event == ChatEvent::StatusChanged(ChatStatus::Idle);
            seen.push(event);
            if done {
                break;
            }
        }
        seen
    }

    #[tokio::test]
    async fn test_round_trip_appends_reply() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (actor, handle) =
            ChatActor::new(new_state(), MockClient::new(vec![Ok("Hello".into())]), event_tx);
        let task = tokio::spawn(actor.run());

        handle.submit("Hi");
        let events = next_idle(&mut event_rx).await;

        assert_eq!(events[0], ChatEvent::MessageAppended(Message::new_user("Hi")));
        assert!(events.contains(&ChatEvent::MessageAppended(Message::new_assistant("Hello"))));

        drop(handle);
        let final_state = task.await.unwrap();
        assert_eq!(
            final_state.transcript.messages(),
            &[
                Message::new_system("You are Talksy."),
                Message::new_user("Hi"),
                Message::new_assistant("Hello"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_surfaces_error_and_keeps_user_message() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let client = MockClient::new(vec![Err(ChatError::Status(500))]);
        let (actor, handle) = ChatActor::new(new_state(), client, event_tx);
        let task = tokio::spawn(actor.run());

        handle.submit("Hi");
        let events = next_idle(&mut event_rx).await;

        assert!(events.contains(&ChatEvent::ErrorShown("API error: 500".into())));

        drop(handle);
        let final_state = task.await.unwrap();
        assert_eq!(final_state.transcript.len(), 2);
        assert_eq!(final_state.transcript.last().unwrap().role, Role::User);
        assert_eq!(final_state.status, ChatStatus::Idle);
    }

    #[tokio::test]
    async fn test_second_submit_while_sending_is_dropped() {
        let gate = Arc::new(Notify::new());
        let client = MockClient::new(vec![Ok("first reply".into()), Ok("second reply".into())])
            .gated(Arc::clone(&gate));
        let requests = Arc::clone(&client.requests);

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (actor, handle) = ChatActor::new(new_state(), client, event_tx);
        let task = tokio::spawn(actor.run());

        handle.submit("one");
        handle.submit("two");

        // Wait for the first call to reach the client, then let it finish.
        loop {
            if !requests.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        gate.notify_one();
        next_idle(&mut event_rx).await;

        drop(handle);
        let final_state = task.await.unwrap();

        assert_eq!(requests.lock().unwrap().len(), 1);
        assert_eq!(final_state.transcript.len(), 3);
        assert!(final_state
            .transcript
            .messages()
            .iter()
            .all(|m| m.content != "two"));
    }

    #[tokio::test]
    async fn test_request_payload_contains_whole_transcript() {
        let client = MockClient::new(vec![Ok("a".into()), Ok("b".into())]);
        let requests = Arc::clone(&client.requests);

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (actor, handle) = ChatActor::new(new_state(), client, event_tx);
        let task = tokio::spawn(actor.run());

        handle.submit("first");
        next_idle(&mut event_rx).await;
        handle.submit("second");
        next_idle(&mut event_rx).await;
        drop(handle);
        task.await.unwrap();

        let requests = requests.lock().unwrap();
        let contents: Vec<&str> = requests[1].messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["You are Talksy.", "first", "a", "second"]);
    }
}
