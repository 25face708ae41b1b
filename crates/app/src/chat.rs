//! Floating assistant chat.
//!
//! A session lives as long as the chat panel stays open in one language. It
//! opens with a greeting that is shown but never sent as history. Replies
//! stream into a single trailing model entry.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use providers::EcoGateway;
use shared::agent_api::{ChatMessage, ChatRole, StreamChunk};
use shared::language::LanguageCode;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use tracing::{debug, info, warn};

use crate::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Greeting,
    Message,
    /// Shown in place of a reply that could not be produced.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    pub kind: EntryKind,
    /// False while the reply is still streaming.
    pub complete: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChatEntry {
    fn new(role: ChatRole, text: impl Into<String>, kind: EntryKind, complete: bool) -> Self {
        Self {
            role,
            text: text.into(),
            kind,
            complete,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a reply is already streaming.
    Ignored,
    Replied,
    Failed,
}

#[derive(Default)]
struct Transcript {
    entries: Vec<ChatEntry>,
    sending: bool,
}

impl Transcript {
    /// Turns that go back to the model: no greeting, no error notices, no
    /// half-streamed replies.
    fn history(&self) -> Vec<ChatMessage> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Message && e.complete)
            .map(|e| ChatMessage {
                role: e.role,
                content: e.text.clone(),
            })
            .collect()
    }

    fn append_reply(&mut self, text: &str) {
        match self.entries.last_mut() {
            Some(last) if last.role == ChatRole::Model && !last.complete => {
                last.text.push_str(text)
            }
            _ => self
                .entries
                .push(ChatEntry::new(ChatRole::Model, text, EntryKind::Message, false)),
        }
    }

    fn open_reply(&mut self) -> Option<&mut ChatEntry> {
        self.entries
            .last_mut()
            .filter(|e| e.role == ChatRole::Model && !e.complete)
    }
}

pub struct ChatSession {
    gateway: Arc<dyn EcoGateway>,
    language: LanguageCode,
    error_text: String,
    transcript: Mutex<Transcript>,
}

impl ChatSession {
    pub fn start(gateway: Arc<dyn EcoGateway>, language: LanguageCode, t: &Translator) -> Self {
        info!(%language, "chat session started");
        let greeting = ChatEntry::new(
            ChatRole::Model,
            t.t("chatbot_greeting"),
            EntryKind::Greeting,
            true,
        );
        Self {
            gateway,
            language,
            error_text: t.t("chatbot_error"),
            transcript: Mutex::new(Transcript {
                entries: vec![greeting],
                sending: false,
            }),
        }
    }

    pub fn language(&self) -> LanguageCode {
        self.language
    }

    /// Snapshot of the conversation as it should be rendered now.
    pub fn entries(&self) -> Vec<ChatEntry> {
        self.transcript.lock().entries.clone()
    }

    pub fn is_sending(&self) -> bool {
        self.transcript.lock().sending
    }

    pub async fn send(&self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let history = {
            let mut transcript = self.transcript.lock();
            if transcript.sending {
                debug!("send ignored, reply already streaming");
                return SendOutcome::Ignored;
            }
            transcript.sending = true;
            transcript
                .entries
                .push(ChatEntry::new(ChatRole::User, text, EntryKind::Message, true));
            transcript.history()
        };

        let (tx, mut rx) = unbounded_channel();
        let call = self.gateway.stream_chat(self.language, history, tx);
        let drain = async {
            while let Some(chunk) = rx.recv().await {
                match chunk {
                    StreamChunk::Text(piece) => self.transcript.lock().append_reply(&piece),
                    StreamChunk::Error(detail) => {
                        warn!(%detail, "chat stream broke");
                        return false;
                    }
                    StreamChunk::Done => break,
                }
            }
            true
        };
        let (result, clean) = tokio::join!(call, drain);

        let mut transcript = self.transcript.lock();
        transcript.sending = false;
        if result.is_ok() && clean {
            if let Some(reply) = transcript.open_reply().filter(|r| !r.text.is_empty()) {
                reply.complete = true;
                return SendOutcome::Replied;
            }
            warn!("chat stream finished without any text");
        }

        if let Err(e) = &result {
            warn!(error = %e, "chat reply failed");
        }
        let keep_partial = match transcript.open_reply() {
            Some(reply) if !reply.text.is_empty() => {
                reply.complete = true;
                true
            }
            Some(_) => false,
            None => true,
        };
        if !keep_partial {
            transcript.entries.pop();
        }
        transcript.entries.push(ChatEntry::new(
            ChatRole::Model,
            self.error_text.clone(),
            EntryKind::Error,
            true,
        ));
        SendOutcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ChatScript, MockGateway};

    fn session(gateway: Arc<MockGateway>) -> ChatSession {
        ChatSession::start(gateway, LanguageCode::En, &Translator::new(LanguageCode::En))
    }

    #[tokio::test]
    async fn test_greeting_is_not_history() {
        let gateway = Arc::new(MockGateway::default());
        let chat = session(gateway.clone());
        assert_eq!(chat.entries().len(), 1);
        assert_eq!(chat.entries()[0].kind, EntryKind::Greeting);

        assert_eq!(chat.send("How do I recycle glass?").await, SendOutcome::Replied);
        let sent = gateway.chat_histories.lock()[0].clone();
        assert_eq!(sent, vec![ChatMessage::user("How do I recycle glass?")]);
    }

    #[tokio::test]
    async fn test_chunks_concatenate_into_one_reply() {
        let gateway = Arc::new(MockGateway::default());
        let chat = session(gateway.clone());
        chat.send("bottle?").await;

        let entries = chat.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].role, ChatRole::Model);
        assert_eq!(entries[2].text, "Rinse it, then recycle.");
        assert!(entries[2].complete);

        chat.send("and cans?").await;
        let second = gateway.chat_histories.lock()[1].clone();
        assert_eq!(
            second,
            vec![
                ChatMessage::user("bottle?"),
                ChatMessage::model("Rinse it, then recycle."),
                ChatMessage::user("and cans?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let gateway = Arc::new(MockGateway::default());
        let chat = session(gateway.clone());
        assert_eq!(chat.send("   ").await, SendOutcome::Ignored);
        assert_eq!(gateway.count("stream_chat"), 0);
        assert_eq!(chat.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_refused_call_appends_one_error() {
        let gateway = Arc::new(MockGateway {
            chat: ChatScript::Refuse,
            ..Default::default()
        });
        let chat = session(gateway);
        assert_eq!(chat.send("hello").await, SendOutcome::Failed);

        let entries = chat.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].kind, EntryKind::Error);
        assert_eq!(entries[2].text, "Sorry, I couldn't answer that. Please try again.");
        assert!(!chat.is_sending());
    }

    #[tokio::test]
    async fn test_broken_stream_keeps_partial_text() {
        let gateway = Arc::new(MockGateway {
            chat: ChatScript::BreakAfter(vec!["Compost ".into()]),
            ..Default::default()
        });
        let chat = session(gateway.clone());
        assert_eq!(chat.send("peels?").await, SendOutcome::Failed);

        let kinds: Vec<_> = chat.entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [EntryKind::Greeting, EntryKind::Message, EntryKind::Message, EntryKind::Error]
        );
        assert_eq!(chat.entries()[2].text, "Compost ");
    }

    #[tokio::test]
    async fn test_stream_without_text_is_a_failure() {
        let gateway = Arc::new(MockGateway {
            chat: ChatScript::Reply(vec![]),
            ..Default::default()
        });
        let chat = session(gateway);
        assert_eq!(chat.send("hello?").await, SendOutcome::Failed);

        let kinds: Vec<_> = chat.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EntryKind::Greeting, EntryKind::Message, EntryKind::Error]);
        assert!(!chat.is_sending());
    }

    #[tokio::test]
    async fn test_one_send_in_flight() {
        let gateway = Arc::new(MockGateway {
            chat_delay_ms: 20,
            ..Default::default()
        });
        let chat = session(gateway.clone());

        let (first, second) = tokio::join!(chat.send("one"), chat.send("two"));
        assert_eq!(first, SendOutcome::Replied);
        assert_eq!(second, SendOutcome::Ignored);
        assert_eq!(gateway.count("stream_chat"), 1);
    }
}
