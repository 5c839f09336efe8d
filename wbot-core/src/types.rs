//! Core types: inbound events pulled from the messaging platform and the keyboard shape sent back.

/// One update pulled from the platform. `id` drives the offset cursor even when the payload
/// is of a kind the bot does not handle (`event` is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub id: i64,
    pub event: Option<InboundEvent>,
}

impl Update {
    pub fn new(id: i64, event: InboundEvent) -> Self {
        Self {
            id,
            event: Some(event),
        }
    }

    /// An update whose payload is ignored; it still advances the cursor.
    pub fn unsupported(id: i64) -> Self {
        Self { id, event: None }
    }
}

/// Events the dispatcher understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Plain text or command message.
    TextMessage {
        chat_id: i64,
        user_id: i64,
        text: String,
    },
    /// Inline button press. `data` is the opaque token the bot attached to the button.
    CallbackQuery {
        id: String,
        chat_id: i64,
        user_id: i64,
        data: String,
    },
}

impl InboundEvent {
    pub fn user_id(&self) -> i64 {
        match self {
            InboundEvent::TextMessage { user_id, .. } => *user_id,
            InboundEvent::CallbackQuery { user_id, .. } => *user_id,
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::TextMessage { chat_id, .. } => *chat_id,
            InboundEvent::CallbackQuery { chat_id, .. } => *chat_id,
        }
    }
}

/// A labeled button. With `callback` set it is an inline button carrying that token;
/// without, pressing it sends `label` back as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub callback: Option<String>,
}

impl Button {
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: None,
        }
    }

    pub fn callback(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: Some(token.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardKind {
    /// Attached to the message; buttons produce callback queries.
    Inline,
    /// Replaces the user's input keyboard; buttons send their label as text.
    Reply,
}

/// Ordered rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub kind: KeyboardKind,
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn inline(rows: Vec<Vec<Button>>) -> Self {
        Self {
            kind: KeyboardKind::Inline,
            rows,
        }
    }

    pub fn reply(rows: Vec<Vec<Button>>) -> Self {
        Self {
            kind: KeyboardKind::Reply,
            rows,
        }
    }

    /// All button labels, row by row.
    pub fn labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .map(|b| b.label.as_str())
            .collect()
    }
}
