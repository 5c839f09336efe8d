//! Adapters between teloxide types and wbot_core types.
//! Depends only on teloxide and wbot_core type definitions.

use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    Message, ReplyMarkup, UpdateKind,
};
use wbot_core::{InboundEvent, Keyboard, KeyboardKind, Update};

/// Wraps a teloxide Update for conversion to core [`Update`].
///
/// Text messages and callback queries become events; every other kind keeps its id
/// (so the cursor still moves past it) and carries no event.
pub struct TelegramUpdateWrapper<'a>(pub &'a teloxide::types::Update);

impl<'a> TelegramUpdateWrapper<'a> {
    pub fn to_core(&self) -> Update {
        let id = i64::from(self.0.id.0);
        let event = match &self.0.kind {
            UpdateKind::Message(msg) => text_event(msg),
            UpdateKind::CallbackQuery(q) => Some(callback_event(q)),
            _ => None,
        };
        Update { id, event }
    }
}

fn text_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    let user = msg.from.as_ref()?;
    Some(InboundEvent::TextMessage {
        chat_id: msg.chat.id.0,
        user_id: user.id.0 as i64,
        text: text.to_string(),
    })
}

fn callback_event(q: &CallbackQuery) -> InboundEvent {
    let user_id = q.from.id.0 as i64;
    // Presses on inline-mode messages carry no chat; the private chat id equals the user id.
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id.0)
        .unwrap_or(user_id);
    InboundEvent::CallbackQuery {
        id: q.id.0.clone(),
        chat_id,
        user_id,
        data: q.data.clone().unwrap_or_default(),
    }
}

/// Converts a core keyboard into the teloxide markup attached to `sendMessage`.
pub fn to_reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard.kind {
        KeyboardKind::Inline => {
            let rows = keyboard.rows.iter().map(|row| {
                row.iter()
                    .map(|b| {
                        let token = b.callback.clone().unwrap_or_else(|| b.label.clone());
                        InlineKeyboardButton::callback(b.label.clone(), token)
                    })
                    .collect::<Vec<_>>()
            });
            ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows))
        }
        KeyboardKind::Reply => {
            let rows = keyboard.rows.iter().map(|row| {
                row.iter()
                    .map(|b| KeyboardButton::new(b.label.clone()))
                    .collect::<Vec<_>>()
            });
            ReplyMarkup::Keyboard(KeyboardMarkup::new(rows))
        }
    }
}
