//! Per-user conversation state. In memory only; lost on restart.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    /// The next plain-text message from this user is taken as a city to register.
    AwaitingCityInput,
}

/// user_id → state. Users without an entry are Idle.
#[derive(Debug, Default)]
pub struct UserStates {
    states: HashMap<i64, ConversationState>,
}

impl UserStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: i64) -> ConversationState {
        self.states.get(&user_id).copied().unwrap_or_default()
    }

    pub fn is_awaiting(&self, user_id: i64) -> bool {
        self.get(user_id) == ConversationState::AwaitingCityInput
    }

    pub fn set_awaiting(&mut self, user_id: i64) {
        self.states
            .insert(user_id, ConversationState::AwaitingCityInput);
    }

    /// Back to Idle. Idle users are not stored.
    pub fn clear(&mut self, user_id: i64) {
        self.states.remove(&user_id);
    }

    /// Number of users not in Idle.
    pub fn pending(&self) -> usize {
        self.states.len()
    }
}
