//! Offset cursor for `getUpdates`.

use wbot_core::Update;

/// Next offset to request: one past the highest update id seen. Never moves backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(i64);

impl Cursor {
    pub fn new(offset: i64) -> Self {
        Self(offset)
    }

    pub fn offset(&self) -> i64 {
        self.0
    }

    /// Moves past every update in `batch`. Empty or stale batches leave the cursor unchanged.
    pub fn advance_past(&mut self, batch: &[Update]) {
        if let Some(max_id) = batch.iter().map(|u| u.id).max() {
            self.0 = self.0.max(max_id.saturating_add(1));
        }
    }
}
