// src/types/conversation.rs
//! Conversation history exchanged with the Q&A service.

use serde::{Deserialize, Serialize};

/// Speaker of a prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One prior message. Order within a history is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Keeps the most recent `limit` turns, preserving their order.
pub fn recent_turns(history: &[ConversationTurn], limit: Option<usize>) -> &[ConversationTurn] {
    match limit {
        Some(limit) if history.len() > limit => &history[history.len() - limit..],
        _ => history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_round_trips_lowercase_role() {
        let json = serde_json::json!({ "role": "assistant", "content": "hi" });
        let turn: ConversationTurn = serde_json::from_value(json).unwrap();
        assert_eq!(turn, ConversationTurn::assistant("hi"));
    }

    #[test]
    fn recent_turns_drops_oldest_first() {
        let history: Vec<_> = (0..5).map(|i| ConversationTurn::user(i.to_string())).collect();
        let kept = recent_turns(&history, Some(2));
        assert_eq!(kept, &history[3..]);
        assert_eq!(recent_turns(&history, None).len(), 5);
        assert_eq!(recent_turns(&history, Some(10)).len(), 5);
    }
}
