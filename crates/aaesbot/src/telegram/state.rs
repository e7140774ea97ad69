//! Per-user conversation state between a menu choice and the next message.

use aaescore::drive::Level;
use aaescore::SearchMode;
use dashmap::DashMap;
use teloxide::types::UserId;

/// What the next plain text message from a user means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// The next message is a search term.
    AwaitingQuery { mode: SearchMode, level: Option<Level> },
    /// Slides were picked; waiting for a level button.
    AwaitingLevel,
    /// The next message is a course list for the GPA calculator.
    AwaitingGpa,
}

impl ChatState {
    /// Prompt shown when the state is entered.
    pub fn prompt(&self) -> String {
        match self {
            ChatState::AwaitingQuery {
                mode: SearchMode::Slides,
                level,
            } => match level {
                Some(level) => format!(
                    "Type the course name or code to find {} level slides. Use /cancel to return.",
                    level.as_ref().trim_start_matches('L')
                ),
                None => "Type the course name or code to find slides. Use /cancel to return.".to_string(),
            },
            ChatState::AwaitingQuery {
                mode: SearchMode::Pastq, ..
            } => "Type the course name or code to find past questions. Use /cancel to return.".to_string(),
            ChatState::AwaitingQuery { .. } => {
                "Type anything to search all slides and past questions. Use /cancel to return.".to_string()
            }
            ChatState::AwaitingLevel => "Choose level".to_string(),
            ChatState::AwaitingGpa => indoc::indoc! {"
                Send your results in this format (one per line):
                Course, Grade/Mark, Credits
                Examples:
                Chemistry, 85, 3
                Math, B, 4
                Physics, 72, 2"}
            .to_string(),
        }
    }
}

/// Conversation state keyed by Telegram user.
pub type StateMap = DashMap<UserId, ChatState>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slides_prompt_mentions_level() {
        let state = ChatState::AwaitingQuery {
            mode: SearchMode::Slides,
            level: Some(Level::L300),
        };
        assert_eq!(
            state.prompt(),
            "Type the course name or code to find 300 level slides. Use /cancel to return."
        );
    }

    #[test]
    fn test_gpa_prompt_has_example_lines() {
        let prompt = ChatState::AwaitingGpa.prompt();
        assert!(prompt.starts_with("Send your results"));
        assert!(prompt.contains("\nMath, B, 4\n"));
    }

    #[test]
    fn test_state_map_replaces_previous_state() {
        let states = StateMap::new();
        let user = UserId(7);
        states.insert(user, ChatState::AwaitingLevel);
        states.insert(user, ChatState::AwaitingGpa);
        assert_eq!(states.get(&user).map(|s| *s), Some(ChatState::AwaitingGpa));
    }
}
