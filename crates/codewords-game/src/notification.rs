//! Entries of the notification log.

use std::fmt;

use codewords_protocol::{CardType, Team};
use serde::{Deserialize, Serialize};

/// How a styled fragment wants to be drawn. The renderer decides what that
/// means (a CSS colour, an ANSI escape, nothing at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleHint {
    /// Coloured as the given team.
    Team(Team),
    /// Coloured as the given card category.
    Card(CardType),
}

/// One piece of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fragment {
    PlainText(String),
    Styled { text: String, style: StyleHint },
}

impl Fragment {
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) | Self::Styled { text, .. } => text,
        }
    }
}

/// A single log entry: a sequence of plain and styled fragments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notification {
    fragments: Vec<Fragment>,
}

impl Notification {
    /// A notification made of one plain-text fragment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            fragments: vec![Fragment::PlainText(text.into())],
        }
    }

    /// Appends a plain-text fragment.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.fragments.push(Fragment::PlainText(text.into()));
        self
    }

    /// Appends a styled fragment.
    #[must_use]
    pub fn styled(mut self, text: impl Into<String>, style: StyleHint) -> Self {
        self.fragments.push(Fragment::Styled {
            text: text.into(),
            style,
        });
        self
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Returns `true` if any fragment carries a style.
    pub fn is_decorated(&self) -> bool {
        self.fragments
            .iter()
            .any(|f| matches!(f, Fragment::Styled { .. }))
    }
}

/// Concatenated text with styling dropped.
impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.fragments {
            f.write_str(fragment.text())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_notification_display() {
        let n = Notification::plain("ana: hi");
        assert_eq!(n.to_string(), "ana: hi");
        assert!(!n.is_decorated());
    }

    #[test]
    fn test_styled_fragments_keep_order() {
        let n = Notification::default()
            .text("It's now ")
            .styled("RED", StyleHint::Team(Team::Red))
            .text("'s turn!");

        assert_eq!(n.to_string(), "It's now RED's turn!");
        assert!(n.is_decorated());
        assert_eq!(n.fragments().len(), 3);
        assert_eq!(
            n.fragments()[1],
            Fragment::Styled {
                text: "RED".into(),
                style: StyleHint::Team(Team::Red)
            }
        );
    }
}
