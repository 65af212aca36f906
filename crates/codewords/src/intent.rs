//! User intents and how they become wire commands.

use codewords_game::{GameReducer, can_flip, is_game_over, is_spymaster};
use codewords_protocol::{Command, Coord};

/// A discrete action the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Post a chat line.
    SendChat(String),
    /// Reveal the card at a coordinate.
    FlipCard(Coord),
    /// Start a new game in this room.
    RestartGame,
    /// Become the spymaster.
    ClaimSpymaster,
    /// Pass the turn to the other team.
    AdvanceTurn,
    /// Change the display name.
    SetName(String),
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SendChat(_) => "sendChat",
            Self::FlipCard(_) => "flipCard",
            Self::RestartGame => "restartGame",
            Self::ClaimSpymaster => "claimSpymaster",
            Self::AdvanceTurn => "advanceTurn",
            Self::SetName(_) => "setName",
        }
    }
}

/// Maps an intent onto the command to send, given the current state.
///
/// Returns `None` when there is nothing worth sending:
/// - an empty chat line or blank name
/// - a flip of a card that isn't on the board, is already flipped, or is
///   being flipped after game over or by the spymaster
pub fn encode_intent(intent: &Intent, state: &GameReducer) -> Option<Command> {
    match intent {
        Intent::SendChat(text) => {
            if text.trim().is_empty() {
                return None;
            }
            Some(Command::Message { text: text.clone() })
        }
        Intent::FlipCard(coord) => {
            let Some(card) = state.game().and_then(|game| game.board.get(*coord)) else {
                tracing::debug!(%coord, "no card at coordinate, not flipping");
                return None;
            };
            let game_over = is_game_over(state.game());
            let spymaster = is_spymaster(state.session());
            if !can_flip(card, game_over, spymaster) {
                tracing::debug!(%coord, flipped = card.flipped, game_over, spymaster, "card can't be flipped");
                return None;
            }
            Some(Command::FlipCard { coord: *coord })
        }
        Intent::RestartGame => Some(Command::NewGame {}),
        Intent::ClaimSpymaster => Some(Command::SetSpyMaster { spymaster: true }),
        Intent::AdvanceTurn => Some(Command::NextTurn {}),
        Intent::SetName(name) => {
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Command::SetName { name: name.to_string() })
        }
    }
}
