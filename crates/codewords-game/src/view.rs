//! Derived view state. Nothing here is stored; every value is computed from
//! the current snapshot when the renderer asks for it.

use codewords_protocol::{Card, CardType, ClientSession, Game};

/// The colour a card is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardColor {
    /// Category hidden from this viewer.
    Unrevealed,
    Red,
    Blue,
    Bystander,
    Assassin,
}

impl CardColor {
    /// The true colour of a category.
    pub fn of(card_type: CardType) -> Self {
        match card_type {
            CardType::Red => Self::Red,
            CardType::Blue => Self::Blue,
            CardType::Bystander => Self::Bystander,
            CardType::Assassin => Self::Assassin,
        }
    }

    /// CSS colour name for the card background.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Unrevealed => "white",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Bystander => "tan",
            Self::Assassin => "grey",
        }
    }
}

/// What colour `card` shows to a viewer.
///
/// The true category is visible when the card is flipped, when the game is
/// over, or when the viewer is the spymaster. Otherwise every card is
/// [`CardColor::Unrevealed`], whatever its category.
pub fn resolve_color(card: &Card, game_over: bool, is_spymaster: bool) -> CardColor {
    if card.flipped || game_over || is_spymaster {
        CardColor::of(card.card_type)
    } else {
        CardColor::Unrevealed
    }
}

/// Text colour for the word on `card`, when the default isn't readable.
///
/// Only a revealed team card gets white text; a spymaster's view of a
/// hidden team card keeps the default.
pub fn text_color(card: &Card) -> Option<&'static str> {
    (card.flipped && card.card_type.team().is_some()).then_some("white")
}

/// Whether flipping `card` is worth asking the server for.
///
/// The server still decides; this only avoids sending requests that can't
/// do anything.
pub fn can_flip(card: &Card, game_over: bool, is_spymaster: bool) -> bool {
    !card.flipped && !game_over && !is_spymaster
}

/// `true` once the server has declared the game over. No game yet is not
/// over.
pub fn is_game_over(game: Option<&Game>) -> bool {
    game.is_some_and(Game::is_over)
}

/// The spymaster flag from the server-pushed session; `false` until one
/// arrives.
pub fn is_spymaster(session: Option<&ClientSession>) -> bool {
    session.is_some_and(|s| s.is_spymaster)
}
