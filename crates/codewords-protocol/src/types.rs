//! Core protocol types for Codewords' wire format.
//!
//! Everything in this module travels "on the wire": the game snapshot the
//! server pushes, the session record it keeps for each connection, and the
//! two closed message unions: [`Command`] (client → server) and [`Event`]
//! (server → client).
//!
//! The server owns the game rules. These types carry its decisions; nothing
//! here computes an outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Teams and cards
// ---------------------------------------------------------------------------

/// One of the two competing sides.
///
/// `#[serde(rename_all = "SCREAMING_SNAKE_CASE")]` maps `Team::Red` to the
/// `"RED"` string the server uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Red,
    Blue,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "RED"),
            Self::Blue => write!(f, "BLUE"),
        }
    }
}

/// The hidden category of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Red,
    Blue,
    Bystander,
    Assassin,
}

impl CardType {
    /// The team this category belongs to, if any.
    pub fn team(self) -> Option<Team> {
        match self {
            Self::Red => Some(Team::Red),
            Self::Blue => Some(Team::Blue),
            Self::Bystander | Self::Assassin => None,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "RED"),
            Self::Blue => write!(f, "BLUE"),
            Self::Bystander => write!(f, "BYSTANDER"),
            Self::Assassin => write!(f, "ASSASSIN"),
        }
    }
}

/// A cell address on the board: `(row, col)`.
///
/// On the wire this is a two-element array `[row, col]`; the
/// `from`/`into` attributes route serde through the tuple form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Coord> for (usize, usize) {
    fn from(coord: Coord) -> Self {
        (coord.row, coord.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A single word card.
///
/// Cards are immutable once received. A state update replaces the whole
/// board rather than patching individual cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub word: String,
    pub card_type: CardType,
    pub flipped: bool,
    pub coord: Coord,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A rectangular grid of cards, stored row-major.
///
/// `#[serde(transparent)]` keeps the wire form a plain nested array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board(pub Vec<Vec<Card>>);

impl Board {
    /// The rows of the board, top to bottom.
    pub fn rows(&self) -> &[Vec<Card>] {
        &self.0
    }

    /// Every card, row by row.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.0.iter().flatten()
    }

    /// The card at `coord`, if it lies on the board.
    pub fn get(&self, coord: Coord) -> Option<&Card> {
        self.0.get(coord.row).and_then(|row| row.get(coord.col))
    }

    /// `(rows, cols)`; `cols` is taken from the first row.
    pub fn dimensions(&self) -> (usize, usize) {
        let cols = self.0.first().map_or(0, Vec::len);
        (self.0.len(), cols)
    }

    /// Checks the board is rectangular and every card's `coord` matches the
    /// row/column it sits in.
    pub fn check_layout(&self) -> Result<(), String> {
        let (_, cols) = self.dimensions();
        for (row, cards) in self.0.iter().enumerate() {
            if cards.len() != cols {
                return Err(format!(
                    "row {row} has {} cards, expected {cols}",
                    cards.len()
                ));
            }
            for (col, card) in cards.iter().enumerate() {
                if card.coord != Coord::new(row, col) {
                    return Err(format!(
                        "card {:?} at ({row}, {col}) claims coord {}",
                        card.word, card.coord
                    ));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// Cards each team still has to find, as counted by the server.
///
/// Wire form is `[blue, red]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct RemainingCards {
    pub blue: u32,
    pub red: u32,
}

impl RemainingCards {
    pub fn for_team(&self, team: Team) -> u32 {
        match team {
            Team::Blue => self.blue,
            Team::Red => self.red,
        }
    }
}

impl From<(u32, u32)> for RemainingCards {
    fn from((blue, red): (u32, u32)) -> Self {
        Self { blue, red }
    }
}

impl From<RemainingCards> for (u32, u32) {
    fn from(remaining: RemainingCards) -> Self {
        (remaining.blue, remaining.red)
    }
}

/// Whether the game is still running.
///
/// ```text
/// {"type": "playing", "data": {}}
/// {"type": "over", "data": {"winner": "RED"}}
/// ```
///
/// `Over` is terminal; only a new game (which arrives as a fresh snapshot)
/// brings back `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum GameStatus {
    Playing {},
    Over { winner: Team },
}

/// The full authoritative game snapshot pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub board: Board,
    pub turn_team: Team,
    pub starting_team: Team,
    /// Trusted as pushed, never recomputed from the board.
    pub remaining_cards: RemainingCards,
    pub game_status: GameStatus,
}

impl Game {
    /// Returns `true` once the server has declared a winner.
    pub fn is_over(&self) -> bool {
        matches!(self.game_status, GameStatus::Over { .. })
    }

    /// The winning team, if the game is over.
    pub fn winner(&self) -> Option<Team> {
        match self.game_status {
            GameStatus::Over { winner } => Some(winner),
            GameStatus::Playing {} => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ClientSession
// ---------------------------------------------------------------------------

/// The server's record of one connection.
///
/// `is_spymaster` keeps the server's snake_case name on the wire;
/// `isSpymaster` is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    pub room: String,
    #[serde(default, alias = "isSpymaster")]
    pub is_spymaster: bool,
}

impl ClientSession {
    /// The name to show for this client: its username, or `User id N` if it
    /// hasn't set one yet.
    pub fn display_name(&self) -> String {
        if self.username.trim().is_empty() {
            format!("User id {}", self.id)
        } else {
            self.username.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Command: client → server
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// `#[serde(tag = "type", content = "data")]` produces the adjacently tagged
/// envelope the server expects:
///   `{ "type": "flipCard", "data": { "coord": [1, 2] } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Command {
    /// Chat message to the room.
    Message { text: String },
    /// Restart with a fresh board.
    NewGame {},
    /// Reveal the card at `coord`.
    FlipCard { coord: Coord },
    /// Set this connection's display name.
    SetName { name: String },
    /// Claim (or give up) the spymaster role.
    SetSpyMaster { spymaster: bool },
    /// End the current team's turn.
    NextTurn {},
}

impl Command {
    /// Every tag in the closed command set.
    pub const TAGS: &'static [&'static str] = &[
        "message",
        "newGame",
        "flipCard",
        "setName",
        "setSpyMaster",
        "nextTurn",
    ];

    /// The wire tag of this command.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::NewGame {} => "newGame",
            Self::FlipCard { .. } => "flipCard",
            Self::SetName { .. } => "setName",
            Self::SetSpyMaster { .. } => "setSpyMaster",
            Self::NextTurn {} => "nextTurn",
        }
    }
}

// ---------------------------------------------------------------------------
// Event: server → client
// ---------------------------------------------------------------------------

/// Everything the server can tell a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Event {
    Connect {
        id: u64,
    },
    Disconnect {
        id: u64,
    },
    TimedOut {
        id: u64,
    },
    Message {
        sender: ClientSession,
        text: String,
    },
    GameStateUpdate {
        game: Game,
    },
    /// A restart was requested; the new board follows as a
    /// `GameStateUpdate`.
    NewGame {},
    SetName {
        id: u64,
        name: String,
    },
    /// The outcome of a flip: the card as it is after flipping.
    #[serde(rename_all = "camelCase")]
    FlipCard {
        flipped_card: Card,
    },
    UpdateClientSession {
        session: ClientSession,
    },
    SetSpyMaster {},
    NextTurn {},
}

impl Event {
    /// Every tag in the closed event set.
    pub const TAGS: &'static [&'static str] = &[
        "connect",
        "disconnect",
        "timedOut",
        "message",
        "gameStateUpdate",
        "newGame",
        "setName",
        "flipCard",
        "updateClientSession",
        "setSpyMaster",
        "nextTurn",
    ];

    /// The wire tag of this event.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::Disconnect { .. } => "disconnect",
            Self::TimedOut { .. } => "timedOut",
            Self::Message { .. } => "message",
            Self::GameStateUpdate { .. } => "gameStateUpdate",
            Self::NewGame {} => "newGame",
            Self::SetName { .. } => "setName",
            Self::FlipCard { .. } => "flipCard",
            Self::UpdateClientSession { .. } => "updateClientSession",
            Self::SetSpyMaster {} => "setSpyMaster",
            Self::NextTurn {} => "nextTurn",
        }
    }
}

/// The inbound envelope: who caused the event, in which room, and what
/// happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub sender: ClientSession,
    pub room: String,
    pub event: Event,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The server defines the exact JSON shapes; these tests pin our serde
    //! attributes to them.

    use serde_json::json;

    use super::*;

    fn card(word: &str, card_type: CardType, row: usize, col: usize) -> Card {
        Card {
            word: word.into(),
            card_type,
            flipped: false,
            coord: Coord::new(row, col),
        }
    }

    #[test]
    fn test_team_and_card_type_are_upper_case() {
        assert_eq!(serde_json::to_value(Team::Red).unwrap(), json!("RED"));
        assert_eq!(
            serde_json::to_value(CardType::Bystander).unwrap(),
            json!("BYSTANDER")
        );
        let t: CardType = serde_json::from_str("\"ASSASSIN\"").unwrap();
        assert_eq!(t, CardType::Assassin);
    }

    #[test]
    fn test_card_json_format() {
        let json = serde_json::to_value(card("apple", CardType::Blue, 1, 2)).unwrap();
        assert_eq!(
            json,
            json!({"word": "apple", "cardType": "BLUE", "flipped": false, "coord": [1, 2]})
        );
    }

    #[test]
    fn test_game_json_format() {
        let game = Game {
            board: Board(vec![vec![card("apple", CardType::Red, 0, 0)]]),
            turn_team: Team::Blue,
            starting_team: Team::Blue,
            remaining_cards: RemainingCards { blue: 9, red: 8 },
            game_status: GameStatus::Playing {},
        };
        let json = serde_json::to_value(&game).unwrap();

        assert_eq!(json["turnTeam"], "BLUE");
        assert_eq!(json["startingTeam"], "BLUE");
        assert_eq!(json["remainingCards"], json!([9, 8]));
        assert_eq!(json["gameStatus"], json!({"type": "playing", "data": {}}));
        assert_eq!(json["board"][0][0]["word"], "apple");
    }

    #[test]
    fn test_game_status_over_carries_winner() {
        let status: GameStatus =
            serde_json::from_value(json!({"type": "over", "data": {"winner": "RED"}}))
                .unwrap();
        assert_eq!(status, GameStatus::Over { winner: Team::Red });
    }

    #[test]
    fn test_game_status_playing_has_empty_payload() {
        let status: GameStatus =
            serde_json::from_value(json!({"type": "playing", "data": {}})).unwrap();
        assert_eq!(status, GameStatus::Playing {});
    }

    #[test]
    fn test_winner_and_remaining_per_team() {
        let mut game = Game {
            board: Board(vec![vec![card("apple", CardType::Red, 0, 0)]]),
            turn_team: Team::Red,
            starting_team: Team::Red,
            remaining_cards: RemainingCards { blue: 8, red: 0 },
            game_status: GameStatus::Playing {},
        };
        assert_eq!(game.winner(), None);
        assert_eq!(game.remaining_cards.for_team(Team::Red), 0);
        assert_eq!(game.remaining_cards.for_team(Team::Blue), 8);

        game.game_status = GameStatus::Over { winner: Team::Red };
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Team::Red));
    }

    #[test]
    fn test_client_session_accepts_both_spymaster_spellings() {
        let snake: ClientSession = serde_json::from_value(
            json!({"id": 1, "username": "ana", "room": "main", "is_spymaster": true}),
        )
        .unwrap();
        let camel: ClientSession = serde_json::from_value(
            json!({"id": 1, "username": "ana", "room": "main", "isSpymaster": true}),
        )
        .unwrap();
        assert!(snake.is_spymaster);
        assert_eq!(snake, camel);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut session = ClientSession {
            id: 7,
            username: String::new(),
            room: "main".into(),
            is_spymaster: false,
        };
        assert_eq!(session.display_name(), "User id 7");
        session.username = "ana".into();
        assert_eq!(session.display_name(), "ana");
    }

    #[test]
    fn test_command_json_formats() {
        let cases = [
            (Command::Message { text: "hi".into() }, json!({"type": "message", "data": {"text": "hi"}})),
            (Command::NewGame {}, json!({"type": "newGame", "data": {}})),
            (
                Command::FlipCard { coord: Coord::new(1, 2) },
                json!({"type": "flipCard", "data": {"coord": [1, 2]}}),
            ),
            (Command::SetName { name: "ana".into() }, json!({"type": "setName", "data": {"name": "ana"}})),
            (
                Command::SetSpyMaster { spymaster: true },
                json!({"type": "setSpyMaster", "data": {"spymaster": true}}),
            ),
            (Command::NextTurn {}, json!({"type": "nextTurn", "data": {}})),
        ];
        for (command, expected) in cases {
            assert_eq!(serde_json::to_value(&command).unwrap(), expected);
            assert_eq!(expected["type"], command.tag());
            assert!(Command::TAGS.contains(&command.tag()));
        }
    }

    #[test]
    fn test_event_flip_card_uses_camel_case_field() {
        let event: Event = serde_json::from_value(json!({
            "type": "flipCard",
            "data": {"flippedCard": {"word": "apple", "cardType": "RED", "flipped": true, "coord": [0, 0]}}
        }))
        .unwrap();
        let Event::FlipCard { flipped_card } = event else {
            panic!("expected FlipCard");
        };
        assert!(flipped_card.flipped);
    }

    #[test]
    fn test_event_tags_match_serde_names() {
        let events = [
            Event::Connect { id: 1 },
            Event::TimedOut { id: 1 },
            Event::NewGame {},
            Event::SetSpyMaster {},
            Event::NextTurn {},
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.tag());
            assert!(Event::TAGS.contains(&event.tag()));
        }
    }

    #[test]
    fn test_board_lookup_and_dimensions() {
        let board = Board(vec![
            vec![card("a", CardType::Red, 0, 0), card("b", CardType::Blue, 0, 1)],
            vec![card("c", CardType::Bystander, 1, 0), card("d", CardType::Assassin, 1, 1)],
        ]);
        assert_eq!(board.dimensions(), (2, 2));
        assert_eq!(board.get(Coord::new(1, 1)).unwrap().word, "d");
        assert!(board.get(Coord::new(2, 0)).is_none());
        assert_eq!(board.cards().count(), 4);
        assert!(board.check_layout().is_ok());
    }

    #[test]
    fn test_board_layout_rejects_misplaced_coord() {
        let board = Board(vec![vec![
            card("a", CardType::Red, 0, 0),
            card("b", CardType::Blue, 3, 3),
        ]]);
        assert!(board.check_layout().is_err());
    }

    #[test]
    fn test_board_layout_rejects_ragged_rows() {
        let board = Board(vec![
            vec![card("a", CardType::Red, 0, 0), card("b", CardType::Blue, 0, 1)],
            vec![card("c", CardType::Bystander, 1, 0)],
        ]);
        assert!(board.check_layout().is_err());
    }
}
