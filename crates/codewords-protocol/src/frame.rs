//! Whole-frame encoding and decoding.
//!
//! Decoding is total: every input ends up as either a typed message or a
//! [`ProtocolError`] the caller can log and skip. A frame is probed for its
//! tag before the full decode so "well-formed but unknown type" is told
//! apart from "not structured data at all".

use serde::Deserialize;

use crate::{Codec, Command, Event, EventMessage, ProtocolError};

/// Just enough of an inbound envelope to read the event tag.
#[derive(Deserialize)]
struct EventProbe {
    event: TagProbe,
}

#[derive(Deserialize)]
struct TagProbe {
    #[serde(rename = "type")]
    kind: String,
}

/// Encodes an outbound command into one frame.
pub fn encode_command(
    codec: &impl Codec,
    command: &Command,
) -> Result<Vec<u8>, ProtocolError> {
    codec.encode(command)
}

/// Encodes an inbound envelope into one frame (the server's direction).
pub fn encode_event(
    codec: &impl Codec,
    message: &EventMessage,
) -> Result<Vec<u8>, ProtocolError> {
    codec.encode(message)
}

/// Decodes one inbound frame into an [`EventMessage`].
///
/// # Errors
/// - `MalformedFrame`: not structured data, or the payload doesn't fit
///   the tag
/// - `UnknownEventType`: the `event.type` tag isn't in [`Event::TAGS`]
/// - `InvalidMessage`: a pushed board breaks the layout rules
pub fn decode_event(
    codec: &impl Codec,
    frame: &[u8],
) -> Result<EventMessage, ProtocolError> {
    let probe: EventProbe = codec.decode(frame)?;
    if !Event::TAGS.contains(&probe.event.kind.as_str()) {
        return Err(ProtocolError::UnknownEventType(probe.event.kind));
    }

    let message: EventMessage = codec.decode(frame)?;
    if let Event::GameStateUpdate { game } = &message.event {
        game.board
            .check_layout()
            .map_err(ProtocolError::InvalidMessage)?;
    }
    Ok(message)
}

/// Decodes one outbound frame back into a [`Command`].
///
/// # Errors
/// - `MalformedFrame`: not structured data, or the payload doesn't fit
///   the tag
/// - `UnknownCommandType`: the `type` tag isn't in [`Command::TAGS`]
pub fn decode_command(
    codec: &impl Codec,
    frame: &[u8],
) -> Result<Command, ProtocolError> {
    let probe: TagProbe = codec.decode(frame)?;
    if !Command::TAGS.contains(&probe.kind.as_str()) {
        return Err(ProtocolError::UnknownCommandType(probe.kind));
    }
    codec.decode(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Board, Card, CardType, ClientSession, Coord, Game, GameStatus, JsonCodec,
        RemainingCards, Team,
    };

    fn sender() -> ClientSession {
        ClientSession {
            id: 3,
            username: "ana".into(),
            room: "main".into(),
            is_spymaster: false,
        }
    }

    fn frame(event: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "sender": {"id": 3, "username": "ana", "room": "main", "is_spymaster": false},
            "room": "main",
            "event": event,
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_chat_message() {
        let bytes = frame(serde_json::json!({
            "type": "message",
            "data": {"sender": {"id": 3, "username": "ana", "room": "main", "is_spymaster": false}, "text": "hi"}
        }));
        let message = decode_event(&JsonCodec, &bytes).unwrap();
        assert_eq!(message.room, "main");
        assert_eq!(message.sender, sender());
        assert_eq!(
            message.event,
            Event::Message { sender: sender(), text: "hi".into() }
        );
    }

    #[test]
    fn test_decode_state_update_from_server_json() {
        let bytes = frame(serde_json::json!({
            "type": "gameStateUpdate",
            "data": {"game": {
                "board": [[{"word": "apple", "cardType": "BLUE", "flipped": false, "coord": [0, 0]}]],
                "turnTeam": "BLUE",
                "startingTeam": "BLUE",
                "remainingCards": [9, 8],
                "gameStatus": {"type": "playing", "data": {}},
            }},
        }));
        let message = decode_event(&JsonCodec, &bytes).unwrap();
        let Event::GameStateUpdate { game } = message.event else {
            panic!("expected a state update");
        };
        assert_eq!(game.game_status, GameStatus::Playing {});
        assert!(!game.is_over());
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let result = decode_event(&JsonCodec, b"not json at all");
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_unknown_event_type() {
        let bytes = frame(serde_json::json!({"type": "flyToMoon", "data": {"speed": 9000}}));
        let err = decode_event(&JsonCodec, &bytes).unwrap_err();
        match err {
            ProtocolError::UnknownEventType(tag) => assert_eq!(tag, "flyToMoon"),
            other => panic!("expected UnknownEventType, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_known_tag_with_wrong_payload_is_malformed() {
        let bytes = frame(serde_json::json!({"type": "disconnect", "data": {"id": "seven"}}));
        let result = decode_event(&JsonCodec, &bytes);
        assert!(matches!(result, Err(ProtocolError::MalformedFrame(_))));
    }

    #[test]
    fn test_decode_rejects_misplaced_board() {
        let game = Game {
            board: Board(vec![vec![Card {
                word: "apple".into(),
                card_type: CardType::Red,
                flipped: false,
                coord: Coord::new(4, 4),
            }]]),
            turn_team: Team::Red,
            starting_team: Team::Red,
            remaining_cards: RemainingCards { blue: 8, red: 9 },
            game_status: GameStatus::Playing {},
        };
        let message = EventMessage {
            sender: sender(),
            room: "main".into(),
            event: Event::GameStateUpdate { game },
        };
        let bytes = encode_event(&JsonCodec, &message).unwrap();

        let result = decode_event(&JsonCodec, &bytes);
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_encode_command_frame() {
        let bytes = encode_command(&JsonCodec, &Command::FlipCard { coord: Coord::new(1, 2) })
            .unwrap();
        assert_eq!(bytes, br#"{"type":"flipCard","data":{"coord":[1,2]}}"#);
    }

    #[test]
    fn test_decode_command_round_trips_set_name() {
        let bytes = br#"{"type":"setName","data":{"name":"ana"}}"#;
        let command = decode_command(&JsonCodec, bytes).unwrap();
        assert_eq!(command, Command::SetName { name: "ana".into() });
    }

    #[test]
    fn test_decode_unknown_command_type() {
        let bytes = br#"{"type":"cheat","data":{}}"#;
        let result = decode_command(&JsonCodec, bytes);
        assert!(matches!(result, Err(ProtocolError::UnknownCommandType(t)) if t == "cheat"));
    }
}
