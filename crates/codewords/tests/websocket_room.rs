//! A room client talking to a real WebSocket server over loopback.

#[cfg(feature = "websocket")]
mod websocket_room {
    use std::time::Duration;

    use codewords::prelude::*;
    use codewords_protocol::{
        Board, Command, Event, EventMessage, JsonCodec, RemainingCards, decode_command,
        encode_event,
    };
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn snapshot() -> Game {
        Game {
            board: Board(vec![vec![
                Card {
                    word: "river".into(),
                    card_type: CardType::Red,
                    flipped: false,
                    coord: Coord::new(0, 0),
                },
                Card {
                    word: "moon".into(),
                    card_type: CardType::Assassin,
                    flipped: false,
                    coord: Coord::new(0, 1),
                },
            ]]),
            turn_team: Team::Red,
            starting_team: Team::Red,
            remaining_cards: RemainingCards { blue: 8, red: 9 },
            game_status: GameStatus::Playing {},
        }
    }

    #[tokio::test]
    async fn test_room_client_over_websocket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("should have addr");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("should accept");
            let mut ws = tokio_tungstenite::accept_async(stream)
                .await
                .expect("handshake should succeed");

            // The persisted name is announced as soon as the link opens.
            let first = ws.next().await.unwrap().unwrap();
            let command = decode_command(&JsonCodec, first.into_data().as_ref()).unwrap();
            assert_eq!(command, Command::SetName { name: "ana".into() });

            let sender = ClientSession {
                id: 7,
                username: "ana".into(),
                room: "main".into(),
                is_spymaster: false,
            };
            for event in [
                Event::UpdateClientSession { session: sender.clone() },
                Event::GameStateUpdate { game: snapshot() },
            ] {
                let frame = encode_event(
                    &JsonCodec,
                    &EventMessage {
                        sender: sender.clone(),
                        room: "main".into(),
                        event,
                    },
                )
                .unwrap();
                let text = String::from_utf8(frame).unwrap();
                ws.send(Message::text(text)).await.unwrap();
            }

            let next = ws.next().await.unwrap().unwrap();
            let command = decode_command(&JsonCodec, next.into_data().as_ref()).unwrap();
            ws.close(None).await.ok();
            command
        });

        let config = ClientConfig::new(Origin::new(addr.to_string(), false));
        let client = RoomClient::spawn(
            WebSocketConnector,
            MemoryIdentityStore::with_name("ana"),
            config,
            None,
        );
        let mut view = client.subscribe();

        let seen = tokio::time::timeout(TIMEOUT, view.wait_for(|v| !v.is_loading()))
            .await
            .expect("timed out waiting for the board")
            .expect("room task stopped")
            .clone();
        assert_eq!(seen.session.as_ref().map(|s| s.id), Some(7));
        assert_eq!(seen.card_color(Coord::new(0, 1)), Some(CardColor::Unrevealed));

        client.intent(Intent::FlipCard(Coord::new(0, 1))).await.unwrap();
        let command = tokio::time::timeout(TIMEOUT, server).await.unwrap().unwrap();
        assert_eq!(command, Command::FlipCard { coord: Coord::new(0, 1) });

        tokio::time::timeout(TIMEOUT, view.wait_for(|v| v.connection == ConnectionState::Closed))
            .await
            .expect("server close should be observed")
            .expect("room task stopped");

        client.shutdown().await.unwrap();
    }
}
