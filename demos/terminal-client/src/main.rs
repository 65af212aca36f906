use codewords::game::text_color;
use codewords::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

const IDENTITY_FILE: &str = "codewords-identity.json";

const HELP: &str = "\
commands:
  /flip <row> <col>   reveal a card
  /restart            start a new game
  /spymaster          claim spymaster
  /next               end your team's turn
  /name <name>        change your display name
  /focus              reconnect if the link dropped
  /quit               leave
anything else is sent as chat";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Intent(Intent),
    Focus,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Ok(Input::Intent(Intent::SendChat(line.to_string())));
    };

    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "flip" => {
            let mut coord = parts.map(str::parse::<usize>);
            match (coord.next(), coord.next()) {
                (Some(Ok(row)), Some(Ok(col))) => {
                    Ok(Input::Intent(Intent::FlipCard(Coord::new(row, col))))
                }
                _ => Err("usage: /flip <row> <col>".into()),
            }
        }
        "restart" => Ok(Input::Intent(Intent::RestartGame)),
        "spymaster" => Ok(Input::Intent(Intent::ClaimSpymaster)),
        "next" => Ok(Input::Intent(Intent::AdvanceTurn)),
        "name" => {
            let name = parts.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err("usage: /name <name>".into());
            }
            Ok(Input::Intent(Intent::SetName(name)))
        }
        "focus" => Ok(Input::Focus),
        "help" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("unknown command /{other}, try /help")),
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn render_board(view: &RoomView) -> String {
    let Some(game) = &view.game else {
        return "Loading...".into();
    };

    let mut out = String::new();
    for row in game.board.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|card| {
                let color = view.card_color(card.coord).unwrap_or(CardColor::Unrevealed);
                let mark = if card.flipped { '*' } else { ' ' };
                let word = format!("{:<12}", card.word);
                let word = match text_color(card) {
                    Some(_) => format!("\x1b[1m{word}\x1b[0m"),
                    None => word,
                };
                format!("{mark}{word}[{:<5}]", color.css_name())
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }

    match game.winner() {
        Some(winner) => out.push_str(&format!("Game over, {winner} wins!")),
        None => out.push_str(&format!(
            "{}'s turn | red left: {} | blue left: {}",
            game.turn_team,
            game.remaining_cards.for_team(Team::Red),
            game.remaining_cards.for_team(Team::Blue)
        )),
    }
    out
}

// ---------------------------------------------------------------------------
// Client bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codewords=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let origin = Origin::parse(&args.next().unwrap_or_else(|| "http://127.0.0.1:8080".into()))?;
    let room = args.next();

    tracing::info!(
        %origin,
        room = room.as_deref().unwrap_or(codewords::DEFAULT_ROOM),
        "starting terminal client"
    );
    println!("type /help for commands");
    let client = RoomClient::spawn(
        WebSocketConnector,
        FileIdentityStore::new(IDENTITY_FILE),
        ClientConfig::new(origin),
        room.as_deref(),
    );

    let mut view = client.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;
    let mut last_game = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line) {
                    Ok(Input::Intent(intent)) => client.intent(intent).await?,
                    Ok(Input::Focus) => client.focus_regained().await?,
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Err(usage) => println!("{usage}"),
                }
            }
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.borrow_and_update().clone();
                for notification in &snapshot.notifications[shown.min(snapshot.notifications.len())..] {
                    println!("> {notification}");
                }
                shown = snapshot.notifications.len();
                if snapshot.game != last_game {
                    println!("{}", render_board(&snapshot));
                    last_game = snapshot.game;
                }
            }
        }
    }

    client.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(
            parse_input("  hello there "),
            Ok(Input::Intent(Intent::SendChat("hello there".into())))
        );
    }

    #[test]
    fn test_flip_parses_coordinates() {
        assert_eq!(
            parse_input("/flip 1 2"),
            Ok(Input::Intent(Intent::FlipCard(Coord::new(1, 2))))
        );
        assert!(parse_input("/flip 1").is_err());
        assert!(parse_input("/flip a b").is_err());
    }

    #[test]
    fn test_name_keeps_spaces() {
        assert_eq!(
            parse_input("/name Ana Maria"),
            Ok(Input::Intent(Intent::SetName("Ana Maria".into())))
        );
        assert!(parse_input("/name").is_err());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_input("/restart"), Ok(Input::Intent(Intent::RestartGame)));
        assert_eq!(parse_input("/spymaster"), Ok(Input::Intent(Intent::ClaimSpymaster)));
        assert_eq!(parse_input("/next"), Ok(Input::Intent(Intent::AdvanceTurn)));
        assert_eq!(parse_input("/focus"), Ok(Input::Focus));
        assert_eq!(parse_input("/quit"), Ok(Input::Quit));
        assert!(parse_input("/dance").is_err());
    }

    #[test]
    fn test_render_hides_unflipped_categories() {
        let view = RoomView {
            game: Some(Game {
                board: codewords::protocol::Board(vec![vec![Card {
                    word: "moon".into(),
                    card_type: CardType::Assassin,
                    flipped: false,
                    coord: Coord::new(0, 0),
                }]]),
                turn_team: Team::Blue,
                starting_team: Team::Blue,
                remaining_cards: codewords::protocol::RemainingCards { blue: 9, red: 8 },
                game_status: GameStatus::Playing {},
            }),
            ..RoomView::default()
        };
        let out = render_board(&view);
        assert!(out.contains("moon"));
        assert!(out.contains("[white]"));
        assert!(!out.contains("[grey"));
        assert!(out.contains("BLUE's turn"));
        assert_eq!(render_board(&RoomView::default()), "Loading...");

        let mut over = view.clone();
        if let Some(game) = over.game.as_mut() {
            game.game_status = GameStatus::Over { winner: Team::Red };
        }
        let out = render_board(&over);
        assert!(out.contains("Game over, RED wins!"));
        assert!(out.contains("[grey ]"));
    }
}
