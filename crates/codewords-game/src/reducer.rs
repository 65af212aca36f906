//! The game state reducer: folds inbound events into local state.

use codewords_protocol::{ClientSession, Event, EventMessage, Game};

use crate::{Notification, StyleHint};

/// Applies decoded events, strictly one at a time, to the client's state.
///
/// Owns three things, and is the only thing that changes them:
///
/// - the last applied [`Game`] snapshot, replaced wholesale on every
///   `GameStateUpdate` and kept around so the next update can be diffed
///   against it for turn changes
/// - the server-confirmed [`ClientSession`], replaced wholesale on every
///   `UpdateClientSession`
/// - the notification log, append-only for the lifetime of the room
#[derive(Debug, Clone, Default)]
pub struct GameReducer {
    last_game: Option<Game>,
    session: Option<ClientSession>,
    notifications: Vec<Notification>,
}

impl GameReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current game snapshot; `None` until the first update arrives.
    pub fn game(&self) -> Option<&Game> {
        self.last_game.as_ref()
    }

    /// The session the server last pushed for this connection.
    pub fn session(&self) -> Option<&ClientSession> {
        self.session.as_ref()
    }

    /// Every notification appended so far, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Applies one event.
    ///
    /// Returns the notification it appended, if it produced one. Each event
    /// appends at most one entry.
    pub fn apply(&mut self, message: EventMessage) -> Option<&Notification> {
        let EventMessage {
            sender,
            room,
            event,
        } = message;
        tracing::trace!(%room, event = event.tag(), sender = sender.id, "applying event");

        let notification = match event {
            Event::Connect { id } => {
                tracing::debug!(%room, id, "client connected");
                None
            }
            Event::Disconnect { id } => Some(Notification::plain(format!(
                "{} disconnected from the game!",
                name_or_id(&sender, id)
            ))),
            Event::TimedOut { id } => Some(Notification::plain(format!(
                "{} timed out and has been disconnected from the game!",
                name_or_id(&sender, id)
            ))),
            Event::Message { sender, text } => {
                Some(Notification::plain(format!("{}: {text}", sender.username)))
            }
            Event::GameStateUpdate { game } => self.replace_game(game),
            Event::NewGame {} => Some(Notification::plain(format!(
                "Game restarted by {}!",
                sender.display_name()
            ))),
            Event::SetName { name, .. } => {
                Some(Notification::plain(format!("{name} joined the game!")))
            }
            Event::FlipCard { flipped_card } => {
                let category = flipped_card.card_type;
                Some(
                    Notification::plain(format!("{} flipped ", sender.display_name()))
                        .styled(flipped_card.word, StyleHint::Card(category))
                        .text(" (")
                        .styled(category.to_string(), StyleHint::Card(category))
                        .text(")"),
                )
            }
            Event::UpdateClientSession { session } => {
                tracing::debug!(
                    id = session.id,
                    spymaster = session.is_spymaster,
                    "session updated"
                );
                self.session = Some(session);
                None
            }
            Event::SetSpyMaster {} => Some(Notification::plain(format!(
                "{} claimed spymaster!",
                sender.display_name()
            ))),
            Event::NextTurn {} => Some(Notification::plain(format!(
                "{} advanced the turn",
                sender.display_name()
            ))),
        };

        let notification = notification?;
        self.notifications.push(notification);
        self.notifications.last()
    }

    /// Swaps in a new snapshot, returning a turn-change notification if the
    /// turn moved to the other team since the previous one.
    fn replace_game(&mut self, game: Game) -> Option<Notification> {
        let changed = self
            .last_game
            .as_ref()
            .map(|prev| prev.turn_team)
            .filter(|prev| *prev != game.turn_team)
            .map(|_| {
                let team = game.turn_team;
                Notification::plain("It's now ")
                    .styled(team.to_string(), StyleHint::Team(team))
                    .text("'s turn!")
            });

        self.last_game = Some(game);
        changed
    }
}

/// The sender's name, or the event's id when the sender hasn't set one.
fn name_or_id(sender: &ClientSession, id: u64) -> String {
    if sender.username.trim().is_empty() {
        format!("User id {id}")
    } else {
        sender.username.clone()
    }
}
