//! Room client actor: an isolated Tokio task that owns one room's state.
//!
//! The task owns the [`ConnectionManager`] and the [`GameReducer`] and is
//! the only thing that touches them. The outside world talks to it through
//! a [`RoomClient`] handle: commands go in over an mpsc channel, and every
//! state change is published as a [`RoomView`] snapshot over a watch
//! channel. Inbound frames and outbound intents are therefore handled one
//! at a time, in arrival order.

use codewords_game::{CardColor, GameReducer, Notification, is_game_over, is_spymaster, resolve_color};
use codewords_protocol::{
    ClientSession, Command, Coord, Event, Game, JsonCodec, ProtocolError, decode_event,
};
use codewords_session::IdentityStore;
use codewords_transport::Connector;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::{ClientConfig, CodewordsError, ConnectionManager, ConnectionState, Intent, encode_intent};

/// Commands sent to the room task through its channel.
enum ClientCommand {
    /// Act on a user intent.
    Intent(Intent),

    /// The host regained focus; reconnect if the link is closed.
    FocusRegained,

    /// Tear down the connection and stop the task.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Everything the rendering layer reads, as of the last processed input.
#[derive(Debug, Clone, Default)]
pub struct RoomView {
    /// The room this client joined.
    pub room: String,
    /// Current connection lifecycle state.
    pub connection: ConnectionState,
    /// The latest game snapshot; `None` while loading.
    pub game: Option<Game>,
    /// The server-confirmed session for this connection.
    pub session: Option<ClientSession>,
    /// The locally chosen display name, confirmed or not.
    pub display_name: Option<String>,
    /// Every notification so far, oldest first.
    pub notifications: Vec<Notification>,
}

impl RoomView {
    /// `true` until the first game snapshot arrives.
    pub fn is_loading(&self) -> bool {
        self.game.is_none()
    }

    pub fn is_game_over(&self) -> bool {
        is_game_over(self.game.as_ref())
    }

    pub fn is_spymaster(&self) -> bool {
        is_spymaster(self.session.as_ref())
    }

    /// The colour to draw the card at `coord` in, for this viewer.
    pub fn card_color(&self, coord: Coord) -> Option<CardColor> {
        let card = self.game.as_ref()?.board.get(coord)?;
        Some(resolve_color(card, self.is_game_over(), self.is_spymaster()))
    }
}

/// Handle to a running room task.
///
/// Dropping every handle closes the command channel, which stops the task
/// and tears the connection down.
pub struct RoomClient {
    commands: mpsc::Sender<ClientCommand>,
    view: watch::Receiver<RoomView>,
    task: JoinHandle<()>,
}

impl RoomClient {
    /// Spawns the room task and starts connecting to `room` (or the
    /// configured default). Must be called inside a Tokio runtime.
    ///
    /// A failed first connect isn't an error here: the view reports
    /// `Closed` and [`focus_regained`](Self::focus_regained) retries.
    pub fn spawn<C, S>(connector: C, store: S, config: ClientConfig, room: Option<&str>) -> Self
    where
        C: Connector,
        S: IdentityStore,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_capacity.max(1));
        let room = config.resolve_room(room);
        let (view_tx, view_rx) = watch::channel(RoomView {
            room: room.clone(),
            ..RoomView::default()
        });

        let task = RoomTask {
            manager: ConnectionManager::new(connector, store, config),
            reducer: GameReducer::new(),
            commands: cmd_rx,
            view: view_tx,
        };
        let task = tokio::spawn(task.run(room));

        Self {
            commands: cmd_tx,
            view: view_rx,
            task,
        }
    }

    /// Queues a user intent.
    pub async fn intent(&self, intent: Intent) -> Result<(), CodewordsError> {
        self.send(ClientCommand::Intent(intent)).await
    }

    /// Tells the task the host regained focus.
    pub async fn focus_regained(&self) -> Result<(), CodewordsError> {
        self.send(ClientCommand::FocusRegained).await
    }

    /// The latest published view.
    pub fn view(&self) -> RoomView {
        self.view.borrow().clone()
    }

    /// A receiver that is notified on every published view.
    pub fn subscribe(&self) -> watch::Receiver<RoomView> {
        self.view.clone()
    }

    /// Closes the connection and waits for the task to finish.
    pub async fn shutdown(self) -> Result<(), CodewordsError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ClientCommand::Shutdown { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| CodewordsError::ClientClosed)?;
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "room task ended abnormally");
        }
        Ok(())
    }

    async fn send(&self, command: ClientCommand) -> Result<(), CodewordsError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CodewordsError::ClientClosed)
    }
}

/// What the run loop does after handling an input.
enum Flow {
    Continue,
    /// Stop, replying to the shutdown request if there was one.
    Stop(Option<oneshot::Sender<()>>),
}

/// State owned by the room task.
struct RoomTask<C: Connector, S: IdentityStore> {
    manager: ConnectionManager<C, S>,
    reducer: GameReducer,
    commands: mpsc::Receiver<ClientCommand>,
    view: watch::Sender<RoomView>,
}

impl<C: Connector, S: IdentityStore> RoomTask<C, S> {
    /// Runs the task until shutdown or until every handle is dropped.
    async fn run(mut self, room: String) {
        let mut flow = self.connect(Some(&room)).await;
        let reply = loop {
            if let Flow::Stop(reply) = flow {
                break reply;
            }
            flow = tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ClientCommand::Intent(intent)) => {
                        self.handle_intent(intent).await;
                        Flow::Continue
                    }
                    Some(ClientCommand::FocusRegained) => {
                        if self.manager.state() == ConnectionState::Closed {
                            let room = self.manager.room().to_string();
                            self.connect(Some(&room)).await
                        } else {
                            tracing::trace!(state = %self.manager.state(), "focus regained, nothing to do");
                            Flow::Continue
                        }
                    }
                    Some(ClientCommand::Shutdown { reply }) => Flow::Stop(Some(reply)),
                    None => {
                        tracing::debug!("all room client handles dropped");
                        Flow::Stop(None)
                    }
                },
                frame = self.manager.next_frame() => {
                    if let Some(frame) = frame {
                        self.handle_frame(&frame);
                    }
                    Flow::Continue
                }
            };
            self.publish();
        };

        self.manager.teardown().await;
        self.publish();
        tracing::info!(room = %self.manager.room(), "room client stopped");
        if let Some(reply) = reply {
            let _ = reply.send(());
        }
    }

    /// Connects to `room` while still listening for shutdown.
    ///
    /// `Connecting` is published before dialling. Intents that arrive
    /// mid-connect are handled, in order, once the attempt settles; a focus
    /// signal in that window is redundant and ignored.
    async fn connect(&mut self, room: Option<&str>) -> Flow {
        let Some(uri) = self.manager.begin_connect(room) else {
            return Flow::Continue;
        };
        self.publish();

        let mut deferred = Vec::new();
        let outcome = {
            let connect = self.manager.connector().connect(&uri);
            tokio::pin!(connect);
            loop {
                tokio::select! {
                    result = &mut connect => break Ok(result),
                    command = self.commands.recv() => match command {
                        Some(ClientCommand::Intent(intent)) => deferred.push(intent),
                        Some(ClientCommand::FocusRegained) => {
                            tracing::trace!("focus regained while connecting");
                        }
                        Some(ClientCommand::Shutdown { reply }) => break Err(Some(reply)),
                        None => break Err(None),
                    },
                }
            }
        };

        let result = match outcome {
            Ok(result) => result,
            Err(reply) => {
                self.manager.abort_connect();
                return Flow::Stop(reply);
            }
        };
        if let Err(e) = self.manager.finish_connect(result).await {
            tracing::warn!(room = %self.manager.room(), error = %e, "connect failed, waiting for focus to retry");
        }
        self.publish();

        for intent in deferred {
            self.handle_intent(intent).await;
        }
        Flow::Continue
    }

    async fn handle_intent(&mut self, intent: Intent) {
        tracing::debug!(intent = intent.kind(), "handling intent");
        match encode_intent(&intent, &self.reducer) {
            Some(Command::SetName { name }) => {
                if let Err(e) = self.manager.set_name(&name).await {
                    tracing::warn!(error = %e, "failed to store display name");
                }
            }
            Some(command) => self.manager.send(&command).await,
            None => tracing::debug!(intent = intent.kind(), "nothing to send"),
        }
    }

    fn handle_frame(&mut self, frame: &[u8]) {
        let message = match decode_event(&JsonCodec, frame) {
            Ok(message) => message,
            Err(e @ ProtocolError::UnknownEventType(_)) => {
                tracing::debug!(error = %e, "skipping unknown event");
                return;
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "discarding inbound frame");
                return;
            }
        };

        if let Event::UpdateClientSession { session } = &message.event {
            self.manager.observe_session(session);
        }
        self.reducer.apply(message);
    }

    fn publish(&self) {
        self.view.send_replace(RoomView {
            room: self.manager.room().to_string(),
            connection: self.manager.state(),
            game: self.reducer.game().cloned(),
            session: self.reducer.session().cloned(),
            display_name: self.manager.identity().name().map(str::to_owned),
            notifications: self.reducer.notifications().to_vec(),
        });
    }
}
