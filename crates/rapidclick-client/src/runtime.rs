//! Game loop with tokio mpsc command/notification pattern.
//!
//! A single task owns the [`GameController`]. Commands, the two session
//! cadences and replies from the Score Store Service are multiplexed with
//! `tokio::select!`, so they interleave but never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use rapidclick_shared::constants::{COUNTDOWN_INTERVAL_MS, REDRAW_INTERVAL_MS};
use rapidclick_shared::protocol::SubmitScoreResponse;
use rapidclick_shared::types::{Difficulty, ScoreRecord};

use crate::api_client::ScoreService;
use crate::controller::{Cadence, GameController};
use crate::error::ClientError;
use crate::events::{GameNotification, SessionSnapshot};
use crate::view::{Feedback, GameView};

// ---------------------------------------------------------------------------
// Command types
// ---------------------------------------------------------------------------

/// Commands sent *into* the game loop.
#[derive(Debug)]
pub enum GameCommand {
    ChangeDifficulty(Difficulty),
    Start,
    Restart,
    Pointer { x: f64, y: f64 },
    ClearLeaderboard,
    RefreshHighScore,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

enum ServiceReply {
    HighScore(Result<ScoreRecord, ClientError>),
    Submitted(Result<SubmitScoreResponse, ClientError>),
}

// ---------------------------------------------------------------------------
// Session timers
// ---------------------------------------------------------------------------

/// Redraw and countdown cadences of one session. Dropping the value cancels
/// both, so a new session always starts from fresh intervals.
struct SessionTimers {
    redraw: Interval,
    countdown: Interval,
}

impl SessionTimers {
    fn start() -> Self {
        let now = Instant::now();
        let redraw_period = Duration::from_millis(REDRAW_INTERVAL_MS);
        let countdown_period = Duration::from_millis(COUNTDOWN_INTERVAL_MS);

        let mut redraw = interval_at(now + redraw_period, redraw_period);
        redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let countdown = interval_at(now + countdown_period, countdown_period);

        Self { redraw, countdown }
    }

    async fn next(&mut self) -> Cadence {
        tokio::select! {
            biased;
            _ = self.countdown.tick() => Cadence::Countdown,
            _ = self.redraw.tick() => Cadence::Redraw,
        }
    }
}

async fn next_tick(timers: &mut Option<SessionTimers>) -> Cadence {
    match timers {
        Some(t) => t.next().await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running game loop.
pub struct GameHandle {
    commands: mpsc::Sender<GameCommand>,
    notifications: mpsc::Receiver<GameNotification>,
    task: JoinHandle<()>,
}

impl GameHandle {
    pub fn commands(&self) -> mpsc::Sender<GameCommand> {
        self.commands.clone()
    }

    pub async fn send(&self, cmd: GameCommand) -> bool {
        self.commands.send(cmd).await.is_ok()
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        if !self.send(GameCommand::Snapshot(tx)).await {
            return None;
        }
        rx.await.ok()
    }

    pub async fn next_notification(&mut self) -> Option<GameNotification> {
        self.notifications.recv().await
    }

    /// Non-blocking drain of everything emitted so far.
    pub fn drain_notifications(&mut self) -> Vec<GameNotification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            out.push(n);
        }
        out
    }

    pub async fn shutdown(self) {
        let _ = self.commands.send(GameCommand::Shutdown).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "Game loop task failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Spawn the game loop. The current high score is fetched immediately.
pub fn spawn_game<V, F, S>(controller: GameController<V, F>, service: Arc<S>) -> GameHandle
where
    V: GameView + Send + 'static,
    F: Feedback + Send + 'static,
    S: ScoreService,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<GameCommand>(64);
    let (notif_tx, notif_rx) = mpsc::channel::<GameNotification>(256);
    let (reply_tx, mut reply_rx) = mpsc::channel::<ServiceReply>(16);

    let task = tokio::spawn(async move {
        let mut controller = controller;
        let mut timers: Option<SessionTimers> = None;

        spawn_fetch(service.clone(), reply_tx.clone());

        loop {
            tokio::select! {
                // --- Incoming commands ---
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(GameCommand::ChangeDifficulty(difficulty)) => {
                            controller.change_difficulty(difficulty);
                        }
                        Some(GameCommand::Start) => {
                            if controller.start() {
                                timers = Some(SessionTimers::start());
                                notify(&notif_tx, GameNotification::SessionStarted {
                                    difficulty: controller.session().difficulty(),
                                });
                            }
                        }
                        Some(GameCommand::Restart) => {
                            if controller.restart() {
                                timers = Some(SessionTimers::start());
                                notify(&notif_tx, GameNotification::SessionStarted {
                                    difficulty: controller.session().difficulty(),
                                });
                            }
                        }
                        Some(GameCommand::Pointer { x, y }) => {
                            controller.pointer_input(x, y);
                        }
                        Some(GameCommand::ClearLeaderboard) => {
                            controller.clear_leaderboard();
                        }
                        Some(GameCommand::RefreshHighScore) => {
                            spawn_fetch(service.clone(), reply_tx.clone());
                        }
                        Some(GameCommand::Snapshot(reply)) => {
                            let session = controller.session();
                            let _ = reply.send(SessionSnapshot {
                                state: session.state(),
                                difficulty: session.difficulty(),
                                score: session.score(),
                                time_remaining: session.time_remaining(),
                                target: *session.target(),
                            });
                        }
                        Some(GameCommand::Shutdown) => {
                            info!("Game loop shutdown requested");
                            break;
                        }
                        None => {
                            info!("Command channel closed, shutting down game loop");
                            break;
                        }
                    }
                }

                // --- Session cadences ---
                cadence = next_tick(&mut timers) => {
                    if let Some(score) = controller.tick(cadence) {
                        timers = None;
                        notify(&notif_tx, GameNotification::SessionEnded { score });
                        spawn_submit(service.clone(), reply_tx.clone(), score);
                    }
                }

                // --- Score Store Service replies ---
                Some(reply) = reply_rx.recv() => {
                    match reply {
                        ServiceReply::HighScore(Ok(record)) => {
                            controller.apply_high_score(&record);
                            notify(&notif_tx, GameNotification::HighScoreLoaded(record));
                        }
                        ServiceReply::HighScore(Err(e)) => {
                            controller.high_score_unavailable(&e);
                            notify(&notif_tx, GameNotification::ServiceError {
                                operation: "fetch_high_score".to_string(),
                                error: e.to_string(),
                            });
                        }
                        ServiceReply::Submitted(Ok(resp)) => {
                            controller.apply_submission(&resp);
                            notify(&notif_tx, GameNotification::ScoreSubmitted(resp));
                        }
                        ServiceReply::Submitted(Err(e)) => {
                            controller.submission_failed(&e);
                            notify(&notif_tx, GameNotification::ServiceError {
                                operation: "submit_score".to_string(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }
    });

    GameHandle {
        commands: cmd_tx,
        notifications: notif_rx,
        task,
    }
}

fn spawn_fetch<S: ScoreService>(service: Arc<S>, reply_tx: mpsc::Sender<ServiceReply>) {
    tokio::spawn(async move {
        let result = service.fetch_high_score().await;
        let _ = reply_tx.send(ServiceReply::HighScore(result)).await;
    });
}

fn spawn_submit<S: ScoreService>(
    service: Arc<S>,
    reply_tx: mpsc::Sender<ServiceReply>,
    score: u32,
) {
    tokio::spawn(async move {
        let result = service.submit_score(score).await;
        let _ = reply_tx.send(ServiceReply::Submitted(result)).await;
    });
}

/// Never blocks the loop on a slow consumer.
fn notify(tx: &mpsc::Sender<GameNotification>, notification: GameNotification) {
    match tx.try_send(notification) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(n)) => {
            warn!(notification = ?n, "Notification channel full, dropping");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("Notification receiver dropped");
        }
    }
}
