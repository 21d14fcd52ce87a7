//! Game Session Controller.
//!
//! Owns the [`Session`], interprets input and ticks, and mirrors every state
//! change onto the [`GameView`]. Timing and networking live in
//! [`crate::runtime`]; this type is fully synchronous.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use rapidclick_shared::constants::HIGH_SCORE_ERROR_PLACEHOLDER;
use rapidclick_shared::protocol::SubmitScoreResponse;
use rapidclick_shared::types::{Difficulty, Score, ScoreRecord};

use crate::error::ClientError;
use crate::leaderboard::Leaderboard;
use crate::session::{CountdownOutcome, PlaySurface, PointerOutcome, Session, SessionState};
use crate::view::{Element, Feedback, GameView};

/// The two periodic callbacks of an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Redraw,
    Countdown,
}

pub struct GameController<V, F> {
    session: Session,
    view: V,
    feedback: F,
    leaderboard: Option<Leaderboard>,
    high_score: Option<Score>,
    rng: StdRng,
}

impl<V: GameView, F: Feedback> GameController<V, F> {
    /// Build a controller in the Idle state. The initial difficulty comes from
    /// the view's selector, falling back to medium.
    pub fn new(
        view: V,
        feedback: F,
        surface: PlaySurface,
        leaderboard: Option<Leaderboard>,
    ) -> Self {
        let difficulty = view
            .selected_difficulty()
            .and_then(|raw| match raw.parse::<Difficulty>() {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!(error = %e, "Ignoring selector value");
                    None
                }
            })
            .unwrap_or_default();

        let mut controller = Self {
            session: Session::new(surface, difficulty),
            view,
            feedback,
            leaderboard,
            high_score: None,
            rng: StdRng::from_entropy(),
        };
        controller.refresh_idle_view();
        controller
    }

    /// Replace the entropy-seeded RNG, for reproducible target placement.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn leaderboard(&self) -> Option<&Leaderboard> {
        self.leaderboard.as_ref()
    }

    pub fn high_score(&self) -> Option<Score> {
        self.high_score
    }

    fn refresh_idle_view(&mut self) {
        let time = self.session.time_remaining().to_string();
        self.view.set_text(Element::Timer, &time);
        self.view.set_text(Element::Score, "0");
        self.view.set_visible(Element::StartButton, true);
        self.view.set_visible(Element::GameOverPanel, false);
        self.view.set_visible(Element::HighScoreMessage, false);
        self.view.set_enabled(Element::DifficultySelector, true);

        let has_board = self.leaderboard.is_some();
        self.view.set_visible(Element::Leaderboard, has_board);
        self.view.set_visible(Element::ClearLeaderboardButton, has_board);
        if let Some(ref board) = self.leaderboard {
            self.view.render_leaderboard(board.entries());
        }
    }

    /// Switch profile. Rejected while a session is in progress.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !self.session.set_difficulty(difficulty) {
            debug!(%difficulty, "Difficulty change ignored during active session");
            return false;
        }
        let time = self.session.time_remaining().to_string();
        self.view.set_text(Element::Timer, &time);
        debug!(%difficulty, "Difficulty changed");
        true
    }

    pub fn start(&mut self) -> bool {
        if !self.session.start(&mut self.rng) {
            debug!("Start ignored, session already active");
            return false;
        }

        let score = self.session.score().to_string();
        let time = self.session.time_remaining().to_string();
        self.view.set_text(Element::Score, &score);
        self.view.set_text(Element::Timer, &time);
        self.view.set_visible(Element::StartButton, false);
        self.view.set_visible(Element::GameOverPanel, false);
        self.view.set_enabled(Element::DifficultySelector, false);
        self.view.draw_target(self.session.target());

        info!(
            difficulty = %self.session.difficulty(),
            time = self.session.time_remaining(),
            "Session started"
        );
        true
    }

    pub fn restart(&mut self) -> bool {
        if self.session.is_active() {
            return false;
        }
        self.view.set_visible(Element::GameOverPanel, false);
        self.start()
    }

    pub fn pointer_input(&mut self, x: f64, y: f64) -> PointerOutcome {
        let outcome = self.session.pointer(x, y, &mut self.rng);
        match outcome {
            PointerOutcome::Hit => {
                let score = self.session.score().to_string();
                self.view.set_text(Element::Score, &score);
                self.feedback.hit();
                self.view.draw_target(self.session.target());
            }
            PointerOutcome::Miss => self.feedback.miss(),
            PointerOutcome::Ignored => {}
        }
        outcome
    }

    /// Advance one cadence. Returns the final score when this tick ended the
    /// session.
    pub fn tick(&mut self, cadence: Cadence) -> Option<u32> {
        match cadence {
            Cadence::Redraw => {
                if !self.session.is_active() {
                    return None;
                }
                self.view.draw_target(self.session.target());
                if self.session.time_remaining() <= 0 {
                    return self.end();
                }
                None
            }
            Cadence::Countdown => match self.session.countdown_tick() {
                CountdownOutcome::Ignored => None,
                CountdownOutcome::Running(left) => {
                    self.view.set_text(Element::Timer, &left.to_string());
                    None
                }
                CountdownOutcome::Expired => {
                    let left = self.session.time_remaining().to_string();
                    self.view.set_text(Element::Timer, &left);
                    self.end()
                }
            },
        }
    }

    /// Active → Ended. Returns the final score for submission, exactly once
    /// per session.
    pub fn end(&mut self) -> Option<u32> {
        let score = self.session.finish()?;

        self.view.clear_surface();
        self.view.set_enabled(Element::DifficultySelector, true);
        self.view.set_text(Element::FinalScore, &score.to_string());
        self.view.set_visible(Element::GameOverPanel, true);
        self.feedback.game_over();

        let difficulty = self.session.difficulty();
        if let Some(ref mut board) = self.leaderboard {
            if let Some(rank) = board.record(score, difficulty, Utc::now()) {
                debug!(score, rank, "Recorded on local leaderboard");
            }
            if let Err(e) = board.save() {
                warn!(error = %e, "Failed to save local leaderboard");
            }
            self.view.render_leaderboard(board.entries());
        }

        info!(score, %difficulty, "Session ended");
        Some(score)
    }

    pub fn apply_high_score(&mut self, record: &ScoreRecord) {
        self.high_score = Some(record.score);
        self.view
            .set_text(Element::HighScore, &record.score.to_string());
    }

    /// High score fetch failed. Gameplay is unaffected.
    pub fn high_score_unavailable(&mut self, error: &ClientError) {
        warn!(error = %error, "Error fetching high score");
        self.view
            .set_text(Element::HighScore, HIGH_SCORE_ERROR_PLACEHOLDER);
    }

    pub fn apply_submission(&mut self, response: &SubmitScoreResponse) {
        self.view
            .set_visible(Element::HighScoreMessage, response.is_new_high_score);
        self.high_score = Some(response.high_score);

        let high = response.high_score.to_string();
        self.view.set_text(Element::HighScore, &high);
        self.view.set_text(Element::FinalHighScore, &high);
    }

    pub fn submission_failed(&mut self, error: &ClientError) {
        warn!(error = %error, "Error submitting score");
    }

    pub fn clear_leaderboard(&mut self) {
        let Some(ref mut board) = self.leaderboard else {
            return;
        };
        board.clear();
        if let Err(e) = board.save() {
            warn!(error = %e, "Failed to save local leaderboard");
        }
        self.view.render_leaderboard(board.entries());
        info!("Local leaderboard cleared");
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }
}
