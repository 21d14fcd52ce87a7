//! Presentation collaborators the controller drives.
//!
//! The controller never touches a concrete UI toolkit. It only needs to set
//! text, show or hide, enable or disable, read the selected difficulty, and
//! paint or clear the target. Sound is a separate fire-and-forget sink.

use std::collections::{HashMap, HashSet};

use rapidclick_shared::types::LeaderboardEntry;

use crate::session::Target;

/// Named UI elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Score,
    Timer,
    HighScore,
    FinalScore,
    FinalHighScore,
    HighScoreMessage,
    StartButton,
    DifficultySelector,
    GameOverPanel,
    Leaderboard,
    ClearLeaderboardButton,
}

pub trait GameView {
    fn set_text(&mut self, element: Element, text: &str);

    fn set_visible(&mut self, element: Element, visible: bool);

    fn set_enabled(&mut self, element: Element, enabled: bool);

    /// Raw value of the difficulty selector, if the view has one.
    fn selected_difficulty(&self) -> Option<String>;

    fn draw_target(&mut self, target: &Target);

    fn clear_surface(&mut self);

    fn render_leaderboard(&mut self, entries: &[LeaderboardEntry]) {
        let text = if entries.is_empty() {
            "No scores yet".to_string()
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}. {} ({}) - {}", i + 1, e.score, e.difficulty, e.date))
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.set_text(Element::Leaderboard, &text);
    }
}

/// Audio cues. Implementations must not block.
pub trait Feedback {
    fn hit(&mut self);
    fn miss(&mut self);
    fn game_over(&mut self);
}

/// Feedback sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn hit(&mut self) {}
    fn miss(&mut self) {}
    fn game_over(&mut self) {}
}

/// In-memory view used when no display is attached (bots, tests).
#[derive(Debug, Default, Clone)]
pub struct HeadlessView {
    texts: HashMap<Element, String>,
    hidden: HashSet<Element>,
    disabled: HashSet<Element>,
    selected: Option<String>,
    drawn: Option<Target>,
    frames: u64,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selected(mut self, difficulty: &str) -> Self {
        self.selected = Some(difficulty.to_string());
        self
    }

    pub fn select(&mut self, difficulty: &str) {
        self.selected = Some(difficulty.to_string());
    }

    pub fn text(&self, element: Element) -> Option<&str> {
        self.texts.get(&element).map(String::as_str)
    }

    pub fn is_visible(&self, element: Element) -> bool {
        !self.hidden.contains(&element)
    }

    pub fn is_enabled(&self, element: Element) -> bool {
        !self.disabled.contains(&element)
    }

    /// Target currently painted, `None` after a clear.
    pub fn drawn_target(&self) -> Option<&Target> {
        self.drawn.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl GameView for HeadlessView {
    fn set_text(&mut self, element: Element, text: &str) {
        self.texts.insert(element, text.to_string());
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        if visible {
            self.hidden.remove(&element);
        } else {
            self.hidden.insert(element);
        }
    }

    fn set_enabled(&mut self, element: Element, enabled: bool) {
        if enabled {
            self.disabled.remove(&element);
        } else {
            self.disabled.insert(element);
        }
    }

    fn selected_difficulty(&self) -> Option<String> {
        self.selected.clone()
    }

    fn draw_target(&mut self, target: &Target) {
        self.drawn = Some(*target);
        self.frames += 1;
    }

    fn clear_surface(&mut self) {
        self.drawn = None;
    }
}
