//! Match state: the tagged session lifecycle, the target and the play surface.

use rand::Rng;
use serde::Serialize;

use rapidclick_shared::constants::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use rapidclick_shared::types::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Active,
    Ended,
}

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaySurface {
    pub width: f64,
    pub height: f64,
}

impl Default for PlaySurface {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl PlaySurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Uniformly random target fully inside the surface. An axis shorter
    /// than the target diameter gets the target centred on it.
    pub fn spawn_target<R: Rng + ?Sized>(&self, radius: f64, rng: &mut R) -> Target {
        Target {
            x: random_coord(self.width, radius, rng),
            y: random_coord(self.height, radius, rng),
            radius,
        }
    }
}

fn random_coord<R: Rng + ?Sized>(extent: f64, radius: f64, rng: &mut R) -> f64 {
    let (lo, hi) = (radius, extent - radius);
    if hi <= lo {
        extent / 2.0
    } else {
        rng.gen_range(lo..=hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Target {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x).hypot(y - self.y) <= self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// No active session.
    Ignored,
    Hit,
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// No active session.
    Ignored,
    Running(i64),
    /// Time ran out; the session still has to be finished.
    Expired,
}

/// One play-through. Reset in place by every start.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    difficulty: Difficulty,
    score: u32,
    time_remaining: i64,
    target: Target,
    surface: PlaySurface,
}

impl Session {
    pub fn new(surface: PlaySurface, difficulty: Difficulty) -> Self {
        let profile = difficulty.profile();
        Self {
            state: SessionState::Idle,
            difficulty,
            score: 0,
            time_remaining: profile.total_time_secs,
            target: Target {
                x: surface.width / 2.0,
                y: surface.height / 2.0,
                radius: profile.radius,
            },
            surface,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> i64 {
        self.time_remaining
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn surface(&self) -> &PlaySurface {
        &self.surface
    }

    /// Only allowed outside an active session.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.is_active() {
            return false;
        }
        self.difficulty = difficulty;
        self.time_remaining = difficulty.profile().total_time_secs;
        true
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.is_active() {
            return false;
        }
        let profile = self.difficulty.profile();
        self.score = 0;
        self.time_remaining = profile.total_time_secs;
        self.state = SessionState::Active;
        self.target = self.surface.spawn_target(profile.radius, rng);
        true
    }

    pub fn pointer<R: Rng + ?Sized>(&mut self, x: f64, y: f64, rng: &mut R) -> PointerOutcome {
        if !self.is_active() {
            return PointerOutcome::Ignored;
        }
        if self.target.contains(x, y) {
            self.score += 1;
            self.target = self.surface.spawn_target(self.target.radius, rng);
            PointerOutcome::Hit
        } else {
            PointerOutcome::Miss
        }
    }

    pub fn countdown_tick(&mut self) -> CountdownOutcome {
        if !self.is_active() {
            return CountdownOutcome::Ignored;
        }
        self.time_remaining -= 1;
        if self.time_remaining <= 0 {
            CountdownOutcome::Expired
        } else {
            CountdownOutcome::Running(self.time_remaining)
        }
    }

    /// Active → Ended. Returns the final score only on that transition, so a
    /// session can never be finished twice.
    pub fn finish(&mut self) -> Option<u32> {
        if !self.is_active() {
            return None;
        }
        self.state = SessionState::Ended;
        Some(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_start_uses_profile() {
        for difficulty in Difficulty::ALL {
            let mut session = Session::new(PlaySurface::default(), difficulty);
            assert!(session.start(&mut rng()));
            let profile = difficulty.profile();
            assert_eq!(session.time_remaining(), profile.total_time_secs);
            assert_eq!(session.target().radius, profile.radius);
            assert_eq!(session.score(), 0);
            assert_eq!(session.state(), SessionState::Active);
        }
    }

    #[test]
    fn test_spawn_within_bounds() {
        let surface = PlaySurface::new(300.0, 120.0);
        let mut rng = rng();
        for _ in 0..1000 {
            let t = surface.spawn_target(40.0, &mut rng);
            assert!(t.x >= 40.0 && t.x <= 260.0, "x = {}", t.x);
            assert!(t.y >= 40.0 && t.y <= 80.0, "y = {}", t.y);
        }
    }

    #[test]
    fn test_spawn_on_tiny_surface_is_centred() {
        let surface = PlaySurface::new(50.0, 500.0);
        let t = surface.spawn_target(40.0, &mut rng());
        assert_eq!(t.x, 25.0);
    }

    #[test]
    fn test_hit_and_miss() {
        let mut rng = rng();
        let mut session = Session::new(PlaySurface::default(), Difficulty::Medium);
        session.start(&mut rng);

        let before = *session.target();
        let outcome = session.pointer(before.x + before.radius * 0.5, before.y, &mut rng);
        assert_eq!(outcome, PointerOutcome::Hit);
        assert_eq!(session.score(), 1);
        assert_ne!(*session.target(), before);

        let t = *session.target();
        let outcome = session.pointer(t.x + t.radius + 0.5, t.y, &mut rng);
        assert_eq!(outcome, PointerOutcome::Miss);
        assert_eq!(session.score(), 1);
        assert_eq!(*session.target(), t);
    }

    #[test]
    fn test_contains_edge_is_inclusive() {
        let t = Target {
            x: 100.0,
            y: 100.0,
            radius: 30.0,
        };
        assert!(t.contains(130.0, 100.0));
        assert!(t.contains(118.0, 124.0));
        assert!(!t.contains(130.5, 100.0));
    }

    #[test]
    fn test_pointer_ignored_when_idle() {
        let mut session = Session::new(PlaySurface::default(), Difficulty::Easy);
        let t = *session.target();
        assert_eq!(session.pointer(t.x, t.y, &mut rng()), PointerOutcome::Ignored);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_countdown_and_single_finish() {
        let mut session = Session::new(PlaySurface::default(), Difficulty::Hard);
        session.start(&mut rng());

        for expected in (1..20).rev() {
            assert_eq!(session.countdown_tick(), CountdownOutcome::Running(expected));
        }
        assert_eq!(session.countdown_tick(), CountdownOutcome::Expired);
        assert_eq!(session.finish(), Some(0));
        assert_eq!(session.finish(), None);
        assert_eq!(session.countdown_tick(), CountdownOutcome::Ignored);
        assert_eq!(session.time_remaining(), 0);
    }

    #[test]
    fn test_difficulty_locked_while_active() {
        let mut session = Session::new(PlaySurface::default(), Difficulty::Medium);
        assert!(session.set_difficulty(Difficulty::Easy));
        assert_eq!(session.time_remaining(), 45);

        session.start(&mut rng());
        assert!(!session.set_difficulty(Difficulty::Hard));
        assert_eq!(session.difficulty(), Difficulty::Easy);
        assert_eq!(session.time_remaining(), 45);
    }
}
