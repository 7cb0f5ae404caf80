//! The player's ship. Always faces up the screen.

use glam::Vec2;

use crate::beam::Beam;
use crate::falling::FallingObject;

/// Pixels moved per tick in each held direction.
pub const PLAYER_SPEED: f32 = 7.0;
pub const STARTING_LIVES: u32 = 5;
/// A life comes back after this much survived time.
pub const LIFE_REGEN_MS: u64 = 10_000;
/// Stars closer than this hit the ship.
pub const COLLISION_RADIUS: f32 = 35.0;
/// The ship can't climb into the HUD strip at the top.
pub const TOP_MARGIN: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec2,
    bounds: Vec2,
    score: u32,
    lives: u32,
    elapsed_ms: u64,
}

impl Player {
    /// Spawn at `position` inside a `bounds`-sized playfield.
    pub fn new(position: Vec2, bounds: Vec2) -> Self {
        Self {
            position,
            bounds,
            score: 0,
            lives: STARTING_LIVES,
            elapsed_ms: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn move_left(&mut self) {
        self.position.x = (self.position.x - PLAYER_SPEED).max(0.0);
    }

    pub fn move_right(&mut self) {
        self.position.x = (self.position.x + PLAYER_SPEED).min(self.bounds.x);
    }

    pub fn accelerate(&mut self) {
        self.position.y = (self.position.y - PLAYER_SPEED).max(TOP_MARGIN);
    }

    pub fn brake(&mut self) {
        self.position.y = (self.position.y + PLAYER_SPEED).min(self.bounds.y);
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    /// Accumulate survived time and regain a life every [`LIFE_REGEN_MS`].
    /// Dead players stay dead.
    pub fn update_delta(&mut self, delta_ms: u64) {
        if self.is_dead() {
            return;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms > LIFE_REGEN_MS {
            self.lives += 1;
            self.elapsed_ms = 0;
            log::debug!("life regained, now {}", self.lives);
        }
    }

    /// Remove every star touching the ship. Each one costs a life.
    /// Returns how many were hit.
    pub fn collect_stars(&mut self, stars: &mut Vec<FallingObject>) -> usize {
        let before = stars.len();
        let position = self.position;
        stars.retain(|star| star.position().distance(position) >= COLLISION_RADIUS);
        let hits = before - stars.len();
        if hits > 0 {
            self.lives = self.lives.saturating_sub(hits as u32);
            log::debug!("hit by {} star(s), {} lives left", hits, self.lives);
        }
        hits
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn shoot(&self) -> Beam {
        Beam::new(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::falling::FallingKind;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), Vec2::new(600.0, 600.0))
    }

    #[test]
    fn movement_is_clamped_to_the_playfield() {
        let mut p = player_at(3.0, 55.0);
        p.move_left();
        assert_eq!(p.position().x, 0.0);
        p.accelerate();
        assert_eq!(p.position().y, TOP_MARGIN);

        let mut p = player_at(598.0, 596.0);
        p.move_right();
        p.brake();
        assert_eq!(p.position(), Vec2::new(600.0, 600.0));

        let mut p = player_at(300.0, 300.0);
        p.move_right();
        p.accelerate();
        assert_eq!(p.position(), Vec2::new(307.0, 293.0));
    }

    #[test]
    fn life_regenerates_after_ten_seconds() {
        let mut p = player_at(0.0, 0.0);
        p.update_delta(10_000);
        assert_eq!(p.lives(), 5);
        p.update_delta(1);
        assert_eq!(p.lives(), 6);
        // Elapsed time restarted.
        p.update_delta(9_000);
        assert_eq!(p.lives(), 6);
    }

    #[test]
    fn dead_players_do_not_regenerate() {
        let mut p = player_at(300.0, 300.0);
        let mut stars: Vec<_> = (0..5)
            .map(|_| FallingObject::new(FallingKind::Star, Vec2::new(300.0, 300.0), [1.0; 4]))
            .collect();
        p.collect_stars(&mut stars);
        assert!(p.is_dead());
        p.update_delta(20_000);
        assert_eq!(p.lives(), 0);
    }

    #[test]
    fn only_nearby_stars_are_collected() {
        let mut p = player_at(100.0, 100.0);
        let star = |x: f32| FallingObject::new(FallingKind::Star, Vec2::new(x, 100.0), [1.0; 4]);
        let mut stars = vec![star(100.0), star(134.9), star(135.0), star(400.0)];

        assert_eq!(p.collect_stars(&mut stars), 2);
        assert_eq!(p.lives(), 3);
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].position().x, 135.0);
    }

    #[test]
    fn lives_saturate_at_zero() {
        let mut p = player_at(0.0, 0.0);
        let mut stars: Vec<_> = (0..8)
            .map(|_| FallingObject::new(FallingKind::Star, Vec2::ZERO, [1.0; 4]))
            .collect();
        assert_eq!(p.collect_stars(&mut stars), 8);
        assert_eq!(p.lives(), 0);
    }
}
