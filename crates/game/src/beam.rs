//! Shots fired straight up from the ship.

use glam::Vec2;

use crate::falling::{FallingKind, FallingObject};

/// Pixels risen per tick.
pub const BEAM_SPEED: f32 = 15.0;
/// Stars closer than this to a beam are destroyed.
pub const BEAM_HIT_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    position: Vec2,
}

impl Beam {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Rise one tick. Returns `false` once above the top edge.
    pub fn update(&mut self) -> bool {
        self.position.y -= BEAM_SPEED;
        self.position.y >= 0.0
    }

    /// Destroy every star within [`BEAM_HIT_RADIUS`]. Returns how many.
    pub fn strike(&self, stars: &mut Vec<FallingObject>) -> usize {
        let before = stars.len();
        stars.retain(|star| {
            star.kind() != FallingKind::Star
                || star.position().distance(self.position) >= BEAM_HIT_RADIUS
        });
        before - stars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rises_until_off_the_top() {
        let mut beam = Beam::new(Vec2::new(50.0, 40.0));
        assert!(beam.update());
        assert!(beam.update());
        assert_eq!(beam.position().y, 10.0);
        assert!(!beam.update());
    }

    #[test]
    fn strikes_only_close_stars() {
        let beam = Beam::new(Vec2::new(100.0, 100.0));
        let star = |x: f32, y: f32| FallingObject::new(FallingKind::Star, Vec2::new(x, y), [1.0; 4]);
        let mut stars = vec![star(100.0, 110.0), star(100.0, 120.0), star(300.0, 100.0)];

        assert_eq!(beam.strike(&mut stars), 1);
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].position(), Vec2::new(100.0, 120.0));
    }
}
