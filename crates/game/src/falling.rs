//! Stars and obstacles drifting down the screen.

use glam::Vec2;
use rand::Rng;

/// Pixels fallen per tick.
pub const FALL_SPEED: f32 = 3.0;
/// Objects are kept this far past the bottom edge before removal.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallingKind {
    /// Collides with the player and can be shot.
    Star,
    /// Scenery only.
    Obstacle,
}

impl FallingKind {
    /// Chance per tick of a new one appearing, as `1 / n`.
    pub fn spawn_one_in(self) -> u32 {
        match self {
            FallingKind::Star => 20,
            FallingKind::Obstacle => 10,
        }
    }

    /// Lowest value of each random tint channel, out of 255.
    fn min_channel(self) -> u8 {
        match self {
            FallingKind::Star => 40,
            FallingKind::Obstacle => 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingObject {
    kind: FallingKind,
    position: Vec2,
    color: [f32; 4],
}

impl FallingObject {
    pub fn new(kind: FallingKind, position: Vec2, color: [f32; 4]) -> Self {
        Self { kind, position, color }
    }

    /// New object at the top edge, at a random x with a random opaque tint.
    pub fn spawn(kind: FallingKind, width: f32, rng: &mut impl Rng) -> Self {
        let min = kind.min_channel();
        let mut channel = || rng.gen_range(min..255) as f32 / 255.0;
        let color = [channel(), channel(), channel(), 1.0];
        let x = rng.gen::<f32>() * width;
        Self::new(kind, Vec2::new(x, 0.0), color)
    }

    /// Roll this tick's spawn chance.
    pub fn maybe_spawn(kind: FallingKind, width: f32, rng: &mut impl Rng) -> Option<Self> {
        (rng.gen_range(0..kind.spawn_one_in()) == 0).then(|| Self::spawn(kind, width, rng))
    }

    pub fn kind(&self) -> FallingKind {
        self.kind
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Sprite rotation in degrees. Grows with the distance fallen.
    pub fn angle(&self) -> f32 {
        self.position.y
    }

    /// Fall one tick. Returns `false` once the object has left a playfield
    /// `height` pixels tall and should be removed.
    pub fn update(&mut self, height: f32) -> bool {
        self.position.y += FALL_SPEED;
        self.position.y < height + OFFSCREEN_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn falls_until_past_the_bottom() {
        let mut obj = FallingObject::new(FallingKind::Obstacle, Vec2::new(10.0, 0.0), [1.0; 4]);
        let mut ticks = 0;
        while obj.update(600.0) {
            ticks += 1;
        }
        // Alive at y = 648, removed at 651.
        assert_eq!(ticks, 216);
        assert_eq!(obj.position().y, 651.0);
        assert_eq!(obj.angle(), 651.0);
    }

    #[test]
    fn spawns_at_the_top_with_tint_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let star = FallingObject::spawn(FallingKind::Star, 600.0, &mut rng);
            assert_eq!(star.position().y, 0.0);
            assert!((0.0..600.0).contains(&star.position().x));
            let [r, g, b, a] = star.color();
            for c in [r, g, b] {
                assert!(c >= 40.0 / 255.0 && c < 1.0);
            }
            assert_eq!(a, 1.0);
        }
    }

    #[test]
    fn spawn_rate_follows_kind() {
        let mut rng = StdRng::seed_from_u64(11);
        let trials = 20_000;
        let count = |kind, rng: &mut StdRng| {
            (0..trials)
                .filter(|_| FallingObject::maybe_spawn(kind, 600.0, &mut *rng).is_some())
                .count() as f32
                / trials as f32
        };
        let stars = count(FallingKind::Star, &mut rng);
        let obstacles = count(FallingKind::Obstacle, &mut rng);
        assert!((stars - 0.05).abs() < 0.01, "star rate {}", stars);
        assert!((obstacles - 0.10).abs() < 0.015, "obstacle rate {}", obstacles);
    }
}
