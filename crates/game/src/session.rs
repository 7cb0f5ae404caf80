//! One run of the shooter: the ship, its beams and everything falling.

use glam::Vec2;
use input::Controls;
use rand::Rng;

use crate::beam::Beam;
use crate::falling::{FallingKind, FallingObject};
use crate::player::Player;

/// Where the ship starts on the classic 600x600 field.
const PLAYER_START: Vec2 = Vec2::new(400.0, 500.0);

pub struct Session {
    pub player: Player,
    pub stars: Vec<FallingObject>,
    pub obstacles: Vec<FallingObject>,
    pub beams: Vec<Beam>,
    bounds: Vec2,
}

impl Session {
    pub fn new(width: f32, height: f32) -> Self {
        let bounds = Vec2::new(width, height);
        Self {
            player: Player::new(PLAYER_START.min(bounds), bounds),
            stars: Vec::new(),
            obstacles: Vec::new(),
            beams: Vec::new(),
            bounds,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Advance the game by one tick.
    pub fn update(&mut self, controls: Controls, delta_ms: u64, rng: &mut impl Rng) {
        if controls.fire {
            self.beams.push(self.player.shoot());
        }

        if controls.left {
            self.player.move_left();
        }
        if controls.right {
            self.player.move_right();
        }
        if controls.up {
            self.player.accelerate();
        }
        if controls.down {
            self.player.brake();
        }

        self.player.update_delta(delta_ms);
        self.player.collect_stars(&mut self.stars);

        let height = self.bounds.y;
        self.stars.retain_mut(|star| star.update(height));

        let stars = &mut self.stars;
        let mut destroyed = 0;
        self.beams.retain_mut(|beam| {
            let alive = beam.update();
            destroyed += beam.strike(stars);
            alive
        });
        if destroyed > 0 {
            log::debug!("beams destroyed {} star(s)", destroyed);
            self.player.add_score(destroyed as u32);
        }

        self.obstacles.retain_mut(|obstacle| obstacle.update(height));

        let width = self.bounds.x;
        if let Some(star) = FallingObject::maybe_spawn(FallingKind::Star, width, rng) {
            self.stars.push(star);
        }
        if let Some(obstacle) = FallingObject::maybe_spawn(FallingKind::Obstacle, width, rng) {
            self.obstacles.push(obstacle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn idle() -> Controls {
        Controls::default()
    }

    #[test]
    fn fire_spawns_a_beam_at_the_ship() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = Session::new(600.0, 600.0);
        session.update(Controls { fire: true, ..idle() }, 16, &mut rng);

        assert_eq!(session.beams.len(), 1);
        // Fired before moving, then risen once.
        assert_eq!(session.beams[0].position(), Vec2::new(400.0, 485.0));
    }

    #[test]
    fn beam_hit_scores_a_point() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = Session::new(600.0, 600.0);
        session.beams.push(Beam::new(Vec2::new(200.0, 300.0)));
        // After this tick the beam sits at y = 285 and the star at y = 283.
        session
            .stars
            .push(FallingObject::new(FallingKind::Star, Vec2::new(200.0, 280.0), [1.0; 4]));

        session.update(idle(), 16, &mut rng);

        assert_eq!(session.player.score(), 1);
        assert!(session.stars.iter().all(|s| s.position().x != 200.0));
    }

    #[test]
    fn star_reaching_the_ship_costs_a_life() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = Session::new(600.0, 600.0);
        session
            .stars
            .push(FallingObject::new(FallingKind::Star, Vec2::new(400.0, 480.0), [1.0; 4]));

        session.update(idle(), 16, &mut rng);

        assert_eq!(session.player.lives(), 4);
    }

    #[test]
    fn objects_spawn_and_fall_over_time() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut session = Session::new(600.0, 600.0);
        for _ in 0..200 {
            session.update(idle(), 16, &mut rng);
        }
        assert!(!session.obstacles.is_empty());
        assert!(session
            .obstacles
            .iter()
            .chain(&session.stars)
            .all(|o| o.position().y < 650.0));
    }

    #[test]
    fn start_position_fits_small_fields() {
        let session = Session::new(320.0, 240.0);
        assert_eq!(session.player.position(), Vec2::new(320.0, 240.0));
    }
}
