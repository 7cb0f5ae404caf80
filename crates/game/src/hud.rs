//! Screen-space layer: sprites for everything in the session, then the HUD text.

use renderer::{argb, OverlayBuilder};

use crate::falling::{FallingKind, FallingObject};
use crate::session::Session;

/// Yellow used for all HUD text.
pub const HUD_COLOR: u32 = 0xff_ffff00;
pub const DEATH_MESSAGE: &str = "Sooooo sad:  You died! ";

/// HUD text scale; glyphs are 6x8 at 1.0.
const TEXT_SCALE: f32 = 1.0;
const SHIP_SIZE: f32 = 30.0;
const SPRITE_SIZE: f32 = 25.0;
const BEAM_SIZE: [f32; 2] = [2.0, 15.0];
/// Frames in the twinkle cycle of falling sprites.
const ANIMATION_FRAMES: u64 = 10;

/// Which animation frame to show at `elapsed_ms`. Advances every 100 ms.
pub fn animation_frame(elapsed_ms: u64, frames: u64) -> u64 {
    (elapsed_ms / 100) % frames.max(1)
}

/// Build the overlay for one frame of `session`.
pub fn build(session: &Session, elapsed_ms: u64, sw: f32, sh: f32) -> OverlayBuilder {
    let mut ob = OverlayBuilder::new(sw, sh);
    let frame = animation_frame(elapsed_ms, ANIMATION_FRAMES);

    let ship = session.player.position();
    ob.add_rotated_rect(ship.x, ship.y, SHIP_SIZE, SHIP_SIZE, 0.0, [0.8, 0.85, 0.9, 1.0]);
    for star in &session.stars {
        add_falling(&mut ob, star, frame);
    }
    for beam in &session.beams {
        let p = beam.position();
        ob.add_rotated_rect(p.x, p.y, BEAM_SIZE[0], BEAM_SIZE[1], 0.0, [1.0; 4]);
    }
    for obstacle in &session.obstacles {
        add_falling(&mut ob, obstacle, frame);
    }

    let yellow = argb(HUD_COLOR);
    ob.add_text(10.0, 10.0, &format!("Score: {}", session.player.score()), TEXT_SCALE, yellow);
    ob.add_text(10.0, 20.0, &format!("Lives: {}", session.player.lives()), TEXT_SCALE, yellow);
    if session.player.is_dead() {
        ob.add_text(300.0, 300.0, DEATH_MESSAGE, TEXT_SCALE, yellow);
    }
    ob
}

fn add_falling(ob: &mut OverlayBuilder, obj: &FallingObject, frame: u64) {
    // Stars pulse through the cycle; obstacles keep a steady size.
    let size = match obj.kind() {
        FallingKind::Star => SPRITE_SIZE * (0.8 + 0.04 * frame as f32),
        FallingKind::Obstacle => SPRITE_SIZE,
    };
    let p = obj.position();
    ob.add_rotated_rect(p.x, p.y, size, size, obj.angle(), obj.color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn quads(ob: &OverlayBuilder) -> usize {
        ob.indices.len() / 6
    }

    #[test]
    fn frame_advances_every_100ms() {
        assert_eq!(animation_frame(0, 10), 0);
        assert_eq!(animation_frame(99, 10), 0);
        assert_eq!(animation_frame(100, 10), 1);
        assert_eq!(animation_frame(1050, 10), 0);
        assert_eq!(animation_frame(1050, 0), 0);
    }

    #[test]
    fn hud_counts_glyphs_and_sprites() {
        let mut session = Session::new(600.0, 600.0);
        session
            .stars
            .push(FallingObject::new(FallingKind::Star, Vec2::new(10.0, 10.0), [1.0; 4]));

        let ob = build(&session, 0, 600.0, 600.0);

        // Ship + star, then one quad per character of the two lines.
        let glyphs = "Score: 0".len() + "Lives: 5".len();
        assert_eq!(quads(&ob), 2 + glyphs);
    }

    #[test]
    fn death_message_appears_when_out_of_lives() {
        let mut session = Session::new(600.0, 600.0);
        let mut stars: Vec<_> = (0..5)
            .map(|_| FallingObject::new(FallingKind::Star, session.player.position(), [1.0; 4]))
            .collect();
        session.player.collect_stars(&mut stars);
        assert!(session.player.is_dead());

        let alive = build(&Session::new(600.0, 600.0), 0, 600.0, 600.0);
        let dead = build(&session, 0, 600.0, 600.0);
        let message_glyphs = DEATH_MESSAGE.chars().count();
        assert_eq!(quads(&dead), quads(&alive) + message_glyphs);
    }
}
