//! The scrolling terrain behind the playfield.

use engine_core::TextureRegion;
use procgen::{GridError, HeightField, RandomSource, ScrollClock, TerrainMesher};
use renderer::{BackgroundPass, FrameStats, GraphicsContext};

use crate::config::TerrainSettings;

/// Height field, scroll clock and mesher driven together: one `scroll` per
/// game tick, one `draw` per frame.
pub struct ScrollingBackground {
    field: HeightField,
    clock: ScrollClock,
    mesher: TerrainMesher,
    pass: BackgroundPass,
    region: Option<TextureRegion>,
}

impl ScrollingBackground {
    /// `region` is `None` when the texture could not be loaded as a single
    /// piece; the background then only clears to the sky color.
    pub fn new(
        settings: &TerrainSettings,
        region: Option<TextureRegion>,
        rng: &mut impl RandomSource,
    ) -> Result<Self, GridError> {
        Ok(Self {
            field: HeightField::new(settings.rows, settings.cols, rng)?,
            clock: ScrollClock::new(settings.scrolls_per_step),
            mesher: TerrainMesher::new(),
            pass: BackgroundPass::default(),
            region,
        })
    }

    /// Advance one tick, shifting in a new row when the clock wraps.
    pub fn scroll(&mut self, rng: &mut impl RandomSource) {
        if self.clock.tick() {
            self.field.shift(rng);
        }
    }

    pub fn draw<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) -> FrameStats {
        let region = self.region.as_ref();
        let quads = self.mesher.build(&self.field, self.clock.fractional_offset(), region);
        self.pass.draw(ctx, region, quads)
    }
}

#[cfg(test)]
impl ScrollingBackground {
    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn clock(&self) -> &ScrollClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::TextureHandle;
    use rand::{rngs::StdRng, SeedableRng};
    use renderer::{GraphicsCommand, RecordingContext};

    fn settings() -> TerrainSettings {
        TerrainSettings::default()
    }

    #[test]
    fn shifts_once_per_period() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bg = ScrollingBackground::new(&settings(), None, &mut rng).unwrap();
        let second_row = bg.field().row(1).to_vec();

        for _ in 0..49 {
            bg.scroll(&mut rng);
        }
        assert_eq!(bg.clock().counter(), 49);
        assert_ne!(bg.field().row(0), second_row.as_slice());

        bg.scroll(&mut rng);
        assert_eq!(bg.clock().counter(), 0);
        assert_eq!(bg.field().row(0), second_row.as_slice());
    }

    #[test]
    fn draws_every_cell_with_a_region() {
        let mut rng = StdRng::seed_from_u64(1);
        let region = TextureRegion::full(TextureHandle(0));
        let mut bg = ScrollingBackground::new(&settings(), Some(region), &mut rng).unwrap();
        let mut ctx = RecordingContext::new();

        let stats = bg.draw(&mut ctx);

        assert_eq!(stats.quads_submitted, 36);
        assert!(stats.texture_bound);
        assert!(ctx.strips().all(|s| s.len() == 4));
        assert!(!ctx.is_active());
    }

    #[test]
    fn missing_region_only_clears() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bg = ScrollingBackground::new(&settings(), None, &mut rng).unwrap();
        let mut ctx = RecordingContext::new();

        let stats = bg.draw(&mut ctx);

        assert_eq!(stats.quads_submitted, 0);
        assert!(ctx
            .commands()
            .iter()
            .any(|c| matches!(c, GraphicsCommand::Clear { .. })));
        assert_eq!(ctx.strips().count(), 0);
    }

    #[test]
    fn rejects_tiny_grids() {
        let mut rng = StdRng::seed_from_u64(1);
        let tiny = TerrainSettings {
            rows: 2,
            ..settings()
        };
        assert!(matches!(
            ScrollingBackground::new(&tiny, None, &mut rng),
            Err(GridError::TooSmall { rows: 2, cols: 7 })
        ));
    }
}
