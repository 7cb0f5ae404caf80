//! Source of uniform random samples for procedural generation.

/// Produces uniform samples in `[0, 1)`.
///
/// Every `rand` generator implements this, so callers pass `StdRng`,
/// `ThreadRng` or any other `RngCore`. Tests can supply a fixed sequence.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl<R: rand::RngCore + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        rand::Rng::gen::<f32>(self)
    }
}
