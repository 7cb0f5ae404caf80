//! Procedural generation for the scrolling background: the rolling height
//! field, the clock that paces its shifts, and the mesher that turns it into
//! textured triangle strips.

pub mod height_field;
pub mod random;
pub mod scroll_clock;
pub mod terrain;

pub use height_field::*;
pub use random::*;
pub use scroll_clock::*;
pub use terrain::*;
