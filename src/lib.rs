//! Region segmentation and text-line chaining over raw, runtime-typed pixel
//! buffers: link adjacent same-valued pixels into connected segments, then
//! group segments into maximal left-to-right reading-order chains with a
//! fitted shear-correcting affine per chain.

mod chain;
mod error;
mod link;
mod pixel;
mod segment;
mod segmentation;
mod util;

pub use chain::{Chain, ChainParams, ChainPool};
pub use error::{Error, Result};
pub use link::{EAST, NORTH, SOUTH, WEST};
pub use pixel::{PixelSample, PixelType};
pub use segment::{Point, Segment};
pub use segmentation::Segmentation;
pub use util::{ItemId, ItemPool, MemStack, ScopeStack};
