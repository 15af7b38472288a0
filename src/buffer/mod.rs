//! Geometry buffers: attribute layouts, vertex data and indices

mod layout;
mod vertex;
mod index;

pub use layout::*;
pub use vertex::*;
pub use index::*;
