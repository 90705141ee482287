pub mod geometry;
pub mod ids;

pub use geometry::{Rect, Size, EDGE_EPSILON};
pub use ids::{NodeId, SessionId};
