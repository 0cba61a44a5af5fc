//! Shared 2D collision library.
//!
//! Every hit test in the game goes through this module. Positions are in
//! pixels, angles in radians measured as `atan2(dy, dx)`. Shapes that have a
//! facing put their forward axis along local +X.

mod collision;
mod shapes;

pub use collision::*;
pub use shapes::{Circle, Shape};
