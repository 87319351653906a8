//! Collision queries - circles, rectangles, walkable geometry

pub mod grid;
pub mod query;
pub mod shapes;

pub use grid::ActorGrid;
pub use query::{nearest, CollisionQuery};
pub use shapes::{Circle, Rect};
