pub mod direction;
pub mod geometry;
pub mod tile;
pub mod vehicle;
