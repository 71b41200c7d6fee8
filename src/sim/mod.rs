pub mod event;
pub mod layout;
pub mod level;
pub mod step;
pub mod tick;
pub mod world;
