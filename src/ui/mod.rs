pub mod input;
pub mod renderer;
pub mod signals;
pub mod view;

#[cfg(test)]
pub mod testing;
