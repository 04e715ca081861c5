pub mod color;
pub mod rng;
pub mod time;
