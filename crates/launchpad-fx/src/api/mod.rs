pub mod effect;
pub mod types;
