pub mod cache;
pub mod classifier;
pub mod hub;
pub mod normalize;
pub mod raw;
pub mod types;
