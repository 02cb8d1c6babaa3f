pub mod cache;
pub mod emoji;
pub mod timestamp;
