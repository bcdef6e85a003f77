pub mod config;
pub mod error;
pub mod forces;
pub mod geometry;
pub mod persist;
pub mod scorer;
pub mod spec;
pub mod tasks;
