pub mod commands;
pub mod config;
pub mod error;
pub mod estimator;
pub mod layout;
pub mod live;
pub mod merge;
pub mod models;
pub mod projector;
pub mod render;
pub mod utils;
