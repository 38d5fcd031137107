pub mod api;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod notice;
pub mod observability;
pub mod render;
pub mod state;
