pub mod api;
pub mod auth;
pub mod config;
pub mod index;
pub mod models;
pub mod search;
pub mod state;
pub mod utils;
