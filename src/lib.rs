pub mod config;
pub mod export;
pub mod form;
pub mod persist;
pub mod standings;
pub mod state;
