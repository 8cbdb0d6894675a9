pub mod config;
pub mod handler;
pub mod output;
pub mod signals;
