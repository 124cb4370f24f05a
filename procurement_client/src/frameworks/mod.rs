pub mod bootstrap;
pub mod config;
pub mod context;
pub mod debug;
