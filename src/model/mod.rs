pub mod board;
pub mod client;
pub mod config;
pub mod project;
pub mod task;

pub use board::*;
pub use client::*;
pub use config::*;
pub use project::*;
pub use task::*;
