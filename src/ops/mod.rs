pub mod board_ops;
pub mod check;
pub mod client_ops;
pub mod detail;
pub mod drag;
pub mod filter;
pub mod query;
