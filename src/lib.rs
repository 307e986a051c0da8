pub mod bridge;
pub mod cli;
pub mod context;
pub mod discover;
pub mod dom;
pub mod session;
pub mod speech;
pub mod summarize;
pub mod trace;
