pub mod assistant;
pub mod filler;
pub mod session_model;
pub mod transcript;
