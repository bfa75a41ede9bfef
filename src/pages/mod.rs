pub mod auth;
pub mod eco_score;
pub mod journey;
pub mod tasks;
