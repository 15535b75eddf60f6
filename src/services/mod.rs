pub mod scoring;
pub mod sports_api;
