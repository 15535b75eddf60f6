pub mod match_controller;
pub mod sports_controller;
