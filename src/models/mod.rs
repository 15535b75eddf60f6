pub mod match_model;
