pub mod match_types;
