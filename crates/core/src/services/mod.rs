pub mod dump;
pub mod dumpers;
pub mod generator;
