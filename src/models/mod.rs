pub mod data_models;

#[cfg(test)]
pub mod fixtures;

pub use data_models::*;
