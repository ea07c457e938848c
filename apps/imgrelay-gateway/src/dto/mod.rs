//! Data transfer objects

pub mod resolve;
