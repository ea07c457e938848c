//! Request handlers

pub mod resolve;
