//! HTTP handlers

pub mod health;
pub mod heart;
pub mod symptoms;
pub mod tumor;
