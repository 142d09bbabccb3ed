//! Request/response models

pub mod heart;
pub mod symptoms;
pub mod tumor;

pub use heart::*;
pub use symptoms::*;
pub use tumor::*;
