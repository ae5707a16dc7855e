//! Scope sets and secret wrappers used by app and credential models.

pub mod scope;
pub mod secret;

pub use scope::*;
pub use secret::*;
