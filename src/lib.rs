pub mod config;
pub mod error;
pub mod generator;
pub mod glyph;
pub mod icon;
pub mod layout;
pub mod logger;

pub use error::{IconError, Result};
