pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod handler;
pub mod server;

pub use error::{Error, Result};
