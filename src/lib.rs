pub mod config;
pub mod controller;
pub mod error;
pub mod flow;
pub mod llm;
pub mod recipe;
pub mod server;

pub use error::{Error, Result};
