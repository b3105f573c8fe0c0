mod client;
mod types;

pub use client::{ModelClient, OpenAiClient};
pub use types::{ModelReply, ModelRequest, OutputContractDescription};
