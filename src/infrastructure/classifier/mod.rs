//! Clients for the external completion service behind content checks.

pub mod openai_client;

pub use openai_client::OpenAiClient;
