//! VitalAI backend client.

mod appointments;
mod auth;
mod chat;
mod client;
mod dto;

#[cfg(test)]
mod test_server;

pub use client::ApiClient;
