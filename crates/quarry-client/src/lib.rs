#![doc = include_str!("../README.md")]

mod client;
mod error;
mod execute;
mod types;

pub use client::ContentClient;
pub use error::ClientError;
pub use types::*;
