pub mod event;
pub mod severity;
pub mod record;
pub mod error;
pub mod client;
pub mod adapter;
pub mod transport;
pub mod channel;
pub mod layer;

#[cfg(feature = "http")]
pub mod http;

pub mod init;
pub mod noop;
pub mod env;
