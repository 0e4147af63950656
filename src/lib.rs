pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod facebook;
pub mod factory;
pub mod insights;
pub mod models;
pub mod services;
pub mod storage;
pub mod tiktok;
pub mod transport;
pub mod validation;

pub use client::AdsClient;
pub use error::{ClientError, GatewayError};
pub use factory::ClientFactory;
