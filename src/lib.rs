//! Async client for the [pfp.lgbt](https://pfp.lgbt) pride-flag image API.
//!
//! ```no_run
//! use pfp_client::{FlagId, PfpClient, StaticOptions};
//!
//! # async fn demo(avatar: Vec<u8>) -> pfp_client::Result<()> {
//! let client = PfpClient::new()?;
//! let flags = client.get_flags().await?;
//! println!("{} flags available", flags.len());
//! let png = client
//!     .create_static_effect(avatar, FlagId::Trans, StaticOptions::default())
//!     .await?;
//! # let _ = png;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::PfpClient;
pub use config::Config;
pub use error::{PfpError, Result};
pub use http::rate_limit::{Clock, RateLimitGate, SystemClock};
pub use types::{
    AnimatedEffect, AnimatedOptions, EffectStyle, FlagDescriptor, FlagId, FlagResponse,
    ImageSource, OutputFormat, StaticEffect, StaticOptions,
};
