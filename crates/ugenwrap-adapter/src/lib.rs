//! Exposes descriptor-driven clients as host units and asynchronous commands.
//!
//! - [`RealTime`]: streaming clients run inside the audio callback
//! - [`NonRealTime`]: batch clients run as a staged async command
//! - [`Dispatch`]: which of the two a client kind gets
//! - [`Host`]: what the adapter needs from the audio host
//! - [`LocalHost`]: in-process host (feature `local`)
//!
//! # Example
//!
//! ```ignore
//! use ugenwrap_adapter::{wrap, Dispatch, LocalHost, WrappedClient};
//!
//! impl WrappedClient for Loudness {
//!     fn dispatch() -> Dispatch {
//!         Dispatch::both::<Self>()
//!     }
//! }
//!
//! let host = LocalHost::builder().build()?;
//! wrap::<Loudness>(host.handle(), "Loudness")?;
//! ```

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod nonrealtime;
pub mod realtime;

#[cfg(feature = "local")]
pub mod local;

pub use adapter::{wrap, Adapter};
pub use config::AdapterConfig;
pub use dispatch::{Capability, Dispatch, SetupFn, WrappedClient};
pub use error::{Result, WrapperError};
pub use host::{
    AsyncCommand, AsyncStages, Host, InputSpec, NodeId, PluginCommand, Rate, ReplyAddress, Unit,
    UnitCommand, UnitFactory, UnitSpec,
};
pub use nonrealtime::NonRealTime;
pub use realtime::{Mode, RealTime, MAX_INLINE_CHANNELS};

#[cfg(feature = "local")]
pub use local::{LocalHost, LocalHostBuilder, Reply, UnitInstance};
