//! # ugenwrap - descriptor-driven clients as audio host units
//!
//! Umbrella crate that coordinates:
//! - **ugenwrap-core** - Parameter descriptors, argument sources, extractors, buffer handles, client traits
//! - **ugenwrap-adapter** - Real-time and non-real-time engines, capability dispatch, host contract
//!
//! ## Quick Start
//!
//! ```ignore
//! use ugenwrap::prelude::*;
//!
//! struct Gain;
//!
//! impl Client for Gain {
//!     fn descriptors() -> &'static DescriptorSet {
//!         static_descriptors![ParamDescriptor::float("gain", 1.0)]
//!     }
//!     fn new(_: &ParamSet) -> Self { Gain }
//! }
//!
//! impl RealTimeClient for Gain { /* channel counts, process_block */ }
//!
//! impl WrappedClient for Gain {
//!     fn dispatch() -> Dispatch { Dispatch::real_time::<Self>() }
//! }
//!
//! let host = LocalHost::builder().build()?;
//! let loader = PluginLoader::new(host.handle()).wrap::<Gain>("Gain")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `local` (default) - In-process reference host

/// Re-export of ugenwrap-core for direct access
pub use ugenwrap_core as core;

/// Re-export of ugenwrap-adapter for direct access
pub use ugenwrap_adapter as adapter;

pub use ugenwrap_core::{
    descriptors, static_descriptors, ArgumentSource, BufferData, BufferHandle, BufferStore,
    Client, Constraint, DescriptorSet, ExtractContext, FftParams, MemoryBufferStore,
    MessageSource, NonRealTimeClient, OscType, ParamDescriptor, ParamKind, ParamSet, ParamValue,
    RealTimeClient, StreamingSource,
};

pub use ugenwrap_adapter::{
    wrap, Adapter, AdapterConfig, AsyncCommand, AsyncStages, Capability, Dispatch, Host,
    InputSpec, Mode, NodeId, NonRealTime, Rate, RealTime, ReplyAddress, Unit, UnitSpec,
    WrapperError, WrappedClient,
};

#[cfg(feature = "local")]
pub use ugenwrap_adapter::{LocalHost, LocalHostBuilder, Reply, UnitInstance};

mod builder;
pub use builder::PluginLoader;

mod error;
pub use error::{Error, Result};

pub mod prelude {
    pub use crate::{
        descriptors, static_descriptors, BufferData, BufferHandle, BufferStore, Capability,
        Client, DescriptorSet, Dispatch, Error, FftParams, Host, InputSpec, MemoryBufferStore,
        NonRealTimeClient, OscType, ParamDescriptor, ParamSet, ParamValue, PluginLoader,
        RealTimeClient, ReplyAddress, Result, UnitSpec, WrappedClient,
    };

    #[cfg(feature = "local")]
    pub use crate::{LocalHost, Reply};
}
