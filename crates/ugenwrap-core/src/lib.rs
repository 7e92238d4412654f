//! Parameter marshalling for wrapped audio clients.
//!
//! # Primary API
//!
//! - [`DescriptorSet`] / [`ParamDescriptor`]: the typed slots a client declares
//! - [`StreamingSource`] / [`MessageSource`]: live control values or OSC arguments
//! - [`ParamSet`]: the populated values, bound through the [`extractor`] table
//! - [`BufferStore`] / [`BufferHandle`]: host-owned buffers referenced by id
//! - [`Client`], [`RealTimeClient`], [`NonRealTimeClient`]: what a client implements
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use ugenwrap_core::prelude::*;
//!
//! let descriptors = descriptors![
//!     ParamDescriptor::float("gain", 1.0),
//!     ParamDescriptor::buffer("target"),
//! ];
//! let buffers: Arc<dyn BufferStore> = MemoryBufferStore::shared(8);
//!
//! let mut params = ParamSet::new(&descriptors);
//! let args = [OscType::Float(0.5), OscType::Int(3)];
//! params
//!     .set_values(&mut MessageSource::new(&args), &ExtractContext::new(&buffers))
//!     .unwrap();
//!
//! assert_eq!(params.float(0).unwrap(), 0.5);
//! assert_eq!(params.buffer(1).unwrap().map(|b| b.id()), Some(3));
//! ```

#[macro_use]
mod macros;

pub mod error;
pub use error::{Error, Result};

pub mod descriptor;
pub use descriptor::{Constraint, DescriptorSet, ParamDescriptor, ParamKind};

pub mod value;
pub use value::{FftParams, ParamValue};

pub mod buffer;
pub use buffer::{BufferData, BufferHandle, BufferStore, MemoryBufferStore};

pub mod source;
pub use source::{ArgumentSource, MessageSource, StreamingSource};

pub mod extract;
pub use extract::{extractor, ExtractContext, Extractor};

pub mod params;
pub use params::ParamSet;

pub mod client;
pub use client::{Client, NonRealTimeClient, RealTimeClient};

pub use rosc::OscType;

pub mod prelude {
    pub use crate::{
        descriptors, static_descriptors, ArgumentSource, BufferData, BufferHandle, BufferStore,
        Client, DescriptorSet, Error, ExtractContext, FftParams, MemoryBufferStore,
        MessageSource, NonRealTimeClient, OscType, ParamDescriptor, ParamKind, ParamSet,
        ParamValue, RealTimeClient, Result, StreamingSource,
    };
}
