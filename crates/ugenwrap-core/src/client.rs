//! Contract implemented by wrapped signal-processing clients.
//!
//! A client declares its parameters once per kind through
//! [`Client::descriptors`], and implements one or both processing traits:
//!
//! - [`RealTimeClient`]: called every audio block with input and output views.
//! - [`NonRealTimeClient`]: called once on a worker thread against host buffers.
//!
//! The engines own the [`ParamSet`] and pass it in; clients never bind
//! arguments themselves.

use crate::descriptor::DescriptorSet;
use crate::params::ParamSet;
use crate::Result;

/// Common part of every client kind.
pub trait Client: Send + Sized + 'static {
    /// Parameter slots shared by every instance of this kind.
    fn descriptors() -> &'static DescriptorSet;

    /// Build an instance from its initial parameter values.
    fn new(params: &ParamSet) -> Self;

    /// Processing latency in samples.
    fn latency(&self) -> usize {
        0
    }
}

/// Streaming (per audio block) processing.
pub trait RealTimeClient: Client {
    fn audio_channels_in(&self) -> usize;

    fn audio_channels_out(&self) -> usize;

    /// Control-rate outputs. A client declaring these must declare no audio outputs.
    fn control_channels_out(&self) -> usize {
        0
    }

    /// Process one block.
    ///
    /// `inputs[i]` is empty when input `i` is not connected at audio rate.
    /// `outputs` holds the audio outputs (`frames` samples each) or the control
    /// outputs (one sample each).
    ///
    /// Runs on the audio thread: must not allocate, lock or block.
    fn process_block(&mut self, params: &ParamSet, inputs: &[&[f32]], outputs: &mut [&mut [f32]]);
}

/// Batch (offline) processing.
pub trait NonRealTimeClient: Client {
    /// Read and write host buffers referenced by `params`.
    ///
    /// Writes are staged; they become visible after the exchange stage.
    /// Runs on a worker thread.
    fn process_batch(&mut self, params: &ParamSet) -> Result<()>;
}
