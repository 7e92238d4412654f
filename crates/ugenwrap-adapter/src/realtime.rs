//! Real-time engine: runs a streaming client inside the audio callback.
//!
//! Control inputs are re-read into the parameter set every block. When the
//! host's control input count disagrees with the client's descriptor token
//! arity (a client/host version skew), the unit goes silent instead of
//! reading garbage.

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::host::{NodeId, Rate, Unit, UnitSpec};
use rosc::OscType;
use smallvec::SmallVec;
use std::any::Any;
use std::sync::Arc;
use ugenwrap_core::{ExtractContext, ParamSet, RealTimeClient, StreamingSource};

/// Channels per side handled without heap allocation.
pub const MAX_INLINE_CHANNELS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Process,
    /// Outputs zeros, touches nothing else.
    Silent,
}

/// Unit instance wrapping one streaming client.
pub struct RealTime<C: RealTimeClient> {
    config: Arc<AdapterConfig>,
    mode: Mode,
    control_offset: usize,
    controls: StreamingSource,
    /// Per client audio input: true iff the host feeds it at audio rate.
    input_connected: SmallVec<[bool; MAX_INLINE_CHANNELS]>,
    output_count: usize,
    /// Audio outputs span the block; control outputs hold one value.
    audio_outputs: bool,
    params: ParamSet,
    client: C,
}

impl<C: RealTimeClient> RealTime<C> {
    /// Register the unit and its `latency` command with the host.
    pub fn setup(config: &Arc<AdapterConfig>) -> Result<()> {
        let host = config.host();

        let unit_config = Arc::clone(config);
        host.register_unit(
            config.name(),
            Box::new(move |spec: &UnitSpec| -> Box<dyn Unit> {
                Box::new(RealTime::<C>::new(&unit_config, spec))
            }),
        )?;

        let command_config = Arc::clone(config);
        host.register_unit_command(
            config.name(),
            "latency",
            Arc::new(move |unit: &mut dyn Unit, node: NodeId, _args: &[OscType]| {
                if let Some(unit) = unit.as_any_mut().downcast_mut::<RealTime<C>>() {
                    let latency = unit.client.latency() as f32;
                    command_config.host().send_node_reply(
                        node,
                        -1,
                        command_config.latency_reply_path(),
                        &[latency],
                    );
                }
            }),
        )?;

        tracing::debug!(adapter = %config.name(), "registered real-time unit");
        Ok(())
    }

    /// Instantiate against the host's declared unit shape.
    ///
    /// # Panics
    ///
    /// If the client declares both audio and control outputs.
    pub fn new(config: &Arc<AdapterConfig>, spec: &UnitSpec) -> Self {
        let descriptors = C::descriptors();
        let control_offset = spec.control_offset.min(spec.inputs.len());
        let initial: SmallVec<[f32; MAX_INLINE_CHANNELS]> = spec.control_values().collect();
        let mut controls = StreamingSource::from_values(&initial);

        let mut params = ParamSet::new(descriptors);
        let mode = if controls.size() == descriptors.token_arity() {
            let cx = ExtractContext::new(config.host().buffers());
            let bound = params.set_values(&mut controls, &cx);
            debug_assert!(bound.is_ok());
            Mode::Process
        } else {
            tracing::error!(
                adapter = %config.name(),
                expected = descriptors.token_arity(),
                received = controls.size(),
                "wrong number of arguments: expected {}, got {}. \
                 Client and host definitions are out of sync; \
                 check that both were built from the same release",
                descriptors.token_arity(),
                controls.size(),
            );
            Mode::Silent
        };

        let client = C::new(&params);
        let audio_out = client.audio_channels_out();
        let control_out = client.control_channels_out();
        assert!(
            audio_out == 0 || control_out == 0,
            "{}: a client cannot declare both audio and control outputs",
            config.name()
        );

        let input_connected = (0..client.audio_channels_in())
            .map(|i| i < control_offset && spec.inputs[i].rate == Rate::Audio)
            .collect();

        Self {
            config: Arc::clone(config),
            mode,
            control_offset,
            controls,
            input_connected,
            output_count: audio_out.max(control_out),
            audio_outputs: audio_out > 0,
            params,
            client,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// One audio block.
    pub fn next(&mut self, frames: usize, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        if self.mode == Mode::Silent {
            for output in outputs.iter_mut() {
                output.fill(0.0);
            }
            return;
        }

        self.controls
            .reset(inputs.get(self.control_offset..).unwrap_or(&[]));
        // Sizes were checked at construction; verbose logging stays off here.
        let cx = ExtractContext::new(self.config.host().buffers());
        let bound = self.params.set_values(&mut self.controls, &cx);
        debug_assert!(bound.is_ok());

        let input_views: SmallVec<[&[f32]; MAX_INLINE_CHANNELS]> = self
            .input_connected
            .iter()
            .enumerate()
            .map(|(i, &connected)| match inputs.get(i) {
                Some(input) if connected => &input[..frames.min(input.len())],
                _ => &[][..],
            })
            .collect();

        let span = if self.audio_outputs { frames } else { 1 };
        let mut output_views: SmallVec<[&mut [f32]; MAX_INLINE_CHANNELS]> = outputs
            .iter_mut()
            .take(self.output_count)
            .map(|output| {
                let len = span.min(output.len());
                &mut output[..len]
            })
            .collect();

        self.client
            .process_block(&self.params, &input_views, &mut output_views);
    }
}

impl<C: RealTimeClient> Unit for RealTime<C> {
    fn next(&mut self, frames: usize, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        RealTime::next(self, frames, inputs, outputs)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
