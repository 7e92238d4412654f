//! Test helpers and fixture clients for ugenwrap integration tests
//!
//! Fixtures:
//! - [`Gain`]: real-time, one audio input scaled by a control
//! - [`BlockRms`]: real-time, control-rate output only
//! - [`ThreeScalars`]: real-time, echoes its three scalar parameters
//! - [`BufScale`]: non-real-time, scales one buffer into another
//! - [`Offset`]: both real-time and non-real-time

#![allow(dead_code)]

pub mod tolerances;

use std::sync::Arc;
use std::time::Duration;
use ugenwrap::prelude::*;

/// Standard buffer size for deterministic testing
pub const TEST_BLOCK_SIZE: usize = 64;

pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Generous wait for the worker thread.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

/// Local host sharing `buffers` with the test.
pub fn test_host(buffers: &Arc<MemoryBufferStore>) -> LocalHost {
    init_tracing();
    LocalHost::builder()
        .buffers(buffers.clone())
        .build()
        .expect("Failed to create local host")
}

/// Mono buffer holding `samples`.
pub fn mono(samples: &[f32]) -> BufferData {
    BufferData::mono(samples.to_vec(), TEST_SAMPLE_RATE)
}

/// Linear ramp 0, 1, 2, ...
pub fn ramp(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32).collect()
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Live contents of buffer `id`.
pub fn read(buffers: &Arc<MemoryBufferStore>, id: u32) -> Option<Vec<f32>> {
    let store: Arc<dyn BufferStore> = buffers.clone();
    store.read(id).map(|data| data.samples().to_vec())
}

/// `out = in * gain`
pub struct Gain;

impl Client for Gain {
    fn descriptors() -> &'static DescriptorSet {
        static_descriptors![ParamDescriptor::float("gain", 1.0)]
    }

    fn new(_: &ParamSet) -> Self {
        Gain
    }

    fn latency(&self) -> usize {
        64
    }
}

impl RealTimeClient for Gain {
    fn audio_channels_in(&self) -> usize {
        1
    }

    fn audio_channels_out(&self) -> usize {
        1
    }

    fn process_block(&mut self, params: &ParamSet, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let gain = params.float(0).unwrap_or(0.0) as f32;
        let Some(output) = outputs.first_mut() else {
            return;
        };
        match inputs.first() {
            Some(input) if !input.is_empty() => {
                for (o, i) in output.iter_mut().zip(input.iter()) {
                    *o = i * gain;
                }
            }
            _ => output.fill(0.0),
        }
    }
}

impl WrappedClient for Gain {
    fn dispatch() -> Dispatch {
        Dispatch::real_time::<Self>()
    }
}

/// Block RMS of its input, times `scale`, on one control output.
pub struct BlockRms;

impl Client for BlockRms {
    fn descriptors() -> &'static DescriptorSet {
        static_descriptors![ParamDescriptor::float("scale", 1.0)]
    }

    fn new(_: &ParamSet) -> Self {
        BlockRms
    }
}

impl RealTimeClient for BlockRms {
    fn audio_channels_in(&self) -> usize {
        1
    }

    fn audio_channels_out(&self) -> usize {
        0
    }

    fn control_channels_out(&self) -> usize {
        1
    }

    fn process_block(&mut self, params: &ParamSet, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let scale = params.float(0).unwrap_or(1.0) as f32;
        let value = inputs.first().map(|i| rms(i)).unwrap_or(0.0) * scale;
        if let Some(output) = outputs.first_mut() {
            output.fill(value);
        }
    }
}

impl WrappedClient for BlockRms {
    fn dispatch() -> Dispatch {
        Dispatch::real_time::<Self>()
    }
}

/// Writes its parameters `a`, `b`, `c` to three control outputs.
pub struct ThreeScalars;

impl Client for ThreeScalars {
    fn descriptors() -> &'static DescriptorSet {
        static_descriptors![
            ParamDescriptor::float("a", 0.0),
            ParamDescriptor::float("b", 0.0),
            ParamDescriptor::long("c", 0),
        ]
    }

    fn new(_: &ParamSet) -> Self {
        ThreeScalars
    }
}

impl RealTimeClient for ThreeScalars {
    fn audio_channels_in(&self) -> usize {
        0
    }

    fn audio_channels_out(&self) -> usize {
        0
    }

    fn control_channels_out(&self) -> usize {
        3
    }

    fn process_block(&mut self, params: &ParamSet, _: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let values = [
            params.float(0).unwrap_or(-1.0) as f32,
            params.float(1).unwrap_or(-1.0) as f32,
            params.long(2).unwrap_or(-1) as f32,
        ];
        for (output, value) in outputs.iter_mut().zip(values) {
            output.fill(value);
        }
    }
}

impl WrappedClient for ThreeScalars {
    fn dispatch() -> Dispatch {
        Dispatch::real_time::<Self>()
    }
}

/// `target = source * factor`; fails when `source` is shorter than `min_frames`.
pub struct BufScale;

impl BufScale {
    pub const SOURCE: usize = 0;
    pub const TARGET: usize = 1;
    pub const FACTOR: usize = 2;
    pub const MIN_FRAMES: usize = 3;
}

impl Client for BufScale {
    fn descriptors() -> &'static DescriptorSet {
        static_descriptors![
            ParamDescriptor::buffer("source"),
            ParamDescriptor::buffer("target"),
            ParamDescriptor::float("factor", 1.0).range(-16.0, 16.0),
            ParamDescriptor::long("min_frames", 1).min(1.0),
        ]
    }

    fn new(_: &ParamSet) -> Self {
        BufScale
    }
}

impl NonRealTimeClient for BufScale {
    fn process_batch(&mut self, params: &ParamSet) -> ugenwrap::core::Result<()> {
        let source = params
            .buffer(Self::SOURCE)?
            .ok_or_else(|| ugenwrap::core::Error::processing("no source buffer"))?
            .read()?;
        let target = params
            .buffer(Self::TARGET)?
            .ok_or_else(|| ugenwrap::core::Error::processing("no target buffer"))?;

        let min_frames = params.long(Self::MIN_FRAMES)?;
        if (source.frames() as i64) < min_frames {
            return Err(ugenwrap::core::Error::processing("insufficient frames"));
        }

        let factor = params.float(Self::FACTOR)? as f32;
        let samples = source.samples().iter().map(|s| s * factor).collect();
        target.write(BufferData::from_interleaved(
            samples,
            source.channels(),
            source.sample_rate(),
        )?)
    }
}

impl WrappedClient for BufScale {
    fn dispatch() -> Dispatch {
        Dispatch::non_real_time::<Self>()
    }
}

/// Adds `offset`: to its audio input in real time, to a buffer offline.
pub struct Offset;

impl Client for Offset {
    fn descriptors() -> &'static DescriptorSet {
        static_descriptors![
            ParamDescriptor::buffer("target"),
            ParamDescriptor::float("offset", 0.0),
        ]
    }

    fn new(_: &ParamSet) -> Self {
        Offset
    }
}

impl RealTimeClient for Offset {
    fn audio_channels_in(&self) -> usize {
        1
    }

    fn audio_channels_out(&self) -> usize {
        1
    }

    fn process_block(&mut self, params: &ParamSet, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        let offset = params.float(1).unwrap_or(0.0) as f32;
        for (o, i) in outputs[0].iter_mut().zip(inputs[0].iter()) {
            *o = i + offset;
        }
    }
}

impl NonRealTimeClient for Offset {
    fn process_batch(&mut self, params: &ParamSet) -> ugenwrap::core::Result<()> {
        let target = params
            .buffer(0)?
            .ok_or_else(|| ugenwrap::core::Error::processing("no target buffer"))?;
        let offset = params.float(1)? as f32;
        let data = target.read()?;
        let samples = data.samples().iter().map(|s| s + offset).collect();
        target.write(BufferData::from_interleaved(
            samples,
            data.channels(),
            data.sample_rate(),
        )?)
    }
}

impl WrappedClient for Offset {
    fn dispatch() -> Dispatch {
        Dispatch::both::<Self>()
    }
}

/// Message arguments for a `BufScale` launch.
pub fn buf_scale_args(source: i32, target: i32, factor: f32, min_frames: i32) -> Vec<OscType> {
    vec![
        OscType::Int(source),
        OscType::Int(target),
        OscType::Float(factor),
        OscType::Int(min_frames),
    ]
}
