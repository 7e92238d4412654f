//! Value extractors: one function per [`ParamKind`], looked up by table.
//!
//! Every extractor pulls exactly `kind.arity()` tokens from the source, whatever
//! the source variant. Missing tokens degrade to the source's defaults.

use crate::buffer::{BufferHandle, BufferStore};
use crate::descriptor::ParamKind;
use crate::source::ArgumentSource;
use crate::value::{FftParams, ParamValue};
use std::sync::Arc;

/// Environment an extraction runs in.
#[derive(Clone, Copy)]
pub struct ExtractContext<'a> {
    /// Store that buffer ids resolve against.
    pub buffers: &'a Arc<dyn BufferStore>,
    /// Log each extracted value. Never set on the audio thread.
    pub verbose: bool,
}

impl<'a> ExtractContext<'a> {
    pub fn new(buffers: &'a Arc<dyn BufferStore>) -> Self {
        Self {
            buffers,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

pub type Extractor = fn(&mut dyn ArgumentSource, &ExtractContext<'_>) -> ParamValue;

/// Indexed by `ParamKind` discriminant; order must match `ParamKind::ALL`.
static EXTRACTORS: [Extractor; ParamKind::COUNT] = [
    extract_float,
    extract_long,
    extract_enum,
    extract_buffer,
    extract_float_pairs,
    extract_fft,
];

/// Extractor for `kind`.
#[inline]
pub fn extractor(kind: ParamKind) -> Extractor {
    EXTRACTORS[kind.index()]
}

fn extract_float(source: &mut dyn ArgumentSource, _: &ExtractContext<'_>) -> ParamValue {
    ParamValue::Float(source.next_float() as f64)
}

fn extract_long(source: &mut dyn ArgumentSource, _: &ExtractContext<'_>) -> ParamValue {
    ParamValue::Long(source.next_int(0) as i64)
}

fn extract_enum(source: &mut dyn ArgumentSource, _: &ExtractContext<'_>) -> ParamValue {
    ParamValue::Enum(source.next_int(0) as i64)
}

fn extract_buffer(source: &mut dyn ArgumentSource, cx: &ExtractContext<'_>) -> ParamValue {
    let id = source.next_int(-1) as i64;
    ParamValue::Buffer(BufferHandle::resolve(id, cx.buffers))
}

fn extract_float_pairs(source: &mut dyn ArgumentSource, _: &ExtractContext<'_>) -> ParamValue {
    let mut values = [0.0; 4];
    for value in values.iter_mut() {
        *value = source.next_float() as f64;
    }
    ParamValue::FloatPairs(values)
}

fn extract_fft(source: &mut dyn ArgumentSource, _: &ExtractContext<'_>) -> ParamValue {
    // Window, hop, FFT size. Missing hop/FFT fall back to "derive from window".
    let window = source.next_int(1024) as i64;
    let hop = source.next_int(-1) as i64;
    let fft = source.next_int(-1) as i64;
    ParamValue::Fft(FftParams::new(window, hop, fft))
}
