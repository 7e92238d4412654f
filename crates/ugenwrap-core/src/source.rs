//! Argument sources: where parameter tokens come from.
//!
//! - [`StreamingSource`]: live control values, re-read every audio block.
//! - [`MessageSource`]: OSC arguments of a one-shot command.
//!
//! Extractors only see the [`ArgumentSource`] trait, so the same extraction code
//! runs against either.

use rosc::OscType;

/// Positional token feed consumed by the extractors.
pub trait ArgumentSource {
    /// Total number of tokens this source holds. Compared against the
    /// descriptor token arity before any extraction.
    fn size(&self) -> usize;

    fn next_float(&mut self) -> f32;

    /// Next token as an integer, or `default` when there is nothing usable.
    fn next_int(&mut self, default: i32) -> i32;
}

/// Live per-block control values.
///
/// Storage is sized once at construction; `reset` copies the current block's
/// values in place and never allocates.
#[derive(Debug, Clone)]
pub struct StreamingSource {
    values: Vec<f32>,
    cursor: usize,
}

impl StreamingSource {
    /// Source for `size` control inputs, all reading zero until the first reset.
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![0.0; size],
            cursor: 0,
        }
    }

    pub fn from_values(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }

    /// Rebind to the current block's control inputs and rewind.
    ///
    /// Each input contributes its first sample. Inputs missing from `controls`
    /// read as zero.
    pub fn reset(&mut self, controls: &[&[f32]]) {
        let mut inputs = controls.iter();
        for slot in self.values.iter_mut() {
            *slot = inputs
                .next()
                .and_then(|input| input.first().copied())
                .unwrap_or(0.0);
        }
        self.cursor = 0;
    }

    /// Current value, then advance. Zero once exhausted.
    #[inline]
    pub fn next(&mut self) -> f32 {
        match self.values.get(self.cursor) {
            Some(&value) => {
                self.cursor += 1;
                value
            }
            None => 0.0,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

impl ArgumentSource for StreamingSource {
    fn size(&self) -> usize {
        self.values.len()
    }

    fn next_float(&mut self) -> f32 {
        self.next()
    }

    /// Control values are floats; integers truncate. Exhaustion reads zero,
    /// not `default`.
    fn next_int(&mut self, _default: i32) -> i32 {
        self.next() as i32
    }
}

/// One-shot cursor over OSC command arguments.
#[derive(Debug, Clone)]
pub struct MessageSource<'a> {
    tokens: &'a [OscType],
    cursor: usize,
}

impl<'a> MessageSource<'a> {
    pub fn new(tokens: &'a [OscType]) -> Self {
        Self { tokens, cursor: 0 }
    }

    /// Split a command's arguments into parameter tokens and the trailing
    /// completion payload.
    ///
    /// Only a blob sitting exactly one past the expected token count is treated
    /// as a payload; anything else stays a parameter token so the arity check
    /// sees it.
    pub fn from_command(args: &'a [OscType], arity: usize) -> (Self, Option<&'a [u8]>) {
        if args.len() == arity + 1 {
            if let OscType::Blob(payload) = &args[arity] {
                return (Self::new(&args[..arity]), Some(payload.as_slice()));
            }
        }
        (Self::new(args), None)
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len() - self.cursor
    }

    pub fn next_blob(&mut self) -> Option<&'a [u8]> {
        match self.next_token()? {
            OscType::Blob(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    fn next_token(&mut self) -> Option<&'a OscType> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }
}

impl ArgumentSource for MessageSource<'_> {
    fn size(&self) -> usize {
        self.tokens.len()
    }

    fn next_float(&mut self) -> f32 {
        match self.next_token() {
            Some(OscType::Float(f)) => *f,
            Some(OscType::Int(i)) => *i as f32,
            Some(OscType::Double(d)) => *d as f32,
            Some(OscType::Long(l)) => *l as f32,
            _ => 0.0,
        }
    }

    fn next_int(&mut self, default: i32) -> i32 {
        match self.next_token() {
            Some(OscType::Int(i)) => *i,
            Some(OscType::Float(f)) => float_to_int(*f as f64, default),
            Some(OscType::Long(l)) => i32::try_from(*l).unwrap_or(default),
            Some(OscType::Double(d)) => float_to_int(*d, default),
            _ => default,
        }
    }
}

/// Truncate toward zero; non-finite or out-of-range values give `default`.
fn float_to_int(value: f64, default: i32) -> i32 {
    if value.is_finite() && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        value as i32
    } else {
        default
    }
}
