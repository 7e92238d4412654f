//! Parameter descriptors shared by every instance of a client kind.
//!
//! A [`DescriptorSet`] is the ordered list of typed slots a client declares. Its
//! order defines how arguments bind, whether they arrive as live control values
//! or as a one-shot OSC argument list.
//!
//! # Example
//!
//! ```
//! use ugenwrap_core::{descriptors, FftParams, ParamDescriptor};
//!
//! let set = descriptors![
//!     ParamDescriptor::buffer("source"),
//!     ParamDescriptor::float("threshold", 0.5).range(0.0, 1.0),
//!     ParamDescriptor::fft("fft", FftParams::default()),
//! ];
//!
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.token_arity(), 5);
//! ```

use crate::value::{FftParams, ParamValue};
use crate::{Error, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

/// Semantic type of a parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Float,
    Long,
    Enum,
    Buffer,
    /// Four floats, read in order.
    FloatPairs,
    /// Window, hop and FFT size.
    Fft,
}

impl ParamKind {
    pub const COUNT: usize = 6;

    /// Every kind, in extractor-table order.
    pub const ALL: [ParamKind; Self::COUNT] = [
        ParamKind::Float,
        ParamKind::Long,
        ParamKind::Enum,
        ParamKind::Buffer,
        ParamKind::FloatPairs,
        ParamKind::Fft,
    ];

    /// Number of argument tokens one slot of this kind consumes.
    pub const fn arity(self) -> usize {
        match self {
            ParamKind::Float | ParamKind::Long | ParamKind::Enum | ParamKind::Buffer => 1,
            ParamKind::FloatPairs => 4,
            ParamKind::Fft => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ParamKind::Float => "float",
            ParamKind::Long => "long",
            ParamKind::Enum => "enum",
            ParamKind::Buffer => "buffer",
            ParamKind::FloatPairs => "float pairs",
            ParamKind::Fft => "fft",
        }
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Range rule checked against a populated value before an offline command runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Min(f64),
    Max(f64),
}

impl Constraint {
    fn check(&self, value: f64) -> std::result::Result<(), String> {
        match *self {
            Constraint::Min(min) if value < min => {
                Err(format!("value {} below minimum {}", value, min))
            }
            Constraint::Max(max) if value > max => {
                Err(format!("value {} above maximum {}", value, max))
            }
            _ => Ok(()),
        }
    }
}

/// One typed parameter slot.
#[derive(Debug, Clone, Serialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub kind: ParamKind,
    /// Value the slot holds before the first successful bind.
    pub default: ParamValue,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Labels of an enumerated parameter, indexed by value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ParamDescriptor {
    fn with_kind(name: impl Into<String>, kind: ParamKind, default: ParamValue) -> Self {
        Self {
            name: name.into(),
            kind,
            default,
            constraints: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn float(name: impl Into<String>, default: f64) -> Self {
        Self::with_kind(name, ParamKind::Float, ParamValue::Float(default))
    }

    pub fn long(name: impl Into<String>, default: i64) -> Self {
        Self::with_kind(name, ParamKind::Long, ParamValue::Long(default))
    }

    /// Enumerated parameter. Values outside `0..options.len()` fail validation.
    pub fn enumeration(name: impl Into<String>, default: i64, options: &[&str]) -> Self {
        let mut descriptor = Self::with_kind(name, ParamKind::Enum, ParamValue::Enum(default));
        descriptor.options = options.iter().map(|s| s.to_string()).collect();
        descriptor
    }

    pub fn buffer(name: impl Into<String>) -> Self {
        Self::with_kind(name, ParamKind::Buffer, ParamValue::Buffer(None))
    }

    pub fn float_pairs(name: impl Into<String>, default: [f64; 4]) -> Self {
        Self::with_kind(name, ParamKind::FloatPairs, ParamValue::FloatPairs(default))
    }

    pub fn fft(name: impl Into<String>, default: FftParams) -> Self {
        Self::with_kind(name, ParamKind::Fft, ParamValue::Fft(default))
    }

    pub fn min(mut self, min: f64) -> Self {
        self.constraints.push(Constraint::Min(min));
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.constraints.push(Constraint::Max(max));
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        debug_assert!(max >= min, "max must not be below min");
        self.min(min).max(max)
    }

    /// Token arity of this slot.
    #[inline]
    pub fn arity(&self) -> usize {
        self.kind.arity()
    }

    /// Check a populated value against this slot's rules.
    ///
    /// Returns the first failing rule as [`Error::Constraint`].
    pub fn check(&self, value: &ParamValue) -> Result<()> {
        let fail = |message: String| Error::constraint(self.name.clone(), message);

        match value {
            ParamValue::Float(v) => self.check_scalar(*v).map_err(fail),
            ParamValue::Long(v) => self.check_scalar(*v as f64).map_err(fail),
            ParamValue::Enum(v) => {
                if !self.options.is_empty() && (*v < 0 || *v as usize >= self.options.len()) {
                    return Err(fail(format!(
                        "option {} out of range (0-{})",
                        v,
                        self.options.len() - 1
                    )));
                }
                self.check_scalar(*v as f64).map_err(fail)
            }
            ParamValue::FloatPairs(values) => values
                .iter()
                .try_for_each(|v| self.check_scalar(*v))
                .map_err(fail),
            ParamValue::Fft(fft) => fft.validate().map_err(fail),
            ParamValue::Buffer(_) => Ok(()),
        }
    }

    fn check_scalar(&self, value: f64) -> std::result::Result<(), String> {
        self.constraints.iter().try_for_each(|c| c.check(value))
    }
}

/// Ordered, immutable list of parameter descriptors.
///
/// Clone is cheap (Arc).
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    params: Arc<[ParamDescriptor]>,
    token_arity: usize,
}

impl DescriptorSet {
    pub fn new(params: Vec<ParamDescriptor>) -> Self {
        let token_arity = params.iter().map(ParamDescriptor::arity).sum();
        Self {
            params: params.into(),
            token_arity,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Total number of argument tokens a full bind consumes.
    ///
    /// Every arity check (streaming and message) compares against this.
    #[inline]
    pub fn token_arity(&self) -> usize {
        self.token_arity
    }

    pub fn get(&self, index: usize) -> Option<&ParamDescriptor> {
        self.params.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParamDescriptor> {
        self.params.iter()
    }
}

impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a ParamDescriptor;
    type IntoIter = std::slice::Iter<'a, ParamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for DescriptorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.params.iter())
    }
}
