//! Typed parameter values as seen by clients.

use crate::buffer::BufferHandle;
use crate::descriptor::ParamKind;
use serde::{Deserialize, Serialize};

/// Window / hop / FFT size triple.
///
/// Non-positive `hop` and `fft` mean "derive from the window": hop defaults to
/// half the window, FFT size to the next power of two at or above the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FftParams {
    pub window: i64,
    pub hop: i64,
    pub fft: i64,
}

impl FftParams {
    pub const fn new(window: i64, hop: i64, fft: i64) -> Self {
        Self { window, hop, fft }
    }

    pub fn window_size(&self) -> i64 {
        self.window
    }

    pub fn hop_size(&self) -> i64 {
        if self.hop > 0 {
            self.hop
        } else {
            self.window / 2
        }
    }

    pub fn fft_size(&self) -> i64 {
        if self.fft > 0 {
            self.fft
        } else {
            next_power_of_two(self.window)
        }
    }

    /// Check the resolved sizes.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.window <= 0 {
            return Err(format!("window size {} must be positive", self.window));
        }
        if self.hop_size() < 1 {
            return Err(format!("hop size {} must be at least 1", self.hop_size()));
        }
        let fft = self.fft_size();
        if fft < self.window {
            return Err(format!(
                "FFT size {} smaller than window size {}",
                fft, self.window
            ));
        }
        if fft & (fft - 1) != 0 {
            return Err(format!("FFT size {} is not a power of two", fft));
        }
        Ok(())
    }
}

impl Default for FftParams {
    fn default() -> Self {
        Self::new(1024, -1, -1)
    }
}

fn next_power_of_two(n: i64) -> i64 {
    if n <= 1 {
        1
    } else {
        (n as u64).next_power_of_two() as i64
    }
}

/// Value held by one parameter slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Float(f64),
    Long(i64),
    Enum(i64),
    Buffer(Option<BufferHandle>),
    FloatPairs([f64; 4]),
    Fft(FftParams),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Long(_) => ParamKind::Long,
            ParamValue::Enum(_) => ParamKind::Enum,
            ParamValue::Buffer(_) => ParamKind::Buffer,
            ParamValue::FloatPairs(_) => ParamKind::FloatPairs,
            ParamValue::Fft(_) => ParamKind::Fft,
        }
    }

    /// Convert a scalar value to f64 if possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Long(i) | Self::Enum(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert a scalar value to i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(i) | Self::Enum(i) => Some(*i),
            Self::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&BufferHandle> {
        match self {
            Self::Buffer(handle) => handle.as_ref(),
            _ => None,
        }
    }
}
