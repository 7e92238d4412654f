//! Parameter set owned by one client instance.

use crate::buffer::BufferHandle;
use crate::descriptor::{DescriptorSet, ParamDescriptor, ParamKind};
use crate::extract::{extractor, ExtractContext};
use crate::source::ArgumentSource;
use crate::value::{FftParams, ParamValue};
use crate::{Error, Result};

/// Typed values for every slot of a [`DescriptorSet`], in descriptor order.
///
/// Created holding the descriptor defaults and repopulated in place by
/// [`set_values`](Self::set_values).
#[derive(Debug, Clone)]
pub struct ParamSet {
    descriptors: DescriptorSet,
    values: Vec<ParamValue>,
}

impl ParamSet {
    pub fn new(descriptors: &DescriptorSet) -> Self {
        let values = descriptors.iter().map(|d| d.default.clone()).collect();
        Self {
            descriptors: descriptors.clone(),
            values,
        }
    }

    /// Bind every slot from `source`, in descriptor order.
    ///
    /// The source size must equal the descriptor token arity. On mismatch
    /// nothing is consumed and every slot keeps its previous value.
    pub fn set_values(
        &mut self,
        source: &mut dyn ArgumentSource,
        cx: &ExtractContext<'_>,
    ) -> Result<()> {
        let expected = self.descriptors.token_arity();
        let received = source.size();
        if received != expected {
            return Err(Error::ArityMismatch { expected, received });
        }

        for (descriptor, slot) in self.descriptors.iter().zip(self.values.iter_mut()) {
            *slot = extractor(descriptor.kind)(source, cx);
            if cx.verbose {
                tracing::debug!(param = %descriptor.name, value = ?slot, "parameter bound");
            }
        }
        Ok(())
    }

    /// Run every descriptor's checks against the current values, lazily.
    pub fn constrain_values(&self) -> impl Iterator<Item = Result<()>> + '_ {
        self.descriptors
            .iter()
            .zip(self.values.iter())
            .map(|(descriptor, value)| descriptor.check(value))
    }

    /// First failing check, if any.
    pub fn validate(&self) -> Result<()> {
        self.constrain_values().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&ParamValue> {
        self.values.get(index)
    }

    /// Value by descriptor name.
    pub fn by_name(&self, name: &str) -> Option<&ParamValue> {
        self.descriptors.index_of(name).and_then(|i| self.get(i))
    }

    pub fn float(&self, index: usize) -> Result<f64> {
        match self.get(index) {
            Some(ParamValue::Float(v)) => Ok(*v),
            _ => Err(self.type_error(index, ParamKind::Float)),
        }
    }

    pub fn long(&self, index: usize) -> Result<i64> {
        match self.get(index) {
            Some(ParamValue::Long(v)) => Ok(*v),
            _ => Err(self.type_error(index, ParamKind::Long)),
        }
    }

    pub fn enumeration(&self, index: usize) -> Result<i64> {
        match self.get(index) {
            Some(ParamValue::Enum(v)) => Ok(*v),
            _ => Err(self.type_error(index, ParamKind::Enum)),
        }
    }

    /// `Ok(None)` for a buffer slot holding no buffer.
    pub fn buffer(&self, index: usize) -> Result<Option<&BufferHandle>> {
        match self.get(index) {
            Some(ParamValue::Buffer(handle)) => Ok(handle.as_ref()),
            _ => Err(self.type_error(index, ParamKind::Buffer)),
        }
    }

    pub fn float_pairs(&self, index: usize) -> Result<[f64; 4]> {
        match self.get(index) {
            Some(ParamValue::FloatPairs(v)) => Ok(*v),
            _ => Err(self.type_error(index, ParamKind::FloatPairs)),
        }
    }

    pub fn fft(&self, index: usize) -> Result<FftParams> {
        match self.get(index) {
            Some(ParamValue::Fft(v)) => Ok(*v),
            _ => Err(self.type_error(index, ParamKind::Fft)),
        }
    }

    /// Every bound buffer, in slot order.
    pub fn buffers(&self) -> impl Iterator<Item = &BufferHandle> + '_ {
        self.values.iter().filter_map(ParamValue::as_buffer)
    }

    /// Descriptor/value pairs, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamDescriptor, &ParamValue)> + '_ {
        self.descriptors.iter().zip(self.values.iter())
    }

    fn type_error(&self, index: usize, expected: ParamKind) -> Error {
        Error::ParamType {
            index,
            expected: expected.name(),
        }
    }
}
