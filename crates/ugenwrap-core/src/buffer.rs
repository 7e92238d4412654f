//! External buffer subsystem contract and an in-memory implementation.
//!
//! Buffers are owned by the host and referenced by integer id. A client never
//! owns one; it holds a [`BufferHandle`] bound to the store it was resolved
//! against.
//!
//! Offline work stages writes in its own handle from a worker thread. The staged
//! data only becomes visible to the audio thread after
//! [`BufferHandle::assign_to_rt`] runs on the real-time side, and
//! [`BufferHandle::release`] later drops whatever the swap retired so the audio
//! thread never frees memory.

use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Interleaved sample data of one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferData {
    frames: usize,
    channels: usize,
    sample_rate: f64,
    samples: Vec<f32>,
}

impl BufferData {
    /// Zeroed buffer.
    pub fn new(frames: usize, channels: usize, sample_rate: f64) -> Self {
        Self {
            frames,
            channels,
            sample_rate,
            samples: vec![0.0; frames * channels],
        }
    }

    /// Wrap interleaved samples. `samples.len()` must be a multiple of `channels`.
    pub fn from_interleaved(samples: Vec<f32>, channels: usize, sample_rate: f64) -> Result<Self> {
        if channels == 0 || samples.len() % channels != 0 {
            return Err(Error::BufferShape {
                id: -1,
                frames: if channels == 0 { 0 } else { samples.len() / channels },
                channels,
                samples: samples.len(),
            });
        }
        Ok(Self {
            frames: samples.len() / channels,
            channels,
            sample_rate,
            samples,
        })
    }

    pub fn mono(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self {
            frames: samples.len(),
            channels: 1,
            sample_rate,
            samples,
        }
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    #[inline]
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        self.samples[frame * self.channels + channel]
    }

    /// Iterate one channel's samples.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        self.samples
            .iter()
            .skip(channel)
            .step_by(self.channels.max(1))
            .copied()
    }
}

/// Host-side buffer storage keyed by non-negative id.
///
/// The store only holds live data. Uncommitted writes live in the
/// [`BufferHandle`] of the command that made them, so concurrent commands on
/// one buffer never see or discard each other's work.
pub trait BufferStore: Send + Sync {
    /// Number of addressable ids (`0..capacity`).
    fn capacity(&self) -> usize;

    /// Data currently visible to the audio thread. Lock-free.
    fn read(&self, id: u32) -> Option<Arc<BufferData>>;

    /// Swap `data` in as the live contents and hand back what it replaced.
    ///
    /// Runs on the real-time-safe thread. Must not drop the previous data; the
    /// caller keeps it until it can be released elsewhere.
    fn publish(&self, id: u32, data: Arc<BufferData>) -> Result<Option<Arc<BufferData>>>;
}

/// Reference to an externally owned buffer, bound to the store it was resolved against.
///
/// A handle also carries the writes of the command that owns it: contents
/// staged by [`write`](Self::write), and after [`assign_to_rt`](Self::assign_to_rt)
/// the data it retired. [`release`](Self::release) drops both, off the audio thread.
pub struct BufferHandle {
    id: u32,
    store: Arc<dyn BufferStore>,
    staged: Mutex<Option<Arc<BufferData>>>,
    retired: Mutex<Option<Arc<BufferData>>>,
}

impl BufferHandle {
    /// Resolve a raw id. Negative (or out of `u32` range) ids mean "no buffer".
    ///
    /// Does not allocate.
    pub fn resolve(id: i64, store: &Arc<dyn BufferStore>) -> Option<Self> {
        let id = u32::try_from(id).ok()?;
        Some(Self::bound(id, Arc::clone(store)))
    }

    fn bound(id: u32, store: Arc<dyn BufferStore>) -> Self {
        Self {
            id,
            store,
            staged: Mutex::new(None),
            retired: Mutex::new(None),
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn store(&self) -> &Arc<dyn BufferStore> {
        &self.store
    }

    /// Whether this handle was resolved against `store`.
    pub fn is_bound_to(&self, store: &Arc<dyn BufferStore>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.store), Arc::as_ptr(store))
    }

    /// Live contents.
    pub fn read(&self) -> Result<Arc<BufferData>> {
        self.store
            .read(self.id)
            .ok_or(Error::UnknownBuffer(self.id as i64))
    }

    /// Stage new contents for the next exchange. Replaces anything staged earlier
    /// through this handle.
    pub fn write(&self, data: BufferData) -> Result<()> {
        if self.id as usize >= self.store.capacity() {
            return Err(Error::UnknownBuffer(self.id as i64));
        }
        *self.staged.lock() = Some(Arc::new(data));
        Ok(())
    }

    /// Whether a write is waiting for an exchange.
    pub fn has_staged(&self) -> bool {
        self.staged.lock().is_some()
    }

    /// Publish this handle's staged contents to the audio thread. Returns true if
    /// anything was swapped in.
    ///
    /// Real-time safe: the replaced data is kept until [`release`](Self::release).
    /// Returns false without publishing while retired data is still held.
    pub fn assign_to_rt(&self) -> bool {
        let mut retired = self.retired.lock();
        if retired.is_some() {
            return false;
        }
        let Some(staged) = self.staged.lock().take() else {
            return false;
        };
        match self.store.publish(self.id, staged) {
            Ok(previous) => {
                *retired = previous;
                true
            }
            Err(_) => false,
        }
    }

    /// Drop whatever this handle staged or retired.
    pub fn release(&self) {
        self.staged.lock().take();
        self.retired.lock().take();
    }
}

/// The clone refers to the same buffer; uncommitted writes stay with the original.
impl Clone for BufferHandle {
    fn clone(&self) -> Self {
        Self::bound(self.id, Arc::clone(&self.store))
    }
}

impl fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHandle").field("id", &self.id).finish()
    }
}

impl PartialEq for BufferHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.is_bound_to(&other.store)
    }
}

impl Serialize for BufferHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.id)
    }
}

/// Fixed-capacity in-memory buffer store.
pub struct MemoryBufferStore {
    slots: Box<[ArcSwapOption<BufferData>]>,
}

impl MemoryBufferStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| ArcSwapOption::empty()).collect(),
        }
    }

    /// Shared handle usable as `Arc<dyn BufferStore>`.
    pub fn shared(capacity: usize) -> Arc<Self> {
        Arc::new(Self::new(capacity))
    }

    /// Replace live contents directly, bypassing the staged/exchange cycle.
    ///
    /// Host-side allocation path; not for use while the buffer is being processed.
    pub fn set(&self, id: u32, data: BufferData) -> Result<()> {
        self.slot(id)?.store(Some(Arc::new(data)));
        Ok(())
    }

    /// Free a buffer.
    pub fn free(&self, id: u32) -> Result<()> {
        self.slot(id)?.store(None);
        Ok(())
    }

    fn slot(&self, id: u32) -> Result<&ArcSwapOption<BufferData>> {
        self.slots
            .get(id as usize)
            .ok_or(Error::UnknownBuffer(id as i64))
    }
}

impl BufferStore for MemoryBufferStore {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn read(&self, id: u32) -> Option<Arc<BufferData>> {
        self.slots.get(id as usize)?.load_full()
    }

    fn publish(&self, id: u32, data: Arc<BufferData>) -> Result<Option<Arc<BufferData>>> {
        Ok(self.slot(id)?.swap(Some(data)))
    }
}

impl fmt::Debug for MemoryBufferStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBufferStore")
            .field("capacity", &self.slots.len())
            .finish()
    }
}
