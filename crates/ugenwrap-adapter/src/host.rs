//! Host registration surface.
//!
//! The adapter never talks to an audio server directly. Everything it needs
//! (unit and command registration, async command scheduling, node replies, buffer
//! storage) goes through [`Host`].

use crate::error::Result;
use rosc::OscType;
use std::any::Any;
use std::sync::Arc;
use ugenwrap_core::BufferStore;

/// Host-assigned node identifier of a unit instance.
pub type NodeId = i32;

/// Opaque address an async command reports back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyAddress(pub u64);

/// Calculation rate of a unit input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rate {
    Scalar,
    Control,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSpec {
    pub rate: Rate,
    /// Value at instantiation time.
    pub value: f32,
}

impl InputSpec {
    pub fn audio() -> Self {
        Self {
            rate: Rate::Audio,
            value: 0.0,
        }
    }

    pub fn control(value: f32) -> Self {
        Self {
            rate: Rate::Control,
            value,
        }
    }

    pub fn scalar(value: f32) -> Self {
        Self {
            rate: Rate::Scalar,
            value,
        }
    }
}

/// Shape of a unit as declared by the host at instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpec {
    pub inputs: Vec<InputSpec>,
    pub outputs: usize,
    /// Leading inputs reserved for audio; the rest are control values.
    pub control_offset: usize,
    pub block_size: usize,
    pub sample_rate: f64,
}

impl UnitSpec {
    pub fn new(inputs: Vec<InputSpec>, outputs: usize, control_offset: usize) -> Self {
        Self {
            inputs,
            outputs,
            control_offset,
            block_size: 64,
            sample_rate: 48000.0,
        }
    }

    /// Initial values of the control inputs.
    pub fn control_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.inputs.iter().skip(self.control_offset).map(|i| i.value)
    }
}

/// Per-block processing unit living on the audio thread.
pub trait Unit: Send + Any {
    /// `inputs` holds every host input (audio inputs first, then controls);
    /// `outputs` every host output.
    fn next(&mut self, frames: usize, inputs: &[&[f32]], outputs: &mut [&mut [f32]]);

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

pub type UnitFactory = Box<dyn Fn(&UnitSpec) -> Box<dyn Unit> + Send + Sync>;

/// Handler for a command addressed to one unit instance. Runs on the audio thread.
pub type UnitCommand = Arc<dyn Fn(&mut dyn Unit, NodeId, &[OscType]) + Send + Sync>;

/// Handler for a global command.
pub type PluginCommand =
    Arc<dyn Fn(&[OscType], Option<ReplyAddress>) -> Result<()> + Send + Sync>;

/// Staged work of one asynchronous command.
///
/// The host runs the stages strictly in order, `process` and `tidy_up` on a
/// worker thread, `exchange` on the real-time-safe thread, then destroys the
/// command exactly once by consuming the box.
pub trait AsyncStages: Send {
    fn process(&mut self) -> bool;

    fn exchange(&mut self) -> bool;

    fn tidy_up(&mut self) -> bool;

    /// Failure message recorded by a failed stage.
    fn failure(&self) -> Option<&str>;

    fn destroy(self: Box<Self>) {}
}

/// An asynchronous command handed to [`Host::do_async_command`].
pub struct AsyncCommand {
    pub name: String,
    pub reply: Option<ReplyAddress>,
    pub stages: Box<dyn AsyncStages>,
    /// Encoded OSC packet to perform after a successful exchange.
    pub completion: Option<Vec<u8>>,
}

impl std::fmt::Debug for AsyncCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCommand")
            .field("name", &self.name)
            .field("reply", &self.reply)
            .field("completion", &self.completion.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

/// Registration and scheduling API of an audio host.
pub trait Host: Send + Sync {
    fn buffers(&self) -> &Arc<dyn BufferStore>;

    /// Diagnostic verbosity; above zero enables per-parameter logging off the audio thread.
    fn verbosity(&self) -> i32 {
        0
    }

    fn register_unit(&self, name: &str, factory: UnitFactory) -> Result<()>;

    fn register_unit_command(&self, unit: &str, command: &str, handler: UnitCommand)
        -> Result<()>;

    fn register_plugin_command(&self, name: &str, handler: PluginCommand) -> Result<()>;

    /// Take ownership of an async command and schedule its stages.
    fn do_async_command(&self, command: AsyncCommand) -> Result<()>;

    /// Reply `path node reply_id values...` on behalf of a unit instance.
    fn send_node_reply(&self, node: NodeId, reply_id: i32, path: &str, values: &[f32]);
}
