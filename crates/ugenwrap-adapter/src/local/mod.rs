//! In-process reference host.
//!
//! Keeps unit and command registries, instantiates units, and runs async
//! commands on a dedicated worker thread. The real-time stages run whenever the
//! owner calls [`LocalHost::poll_rt`] (normally from its audio callback), or
//! from [`LocalHost::wait_idle`].
//!
//! # Example
//!
//! ```ignore
//! let host = LocalHost::builder().verbosity(1).build()?;
//! wrap::<BufStats>(host.handle(), "BufStats")?;
//!
//! host.send_command("BufStats", &[OscType::Int(0), OscType::Int(1)], None)?;
//! host.wait_idle(Duration::from_secs(1));
//! let reply = host.replies().try_recv()?; // /done BufStats
//! ```

mod scheduler;

use crate::error::{Result, WrapperError};
use crate::host::{
    AsyncCommand, Host, NodeId, PluginCommand, ReplyAddress, Unit, UnitCommand, UnitFactory,
    UnitSpec,
};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use rosc::{OscMessage, OscPacket, OscType};
use scheduler::{Scheduler, DEFAULT_QUEUE_CAPACITY};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use ugenwrap_core::{BufferStore, MemoryBufferStore};

const DEFAULT_BUFFER_COUNT: usize = 1024;
const FIRST_NODE_ID: NodeId = 1000;

/// A message the host sent back: a command reply or a node reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// `None` for node replies and commands launched without an address.
    pub to: Option<ReplyAddress>,
    pub message: OscMessage,
}

struct Shared {
    buffers: Arc<dyn BufferStore>,
    verbosity: i32,
    units: RwLock<HashMap<String, UnitFactory>>,
    unit_commands: RwLock<HashMap<(String, String), UnitCommand>>,
    plugin_commands: RwLock<HashMap<String, PluginCommand>>,
    scheduler: Arc<Scheduler>,
    replies: Sender<Reply>,
}

impl Shared {
    fn plugin_command(&self, name: &str) -> Result<PluginCommand> {
        self.plugin_commands
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| WrapperError::UnknownCommand(name.to_string()))
    }

    fn reply(&self, to: Option<ReplyAddress>, addr: &str, args: Vec<OscType>) {
        let _ = self.replies.send(Reply {
            to,
            message: OscMessage {
                addr: addr.to_string(),
                args,
            },
        });
    }

    fn perform_completion(&self, command: &AsyncCommand) {
        let Some(payload) = command.completion.as_deref() else {
            return;
        };
        match rosc::decoder::decode_udp(payload) {
            Ok((_, packet)) => self.perform_packet(packet, command.reply),
            Err(e) => {
                let err = WrapperError::CompletionDecode(format!("{:?}", e));
                tracing::error!(adapter = %command.name, "{}", err);
            }
        }
    }

    fn perform_packet(&self, packet: OscPacket, reply: Option<ReplyAddress>) {
        match packet {
            OscPacket::Message(message) => self.perform_message(message, reply),
            OscPacket::Bundle(bundle) => {
                for packet in bundle.content {
                    self.perform_packet(packet, reply);
                }
            }
        }
    }

    /// Completion messages understood here: `/cmd <name> args...`.
    fn perform_message(&self, message: OscMessage, reply: Option<ReplyAddress>) {
        if message.addr != "/cmd" {
            tracing::warn!(addr = %message.addr, "unsupported completion message");
            return;
        }
        let Some((OscType::String(name), args)) = message.args.split_first() else {
            tracing::warn!("completion /cmd without a command name");
            return;
        };
        let result = self
            .plugin_command(name)
            .and_then(|command| command(args, reply));
        if let Err(e) = result {
            tracing::error!(command = %name, "completion command failed: {}", e);
        }
    }

    fn finish(&self, command: &AsyncCommand) {
        match command.stages.failure() {
            None => self.reply(
                command.reply,
                "/done",
                vec![OscType::String(command.name.clone())],
            ),
            Some(message) => self.reply(
                command.reply,
                "/fail",
                vec![
                    OscType::String(command.name.clone()),
                    OscType::String(message.to_string()),
                ],
            ),
        }
    }

    fn clear(&self) {
        self.units.write().clear();
        self.unit_commands.write().clear();
        self.plugin_commands.write().clear();
    }
}

impl Host for Shared {
    fn buffers(&self) -> &Arc<dyn BufferStore> {
        &self.buffers
    }

    fn verbosity(&self) -> i32 {
        self.verbosity
    }

    fn register_unit(&self, name: &str, factory: UnitFactory) -> Result<()> {
        let mut units = self.units.write();
        if units.contains_key(name) {
            return Err(WrapperError::AlreadyRegistered {
                kind: "unit",
                name: name.to_string(),
            });
        }
        units.insert(name.to_string(), factory);
        tracing::info!(unit = %name, "registered unit");
        Ok(())
    }

    fn register_unit_command(
        &self,
        unit: &str,
        command: &str,
        handler: UnitCommand,
    ) -> Result<()> {
        let key = (unit.to_string(), command.to_string());
        let mut commands = self.unit_commands.write();
        if commands.contains_key(&key) {
            return Err(WrapperError::AlreadyRegistered {
                kind: "unit command",
                name: format!("{}/{}", unit, command),
            });
        }
        commands.insert(key, handler);
        Ok(())
    }

    fn register_plugin_command(&self, name: &str, handler: PluginCommand) -> Result<()> {
        let mut commands = self.plugin_commands.write();
        if commands.contains_key(name) {
            return Err(WrapperError::AlreadyRegistered {
                kind: "plugin command",
                name: name.to_string(),
            });
        }
        commands.insert(name.to_string(), handler);
        tracing::info!(command = %name, "registered plugin command");
        Ok(())
    }

    fn do_async_command(&self, command: AsyncCommand) -> Result<()> {
        let name = command.name.clone();
        self.scheduler.submit(command).inspect_err(|e| {
            tracing::warn!(adapter = %name, "{}", e);
        })
    }

    fn send_node_reply(&self, node: NodeId, reply_id: i32, path: &str, values: &[f32]) {
        let args = [OscType::Int(node), OscType::Int(reply_id)]
            .into_iter()
            .chain(values.iter().map(|v| OscType::Float(*v)))
            .collect();
        self.reply(None, path, args);
    }
}

/// Instantiated unit, addressed by its node id.
pub struct UnitInstance {
    node: NodeId,
    name: String,
    unit: Box<dyn Unit>,
}

impl UnitInstance {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next(&mut self, frames: usize, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) {
        self.unit.next(frames, inputs, outputs);
    }

    pub fn unit_mut(&mut self) -> &mut dyn Unit {
        self.unit.as_mut()
    }

    /// Concrete unit, e.g. `RealTime<MyClient>`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.unit.as_any_mut().downcast_mut::<T>()
    }
}

impl std::fmt::Debug for UnitInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitInstance")
            .field("node", &self.node)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Builder for [`LocalHost`].
pub struct LocalHostBuilder {
    verbosity: i32,
    buffers: Option<Arc<dyn BufferStore>>,
    queue_capacity: usize,
}

impl Default for LocalHostBuilder {
    fn default() -> Self {
        Self {
            verbosity: 0,
            buffers: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl LocalHostBuilder {
    pub fn verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Buffer store shared with the host's owner. Defaults to a
    /// [`MemoryBufferStore`] with 1024 slots.
    pub fn buffers(mut self, buffers: Arc<dyn BufferStore>) -> Self {
        self.buffers = Some(buffers);
        self
    }

    /// Maximum number of async commands in flight.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<LocalHost> {
        if self.queue_capacity == 0 {
            return Err(WrapperError::InvalidConfig(
                "queue capacity must be at least 1".into(),
            ));
        }

        let scheduler = Arc::new(Scheduler::new(self.queue_capacity));
        let worker = scheduler.spawn_worker()?;
        let (sender, receiver) = crossbeam_channel::unbounded();

        let shared = Arc::new(Shared {
            buffers: self
                .buffers
                .unwrap_or_else(|| MemoryBufferStore::shared(DEFAULT_BUFFER_COUNT)),
            verbosity: self.verbosity,
            units: RwLock::new(HashMap::new()),
            unit_commands: RwLock::new(HashMap::new()),
            plugin_commands: RwLock::new(HashMap::new()),
            scheduler,
            replies: sender,
        });

        Ok(LocalHost {
            shared,
            replies: receiver,
            next_node: AtomicI32::new(FIRST_NODE_ID),
            worker: Some(worker),
        })
    }
}

/// In-process host. Dropping it stops the worker thread and destroys any
/// command still in flight.
pub struct LocalHost {
    shared: Arc<Shared>,
    replies: Receiver<Reply>,
    next_node: AtomicI32,
    worker: Option<thread::JoinHandle<()>>,
}

impl LocalHost {
    pub fn builder() -> LocalHostBuilder {
        LocalHostBuilder::default()
    }

    /// Registration handle for adapters.
    pub fn handle(&self) -> Arc<dyn Host> {
        self.shared.clone()
    }

    pub fn buffers(&self) -> &Arc<dyn BufferStore> {
        &self.shared.buffers
    }

    pub fn has_unit(&self, name: &str) -> bool {
        self.shared.units.read().contains_key(name)
    }

    pub fn has_plugin_command(&self, name: &str) -> bool {
        self.shared.plugin_commands.read().contains_key(name)
    }

    /// Create a unit instance with a fresh node id.
    pub fn instantiate(&self, name: &str, spec: &UnitSpec) -> Result<UnitInstance> {
        let unit = {
            let units = self.shared.units.read();
            let factory = units
                .get(name)
                .ok_or_else(|| WrapperError::UnknownUnit(name.to_string()))?;
            factory(spec)
        };
        let node = self.next_node.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(unit = %name, node, "instantiated unit");
        Ok(UnitInstance {
            node,
            name: name.to_string(),
            unit,
        })
    }

    /// Run a unit command against an instance.
    pub fn unit_command(
        &self,
        instance: &mut UnitInstance,
        command: &str,
        args: &[OscType],
    ) -> Result<()> {
        let handler = self
            .shared
            .unit_commands
            .read()
            .get(&(instance.name.clone(), command.to_string()))
            .cloned()
            .ok_or_else(|| WrapperError::UnknownCommand(format!("{}/{}", instance.name, command)))?;
        handler(instance.unit.as_mut(), instance.node, args);
        Ok(())
    }

    /// Run a plugin command, e.g. launch a batch job.
    pub fn send_command(
        &self,
        name: &str,
        args: &[OscType],
        reply: Option<ReplyAddress>,
    ) -> Result<()> {
        let command = self.shared.plugin_command(name)?;
        command(args, reply)
    }

    /// Run pending real-time stages. Returns the number of commands completed.
    pub fn poll_rt(&self) -> usize {
        let shared = &self.shared;
        shared.scheduler.run_rt_stages(
            |command| shared.perform_completion(command),
            |command| shared.finish(command),
        )
    }

    /// Poll until no command is in flight. Returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.poll_rt();
            if self.in_flight() == 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_micros(100));
        }
    }

    pub fn in_flight(&self) -> usize {
        self.shared.scheduler.in_flight()
    }

    /// Command and node replies, in send order.
    pub fn replies(&self) -> &Receiver<Reply> {
        &self.replies
    }

    pub fn shutdown(&mut self) {
        self.shared.scheduler.stop();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        let dropped = self.shared.scheduler.drain();
        if dropped > 0 {
            tracing::warn!(dropped, "destroyed unfinished async commands");
        }
        // Registered handlers hold the host handle.
        self.shared.clear();
    }
}

impl Drop for LocalHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for LocalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalHost")
            .field("verbosity", &self.shared.verbosity)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}
