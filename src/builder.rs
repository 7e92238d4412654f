//! Registration of several client kinds against one host.

use crate::Result;
use std::sync::Arc;
use ugenwrap_adapter::{Adapter, Capability, Host, WrappedClient};

/// Registers client kinds with a host, one adapter per name.
///
/// A plugin library typically exposes many clients through a single entry point:
///
/// ```ignore
/// use ugenwrap::prelude::*;
///
/// let loader = PluginLoader::new(host.handle())
///     .wrap::<Loudness>("Loudness")?
///     .wrap::<BufStats>("BufStats")?;
///
/// for adapter in loader.registered() {
///     println!("{} ({:?})", adapter.name(), adapter.capability());
/// }
/// ```
pub struct PluginLoader {
    host: Arc<dyn Host>,
    adapters: Vec<Adapter>,
}

impl PluginLoader {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            adapters: Vec::new(),
        }
    }

    /// Validate `name` and register `C` under it.
    pub fn wrap<C: WrappedClient>(mut self, name: &str) -> Result<Self> {
        let adapter = ugenwrap_adapter::wrap::<C>(Arc::clone(&self.host), name)?;
        self.adapters.push(adapter);
        Ok(self)
    }

    /// Adapters registered so far, in registration order.
    pub fn registered(&self) -> &[Adapter] {
        &self.adapters
    }

    pub fn get(&self, name: &str) -> Option<&Adapter> {
        self.adapters.iter().find(|a| a.name() == name)
    }

    /// Names of the registered adapters with the given capability.
    pub fn with_capability(&self, capability: Capability) -> impl Iterator<Item = &str> + '_ {
        self.adapters
            .iter()
            .filter(move |a| a.capability() == capability)
            .map(Adapter::name)
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("adapters", &self.adapters)
            .finish_non_exhaustive()
    }
}
