//! Adapter facade: one registered client kind.

use crate::config::AdapterConfig;
use crate::dispatch::{Capability, Dispatch, WrappedClient};
use crate::error::Result;
use crate::host::Host;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Adapter {
    config: Arc<AdapterConfig>,
    dispatch: Dispatch,
}

impl Adapter {
    pub fn new<C: WrappedClient>(config: AdapterConfig) -> Self {
        Self::with_dispatch(config, C::dispatch())
    }

    pub fn with_dispatch(config: AdapterConfig, dispatch: Dispatch) -> Self {
        Self {
            config: Arc::new(config),
            dispatch,
        }
    }

    /// Register with the host.
    pub fn setup(&self) -> Result<()> {
        self.dispatch.setup(&self.config)?;
        tracing::info!(
            adapter = %self.config.name(),
            capability = ?self.dispatch.capability(),
            "adapter registered"
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn capability(&self) -> Capability {
        self.dispatch.capability()
    }

    pub fn config(&self) -> &Arc<AdapterConfig> {
        &self.config
    }
}

/// Validate `name`, then register `C` with `host` under it.
pub fn wrap<C: WrappedClient>(host: Arc<dyn Host>, name: &str) -> Result<Adapter> {
    let adapter = Adapter::new::<C>(AdapterConfig::new(name, host)?);
    adapter.setup()?;
    Ok(adapter)
}
