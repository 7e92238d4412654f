//! Adapter identity.

use crate::error::{Result, WrapperError};
use crate::host::Host;
use std::fmt;
use std::sync::Arc;

/// Name and host of one wrapped client kind, built once at registration and
/// shared by its engines.
#[derive(Clone)]
pub struct AdapterConfig {
    name: String,
    host: Arc<dyn Host>,
    latency_path: String,
}

impl AdapterConfig {
    /// Build and validate.
    pub fn new(name: impl Into<String>, host: Arc<dyn Host>) -> Result<Self> {
        let name = name.into();
        let config = Self {
            latency_path: format!("/{}_latency", name),
            name,
            host,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(WrapperError::InvalidConfig("adapter name is empty".into()));
        }
        if let Some(c) = self
            .name
            .chars()
            .find(|c| c.is_whitespace() || *c == '/')
        {
            return Err(WrapperError::InvalidConfig(format!(
                "adapter name {:?} contains {:?}",
                self.name, c
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Reply path of the latency query. Built once, read on the audio thread.
    #[inline]
    pub fn latency_reply_path(&self) -> &str {
        &self.latency_path
    }

    pub(crate) fn verbose(&self) -> bool {
        self.host.verbosity() > 0
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
