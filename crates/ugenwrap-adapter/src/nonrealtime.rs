//! Non-real-time engine: runs a batch client as an asynchronous host command.
//!
//! Launch → process (worker) → exchange (RT) → tidy-up (worker) → destroy.
//! Each launch owns its own context; concurrent commands share nothing.

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::host::{AsyncCommand, AsyncStages, ReplyAddress};
use rosc::OscType;
use std::sync::Arc;
use ugenwrap_core::{Error, ExtractContext, MessageSource, NonRealTimeClient, ParamSet};

/// Context of one in-flight command: its parameters, its client and how it went.
pub struct NonRealTime<C: NonRealTimeClient> {
    config: Arc<AdapterConfig>,
    params: ParamSet,
    client: C,
    failure: Option<String>,
}

impl<C: NonRealTimeClient> NonRealTime<C> {
    /// Register the adapter name as a plugin command that launches a batch job.
    pub fn setup(config: &Arc<AdapterConfig>) -> Result<()> {
        let command_config = Arc::clone(config);
        config.host().register_plugin_command(
            config.name(),
            Arc::new(move |args: &[OscType], reply: Option<ReplyAddress>| {
                Self::launch(&command_config, args, reply)
            }),
        )?;

        tracing::debug!(adapter = %config.name(), "registered non-real-time command");
        Ok(())
    }

    /// Validate `args`, build the client and hand the command to the host.
    ///
    /// Nothing is constructed when the argument count is wrong or a parameter
    /// fails its constraints.
    pub fn launch(
        config: &Arc<AdapterConfig>,
        args: &[OscType],
        reply: Option<ReplyAddress>,
    ) -> Result<()> {
        let context = match Self::prepare(config, args) {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(adapter = %config.name(), "{}", e);
                return Err(e.into());
            }
        };

        let descriptors = C::descriptors();
        let (_, completion) = MessageSource::from_command(args, descriptors.token_arity());

        config.host().do_async_command(AsyncCommand {
            name: config.name().to_string(),
            reply,
            stages: Box::new(context),
            completion: completion.map(<[u8]>::to_vec),
        })
    }

    fn prepare(config: &Arc<AdapterConfig>, args: &[OscType]) -> ugenwrap_core::Result<Self> {
        let descriptors = C::descriptors();
        let (mut source, _) = MessageSource::from_command(args, descriptors.token_arity());

        let mut params = ParamSet::new(descriptors);
        let cx = ExtractContext::new(config.host().buffers()).verbose(config.verbose());
        params.set_values(&mut source, &cx)?;
        params.validate()?;

        Ok(Self {
            config: Arc::clone(config),
            client: C::new(&params),
            params,
            failure: None,
        })
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: NonRealTimeClient> AsyncStages for NonRealTime<C> {
    fn process(&mut self) -> bool {
        match self.client.process_batch(&self.params) {
            Ok(()) => true,
            Err(e) => {
                let message = match e {
                    Error::Processing(message) => message,
                    other => other.to_string(),
                };
                tracing::error!(adapter = %self.config.name(), "{}", message);
                self.failure = Some(message);
                false
            }
        }
    }

    /// Publish written buffers to the audio thread. Commits nothing after a failure.
    fn exchange(&mut self) -> bool {
        if self.failure.is_some() {
            return false;
        }
        for buffer in self.params.buffers() {
            buffer.assign_to_rt();
        }
        true
    }

    fn tidy_up(&mut self) -> bool {
        for buffer in self.params.buffers() {
            buffer.release();
        }
        true
    }

    fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}
