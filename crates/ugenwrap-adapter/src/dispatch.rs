//! Capability dispatch: which engine(s) a client kind is registered with.

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::nonrealtime::NonRealTime;
use crate::realtime::RealTime;
use std::sync::Arc;
use ugenwrap_core::{Client, NonRealTimeClient, RealTimeClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RealTime,
    NonRealTime,
    Both,
}

/// Engine registration entry point.
pub type SetupFn = fn(&Arc<AdapterConfig>) -> Result<()>;

/// Monomorphized setup paths for one client kind.
///
/// The constructors only accept clients implementing the matching traits, so a
/// batch-only client can never be registered as a unit.
#[derive(Clone, Copy)]
pub enum Dispatch {
    RealTime(SetupFn),
    NonRealTime(SetupFn),
    Both {
        real_time: SetupFn,
        non_real_time: SetupFn,
    },
}

impl Dispatch {
    pub fn real_time<C: RealTimeClient>() -> Self {
        Dispatch::RealTime(RealTime::<C>::setup)
    }

    pub fn non_real_time<C: NonRealTimeClient>() -> Self {
        Dispatch::NonRealTime(NonRealTime::<C>::setup)
    }

    pub fn both<C: RealTimeClient + NonRealTimeClient>() -> Self {
        Dispatch::Both {
            real_time: RealTime::<C>::setup,
            non_real_time: NonRealTime::<C>::setup,
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Dispatch::RealTime(_) => Capability::RealTime,
            Dispatch::NonRealTime(_) => Capability::NonRealTime,
            Dispatch::Both { .. } => Capability::Both,
        }
    }

    /// Run the present engines' setup, real-time first.
    pub fn setup(&self, config: &Arc<AdapterConfig>) -> Result<()> {
        match *self {
            Dispatch::RealTime(setup) | Dispatch::NonRealTime(setup) => setup(config),
            Dispatch::Both {
                real_time,
                non_real_time,
            } => {
                real_time(config)?;
                non_real_time(config)
            }
        }
    }
}

impl std::fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Dispatch").field(&self.capability()).finish()
    }
}

/// A client kind that knows its own capability.
///
/// ```ignore
/// impl WrappedClient for BufStats {
///     fn dispatch() -> Dispatch {
///         Dispatch::non_real_time::<Self>()
///     }
/// }
/// ```
pub trait WrappedClient: Client {
    fn dispatch() -> Dispatch;
}
