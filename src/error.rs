//! Centralized error type for the ugenwrap umbrella crate.
//!
//! Wraps the subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ugenwrap_core::Error),

    #[error(transparent)]
    Adapter(#[from] ugenwrap_adapter::WrapperError),
}

pub type Result<T> = std::result::Result<T, Error>;
