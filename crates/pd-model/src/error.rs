//! Error types for model queries and model authoring.

use pd_core::error::CoreError;
use pd_core::{CompId, PortId};
use thiserror::Error;

/// Errors raised by the piping model contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Unknown component: {comp}")]
    UnknownComponent { comp: CompId },

    #[error("Unknown port: {port}")]
    UnknownPort { port: PortId },

    #[error("Port {port} belongs to component {owner}, not {comp}")]
    ForeignPort {
        port: PortId,
        owner: CompId,
        comp: CompId,
    },

    #[error("Port {port} is already connected to {other}")]
    AlreadyConnected { port: PortId, other: PortId },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<CoreError> for ModelError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => ModelError::NonPhysical { what },
            CoreError::InvalidArg { what } => ModelError::InvalidArg { what },
            CoreError::IndexOob { what, .. } => ModelError::InvalidArg { what },
            CoreError::DegeneratePlane { what } => ModelError::InvalidArg { what },
            CoreError::Invariant { what } => ModelError::InvalidArg { what },
        }
    }
}
