#![warn(missing_docs)]
//! fsoptics specific error structures
use std::{error::Error, fmt::Display};

/// fsoptics specific Result type
pub type FsoResult<T> = std::result::Result<T, FsoError>;

/// Errors that can be returned by the beam, film and plotting functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsoError {
    /// malformed or out-of-domain construction or evaluation arguments
    InvalidParameter(String),
    /// a kind selector outside of the supported (closed) set of beam kinds
    UnsupportedKind(String),
    /// non-finite intermediate or final results of a computation
    NumericalInstability(String),
    /// errors while rendering a plot
    Plot(String),
    /// errors on the command line or while reading scenario files
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for FsoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameter(m) => {
                write!(f, "InvalidParameter:{m}")
            }
            Self::UnsupportedKind(m) => {
                write!(f, "UnsupportedKind:{m}")
            }
            Self::NumericalInstability(m) => {
                write!(f, "NumericalInstability:{m}")
            }
            Self::Plot(m) => {
                write!(f, "Plot:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "fsoptics Error:Other:{m}"),
        }
    }
}
impl Error for FsoError {}

impl std::convert::From<String> for FsoError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
