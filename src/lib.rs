//! TrueNotion library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod transport;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which transport carries a turn to the assistant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The TrueNotion `/chat` HTTP endpoint.
    #[default]
    Http,
    /// Offline echo, streamed word by word.
    Echo,
}
