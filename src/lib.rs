// src/lib.rs

pub mod bridge;
pub mod config;
pub mod core;
pub mod error;

pub use crate::config::SessionConfig;
pub use crate::core::alphabet::Alphabet;
pub use crate::core::engine::{Conversion, ConversionOutcome, ConversionSession, SessionEvent};
pub use crate::core::resolver::{AssetProvider, FsAssetProvider};
pub use crate::core::types::{CellOutcome, FormatTag, GlyphCell, SessionCounters, WordResult};
pub use crate::error::{AssetError, BridgeError, ConfigError, ConversionError};
