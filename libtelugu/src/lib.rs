//! libtelugu crate root
//!
//! The Telugu language profile for `liblipi-core`: an ITRANS-style
//! transliterator, the Telugu font catalogue and an online suggestion
//! service, plus a configuration type that extends the core `Config`.
//!
//! Public API exported here:
//! - `TeluguProfile` from `profile`
//! - `TeluguConfig` from `config`
//! - `CloudSuggestions` and `CloudProvider` from `cloud`
//! - `transliterate` from `itrans`

pub mod cloud;
pub mod config;
pub mod itrans;
pub mod profile;

// Re-export the editing core so hosts need a single dependency.
pub use liblipi_core::{
    Alignment, Clipboard, Config, DocumentSurface, EditorContext, ExportSnapshot, Format, HostCommand, KeyEvent,
    KeyResult, LanguageProfile, ListKind, MemoryClipboard, Selection, TypewriterEngine,
};

pub use cloud::{CloudProvider, CloudSuggestions};
pub use config::TeluguConfig;
pub use itrans::transliterate;
pub use profile::{TeluguProfile, TELUGU_FONTS};

use std::sync::Arc;

/// Engine over a [`DocumentSurface`] configured from `config`, with the
/// online service attached when `cloud_enabled` is set.
pub fn telugu_engine(config: TeluguConfig) -> TypewriterEngine<TeluguProfile> {
    let profile = Arc::new(TeluguProfile::from_config(&config));
    TypewriterEngine::new(profile, config.into_base())
}
