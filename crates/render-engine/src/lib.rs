//! QuizReel Render Engine
//!
//! The collaborator side of the composer: it resolves media on the real
//! filesystem and hands built timelines to a renderer.
//!
//! # Pipeline Architecture
//!
//! ```text
//! settings.json ──┐
//!                 ├── LoadedProject ── TimelineBuilder ── Timeline
//! media files ────┘   (FsMediaResolver)                     │
//!                                                           ▼
//!                                               ManifestBackend
//!                                                  │        │
//!                                         timeline.json   masks/*.png
//! ```

pub mod export;
pub mod manifest;
pub mod media;
pub mod probe;

pub use export::*;
pub use manifest::{ManifestBackend, MaskAsset, TimelineManifest};
pub use media::FsMediaResolver;
pub use probe::command_exists;
