//! QuizReel Composer: the timeline composition engine
//!
//! Turns resolved settings, a question list and optional bookend
//! documents into an ordered [`Timeline`] of positioned, timed layers:
//! - **Geometry:** Symbolic positions to canvas coordinates
//! - **Text:** Greedy word wrap, measured text boxes, shadow and outline layers
//! - **Timer:** One countdown tick layer per second with circle/square masks
//! - **Media layers:** Resize, position, fade and start offset for bookend media
//! - **Clips:** Question/answer clips and intro/end bookends
//! - **Audio:** Loop/trim arithmetic for the soundtrack
//! - **Preview:** Count- or duration-bounded question truncation
//!
//! This crate does no I/O of its own. Every read of the backing store
//! goes through the [`MediaResolver`] trait, so all builders are plain
//! synchronous computation over owned inputs.
//!
//! [`Timeline`]: quizreel_project_model::Timeline

pub mod audio;
pub mod bookend;
pub mod geometry;
pub mod media;
pub mod media_layer;
pub mod preview;
pub mod question_clip;
pub mod text;
pub mod timeline;
pub mod timer;

pub use audio::{build_audio_track, resolve_audio_track};
pub use bookend::BookendAssembler;
pub use geometry::{resolve_axis, resolve_position};
pub use media::{
    first_audio, first_image, validate_media, AudioInfo, ImageInfo, MediaLookup, MediaResolver,
    MemoryMediaResolver, ProjectContext,
};
pub use media_layer::{apply_timing, background_layer, process_layer, RawContent, RawLayer};
pub use preview::truncate_questions;
pub use question_clip::QuestionClipAssembler;
pub use text::{wrap_text, TextLayerBuilder, TextLayers, TextRole, TextStyle};
pub use timeline::TimelineBuilder;
pub use timer::{countdown_numeral, shape_mask, TimerSequencer};
