//! QuizReel Project Model
//!
//! Defines the core data contracts for quiz videos:
//! - **Settings:** The layered configuration cascade (global, project, per-clip)
//!   resolved into one immutable [`Settings`] value
//! - **Questions:** The question/answer list and optional intro/end bookend documents
//! - **Layers:** Positioned, timed layer descriptors grouped into clips
//! - **Timeline:** The ordered clip sequence plus an optional audio track
//!
//! Pixel coordinates are absolute in canvas space, with a `Centered`
//! sentinel left for the renderer to resolve.

pub mod bookend;
pub mod layer;
pub mod position;
pub mod project;
pub mod question;
pub mod settings;
pub mod timeline;

pub use bookend::*;
pub use layer::*;
pub use position::*;
pub use project::*;
pub use question::*;
pub use settings::*;
pub use timeline::*;
