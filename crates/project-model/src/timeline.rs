//! The resolved timeline handed to the renderer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::layer::{Clip, ClipKind};

/// Soundtrack resolved to cover an exact target duration.
///
/// Derived data: built once per timeline and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub path: PathBuf,
    /// Length of the source file.
    pub source_duration_secs: f64,
    /// Length the track was asked to cover.
    pub target_duration_secs: f64,
    pub looped: bool,
    /// Copies of the source concatenated before trimming (1 if not looped).
    pub repeats: u32,
    /// Gain multiplier applied uniformly.
    pub volume: f64,
    /// Final track length after looping and trimming.
    pub duration_secs: f64,
}

/// Ordered clips plus an optional soundtrack.
///
/// The total duration is maintained alongside the clip list and always
/// equals the sum of the clips' durations. A stored total is ignored on
/// deserialization and recomputed from the clips.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "TimelineDocument")]
pub struct Timeline {
    clips: Vec<Clip>,
    duration_secs: f64,
    audio: Option<AudioTrack>,
}

/// Serialized form of a [`Timeline`].
#[derive(Deserialize)]
struct TimelineDocument {
    clips: Vec<Clip>,
    #[serde(default, rename = "duration_secs")]
    _duration_secs: f64,
    #[serde(default)]
    audio: Option<AudioTrack>,
}

impl From<TimelineDocument> for Timeline {
    fn from(doc: TimelineDocument) -> Self {
        let mut timeline = Timeline::new();
        for clip in doc.clips {
            timeline.push_clip(clip);
        }
        timeline.with_audio(doc.audio)
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clip; the clip's duration is already fixed.
    pub fn push_clip(&mut self, clip: Clip) {
        self.duration_secs += clip.duration_secs;
        self.clips.push(clip);
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn audio(&self) -> Option<&AudioTrack> {
        self.audio.as_ref()
    }

    /// Attach the soundtrack once every clip is in place.
    pub fn with_audio(mut self, audio: Option<AudioTrack>) -> Self {
        self.audio = audio;
        self
    }

    /// Clip start offsets in timeline seconds, in clip order.
    pub fn clip_starts(&self) -> Vec<f64> {
        let mut start = 0.0;
        self.clips
            .iter()
            .map(|clip| {
                let at = start;
                start += clip.duration_secs;
                at
            })
            .collect()
    }

    /// Number of question clips.
    pub fn question_count(&self) -> usize {
        self.clips
            .iter()
            .filter(|c| matches!(c.kind, ClipKind::Question { .. }))
            .count()
    }

    /// Total number of layers over every clip.
    pub fn layer_count(&self) -> usize {
        self.clips.iter().map(|c| c.layers().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Size;

    fn clip(kind: ClipKind, duration: f64) -> Clip {
        Clip::new("c", kind, duration, Size::new(10.0, 10.0))
    }

    #[test]
    fn test_duration_tracks_sum_of_clips() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.duration_secs(), 0.0);

        timeline.push_clip(clip(ClipKind::Intro, 5.0));
        timeline.push_clip(clip(ClipKind::Question { index: 0 }, 8.0));
        timeline.push_clip(clip(ClipKind::End, 4.5));

        let sum: f64 = timeline.clips().iter().map(|c| c.duration_secs).sum();
        assert!((timeline.duration_secs() - sum).abs() < 1e-9);
        assert_eq!(timeline.clip_starts(), vec![0.0, 5.0, 13.0]);
        assert_eq!(timeline.question_count(), 1);
    }

    #[test]
    fn test_timeline_serialization_round_trip() {
        let mut timeline = Timeline::new();
        timeline.push_clip(clip(ClipKind::Question { index: 0 }, 8.0));
        let timeline = timeline.with_audio(Some(AudioTrack {
            path: PathBuf::from("music.mp3"),
            source_duration_secs: 7.0,
            target_duration_secs: 8.0,
            looped: true,
            repeats: 2,
            volume: 0.5,
            duration_secs: 8.0,
        }));

        let json = serde_json::to_string(&timeline).unwrap();
        let parsed: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, timeline);
    }

    #[test]
    fn test_deserialized_duration_is_recomputed() {
        let mut timeline = Timeline::new();
        timeline.push_clip(clip(ClipKind::Intro, 5.0));
        timeline.push_clip(clip(ClipKind::Question { index: 0 }, 8.0));

        let mut value = serde_json::to_value(&timeline).unwrap();
        value["duration_secs"] = serde_json::json!(999.0);
        let parsed: Timeline = serde_json::from_value(value).unwrap();
        assert!((parsed.duration_secs() - 13.0).abs() < 1e-9);
        assert_eq!(parsed, timeline);

        let mut value = serde_json::to_value(&timeline).unwrap();
        value.as_object_mut().unwrap().remove("duration_secs");
        let parsed: Timeline = serde_json::from_value(value).unwrap();
        assert!((parsed.duration_secs() - 13.0).abs() < 1e-9);
        assert!(parsed.audio().is_none());
    }
}
