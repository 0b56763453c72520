//! Soundtrack loop/trim arithmetic.

use std::path::{Path, PathBuf};

use quizreel_project_model::project::ProjectPaths;
use quizreel_project_model::settings::Settings;
use quizreel_project_model::timeline::AudioTrack;

use crate::media::{first_audio, MediaLookup, MediaResolver};

/// Fit a source of `source_secs` to `target_secs`.
///
/// Looping concatenates `ceil(target / source)` copies and trims to the
/// target exactly. Without looping the track is never extended:
/// its length is `min(source, target)`.
pub fn build_audio_track(
    path: impl Into<PathBuf>,
    source_secs: f64,
    target_secs: f64,
    looped: bool,
    volume: Option<f64>,
) -> AudioTrack {
    let target_secs = target_secs.max(0.0);
    let (repeats, duration_secs) = if looped {
        let repeats = (target_secs / source_secs).ceil().max(1.0) as u32;
        (repeats, target_secs)
    } else {
        (1, source_secs.min(target_secs))
    };

    AudioTrack {
        path: path.into(),
        source_duration_secs: source_secs,
        target_duration_secs: target_secs,
        looped,
        repeats,
        volume: volume.unwrap_or(1.0),
        duration_secs,
    }
}

/// Resolve the configured soundtrack and fit it to `target_secs`.
///
/// A missing file or an unusable duration means no soundtrack; both
/// are logged and never fail the build.
pub fn resolve_audio_track(
    settings: &Settings,
    resolver: &dyn MediaResolver,
    paths: &ProjectPaths,
    target_secs: f64,
) -> Option<AudioTrack> {
    let file = settings.audio.file.as_deref()?;
    if file.as_os_str().is_empty() {
        return None;
    }

    let info = match first_audio(resolver, &paths.in_project(file)) {
        MediaLookup::Found(info) => info,
        MediaLookup::Missing => {
            tracing::warn!(path = %file.display(), "Audio file not found, continuing without audio");
            return None;
        }
    };

    if !usable_duration(info.duration_secs) {
        warn_undecodable(&info.path, info.duration_secs);
        return None;
    }

    let track = build_audio_track(
        info.path,
        info.duration_secs,
        target_secs,
        settings.audio.looped,
        settings.audio.volume,
    );
    tracing::info!(
        path = %track.path.display(),
        repeats = track.repeats,
        duration = track.duration_secs,
        "Soundtrack resolved"
    );
    Some(track)
}

fn usable_duration(secs: f64) -> bool {
    secs.is_finite() && secs > 0.0
}

fn warn_undecodable(path: &Path, duration: f64) {
    tracing::warn!(
        path = %path.display(),
        duration,
        "Audio file has no usable duration, continuing without audio"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MemoryMediaResolver;
    use proptest::prelude::*;

    #[test]
    fn test_loop_seven_into_twenty() {
        let track = build_audio_track("music.mp3", 7.0, 20.0, true, Some(1.0));
        assert_eq!(track.repeats, 3);
        assert!((track.duration_secs - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_loop_never_extends() {
        let short = build_audio_track("a.mp3", 7.0, 20.0, false, None);
        assert!((short.duration_secs - 7.0).abs() < 1e-9);
        assert_eq!(short.repeats, 1);
        assert!((short.volume - 1.0).abs() < 1e-9);

        let long = build_audio_track("a.mp3", 60.0, 20.0, false, None);
        assert!((long.duration_secs - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_multiple_needs_no_extra_copy() {
        let track = build_audio_track("a.mp3", 5.0, 20.0, true, None);
        assert_eq!(track.repeats, 4);
    }

    #[test]
    fn test_resolve_missing_file_is_silent() {
        let mut settings = Settings::default();
        settings.audio.file = Some(PathBuf::from("music.mp3"));
        let paths = ProjectPaths::new("/p", "/r");

        let track = resolve_audio_track(&settings, &MemoryMediaResolver::new(), &paths, 30.0);
        assert!(track.is_none());
    }

    #[test]
    fn test_resolve_zero_duration_is_undecodable() {
        let mut settings = Settings::default();
        settings.audio.file = Some(PathBuf::from("music.mp3"));
        let paths = ProjectPaths::new("/p", "/r");
        let resolver = MemoryMediaResolver::new().with_audio("/p/music.mp3", 0.0);

        assert!(resolve_audio_track(&settings, &resolver, &paths, 30.0).is_none());
    }

    #[test]
    fn test_resolve_uses_project_dir_and_volume() {
        let mut settings = Settings::default();
        settings.audio.file = Some(PathBuf::from("music.mp3"));
        settings.audio.volume = Some(0.3);
        let paths = ProjectPaths::new("/p", "/r");
        let resolver = MemoryMediaResolver::new()
            .with_audio("/p/music.mp3", 7.0)
            .with_audio("/r/music.mp3", 100.0);

        let track = resolve_audio_track(&settings, &resolver, &paths, 20.0).unwrap();
        assert_eq!(track.path, PathBuf::from("/p/music.mp3"));
        assert_eq!(track.repeats, 3);
        assert!((track.volume - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_no_file_configured() {
        let settings = Settings::default();
        let paths = ProjectPaths::new("/p", "/r");
        assert!(resolve_audio_track(&settings, &MemoryMediaResolver::new(), &paths, 10.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_looped_track_is_exact(source in 0.1f64..120.0, target in 0.0f64..3600.0) {
            let track = build_audio_track("a.mp3", source, target, true, None);
            prop_assert_eq!(track.duration_secs, target);
            let covered = track.repeats as f64 * source;
            prop_assert!(covered + 1e-9 >= target);
            prop_assert!(track.repeats == 1 || (track.repeats - 1) as f64 * source < target + 1e-9);
        }

        #[test]
        fn prop_unlooped_track_never_exceeds_either(source in 0.1f64..120.0, target in 0.0f64..3600.0) {
            let track = build_audio_track("a.mp3", source, target, false, None);
            prop_assert!(track.duration_secs <= source);
            prop_assert!(track.duration_secs <= target);
        }
    }
}
