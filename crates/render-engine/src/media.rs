//! Filesystem-backed media resolution.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use quizreel_composer::media::{AudioInfo, ImageInfo, MediaLookup, MediaResolver};

use crate::probe::{command_exists, probe_media_duration};

/// Resolves media on the local filesystem.
///
/// Image sizes are read from file headers with the `image` crate; audio
/// durations come from `ffprobe`. Each probe opens and closes its own
/// handle, and a failed probe is reported as `Missing`.
#[derive(Debug)]
pub struct FsMediaResolver {
    ffprobe_available: bool,
    warned_no_ffprobe: AtomicBool,
}

impl FsMediaResolver {
    pub fn new() -> Self {
        Self::with_ffprobe(command_exists("ffprobe"))
    }

    pub fn with_ffprobe(available: bool) -> Self {
        Self {
            ffprobe_available: available,
            warned_no_ffprobe: AtomicBool::new(false),
        }
    }
}

impl Default for FsMediaResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaResolver for FsMediaResolver {
    fn probe_image(&self, path: &Path) -> MediaLookup<ImageInfo> {
        if !path.is_file() {
            return MediaLookup::Missing;
        }
        match image::image_dimensions(path) {
            Ok((width, height)) if width > 0 && height > 0 => MediaLookup::Found(ImageInfo {
                path: path.to_path_buf(),
                width,
                height,
            }),
            Ok(_) => {
                tracing::warn!(path = %path.display(), "Image has zero size");
                MediaLookup::Missing
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
                MediaLookup::Missing
            }
        }
    }

    fn probe_audio(&self, path: &Path) -> MediaLookup<AudioInfo> {
        if !path.is_file() {
            return MediaLookup::Missing;
        }
        if !self.ffprobe_available {
            if !self.warned_no_ffprobe.swap(true, Ordering::Relaxed) {
                tracing::warn!("ffprobe not found in PATH, audio files cannot be decoded");
            }
            return MediaLookup::Missing;
        }
        match probe_media_duration(path) {
            Some(duration_secs) => MediaLookup::Found(AudioInfo {
                path: path.to_path_buf(),
                duration_secs,
            }),
            None => {
                tracing::warn!(path = %path.display(), "Failed to decode audio duration");
                MediaLookup::Missing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("quizreel_media_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_probe_image_reads_dimensions() {
        let dir = temp_dir("image");
        let path = dir.join("bg.png");
        ImageBuffer::from_pixel(64, 36, Rgb([10u8, 20, 30]))
            .save(&path)
            .unwrap();

        let resolver = FsMediaResolver::with_ffprobe(false);
        let info = resolver.probe_image(&path).found().unwrap();
        assert_eq!((info.width, info.height), (64, 36));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unreadable_image_is_missing() {
        let dir = temp_dir("bad_image");
        let path = dir.join("bg.png");
        std::fs::write(&path, b"not an image").unwrap();

        let resolver = FsMediaResolver::with_ffprobe(false);
        assert_eq!(resolver.probe_image(&path), MediaLookup::Missing);
        assert_eq!(
            resolver.probe_image(&dir.join("absent.png")),
            MediaLookup::Missing
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_audio_without_ffprobe_is_missing() {
        let dir = temp_dir("audio");
        let path = dir.join("music.mp3");
        std::fs::write(&path, b"ID3").unwrap();

        let resolver = FsMediaResolver::with_ffprobe(false);
        assert_eq!(resolver.probe_audio(&path), MediaLookup::Missing);
        assert_eq!(resolver.probe_audio(&path), MediaLookup::Missing);

        let _ = std::fs::remove_dir_all(dir);
    }
}
