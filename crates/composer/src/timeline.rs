//! Whole-timeline assembly: intro, question clips, end, soundtrack.

use quizreel_common::error::QuizResult;
use quizreel_project_model::bookend::BookendKind;
use quizreel_project_model::project::LoadedProject;
use quizreel_project_model::question::Question;
use quizreel_project_model::settings::Settings;
use quizreel_project_model::timeline::Timeline;

use crate::audio::resolve_audio_track;
use crate::bookend::BookendAssembler;
use crate::media::{MediaResolver, ProjectContext};
use crate::preview::truncate_questions;
use crate::question_clip::QuestionClipAssembler;

/// Builds one [`Timeline`] from resolved settings and a question list.
pub struct TimelineBuilder<'a> {
    settings: &'a Settings,
    resolver: &'a dyn MediaResolver,
    ctx: ProjectContext<'a>,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(
        settings: &'a Settings,
        resolver: &'a dyn MediaResolver,
        ctx: ProjectContext<'a>,
    ) -> Self {
        Self {
            settings,
            resolver,
            ctx,
        }
    }

    /// Builder over a loaded project's settings and bookends.
    pub fn for_project(project: &'a LoadedProject, resolver: &'a dyn MediaResolver) -> Self {
        Self::new(&project.settings, resolver, ProjectContext::from_project(project))
    }

    /// Build the timeline.
    ///
    /// Bookends are built first so preview truncation can budget for
    /// their real durations. The soundtrack is fitted to the final
    /// duration.
    pub fn build(&self, questions: &[Question]) -> QuizResult<Timeline> {
        let bookends = BookendAssembler::new(self.settings, self.resolver, self.ctx);
        let intro = bookends.assemble(BookendKind::Intro)?;
        let end = bookends.assemble(BookendKind::End)?;

        let preview = &self.settings.preview_mode;
        let questions = if preview.enabled {
            let kept = truncate_questions(
                questions,
                preview.mode,
                preview.limit,
                intro.as_ref().map_or(0.0, |c| c.duration_secs),
                end.as_ref().map_or(0.0, |c| c.duration_secs),
                self.settings.timing.clip_duration(),
            );
            tracing::info!(
                mode = ?preview.mode,
                limit = preview.limit,
                kept = kept.len(),
                total = questions.len(),
                "Preview mode truncated questions"
            );
            kept
        } else {
            questions
        };

        let assembler = QuestionClipAssembler::new(self.settings, self.resolver, self.ctx.paths);
        let mut timeline = Timeline::new();

        if let Some(intro) = intro {
            timeline.push_clip(intro);
        }
        for (index, question) in questions.iter().enumerate() {
            timeline.push_clip(assembler.assemble(index, question)?);
        }
        if let Some(end) = end {
            timeline.push_clip(end);
        }

        let audio = resolve_audio_track(
            self.settings,
            self.resolver,
            self.ctx.paths,
            timeline.duration_secs(),
        );
        let timeline = timeline.with_audio(audio);

        tracing::info!(
            clips = timeline.clips().len(),
            questions = timeline.question_count(),
            duration = timeline.duration_secs(),
            audio = timeline.audio().is_some(),
            "Timeline built"
        );
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MemoryMediaResolver;
    use quizreel_project_model::bookend::BookendDocument;
    use quizreel_project_model::layer::ClipKind;
    use quizreel_project_model::project::ProjectPaths;
    use quizreel_project_model::settings::PreviewMode;
    use std::path::PathBuf;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("Question {i}?"), format!("Answer {i}")))
            .collect()
    }

    #[test]
    fn test_plain_timeline() {
        let settings = Settings::default();
        let resolver = MemoryMediaResolver::new();
        let paths = ProjectPaths::new("/p", "/r");
        let builder = TimelineBuilder::new(&settings, &resolver, ProjectContext::new(&paths));

        let timeline = builder.build(&questions(3)).unwrap();
        assert_eq!(timeline.clips().len(), 3);
        assert!((timeline.duration_secs() - 24.0).abs() < 1e-9);
        assert_eq!(timeline.clip_starts(), vec![0.0, 8.0, 16.0]);
        assert!(timeline.audio().is_none());
    }

    #[test]
    fn test_bookends_wrap_questions_and_audio_covers_all() {
        let mut settings = Settings::default();
        settings.audio.file = Some(PathBuf::from("music.mp3"));
        let resolver = MemoryMediaResolver::new().with_audio("/p/music.mp3", 7.0);
        let paths = ProjectPaths::new("/p", "/r");
        let intro = BookendDocument::default();
        let end = BookendDocument {
            duration: 3.0,
            ..BookendDocument::default()
        };
        let ctx = ProjectContext {
            paths: &paths,
            intro: Some(&intro),
            end: Some(&end),
        };

        let timeline = TimelineBuilder::new(&settings, &resolver, ctx)
            .build(&questions(2))
            .unwrap();

        let kinds: Vec<ClipKind> = timeline.clips().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ClipKind::Intro,
                ClipKind::Question { index: 0 },
                ClipKind::Question { index: 1 },
                ClipKind::End
            ]
        );
        assert!((timeline.duration_secs() - 24.0).abs() < 1e-9);
        let audio = timeline.audio().unwrap();
        assert!((audio.duration_secs - 24.0).abs() < 1e-9);
        assert_eq!(audio.repeats, 4);
    }

    #[test]
    fn test_preview_duration_budget_includes_bookends() {
        let mut settings = Settings::default();
        settings.preview_mode.enabled = true;
        settings.preview_mode.mode = PreviewMode::Duration;
        settings.preview_mode.limit = 30.0;
        let resolver = MemoryMediaResolver::new();
        let paths = ProjectPaths::new("/p", "/r");
        let end = BookendDocument::default();
        let ctx = ProjectContext {
            end: Some(&end),
            ..ProjectContext::new(&paths)
        };

        // Budget 30 - 5 = 25 fits three 8-second clips.
        let timeline = TimelineBuilder::new(&settings, &resolver, ctx)
            .build(&questions(10))
            .unwrap();
        assert_eq!(timeline.question_count(), 3);
        assert!(timeline.duration_secs() <= 30.0);
    }

    #[test]
    fn test_preview_count_mode() {
        let mut settings = Settings::default();
        settings.preview_mode.enabled = true;
        let resolver = MemoryMediaResolver::new();
        let paths = ProjectPaths::new("/p", "/r");

        let timeline = TimelineBuilder::new(&settings, &resolver, ProjectContext::new(&paths))
            .build(&questions(10))
            .unwrap();
        assert_eq!(timeline.question_count(), 2);
    }

    #[test]
    fn test_malformed_question_aborts_build() {
        let settings = Settings::default();
        let resolver = MemoryMediaResolver::new();
        let paths = ProjectPaths::new("/p", "/r");
        let mut qs = questions(3);
        qs[1].answer = String::new();

        let err = TimelineBuilder::new(&settings, &resolver, ProjectContext::new(&paths))
            .build(&qs)
            .unwrap_err();
        assert!(err.to_string().contains("question 1"));
    }
}
