//! Question/answer clips.
//!
//! One clip per question, `question_duration + answer_duration` long,
//! stacked bottom to top: background, question text, answer text,
//! countdown ticks. The countdown runs over the question phase only.

use quizreel_common::error::{QuizError, QuizResult};
use quizreel_project_model::layer::{Clip, ClipKind, LayerDescriptor};
use quizreel_project_model::project::ProjectPaths;
use quizreel_project_model::question::Question;
use quizreel_project_model::settings::Settings;

use crate::media::MediaResolver;
use crate::media_layer::background_layer;
use crate::text::{TextLayerBuilder, TextRole};
use crate::timer::TimerSequencer;

/// Builds question clips against one resolved settings value.
///
/// Media (background image, tick sound) is resolved once at
/// construction and shared by every clip.
pub struct QuestionClipAssembler<'a> {
    settings: &'a Settings,
    text: TextLayerBuilder<'a>,
    timer: TimerSequencer<'a>,
    background: LayerDescriptor,
}

impl<'a> QuestionClipAssembler<'a> {
    pub fn new(settings: &'a Settings, resolver: &dyn MediaResolver, paths: &ProjectPaths) -> Self {
        let candidates = settings
            .background
            .image
            .as_deref()
            .map(|image| paths.in_project_or_root(image))
            .unwrap_or_default();
        let background = background_layer(
            resolver,
            &candidates,
            &settings.background.color,
            settings.canvas(),
            settings.timing.clip_duration(),
        );

        Self {
            settings,
            text: TextLayerBuilder::new(settings),
            timer: TimerSequencer::with_tick_sound(settings, resolver, paths),
            background,
        }
    }

    /// Assemble the clip for question `index` (0-based).
    ///
    /// Any failure aborts the clip and is reported with its label.
    pub fn assemble(&self, index: usize, question: &Question) -> QuizResult<Clip> {
        let label = format!("question {index}");
        self.build(index, question, &label)
            .map_err(|err| err.in_clip(label))
    }

    fn build(&self, index: usize, question: &Question, label: &str) -> QuizResult<Clip> {
        question
            .check()
            .map_err(|message| QuizError::MalformedQuestion { index, message })?;

        let timing = &self.settings.timing;
        let question_secs = timing.question_duration as f64;
        let mut clip = Clip::new(
            label,
            ClipKind::Question { index },
            timing.clip_duration(),
            self.settings.canvas(),
        );

        clip.push(self.background.clone());

        let question_layers = self
            .text
            .build(&question.question, &TextRole::Question, question_secs)?;
        for layer in question_layers.into_layers() {
            clip.push(layer);
        }

        let answer_layers = self
            .text
            .build(&question.answer, &TextRole::Answer, timing.answer_duration)?
            .map(|layer| layer.starting_at(question_secs));
        for layer in answer_layers.into_layers() {
            clip.push(layer);
        }

        for tick in self.timer.sequence(timing.question_duration) {
            clip.push(tick);
        }

        tracing::debug!(
            clip = %clip.label,
            layers = clip.layers().len(),
            duration = clip.duration_secs,
            "Question clip assembled"
        );
        Ok(clip)
    }
}
