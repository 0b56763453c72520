//! Intro and end clips.
//!
//! A bookend is built from its own document, independent of the
//! question list. Shared media (background, images) is looked up in the
//! project directory first, then in the application root.

use std::borrow::Cow;

use quizreel_common::error::{QuizError, QuizResult};
use quizreel_project_model::bookend::{BookendDocument, BookendKind};
use quizreel_project_model::layer::{Clip, ClipKind};
use quizreel_project_model::settings::Settings;

use crate::media::{first_image, MediaLookup, MediaResolver, ProjectContext};
use crate::media_layer::{apply_timing, background_layer, process_layer, RawContent, RawLayer};
use crate::text::{TextLayerBuilder, TextRole, TextStyle};

/// Builds intro/end clips for one project.
pub struct BookendAssembler<'a> {
    settings: &'a Settings,
    resolver: &'a dyn MediaResolver,
    ctx: ProjectContext<'a>,
}

impl<'a> BookendAssembler<'a> {
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

    /// The bookend clip of `kind`, or `None` when the project has no
    /// document for it or the document is disabled.
    pub fn assemble(&self, kind: BookendKind) -> QuizResult<Option<Clip>> {
        let Some(doc) = self.ctx.bookend(kind) else {
            tracing::debug!(bookend = %kind, "No bookend document");
            return Ok(None);
        };
        if !doc.enabled {
            tracing::info!(bookend = %kind, "Bookend disabled");
            return Ok(None);
        }

        self.build(kind, doc)
            .map(Some)
            .map_err(|err| err.in_clip(kind.to_string()))
    }

    fn build(&self, kind: BookendKind, doc: &BookendDocument) -> QuizResult<Clip> {
        if !doc.duration.is_finite() || doc.duration < 0.0 {
            return Err(QuizError::config(format!(
                "{kind} duration {} is not a non-negative number",
                doc.duration
            )));
        }

        let settings = match &doc.settings {
            Some(overrides) => Cow::Owned(
                self.settings
                    .with_overrides(kind.to_string(), overrides)
                    .map_err(|e| QuizError::config(e.to_string()))?,
            ),
            None => Cow::Borrowed(self.settings),
        };

        let duration = doc.duration;
        let canvas = settings.canvas();
        let transition = settings.transition.duration;
        let paths = self.ctx.paths;
        let clip_kind = match kind {
            BookendKind::Intro => ClipKind::Intro,
            BookendKind::End => ClipKind::End,
        };
        let mut clip = Clip::new(kind.to_string(), clip_kind, duration, canvas);

        let candidates = doc
            .background
            .image
            .as_deref()
            .map(|image| paths.in_project_or_root(image))
            .unwrap_or_default();
        let color = doc
            .background
            .color
            .as_ref()
            .unwrap_or(&settings.background.color);
        clip.push(background_layer(
            self.resolver,
            &candidates,
            color,
            canvas,
            duration,
        ));

        for (i, spec) in doc.images.iter().enumerate() {
            let candidates = paths.in_project_or_root(&spec.path);
            let info = match first_image(self.resolver, &candidates) {
                MediaLookup::Found(info) => info,
                MediaLookup::Missing => {
                    tracing::warn!(
                        bookend = %kind,
                        path = %spec.path.display(),
                        "Bookend image not found, skipping"
                    );
                    continue;
                }
            };
            let layer = process_layer(
                RawLayer {
                    label: format!("{kind} image {i}"),
                    content: RawContent::Image(info),
                    target_width: spec.width,
                    position: spec.position,
                    timing: spec.timing,
                },
                canvas,
                duration,
                transition,
            );
            if !clip.push_windowed(layer) {
                tracing::debug!(bookend = %kind, image = i, "Image starts after clip end, dropped");
            }
        }

        let text = TextLayerBuilder::new(&settings);
        for (i, spec) in doc.texts.iter().enumerate() {
            let mut style = TextStyle::custom(spec, &settings);
            style.role = format!("{kind} {i}");
            let layers = text
                .build(&spec.text, &TextRole::Custom(Box::new(style)), duration)?
                .map(|layer| apply_timing(layer, &spec.timing, duration, transition));
            for layer in layers.into_layers() {
                if !clip.push_windowed(layer) {
                    tracing::debug!(bookend = %kind, text = i, "Text starts after clip end, dropped");
                }
            }
        }

        tracing::info!(
            bookend = %kind,
            layers = clip.layers().len(),
            duration,
            "Bookend clip assembled"
        );
        Ok(clip)
    }
}
