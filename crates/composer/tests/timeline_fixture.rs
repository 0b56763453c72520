use std::path::{Path, PathBuf};

use quizreel_composer::{validate_media, MemoryMediaResolver, TimelineBuilder};
use quizreel_project_model::layer::{ClipKind, LayerContent};
use quizreel_project_model::position::Coordinate;
use quizreel_project_model::project::LoadedProject;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-quiz")
}

fn load_fixture_project() -> LoadedProject {
    LoadedProject::load(fixture_root().join("settings.json")).expect("fixture project should load")
}

/// Media the fixture refers to, except `missing_badge.png`.
fn fixture_media(project: &LoadedProject) -> MemoryMediaResolver {
    let project_dir: &Path = &project.paths.project_dir;
    let app_root: &Path = &project.paths.app_root;
    MemoryMediaResolver::new()
        .with_image(project_dir.join("background.png"), 1920, 1080)
        .with_image(project_dir.join("logo.png"), 800, 400)
        .with_image(app_root.join("intro_bg.png"), 1920, 1080)
        .with_audio(project_dir.join("music.mp3"), 30.0)
        .with_audio(app_root.join("tick.wav"), 0.25)
}

#[test]
fn sample_quiz_timeline_structure() {
    let project = load_fixture_project();
    let resolver = fixture_media(&project);
    let timeline = TimelineBuilder::for_project(&project, &resolver)
        .build(&project.questions)
        .expect("fixture timeline should build");

    let kinds: Vec<ClipKind> = timeline.clips().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ClipKind::Intro,
            ClipKind::Question { index: 0 },
            ClipKind::Question { index: 1 },
            ClipKind::Question { index: 2 },
            ClipKind::End,
        ]
    );
    assert!((timeline.duration_secs() - 25.0).abs() < 1e-9);
    assert_eq!(timeline.clip_starts(), vec![0.0, 4.0, 10.0, 16.0, 22.0]);

    let audio = timeline.audio().expect("soundtrack should resolve");
    assert_eq!(audio.repeats, 1);
    assert!((audio.duration_secs - 25.0).abs() < 1e-9);
    assert!((audio.volume - 0.6).abs() < 1e-9);
}

#[test]
fn sample_quiz_intro_skips_missing_image() {
    let project = load_fixture_project();
    let resolver = fixture_media(&project);
    let timeline = TimelineBuilder::for_project(&project, &resolver)
        .build(&project.questions)
        .unwrap();

    let intro = &timeline.clips()[0];
    let labels: Vec<&str> = intro.layers().iter().map(|l| l.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["background", "intro image 0", "intro 0 text shadow", "intro 0 text"]
    );

    match &intro.layers()[0].content {
        LayerContent::Image { path, .. } => assert!(path.ends_with("intro_bg.png")),
        other => panic!("expected image background, got {}", other.kind_name()),
    }

    let logo = &intro.layers()[1];
    assert_eq!(logo.size.width, 400.0);
    assert_eq!(logo.size.height, 200.0);
    assert_eq!(logo.position.y, Coordinate::At(80.0));

    let title = &intro.layers()[3];
    assert!((title.start_secs - 0.5).abs() < 1e-9);
    assert!((title.end_secs() - 4.0).abs() < 1e-9);
}

#[test]
fn sample_quiz_question_clips() {
    let project = load_fixture_project();
    let resolver = fixture_media(&project);
    let timeline = TimelineBuilder::for_project(&project, &resolver)
        .build(&project.questions)
        .unwrap();

    for clip in &timeline.clips()[1..4] {
        assert!((clip.duration_secs - 6.0).abs() < 1e-9);
        assert_eq!(clip.layers().len(), 5 + 4);
        assert!(matches!(clip.layers()[0].content, LayerContent::Image { .. }));

        let ticks: Vec<_> = clip.timer_ticks().collect();
        assert_eq!(ticks.len(), 4);
        for (i, tick) in ticks.iter().enumerate() {
            assert_eq!(tick.start_secs, i as f64);
            assert_eq!(tick.position.x, Coordinate::At(1740.0));
            assert_eq!(tick.position.y, Coordinate::At(40.0));
            let sound = tick.audio.as_ref().expect("tick sound resolves from the app root");
            assert!(sound.path.ends_with("tick.wav"));
        }
        assert!(clip.timer_ticks().all(|t| !t.overlaps(4.0, 6.0)));
    }

    let http = &timeline.clips()[2].layers()[2];
    match &http.content {
        LayerContent::Text(text) => assert!(text.text.contains("\"HTTP\"")),
        other => panic!("expected question text, got {}", other.kind_name()),
    }
}

#[test]
fn sample_quiz_end_uses_clip_override() {
    let project = load_fixture_project();
    let resolver = fixture_media(&project);
    let timeline = TimelineBuilder::for_project(&project, &resolver)
        .build(&project.questions)
        .unwrap();

    let end = timeline.clips().last().unwrap();
    assert_eq!(end.kind, ClipKind::End);
    match &end.layers()[0].content {
        LayerContent::Solid { color } => assert_eq!(color.as_hex(), "000000"),
        other => panic!("expected solid background, got {}", other.kind_name()),
    }

    // The override does not leak into the project settings.
    assert_eq!(project.settings.background.color.as_hex(), "1A1A2E");
}

#[test]
fn sample_quiz_reports_missing_media() {
    quizreel_common::logging::init_test_logging();
    let project = load_fixture_project();
    let resolver = fixture_media(&project);

    let missing = validate_media(&project, &resolver);
    assert_eq!(missing.len(), 1);
    assert!(missing[0].candidates[0].ends_with("missing_badge.png"));
}
