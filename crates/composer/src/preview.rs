//! Preview truncation of the question list.
//!
//! Both modes keep a prefix: questions are never reordered and nothing
//! after the first rejected question is considered.

use quizreel_project_model::question::Question;
use quizreel_project_model::settings::PreviewMode;

/// Keep the prefix of `questions` allowed by `mode` and `limit`.
///
/// - `Count`: the first `floor(limit)` questions (all of them if fewer).
/// - `Duration`: starting from `intro_secs`, accept questions while
///   `running + per_question_secs <= limit - end_secs`; stop at the
///   first question that does not fit.
pub fn truncate_questions<'q>(
    questions: &'q [Question],
    mode: PreviewMode,
    limit: f64,
    intro_secs: f64,
    end_secs: f64,
    per_question_secs: f64,
) -> &'q [Question] {
    let keep = match mode {
        PreviewMode::Count => count_limit(limit),
        PreviewMode::Duration => {
            let budget = limit - end_secs;
            let mut running = intro_secs;
            let mut accepted = 0;
            for _ in questions {
                if running + per_question_secs > budget {
                    break;
                }
                running += per_question_secs;
                accepted += 1;
            }
            accepted
        }
    };
    &questions[..keep.min(questions.len())]
}

fn count_limit(limit: f64) -> usize {
    if limit.is_finite() && limit > 0.0 {
        limit.floor() as usize
    } else if limit == f64::INFINITY {
        usize::MAX
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("Q{i}?"), format!("A{i}")))
            .collect()
    }

    #[test]
    fn test_duration_mode_accepts_two() {
        let qs = questions(5);
        let kept = truncate_questions(&qs, PreviewMode::Duration, 30.0, 0.0, 5.0, 10.0);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].question, "Q0?");
    }

    #[test]
    fn test_duration_mode_counts_intro() {
        let qs = questions(5);
        let kept = truncate_questions(&qs, PreviewMode::Duration, 30.0, 6.0, 5.0, 10.0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_duration_budget_boundary_is_inclusive() {
        let qs = questions(5);
        let kept = truncate_questions(&qs, PreviewMode::Duration, 25.0, 0.0, 5.0, 10.0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_duration_mode_can_reject_everything() {
        let qs = questions(3);
        let kept = truncate_questions(&qs, PreviewMode::Duration, 8.0, 0.0, 0.0, 10.0);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_count_mode() {
        let qs = questions(4);
        assert_eq!(truncate_questions(&qs, PreviewMode::Count, 2.0, 0.0, 0.0, 8.0).len(), 2);
        assert_eq!(truncate_questions(&qs, PreviewMode::Count, 2.9, 0.0, 0.0, 8.0).len(), 2);
        assert_eq!(truncate_questions(&qs, PreviewMode::Count, 10.0, 0.0, 0.0, 8.0).len(), 4);
        assert_eq!(truncate_questions(&qs, PreviewMode::Count, 0.0, 0.0, 0.0, 8.0).len(), 0);
        assert_eq!(truncate_questions(&qs, PreviewMode::Count, -3.0, 0.0, 0.0, 8.0).len(), 0);
    }
}
