//! Question documents.

use serde::{Deserialize, Serialize};

/// One question/answer pair. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

/// The questions document: `{"questions": [{"question": .., "answer": ..}]}`.
///
/// The `questions` key is required; a document without it fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsDocument {
    pub questions: Vec<Question>,
}

impl Question {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Copy with escaped quotes (`\"`) turned into plain quotes.
    pub fn cleaned(&self) -> Self {
        Self {
            question: clean_text(&self.question),
            answer: clean_text(&self.answer),
        }
    }

    /// Reject pairs that cannot produce a question clip.
    pub fn check(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if self.answer.trim().is_empty() {
            return Err("answer text is empty".to_string());
        }
        Ok(())
    }
}

/// Undo the quote escaping some question exporters leave behind.
pub fn clean_text(text: &str) -> String {
    text.replace("\\\"", "\"")
}
