pub mod ai_helper;
pub mod provider;
pub mod screen;
pub mod session;
pub mod state;
pub mod topics;

use std::fmt;

/// How many questions a regular batch holds.
pub const QUESTIONS_PER_QUIZ: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Mathematics,
    Science,
    English,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Mathematics, Subject::Science, Subject::English];

    pub fn name(&self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::Science => "Science",
            Subject::English => "English",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Subject::Mathematics => "📐",
            Subject::Science => "🧬",
            Subject::English => "📚",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Subject::Mathematics => "Master numbers, shapes, and logic puzzles!",
            Subject::Science => "Explore nature, space, and how things work!",
            Subject::English => "Become a wizard of words and storytelling!",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Full label including the age band, e.g. "Beginner (Ages 5-7)".
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner (Ages 5-7)",
            Difficulty::Intermediate => "Intermediate (Ages 8-10)",
            Difficulty::Advanced => "Advanced (Ages 11-13)",
        }
    }

    pub fn short_name(&self) -> &'static str {
        self.label().split(" (").next().unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single multiple-choice question as served by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub hint: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// The placeholder served when the provider cannot be reached.
    /// Every option is harmless and the correct one is always on the keyboard.
    pub fn fallback() -> Self {
        Self {
            id: "error-fallback".to_string(),
            question_text:
                "Oops! The question machine is taking a nap. Can you try again later?"
                    .to_string(),
            options: ["Okay", "Sure", "Alright", "Yes"]
                .iter()
                .map(|o| o.to_string())
                .collect(),
            correct_answer: "Okay".to_string(),
            explanation: "Sometimes even robots need a break!".to_string(),
            hint: "Just click Okay.".to_string(),
        }
    }
}

/// What a quiz was started with; a retry replays the same setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSetup {
    pub subject: Subject,
    pub difficulty: Difficulty,
    pub topic: Option<String>,
}

impl QuizSetup {
    pub fn new(subject: Subject, difficulty: Difficulty, topic: Option<String>) -> Self {
        Self {
            subject,
            difficulty,
            topic,
        }
    }

    /// Topic name when one was picked, otherwise the subject.
    pub fn focus(&self) -> &str {
        self.topic.as_deref().unwrap_or(self.subject.name())
    }
}
