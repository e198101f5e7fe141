use crate::quiz::{QuizQuestion, QuizSetup, QUESTIONS_PER_QUIZ};

/// Ties an in-flight provider request to the session that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn issue() -> Self {
        Self(rand::random())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering,
    Feedback,
}

/// Outcome of the "continue" action on the feedback panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion,
    Finished { score: usize, total: usize },
    /// Nothing answered yet, so there is nothing to continue from.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    ticket: Ticket,
    setup: QuizSetup,
    questions: Vec<QuizQuestion>,
    index: usize,
    score: usize,
    selected: Option<String>,
    phase: Phase,
    hint_used: bool,
    encouragement: Option<String>,
}

impl QuizSession {
    /// Returns `None` for an empty batch: there is no question to show.
    pub fn new(ticket: Ticket, setup: QuizSetup, questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            ticket,
            setup,
            questions,
            index: 0,
            score: 0,
            selected: None,
            phase: Phase::Answering,
            hint_used: false,
            encouragement: None,
        })
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn setup(&self) -> &QuizSetup {
        &self.setup
    }

    pub fn current(&self) -> &QuizQuestion {
        &self.questions[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    pub fn encouragement(&self) -> Option<&str> {
        self.encouragement.as_deref()
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    /// Whether the selected answer matches; `None` while still answering.
    pub fn answered_correctly(&self) -> Option<bool> {
        self.selected
            .as_deref()
            .map(|answer| self.current().is_correct(answer))
    }

    /// Records an answer and reveals feedback. The score is settled here so
    /// that finishing never has to look back at the last answer.
    ///
    /// Returns `None` when feedback is already showing.
    pub fn answer(&mut self, answer: &str) -> Option<bool> {
        if self.phase == Phase::Feedback {
            return None;
        }
        let is_correct = self.current().is_correct(answer);
        if is_correct {
            self.score += 1;
        }
        self.selected = Some(answer.to_string());
        self.phase = Phase::Feedback;
        Some(is_correct)
    }

    /// Latches the hint for the current question. Returns false if it was
    /// already revealed or the question is already answered.
    pub fn use_hint(&mut self) -> bool {
        if self.hint_used || self.phase == Phase::Feedback {
            return false;
        }
        self.hint_used = true;
        true
    }

    /// Attaches an encouragement line to the feedback of question `index`.
    pub fn set_encouragement(&mut self, index: usize, message: String) -> bool {
        if index != self.index || self.phase != Phase::Feedback {
            return false;
        }
        self.encouragement = Some(message);
        true
    }

    pub fn advance(&mut self) -> Advance {
        if self.phase != Phase::Feedback {
            return Advance::Ignored;
        }
        if self.is_last() {
            return Advance::Finished {
                score: self.score,
                total: self.total(),
            };
        }
        self.index += 1;
        self.selected = None;
        self.phase = Phase::Answering;
        self.hint_used = false;
        self.encouragement = None;
        Advance::NextQuestion
    }
}

/// The instructor's note on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Perfect,
    Great,
    NiceTry,
}

impl Verdict {
    /// Perfect takes a full batch; the one-question fallback cannot earn it.
    pub fn for_score(score: usize, total: usize) -> Self {
        if total >= QUESTIONS_PER_QUIZ && score == total {
            Verdict::Perfect
        } else if score >= 3 {
            Verdict::Great
        } else {
            Verdict::NiceTry
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            Verdict::Perfect => "Absolute perfection! You're a genius!",
            Verdict::Great => "Great work! You're getting smarter every second.",
            Verdict::NiceTry => "Nice try! Practice makes perfect. Let's go again!",
        }
    }

    pub fn trophy(score: usize) -> &'static str {
        if score >= 3 {
            "🏆"
        } else {
            "🌟"
        }
    }
}
