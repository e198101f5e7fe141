use crate::quiz::session::{Advance, QuizSession, Ticket};
use crate::quiz::{Difficulty, QuizQuestion, QuizSetup, Subject};

/// One chat's position in the app. Every screen is a variant carrying just
/// what that screen needs.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum State {
    #[default]
    Start,
    Home {
        difficulty: Difficulty,
    },
    Topics {
        subject: Subject,
        difficulty: Difficulty,
    },
    Loading {
        setup: QuizSetup,
        ticket: Ticket,
    },
    Quiz {
        session: QuizSession,
    },
    /// The provider came back with nothing; the only way out is back.
    Unavailable {
        setup: QuizSetup,
    },
    Results {
        setup: QuizSetup,
        score: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ChooseDifficulty(Difficulty),
    ChooseSubject(Subject),
    /// `None` is "Surprise Me!": a mixed batch across the subject.
    ChooseTopic(Option<String>),
    Answer(String),
    Hint,
    Continue,
    Quit,
    BackToSubjects,
    BackToTopics,
    Retry,
    Home,
}

/// Work the runtime must do on behalf of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchQuestions {
        ticket: Ticket,
        setup: QuizSetup,
    },
    FetchEncouragement {
        ticket: Ticket,
        index: usize,
        is_correct: bool,
        subject: Subject,
    },
}

/// A provider result on its way back into the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    QuestionsLoaded {
        ticket: Ticket,
        questions: Vec<QuizQuestion>,
    },
    EncouragementReady {
        ticket: Ticket,
        index: usize,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: State,
    pub effect: Option<Effect>,
}

impl Step {
    fn to(state: State) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    fn with(state: State, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

impl State {
    pub fn difficulty(&self) -> Difficulty {
        match self {
            State::Start => Difficulty::default(),
            State::Home { difficulty } | State::Topics { difficulty, .. } => *difficulty,
            State::Loading { setup, .. }
            | State::Unavailable { setup }
            | State::Results { setup, .. } => setup.difficulty,
            State::Quiz { session } => session.setup().difficulty,
        }
    }

    pub fn apply(self, action: Action) -> Step {
        let difficulty = self.difficulty();
        match (self, action) {
            (_, Action::Home) => Step::to(State::Home { difficulty }),

            (State::Home { .. }, Action::ChooseDifficulty(difficulty)) => {
                Step::to(State::Home { difficulty })
            }
            (State::Home { difficulty }, Action::ChooseSubject(subject)) => {
                Step::to(State::Topics {
                    subject,
                    difficulty,
                })
            }

            (State::Topics { difficulty, .. }, Action::BackToSubjects) => {
                Step::to(State::Home { difficulty })
            }
            (
                State::Topics {
                    subject,
                    difficulty,
                },
                Action::ChooseTopic(topic),
            ) => start_quiz(QuizSetup::new(subject, difficulty, topic)),

            (State::Loading { setup, .. }, Action::Quit)
            | (State::Unavailable { setup }, Action::Quit) => Step::to(topics_of(&setup)),

            (State::Quiz { session }, Action::Quit) => Step::to(topics_of(session.setup())),
            (State::Quiz { mut session }, Action::Answer(answer)) => match session.answer(&answer) {
                Some(is_correct) => {
                    let effect = Effect::FetchEncouragement {
                        ticket: session.ticket(),
                        index: session.index(),
                        is_correct,
                        subject: session.setup().subject,
                    };
                    Step::with(State::Quiz { session }, effect)
                }
                None => Step::to(State::Quiz { session }),
            },
            (State::Quiz { mut session }, Action::Hint) => {
                session.use_hint();
                Step::to(State::Quiz { session })
            }
            (State::Quiz { mut session }, Action::Continue) => match session.advance() {
                Advance::Finished { score, total } => Step::to(State::Results {
                    setup: session.setup().clone(),
                    score,
                    total,
                }),
                Advance::NextQuestion | Advance::Ignored => Step::to(State::Quiz { session }),
            },

            (State::Results { setup, .. }, Action::BackToTopics) => Step::to(topics_of(&setup)),
            (State::Results { setup, .. }, Action::Retry) => start_quiz(setup),

            (state, action) => {
                log::debug!("ignoring {:?} on {:?}", action, state);
                Step::to(state)
            }
        }
    }

    /// Applies a provider result if it still belongs to this state. Returns
    /// `None` for results of sessions that were exited or restarted since.
    pub fn accept(&self, event: Event) -> Option<State> {
        match (self, event) {
            (State::Loading { setup, ticket }, Event::QuestionsLoaded { ticket: t, questions })
                if *ticket == t =>
            {
                match QuizSession::new(t, setup.clone(), questions) {
                    Some(session) => Some(State::Quiz { session }),
                    None => Some(State::Unavailable {
                        setup: setup.clone(),
                    }),
                }
            }
            (
                State::Quiz { session },
                Event::EncouragementReady {
                    ticket,
                    index,
                    message,
                },
            ) if session.ticket() == ticket => {
                let mut session = session.clone();
                if session.set_encouragement(index, message) {
                    Some(State::Quiz { session })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

fn start_quiz(setup: QuizSetup) -> Step {
    let ticket = Ticket::issue();
    Step::with(
        State::Loading {
            setup: setup.clone(),
            ticket,
        },
        Effect::FetchQuestions { ticket, setup },
    )
}

fn topics_of(setup: &QuizSetup) -> State {
    State::Topics {
        subject: setup.subject,
        difficulty: setup.difficulty,
    }
}
