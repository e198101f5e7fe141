use async_trait::async_trait;
use thiserror::Error;

use crate::quiz::state::{Effect, Event};
use crate::quiz::{Difficulty, QuizQuestion, Subject};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network or API failure, or a reply we could not make sense of.
    #[error("question provider unavailable: {0}")]
    Unavailable(String),
    #[error("question provider returned no questions")]
    EmptyResult,
}

impl From<chatgpt::err::Error> for ProviderError {
    fn from(err: chatgpt::err::Error) -> Self {
        ProviderError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Unavailable(format!("malformed reply: {}", err))
    }
}

/// Source of question batches and encouragement lines.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn fetch_questions(
        &self,
        subject: Subject,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> Result<Vec<QuizQuestion>, ProviderError>;

    async fn fetch_encouragement(
        &self,
        is_correct: bool,
        subject: Subject,
    ) -> Result<String, ProviderError>;
}

pub fn fallback_encouragement(is_correct: bool) -> &'static str {
    if is_correct {
        "Great job!"
    } else {
        "Don't give up!"
    }
}

/// Runs an effect against the provider, substituting local fallbacks for
/// failures. Never fails: the quiz must stay playable.
pub async fn resolve(provider: &dyn QuestionProvider, effect: Effect) -> Event {
    match effect {
        Effect::FetchQuestions { ticket, setup } => {
            let fetched = provider
                .fetch_questions(setup.subject, setup.difficulty, setup.topic.as_deref())
                .await
                .and_then(|questions| {
                    if questions.is_empty() {
                        Err(ProviderError::EmptyResult)
                    } else {
                        Ok(questions)
                    }
                });

            let questions = match fetched {
                Ok(questions) => {
                    log::debug!("received {} questions for {}", questions.len(), setup.focus());
                    questions
                }
                Err(ProviderError::EmptyResult) => {
                    log::warn!("no questions for {} ({})", setup.focus(), setup.difficulty);
                    Vec::new()
                }
                Err(err) => {
                    log::error!("error generating questions: {}", err);
                    vec![QuizQuestion::fallback()]
                }
            };
            Event::QuestionsLoaded { ticket, questions }
        }
        Effect::FetchEncouragement {
            ticket,
            index,
            is_correct,
            subject,
        } => {
            let message = provider
                .fetch_encouragement(is_correct, subject)
                .await
                .unwrap_or_else(|err| {
                    log::warn!("encouragement unavailable, using fallback: {}", err);
                    fallback_encouragement(is_correct).to_string()
                });
            Event::EncouragementReady {
                ticket,
                index,
                message,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;
    use crate::quiz::state::{Action, State};

    /// Scripted provider: answers with whatever the test queued up.
    #[derive(Default)]
    pub(crate) struct FakeProvider {
        pub batch: Mutex<Option<Result<Vec<QuizQuestion>, ProviderError>>>,
        pub fail_encouragement: bool,
        pub encouragement_calls: Mutex<Vec<(bool, Subject)>>,
        /// When set, each call waits for a permit before answering.
        pub gate: Option<tokio::sync::Notify>,
    }

    impl FakeProvider {
        pub(crate) fn serving(questions: Vec<QuizQuestion>) -> Self {
            Self {
                batch: Mutex::new(Some(Ok(questions))),
                ..Self::default()
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                batch: Mutex::new(Some(Err(ProviderError::Unavailable(
                    "connection refused".to_string(),
                )))),
                fail_encouragement: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl QuestionProvider for FakeProvider {
        async fn fetch_questions(
            &self,
            _subject: Subject,
            _difficulty: Difficulty,
            _topic: Option<&str>,
        ) -> Result<Vec<QuizQuestion>, ProviderError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.batch
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(ProviderError::Unavailable("script exhausted".into())))
        }

        async fn fetch_encouragement(
            &self,
            is_correct: bool,
            subject: Subject,
        ) -> Result<String, ProviderError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.encouragement_calls
                .lock()
                .unwrap()
                .push((is_correct, subject));
            if self.fail_encouragement {
                return Err(ProviderError::Unavailable("timeout".to_string()));
            }
            Ok(if is_correct {
                "You're a superstar!".to_string()
            } else {
                "Mistakes help us learn!".to_string()
            })
        }
    }

    /// Applies an action and feeds any provider result straight back in,
    /// the way the bot runtime does.
    pub(crate) async fn drive(
        state: State,
        action: Action,
        provider: &dyn QuestionProvider,
    ) -> State {
        let step = state.apply(action);
        match step.effect {
            Some(effect) => {
                let event = resolve(provider, effect).await;
                step.state.accept(event).unwrap_or(step.state)
            }
            None => step.state,
        }
    }
}
