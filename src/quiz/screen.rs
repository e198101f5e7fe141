use crate::quiz::session::{Phase, QuizSession, Verdict};
use crate::quiz::state::{Action, State};
use crate::quiz::topics::topics_for;
use crate::quiz::{Difficulty, Subject};

pub const HOME: &str = "🏠 Home";
pub const SURPRISE_ME: &str = "🎲 Surprise Me!";
pub const BACK_TO_SUBJECTS: &str = "← Back to Subjects";
pub const QUIT: &str = "❌ Quit";
pub const NEED_A_HINT: &str = "💡 Need a hint?";
pub const NEXT_QUESTION: &str = "Next Question →";
pub const FINISH_QUIZ: &str = "Finish Quiz";
pub const GO_BACK: &str = "Go Back";
pub const ANOTHER_TOPIC: &str = "Choose Another Topic";
pub const TRY_AGAIN: &str = "Try Again";

/// What gets sent to the chat for a state: a message and its reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub text: String,
    pub keyboard: Vec<Vec<String>>,
}

fn subject_label(subject: Subject) -> String {
    format!("{} {}", subject.icon(), subject.name())
}

fn difficulty_label(difficulty: Difficulty, selected: Difficulty) -> String {
    if difficulty == selected {
        format!("✅ {}", difficulty.short_name())
    } else {
        difficulty.short_name().to_string()
    }
}

fn topic_label(icon: &str, name: &str) -> String {
    format!("{} {}", icon, name)
}

/// Maps a button press on the screen of `state` to an action.
pub fn read_action(state: &State, text: &str) -> Option<Action> {
    let text = text.trim();
    if text == HOME || text == "/home" || text == "/start" {
        return Some(Action::Home);
    }

    match state {
        State::Start => None,
        State::Home { difficulty } => {
            if let Some(subject) = Subject::ALL
                .into_iter()
                .find(|s| subject_label(*s) == text)
            {
                return Some(Action::ChooseSubject(subject));
            }
            Difficulty::ALL
                .into_iter()
                .find(|d| difficulty_label(*d, *difficulty) == text)
                .map(Action::ChooseDifficulty)
        }
        State::Topics { subject, .. } => {
            if text == SURPRISE_ME {
                return Some(Action::ChooseTopic(None));
            }
            if text == BACK_TO_SUBJECTS {
                return Some(Action::BackToSubjects);
            }
            topics_for(*subject)
                .iter()
                .find(|t| topic_label(t.icon, t.name) == text)
                .map(|t| Action::ChooseTopic(Some(t.name.to_string())))
        }
        State::Loading { .. } => (text == QUIT).then_some(Action::Quit),
        State::Unavailable { .. } => (text == GO_BACK).then_some(Action::Quit),
        State::Quiz { session } => {
            let is_option = session.current().options.iter().any(|o| o == text);
            // Options come from the provider and may look like our own buttons.
            if is_option && session.phase() == Phase::Answering {
                return Some(Action::Answer(text.to_string()));
            }
            match text {
                QUIT => Some(Action::Quit),
                NEED_A_HINT => Some(Action::Hint),
                NEXT_QUESTION | FINISH_QUIZ => Some(Action::Continue),
                _ => is_option.then(|| Action::Answer(text.to_string())),
            }
        }
        State::Results { .. } => match text {
            ANOTHER_TOPIC => Some(Action::BackToTopics),
            TRY_AGAIN => Some(Action::Retry),
            _ => None,
        },
    }
}

pub fn render(state: &State) -> Screen {
    match state {
        State::Start => Screen {
            text: "Send /start to begin!".to_string(),
            keyboard: Vec::new(),
        },
        State::Home { difficulty } => render_home(*difficulty),
        State::Topics {
            subject,
            difficulty,
        } => render_topics(*subject, *difficulty),
        State::Loading { setup, .. } => Screen {
            text: format!(
                "🔮 Consulting the Oracle...\nGetting your {} challenge ready!",
                setup.focus()
            ),
            keyboard: vec![vec![QUIT.to_string()]],
        },
        State::Unavailable { .. } => Screen {
            text: "Something went wrong loading the quiz.".to_string(),
            keyboard: vec![vec![GO_BACK.to_string()]],
        },
        State::Quiz { session } => render_quiz(session),
        State::Results { score, total, .. } => {
            let verdict = Verdict::for_score(*score, *total);
            Screen {
                text: format!(
                    "{} Training Complete!\nYou scored {} out of {}\n\nInstructor's Note:\n\"{}\"",
                    Verdict::trophy(*score),
                    score,
                    total,
                    verdict.note()
                ),
                keyboard: vec![
                    vec![ANOTHER_TOPIC.to_string(), TRY_AGAIN.to_string()],
                    vec![HOME.to_string()],
                ],
            }
        }
    }
}

fn render_home(difficulty: Difficulty) -> Screen {
    let mut text = format!(
        "Ready to learn something amazing?\nChoose a subject and train your brain with our AI-powered tutors!\n\nDifficulty: {}\n",
        difficulty
    );
    for subject in Subject::ALL {
        text.push_str(&format!("\n{} {}: {}", subject.icon(), subject, subject.description()));
    }

    Screen {
        text,
        keyboard: vec![
            Difficulty::ALL
                .iter()
                .map(|d| difficulty_label(*d, difficulty))
                .collect(),
            Subject::ALL.iter().map(|s| subject_label(*s)).collect(),
        ],
    }
}

fn render_topics(subject: Subject, difficulty: Difficulty) -> Screen {
    let topics = topics_for(subject);
    let mut text = format!(
        "{} Challenges ({})\nPick a mission to start your training!\n\n{} Mixed questions from all topics",
        subject,
        difficulty.short_name(),
        SURPRISE_ME
    );
    for topic in topics {
        text.push_str(&format!("\n{} {}: {}", topic.icon, topic.name, topic.description));
    }

    let mut keyboard = vec![vec![SURPRISE_ME.to_string()]];
    keyboard.extend(
        topics
            .chunks(2)
            .map(|pair| pair.iter().map(|t| topic_label(t.icon, t.name)).collect()),
    );
    keyboard.push(vec![BACK_TO_SUBJECTS.to_string(), HOME.to_string()]);

    Screen { text, keyboard }
}

fn render_quiz(session: &QuizSession) -> Screen {
    let question = session.current();
    let setup = session.setup();

    let mut text = format!("{}/{} · {}", session.index() + 1, session.total(), setup.subject);
    if let Some(topic) = &setup.topic {
        text.push_str(&format!(" · {}", topic));
    }
    text.push_str(&format!("\n\n{}\n", question.question_text));
    for (i, option) in question.options.iter().enumerate() {
        let letter = (b'A' + (i % 26) as u8) as char;
        text.push_str(&format!("\n{}. {}", letter, option));
    }

    match session.phase() {
        Phase::Answering => {
            if session.hint_used() {
                text.push_str(&format!("\n\n💡 {}", question.hint));
            }
            let mut keyboard: Vec<Vec<String>> = question
                .options
                .chunks(2)
                .map(|pair| pair.to_vec())
                .collect();
            let mut controls = vec![QUIT.to_string()];
            if !session.hint_used() {
                controls.insert(0, NEED_A_HINT.to_string());
            }
            keyboard.push(controls);
            Screen { text, keyboard }
        }
        Phase::Feedback => {
            let correct = session.answered_correctly().unwrap_or(false);
            let mark = if correct { "🎉" } else { "🤔" };
            let encouragement = session.encouragement().unwrap_or("...");
            text.push_str(&format!("\n\n{} {}", mark, encouragement));
            if !correct {
                text.push_str(&format!(
                    "\nYou picked {}. The answer was: {}",
                    session.selected().unwrap_or_default(),
                    question.correct_answer
                ));
            }
            text.push_str(&format!("\n{}", question.explanation));

            let next = if session.is_last() {
                FINISH_QUIZ
            } else {
                NEXT_QUESTION
            };
            Screen {
                text,
                keyboard: vec![vec![next.to_string()], vec![QUIT.to_string()]],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::session::tests::batch;
    use crate::quiz::session::Ticket;
    use crate::quiz::{QuizQuestion, QuizSetup};

    fn quiz(questions: Vec<QuizQuestion>) -> State {
        let setup = QuizSetup::new(
            Subject::Mathematics,
            Difficulty::Beginner,
            Some("Fun Addition".to_string()),
        );
        State::Quiz {
            session: QuizSession::new(Ticket::issue(), setup, questions).unwrap(),
        }
    }

    /// Every button on a screen must map back to an action.
    fn assert_buttons_are_actions(state: &State) {
        for row in render(state).keyboard {
            for label in row {
                assert!(
                    read_action(state, &label).is_some(),
                    "button {:?} does nothing on {:?}",
                    label,
                    state
                );
            }
        }
    }

    #[test]
    fn all_buttons_are_wired() {
        assert_buttons_are_actions(&State::Home { difficulty: Difficulty::Intermediate });
        for subject in Subject::ALL {
            assert_buttons_are_actions(&State::Topics {
                subject,
                difficulty: Difficulty::Beginner,
            });
        }
        let state = quiz(batch(5));
        assert_buttons_are_actions(&state);
        let answered = state.apply(Action::Answer("2".to_string())).state;
        assert_buttons_are_actions(&answered);
    }

    #[test]
    fn home_buttons_pick_subject_and_difficulty() {
        let home = State::Home { difficulty: Difficulty::Beginner };
        assert_eq!(
            read_action(&home, "🧬 Science"),
            Some(Action::ChooseSubject(Subject::Science))
        );
        assert_eq!(
            read_action(&home, "Advanced"),
            Some(Action::ChooseDifficulty(Difficulty::Advanced))
        );
        assert_eq!(read_action(&home, "Science"), None);
    }

    #[test]
    fn topic_button_passes_topic_name() {
        let topics = State::Topics {
            subject: Subject::Science,
            difficulty: Difficulty::Beginner,
        };
        assert_eq!(
            read_action(&topics, "🚀 Space Explorers"),
            Some(Action::ChooseTopic(Some("Space Explorers".to_string())))
        );
        assert_eq!(read_action(&topics, SURPRISE_ME), Some(Action::ChooseTopic(None)));
        assert_eq!(read_action(&topics, "🦁 Word Wizard"), None);
    }

    #[test]
    fn unknown_text_in_quiz_is_not_an_answer() {
        let state = quiz(batch(5));
        assert_eq!(read_action(&state, "banana"), None);
        assert_eq!(
            read_action(&state, "2"),
            Some(Action::Answer("2".to_string()))
        );
    }

    #[test]
    fn option_named_like_a_control_is_still_an_answer() {
        let question = QuizQuestion {
            id: "verbs".to_string(),
            question_text: "Which word means to stop playing?".to_string(),
            options: ["Go", "Quit", "Finish Quiz", QUIT]
                .iter()
                .map(|o| o.to_string())
                .collect(),
            correct_answer: "Quit".to_string(),
            explanation: "To quit is to stop.".to_string(),
            hint: "It rhymes with 'bit'... almost.".to_string(),
        };
        let state = quiz(vec![question]);
        for label in ["Quit", "Finish Quiz", QUIT] {
            assert_eq!(
                read_action(&state, label),
                Some(Action::Answer(label.to_string()))
            );
        }

        let answered = state.apply(Action::Answer("Quit".to_string())).state;
        match &answered {
            State::Quiz { session } => assert_eq!(session.score(), 1),
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(read_action(&answered, FINISH_QUIZ), Some(Action::Continue));
        assert_eq!(read_action(&answered, QUIT), Some(Action::Quit));
    }

    #[test]
    fn feedback_goes_out_before_the_encouragement_arrives() {
        let state = quiz(batch(5)).apply(Action::Answer("2".to_string())).state;
        let screen = render(&state);
        assert!(screen.text.contains("🎉 ..."));
        assert_eq!(screen.keyboard[0], vec![NEXT_QUESTION.to_string()]);
    }

    #[test]
    fn unavailable_offers_only_go_back() {
        let state = State::Unavailable {
            setup: QuizSetup::new(Subject::English, Difficulty::Beginner, None),
        };
        let screen = render(&state);
        assert_eq!(screen.keyboard, vec![vec![GO_BACK.to_string()]]);
        assert_eq!(read_action(&state, GO_BACK), Some(Action::Quit));
    }

    #[test]
    fn revealed_hint_replaces_the_hint_button() {
        let state = quiz(batch(5)).apply(Action::Hint).state;
        let screen = render(&state);
        assert!(screen.text.contains("💡 Count up by one."));
        assert!(!screen.keyboard.iter().flatten().any(|b| b == NEED_A_HINT));
    }

    #[test]
    fn feedback_on_last_question_offers_finish() {
        let state = quiz(batch(1)).apply(Action::Answer("9".to_string())).state;
        let screen = render(&state);
        assert_eq!(screen.keyboard[0], vec![FINISH_QUIZ.to_string()]);
        assert!(screen.text.contains("The answer was: 2"));
    }

    #[test]
    fn results_note_follows_the_score() {
        let setup = QuizSetup::new(Subject::Science, Difficulty::Beginner, None);
        let perfect = render(&State::Results {
            setup: setup.clone(),
            score: 5,
            total: 5,
        });
        assert!(perfect.text.contains("Absolute perfection!"));
        assert!(perfect.text.starts_with("🏆"));

        let low = render(&State::Results {
            setup,
            score: 2,
            total: 5,
        });
        assert!(low.text.contains("Nice try!"));
        assert!(low.text.contains("You scored 2 out of 5"));
    }
}
