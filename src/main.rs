mod config;
mod quiz;

use std::sync::Arc;

use chatgpt::{client::ChatGPT, config::ChatGPTEngine};
use dotenv::dotenv;
use quiz::{
    ai_helper::QuizHelper,
    provider::{self, QuestionProvider},
    screen::{self, Screen},
    state::{Effect, State},
};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup, KeyboardRemove},
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SharedProvider = Arc<dyn QuestionProvider>;
/// Serialises read-modify-write of dialogue state between handlers and
/// provider tasks.
type StateLock = Arc<tokio::sync::Mutex<()>>;

#[tokio::main]
async fn main() {
    dotenv().ok();

    pretty_env_logger::init();
    log::info!("Starting quiz academy bot...");

    let config = config::Config::from_env();

    let gpt = config.api_key.as_ref().and_then(|key| {
        match ChatGPT::new(key.clone()) {
            Ok(mut gpt) => {
                gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
                gpt.config.timeout = config.request_timeout;
                Some(gpt)
            }
            Err(err) => {
                log::error!("Unable to set up ChatGPT client, using fallbacks: {}", err);
                None
            }
        }
    });
    let provider: SharedProvider = Arc::new(QuizHelper::new(gpt));

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::endpoint(handle_screen)),
    )
    .dependencies(dptree::deps![
        InMemStorage::<State>::new(),
        provider,
        StateLock::default()
    ])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str =
    "Hi there, Junior Explorer! ✨ Welcome to Quiz Academy, where you can train your brain with fun quizzes.";

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;

    let home = State::Start.apply(quiz::state::Action::Home).state;
    send_screen(&bot, msg.chat.id, &screen::render(&home)).await?;
    dialogue.update(home).await?;
    Ok(())
}

async fn handle_screen(
    bot: Bot,
    dialogue: QuizDialogue,
    provider: SharedProvider,
    lock: StateLock,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;

    // A provider task may have moved this chat on since the update was routed.
    let guard = lock.lock().await;
    let state = dialogue.get_or_default().await?;
    let action = msg.text().and_then(|text| screen::read_action(&state, text));
    let Some(action) = action else {
        drop(guard);
        let current = screen::render(&state);
        let nudge = Screen {
            text: format!("Please pick one of the buttons below 🙂\n\n{}", current.text),
            keyboard: current.keyboard,
        };
        send_screen(&bot, chat_id, &nudge).await?;
        return Ok(());
    };

    log::debug!("chat {}: {:?}", chat_id, action);
    let step = state.apply(action);
    dialogue.update(step.state.clone()).await?;
    drop(guard);

    send_screen(&bot, chat_id, &screen::render(&step.state)).await?;

    if let Some(effect) = step.effect {
        let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;
        tokio::spawn(run_effect(bot, dialogue, provider, lock, effect));
    }
    Ok(())
}

/// Runs a provider request off the update loop so the chat stays responsive,
/// then applies the result if the chat is still where it was.
async fn run_effect(
    bot: Bot,
    dialogue: QuizDialogue,
    provider: SharedProvider,
    lock: StateLock,
    effect: Effect,
) {
    let chat_id = dialogue.chat_id();
    let event = provider::resolve(provider.as_ref(), effect).await;

    let next = {
        let _guard = lock.lock().await;
        let current = match dialogue.get_or_default().await {
            Ok(current) => current,
            Err(err) => {
                log::error!("chat {}: cannot read dialogue state: {}", chat_id, err);
                return;
            }
        };
        let Some(next) = current.accept(event) else {
            log::info!("chat {}: discarding stale provider result", chat_id);
            return;
        };
        if let Err(err) = dialogue.update(next.clone()).await {
            log::error!("chat {}: cannot store dialogue state: {}", chat_id, err);
            return;
        }
        next
    };

    if let Err(err) = send_screen(&bot, chat_id, &screen::render(&next)).await {
        log::error!("chat {}: cannot send screen: {}", chat_id, err);
    }
}

async fn send_screen(bot: &Bot, chat_id: ChatId, screen: &Screen) -> HandlerResult {
    if screen.keyboard.is_empty() {
        bot.send_message(chat_id, screen.text.clone())
            .reply_markup(KeyboardRemove::new())
            .await?;
        return Ok(());
    }

    let keyboard = KeyboardMarkup::new(
        screen
            .keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|label| KeyboardButton::new(label.clone()))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>(),
    );
    bot.send_message(chat_id, screen.text.clone())
        .reply_markup(keyboard)
        .await?;
    Ok(())
}
