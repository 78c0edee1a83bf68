//! The supportive chat turn and the interactive conversation loop.
//!
//! [`analyze_and_respond`] is the pipeline for one turn: build the prompt from
//! recent user messages, call the model within a deadline, parse the reply,
//! and pick an exercise. It never fails; every failure maps to a canned reply
//! plus the default exercise.
//!
//! [`ChatSession`] wraps the pipeline with the side effects of a turn: the
//! mood history update and the exercise store merge.
//!
//! The interactive loop consumes two channels: typed lines and Ctrl-C
//! presses. Ctrl-C at the prompt ends the conversation; during a turn it
//! cancels that turn's model call.

use crate::ai::{analysis_prompt, bounded_chat, parse_reply, recent_user_text};
use crate::ai::{Analysis, ChatModel, Message};
use crate::constants::MAX_SESSION_TURNS;
use crate::errors::{AIError, AppResult};
use crate::exercises::{classify_analysis, default_exercise, Exercise};
use crate::mood::{self, MoodTracker};
use crate::storage::BlobStorage;
use crate::store::ExerciseStore;
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lines typed by the user. A closed channel means end of input.
pub type InputLines = mpsc::UnboundedReceiver<String>;

/// One message per Ctrl-C.
pub type Interrupts = mpsc::UnboundedReceiver<()>;

/// Why a turn ended with a canned reply instead of the model's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The history had no user text to respond to.
    NoUserMessage,
    /// The provider needs an API key that is not configured.
    MissingCredentials,
    /// Timeout, cancellation, transport or model error.
    ModelUnavailable,
    /// The model replied with nothing usable.
    Unparseable,
}

impl Fallback {
    /// The reply shown to the user.
    pub fn reply(self) -> &'static str {
        match self {
            Fallback::NoUserMessage => "I'm here to help. How are you feeling today?",
            Fallback::MissingCredentials => {
                "I'm having trouble connecting to my services. Please make sure the API key is configured correctly."
            }
            Fallback::ModelUnavailable => {
                "I'm thinking about what you said. In the meantime, how has your day been going?"
            }
            Fallback::Unparseable => "I'm listening. Tell me more about how you're feeling.",
        }
    }
}

/// The result of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    /// Text shown to the user.
    pub response: String,
    pub analysis: Analysis,
    /// Always exactly one exercise.
    pub recommended_exercises: Vec<Exercise>,
    /// Set when `response` is a canned reply.
    pub fallback: Option<Fallback>,
}

impl ChatOutcome {
    fn fallback(reason: Fallback) -> Self {
        Self {
            response: reason.reply().to_string(),
            analysis: Analysis::Unavailable,
            recommended_exercises: vec![default_exercise()],
            fallback: Some(reason),
        }
    }
}

/// Produces a supportive reply, an analysis, and one recommended exercise for
/// the conversation in `history`.
///
/// Only the last three user messages are sent to the model. The call is
/// bounded by `timeout` and aborted when `token` is cancelled.
pub async fn analyze_and_respond(
    model: &dyn ChatModel,
    history: &[Message],
    timeout: Duration,
    token: &CancellationToken,
) -> ChatOutcome {
    let Some(user_text) = recent_user_text(history) else {
        warn!("No user message to respond to");
        return ChatOutcome::fallback(Fallback::NoUserMessage);
    };

    let messages = analysis_prompt(&user_text);
    let raw = match bounded_chat(model, &messages, timeout, token).await {
        Ok(raw) => raw,
        Err(AIError::MissingCredentials(var)) => {
            warn!("Model credentials missing: set {}", var);
            return ChatOutcome::fallback(Fallback::MissingCredentials);
        }
        Err(e) => {
            warn!("Model call failed: {}", e);
            return ChatOutcome::fallback(Fallback::ModelUnavailable);
        }
    };

    let reply = match parse_reply(&raw) {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Could not parse model reply: {}", e);
            return ChatOutcome::fallback(Fallback::Unparseable);
        }
    };

    let exercise = match reply.analysis.text() {
        Some(text) => classify_analysis(text),
        None => {
            debug!("Reply had no analysis section");
            default_exercise()
        }
    };

    ChatOutcome {
        response: reply.response,
        analysis: reply.analysis,
        recommended_exercises: vec![exercise],
        fallback: None,
    }
}

/// A conversation with its mood and exercise side effects.
pub struct ChatSession<'a, S: BlobStorage> {
    model: &'a dyn ChatModel,
    mood: MoodTracker<&'a S>,
    exercises: ExerciseStore<&'a S>,
    history: Vec<Message>,
    timeout: Duration,
}

impl<'a, S: BlobStorage> ChatSession<'a, S> {
    /// Starts an empty conversation persisting to `storage`.
    pub fn new(model: &'a dyn ChatModel, storage: &'a S, timeout: Duration) -> Self {
        Self {
            model,
            mood: MoodTracker::new(storage),
            exercises: ExerciseStore::open(storage),
            history: Vec::new(),
            timeout,
        }
    }

    /// Messages exchanged so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn exercises(&self) -> &ExerciseStore<&'a S> {
        &self.exercises
    }

    /// Handles one user message.
    ///
    /// Appends the message, runs [`analyze_and_respond`], scores the analysis
    /// into today's mood when the model produced one, merges the recommended
    /// exercise into the store, and appends the reply. The history is capped
    /// at the most recent twenty messages.
    pub async fn process_turn(
        &mut self,
        message: &str,
        today: NaiveDate,
        token: &CancellationToken,
    ) -> ChatOutcome {
        self.history.push(Message::user(message));

        let outcome = analyze_and_respond(self.model, &self.history, self.timeout, token).await;

        if let Some(text) = outcome.analysis.text() {
            let score = mood::score(text);
            info!("Analysis scored mood {}", score);
            self.mood.update(score, today);
        }

        self.exercises
            .set_recommended_exercises(outcome.recommended_exercises.clone());

        self.history.push(Message::assistant(outcome.response.clone()));
        if self.history.len() > MAX_SESSION_TURNS {
            let excess = self.history.len() - MAX_SESSION_TURNS;
            self.history.drain(..excess);
        }

        outcome
    }

    /// Runs [`process_turn`](Self::process_turn), cancelling the model call if
    /// an interrupt arrives before the turn finishes.
    pub async fn process_turn_interruptible(
        &mut self,
        message: &str,
        today: NaiveDate,
        interrupts: &mut Interrupts,
    ) -> ChatOutcome {
        let token = CancellationToken::new();
        let turn = self.process_turn(message, today, &token);
        tokio::pin!(turn);

        loop {
            tokio::select! {
                outcome = &mut turn => return outcome,
                Some(()) = interrupts.recv() => {
                    info!("Interrupted, cancelling the model call");
                    token.cancel();
                }
            }
        }
    }
}

/// Forwards every Ctrl-C for the rest of the process to the returned channel.
///
/// The first listener replaces the default SIGINT behavior for good, so a
/// single listener lives as long as the program instead of one per turn.
pub fn listen_for_interrupts() -> Interrupts {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
        debug!("Interrupt listener stopped");
    });
    rx
}

/// Reads lines from `input` on a dedicated thread.
///
/// Blocking reads stay off the runtime, so leaving the conversation never
/// waits for the user to press Enter.
pub fn read_lines_in_background<R>(input: R) -> InputLines
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn is_exit_command(line: &str) -> bool {
    line.is_empty() || line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

/// Prints one outcome: the reply and the suggested exercise.
pub fn print_outcome<W: Write>(out: &mut W, outcome: &ChatOutcome) -> AppResult<()> {
    writeln!(out, "\n{}", outcome.response)?;
    for exercise in &outcome.recommended_exercises {
        writeln!(
            out,
            "\nSuggested exercise: {} ({}) [{}]",
            exercise.name, exercise.duration, exercise.id
        )?;
    }
    writeln!(out)?;
    Ok(())
}

/// Runs an interactive conversation over typed `input` lines.
///
/// An empty line, `quit`, `exit`, or the end of input ends it. An interrupt at
/// the prompt ends it too; an interrupt while a turn is in flight cancels that
/// turn's model call and the session continues with the canned reply.
///
/// # Errors
///
/// Returns an error only if writing output fails.
pub async fn start_conversation<S, W>(
    session: &mut ChatSession<'_, S>,
    input: &mut InputLines,
    interrupts: &mut Interrupts,
    mut out: W,
    today: impl Fn() -> NaiveDate,
) -> AppResult<()>
where
    S: BlobStorage,
    W: Write,
{
    info!("Starting chat session");

    writeln!(out, "How are you feeling today?")?;
    writeln!(out, "(Press Enter on an empty line, or type 'quit', to leave.)\n")?;

    loop {
        write!(out, "You: ")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            line = input.recv() => line,
            Some(()) = interrupts.recv() => {
                info!("Interrupted at the prompt");
                writeln!(out)?;
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if is_exit_command(line) {
            break;
        }

        let outcome = session
            .process_turn_interruptible(line, today(), interrupts)
            .await;
        print_outcome(&mut out, &outcome)?;
    }

    writeln!(out, "Take care. Come back any time.")?;
    info!("Chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AIResult;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed result and records what it was sent.
    struct ScriptedModel {
        reply: Result<String, fn() -> AIError>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn err(make: fn() -> AIError) -> Self {
            Self {
                reply: Err(make),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn chat(&self, messages: &[Message]) -> AIResult<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_successful_turn() {
        let model = ScriptedModel::ok(
            "ANALYSIS: The user shows signs of anxiety.\nRESPONSE: That sounds stressful.",
        );
        let history = vec![Message::user("I can't stop worrying")];
        let outcome =
            analyze_and_respond(&model, &history, TIMEOUT, &CancellationToken::new()).await;

        assert_eq!(outcome.response, "That sounds stressful.");
        assert_eq!(outcome.fallback, None);
        assert_eq!(outcome.recommended_exercises.len(), 1);
        assert_eq!(outcome.recommended_exercises[0].name, "Grounding Technique");
    }

    #[tokio::test]
    async fn test_prompt_uses_last_three_user_turns() {
        let model = ScriptedModel::ok("RESPONSE: ok");
        let history = vec![
            Message::user("one"),
            Message::assistant("reply"),
            Message::user("two"),
            Message::user("three"),
            Message::user("four"),
        ];
        analyze_and_respond(&model, &history, TIMEOUT, &CancellationToken::new()).await;

        let seen = model.seen.lock().unwrap();
        let prompt = &seen[0][1].content;
        assert!(prompt.contains("two\nthree\nfour"));
        assert!(!prompt.contains("one"));
    }

    #[tokio::test]
    async fn test_no_user_message() {
        let model = ScriptedModel::ok("RESPONSE: unused");
        let outcome = analyze_and_respond(
            &model,
            &[Message::assistant("hi")],
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(outcome.fallback, Some(Fallback::NoUserMessage));
        assert_eq!(outcome.response, "I'm here to help. How are you feeling today?");
        assert_eq!(outcome.recommended_exercises, vec![default_exercise()]);
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let model =
            ScriptedModel::err(|| AIError::MissingCredentials("GOOGLE_API_KEY".to_string()));
        let outcome = analyze_and_respond(
            &model,
            &[Message::user("hello")],
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcome.fallback, Some(Fallback::MissingCredentials));
        assert_eq!(outcome.recommended_exercises[0].id, "default-exercise");
    }

    #[tokio::test]
    async fn test_model_error_and_empty_reply() {
        let model = ScriptedModel::err(|| AIError::InvalidResponse("HTTP 500".to_string()));
        let outcome = analyze_and_respond(
            &model,
            &[Message::user("hello")],
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(
            outcome.response,
            "I'm thinking about what you said. In the meantime, how has your day been going?"
        );

        let model = ScriptedModel::ok("   ");
        let outcome = analyze_and_respond(
            &model,
            &[Message::user("hello")],
            TIMEOUT,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcome.fallback, Some(Fallback::Unparseable));
        assert_eq!(
            outcome.response,
            "I'm listening. Tell me more about how you're feeling."
        );
    }

    #[tokio::test]
    async fn test_session_updates_mood_and_store() {
        let storage = MemoryStorage::new();
        let model = ScriptedModel::ok("ANALYSIS: Feeling very happy today\nRESPONSE: Wonderful!");
        let mut session = ChatSession::new(&model, &storage, TIMEOUT);

        let outcome = session
            .process_turn("Great news!", today(), &CancellationToken::new())
            .await;
        assert_eq!(outcome.response, "Wonderful!");
        assert_eq!(session.history().len(), 2);

        let entries = MoodTracker::new(&storage).load(today());
        let todays = entries.iter().find(|e| e.date == today()).unwrap();
        assert_eq!(todays.value.value(), 5);

        let store = ExerciseStore::open(&storage);
        assert_eq!(store.recommended_exercises().len(), 1);
        assert_eq!(
            store.recommended_exercises()[0].name,
            "Simple Breathing Exercise"
        );
    }

    #[tokio::test]
    async fn test_fallback_turn_leaves_mood_untouched() {
        let storage = MemoryStorage::new();
        let model = ScriptedModel::err(|| AIError::Cancelled);
        let mut session = ChatSession::new(&model, &storage, TIMEOUT);

        session
            .process_turn("hello", today(), &CancellationToken::new())
            .await;

        assert!(storage
            .get_item(crate::constants::MOOD_STORAGE_KEY)
            .unwrap()
            .is_none());
        // The default exercise is still recommended
        assert_eq!(
            session.exercises().recommended_exercises(),
            &[default_exercise()]
        );
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let storage = MemoryStorage::new();
        let model = ScriptedModel::ok("RESPONSE: ok");
        let mut session = ChatSession::new(&model, &storage, TIMEOUT);

        for i in 0..15 {
            session
                .process_turn(&format!("message {}", i), today(), &CancellationToken::new())
                .await;
        }
        assert_eq!(session.history().len(), MAX_SESSION_TURNS);
        assert_eq!(session.history()[0].content, "message 5");
    }

    /// Never answers; only cancellation or the deadline ends a call.
    struct StalledModel;

    #[async_trait]
    impl ChatModel for StalledModel {
        async fn chat(&self, _messages: &[Message]) -> AIResult<String> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok("RESPONSE: too late".to_string())
        }

        fn model_name(&self) -> &str {
            "stalled"
        }
    }

    /// Input that ends after `lines`.
    fn typed(lines: &[&str]) -> InputLines {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            tx.send(line.to_string()).unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn test_conversation_loop_stops_on_quit() {
        let storage = MemoryStorage::new();
        let model = ScriptedModel::ok("ANALYSIS: calm\nRESPONSE: Glad to hear it.");
        let mut session = ChatSession::new(&model, &storage, TIMEOUT);

        let mut input = typed(&["I'm fine", "quit", "never read"]);
        let (_interrupt_tx, mut interrupts) = mpsc::unbounded_channel();
        let mut out = Vec::new();
        start_conversation(&mut session, &mut input, &mut interrupts, &mut out, today)
            .await
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Glad to hear it."));
        assert!(printed.contains("Suggested exercise: Simple Breathing Exercise"));
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_at_prompt_ends_conversation() {
        let storage = MemoryStorage::new();
        let model = ScriptedModel::ok("RESPONSE: unused");
        let mut session = ChatSession::new(&model, &storage, TIMEOUT);

        // The user never types anything; the sender stays open
        let (_input_tx, mut input) = mpsc::unbounded_channel();
        let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel();
        interrupt_tx.send(()).unwrap();

        let mut out = Vec::new();
        tokio::time::timeout(
            Duration::from_secs(5),
            start_conversation(&mut session, &mut input, &mut interrupts, &mut out, today),
        )
        .await
        .expect("conversation should end on interrupt")
        .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Take care."));
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_during_turn_cancels_only_that_turn() {
        let storage = MemoryStorage::new();
        let mut session = ChatSession::new(&StalledModel, &storage, Duration::from_secs(300));

        let mut input = typed(&["hello", "quit"]);
        let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel();
        interrupt_tx.send(()).unwrap();

        let mut out = Vec::new();
        tokio::time::timeout(
            Duration::from_secs(5),
            start_conversation(&mut session, &mut input, &mut interrupts, &mut out, today),
        )
        .await
        .expect("interrupt should cancel the stalled call")
        .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains(Fallback::ModelUnavailable.reply()));
        // The loop went on to read "quit" after the cancelled turn
        assert!(printed.contains("Take care."));
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_process_turn_interruptible_without_interrupts() {
        let storage = MemoryStorage::new();
        let model = ScriptedModel::ok("ANALYSIS: fine\nRESPONSE: Good to hear.");
        let mut session = ChatSession::new(&model, &storage, TIMEOUT);

        // A closed interrupt channel never cancels anything
        let (interrupt_tx, mut interrupts) = mpsc::unbounded_channel::<()>();
        drop(interrupt_tx);

        let outcome = session
            .process_turn_interruptible("hi", today(), &mut interrupts)
            .await;
        assert_eq!(outcome.fallback, None);
        assert_eq!(outcome.response, "Good to hear.");
    }

    #[tokio::test]
    async fn test_read_lines_in_background() {
        let mut lines = read_lines_in_background(std::io::Cursor::new("first\nsecond\n"));
        assert_eq!(lines.recv().await.as_deref(), Some("first"));
        assert_eq!(lines.recv().await.as_deref(), Some("second"));
        assert_eq!(lines.recv().await, None);
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command(""));
        assert!(is_exit_command("QUIT"));
        assert!(is_exit_command("exit"));
        assert!(!is_exit_command("quitting"));
    }
}
