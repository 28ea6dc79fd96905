use std::time::Instant;

use loreal_chat_core::{
    run_turn, BubbleKind, ChatBackend, ChatError, ChatWindow, Config, Conversation, InputLine,
    PendingTurn, Resolution, SplashGate, SplashOutcome, SubmissionController, TurnId,
    WorkerClient,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App<B = WorkerClient> {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Chat state
    pub input: InputLine,
    pub window: ChatWindow,
    pub controller: SubmissionController<B>,
    pub splash: SplashGate,
    pub endpoint: String,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub splash_button_area: Option<Rect>,
}

impl App<WorkerClient> {
    pub fn new(config: &Config) -> Self {
        Self::with_backend(config, WorkerClient::new(&config.endpoint))
    }
}

impl<B: ChatBackend + 'static> App<B> {
    pub fn with_backend(config: &Config, backend: B) -> Self {
        let splash = SplashGate::from_config(config.show_splash);

        let mut window = ChatWindow::new();
        if !config.greeting.is_empty() {
            window.append(BubbleKind::Ai, config.greeting.clone());
        }

        // Without a splash the input is focused right away
        let input_mode = if splash.is_present() {
            InputMode::Normal
        } else {
            InputMode::Editing
        };

        Self {
            should_quit: false,
            input_mode,

            input: InputLine::new(),
            window,
            controller: SubmissionController::new(Conversation::new(), backend),
            splash,
            endpoint: config.endpoint.clone(),

            animation_frame: 0,

            chat_area: None,
            splash_button_area: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.controller.is_pending()
    }

    /// The splash was confirmed. Focus follows once the fade completes.
    pub fn confirm_splash(&mut self, now: Instant) {
        self.splash.confirm(now);
    }

    /// Start a turn from the input line, focusing the input again afterwards.
    pub fn submit(&mut self) -> Option<PendingTurn> {
        let pending = self.controller.begin(&mut self.input, &mut self.window)?;
        self.input_mode = InputMode::Editing;
        self.animation_frame = 0;
        Some(pending)
    }

    /// Run the request for `pending` in the background and post the outcome
    /// back to the event loop.
    pub fn spawn_turn(&self, pending: PendingTurn, tx: UnboundedSender<AppEvent>) {
        let backend = self.controller.backend();
        tokio::spawn(async move {
            let turn = pending.id;
            let outcome = run_turn(backend, pending).await;
            if tx.send(AppEvent::Reply { turn, outcome }).is_err() {
                tracing::debug!(turn = %turn, "event loop gone before reply arrived");
            }
        });
    }

    pub fn apply_reply(&mut self, turn: TurnId, outcome: Result<String, ChatError>) -> Resolution {
        self.controller.resolve(turn, outcome, &mut self.window)
    }

    /// Tick animation frame and the splash fade (called by Tick event)
    pub fn tick(&mut self, now: Instant) {
        if self.splash.tick(now) == SplashOutcome::FocusInput {
            self.input_mode = InputMode::Editing;
            self.splash_button_area = None;
        }

        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use loreal_chat_core::{ChatMessage, SplashPhase};
    use std::time::Duration;

    /// Replies with the last message, uppercased.
    pub(crate) struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
            Ok(messages.last().map(|m| m.content.to_uppercase()).unwrap_or_default())
        }
    }

    pub(crate) fn test_app(show_splash: bool) -> App<EchoBackend> {
        let config = Config {
            show_splash,
            ..Config::default()
        };
        App::with_backend(&config, EchoBackend)
    }

    #[test]
    fn test_starts_behind_splash_with_greeting() {
        let app = test_app(true);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.splash.blocks_input());
        assert_eq!(app.window.len(), 1);
        assert_eq!(app.window.bubbles()[0].kind, BubbleKind::Ai);
        // The greeting is display only
        assert_eq!(app.controller.conversation().len(), 1);
    }

    #[test]
    fn test_no_splash_focuses_input() {
        let app = test_app(false);
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(!app.splash.blocks_input());
    }

    #[test]
    fn test_splash_fade_focuses_input() {
        let mut app = test_app(true);
        let start = Instant::now();
        app.tick(start + Duration::from_secs(5));
        assert_eq!(app.input_mode, InputMode::Normal);

        app.confirm_splash(start);
        app.tick(start + Duration::from_millis(300));
        assert_eq!(app.splash.phase().map(|p| matches!(p, SplashPhase::Fading { .. })), Some(true));
        app.tick(start + Duration::from_millis(600));
        assert_eq!(app.splash.phase(), Some(SplashPhase::Removed));
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[tokio::test]
    async fn test_submit_and_apply_reply() {
        let mut app = test_app(false);
        app.input = InputLine::with_text("  serum?  ");
        app.input_mode = InputMode::Normal;

        let pending = app.submit().unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.input.text(), "");
        assert!(app.is_waiting());

        app.tick(Instant::now());
        assert_eq!(app.animation_frame, 1);

        let outcome = run_turn(app.controller.backend(), pending.clone()).await;
        let resolution = app.apply_reply(pending.id, outcome);
        assert_eq!(resolution, Resolution::Replied("SERUM?".to_string()));
        assert_eq!(app.controller.conversation().last(), Some(&ChatMessage::assistant("SERUM?")));
        assert!(!app.window.has_placeholder());
    }

    #[tokio::test]
    async fn test_spawned_turn_reports_back() {
        let mut app = test_app(false);
        app.input = InputLine::with_text("hello");
        let pending = app.submit().unwrap();
        let id = pending.id;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        app.spawn_turn(pending, tx);

        match rx.recv().await {
            Some(AppEvent::Reply { turn, outcome }) => {
                assert_eq!(turn, id);
                assert_eq!(outcome.unwrap(), "HELLO");
            }
            other => panic!("expected reply event, got {:?}", other),
        }
    }
}
