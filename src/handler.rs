use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use loreal_chat_core::{ChatBackend, SplashPhase};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

const WHEEL_LINES: u16 = 3;
const PAGE_LINES: u16 = 10;

pub fn handle_event<B: ChatBackend + 'static>(app: &mut App<B>, event: AppEvent, tx: &UnboundedSender<AppEvent>) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse, Instant::now()),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(Instant::now()),
        AppEvent::Reply { turn, outcome } => {
            app.apply_reply(turn, outcome);
        }
    }
}

fn handle_key<B: ChatBackend + 'static>(app: &mut App<B>, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The overlay swallows everything except its confirm key
    if app.splash.blocks_input() {
        if key.code == KeyCode::Enter && app.splash.phase() == Some(SplashPhase::Visible) {
            app.confirm_splash(Instant::now());
        }
        return;
    }

    match key.code {
        KeyCode::PageUp => {
            app.window.scroll_up(PAGE_LINES);
            return;
        }
        KeyCode::PageDown => {
            app.window.scroll_down(PAGE_LINES);
            return;
        }
        _ => {}
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key, tx),
    }
}

fn handle_normal_mode<B: ChatBackend + 'static>(app: &mut App<B>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab => app.input_mode = InputMode::Editing,
        KeyCode::Char('j') | KeyCode::Down => app.window.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.window.scroll_up(1),
        KeyCode::Char('g') => app.window.scroll_up(u16::MAX),
        KeyCode::Char('G') => app.window.scroll_to_bottom(),
        _ => {}
    }
}

fn handle_editing_mode<B: ChatBackend + 'static>(app: &mut App<B>, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // Ignored for blank input or while a reply is outstanding
            if let Some(pending) = app.submit() {
                app.spawn_turn(pending, tx.clone());
            }
        }
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(c) => app.input.insert(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse<B: ChatBackend + 'static>(app: &mut App<B>, mouse: MouseEvent, now: Instant) {
    let x = mouse.column;
    let y = mouse.row;

    if app.splash.blocks_input() {
        // Only a click on the button itself counts; clicks elsewhere are ignored
        let on_button = app.splash_button_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) && on_button {
            app.confirm_splash(now);
        }
        return;
    }

    let in_chat = app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.window.scroll_down(WHEEL_LINES),
        MouseEventKind::ScrollUp => app.window.scroll_up(WHEEL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use loreal_chat_core::{ChatMessage, ChatRole, Resolution};
    use std::time::Duration;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    fn type_text(app: &mut App<crate::app::tests::EchoBackend>, text: &str, tx: &UnboundedSender<AppEvent>) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)), tx);
        }
    }

    #[test]
    fn test_only_confirm_dismisses_splash() {
        let mut app = test_app(true);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        app.splash_button_area = Some(Rect::new(10, 10, 9, 1));

        handle_event(&mut app, key(KeyCode::Esc), &tx);
        handle_event(&mut app, key(KeyCode::Char('q')), &tx);
        handle_event(&mut app, key(KeyCode::Char('x')), &tx);
        handle_mouse(&mut app, click(MouseEventKind::Down(MouseButton::Left), 0, 0), Instant::now());
        handle_mouse(&mut app, click(MouseEventKind::Down(MouseButton::Right), 12, 10), Instant::now());
        app.tick(Instant::now() + Duration::from_secs(30));

        assert_eq!(app.splash.phase(), Some(SplashPhase::Visible));
        assert!(!app.should_quit);
        assert_eq!(app.input.text(), "");

        handle_event(&mut app, key(KeyCode::Enter), &tx);
        assert!(app.splash.is_fading());
        // Still blocking during the fade
        handle_event(&mut app, key(KeyCode::Char('x')), &tx);
        assert_eq!(app.input.text(), "");
    }

    #[test]
    fn test_click_on_button_dismisses_splash() {
        let mut app = test_app(true);
        app.splash_button_area = Some(Rect::new(10, 10, 9, 1));
        let now = Instant::now();

        handle_mouse(&mut app, click(MouseEventKind::Down(MouseButton::Left), 12, 10), now);
        assert!(app.splash.is_fading());

        app.tick(now + Duration::from_millis(600));
        assert_eq!(app.splash.phase(), Some(SplashPhase::Removed));
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_ctrl_c_quits_even_behind_splash() {
        let mut app = test_app(true);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let ctrl_c = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        handle_event(&mut app, ctrl_c, &tx);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_enter_submits_and_reply_event_resolves() {
        let mut app = test_app(false);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        type_text(&mut app, "dry skin", &tx);
        handle_event(&mut app, key(KeyCode::Enter), &tx);

        assert_eq!(app.input.text(), "");
        assert!(app.is_waiting());
        assert!(app.window.has_placeholder());

        // A second Enter while waiting does nothing
        type_text(&mut app, "again", &tx);
        handle_event(&mut app, key(KeyCode::Enter), &tx);
        assert_eq!(app.input.text(), "again");
        assert_eq!(app.controller.conversation().len(), 2);

        let event = rx.recv().await.unwrap();
        handle_event(&mut app, event, &tx);

        assert!(!app.is_waiting());
        assert!(!app.window.has_placeholder());
        let messages = app.controller.conversation().messages();
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1], ChatMessage::user("dry skin"));
        assert_eq!(messages[2], ChatMessage::assistant("DRY SKIN"));
    }

    #[tokio::test]
    async fn test_blank_enter_sends_nothing() {
        let mut app = test_app(false);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        type_text(&mut app, "   ", &tx);
        handle_event(&mut app, key(KeyCode::Enter), &tx);

        assert!(!app.is_waiting());
        assert_eq!(app.window.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reply_for_unknown_turn_is_stale() {
        let mut app = test_app(false);
        let resolution = app.apply_reply(loreal_chat_core::TurnId::new(7), Ok("late".to_string()));
        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(app.window.len(), 1);
    }

    #[test]
    fn test_normal_mode_keys() {
        let mut app = test_app(false);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        handle_event(&mut app, key(KeyCode::Esc), &tx);
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_event(&mut app, key(KeyCode::Char('k')), &tx);
        assert!(!app.window.is_pinned_to_bottom());
        handle_event(&mut app, key(KeyCode::Char('G')), &tx);
        assert!(app.window.is_pinned_to_bottom());

        handle_event(&mut app, key(KeyCode::Char('i')), &tx);
        assert_eq!(app.input_mode, InputMode::Editing);

        handle_event(&mut app, key(KeyCode::Esc), &tx);
        handle_event(&mut app, key(KeyCode::Char('q')), &tx);
        assert!(app.should_quit);
    }

    #[test]
    fn test_resize_only_triggers_redraw() {
        let mut app = test_app(false);
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        type_text(&mut app, "serum", &tx);

        handle_event(&mut app, AppEvent::Resize(40, 12), &tx);

        assert_eq!(app.input.text(), "serum");
        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.window.is_pinned_to_bottom());
    }
}
