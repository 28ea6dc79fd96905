use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use loreal_chat_core::{Bubble, BubbleKind, ChatBackend, SplashPhase};
use unicode_width::UnicodeWidthChar;
use crate::app::{App, InputMode};

const SPLASH_BUTTON: &str = "[ Enter ]";

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else { break };

        if close == 0 {
            // "****" has nothing to embolden
            spans.push(Span::raw(rest[..open + 4].to_string()));
            rest = &after_open[2..];
            continue;
        }

        if open > 0 {
            spans.push(Span::raw(rest[..open].to_string()));
        }
        spans.push(Span::styled(
            after_open[..close].to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render<B: ChatBackend + 'static>(app: &mut App<B>, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    if app.splash.is_present() {
        render_splash(app, frame, area);
    }
}

fn render_header<B>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" L'Oréal Smart Routine Advisor ", Style::default().fg(Color::Magenta).bold()),
        Span::styled(format!(" {} ", app.endpoint), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn bubble_lines(bubble: &Bubble, animation_frame: u8, lines: &mut Vec<Line<'static>>) {
    match bubble.kind {
        BubbleKind::User => {
            lines.push(Line::from(Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            for line in bubble.text.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        BubbleKind::Ai => {
            lines.push(Line::from(Span::styled(
                "L'Oréal Specialist:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            if bubble.is_placeholder() {
                // Animated ellipsis: cycles through ".", "..", "..."
                let dots = ".".repeat((animation_frame as usize) + 1);
                lines.push(Line::from(Span::styled(
                    format!("Thinking{}", dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            } else {
                for line in bubble.text.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
    }
    lines.push(Line::default());
}

fn render_chat<B: ChatBackend + 'static>(app: &mut App<B>, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);

    let focused = app.input_mode == InputMode::Normal && !app.splash.is_present();
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Chat ");

    let chat_text = if app.window.is_empty() {
        Text::from(Span::styled(
            "Ask about skincare, haircare, makeup or fragrance...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for bubble in app.window.bubbles() {
            bubble_lines(bubble, app.animation_frame, &mut lines);
        }
        Text::from(lines)
    };

    // Inner size minus borders
    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);

    // Measure with the same word wrapping the paragraph renders with
    let chat = Paragraph::new(chat_text).wrap(Wrap { trim: true });
    let content_height = u16::try_from(chat.line_count(inner_width)).unwrap_or(u16::MAX);
    let scroll = app.window.viewport_offset(inner_height, content_height);

    let chat = chat.block(block).scroll((scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input<B: ChatBackend + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing && !app.splash.is_present();
    let waiting = app.is_waiting();

    let border_color = if waiting {
        Color::DarkGray
    } else if editing {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if waiting {
        " Waiting for reply... "
    } else {
        " Ask me about products or routines "
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = visible_input(app.input.text(), app.input.cursor(), inner_width);

    let text_style = if waiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let input = Paragraph::new(visible_text)
        .style(text_style)
        .block(input_block);

    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

/// Slice of `text` that fits in `width` terminal columns with the cursor
/// (a char index) kept in view, plus the cursor's column in that slice.
/// Columns are display widths, so wide glyphs take two.
fn visible_input(text: &str, cursor: usize, width: usize) -> (String, u16) {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let char_width = |c: &char| UnicodeWidthChar::width(*c).unwrap_or(0);

    // Drop leading chars until the cursor cell fits
    let mut start = 0;
    let mut before_cursor: usize = chars[..cursor].iter().map(char_width).sum();
    while start < cursor && before_cursor >= width {
        before_cursor -= char_width(&chars[start]);
        start += 1;
    }

    let mut used = 0;
    let visible: String = chars[start..]
        .iter()
        .take_while(|c| {
            used += char_width(*c);
            used <= width
        })
        .collect();

    (visible, u16::try_from(before_cursor).unwrap_or(u16::MAX))
}

fn render_footer<B: ChatBackend + 'static>(app: &App<B>, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mode_style) = if app.splash.is_present() {
        (" WELCOME ", Style::default().bg(Color::Magenta).fg(Color::White))
    } else {
        match app.input_mode {
            InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
            InputMode::Editing => (" TYPING ", Style::default().bg(Color::Yellow).fg(Color::Black)),
        }
    };

    let hints = if app.splash.is_present() {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" start chatting ", label_style),
            Span::styled(" Ctrl+C ", key_style),
            Span::styled(" quit ", label_style),
        ]
    } else {
        match app.input_mode {
            InputMode::Normal => vec![
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
            InputMode::Editing => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" PgUp/PgDn ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" stop typing ", label_style),
            ],
        }
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_splash<B: ChatBackend + 'static>(app: &mut App<B>, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 9.min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    // Fading overlays are drawn dimmed until they are removed
    let fading = matches!(app.splash.phase(), Some(SplashPhase::Fading { .. }));
    let (accent, body) = if fading {
        (Color::DarkGray, Color::DarkGray)
    } else {
        (Color::Magenta, Color::White)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(" Welcome ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            "L'Oréal Smart Routine & Product Advisor",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Personalized beauty routines and product picks from the L'Oréal range.",
            Style::default().fg(body),
        )),
    ])
    .wrap(Wrap { trim: true });

    let text_height = inner.height.saturating_sub(2);
    frame.render_widget(welcome, Rect::new(inner.x, inner.y, inner.width, text_height));

    // Confirm button on the last inner row
    let button_width = (SPLASH_BUTTON.chars().count() as u16).min(inner.width);
    let button_area = Rect::new(
        inner.x + (inner.width.saturating_sub(button_width)) / 2,
        inner.y + inner.height.saturating_sub(1),
        button_width,
        1.min(inner.height),
    );
    let button_style = if fading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().bg(Color::Magenta).fg(Color::White).add_modifier(Modifier::BOLD)
    };
    frame.render_widget(Paragraph::new(SPLASH_BUTTON).style(button_style), button_area);

    app.splash_button_area = Some(button_area);
}
