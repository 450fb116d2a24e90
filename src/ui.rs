use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::App;
use crate::message::{Message, Sender};

const USER_COLOR: Color = Color::Cyan;
const BOT_COLOR: Color = Color::Yellow;

/// Visual block for one transcript entry.
///
/// Depends only on the message: user text sits on the right in cyan, bot
/// text on the left in yellow. The text itself is shown verbatim.
pub fn render_message(message: &Message) -> Text<'static> {
    let (label, color, alignment) = match message.sender {
        Sender::User => ("You", USER_COLOR, Alignment::Right),
        Sender::Bot => ("Bot", BOT_COLOR, Alignment::Left),
    };

    let mut lines = vec![Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(alignment)];

    for line in message.text.lines() {
        let text_style = match message.sender {
            Sender::User => Style::default().fg(color),
            Sender::Bot => Style::default(),
        };
        lines.push(Line::from(Span::styled(line.to_string(), text_style)).alignment(alignment));
    }

    Text::from(lines)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_transcript(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Holoware ", Style::default().fg(Color::White).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Blue));
    frame.render_widget(header, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, for scroll calculations
    app.chat_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = if app.conversation.is_empty() && !app.is_waiting() {
        Text::from(Span::styled(
            "Ask a medical question to get started.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();

        for message in app.conversation.messages() {
            lines.extend(render_message(message).lines);
            lines.push(Line::default());
        }

        if app.is_waiting() {
            lines.push(Line::from(Span::styled(
                "Bot",
                Style::default().fg(BOT_COLOR).add_modifier(Modifier::BOLD),
            )));
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Thinking{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        Text::from(lines)
    };

    // Leading whitespace is part of the message, so wrapping must not trim
    let transcript = Paragraph::new(text).wrap(Wrap { trim: false });

    app.transcript_rows = if inner_width == 0 {
        0
    } else {
        u16::try_from(transcript.line_count(inner_width)).unwrap_or(u16::MAX)
    };
    app.sync_scroll();

    let transcript = transcript.block(block).scroll((app.scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Enter to send ");

    // Horizontal scrolling keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.conversation.cursor();
    let scroll_offset = if inner_width == 0 {
        0
    } else {
        (cursor_pos + 1).saturating_sub(inner_width)
    };

    let input = if app.conversation.input().is_empty() {
        Paragraph::new(Span::styled(
            "Type your question here",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible_text: String = app
            .conversation
            .input()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(USER_COLOR))
    };

    frame.render_widget(input.block(block), area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.endpoint),
        Style::default().bg(Color::DarkGray).fg(Color::White),
    )];

    if app.is_waiting() {
        spans.push(Span::styled(
            format!(" {} pending ", app.conversation.in_flight()),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(failure) = app.conversation.last_failure() {
        spans.push(Span::styled(
            format!(" Last request failed: {} ", failure),
            Style::default().fg(Color::Red),
        ));
    }

    spans.push(Span::styled(
        " ↑↓ scroll  Esc quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
