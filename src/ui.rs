pub mod charting;
pub mod history_table;
pub mod screen;

use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Notice, Phase};
use crate::history;
use crate::sentences::SENTENCES;

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Draw the whole app for the current phase
pub fn draw(f: &mut Frame, app: &App, now: DateTime<Local>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Min(1),    // screen
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(f.area());

    let title = Paragraph::new(vec![
        Line::from(Span::styled("ThinkType", bold().fg(Color::Cyan))),
        Line::from(Span::styled(
            "Discover your mental state through how you type",
            italic(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    screen::current_screen(app.phase).render(app, f, chunks[1], now);

    if let Some(notice) = &app.notice {
        f.render_widget(notice_line(notice), chunks[2]);
    }

    f.render_widget(
        Paragraph::new(Span::styled(legend(app), italic())),
        chunks[3],
    );
}

fn notice_line(notice: &Notice) -> Paragraph<'static> {
    let (text, color) = match notice {
        Notice::Info(msg) => (msg.clone(), Color::Green),
        Notice::Warning(msg) => (msg.clone(), Color::Yellow),
        Notice::Error(msg) => (msg.clone(), Color::Red),
    };
    Paragraph::new(Span::styled(text, bold().fg(color))).alignment(Alignment::Center)
}

pub fn legend(app: &App) -> &'static str {
    if app.name_draft.is_some() {
        return "(enter) save name / (esc) cancel";
    }
    match app.phase {
        Phase::Typing => "(enter) submit / (esc) abandon / (ctrl+u) clear",
        Phase::Setup | Phase::Results => {
            "(enter) start / (←→) sentence / (r)andom / (l)ive stats / (+-) threshold / (n)ame / (d)ownload csv / (x) reset / (esc)ape"
        }
    }
}

fn name_spans(app: &App) -> Vec<Span<'static>> {
    match &app.name_draft {
        Some(draft) => vec![
            Span::styled(draft.clone(), bold().fg(Color::Yellow)),
            Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
        ],
        None => vec![Span::styled(
            app.config.user_name.clone().unwrap_or_else(|| "-".into()),
            bold(),
        )],
    }
}

/// Rows needed to wrap `text` at `width`, saturating for huge inputs
fn wrapped_rows(text: &str, width: usize) -> u16 {
    u16::try_from(text.width() / width.max(1))
        .unwrap_or(u16::MAX)
        .saturating_add(1)
}

fn settings_line(app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::styled("Hesitation threshold: ", dim()),
        Span::styled(format!("{:.1}s", app.tracker.hesitation_threshold()), bold()),
        Span::styled("   Live stats: ", dim()),
        Span::styled(
            if app.config.show_live_stats { "ON" } else { "OFF" },
            bold(),
        ),
        Span::styled("   Name: ", dim()),
    ];
    spans.extend(name_spans(app));
    Line::from(spans)
}

fn sentence_list(app: &App) -> Paragraph<'static> {
    let lines: Vec<Line> = SENTENCES
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if i == app.sentence.index() {
                Line::from(Span::styled(format!("> {}. {s}", i + 1), bold().fg(Color::Cyan)))
            } else {
                Line::from(Span::styled(format!("  {}. {s}", i + 1), dim()))
            }
        })
        .collect();

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Choose a sentence to type"),
    )
}

pub(crate) fn render_setup(app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>) {
    let has_history = !app.tracker.history().is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // sentences
            Constraint::Length(1), // settings
            Constraint::Length(1), // padding
            Constraint::Min(if has_history { 4 } else { 0 }),
        ])
        .split(area);

    f.render_widget(sentence_list(app), chunks[0]);
    f.render_widget(
        Paragraph::new(settings_line(app)).alignment(Alignment::Center),
        chunks[1],
    );

    if has_history {
        history_table::render_history(f, chunks[3], app.tracker.history(), now);
    }
}

/// Typed characters coloured against the target, then a cursor cell
pub fn typed_spans(typed: &str, target: &str) -> Vec<Span<'static>> {
    let mut expected = target.chars();
    let mut spans: Vec<Span> = typed
        .chars()
        .map(|c| {
            let style = if expected.next() == Some(c) {
                bold().fg(Color::Green)
            } else {
                bold().fg(Color::Red)
            };
            let shown = if c == ' ' && style.fg == Some(Color::Red) {
                "·".to_string()
            } else {
                c.to_string()
            };
            Span::styled(shown, style)
        })
        .collect();
    spans.push(Span::styled(
        " ",
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    spans
}

pub(crate) fn render_typing(app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>) {
    let target = app.target();
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let prompt_lines = wrapped_rows(target, inner_width);
    let typed_lines = wrapped_rows(app.tracker.current_text(), inner_width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(prompt_lines.saturating_add(2)),
            Constraint::Length(typed_lines.saturating_add(2)),
            Constraint::Length(1), // progress
            Constraint::Length(1), // padding
            Constraint::Length(if app.config.show_live_stats { 5 } else { 0 }),
            Constraint::Min(0),
        ])
        .split(area);

    let prompt = Paragraph::new(Span::styled(target, bold()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Type the sentence below and press Enter when done"),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(prompt, chunks[0]);

    let input = Paragraph::new(Line::from(typed_spans(app.tracker.current_text(), target)))
        .block(Block::default().borders(Borders::ALL).title("Start typing here"))
        .wrap(Wrap { trim: false });
    f.render_widget(input, chunks[1]);

    let progress = app.progress();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[2]);

    if app.config.show_live_stats {
        let stats = app.live_stats(now);
        let live = Paragraph::new(vec![
            Line::from(format!("Characters typed: {}", stats.char_count)),
            Line::from(format!("Time elapsed: {:.1} s", stats.elapsed_secs)),
            Line::from(format!("Hesitations: {}", stats.hesitations)),
        ])
        .block(Block::default().borders(Borders::ALL).title("Live stats"));
        f.render_widget(live, chunks[4]);
    }
}

pub(crate) fn render_results(app: &App, f: &mut Frame, area: Rect, now: DateTime<Local>) {
    let records = app.tracker.history();
    let show_chart = records.len() >= 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // personality
            Constraint::Length(1), // metrics
            Constraint::Length(1), // settings
            Constraint::Length(1), // padding
            Constraint::Length(if show_chart { 10 } else { 0 }),
            Constraint::Min(3),
        ])
        .split(area);

    if let Some(record) = &app.last_record {
        let personality = Paragraph::new(Line::from(vec![
            Span::raw("Personality: "),
            Span::styled(record.personality.to_string(), bold().fg(Color::Magenta)),
            Span::raw(" - "),
            Span::styled(record.personality.description(), italic()),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(personality, chunks[0]);

        let metrics = Paragraph::new(Span::styled(
            format!(
                "Delay {:.3}s   Time {:.1}s   Hesitations {}   {:.1} wpm   {:.1} cpm   {:.1}% acc",
                record.average_delay_secs,
                record.total_time_secs,
                record.hesitations,
                record.words_per_minute,
                record.chars_per_minute,
                record.accuracy_percent,
            ),
            bold(),
        ))
        .alignment(Alignment::Center);
        f.render_widget(metrics, chunks[1]);
    }

    f.render_widget(
        Paragraph::new(settings_line(app)).alignment(Alignment::Center),
        chunks[2],
    );

    if show_chart {
        render_trend(f, chunks[4], records);
    }

    if !records.is_empty() {
        history_table::render_history(f, chunks[5], records, now);
    } else {
        f.render_widget(
            Paragraph::new(Span::styled("History is empty.", dim())).alignment(Alignment::Center),
            chunks[5],
        );
    }
}

fn render_trend(f: &mut Frame, area: Rect, records: &[history::SessionRecord]) {
    let (wpm, accuracy) = history::trend(records);
    let (attempts, highest) = charting::compute_chart_params(&wpm, &accuracy);

    let wpm_data: Vec<(f64, f64)> = wpm.into_iter().map(Into::into).collect();
    let accuracy_data: Vec<(f64, f64)> = accuracy.into_iter().map(Into::into).collect();

    let datasets = vec![
        Dataset::default()
            .name("wpm")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&wpm_data),
        Dataset::default()
            .name("accuracy %")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Cyan))
            .graph_type(GraphType::Line)
            .data(&accuracy_data),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Trend"))
        .x_axis(
            Axis::default()
                .title("attempt")
                .bounds([1.0, attempts])
                .labels(vec![
                    Span::styled("1", bold()),
                    Span::styled(charting::format_label(attempts), bold()),
                ]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, highest])
                .labels(vec![
                    Span::styled("0", bold()),
                    Span::styled(charting::format_label(highest), bold()),
                ]),
        );

    f.render_widget(chart, area);
}
