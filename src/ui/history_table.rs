use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::classifier::Personality;
use crate::history::SessionRecord;

fn personality_color(p: Personality) -> Color {
    match p {
        Personality::Focused => Color::Green,
        Personality::Neutral => Color::Yellow,
        Personality::Stressed => Color::Red,
    }
}

fn accuracy_color(accuracy: f64) -> Color {
    if accuracy >= 95.0 {
        Color::Green
    } else if accuracy >= 80.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Relative age of a record, e.g. "2 minutes ago"
pub fn age_label(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let age = (now - then).to_std().unwrap_or_default();
    HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past)
}

/// Pure presenter for a single history row
pub fn present_row(record: &SessionRecord, now: DateTime<Local>) -> Row<'static> {
    Row::new(vec![
        Cell::from(age_label(record.timestamp, now)),
        Cell::from(record.user_name.clone().unwrap_or_else(|| "-".into())),
        Cell::from(format!("{:.3}", record.average_delay_secs)),
        Cell::from(format!("{:.1}", record.total_time_secs)),
        Cell::from(record.hesitations.to_string()),
        Cell::from(format!("{:.1}", record.words_per_minute)),
        Cell::from(format!("{:.1}", record.chars_per_minute)),
        Cell::from(format!("{:.1}", record.accuracy_percent))
            .style(Style::default().fg(accuracy_color(record.accuracy_percent))),
        Cell::from(record.personality.to_string())
            .style(Style::default().fg(personality_color(record.personality))),
    ])
}

/// Newest attempts first, as many as fit
pub fn render_history(f: &mut Frame, area: Rect, records: &[SessionRecord], now: DateTime<Local>) {
    let visible = area.height.saturating_sub(3) as usize;

    let header = Row::new(vec![
        "When", "Name", "Delay", "Time", "Hes.", "WPM", "CPM", "Acc %", "Personality",
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = records
        .iter()
        .rev()
        .take(visible)
        .map(|r| present_row(r, now))
        .collect();

    let title = if records.len() > visible {
        format!("Session history ({}/{} attempts)", visible, records.len())
    } else {
        format!("Session history ({} attempts)", records.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(9),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn age_label_is_in_the_past() {
        let now = Local.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let label = age_label(now - Duration::minutes(5), now);
        assert!(label.contains("ago"), "unexpected label {label}");
    }

    #[test]
    fn accuracy_colors_band() {
        assert_eq!(accuracy_color(100.0), Color::Green);
        assert_eq!(accuracy_color(85.0), Color::Yellow);
        assert_eq!(accuracy_color(10.0), Color::Red);
    }
}
