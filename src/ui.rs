use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use anaquiz::art::ResolveState;
use anaquiz::dataset::Region;
use anaquiz::glossary::matching_terms;
use anaquiz::naming::split_display_name;
use anaquiz::session::Mode;

use crate::{App, Prompt};

const HORIZONTAL_MARGIN: u16 = 3;
const VERTICAL_MARGIN: u16 = 1;

/// Letters used to label option buttons, in display order. Kept clear of
/// the command keys (n/f/u/t/l/r/m) so an option can never shadow one.
pub const OPTION_KEYS: [char; 4] = ['a', 'b', 'c', 'd'];

pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.session.state.mode {
            Mode::Practice | Mode::Review => render_question(self, area, buf),
            Mode::Summary => render_summary(self, area, buf),
        }
    }
}

fn render_question(app: &App, area: Rect, buf: &mut Buffer) {
    let state = &app.session.state;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let option_lines = state.shuffled_options.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),                // readouts
            Constraint::Length(1),                // region selector
            Constraint::Min(6),                   // pose art
            Constraint::Length(2),                // pose name
            Constraint::Length(option_lines + 1), // options
            Constraint::Length(3),                // feedback + glossary
            Constraint::Length(1),                // footer / prompt
        ])
        .split(area);

    // readouts
    let readout = match state.mode {
        Mode::Review => format!(
            "REVIEW  {}/{}",
            state.review_index + 1,
            state.wrong_answers.len()
        ),
        _ => format!(
            "score {}   streak {} (best {})   {}",
            state.score,
            state.streak,
            state.best_streak,
            format_elapsed(state.elapsed_secs)
        ),
    };
    Paragraph::new(Span::styled(readout, bold))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    // region selector; rendered disabled (dimmed) while the question is
    // answered in practice, and always pinned in review
    let active = app.session.active_region();
    let selector_locked = state.mode == Mode::Review || state.is_answered;
    let mut region_spans: Vec<Span> = vec![Span::styled("region: ", dim)];
    for (i, region) in Region::ALL.iter().enumerate() {
        if i > 0 {
            region_spans.push(Span::raw("  "));
        }
        let style = if *region == active {
            bold.fg(Color::Cyan)
        } else if selector_locked {
            dim
        } else {
            Style::default()
        };
        region_spans.push(Span::styled(format!("[{}]", region.label()), style));
    }
    if selector_locked {
        region_spans.push(Span::styled("  (locked)", dim));
    } else {
        region_spans.push(Span::styled("  (u/t/l)", dim));
    }
    Paragraph::new(Line::from(region_spans))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    render_art(app, chunks[2], buf);

    // pose name: primary bold, alias dim italic beneath it
    if let Some(pose) = app.session.current_pose() {
        let name = split_display_name(&pose.name);
        Paragraph::new(Span::styled(name.primary.clone(), bold))
            .alignment(Alignment::Center)
            .render(
                Rect {
                    height: 1,
                    ..chunks[3]
                },
                buf,
            );
        if !name.secondary.is_empty() {
            let secondary = Paragraph::new(Span::styled(
                name.secondary,
                dim.add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center);
            secondary.render(
                Rect {
                    y: chunks[3].y + 1,
                    height: 1,
                    ..chunks[3]
                },
                buf,
            );
        }
    }

    // options, lettered, with correctness colors once answered
    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "Which muscle is highlighted?",
        dim,
    ))];
    for (i, opt) in state.shuffled_options.iter().enumerate() {
        let key = OPTION_KEYS.get(i).copied().unwrap_or('?');
        let selected = state.selected_option_id.as_deref() == Some(opt.id.as_str());

        let style = if state.is_answered {
            if opt.correct {
                bold.fg(Color::Green)
            } else if selected {
                bold.fg(Color::Red)
            } else {
                dim
            }
        } else {
            Style::default()
        };

        let marker = if selected { ">" } else { " " };
        lines.push(Line::from(Span::styled(
            format!("{} {}) {}", marker, key, opt.text),
            style,
        )));
    }
    Paragraph::new(lines).render(chunks[4], buf);

    render_feedback(app, chunks[5], buf);

    // footer, or the finish-early confirmation in its place
    let footer = match app.prompt {
        Prompt::ConfirmFinish => Span::styled(
            "End the session early? (y/n)",
            bold.fg(Color::Yellow),
        ),
        Prompt::None => {
            let hints = match state.mode {
                Mode::Review => "answer to check yourself | (n)ext | (esc) quit",
                _ => "(a-d) answer | (u/t/l) region | (n)ext | (f)inish | (esc) quit",
            };
            Span::styled(hints, dim.add_modifier(Modifier::ITALIC))
        }
    };
    Paragraph::new(footer)
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}

fn render_art(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title("pose");

    match app.resolver.state() {
        ResolveState::Resolved(art) => {
            let width = area.width.saturating_sub(2) as usize;
            let alignment = if art.lines().all(|l| l.width() <= width) {
                Alignment::Center
            } else {
                Alignment::Left
            };
            Paragraph::new(art.clone())
                .block(block)
                .alignment(alignment)
                .render(area, buf);
        }
        ResolveState::NotFound(diag) => {
            let text = vec![
                Line::from(Span::styled(
                    "illustration unavailable",
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    format!(
                        "pose {}: {} locations tried, last {}",
                        diag.pose_id, diag.candidates_tried, diag.last_candidate
                    ),
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ];
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
        _ => {
            Paragraph::new("").block(block).render(area, buf);
        }
    }
}

fn render_feedback(app: &App, area: Rect, buf: &mut Buffer) {
    let state = &app.session.state;
    if !state.is_answered {
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    if state.is_correct {
        lines.push(Line::from(Span::styled(
            "Correct!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
    } else {
        let answer = app
            .session
            .correct_option()
            .map(|o| o.text.clone())
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("Incorrect — the answer is {}", answer),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(correct) = app.session.correct_option() {
        let glossary = &app.session.dataset().glossary;
        let terms = matching_terms(glossary, &correct.text);
        if let Some(first) = terms.first() {
            lines.push(Line::from(Span::styled(
                format!("{}: {}", first.term, first.definition),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        if terms.len() > 1 {
            let rest: Vec<String> = terms[1..].iter().map(|e| e.term.clone()).collect();
            lines.push(Line::from(Span::styled(
                format!("related: {}", rest.join(", ")),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_summary(app: &App, area: Rect, buf: &mut Buffer) {
    let state = &app.session.state;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(6), // stats
            Constraint::Min(1),    // padding
            Constraint::Length(1), // actions
        ])
        .split(area);

    Paragraph::new(Span::styled("session complete", bold.fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let repeats = state.seen_counts.values().filter(|&&n| n > 1).count();
    let stats = vec![
        Line::from(Span::styled(format!("final score  {}", state.score), bold)),
        Line::from(Span::raw(format!("best streak  {}", state.best_streak))),
        Line::from(Span::raw(format!(
            "answered     {}",
            state.total_answered
        ))),
        Line::from(Span::raw(format!(
            "missed       {}",
            state.wrong_answers.len()
        ))),
        Line::from(Span::raw(format!(
            "total time   {}",
            format_elapsed(state.elapsed_secs)
        ))),
        Line::from(Span::styled(
            format!("poses shown more than once: {}", repeats),
            dim,
        )),
    ];
    Paragraph::new(stats)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let actions = if state.wrong_answers.is_empty() {
        "(r)estart | (esc) quit"
    } else {
        "(r)estart | (m) review mistakes | (esc) quit"
    };
    Paragraph::new(Span::styled(actions, dim.add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}
