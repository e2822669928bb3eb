pub mod art;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use thump::{
    judge::JudgmentKind,
    lessons::Lesson,
    session::{GameState, Snapshot},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn centered(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
}

/// Splits `area` into a vertically centered band of `height` rows.
fn middle_band(area: Rect, height: u16) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    chunks[1]
}

pub struct HomeView;

impl Widget for HomeView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let red_bold = bold().fg(Color::Red);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("CPR Heroes ", bold()),
                Span::styled("♥", red_bold),
            ]),
            Line::from(Span::styled("Learn to save a life, the fun way!", dim())),
            Line::default(),
        ];
        lines.extend(art::art_lines(&art::HEART, red_bold));
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("[1] ", bold().fg(Color::Cyan)),
            Span::raw("Learn CPR"),
            Span::raw("      "),
            Span::styled("[2] ", bold().fg(Color::Green)),
            Span::raw("Play Game"),
        ]));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("(q)uit", dim())));

        let height = lines.len() as u16;
        centered(lines).render(middle_band(area, height), buf);
    }
}

pub struct LearnView<'a> {
    pub lesson: &'a Lesson,
}

impl Widget for LearnView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let step = self.lesson.step();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Min(8),    // card
                Constraint::Length(1), // position
                Constraint::Length(1), // navigation
            ])
            .split(area);

        Paragraph::new(Span::styled(step.title, bold().fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let visual = match self.lesson.index() {
            0 => art::art_lines(&art::CHECK_RESPONSE, bold()),
            1 => art::art_lines(&art::CALL_FOR_HELP, bold()),
            4 => art::art_lines(&art::HEART_BEAT, bold().fg(Color::Red)),
            _ => {
                let rescuer = if self.lesson.shows_compression() {
                    &art::RESCUER_PRESSING
                } else {
                    &art::RESCUER_READY
                };
                let mut rows = art::art_lines(rescuer, bold());
                rows.extend(art::art_lines(&art::PATIENT, dim()));
                rows
            }
        };
        let mut card = visual;
        card.push(Line::default());
        card.push(Line::from(step.description));

        centered(card)
            .block(Block::default().borders(Borders::ALL))
            .render(chunks[1], buf);

        Paragraph::new(self.lesson.position())
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let prev = if self.lesson.has_prev() {
            "← prev   "
        } else {
            "         "
        };
        let next = if self.lesson.has_next() {
            "   next →"
        } else {
            "         "
        };
        Paragraph::new(Line::from(vec![
            Span::styled(prev, bold()),
            Span::styled("(esc) back to menu", dim()),
            Span::styled(next, bold()),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}

pub struct GameView {
    pub snapshot: Snapshot,
}

impl Widget for GameView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.snapshot.state {
            GameState::Idle => render_idle(area, buf),
            GameState::Countdown => render_countdown(&self.snapshot, area, buf),
            GameState::Playing => render_playing(&self.snapshot, area, buf),
            GameState::Finished => render_finished(&self.snapshot, area, buf),
        }
    }
}

fn render_idle(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled("Ready to Play?", bold())),
        Line::default(),
        Line::from("Tap space or click in rhythm with the heart!"),
        Line::default(),
        Line::from(vec![
            Span::styled("(enter) ", bold().fg(Color::Green)),
            Span::raw("start game   "),
            Span::styled("(esc) back", dim()),
        ]),
    ];
    centered(lines).render(middle_band(area, 5), buf);
}

fn render_countdown(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let text = if snap.countdown > 0 {
        snap.countdown.to_string()
    } else {
        "Go!".to_string()
    };
    let lines = vec![Line::from(Span::styled(
        text,
        bold().fg(Color::Yellow).add_modifier(Modifier::RAPID_BLINK),
    ))];
    centered(lines).render(middle_band(area, 1), buf);
}

fn render_playing(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // time / score
            Constraint::Length(3), // meter
            Constraint::Length(2), // feedback
            Constraint::Length(5), // heart
            Constraint::Length(5), // rescuer + patient
            Constraint::Min(0),
        ])
        .split(area);

    let hud = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);
    Paragraph::new(Span::styled(format!("Time: {}", snap.remaining), bold()))
        .alignment(Alignment::Left)
        .render(hud[0], buf);
    Paragraph::new(Span::styled(format!("Score: {}", snap.score), bold()))
        .alignment(Alignment::Right)
        .render(hud[1], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("CPR"))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio((snap.meter_percent / 100.0).clamp(0.0, 1.0))
        .render(chunks[1], buf);

    if let Some(text) = snap.feedback_text() {
        let color = match snap.feedback {
            Some(JudgmentKind::Hit) => Color::Green,
            _ => Color::Red,
        };
        Paragraph::new(Span::styled(text, bold().fg(color)))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    let heart = if snap.beat_pulse {
        &art::HEART_BEAT[..]
    } else {
        &art::HEART[..]
    };
    centered(art::art_lines(heart, bold().fg(Color::Red))).render(chunks[3], buf);

    let rescuer = if snap.compressing {
        &art::RESCUER_PRESSING
    } else {
        &art::RESCUER_READY
    };
    let mut scene = art::art_lines(rescuer, bold());
    scene.extend(art::art_lines(&art::PATIENT, dim()));
    centered(scene).render(chunks[4], buf);
}

fn render_finished(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled("Round Over!", bold())),
        Line::default(),
        Line::from(format!("Final Score: {}", snap.score)),
    ];
    if let Some(summary) = snap.summary {
        lines.push(Line::from(Span::styled(
            format!("Accuracy: {}%", summary.accuracy),
            dim(),
        )));
        lines.push(Line::from(Span::styled(
            format!("Beats: {}   Misses: {}", summary.beats, summary.misses),
            dim(),
        )));
        if let (Some(avg), Some(spread)) =
            (summary.mean_deviation_ms, summary.deviation_std_dev_ms)
        {
            lines.push(Line::from(Span::styled(
                format!("Timing: {:.0} ms off the beat (±{:.0})", avg, spread),
                dim(),
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            summary.verdict.message(),
            bold().fg(Color::Magenta),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("(r) ", bold().fg(Color::Green)),
        Span::raw("play again   "),
        Span::styled("(esc) ", bold().fg(Color::Blue)),
        Span::raw("back to menu"),
    ]));

    let height = lines.len() as u16;
    centered(lines).render(middle_band(area, height), buf);
}
