//! Play command implementation - interactive TUI session.

// CLI entry points take ownership of parsed arguments
#![allow(clippy::needless_pass_by_value)]

use super::output::format_summary_lines;
use super::{load_dataset, resolve_seed, CliError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pinpoint::{
    Advance, Coord, Difficulty, Locale, Mode, Phase, RoundRecord, Session, SessionConfig, Summary,
    Verdict,
};
use pinpoint::session::TickOutcome;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// One clock second.
const SECOND: Duration = Duration::from_secs(1);

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the TUI fails.
pub(crate) fn execute(
    mode: Mode,
    difficulty: Difficulty,
    locale: Locale,
    seed: Option<u64>,
    dataset: Option<PathBuf>,
    rounds: Option<u32>,
) -> Result<(), CliError> {
    let dataset = load_dataset(dataset.as_deref())?;

    let mut config = SessionConfig::new(mode, difficulty);
    if let Some(rounds) = rounds {
        config.quick_rounds = rounds.max(1);
    }

    let session = Session::new(config, dataset, resolve_seed(seed));
    if session.current_location().is_none() {
        return Err(CliError::new("No locations available to play"));
    }

    run_tui(session, locale)
}

/// App state for the TUI.
struct App {
    session: Session,
    locale: Locale,
    input: String,
    message: Option<String>,
    summary: Option<Summary>,
    last_tick: Instant,
}

impl App {
    fn new(session: Session, locale: Locale) -> Self {
        Self {
            session,
            locale,
            input: String::new(),
            message: None,
            summary: None,
            last_tick: Instant::now(),
        }
    }

    /// Feed elapsed whole seconds to the round clock.
    fn update_clock(&mut self) {
        while self.last_tick.elapsed() >= SECOND {
            self.last_tick += SECOND;
            if let TickOutcome::TimedOut(record) = self.session.tick() {
                self.message = Some(format!(
                    "Time's up! -{} life. Press Enter to continue.",
                    u32::from(record.life_lost)
                ));
            }
        }
    }

    /// Enter: lock the typed guess, or continue after a resolved round.
    fn submit(&mut self) {
        match self.session.phase() {
            Phase::Active => {
                let Some(coord) = parse_coord(&self.input) else {
                    self.message = Some("Enter a guess as: lat, lon (e.g. 48.85, 2.29)".to_string());
                    return;
                };
                self.session.set_guess(coord);
                match self.session.lock_guess() {
                    Ok(_) => self.message = Some("Press Enter to continue.".to_string()),
                    Err(reason) => self.message = Some(reason.to_string()),
                }
            }
            Phase::Resolved => {
                let advance = self.session.next_round();
                self.handle_advance(advance);
            }
            Phase::Finished => {}
        }
    }

    fn skip(&mut self) {
        let advance = self.session.skip_round();
        self.handle_advance(advance);
    }

    fn handle_advance(&mut self, advance: Advance) {
        match advance {
            Advance::Next { .. } => {
                self.input.clear();
                self.message = None;
                self.last_tick = Instant::now();
            }
            Advance::Finished(summary) => {
                self.summary = Some(summary);
                self.message = None;
            }
            Advance::Blocked => {
                self.message = Some("Lock a guess or skip first.".to_string());
            }
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        self.summary = None;
        self.input.clear();
        self.message = None;
        self.last_tick = Instant::now();
    }
}

/// Parse "lat, lon" (comma and/or whitespace separated) into a valid coordinate.
fn parse_coord(input: &str) -> Option<Coord> {
    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());
    let lat = parts.next()?.parse::<f64>().ok()?;
    let lon = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let coord = Coord::new(lat, lon);
    coord.is_valid().then_some(coord)
}

fn run_tui(session: Session, locale: Locale) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    let mut app = App::new(session, locale);

    loop {
        app.update_clock();

        terminal.draw(|f| ui(f, &app)).map_err(|e| CliError::new(e.to_string()))?;

        if event::poll(Duration::from_millis(100)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            if app.summary.is_some() {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => break,
                    KeyCode::Char('r') => app.restart(),
                    _ => {}
                }
                continue;
            }
            match key.code {
                KeyCode::Esc => {
                    app.session.abandon();
                    break;
                }
                KeyCode::Enter => app.submit(),
                KeyCode::Tab => app.skip(),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Char(c)
                    if app.session.phase() == Phase::Active
                        && (c.is_ascii_digit() || matches!(c, '-' | '.' | ',' | ' ')) =>
                {
                    app.input.push(c);
                }
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    if let Some(summary) = app.summary {
        for line in format_summary_lines(&summary) {
            println!("{line}");
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Input
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_clue(f, main_chunks[0], app);
    render_result(f, main_chunks[1], app);
    render_input(f, chunks[2], app);
    render_footer(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let s = &app.session;
    let round = match s.max_rounds() {
        Some(max) => format!("Round {}/{max}", s.round()),
        None => format!("Round {}", s.round()),
    };
    let lives = "♥".repeat(s.lives() as usize);
    let mut title = format!(
        " Pinpoint | {round} | Score: {} | Lives: {lives} | Streak: {} ",
        s.score(),
        s.streak()
    );
    if let Some(seconds) = s.time_remaining() {
        title.push_str(&format!("| Time: {seconds}s "));
    }

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_clue(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(loc) = app.session.current_location() {
        lines.push(Line::from(Span::styled(
            loc.region.get(app.locale).to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(loc.clue.get(app.locale).to_string()));
        if let Some(url) = &loc.pano_url {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Panorama: {url}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let clue = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Where are you? "))
        .wrap(Wrap { trim: false });

    f.render_widget(clue, area);
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = if let Some(summary) = &app.summary {
        let mut lines = vec![
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(format_summary_lines(summary).into_iter().map(Line::from));
        lines
    } else if let Some(record) = app.session.last_outcome() {
        outcome_lines(record, app)
    } else if let Some(guess) = app.session.guess() {
        vec![Line::from(format!("Pin: {guess}"))]
    } else {
        vec![Line::from("Type a latitude and longitude, then press Enter.")]
    };

    let result = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Result "))
        .wrap(Wrap { trim: false });

    f.render_widget(result, area);
}

fn outcome_lines<'a>(record: &RoundRecord, app: &App) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    let (label, color) = verdict_label(record.verdict);
    lines.push(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    if record.timeout {
        lines.push(Line::from("Time ran out."));
    }
    if let Some(d) = record.distance_km {
        lines.push(Line::from(format!("Distance: {d} km")));
    }
    lines.push(Line::from(format!("Points: +{}", record.points)));
    if record.life_lost {
        lines.push(Line::from(Span::styled("Life lost!", Style::default().fg(Color::Red))));
    }
    if let Some(loc) = app.session.current_location() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("It was: {}", loc.name.get(app.locale))));
        lines.push(Line::from(format!("At: {}", loc.coord())));
    }
    lines
}

fn verdict_label(verdict: Verdict) -> (&'static str, Color) {
    match verdict {
        Verdict::Perfect => ("Perfect!", Color::Green),
        Verdict::VeryClose => ("Very close!", Color::Green),
        Verdict::Close => ("Close", Color::LightGreen),
        Verdict::Far => ("Far", Color::Yellow),
        Verdict::VeryFar => ("Very far", Color::LightRed),
        Verdict::Skipped => ("Skipped", Color::Gray),
    }
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let text = match &app.message {
        Some(message) if app.session.phase() != Phase::Active => message.clone(),
        Some(message) => format!("{}  ({message})", app.input),
        None => app.input.clone(),
    };

    let input = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Guess (lat, lon) "));

    f.render_widget(input, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.summary.is_some() {
        " [Enter/q] Quit  [r] Play again "
    } else if app.session.phase() == Phase::Resolved {
        " [Enter] Continue  [Esc] Quit "
    } else {
        " [Enter] Lock guess  [Tab] Skip  [Esc] Quit "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coord_comma() {
        assert_eq!(parse_coord("48.85, 2.29"), Some(Coord::new(48.85, 2.29)));
    }

    #[test]
    fn test_parse_coord_whitespace() {
        assert_eq!(parse_coord(" -22.35   -70.18 "), Some(Coord::new(-22.35, -70.18)));
    }

    #[test]
    fn test_parse_coord_rejects_bad_input() {
        assert_eq!(parse_coord(""), None);
        assert_eq!(parse_coord("48.85"), None);
        assert_eq!(parse_coord("1, 2, 3"), None);
        assert_eq!(parse_coord("95, 0"), None);
        assert_eq!(parse_coord("abc, 1"), None);
    }
}
