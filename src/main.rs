use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use pl_predictor::config::{ClientConfig, flow_label};
use pl_predictor::provider::spawn_provider;
use pl_predictor::render::{ChartView, Outcome, PredictionView, StatsView, Tone};
use pl_predictor::state::{AppState, Delta, ProviderCommand, Side, apply_delta, side_label};
use pl_predictor::transport::HttpTransport;

// Below this height the chart panel has no room and is skipped.
const MIN_CHART_HEIGHT: u16 = 9;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    base_url: String,
}

impl App {
    fn new(cfg: &ClientConfig, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(cfg.flow),
            should_quit: false,
            cmd_tx,
            base_url: cfg.base_url.clone(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.state.dismiss_alert();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char('h')
            | KeyCode::Char('l') => self.state.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => {
                let cmd = self.state.step_selection(1);
                self.send(cmd);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let cmd = self.state.step_selection(-1);
                self.send(cmd);
            }
            KeyCode::Char('x') | KeyCode::Backspace | KeyCode::Delete => {
                let cmd = self.state.clear_selection();
                self.send(cmd);
            }
            KeyCode::Enter | KeyCode::Char('p') => {
                let cmd = self.state.submit();
                self.send(cmd);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.state.toggle_flow();
                let line = format!("[INFO] Prediction flow: {}", flow_label(self.state.flow));
                self.state.push_log(line);
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn send(&mut self, cmd: Option<ProviderCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        let is_predict = matches!(cmd, ProviderCommand::Predict { .. });
        let announce = match &cmd {
            ProviderCommand::Predict { selection, flow } => format!(
                "[INFO] Prediction request sent ({}): {} vs {}",
                flow_label(*flow),
                self.state.team_name(selection.home).unwrap_or("?"),
                self.state.team_name(selection.away).unwrap_or("?"),
            ),
            ProviderCommand::FetchTeamStats { side, team } => format!(
                "[INFO] {} stats request sent: {}",
                side_label(*side),
                self.state.team_name(*team).unwrap_or("?")
            ),
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Backend worker stopped");
            if is_predict {
                apply_delta(&mut self.state, Delta::PredictionFailed);
            }
            return;
        }
        if is_predict {
            self.state.pending_predictions += 1;
        }
        self.state.push_log(announce);
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = ClientConfig::from_env();
    let transport = HttpTransport::new(&cfg)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(transport, tx, cmd_rx);

    let mut app = App::new(&cfg, cmd_tx);
    app.state
        .push_log(format!("[INFO] Backend: {}", app.base_url));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if let Some(message) = &app.state.alert {
        render_alert(frame, frame.size(), message);
    }
}

fn header_text(app: &App) -> String {
    let state = &app.state;
    let pending = if state.pending_predictions > 0 {
        format!(" | Predicting ({})", state.pending_predictions)
    } else {
        String::new()
    };
    let line1 = format!(
        "  .-.  PL PREDICTOR | Flow: {} | {}{pending}",
        flow_label(state.flow),
        app.base_url
    );
    let line2 = " (   )".to_string();
    let line3 = "  '-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text() -> String {
    "Tab Switch side | j/k/↑/↓ Team | x Clear | Enter/p Predict | f Flow | ? Help | q Quit"
        .to_string()
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(32),
            Constraint::Min(30),
            Constraint::Length(32),
        ])
        .split(area);

    render_side(frame, columns[0], state, Side::Home);
    render_center(frame, columns[1], state);
    render_side(frame, columns[2], state, Side::Away);
}

fn render_side(frame: &mut Frame, area: Rect, state: &AppState, side: Side) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(area);

    let focused = state.focus == side;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = format!("{} Team", side_label(side));
    let selector_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = selector_block.inner(rows[0]);
    frame.render_widget(selector_block, rows[0]);
    let selector = Paragraph::new(selector_lines(state, side, inner.height as usize));
    frame.render_widget(selector, inner);

    let stats_block = Block::default()
        .title(format!("{} Stats", side_label(side)))
        .borders(Borders::ALL);
    let text = match &state.side(side).stats {
        Some(view) => stats_text(view),
        None => Text::from(Line::styled(
            "Select a team to load stats",
            Style::default().fg(Color::DarkGray),
        )),
    };
    let stats = Paragraph::new(text)
        .block(stats_block)
        .wrap(Wrap { trim: false });
    frame.render_widget(stats, rows[1]);
}

fn selector_lines(state: &AppState, side: Side, height: usize) -> Text<'static> {
    // Slot 0 is the empty choice; slots 1.. map onto the team catalogue.
    let selected = state
        .side(side)
        .team
        .and_then(|id| state.teams.iter().position(|t| t.id == id))
        .map(|idx| idx + 1)
        .unwrap_or(0);
    let total = state.teams.len() + 1;
    let (start, end) = visible_range(selected, total, height.max(1));

    let lines = (start..end)
        .map(|slot| {
            let name = if slot == 0 {
                format!("Select {} Team", side_label(side))
            } else {
                state.teams[slot - 1].name.clone()
            };
            if slot == selected {
                Line::styled(
                    format!("> {name}"),
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::raw(format!("  {name}"))
            }
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn stats_text(view: &StatsView) -> Text<'static> {
    let mut lines = vec![Line::styled(
        view.team_name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for row in &view.rows {
        lines.push(Line::raw(format!("{:<19}{:>8}", row.label, row.value)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Recent Matches",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if view.recent.is_empty() {
        lines.push(Line::styled("none", Style::default().fg(Color::DarkGray)));
    }
    for m in &view.recent {
        lines.push(Line::styled(
            m.date.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        let mut spans = vec![
            Span::styled(
                m.result.letter().to_string(),
                tone_style(m.result.tone()).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" vs {} ({})", m.opponent, m.score)),
        ];
        if !m.venue.is_empty() {
            spans.push(Span::styled(
                format!(" {}", m.venue),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Danger => Style::default().fg(Color::Red),
        Tone::Warning => Style::default().fg(Color::Yellow),
    }
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::HomeWin => Color::Green,
        Outcome::Draw => Color::Yellow,
        Outcome::AwayWin => Color::Red,
    }
}

fn render_center(frame: &mut Frame, area: Rect, state: &AppState) {
    let chart = state.visible_chart();
    let show_chart = chart.is_some() && area.height >= 16 + MIN_CHART_HEIGHT;
    let constraints = if show_chart {
        vec![Constraint::Min(16), Constraint::Length(MIN_CHART_HEIGHT)]
    } else {
        vec![Constraint::Min(1)]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_prediction(frame, rows[0], state);
    if show_chart {
        if let Some(chart) = chart {
            render_chart(frame, rows[1], chart);
        }
    }
}

fn render_prediction(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Prediction").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let Some(view) = &state.prediction else {
        let hint = if state.pending_predictions > 0 {
            "Waiting for prediction..."
        } else {
            "Pick both teams and press Enter"
        };
        let empty = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(win_bar_chart(view), sections[0]);
    let text = prediction_text(view, state);
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }),
        sections[1],
    );
}

fn prediction_text(view: &PredictionView, state: &AppState) -> Text<'static> {
    // Split replies carry no team names, so fall back to the selectors.
    let home = view
        .home_team
        .clone()
        .or_else(|| selected_name(state, Side::Home))
        .unwrap_or_else(|| "Home".to_string());
    let away = view
        .away_team
        .clone()
        .or_else(|| selected_name(state, Side::Away))
        .unwrap_or_else(|| "Away".to_string());

    let mut lines = vec![
        Line::styled(
            format!("{home} {} - {} {away}", view.score_home, view.score_away),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::raw("Most likely outcome: "),
            Span::styled(
                view.most_likely.label(),
                Style::default()
                    .fg(outcome_color(view.most_likely))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    for row in &view.probabilities {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<9}", row.outcome.label()),
                Style::default().fg(outcome_color(row.outcome)),
            ),
            Span::raw(format!("{:>7}", row.text)),
        ]));
    }
    if let Some(pick) = &view.model_pick {
        lines.push(Line::raw(format!("Model pick: {pick}")));
    }
    if let Some(scorers) = &view.scorers {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "Likely Scorers",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            format!("{home}:"),
            Style::default().fg(Color::Green),
        ));
        for row in &scorers.home {
            lines.push(Line::raw(format!("  {}", row.text)));
        }
        lines.push(Line::styled(
            format!("{away}:"),
            Style::default().fg(Color::Red),
        ));
        for row in &scorers.away {
            lines.push(Line::raw(format!("  {}", row.text)));
        }
    }
    Text::from(lines)
}

fn selected_name(state: &AppState, side: Side) -> Option<String> {
    state
        .side(side)
        .team
        .and_then(|id| state.team_name(id))
        .map(str::to_string)
}

fn win_bar_chart(view: &PredictionView) -> BarChart<'static> {
    let bars = view
        .probabilities
        .iter()
        .map(|row| {
            Bar::default()
                .value((row.probability * 100.0).round().max(0.0) as u64)
                .text_value(row.text.clone())
                .style(Style::default().fg(outcome_color(row.outcome)))
        })
        .collect::<Vec<_>>();

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartView) {
    let largest = chart
        .points
        .iter()
        .map(|(_, v)| *v)
        .fold(chart.suggested_max, f64::max);
    let bars = chart
        .points
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .value(value.round().max(0.0) as u64)
                .label(Line::from(*label))
                .text_value(format!("{value}"))
                .style(Style::default().fg(Color::Blue))
        })
        .collect::<Vec<_>>();

    let widget = BarChart::default()
        .block(
            Block::default()
                .title(format!("Profile: {}", chart.label))
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(largest.round() as u64);
    frame.render_widget(widget, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);
    let text = format!("{message}\n\nEnter/Esc to dismiss");
    let alert = Paragraph::new(text)
        .block(
            Block::default()
                .title("Alert")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(alert, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "PL Predictor - Help",
        "",
        "Teams:",
        "  Tab / ← / →  Switch home/away selector",
        "  j/k or ↑/↓   Change team (top entry clears)",
        "  x / Bksp     Clear selector",
        "",
        "Prediction:",
        "  Enter / p    Predict",
        "  f            Toggle combined/split flow",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
