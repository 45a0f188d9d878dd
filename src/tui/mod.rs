mod help;

use crate::controller::{self, UiCommand};
use crate::model::{rotation_degrees, PanelConfig, PanelEvent, ANGLE_MAX};
use crate::panel::Panel;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Tabs},
    Terminal,
};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

struct UiState {
    panel: Panel,
    step: u16,
    /// None until the first poll resolves either way.
    connected: Option<bool>,
    car_detected: Option<bool>,
    is_dark: Option<bool>,
    release_counter: Option<u64>,
    led_red: bool,
    led_green: bool,
    led_white: bool,
    /// Angle driving the arm rotation display: last polled value or the last
    /// optimistic local action, whichever came most recently.
    arm_angle: Option<u16>,
    info: String,
    tab: usize,
}

impl UiState {
    fn new(step: u16) -> Self {
        let panel = Panel::new();
        let info = panel.mode().describe().to_string();
        Self {
            panel,
            step,
            connected: None,
            car_detected: None,
            is_dark: None,
            release_counter: None,
            led_red: false,
            led_green: false,
            led_white: false,
            arm_angle: None,
            info,
            tab: 0,
        }
    }
}

/// What a key press asks the async side to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    None,
    Send(u16),
    Quit,
}

pub async fn run(cfg: PanelConfig) -> Result<()> {
    // Unbounded channels avoid backpressure between the poller and the UI.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<PanelEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_cfg = cfg.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_cfg, event_rx, cmd_tx));

    let res = controller::run_controller(&cfg, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    cfg: PanelConfig,
    mut event_rx: UnboundedReceiver<PanelEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(cfg.step);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain poller events without blocking to keep the UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, k.modifiers, k.code) {
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    KeyAction::Send(angle) => {
                        let _ = cmd_tx.send(UiCommand::SendAngle(angle));
                    }
                    KeyAction::None => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn apply_event(state: &mut UiState, ev: PanelEvent) {
    match ev {
        PanelEvent::Snapshot(snap) => {
            state.connected = Some(true);
            state.car_detected = Some(snap.car_detected);
            state.is_dark = Some(snap.is_dark);
            state.release_counter = Some(snap.release_counter);
            state.led_red = snap.led_red;
            state.led_green = snap.led_green;
            state.led_white = snap.led_white;
            state.arm_angle = Some(snap.servo_angle);
            // Slider follows the device only while automatic.
            state.panel.sync_from_poll(snap.servo_angle);
        }
        PanelEvent::Disconnected { .. } => {
            // Previously displayed values stay as they were.
            state.connected = Some(false);
        }
    }
}

/// Translate a key press into local state changes plus an optional outbound
/// command. Visual state is updated here, before the command is sent.
fn handle_key(state: &mut UiState, modifiers: KeyModifiers, code: KeyCode) -> KeyAction {
    match (modifiers, code) {
        (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => KeyAction::Quit,
        (_, KeyCode::Char('m')) => {
            let cmd = state.panel.toggle_mode();
            state.info = state.panel.mode().describe().to_string();
            match cmd {
                Some(angle) => KeyAction::Send(angle),
                None => KeyAction::None,
            }
        }
        (_, KeyCode::Left) => {
            if state.panel.drag(-1) {
                state.arm_angle = Some(state.panel.angle());
            }
            KeyAction::None
        }
        (_, KeyCode::Right) => {
            if state.panel.drag(1) {
                state.arm_angle = Some(state.panel.angle());
            }
            KeyAction::None
        }
        (_, KeyCode::Enter) => dispatch(state, |p| p.commit()),
        (_, KeyCode::Char('-')) => {
            let step = state.step as i16;
            dispatch(state, |p| p.step(-step))
        }
        (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => {
            let step = state.step as i16;
            dispatch(state, |p| p.step(step))
        }
        (_, KeyCode::Char('z')) => dispatch(state, |p| p.set(0)),
        (_, KeyCode::Char('c')) => dispatch(state, |p| p.set(90)),
        (_, KeyCode::Char('o')) => dispatch(state, |p| p.set(180)),
        (_, KeyCode::Tab) => {
            state.tab = (state.tab + 1) % 2;
            KeyAction::None
        }
        (_, KeyCode::Char('?')) => {
            state.tab = 1;
            KeyAction::None
        }
        (_, KeyCode::Esc) => {
            state.tab = 0;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Apply a manual dispatch entry point: update the arm visual first, then
/// return the command to send. Inert while automatic.
fn dispatch(state: &mut UiState, f: impl FnOnce(&mut Panel) -> Option<u16>) -> KeyAction {
    match f(&mut state.panel) {
        Some(angle) => {
            state.arm_angle = Some(angle);
            KeyAction::Send(angle)
        }
        None => KeyAction::None,
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Panel"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("barrier-panel"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_panel(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_panel(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4), // Connection + mode
                Constraint::Length(5), // Sensors + LEDs
                Constraint::Length(5), // Barrier arm + slider
                Constraint::Min(0),    // Keyboard shortcuts
                Constraint::Length(3), // Status line
            ]
            .as_ref(),
        )
        .split(area);

    let top_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(main[0]);

    let (dot_color, conn_text) = match state.connected {
        Some(true) => (Color::Green, "Connected"),
        Some(false) => (Color::Red, "Disconnected"),
        None => (Color::DarkGray, "Connecting…"),
    };
    let connection = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::raw(conn_text),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Connection"));
    f.render_widget(connection, top_row[0]);

    let (mode_color, mode_text) = if state.panel.is_automatic() {
        (Color::Cyan, "AUTOMATIC")
    } else {
        (Color::Yellow, "MANUAL")
    };
    let mode = Paragraph::new(vec![
        Line::from(Span::styled(mode_text, Style::default().fg(mode_color))),
        Line::from(Span::styled(
            state.panel.mode().describe(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Mode"));
    f.render_widget(mode, top_row[1]);

    let mid_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(main[1]);

    let opt_label = |v: Option<bool>, yes: &'static str, no: &'static str| match v {
        Some(true) => yes,
        Some(false) => no,
        None => "-",
    };
    let sensors = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Car:      ", Style::default().fg(Color::Gray)),
            Span::raw(opt_label(state.car_detected, "Detected", "Empty")),
        ]),
        Line::from(vec![
            Span::styled("Light:    ", Style::default().fg(Color::Gray)),
            Span::raw(opt_label(state.is_dark, "Dark", "Light")),
        ]),
        Line::from(vec![
            Span::styled("Releases: ", Style::default().fg(Color::Gray)),
            Span::raw(
                state
                    .release_counter
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Sensors"));
    f.render_widget(sensors, mid_row[0]);

    let led_span = |on: bool, color: Color, label: &'static str| {
        vec![
            Span::styled(
                "● ",
                Style::default().fg(if on { color } else { Color::DarkGray }),
            ),
            Span::raw(label),
            Span::raw("   "),
        ]
    };
    let mut led_line = Vec::new();
    led_line.extend(led_span(state.led_red, Color::Red, "red"));
    led_line.extend(led_span(state.led_green, Color::Green, "green"));
    led_line.extend(led_span(state.led_white, Color::White, "white"));
    let leds = Paragraph::new(Line::from(led_line))
        .block(Block::default().borders(Borders::ALL).title("LEDs"));
    f.render_widget(leds, mid_row[1]);

    // Barrier arm: gauge over the angle domain plus the rotation readout,
    // with the slider position underneath.
    let arm_label = match state.arm_angle {
        Some(a) => format!("{a}° (rotation {:+}°)", rotation_degrees(a)),
        None => "-".to_string(),
    };
    let arm_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(main[2]);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Barrier arm"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((f64::from(state.arm_angle.unwrap_or(0)) / f64::from(ANGLE_MAX)).min(1.0))
        .label(arm_label);
    f.render_widget(gauge, arm_rows[0]);

    let slider_suffix = if state.panel.is_automatic() {
        "  (disabled in automatic mode)"
    } else {
        "  (←/→ adjust, Enter send)"
    };
    let slider = Paragraph::new(Line::from(vec![
        Span::styled("Slider: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{}°", state.panel.angle())),
        Span::styled(slider_suffix, Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(slider, arm_rows[1]);

    let shortcuts = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled("m", Style::default().fg(Color::Magenta)),
            Span::raw("      Toggle automatic/manual"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("-/+", Style::default().fg(Color::Magenta)),
            Span::raw(format!("    Step by {}°", state.step)),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("z c o", Style::default().fg(Color::Magenta)),
            Span::raw("  Set 0° / 90° / 180°"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw("      Quit"),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Keyboard Shortcuts"),
    );
    f.render_widget(shortcuts, main[3]);

    let status = Paragraph::new(Line::from(vec![
        Span::styled("Info: ", Style::default().fg(Color::Gray)),
        Span::raw(state.info.clone()),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, main[4]);
}
