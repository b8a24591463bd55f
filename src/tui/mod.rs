mod help;
mod state;

use crate::cli::{build_config, build_controller, Cli};
use crate::model::{Field, ResultBlock};
use crate::orchestrator::{attach_listeners, UiEvent, UiUpdate};
use crate::view::{Document, DocumentState};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use help::draw_help;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use state::UiState;
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let (doc, controller) = build_controller(&args, &cfg)?;
    if args.swap {
        controller.switch_cities();
    }

    // Unbounded channels avoid backpressure between the UI thread and the controller.
    let (update_tx, update_rx) = mpsc::unbounded_channel::<UiUpdate>();
    let (event_tx, controller_handle) = attach_listeners(Arc::new(controller), update_tx);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_doc = doc.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_doc, update_rx, event_tx));

    // The controller loop ends once the UI sends Quit or drops its sender.
    let _ = controller_handle.await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }
    Ok(())
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    doc: Document,
    mut update_rx: UnboundedReceiver<UiUpdate>,
    event_tx: UnboundedSender<UiEvent>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut state = UiState::default();
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(update) = update_rx.try_recv() {
            match update {
                UiUpdate::Finished(outcome) => state.apply_outcome(&outcome),
            }
        }

        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            let snapshot = doc.snapshot();
            terminal
                .draw(|f| draw(f.area(), f, &state, &snapshot))
                .ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = event_tx.send(UiEvent::Quit);
                        break Ok(());
                    }
                    (KeyModifiers::CONTROL, KeyCode::Char('s')) => {
                        let _ = event_tx.send(UiEvent::SwapCities);
                    }
                    (_, KeyCode::F(1)) => {
                        state.show_help = !state.show_help;
                    }
                    (_, KeyCode::Enter) => {
                        state.status = "Searching…".into();
                        let _ = event_tx.send(UiEvent::Submit);
                    }
                    (_, KeyCode::Tab) | (_, KeyCode::Down) => {
                        let field = state.next_field();
                        let _ = event_tx.send(UiEvent::Focus(field));
                    }
                    (_, KeyCode::BackTab) | (_, KeyCode::Up) => {
                        let field = state.prev_field();
                        let _ = event_tx.send(UiEvent::Focus(field));
                    }
                    (_, KeyCode::Backspace) => {
                        doc.edit_field(state.focus, |v| {
                            v.pop();
                        });
                    }
                    (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                        doc.edit_field(state.focus, |v| v.push(c));
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    res
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState, doc: &DocumentState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(10), // Form: four inputs with error lines
                Constraint::Min(0),     // Results
                Constraint::Length(3),  // Status
            ]
            .as_ref(),
        )
        .split(area);

    draw_form(chunks[0], f, state, doc);
    if state.show_help {
        draw_help(chunks[1], f);
    } else {
        draw_results(chunks[1], f, state, doc);
    }

    let status = Paragraph::new(Line::from(vec![
        Span::raw(state.status.clone()),
        Span::styled("   F1 help", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);
}

fn draw_form(area: Rect, f: &mut ratatui::Frame, state: &UiState, doc: &DocumentState) {
    let mut lines = Vec::new();
    for field in Field::ALL {
        let focused = state.focus == field;
        let value = doc.fields.get(&field).map(String::as_str).unwrap_or("");
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", field.label()), label_style),
            Span::raw(format!("{value}{cursor}")),
        ]));
        if let Some(err) = doc.error(field) {
            lines.push(Line::from(Span::styled(
                format!("{:<15}{err}", ""),
                Style::default().fg(Color::Red),
            )));
        }
    }
    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("flight-search"),
    );
    f.render_widget(p, area);
}

fn draw_results(area: Rect, f: &mut ratatui::Frame, state: &UiState, doc: &DocumentState) {
    let mut lines = Vec::new();
    if let Some(err) = doc.panel.error.as_deref() {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    for block in &doc.panel.blocks {
        match block {
            ResultBlock::Quote(q) => {
                lines.push(Line::from(vec![
                    Span::styled(format!("{}: ", q.price), Style::default().fg(Color::Green)),
                    Span::raw(format!("{} ➜ {}", q.origin, q.destination)),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", q.follower()),
                    Style::default().fg(Color::Cyan),
                )));
            }
            ResultBlock::Divider { text } => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::Magenta),
                )));
            }
        }
    }

    let title = if doc.is_busy() {
        format!("Results {} searching…", state.spinner_frame())
    } else {
        format!("Results ({} quotes)", doc.panel.quote_count())
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}
