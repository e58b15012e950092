//! Main TUI application state and logic

use super::panes::{self, SourceBuffer, SourceScrollState, StatusRenderData};
use crate::config::Config;
use crate::engine::{EngineError, EngineOutput, ExecutionEngine};
use crate::model::{StructureKind, ValueToken};
use crate::render;
use crate::replay::NavControls;
use crate::session::{apply_editor_effects, DragEvent, Editor, Effect, RunTicket, Session, Surface};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

type RunResult = (RunTicket, Result<EngineOutput, EngineError>);

/// Which authoring mode is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Build,
    Replay,
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Structure,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> structure)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Structure,
            FocusedPane::Structure => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub session: Session,
    pub mode: Mode,

    /// Program replayed in replay mode
    pub editor: SourceBuffer,
    /// Program synthesized from the build surface
    pub build_editor: SourceBuffer,

    engine: Arc<dyn ExecutionEngine>,
    run_tx: Sender<RunResult>,
    run_rx: Receiver<RunResult>,

    pub palette: Vec<ValueToken>,
    /// Selected visual index on the build surface
    pub selected: usize,
    pub controls: NavControls,

    pub focused_pane: FocusedPane,
    pub source_scroll: SourceScrollState,
    pub structure_scroll: usize,
    pub output_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,
    pub last_play_time: Instant,
    pub last_space_press: Instant,
}

impl App {
    pub fn new(config: &Config, engine: Arc<dyn ExecutionEngine>, source: String, mode: Mode) -> Self {
        let (run_tx, run_rx) = mpsc::channel();
        let session = Session::new(config.kind).with_max_steps(config.max_steps);
        let build_editor = SourceBuffer::new(
            session
                .synthesized(build_surface(config.kind))
                .unwrap_or_default(),
        );

        App {
            session,
            mode,
            editor: SourceBuffer::new(source),
            build_editor,
            engine,
            run_tx,
            run_rx,
            palette: config.palette.clone(),
            selected: 0,
            controls: NavControls::default(),
            focused_pane: FocusedPane::Structure,
            source_scroll: SourceScrollState::default(),
            structure_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.poll_runs();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                let effects = self.session.advance();
                if effects.is_empty() {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                } else {
                    self.apply_replay_effects(effects);
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play and finished runs are picked up
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Send the editor text to the engine on a worker thread
    pub fn start_run(&mut self) {
        self.is_playing = false;
        let ticket = self.session.begin_run();
        let source = self.editor.text();
        let engine = Arc::clone(&self.engine);
        let tx = self.run_tx.clone();

        thread::spawn(move || {
            let result = engine.run(&source);
            // The receiver only disappears when the app is shutting down
            let _ = tx.send((ticket, result));
        });
        self.status_message = "Running...".to_string();
    }

    /// Apply any run results that have arrived
    pub fn poll_runs(&mut self) {
        while let Ok((ticket, result)) = self.run_rx.try_recv() {
            let effects = self.session.finish_run(ticket, result);
            if effects.is_empty() {
                debug!(generation = ticket.generation(), "ignored stale run result");
                continue;
            }
            self.apply_replay_effects(effects);
            self.structure_scroll = 0;
            self.output_scroll = 0;
            self.status_message = if self.session.last_run_failed() {
                "Error: run failed".to_string()
            } else {
                format!("Recorded {} step(s)", self.session.navigator().total())
            };
        }
    }

    /// Block until the in-flight run has been applied
    pub fn wait_for_run(&mut self) {
        while self.session.is_running() {
            match self.run_rx.recv() {
                Ok((ticket, result)) => {
                    let effects = self.session.finish_run(ticket, result);
                    self.apply_replay_effects(effects);
                }
                Err(_) => break,
            }
        }
    }

    fn apply_replay_effects(&mut self, effects: Vec<Effect>) {
        for effect in apply_editor_effects(&mut self.editor, effects) {
            if let Effect::Controls(controls) = effect {
                self.controls = controls;
            }
        }
    }

    fn apply_build_effects(&mut self, effects: Vec<Effect>) {
        apply_editor_effects(&mut self.build_editor, effects);
    }

    fn build_surface(&self) -> Surface {
        build_surface(self.session.kind())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let kind = self.session.kind();
        let (source_title, buffer) = match self.mode {
            Mode::Replay => ("Source Code", &self.editor),
            Mode::Build => ("Generated Code", &self.build_editor),
        };
        panes::render_source_pane(
            frame,
            left_rows[0],
            source_title,
            buffer,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_output_pane(
            frame,
            left_rows[1],
            self.session.output(),
            self.session.is_running(),
            self.session.last_run_failed(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        match self.mode {
            Mode::Replay => {
                panes::render_replay_pane(
                    frame,
                    columns[1],
                    &self.session.navigator().current_view(),
                    kind,
                    self.focused_pane == FocusedPane::Structure,
                    &mut self.structure_scroll,
                );
            }
            Mode::Build => {
                let right_rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(4), Constraint::Min(0)])
                    .split(columns[1]);
                let palette: Vec<String> = self.palette.iter().map(ValueToken::to_string).collect();
                panes::render_palette(frame, right_rows[0], &palette);

                let nodes = self
                    .session
                    .surface(self.build_surface())
                    .map(render::project_sequence)
                    .unwrap_or_default();
                panes::render_surface_pane(
                    frame,
                    right_rows[1],
                    &nodes,
                    kind,
                    Some(self.selected),
                    self.focused_pane == FocusedPane::Structure,
                );
            }
        }

        let navigator = self.session.navigator();
        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                mode: self.mode,
                message: &self.status_message,
                step: navigator.position().map(|c| (c, navigator.total())),
                controls: self.controls,
                is_playing: self.is_playing,
                is_running: self.session.is_running(),
                run_failed: self.session.last_run_failed(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('m') => {
                self.is_playing = false;
                self.mode = match self.mode {
                    Mode::Build => Mode::Replay,
                    Mode::Replay => Mode::Build,
                };
                self.status_message = match self.mode {
                    Mode::Build => "Build mode".to_string(),
                    Mode::Replay => "Replay mode".to_string(),
                };
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => self.scroll(-1),
            KeyCode::Down => self.scroll(1),
            _ => match self.mode {
                Mode::Replay => self.handle_replay_key(key),
                Mode::Build => self.handle_build_key(key),
            },
        }
    }

    fn scroll(&mut self, delta: isize) {
        let offset = match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling moves the row the highlighted line is pinned to
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_add_signed(-delta));
                }
                self.source_scroll.offset = self.source_scroll.offset.saturating_add_signed(delta);
                return;
            }
            FocusedPane::Structure => &mut self.structure_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        };
        *offset = offset.saturating_add_signed(delta);
    }

    fn handle_replay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.start_run(),
            KeyCode::Left => {
                self.is_playing = false;
                let effects = self.session.retreat();
                self.report_step(effects, "Stepped backward", "Already at the first step");
            }
            KeyCode::Right => {
                self.is_playing = false;
                let effects = self.session.advance();
                self.report_step(effects, "Stepped forward", "Already at the last step");
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                let effects = self.session.rewind();
                self.report_step(effects, "Jumped to start", "Already at the first step");
            }
            KeyCode::Enter => {
                self.is_playing = false;
                let effects = self.session.jump_to_end();
                self.report_step(effects, "Jumped to end", "Already at the last step");
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play (with 200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing && self.controls.next;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            _ => {}
        }
    }

    fn report_step(&mut self, effects: Vec<Effect>, moved: &str, blocked: &str) {
        if effects.is_empty() {
            self.status_message = blocked.to_string();
        } else {
            self.apply_replay_effects(effects);
            self.status_message = moved.to_string();
        }
    }

    fn handle_build_key(&mut self, key: KeyEvent) {
        let surface = self.build_surface();
        let nodes = self
            .session
            .surface(surface)
            .map(render::project_sequence)
            .unwrap_or_default();

        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let Some(value) = self.palette.get(index).cloned() else {
                    self.status_message = format!("Palette has no value {}", index + 1);
                    return;
                };
                self.status_message = format!("Dropped {}", value);
                let effects = self.session.handle_drag(DragEvent::Dropped {
                    value,
                    origin: Surface::Palette,
                    target: surface,
                    origin_position: None,
                });
                self.apply_build_effects(effects);
                // Follow the newest value
                let len = self.session.surface(surface).map_or(0, |m| m.len());
                self.selected = last_value_index(len, self.session.kind());
            }
            KeyCode::Left => {
                self.selected = step_selection(&nodes, self.selected, false);
            }
            KeyCode::Right => {
                self.selected = step_selection(&nodes, self.selected, true);
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let Some(render::VisualNode::Value { text: value, .. }) = nodes.get(self.selected) else {
                    self.status_message = "Nothing selected".to_string();
                    return;
                };
                let effects = self.session.handle_drag(DragEvent::Removed {
                    value: ValueToken::new(value.clone()),
                    origin: surface,
                    origin_position: Some(self.selected),
                });
                if effects.is_empty() {
                    self.status_message = format!("Only the top of the {} can be removed", surface_noun(surface));
                } else {
                    self.status_message = format!("Removed {}", value);
                    self.apply_build_effects(effects);
                    let len = self.session.surface(surface).map_or(0, |m| m.len());
                    self.selected = self.selected.min(last_value_index(len, self.session.kind()));
                }
            }
            KeyCode::Char('c') => {
                let effects = self.session.clear_surface(surface);
                self.apply_build_effects(effects);
                self.selected = 0;
                self.status_message = "Cleared".to_string();
            }
            _ => {}
        }
    }
}

/// Surface used for building structures of `kind`
pub fn build_surface(kind: StructureKind) -> Surface {
    match kind {
        StructureKind::List => Surface::Canvas,
        StructureKind::Stack => Surface::Stack,
    }
}

fn surface_noun(surface: Surface) -> &'static str {
    match surface {
        Surface::Stack => "stack",
        Surface::Canvas => "list",
        Surface::Palette => "palette",
    }
}

/// Visual index of the last value on a surface holding `len` values
fn last_value_index(len: usize, kind: StructureKind) -> usize {
    let last = len.saturating_sub(1);
    match kind {
        StructureKind::List => crate::model::visual_index(last),
        StructureKind::Stack => last,
    }
}

/// Move the selection to the neighbouring value node, skipping connectors
fn step_selection(nodes: &[render::VisualNode], current: usize, forward: bool) -> usize {
    let mut candidate = current;
    loop {
        candidate = if forward {
            candidate + 1
        } else {
            match candidate.checked_sub(1) {
                Some(c) => c,
                None => return current,
            }
        };
        match nodes.get(candidate) {
            Some(node) if node.is_value() => return candidate,
            Some(_) => continue,
            None => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::project_values;

    #[test]
    fn test_selection_skips_connectors() {
        let nodes = project_values(&["a", "b", "c"], StructureKind::List);
        assert_eq!(step_selection(&nodes, 0, true), 2);
        assert_eq!(step_selection(&nodes, 2, true), 4);
        assert_eq!(step_selection(&nodes, 4, true), 4);
        assert_eq!(step_selection(&nodes, 4, false), 2);
        assert_eq!(step_selection(&nodes, 0, false), 0);
    }

    #[test]
    fn test_last_value_index() {
        assert_eq!(last_value_index(3, StructureKind::List), 4);
        assert_eq!(last_value_index(3, StructureKind::Stack), 2);
        assert_eq!(last_value_index(0, StructureKind::List), 0);
    }
}
