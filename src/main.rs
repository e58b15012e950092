// dsviz: step-through visualizer for linked lists and stacks

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dsviz::config::{parse_palette, Config};
use dsviz::engine::{samples, CommandEngine, ExecutionEngine, TraceFileEngine};
use dsviz::model::{StructureKind, ValueToken};
use dsviz::render;
use dsviz::replay::StepView;
use dsviz::session::{DragEvent, Session, Surface};
use dsviz::trace::DEFAULT_MAX_STEPS;
use dsviz::ui::{app::build_surface, App, Mode};

/// Step-through visualizer for linked lists and stacks.
#[derive(Parser)]
#[command(name = "dsviz", version, about)]
struct Cli {
    /// Write tracing output to this file (filtered by RUST_LOG, default `info`).
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the program synthesized from a sequence of values.
    Synth {
        /// Structure to build: `list` or `stack`.
        #[arg(short, long, default_value = "list")]
        kind: StructureKind,

        /// Values dropped onto the surface, in order.
        values: Vec<String>,

        /// Visual index to remove after dropping (repeatable).
        #[arg(short, long = "remove")]
        remove: Vec<usize>,
    },

    /// Open the TUI in build mode.
    Build {
        #[arg(short, long, default_value = "list")]
        kind: StructureKind,

        /// Comma-separated palette values (default: 10,20,...,90).
        #[arg(long)]
        palette: Option<String>,
    },

    /// Run a program and replay its trace.
    Replay {
        #[arg(short, long, default_value = "list")]
        kind: StructureKind,

        /// Program to run (default: a built-in sample for the kind).
        source: Option<PathBuf>,

        /// Replay a recorded trace instead of running the interpreter.
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Interpreter used to run the program.
        #[arg(long, default_value = "python3")]
        python: String,

        /// Largest trace accepted from one run.
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Print every step instead of opening the TUI.
        #[arg(long)]
        print: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    match cli.command {
        Commands::Synth {
            kind,
            values,
            remove,
        } => {
            print!("{}", synthesize(kind, values, &remove));
            Ok(())
        }
        Commands::Build { kind, palette } => {
            let mut config = Config::new(kind);
            if let Some(values) = palette {
                config.palette = parse_palette(&values);
            }
            let engine: Arc<dyn ExecutionEngine> = Arc::new(CommandEngine::new(config.python.clone()));
            let source = samples::sample_source(kind).to_string();
            run_tui(App::new(&config, engine, source, Mode::Build), false)
        }
        Commands::Replay {
            kind,
            source,
            trace,
            python,
            max_steps,
            print,
        } => {
            let mut config = Config::new(kind);
            config.python = python;
            config.trace_file = trace;
            config.max_steps = max_steps;

            let source = match &source {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => samples::sample_source(kind).to_string(),
            };

            let engine: Arc<dyn ExecutionEngine> = match &config.trace_file {
                Some(path) => Arc::new(TraceFileEngine::new(path.clone())),
                None => Arc::new(CommandEngine::new(config.python.clone())),
            };

            let mut app = App::new(&config, engine, source, Mode::Replay);
            if print {
                app.start_run();
                app.wait_for_run();
                print_replay(&app.session)
            } else {
                run_tui(app, true)
            }
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// Replay drag events headlessly and return the synthesized program
fn synthesize(kind: StructureKind, values: Vec<String>, remove: &[usize]) -> String {
    let mut session = Session::new(kind);
    let surface = build_surface(kind);

    for value in values {
        session.handle_drag(DragEvent::Dropped {
            value: ValueToken::new(value),
            origin: Surface::Palette,
            target: surface,
            origin_position: None,
        });
    }
    for &visual in remove {
        let value = session
            .surface(surface)
            .map(render::project_sequence)
            .and_then(|nodes| match nodes.get(visual) {
                Some(render::VisualNode::Value { text, .. }) => Some(text.clone()),
                _ => None,
            });
        match value {
            Some(value) => {
                session.handle_drag(DragEvent::Removed {
                    value: ValueToken::new(value),
                    origin: surface,
                    origin_position: Some(visual),
                });
            }
            None => eprintln!("Warning: no value at visual index {}", visual),
        }
    }

    session.synthesized(surface).unwrap_or_default()
}

/// Print the whole trace of the last run
fn print_replay(session: &Session) -> Result<()> {
    let kind = session.kind();
    let mut navigator = session.navigator().clone();
    let output = session.output();

    if session.last_run_failed() {
        bail!("{}", output.trim_start_matches("Error: "));
    }

    println!("{}", output);
    navigator.rewind();
    loop {
        let view = navigator.current_view();
        let header = render::step_header(&view);
        println!();
        println!("{}", header.step_info);
        println!("{}", header.current_line);
        println!("{}", header.description);

        match &view {
            StepView::Nothing => println!("{}", render::NO_DATA_LABEL),
            StepView::Step { record, .. } => {
                let panels = render::project_step(record, kind);
                if panels.is_empty() {
                    println!("{}", render::no_instances_label(kind));
                }
                for panel in panels {
                    println!("  {}", panel.title);
                    match panel.empty_label {
                        Some(label) => println!("    {}", label),
                        None => {
                            let values: Vec<&str> = panel
                                .nodes
                                .iter()
                                .filter_map(|node| match node {
                                    render::VisualNode::Value { text, .. } => Some(text.as_str()),
                                    render::VisualNode::Connector => None,
                                })
                                .collect();
                            let separator = match kind {
                                StructureKind::List => " -> ",
                                StructureKind::Stack => " | ",
                            };
                            println!("    {}", values.join(separator));
                        }
                    }
                }
            }
        }

        if !navigator.advance() {
            break;
        }
    }
    Ok(())
}

fn run_tui(mut app: App, run_at_start: bool) -> Result<()> {
    if run_at_start {
        app.start_run();
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal UI failed")
}
