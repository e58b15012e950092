//! Session controller tying the models to their collaborators
//!
//! A [`Session`] owns the two authoring surfaces and the replay navigator.
//! Handlers take an input event, update the owned state and return the
//! [`Effect`]s a front end must apply to the editor and output widgets.
//! Nothing here touches a terminal, so every transition is testable.
//!
//! # Run Lifecycle
//!
//! ```text
//! begin_run() ──▶ RunTicket{generation} ──▶ engine (maybe on another thread)
//!                                              │
//! finish_run(ticket, result) ◀─────────────────┘
//! ```
//! Only the ticket from the most recent [`Session::begin_run`] is applied.
//! Results that arrive for an older ticket are dropped.

pub mod events;

use crate::codegen;
use crate::engine::{EngineError, EngineOutput};
use crate::model::{logical_position, ModelError, SequenceModel, StructureKind};
use crate::replay::{NavControls, ReplayNavigator};
use crate::trace::{TraceModel, DEFAULT_MAX_STEPS};
use tracing::{debug, info, warn};

pub use events::{DragEvent, Editor, Effect, Surface};

/// Message shown when a run succeeds without printing anything
pub const DEFAULT_OUTPUT: &str = "Code executed successfully";

/// Identifies one run request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owned state of one visualizer session
#[derive(Debug)]
pub struct Session {
    kind: StructureKind,
    canvas: SequenceModel,
    stack: SequenceModel,
    navigator: ReplayNavigator,
    output: String,
    run_failed: bool,
    generation: u64,
    in_flight: bool,
    max_steps: usize,
}

impl Session {
    pub fn new(kind: StructureKind) -> Self {
        Session {
            kind,
            canvas: SequenceModel::new(StructureKind::List),
            stack: SequenceModel::new(StructureKind::Stack),
            navigator: ReplayNavigator::empty(),
            output: String::new(),
            run_failed: false,
            generation: 0,
            in_flight: false,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Cap the number of steps accepted from one run
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Structure kind being replayed
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn surface(&self, surface: Surface) -> Option<&SequenceModel> {
        match surface {
            Surface::Canvas => Some(&self.canvas),
            Surface::Stack => Some(&self.stack),
            Surface::Palette => None,
        }
    }

    fn surface_mut(&mut self, surface: Surface) -> Option<&mut SequenceModel> {
        match surface {
            Surface::Canvas => Some(&mut self.canvas),
            Surface::Stack => Some(&mut self.stack),
            Surface::Palette => None,
        }
    }

    pub fn navigator(&self) -> &ReplayNavigator {
        &self.navigator
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_running(&self) -> bool {
        self.in_flight
    }

    /// Whether the most recently applied run ended in an engine error
    pub fn last_run_failed(&self) -> bool {
        self.run_failed
    }

    // ========== Direct manipulation ==========

    /// Apply one drag-and-drop signal
    pub fn handle_drag(&mut self, event: DragEvent) -> Vec<Effect> {
        match self.apply_drag(event) {
            Ok(Some(surface)) => self.synthesis_effects(surface),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "rejected drag event");
                Vec::new()
            }
        }
    }

    /// Returns the surface that changed, if any
    fn apply_drag(&mut self, event: DragEvent) -> Result<Option<Surface>, ModelError> {
        match event {
            DragEvent::Dropped {
                origin,
                target: Surface::Palette,
                origin_position,
                ..
            } if origin != Surface::Palette => self.remove_from(origin, origin_position),
            DragEvent::Dropped {
                value,
                origin,
                target,
                ..
            } => {
                if origin != Surface::Palette {
                    debug!(?origin, ?target, "ignoring drop that does not come from the palette");
                    return Ok(None);
                }
                let Some(model) = self.surface_mut(target) else {
                    return Ok(None);
                };
                model.append(value);
                Ok(Some(target))
            }
            DragEvent::Removed {
                origin,
                origin_position,
                ..
            } => self.remove_from(origin, origin_position),
        }
    }

    /// Take the value at `origin_position` (a visual index) off `origin`
    fn remove_from(
        &mut self,
        origin: Surface,
        origin_position: Option<usize>,
    ) -> Result<Option<Surface>, ModelError> {
        let Some(model) = self.surface_mut(origin) else {
            return Ok(None);
        };
        match model.kind() {
            StructureKind::List => {
                let visual = origin_position.ok_or_else(|| ModelError::InvalidOperation {
                    kind: "list",
                    message: "removal needs the node's position".to_string(),
                })?;
                model.remove_at(logical_position(visual))?;
            }
            StructureKind::Stack => {
                let top = model.top_position().ok_or(ModelError::OutOfRange {
                    position: origin_position.unwrap_or(0),
                    len: 0,
                })?;
                // Stack surfaces have no connectors: visual index == position
                if let Some(position) = origin_position.filter(|&p| p != top) {
                    return Err(ModelError::InvalidOperation {
                        kind: "stack",
                        message: format!(
                            "only the top value (position {}) can be removed, not position {}",
                            top, position
                        ),
                    });
                }
                model.pop()?;
            }
        }
        Ok(Some(origin))
    }

    /// Reset a surface to empty
    pub fn clear_surface(&mut self, surface: Surface) -> Vec<Effect> {
        match self.surface_mut(surface) {
            Some(model) => {
                model.clear();
                self.synthesis_effects(surface)
            }
            None => Vec::new(),
        }
    }

    /// Current synthesized program for a surface
    pub fn synthesized(&self, surface: Surface) -> Option<String> {
        self.surface(surface).map(codegen::synthesize)
    }

    fn synthesis_effects(&self, surface: Surface) -> Vec<Effect> {
        self.synthesized(surface)
            .map(|code| vec![Effect::SetEditorText(code)])
            .unwrap_or_default()
    }

    // ========== Trace replay ==========

    /// Register a new run request and hand out its ticket
    pub fn begin_run(&mut self) -> RunTicket {
        self.generation += 1;
        self.in_flight = true;
        info!(generation = self.generation, "run started");
        RunTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of a run, unless a newer run has started since
    pub fn finish_run(
        &mut self,
        ticket: RunTicket,
        result: Result<EngineOutput, EngineError>,
    ) -> Vec<Effect> {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                latest = self.generation,
                "dropping result of superseded run"
            );
            return Vec::new();
        }
        self.in_flight = false;

        // Whatever happens, the previous trace is gone
        self.navigator = ReplayNavigator::empty();

        let max_steps = self.max_steps;
        let built = result.and_then(|output| {
            let trace = output.trace.ok_or(EngineError::MissingTrace)?;
            let model = TraceModel::from_json(trace, max_steps)?;
            Ok((output.stdout, model))
        });

        match built {
            Ok((stdout, trace)) => {
                info!(steps = trace.len(), "run finished");
                self.run_failed = false;
                self.output = if stdout.is_empty() {
                    DEFAULT_OUTPUT.to_string()
                } else {
                    stdout
                };
                self.navigator = ReplayNavigator::new(trace);
                let mut effects = vec![Effect::SetOutput(self.output.clone())];
                effects.extend(self.step_effects());
                effects
            }
            Err(e) => {
                warn!(error = %e, "run failed");
                self.run_failed = true;
                self.output = format!("Error: {}", e);
                vec![
                    Effect::SetOutput(self.output.clone()),
                    Effect::HighlightLine(None),
                    Effect::Controls(NavControls::default()),
                ]
            }
        }
    }

    pub fn advance(&mut self) -> Vec<Effect> {
        if self.navigator.advance() {
            self.step_effects()
        } else {
            Vec::new()
        }
    }

    pub fn retreat(&mut self) -> Vec<Effect> {
        if self.navigator.retreat() {
            self.step_effects()
        } else {
            Vec::new()
        }
    }

    pub fn rewind(&mut self) -> Vec<Effect> {
        if self.navigator.rewind() {
            self.step_effects()
        } else {
            Vec::new()
        }
    }

    pub fn jump_to_end(&mut self) -> Vec<Effect> {
        if self.navigator.jump_to_end() {
            self.step_effects()
        } else {
            Vec::new()
        }
    }

    fn step_effects(&self) -> Vec<Effect> {
        vec![
            Effect::HighlightLine(self.navigator.current_view().highlight_line()),
            Effect::Controls(self.navigator.controls()),
        ]
    }
}

/// Apply the editor effects to `editor`, returning the rest in order
pub fn apply_editor_effects<E: Editor + ?Sized>(
    editor: &mut E,
    effects: impl IntoIterator<Item = Effect>,
) -> Vec<Effect> {
    let mut rest = Vec::new();
    for effect in effects {
        match effect {
            Effect::SetEditorText(text) => editor.set_text(text),
            Effect::HighlightLine(line) => editor.highlight_line(line),
            other => rest.push(other),
        }
    }
    rest
}
