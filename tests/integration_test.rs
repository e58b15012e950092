// Integration tests for the visualizer session

use dsviz::codegen;
use dsviz::engine::{EngineError, EngineOutput, ExecutionEngine, TraceFileEngine};
use dsviz::model::{SequenceModel, StructureKind};
use dsviz::render::{self, VisualNode};
use dsviz::replay::{NavControls, StepView};
use dsviz::session::{apply_editor_effects, DragEvent, Editor, Effect, Session, Surface};
use dsviz::ui::panes::{self, SourceBuffer};
use ratatui::{backend::TestBackend, Terminal};
use serde_json::{json, Value as JsonValue};

/// Engine returning a canned report
struct StubEngine {
    stdout: String,
    trace: Option<JsonValue>,
}

impl ExecutionEngine for StubEngine {
    fn run(&self, _source: &str) -> Result<EngineOutput, EngineError> {
        Ok(EngineOutput::new(self.stdout.clone(), self.trace.clone()))
    }
}

/// Engine that always fails
struct BrokenEngine;

impl ExecutionEngine for BrokenEngine {
    fn run(&self, _source: &str) -> Result<EngineOutput, EngineError> {
        Err(EngineError::Failed {
            message: "NameError: name 'x' is not defined".to_string(),
        })
    }
}

fn drop_value(session: &mut Session, target: Surface, value: &str) -> Vec<Effect> {
    session.handle_drag(DragEvent::Dropped {
        value: value.into(),
        origin: Surface::Palette,
        target,
        origin_position: None,
    })
}

fn run_with(session: &mut Session, engine: &dyn ExecutionEngine) -> Vec<Effect> {
    let ticket = session.begin_run();
    let result = engine.run("");
    session.finish_run(ticket, result)
}

fn nine_step_trace() -> JsonValue {
    let steps: Vec<JsonValue> = (1..=9)
        .map(|i| {
            json!({
                "line": i + 10,
                "code": format!("ll.append({})", i),
                "action": format!("Append {}", i),
                "instances": { "ll": (1..=i).collect::<Vec<_>>() }
            })
        })
        .collect();
    JsonValue::Array(steps)
}

// ========== Direct manipulation ==========

#[test]
fn test_list_build_and_remove_middle() {
    let mut session = Session::new(StructureKind::List);
    let mut editor = SourceBuffer::default();

    for value in ["10", "20", "30"] {
        let effects = drop_value(&mut session, Surface::Canvas, value);
        apply_editor_effects(&mut editor, effects);
    }

    // Visual layout: [10] → [20] → [30], so 20 sits at visual index 2
    let nodes = render::project_sequence(session.surface(Surface::Canvas).unwrap());
    assert_eq!(nodes.len(), 5);
    assert!(matches!(&nodes[2], VisualNode::Value { text, .. } if text == "20"));

    let effects = session.handle_drag(DragEvent::Removed {
        value: "20".into(),
        origin: Surface::Canvas,
        origin_position: Some(2),
    });
    apply_editor_effects(&mut editor, effects);

    let canvas = session.surface(Surface::Canvas).unwrap();
    assert_eq!(canvas.values(), vec!["10", "30"]);

    let code = editor.text();
    assert!(code.contains("head = Node(\"10\")"));
    assert!(code.contains("node1 = Node(\"30\")"));
    assert!(code.contains("head.next = node1"));
    assert!(!code.contains("\"20\""));
}

#[test]
fn test_stack_push_and_pop() {
    let mut session = Session::new(StructureKind::Stack);
    let mut editor = SourceBuffer::default();

    for value in ["10", "20", "30"] {
        let effects = drop_value(&mut session, Surface::Stack, value);
        apply_editor_effects(&mut editor, effects);
    }

    // Only the top (position 2) may leave the stack
    let rejected = session.handle_drag(DragEvent::Removed {
        value: "10".into(),
        origin: Surface::Stack,
        origin_position: Some(0),
    });
    assert!(rejected.is_empty());
    assert_eq!(session.surface(Surface::Stack).unwrap().len(), 3);

    let effects = session.handle_drag(DragEvent::Removed {
        value: "30".into(),
        origin: Surface::Stack,
        origin_position: Some(2),
    });
    apply_editor_effects(&mut editor, effects);

    let stack = session.surface(Surface::Stack).unwrap();
    assert_eq!(stack.values(), vec!["10", "20"]);
    assert_eq!(stack.top().map(|t| t.as_str()), Some("20"));
    assert_eq!(
        editor.text(),
        "stack = []\nstack.append(\"10\")\nstack.append(\"20\")\n"
    );
}

#[test]
fn test_drop_between_surfaces_is_ignored() {
    let mut session = Session::new(StructureKind::List);
    drop_value(&mut session, Surface::Canvas, "10");

    let effects = session.handle_drag(DragEvent::Dropped {
        value: "10".into(),
        origin: Surface::Canvas,
        target: Surface::Canvas,
        origin_position: None,
    });
    assert!(effects.is_empty());
    assert_eq!(session.surface(Surface::Canvas).unwrap().len(), 1);
}

#[test]
fn test_clear_restores_placeholder() {
    let mut session = Session::new(StructureKind::Stack);
    let mut editor = SourceBuffer::default();
    drop_value(&mut session, Surface::Stack, "1");

    let effects = session.clear_surface(Surface::Stack);
    apply_editor_effects(&mut editor, effects);
    assert_eq!(editor.text(), codegen::EMPTY_STACK_PLACEHOLDER);
}

#[test]
fn test_synthesis_matches_model_directly() {
    let model = SequenceModel::from_values(StructureKind::List, ["a", "b", "c"]);
    let mut session = Session::new(StructureKind::List);
    for value in ["a", "b", "c"] {
        drop_value(&mut session, Surface::Canvas, value);
    }
    assert_eq!(
        session.synthesized(Surface::Canvas),
        Some(codegen::synthesize(&model))
    );
}

// ========== Replay ==========

#[test]
fn test_nine_step_navigation() {
    let mut session = Session::new(StructureKind::List);
    let engine = StubEngine {
        stdout: String::new(),
        trace: Some(nine_step_trace()),
    };
    let mut editor = SourceBuffer::new("program");

    let effects = run_with(&mut session, &engine);
    let rest = apply_editor_effects(&mut editor, effects);
    assert_eq!(session.output(), "Code executed successfully");
    assert!(rest.contains(&Effect::Controls(NavControls {
        prev: false,
        next: true
    })));
    assert_eq!(editor.highlighted(), Some(11));

    for _ in 0..8 {
        let effects = session.advance();
        assert!(!effects.is_empty());
        apply_editor_effects(&mut editor, effects);
    }
    assert_eq!(session.navigator().position(), Some(8));
    assert_eq!(editor.highlighted(), Some(19));
    assert_eq!(
        session.navigator().controls(),
        NavControls {
            prev: true,
            next: false
        }
    );

    // Boundary moves are no-ops
    assert!(session.advance().is_empty());
    assert_eq!(session.navigator().position(), Some(8));

    let effects = session.rewind();
    assert!(!effects.is_empty());
    assert!(session.retreat().is_empty());
    assert_eq!(session.navigator().position(), Some(0));

    match session.navigator().current_view() {
        StepView::Step { record, index, total } => {
            assert_eq!((index, total), (0, 9));
            assert_eq!(record.instance("ll").map(<[String]>::len), Some(1));
            let header = render::step_header(&session.navigator().current_view());
            assert_eq!(header.step_info, "Step 1 of 9");
            assert_eq!(header.current_line, "Current Line: 11 | Code: ll.append(1)");
            assert_eq!(header.description, "1. Append 1");
        }
        StepView::Nothing => panic!("expected a step"),
    }
}

#[test]
fn test_failed_run_discards_previous_trace() {
    let mut session = Session::new(StructureKind::List);
    let good = StubEngine {
        stdout: "hello\n".to_string(),
        trace: Some(nine_step_trace()),
    };
    run_with(&mut session, &good);
    assert_eq!(session.navigator().total(), 9);
    assert_eq!(session.output(), "hello\n");

    let effects = run_with(&mut session, &BrokenEngine);
    assert_eq!(session.navigator().total(), 0);
    assert!(session.output().starts_with("Error: "));
    assert!(session.output().contains("NameError"));
    assert!(effects.contains(&Effect::HighlightLine(None)));
    assert!(effects.contains(&Effect::Controls(NavControls::default())));
    assert_eq!(render::step_header(&session.navigator().current_view()).step_info, "Step 0 of 0");
}

#[test]
fn test_missing_trace_is_a_failure() {
    let mut session = Session::new(StructureKind::Stack);
    let engine = StubEngine {
        stdout: "printed\n".to_string(),
        trace: None,
    };
    run_with(&mut session, &engine);
    assert!(session.output().starts_with("Error: "));
    assert_eq!(session.navigator().total(), 0);
}

#[test]
fn test_stale_run_is_dropped() {
    let mut session = Session::new(StructureKind::List);
    let first = session.begin_run();
    let second = session.begin_run();

    let stale = session.finish_run(first, Ok(EngineOutput::new("old", Some(nine_step_trace()))));
    assert!(stale.is_empty());
    assert!(session.is_running());
    assert_eq!(session.navigator().total(), 0);

    let fresh = session.finish_run(second, Ok(EngineOutput::new("new", Some(json!([])))));
    assert!(!fresh.is_empty());
    assert!(!session.is_running());
    assert_eq!(session.output(), "new");
    assert_eq!(session.navigator().current_view(), StepView::Nothing);
}

#[test]
fn test_empty_stack_instance_label() {
    let mut session = Session::new(StructureKind::Stack);
    let trace = json!([
        { "line": 3, "code": "s = Stack()", "instances": { "s": [] } },
        { "line": 4, "code": "s.push(1)", "action": "", "instances": { "s": [1] } }
    ]);
    run_with(
        &mut session,
        &StubEngine {
            stdout: String::new(),
            trace: Some(trace),
        },
    );

    let StepView::Step { record, .. } = session.navigator().current_view() else {
        panic!("expected a step");
    };
    let panels = render::project_step(record, StructureKind::Stack);
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].title, "s: [] (size: 0)");
    assert_eq!(panels[0].empty_label, Some("Empty Stack"));

    session.advance();
    let header = render::step_header(&session.navigator().current_view());
    // Empty action falls back to the code text
    assert_eq!(header.description, "2. s.push(1)");
}

#[test]
fn test_trace_file_engine_replay() {
    let path = std::env::temp_dir().join(format!("dsviz-it-{}.json", std::process::id()));
    std::fs::write(
        &path,
        json!({ "stdout": "done\n", "trace": nine_step_trace() }).to_string(),
    )
    .unwrap();

    let mut session = Session::new(StructureKind::List);
    run_with(&mut session, &TraceFileEngine::new(&path));
    std::fs::remove_file(&path).ok();

    assert_eq!(session.output(), "done\n");
    assert_eq!(session.navigator().total(), 9);
}

#[test]
fn test_instance_panels_follow_engine_order() {
    let path = std::env::temp_dir().join(format!("dsviz-order-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"stdout": "", "trace": [
            {"line": 1, "code": "x", "instances": {"zeta": [1], "alpha": [], "mid": [2, 3]}}
        ]}"#,
    )
    .unwrap();

    let mut session = Session::new(StructureKind::Stack);
    run_with(&mut session, &TraceFileEngine::new(&path));
    std::fs::remove_file(&path).ok();
    assert!(!session.last_run_failed());

    let StepView::Step { record, .. } = session.navigator().current_view() else {
        panic!("expected a step");
    };
    let names: Vec<String> = render::project_step(record, StructureKind::Stack)
        .into_iter()
        .map(|panel| panel.name)
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_program_printing_error_text_keeps_its_trace() {
    let mut session = Session::new(StructureKind::List);
    run_with(
        &mut session,
        &StubEngine {
            stdout: "Error: retrying\n".to_string(),
            trace: Some(nine_step_trace()),
        },
    );
    assert!(!session.last_run_failed());
    assert_eq!(session.output(), "Error: retrying\n");
    assert_eq!(session.navigator().total(), 9);

    run_with(&mut session, &BrokenEngine);
    assert!(session.last_run_failed());
}

#[test]
fn test_dragging_stack_top_back_to_palette() {
    let mut session = Session::new(StructureKind::Stack);
    let mut editor = SourceBuffer::default();
    for value in ["10", "20", "30"] {
        let effects = drop_value(&mut session, Surface::Stack, value);
        apply_editor_effects(&mut editor, effects);
    }

    let effects = session.handle_drag(DragEvent::Dropped {
        value: "30".into(),
        origin: Surface::Stack,
        target: Surface::Palette,
        origin_position: Some(2),
    });
    apply_editor_effects(&mut editor, effects);

    assert_eq!(session.surface(Surface::Stack).unwrap().values(), vec!["10", "20"]);
    assert_eq!(
        editor.text(),
        "stack = []\nstack.append(\"10\")\nstack.append(\"20\")\n"
    );
}

// ========== Rendering ==========

#[test]
fn test_replay_pane_renders_step() {
    let mut session = Session::new(StructureKind::List);
    run_with(
        &mut session,
        &StubEngine {
            stdout: String::new(),
            trace: Some(nine_step_trace()),
        },
    );
    session.jump_to_end();

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    let mut scroll = 0;
    terminal
        .draw(|f| {
            panes::render_replay_pane(
                f,
                f.area(),
                &session.navigator().current_view(),
                StructureKind::List,
                true,
                &mut scroll,
            )
        })
        .unwrap();

    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(screen.contains("Step 9 of 9"));
    assert!(screen.contains("[1] → [2]"));
}
