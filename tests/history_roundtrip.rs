use egui::{Pos2, pos2, vec2};
use journal_canvas::command::Command;
use journal_canvas::element::{ElementRef, TapeSelection, WashiPattern};
use journal_canvas::util::ManualClock;
use journal_canvas::{CanvasConfig, CanvasEngine, InputEvent, TextElement, ToolType};

fn engine() -> (CanvasEngine, ManualClock) {
    let clock = ManualClock::new(0.0);
    let engine = CanvasEngine::with_clock(
        vec2(800.0, 600.0),
        1.0,
        CanvasConfig::default(),
        Box::new(clock.clone()),
    );
    (engine, clock)
}

fn settle(engine: &mut CanvasEngine, clock: &ManualClock) {
    clock.advance(1.0);
    engine.tick();
}

fn drag(engine: &mut CanvasEngine, points: &[Pos2]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    engine.handle_event(InputEvent::PointerDown { pos: *first });
    for pos in rest {
        engine.handle_event(InputEvent::PointerMove { pos: *pos });
    }
    let last = rest.last().unwrap_or(first);
    engine.handle_event(InputEvent::PointerUp { pos: *last });
}

/// Apply the `i`th mutation of a fixed mix: text, marker strokes and tape.
/// Ink stays left of x = 400 and text right of it so gestures never land on
/// an element.
fn mutate(engine: &mut CanvasEngine, i: usize) {
    let row = 30.0 + (i % 14) as f32 * 38.0;
    match i % 3 {
        0 => {
            let text = TextElement::new(pos2(620.0, row), format!("note {i}"), engine.config());
            assert!(engine.execute(Command::AddText(text)));
        }
        1 => {
            engine.select_tool(Some(ToolType::Marker));
            drag(engine, &[pos2(20.0, row), pos2(120.0, row + 8.0), pos2(220.0, row)]);
            engine.select_tool(None);
        }
        _ => {
            let mut options = engine.options().clone();
            options.washi_tape = TapeSelection::Pattern(WashiPattern::ALL[i % WashiPattern::ALL.len()]);
            engine.set_tool_options(options);
            engine.select_tool(Some(ToolType::WashiTape));
            drag(engine, &[pos2(60.0, row), pos2(300.0, row + 4.0)]);
            engine.select_tool(None);
        }
    }
}

#[test]
fn test_restore_snapshot_reproduces_state() {
    let (mut engine, clock) = engine();
    for i in 0..6 {
        mutate(&mut engine, i);
        settle(&mut engine, &clock);
    }
    let saved = engine.snapshot();

    for i in 6..9 {
        mutate(&mut engine, i);
        settle(&mut engine, &clock);
    }
    assert_ne!(engine.snapshot(), saved);

    engine.restore_snapshot(&saved);
    assert_eq!(engine.snapshot(), saved);
}

#[test]
fn test_undo_all_returns_to_initial_and_redo_all_returns_to_final() {
    for n in [1, 2, 5, 9, 14] {
        let (mut engine, clock) = engine();
        for i in 0..n {
            mutate(&mut engine, i);
            settle(&mut engine, &clock);
        }
        assert_eq!(engine.history().undo_len(), n + 1, "n = {n}");
        let finished = engine.snapshot();

        for _ in 0..n {
            assert!(engine.undo());
        }
        assert!(!engine.undo());
        assert_eq!(Some(&engine.snapshot()), engine.history().initial(), "n = {n}");

        for _ in 0..n {
            assert!(engine.redo());
        }
        assert!(!engine.redo());
        assert_eq!(engine.snapshot(), finished, "n = {n}");
    }
}

#[test]
fn test_history_depth_is_bounded() {
    let (mut engine, clock) = engine();
    let initial = engine.history().initial().cloned();

    for i in 0..20 {
        let text = TextElement::new(pos2(600.0, 20.0 + i as f32 * 25.0), format!("line {i}"), engine.config());
        engine.execute(Command::AddText(text));
        settle(&mut engine, &clock);
        assert!(engine.history().undo_len() <= 15);
    }

    assert_eq!(engine.history().undo_len(), 15);
    assert_eq!(engine.history().initial().cloned(), initial);
}

#[test]
fn test_new_mutation_after_undo_clears_redo() {
    let (mut engine, clock) = engine();
    mutate(&mut engine, 0);
    settle(&mut engine, &clock);
    mutate(&mut engine, 3);
    settle(&mut engine, &clock);

    assert!(engine.undo());
    assert!(engine.can_redo());

    mutate(&mut engine, 6);
    settle(&mut engine, &clock);
    assert!(!engine.can_redo());
    assert_eq!(engine.store().text_elements.len(), 2);
}

#[test]
fn test_rapid_mutations_coalesce_into_one_entry() {
    let (mut engine, clock) = engine();
    for i in 0..4 {
        let text = TextElement::new(pos2(600.0, 40.0 + i as f32 * 40.0), "quick".to_owned(), engine.config());
        engine.execute(Command::AddText(text));
        clock.advance(0.1);
        engine.tick();
    }
    assert_eq!(engine.history().undo_len(), 1);

    settle(&mut engine, &clock);
    assert_eq!(engine.history().undo_len(), 2);
    assert!(engine.undo());
    assert!(engine.store().text_elements.is_empty());
}

#[test]
fn test_undo_restores_deleted_element() {
    let (mut engine, clock) = engine();
    let text = TextElement::new(pos2(600.0, 100.0), "keep me".to_owned(), engine.config());
    let id = text.id;
    engine.execute(Command::AddText(text));
    settle(&mut engine, &clock);

    engine.execute(Command::DeleteElement(ElementRef::Text(id)));
    settle(&mut engine, &clock);
    assert!(engine.store().text_elements.is_empty());

    assert!(engine.undo());
    assert_eq!(engine.store().text_elements[0].id, id);
    assert_eq!(engine.selection().text, None);
}
