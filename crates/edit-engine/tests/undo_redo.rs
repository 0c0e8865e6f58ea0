use edit_engine::{
    Engine, EngineSetup, InputEvent, KeyEvent, ManualClock, Modifiers, OpParams,
};

fn typing_engine(text: &str, clock: ManualClock) -> Engine {
    let mut setup = EngineSetup::framed(text);
    setup.clock = Box::new(clock);
    Engine::new(setup)
}

fn type_char(engine: &mut Engine, ch: &str) {
    engine.dispatch_input(InputEvent::insert_text(ch));
}

#[test]
fn typed_burst_coalesces_across_the_window() {
    let clock = ManualClock::starting_at(10_000);
    let mut engine = typing_engine("", clock.clone());
    engine.set_primary_selection(0, 0);

    type_char(&mut engine, "a");
    clock.advance(200);
    type_char(&mut engine, "b");
    clock.advance(500);
    type_char(&mut engine, "c");

    assert_eq!(engine.text(), "abc");
    assert_eq!(engine.history().undo_depth(), 2);

    assert!(engine.undo());
    assert_eq!(engine.text(), "ab");
    assert!(engine.undo());
    assert_eq!(engine.text(), "");
    assert!(!engine.undo());

    assert!(engine.redo());
    assert_eq!(engine.text(), "ab");
    assert!(engine.redo());
    assert_eq!(engine.text(), "abc");
    assert!(!engine.redo());
}

#[test]
fn multi_caret_insert_breaks_coalescing_both_ways() {
    let clock = ManualClock::starting_at(10_000);
    let mut engine = typing_engine("xy", clock.clone());
    engine.set_primary_selection(0, 0);

    type_char(&mut engine, "a");
    // A forced-separate record (multi-caret insert) right inside the window.
    clock.advance(100);
    engine.add_cursor(2, 2);
    engine.insert_at_all_cursors("!");
    engine.clear_secondary_cursors();
    // The next typed char must open a fresh entry regardless of timing.
    clock.advance(50);
    type_char(&mut engine, "b");

    assert_eq!(engine.history().undo_depth(), 3);
}

#[test]
fn undo_restores_cursors_and_selection() {
    let mut engine = Engine::new(EngineSetup::framed("hello"));
    engine.set_primary_selection(0, 5);
    engine.insert_at_all_cursors("X");
    assert_eq!(engine.text(), "X");

    assert!(engine.undo());
    assert_eq!(engine.text(), "hello");
    let primary = engine.cursors().primary();
    assert_eq!((primary.start, primary.end), (0, 5));
}

#[test]
fn operation_round_trip_restores_the_snapshot() {
    let mut setup = EngineSetup::framed("one two one");
    setup.operations = vec![];
    let mut engine = Engine::new(setup);
    engine.set_primary_selection(0, 3);
    engine.add_cursor(8, 11);

    let mut operations = engine.create_text_operation();
    for op in operations.iter_mut() {
        op.replacement = Some("three".to_string());
    }
    engine.execute_operations(operations);
    assert_eq!(engine.text(), "three two three");

    assert!(engine.undo());
    assert_eq!(engine.text(), "one two one");
    let ranges: Vec<(usize, usize)> = engine
        .cursors()
        .cursors()
        .iter()
        .map(|c| (c.start, c.end))
        .collect();
    assert_eq!(ranges, vec![(0, 3), (8, 11)]);

    assert!(engine.redo());
    assert_eq!(engine.text(), "three two three");
}

#[test]
fn ctrl_z_and_ctrl_y_drive_history() {
    let mut engine = Engine::new(EngineSetup::framed(""));
    type_char(&mut engine, "a");

    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::default()
    };
    let disposition = engine.handle_keydown(KeyEvent::with_modifiers("z", ctrl));
    assert!(disposition.default_prevented);
    assert_eq!(engine.text(), "");

    let disposition = engine.handle_keydown(KeyEvent::with_modifiers("y", ctrl));
    assert!(disposition.default_prevented);
    assert_eq!(engine.text(), "a");

    // Meta+Shift+Z also redoes.
    engine.handle_keydown(KeyEvent::with_modifiers("z", ctrl));
    assert_eq!(engine.text(), "");
    let meta_shift = Modifiers {
        meta: true,
        shift: true,
        ..Modifiers::default()
    };
    engine.handle_keydown(KeyEvent::with_modifiers("Z", meta_shift));
    assert_eq!(engine.text(), "a");
}

#[test]
fn unknown_operation_changes_nothing() {
    let mut engine = Engine::new(EngineSetup::framed("stable"));
    engine.run_operation("no-such-op", &OpParams::default());
    assert_eq!(engine.text(), "stable");
    assert_eq!(engine.history().undo_depth(), 0);
}
