use edit_engine::{Engine, EngineSetup, OpParams, Surface, TrimMode};
use edit_engine_ops::standard_operations;

fn engine_with(text: &str) -> Engine {
    let mut setup = EngineSetup::framed(text);
    setup.operations = standard_operations();
    Engine::new(setup)
}

#[test]
fn wrap_selection_with_trimming_through_the_engine() {
    let mut engine = engine_with("  hello  ");
    engine.set_primary_selection(0, 9);
    let params = OpParams {
        prefix: "__".to_string(),
        suffix: "__".to_string(),
        trim: TrimMode::Yes,
        ..OpParams::default()
    };
    engine.run_operation("wrap-selection", &params);

    assert_eq!(engine.text(), "  __hello__  ");
    let primary = engine.cursors().primary();
    assert_eq!((primary.start, primary.end), (2, 11));
}

#[test]
fn prefix_lines_toggles_and_undoes() {
    let mut engine = engine_with("foo\nbar\nbaz");
    engine.set_primary_selection(0, 11);
    let params = OpParams {
        prefix: "// ".to_string(),
        ..OpParams::default()
    };

    engine.run_operation("prefix-lines", &params);
    assert_eq!(engine.text(), "// foo\n// bar\n// baz");

    engine.run_operation("prefix-lines", &params);
    assert_eq!(engine.text(), "foo\nbar\nbaz");

    // Each toggle is one undoable step.
    assert!(engine.undo());
    assert_eq!(engine.text(), "// foo\n// bar\n// baz");
    assert!(engine.undo());
    assert_eq!(engine.text(), "foo\nbar\nbaz");
}

#[test]
fn multi_caret_insert_text_operation() {
    let mut engine = engine_with("a b");
    engine.set_primary_selection(1, 1);
    engine.add_cursor(3, 3);
    let params = OpParams {
        text: "!".to_string(),
        ..OpParams::default()
    };
    engine.run_operation("insert-text", &params);
    assert_eq!(engine.text(), "a! b!");
}

#[test]
fn excise_creates_store_items_through_the_engine() {
    let mut engine = engine_with("intro SECRET outro");
    engine.set_primary_selection(6, 12);
    let params = OpParams {
        base_title: "clip".to_string(),
        ..OpParams::default()
    };
    engine.run_operation("excise", &params);

    assert_eq!(engine.text(), "intro {{clip}} outro");
    assert_eq!(engine.store().text("clip").as_deref(), Some("SECRET"));

    // Undo restores the buffer; the store item remains (side effects are
    // not part of the text history).
    assert!(engine.undo());
    assert_eq!(engine.text(), "intro SECRET outro");
    assert!(engine.store().text("clip").is_some());
}

#[test]
fn focus_editor_refocuses_without_editing() {
    let mut engine = engine_with("steady");
    engine.run_operation("focus-editor", &OpParams::default());
    assert_eq!(engine.text(), "steady");
    assert!(engine.surface_mut().has_focus());
    assert_eq!(engine.history().undo_depth(), 0);
}

#[test]
fn replace_all_through_the_engine() {
    let mut engine = engine_with("old content");
    engine.set_primary_selection(2, 2);
    engine.add_cursor(5, 5);
    let params = OpParams {
        text: "new".to_string(),
        ..OpParams::default()
    };
    engine.run_operation("replace-all", &params);
    assert_eq!(engine.text(), "new");
    // Caret landed per the default select mode (end).
    assert_eq!(engine.cursors().primary().start, 3);
    assert_eq!(engine.cursors().len(), 1);
}
