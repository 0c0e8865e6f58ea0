use std::cell::RefCell;
use std::rc::Rc;

use edit_engine::{
    Engine, EngineSetup, InputEvent, InputType, KeyEvent, SelectionRange, Surface,
};

fn framed(text: &str) -> Engine {
    Engine::new(EngineSetup::framed(text))
}

fn composition_update(data: &str) -> InputEvent {
    InputEvent {
        input_type: InputType::InsertCompositionText,
        data: Some(data.to_string()),
        is_composing: true,
    }
}

#[test]
fn composition_collapses_carets_and_records_once() {
    let mut engine = framed("ab");
    engine.set_primary_selection(2, 2);
    engine.add_cursor(0, 0);
    assert_eq!(engine.cursors().len(), 2);

    engine.handle_composition_start();
    assert_eq!(engine.cursors().len(), 1, "IME disallows multi-caret");

    // Composition updates flow through without the multi-caret intercept and
    // without recording.
    let disposition = engine.dispatch_input(composition_update("日"));
    assert!(!disposition.default_prevented);
    let disposition = engine.dispatch_input(composition_update("本"));
    assert!(!disposition.default_prevented);
    assert_eq!(engine.history().undo_depth(), 0);

    engine.handle_composition_end(Some("日本".to_string()));
    assert_eq!(engine.history().undo_depth(), 1, "one separate entry");
    assert_eq!(engine.history().entries()[0].before.text, "ab");
    assert!(engine.text().contains('日'));
}

#[test]
fn undo_after_composition_restores_the_precomposition_text() {
    let mut engine = framed("x");
    engine.set_primary_selection(1, 1);
    engine.handle_composition_start();
    engine.dispatch_input(composition_update("あ"));
    engine.handle_composition_end(Some("あ".to_string()));
    assert_eq!(engine.text(), "xあ");

    assert!(engine.undo());
    assert_eq!(engine.text(), "x");
}

#[test]
fn selection_poll_detects_surface_drift() {
    struct PollProbe {
        changed: Rc<RefCell<usize>>,
    }
    impl edit_engine::Plugin for PollProbe {
        fn name(&self) -> &str {
            "poll-probe"
        }
        fn hooks(&self) -> &[edit_engine::Hook] {
            &[edit_engine::Hook::SelectionChange]
        }
        fn on_hook(
            &mut self,
            _hook: edit_engine::Hook,
            _event: &edit_engine::SurfaceEvent,
            _data: edit_engine::HookData,
            _engine: &mut Engine,
        ) -> Result<edit_engine::HookReply, edit_engine::EngineError> {
            *self.changed.borrow_mut() += 1;
            Ok(edit_engine::HookReply::Continue)
        }
    }

    let changed = Rc::new(RefCell::new(0usize));
    let counter = changed.clone();
    let mut setup = EngineSetup::framed("abcdef");
    setup.modules = vec![edit_engine::PluginModule {
        name: "poll-probe",
        description: "test probe",
        category: "test",
        default_enabled: true,
        supports: edit_engine::VariantSupport::BOTH,
        config_key: None,
        config_key_alt: None,
        create: Box::new(move |_engine| {
            Ok(Box::new(PollProbe {
                changed: counter.clone(),
            }))
        }),
    }];
    let mut engine = Engine::new(setup);

    // No drift: no dispatch.
    engine.poll_selection();
    assert_eq!(*changed.borrow(), 0);

    // Engine-driven moves update the last-known selection; no drift either.
    engine.set_primary_selection(2, 4);
    engine.poll_selection();
    assert_eq!(*changed.borrow(), 0);

    // The surface moving on its own (browser UX) is drift: one dispatch.
    engine.surface_mut().set_selection(SelectionRange::new(5, 5));
    engine.poll_selection();
    assert_eq!(*changed.borrow(), 1);
    assert_eq!(engine.cursors().primary().start, 5);

    // Stable again.
    engine.poll_selection();
    assert_eq!(*changed.borrow(), 1);
}

#[test]
fn scroll_sets_the_overlay_transform() {
    let mut setup = EngineSetup::framed("abc");
    let mut surface = edit_engine::BufferSurface::new("abc");
    surface.set_scroll(12.0, 30.0);
    setup.surface = Box::new(surface);
    let mut engine = Engine::new(setup);

    engine.handle_scroll();
    assert_eq!(engine.overlay().unwrap().transform(), (-12.0, -30.0));
}

#[test]
fn destroyed_engine_ignores_everything() {
    let mut engine = framed("abc");
    engine.destroy();
    assert!(engine.is_destroyed());

    let disposition = engine.dispatch_input(InputEvent::insert_text("x"));
    assert!(!disposition.default_prevented);
    assert_eq!(engine.text(), "abc");

    engine.handle_keydown(KeyEvent::plain("Escape"));
    engine.handle_composition_start();
    engine.poll_selection();
    assert!(!engine.undo());
    assert!(engine.add_cursor(0, 0).is_none());

    // Destruction is idempotent.
    engine.destroy();
    assert_eq!(engine.cursors().len(), 1);
}

#[test]
fn keyboard_manager_runs_before_the_host_handler() {
    let order = Rc::new(RefCell::new(Vec::new()));

    let mut engine = framed("abc");
    let manager_order = order.clone();
    engine.set_keyboard_handler(Box::new(move |_key| {
        manager_order.borrow_mut().push("manager");
        true
    }));
    let host_order = order.clone();
    engine.set_host_key_handler(Box::new(move |_key| {
        host_order.borrow_mut().push("host");
        true
    }));

    let disposition = engine.handle_keydown(KeyEvent::plain("F5"));
    assert!(disposition.default_prevented);
    // The manager consumed the key; the host handler never ran.
    assert_eq!(order.borrow().as_slice(), ["manager"]);
}

#[test]
fn surface_selection_is_mirrored_from_the_primary() {
    let mut engine = framed("abcdef");
    engine.set_primary_selection(2, 5);
    assert_eq!(engine.selection(), SelectionRange::new(2, 5));
}

#[test]
fn click_syncs_the_primary_from_the_surface() {
    let mut setup = EngineSetup::framed("abcdef");
    let mut surface = edit_engine::BufferSurface::new("abcdef");
    surface.set_selection(SelectionRange::new(3, 3));
    setup.surface = Box::new(surface);
    let mut engine = Engine::new(setup);

    engine.handle_click(Some(3));
    assert_eq!(engine.cursors().primary().start, 3);
}
