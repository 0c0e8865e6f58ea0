use std::cell::RefCell;
use std::rc::Rc;

use edit_engine::{
    Engine, EngineError, EngineSetup, Hook, HookData, HookReply, OperationInput, Plugin,
    PluginModule, Surface, SurfaceEvent, VariantSupport,
};

/// A plugin whose `beforeOperation` handler replies with a fixed verdict.
struct OperationGate {
    reply: fn(HookData) -> HookReply,
    seen: Rc<RefCell<Vec<Hook>>>,
}

impl Plugin for OperationGate {
    fn name(&self) -> &str {
        "operation-gate"
    }
    fn hooks(&self) -> &[Hook] {
        &[Hook::BeforeOperation, Hook::AfterOperation]
    }
    fn on_hook(
        &mut self,
        hook: Hook,
        _event: &SurfaceEvent,
        data: HookData,
        _engine: &mut Engine,
    ) -> Result<HookReply, EngineError> {
        self.seen.borrow_mut().push(hook);
        if hook == Hook::BeforeOperation {
            return Ok((self.reply)(data));
        }
        Ok(HookReply::Continue)
    }
}

fn gated_engine(
    text: &str,
    reply: fn(HookData) -> HookReply,
) -> (Engine, Rc<RefCell<Vec<Hook>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let hooks = seen.clone();
    let mut setup = EngineSetup::framed(text);
    setup.modules = vec![PluginModule {
        name: "operation-gate",
        description: "test gate",
        category: "test",
        default_enabled: true,
        supports: VariantSupport::BOTH,
        config_key: None,
        config_key_alt: None,
        create: Box::new(move |_engine| {
            Ok(Box::new(OperationGate {
                reply,
                seen: hooks.clone(),
            }))
        }),
    }];
    (Engine::new(setup), seen)
}

fn replace_everything(engine: &mut Engine, replacement: &str) {
    let mut operations = engine.create_text_operation();
    for op in operations.iter_mut() {
        op.replacement = Some(replacement.to_string());
    }
    engine.execute_operations(operations);
}

#[test]
fn before_operation_can_cancel() {
    let (mut engine, seen) = gated_engine("abc", |_| HookReply::Prevent);
    engine.set_primary_selection(0, 3);
    replace_everything(&mut engine, "X");

    assert_eq!(engine.text(), "abc", "prevented operation leaves the buffer");
    assert_eq!(engine.history().undo_depth(), 0);
    // afterOperation never ran.
    assert_eq!(seen.borrow().as_slice(), [Hook::BeforeOperation]);
}

#[test]
fn before_operation_can_replace_the_descriptor_list() {
    fn swap(data: HookData) -> HookReply {
        let HookData::Operations(mut ops) = data else {
            return HookReply::Continue;
        };
        for op in ops.iter_mut() {
            op.replacement = Some("swapped".to_string());
        }
        HookReply::Replace(HookData::Operations(ops))
    }

    let (mut engine, seen) = gated_engine("abc", swap);
    engine.set_primary_selection(0, 3);
    replace_everything(&mut engine, "original");

    assert_eq!(engine.text(), "swapped");
    assert_eq!(
        seen.borrow().as_slice(),
        [Hook::BeforeOperation, Hook::AfterOperation]
    );
}

#[test]
fn legacy_single_descriptor_executes() {
    let mut engine = Engine::new(EngineSetup::framed("hello"));
    let mut operations = engine.create_text_operation();
    let mut single = operations.remove(0);
    single.sel_start = 0;
    single.sel_end = 5;
    single.cut_start = Some(0);
    single.cut_end = Some(5);
    single.replacement = Some("bye".to_string());
    engine.execute_operations(OperationInput::Single(single));
    assert_eq!(engine.text(), "bye");
}

#[test]
fn save_changes_fires_on_commit() {
    let saved = Rc::new(RefCell::new(Vec::<String>::new()));
    let log = saved.clone();

    let mut engine = Engine::new(EngineSetup::framed("a"));
    engine.set_save_changes(Box::new(move |text| log.borrow_mut().push(text.to_string())));

    engine.set_primary_selection(1, 1);
    engine.insert_at_all_cursors("b");
    assert_eq!(saved.borrow().last().map(String::as_str), Some("ab"));

    engine.undo();
    assert_eq!(saved.borrow().last().map(String::as_str), Some("a"));
}

#[test]
fn all_no_op_pass_refocuses_the_surface() {
    let mut engine = Engine::new(EngineSetup::framed("abc"));
    assert!(!engine.surface_mut().has_focus());

    let operations = engine.create_text_operation();
    // Nothing active: the executor re-focuses instead of editing.
    engine.execute_operations(operations);
    assert_eq!(engine.text(), "abc");
    assert!(engine.surface_mut().has_focus());
}

#[test]
fn descriptor_snapshot_is_sorted_and_mirrored() {
    let mut engine = Engine::new(EngineSetup::framed("abcdef"));
    engine.set_primary_selection(4, 6);
    engine.add_cursor(0, 2);

    let operations = engine.create_text_operation();
    assert_eq!(operations.len(), 2);
    assert_eq!(operations[0].sel_start, 0, "sorted ascending");
    assert_eq!(operations[0].selection, "ab");
    assert_eq!(operations[1].selection, "ef");
    assert!(operations.iter().all(|op| op.text == "abcdef"));
    assert_eq!(operations[1].cursor_index, 1);
}
