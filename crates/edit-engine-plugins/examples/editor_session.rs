//! A headless editing session exercising the full stack: engine, operation
//! modules, and the standard plugin set.
//!
//! Run with `cargo run --example editor_session`.

use edit_engine::{Engine, EngineMessage, EngineSetup, InputEvent, OpParams};
use edit_engine_ops::standard_operations;
use edit_engine_plugins::standard_modules;

fn main() {
    let mut setup = EngineSetup::framed("! Notes\nalpha beta\nalpha gamma\n");
    setup.modules = standard_modules();
    setup.operations = standard_operations();
    let mut engine = Engine::new(setup);
    engine.set_save_changes(Box::new(|text| {
        println!("saved ({} chars)", text.chars().count());
    }));

    // Put a caret on the first "alpha" and select every occurrence.
    engine.set_primary_selection(8, 13);
    engine.handle_message(EngineMessage::SelectAllOccurrences);
    println!("carets: {}", engine.cursors().len());

    // Type at all of them through the pipeline.
    engine.dispatch_input(InputEvent::insert_text("ALPHA"));
    println!("text:\n{}", engine.text());

    // Wrap the primary selection with an operation module.
    engine.set_primary_selection(8, 13);
    engine.run_operation(
        "wrap-selection",
        &OpParams {
            prefix: "''".to_string(),
            suffix: "''".to_string(),
            ..OpParams::default()
        },
    );
    println!("wrapped:\n{}", engine.text());

    // And take it all back.
    while engine.undo() {}
    println!("after undo:\n{}", engine.text());

    engine.destroy();
}
