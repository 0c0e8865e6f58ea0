use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use edit_engine::{
    ContentStore, Engine, EngineError, EngineSetup, EngineVariant, Hook, HookData, HookReply,
    InputEvent, Plugin, PluginModule, PluginReason, SurfaceEvent, VariantSupport,
};

struct Recorder {
    name: &'static str,
    reply: HookReply,
    log: Rc<RefCell<Vec<String>>>,
}

impl Plugin for Recorder {
    fn name(&self) -> &str {
        self.name
    }
    fn hooks(&self) -> &[Hook] {
        &[Hook::BeforeInput]
    }
    fn on_hook(
        &mut self,
        _hook: Hook,
        _event: &SurfaceEvent,
        data: HookData,
        _engine: &mut Engine,
    ) -> Result<HookReply, EngineError> {
        let suffix = match &data {
            HookData::Text(text) => format!(":{text}"),
            _ => String::new(),
        };
        self.log.borrow_mut().push(format!("{}{suffix}", self.name));
        Ok(self.reply.clone())
    }
    fn enable(&mut self, _engine: &mut Engine) -> Result<(), EngineError> {
        self.log.borrow_mut().push(format!("{}+enable", self.name));
        Ok(())
    }
    fn destroy(&mut self, _engine: &mut Engine) -> Result<(), EngineError> {
        self.log.borrow_mut().push(format!("{}+destroy", self.name));
        Ok(())
    }
}

fn recorder_module(
    name: &'static str,
    reply: HookReply,
    log: Rc<RefCell<Vec<String>>>,
) -> PluginModule {
    PluginModule {
        name,
        description: "test recorder",
        category: "test",
        default_enabled: true,
        supports: VariantSupport::BOTH,
        config_key: None,
        config_key_alt: None,
        create: Box::new(move |_engine| {
            Ok(Box::new(Recorder {
                name,
                reply: reply.clone(),
                log: log.clone(),
            }))
        }),
    }
}

#[test]
fn hooks_run_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![
        recorder_module("first", HookReply::Continue, log.clone()),
        recorder_module("second", HookReply::Continue, log.clone()),
    ];
    let mut engine = Engine::new(setup);
    log.borrow_mut().clear();

    engine.handle_before_input(InputEvent::insert_text("q"));
    assert_eq!(log.borrow().as_slice(), ["first:q", "second:q"]);
}

#[test]
fn prevent_halts_the_chain() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![
        recorder_module("gate", HookReply::Prevent, log.clone()),
        recorder_module("after", HookReply::Continue, log.clone()),
    ];
    let mut engine = Engine::new(setup);
    log.borrow_mut().clear();

    let disposition = engine.handle_before_input(InputEvent::insert_text("q"));
    assert!(disposition.default_prevented);
    assert_eq!(log.borrow().as_slice(), ["gate:q"]);
}

#[test]
fn replace_feeds_later_handlers() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![
        recorder_module(
            "replacer",
            HookReply::Replace(HookData::Text("rewritten".to_string())),
            log.clone(),
        ),
        recorder_module("observer", HookReply::Continue, log.clone()),
    ];
    let mut engine = Engine::new(setup);
    log.borrow_mut().clear();

    engine.handle_before_input(InputEvent::insert_text("q"));
    assert_eq!(log.borrow().as_slice(), ["replacer:q", "observer:rewritten"]);
}

#[test]
fn failing_constructor_is_contained() {
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![PluginModule {
        name: "broken",
        description: "always fails",
        category: "test",
        default_enabled: true,
        supports: VariantSupport::BOTH,
        config_key: None,
        config_key_alt: None,
        create: Box::new(|_engine| {
            Err(EngineError::PluginConstruction {
                name: "broken".to_string(),
                message: "nope".to_string(),
            })
        }),
    }];
    let engine = Engine::new(setup);

    let meta = engine.plugin_metadata().get("broken").unwrap();
    assert_eq!(meta.status.reason, PluginReason::Loaded);
    assert!(!engine.plugin_metadata().is_empty());
}

#[test]
fn unsupported_variant_keeps_metadata_but_skips_construction() {
    let constructed = Rc::new(RefCell::new(false));
    let flag = constructed.clone();
    let mut setup = EngineSetup::inline("x");
    setup.modules = vec![PluginModule {
        name: "framed-only",
        description: "needs the overlay",
        category: "test",
        default_enabled: true,
        supports: VariantSupport::FRAMED_ONLY,
        config_key: None,
        config_key_alt: None,
        create: Box::new(move |_engine| {
            *flag.borrow_mut() = true;
            Err(EngineError::UnknownPlugin("unreachable".to_string()))
        }),
    }];
    let mut engine = Engine::new(setup);
    assert_eq!(engine.variant(), EngineVariant::Inline);
    assert!(!*constructed.borrow(), "constructor never ran");

    let meta = engine.plugin_metadata().get("framed-only").unwrap();
    assert_eq!(meta.status.reason, PluginReason::Unsupported);
    assert!(!meta.status.supported);

    // Enabling it is refused with the unsupported reason.
    assert!(!engine.enable_plugin("framed-only"));
    let meta = engine.plugin_metadata().get("framed-only").unwrap();
    assert_eq!(meta.status.reason, PluginReason::Unsupported);
}

#[test]
fn enable_disable_cycle_updates_metadata() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![recorder_module("cycled", HookReply::Continue, log.clone())];
    let mut engine = Engine::new(setup);

    let meta = engine.plugin_metadata().get("cycled").unwrap();
    assert!(meta.status.enabled, "default_enabled applies at boot");
    assert_eq!(meta.status.reason, PluginReason::Enabled);

    engine.disable_plugin("cycled");
    let meta = engine.plugin_metadata().get("cycled").unwrap();
    assert!(!meta.status.enabled);
    assert_eq!(meta.status.reason, PluginReason::Disabled);

    engine.toggle_plugin("cycled");
    assert!(engine.plugin_metadata().get("cycled").unwrap().status.enabled);
}

#[test]
fn bulk_config_updates_unregistered_names_as_metadata_only() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![
        recorder_module("present", HookReply::Continue, log.clone()),
        PluginModule {
            name: "ghost",
            description: "constructor fails, metadata stays",
            category: "test",
            default_enabled: false,
            supports: VariantSupport::BOTH,
            config_key: None,
            config_key_alt: None,
            create: Box::new(|_engine| {
                Err(EngineError::PluginConstruction {
                    name: "ghost".to_string(),
                    message: "nope".to_string(),
                })
            }),
        },
    ];
    let mut engine = Engine::new(setup);

    let mut config = BTreeMap::new();
    config.insert("present".to_string(), false);
    config.insert("ghost".to_string(), true);
    engine.apply_plugin_config(&config);

    assert!(!engine.plugin_metadata().get("present").unwrap().status.enabled);
    let ghost = engine.plugin_metadata().get("ghost").unwrap();
    assert_eq!(ghost.status.reason, PluginReason::NotRegistered);
}

#[test]
fn config_store_overrides_default_enabled() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    let mut store = edit_engine::MemoryStore::new();
    store.set_text("config/test/recorder", None, "no");
    setup.store = Box::new(store);

    let mut module = recorder_module("configured", HookReply::Continue, log.clone());
    module.config_key = Some("config/test/recorder");
    setup.modules = vec![module];
    let engine = Engine::new(setup);

    let meta = engine.plugin_metadata().get("configured").unwrap();
    assert!(!meta.status.enabled, "store config says no");
    assert_eq!(meta.status.reason, PluginReason::Registered);
}

#[test]
fn destroy_reaches_every_plugin_once() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![
        recorder_module("a", HookReply::Continue, log.clone()),
        recorder_module("b", HookReply::Continue, log.clone()),
    ];
    let mut engine = Engine::new(setup);
    log.borrow_mut().clear();

    engine.destroy();
    engine.destroy();
    assert_eq!(log.borrow().as_slice(), ["a+destroy", "b+destroy"]);
    assert!(engine.plugin_commands().is_empty());
}

#[test]
fn metadata_serializes_for_host_introspection() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![recorder_module("introspect", HookReply::Continue, log)];
    let engine = Engine::new(setup);

    let json = serde_json::to_string(engine.plugin_metadata()).unwrap();
    assert!(json.contains("\"introspect\""));
    assert!(json.contains("\"reason\":\"enabled\""));
}

#[test]
fn instance_rename_rekeys_metadata() {
    struct Renamed;
    impl Plugin for Renamed {
        fn name(&self) -> &str {
            "actual-name"
        }
    }

    let mut setup = EngineSetup::framed("x");
    setup.modules = vec![PluginModule {
        name: "declared-name",
        description: "renames itself",
        category: "test",
        default_enabled: false,
        supports: VariantSupport::BOTH,
        config_key: None,
        config_key_alt: None,
        create: Box::new(|_engine| Ok(Box::new(Renamed))),
    }];
    let engine = Engine::new(setup);

    assert!(engine.plugin_metadata().contains_key("actual-name"));
    assert!(!engine.plugin_metadata().contains_key("declared-name"));
}
