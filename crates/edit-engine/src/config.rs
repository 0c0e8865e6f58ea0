//! Engine configuration, parsed from host attributes.
//!
//! The host widget passes its attribute map through unchanged; the engine
//! extracts what it understands and ignores the rest. String attribute
//! values follow the host convention: `"yes"`/`"no"` (or `"true"`/`"false"`)
//! for flags, plain strings elsewhere.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::store::ContentStore;

/// Parse a host flag value. Unrecognized values yield `None`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

/// The full engine configuration.
#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    /// Tag of the edit surface element (`"textarea"`, `"input"`, ...).
    pub tag: String,
    /// `type` attribute for single-line surfaces.
    pub input_type: String,
    /// Placeholder text.
    pub placeholder: String,
    /// Row count for multi-line surfaces.
    pub rows: Option<u32>,
    /// Size for single-line surfaces.
    pub size: Option<u32>,
    /// Spellcheck enabled.
    pub spellcheck: Option<bool>,
    /// Wrap attribute (`"soft"`, `"hard"`, `"off"`).
    pub wrap_attr: String,
    /// Autocorrect hint.
    pub autocorrect: String,
    /// Autocapitalize hint.
    pub autocapitalize: String,
    /// `inputmode` hint.
    pub input_hint: String,
    /// `enterkeyhint` hint.
    pub enter_key_hint: String,
    /// Form `name`.
    pub name: String,
    /// Text direction.
    pub dir: String,
    /// Language.
    pub lang: String,
    /// Delegated ARIA label.
    pub aria_label: String,
    /// Delegated ARIA description.
    pub aria_description: String,
    /// Disabled state.
    pub disabled: bool,
    /// Read-only state.
    pub read_only: bool,
    /// Tab index.
    pub tab_index: Option<i32>,
    /// Grow the surface to fit its content.
    pub auto_height: bool,
    /// Minimum height in pixels.
    pub min_height: Option<f32>,
    /// Store item whose text overrides the surface height.
    pub fixed_height_item: Option<String>,
    /// Focus the surface as soon as the engine boots.
    pub focus_on_mount: bool,
    /// Initial selection offsets applied on mount focus.
    pub focus_selection: Option<(usize, usize)>,
    /// Whether file drops are accepted.
    pub file_drop: bool,
    /// Host action script invoked after every input event.
    pub input_actions: Option<String>,
    /// Store item that triggers a full refresh when it changes.
    pub refresh_trigger: Option<String>,
    /// Per-plugin enable overrides from `enable<PluginName>` attributes,
    /// keyed by kebab-case plugin name.
    pub plugin_overrides: BTreeMap<String, bool>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tag: "textarea".to_string(),
            input_type: "text".to_string(),
            placeholder: String::new(),
            rows: None,
            size: None,
            spellcheck: None,
            wrap_attr: String::new(),
            autocorrect: String::new(),
            autocapitalize: String::new(),
            input_hint: String::new(),
            enter_key_hint: String::new(),
            name: String::new(),
            dir: String::new(),
            lang: String::new(),
            aria_label: String::new(),
            aria_description: String::new(),
            disabled: false,
            read_only: false,
            tab_index: None,
            auto_height: true,
            min_height: None,
            fixed_height_item: None,
            focus_on_mount: false,
            focus_selection: None,
            file_drop: false,
            input_actions: None,
            refresh_trigger: None,
            plugin_overrides: BTreeMap::new(),
        }
    }
}

/// Convert `enableSomePlugin` to `some-plugin`.
fn override_key_to_plugin_name(key: &str) -> Option<String> {
    let rest = key.strip_prefix("enable")?;
    if rest.is_empty() {
        return None;
    }
    let mut name = String::with_capacity(rest.len() + 2);
    for (index, ch) in rest.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index > 0 {
                name.push('-');
            }
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    Some(name)
}

impl EngineConfig {
    /// Parse the host attribute map.
    pub fn from_attributes(attributes: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| attributes.get(key).cloned();

        if let Some(tag) = get("tag") {
            config.tag = tag;
        }
        if let Some(input_type) = get("type") {
            config.input_type = input_type;
        }
        if let Some(placeholder) = get("placeholder") {
            config.placeholder = placeholder;
        }
        config.rows = get("rows").and_then(|v| v.parse().ok());
        config.size = get("size").and_then(|v| v.parse().ok());
        config.spellcheck = get("spellcheck").as_deref().and_then(parse_flag);
        if let Some(wrap) = get("wrap") {
            config.wrap_attr = wrap;
        }
        if let Some(autocorrect) = get("autocorrect") {
            config.autocorrect = autocorrect;
        }
        if let Some(autocapitalize) = get("autocapitalize") {
            config.autocapitalize = autocapitalize;
        }
        if let Some(hint) = get("inputmode") {
            config.input_hint = hint;
        }
        if let Some(hint) = get("enterkeyhint") {
            config.enter_key_hint = hint;
        }
        if let Some(name) = get("name") {
            config.name = name;
        }
        if let Some(dir) = get("dir") {
            config.dir = dir;
        }
        if let Some(lang) = get("lang") {
            config.lang = lang;
        }
        if let Some(label) = get("aria-label") {
            config.aria_label = label;
        }
        if let Some(description) = get("aria-description") {
            config.aria_description = description;
        }
        config.disabled = get("disabled").as_deref().and_then(parse_flag).unwrap_or(false);
        config.read_only = get("readonly").as_deref().and_then(parse_flag).unwrap_or(false);
        config.tab_index = get("tabindex").and_then(|v| v.parse().ok());
        config.auto_height = get("autoHeight")
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(true);
        config.min_height = get("minHeight").and_then(|v| v.parse().ok());
        config.fixed_height_item = get("fixedHeightSource").filter(|v| !v.is_empty());
        config.focus_on_mount = get("focus").as_deref().and_then(parse_flag).unwrap_or(false);
        config.focus_selection = match (
            get("focusSelectionFromStart").and_then(|v| v.parse().ok()),
            get("focusSelectionFromEnd").and_then(|v| v.parse().ok()),
        ) {
            (Some(start), Some(end)) => Some((start, end)),
            (Some(start), None) => Some((start, start)),
            _ => None,
        };
        config.file_drop = get("fileDrop").as_deref().and_then(parse_flag).unwrap_or(false);
        config.input_actions = get("inputActions").filter(|v| !v.is_empty());
        config.refresh_trigger = get("refreshTitle").filter(|v| !v.is_empty());

        for (key, value) in attributes {
            if let Some(plugin) = override_key_to_plugin_name(key)
                && let Some(enabled) = parse_flag(value)
            {
                config.plugin_overrides.insert(plugin, enabled);
            }
        }

        config
    }

    /// Resolve the fixed-height override from the configured store item.
    ///
    /// The item's text is parsed as a pixel count; an absent item or
    /// unparsable text yields `None`.
    pub fn resolve_fixed_height(&self, store: &dyn ContentStore) -> Option<f32> {
        let title = self.fixed_height_item.as_deref()?;
        let raw = store.text(title)?;
        raw.trim().trim_end_matches("px").trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_core_attributes() {
        let config = EngineConfig::from_attributes(&attrs(&[
            ("tag", "input"),
            ("placeholder", "type here"),
            ("rows", "8"),
            ("spellcheck", "no"),
            ("readonly", "yes"),
            ("tabindex", "3"),
        ]));
        assert_eq!(config.tag, "input");
        assert_eq!(config.placeholder, "type here");
        assert_eq!(config.rows, Some(8));
        assert_eq!(config.spellcheck, Some(false));
        assert!(config.read_only);
        assert_eq!(config.tab_index, Some(3));
    }

    #[test]
    fn plugin_overrides_are_kebab_cased() {
        let config = EngineConfig::from_attributes(&attrs(&[
            ("enableSearch", "no"),
            ("enableLineOps", "yes"),
            ("enable", "yes"),
        ]));
        assert_eq!(config.plugin_overrides.get("search"), Some(&false));
        assert_eq!(config.plugin_overrides.get("line-ops"), Some(&true));
        assert_eq!(config.plugin_overrides.len(), 2);
    }

    #[test]
    fn fixed_height_reads_the_store() {
        let mut store = MemoryStore::new();
        store.set_text("settings/editor-height", None, "240px");
        let config = EngineConfig::from_attributes(&attrs(&[(
            "fixedHeightSource",
            "settings/editor-height",
        )]));
        assert_eq!(config.resolve_fixed_height(&store), Some(240.0));
    }

    #[test]
    fn focus_selection_defaults_end_to_start() {
        let config =
            EngineConfig::from_attributes(&attrs(&[("focusSelectionFromStart", "4")]));
        assert_eq!(config.focus_selection, Some((4, 4)));
    }
}
