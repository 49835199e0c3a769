use eframe_sprite::command::{Params, ids};
use eframe_sprite::shortcut::{
    BindingTarget, KeyPress, ModifierMask, ShortcutConfig, ShortcutTable,
};
use eframe_sprite::tools::{ToolId, ToolRegistry};
use egui::Key;

fn ctrl(key: Key) -> KeyPress {
    KeyPress::key(ModifierMask::CTRL, key)
}

#[test]
fn test_bind_then_find_matches_new_chord() {
    let mut table = ShortcutTable::new();
    table.bind_command("Ctrl+N", ids::NEW_FILE, None);

    let binding = table.find_binding_for_command(ids::NEW_FILE, None).unwrap();
    assert!(binding.is_key_pressed(&ctrl(Key::N)));
    assert!(!binding.is_key_pressed(&KeyPress::key(ModifierMask::NONE, Key::N)));
}

#[test]
fn test_binding_same_command_twice_appends_chords() {
    let mut table = ShortcutTable::new();
    table.bind_command("Ctrl+Y", ids::REDO, None);
    let accel = table.bind_command("Ctrl+Shift+Z", ids::REDO, Some(&Params::new()));
    assert_eq!(accel.chords().len(), 2);
    assert_eq!(table.len(), 1);

    let binding = table.find_binding_for_command(ids::REDO, None).unwrap();
    assert!(binding.is_key_pressed(&ctrl(Key::Y)));
    assert!(binding.is_key_pressed(&KeyPress::key(
        ModifierMask::CTRL | ModifierMask::SHIFT,
        Key::Z
    )));
}

#[test]
fn test_params_distinguish_command_bindings() {
    let mut table = ShortcutTable::new();
    let small = Params::new().with("width", "16");
    let large = Params::new().with("width", "64");
    table.bind_command("Ctrl+1", ids::NEW_FILE, Some(&small));
    table.bind_command("Ctrl+2", ids::NEW_FILE, Some(&large));
    table.bind_command("Ctrl+N", ids::NEW_FILE, None);
    assert_eq!(table.len(), 3);

    let (id, params) = table.command_for_key(&ctrl(Key::Num2)).unwrap();
    assert_eq!(id, ids::NEW_FILE);
    assert_eq!(params.get("width"), Some("64"));
    assert!(table.find_binding_for_command(ids::NEW_FILE, Some(&Params::new().with("width", "32"))).is_none());
}

#[test]
fn test_malformed_chords_are_skipped() {
    let mut table = ShortcutTable::new();
    let accel = table.bind_command("Hyper+Q <Ctrl+Q> Ctrl+", ids::EXIT, None);
    assert_eq!(accel.chords().len(), 1);

    // A binding with no valid chord still exists but shows no shortcut
    table.bind_command("Bogus+", ids::UNDO, None);
    assert!(table.find_binding_for_command(ids::UNDO, None).is_some());
    assert!(table.accel_for_command(ids::UNDO, None).is_none());
}

#[test]
fn test_tool_bindings_are_unique_per_tool() {
    let mut table = ShortcutTable::new();
    let pencil = ToolId::new("pencil");
    table.bind_tool("B", &pencil);
    table.bind_tool("P", &pencil);
    assert_eq!(table.len(), 1);

    let binding = table.find_binding_for_tool(&pencil).unwrap();
    assert_eq!(binding.target, BindingTarget::ChangeTool { tool_id: pencil.clone() });
    assert_eq!(table.accel_for_tool(&pencil).unwrap().to_string(), "B, P");
    assert!(table.command_for_key(&KeyPress::key(ModifierMask::NONE, Key::B)).is_none());
}

#[test]
fn test_builtin_shortcuts_load() {
    let tools = ToolRegistry::builtin();
    let mut table = ShortcutTable::new();
    ShortcutConfig::builtin().unwrap().apply(&mut table, &tools);

    assert_eq!(table.accel_for_command(ids::UNDO, None).unwrap().to_string(), "Ctrl+Z");
    assert_eq!(table.accel_for_command(ids::REDO, None).unwrap().chords().len(), 2);
    assert!(table.accel_for_tool(&ToolId::new("brush")).is_some());
}

#[test]
fn test_user_shortcuts_skip_unknown_tools() {
    let json = r#"{
        "commands": [{ "shortcut": "Ctrl+W", "command": "exit" }],
        "tools": [
            { "shortcut": "K", "tool": "no_such_tool" },
            { "shortcut": "Y", "tool": "blur" }
        ]
    }"#;
    let config: ShortcutConfig = serde_json::from_str(json).unwrap();
    let mut table = ShortcutTable::new();
    config.apply(&mut table, &ToolRegistry::builtin());

    assert_eq!(table.len(), 2);
    assert!(table.find_binding_for_tool(&ToolId::new("no_such_tool")).is_none());
    assert!(table.find_binding_for_tool(&ToolId::new("blur")).is_some());
}

#[test]
fn test_clear_destroys_all_bindings() {
    let mut table = ShortcutTable::new();
    table.bind_command("Ctrl+N", ids::NEW_FILE, None);
    table.bind_tool("B", &ToolId::new("brush"));
    table.clear();
    assert!(table.is_empty());
}

#[test]
fn test_repeated_chords_are_kept_once() {
    let mut table = ShortcutTable::new();
    table.bind_command("Ctrl+S <Ctrl+S>", ids::SCREEN_SHOT, None);
    let accel = table.bind_command("ctrl+s F12", ids::SCREEN_SHOT, None);
    assert_eq!(accel.chords().len(), 2);
    assert_eq!(accel.to_string(), "Ctrl+S, F12");
}
