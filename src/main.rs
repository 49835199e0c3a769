#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use eframe_sprite::config::{CONFIG_FILE_NAME, ConfigStore};
use eframe_sprite::gfx_mode::{self, DesktopInfo};
use eframe_sprite::shortcut::ShortcutConfig;
use eframe_sprite::{AppOptions, SpriteApp};

const APP_ID: &str = "eframe_sprite";

/// eframe cannot query the monitor before the window exists, so mode
/// negotiation starts from a typical laptop desktop.
const ASSUMED_DESKTOP: DesktopInfo = DesktopInfo {
    width: 1280,
    height: 800,
    depth: 32,
};

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let storage_dir = eframe::storage_dir(APP_ID);
    let mut config = match &storage_dir {
        Some(dir) => ConfigStore::load(dir.join(CONFIG_FILE_NAME)).unwrap_or_else(|err| {
            log::warn!("Ignoring unreadable configuration: {}", err);
            ConfigStore::new()
        }),
        None => ConfigStore::new(),
    };

    let res = gfx_mode::parse_res_arg(std::env::args().skip(1));
    // The GL surface is always true color
    let mode = match gfx_mode::negotiate(&config, Some(ASSUMED_DESKTOP), res, |mode| {
        mode.depth >= 24
    }) {
        Ok(mode) => mode,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    gfx_mode::save_gfx_config(&mut config, &mode);

    let user_shortcuts = storage_dir
        .as_ref()
        .map(|dir| dir.join("shortcuts.json"))
        .filter(|path| path.is_file())
        .and_then(|path| match ShortcutConfig::from_file(&path) {
            Ok(shortcuts) => Some(shortcuts),
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                None
            }
        });

    let data_dir: Option<PathBuf> = storage_dir;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sprite Editor")
            .with_inner_size([mode.width as f32, mode.height as f32])
            .with_fullscreen(mode.fullscreen),
        ..Default::default()
    };

    let options = AppOptions {
        config,
        mode,
        data_dir,
        user_shortcuts,
    };
    let result = eframe::run_native(
        "Sprite Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(SpriteApp::new(cc, options)?))),
    );
    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
