use std::path::PathBuf;
use std::time::Instant;

use crate::command::{self, CommandContext, Params};
use crate::config::ConfigStore;
use crate::error::GuiResult;
use crate::event_loop::{self, IdleFlags, IdleHost};
use crate::file_handler::FileDropHandler;
use crate::gfx_mode::{self, GfxMode};
use crate::gui::GuiContext;
use crate::layout::LayoutDirs;
use crate::monitor::MonitorScheduler;
use crate::panels;
use crate::recent::RecentFiles;
use crate::recorder::{self, ScreenRecorder};
use crate::screen::{Flip, TextureSurface};
use crate::shortcut::{KeyPress, Resolution, ShortcutConfig, TopLevel};
use crate::state::EditorContext;

/// Startup settings handed to [`SpriteApp::new`].
#[derive(Debug)]
pub struct AppOptions {
    pub config: ConfigStore,
    pub mode: GfxMode,
    /// Directory holding `jids/` layouts and receiving screenshots
    pub data_dir: Option<PathBuf>,
    pub user_shortcuts: Option<ShortcutConfig>,
}

pub struct SpriteApp {
    pub gui: GuiContext,
    pub editor: EditorContext,
    pub config: ConfigStore,
    pub mode: GfxMode,
    pub surface: TextureSurface,
    /// Size multiplier for icons, from [`gfx_mode::guiscale`]
    pub gui_scale: u32,
    drops: FileDropHandler,
    /// Commands requested by the panels this frame
    pending: Vec<(String, Params)>,
    focused: bool,
}

impl SpriteApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, options: AppOptions) -> GuiResult<Self> {
        let AppOptions {
            config,
            mode,
            data_dir,
            user_shortcuts,
        } = options;

        let shots = data_dir.clone().unwrap_or_else(|| PathBuf::from(".")).join("shots");
        let mut editor = EditorContext::new(LayoutDirs::new(data_dir), ScreenRecorder::new(shots));
        editor.recent = RecentFiles::load(&config);
        editor.recent.attach_menu();

        let mut gui = GuiContext::default();
        gui.load_shortcuts(&editor, user_shortcuts.as_ref())?;
        gui.idle
            .set(IdleFlags::REBUILD_RECENT_LIST | IdleFlags::REFRESH_FULL_SCREEN);

        let (logical_width, _) = mode.logical_size();
        Ok(Self {
            gui_scale: gfx_mode::guiscale(logical_width),
            gui,
            editor,
            config,
            mode,
            surface: TextureSurface::new(&cc.egui_ctx),
            drops: FileDropHandler::new(),
            pending: Vec::new(),
            focused: true,
        })
    }

    /// Runs `id` after the panels have been drawn.
    pub fn queue_command(&mut self, id: &str, params: Params) {
        self.pending.push((id.to_owned(), params));
    }

    pub fn is_command_enabled(&mut self, id: &str) -> bool {
        let Some(command) = self.gui.commands.get(id) else {
            return false;
        };
        let ctx = CommandContext::new(&mut self.editor, &mut self.gui.monitors, &self.gui.idle);
        command.enabled(&ctx)
    }

    /// Top-level windows, front to back.
    fn top_levels(&self) -> Vec<TopLevel> {
        let mut levels = Vec::new();
        if self.editor.has_modal() {
            levels.push(TopLevel::Foreground);
        }
        levels.push(TopLevel::Desktop { main: true });
        levels
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // While a text field has focus only key chords reach the resolver,
        // and tool switches are ignored
        let typing = ctx.wants_keyboard_input();
        let presses: Vec<KeyPress> = ctx.input(|i| {
            i.events
                .iter()
                .filter(|event| !(typing && matches!(event, egui::Event::Text(_))))
                .filter_map(|event| KeyPress::from_event(event, i.modifiers))
                .collect()
        });

        let top_levels = self.top_levels();
        for press in presses {
            let resolution = self.gui.resolve(&press, &top_levels, &self.editor);
            if typing && matches!(resolution, Resolution::ChangeTool(_)) {
                continue;
            }
            self.gui.apply(&resolution, &mut self.editor);
        }
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        let Some(mut dialog) = self.editor.dialogs.pop() else {
            return;
        };
        match dialog.show(ctx, &mut self.config) {
            Some(killer) => {
                let mut cctx =
                    CommandContext::new(&mut self.editor, &mut self.gui.monitors, &self.gui.idle);
                if let Err(err) = command::complete_dialog(&mut cctx, dialog, &killer) {
                    log::error!("Dialog failed: {}", err);
                    self.editor.status.set_text(err.to_string());
                }
            }
            None => self.editor.dialogs.push(dialog),
        }
    }

    fn run_pending(&mut self) {
        for (id, params) in std::mem::take(&mut self.pending) {
            self.gui.run_command(&id, &params, &mut self.editor);
        }
    }
}

/// The parts of the app the idle pass works on.
struct IdlePass<'a> {
    editor: &'a mut EditorContext,
    monitors: &'a mut MonitorScheduler,
    drops: &'a mut FileDropHandler,
    surface: &'a mut TextureSurface,
}

impl IdleHost for IdlePass<'_> {
    fn rebuild_recent_list(&mut self) -> bool {
        self.editor.recent.rebuild_menu()
    }

    fn refresh_screen(&mut self) {
        self.editor.refresh_screen();
    }

    fn take_dropped_files(&mut self) -> Vec<PathBuf> {
        self.drops.take()
    }

    fn open_dropped(&mut self, path: PathBuf) -> GuiResult<()> {
        self.editor.open_file(&path, self.monitors);
        Ok(())
    }

    fn poll_recording(&mut self) -> GuiResult<()> {
        if self.editor.recorder.is_idle() {
            return Ok(());
        }
        let written = self
            .editor
            .recorder
            .poll(self.editor.screen.image(), Instant::now())?;
        if let Some(path) = written.last() {
            self.editor.status.set_text(format!("Saved {}", path.display()));
        }
        Ok(())
    }

    fn flip(&mut self) -> Option<Flip> {
        Some(self.editor.screen.flip(self.surface))
    }
}

impl eframe::App for SpriteApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.editor.recent.save(&mut self.config);
        if let Err(err) = self.config.save() {
            log::error!("Failed to save configuration: {}", err);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.gui.shutdown();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let focused = ctx.input(|i| i.focused);
        if focused && !self.focused {
            event_loop::display_switch_in(&self.gui.idle);
        }
        self.focused = focused;

        self.gui.monitors.poll_timers(Instant::now());
        self.editor.drain_loads(&self.gui.idle);
        self.drops.check_for_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        panels::menu_bar(self, ctx);
        panels::status_bar(&self.editor.status, &self.editor.palette, ctx);
        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
        self.show_dialogs(ctx);
        self.run_pending();

        let report = event_loop::run_idle(
            &self.gui.idle,
            &mut IdlePass {
                editor: &mut self.editor,
                monitors: &mut self.gui.monitors,
                drops: &mut self.drops,
                surface: &mut self.surface,
            },
        );
        if !matches!(report.flip, None | Some(Flip::Clean)) {
            ctx.request_repaint();
        }
        self.drops.preview_files_being_dropped(ctx);

        if self.editor.exit_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if let Some(deadline) = self.gui.monitors.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
        if self.editor.recorder.is_recording() {
            ctx.request_repaint_after(recorder::RECORD_INTERVAL);
        }
    }
}
