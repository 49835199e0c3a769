//! Display-mode negotiation at startup.
use crate::config::ConfigStore;
use crate::error::{GuiError, GuiResult};

const SECTION: &str = "GfxMode";

#[cfg(windows)]
const DEF_SCALE: u32 = 2;
#[cfg(not(windows))]
const DEF_SCALE: u32 = 1;

/// Fallback resolutions, largest first, with the scale each one uses.
pub const TRY_RESOLUTIONS: [(u32, u32, u32); 5] = [
    (1024, 768, DEF_SCALE),
    (800, 600, DEF_SCALE),
    (640, 480, DEF_SCALE),
    (320, 240, 1),
    (320, 200, 1),
];

/// Color depths tried in turn when no resolution works.
pub const TRY_DEPTHS: [u32; 5] = [32, 24, 16, 15, 8];

/// Room left on the desktop for window decorations.
const BORDER_W: u32 = 16;
const BORDER_H: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxMode {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub fullscreen: bool,
    pub scale: u32,
}

impl GfxMode {
    /// Logical (unscaled) size.
    pub fn logical_size(&self) -> (u32, u32) {
        (self.width / self.scale, self.height / self.scale)
    }
}

/// What is known about the desktop the window opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopInfo {
    pub width: u32,
    pub height: u32,
    /// 0 when unknown
    pub depth: u32,
}

/// A `-res WIDTHxHEIGHTxBPP` command line override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResOverride {
    pub width: u32,
    pub height: u32,
    pub depth: Option<u32>,
}

impl std::str::FromStr for ResOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(['x', 'X']).collect();
        let num = |p: &str| {
            p.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid resolution '{}'", s))
        };
        match parts.as_slice() {
            [w, h] => Ok(Self {
                width: num(w)?,
                height: num(h)?,
                depth: None,
            }),
            [w, h, bpp] => Ok(Self {
                width: num(w)?,
                height: num(h)?,
                depth: Some(num(bpp)?),
            }),
            _ => Err(format!("invalid resolution '{}', expected WIDTHxHEIGHTxBPP", s)),
        }
    }
}

/// Finds the first `-res` argument in `args`.
pub fn parse_res_arg<I, S>(args: I) -> Option<ResOverride>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg.as_ref() == "-res" {
            let value = args.next()?;
            return match value.as_ref().parse() {
                Ok(res) => Some(res),
                Err(err) => {
                    log::warn!("{}", err);
                    None
                }
            };
        }
    }
    None
}

/// Picks a display mode.
///
/// `set_mode` tries to open the display in a mode and reports success. The
/// requested mode is tried first, then every fallback resolution that fits
/// the desktop; when none opens, the depth steps down and the search starts
/// again. Failing at depth 8 is a [`GuiError::GraphicsModeFailure`].
pub fn negotiate(
    config: &ConfigStore,
    desktop: Option<DesktopInfo>,
    res: Option<ResOverride>,
    mut set_mode: impl FnMut(&GfxMode) -> bool,
) -> GuiResult<GfxMode> {
    let mut width = config.get_int(SECTION, "Width", 0).max(0) as u32;
    let mut height = config.get_int(SECTION, "Height", 0).max(0) as u32;
    let mut depth = config.get_int(SECTION, "Depth", 0).max(0) as u32;
    let mut fullscreen = config.get_bool(SECTION, "FullScreen", false);
    let mut scale = config.get_int(SECTION, "Scale", 1).clamp(1, 4) as u32;

    if let Some(res) = res {
        width = res.width;
        height = res.height;
        if let Some(bpp) = res.depth {
            depth = bpp;
        }
    }

    let mut first_fallback = 0;
    if width == 0 || height == 0 {
        match desktop {
            Some(desktop) => {
                let avail_w = desktop.width.saturating_sub(BORDER_W);
                let avail_h = desktop.height.saturating_sub(BORDER_H);
                let fit = TRY_RESOLUTIONS
                    .iter()
                    .position(|&(w, h, _)| w <= avail_w && h <= avail_h)
                    .unwrap_or(TRY_RESOLUTIONS.len() - 1);
                let (w, h, s) = TRY_RESOLUTIONS[fit];
                first_fallback = fit;
                fullscreen = false;
                width = w;
                height = h;
                scale = s;
            }
            None => {
                fullscreen = true;
                width = 320;
                height = 200;
                scale = 1;
            }
        }
    }

    if depth == 0 {
        depth = desktop.map(|d| d.depth).filter(|&d| d != 0).unwrap_or(8);
    }

    loop {
        let requested = GfxMode {
            width,
            height,
            depth,
            fullscreen,
            scale,
        };
        if set_mode(&requested) {
            log::info!("Graphics mode {}x{}x{}", width, height, depth);
            return Ok(requested);
        }

        for &(w, h, s) in &TRY_RESOLUTIONS[first_fallback..] {
            let mode = GfxMode {
                width: w,
                height: h,
                scale: s,
                ..requested
            };
            if set_mode(&mode) {
                log::info!("Graphics mode {}x{}x{} (fallback)", w, h, depth);
                return Ok(mode);
            }
        }

        if depth <= 8 {
            log::error!("No usable graphics mode found");
            return Err(GuiError::GraphicsModeFailure {
                width,
                height,
                depth,
            });
        }
        depth = next_depth(depth);
        log::debug!("Retrying with color depth {}", depth);
    }
}

/// The next lower entry of [`TRY_DEPTHS`].
fn next_depth(depth: u32) -> u32 {
    TRY_DEPTHS
        .iter()
        .copied()
        .find(|&d| d < depth)
        .unwrap_or(8)
}

/// Stores the mode so the next start opens with it.
pub fn save_gfx_config(config: &mut ConfigStore, mode: &GfxMode) {
    config.set_int(SECTION, "Width", mode.width as i32);
    config.set_int(SECTION, "Height", mode.height as i32);
    config.set_int(SECTION, "Depth", mode.depth as i32);
    config.set_bool(SECTION, "FullScreen", mode.fullscreen);
    config.set_int(SECTION, "Scale", mode.scale as i32);
}

/// Multiplier for fonts and icons at a given logical screen width.
pub fn guiscale(logical_width: u32) -> u32 {
    if logical_width > 512 { 2 } else { 1 }
}
