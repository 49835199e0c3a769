use egui::{Color32, ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::document::{Palette, Sprite};

const BACKGROUND: Color32 = Color32::from_gray(64);

/// Arrow drawn by the software cursor: `X` outline, `.` fill.
const CURSOR_SHAPE: [&str; 8] = [
    "X     ",
    "XX    ",
    "X.X   ",
    "X..X  ",
    "X...X ",
    "X..XXX",
    "X.X   ",
    "XX    ",
];

/// A rectangle in logical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl PixelRect {
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.w).max(other.x + other.w);
        let bottom = (self.y + self.h).max(other.y + other.h);
        Self::new(x, y, right - x, bottom - y)
    }

    /// Part of the rectangle inside a `width` x `height` area.
    pub fn clip(self, width: usize, height: usize) -> Option<Self> {
        let right = (self.x + self.w).min(width);
        let bottom = (self.y + self.h).min(height);
        if self.x >= right || self.y >= bottom {
            return None;
        }
        Some(Self::new(self.x, self.y, right - self.x, bottom - self.y))
    }
}

/// What a [`ScreenBuffer::flip`] pushed to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// Nothing changed.
    Clean,
    /// Only this region was copied.
    Dirty(PixelRect),
    /// The whole buffer was copied, stretched when the scale is above one.
    Full { stretched: bool },
}

/// The visible display the back buffer is flushed to.
pub trait DisplaySurface {
    /// False until the first full blit.
    fn has_contents(&self) -> bool;

    /// Copies `region` to `origin`, in logical pixels.
    fn blit_region(&mut self, origin: [usize; 2], region: ColorImage);

    /// Replaces the whole display with `image` magnified `scale` times.
    fn blit_full(&mut self, image: &ColorImage, scale: usize);
}

/// The screen in logical pixels.
///
/// With a scale above one the buffer is an off-screen back buffer: it is
/// composited with a software cursor and flushed to the display on
/// [`flip`](Self::flip), copying only the dirty region when one is tracked.
pub struct ScreenBuffer {
    image: ColorImage,
    scale: usize,
    tracking: bool,
    dirty: Option<PixelRect>,
    full_refresh: bool,
    cursor: Option<[usize; 2]>,
    last_cursor: Option<PixelRect>,
}

impl std::fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenBuffer")
            .field("size", &self.image.size)
            .field("scale", &self.scale)
            .field("dirty", &self.dirty)
            .field("full_refresh", &self.full_refresh)
            .finish()
    }
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new([320, 200], 1)
    }
}

impl ScreenBuffer {
    /// A buffer covering `physical` pixels at `scale`.
    pub fn new(physical: [usize; 2], scale: usize) -> Self {
        let scale = scale.clamp(1, 4);
        Self {
            image: ColorImage::new(logical_size(physical, scale), BACKGROUND),
            scale,
            tracking: true,
            dirty: None,
            full_refresh: true,
            cursor: None,
            last_cursor: None,
        }
    }

    /// Reallocates the buffer when the physical size or scale changed.
    /// Returns whether it did; the new buffer holds only the background.
    pub fn resize(&mut self, physical: [usize; 2], scale: usize) -> bool {
        let scale = scale.clamp(1, 4);
        let size = logical_size(physical, scale);
        if size == self.image.size && scale == self.scale {
            return false;
        }
        log::debug!("Screen buffer resized to {}x{} (scale {})", size[0], size[1], scale);
        self.image = ColorImage::new(size, BACKGROUND);
        self.scale = scale;
        self.invalidate_all();
        true
    }

    pub fn size(&self) -> [usize; 2] {
        self.image.size
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn is_double_buffered(&self) -> bool {
        self.scale > 1
    }

    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    /// With tracking off every flip is a full blit.
    pub fn set_dirty_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    pub fn dirty_region(&self) -> Option<PixelRect> {
        self.dirty
    }

    pub fn needs_full_refresh(&self) -> bool {
        self.full_refresh
    }

    pub fn mark_dirty(&mut self, rect: PixelRect) {
        let [w, h] = self.image.size;
        if let Some(rect) = rect.clip(w, h) {
            self.dirty = Some(self.dirty.map_or(rect, |d| d.union(rect)));
        }
    }

    pub fn invalidate_all(&mut self) {
        self.full_refresh = true;
        self.dirty = None;
    }

    /// Fills the buffer with the background color.
    pub fn clear(&mut self) {
        self.image.pixels.fill(BACKGROUND);
        self.invalidate_all();
    }

    /// Where `sprite` sits on screen: centered, pinned to the top-left corner
    /// when larger than the screen.
    pub fn sprite_rect(&self, sprite: &Sprite) -> PixelRect {
        let [w, h] = self.image.size;
        PixelRect::new(
            w.saturating_sub(sprite.width) / 2,
            h.saturating_sub(sprite.height) / 2,
            sprite.width,
            sprite.height,
        )
    }

    /// Draws the flattened sprite over a checkerboard and marks it dirty.
    pub fn draw_sprite(&mut self, sprite: &Sprite) {
        let rect = self.sprite_rect(sprite);
        let [w, h] = self.image.size;
        let Some(visible) = rect.clip(w, h) else {
            return;
        };
        let pixels = sprite.flatten();
        for y in 0..visible.h {
            for x in 0..visible.w {
                let check = if (x / 8 + y / 8) % 2 == 0 {
                    Color32::from_gray(204)
                } else {
                    Color32::from_gray(153)
                };
                let src = pixels[y * sprite.width + x];
                self.image.pixels[(visible.y + y) * w + visible.x + x] =
                    crate::document::blend_over(src, check);
            }
        }
        self.mark_dirty(visible);
    }

    /// Moves the software cursor, in logical pixels. `None` hides it.
    pub fn set_cursor(&mut self, pos: Option<[usize; 2]>) {
        self.cursor = pos;
    }

    pub fn cursor(&self) -> Option<[usize; 2]> {
        self.cursor
    }

    /// Flushes the buffer to `surface`.
    pub fn flip(&mut self, surface: &mut dyn DisplaySurface) -> Flip {
        let saved = if self.is_double_buffered() {
            self.composite_cursor()
        } else {
            None
        };
        let cursor_rect = saved.as_ref().map(|(rect, _)| *rect);

        let mut region = self.dirty;
        if cursor_rect != self.last_cursor {
            for rect in [cursor_rect, self.last_cursor].into_iter().flatten() {
                region = Some(region.map_or(rect, |r| r.union(rect)));
            }
        }

        let flip = if self.full_refresh || !self.tracking || !surface.has_contents() {
            surface.blit_full(&self.image, self.scale);
            Flip::Full {
                stretched: self.scale > 1,
            }
        } else if let Some(rect) = region {
            surface.blit_region([rect.x, rect.y], self.copy_region(rect));
            Flip::Dirty(rect)
        } else {
            Flip::Clean
        };

        if let Some((rect, pixels)) = saved {
            self.restore_region(rect, &pixels);
        }
        self.last_cursor = cursor_rect;
        self.dirty = None;
        self.full_refresh = false;
        flip
    }

    /// Draws the cursor into the buffer and returns what was underneath.
    fn composite_cursor(&mut self) -> Option<(PixelRect, Vec<Color32>)> {
        let [x, y] = self.cursor?;
        let [w, h] = self.image.size;
        let rect = PixelRect::new(x, y, CURSOR_SHAPE[0].len(), CURSOR_SHAPE.len()).clip(w, h)?;
        let saved = self.copy_region(rect).pixels;

        for (dy, row) in CURSOR_SHAPE.iter().enumerate().take(rect.h) {
            for (dx, c) in row.bytes().enumerate().take(rect.w) {
                let color = match c {
                    b'X' => Color32::BLACK,
                    b'.' => Color32::WHITE,
                    _ => continue,
                };
                self.image.pixels[(rect.y + dy) * w + rect.x + dx] = color;
            }
        }
        Some((rect, saved))
    }

    fn copy_region(&self, rect: PixelRect) -> ColorImage {
        let width = self.image.size[0];
        let mut out = ColorImage::new([rect.w, rect.h], Color32::TRANSPARENT);
        for row in 0..rect.h {
            let start = (rect.y + row) * width + rect.x;
            out.pixels[row * rect.w..(row + 1) * rect.w]
                .copy_from_slice(&self.image.pixels[start..start + rect.w]);
        }
        out
    }

    fn restore_region(&mut self, rect: PixelRect, pixels: &[Color32]) {
        let width = self.image.size[0];
        for row in 0..rect.h {
            let start = (rect.y + row) * width + rect.x;
            self.image.pixels[start..start + rect.w]
                .copy_from_slice(&pixels[row * rect.w..(row + 1) * rect.w]);
        }
    }
}

fn logical_size(physical: [usize; 2], scale: usize) -> [usize; 2] {
    [(physical[0] / scale).max(1), (physical[1] / scale).max(1)]
}

/// Redraws the screen after `sprite` changed. A palette different from
/// `current` is installed and forces a full refresh; otherwise only the sprite
/// is redrawn. Returns whether a full refresh happened.
pub fn update_screen_for_sprite(
    sprite: Option<&Sprite>,
    current: &mut Palette,
    screen: &mut ScreenBuffer,
) -> bool {
    let palette = sprite.map(|s| s.palette.clone()).unwrap_or_default();
    let full = palette != *current;
    if full {
        *current = palette;
        screen.clear();
    }
    match sprite {
        Some(sprite) => screen.draw_sprite(sprite),
        None if !full => screen.clear(),
        None => {}
    }
    full
}

/// Display backed by an egui texture, drawn by the central panel.
pub struct TextureSurface {
    ctx: Context,
    texture: Option<TextureHandle>,
    scale: usize,
}

impl TextureSurface {
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            texture: None,
            scale: 1,
        }
    }

    pub fn texture_id(&self) -> Option<TextureId> {
        self.texture.as_ref().map(TextureHandle::id)
    }

    /// Size in physical pixels.
    pub fn physical_size(&self) -> Option<egui::Vec2> {
        self.texture
            .as_ref()
            .map(|t| t.size_vec2() * self.scale as f32)
    }
}

impl DisplaySurface for TextureSurface {
    fn has_contents(&self) -> bool {
        self.texture.is_some()
    }

    fn blit_region(&mut self, origin: [usize; 2], region: ColorImage) {
        if let Some(texture) = &mut self.texture {
            texture.set_partial(origin, region, TextureOptions::NEAREST);
        }
    }

    fn blit_full(&mut self, image: &ColorImage, scale: usize) {
        // Magnification happens on the GPU with nearest sampling
        self.scale = scale;
        match &mut self.texture {
            Some(texture) => texture.set(image.clone(), TextureOptions::NEAREST),
            None => {
                self.texture =
                    Some(self.ctx.load_texture("screen", image.clone(), TextureOptions::NEAREST));
            }
        }
    }
}
