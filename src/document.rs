use egui::Color32;
use std::path::{Path, PathBuf};

use crate::error::GuiResult;
use crate::layer::{Layer, LayerContent};

/// Most colors a palette extracted from an image can hold.
pub const MAX_PALETTE_COLORS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color32>,
}

impl Default for Palette {
    fn default() -> Self {
        // 16-color default palette
        const DEFAULT: [(u8, u8, u8); 16] = [
            (0, 0, 0),
            (255, 255, 255),
            (136, 0, 0),
            (170, 255, 238),
            (204, 68, 204),
            (0, 204, 85),
            (0, 0, 170),
            (238, 238, 119),
            (221, 136, 85),
            (102, 68, 0),
            (255, 119, 119),
            (51, 51, 51),
            (119, 119, 119),
            (170, 255, 102),
            (0, 136, 255),
            (187, 187, 187),
        ];
        Self {
            colors: DEFAULT
                .iter()
                .map(|&(r, g, b)| Color32::from_rgb(r, g, b))
                .collect(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color32>) -> Self {
        Self { colors }
    }

    /// Distinct opaque colors of `pixels` in first-seen order, up to
    /// [`MAX_PALETTE_COLORS`].
    pub fn extract(pixels: &[Color32]) -> Self {
        let mut colors = Vec::new();
        for &pixel in pixels {
            if pixel.a() == 0 || colors.contains(&pixel) {
                continue;
            }
            colors.push(pixel);
            if colors.len() == MAX_PALETTE_COLORS {
                break;
            }
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }
}

/// A sprite: a stack of layers sharing one canvas size and palette.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub path: Option<PathBuf>,
    pub width: usize,
    pub height: usize,
    /// Bottom to top
    pub layers: Vec<Layer>,
    /// Index into `layers` of the layer being edited
    pub active_layer: usize,
    pub palette: Palette,
}

impl Sprite {
    /// A blank sprite with one transparent layer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            path: None,
            width,
            height,
            layers: vec![Layer::new("Layer 1", width, height)],
            active_layer: 0,
            palette: Palette::default(),
        }
    }

    /// Decodes an image file into a one-layer sprite.
    pub fn decode(path: &Path, bytes: &[u8]) -> GuiResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        let pixels: Vec<Color32> = rgba
            .pixels()
            .map(|p| Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
            .collect();
        let palette = Palette::extract(&pixels);

        Ok(Self {
            path: Some(path.to_path_buf()),
            width,
            height,
            layers: vec![Layer::from_pixels("Background", width, height, pixels)],
            active_layer: 0,
            palette,
        })
    }

    pub fn title(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sprite".to_owned())
    }

    /// `"Layer N"` where N is one more than the highest `"Layer N"` number
    /// anywhere in the layer tree.
    pub fn unique_layer_name(&self) -> String {
        let max = self.layers.iter().map(max_layer_num).max().unwrap_or(0);
        format!("Layer {}", max.saturating_add(1))
    }

    pub fn insert_layer(&mut self, index: usize, layer: Layer) {
        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);
        self.active_layer = index;
    }

    pub fn remove_layer(&mut self, index: usize) -> Option<Layer> {
        if index >= self.layers.len() {
            return None;
        }
        let layer = self.layers.remove(index);
        self.active_layer = self.active_layer.min(self.layers.len().saturating_sub(1));
        Some(layer)
    }

    /// Composites the visible layers into one premultiplied image.
    pub fn flatten(&self) -> Vec<Color32> {
        let mut out = vec![Color32::TRANSPARENT; self.width * self.height];
        for layer in &self.layers {
            composite_layer(layer, self.width, self.height, &mut out);
        }
        out
    }
}

fn composite_layer(layer: &Layer, width: usize, height: usize, out: &mut [Color32]) {
    if !layer.visible {
        return;
    }
    match &layer.content {
        LayerContent::Set(children) => {
            for child in children {
                composite_layer(child, width, height, out);
            }
        }
        LayerContent::Image {
            width: lw,
            height: lh,
            pixels,
        } => {
            for y in 0..height.min(*lh) {
                for x in 0..width.min(*lw) {
                    let dst = &mut out[y * width + x];
                    *dst = blend_over(pixels[y * lw + x], *dst);
                }
            }
        }
    }
}

/// Porter-Duff "over" on premultiplied colors.
pub fn blend_over(src: Color32, dst: Color32) -> Color32 {
    let inv = 255 - src.a() as u32;
    let mix = |s: u8, d: u8| (s as u32 + (d as u32 * inv + 127) / 255).min(255) as u8;
    Color32::from_rgba_premultiplied(
        mix(src.r(), dst.r()),
        mix(src.g(), dst.g()),
        mix(src.b(), dst.b()),
        mix(src.a(), dst.a()),
    )
}

fn max_layer_num(layer: &Layer) -> u64 {
    let own = layer
        .name
        .strip_prefix("Layer ")
        .map(leading_number)
        .unwrap_or(0);

    layer
        .children()
        .iter()
        .map(max_layer_num)
        .fold(own, u64::max)
}

/// Value of the leading decimal digits of `s` (0 when there are none).
fn leading_number(s: &str) -> u64 {
    let digits: String = s
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
