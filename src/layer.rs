use egui::Color32;
use uuid::Uuid;

/// Pixels of an image layer, or the children of a layer set.
#[derive(Clone, PartialEq)]
pub enum LayerContent {
    Image {
        width: usize,
        height: usize,
        pixels: Vec<Color32>,
    },
    Set(Vec<Layer>),
}

impl std::fmt::Debug for LayerContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerContent::Image { width, height, .. } => f
                .debug_struct("Image")
                .field("width", width)
                .field("height", height)
                .field("pixels", &"<pixels>")
                .finish(),
            LayerContent::Set(children) => f.debug_tuple("Set").field(children).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: Uuid,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer is currently visible
    pub visible: bool,
    pub content: LayerContent,
}

impl Layer {
    /// A transparent image layer.
    pub fn new(name: &str, width: usize, height: usize) -> Self {
        Self::from_pixels(name, width, height, vec![Color32::TRANSPARENT; width * height])
    }

    pub fn from_pixels(name: &str, width: usize, height: usize, pixels: Vec<Color32>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            visible: true,
            content: LayerContent::Image {
                width,
                height,
                pixels,
            },
        }
    }

    pub fn new_set(name: &str, children: Vec<Layer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            visible: true,
            content: LayerContent::Set(children),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self.content, LayerContent::Set(_))
    }

    pub fn children(&self) -> &[Layer] {
        match &self.content {
            LayerContent::Set(children) => children,
            LayerContent::Image { .. } => &[],
        }
    }
}
