use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a tool, as used in shortcut files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolId(String);

impl ToolId {
    pub fn new(id: &str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub id: ToolId,
    /// Name shown in the tool bar
    pub name: String,
    /// Single glyph for the tool button
    pub icon: &'static str,
}

/// Tools shipped with the editor, in tool bar order.
const BUILTIN_TOOLS: &[(&str, &str, &str)] = &[
    ("rectangular_marquee", "Rectangular Marquee", "⬚"),
    ("elliptical_marquee", "Elliptical Marquee", "◯"),
    ("pencil", "Pencil", "✏"),
    ("brush", "Brush", "🖌"),
    ("eraser", "Eraser", "⌫"),
    ("paint_bucket", "Paint Bucket", "🪣"),
    ("spray", "Spray", "💨"),
    ("line", "Line", "╱"),
    ("rectangle", "Rectangle", "▭"),
    ("ellipse", "Ellipse", "⬭"),
    ("blur", "Blur", "≋"),
];

/// Registered tools in registration order plus the active one.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolInfo>,
    active: Option<ToolId>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the builtin tools; the pencil starts active.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &(id, name, icon) in BUILTIN_TOOLS {
            registry.register(ToolInfo {
                id: ToolId::new(id),
                name: name.to_owned(),
                icon,
            });
        }
        registry.select(&ToolId::new("pencil"));
        registry
    }

    /// Adds a tool at the end of the registration order. Registering an id
    /// twice replaces the description but keeps the original position.
    pub fn register(&mut self, tool: ToolInfo) {
        match self.tools.iter_mut().find(|t| t.id == tool.id) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn unregister(&mut self, id: &ToolId) -> Option<ToolInfo> {
        let index = self.tools.iter().position(|t| &t.id == id)?;
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(self.tools.remove(index))
    }

    pub fn contains(&self, id: &ToolId) -> bool {
        self.tools.iter().any(|t| &t.id == id)
    }

    pub fn get(&self, id: &ToolId) -> Option<&ToolInfo> {
        self.tools.iter().find(|t| &t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolInfo> {
        self.tools.iter()
    }

    pub fn active(&self) -> Option<&ToolId> {
        self.active.as_ref()
    }

    pub fn active_tool(&self) -> Option<&ToolInfo> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    /// Makes `id` the active tool. Unknown ids are ignored.
    pub fn select(&mut self, id: &ToolId) -> bool {
        if !self.contains(id) {
            log::warn!("Cannot select unknown tool '{}'", id);
            return false;
        }
        if self.active.as_ref() != Some(id) {
            log::info!("Tool selected: {}", id);
            self.active = Some(id.clone());
        }
        true
    }
}
