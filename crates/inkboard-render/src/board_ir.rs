//! Backend-agnostic board IR: regions, draw commands, and icon handles.

/// Axis-aligned rectangle within the canvas.
///
/// Immutable once computed; the board is partitioned into disjoint regions
/// and a region is never resized mid-render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Left x.
    pub x: i32,
    /// Top y.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Region {
    /// Create a region.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right bound.
    pub const fn right(self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom bound.
    pub const fn bottom(self) -> i32 {
        self.y + self.height as i32
    }
}

/// Per-text-role font identifier.
///
/// Resolution to a concrete face is the backend's job; the layout engine
/// only measures through a [`TextMeasurer`](crate::TextMeasurer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// Board heading (clock, current temperature).
    Heading,
    /// News entry header line (timestamp + title).
    EntryHeader,
    /// News entry body text.
    EntryBody,
    /// Weather panel text.
    PanelText,
    /// Forecast card text.
    CardText,
}

/// Measured text extent in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextSize {
    pub width: u32,
    pub height: u32,
}

/// Text draw command. Ephemeral; exists for one render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextCommand {
    /// Left x.
    pub x: i32,
    /// Baseline y.
    pub baseline_y: i32,
    /// Content.
    pub text: String,
    /// Font role for backend face lookup.
    pub role: FontRole,
}

/// Rule draw command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleCommand {
    /// Start x.
    pub x: i32,
    /// Start y.
    pub y: i32,
    /// Length.
    pub length: u32,
    /// Thickness.
    pub thickness: u32,
    /// Horizontal if true; vertical if false.
    pub horizontal: bool,
}

/// Icon draw command. The id is always resolvable by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconCommand {
    /// Resolved icon handle.
    pub icon: IconId,
    /// Left x.
    pub x: i32,
    /// Top y.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Layout output commands.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Draw text.
    Text(TextCommand),
    /// Draw a line rule.
    Rule(RuleCommand),
    /// Draw an icon.
    Icon(IconCommand),
}

/// One composed board page as backend-agnostic draw commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardPage {
    /// Draw commands in emission order.
    pub commands: Vec<DrawCommand>,
}

impl BoardPage {
    const INITIAL_COMMAND_CAPACITY: usize = 64;

    /// Create an empty page.
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(Self::INITIAL_COMMAND_CAPACITY),
        }
    }

    /// Push one command.
    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    /// Iterate text commands only.
    pub fn texts(&self) -> impl Iterator<Item = &TextCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Iterate icon commands only.
    pub fn icons(&self) -> impl Iterator<Item = &IconCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Icon(icon) => Some(icon),
            _ => None,
        })
    }

    /// Iterate rule commands only.
    pub fn rules(&self) -> impl Iterator<Item = &RuleCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Rule(rule) => Some(rule),
            _ => None,
        })
    }
}

/// Opaque handle to a pre-loaded icon raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IconId(pub usize);

/// Condition-code to icon-handle table with a mandatory fallback entry.
///
/// Resolution is total: an unknown or empty key yields the fallback id,
/// never an absence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconTable {
    entries: Vec<(String, IconId)>,
    fallback: IconId,
}

impl IconTable {
    /// Create a table whose unknown keys resolve to `fallback`.
    pub fn new(fallback: IconId) -> Self {
        Self {
            entries: Vec::new(),
            fallback,
        }
    }

    /// Register an icon for a condition code, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, icon: IconId) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = icon;
            return;
        }
        self.entries.push((key, icon));
    }

    /// Resolve a condition code. Never fails.
    pub fn resolve(&self, key: &str) -> IconId {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, icon)| *icon)
            .unwrap_or(self.fallback)
    }

    /// The reserved fallback handle.
    pub fn fallback(&self) -> IconId {
        self.fallback
    }

    /// Number of registered condition codes (fallback excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no condition codes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
