//! # GridKit CSS
//!
//! Computed style values for the GridKit layout engine.
//!
//! Values arrive here already parsed and cascaded. This crate only models
//! the subset of computed style the grid formatting context reads:
//! box sizes, borders, overflow, alignment and the grid-* properties.

pub mod grid;

pub use grid::{
    GridLine, GridPlacement, GridTemplate, GridTemplateAreas, RepeatCount, TrackDefinition,
    TrackListEntry, TrackRepeat, TrackSize,
};

use thiserror::Error;

/// Errors produced while interpreting computed style values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CssError {
    #[error("Grid area '{name}' is not a filled-in rectangle (row {row}, column {column})")]
    NonRectangularArea {
        name: String,
        row: usize,
        column: usize,
    },
}

/// A CSS length value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Length {
    /// Pixels.
    Px(f32),
    /// Relative to font size.
    Em(f32),
    /// Relative to root font size.
    Rem(f32),
    /// Percentage of the containing block.
    Percent(f32),
    /// Auto (context-dependent).
    #[default]
    Auto,
    /// Zero.
    Zero,
}

impl Length {
    /// Compute the absolute pixel value.
    ///
    /// `Auto` resolves to zero; callers that care must check [`Length::is_auto`] first.
    pub fn to_px(&self, font_size: f32, root_font_size: f32, container_size: f32) -> f32 {
        match self {
            Length::Px(px) => *px,
            Length::Em(em) => em * font_size,
            Length::Rem(rem) => rem * root_font_size,
            Length::Percent(pct) => pct / 100.0 * container_size,
            Length::Auto => 0.0,
            Length::Zero => 0.0,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Whether the value resolves without a containing block.
    pub fn is_absolute(&self) -> bool {
        matches!(
            self,
            Length::Px(_) | Length::Em(_) | Length::Rem(_) | Length::Zero
        )
    }
}

/// Display property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Grid,
    InlineGrid,
    None,
}

impl Display {
    /// Check if this establishes a grid formatting context.
    pub fn is_grid(self) -> bool {
        matches!(self, Display::Grid | Display::InlineGrid)
    }

    pub fn is_none(self) -> bool {
        matches!(self, Display::None)
    }
}

/// Overflow property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Scroll,
    Auto,
    Clip,
}

impl Overflow {
    /// Check if this overflow value makes the box a scroll container.
    pub fn is_scroll_container(self) -> bool {
        matches!(self, Overflow::Hidden | Overflow::Scroll | Overflow::Auto)
    }
}

/// Justify content (content distribution along the inline axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyContent {
    #[default]
    Normal,
    Start,
    End,
    Center,
    Stretch,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl JustifyContent {
    /// Auto tracks are only stretched under `normal` and `stretch`.
    pub fn stretches_auto_tracks(self) -> bool {
        matches!(self, JustifyContent::Normal | JustifyContent::Stretch)
    }
}

/// Align content (content distribution along the block axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignContent {
    #[default]
    Normal,
    Start,
    End,
    Center,
    Stretch,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl AlignContent {
    /// Auto tracks are only stretched under `normal` and `stretch`.
    pub fn stretches_auto_tracks(self) -> bool {
        matches!(self, AlignContent::Normal | AlignContent::Stretch)
    }
}

/// Justify items (default inline-axis alignment inside grid areas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifyItems {
    #[default]
    Stretch,
    Start,
    End,
    Center,
}

/// Justify self (inline-axis alignment of one item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JustifySelf {
    #[default]
    Auto,
    Stretch,
    Start,
    End,
    Center,
}

impl JustifySelf {
    /// Resolve `auto` against the container's `justify-items`.
    pub fn resolve(self, parent: JustifyItems) -> JustifySelf {
        match self {
            JustifySelf::Auto => match parent {
                JustifyItems::Stretch => JustifySelf::Stretch,
                JustifyItems::Start => JustifySelf::Start,
                JustifyItems::End => JustifySelf::End,
                JustifyItems::Center => JustifySelf::Center,
            },
            other => other,
        }
    }
}

/// Align items (default block-axis alignment inside grid areas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    Start,
    End,
    Center,
}

/// Align self (block-axis alignment of one item).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignSelf {
    #[default]
    Auto,
    Stretch,
    Start,
    End,
    Center,
}

impl AlignSelf {
    /// Resolve `auto` against the container's `align-items`.
    pub fn resolve(self, parent: AlignItems) -> AlignSelf {
        match self {
            AlignSelf::Auto => match parent {
                AlignItems::Stretch => AlignSelf::Stretch,
                AlignItems::Start => AlignSelf::Start,
                AlignItems::End => AlignSelf::End,
                AlignItems::Center => AlignSelf::Center,
            },
            other => other,
        }
    }
}

/// Default font size used when nothing else is specified.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Computed style for a box, restricted to what grid layout consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    // Box model
    pub display: Display,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    /// `Auto` means `none`.
    pub max_width: Length,
    /// `Auto` means `none`.
    pub max_height: Length,

    // Border widths
    pub border_top_width: Length,
    pub border_right_width: Length,
    pub border_bottom_width: Length,
    pub border_left_width: Length,

    pub overflow: Overflow,
    pub font_size: f32,

    // Grid container
    pub grid_template_columns: GridTemplate,
    pub grid_template_rows: GridTemplate,
    pub grid_template_areas: Option<GridTemplateAreas>,
    pub grid_auto_columns: TrackSize,
    pub grid_auto_rows: TrackSize,
    /// `Auto` means `normal`, i.e. no gutter.
    pub column_gap: Length,
    /// `Auto` means `normal`, i.e. no gutter.
    pub row_gap: Length,
    pub justify_content: JustifyContent,
    pub align_content: AlignContent,
    pub justify_items: JustifyItems,
    pub align_items: AlignItems,

    // Grid item
    pub grid_column_start: GridLine,
    pub grid_column_end: GridLine,
    pub grid_row_start: GridLine,
    pub grid_row_end: GridLine,
    pub justify_self: JustifySelf,
    pub align_self: AlignSelf,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::default(),
            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Auto,
            min_height: Length::Auto,
            max_width: Length::Auto,
            max_height: Length::Auto,
            border_top_width: Length::Zero,
            border_right_width: Length::Zero,
            border_bottom_width: Length::Zero,
            border_left_width: Length::Zero,
            overflow: Overflow::default(),
            font_size: DEFAULT_FONT_SIZE,
            grid_template_columns: GridTemplate::none(),
            grid_template_rows: GridTemplate::none(),
            grid_template_areas: None,
            grid_auto_columns: TrackSize::Auto,
            grid_auto_rows: TrackSize::Auto,
            column_gap: Length::Auto,
            row_gap: Length::Auto,
            justify_content: JustifyContent::default(),
            align_content: AlignContent::default(),
            justify_items: JustifyItems::default(),
            align_items: AlignItems::default(),
            grid_column_start: GridLine::Auto,
            grid_column_end: GridLine::Auto,
            grid_row_start: GridLine::Auto,
            grid_row_end: GridLine::Auto,
            justify_self: JustifySelf::default(),
            align_self: AlignSelf::default(),
        }
    }
}

impl ComputedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A style with `display: grid`.
    pub fn grid() -> Self {
        Self {
            display: Display::Grid,
            ..Self::default()
        }
    }

    /// Apply a placement to the four grid-*-start/end properties.
    pub fn set_placement(&mut self, placement: GridPlacement) {
        self.grid_column_start = placement.column_start;
        self.grid_column_end = placement.column_end;
        self.grid_row_start = placement.row_start;
        self.grid_row_end = placement.row_end;
    }

    /// Set all four border widths to the same length.
    pub fn set_border_width(&mut self, width: Length) {
        self.border_top_width = width;
        self.border_right_width = width;
        self.border_bottom_width = width;
        self.border_left_width = width;
    }

    /// Resolve a length against this style's font size.
    pub fn resolve_length(&self, length: &Length, container_size: f32) -> f32 {
        length.to_px(self.font_size, self.font_size, container_size)
    }

    pub fn is_scroll_container(&self) -> bool {
        self.overflow.is_scroll_container()
    }
}
