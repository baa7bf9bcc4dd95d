//! # GridKit Layout
//!
//! CSS Grid formatting context for the GridKit engine.
//!
//! ## Design Goals
//!
//! 1. **Placement**: Assign every in-flow child a grid area, growing the implicit grid
//! 2. **Track sizing**: Resolve fixed, intrinsic and flexible tracks per axis
//! 3. **Compositing**: Turn track sizes into child boxes and the container's own size
//!
//! Child contents are opaque to the grid. They are measured and laid out through
//! the [`ChildLayout`] capability; [`DeclaredContentLayout`] is a ready-made
//! implementation driven by sizes declared on each [`LayoutBox`].

pub mod grid;
pub mod intrinsic_cache;

pub use grid::{
    layout_grid_container, layout_grid_container_with_config, GridItem, GridLayout,
    GridLayoutConfig, GridTrack, NamedGridArea, OccupationGrid,
};
pub use intrinsic_cache::{CacheStats, IntrinsicCache, IntrinsicSizingMode};

use std::fmt;

use gridkit_css::ComputedStyle;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur in layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Layout failed: {0}")]
    LayoutFailed(String),

    /// A sizing function reached code that needs a definite length.
    #[error("Track sizing function {0} is not a definite length")]
    IndefiniteTrackSize(String),

    #[error("Implicit grid needs {requested} {axis} tracks, limit is {limit}")]
    GridTooLarge {
        axis: GridDimension,
        requested: usize,
        limit: usize,
    },
}

/// The two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridDimension {
    Column,
    Row,
}

impl fmt::Display for GridDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridDimension::Column => write!(f, "column"),
            GridDimension::Row => write!(f, "row"),
        }
    }
}

/// Available size in one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvailableSize {
    Definite(f32),
    MinContent,
    MaxContent,
}

impl AvailableSize {
    pub fn is_definite(&self) -> bool {
        matches!(self, AvailableSize::Definite(_))
    }

    pub fn definite(&self) -> Option<f32> {
        match self {
            AvailableSize::Definite(size) => Some(*size),
            _ => None,
        }
    }

    /// The definite size, or zero under an intrinsic constraint.
    pub fn to_px_or_zero(&self) -> f32 {
        self.definite().unwrap_or(0.0)
    }
}

/// Available space for a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableSpace {
    pub width: AvailableSize,
    pub height: AvailableSize,
}

impl AvailableSpace {
    pub fn new(width: AvailableSize, height: AvailableSize) -> Self {
        Self { width, height }
    }

    pub fn definite(width: f32, height: f32) -> Self {
        Self::new(AvailableSize::Definite(width), AvailableSize::Definite(height))
    }

    pub fn get(&self, dimension: GridDimension) -> AvailableSize {
        match dimension {
            GridDimension::Column => self.width,
            GridDimension::Row => self.height,
        }
    }
}

/// A rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Edge sizes (for margin, padding, border).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Box dimensions including content, padding, border, and margin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimensions {
    /// Content area.
    pub content: Rect,
    /// Padding.
    pub padding: EdgeSizes,
    /// Border.
    pub border: EdgeSizes,
    /// Margin.
    pub margin: EdgeSizes,
}

impl Dimensions {
    /// Get the padding box (content + padding).
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.content.x - self.padding.left,
            y: self.content.y - self.padding.top,
            width: self.content.width + self.padding.horizontal(),
            height: self.content.height + self.padding.vertical(),
        }
    }

    /// Get the border box (content + padding + border).
    pub fn border_box(&self) -> Rect {
        let pb = self.padding_box();
        Rect {
            x: pb.x - self.border.left,
            y: pb.y - self.border.top,
            width: pb.width + self.border.horizontal(),
            height: pb.height + self.border.vertical(),
        }
    }
}

/// Type of layout box.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxType {
    /// Block-level box.
    Block,
    /// Anonymous block (for grouping inline content).
    AnonymousBlock,
    /// Text run.
    Text(String),
}

/// Intrinsic content sizes declared for a box whose contents the grid does not lay out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentSizes {
    pub min_content_width: f32,
    pub max_content_width: f32,
    pub min_content_height: f32,
    pub max_content_height: f32,
}

impl ContentSizes {
    /// Content that has the same size under every constraint.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            min_content_width: width,
            max_content_width: width,
            min_content_height: height,
            max_content_height: height,
        }
    }
}

/// A layout box.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// Box type.
    pub box_type: BoxType,
    /// Computed dimensions.
    pub dimensions: Dimensions,
    /// Computed style.
    pub style: ComputedStyle,
    /// Child boxes.
    pub children: Vec<LayoutBox>,
    /// Declared intrinsic sizes of the box's own contents.
    pub intrinsic: ContentSizes,
}

impl LayoutBox {
    pub fn new(box_type: BoxType, style: ComputedStyle) -> Self {
        Self {
            box_type,
            dimensions: Dimensions::default(),
            style,
            children: Vec::new(),
            intrinsic: ContentSizes::default(),
        }
    }

    /// A block box with declared content sizes.
    pub fn with_content(style: ComputedStyle, intrinsic: ContentSizes) -> Self {
        Self {
            intrinsic,
            ..Self::new(BoxType::Block, style)
        }
    }

    pub fn text(content: &str) -> Self {
        Self::new(BoxType::Text(content.to_string()), ComputedStyle::new())
    }

    pub fn add_child(&mut self, child: LayoutBox) {
        self.children.push(child);
    }

    /// Whether this box participates in its parent's grid as an item.
    pub fn is_grid_item_candidate(&self) -> bool {
        if self.style.display.is_none() {
            return false;
        }
        match &self.box_type {
            BoxType::Text(text) => !text.trim().is_empty(),
            _ => true,
        }
    }

    /// Resolved border widths from the computed style.
    pub fn border_widths(&self) -> EdgeSizes {
        let style = &self.style;
        EdgeSizes {
            top: style.resolve_length(&style.border_top_width, 0.0),
            right: style.resolve_length(&style.border_right_width, 0.0),
            bottom: style.resolve_length(&style.border_bottom_width, 0.0),
            left: style.resolve_length(&style.border_left_width, 0.0),
        }
    }
}

/// Measuring and layout of a grid item's own contents.
///
/// Widths and heights are content-box sizes. Implementations may cache; the
/// grid additionally memoizes results for the duration of one pass.
pub trait ChildLayout {
    fn min_content_width(&mut self, child: &LayoutBox) -> f32;

    fn max_content_width(&mut self, child: &LayoutBox) -> f32;

    fn min_content_height(&mut self, child: &LayoutBox, available_width: AvailableSize) -> f32;

    fn max_content_height(&mut self, child: &LayoutBox, available_width: AvailableSize) -> f32;

    /// Lay out the child's contents inside its already-positioned content box.
    fn layout_inside(
        &mut self,
        child: &mut LayoutBox,
        available_space: AvailableSpace,
    ) -> Result<(), LayoutError>;
}

/// [`ChildLayout`] that reads [`LayoutBox::intrinsic`] for leaf boxes and runs
/// grid layout recursively for nested grid containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredContentLayout;

impl DeclaredContentLayout {
    pub fn new() -> Self {
        Self
    }

    fn probe(&mut self, child: &LayoutBox, space: AvailableSpace) -> Option<GridLayout> {
        let mut probe = child.clone();
        match layout_grid_container(&mut probe, space, self) {
            Ok(layout) => Some(layout),
            Err(err) => {
                warn!(error = %err, "nested grid measurement failed, using declared sizes");
                None
            }
        }
    }
}

impl ChildLayout for DeclaredContentLayout {
    fn min_content_width(&mut self, child: &LayoutBox) -> f32 {
        if child.style.display.is_grid() {
            let space = AvailableSpace::new(AvailableSize::MinContent, AvailableSize::MaxContent);
            if let Some(layout) = self.probe(child, space) {
                return layout.content_width;
            }
        }
        child.intrinsic.min_content_width
    }

    fn max_content_width(&mut self, child: &LayoutBox) -> f32 {
        if child.style.display.is_grid() {
            let space = AvailableSpace::new(AvailableSize::MaxContent, AvailableSize::MaxContent);
            if let Some(layout) = self.probe(child, space) {
                return layout.content_width;
            }
        }
        child.intrinsic.max_content_width
    }

    fn min_content_height(&mut self, child: &LayoutBox, available_width: AvailableSize) -> f32 {
        if child.style.display.is_grid() {
            let space = AvailableSpace::new(available_width, AvailableSize::MinContent);
            if let Some(layout) = self.probe(child, space) {
                return layout.content_height;
            }
        }
        child.intrinsic.min_content_height
    }

    fn max_content_height(&mut self, child: &LayoutBox, available_width: AvailableSize) -> f32 {
        if child.style.display.is_grid() {
            let space = AvailableSpace::new(available_width, AvailableSize::MaxContent);
            if let Some(layout) = self.probe(child, space) {
                return layout.content_height;
            }
        }
        child.intrinsic.max_content_height
    }

    fn layout_inside(
        &mut self,
        child: &mut LayoutBox,
        available_space: AvailableSpace,
    ) -> Result<(), LayoutError> {
        if child.style.display.is_grid() {
            layout_grid_container(child, available_space, self)?;
        }
        Ok(())
    }
}
