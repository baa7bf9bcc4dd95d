//! Grid container builder.

use gridkit_css::{ComputedStyle, GridPlacement, GridTemplate, GridTemplateAreas, Length, TrackSize};
use gridkit_layout::{
    layout_grid_container_with_config, AvailableSpace, BoxType, ContentSizes, DeclaredContentLayout,
    GridLayout, GridLayoutConfig, LayoutBox, LayoutError,
};

/// A leaf box with the same content size under every constraint.
pub fn leaf(width: f32, height: f32) -> LayoutBox {
    LayoutBox::with_content(ComputedStyle::new(), ContentSizes::fixed(width, height))
}

/// An empty leaf with a grid placement.
pub fn placed(placement: GridPlacement) -> LayoutBox {
    let mut child = leaf(0.0, 0.0);
    child.style.set_placement(placement);
    child
}

/// Builder around a `display: grid` container.
pub struct TestGrid {
    container: LayoutBox,
    config: GridLayoutConfig,
}

impl TestGrid {
    pub fn new() -> Self {
        Self {
            container: LayoutBox::new(BoxType::Block, ComputedStyle::grid()),
            config: GridLayoutConfig::default(),
        }
    }

    pub fn columns(mut self, template: GridTemplate) -> Self {
        self.container.style.grid_template_columns = template;
        self
    }

    pub fn column_sizes(self, sizes: Vec<TrackSize>) -> Self {
        self.columns(GridTemplate::from_sizes(sizes))
    }

    pub fn row_sizes(mut self, sizes: Vec<TrackSize>) -> Self {
        self.container.style.grid_template_rows = GridTemplate::from_sizes(sizes);
        self
    }

    pub fn areas(mut self, rows: &[&str]) -> Self {
        self.container.style.grid_template_areas = Some(GridTemplateAreas::from_rows(rows));
        self
    }

    pub fn gap(mut self, column_gap: f32, row_gap: f32) -> Self {
        self.container.style.column_gap = Length::Px(column_gap);
        self.container.style.row_gap = Length::Px(row_gap);
        self
    }

    pub fn child(mut self, child: LayoutBox) -> Self {
        self.container.add_child(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = LayoutBox>) -> Self {
        self.container.children.extend(children);
        self
    }

    pub fn config(mut self, config: GridLayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn container(&self) -> &LayoutBox {
        &self.container
    }

    pub fn try_layout(&mut self, space: AvailableSpace) -> Result<GridLayout, LayoutError> {
        super::init_tracing();
        layout_grid_container_with_config(
            &mut self.container,
            space,
            &mut DeclaredContentLayout::new(),
            &self.config,
        )
    }

    pub fn layout(&mut self, space: AvailableSpace) -> GridLayout {
        self.try_layout(space).expect("grid layout should succeed")
    }
}
