//! Grid-specific computed values: track sizing functions, track lists,
//! named areas and line-based placement.

use smallvec::SmallVec;
use tracing::trace;

/// Line names attached to a single grid line.
pub type LineNames = SmallVec<[String; 1]>;

/// A grid track sizing function.
///
/// `MinMax` holds the min and max sizing functions of `minmax()`; every
/// other variant acts as both the min and the max function of its track.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrackSize {
    /// Fixed length in pixels.
    Px(f32),
    /// Percentage of the grid container's content box in this axis.
    Percent(f32),
    /// Fractional unit (flexible).
    Fr(f32),
    /// Size based on content minimum.
    MinContent,
    /// Size based on content maximum.
    MaxContent,
    /// Auto sizing.
    #[default]
    Auto,
    /// Minimum/maximum constraint.
    MinMax(Box<TrackSize>, Box<TrackSize>),
}

impl TrackSize {
    /// Create a fixed pixel size.
    pub fn px(value: f32) -> Self {
        TrackSize::Px(value)
    }

    /// Create a fractional size.
    pub fn fr(value: f32) -> Self {
        TrackSize::Fr(value)
    }

    /// Create a minmax constraint.
    pub fn minmax(min: TrackSize, max: TrackSize) -> Self {
        TrackSize::MinMax(Box::new(min), Box::new(max))
    }

    /// The min track sizing function.
    pub fn min_function(&self) -> &TrackSize {
        match self {
            TrackSize::MinMax(min, _) => min.min_function(),
            other => other,
        }
    }

    /// The max track sizing function.
    pub fn max_function(&self) -> &TrackSize {
        match self {
            TrackSize::MinMax(_, max) => max.max_function(),
            other => other,
        }
    }

    /// Check if this is a flexible track (max function in fr units).
    pub fn is_flexible(&self) -> bool {
        matches!(self.max_function(), TrackSize::Fr(_))
    }

    /// Fixed lengths and percentages resolve to a definite size.
    pub fn is_definite(&self) -> bool {
        matches!(self, TrackSize::Px(_) | TrackSize::Percent(_))
    }

    /// `auto`, `min-content` and `max-content`.
    pub fn is_intrinsic(&self) -> bool {
        matches!(
            self,
            TrackSize::Auto | TrackSize::MinContent | TrackSize::MaxContent
        )
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, TrackSize::Auto)
    }

    pub fn is_fr(&self) -> bool {
        matches!(self, TrackSize::Fr(_))
    }

    /// The fr factor of a flexible function, zero otherwise.
    pub fn flex_factor(&self) -> f32 {
        match self {
            TrackSize::Fr(fr) => *fr,
            _ => 0.0,
        }
    }
}

/// A grid track definition (for grid-template-columns/rows).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDefinition {
    /// Track sizing.
    pub size: TrackSize,
    /// Line names of the line before this track.
    pub line_names: LineNames,
}

impl TrackDefinition {
    /// Create a simple track without line names.
    pub fn simple(size: TrackSize) -> Self {
        Self {
            size,
            line_names: LineNames::new(),
        }
    }

    /// Create a track whose leading line carries a name.
    pub fn named(size: TrackSize, name: &str) -> Self {
        let mut line_names = LineNames::new();
        line_names.push(name.to_string());
        Self { size, line_names }
    }
}

/// The repetition count of `repeat()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    /// Repeat a fixed number of times.
    Count(u32),
    /// As many repetitions as fit.
    AutoFill,
    /// As many as fit, collapsing repetitions left empty after placement.
    AutoFit,
}

impl RepeatCount {
    pub fn is_auto(self) -> bool {
        matches!(self, RepeatCount::AutoFill | RepeatCount::AutoFit)
    }
}

/// A `repeat()` entry of a track list.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRepeat {
    pub count: RepeatCount,
    pub tracks: Vec<TrackDefinition>,
}

impl TrackRepeat {
    pub fn count(count: u32, tracks: Vec<TrackDefinition>) -> Self {
        Self {
            count: RepeatCount::Count(count),
            tracks,
        }
    }

    pub fn auto_fill(tracks: Vec<TrackDefinition>) -> Self {
        Self {
            count: RepeatCount::AutoFill,
            tracks,
        }
    }

    pub fn auto_fit(tracks: Vec<TrackDefinition>) -> Self {
        Self {
            count: RepeatCount::AutoFit,
            tracks,
        }
    }
}

/// One entry of a track list: a plain track or a `repeat()`.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackListEntry {
    Track(TrackDefinition),
    Repeat(TrackRepeat),
}

/// Grid template definition (grid-template-columns / grid-template-rows).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridTemplate {
    /// Track list in source order.
    pub entries: Vec<TrackListEntry>,
    /// Names of the line after the last track.
    pub final_line_names: LineNames,
}

impl GridTemplate {
    /// Create an empty template (no explicit tracks).
    pub fn none() -> Self {
        Self::default()
    }

    /// Create from a list of track sizes.
    pub fn from_sizes(sizes: Vec<TrackSize>) -> Self {
        Self {
            entries: sizes
                .into_iter()
                .map(|size| TrackListEntry::Track(TrackDefinition::simple(size)))
                .collect(),
            final_line_names: LineNames::new(),
        }
    }

    pub fn from_entries(entries: Vec<TrackListEntry>) -> Self {
        Self {
            entries,
            final_line_names: LineNames::new(),
        }
    }

    /// A template made of a single `repeat()`.
    pub fn repeat(repeat: TrackRepeat) -> Self {
        Self::from_entries(vec![TrackListEntry::Repeat(repeat)])
    }

    pub fn with_final_line_name(mut self, name: &str) -> Self {
        self.final_line_names.push(name.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the list contains an auto-fill or auto-fit repetition.
    pub fn has_auto_repeat(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, TrackListEntry::Repeat(r) if r.count.is_auto()))
    }

    /// Find the 0-based index of the first line carrying `name`.
    ///
    /// Fixed-count repetitions are unrolled while counting. Lines inside an
    /// auto repetition cannot be numbered before layout, so a list that
    /// contains one never matches.
    pub fn line_index(&self, name: &str) -> Option<usize> {
        if self.entries.is_empty() || self.has_auto_repeat() {
            return None;
        }

        let mut line = 0;
        for entry in &self.entries {
            match entry {
                TrackListEntry::Track(track) => {
                    if track.line_names.iter().any(|n| n == name) {
                        return Some(line);
                    }
                    line += 1;
                }
                TrackListEntry::Repeat(repeat) => {
                    let RepeatCount::Count(count) = repeat.count else {
                        return None;
                    };
                    for _ in 0..count {
                        for track in &repeat.tracks {
                            if track.line_names.iter().any(|n| n == name) {
                                return Some(line);
                            }
                            line += 1;
                        }
                    }
                }
            }
        }

        if self.final_line_names.iter().any(|n| n == name) {
            return Some(line);
        }
        None
    }
}

/// Grid template areas as a row-major matrix of cell names.
///
/// `None` marks a null cell token (`.`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridTemplateAreas {
    pub rows: Vec<Vec<Option<String>>>,
}

impl GridTemplateAreas {
    /// Build from one string per row, e.g. `["header header", "nav main"]`.
    pub fn from_rows(rows: &[&str]) -> Self {
        let rows: Vec<Vec<Option<String>>> = rows
            .iter()
            .map(|row| {
                row.trim()
                    .trim_matches('"')
                    .trim_matches('\'')
                    .split_whitespace()
                    .map(|cell| {
                        if cell.chars().all(|c| c == '.') {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect()
            })
            .filter(|cells: &Vec<Option<String>>| !cells.is_empty())
            .collect();

        trace!(rows = rows.len(), "grid-template-areas matrix");
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Grid line reference (for grid-column-start, etc.).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GridLine {
    /// Auto placement.
    #[default]
    Auto,
    /// Specific line number (1-based, can be negative).
    Number(i32),
    /// Named line or named area edge.
    Name(String),
    /// Span a number of tracks.
    Span(u32),
    /// Span to a named line.
    SpanName(String),
}

impl GridLine {
    pub fn is_auto(&self) -> bool {
        matches!(self, GridLine::Auto)
    }

    /// The line contributes a definite position.
    pub fn is_position(&self) -> bool {
        matches!(self, GridLine::Number(_) | GridLine::Name(_))
    }

    pub fn is_span(&self) -> bool {
        matches!(self, GridLine::Span(_) | GridLine::SpanName(_))
    }

    /// `auto` and spans leave the position to auto-placement.
    pub fn is_auto_positioned(&self) -> bool {
        !self.is_position()
    }

    /// The integer carried by the value.
    ///
    /// Named lines carry no integer; a named span counts as a span of one.
    pub fn raw_value(&self) -> i32 {
        match self {
            GridLine::Number(n) => *n,
            GridLine::Span(n) => (*n).max(1) as i32,
            GridLine::SpanName(_) => 1,
            GridLine::Auto | GridLine::Name(_) => 0,
        }
    }

    /// The span contributed by this value, if it is a span.
    pub fn span(&self) -> Option<u32> {
        self.is_span().then(|| self.raw_value() as u32)
    }

    /// Line name used for named-line and named-area resolution.
    pub fn line_name(&self) -> Option<&str> {
        match self {
            GridLine::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Grid placement for an item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridPlacement {
    /// Column start line.
    pub column_start: GridLine,
    /// Column end line.
    pub column_end: GridLine,
    /// Row start line.
    pub row_start: GridLine,
    /// Row end line.
    pub row_end: GridLine,
}

impl GridPlacement {
    /// Create placement from a named area.
    pub fn from_area(name: &str) -> Self {
        Self {
            column_start: GridLine::Name(format!("{}-start", name)),
            column_end: GridLine::Name(format!("{}-end", name)),
            row_start: GridLine::Name(format!("{}-start", name)),
            row_end: GridLine::Name(format!("{}-end", name)),
        }
    }

    /// Create placement from explicit lines.
    pub fn from_lines(col_start: i32, col_end: i32, row_start: i32, row_end: i32) -> Self {
        Self {
            column_start: GridLine::Number(col_start),
            column_end: GridLine::Number(col_end),
            row_start: GridLine::Number(row_start),
            row_end: GridLine::Number(row_end),
        }
    }

    /// Create placement from per-axis start/end pairs.
    pub fn from_pairs(column: (GridLine, GridLine), row: (GridLine, GridLine)) -> Self {
        Self {
            column_start: column.0,
            column_end: column.1,
            row_start: row.0,
            row_end: row.1,
        }
    }
}
