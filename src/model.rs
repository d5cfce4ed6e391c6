//! Data structures describing the logical content of a certificate page.
//!
//! The types in this module form a small content model that mirrors the building blocks the
//! renderer turns into `genpdf` elements: styled paragraphs, fixed vertical spacing and tables
//! with fixed column widths.  Layout code produces a list of [`Block`]s, which keeps the page
//! content inspectable without rendering anything.
//!
//! Lengths are stored in millimetres; [`inches`] and [`points`] convert from the units the layout
//! is specified in.

use genpdf::style::Color;

use crate::richtext::Span;

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Millimetres per PDF point.
pub const MM_PER_POINT: f64 = MM_PER_INCH / 72.0;

/// Converts inches to millimetres.
pub fn inches(value: f64) -> f64 {
    value * MM_PER_INCH
}

/// Converts PDF points to millimetres.
pub fn points(value: f64) -> f64 {
    value * MM_PER_POINT
}

/// Horizontal placement of text inside its paragraph or table cell.
///
/// The variants map directly to [`genpdf::Alignment`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

impl From<HorizontalAlignment> for genpdf::Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => genpdf::Alignment::Left,
            HorizontalAlignment::Center => genpdf::Alignment::Center,
            HorizontalAlignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Rich text paragraph carrying inline styling, alignment and a font size in points.
#[derive(Clone, Debug, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
    font_size: u8,
}

/// Font size used when a paragraph does not set one.
pub const DEFAULT_FONT_SIZE: u8 = 12;

impl Default for RichParagraph {
    fn default() -> Self {
        Self {
            spans: Vec::new(),
            alignment: HorizontalAlignment::Left,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl RichParagraph {
    /// Creates a left-aligned paragraph from the provided spans.
    pub fn new(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            ..Self::default()
        }
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Returns the paragraph text without styling.
    pub fn text(&self) -> String {
        crate::richtext::plain_text(&self.spans)
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the font size and returns the updated paragraph.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }
}

/// A fixed-width table column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableColumn {
    width_mm: f64,
    alignment: HorizontalAlignment,
    bold: bool,
}

impl TableColumn {
    /// Creates a left-aligned, regular-weight column of the given width.
    pub fn new(width_mm: f64) -> Self {
        Self {
            width_mm,
            alignment: HorizontalAlignment::Left,
            bold: false,
        }
    }

    /// Returns the column width in millimetres.
    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    /// Returns the alignment of the cells in this column.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns whether the cells in this column are set in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Sets the alignment and returns the updated column.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Marks the column bold and returns the updated column.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A table of plain-text cells with fixed column widths, centered on the page.
///
/// Every row holds one cell per column.  When a shading color is set, odd rows (counting from
/// zero) are drawn on that background and even rows are left clear.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    columns: Vec<TableColumn>,
    rows: Vec<Vec<String>>,
    font_size: u8,
    padding_top_mm: f64,
    padding_bottom_mm: f64,
    shading: Option<Color>,
}

impl TableBlock {
    /// Creates an empty table with the given columns.
    pub fn new(columns: impl Into<Vec<TableColumn>>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            padding_top_mm: 0.0,
            padding_bottom_mm: 0.0,
            shading: None,
        }
    }

    /// Appends a row and returns the updated table.
    ///
    /// Missing cells are filled with empty strings and surplus cells are dropped so the row always
    /// matches the column count.
    pub fn with_row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.columns.len())
            .map(Into::into)
            .collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
        self
    }

    /// Sets the font size and returns the updated table.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the cell padding above and below the text and returns the updated table.
    pub fn with_padding_mm(mut self, top: f64, bottom: f64) -> Self {
        self.padding_top_mm = top;
        self.padding_bottom_mm = bottom;
        self
    }

    /// Sets the background used for alternating rows and returns the updated table.
    pub fn with_shading(mut self, shading: Color) -> Self {
        self.shading = Some(shading);
        self
    }

    /// Returns the column definitions.
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Returns the padding above the text of each row.
    pub fn padding_top_mm(&self) -> f64 {
        self.padding_top_mm
    }

    /// Returns the padding below the text of each row.
    pub fn padding_bottom_mm(&self) -> f64 {
        self.padding_bottom_mm
    }

    /// Returns the background for `row`, if the row is shaded.
    pub fn row_shading(&self, row: usize) -> Option<Color> {
        self.shading.filter(|_| row % 2 == 1)
    }

    /// Returns the total width of all columns.
    pub fn width_mm(&self) -> f64 {
        self.columns.iter().map(TableColumn::width_mm).sum()
    }

    /// Returns the text of a single cell.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Looks up the second cell of the row whose first cell equals `label`.
    pub fn value_for(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.first().map(String::as_str) == Some(label))
            .and_then(|row| row.get(1))
            .map(String::as_str)
    }
}

/// Individual content blocks that make up a page.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Styled paragraph content.
    Paragraph(RichParagraph),
    /// Fixed vertical space, in millimetres.
    Spacer(f64),
    /// Fixed-width table.
    Table(TableBlock),
}

impl Block {
    /// Convenience helper for building a spacer block.
    pub fn spacer(height_mm: f64) -> Self {
        Self::Spacer(height_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_conversions() {
        assert!((inches(0.5) - 12.7).abs() < 1e-9);
        assert!((points(72.0) - 25.4).abs() < 1e-9);
    }

    #[test]
    fn rows_are_normalized_to_column_count() {
        let table = TableBlock::new(vec![TableColumn::new(10.0), TableColumn::new(20.0)])
            .with_row(["only one"])
            .with_row(["a", "b", "dropped"]);

        assert_eq!(table.rows()[0], vec!["only one".to_string(), String::new()]);
        assert_eq!(table.rows()[1].len(), 2);
        assert_eq!(table.cell(1, 1), Some("b"));
        assert_eq!(table.width_mm(), 30.0);
    }

    #[test]
    fn shading_alternates_starting_clear() {
        let grey = Color::Rgb(242, 242, 242);
        let table = TableBlock::new(vec![TableColumn::new(10.0)]).with_shading(grey);

        assert_eq!(table.row_shading(0), None);
        assert_eq!(table.row_shading(1), Some(grey));
        assert_eq!(table.row_shading(2), None);
        assert_eq!(table.row_shading(3), Some(grey));
    }

    #[test]
    fn value_lookup_by_label() {
        let table = TableBlock::new(vec![TableColumn::new(10.0), TableColumn::new(10.0)])
            .with_row(["Role:", "Usher"]);

        assert_eq!(table.value_for("Role:"), Some("Usher"));
        assert_eq!(table.value_for("Missing:"), None);
    }
}
