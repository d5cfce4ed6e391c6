//! Element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` has no fixed-height spacing, no fixed-width tables and no filled shapes.  This module
//! adds the pieces the certificate needs: [`Spacer`], [`FixedTable`] (which shades its rows by
//! hatching them with hairlines) and [`stroke_command`], which draws a
//! [`DrawCommand`](crate::decoration::DrawCommand) with the requested stroke width.

use genpdf::elements::Paragraph;
use genpdf::error::Error;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult, Size};

use crate::decoration::{hairline_offsets, DrawCommand, Point};
use crate::model::{points, HorizontalAlignment, RichParagraph, TableBlock};

/// Horizontal cell padding, matching common table defaults of 6 pt.
const CELL_PADDING_PT: f64 = 6.0;

/// Distance between hatching lines; below the 1 pt line width so the fill has no gaps.
const HATCH_STEP_MM: f64 = 0.3;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn position(x: f64, y: f64) -> Position {
    Position::new(mm_from_f64(x), mm_from_f64(y))
}

/// Converts a content-model paragraph into a styled `genpdf` paragraph.
pub fn paragraph(paragraph: &RichParagraph) -> impl Element {
    let mut element = Paragraph::default();
    for span in paragraph.spans() {
        element.push(span);
    }
    element.set_alignment(paragraph.alignment().into());
    element.styled(Style::new().with_font_size(paragraph.font_size()))
}

/// Fixed vertical space.
pub struct Spacer {
    height: f64,
}

impl Spacer {
    /// Creates a spacer of `height_mm` millimetres.
    pub fn new(height_mm: f64) -> Self {
        Self { height: height_mm }
    }
}

impl Element for Spacer {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if self.height > mm_to_f64(area.size().height) {
            result.has_more = true;
            return Ok(result);
        }
        result.size = Size::new(0, mm_from_f64(self.height));
        Ok(result)
    }
}

/// Renders a [`TableBlock`] horizontally centered in the available area.
///
/// Rows are single lines of text; every row has the same height (line height plus the table's
/// vertical padding).  The table is rendered as a whole or not at all.
pub struct FixedTable {
    table: TableBlock,
}

impl FixedTable {
    pub fn new(table: TableBlock) -> Self {
        Self { table }
    }

    fn row_height(&self, line_height: f64) -> f64 {
        self.table.padding_top_mm() + line_height + self.table.padding_bottom_mm()
    }
}

impl Element for FixedTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let base = style.and(Style::new().with_font_size(self.table.font_size()));
        let line_height = mm_to_f64(base.line_height(&context.font_cache));
        let row_height = self.row_height(line_height);
        let total_height = row_height * self.table.rows().len() as f64;

        let mut result = RenderResult::default();
        if total_height > mm_to_f64(area.size().height) {
            result.has_more = true;
            return Ok(result);
        }

        let table_width = self.table.width_mm();
        let left = ((mm_to_f64(area.size().width) - table_width) / 2.0).max(0.0);
        let padding = points(CELL_PADDING_PT);

        for (row_index, row) in self.table.rows().iter().enumerate() {
            let top = row_height * row_index as f64;

            if let Some(shade) = self.table.row_shading(row_index) {
                hatch(&area, left, top, table_width, row_height, shade);
            }

            let mut column_left = left;
            for (column, text) in self.table.columns().iter().zip(row) {
                let column_width = column.width_mm();
                if !text.is_empty() {
                    let cell_style = if column.is_bold() {
                        base.bold()
                    } else {
                        base
                    };
                    let string = StyledString::new(text.clone(), cell_style);
                    let text_width = mm_to_f64(string.width(&context.font_cache));
                    let inner_width = column_width - 2.0 * padding;
                    let offset = match column.alignment() {
                        HorizontalAlignment::Left => 0.0,
                        HorizontalAlignment::Center => (inner_width - text_width) / 2.0,
                        HorizontalAlignment::Right => inner_width - text_width,
                    };
                    let origin = position(
                        column_left + padding + offset,
                        top + self.table.padding_top_mm(),
                    );

                    match area.text_section(&context.font_cache, origin, cell_style) {
                        Some(mut section) => section.print_str(&string.s, string.style)?,
                        None => {
                            result.has_more = true;
                            return Ok(result);
                        }
                    }
                }
                column_left += column_width;
            }
        }

        result.size = Size::new(mm_from_f64(table_width), mm_from_f64(total_height));
        Ok(result)
    }
}

/// Fills a rectangle by drawing closely spaced horizontal hairlines.
fn hatch(area: &render::Area<'_>, left: f64, top: f64, width: f64, height: f64, color: Color) {
    let count = (height / HATCH_STEP_MM).ceil().max(1.0) as usize;
    let step = height / count as f64;
    let style = Style::new().with_color(color);
    for index in 0..count {
        let y = top + step * (index as f64 + 0.5);
        area.draw_line(vec![position(left, y), position(left + width, y)], style);
    }
}

/// Strokes `command` onto `area`, emulating wide strokes with parallel hairlines.
pub fn stroke_command(area: &render::Area<'_>, command: &DrawCommand) {
    let stroke = command.stroke();
    let style = Style::new().with_color(stroke.color);

    for offset in hairline_offsets(stroke.width_pt) {
        match *command {
            DrawCommand::Rect {
                origin,
                width,
                height,
                ..
            } => {
                let (x0, y0) = (origin.x - offset, origin.y - offset);
                let (x1, y1) = (origin.x + width + offset, origin.y + height + offset);
                area.draw_line(
                    vec![
                        position(x0, y0),
                        position(x1, y0),
                        position(x1, y1),
                        position(x0, y1),
                        position(x0, y0),
                    ],
                    style,
                );
            }
            DrawCommand::Line { from, to, .. } => {
                let (a, b) = offset_segment(from, to, offset);
                area.draw_line(vec![position(a.x, a.y), position(b.x, b.y)], style);
            }
        }
    }
}

/// Shifts a segment sideways by `offset` along its normal.
fn offset_segment(from: Point, to: Point, offset: f64) -> (Point, Point) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f64::EPSILON {
        return (from, to);
    }
    let (nx, ny) = (-dy / length * offset, dx / length * offset);
    (
        Point::new(from.x + nx, from.y + ny),
        Point::new(to.x + nx, to.y + ny),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mm_conversion_round_trips() {
        assert!((mm_to_f64(mm_from_f64(12.7)) - 12.7).abs() < 1e-9);
    }

    #[test]
    fn horizontal_segment_shifts_vertically() {
        let (a, b) = offset_segment(Point::new(0.0, 5.0), Point::new(10.0, 5.0), 0.5);
        assert_eq!(a, Point::new(0.0, 5.5));
        assert_eq!(b, Point::new(10.0, 5.5));
    }

    #[test]
    fn vertical_segment_shifts_horizontally() {
        let (a, b) = offset_segment(Point::new(3.0, 0.0), Point::new(3.0, 8.0), 0.25);
        assert_eq!(a, Point::new(2.75, 0.0));
        assert_eq!(b, Point::new(2.75, 8.0));
    }

    #[test]
    fn degenerate_segment_is_left_alone() {
        let point = Point::new(1.0, 1.0);
        assert_eq!(offset_segment(point, point, 0.5), (point, point));
    }
}
