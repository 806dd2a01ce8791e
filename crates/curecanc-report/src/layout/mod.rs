//! Flowing page layout on A4.
//!
//! A cursor moves down the page as cells are written; a cell that would
//! cross the bottom margin starts a new page. Coordinates are millimetres
//! from the top-left corner and are converted to PDF points (bottom-left
//! origin) when operations are emitted.

pub mod metrics;

use lopdf::content::Operation;
use lopdf::Object;

pub use metrics::{FontStyle, PT_PER_MM};

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 10.0;
/// Horizontal padding between a cell edge and its text.
pub const CELL_PADDING: f64 = 1.0;
/// Distance from the bottom edge that triggers a page break.
pub const BREAK_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One table-style cell.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    /// Width in mm; `0.0` extends to the right margin.
    pub width: f64,
    pub height: f64,
    pub text: &'a str,
    pub border: bool,
    /// Move to the start of the next line afterwards.
    pub newline: bool,
    pub align: Align,
}

impl<'a> Cell<'a> {
    /// Full-width, borderless line.
    pub fn line(height: f64, text: &'a str) -> Self {
        Self { width: 0.0, height, text, border: false, newline: true, align: Align::Left }
    }

    pub fn boxed(width: f64, height: f64, text: &'a str) -> Self {
        Self { width, height, text, border: true, newline: false, align: Align::Left }
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn end_line(mut self) -> Self {
        self.newline = true;
        self
    }
}

pub struct Layout {
    pages: Vec<Vec<Operation>>,
    x: f64,
    y: f64,
    style: FontStyle,
    size: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Start with one empty page and Helvetica 12.
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            x: MARGIN,
            y: MARGIN,
            style: FontStyle::Regular,
            size: 12.0,
        }
    }

    pub fn set_font(&mut self, style: FontStyle, size: f64) {
        self.style = style;
        self.size = size;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Current vertical position in mm from the top edge.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Line break: back to the left margin and down by `height`.
    pub fn ln(&mut self, height: f64) {
        self.x = MARGIN;
        self.y += height;
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = MARGIN;
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // pages is never empty: new() seeds one page and add_page only pushes.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn cell(&mut self, cell: Cell<'_>) {
        if self.y + cell.height > PAGE_HEIGHT - BREAK_MARGIN && self.y > MARGIN {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        let width = if cell.width > 0.0 { cell.width } else { PAGE_WIDTH - MARGIN - self.x };
        let (x, y) = (self.x, self.y);

        if cell.border {
            self.ops().extend([
                Operation::new("w", vec![real(0.2 * PT_PER_MM)]),
                Operation::new(
                    "re",
                    vec![
                        real(x * PT_PER_MM),
                        real((PAGE_HEIGHT - y - cell.height) * PT_PER_MM),
                        real(width * PT_PER_MM),
                        real(cell.height * PT_PER_MM),
                    ],
                ),
                Operation::new("S", vec![]),
            ]);
        }

        if !cell.text.is_empty() {
            let text: String = cell.text.chars().map(metrics::printable).collect();
            let dx = match cell.align {
                Align::Left => CELL_PADDING,
                Align::Center => (width - metrics::text_width(self.style, self.size, &text)) / 2.0,
            };
            let font_mm = self.size / PT_PER_MM;
            let baseline = y + 0.5 * cell.height + 0.3 * font_mm;
            let (resource, size) = (self.style.resource_name(), self.size);
            self.ops().extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(resource.as_bytes().to_vec()), real(size)]),
                Operation::new(
                    "Td",
                    vec![real((x + dx) * PT_PER_MM), real((PAGE_HEIGHT - baseline) * PT_PER_MM)],
                ),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ]);
        }

        if cell.newline {
            self.ln(cell.height);
        } else {
            self.x += width;
        }
    }

    /// Wrapped paragraph spanning the full text width, `height` mm per line.
    pub fn paragraph(&mut self, height: f64, text: &str) {
        let width = PAGE_WIDTH - MARGIN - self.x - 2.0 * CELL_PADDING;
        for line in metrics::wrap(self.style, self.size, width, text) {
            self.cell(Cell::line(height, &line));
        }
    }

    /// Finish and hand back the operations of each page.
    pub fn into_pages(self) -> Vec<Vec<Operation>> {
        self.pages
    }
}

fn real(value: f64) -> Object {
    Object::Real(value as _)
}
