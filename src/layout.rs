//! Table geometry for PDF statements.
//!
//! A PDF carries no table structure, only positioned text runs. Rows are
//! reconstructed in two passes: runs are clustered into physical lines by
//! vertical position, then each line is split into cells by horizontal column
//! bands. The clustering constants differ per bank layout and therefore live
//! in [`TableLayout`] values rather than in code, so they can be tuned and
//! tested independently.

use crate::pdf_text::TextRun;

/// Horizontal band occupied by one table column, in PDF user-space points.
/// `max_x` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBand {
    pub name: &'static str,
    pub min_x: f64,
    pub max_x: f64,
}

/// Calibration data for one bank's statement table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    /// Runs within this vertical distance belong to the same physical line.
    pub line_tolerance: f64,
    pub columns: &'static [ColumnBand],
}

/// One reconstructed physical line, with a cell per column band. Fragments
/// that fall into the same band are joined with a single space, in x order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub page: u32,
    pub cells: Vec<String>,
}

impl TableLayout {
    /// Index of a named column within [`TableRow::cells`].
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cluster text runs into table rows, in reading order: page by page, top
    /// to bottom, left to right. Runs outside every column band are dropped.
    pub fn assemble_rows(&self, runs: &[TextRun]) -> Vec<TableRow> {
        let mut ordered: Vec<&TextRun> = runs.iter().collect();
        // PDF y grows upward, so top-of-page means largest y.
        ordered.sort_by(|a, b| {
            a.page
                .cmp(&b.page)
                .then(b.y.total_cmp(&a.y))
                .then(a.x.total_cmp(&b.x))
        });

        let mut rows: Vec<TableRow> = Vec::new();
        let mut current: Option<(u32, f64, Vec<String>)> = None;

        for run in ordered {
            let same_line = matches!(
                current,
                Some((page, y, _)) if page == run.page && (y - run.y).abs() <= self.line_tolerance
            );
            if !same_line {
                if let Some((page, _, cells)) = current.take() {
                    if cells.iter().any(|c| !c.is_empty()) {
                        rows.push(TableRow { page, cells });
                    }
                }
                current = Some((run.page, run.y, vec![String::new(); self.columns.len()]));
            }

            if let (Some((_, _, cells)), Some(idx)) = (current.as_mut(), self.band_index(run.x)) {
                let cell = &mut cells[idx];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(run.text.trim());
            }
        }

        if let Some((page, _, cells)) = current {
            if cells.iter().any(|c| !c.is_empty()) {
                rows.push(TableRow { page, cells });
            }
        }

        rows
    }

    fn band_index(&self, x: f64) -> Option<usize> {
        self.columns
            .iter()
            .position(|band| x >= band.min_x && x < band.max_x)
    }
}
