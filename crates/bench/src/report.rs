use std::fmt;
use std::time::Duration;

/// Column headers, in the order of [`ResultsRow::cells`].
pub const COLUMNS: [&str; 4] = [
    "Sequential (sorted)",
    "Parallel (sorted)",
    "Sequential (random)",
    "Parallel (random)",
];

const SIZE_HEADER: &str = "Size";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timing {
    Completed(Duration),
    Failed(&'static str),
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(elapsed) => write!(f, "{} ms", elapsed.as_millis()),
            Self::Failed(_) => f.write_str("ERROR"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResultsRow {
    pub size: usize,
    pub cells: [Timing; 4],
}

#[derive(Clone, Debug, Default)]
pub struct ResultsTable {
    rows: Vec<ResultsRow>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultsRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultsRow] {
        &self.rows
    }

    fn widths(&self) -> (usize, [usize; 4]) {
        let size_width = self
            .rows
            .iter()
            .map(|row| row.size.to_string().len())
            .chain([SIZE_HEADER.len()])
            .max()
            .unwrap_or(SIZE_HEADER.len());

        let mut widths = COLUMNS.map(str::len);
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.to_string().len());
            }
        }
        (size_width, widths)
    }
}

impl fmt::Display for ResultsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (size_width, widths) = self.widths();

        let rule = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            write!(f, "+{}", "-".repeat(size_width + 2))?;
            for width in widths {
                write!(f, "+{}", "-".repeat(width + 2))?;
            }
            writeln!(f, "+")
        };

        rule(f)?;
        write!(f, "| {SIZE_HEADER:<size_width$} ")?;
        for (header, width) in COLUMNS.iter().zip(widths) {
            write!(f, "| {header:<width$} ")?;
        }
        writeln!(f, "|")?;
        rule(f)?;

        for row in &self.rows {
            write!(f, "| {:<size_width$} ", row.size)?;
            for (cell, width) in row.cells.iter().zip(widths) {
                write!(f, "| {:<width$} ", cell.to_string())?;
            }
            writeln!(f, "|")?;
        }
        rule(f)
    }
}
