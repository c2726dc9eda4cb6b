//! CLI output formatting
//!
//! Colored status lines for progress and a plain table for `status`.

use colored::Colorize;

/// Output helper for consistent CLI formatting
pub struct Output;

impl Output {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!("\n{}", message.bold());
    }

    /// Format an import path consistently
    pub fn import_path(path: &str) -> String {
        path.cyan().bold().to_string()
    }

    /// Format a revision consistently
    pub fn revision(revision: &str) -> String {
        revision.magenta().to_string()
    }
}

/// Table builder for formatted output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with headers
    pub fn new(headers: Vec<&str>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| h.chars().count()).collect();
        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row of plain (uncolored) cells
    pub fn add_row(&mut self, row: Vec<&str>) {
        let row: Vec<String> = row.into_iter().map(|s| s.to_string()).collect();
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match self.column_widths.get_mut(i) {
                Some(width) => *width = (*width).max(len),
                None => self.column_widths.push(len),
            }
        }
        self.rows.push(row);
    }

    fn format_line(&self, cells: &[String]) -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = self.column_widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = width)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    /// Render headers, separator and rows as lines
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.format_line(&self.headers)];
        lines.push(
            self.column_widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        lines.extend(self.rows.iter().map(|row| self.format_line(row)));
        lines
    }

    /// Print the table
    pub fn print(&self) {
        for (i, line) in self.lines().into_iter().enumerate() {
            match i {
                0 => println!("{}", line.bold()),
                1 => println!("{}", line.dimmed()),
                _ => println!("{}", line),
            }
        }
    }
}
