//! Bordered text tables.

use super::ansi::visible_width;

/// A table with a header row, drawn with ASCII borders:
///
/// ```text
/// +-------+--------------+
/// | Train | Destination  |
/// +-------+--------------+
/// | 9999  | ROMA TERMINI |
/// +-------+--------------+
/// ```
///
/// Cells may contain escape sequences; widths are measured on the
/// visible text.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row. Missing cells are drawn empty, extra cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| visible_width(cell))
                    .chain(std::iter::once(visible_width(header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();

        let border: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .chain(std::iter::once("+".to_string()))
            .collect();

        let line = |cells: &[String]| -> String {
            let mut out = String::new();
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = width.saturating_sub(visible_width(cell));
                out.push_str("| ");
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 1));
            }
            out.push('|');
            out
        };

        let mut out = Vec::with_capacity(self.rows.len() + 4);
        out.push(border.clone());
        out.push(line(&self.headers));
        out.push(border.clone());
        for row in &self.rows {
            out.push(line(row));
        }
        out.push(border);
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ansi::{bold, strip};

    #[test]
    fn renders_with_borders() {
        let mut table = Table::new(["Train", "Destination"]);
        table.add_row(vec!["9999".into(), "ROMA TERMINI".into()]);

        let expected = "\
+-------+--------------+
| Train | Destination  |
+-------+--------------+
| 9999  | ROMA TERMINI |
+-------+--------------+";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn escapes_do_not_widen_columns() {
        let mut table = Table::new(["A"]);
        table.add_row(vec![bold("xy")]);
        let rendered = table.render();
        assert_eq!(
            strip(&rendered),
            "+----+\n| A  |\n+----+\n| xy |\n+----+"
        );
    }

    #[test]
    fn short_rows_are_padded() {
        let mut table = Table::new(["A", "B"]);
        table.add_row(vec!["1".into()]);
        assert!(table.render().contains("| 1 |   |"));
    }
}
