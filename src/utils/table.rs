/// Column alignment for `Table`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A plain-text table rendered inside a Discord code block
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers, all columns left aligned
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| h.chars().count()).collect();
        Table {
            aligns: vec![Align::Left; headers.len()],
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Set the alignment of one column (numbers read better right aligned)
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Add a row. Missing cells render empty, extra cells are dropped.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        let cells: Vec<String> = (0..self.headers.len())
            .map(|i| row.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default())
            .collect();

        for (width, cell) in self.col_widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(cells);
    }

    /// Render the table as a code block
    pub fn render(&self) -> String {
        let mut output = String::from("```\n");
        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');
        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }
        output.push_str("```");
        output
    }

    fn render_row(&self, row: &[String]) -> String {
        row.iter()
            .zip(self.col_widths.iter().zip(&self.aligns))
            .map(|(cell, (&width, align))| match align {
                Align::Left => format!("{:<width$}", cell, width = width),
                Align::Right => format!("{:>width$}", cell, width = width),
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(vec!["Time", "Value", "Flag"]).align(1, Align::Right);
        table.add_row(&["01-01 00:00", "61.0", ""]);
        table.add_row(&["01-01 00:01", "102.5", "imputed"]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "```");
        assert_eq!(lines[1], "Time        | Value | Flag");
        assert_eq!(lines[2], "------------+-------+--------");
        assert_eq!(lines[3], "01-01 00:00 |  61.0 |");
        assert_eq!(lines[4], "01-01 00:01 | 102.5 | imputed");
        assert_eq!(lines[5], "```");
    }

    #[test]
    fn test_ragged_rows_padded() {
        let mut table = Table::new(vec!["ID", "Name"]);
        table.add_row(&["7"]);
        table.add_row(&["8", "Bo", "extra"]);
        let rendered = table.render();
        assert!(rendered.contains("8  | Bo"));
        assert!(!rendered.contains("extra"));
    }
}
