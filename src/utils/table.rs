/// Fixed-width text table, used for the console report and Discord code blocks
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: &[&str]) -> Self {
        let col_widths = headers.iter().map(|h| h.chars().count()).collect();
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row; cells beyond the header count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.truncate(self.headers.len());

        for (i, col) in row.iter().enumerate() {
            self.col_widths[i] = self.col_widths[i].max(col.chars().count());
        }

        self.rows.push(row);
    }

    /// Plain text rendering for terminals
    pub fn render_plain(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());

        for row in &self.rows {
            output.push('\n');
            output.push_str(&self.render_row(row));
        }

        output
    }

    /// Rendering wrapped in a code block for Discord
    pub fn render(&self) -> String {
        format!("```\n{}\n```", self.render_plain())
    }

    /// First column left-aligned, the rest right-aligned
    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = self
            .col_widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let col = row.get(i).map(String::as_str).unwrap_or("");
                if i == 0 {
                    format!("{:<width$}", col, width = width)
                } else {
                    format!("{:>width$}", col, width = width)
                }
            })
            .collect();

        cells.join(" | ").trim_end().to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(&["Coin", "Change (%)"]);
        table.add_row(vec!["Bitcoin".to_string(), "11.11".to_string()]);
        table.add_row(vec!["XRP".to_string(), "n/a".to_string()]);

        let rendered = table.render_plain();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Coin    | Change (%)");
        assert_eq!(lines[1], "--------+-----------");
        assert_eq!(lines[2], "Bitcoin |      11.11");
        assert_eq!(lines[3], "XRP     |        n/a");
    }

    #[test]
    fn test_code_block_wrapping() {
        let table = Table::new(&["A"]);
        let rendered = table.render();
        assert!(rendered.starts_with("```\n"));
        assert!(rendered.ends_with("\n```"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(&["A", "B"]);
        table.add_row(vec!["x".to_string()]);
        assert!(table.render_plain().lines().last().unwrap().starts_with("x"));
    }
}
