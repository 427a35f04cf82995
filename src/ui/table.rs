// Sat Oct 17 2026 - Alex

use colored::*;
use std::cmp::max;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    None,
    Ascii,
    Unicode,
}

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
    alignment: Vec<Alignment>,
    use_color: bool,
    border_style: BorderStyle,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            column_widths: Vec::new(),
            alignment: Vec::new(),
            use_color: true,
            border_style: BorderStyle::Unicode,
        }
    }

    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| s.to_string()).collect();
        self.column_widths = self.headers.iter().map(|h| h.chars().count()).collect();
        self.alignment = vec![Alignment::Left; self.headers.len()];
        self
    }

    pub fn with_rows<T: Display>(self, rows: &[Vec<T>]) -> Self {
        rows.iter().fold(self, |table, row| table.add_row(row))
    }

    pub fn add_row<T: Display>(mut self, row: &[T]) -> Self {
        let row: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        for (i, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match self.column_widths.get_mut(i) {
                Some(w) => *w = max(*w, width),
                None => self.column_widths.push(width),
            }
        }
        self.rows.push(row);
        self
    }

    pub fn with_alignment(mut self, column: usize, alignment: Alignment) -> Self {
        if let Some(a) = self.alignment.get_mut(column) {
            *a = alignment;
        }
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_border_style(mut self, style: BorderStyle) -> Self {
        self.border_style = style;
        self
    }

    pub fn build(&self) -> String {
        if self.headers.is_empty() && self.rows.is_empty() {
            return String::new();
        }

        let chars = BorderChars::for_style(self.border_style);
        let mut output = Vec::new();

        if let Some(chars) = &chars {
            output.push(self.horizontal_line(chars, chars.top));
        }
        if !self.headers.is_empty() {
            output.push(self.build_row(&self.headers, chars.as_ref(), true));
            if let Some(chars) = &chars {
                output.push(self.horizontal_line(chars, chars.middle));
            }
        }
        for row in &self.rows {
            output.push(self.build_row(row, chars.as_ref(), false));
        }
        if let Some(chars) = &chars {
            output.push(self.horizontal_line(chars, chars.bottom));
        }

        output.join("\n")
    }

    fn build_row(&self, cells: &[String], chars: Option<&BorderChars>, is_header: bool) -> String {
        let vertical = chars.map(|c| c.vertical.to_string()).unwrap_or_default();
        let mut line = vertical.clone();

        for (i, cell) in cells.iter().enumerate() {
            let width = self.column_widths.get(i).copied().unwrap_or(0);
            let aligned = match self.alignment.get(i).copied().unwrap_or(Alignment::Left) {
                Alignment::Left => format!("{:<width$}", cell, width = width),
                Alignment::Right => format!("{:>width$}", cell, width = width),
            };
            let formatted = if is_header && self.use_color {
                aligned.bold().to_string()
            } else {
                aligned
            };
            line.push_str(&format!(" {} ", formatted));
            line.push_str(&vertical);
        }

        line.trim_end().to_string()
    }

    fn horizontal_line(&self, chars: &BorderChars, (left, middle, right): (char, char, char)) -> String {
        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|&w| chars.horizontal.to_string().repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&middle.to_string()), right)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct BorderChars {
    horizontal: char,
    vertical: char,
    top: (char, char, char),
    middle: (char, char, char),
    bottom: (char, char, char),
}

impl BorderChars {
    fn for_style(style: BorderStyle) -> Option<Self> {
        match style {
            BorderStyle::None => None,
            BorderStyle::Ascii => Some(Self {
                horizontal: '-',
                vertical: '|',
                top: ('+', '+', '+'),
                middle: ('+', '+', '+'),
                bottom: ('+', '+', '+'),
            }),
            BorderStyle::Unicode => Some(Self {
                horizontal: '─',
                vertical: '│',
                top: ('┌', '┬', '┐'),
                middle: ('├', '┼', '┤'),
                bottom: ('└', '┴', '┘'),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_table() {
        let table = TableBuilder::new()
            .with_headers(&["Key", "Pid"])
            .with_rows(&[vec!["rmg", "42"], vec!["retroarch", "7"]])
            .with_alignment(1, Alignment::Right)
            .with_color(false)
            .with_border_style(BorderStyle::Ascii)
            .build();

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "+-----------+-----+");
        assert_eq!(lines[1], "| Key       | Pid |");
        assert_eq!(lines[3], "| rmg       |  42 |");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_borderless_and_empty() {
        assert!(TableBuilder::new().build().is_empty());
        let table = TableBuilder::new()
            .with_headers(&["A"])
            .add_row(&["xyz"])
            .with_color(false)
            .with_border_style(BorderStyle::None)
            .build();
        assert_eq!(table, " A\n xyz");
    }
}
