use unicode_width::UnicodeWidthStr;

use crate::layout::{Bounds, Point};

#[derive(Debug, Clone)]
pub struct TextMetrics {
    pub char_width: f64,
    pub label_height: f64,
    pub label_padding_x: f64,
    pub max_label_lines: usize,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            label_height: 24.0,
            label_padding_x: 8.0,
            max_label_lines: 4,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Box reserved for an edge label, centred on its anchor.
    pub fn label_bounds(&self, anchor: Point, label: &str) -> Bounds {
        let width = self.text_width(label) + self.label_padding_x * 2.0;
        Bounds::centered(anchor, width, self.label_height)
    }

    /// Greedy word wrap by display width. Words longer than a line are kept
    /// whole; at most `max_label_lines` rows are returned.
    pub fn wrap_label(&self, text: &str, max_columns: usize) -> Vec<String> {
        let mut rows: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate_width = current.width() + 1 + word.width();
            if candidate_width <= max_columns {
                current.push(' ');
                current.push_str(word);
            } else {
                rows.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            rows.push(current);
        }

        rows.truncate(self.max_label_lines);
        rows
    }
}
