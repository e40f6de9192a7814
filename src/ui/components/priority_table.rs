use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::scheduler::ItemState;
use crate::ui::theme::Theme;

const LABEL_WIDTH: usize = 9;
/// Left and right border columns.
const BORDER: u16 = 2;

type Row<'a> = (&'a str, ItemState);

/// Letters-mode view of every item seen so far, weakest first.
///
/// Items are packed into chunks that fit the width, and each chunk renders as a
/// streak line over a cooldown line, so the two values of an item always sit in
/// the same column.
pub struct PriorityTable<'a> {
    rows: &'a [Row<'a>],
    theme: &'a Theme,
}

impl<'a> PriorityTable<'a> {
    pub fn new(rows: &'a [Row<'a>], theme: &'a Theme) -> Self {
        Self { rows, theme }
    }

    /// Rows needed, border included, to show every item at `width` columns.
    /// Zero when there is nothing to show.
    pub fn height_for(rows: &[Row<'_>], width: u16) -> u16 {
        let chunks = chunk_rows(rows, width.saturating_sub(BORDER)).len();
        if chunks == 0 {
            return 0;
        }
        u16::try_from(chunks * 2)
            .unwrap_or(u16::MAX)
            .saturating_add(BORDER)
    }
}

fn cell_width(key: &str, state: &ItemState) -> usize {
    let digits = state
        .streak
        .to_string()
        .len()
        .max(state.cooldown.to_string().len());
    key.chars().count() + digits
}

/// Greedy split of `rows` into runs whose cells fit after the label column.
/// A cell wider than the whole budget still gets a chunk of its own.
pub fn chunk_rows<'r, 'a>(rows: &'r [Row<'a>], width: u16) -> Vec<&'r [Row<'a>]> {
    let budget = usize::from(width).saturating_sub(LABEL_WIDTH);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (i, (key, state)) in rows.iter().enumerate() {
        let needed = cell_width(key, state) + 1;
        if i > start && used + needed > budget {
            chunks.push(&rows[start..i]);
            start = i;
            used = 0;
        }
        used += needed;
    }
    if start < rows.len() {
        chunks.push(&rows[start..]);
    }
    chunks
}

pub fn format_row(label: &str, rows: &[Row<'_>], value: impl Fn(&ItemState) -> u64) -> String {
    let cells: Vec<String> = rows
        .iter()
        .map(|(key, state)| {
            let width = cell_width(key, state);
            format!("{:<width$}", format!("{key}{}", value(state)))
        })
        .collect();
    format!("{label:<LABEL_WIDTH$}{}", cells.join(" "))
}

impl Widget for PriorityTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Weakest first ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);

        let mut lines = Vec::new();
        for chunk in chunk_rows(self.rows, inner.width) {
            lines.push(Line::from(Span::styled(
                format_row("streak", chunk, |s| u64::from(s.streak)),
                Style::default().fg(colors.fg()),
            )));
            lines.push(Line::from(Span::styled(
                format_row("cooldown", chunk, |s| s.cooldown),
                Style::default().fg(colors.muted()),
            )));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters_at(streak: u32, cooldown: u64) -> Vec<Row<'static>> {
        ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
            "s", "t", "u", "v", "w", "x", "y", "z"]
            .into_iter()
            .map(|key| (key, ItemState { streak, cooldown }))
            .collect()
    }

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_rows_pair_key_with_value() {
        let rows = vec![
            ("q", ItemState { streak: 0, cooldown: 0 }),
            ("x", ItemState { streak: 2, cooldown: 1 }),
        ];
        assert_eq!(format_row("streak", &rows, |s| u64::from(s.streak)), "streak   q0 x2");
        assert_eq!(format_row("cooldown", &rows, |s| s.cooldown), "cooldown q0 x1");
    }

    #[test]
    fn test_cells_align_when_cooldown_is_wider() {
        let rows = vec![
            ("q", ItemState { streak: 3, cooldown: 7 }),
            ("x", ItemState { streak: 4, cooldown: 15 }),
            ("z", ItemState { streak: 0, cooldown: 0 }),
        ];
        let streaks = format_row("streak", &rows, |s| u64::from(s.streak));
        let cooldowns = format_row("cooldown", &rows, |s| s.cooldown);
        assert_eq!(streaks, "streak   q3 x4  z0");
        assert_eq!(cooldowns, "cooldown q7 x15 z0");
    }

    #[test]
    fn test_chunks_fit_width() {
        let rows = letters_at(1, 1);
        let chunks = chunk_rows(&rows, 78);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks.iter().map(|c| c.len()).sum::<usize>(), 26);
        for chunk in &chunks {
            assert!(format_row("cooldown", chunk, |s| s.cooldown).chars().count() <= 78);
        }
        assert!(chunk_rows(&[], 78).is_empty());
    }

    #[test]
    fn test_height_for_counts_both_lines_per_chunk() {
        let rows = letters_at(1, 1);
        assert_eq!(PriorityTable::height_for(&rows, 80), 6);
        assert_eq!(PriorityTable::height_for(&rows, 200), 4);
        assert_eq!(PriorityTable::height_for(&[], 80), 0);
    }

    #[test]
    fn test_full_alphabet_renders_both_rows_at_80_columns() {
        let rows = letters_at(1, 1);
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, PriorityTable::height_for(&rows, 80));
        let mut buf = Buffer::empty(area);
        PriorityTable::new(&rows, &theme).render(area, &mut buf);

        let lines = buffer_lines(&buf);
        let streak_lines = lines.iter().filter(|l| l.contains("streak")).count();
        let cooldown_lines = lines.iter().filter(|l| l.contains("cooldown")).count();
        assert_eq!(streak_lines, 2);
        assert_eq!(cooldown_lines, 2);

        let text = lines.concat();
        for (key, _) in &rows {
            assert_eq!(text.matches(&format!(" {key}1")).count(), 2, "{key}");
        }
    }
}
