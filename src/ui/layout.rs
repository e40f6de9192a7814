use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows kept for header, body and footer before a table is allowed.
const BASE_HEIGHT: u16 = 12;

/// Header, optional priority table, body, footer.
pub struct DrillLayout {
    pub header: Rect,
    pub table: Option<Rect>,
    pub body: Rect,
    pub footer: Rect,
}

impl DrillLayout {
    /// `table_height` is what the table asks for; it is dropped entirely when
    /// the terminal cannot fit it next to the body.
    pub fn new(area: Rect, table_height: u16) -> Self {
        let table_height = if area.height >= BASE_HEIGHT.saturating_add(table_height) {
            table_height
        } else {
            0
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(table_height),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            header: rows[0],
            table: (table_height > 0).then_some(rows[1]),
            body: centered_rect(60, 100, rows[2]),
            footer: rows[3],
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_WIDTH: u16 = 40;
    const MIN_HEIGHT: u16 = 6;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_HEIGHT).min(area.height);

    let left = area.x.saturating_add(area.width.saturating_sub(target_w) / 2);
    let top = area.y.saturating_add(area.height.saturating_sub(target_h) / 2);

    Rect::new(left, top, target_w, target_h)
}
