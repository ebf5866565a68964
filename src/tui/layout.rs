use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub email_area: Rect,
    pub banner_area: Rect,
    pub topics_area: Rect,
    pub findings_area: Rect,
    pub detail_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Top to bottom: email field, notification banner (only when shown),
    /// topic pills, findings list beside the detail pane, status bar.
    pub fn new(area: Rect, show_banner: bool) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                              // Email field
                Constraint::Length(if show_banner { 3 } else { 0 }), // Banner
                Constraint::Length(3),                              // Topic pills
                Constraint::Min(3),                                 // Findings + detail
                Constraint::Length(1),                              // Status bar
            ])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(vertical_chunks[3]);

        Self {
            email_area: vertical_chunks[0],
            banner_area: vertical_chunks[1],
            topics_area: vertical_chunks[2],
            findings_area: horizontal_chunks[0],
            detail_area: horizontal_chunks[1],
            status_area: vertical_chunks[4],
        }
    }
}
