use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SIDEBAR_WIDTH: u16 = 32;

/// Dashboard screen layout:
/// - History sidebar: fixed width (left)
/// - Header, tab bar and main view (right)
/// - Status bar: bottom row
pub struct AppLayout {
    pub sidebar_area: Rect,
    pub header_area: Rect,
    pub tabs_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(vertical_chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
            .split(horizontal_chunks[1]);

        Self {
            sidebar_area: horizontal_chunks[0],
            header_area: content_chunks[0],
            tabs_area: content_chunks[1],
            main_area: content_chunks[2],
            status_area: vertical_chunks[1],
        }
    }
}

/// Analytics tab: a row of four metric cards above the two charts
pub struct AnalyticsLayout {
    pub cards: [Rect; 4],
    pub distribution_area: Rect,
    pub trend_area: Rect,
}

impl AnalyticsLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        Self {
            cards: [cards[0], cards[1], cards[2], cards[3]],
            distribution_area: charts[0],
            trend_area: charts[1],
        }
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_correctly() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = AppLayout::new(area);

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 39);

        assert_eq!(layout.sidebar_area.width, SIDEBAR_WIDTH);
        assert_eq!(layout.sidebar_area.height, 39);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.tabs_area.height, 1);
        assert_eq!(layout.main_area.height, 35);
        assert_eq!(layout.main_area.width, 120 - SIDEBAR_WIDTH);
    }

    #[test]
    fn test_layout_minimum_height() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 4));
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.sidebar_area.height, 3);
    }

    #[test]
    fn test_analytics_layout_cards() {
        let layout = AnalyticsLayout::new(Rect::new(0, 0, 80, 30));
        assert!(layout.cards.iter().all(|c| c.height == 4 && c.width == 20));
        assert_eq!(layout.distribution_area.height, 26);
        assert_eq!(layout.trend_area.width, 48);
    }

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(40, 10, Rect::new(0, 0, 100, 30));
        assert_eq!(rect, Rect::new(30, 10, 40, 10));
    }

    #[test]
    fn test_centered_rect_clipped() {
        let rect = centered_rect(200, 50, Rect::new(5, 5, 100, 30));
        assert_eq!(rect, Rect::new(5, 5, 100, 30));
    }
}
