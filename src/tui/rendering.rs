use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, List,
    ListItem, Paragraph, Row, Table, Tabs, Wrap,
};

use super::app::{Alert, LoginField, LoginForm, MessageType, StatusMessage, Tab};
use super::layout::{AnalyticsLayout, AppLayout, centered_rect};
use super::timestamps::format_timestamp;
use crate::history::ActiveDataset;
use crate::models::{DatasetEntry, UserProfile};
use crate::presentation::{
    Rgb, SortField, TableSort, distribution_chart, format_value, metric_cards, normalize_series,
    trend_chart,
};
use crate::utils::sanitize_cell;
use crate::utils::terminal::truncate_display;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const SURFACE: Color = Color::Rgb(24, 24, 27);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const WARNING: Color = Color::Rgb(245, 158, 11);
const DANGER: Color = Color::Rgb(239, 68, 68);
const LABEL_WIDTH: usize = 14;

/// Everything the dashboard screen draws, borrowed from the app
pub struct DashboardView<'a> {
    pub user: &'a UserProfile,
    pub history: &'a [DatasetEntry],
    pub capacity: usize,
    pub selected_idx: usize,
    pub active: Option<&'a ActiveDataset>,
    pub tab: Tab,
    pub sort: TableSort,
    pub table_offset: usize,
    pub upload_prompt: Option<&'a str>,
    pub busy: Option<&'a str>,
}

pub struct LoginView<'a> {
    pub form: &'a LoginForm,
}

pub enum ScreenView<'a> {
    Login(LoginView<'a>),
    Dashboard(DashboardView<'a>),
}

pub struct RenderState<'a> {
    pub screen: ScreenView<'a>,
    pub alert: Option<&'a Alert>,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    match &state.screen {
        ScreenView::Login(view) => render_login(frame, view),
        ScreenView::Dashboard(view) => render_dashboard(frame, view, state.status_message),
    }

    if let Some(alert) = state.alert {
        render_alert(frame, alert);
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(title)
}

fn render_login(frame: &mut Frame, view: &LoginView) {
    let form = view.form;
    let area = centered_rect(66, 13, frame.area());

    let field_style = |field: LoginField| {
        if form.focus == field {
            Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        }
    };
    let cursor = |field: LoginField| if form.focus == field { "▏" } else { "" };
    let masked: String = "•".repeat(form.password.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            "Chemical Equipment Visualizer",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Username: ", field_style(LoginField::Username)),
            Span::raw(form.username.as_str()),
            Span::raw(cursor(LoginField::Username)),
        ]),
        Line::from(vec![
            Span::styled("Password: ", field_style(LoginField::Password)),
            Span::raw(masked),
            Span::raw(cursor(LoginField::Password)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("[{}] Remember me (Ctrl+R)", if form.remember { "x" } else { " " }),
            Style::default().fg(MUTED),
        )),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(DANGER))));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Enter: sign in | Tab: next field | Ctrl+G: guest | Esc: quit",
        Style::default().fg(MUTED),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(panel(" CHEM-VIS · Sign in "))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_dashboard(frame: &mut Frame, view: &DashboardView, status: Option<&StatusMessage>) {
    let layout = AppLayout::new(frame.area());

    render_history(frame, layout.sidebar_area, view);
    render_header(frame, layout.header_area, view);
    render_tabs(frame, layout.tabs_area, view.tab);

    match view.active {
        None => render_empty_state(frame, layout.main_area),
        Some(active) => match view.tab {
            Tab::Analytics => render_analytics(frame, layout.main_area, active),
            Tab::Table => {
                render_table(frame, layout.main_area, active, view.sort, view.table_offset)
            }
        },
    }

    render_status_bar(frame, layout.status_area, view, status);

    if let Some(input) = view.upload_prompt {
        render_prompt(frame, input);
    } else if let Some(busy) = view.busy {
        render_busy(frame, busy);
    }
}

fn render_history(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let active_id = view.active.map(|a| a.entry.id);
    let items: Vec<ListItem> = view
        .history
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let marker = if Some(entry.id) == active_id { "●" } else { " " };
            let name = sanitize_cell(&entry.filename);
            let name = truncate_display(&name, area.width.saturating_sub(5) as usize).into_owned();
            let detail = format!(
                "  {} · {} units",
                format_timestamp(&entry.timestamp),
                entry.summary.total_equipment_count
            );

            let style = if idx == view.selected_idx {
                Style::default()
                    .fg(BRIGHT) // Bright text
                    .bg(ACCENT) // Emerald background
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED)
            };

            ListItem::new(Text::from(vec![
                Line::from(format!("{} {}", marker, name)),
                Line::from(detail),
            ]))
            .style(style)
        })
        .collect();

    let title = format!(" CHEM-VIS · Upload Logs {}/{} ", view.history.len(), view.capacity);
    let list = if items.is_empty() {
        List::new(vec![ListItem::new("  No uploads yet")]).style(Style::default().fg(MUTED))
    } else {
        List::new(items)
    };

    frame.render_widget(list.block(panel(&title)), area);
}

fn render_header(frame: &mut Frame, area: Rect, view: &DashboardView) {
    let dataset = view
        .active
        .map(|a| sanitize_cell(&a.entry.filename).into_owned())
        .unwrap_or_else(|| "No dataset selected".to_string());
    let role = if view.user.is_guest { "Guest Operator" } else { "Authorized Operator" };

    let line = Line::from(vec![
        Span::styled(dataset, Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD)),
        Span::styled("  |  ", Style::default().fg(MUTED)),
        Span::styled(sanitize_cell(&view.user.username).into_owned(), Style::default().fg(ACCENT)),
        Span::styled(format!(" · {}", role), Style::default().fg(MUTED)),
    ]);

    frame.render_widget(Paragraph::new(line).block(panel(" Dashboard ")), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, tab: Tab) {
    let selected = match tab {
        Tab::Analytics => 0,
        Tab::Table => 1,
    };
    let tabs = Tabs::new(vec![" Analytics ", " Equipment Table "])
        .select(selected)
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD))
        .divider("|");

    frame.render_widget(tabs, area);
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No Active Session",
            Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press u to upload an equipment CSV, or pick a log from the sidebar.",
            Style::default().fg(MUTED),
        )),
    ]);

    let paragraph = Paragraph::new(text)
        .block(panel(""))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_analytics(frame: &mut Frame, area: Rect, active: &ActiveDataset) {
    let layout = AnalyticsLayout::new(area);

    for (card, rect) in metric_cards(&active.entry.summary).iter().zip(layout.cards) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            card.value.as_str(),
            Style::default().fg(color(card.accent)).add_modifier(Modifier::BOLD),
        )))
        .block(panel(card.title));
        frame.render_widget(paragraph, rect);
    }

    render_distribution(frame, layout.distribution_area, active);
    render_trends(frame, layout.trend_area, active);
}

fn render_distribution(frame: &mut Frame, area: Rect, active: &ActiveDataset) {
    let chart_data = distribution_chart(&active.entry.summary);
    let bars: Vec<Bar> = chart_data
        .datasets
        .first()
        .map(|dataset| {
            chart_data
                .labels
                .iter()
                .zip(&dataset.data)
                .enumerate()
                .map(|(i, (label, &count))| {
                    let accent = color(dataset.color_at(i));
                    let label = sanitize_cell(label);
                    Bar::default()
                        .label(Line::from(truncate_display(&label, LABEL_WIDTH).into_owned()))
                        .value(count as u64)
                        .text_value(format!("{}", count))
                        .style(Style::default().fg(accent))
                        .value_style(Style::default().fg(SURFACE).bg(accent))
                })
                .collect()
        })
        .unwrap_or_default();

    let chart = BarChart::default()
        .block(panel(" Equipment Type Distribution "))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn render_trends(frame: &mut Frame, area: Rect, active: &ActiveDataset) {
    let trend = trend_chart(&active.rows);
    let series: Vec<Vec<(f64, f64)>> = trend
        .datasets
        .iter()
        .map(|dataset| {
            normalize_series(&dataset.data)
                .into_iter()
                .enumerate()
                .map(|(i, y)| (i as f64, y.clamp(0.0, 1.0)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = trend
        .datasets
        .iter()
        .zip(&series)
        .map(|(dataset, points)| {
            Dataset::default()
                .name(dataset.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(dataset.color_at(0))))
                .data(points)
        })
        .collect();

    let last = trend.labels.len().saturating_sub(1);
    let x_labels: Vec<String> = match (trend.labels.first(), trend.labels.last()) {
        (Some(first), Some(end)) if last > 0 => vec![
            truncate_display(&sanitize_cell(first), LABEL_WIDTH).into_owned(),
            truncate_display(&sanitize_cell(end), LABEL_WIDTH).into_owned(),
        ],
        (Some(only), _) => vec![truncate_display(&sanitize_cell(only), LABEL_WIDTH).into_owned()],
        _ => Vec::new(),
    };

    let chart = Chart::new(datasets)
        .block(panel(" Operational Trends "))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, last.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, 1.0])
                .labels(["0", "max"]),
        );

    frame.render_widget(chart, area);
}

fn render_table(
    frame: &mut Frame,
    area: Rect,
    active: &ActiveDataset,
    sort: TableSort,
    offset: usize,
) {
    let header = Row::new(SortField::ALL.iter().enumerate().map(|(i, field)| {
        let arrow = sort.indicator(*field).unwrap_or("");
        Cell::from(format!("{} {}{}", i + 1, field.header(), arrow))
    }))
    .style(Style::default().fg(BRIGHT).bg(SURFACE).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = sort
        .apply(&active.rows)
        .into_iter()
        .skip(offset)
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 1 {
                Style::default().fg(BRIGHT).bg(SURFACE)
            } else {
                Style::default().fg(BRIGHT)
            };
            Row::new(vec![
                Cell::from(sanitize_cell(&record.equipment_name).into_owned()),
                Cell::from(sanitize_cell(&record.equipment_type).into_owned()),
                Cell::from(format_value(record.flowrate)),
                Cell::from(format_value(record.pressure)),
                Cell::from(format_value(record.temperature)),
            ])
            .style(style)
        })
        .collect();

    let title = format!(
        " Equipment Log · {} rows · sorted by {} {} ",
        active.rows.len(),
        sort.field,
        sort.order.arrow()
    );
    let widths = [
        Constraint::Percentage(26),
        Constraint::Percentage(20),
        Constraint::Percentage(18),
        Constraint::Percentage(18),
        Constraint::Percentage(18),
    ];

    let table = Table::new(rows, widths).header(header).block(panel(&title));
    frame.render_widget(table, area);
}

fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    view: &DashboardView,
    status: Option<&StatusMessage>,
) {
    let (status_text, style) = if let Some(message) = status {
        let fg = match message.message_type {
            MessageType::Success => ACCENT,
            MessageType::Warning => WARNING,
            MessageType::Error => DANGER,
        };
        (format!(" {} ", message.text), Style::default().fg(fg).bg(SURFACE))
    } else {
        let mut parts = vec![];

        if !view.history.is_empty() {
            parts.push(format!("log {}/{}", view.selected_idx + 1, view.history.len()));
        }
        parts.push("u: upload".to_string());
        parts.push("↑↓: logs | Enter: open".to_string());
        parts.push("Tab: view".to_string());
        if view.tab == Tab::Table {
            parts.push("1-5: sort | PgUp/PgDn: scroll".to_string());
        }
        parts.push("e: export".to_string());
        parts.push("o: logout | q: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(SURFACE))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

fn render_prompt(frame: &mut Frame, input: &str) {
    let area = centered_rect(64, 5, frame.area());
    let text = Text::from(vec![
        Line::from(vec![Span::raw(input), Span::styled("▏", Style::default().fg(ACCENT))]),
        Line::from(""),
        Line::from(Span::styled("Enter: upload | Esc: cancel", Style::default().fg(MUTED))),
    ]);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(panel(" Upload CSV · path ")), area);
}

fn render_busy(frame: &mut Frame, message: &str) {
    let area = centered_rect(32, 3, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(message).alignment(Alignment::Center).block(panel("")),
        area,
    );
}

fn render_alert(frame: &mut Frame, alert: &Alert) {
    let area = centered_rect(60, 8, frame.area());
    let text = Text::from(vec![
        Line::from(Span::styled(alert.message.as_str(), Style::default().fg(BRIGHT))),
        Line::from(""),
        Line::from(Span::styled("Enter/Esc: dismiss", Style::default().fg(MUTED))),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DANGER))
        .title(format!(" {} ", alert.title));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use chrono::{TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::analytics::summarize;
    use crate::models::{EquipmentRecord, UserId};

    fn record(id: u64, name: &str, kind: &str, flowrate: f64) -> EquipmentRecord {
        EquipmentRecord {
            id,
            equipment_name: name.to_string(),
            equipment_type: kind.to_string(),
            flowrate,
            pressure: 4.0,
            temperature: 70.0,
        }
    }

    fn dataset() -> ActiveDataset {
        let rows = vec![
            record(1, "P-101", "Pump", 10.0),
            record(2, "V-201", "Valve", 5.0),
            record(3, "P-102", "Pump", 12.5),
        ];
        ActiveDataset {
            entry: DatasetEntry {
                id: 1_700_000_000_000,
                filename: "plant.csv".to_string(),
                timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                summary: summarize(&rows),
            },
            rows,
        }
    }

    fn user() -> UserProfile {
        UserProfile {
            id: UserId::Number(1),
            username: "admin".to_string(),
            email: None,
            is_guest: false,
        }
    }

    fn view<'a>(
        user: &'a UserProfile,
        active: Option<&'a ActiveDataset>,
        history: &'a [DatasetEntry],
    ) -> DashboardView<'a> {
        DashboardView {
            user,
            history,
            capacity: 5,
            selected_idx: 0,
            active,
            tab: Tab::Analytics,
            sort: TableSort::default(),
            table_offset: 0,
            upload_prompt: None,
            busy: None,
        }
    }

    fn draw(state: &RenderState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render_ui(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn dashboard(view: DashboardView) -> RenderState {
        RenderState { screen: ScreenView::Dashboard(view), alert: None, status_message: None }
    }

    #[test]
    fn test_login_masks_password() {
        let form = LoginForm {
            username: "admin".to_string(),
            password: "secret".to_string(),
            ..LoginForm::default()
        };
        let state = RenderState {
            screen: ScreenView::Login(LoginView { form: &form }),
            alert: None,
            status_message: None,
        };

        let screen = draw(&state, 100, 30);
        assert!(screen.contains("admin"));
        assert!(screen.contains("••••••"));
        assert!(!screen.contains("secret"));
    }

    #[test]
    fn test_login_shows_error() {
        let form = LoginForm {
            error: Some("Username is required".to_string()),
            ..LoginForm::default()
        };
        let state = RenderState {
            screen: ScreenView::Login(LoginView { form: &form }),
            alert: None,
            status_message: None,
        };

        assert!(draw(&state, 100, 30).contains("Username is required"));
    }

    #[test]
    fn test_empty_dashboard_state() {
        let user = user();
        let screen = draw(&dashboard(view(&user, None, &[])), 120, 40);

        assert!(screen.contains("No Active Session"));
        assert!(screen.contains("Upload Logs 0/5"));
        assert!(screen.contains("No uploads yet"));
    }

    #[test]
    fn test_analytics_tab_shows_cards() {
        let user = user();
        let active = dataset();
        let history = vec![active.entry.clone()];
        let screen = draw(&dashboard(view(&user, Some(&active), &history)), 140, 40);

        assert!(screen.contains("Total Equipment"));
        assert!(screen.contains("Avg Flowrate"));
        assert!(screen.contains("9.2 m³/h"));
        assert!(screen.contains("Upload Logs 1/5"));
        assert!(screen.contains("Authorized Operator"));
        assert!(screen.contains("Equipment Type Distribution"));
    }

    #[test]
    fn test_table_tab_shows_sorted_rows() {
        let user = user();
        let active = dataset();
        let history = vec![active.entry.clone()];
        let mut v = view(&user, Some(&active), &history);
        v.tab = Tab::Table;
        v.sort = TableSort::new(SortField::Flowrate, crate::presentation::SortOrder::Desc);

        let screen = draw(&dashboard(v), 160, 40);
        let first = screen.find("P-102").unwrap();
        let second = screen.find("P-101").unwrap();
        let third = screen.find("V-201").unwrap();
        assert!(first < second && second < third);
        assert!(screen.contains("Flowrate (m³/h)▼"));
        assert!(screen.contains("12.5"));
    }

    #[test]
    fn test_control_sequences_are_not_rendered() {
        let user = user();
        let mut active = dataset();
        active.rows[0].equipment_name = "P\x1b[31m-1\x07".to_string();
        let history = vec![active.entry.clone()];
        let mut v = view(&user, Some(&active), &history);
        v.tab = Tab::Table;

        let screen = draw(&dashboard(v), 140, 40);
        assert!(screen.contains("P-1"));
        assert!(!screen.contains('\x1b'));
    }

    #[test]
    fn test_status_message_replaces_hints() {
        let user = user();
        let message = StatusMessage {
            text: "✓ Report saved".to_string(),
            message_type: MessageType::Success,
            expires_at: Instant::now() + Duration::from_secs(3),
        };
        let state = RenderState {
            screen: ScreenView::Dashboard(view(&user, None, &[])),
            alert: None,
            status_message: Some(&message),
        };

        let screen = draw(&state, 120, 40);
        assert!(screen.contains("Report saved"));
        assert!(!screen.contains("u: upload"));
    }

    #[test]
    fn test_alert_overlay() {
        let user = user();
        let alert = Alert { title: "Upload failed".to_string(), message: "Bad file".to_string() };
        let state = RenderState {
            screen: ScreenView::Dashboard(view(&user, None, &[])),
            alert: Some(&alert),
            status_message: None,
        };

        let screen = draw(&state, 120, 40);
        assert!(screen.contains("Upload failed"));
        assert!(screen.contains("Bad file"));
    }

    #[test]
    fn test_upload_prompt_overlay() {
        let user = user();
        let mut v = view(&user, None, &[]);
        v.upload_prompt = Some("/tmp/plant.csv");

        let screen = draw(&dashboard(v), 120, 40);
        assert!(screen.contains("Upload CSV"));
        assert!(screen.contains("/tmp/plant.csv"));
    }

    #[test]
    fn test_single_row_trend_renders() {
        let user = user();
        let mut active = dataset();
        active.rows.truncate(1);
        let history = vec![active.entry.clone()];

        draw(&dashboard(view(&user, Some(&active), &history)), 120, 40);
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let user = user();
        let active = dataset();
        let history = vec![active.entry.clone()];

        draw(&dashboard(view(&user, Some(&active), &history)), 20, 5);
    }
}
