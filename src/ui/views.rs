//! View rendering.
//!
//! Pure builders from data snapshots to ratatui text, plus the per-page
//! frame composition. Keeping the builders free of terminal state lets the
//! threshold and empty-state rules be tested headlessly.

use crate::activity::ActivityLog;
use crate::api::{ClusterInfo, Collection, Customer, CustomerStats};
use crate::app::{App, ConnectionState, Page};
use crate::ui::format::{format_bytes, format_count, format_mb};
use crate::ui::login::LoginForm;
use crate::ui::themes::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Fixed empty-state placeholders
pub const NO_CUSTOMERS: &str = "No customers yet. Create one to get started.";
pub const NO_COLLECTIONS: &str = "No collections found";
pub const NO_CLUSTER: &str = "Cluster information unavailable";
pub const NO_ACTIVITY: &str = "No activity recorded yet";

/// Quota-usage severity buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageSeverity {
    Danger,
    Warning,
    Normal,
}

/// Severity escalates at fixed thresholds: above 90 percent is danger,
/// above 70 is warning, anything else is neutral.
pub fn usage_severity(percent: f64) -> UsageSeverity {
    if percent > 90.0 {
        UsageSeverity::Danger
    } else if percent > 70.0 {
        UsageSeverity::Warning
    } else {
        UsageSeverity::Normal
    }
}

/// Fixed-width text gauge, e.g. `████░░░░░░` for 40 percent
pub fn usage_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..width {
        bar.push('░');
    }
    bar
}

/// Transient per-page view state owned by the event loop
#[derive(Debug, Default)]
pub struct ViewState {
    pub selected: usize,
    /// Armed delete target awaiting confirmation
    pub pending_delete: Option<String>,
}

// ---------------------------------------------------------------------------
// Card builders
// ---------------------------------------------------------------------------

pub fn customer_card_lines(customer: &Customer, theme: &Theme) -> Vec<Line<'static>> {
    let severity_style = theme.severity_style(usage_severity(customer.usage_percent));
    let (badge, badge_style) = if customer.active {
        ("active", theme.styles.success)
    } else {
        ("inactive", theme.styles.muted)
    };

    vec![
        Line::from(vec![
            Span::styled(customer.name.clone(), theme.styles.title),
            Span::raw("  "),
            Span::styled(customer.email.clone(), theme.styles.muted),
            Span::raw("  "),
            Span::styled(format!("[{}]", badge), badge_style),
        ]),
        Line::from(Span::styled(
            format!(
                "ID: {} | Collection: {}",
                customer.customer_id, customer.collection_name
            ),
            theme.styles.label,
        )),
        Line::from(vec![
            Span::styled(
                format!("{} docs", customer.document_count),
                theme.styles.value,
            ),
            Span::raw(format!(
                "  {} used  {} free  {} MB quota",
                format_mb(customer.used_mb),
                format_mb(customer.remaining_mb),
                customer.quota_mb
            )),
        ]),
        Line::from(vec![
            Span::raw("Quota "),
            Span::styled(usage_bar(customer.usage_percent, 20), severity_style),
            Span::styled(format!(" {:.1}%", customer.usage_percent), severity_style),
        ]),
    ]
}

pub fn collection_card_lines(collection: &Collection, theme: &Theme) -> Vec<Line<'static>> {
    let size = collection
        .vector_size()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let distance = collection.distance().unwrap_or("N/A").to_string();

    vec![
        Line::from(Span::styled(collection.name.clone(), theme.styles.title)),
        Line::from(vec![
            Span::styled(
                format_count(collection.vectors_count),
                theme.styles.value,
            ),
            Span::raw(" vectors"),
        ]),
        Line::from(Span::styled(
            format!("Dimension: {}  Distance: {}", size, distance),
            theme.styles.label,
        )),
    ]
}

pub fn cluster_lines(cluster: Option<&ClusterInfo>, theme: &Theme) -> Vec<Line<'static>> {
    let Some(cluster) = cluster else {
        return vec![Line::from(Span::styled(
            NO_CLUSTER.to_string(),
            theme.styles.muted,
        ))];
    };

    let peer = cluster
        .peer_id
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    vec![
        Line::from(vec![
            Span::styled("Peer ID: ".to_string(), theme.styles.label),
            Span::raw(peer),
        ]),
        Line::from(vec![
            Span::styled("Raft role: ".to_string(), theme.styles.label),
            Span::raw(cluster.raft_role().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Status: ".to_string(), theme.styles.label),
            Span::styled("Healthy".to_string(), theme.styles.success),
        ]),
    ]
}

fn stats_strip_line(stats: Option<&CustomerStats>, theme: &Theme) -> Line<'static> {
    let Some(stats) = stats else {
        return Line::from(Span::styled("Stats unavailable".to_string(), theme.styles.muted));
    };
    Line::from(vec![
        Span::styled(stats.total_customers.to_string(), theme.styles.value),
        Span::raw(" customers  "),
        Span::styled(stats.active_customers.to_string(), theme.styles.value),
        Span::raw(" active  "),
        Span::styled(format_count(stats.total_documents), theme.styles.value),
        Span::raw(" documents  "),
        Span::styled(format!("{:.2} MB", stats.total_used_mb), theme.styles.value),
        Span::raw(" in use"),
    ])
}

pub fn activity_lines(activity: &ActivityLog, theme: &Theme) -> Vec<Line<'static>> {
    if activity.is_empty() {
        return vec![Line::from(Span::styled(
            NO_ACTIVITY.to_string(),
            theme.styles.muted,
        ))];
    }
    activity
        .entries()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.timestamp.format("%H:%M:%S")),
                    theme.styles.timestamp,
                ),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Frame composition
// ---------------------------------------------------------------------------

pub fn render(f: &mut Frame, app: &App, view: &ViewState, login: &LoginForm, theme: &Theme) {
    let area = f.area();
    f.render_widget(Block::default().style(theme.styles.base), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, app, theme, chunks[0]);
    match app.page {
        Page::Dashboard => render_dashboard(f, app, theme, chunks[1]),
        Page::Customers => render_customers(f, app, view, theme, chunks[1]),
        Page::Collections => render_collections(f, app, view, theme, chunks[1]),
        Page::Status => render_status(f, app, theme, chunks[1]),
        Page::Logs => render_logs(f, app, theme, chunks[1]),
        Page::Settings => render_settings(f, app, theme, chunks[1]),
    }
    render_footer(f, app, view, theme, chunks[2]);

    if !app.session.is_authenticated() {
        render_login_overlay(f, app, login, theme, area);
    }
}

fn connection_badge(state: ConnectionState, theme: &Theme) -> Span<'static> {
    match state {
        ConnectionState::Online => Span::styled("● online".to_string(), theme.styles.success),
        ConnectionState::Offline => Span::styled("● offline".to_string(), theme.styles.error),
        ConnectionState::Connecting => {
            Span::styled("● connecting".to_string(), theme.styles.warning)
        }
    }
}

fn render_header(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let version = app
        .data
        .service
        .as_ref()
        .map(|s| s.version().to_string())
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(format!("vecops / {}", app.page.title()), theme.styles.header),
        Span::raw("   "),
        connection_badge(app.data.connection, theme),
        Span::raw("  "),
        Span::styled(version, theme.styles.muted),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.styles.border),
    );
    f.render_widget(paragraph, area);
}

fn render_dashboard(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let telemetry = app.data.telemetry.as_ref();
    let tiles: [(&str, String); 4] = [
        ("Collections", app.data.collections.len().to_string()),
        (
            "Vectors",
            format_count(telemetry.map(|t| t.total_vectors()).unwrap_or(0)),
        ),
        (
            "Memory",
            format_bytes(telemetry.map(|t| t.memory_usage()).unwrap_or(0)),
        ),
        (
            "Engine",
            telemetry
                .map(|t| t.app_status().to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    for (i, (label, value)) in tiles.iter().enumerate() {
        let line = Line::from(vec![
            Span::styled(value.clone(), theme.styles.value),
            Span::raw(" "),
            Span::styled((*label).to_string(), theme.styles.label),
        ]);
        let tile = Paragraph::new(line).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.styles.border),
        );
        f.render_widget(tile, columns[i]);
    }

    let recent = Paragraph::new(Text::from(activity_lines(&app.activity, theme)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Recent activity")
                .border_style(theme.styles.border),
        );
    f.render_widget(recent, rows[1]);
}

fn render_customers(f: &mut Frame, app: &App, view: &ViewState, theme: &Theme, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let strip = Paragraph::new(stats_strip_line(app.data.customer_stats.as_ref(), theme)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.styles.border),
    );
    f.render_widget(strip, rows[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Customers")
        .border_style(theme.styles.border);

    if app.data.customers.is_empty() {
        let placeholder = Paragraph::new(Span::styled(NO_CUSTOMERS, theme.styles.muted))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(placeholder, rows[1]);
        return;
    }

    let items: Vec<ListItem> = app
        .data
        .customers
        .iter()
        .map(|c| {
            let mut lines = customer_card_lines(c, theme);
            lines.push(Line::raw(""));
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.styles.value);
    let mut state = ListState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(list, rows[1], &mut state);
}

fn render_collections(f: &mut Frame, app: &App, view: &ViewState, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Collections")
        .border_style(theme.styles.border);

    if app.data.collections.is_empty() {
        let placeholder = Paragraph::new(Span::styled(NO_COLLECTIONS, theme.styles.muted))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = app
        .data
        .collections
        .iter()
        .map(|c| {
            let mut lines = collection_card_lines(c, theme);
            lines.push(Line::raw(""));
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.styles.value);
    let mut state = ListState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(Text::from(cluster_lines(app.data.cluster.as_ref(), theme)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Cluster")
                .border_style(theme.styles.border),
        );
    f.render_widget(paragraph, area);
}

fn render_logs(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(Text::from(activity_lines(&app.activity, theme)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Activity log")
                .border_style(theme.styles.border),
        );
    f.render_widget(paragraph, area);
}

fn render_settings(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let config = app.config.config();
    let lines = vec![
        Line::from(vec![
            Span::styled("Server: ".to_string(), theme.styles.label),
            Span::raw(config.server.base_url.clone()),
        ]),
        Line::from(vec![
            Span::styled("Auto-refresh: ".to_string(), theme.styles.label),
            Span::raw(format!("{}s", config.refresh.interval_seconds)),
            Span::styled("  (+/- to adjust)".to_string(), theme.styles.muted),
        ]),
        Line::from(vec![
            Span::styled("Theme: ".to_string(), theme.styles.label),
            Span::raw(app.session.theme().label().to_string()),
            Span::styled("  (t to toggle)".to_string(), theme.styles.muted),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            "Use the CLI for writes: vecops customers create, vecops upload, ...".to_string(),
            theme.styles.muted,
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Settings")
            .border_style(theme.styles.border),
    );
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, view: &ViewState, theme: &Theme, area: Rect) {
    let line = if let Some(target) = &view.pending_delete {
        Line::from(Span::styled(
            format!("Delete {}? Press y to confirm, any other key to cancel", target),
            theme.styles.warning,
        ))
    } else if let Some(status) = &app.status_line {
        Line::from(Span::styled(status.clone(), theme.styles.value))
    } else {
        Line::from(Span::styled(
            "1-6 pages  ←/→ switch  r refresh  t theme  d delete  o logout  q quit".to_string(),
            theme.styles.muted,
        ))
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.styles.border),
    );
    f.render_widget(paragraph, area);
}

fn render_login_overlay(f: &mut Frame, app: &App, login: &LoginForm, theme: &Theme, area: Rect) {
    let popup = centered_rect(50, 40, area);
    f.render_widget(Clear, popup);

    let mut lines = login.lines(theme);
    if let Some(status) = &app.status_line {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            theme.styles.error,
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Sign in")
            .border_style(theme.styles.border),
    );
    f.render_widget(paragraph, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{CollectionConfig, CollectionParams, VectorParams};
    use crate::api::ApiClient;
    use crate::config::ConfigManager;
    use crate::session::SessionStore;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn buffer_text(buffer: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    async fn blank_app(dir: &tempfile::TempDir) -> App {
        let api = Arc::new(ApiClient::new("http://127.0.0.1:1").unwrap());
        let session = SessionStore::load(dir.path().join("session.json"))
            .await
            .unwrap();
        let config = ConfigManager::new(Some(dir.path().join("config.toml"))).unwrap();
        App::new(api, session, config)
    }

    fn sample_customer(usage_percent: f64) -> Customer {
        Customer {
            customer_id: "c1".to_string(),
            name: "Acme".to_string(),
            email: "a@x.com".to_string(),
            collection_name: "acme_document".to_string(),
            quota_mb: 500,
            used_mb: usage_percent * 5.0,
            remaining_mb: 500.0 - usage_percent * 5.0,
            usage_percent,
            document_count: 3,
            active: true,
            created_at: None,
            last_upload: None,
        }
    }

    #[test]
    fn severity_thresholds_are_exact() {
        assert_eq!(usage_severity(95.0), UsageSeverity::Danger);
        assert_eq!(usage_severity(90.1), UsageSeverity::Danger);
        assert_eq!(usage_severity(90.0), UsageSeverity::Warning);
        assert_eq!(usage_severity(70.1), UsageSeverity::Warning);
        assert_eq!(usage_severity(70.0), UsageSeverity::Normal);
        assert_eq!(usage_severity(0.0), UsageSeverity::Normal);
    }

    #[test]
    fn usage_bar_fills_proportionally() {
        assert_eq!(usage_bar(0.0, 10), "░░░░░░░░░░");
        assert_eq!(usage_bar(50.0, 10), "█████░░░░░");
        assert_eq!(usage_bar(100.0, 10), "██████████");
        assert_eq!(usage_bar(250.0, 10), "██████████");
    }

    #[test]
    fn customer_card_contains_identity_and_quota() {
        let theme = Theme::dark();
        let lines = customer_card_lines(&sample_customer(45.0), &theme);
        let text: String = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.clone().into_owned())
            .collect();

        assert!(text.contains("Acme"));
        assert!(text.contains("a@x.com"));
        assert!(text.contains("ID: c1"));
        assert!(text.contains("acme_document"));
        assert!(text.contains("45.0%"));
        assert!(text.contains("500 MB quota"));
    }

    #[test]
    fn collection_card_defaults_to_na_sentinels() {
        let theme = Theme::dark();
        let bare = Collection::unresolved("docs".to_string());
        let text: String = collection_card_lines(&bare, &theme)
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains("Dimension: N/A"));
        assert!(text.contains("Distance: N/A"));

        let full = Collection {
            name: "docs".to_string(),
            points_count: 12,
            vectors_count: 12,
            config: CollectionConfig {
                params: Some(CollectionParams {
                    vectors: Some(VectorParams {
                        size: Some(384),
                        distance: Some("Cosine".to_string()),
                    }),
                }),
            },
        };
        let text: String = collection_card_lines(&full, &theme)
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.content.clone().into_owned())
            .collect();
        assert!(text.contains("Dimension: 384"));
        assert!(text.contains("Distance: Cosine"));
    }

    #[tokio::test]
    async fn customer_page_renders_placeholder_then_cards() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut app = blank_app(&dir).await;
        let theme = Theme::dark();
        let view = ViewState::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal
            .draw(|f| {
                let area = f.area();
                render_customers(f, &app, &view, &theme, area);
            })
            .unwrap();
        let content = buffer_text(terminal.backend().buffer());
        assert!(content.contains(NO_CUSTOMERS));

        app.data.customers.push(sample_customer(45.0));
        terminal
            .draw(|f| {
                let area = f.area();
                render_customers(f, &app, &view, &theme, area);
            })
            .unwrap();
        let content = buffer_text(terminal.backend().buffer());
        assert!(content.contains("Acme"));
        assert!(content.contains("a@x.com"));
        assert!(!content.contains(NO_CUSTOMERS));
    }

    #[test]
    fn missing_cluster_renders_placeholder() {
        let theme = Theme::dark();
        let lines = cluster_lines(None, &theme);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, NO_CLUSTER);
    }

    #[test]
    fn empty_activity_renders_placeholder() {
        let theme = Theme::dark();
        let log = ActivityLog::new();
        let lines = activity_lines(&log, &theme);
        assert_eq!(lines[0].spans[0].content, NO_ACTIVITY);
    }
}
