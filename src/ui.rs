use std::path::PathBuf;

use crossterm::event::KeyCode;
use tracing::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{
    BarChart, Block, BorderType, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table,
    Tabs, Wrap,
};
use tui::Frame;

use crate::export::Snapshot;
use crate::filter::Dimension;
use crate::pipeline::{CountryMean, DerivedArtifacts, HistogramBin, Kpis, RoleMean, WorkModeCount};
use crate::session::{SelectionControl, Session};

const MENU_TITLES: [&'static str; 4] = ["Dashboard", "Table", "Export", "Quit"];
const BAR_CELLS: usize = 24;

const ROLE_WIDTHS: [Constraint; 3] = [
    Constraint::Percentage(40),
    Constraint::Length(12),
    Constraint::Min(BAR_CELLS as u16),
];
const COUNTRY_WIDTHS: [Constraint; 3] = [
    Constraint::Length(8),
    Constraint::Length(12),
    Constraint::Min(BAR_CELLS as u16),
];
const RECORD_WIDTHS: [Constraint; 8] = [
    Constraint::Length(6),
    Constraint::Length(12),
    Constraint::Length(12),
    Constraint::Length(8),
    Constraint::Min(20),
    Constraint::Length(12),
    Constraint::Length(8),
    Constraint::Length(12),
];

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MenuItem {
    Dashboard,
    Table,
}

impl From<MenuItem> for usize {
    fn from(input: MenuItem) -> usize {
        match input {
            MenuItem::Dashboard => 0,
            MenuItem::Table => 1,
        }
    }
}

/// Terminal-side state around a [`Session`]: which tab is open, which filter
/// list has focus and where each list's cursor sits.
pub struct App {
    pub session: Session,
    pub active_menu_item: MenuItem,
    pub focus: Dimension,
    cursors: [usize; 4],
    pub table_offset: usize,
    pub status: Option<String>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(session: Session, export_dir: PathBuf) -> Self {
        App {
            session,
            active_menu_item: MenuItem::Dashboard,
            focus: Dimension::Year,
            cursors: [0; 4],
            table_offset: 0,
            status: None,
            export_dir,
        }
    }

    pub fn cursor(&self, dimension: Dimension) -> usize {
        self.cursors[usize::from(dimension)]
    }

    /// Applies one key press. Returns `false` when the user asked to quit.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        let options = self.session.catalog().count(self.focus);
        let cursor = &mut self.cursors[usize::from(self.focus)];
        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('d') => self.active_menu_item = MenuItem::Dashboard,
            KeyCode::Char('t') => self.active_menu_item = MenuItem::Table,
            KeyCode::Char('e') => self.export(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Down if options > 0 => *cursor = (*cursor + 1) % options,
            KeyCode::Up if options > 0 => *cursor = (*cursor + options - 1) % options,
            KeyCode::Char(' ') | KeyCode::Enter => {
                let index = *cursor;
                self.session.toggle(self.focus, index);
                self.table_offset = 0;
            }
            KeyCode::Char('a') => {
                self.session.select_all(self.focus);
                self.table_offset = 0;
            }
            KeyCode::Char('n') => {
                self.session.clear(self.focus);
                self.table_offset = 0;
            }
            KeyCode::Char('r') => {
                self.session.reset();
                self.table_offset = 0;
            }
            KeyCode::PageDown => {
                let last = self.session.artifacts().view.len().saturating_sub(1);
                self.table_offset = (self.table_offset + 10).min(last);
            }
            KeyCode::PageUp => self.table_offset = self.table_offset.saturating_sub(10),
            _ => {}
        }
        true
    }

    fn export(&mut self) {
        let artifacts = self.session.artifacts();
        let snapshot = Snapshot::new(self.session.selection(), &artifacts);
        self.status = Some(match snapshot.write_to(&self.export_dir) {
            Ok(path) => format!("Exported {}", path.display()),
            Err(err) => {
                error!(error = %err, "snapshot export failed");
                format!("Export failed: {}", err)
            }
        });
    }
}

/// `$95,000` style whole-dollar formatting.
pub fn format_usd(value: f64) -> String {
    format!("${}", group_thousands(value.round() as u64))
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (pos, ch) in digits.chars().enumerate() {
        if pos > 0 && (digits.len() - pos) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Short axis label: `950`, `15k`, `1.2M`.
pub fn compact_usd(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

pub fn draw<B: Backend>(rect: &mut Frame<B>, app: &App) {
    let artifacts = app.session.artifacts();
    let size = rect.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(10)].as_ref())
        .split(size);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);

    let menu = MENU_TITLES
        .iter()
        .map(|t| {
            let (first, rest) = t.split_at(1);
            Spans::from(vec![
                Span::styled(
                    first,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(rest, Style::default().fg(Color::White)),
            ])
        })
        .collect();

    let tabs = Tabs::new(menu)
        .select(app.active_menu_item.into())
        .block(Block::default().title("Salaries in Data").borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw("|"));
    rect.render_widget(tabs, header_chunks[0]);
    rect.render_widget(status_block(app, &artifacts), header_chunks[1]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)].as_ref())
        .split(chunks[1]);

    draw_filters(rect, app, body_chunks[0]);
    match app.active_menu_item {
        MenuItem::Dashboard => draw_dashboard(rect, &artifacts, body_chunks[1]),
        MenuItem::Table => draw_table(rect, app, &artifacts, body_chunks[1]),
    }
}

fn status_block<'a>(app: &'a App, artifacts: &DerivedArtifacts) -> Paragraph<'a> {
    let mut lines = vec![Spans::from(vec![Span::styled(
        format!(
            "Rows: {} of {}",
            group_thousands(artifacts.view.len() as u64),
            group_thousands(app.session.dataset().len() as u64)
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )])];
    if let Some(status) = &app.status {
        lines.push(Spans::from(Span::raw(status.as_str())));
    }
    Paragraph::new(lines)
        .block(Block::default().title("Status").borders(Borders::ALL))
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn draw_filters<B: Backend>(rect: &mut Frame<B>, app: &App, area: Rect) {
    let areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ]
            .as_ref(),
        )
        .split(area);

    for (dimension, area) in Dimension::ALL.into_iter().zip(areas) {
        let focused = dimension == app.focus;
        let items: Vec<ListItem> = app
            .session
            .catalog()
            .labels(dimension)
            .into_iter()
            .enumerate()
            .map(|(index, label)| {
                let marker = if app.session.is_selected(dimension, index) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", marker, label))
            })
            .collect();

        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(dimension.to_string())
                    .borders(Borders::ALL)
                    .border_type(if focused { BorderType::Thick } else { BorderType::Plain })
                    .border_style(border_style),
            )
            .highlight_style(if focused {
                Style::default().bg(Color::Yellow).fg(Color::Black)
            } else {
                Style::default()
            });

        let mut state = ListState::default();
        state.select(Some(app.cursor(dimension)));
        rect.render_stateful_widget(list, area, &mut state);
    }
}

fn draw_dashboard<B: Backend>(rect: &mut Frame<B>, artifacts: &DerivedArtifacts, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Percentage(50),
                Constraint::Min(6),
            ]
            .as_ref(),
        )
        .split(area);

    draw_kpis(rect, &artifacts.kpis, rows[0]);

    let upper = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[1]);
    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[2]);

    let title = "Top 10 roles by mean salary";
    match &artifacts.top_roles {
        Some(top) => rect.render_widget(top_roles_table(title, top), upper[0]),
        None => rect.render_widget(no_data(title), upper[0]),
    }

    let title = "Annual salary distribution";
    match &artifacts.histogram {
        Some(bins) => draw_histogram(rect, title, bins, upper[1]),
        None => rect.render_widget(no_data(title), upper[1]),
    }

    let title = "Work mode share";
    match &artifacts.work_modes {
        Some(modes) => draw_work_modes(rect, title, modes, lower[0]),
        None => rect.render_widget(no_data(title), lower[0]),
    }

    let title = "Data Scientist mean salary by country";
    match &artifacts.spotlight_by_country {
        Some(countries) => rect.render_widget(country_table(title, countries), lower[1]),
        None => rect.render_widget(no_data(title), lower[1]),
    }
}

fn draw_kpis<B: Backend>(rect: &mut Frame<B>, kpis: &Kpis, area: Rect) {
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
                Constraint::Ratio(1, 4),
            ]
            .as_ref(),
        )
        .split(area);

    let values = [
        ("Mean salary", format_usd(kpis.mean_salary)),
        ("Max salary", format_usd(kpis.max_salary)),
        ("Records", group_thousands(kpis.count as u64)),
        ("Most frequent role", kpis.top_role.clone()),
    ];
    for ((title, value), slot) in values.into_iter().zip(slots) {
        let kpi = Paragraph::new(Span::styled(
            value,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().title(title).borders(Borders::ALL))
        .alignment(Alignment::Center);
        rect.render_widget(kpi, slot);
    }
}

fn no_data(title: &str) -> Paragraph<'_> {
    Paragraph::new("No data for the current filters")
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn bar(value: f64, max: f64) -> String {
    let cells = if max > 0.0 {
        ((value / max) * BAR_CELLS as f64).round() as usize
    } else {
        0
    };
    "█".repeat(cells.max(1))
}

fn top_roles_table<'a>(title: &'a str, top: &'a [RoleMean]) -> Table<'a> {
    let max = top.last().map_or(0.0, |r| r.mean_salary);
    // ascending in the artifact; best paid on the first line here
    let rows = top.iter().rev().map(|r| {
        Row::new(vec![
            Cell::from(r.role.as_str()),
            Cell::from(format_usd(r.mean_salary)),
            Cell::from(Span::styled(bar(r.mean_salary, max), Style::default().fg(Color::Yellow))),
        ])
    });
    Table::new(rows)
        .header(
            Row::new(vec!["Role", "Mean (USD)", ""])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title(title).borders(Borders::ALL))
        .widths(&ROLE_WIDTHS)
}

fn draw_histogram<B: Backend>(rect: &mut Frame<B>, title: &str, bins: &[HistogramBin], area: Rect) {
    let labels: Vec<String> = bins.iter().map(|b| compact_usd(b.lower)).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(bins)
        .map(|(label, b)| (label.as_str(), b.count as u64))
        .collect();
    let inner = area.width.saturating_sub(2);
    let bar_width = (inner / bins.len().max(1) as u16).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .data(&data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    rect.render_widget(chart, area);
}

fn draw_work_modes<B: Backend>(rect: &mut Frame<B>, title: &str, modes: &[WorkModeCount], area: Rect) {
    let total: usize = modes.iter().map(|m| m.count).sum();
    let labels: Vec<String> = modes
        .iter()
        .map(|m| format!("{} {:.0}%", m.mode, m.count as f64 * 100.0 / total.max(1) as f64))
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(modes)
        .map(|(label, m)| (label.as_str(), m.count as u64))
        .collect();
    let inner = area.width.saturating_sub(2);
    let bar_width = (inner / modes.len().max(1) as u16).saturating_sub(2).clamp(1, 20);

    let chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .data(&data)
        .bar_width(bar_width)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    rect.render_widget(chart, area);
}

fn country_table<'a>(title: &'a str, countries: &'a [CountryMean]) -> Table<'a> {
    let max = countries.iter().map(|c| c.mean_salary).fold(0.0, f64::max);
    let rows = countries.iter().map(|c| {
        Row::new(vec![
            Cell::from(c.country_code.as_str()),
            Cell::from(format_usd(c.mean_salary)),
            Cell::from(Span::styled(bar(c.mean_salary, max), Style::default().fg(Color::Red))),
        ])
    });
    Table::new(rows)
        .header(
            Row::new(vec!["Country", "Mean (USD)", ""])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title(title).borders(Borders::ALL))
        .widths(&COUNTRY_WIDTHS)
}

fn draw_table<B: Backend>(rect: &mut Frame<B>, app: &App, artifacts: &DerivedArtifacts, area: Rect) {
    let visible = area.height.saturating_sub(3) as usize;
    let offset = app.table_offset.min(artifacts.view.len().saturating_sub(1));
    let rows = artifacts.view.rows().iter().skip(offset).take(visible).map(|r| {
        Row::new(vec![
            Cell::from(r.year.to_string()),
            Cell::from(r.seniority.as_str()),
            Cell::from(r.contract_type.as_str()),
            Cell::from(r.company_size.as_str()),
            Cell::from(r.role.as_str()),
            Cell::from(r.remote_mode.as_str()),
            Cell::from(r.country_code.as_str()),
            Cell::from(format_usd(r.salary_usd)),
        ])
    });

    let title = format!(
        "Filtered rows {}-{} of {}",
        if artifacts.view.is_empty() { 0 } else { offset + 1 },
        (offset + visible).min(artifacts.view.len()),
        artifacts.view.len()
    );
    let table = Table::new(rows)
        .header(
            Row::new(vec![
                "Year", "Seniority", "Contract", "Size", "Role", "Remote", "Country", "USD",
            ])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().title(title).borders(Borders::ALL))
        .widths(&RECORD_WIDTHS);
    rect.render_widget(table, area);
}
