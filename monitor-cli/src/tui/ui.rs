use super::state::{DashboardState, InputMode, Tab};
use crate::project_info::get_version_string;
use crate::utils::{page_indicator, truncate};
use monitor_core::BackupKind;
use monitor_core::aggregate::{GroupCounts, by_location, by_server, by_type};
use monitor_core::record::{BackupRecord, JobStatus};
use monitor_core::schedule::{IntensityBand, peak_hours};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs,
        Wrap,
    },
};

/// 备份类型颜色
fn kind_color(kind: BackupKind) -> Color {
    match kind {
        BackupKind::Windows => Color::Blue,
        BackupKind::SqlServer => Color::Green,
        BackupKind::Sap => Color::Magenta,
        BackupKind::VMware => Color::LightRed,
        BackupKind::Exchange => Color::Red,
        BackupKind::Catalog => Color::Gray,
        BackupKind::Standard => Color::Yellow,
        BackupKind::FlashBackupWindows => Color::Cyan,
        BackupKind::Other | BackupKind::Unspecified => Color::DarkGray,
    }
}

/// 时段负载颜色
fn band_color(band: IntensityBand) -> Color {
    match band {
        IntensityBand::None => Color::DarkGray,
        IntensityBand::Low => Color::Green,
        IntensityBand::Medium => Color::Yellow,
        IntensityBand::High => Color::LightRed,
        IntensityBand::Critical => Color::Red,
    }
}

fn status_color(status: JobStatus) -> Color {
    match status {
        JobStatus::Active => Color::Green,
        JobStatus::Inactive => Color::DarkGray,
    }
}

pub fn draw(frame: &mut Frame, state: &DashboardState) {
    let [header, tabs, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, header, state);
    draw_tabs(frame, tabs, state);
    match state.tab {
        Tab::Dashboard => draw_dashboard(frame, body, state),
        Tab::Policies => draw_policies(frame, body, state),
        Tab::Schedule => draw_schedule(frame, body, state),
    }
    draw_footer(frame, footer, state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let title = format!(" 🗄️  {} ", get_version_string());
    let clock = format!(" {} ", state.now.format("%Y-%m-%d %H:%M:%S"));
    let used = title.chars().count() + clock.len();
    let padding = (area.width as usize).saturating_sub(used);

    let line = Line::from(vec![
        Span::styled(title, Style::new().white().bold()),
        Span::raw(" ".repeat(padding)),
        Span::styled(clock, Style::new().gray()),
    ]);
    let bar = Paragraph::new(line).style(Style::new().on_dark_gray());
    frame.render_widget(bar, area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()));
    let tabs = Tabs::new(titles)
        .select(state.tab.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::new().yellow().bold());
    frame.render_widget(tabs, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let hints = match (state.tab, state.input_mode) {
        (_, InputMode::Search) => "输入搜索内容  Enter/Esc 完成  Backspace 删除",
        (Tab::Dashboard, _) => "Tab/←→ 切换  1-3 跳转  q 退出",
        (Tab::Policies, _) => {
            "↑↓ 选择  Enter 详情  / 搜索  l 站点  t 类型  s 状态  i 非活动  r 重置  n/p 翻页  e 导出  q 退出"
        }
        (Tab::Schedule, _) => "d 切换日类别  l 站点  Tab 切换  q 退出",
    };

    let mut spans = vec![Span::styled(hints, Style::new().gray())];
    if let Some(message) = &state.status_message {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(message.as_str(), Style::new().cyan()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_dashboard(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let [cards, charts, lower] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Percentage(55),
        Constraint::Min(0),
    ])
    .areas(area);

    let summary = &state.summary;
    let card_values = [
        ("策略总数", summary.total_policies.to_string(), Color::Blue),
        ("站点", summary.location_count.to_string(), Color::Green),
        ("备份类型", summary.type_count.to_string(), Color::Magenta),
        ("活动客户端", summary.status.active.to_string(), Color::LightRed),
    ];
    let card_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(cards);
    for ((title, value, color), card_area) in card_values.into_iter().zip(card_areas.iter()) {
        let card = Paragraph::new(Line::from(value).bold().fg(color))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(card, *card_area);
    }

    let records = state.store.records();
    let halves = [Constraint::Percentage(50); 2];
    let [location_area, type_area] = Layout::horizontal(halves).areas(charts);
    draw_bar_chart(
        frame,
        location_area,
        "按站点分布",
        &by_location(records),
        |_| Color::Blue,
    );
    draw_bar_chart(
        frame,
        type_area,
        "按备份类型分布",
        &by_type(records),
        type_color,
    );

    let split = [Constraint::Percentage(60), Constraint::Percentage(40)];
    let [server_area, status_area] = Layout::horizontal(split).areas(lower);
    draw_share_table(
        frame,
        server_area,
        "按媒体服务器分布",
        &by_server(records),
        summary.total_policies,
    );

    let status = summary.status;
    let active = Style::new().fg(status_color(JobStatus::Active));
    let inactive = Style::new().fg(status_color(JobStatus::Inactive));
    let status_lines = vec![
        Line::from(vec![
            Span::styled("● Active   ", active),
            Span::raw(format!("{:>4} ({:.1}%)", status.active, status.active_pct())),
        ]),
        Line::from(vec![
            Span::styled("● Inactive ", inactive),
            Span::raw(format!("{:>4} ({:.1}%)", status.inactive, status.inactive_pct())),
        ]),
        Line::from(format!("  媒体服务器: {}", summary.server_count)),
    ];
    let status_block = Block::default().borders(Borders::ALL).title("任务状态");
    let status_panel = Paragraph::new(status_lines).block(status_block);
    frame.render_widget(status_panel, status_area);
}

fn type_color(name: &str) -> Color {
    kind_color(BackupKind::classify(Some(name)))
}

fn draw_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    groups: &GroupCounts,
    color_of: impl Fn(&str) -> Color,
) {
    let bar_count = groups.len().max(1) as u16;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / bar_count).saturating_sub(1).clamp(1, 12);

    let bars: Vec<Bar> = groups
        .iter()
        .map(|(name, count)| {
            Bar::default()
                .value(count as u64)
                .label(Line::from(truncate(name, bar_width as usize)))
                .style(Style::default().fg(color_of(name)))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_share_table(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    groups: &GroupCounts,
    total: usize,
) {
    let shares = groups.with_percentages(total);
    let rows = shares.into_iter().map(|share| {
        Row::new(vec![
            Cell::from(share.name),
            Cell::from(share.count.to_string()),
            Cell::from(format!("{:.1}%", share.percentage)),
        ])
    });
    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    let header = Row::new(vec!["Media Server", "Jobs", "%"]).style(Style::new().bold());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(table, area);
}

fn draw_policies(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let [filters, table_area, info] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let criteria = state.table.criteria();
    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let show = criteria.include_inactive;
    let filter_line = Line::from(vec![
        Span::raw("搜索: "),
        Span::styled(format!("{}▏", criteria.search_text), search_style),
        Span::raw(format!(
            "  站点: {}  类型: {}  状态: {}  非活动: {}",
            criteria.location,
            criteria.backup_type,
            criteria.status,
            if show { "显示" } else { "隐藏" }
        )),
    ]);
    let filter_block = Block::default().borders(Borders::ALL).title("筛选");
    let filter_bar = Paragraph::new(filter_line).block(filter_block);
    frame.render_widget(filter_bar, filters);

    let filtered = state.table.filtered(state.store);
    let page = state.table.page(&filtered);

    let (list_area, detail_area) = if state.show_details {
        let split = [Constraint::Percentage(65), Constraint::Percentage(35)];
        let [list, detail] = Layout::horizontal(split).areas(table_area);
        (list, Some(detail))
    } else {
        (table_area, None)
    };

    let rows = page.items.iter().map(|record| policy_row(record));
    let header = Row::new(vec![
        "Location",
        "Policy/Job",
        "Type",
        "Media Server",
        "Storage Unit",
        "Client",
        "Status",
    ])
    .style(Style::new().white().on_blue().bold());
    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(20),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(20),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .row_highlight_style(Style::new().reversed())
    .block(Block::default().borders(Borders::ALL).title("备份策略"));

    let last = page.items.len().checked_sub(1);
    let selected = last.map(|last| state.selected.min(last));
    let mut table_state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, list_area, &mut table_state);

    if let Some(detail_area) = detail_area {
        draw_policy_details(frame, detail_area, state.selected_record());
    }

    let (count, total) = (page.items.len(), page.total_items);
    let mut showing = format!("显示 {count} / {total} 条策略");
    if filtered.len() != state.store.len() {
        showing.push_str(&format!(" (从 {} 条中筛选)", state.store.len()));
    }
    let totals = state.table.status_totals(state.store);
    let info_line = Line::from(format!(
        "{showing}  ·  {}  ·  Active {} ({:.1}%)  Inactive {} ({:.1}%)",
        page_indicator(&page),
        totals.active,
        totals.active_pct(),
        totals.inactive,
        totals.inactive_pct()
    ));
    let info_block = Block::default().borders(Borders::ALL);
    let info_bar = Paragraph::new(info_line).block(info_block);
    frame.render_widget(info_bar, info);
}

fn draw_policy_details(frame: &mut Frame, area: Rect, record: Option<&BackupRecord>) {
    let lines: Vec<Line> = match record {
        Some(record) => record
            .details()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<18}"), Style::new().gray()),
                    Span::raw(value.to_string()),
                ])
            })
            .collect(),
        None => vec![Line::from("没有选中的策略")],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("策略详情")),
        area,
    );
}

fn text_cell(value: Option<&str>) -> Cell<'static> {
    Cell::from(BackupRecord::display_or_na(value).to_string())
}

fn policy_row(record: &BackupRecord) -> Row<'static> {
    let status = record.status();
    let kind_style = Style::new().fg(kind_color(record.kind()));
    let status_style = Style::new().fg(status_color(status));
    Row::new(vec![
        Cell::from(record.location.clone()),
        Cell::from(record.policy_name.clone()),
        text_cell(record.backup_type.as_deref()).style(kind_style),
        text_cell(record.media_server.as_deref()),
        text_cell(record.storage_unit.as_deref()),
        text_cell(record.client.as_deref()),
        Cell::from(status.label()).style(status_style),
    ])
}

fn draw_schedule(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let [overview, grid, legend] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let view = &state.schedule;
    let eligible = view.eligible(state.store);
    let stats = view.stats(state.store);
    let peaks = peak_hours(&stats);
    let peak_text = if peaks.is_empty() {
        "无".to_string()
    } else {
        let labels: Vec<&str> = peaks.iter().map(|stats| stats.hour).collect();
        format!("{} ({} 个任务)", labels.join(", "), stats.max_count())
    };

    let overview_lines = vec![
        Line::from(format!(
            "日类别: {}  站点: {}  活动任务: {}",
            view.day.label(),
            view.location,
            eligible.len()
        )),
        Line::from(vec![
            Span::raw("峰值时段: "),
            Span::styled(peak_text, Style::new().red().bold()),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(overview_lines)
            .block(Block::default().borders(Borders::ALL).title("备份窗口")),
        overview,
    );

    let max = stats.max_count();
    let rows = stats.hours.iter().map(|hour| {
        let color = band_color(hour.band());
        Row::new(vec![
            Cell::from(hour.hour),
            Cell::from(hour.count.to_string()),
            Cell::from(crate::utils::bar(hour.count, max, 20)),
            Cell::from(hour.types.join(", ")),
            Cell::from(hour.locations.join(", ")),
        ])
        .style(Style::default().fg(color))
    });
    let header = Row::new(vec!["Hour", "Jobs", "", "Types", "Locations"])
        .style(Style::new().bold());
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(21),
            Constraint::Min(20),
            Constraint::Length(30),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("时段负载"));
    frame.render_widget(table, grid);

    let legend_spans: Vec<Span> = IntensityBand::legend()
        .into_iter()
        .flat_map(|(band, label)| {
            [
                Span::styled("■ ", Style::default().fg(band_color(band))),
                Span::raw(format!("{label}   ")),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(legend_spans))
            .block(Block::default().borders(Borders::ALL).title("图例")),
        legend,
    );
}
