use crate::commands::write_export;
use chrono::{DateTime, Local};
use monitor_core::RecordStore;
use monitor_core::aggregate::DashboardSummary;
use monitor_core::filter::{FilterCriteria, Selection, StatusFilter};
use monitor_core::record::BackupRecord;
use monitor_core::schedule::DayClass;
use monitor_core::view::{PolicyTableState, ScheduleViewState};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tracing::{error, info};

/// 仪表盘标签页
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Policies,
    Schedule,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Policies, Tab::Schedule];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Policies => "Policies",
            Tab::Schedule => "Schedule",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// 仪表盘状态，所有视图数据每次绘制时从仓库重新计算
pub struct DashboardState<'a> {
    pub store: &'a RecordStore,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub table: PolicyTableState,
    pub schedule: ScheduleViewState,
    pub summary: DashboardSummary,
    pub status_message: Option<String>,
    pub now: DateTime<Local>,
    pub running: bool,
    /// 当前页内选中的行
    pub selected: usize,
    pub show_details: bool,
    locations: Vec<&'a str>,
    backup_types: Vec<&'a str>,
    export_path: PathBuf,
}

impl<'a> DashboardState<'a> {
    pub fn new(
        store: &'a RecordStore,
        page_size: usize,
        search_media_server: bool,
        export_path: PathBuf,
    ) -> Self {
        let criteria = FilterCriteria::default();
        let criteria = criteria.with_search_media_server(search_media_server);
        Self {
            store,
            tab: Tab::default(),
            input_mode: InputMode::default(),
            table: PolicyTableState::new(criteria, page_size),
            schedule: ScheduleViewState::default(),
            summary: DashboardSummary::compute(store.records()),
            status_message: None,
            now: Local::now(),
            running: true,
            selected: 0,
            show_details: false,
            locations: store.locations(),
            backup_types: store.backup_types(),
            export_path,
        }
    }

    pub fn tick(&mut self) {
        self.now = Local::now();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.previous(),
            KeyCode::Char('1') => self.tab = Tab::Dashboard,
            KeyCode::Char('2') => self.tab = Tab::Policies,
            KeyCode::Char('3') => self.tab = Tab::Schedule,
            code => match self.tab {
                Tab::Dashboard => {}
                Tab::Policies => self.handle_policies_key(code),
                Tab::Schedule => self.handle_schedule_key(code),
            },
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => self.table.pop_search_char(),
            KeyCode::Char(c) => self.table.push_search_char(c),
            _ => {}
        }
        self.selected = 0;
    }

    fn current_page_len(&self) -> usize {
        let filtered = self.table.filtered(self.store);
        self.table.page(&filtered).items.len()
    }

    /// 当前页中选中的策略
    pub fn selected_record(&self) -> Option<&'a BackupRecord> {
        let filtered = self.table.filtered(self.store);
        let page = self.table.page(&filtered);
        let last = page.items.len().checked_sub(1)?;
        page.items.get(self.selected.min(last)).copied()
    }

    fn handle_policies_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.current_page_len();
                if self.selected + 1 < rows {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.show_details = !self.show_details,
            KeyCode::Char('e') => self.export(),
            code => {
                self.handle_policies_filter_key(code);
                self.selected = 0;
            }
        }
    }

    fn handle_policies_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('l') => {
                let next = cycle(&self.table.criteria().location, &self.locations);
                self.table.set_location(next);
            }
            KeyCode::Char('t') => {
                let next = cycle(&self.table.criteria().backup_type, &self.backup_types);
                self.table.set_backup_type(next);
            }
            KeyCode::Char('s') => {
                let next = self.table.criteria().status.next();
                self.table.set_status(next);
            }
            KeyCode::Char('i') => self.table.toggle_inactive(),
            KeyCode::Char('r') => self.reset_filters(),
            KeyCode::Char('n') | KeyCode::PageDown => self.table.next_page(self.store),
            KeyCode::Char('p') | KeyCode::PageUp => self.table.previous_page(),
            _ => {}
        }
    }

    fn handle_schedule_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('d') => self.schedule.day = self.schedule.day.toggle(),
            KeyCode::Char('w') => self.schedule.day = DayClass::Weekday,
            KeyCode::Char('W') => self.schedule.day = DayClass::Weekend,
            KeyCode::Char('l') => {
                self.schedule.location = cycle(&self.schedule.location, &self.locations);
            }
            _ => {}
        }
    }

    fn reset_filters(&mut self) {
        self.table.set_search("");
        self.table.set_location(Selection::All);
        self.table.set_backup_type(Selection::All);
        self.table.set_status(StatusFilter::All);
        if !self.table.criteria().include_inactive {
            self.table.toggle_inactive();
        }
    }

    /// 导出完整筛选结果，不受当前页影响
    fn export(&mut self) {
        let filtered = self.table.filtered(self.store);
        match write_export(&self.export_path, &filtered) {
            Ok(path) => {
                info!("已导出 {} 条策略到 {}", filtered.len(), path.display());
                self.status_message = Some(format!(
                    "✅ 已导出 {} 条策略到 {}",
                    filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                error!("导出失败: {:#}", e);
                self.status_message = Some(format!("❌ 导出失败: {e}"));
            }
        }
    }
}

/// 在 All 与各选项之间循环切换
fn cycle(current: &Selection, options: &[&str]) -> Selection {
    let next_index = match current {
        Selection::All => 0,
        Selection::Only(value) => match options.iter().position(|option| option == value) {
            Some(index) => index + 1,
            None => options.len(),
        },
    };
    options
        .get(next_index)
        .map(|option| Selection::Only(option.to_string()))
        .unwrap_or(Selection::All)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_store() -> RecordStore {
        let records = (0..25)
            .map(|i| {
                let location = if i % 2 == 0 { "SP" } else { "RJ" };
                let record = BackupRecord::new(format!("POL_{i:02}"), location)
                    .with_type("VMware");
                if i % 5 == 0 {
                    record
                } else {
                    record.with_client(format!("client-{i}"))
                }
            })
            .collect();
        RecordStore::from_records(records)
    }

    #[test]
    fn test_tab_navigation_wraps() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));

        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.tab, Tab::Policies);
        state.handle_key(key(KeyCode::Tab));
        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.tab, Tab::Dashboard);
        state.handle_key(key(KeyCode::BackTab));
        assert_eq!(state.tab, Tab::Schedule);
    }

    #[test]
    fn test_search_mode_captures_keys_and_resets_page() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.handle_key(key(KeyCode::Char('2')));
        state.handle_key(key(KeyCode::Char('n')));
        assert_eq!(state.table.page_number(), 2);

        state.handle_key(key(KeyCode::Char('/')));
        assert_eq!(state.input_mode, InputMode::Search);
        // 搜索模式下 q 是普通字符
        state.handle_key(key(KeyCode::Char('q')));
        assert!(state.running);
        assert_eq!(state.table.criteria().search_text, "q");
        assert_eq!(state.table.page_number(), 1);

        state.handle_key(key(KeyCode::Backspace));
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.table.criteria().search_text.is_empty());
    }

    #[test]
    fn test_location_cycles_through_options_and_back_to_all() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.handle_key(key(KeyCode::Char('2')));

        state.handle_key(key(KeyCode::Char('l')));
        assert_eq!(state.table.criteria().location, Selection::Only("SP".into()));
        state.handle_key(key(KeyCode::Char('l')));
        assert_eq!(state.table.criteria().location, Selection::Only("RJ".into()));
        state.handle_key(key(KeyCode::Char('l')));
        assert_eq!(state.table.criteria().location, Selection::All);
    }

    #[test]
    fn test_schedule_keys_do_not_touch_policy_filters() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.handle_key(key(KeyCode::Char('3')));

        state.handle_key(key(KeyCode::Char('d')));
        assert_eq!(state.schedule.day, DayClass::Weekend);
        state.handle_key(key(KeyCode::Char('l')));
        assert_eq!(state.schedule.location, Selection::Only("SP".into()));
        assert!(state.table.criteria().is_identity());
    }

    #[test]
    fn test_export_writes_full_filtered_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup_checklist.csv");
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, path.clone());
        state.handle_key(key(KeyCode::Char('2')));
        state.handle_key(key(KeyCode::Char('s')));
        assert_eq!(state.table.criteria().status, StatusFilter::Active);

        state.handle_key(key(KeyCode::Char('e')));
        let content = std::fs::read_to_string(&path).unwrap();
        // 25 条中每 5 条一条非活动，剩 20 条加表头
        assert_eq!(content.lines().count(), 21);
        assert!(state.status_message.unwrap().starts_with("✅"));
    }

    #[test]
    fn test_row_selection_and_details_toggle() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.handle_key(key(KeyCode::Char('2')));
        assert_eq!(state.selected_record().unwrap().policy_name, "POL_00");

        state.handle_key(key(KeyCode::Down));
        state.handle_key(key(KeyCode::Char('j')));
        assert_eq!(state.selected_record().unwrap().policy_name, "POL_02");

        state.handle_key(key(KeyCode::Enter));
        assert!(state.show_details);

        // 选择不能越过当前页最后一行
        for _ in 0..20 {
            state.handle_key(key(KeyCode::Down));
        }
        assert_eq!(state.selected, 9);

        // 翻页后回到第一行
        state.handle_key(key(KeyCode::Char('n')));
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_record().unwrap().policy_name, "POL_10");
        assert!(state.show_details);

        state.handle_key(key(KeyCode::Enter));
        assert!(!state.show_details);
    }

    #[test]
    fn test_selected_record_is_none_without_matches() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.table.set_search("no-such-policy");
        assert!(state.selected_record().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let store = sample_store();
        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!state.running);

        let mut state = DashboardState::new(&store, 10, true, PathBuf::from("out.csv"));
        state.handle_key(key(KeyCode::Char('q')));
        assert!(!state.running);
    }
}
