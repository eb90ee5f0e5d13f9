use crate::aggregate::StatusTotals;
use crate::constants::table::DEFAULT_PAGE_SIZE;
use crate::filter::{FilterCriteria, Selection, StatusFilter, filter, schedule_eligible};
use crate::paginate::{Page, clamp_page, paginate, total_pages};
use crate::record::BackupRecord;
use crate::schedule::{DayClass, ScheduleStats, schedule_stats};
use crate::store::RecordStore;

/// 策略列表视图状态
///
/// 每次调用都从仓库重新计算，不缓存任何结果。
/// 修改任一筛选条件都会把页码重置为 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTableState {
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
}

impl Default for PolicyTableState {
    fn default() -> Self {
        Self::new(FilterCriteria::default(), DEFAULT_PAGE_SIZE)
    }
}

impl PolicyTableState {
    pub fn new(criteria: FilterCriteria, page_size: usize) -> Self {
        Self {
            criteria,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn criteria_changed(&mut self) {
        self.page = 1;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.criteria.search_text = text.into();
        self.criteria_changed();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.criteria.search_text.push(c);
        self.criteria_changed();
    }

    pub fn pop_search_char(&mut self) {
        if self.criteria.search_text.pop().is_some() {
            self.criteria_changed();
        }
    }

    pub fn set_location(&mut self, location: Selection) {
        self.criteria.location = location;
        self.criteria_changed();
    }

    pub fn set_backup_type(&mut self, backup_type: Selection) {
        self.criteria.backup_type = backup_type;
        self.criteria_changed();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.criteria.status = status;
        self.criteria_changed();
    }

    pub fn toggle_inactive(&mut self) {
        self.criteria.include_inactive = !self.criteria.include_inactive;
        self.criteria_changed();
    }

    /// 直接跳到某页（会在取数时按实际页数限制）
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self, store: &RecordStore) {
        let pages = total_pages(self.filtered(store).len(), self.page_size);
        self.page = clamp_page(self.page + 1, pages);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// 完整的筛选结果（导出使用这个，而不是当前页）
    pub fn filtered<'a>(&self, store: &'a RecordStore) -> Vec<&'a BackupRecord> {
        filter(store.records(), &self.criteria)
    }

    /// 当前页；页码越界时取最后一页
    pub fn page<'v, 'a>(&self, filtered: &'v [&'a BackupRecord]) -> Page<'v, &'a BackupRecord> {
        paginate(filtered, self.page_size, self.page)
    }

    /// 筛选结果的活动/非活动统计
    pub fn status_totals(&self, store: &RecordStore) -> StatusTotals {
        StatusTotals::compute(self.filtered(store))
    }
}

/// 排程视图状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleViewState {
    pub day: DayClass,
    pub location: Selection,
}

impl ScheduleViewState {
    pub fn new(day: DayClass, location: Selection) -> Self {
        Self { day, location }
    }

    /// 参与排程统计的任务：所选站点的活动任务
    pub fn eligible<'a>(&self, store: &'a RecordStore) -> Vec<&'a BackupRecord> {
        schedule_eligible(store.records(), &self.location)
    }

    pub fn stats(&self, store: &RecordStore) -> ScheduleStats {
        schedule_stats(&self.eligible(store), self.day)
    }
}
