use crate::record::BackupRecord;
use std::collections::HashMap;

/// 分组计数，按键首次出现的顺序迭代
///
/// 图表按这个顺序渲染，保证多次计算结果一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupCounts {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl GroupCounts {
    fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1)
            .unwrap_or(0)
    }

    /// 不同键的数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有计数之和
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// 附带占比，用于图表标签
    pub fn with_percentages(&self, total: usize) -> Vec<GroupShare> {
        self.iter()
            .map(|(name, count)| GroupShare {
                name: name.to_string(),
                count,
                percentage: percentage(count, total),
            })
            .collect()
    }
}

/// 单个分组的计数与占比
#[derive(Debug, Clone, PartialEq)]
pub struct GroupShare {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

/// 通用分组计数
pub fn group_count<'a, I, F>(records: I, key_fn: F) -> GroupCounts
where
    I: IntoIterator<Item = &'a BackupRecord>,
    F: Fn(&BackupRecord) -> &str,
{
    let mut counts = GroupCounts::default();
    for record in records {
        counts.increment(key_fn(record));
    }
    counts
}

pub fn by_location<'a>(records: impl IntoIterator<Item = &'a BackupRecord>) -> GroupCounts {
    group_count(records, |r| r.location.as_str())
}

/// 按备份类型分组，缺失类型归入 "Unspecified"
pub fn by_type<'a>(records: impl IntoIterator<Item = &'a BackupRecord>) -> GroupCounts {
    group_count(records, BackupRecord::backup_type_label)
}

/// 按媒体服务器分组，缺失服务器归入 "Unspecified"
pub fn by_server<'a>(records: impl IntoIterator<Item = &'a BackupRecord>) -> GroupCounts {
    group_count(records, BackupRecord::media_server_label)
}

/// 百分比，保留一位小数；分母为 0 时返回 0.0
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// 活动/非活动任务统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTotals {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl StatusTotals {
    pub fn compute<'a>(records: impl IntoIterator<Item = &'a BackupRecord>) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.total += 1;
            if record.is_active() {
                totals.active += 1;
            } else {
                totals.inactive += 1;
            }
        }
        totals
    }

    pub fn active_pct(&self) -> f64 {
        percentage(self.active, self.total)
    }

    pub fn inactive_pct(&self) -> f64 {
        percentage(self.inactive, self.total)
    }
}

/// 仪表盘顶部的汇总卡片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_policies: usize,
    pub location_count: usize,
    pub type_count: usize,
    pub server_count: usize,
    pub status: StatusTotals,
}

impl DashboardSummary {
    pub fn compute(records: &[BackupRecord]) -> Self {
        Self {
            total_policies: records.len(),
            location_count: by_location(records).len(),
            type_count: by_type(records).len(),
            server_count: by_server(records).len(),
            status: StatusTotals::compute(records),
        }
    }
}
