use crate::error::{MonitorError, Result};
use crate::record::BackupRecord;
use std::fmt;
use std::str::FromStr;

/// 下拉选择：全部或精确匹配某个值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// "all"（不区分大小写）或空字符串表示不限制
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            // 原值参与精确匹配，数据中带空格的站点也能选中
            Selection::Only(value.to_string())
        }
    }

    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or_default()
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => value == Some(expected.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => f.write_str(value),
        }
    }
}

/// 状态筛选
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, record: &BackupRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => record.is_active(),
            StatusFilter::Inactive => !record.is_active(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }

    /// 循环切换：all -> active -> inactive -> all
    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Inactive,
            StatusFilter::Inactive => StatusFilter::All,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(MonitorError::invalid_argument(format!(
                "未知的状态筛选: {other} (可选: all, active, inactive)"
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 筛选条件，各条件之间为 AND 关系
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// 不区分大小写的子串搜索
    pub search_text: String,
    pub location: Selection,
    pub backup_type: Selection,
    pub status: StatusFilter,
    /// 为 false 时无论 status 如何都隐藏非活动任务
    pub include_inactive: bool,
    /// 搜索是否同时匹配媒体服务器
    pub search_media_server: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            location: Selection::All,
            backup_type: Selection::All,
            status: StatusFilter::All,
            include_inactive: true,
            search_media_server: true,
        }
    }
}

impl FilterCriteria {
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_location(mut self, location: Selection) -> Self {
        self.location = location;
        self
    }

    pub fn with_backup_type(mut self, backup_type: Selection) -> Self {
        self.backup_type = backup_type;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_include_inactive(mut self, include_inactive: bool) -> Self {
        self.include_inactive = include_inactive;
        self
    }

    pub fn with_search_media_server(mut self, enabled: bool) -> Self {
        self.search_media_server = enabled;
        self
    }

    pub fn matches(&self, record: &BackupRecord) -> bool {
        self.matches_search(record)
            && self.location.matches(Some(record.location.as_str()))
            && self.backup_type.matches(record.backup_type.as_deref())
            && self.status.matches(record)
            && (self.include_inactive || record.is_active())
    }

    fn matches_search(&self, record: &BackupRecord) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&needle);

        contains(&record.policy_name)
            || contains(record.client_or_empty())
            || (self.search_media_server && contains(record.media_server_or_empty()))
    }

    /// 是否为不做任何限制的默认条件
    pub fn is_identity(&self) -> bool {
        self.search_text.is_empty()
            && self.location.is_all()
            && self.backup_type.is_all()
            && self.status == StatusFilter::All
            && self.include_inactive
    }
}

/// 按条件筛选，保持输入顺序
pub fn filter<'a>(records: &'a [BackupRecord], criteria: &FilterCriteria) -> Vec<&'a BackupRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// 排程视图的前置筛选：只保留所选站点的活动任务
pub fn schedule_eligible<'a>(
    records: &'a [BackupRecord],
    location: &Selection,
) -> Vec<&'a BackupRecord> {
    records
        .iter()
        .filter(|r| r.is_active() && location.matches(Some(r.location.as_str())))
        .collect()
}
