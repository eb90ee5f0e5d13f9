use crate::error::Result;
use crate::record::{BackupRecord, non_blank};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 随程序打包的数据集
const BUNDLED_DATA: &str = include_str!("../assets/backup_data.json");

/// 只读记录仓库
///
/// 启动时加载一次，之后所有视图都从这里重新计算
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<BackupRecord>,
}

impl RecordStore {
    pub fn from_records(records: Vec<BackupRecord>) -> Self {
        validate(&records);
        Self { records }
    }

    /// 解析 JSON 数组形式的数据集
    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<BackupRecord> = serde_json::from_str(content)?;
        Ok(Self::from_records(records))
    }

    /// 从数据文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        tracing::info!("已加载数据文件: {} ({} 条策略)", path.display(), store.len());
        Ok(store)
    }

    /// 加载内置数据集
    pub fn bundled() -> Result<Self> {
        let store = Self::from_json_str(BUNDLED_DATA)?;
        tracing::info!("已加载内置数据集 ({} 条策略)", store.len());
        Ok(store)
    }

    pub fn records(&self) -> &[BackupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 所有站点，按首次出现顺序去重
    pub fn locations(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.location.as_str()))
    }

    /// 所有已填写的备份类型，按首次出现顺序去重
    pub fn backup_types(&self) -> Vec<&str> {
        distinct(
            self.records
                .iter()
                .filter_map(|r| non_blank(r.backup_type.as_deref())),
        )
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// 必填键缺失属于数据质量问题：只告警，不拒绝
fn validate(records: &[BackupRecord]) {
    for (index, record) in records.iter().enumerate() {
        let missing = record.missing_required_keys();
        if !missing.is_empty() {
            tracing::warn!(
                "第 {} 条记录缺少字段 {}，将使用空值分组",
                index + 1,
                missing.join(", ")
            );
        }
    }
}
