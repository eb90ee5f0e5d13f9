use crate::constants::export::{DELIMITER, LINE_SEPARATOR, QUOTE};
use crate::error::Result;
use crate::record::BackupRecord;
use std::fs;
use std::path::Path;

/// 导出列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumn {
    Location,
    PolicyJob,
    Type,
    MediaServer,
    StorageUnit,
    Client,
    /// 计算得出的 Active/Inactive，不是原始字段
    Status,
}

/// 默认列顺序
pub const DEFAULT_COLUMNS: [ExportColumn; 7] = [
    ExportColumn::Location,
    ExportColumn::PolicyJob,
    ExportColumn::Type,
    ExportColumn::MediaServer,
    ExportColumn::StorageUnit,
    ExportColumn::Client,
    ExportColumn::Status,
];

impl ExportColumn {
    pub fn header(&self) -> &'static str {
        match self {
            ExportColumn::Location => "Location",
            ExportColumn::PolicyJob => "Policy/Job",
            ExportColumn::Type => "Type",
            ExportColumn::MediaServer => "Media Server",
            ExportColumn::StorageUnit => "Storage Unit",
            ExportColumn::Client => "Client",
            ExportColumn::Status => "Status",
        }
    }

    /// 缺失字段导出为空字符串
    pub fn value<'a>(&self, record: &'a BackupRecord) -> &'a str {
        match self {
            ExportColumn::Location => &record.location,
            ExportColumn::PolicyJob => &record.policy_name,
            ExportColumn::Type => record.backup_type.as_deref().unwrap_or(""),
            ExportColumn::MediaServer => record.media_server.as_deref().unwrap_or(""),
            ExportColumn::StorageUnit => record.storage_unit.as_deref().unwrap_or(""),
            ExportColumn::Client => record.client.as_deref().unwrap_or(""),
            ExportColumn::Status => record.status().label(),
        }
    }
}

/// 每个字段无条件加引号，字段内的引号加倍
fn quote(field: &str) -> String {
    let escaped = field.replace(QUOTE, "\"\"");
    format!("{QUOTE}{escaped}{QUOTE}")
}

fn join_row<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    fields
        .map(quote)
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

/// 生成带表头的分隔文本
///
/// 作用于完整的筛选结果，与当前分页无关
pub fn to_delimited_text(records: &[&BackupRecord], columns: &[ExportColumn]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(join_row(columns.iter().map(|c| c.header())));
    for record in records {
        lines.push(join_row(columns.iter().map(|c| c.value(record))));
    }
    lines.join(LINE_SEPARATOR)
}

/// 以默认列写出 CSV 文件
pub fn write_csv<P: AsRef<Path>>(path: P, records: &[&BackupRecord]) -> Result<()> {
    let content = to_delimited_text(records, &DEFAULT_COLUMNS);
    fs::write(&path, content)?;
    tracing::debug!(
        "已写出 {} 条记录到 {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}
