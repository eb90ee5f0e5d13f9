use crate::app::CliApp;
use crate::cli::FilterArgs;
use anyhow::Context;
use monitor_core::error::{MonitorError, Result};
use monitor_core::export::write_csv;
use monitor_core::filter::filter;
use monitor_core::record::BackupRecord;
use std::path::{Path, PathBuf};
use tracing::info;

/// 将筛选结果导出为 CSV
pub fn run_export(app: &CliApp, filters: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let criteria = filters.to_criteria(app.config.table.search_media_server);
    let filtered = filter(app.store.records(), &criteria);

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => app.config.get_export_path(),
    };

    info!("📤 导出 {} 条策略...", filtered.len());
    if let Err(e) = write_export(&path, &filtered) {
        return Err(MonitorError::custom(format!("导出失败: {e:#}")));
    }
    info!("   ✅ 已写出: {}", path.display());
    Ok(())
}

/// 写出 CSV，必要时创建目标目录
pub fn write_export(path: &Path, records: &[&BackupRecord]) -> anyhow::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("无法创建目录 {}", parent.display()))?;
    }
    write_csv(path, records).with_context(|| format!("无法写入 {}", path.display()))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_export_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports").join("backup_checklist.csv");
        let records = [BackupRecord::new("SP_WIN_01", "SP").with_client("sp-fs01")];
        let refs: Vec<&BackupRecord> = records.iter().collect();

        let written = write_export(&path, &refs).unwrap();
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.starts_with("\"Location\""));
        assert!(content.contains("\"SP_WIN_01\""));
        assert!(content.contains("\"Active\""));
    }
}
