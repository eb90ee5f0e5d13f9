use crate::app::CliApp;
use crate::cli::FilterArgs;
use crate::utils::{page_indicator, truncate};
use monitor_core::error::Result;
use monitor_core::record::BackupRecord;
use monitor_core::view::PolicyTableState;
use tracing::{info, warn};

/// 分页列出备份策略
pub fn run_list(app: &CliApp, filters: &FilterArgs, page: usize, details: bool) -> Result<()> {
    let criteria = filters.to_criteria(app.config.table.search_media_server);
    let mut state = PolicyTableState::new(criteria, app.config.table.page_size);
    state.go_to_page(page);

    let filtered = state.filtered(&app.store);
    let current = state.page(&filtered);

    info!("📋 备份策略列表");
    info!("===============");
    if current.current_page != page && current.total_pages > 0 {
        let shown = current.current_page;
        warn!("⚠️  页码 {page} 超出范围，显示第 {shown} 页");
    }

    if filtered.is_empty() {
        info!("   没有匹配的策略");
    } else if details {
        for record in current.items {
            for line in format_details(record) {
                info!("{}", line);
            }
        }
    } else {
        info!("{}", header_row());
        for record in current.items {
            info!("{}", format_row(record));
        }
    }

    let (count, total) = (current.items.len(), current.total_items);
    let mut showing = format!("显示 {count} / {total} 条策略");
    if filtered.len() != app.store.len() {
        showing.push_str(&format!(" (从 {} 条中筛选)", app.store.len()));
    }
    info!("{}", showing);
    info!("{}", page_indicator(&current));

    let totals = state.status_totals(&app.store);
    info!(
        "🔄 Active: {} ({:.1}%)  Inactive: {} ({:.1}%)",
        totals.active,
        totals.active_pct(),
        totals.inactive,
        totals.inactive_pct()
    );
    Ok(())
}

fn header_row() -> String {
    format!(
        "{:<14} {:<28} {:<20} {:<18} {:<16} {:<22} {:<8}",
        "Location",
        "Policy/Job",
        "Type",
        "Media Server",
        "Storage Unit",
        "Client",
        "Status"
    )
}

fn format_row(record: &BackupRecord) -> String {
    let na = BackupRecord::display_or_na;
    format!(
        "{:<14} {:<28} {:<20} {:<18} {:<16} {:<22} {:<8}",
        truncate(&record.location, 14),
        truncate(&record.policy_name, 28),
        truncate(na(record.backup_type.as_deref()), 20),
        truncate(na(record.media_server.as_deref()), 18),
        truncate(na(record.storage_unit.as_deref()), 16),
        truncate(na(record.client.as_deref()), 22),
        record.status().label()
    )
}

/// 单条策略的详情块
fn format_details(record: &BackupRecord) -> Vec<String> {
    let mut lines = vec![format!("🗂️  {}", record.policy_name)];
    for (label, value) in record.details().into_iter().skip(1) {
        lines.push(format!("   {label:<18} {value}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_marks_missing_fields() {
        let record = BackupRecord::new("RJ_BARE", "RJ");
        let row = format_row(&record);
        assert!(row.contains("N/A"));
        assert!(row.trim_end().ends_with("Inactive"));
    }

    #[test]
    fn test_row_includes_storage_unit_column() {
        assert!(header_row().contains("Storage Unit"));

        let record = BackupRecord::new("SP_WIN_01", "SP")
            .with_type("MS-Windows")
            .with_media_server("media-sp")
            .with_storage_unit("stu-sp-01")
            .with_client("sp-fs01");
        let row = format_row(&record);
        let media = row.find("media-sp").unwrap();
        let storage = row.find("stu-sp-01").unwrap();
        let client = row.find("sp-fs01").unwrap();
        assert!(media < storage && storage < client);
    }

    #[test]
    fn test_details_list_slp_and_selections() {
        let record = BackupRecord::new("BH_SAP", "BH")
            .with_type("SAP")
            .with_client("bh-sap")
            .with_slp("SLP_BH_90D")
            .with_selections("/usr/sap/trans");
        let lines = format_details(&record);

        assert_eq!(lines[0], "🗂️  BH_SAP");
        assert!(has_line(&lines, "SLP", "SLP_BH_90D"));
        assert!(has_line(&lines, "Backup Selections", "/usr/sap/trans"));
        assert!(has_line(&lines, "Storage Unit", "N/A"));
    }

    fn has_line(lines: &[String], k: &str, v: &str) -> bool {
        lines.iter().any(|l| l.contains(k) && l.contains(v))
    }
}
