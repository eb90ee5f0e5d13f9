use crate::app::CliApp;
use crate::project_info::get_version_string;
use crate::utils::{bar, truncate};
use monitor_core::aggregate::{DashboardSummary, GroupCounts, by_location, by_server, by_type};
use monitor_core::error::Result;
use tracing::info;

const BAR_WIDTH: usize = 30;

/// 显示汇总统计
pub fn run_summary(app: &CliApp) -> Result<()> {
    let records = app.store.records();
    let summary = DashboardSummary::compute(records);

    info!("📊 {} 汇总", get_version_string());
    info!("==========================");
    info!("📋 基本信息:");
    info!("   策略总数: {}", summary.total_policies);
    info!("   站点数量: {}", summary.location_count);
    info!("   备份类型: {}", summary.type_count);
    info!("   媒体服务器: {}", summary.server_count);
    info!("   活动客户端: {}", summary.status.active);

    info!("🔄 任务状态:");
    info!(
        "   ✅ Active:   {:>4} ({:.1}%)",
        summary.status.active,
        summary.status.active_pct()
    );
    info!(
        "   ⏸️  Inactive: {:>4} ({:.1}%)",
        summary.status.inactive,
        summary.status.inactive_pct()
    );

    let total = summary.total_policies;
    print_distribution("📍 按站点分布:", &by_location(records), total);
    print_distribution("💾 按备份类型分布:", &by_type(records), total);
    print_distribution("🖥️  按媒体服务器分布:", &by_server(records), total);

    Ok(())
}

fn print_distribution(title: &str, groups: &GroupCounts, total: usize) {
    info!("{}", title);
    if groups.is_empty() {
        info!("   (无数据)");
        return;
    }

    let max = groups.iter().map(|(_, count)| count).max().unwrap_or(0);
    for share in groups.with_percentages(total) {
        info!(
            "   {:<24} {:>4} {:>6.1}% {}",
            truncate(&share.name, 24),
            share.count,
            share.percentage,
            bar(share.count, max, BAR_WIDTH)
        );
    }
}
