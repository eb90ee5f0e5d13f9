use crate::app::CliApp;
use crate::utils::{bar, truncate};
use monitor_core::error::Result;
use monitor_core::filter::Selection;
use monitor_core::schedule::{DayClass, IntensityBand, jobs_at_hour, peak_hours};
use monitor_core::view::ScheduleViewState;
use tracing::{debug, info};

const BAR_WIDTH: usize = 20;

/// 显示备份窗口的时段分布
pub fn run_schedule(app: &CliApp, day: DayClass, location: &str, details: bool) -> Result<()> {
    let view = ScheduleViewState::new(day, Selection::parse(location));
    let eligible = view.eligible(&app.store);
    let stats = view.stats(&app.store);
    let max = stats.max_count();
    debug!("统计字段: {}", day.source_field());

    info!("🕐 备份窗口分析: {} (站点: {})", day.label(), view.location);
    info!("==================================");
    info!("   参与统计的活动任务: {}", eligible.len());

    for hour in &stats.hours {
        info!(
            "   {:>5} │ {:>3} {:<width$} [{:<8}] {}",
            hour.hour,
            hour.count,
            bar(hour.count, max, BAR_WIDTH),
            hour.band().as_str(),
            truncate(&hour.types.join(", "), 40),
            width = BAR_WIDTH
        );
    }

    let peaks = peak_hours(&stats);
    if peaks.is_empty() {
        info!("📈 峰值时段: 无 (所有时段均无排程)");
    } else {
        let labels: Vec<&str> = peaks.iter().map(|stats| stats.hour).collect();
        info!("📈 峰值时段: {} ({} 个任务)", labels.join(", "), max);
    }

    info!("🎨 强度图例:");
    for (band, label) in IntensityBand::legend() {
        info!("   {:<8} {}", band.as_str(), label);
    }

    if details {
        info!("📝 各时段任务:");
        for hour in stats.hours.iter().filter(|stats| stats.count > 0) {
            info!("   {} ({} 个任务):", hour.hour, hour.count);
            for job in jobs_at_hour(&eligible, day, hour.hour) {
                info!(
                    "      - {} [{}] {}",
                    job.policy_name,
                    job.location,
                    job.backup_type_label()
                );
            }
            info!("      站点: {}", hour.locations.join(", "));
        }
    }

    Ok(())
}
