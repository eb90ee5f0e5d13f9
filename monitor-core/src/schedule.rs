use crate::constants::{fields, schedule};
use crate::error::{MonitorError, Result};
use crate::record::{BackupRecord, ScheduleWindow, non_blank};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// 排程日类别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayClass {
    /// 周一至周四夜间
    #[default]
    Weekday,
    /// 周五至周六
    Weekend,
}

impl DayClass {
    /// 该日类别的固定时间槽序列（同时也是显示顺序）
    pub fn hours(&self) -> &'static [&'static str] {
        match self {
            DayClass::Weekday => &schedule::WEEKDAY_HOURS,
            DayClass::Weekend => &schedule::WEEKEND_HOURS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayClass::Weekday => "Monday-Thursday",
            DayClass::Weekend => "Friday-Saturday",
        }
    }

    /// 数据文件中对应的窗口字段名
    pub fn source_field(&self) -> &'static str {
        match self {
            DayClass::Weekday => fields::WEEKDAY_SCHEDULE,
            DayClass::Weekend => fields::WEEKEND_SCHEDULE,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            DayClass::Weekday => DayClass::Weekend,
            DayClass::Weekend => DayClass::Weekday,
        }
    }

    fn window<'a>(&self, record: &'a BackupRecord) -> Option<&'a ScheduleWindow> {
        match self {
            DayClass::Weekday => record.weekday_schedule.as_ref(),
            DayClass::Weekend => record.weekend_schedule.as_ref(),
        }
    }

    /// 记录在该时间槽是否有排程
    pub fn is_scheduled(&self, record: &BackupRecord, hour: &str) -> bool {
        self.window(record)
            .and_then(|window| non_blank(window.get(hour).map(String::as_str)))
            .is_some()
    }
}

impl FromStr for DayClass {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekday" | "weekdays" => Ok(DayClass::Weekday),
            "weekend" | "weekends" => Ok(DayClass::Weekend),
            other => Err(MonitorError::invalid_argument(format!(
                "未知的日类别: {other} (可选: weekday, weekend)"
            ))),
        }
    }
}

impl fmt::Display for DayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 某个时间槽内排程的任务
pub fn jobs_at_hour<'a>(
    records: &[&'a BackupRecord],
    day: DayClass,
    hour: &str,
) -> Vec<&'a BackupRecord> {
    records
        .iter()
        .copied()
        .filter(|record| day.is_scheduled(record, hour))
        .collect()
}

/// 单个时间槽的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourStats {
    pub hour: &'static str,
    pub count: usize,
    /// 去重后的备份类型（不含未填写类型）
    pub types: Vec<String>,
    /// 去重后的站点
    pub locations: Vec<String>,
}

impl HourStats {
    pub fn band(&self) -> IntensityBand {
        IntensityBand::from_count(self.count)
    }
}

/// 一个日类别下全部时间槽的统计，顺序与时间槽序列一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleStats {
    pub day: DayClass,
    pub hours: Vec<HourStats>,
}

impl ScheduleStats {
    pub fn get(&self, hour: &str) -> Option<&HourStats> {
        self.hours.iter().find(|stats| stats.hour == hour)
    }

    pub fn max_count(&self) -> usize {
        self.hours.iter().map(|stats| stats.count).max().unwrap_or(0)
    }
}

/// 计算每个时间槽的任务数、类型和站点
///
/// 输入应为已按站点和活动状态筛选过的序列
pub fn schedule_stats(records: &[&BackupRecord], day: DayClass) -> ScheduleStats {
    let hours = day
        .hours()
        .iter()
        .map(|&hour| {
            let jobs = jobs_at_hour(records, day, hour);
            HourStats {
                hour,
                count: jobs.len(),
                types: distinct_owned(
                    jobs.iter()
                        .filter_map(|job| non_blank(job.backup_type.as_deref())),
                ),
                locations: distinct_owned(jobs.iter().map(|job| job.location.as_str())),
            }
        })
        .collect();

    ScheduleStats { day, hours }
}

/// 峰值时间槽：达到最大任务数的全部时间槽；全部为 0 时没有峰值
pub fn peak_hours(stats: &ScheduleStats) -> Vec<&HourStats> {
    let max = stats.max_count();
    if max == 0 {
        return Vec::new();
    }
    stats.hours.iter().filter(|s| s.count == max).collect()
}

fn distinct_owned<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// 时间槽负载等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntensityBand {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// 按上限递增排列的阈值表：count <= 上限 即落入该等级
const BAND_RULES: [(usize, IntensityBand, &str); 4] = [
    (0, IntensityBand::None, "0 jobs"),
    (2, IntensityBand::Low, "1-2 jobs"),
    (5, IntensityBand::Medium, "3-5 jobs"),
    (10, IntensityBand::High, "6-10 jobs"),
];

const CRITICAL_LABEL: &str = "11+ jobs";

impl IntensityBand {
    pub fn from_count(count: usize) -> Self {
        BAND_RULES
            .iter()
            .find(|(upper, _, _)| count <= *upper)
            .map(|(_, band, _)| *band)
            .unwrap_or(IntensityBand::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityBand::None => "none",
            IntensityBand::Low => "low",
            IntensityBand::Medium => "medium",
            IntensityBand::High => "high",
            IntensityBand::Critical => "critical",
        }
    }

    /// 图例：等级与对应的任务数范围
    pub fn legend() -> Vec<(IntensityBand, &'static str)> {
        BAND_RULES
            .iter()
            .map(|(_, band, label)| (*band, *label))
            .chain(std::iter::once((IntensityBand::Critical, CRITICAL_LABEL)))
            .collect()
    }
}

impl fmt::Display for IntensityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<BackupRecord> {
        vec![
            BackupRecord::new("A", "SP")
                .with_type("SAP")
                .with_client("c1")
                .with_weekday_slot("22:00", "X")
                .with_weekday_slot("23:00", "X"),
            BackupRecord::new("B", "RJ")
                .with_type("VMware")
                .with_client("c2")
                .with_weekday_slot("22:00", "X")
                .with_weekday_slot("0:00", " "),
            BackupRecord::new("C", "SP")
                .with_client("c3")
                .with_weekday_slot("22:00", "full")
                .with_weekend_slot("9:00", "X"),
        ]
    }

    #[test]
    fn test_hour_sequences() {
        let weekday = DayClass::Weekday.hours();
        assert_eq!(weekday.len(), 14);
        assert_eq!(weekday.first(), Some(&"19:00"));
        assert_eq!(weekday.last(), Some(&"8:00"));

        let weekend = DayClass::Weekend.hours();
        assert_eq!(weekend.len(), 24);
        assert_eq!(&weekend[..14], weekday);
        assert_eq!(weekend[14], "9:00");
        assert_eq!(weekend.last(), Some(&"18:00"));
    }

    #[test]
    fn test_jobs_at_hour_ignores_blank_cells() {
        let records = sample();
        let refs: Vec<&BackupRecord> = records.iter().collect();

        assert_eq!(jobs_at_hour(&refs, DayClass::Weekday, "22:00").len(), 3);
        assert_eq!(jobs_at_hour(&refs, DayClass::Weekday, "23:00").len(), 1);
        assert!(jobs_at_hour(&refs, DayClass::Weekday, "0:00").is_empty());
        assert!(jobs_at_hour(&refs, DayClass::Weekday, "9:00").is_empty());
        assert_eq!(jobs_at_hour(&refs, DayClass::Weekend, "9:00").len(), 1);
    }

    #[test]
    fn test_schedule_stats_cover_every_hour() {
        let records = sample();
        let refs: Vec<&BackupRecord> = records.iter().collect();
        let stats = schedule_stats(&refs, DayClass::Weekday);

        assert_eq!(stats.hours.len(), 14);
        let ten_pm = stats.get("22:00").unwrap();
        assert_eq!(ten_pm.count, 3);
        assert_eq!(ten_pm.types, vec!["SAP", "VMware"]);
        assert_eq!(ten_pm.locations, vec!["SP", "RJ"]);
        assert_eq!(ten_pm.band(), IntensityBand::Medium);

        let seven_pm = stats.get("19:00").unwrap();
        assert_eq!(seven_pm.count, 0);
        assert!(seven_pm.types.is_empty());
        assert!(seven_pm.locations.is_empty());
    }

    #[test]
    fn test_peak_hours() {
        let records = sample();
        let refs: Vec<&BackupRecord> = records.iter().collect();
        let stats = schedule_stats(&refs, DayClass::Weekday);

        let peaks: Vec<&str> = peak_hours(&stats).iter().map(|s| s.hour).collect();
        assert_eq!(peaks, vec!["22:00"]);
    }

    #[test]
    fn test_no_peak_when_nothing_scheduled() {
        let records = vec![
            BackupRecord::new("A", "SP").with_client("c1"),
            BackupRecord::new("B", "SP").with_client("c2").with_weekend_slot("10:00", "X"),
        ];
        let refs: Vec<&BackupRecord> = records.iter().collect();

        let stats = schedule_stats(&refs, DayClass::Weekday);
        assert!(peak_hours(&stats).is_empty());
        assert!(peak_hours(&schedule_stats(&[], DayClass::Weekend)).is_empty());
    }

    #[test]
    fn test_ties_produce_multiple_peaks() {
        let records = vec![
            BackupRecord::new("A", "SP").with_weekend_slot("20:00", "X"),
            BackupRecord::new("B", "SP").with_weekend_slot("18:00", "X"),
        ];
        let refs: Vec<&BackupRecord> = records.iter().collect();
        let stats = schedule_stats(&refs, DayClass::Weekend);

        let peaks: Vec<&str> = peak_hours(&stats).iter().map(|s| s.hour).collect();
        assert_eq!(peaks, vec!["20:00", "18:00"]);
    }

    #[test]
    fn test_intensity_band_boundaries() {
        assert_eq!(IntensityBand::from_count(0), IntensityBand::None);
        assert_eq!(IntensityBand::from_count(1), IntensityBand::Low);
        assert_eq!(IntensityBand::from_count(2), IntensityBand::Low);
        assert_eq!(IntensityBand::from_count(3), IntensityBand::Medium);
        assert_eq!(IntensityBand::from_count(5), IntensityBand::Medium);
        assert_eq!(IntensityBand::from_count(6), IntensityBand::High);
        assert_eq!(IntensityBand::from_count(10), IntensityBand::High);
        assert_eq!(IntensityBand::from_count(11), IntensityBand::Critical);
        assert_eq!(IntensityBand::from_count(500), IntensityBand::Critical);
    }

    #[test]
    fn test_legend_order() {
        let legend = IntensityBand::legend();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0], (IntensityBand::None, "0 jobs"));
        assert_eq!(legend[4], (IntensityBand::Critical, "11+ jobs"));
    }

    #[test]
    fn test_day_class_parse() {
        assert_eq!("weekdays".parse::<DayClass>().unwrap(), DayClass::Weekday);
        assert_eq!("Weekend".parse::<DayClass>().unwrap(), DayClass::Weekend);
        assert!("sunday".parse::<DayClass>().is_err());
        assert_eq!(DayClass::Weekday.toggle(), DayClass::Weekend);
    }
}
