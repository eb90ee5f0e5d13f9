use crate::aggregate::{StatusTotals, by_location, by_server, by_type, percentage};
use crate::export::{DEFAULT_COLUMNS, to_delimited_text};
use crate::filter::{FilterCriteria, Selection, StatusFilter, filter, schedule_eligible};
use crate::paginate::paginate;
use crate::record::BackupRecord;
use crate::schedule::{DayClass, peak_hours, schedule_stats};
use crate::store::RecordStore;

/// 一组覆盖各种缺失字段情况的记录
fn mixed_records() -> Vec<BackupRecord> {
    vec![
        BackupRecord::new("SP_WIN_01", "SP")
            .with_type("MS-Windows")
            .with_client("sp-fs01")
            .with_media_server("media-sp"),
        BackupRecord::new("SP_SQL_01", "SP")
            .with_type("MS-SQL-Server")
            .with_client(""),
        BackupRecord::new("RJ_VM_01", "RJ").with_type("VMware").with_client(" vc "),
        BackupRecord::new("RJ_BARE", "RJ"),
        BackupRecord::new("", ""),
        BackupRecord::new("BH_SAP", "BH")
            .with_type("SAP")
            .with_client("bh-sap")
            .with_media_server("media-bh"),
    ]
}

/// 判断 sub 是否是 all 的保序子序列（按地址比较）
fn is_ordered_subsequence(sub: &[&BackupRecord], all: &[BackupRecord]) -> bool {
    let mut iter = all.iter();
    sub.iter()
        .all(|wanted| iter.any(|candidate| std::ptr::eq(candidate, *wanted)))
}

#[test]
fn test_filter_is_ordered_subsequence_for_many_criteria() {
    let records = mixed_records();
    let searches = ["", "sp", "SQL", "media", "zzz"];
    let locations = ["all", "SP", "RJ", ""];
    let statuses = [StatusFilter::All, StatusFilter::Active, StatusFilter::Inactive];

    for search in searches {
        for location in locations {
            for status in statuses {
                for include_inactive in [true, false] {
                    let criteria = FilterCriteria::default()
                        .with_search(search)
                        .with_location(Selection::parse(location))
                        .with_status(status)
                        .with_include_inactive(include_inactive);
                    let result = filter(&records, &criteria);
                    assert!(is_ordered_subsequence(&result, &records));
                    assert!(result.iter().all(|r| criteria.matches(r)));
                }
            }
        }
    }
}

#[test]
fn test_default_criteria_is_identity() {
    let records = mixed_records();
    let criteria = FilterCriteria::default();
    assert!(criteria.is_identity());

    let result = filter(&records, &criteria);
    assert_eq!(result.len(), records.len());
    for (filtered, original) in result.iter().zip(records.iter()) {
        assert!(std::ptr::eq(*filtered, original));
    }
}

#[test]
fn test_aggregations_partition_completely() {
    let records = mixed_records();
    assert_eq!(by_location(&records).total(), records.len());
    assert_eq!(by_type(&records).total(), records.len());
    assert_eq!(by_server(&records).total(), records.len());

    let totals = StatusTotals::compute(&records);
    assert_eq!(totals.active + totals.inactive, totals.total);
    // 空键也参与分组
    assert_eq!(by_location(&records).get(""), 1);
}

#[test]
fn test_percentage_of_empty_dataset_is_defined() {
    let value = percentage(0, 0);
    assert!(!value.is_nan());
    assert_eq!(value, 0.0);
}

#[test]
fn test_engines_are_idempotent() {
    let store = RecordStore::from_records(mixed_records());
    let criteria = FilterCriteria::default().with_search("s");

    let first = filter(store.records(), &criteria);
    let second = filter(store.records(), &criteria);
    assert_eq!(first, second);

    assert_eq!(by_type(store.records()), by_type(store.records()));

    let eligible = schedule_eligible(store.records(), &Selection::All);
    assert_eq!(
        schedule_stats(&eligible, DayClass::Weekend),
        schedule_stats(&eligible, DayClass::Weekend)
    );
    assert_eq!(
        to_delimited_text(&first, &DEFAULT_COLUMNS),
        to_delimited_text(&second, &DEFAULT_COLUMNS)
    );
}

#[test]
fn test_export_uses_full_filtered_set_not_page() {
    let records: Vec<BackupRecord> = (0..45)
        .map(|i| BackupRecord::new(format!("POL_{i}"), "SP").with_client("c"))
        .collect();
    let filtered = filter(&records, &FilterCriteria::default());

    let page = paginate(&filtered, 20, 3);
    assert_eq!(page.items.len(), 5);

    let csv = to_delimited_text(&filtered, &DEFAULT_COLUMNS);
    assert_eq!(csv.lines().count(), 46);
}

#[test]
fn test_pagination_of_empty_filter_result() {
    let records = mixed_records();
    let filtered = filter(&records, &FilterCriteria::default().with_search("no-match"));
    let page = paginate(&filtered, 20, 4);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
}

#[test]
fn test_bundled_dataset_schedule_view() {
    let store = RecordStore::bundled().unwrap();
    let eligible = schedule_eligible(store.records(), &Selection::All);
    assert!(eligible.iter().all(|r| r.is_active()));

    let weekday = schedule_stats(&eligible, DayClass::Weekday);
    assert_eq!(weekday.hours.len(), 14);
    let peaks: Vec<&str> = peak_hours(&weekday).iter().map(|s| s.hour).collect();
    assert_eq!(peaks, vec!["22:00", "23:00"]);
    assert_eq!(weekday.max_count(), 5);

    let weekend = schedule_stats(&eligible, DayClass::Weekend);
    assert_eq!(weekend.hours.len(), 24);
}

#[test]
fn test_schedule_of_records_without_windows_has_no_peak() {
    let records = vec![
        BackupRecord::new("A", "SP").with_client("c1"),
        BackupRecord::new("B", "RJ").with_client("c2"),
    ];
    let eligible = schedule_eligible(&records, &Selection::All);
    let stats = schedule_stats(&eligible, DayClass::Weekday);
    assert!(peak_hours(&stats).is_empty());
    assert!(stats.hours.iter().all(|h| h.count == 0));
}
