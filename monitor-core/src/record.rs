use crate::constants::{data, fields};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// 备份窗口：时间槽标签 -> 单元格内容（非空即表示该时段有任务）
pub type ScheduleWindow = BTreeMap<String, String>;

/// 一条备份策略记录
///
/// 字段映射在加载时一次性完成，之后只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    #[serde(rename = "Policies JOBs", default, deserialize_with = "required_text")]
    pub policy_name: String,

    #[serde(rename = "Localidade", default, deserialize_with = "required_text")]
    pub location: String,

    #[serde(
        rename = "Type",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub backup_type: Option<String>,

    #[serde(
        rename = "Media Server",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_server: Option<String>,

    #[serde(
        rename = "Storage Unit",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_unit: Option<String>,

    #[serde(
        rename = "Client",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub client: Option<String>,

    #[serde(
        rename = "Backup Selections",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub backup_selections: Option<String>,

    #[serde(
        rename = "SLP",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub slp: Option<String>,

    #[serde(
        rename = "Janela de Backup Diário (Seg-Qui)",
        default,
        deserialize_with = "optional_schedule",
        skip_serializing_if = "Option::is_none"
    )]
    pub weekday_schedule: Option<ScheduleWindow>,

    #[serde(
        rename = "Janela de Backup Diário (Sex-Sab)",
        default,
        deserialize_with = "optional_schedule",
        skip_serializing_if = "Option::is_none"
    )]
    pub weekend_schedule: Option<ScheduleWindow>,
}

/// 任务状态（仅由 Client 字段决定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Active,
    Inactive,
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Active => "Active",
            JobStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl BackupRecord {
    /// 以两个必填键创建记录，其余字段为空
    pub fn new(policy_name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            policy_name: policy_name.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, backup_type: impl Into<String>) -> Self {
        self.backup_type = Some(backup_type.into());
        self
    }

    pub fn with_media_server(mut self, media_server: impl Into<String>) -> Self {
        self.media_server = Some(media_server.into());
        self
    }

    pub fn with_storage_unit(mut self, storage_unit: impl Into<String>) -> Self {
        self.storage_unit = Some(storage_unit.into());
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn with_selections(mut self, selections: impl Into<String>) -> Self {
        self.backup_selections = Some(selections.into());
        self
    }

    pub fn with_slp(mut self, slp: impl Into<String>) -> Self {
        self.slp = Some(slp.into());
        self
    }

    /// 设置工作日窗口中的一个时间槽
    pub fn with_weekday_slot(mut self, hour: &str, value: impl Into<String>) -> Self {
        self.weekday_schedule
            .get_or_insert_with(ScheduleWindow::new)
            .insert(hour.to_string(), value.into());
        self
    }

    /// 设置周末窗口中的一个时间槽
    pub fn with_weekend_slot(mut self, hour: &str, value: impl Into<String>) -> Self {
        self.weekend_schedule
            .get_or_insert_with(ScheduleWindow::new)
            .insert(hour.to_string(), value.into());
        self
    }

    /// Client 存在且去除空白后非空即为活动任务
    pub fn is_active(&self) -> bool {
        non_blank(self.client.as_deref()).is_some()
    }

    pub fn status(&self) -> JobStatus {
        if self.is_active() {
            JobStatus::Active
        } else {
            JobStatus::Inactive
        }
    }

    /// 备份类型分组键，缺失时为 "Unspecified"
    pub fn backup_type_label(&self) -> &str {
        non_blank(self.backup_type.as_deref()).unwrap_or(data::UNSPECIFIED_LABEL)
    }

    /// 媒体服务器分组键，缺失时为 "Unspecified"
    pub fn media_server_label(&self) -> &str {
        non_blank(self.media_server.as_deref()).unwrap_or(data::UNSPECIFIED_LABEL)
    }

    pub fn kind(&self) -> BackupKind {
        BackupKind::classify(self.backup_type.as_deref())
    }

    pub fn client_or_empty(&self) -> &str {
        self.client.as_deref().unwrap_or("")
    }

    pub fn media_server_or_empty(&self) -> &str {
        self.media_server.as_deref().unwrap_or("")
    }

    /// 表格展示用：缺失或空白字段显示为 "N/A"
    pub fn display_or_na(value: Option<&str>) -> &str {
        non_blank(value).unwrap_or(data::NOT_AVAILABLE)
    }

    /// 策略详情：(标签, 显示值)，缺失字段显示为 "N/A"
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        let na = Self::display_or_na;
        vec![
            ("Policy/Job", self.policy_name.as_str()),
            ("Location", self.location.as_str()),
            ("Type", na(self.backup_type.as_deref())),
            ("Client", na(self.client.as_deref())),
            ("Media Server", na(self.media_server.as_deref())),
            ("Storage Unit", na(self.storage_unit.as_deref())),
            ("SLP", na(self.slp.as_deref())),
            ("Backup Selections", na(self.backup_selections.as_deref())),
            ("Status", self.status().label()),
        ]
    }

    /// 缺失必填键（策略名或站点）
    pub fn missing_required_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.policy_name.trim().is_empty() {
            missing.push(fields::POLICY_NAME);
        }
        if self.location.trim().is_empty() {
            missing.push(fields::LOCATION);
        }
        missing
    }
}

/// 去除空白后为空的值视为缺失
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// 备份技术分类
///
/// 类型集合是开放的：未知的非空类型归入 `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupKind {
    Windows,
    SqlServer,
    Sap,
    VMware,
    Exchange,
    Catalog,
    Standard,
    FlashBackupWindows,
    Other,
    Unspecified,
}

/// 原始类型名到分类的规则表
const KIND_RULES: [(&str, BackupKind); 8] = [
    ("MS-Windows", BackupKind::Windows),
    ("MS-SQL-Server", BackupKind::SqlServer),
    ("SAP", BackupKind::Sap),
    ("VMware", BackupKind::VMware),
    ("MS-Exchange-Server", BackupKind::Exchange),
    ("NBU-Catalog", BackupKind::Catalog),
    ("Standard", BackupKind::Standard),
    ("FlashBackup-Windows", BackupKind::FlashBackupWindows),
];

impl BackupKind {
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = non_blank(raw) else {
            return BackupKind::Unspecified;
        };
        let raw = raw.trim();
        KIND_RULES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, kind)| *kind)
            .unwrap_or(BackupKind::Other)
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(value))
}

fn required_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

fn optional_schedule<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<ScheduleWindow>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(
            map.into_iter()
                .filter_map(|(hour, cell)| value_to_text(cell).map(|text| (hour, text)))
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_show_slp_and_selections() {
        let record = BackupRecord::new("SP_SQL_01", "SP")
            .with_type("MS-SQL-Server")
            .with_client("sp-sql01")
            .with_storage_unit("stu-sp-01")
            .with_slp("SLP_SP_30D")
            .with_selections("WHOLE_DATABASE");

        let details = record.details();
        let value = |label: &str| {
            details
                .iter()
                .find(|(name, _)| *name == label)
                .map(|(_, value)| *value)
        };
        assert_eq!(value("Storage Unit"), Some("stu-sp-01"));
        assert_eq!(value("SLP"), Some("SLP_SP_30D"));
        assert_eq!(value("Backup Selections"), Some("WHOLE_DATABASE"));
        assert_eq!(value("Status"), Some("Active"));

        let bare = BackupRecord::new("RJ_BARE", "RJ").with_slp("  ");
        let missing = ["Storage Unit", "SLP", "Backup Selections"];
        for (name, value) in bare.details() {
            if missing.contains(&name) {
                assert_eq!(value, "N/A", "{name}");
            }
        }
    }

    #[test]
    fn test_active_status_requires_non_blank_client() {
        let blank = BackupRecord::new("P1", "NY").with_client("");
        let spaces = BackupRecord::new("P2", "NY").with_client("   ");
        let padded = BackupRecord::new("P3", "NY").with_client(" Acme ");
        let missing = BackupRecord::new("P4", "NY");

        assert!(!blank.is_active());
        assert!(!spaces.is_active());
        assert!(padded.is_active());
        assert!(!missing.is_active());
        assert_eq!(padded.status(), JobStatus::Active);
        assert_eq!(missing.status().label(), "Inactive");
    }

    #[test]
    fn test_labels_fall_back_to_unspecified() {
        let record = BackupRecord::new("P1", "NY").with_type("  ");
        assert_eq!(record.backup_type_label(), "Unspecified");
        assert_eq!(record.media_server_label(), "Unspecified");
        assert_eq!(record.client_or_empty(), "");
        assert_eq!(BackupRecord::display_or_na(record.storage_unit.as_deref()), "N/A");
    }

    #[test]
    fn test_deserialize_dataset_keys() {
        let json = r#"{
            "Localidade": "SP",
            "Policies JOBs": "POL_FS_01",
            "Type": "MS-Windows",
            "Media Server": "media01",
            "Storage Unit": "stu-disk",
            "Client": "srv-file01",
            "Backup Selections": "ALL_LOCAL_DRIVES",
            "SLP": null,
            "Janela de Backup Diário (Seg-Qui)": {"22:00": "X", "23:00": ""},
            "Janela de Backup Diário (Sex-Sab)": ""
        }"#;

        let record: BackupRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.location, "SP");
        assert_eq!(record.policy_name, "POL_FS_01");
        assert_eq!(record.kind(), BackupKind::Windows);
        assert_eq!(record.slp, None);
        let weekday = record.weekday_schedule.as_ref().unwrap();
        assert_eq!(weekday.get("22:00").map(String::as_str), Some("X"));
        assert!(record.weekend_schedule.is_none());
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_numeric_fields() {
        let json = r#"{"Client": 1234, "Janela de Backup Diário (Seg-Qui)": {"1:00": 1, "2:00": null}}"#;

        let record: BackupRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.policy_name, "");
        assert_eq!(record.location, "");
        assert_eq!(record.client.as_deref(), Some("1234"));
        let weekday = record.weekday_schedule.unwrap();
        assert_eq!(weekday.len(), 1);
        assert_eq!(weekday.get("1:00").map(String::as_str), Some("1"));
        assert_eq!(
            BackupRecord::default().missing_required_keys(),
            vec!["Policies JOBs", "Localidade"]
        );
    }

    #[test]
    fn test_kind_rule_table() {
        assert_eq!(BackupKind::classify(Some("VMware")), BackupKind::VMware);
        assert_eq!(BackupKind::classify(Some("NBU-Catalog")), BackupKind::Catalog);
        assert_eq!(BackupKind::classify(Some("Oracle")), BackupKind::Other);
        assert_eq!(BackupKind::classify(None), BackupKind::Unspecified);
    }
}
