use crate::constants::{config, dashboard, data, export, table};
use crate::error::{MonitorError, Result};
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// 数据源配置
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DataConfig {
    /// 为空时依次尝试默认数据文件和内置数据集
    #[serde(default)]
    pub file: String,
}

/// 策略列表配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub page_size: usize,
    pub search_media_server: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: table::DEFAULT_PAGE_SIZE,
            search_media_server: true,
        }
    }
}

/// 导出配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: String,
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            file_name: export::DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// 仪表盘配置
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub tick_rate_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: dashboard::DEFAULT_TICK_RATE_MS,
        }
    }
}

/// 数据集来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Bundled,
}

impl DataSource {
    /// 加载数据集
    pub fn open(&self) -> Result<RecordStore> {
        match self {
            DataSource::File(path) => RecordStore::load_from_file(path),
            DataSource::Bundled => RecordStore::bundled(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Bundled => "内置数据集".to_string(),
        }
    }
}

impl AppConfig {
    /// 智能查找并加载配置文件
    /// 按优先级查找：config.toml -> backup-monitor.toml -> .backup-monitor.toml -> 用户配置目录
    pub fn find_and_load_config() -> Result<Self> {
        for config_file in &config::CONFIG_FILE_CANDIDATES {
            if Path::new(config_file).exists() {
                tracing::debug!("找到配置文件: {}", config_file);
                return Self::load_from_file(config_file);
            }
        }

        if let Some(user_config) = config::get_user_config_file_path() {
            if user_config.exists() {
                tracing::debug!("找到用户配置文件: {}", user_config.display());
                return Self::load_from_file(user_config);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(Self::default())
    }

    /// 按命令行指定的路径加载；路径为默认值且文件不存在时回退到自动查找
    pub fn load_for_path(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from_file(path);
        }
        if path == Path::new(config::CONFIG_FILE_NAME) {
            return Self::find_and_load_config();
        }
        Err(MonitorError::ConfigNotFound)
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, self.to_toml_with_comments())?;
        Ok(())
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        TEMPLATE
            .replace("{data_file}", &escape_toml(&self.data.file))
            .replace("{page_size}", &self.table.page_size.to_string())
            .replace(
                "{search_media_server}",
                &self.table.search_media_server.to_string(),
            )
            .replace("{output_dir}", &escape_toml(&self.export.output_dir))
            .replace("{file_name}", &escape_toml(&self.export.file_name))
            .replace("{tick_rate_ms}", &self.dashboard.tick_rate_ms.to_string())
    }

    fn validate(&self) -> Result<()> {
        if self.table.page_size == 0 {
            return Err(MonitorError::invalid_argument("table.page_size 必须大于 0"));
        }
        if self.dashboard.tick_rate_ms == 0 {
            return Err(MonitorError::invalid_argument(
                "dashboard.tick_rate_ms 必须大于 0",
            ));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(MonitorError::invalid_argument("export.file_name 不能为空"));
        }
        Ok(())
    }

    /// 决定数据集来源：命令行 > 配置文件 > 默认数据文件 > 内置数据集
    pub fn data_source(&self, override_path: Option<&Path>) -> DataSource {
        if let Some(path) = override_path {
            return DataSource::File(path.to_path_buf());
        }
        if !self.data.file.trim().is_empty() {
            return DataSource::File(PathBuf::from(self.data.file.trim()));
        }
        let default_path = data::get_default_data_path();
        if default_path.exists() {
            return DataSource::File(default_path);
        }
        DataSource::Bundled
    }

    /// 默认导出路径
    pub fn get_export_path(&self) -> PathBuf {
        PathBuf::from(&self.export.output_dir).join(&self.export.file_name)
    }
}

/// 模板中的值位于双引号内
fn escape_toml(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
