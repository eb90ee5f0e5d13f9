use monitor_core::RecordStore;
use monitor_core::config::{AppConfig, DataSource};
use monitor_core::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::Commands;
use crate::commands;

pub struct CliApp {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub data_source: DataSource,
    pub store: RecordStore,
}

impl CliApp {
    /// 加载配置并打开数据集
    pub fn new(config_path: &Path, data_override: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load_for_path(config_path)?;
        debug!("配置加载完成: {:?}", config);

        let data_source = config.data_source(data_override);
        let store = data_source.open()?;
        info!(
            "📂 已加载 {} 条备份策略 (来源: {})",
            store.len(),
            data_source.describe()
        );

        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
            data_source,
            store,
        })
    }

    /// 运行应用命令
    pub async fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { force } => crate::init::run_init(&self.config_path, force).await,
            Commands::Summary => commands::run_summary(self),
            Commands::List {
                filters,
                page,
                details,
            } => commands::run_list(self, &filters, page, details),
            Commands::Schedule {
                day,
                location,
                details,
            } => commands::run_schedule(self, day, &location, details),
            Commands::Export { filters, output } => {
                commands::run_export(self, &filters, output.as_deref())
            }
            Commands::Dashboard => commands::run_dashboard(self).await,
        }
    }
}
