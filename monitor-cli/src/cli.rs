use crate::project_info::{metadata, version_info};
use clap::{Args, Parser, Subcommand};
use monitor_core::filter::{FilterCriteria, Selection, StatusFilter};
use monitor_core::schedule::DayClass;
use std::path::PathBuf;

/// 策略筛选参数（list 与 export 共用）
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// 按策略名、客户端或媒体服务器搜索（不区分大小写）
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// 站点，"all" 表示全部
    #[arg(short, long, default_value = "all")]
    pub location: String,

    /// 备份类型，"all" 表示全部
    #[arg(short = 't', long = "type", default_value = "all")]
    pub backup_type: String,

    /// 状态: all, active, inactive
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    /// 隐藏非活动任务
    #[arg(long)]
    pub hide_inactive: bool,
}

impl FilterArgs {
    pub fn to_criteria(&self, search_media_server: bool) -> FilterCriteria {
        FilterCriteria::default()
            .with_search(self.search.clone())
            .with_location(Selection::parse(&self.location))
            .with_backup_type(Selection::parse(&self.backup_type))
            .with_status(self.status)
            .with_include_inactive(!self.hide_inactive)
            .with_search_media_server(search_media_server)
    }
}

/// Backup Monitor - 备份策略监控仪表盘
#[derive(Parser)]
#[command(name = "backup-monitor")]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(version = version_info::CLI_VERSION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
#[command(author = metadata::PROJECT_AUTHORS)]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// 数据文件路径（覆盖配置文件中的设置）
    #[arg(short, long, env = "BACKUP_MONITOR_DATA")]
    pub data: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 创建默认配置文件
    Init {
        /// 如果配置文件已存在，强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 显示汇总统计：站点、类型、媒体服务器分布与活动状态
    Summary,
    /// 分页列出备份策略
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// 页码（从 1 开始，超出范围时显示最后一页）
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// 逐条显示策略详情（存储单元、SLP、备份选择）
        #[arg(long)]
        details: bool,
    },
    /// 显示备份窗口的时段分布与峰值
    Schedule {
        /// 日类别: weekday (周一至周四), weekend (周五至周六)
        #[arg(long, default_value = "weekday")]
        day: DayClass,

        /// 站点，"all" 表示全部
        #[arg(short, long, default_value = "all")]
        location: String,

        /// 列出每个时段的具体任务
        #[arg(long)]
        details: bool,
    },
    /// 将筛选结果导出为 CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// 输出文件路径（默认使用配置中的导出目录与文件名）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 📊 交互式终端仪表盘
    Dashboard,
}
