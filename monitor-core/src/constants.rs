/// 数据集相关常量
pub mod data {
    use std::path::{Path, PathBuf};

    /// 默认数据目录名
    pub const DATA_DIR_NAME: &str = "data";

    /// 默认数据文件名
    pub const DEFAULT_DATA_FILE: &str = "backup_data.json";

    /// 缺失字段的统一显示文本
    pub const NOT_AVAILABLE: &str = "N/A";

    /// 类型/服务器缺失时的分组标签
    pub const UNSPECIFIED_LABEL: &str = "Unspecified";

    /// 获取默认数据文件路径（跨平台）
    pub fn get_default_data_path() -> PathBuf {
        Path::new(".").join(DATA_DIR_NAME).join(DEFAULT_DATA_FILE)
    }
}

/// 数据文件中的原始字段名
///
/// 数据来自巴西站点的导出表格，键名保持原样
pub mod fields {
    pub const LOCATION: &str = "Localidade";
    pub const POLICY_NAME: &str = "Policies JOBs";
    pub const WEEKDAY_SCHEDULE: &str = "Janela de Backup Diário (Seg-Qui)";
    pub const WEEKEND_SCHEDULE: &str = "Janela de Backup Diário (Sex-Sab)";
}

/// 备份窗口时间槽
pub mod schedule {
    /// 工作日（周一至周四）夜间窗口，共 14 个时间槽
    pub const WEEKDAY_HOURS: [&str; 14] = [
        "19:00", "20:00", "21:00", "22:00", "23:00", "0:00", "1:00", "2:00", "3:00", "4:00",
        "5:00", "6:00", "7:00", "8:00",
    ];

    /// 周末（周五至周六）窗口：工作日时间槽之后追加 9:00 到 18:00，共 24 个
    pub const WEEKEND_HOURS: [&str; 24] = [
        "19:00", "20:00", "21:00", "22:00", "23:00", "0:00", "1:00", "2:00", "3:00", "4:00",
        "5:00", "6:00", "7:00", "8:00", "9:00", "10:00", "11:00", "12:00", "13:00", "14:00",
        "15:00", "16:00", "17:00", "18:00",
    ];
}

/// 列表分页相关常量
pub mod table {
    /// 默认每页条数
    pub const DEFAULT_PAGE_SIZE: usize = 20;
}

/// 导出相关常量
pub mod export {
    /// 默认导出文件名
    pub const DEFAULT_FILE_NAME: &str = "backup_checklist.csv";

    /// 字段分隔符
    pub const DELIMITER: char = ',';

    /// 字段包裹引号
    pub const QUOTE: char = '"';

    /// 行分隔符
    pub const LINE_SEPARATOR: &str = "\n";
}

/// 仪表盘相关常量
pub mod dashboard {
    /// 时钟刷新间隔（毫秒）
    pub const DEFAULT_TICK_RATE_MS: u64 = 1000;

    /// 仪表盘日志文件名
    pub const LOG_FILE_NAME: &str = "backup-monitor.log";
}

/// 配置文件相关常量
pub mod config {
    use std::path::PathBuf;

    /// 默认配置文件名
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// 按优先级查找的配置文件名
    pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
        ["config.toml", "backup-monitor.toml", ".backup-monitor.toml"];

    /// 用户配置目录下的子目录名
    pub const USER_CONFIG_DIR_NAME: &str = "backup-monitor";

    /// 获取用户级配置文件路径（如 ~/.config/backup-monitor/config.toml）
    pub fn get_user_config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }
}

/// 版本信息
pub mod version {
    pub mod version_info {
        /// 核心库版本
        pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
    }
}
