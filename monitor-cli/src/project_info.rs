/// Backup Monitor 项目信息模块
///
/// monitor-cli 是面向用户的主程序，项目元数据统一在这里定义
/// monitor-core 作为内部库，只提供技术性常量

/// 项目元数据（自动从 monitor-cli 的 Cargo.toml 同步）
pub mod metadata {
    /// 项目描述（自动从 Cargo.toml 同步）
    pub const PROJECT_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

    /// 项目作者（自动从 Cargo.toml 同步）
    pub const PROJECT_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

    /// 用户友好的显示名称（手动维护，用于 UI 显示）
    pub mod display {
        /// 用户友好的项目名称
        pub const FRIENDLY_NAME: &str = "Backup Monitor";

        /// 项目详细描述（比 Cargo.toml 中的描述更详细）
        pub const DESCRIPTION_LONG: &str = "备份策略控制与监控仪表盘：按站点、类型、媒体服务器统计备份策略，筛选与分页浏览策略列表，分析备份窗口的时段负载并导出检查清单";
    }
}

/// 版本信息
pub mod version_info {
    /// CLI 版本（自动从 Cargo.toml 同步）
    pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

    /// 核心库版本（从 monitor-core 获取）
    pub const CORE_VERSION: &str = monitor_core::constants::version::version_info::CORE_VERSION;
}

/// 获取版本信息字符串
pub fn get_version_string() -> String {
    format!(
        "{} v{}",
        metadata::display::FRIENDLY_NAME,
        version_info::CLI_VERSION
    )
}
