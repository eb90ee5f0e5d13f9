use crate::app::CliApp;
use crate::tui;
use monitor_core::error::{MonitorError, Result};
use tracing::{error, info};

/// 启动交互式终端仪表盘
pub async fn run_dashboard(app: &CliApp) -> Result<()> {
    info!("启动终端仪表盘 (数据来源: {})", app.data_source.describe());

    tui::run(app).await.map_err(|e| {
        error!("仪表盘运行失败: {}", e);
        MonitorError::custom(format!("仪表盘运行失败: {e}"))
    })
}
