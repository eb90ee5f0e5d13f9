use monitor_core::config::AppConfig;
use monitor_core::constants::data;
use monitor_core::error::Result;
use std::path::Path;
use tracing::{info, warn};

/// 创建默认配置文件
pub async fn run_init(config_path: &Path, force: bool) -> Result<()> {
    info!("🗄️  Backup Monitor 初始化");
    info!("========================");

    if !force && config_path.exists() {
        warn!("⚠️  配置文件已存在: {}", config_path.display());
        info!("如果您要重新初始化，请使用 --force 参数");
        info!("示例: backup-monitor init --force");
        return Ok(());
    }

    let config = AppConfig::default();
    config.save_to_file(config_path)?;
    info!("   ✅ 创建配置文件: {}", config_path.display());

    let data_path = data::get_default_data_path();
    if data_path.exists() {
        info!("   📂 检测到数据文件: {}", data_path.display());
    } else {
        info!("   💡 未找到 {}，将使用内置数据集", data_path.display());
        info!("      可在配置文件 [data] file 中指定数据文件");
    }

    info!("🎉 初始化完成！");
    info!("📝 接下来可以执行:");
    info!("   backup-monitor summary     (查看汇总统计)");
    info!("   backup-monitor list        (浏览策略列表)");
    info!("   backup-monitor dashboard   (打开终端仪表盘)");
    Ok(())
}
