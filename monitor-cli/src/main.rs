use clap::Parser;
use monitor_cli::{
    Cli, CliApp, Commands, report_failure, run_init, setup_dashboard_logging, setup_logging,
    startup_error_lines,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // 解析命令行参数
    let cli = Cli::parse();

    // 仪表盘占用终端，日志改为写入文件；guard 在 main 返回时释放并刷新缓冲
    let dashboard = matches!(cli.command, Commands::Dashboard);
    let _log_guard = if dashboard {
        Some(setup_dashboard_logging(cli.verbose))
    } else {
        setup_logging(cli.verbose);
        None
    };

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        if let Err(e) = run_init(&cli.config, force).await {
            report_failure(&[format!("❌ 初始化失败: {e}")], dashboard);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    let mut app = match CliApp::new(&cli.config, cli.data.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            report_failure(&startup_error_lines(&e, &cli.config), dashboard);
            return ExitCode::FAILURE;
        }
    };

    // 运行命令
    if let Err(e) = app.run(cli.command).await {
        report_failure(&[format!("❌ 操作失败: {e}")], dashboard);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
