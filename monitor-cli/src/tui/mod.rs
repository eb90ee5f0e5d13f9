mod events;
mod state;
mod ui;

use crate::app::CliApp;
use color_eyre::eyre::Context;
use events::{EventLoop, Message};
use state::DashboardState;
use std::time::Duration;
use tracing::{error, info, warn};

/// 运行终端仪表盘，退出前恢复终端
pub async fn run(app: &CliApp) -> color_eyre::Result<()> {
    // 安装color_eyre (跳过如果已经安装)
    if color_eyre::install().is_err() {
        warn!("color_eyre已经安装，跳过");
    }

    let mut state = DashboardState::new(
        &app.store,
        app.config.table.page_size,
        app.config.table.search_media_server,
        app.config.get_export_path(),
    );

    let mut events = EventLoop::new(Duration::from_millis(app.config.dashboard.tick_rate_ms));
    events.start();

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut events, &mut state).await;
    ratatui::restore();

    info!("仪表盘已退出");
    result
}

async fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    events: &mut EventLoop,
    state: &mut DashboardState<'_>,
) -> color_eyre::Result<()> {
    terminal.clear()?;

    while state.running {
        terminal
            .draw(|f| ui::draw(f, state))
            .context("failed to update view")?;

        match events
            .next()
            .await
            .context("unable to receive next event")?
        {
            Message::Input(key) => state.handle_key(key),
            Message::Tick => state.tick(),
            Message::Resize => {}
            Message::Error(e) => {
                error!("终端事件错误: {}", e);
                color_eyre::eyre::bail!("终端事件错误: {e}");
            }
        }
    }

    Ok(())
}
