use color_eyre::eyre::{OptionExt, Result};
use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 事件循环消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Input(KeyEvent),
    /// 终端尺寸变化，只需重绘
    Resize,
    Tick,
    Error(String),
}

/// 输入读取与定时刷新
///
/// 输入在阻塞任务中轮询读取，时钟由 tokio interval 驱动，两者都写入同一个通道
pub struct EventLoop {
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
    tick_rate: Duration,
    stop: Arc<AtomicBool>,
}

impl EventLoop {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            tx,
            rx,
            tick_rate,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn start(&self) {
        let input_tx = self.tx.clone();
        let stop = Arc::clone(&self.stop);
        tokio::task::spawn_blocking(move || read_input(input_tx, stop));

        let tick_tx = self.tx.clone();
        let tick_rate = self.tick_rate;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Message::Tick).is_err() {
                    break;
                }
            }
        });
        debug!("事件循环已启动，刷新间隔 {:?}", self.tick_rate);
    }

    pub async fn next(&mut self) -> Result<Message> {
        self.rx.recv().await.ok_or_eyre("事件通道已关闭")
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn read_input(tx: UnboundedSender<Message>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        let message = match event::poll(INPUT_POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Message::Input(key),
                Ok(Event::Resize(..)) => Message::Resize,
                Ok(_) => continue,
                Err(e) => Message::Error(e.to_string()),
            },
            Err(e) => Message::Error(e.to_string()),
        };

        let is_error = matches!(message, Message::Error(_));
        if tx.send(message).is_err() {
            break;
        }
        if is_error {
            warn!("终端输入读取失败，停止读取");
            break;
        }
    }
}
