use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("数据文件解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置文件未找到")]
    ConfigNotFound,

    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("自定义错误: {0}")]
    Custom(String),
}

impl MonitorError {
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
