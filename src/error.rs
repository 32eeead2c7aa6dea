use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 调用方请求错误
    Request(RequestError),
    /// 外部生成 API 调用错误
    Client(ClientError),
    /// 响应提取错误
    Extract(ExtractError),
    /// 题目校验错误
    Validate(ValidateError),
    /// 配置错误
    Config(ConfigError),
    /// 生成最终失败（partial 为已聚合的题目数量）
    GenerationFailed { partial: usize },
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Request(e) => write!(f, "请求错误: {}", e),
            AppError::Client(e) => write!(f, "生成API错误: {}", e),
            AppError::Extract(e) => write!(f, "提取错误: {}", e),
            AppError::Validate(e) => write!(f, "校验错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::GenerationFailed { partial } => {
                write!(f, "题目生成失败 (已聚合 {} 道题目)", partial)
            }
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Request(e) => Some(e),
            AppError::Client(e) => Some(e),
            AppError::Extract(e) => Some(e),
            AppError::Validate(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::GenerationFailed { .. } | AppError::Other(_) => None,
        }
    }
}

/// 调用方请求错误
///
/// 对应前门的 400 场景：缺少参数或参数非法
#[derive(Debug)]
pub enum RequestError {
    /// 主题为空
    EmptyTopic,
    /// 子主题为空
    EmptySubTopic,
    /// 题目数量非法（必须 ≥ 1）
    InvalidCount { count: i64 },
    /// 批次大小非法（必须 ≥ 1）
    InvalidBatchSize { size: i64 },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::EmptyTopic => write!(f, "主题不能为空"),
            RequestError::EmptySubTopic => write!(f, "子主题不能为空"),
            RequestError::InvalidCount { count } => {
                write!(f, "题目数量非法: {} (必须 ≥ 1)", count)
            }
            RequestError::InvalidBatchSize { size } => {
                write!(f, "批次大小非法: {} (必须 ≥ 1)", size)
            }
        }
    }
}

impl std::error::Error for RequestError {}

/// 外部生成 API 调用错误
///
/// 按 HTTP 状态分类，客户端只分类、不重试（重试策略属于编排层）
#[derive(Debug)]
pub enum ClientError {
    /// 客户端侧超时
    Timeout,
    /// 请求频率限制 (429)
    RateLimited,
    /// 凭证被拒绝 (403)
    Forbidden,
    /// 请求格式错误 (400)
    BadRequest,
    /// 连接层网络错误
    Network {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 其他非 2xx 上游状态
    Upstream { status: u16 },
    /// 传输成功但响应中没有可用文本
    MalformedResponse,
}

impl ClientError {
    /// 系统性错误：说明整个请求都不可能成功（凭证/请求格式问题），
    /// 编排层遇到时立即中止；其余错误按瞬时错误处理（跳过当前批次）
    pub fn is_systemic(&self) -> bool {
        matches!(self, ClientError::Forbidden | ClientError::BadRequest)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Timeout => write!(f, "API调用超时"),
            ClientError::RateLimited => write!(f, "API请求频率限制 (429)"),
            ClientError::Forbidden => write!(f, "API凭证被拒绝 (403)"),
            ClientError::BadRequest => write!(f, "API请求格式错误 (400)"),
            ClientError::Network { source } => write!(f, "网络错误: {}", source),
            ClientError::Upstream { status } => write!(f, "上游返回错误状态: {}", status),
            ClientError::MalformedResponse => write!(f, "API响应中没有可用的文本内容"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Network { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 响应提取错误
#[derive(Debug)]
pub enum ExtractError {
    /// 响应文本中找不到 JSON 数组
    NoJsonFound,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::NoJsonFound => write!(f, "响应文本中找不到JSON数组"),
        }
    }
}

impl std::error::Error for ExtractError {}

/// 题目校验错误
#[derive(Debug)]
pub enum ValidateError {
    /// JSON 语法错误或顶层不是数组
    ParseError { detail: String },
    /// 第 index 项不符合题目结构
    SchemaError { index: usize, detail: String },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::ParseError { detail } => {
                write!(f, "JSON解析失败: {}", detail)
            }
            ValidateError::SchemaError { index, detail } => {
                write!(f, "第 {} 项结构非法: {}", index, detail)
            }
        }
    }
}

impl std::error::Error for ValidateError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量不存在
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarNotFound { var_name } => {
                write!(f, "环境变量 {} 不存在", var_name)
            }
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        AppError::Request(err)
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::Client(err)
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Extract(err)
    }
}

impl From<ValidateError> for AppError {
    fn from(err: ValidateError) -> Self {
        AppError::Validate(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validate(ValidateError::ParseError {
            detail: err.to_string(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
