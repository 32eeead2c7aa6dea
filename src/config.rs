use crate::error::{AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- Gemini API 配置 ---
    pub gemini_api_key: String,
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    /// 单次 API 调用超时（秒）
    pub request_timeout_secs: u64,
    /// 生成温度
    pub temperature: f32,
    /// 输出 token 上限
    pub max_output_tokens: u32,
    // --- 批次编排配置 ---
    /// 单个批次最多请求的题目数量
    pub max_batch_size: usize,
    /// 相邻批次之间的间隔（毫秒），用于规避上游频率限制
    pub batch_delay_ms: u64,
    // --- 缓存配置 ---
    /// 缓存条目存活时间（秒）
    pub cache_ttl_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model_name: "gemini-1.5-flash-latest".to_string(),
            request_timeout_secs: 30,
            temperature: 0.7,
            max_output_tokens: 4096,
            max_batch_size: 5,
            batch_delay_ms: 1500,
            cache_ttl_secs: 30 * 60,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// `GEMINI_API_KEY` 是必填项，缺失时直接返回配置错误（启动期致命，
    /// 不降级成逐请求失败）；其余变量缺失时使用默认值
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();

        let gemini_api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            ConfigError::EnvVarNotFound {
                var_name: "GEMINI_API_KEY".to_string(),
            }
        })?;

        Ok(Self {
            gemini_api_key,
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL")
                .unwrap_or(default.gemini_api_base_url),
            gemini_model_name: std::env::var("GEMINI_MODEL_NAME")
                .unwrap_or(default.gemini_model_name),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", default.request_timeout_secs)?,
            temperature: parse_env("GEMINI_TEMPERATURE", default.temperature)?,
            max_output_tokens: parse_env("GEMINI_MAX_OUTPUT_TOKENS", default.max_output_tokens)?,
            max_batch_size: parse_env("MAX_BATCH_SIZE", default.max_batch_size)?,
            batch_delay_ms: parse_env("BATCH_DELAY_MS", default.batch_delay_ms)?,
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", default.cache_ttl_secs)?,
            verbose_logging: parse_env("VERBOSE_LOGGING", default.verbose_logging)?,
        })
    }
}

/// 解析单个环境变量，变量不存在时回退默认值，存在但无法解析时报错
fn parse_env<T: std::str::FromStr>(var_name: &str, default: T) -> AppResult<T> {
    match std::env::var(var_name) {
        Ok(value) => value.parse().map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }
            .into()
        }),
        Err(_) => Ok(default),
    }
}
