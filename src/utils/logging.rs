/// 日志工具模块
///
/// 提供日志初始化和格式化的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 默认级别 info，开启详细日志时为 debug；
/// `RUST_LOG` 环境变量优先
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - MCQ 批量生成模式");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📊 模型: {}", config.gemini_model_name);
    info!(
        "📋 单批次上限: {} 道 / 批次间隔: {} 毫秒 / 缓存TTL: {} 秒",
        config.max_batch_size, config.batch_delay_ms, config.cache_ttl_secs
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_short_passthrough() {
        assert_eq!(truncate_text("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_text_long_gets_ellipsis() {
        assert_eq!(truncate_text("abcdefgh", 5), "abcde...");
    }

    #[test]
    fn test_truncate_text_counts_chars_not_bytes() {
        assert_eq!(truncate_text("数学代数题目", 4), "数学代数...");
    }
}
