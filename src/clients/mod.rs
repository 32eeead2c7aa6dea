//! 客户端层（Clients）
//!
//! 负责与外部生成 API 的交互。`GenerateText` 是编排层依赖的能力接口，
//! 生产实现是 `GeminiClient`，测试中可以用脚本化的假客户端替换

pub mod gemini_client;

pub use gemini_client::GeminiClient;

use crate::error::ClientError;

/// 文本生成能力
///
/// 约定：一次调用对应一次外部 API 请求，带有界超时，内部不重试
/// （重试/跳过策略属于编排层），失败时按 `ClientError` 分类返回
#[allow(async_fn_in_trait)]
pub trait GenerateText {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError>;
}
