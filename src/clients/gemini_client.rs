//! Gemini API 客户端
//!
//! 封装对 generateContent 接口的调用：
//! - 一次调用一个请求，带有界超时
//! - 只按 HTTP 状态分类失败，不做任何重试
//! - 成功时只取出响应里的文本字段

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::GenerateText;
use crate::config::Config;
use crate::error::{AppResult, ClientError};

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
    model_name: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    ///
    /// 超时配置在 `reqwest::Client` 上，覆盖整个请求（连接 + 读取）
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| crate::error::AppError::Other(format!("HTTP客户端创建失败: {}", e)))?;

        Ok(Self {
            http,
            api_base_url: config.gemini_api_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model_name: config.gemini_model_name.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url, self.model_name, self.api_key
        )
    }

    /// 发送一次生成请求并取回原始文本
    async fn call_generate_content(&self, prompt: &str) -> Result<String, ClientError> {
        debug!(
            "调用 Gemini API，模型: {}，prompt 长度: {} 字符",
            self.model_name,
            prompt.len()
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let err = classify_status(status.as_u16());
            warn!("Gemini API 返回错误状态 {}: {}", status, err);
            return Err(err);
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            warn!("Gemini 响应体解析失败: {}", e);
            ClientError::MalformedResponse
        })?;

        // 传输层成功但没有文本字段，同样算失败
        let text = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ClientError::MalformedResponse)?;

        debug!("Gemini API 调用成功，响应 {} 字符", text.len());

        Ok(text)
    }
}

impl GenerateText for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        self.call_generate_content(prompt).await
    }
}

/// 按 HTTP 状态分类失败
fn classify_status(status: u16) -> ClientError {
    match status {
        429 => ClientError::RateLimited,
        403 => ClientError::Forbidden,
        400 => ClientError::BadRequest,
        other => ClientError::Upstream { status: other },
    }
}

/// 把 reqwest 的传输层错误分类为超时/网络错误
fn classify_transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Network {
            source: Box::new(err),
        }
    }
}

// ========== Gemini 请求/响应结构 ==========

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
