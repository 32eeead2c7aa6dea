//! 应用装配
//!
//! 把配置、Gemini 客户端、结果缓存和编排器接到一起，
//! 并提供启动期的 API 连通性探测

use tracing::{info, warn};

use crate::cache::ResultCache;
use crate::clients::{GenerateText, GeminiClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{GenerationRequest, Question};
use crate::orchestrator::QuestionGenerator;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    generator: QuestionGenerator<GeminiClient>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        logging::log_startup(&config);

        let client = GeminiClient::new(&config)?;
        let cache = ResultCache::new();
        let generator = QuestionGenerator::new(client, cache, &config);

        Ok(Self { config, generator })
    }

    /// 启动期连通性探测
    ///
    /// 向生成 API 发一次最小请求，失败只降级为警告：
    /// 探测失败不代表真实请求一定失败，不作为致命条件
    pub async fn test_api_connection(&self) -> bool {
        info!("🔌 正在测试生成 API 连通性...");

        let probe = match GeminiClient::new(&self.config) {
            Ok(client) => client,
            Err(e) => {
                warn!("⚠️ 探测客户端创建失败: {}", e);
                return false;
            }
        };

        match probe.generate("Test connection").await {
            Ok(_) => {
                info!("✓ API 连通性正常，服务就绪");
                true
            }
            Err(e) => {
                warn!("⚠️ API 连通性测试失败: {} (请检查 API key)", e);
                false
            }
        }
    }

    /// 执行一次生成请求
    pub async fn generate(
        &self,
        topic: &str,
        sub_topic: &str,
        count: usize,
    ) -> AppResult<Vec<Question>> {
        let request = GenerationRequest::new(topic, sub_topic, count);
        self.generator.run(&request).await
    }
}
