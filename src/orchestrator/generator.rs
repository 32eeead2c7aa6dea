//! 题目生成编排器 - 编排层
//!
//! ## 职责
//!
//! 驱动一次完整的生成请求：缓存查询 → 批次规划 → 逐批次
//! prompt/调用/提取/校验 → 聚合 → 缓存写入。
//!
//! ## 核心决策
//!
//! 1. **批次严格串行**：一个请求内的批次绝不并行，相邻调用之间插入
//!    固定间隔（最后一批之后跳过）。并行派发实测会不成比例地触发
//!    上游频率限制，这里用延迟换可靠性
//! 2. **瞬时失败跳过**：频率限制/超时/网络/上游抖动/坏内容的批次按
//!    贡献零道题处理，继续下一批；一个坏批次不应拖垮整个请求
//! 3. **系统性失败中止**：403/400 说明凭证或请求格式有问题，换一批
//!    也不会好，立即中止且不写缓存
//! 4. **欠交付算成功**：最终聚合数量非零但少于请求数时按成功返回，
//!    调用方必须容忍少于请求数量的结果；仅数量为零时报失败

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::cache::ResultCache;
use crate::clients::GenerateText;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Batch, GenerationRequest, Question};
use crate::orchestrator::batch_planner;
use crate::services::{build_mcq_prompt, extract_json_array, validate_questions};

/// 题目生成编排器
///
/// 对客户端能力 `GenerateText` 泛型，测试中可注入脚本化客户端
pub struct QuestionGenerator<C: GenerateText> {
    client: C,
    cache: ResultCache,
    max_batch_size: usize,
    batch_delay: Duration,
    cache_ttl: Duration,
}

impl<C: GenerateText> QuestionGenerator<C> {
    pub fn new(client: C, cache: ResultCache, config: &Config) -> Self {
        Self {
            client,
            cache,
            max_batch_size: config.max_batch_size,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
        }
    }

    /// 执行一次生成请求
    ///
    /// 返回至多 `request.count` 道题目；聚合数量为零或发生系统性
    /// 中止时返回 `GenerationFailed`
    pub async fn run(&self, request: &GenerationRequest) -> AppResult<Vec<Question>> {
        request.validate()?;

        // 1. 缓存查询，命中则零外部调用
        let fingerprint = request.fingerprint();
        if let Some(cached) = self.cache.get(&fingerprint) {
            info!(
                "✓ 缓存命中: {} ({} 道题目，跳过生成)",
                fingerprint,
                cached.len()
            );
            return Ok((*cached).clone());
        }

        // 2. 批次规划
        let batches = batch_planner::plan(request.count, self.max_batch_size)?;
        info!(
            "📦 开始生成: 主题 [{} / {}]，共 {} 道题目，分 {} 批",
            request.topic,
            request.sub_topic,
            request.count,
            batches.len()
        );

        // 3. 严格串行处理各批次
        let total_batches = batches.len();
        let mut aggregated: Vec<Question> = Vec::with_capacity(request.count);

        for batch in &batches {
            match self.process_batch(request, batch, total_batches).await {
                Ok(mut questions) => {
                    info!(
                        "[批次 {}/{}] ✓ 完成，获得 {} 道题目",
                        batch.index + 1,
                        total_batches,
                        questions.len()
                    );
                    aggregated.append(&mut questions);
                }
                Err(AppError::Client(e)) if e.is_systemic() => {
                    // 凭证/请求格式问题，继续下一批也不会成功
                    error!(
                        "[批次 {}/{}] ❌ 系统性失败，中止整个请求: {}",
                        batch.index + 1,
                        total_batches,
                        e
                    );
                    return Err(AppError::GenerationFailed {
                        partial: aggregated.len(),
                    });
                }
                Err(e) => {
                    // 瞬时失败：本批贡献零道题，继续
                    warn!(
                        "[批次 {}/{}] ⚠️ 批次失败，跳过并继续: {}",
                        batch.index + 1,
                        total_batches,
                        e
                    );
                }
            }

            // 批次间节奏控制，最后一批之后跳过
            if batch.index + 1 < total_batches {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        // 4. 聚合收尾：只约束数量，不做挑选
        aggregated.truncate(request.count);

        if aggregated.is_empty() {
            error!("❌ 所有批次均未产出题目，生成失败");
            return Err(AppError::GenerationFailed { partial: 0 });
        }

        if aggregated.len() < request.count {
            warn!(
                "⚠️ 欠交付: 请求 {} 道，实际 {} 道 (按成功返回)",
                request.count,
                aggregated.len()
            );
        }

        // 5. 写缓存后返回
        self.cache
            .put(&fingerprint, aggregated.clone(), self.cache_ttl);

        info!("✅ 生成完成: {} 道题目", aggregated.len());

        Ok(aggregated)
    }

    /// 处理单个批次：prompt → 调用 → 提取 → 校验
    async fn process_batch(
        &self,
        request: &GenerationRequest,
        batch: &Batch,
        total_batches: usize,
    ) -> AppResult<Vec<Question>> {
        info!(
            "[批次 {}/{}] 🚀 请求 {} 道题目...",
            batch.index + 1,
            total_batches,
            batch.size
        );

        let prompt = build_mcq_prompt(&request.topic, &request.sub_topic, batch.size);
        let raw_text = self.client.generate(&prompt).await?;
        debug!(
            "[批次 {}/{}] 原始响应预览: {}",
            batch.index + 1,
            total_batches,
            crate::utils::truncate_text(&raw_text, 200)
        );
        let json_array = extract_json_array(&raw_text)?;
        let questions = validate_questions(&json_array, batch.size)?;

        Ok(questions)
    }
}
