//! # MCQ Generator
//!
//! 一个调用外部生成式 API 批量生成选择题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 数据模型层（Models）
//! - `models/` - 核心数据结构
//! - `Question` / `GenerationRequest` / `Batch`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个批次的文本
//! - `prompt` - 构建生成指令
//! - `extractor` - 从自由文本中宽松提取 JSON 数组
//! - `validator` - 严格校验题目结构
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - 与外部生成 API 的交互
//! - `GeminiClient` - 一次调用一个请求，按状态分类失败，不重试
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_planner` - 批次规划
//! - `orchestrator/generator` - 串行驱动批次、聚合结果、决定成败
//!
//! ### 横切组件
//! - `cache` - 指纹键控的结果缓存（TTL + 到期清除）
//! - `config` / `error` / `utils` - 配置、错误、日志
//!
//! ## 模块结构

pub mod app;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use cache::ResultCache;
pub use clients::{GenerateText, GeminiClient};
pub use config::Config;
pub use error::{AppError, AppResult, ClientError};
pub use models::{Batch, GenerationRequest, Question};
pub use orchestrator::QuestionGenerator;
