//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次生成请求的完整调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_planner` - 批次规划
//! - 把请求数量切成不超过上限的有序批次（纯函数）
//!
//! ### `generator` - 题目生成编排器
//! - 缓存查询 / 写入
//! - 串行驱动每个批次走 prompt → 客户端 → 提取 → 校验
//! - 批次间节奏控制
//! - 瞬时失败跳过、系统性失败中止
//! - 聚合与数量截断
//!
//! ## 层次关系
//!
//! ```text
//! generator (处理一次 GenerationRequest)
//!     ↓
//! batch_planner (切分 Vec<Batch>)
//!     ↓
//! services (能力层：prompt / extractor / validator)
//!     ↓
//! clients (外部 API：GeminiClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：planner 管切分，generator 管调度
//! 2. **向下依赖**：编排层 → services → clients
//! 3. **失败分类**：瞬时/系统性的区分只存在于本层，
//!    批次级失败绝不逐个上抛给调用方

pub mod batch_planner;
pub mod generator;

pub use generator::QuestionGenerator;
