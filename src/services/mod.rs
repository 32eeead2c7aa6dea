//! 业务能力层（Services）
//!
//! 描述"我能做什么"，只处理单个批次的文本，不关心流程顺序：
//! - `prompt` - 构建生成指令
//! - `extractor` - 从自由文本中切出 JSON 数组
//! - `validator` - 严格校验题目结构
//!
//! 三个模块都是纯函数，不持有任何资源

pub mod extractor;
pub mod prompt;
pub mod validator;

pub use extractor::extract_json_array;
pub use prompt::build_mcq_prompt;
pub use validator::validate_questions;
