//! 批次规划 - 编排层
//!
//! 把一个大的题目请求切分成不超过上限的有序批次序列。
//! 纯函数，除入参校验外没有任何失败路径

use crate::error::{AppResult, RequestError};
use crate::models::Batch;

/// 规划批次
///
/// 产出 ⌈count / max_batch_size⌉ 个批次：先是若干满批次，
/// 余数非零时再跟一个余数批次。批次顺序只影响节奏控制，不影响正确性
pub fn plan(count: usize, max_batch_size: usize) -> AppResult<Vec<Batch>> {
    if count == 0 {
        return Err(RequestError::InvalidCount { count: 0 }.into());
    }
    if max_batch_size == 0 {
        return Err(RequestError::InvalidBatchSize { size: 0 }.into());
    }

    let full_batches = count / max_batch_size;
    let remainder = count % max_batch_size;

    let mut batches = Vec::with_capacity(full_batches + usize::from(remainder > 0));
    for index in 0..full_batches {
        batches.push(Batch {
            index,
            size: max_batch_size,
        });
    }
    if remainder > 0 {
        batches.push(Batch {
            index: full_batches,
            size: remainder,
        });
    }

    Ok(batches)
}
