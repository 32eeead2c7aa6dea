//! 结果缓存
//!
//! 以请求指纹为键的完成结果缓存，带按条目的过期时间：
//! - `get` 在编排之前查询，命中则完全跳过外部调用
//! - `put` 在编排成功之后写入，并调度一个到期清除任务
//! - 过期判定以查询时刻为准：即使清除任务还没来得及跑，
//!   过期条目的查询也一律按未命中处理（容忍调度器延迟）
//!
//! 每个指纹至多一个存活条目；重复 `put` 直接替换并重新调度清除。
//! 通过 generation 计数把清除任务绑定到调度它的那次 `put`，
//! 避免"新条目被旧清除任务误删"的竞态。
//!
//! 进程内存缓存，不做持久化；条目重新生成的代价很低，
//! 缓存只是短周期优化而不是持久性保证

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::models::Question;

/// 一条缓存条目
#[derive(Debug, Clone)]
struct CacheEntry {
    questions: Arc<Vec<Question>>,
    expires_at: Instant,
    /// 写入代次，清除任务只删除自己那一代的条目
    generation: u64,
}

/// 指纹键控的结果缓存
///
/// 内部是 `Arc`，克隆是廉价的句柄复制；
/// 锁内不做任何 await，读写均不会观察到半写入的条目
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    generation: Arc<AtomicU64>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询缓存
    ///
    /// 过期条目视为未命中并顺手移除（懒清除），
    /// 不依赖后台清除任务是否已经执行
    pub fn get(&self, fingerprint: &str) -> Option<Arc<Vec<Question>>> {
        let now = Instant::now();

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(fingerprint) {
                Some(entry) if now < entry.expires_at => {
                    debug!("缓存命中: {}", fingerprint);
                    return Some(Arc::clone(&entry.questions));
                }
                Some(_) => {}
                None => return None,
            }
        }

        // 条目已过期：升级为写锁做懒清除（期间条目可能已被替换，需复查）
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let expired = entries.get(fingerprint).map(|entry| now >= entry.expires_at);
        match expired {
            Some(true) => {
                entries.remove(fingerprint);
                debug!("缓存条目已过期并被懒清除: {}", fingerprint);
                None
            }
            // 复查时发现条目被并发 put 换新
            Some(false) => entries
                .get(fingerprint)
                .map(|entry| Arc::clone(&entry.questions)),
            None => None,
        }
    }

    /// 写入缓存并调度到期清除
    ///
    /// 同指纹的旧条目被直接替换；旧的清除任务醒来后发现代次不匹配，
    /// 不会误删新条目
    pub fn put(&self, fingerprint: &str, questions: Vec<Question>, ttl: Duration) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let expires_at = Instant::now() + ttl;
        let entry = CacheEntry {
            questions: Arc::new(questions),
            expires_at,
            generation,
        };

        {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            entries.insert(fingerprint.to_string(), entry);
        }

        info!(
            "💾 缓存写入: {} (TTL {} 秒)",
            fingerprint,
            ttl.as_secs()
        );

        // 到期清除任务
        let entries = Arc::clone(&self.entries);
        let fingerprint = fingerprint.to_string();
        tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            let mut entries = entries.write().unwrap_or_else(|e| e.into_inner());
            let same_generation = entries
                .get(&fingerprint)
                .map(|entry| entry.generation == generation)
                .unwrap_or(false);
            if same_generation {
                entries.remove(&fingerprint);
                debug!("缓存条目到期清除: {}", fingerprint);
            }
        });
    }

    /// 指纹是否有未过期的存活条目
    pub fn contains(&self, fingerprint: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(fingerprint)
            .map(|entry| Instant::now() < entry.expires_at)
            .unwrap_or(false)
    }

    /// 存活条目数量（含尚未懒清除的过期条目）
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<Question> {
        vec![Question {
            question: "What is the capital of France?".to_string(),
            options: vec![
                "London".into(),
                "Paris".into(),
                "Berlin".into(),
                "Madrid".into(),
            ],
            correct_answer: "Paris".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_questions() {
        let cache = ResultCache::new();
        cache.put("math|algebra|1", sample_questions(), Duration::from_secs(60));

        let hit = cache.get("math|algebra|1").expect("TTL 内应该命中");
        assert_eq!(*hit, sample_questions());
        // 再查一次，结果必须一致
        let hit2 = cache.get("math|algebra|1").expect("第二次查询也应命中");
        assert_eq!(hit, hit2);
    }

    #[tokio::test]
    async fn test_get_unknown_fingerprint_is_miss() {
        let cache = ResultCache::new();
        assert!(cache.get("unknown").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_miss_before_eviction_runs() {
        let cache = ResultCache::new();
        cache.put("k", sample_questions(), Duration::from_secs(60));

        // 只推进时钟、不让清除任务被轮询到之前先查询：
        // advance 会唤醒 sleep，但查询逻辑本身不依赖清除任务
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get("k").is_none(), "过期后必须未命中，即使任务未清除");
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_task_removes_entry() {
        let cache = ResultCache::new();
        cache.put("k", sample_questions(), Duration::from_secs(30));
        assert_eq!(cache.len(), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        // 让清除任务得到调度
        tokio::task::yield_now().await;
        assert_eq!(cache.len(), 0, "到期后清除任务应移除条目");
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_replaces_and_survives_old_eviction() {
        let cache = ResultCache::new();
        cache.put("k", sample_questions(), Duration::from_secs(10));

        // 第一个条目到期前被替换成长 TTL 的新条目
        tokio::time::advance(Duration::from_secs(5)).await;
        let mut newer = sample_questions();
        newer[0].question = "What is 2 + 2?".to_string();
        newer[0].options = vec!["2".into(), "3".into(), "4".into(), "5".into()];
        newer[0].correct_answer = "4".to_string();
        cache.put("k", newer.clone(), Duration::from_secs(60));

        // 越过旧条目的原定到期点，旧清除任务醒来后不应误删新条目
        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;

        let hit = cache.get("k").expect("新条目应该仍然存活");
        assert_eq!(*hit, newer);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let cache = ResultCache::new();
        let handle = cache.clone();
        cache.put("k", sample_questions(), Duration::from_secs(60));
        assert!(handle.contains("k"), "克隆句柄应共享同一份存储");
    }
}
