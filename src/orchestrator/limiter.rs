//! 并发限流器 - 编排层
//!
//! 基于 `tokio::sync::Semaphore` 的准入闸门：
//!
//! - `acquire()` 只挂起调用它的任务，不阻塞线程
//! - 等待者按开始等待的先后顺序（FIFO）获得名额
//! - `LimiterPermit` 被 drop 时释放名额，任务 panic 时同样会释放

use crate::error::{AppError, AppResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 并发限流器
#[derive(Clone, Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    stats: Arc<LimiterStats>,
}

#[derive(Debug, Default)]
struct LimiterStats {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyLimiter {
    /// 创建限流器，`capacity` 必须大于等于 1
    pub fn new(capacity: usize) -> AppResult<Self> {
        if capacity == 0 {
            return Err(AppError::invalid_config(
                "max_concurrent_reviews",
                "必须大于等于 1",
            ));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            stats: Arc::new(LimiterStats::default()),
        })
    }

    /// 获取一个名额，没有空闲名额时挂起当前任务
    pub async fn acquire(&self) -> AppResult<LimiterPermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| AppError::Other(format!("限流器已关闭: {}", e)))?;

        let current = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(current, Ordering::SeqCst);

        Ok(LimiterPermit {
            _permit: permit,
            stats: Arc::clone(&self.stats),
        })
    }

    /// 最大并发数
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 当前持有名额的任务数
    pub fn in_flight(&self) -> usize {
        self.stats.in_flight.load(Ordering::SeqCst)
    }

    /// 运行期间同时持有名额的最大任务数
    pub fn peak_in_flight(&self) -> usize {
        self.stats.peak.load(Ordering::SeqCst)
    }
}

/// 限流名额，drop 时自动归还
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
    stats: Arc<LimiterStats>,
}

impl Drop for LimiterPermit {
    fn drop(&mut self) {
        // 计数先减，信号量名额随后在字段 drop 时归还
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(ConcurrencyLimiter::new(0).is_err());
    }

    #[tokio::test]
    async fn test_permit_released_on_drop() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();

        let permit = limiter.acquire().await.unwrap();
        assert_eq!(limiter.in_flight(), 1);
        drop(permit);
        assert_eq!(limiter.in_flight(), 0);

        let again = tokio::time::timeout(Duration::from_millis(100), limiter.acquire()).await;
        assert!(again.is_ok(), "释放后应能再次获取名额");
        assert_eq!(limiter.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_permit_released_on_panic() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();

        let task_limiter = limiter.clone();
        let handle = tokio::spawn(async move {
            let _permit = task_limiter.acquire().await.unwrap();
            panic!("job body failed");
        });
        assert!(handle.await.unwrap_err().is_panic());

        assert_eq!(limiter.in_flight(), 0);
        let again = tokio::time::timeout(Duration::from_millis(100), limiter.acquire()).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_waiters_admitted_in_fifo_order() {
        let limiter = ConcurrencyLimiter::new(1).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        let held = limiter.acquire().await.unwrap();

        let mut handles = Vec::new();
        for id in 1..=3 {
            let limiter = limiter.clone();
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let _permit = limiter.acquire().await.unwrap();
                order.lock().unwrap().push(id);
            }));
            // 让刚创建的任务进入等待队列
            tokio::task::yield_now().await;
        }

        drop(held);
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }
}
