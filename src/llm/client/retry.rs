//! 有界重试策略：固定次数、固定间隔，不做指数退避
//!
//! 每次尝试都是一次计费的API调用，`max_attempts`必须被严格遵守。

use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::error::GenerationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含首次调用）
    pub max_attempts: u32,
    /// 两次尝试之间的固定间隔
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        Self::new(
            config.retry_attempts,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// 仅对瞬时错误重试
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T, GenerationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
    {
        self.run_while(operation, GenerationError::is_transient)
            .await
    }

    /// 通用重试逻辑，`should_retry`决定某个错误是否消耗一次重试机会后再次尝试。
    /// `operation`接收从1开始的尝试序号。
    pub async fn run_while<T, F, Fut, P>(
        &self,
        mut operation: F,
        should_retry: P,
    ) -> Result<T, GenerationError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GenerationError>>,
        P: Fn(&GenerationError) -> bool,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation(attempt).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if attempt >= self.max_attempts || !should_retry(&err) {
                        return Err(err);
                    }
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "LLM call failed, retrying"
                    );
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        attempt, self.max_attempts, err
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = fast_policy()
            .run(move |_| async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(GenerationError::TransientApi(format!("failure {}", n)))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_always_failing_stops_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<(), _> = fast_policy()
            .run(move |_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::Timeout(1))
            })
            .await;

        assert!(matches!(result, Err(GenerationError::Timeout(1))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<(), _> = fast_policy()
            .run(move |_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(GenerationError::MissingResource("keys".to_string()))
            })
            .await;

        assert!(matches!(result, Err(GenerationError::MissingResource(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_does_not_sleep() {
        let policy = RetryPolicy::new(1, Duration::from_secs(3600));
        let started = std::time::Instant::now();
        let result: Result<(), _> = policy
            .run(|_| async { Err(GenerationError::TransientApi("down".to_string())) })
            .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_attempt_numbers_start_at_one() {
        let seen = std::sync::Mutex::new(Vec::new());
        let _: Result<(), _> = fast_policy()
            .run(|attempt| {
                seen.lock().unwrap().push(attempt);
                async { Err(GenerationError::TransientApi("x".to_string())) }
            })
            .await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_attempts_is_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
    }
}
