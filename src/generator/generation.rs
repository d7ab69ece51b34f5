//! 单次生成：调用模型、解析JSON对象、在重试预算内重试，并记录每次计费调用

use serde_json::{Map, Value};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::GenerationError;
use crate::generator::parser::{expect_object, parse_json_response};
use crate::llm::client::{ChatMessage, SamplingParams};
use crate::llm::{CostMonitor, LanguageModel, RetryPolicy};

/// 一次成功生成的结果
#[derive(Debug, Clone)]
pub struct Generation {
    pub prompt: String,
    pub raw_response: String,
    pub response: Map<String, Value>,
    /// 本次生成所有计费尝试的费用之和（包含解析失败的尝试）
    pub cost: f64,
    pub attempts: u32,
}

pub struct Generator<'a> {
    model: &'a dyn LanguageModel,
    retry: RetryPolicy,
    costs: &'a CostMonitor,
    retry_on_malformed_response: bool,
}

impl<'a> Generator<'a> {
    pub fn new(model: &'a dyn LanguageModel, retry: RetryPolicy, costs: &'a CostMonitor) -> Self {
        Self {
            model,
            retry,
            costs,
            retry_on_malformed_response: true,
        }
    }

    /// 无法解析的响应是否消耗重试预算后再次调用
    pub fn retry_on_malformed_response(mut self, enabled: bool) -> Self {
        self.retry_on_malformed_response = enabled;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// 以单条user消息调用模型并解析JSON对象响应，非对象的JSON与无法解析的文本同样计入重试。
    /// `label`用于费用归类（想法名称或"idea-generation"）。
    pub async fn generate(
        &self,
        label: &str,
        prompt: String,
        sampling: &SamplingParams,
    ) -> Result<Generation, GenerationError> {
        let messages = vec![ChatMessage::user(prompt.as_str())];
        let billed = Mutex::new(0.0_f64);
        let attempts = AtomicU32::new(0);

        let fold_malformed = self.retry_on_malformed_response;
        let should_retry =
            move |err: &GenerationError| err.is_transient() || (fold_malformed && err.is_malformed());

        let (raw_response, response) = {
            let messages = &messages;
            let billed = &billed;
            let attempts = &attempts;
            self.retry
                .run_while(
                    move |attempt| async move {
                        attempts.store(attempt, Ordering::Relaxed);
                        tracing::debug!(label, attempt, model = self.model.model_name(), "calling LLM");

                        let completion = self.model.call(messages, sampling).await?;
                        self.costs
                            .record_call(label, completion.usage, completion.cost);
                        if let Ok(mut total) = billed.lock() {
                            *total += completion.cost;
                        }

                        let response = expect_object(parse_json_response(&completion.text)?)?;
                        Ok::<_, GenerationError>((completion.text, response))
                    },
                    should_retry,
                )
                .await?
        };

        let cost = billed.lock().map(|total| *total).unwrap_or_default();
        Ok(Generation {
            prompt,
            raw_response,
            response,
            cost,
            attempts: attempts.load(Ordering::Relaxed),
        })
    }
}
