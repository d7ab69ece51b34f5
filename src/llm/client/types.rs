use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::LLMConfig;
use crate::utils::token_estimator::TokenEstimator;

static TOKEN_ESTIMATOR: LazyLock<TokenEstimator> = LazyLock::new(TokenEstimator::new);

/// 对话消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 单次调用的采样参数
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    pub seed: u64,
    /// 要求模型以JSON对象形式输出
    pub json_output: bool,
}

impl SamplingParams {
    pub fn from_config(config: &LLMConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            seed: config.seed,
            json_output: true,
        }
    }
}

/// 一次模型调用的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
    /// 本次调用的费用（美元）
    pub cost: f64,
}

/// Token使用情况
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// 每百万token的价格（美元）：输入、输出
struct ModelPrice {
    prefix: &'static str,
    input: f64,
    output: f64,
}

// 前缀匹配，更具体的前缀需排在前面
const MODEL_PRICES: &[ModelPrice] = &[
    ModelPrice { prefix: "gpt-4o-mini", input: 0.15, output: 0.6 },
    ModelPrice { prefix: "gpt-4o", input: 2.5, output: 10.0 },
    ModelPrice { prefix: "gpt-4-turbo", input: 10.0, output: 30.0 },
    ModelPrice { prefix: "gpt-4-1106", input: 10.0, output: 30.0 },
    ModelPrice { prefix: "gpt-4-0125", input: 10.0, output: 30.0 },
    ModelPrice { prefix: "gpt-4", input: 30.0, output: 60.0 },
    ModelPrice { prefix: "gpt-3.5-turbo", input: 0.5, output: 1.5 },
    ModelPrice { prefix: "o1-mini", input: 3.0, output: 12.0 },
    ModelPrice { prefix: "o1", input: 15.0, output: 60.0 },
    ModelPrice { prefix: "claude-3-opus", input: 15.0, output: 75.0 },
    ModelPrice { prefix: "claude-3-5-haiku", input: 0.8, output: 4.0 },
    ModelPrice { prefix: "claude-3-haiku", input: 0.25, output: 1.25 },
    ModelPrice { prefix: "claude-3-5-sonnet", input: 3.0, output: 15.0 },
    ModelPrice { prefix: "claude-3-7-sonnet", input: 3.0, output: 15.0 },
    ModelPrice { prefix: "claude-3-sonnet", input: 3.0, output: 15.0 },
    ModelPrice { prefix: "meta-llama/", input: 0.88, output: 0.88 },
    ModelPrice { prefix: "mistralai/", input: 0.6, output: 0.6 },
    ModelPrice { prefix: "Qwen/", input: 1.2, output: 1.2 },
];

impl TokenUsage {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// 服务端不返回用量时，按请求和响应文本估算
    pub fn estimate(input_text: &str, output_text: &str) -> Self {
        Self::new(
            TOKEN_ESTIMATOR.estimate_tokens(input_text).estimated_tokens,
            TOKEN_ESTIMATOR.estimate_tokens(output_text).estimated_tokens,
        )
    }

    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }

    /// 按模型价格估算费用（美元），未知模型按0计
    pub fn estimate_cost(&self, model_name: &str) -> f64 {
        MODEL_PRICES
            .iter()
            .find(|price| model_name.starts_with(price.prefix))
            .map(|price| {
                (self.input_tokens as f64 * price.input + self.output_tokens as f64 * price.output)
                    / 1_000_000.0
            })
            .unwrap_or(0.0)
    }
}
