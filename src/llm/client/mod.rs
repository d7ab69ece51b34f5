//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

use crate::config::{Config, LLMConfig, LLMProvider};
use crate::error::GenerationError;

mod providers;
pub mod retry;
pub mod types;

pub use providers::additional_params;
pub use retry::RetryPolicy;
pub use types::{ChatMessage, Completion, Role, SamplingParams, TokenUsage};

use providers::ProviderClient;

/// 语言模型调用接口：发送消息，返回文本和本次费用。
/// 生产实现为[`LLMClient`]，测试中可替换为脚本化的实现。
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 当前使用的模型名称
    fn model_name(&self) -> &str;

    async fn call(
        &self,
        messages: &[ChatMessage],
        sampling: &SamplingParams,
    ) -> Result<Completion, GenerationError>;
}

/// LLM客户端 - 基于rig的provider实现
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端，API KEY按配置、凭据文件、环境变量的顺序解析
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let client = ProviderClient::new(&config.llm, &api_key)?;
        Ok(Self {
            config: config.llm.clone(),
            client,
        })
    }

    pub fn provider(&self) -> LLMProvider {
        self.config.provider
    }
}

/// system消息合并为preamble，其余消息按顺序拼接为prompt
fn split_messages(messages: &[ChatMessage]) -> (String, String) {
    let join = |role: Role| {
        messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    (join(Role::System), join(Role::User))
}

#[async_trait]
impl LanguageModel for LLMClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn call(
        &self,
        messages: &[ChatMessage],
        sampling: &SamplingParams,
    ) -> Result<Completion, GenerationError> {
        let (preamble, prompt) = split_messages(messages);
        let agent = self
            .client
            .create_agent(&self.config.model, &preamble, sampling);

        let response = if self.config.timeout_seconds > 0 {
            let limit = Duration::from_secs(self.config.timeout_seconds);
            tokio::time::timeout(limit, agent.prompt(&prompt))
                .await
                .map_err(|_| GenerationError::Timeout(self.config.timeout_seconds))?
        } else {
            agent.prompt(&prompt).await
        };
        let text = response.map_err(|e| GenerationError::TransientApi(e.to_string()))?;

        let usage = TokenUsage::estimate(&format!("{}{}", preamble, prompt), &text);
        let cost = usage.estimate_cost(&self.config.model);
        Ok(Completion { text, usage, cost })
    }
}
