//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Prompt, PromptError},
};
use serde_json::{Map, Value, json};

use crate::config::{LLMConfig, LLMProvider};
use crate::llm::client::types::SamplingParams;

/// 统一的Provider客户端枚举，由配置选择，取值范围固定
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Anthropic(rig::providers::anthropic::Client),
    Together(rig::providers::together::Client),
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig, api_key: &str) -> Result<Self> {
        match config.provider {
            LLMProvider::OpenAI => {
                let mut builder = rig::providers::openai::Client::builder(api_key);
                if let Some(base_url) = &config.api_base_url {
                    builder = builder.base_url(base_url);
                }
                Ok(ProviderClient::OpenAI(builder.build()))
            }
            LLMProvider::Anthropic => {
                let client = rig::providers::anthropic::ClientBuilder::new(api_key).build()?;
                Ok(ProviderClient::Anthropic(client))
            }
            LLMProvider::Together => {
                let client = rig::providers::together::Client::builder(api_key).build();
                Ok(ProviderClient::Together(client))
            }
        }
    }

    pub fn provider(&self) -> LLMProvider {
        match self {
            ProviderClient::OpenAI(_) => LLMProvider::OpenAI,
            ProviderClient::Anthropic(_) => LLMProvider::Anthropic,
            ProviderClient::Together(_) => LLMProvider::Together,
        }
    }

    /// 按本次调用的采样参数创建Agent
    pub fn create_agent(
        &self,
        model: &str,
        preamble: &str,
        sampling: &SamplingParams,
    ) -> ProviderAgent {
        let extra = additional_params(self.provider(), sampling);

        match self {
            ProviderClient::OpenAI(client) => {
                let mut builder = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .max_tokens(sampling.max_tokens.into())
                    .temperature(sampling.temperature);
                if !preamble.is_empty() {
                    builder = builder.preamble(preamble);
                }
                if let Some(extra) = extra {
                    builder = builder.additional_params(extra);
                }
                ProviderAgent::OpenAI(builder.build())
            }
            ProviderClient::Anthropic(client) => {
                let mut builder = client
                    .agent(model)
                    .max_tokens(sampling.max_tokens.into())
                    .temperature(sampling.temperature);
                if !preamble.is_empty() {
                    builder = builder.preamble(preamble);
                }
                if let Some(extra) = extra {
                    builder = builder.additional_params(extra);
                }
                ProviderAgent::Anthropic(builder.build())
            }
            ProviderClient::Together(client) => {
                let mut builder = client
                    .agent(model)
                    .max_tokens(sampling.max_tokens.into())
                    .temperature(sampling.temperature);
                if !preamble.is_empty() {
                    builder = builder.preamble(preamble);
                }
                if let Some(extra) = extra {
                    builder = builder.additional_params(extra);
                }
                ProviderAgent::Together(builder.build())
            }
        }
    }
}

/// 各provider支持的额外请求参数。
/// Anthropic不接受seed和response_format；top_p为1.0时不发送。
pub fn additional_params(provider: LLMProvider, sampling: &SamplingParams) -> Option<Value> {
    let mut params = Map::new();

    if (sampling.top_p - 1.0).abs() > f64::EPSILON {
        params.insert("top_p".to_string(), json!(sampling.top_p));
    }

    match provider {
        LLMProvider::OpenAI => {
            params.insert("seed".to_string(), json!(sampling.seed));
            if sampling.json_output {
                params.insert(
                    "response_format".to_string(),
                    json!({ "type": "json_object" }),
                );
            }
        }
        LLMProvider::Together => {
            params.insert("seed".to_string(), json!(sampling.seed));
        }
        LLMProvider::Anthropic => {}
    }

    if params.is_empty() {
        None
    } else {
        Some(Value::Object(params))
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Together(Agent<rig::providers::together::completion::CompletionModel>),
}

impl ProviderAgent {
    /// 执行prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String, PromptError> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await,
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await,
            ProviderAgent::Together(agent) => agent.prompt(prompt).await,
        }
    }
}
