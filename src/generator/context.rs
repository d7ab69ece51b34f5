use std::sync::Arc;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{Config, LLMProvider};
use crate::generator::generation::Generator;
use crate::llm::client::SamplingParams;
use crate::llm::{CostMonitor, LLMClient, LanguageModel, RetryPolicy};

/// 一次运行的共享上下文
#[derive(Clone)]
pub struct GeneratorContext {
    /// 模型调用器
    pub llm: Arc<dyn LanguageModel>,
    /// 配置
    pub config: Config,
    /// 本次运行的费用累计
    pub costs: CostMonitor,
}

impl GeneratorContext {
    /// 根据配置创建真实的LLM客户端
    pub fn new(config: Config) -> Result<Self> {
        let llm = LLMClient::new(&config)?;
        Ok(Self::with_model(config, Arc::new(llm)))
    }

    /// 使用指定的模型实现创建上下文
    pub fn with_model(config: Config, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            llm,
            config,
            costs: CostMonitor::new(),
        }
    }

    pub fn generator(&self) -> Generator<'_> {
        Generator::new(
            self.llm.as_ref(),
            RetryPolicy::from_config(&self.config.llm),
            &self.costs,
        )
        .retry_on_malformed_response(self.config.llm.retry_on_malformed_response)
    }

    pub fn sampling(&self) -> SamplingParams {
        SamplingParams::from_config(&self.config.llm)
    }

    /// 本次运行的随机数生成器，以配置中的seed初始化
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.config.llm.seed)
    }

    /// Anthropic模型需要额外要求每个想法独立成篇
    pub fn standalone_ideas(&self) -> bool {
        self.config.llm.provider == LLMProvider::Anthropic
    }
}
