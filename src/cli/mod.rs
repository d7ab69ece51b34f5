use anyhow::Result;
use clap::{ArgAction, Parser};
use clap::builder::BoolishValueParser;
use std::path::PathBuf;

use crate::config::{Config, LLMConfig, LLMProvider};
use crate::generator::idea::IdeaRequest;
use crate::generator::plan::{IdeaSelection, PlanRequest};
use crate::generator::prompt::ResearchMethod;

/// 基于检索论文生成天体物理研究想法
#[derive(Parser, Debug)]
#[command(name = "astro-idea-gen")]
#[command(about = "Brainstorm astrophysics research ideas grounded in retrieved papers.")]
#[command(version)]
pub struct IdeaArgs {
    /// 模型名称
    #[arg(long)]
    pub engine: Option<String>,

    /// LLM Provider (openai, anthropic, together)
    #[arg(long)]
    pub provider: Option<LLMProvider>,

    /// 文献调研缓存文件
    #[arg(long, alias = "paper_cache")]
    pub paper_cache: PathBuf,

    /// 想法缓存文件
    #[arg(long, alias = "idea_cache")]
    pub idea_cache: PathBuf,

    /// 是否以检索到的论文作为grounding
    #[arg(long, alias = "RAG", default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub rag: bool,

    /// 研究方法 (observational, theoretical, data_analysis, general)
    #[arg(long, default_value = "general")]
    pub method: String,

    /// 用于grounding的论文数量
    #[arg(long, alias = "grounding_k", default_value_t = 10)]
    pub grounding_k: usize,

    /// 是否在提示中列出已有想法（新想法总是追加到缓存）
    #[arg(long, alias = "append_existing_ideas", default_value_t = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub append_existing_ideas: bool,

    /// 最大输出tokens
    #[arg(long, alias = "max_tokens")]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub temperature: Option<f64>,

    #[arg(long, alias = "top_p")]
    pub top_p: Option<f64>,

    /// 生成的想法数量
    #[arg(long, alias = "ideas_n", default_value_t = 5)]
    pub ideas_n: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    /// 出错时返回完整的错误链
    #[arg(long)]
    pub debug: bool,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API凭据文件路径
    #[arg(long)]
    pub keys: Option<PathBuf>,

    /// 自定义示例想法文件
    #[arg(long)]
    pub examples: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

/// 将想法扩展为完整的实验计划
#[derive(Parser, Debug)]
#[command(name = "astro-plan-gen")]
#[command(about = "Expand generated astrophysics research ideas into full experiment plans.")]
#[command(version)]
pub struct PlanArgs {
    /// 模型名称
    #[arg(long)]
    pub engine: Option<String>,

    /// LLM Provider (openai, anthropic, together)
    #[arg(long)]
    pub provider: Option<LLMProvider>,

    /// 想法缓存目录
    #[arg(long, alias = "idea_cache_dir")]
    pub idea_cache_dir: PathBuf,

    /// 实验计划缓存目录
    #[arg(long, alias = "experiment_plan_cache_dir")]
    pub experiment_plan_cache_dir: PathBuf,

    /// 主题缓存名称
    #[arg(long, alias = "cache_name")]
    pub cache_name: String,

    /// 想法名称，`all`表示缓存中的全部想法
    #[arg(long, alias = "idea_name")]
    pub idea_name: String,

    /// 研究方法 (observational, theoretical, data_analysis, general)
    #[arg(long, default_value = "general")]
    pub method: String,

    /// 保留的参数，计划扩展不使用grounding论文
    #[arg(long, alias = "grounding_k", default_value_t = 10)]
    pub grounding_k: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API凭据文件路径
    #[arg(long)]
    pub keys: Option<PathBuf>,

    /// 自定义计划示例文件
    #[arg(long)]
    pub examples: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

fn apply_common(
    config: &mut Config,
    engine: Option<String>,
    provider: Option<LLMProvider>,
    seed: Option<u64>,
    keys: Option<PathBuf>,
    verbose: bool,
) {
    if let Some(provider) = provider {
        config.llm.provider = provider;
    }
    if let Some(engine) = engine {
        config.llm.model = engine;
    }
    if let Some(seed) = seed {
        config.llm.seed = seed;
    }
    if let Some(keys) = keys {
        config.keys_path = keys;
    }
    config.verbose |= verbose;
}

impl IdeaArgs {
    /// 将CLI参数转换为配置：默认值 ← 配置文件 ← CLI参数
    pub fn into_config(self) -> Result<(Config, IdeaRequest)> {
        let mut config = Config::load(self.config.as_deref(), Config::default())?;

        apply_common(
            &mut config,
            self.engine,
            self.provider,
            self.seed,
            self.keys,
            self.verbose,
        );
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(top_p) = self.top_p {
            config.llm.top_p = top_p;
        }

        let request = IdeaRequest {
            paper_cache: self.paper_cache,
            idea_cache: self.idea_cache,
            rag: self.rag,
            method: ResearchMethod::parse(&self.method),
            grounding_k: self.grounding_k,
            append_existing_ideas: self.append_existing_ideas,
            ideas_n: self.ideas_n,
            examples: self.examples,
        };
        Ok((config, request))
    }
}

impl PlanArgs {
    /// 将CLI参数转换为配置：计划扩展预设 ← 配置文件 ← CLI参数
    pub fn into_config(self) -> Result<(Config, PlanRequest)> {
        let preset = Config {
            llm: LLMConfig::plan_preset(),
            ..Config::default()
        };
        let mut config = Config::load(self.config.as_deref(), preset)?;

        apply_common(
            &mut config,
            self.engine,
            self.provider,
            self.seed,
            self.keys,
            self.verbose,
        );

        let request = PlanRequest {
            idea_cache_dir: self.idea_cache_dir,
            experiment_plan_cache_dir: self.experiment_plan_cache_dir,
            cache_name: self.cache_name,
            selection: IdeaSelection::from(self.idea_name.as_str()),
            method: ResearchMethod::parse(&self.method),
            examples: self.examples,
        };
        Ok((config, request))
    }
}

// Include tests
#[cfg(test)]
mod tests;
