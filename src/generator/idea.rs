//! 想法生成：读取文献调研结果，抽样grounding论文，生成一批新想法并追加到想法缓存

use rand::Rng;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::cache::{merge_idea_cache, read_json, read_json_if_exists};
use crate::error::GenerationError;
use crate::generator::context::GeneratorContext;
use crate::generator::prompt::{IdeaPromptInput, ResearchMethod, compose_idea_prompt};
use crate::generator::sampler::{MAX_EXAMPLE_IDEAS, sample_grounding, shuffle_examples};
use crate::types::{IdeaCache, LiteratureReview};

/// 内置的示例想法
pub const DEFAULT_IDEA_EXAMPLES: &str = include_str!("prompts/idea_examples.json");

const COST_LABEL: &str = "idea-generation";

#[derive(Debug, Clone)]
pub struct IdeaRequest {
    /// 文献调研缓存文件
    pub paper_cache: PathBuf,
    /// 想法缓存文件
    pub idea_cache: PathBuf,
    /// 是否以检索到的论文作为grounding
    pub rag: bool,
    pub method: ResearchMethod,
    pub grounding_k: usize,
    /// 是否在提示中列出已有想法，要求模型避开；新想法总是追加到缓存
    pub append_existing_ideas: bool,
    pub ideas_n: usize,
    /// 自定义示例想法文件（JSON对象），None时使用内置示例
    pub examples: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct IdeaRunReport {
    pub topic_description: String,
    pub idea_cache: PathBuf,
    /// 本次生成的想法名称
    pub new_ideas: Vec<String>,
    /// 缓存中累计的想法条数
    pub total_ideas: usize,
    pub cost: f64,
    pub attempts: u32,
}

async fn load_examples(path: Option<&PathBuf>) -> Result<Map<String, Value>, GenerationError> {
    match path {
        Some(path) => read_json(path).await,
        None => Ok(serde_json::from_str(DEFAULT_IDEA_EXAMPLES)?),
    }
}

/// 执行一次想法生成，任何失败都会中止本次运行
pub async fn execute<R>(
    context: &GeneratorContext,
    request: &IdeaRequest,
    rng: &mut R,
) -> Result<IdeaRunReport, GenerationError>
where
    R: Rng + ?Sized,
{
    let review: LiteratureReview = read_json(&request.paper_cache).await?;
    let topic = review.topic_description.as_str();

    if request.rag {
        println!("📚 RAG已启用，将以检索到的论文作为参考");
    } else {
        println!("📚 RAG未启用");
    }

    let existing_ideas = if request.append_existing_ideas {
        match read_json_if_exists::<IdeaCache>(&request.idea_cache).await? {
            Some(cache) => {
                println!("📎 提示中包含已有想法");
                cache.idea_names()
            }
            None => Vec::new(),
        }
    } else {
        println!("📎 提示中不包含已有想法");
        Vec::new()
    };

    let examples = load_examples(request.examples.as_ref()).await?;
    let examples = shuffle_examples(examples, MAX_EXAMPLE_IDEAS, rng)?;

    let grounding = if request.rag {
        Some(sample_grounding(&review.paper_bank, request.grounding_k, rng))
    } else {
        None
    };

    println!("🔭 主题: {}", topic);
    println!("🧠 已有想法: {} 条", existing_ideas.len());
    println!("🤖 正在生成 {} 个想法...", request.ideas_n);

    let prompt = compose_idea_prompt(&IdeaPromptInput {
        topic_description: topic,
        method: request.method,
        examples: &examples,
        ideas_n: request.ideas_n,
        grounding_papers: grounding.as_deref(),
        existing_ideas: &existing_ideas,
        standalone_ideas: context.standalone_ideas(),
    });

    let generation = context
        .generator()
        .generate(COST_LABEL, prompt, &context.sampling())
        .await?;
    println!("💰 想法生成费用: ${:.4}", generation.cost);

    let batch = generation.response;
    let new_ideas: Vec<String> = batch.keys().cloned().collect();
    let cache = merge_idea_cache(&request.idea_cache, topic, batch).await?;
    tracing::info!(
        path = %request.idea_cache.display(),
        new = new_ideas.len(),
        total = cache.total_ideas(),
        "idea cache updated"
    );

    Ok(IdeaRunReport {
        topic_description: review.topic_description.clone(),
        idea_cache: request.idea_cache.clone(),
        new_ideas,
        total_ideas: cache.total_ideas(),
        cost: generation.cost,
        attempts: generation.attempts,
    })
}
