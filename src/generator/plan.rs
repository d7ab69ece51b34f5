//! 实验计划扩展：把想法缓存中的想法逐个扩展为完整实验计划，单个失败不影响其余想法

use std::path::PathBuf;

use crate::cache::{PlanCache, read_json};
use crate::error::GenerationError;
use crate::generator::context::GeneratorContext;
use crate::generator::prompt::{PlanPromptInput, ResearchMethod, compose_plan_prompt};
use crate::types::{ExperimentPlanRecord, IdeaLibrary};

/// 内置的完整计划示例
pub const DEFAULT_PLAN_EXAMPLES: &str = include_str!("prompts/plan_examples.txt");

/// 需要扩展的想法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeaSelection {
    /// 缓存中的全部想法，按缓存顺序
    All,
    Named(String),
}

impl From<&str> for IdeaSelection {
    fn from(value: &str) -> Self {
        if value == "all" {
            IdeaSelection::All
        } else {
            IdeaSelection::Named(value.to_string())
        }
    }
}

impl IdeaSelection {
    pub fn resolve(&self, library: &IdeaLibrary) -> Vec<String> {
        match self {
            IdeaSelection::All => library.names(),
            IdeaSelection::Named(name) => vec![name.clone()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// 想法缓存目录，缓存文件为`<dir>/<cache_name>.json`
    pub idea_cache_dir: PathBuf,
    pub experiment_plan_cache_dir: PathBuf,
    pub cache_name: String,
    pub selection: IdeaSelection,
    pub method: ResearchMethod,
    /// 自定义计划示例文件，None时使用内置示例
    pub examples: Option<PathBuf>,
}

impl PlanRequest {
    pub fn idea_cache_path(&self) -> PathBuf {
        self.idea_cache_dir.join(format!("{}.json", self.cache_name))
    }
}

/// 单个想法的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum IdeaOutcome {
    Completed {
        idea_name: String,
        path: PathBuf,
        cost: f64,
    },
    Failed {
        idea_name: String,
        reason: String,
    },
}

impl IdeaOutcome {
    pub fn idea_name(&self) -> &str {
        match self {
            IdeaOutcome::Completed { idea_name, .. } | IdeaOutcome::Failed { idea_name, .. } => {
                idea_name
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, IdeaOutcome::Completed { .. })
    }
}

/// 一次批量扩展的汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub outcomes: Vec<IdeaOutcome>,
}

impl BatchReport {
    /// 成功扩展的想法费用之和
    pub fn total_cost(&self) -> f64 {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                IdeaOutcome::Completed { cost, .. } => *cost,
                IdeaOutcome::Failed { .. } => 0.0,
            })
            .sum()
    }

    pub fn completed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.completed()
    }
}

/// 扩展单个想法并写入计划缓存
async fn expand_idea(
    context: &GeneratorContext,
    library: &IdeaLibrary,
    plan_cache: &PlanCache,
    idea_name: &str,
    method: ResearchMethod,
    demo_examples: &str,
) -> Result<(PathBuf, f64), GenerationError> {
    let idea = library.get(idea_name).ok_or_else(|| {
        GenerationError::MissingResource(format!("idea not found in cache: {}", idea_name))
    })?;

    let prompt = compose_plan_prompt(&PlanPromptInput {
        topic_description: &library.topic_description,
        idea,
        method,
        demo_examples,
    });
    let generation = context
        .generator()
        .generate(idea_name, prompt, &context.sampling())
        .await?;

    let record = ExperimentPlanRecord {
        topic_description: library.topic_description.clone(),
        idea_name: idea_name.to_string(),
        raw_idea: idea.clone(),
        full_experiment_plan: generation.response,
    };
    let missing = record.missing_sections();
    if !missing.is_empty() {
        tracing::warn!(idea = idea_name, ?missing, "experiment plan lacks expected sections");
    }

    let path = plan_cache.save(&record).await?;
    Ok((path, generation.cost))
}

/// 按选择逐个扩展想法，返回每个想法的结果。
/// 想法缓存或示例无法读取时整体失败；单个想法的失败只记录在报告中。
pub async fn expand_ideas(
    context: &GeneratorContext,
    request: &PlanRequest,
) -> Result<BatchReport, GenerationError> {
    let library: IdeaLibrary = read_json(&request.idea_cache_path()).await?;
    let demo_examples = match &request.examples {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => DEFAULT_PLAN_EXAMPLES.to_string(),
    };
    let plan_cache = PlanCache::new(&request.experiment_plan_cache_dir, &request.cache_name);

    let idea_names = request.selection.resolve(&library);
    println!(
        "🔍 主题: {}，待扩展想法 {} 个",
        library.topic_description,
        idea_names.len()
    );

    let mut report = BatchReport::default();
    for idea_name in idea_names {
        println!("🤖 正在扩展: {}", idea_name);
        let outcome = match expand_idea(
            context,
            &library,
            &plan_cache,
            &idea_name,
            request.method,
            &demo_examples,
        )
        .await
        {
            Ok((path, cost)) => {
                println!("   ✅ 完成，费用: ${:.4}", cost);
                IdeaOutcome::Completed {
                    idea_name,
                    path,
                    cost,
                }
            }
            Err(e) => {
                tracing::error!(idea = %idea_name, error = %e, "failed to expand idea");
                eprintln!("   ❌ 扩展失败 [{}]: {}", idea_name, e);
                IdeaOutcome::Failed {
                    idea_name,
                    reason: e.to_string(),
                }
            }
        };
        report.outcomes.push(outcome);
    }

    Ok(report)
}
