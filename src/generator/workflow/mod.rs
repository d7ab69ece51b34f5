use anyhow::{Context, Result};

use crate::config::Config;
use crate::generator::context::GeneratorContext;
use crate::generator::idea::{self, IdeaRequest, IdeaRunReport};
use crate::generator::plan::{self, BatchReport, PlanRequest};

/// 启动想法生成工作流
pub async fn launch_idea_generation(config: &Config, request: &IdeaRequest) -> Result<IdeaRunReport> {
    let context = GeneratorContext::new(config.clone())?;
    run_idea_generation(&context, request).await
}

/// 在给定上下文中执行想法生成
pub async fn run_idea_generation(
    context: &GeneratorContext,
    request: &IdeaRequest,
) -> Result<IdeaRunReport> {
    print_engine(context);
    let mut rng = context.rng();
    let report = idea::execute(context, request, &mut rng)
        .await
        .with_context(|| {
            format!(
                "idea generation failed for {}",
                request.paper_cache.display()
            )
        })?;

    println!("✅ 新增想法 {} 个，已生成 {} 个", report.new_ideas.len(), report.total_ideas);
    println!("💰 本次运行总费用: ${:.4}", context.costs.total());
    log_cost_summary(context);
    Ok(report)
}

/// 启动实验计划扩展工作流
pub async fn launch_plan_generation(config: &Config, request: &PlanRequest) -> Result<BatchReport> {
    let context = GeneratorContext::new(config.clone())?;
    run_plan_generation(&context, request).await
}

/// 在给定上下文中执行实验计划扩展
pub async fn run_plan_generation(
    context: &GeneratorContext,
    request: &PlanRequest,
) -> Result<BatchReport> {
    print_engine(context);
    let report = plan::expand_ideas(context, request)
        .await
        .with_context(|| {
            format!(
                "plan generation failed for cache {}",
                request.cache_name
            )
        })?;

    println!(
        "✅ 计划扩展完成: 成功 {} 个，失败 {} 个",
        report.completed(),
        report.failed()
    );
    println!("💰 总费用: ${:.4}", report.total_cost());
    let billed = context.costs.total();
    if billed > report.total_cost() {
        println!("   (含失败尝试的计费总额: ${:.4})", billed);
    }
    log_cost_summary(context);
    Ok(report)
}

fn print_engine(context: &GeneratorContext) {
    println!(
        "🔄 使用模型: {} ({})",
        context.llm.model_name(),
        context.config.llm.provider
    );
    tracing::debug!(model = %context.config.llm.model, seed = context.config.llm.seed, "generator context ready");
}

fn log_cost_summary(context: &GeneratorContext) {
    let report = context.costs.generate_report();
    tracing::info!(
        billed_calls = report.billed_calls,
        input_tokens = report.input_tokens,
        output_tokens = report.output_tokens,
        total_cost = report.total_cost,
        "cost summary"
    );
    for (label, cost) in &report.label_costs {
        tracing::debug!(label = %label, cost, "cost by label");
    }
}
