use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::llm::client::types::TokenUsage;

/// 以微美元为单位累计，避免浮点累加误差
const MICROS_PER_DOLLAR: f64 = 1_000_000.0;

/// API费用监控器：进程级累加器，每次运行从0开始，不持久化
#[derive(Clone, Default)]
pub struct CostMonitor {
    metrics: Arc<CostMetrics>,
}

/// 费用指标
#[derive(Default)]
pub struct CostMetrics {
    /// 计费调用次数
    pub billed_calls: AtomicUsize,
    /// 总费用（微美元）
    pub total_cost_micros: AtomicU64,
    pub total_input_tokens: AtomicUsize,
    pub total_output_tokens: AtomicUsize,
    /// 按标签（想法名称等）分类的费用
    pub label_metrics: RwLock<BTreeMap<String, LabelMetrics>>,
}

#[derive(Default)]
pub struct LabelMetrics {
    pub calls: AtomicUsize,
    pub cost_micros: AtomicU64,
}

/// 费用报告
#[derive(Debug, Serialize)]
pub struct CostReport {
    pub billed_calls: usize,
    pub total_cost: f64,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub label_costs: BTreeMap<String, f64>,
}

fn to_micros(cost: f64) -> u64 {
    (cost.max(0.0) * MICROS_PER_DOLLAR).round() as u64
}

fn from_micros(micros: u64) -> f64 {
    micros as f64 / MICROS_PER_DOLLAR
}

impl CostMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次计费调用
    pub fn record_call(&self, label: &str, usage: TokenUsage, cost: f64) {
        let micros = to_micros(cost);
        self.metrics.billed_calls.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .total_cost_micros
            .fetch_add(micros, Ordering::Relaxed);
        self.metrics
            .total_input_tokens
            .fetch_add(usage.input_tokens, Ordering::Relaxed);
        self.metrics
            .total_output_tokens
            .fetch_add(usage.output_tokens, Ordering::Relaxed);

        if let Ok(mut label_map) = self.metrics.label_metrics.write() {
            let label_metrics = label_map.entry(label.to_string()).or_default();
            label_metrics.calls.fetch_add(1, Ordering::Relaxed);
            label_metrics.cost_micros.fetch_add(micros, Ordering::Relaxed);
        }

        tracing::debug!(
            label,
            cost,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "billed LLM call"
        );
    }

    /// 当前累计费用（美元）
    pub fn total(&self) -> f64 {
        from_micros(self.metrics.total_cost_micros.load(Ordering::Relaxed))
    }

    /// 某个标签下的累计费用（美元）
    pub fn label_total(&self, label: &str) -> f64 {
        self.metrics
            .label_metrics
            .read()
            .ok()
            .and_then(|label_map| {
                label_map
                    .get(label)
                    .map(|m| from_micros(m.cost_micros.load(Ordering::Relaxed)))
            })
            .unwrap_or(0.0)
    }

    pub fn billed_calls(&self) -> usize {
        self.metrics.billed_calls.load(Ordering::Relaxed)
    }

    /// 生成费用报告
    pub fn generate_report(&self) -> CostReport {
        let label_costs = if let Ok(label_map) = self.metrics.label_metrics.read() {
            label_map
                .iter()
                .map(|(label, metrics)| {
                    (
                        label.clone(),
                        from_micros(metrics.cost_micros.load(Ordering::Relaxed)),
                    )
                })
                .collect()
        } else {
            BTreeMap::new()
        };

        CostReport {
            billed_calls: self.billed_calls(),
            total_cost: self.total(),
            input_tokens: self.metrics.total_input_tokens.load(Ordering::Relaxed),
            output_tokens: self.metrics.total_output_tokens.load(Ordering::Relaxed),
            label_costs,
        }
    }
}
