use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 完整实验计划：章节名称 -> 内容，章节名称以模型实际返回为准
pub type ExperimentPlan = Map<String, Value>;

/// 期望模型返回的章节名称
pub const PLAN_SECTIONS: [&str; 7] = [
    "Title",
    "Problem Statement",
    "Motivation",
    "Proposed Method",
    "Step-by-Step Experiment Plan",
    "Test Case Examples",
    "Fallback Plan",
];

/// 每个想法一份的实验计划缓存文件，创建后不再修改
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExperimentPlanRecord {
    pub topic_description: String,
    pub idea_name: String,
    pub raw_idea: Value,
    pub full_experiment_plan: ExperimentPlan,
}

impl ExperimentPlanRecord {
    /// 模型输出中缺失的期望章节
    pub fn missing_sections(&self) -> Vec<&'static str> {
        PLAN_SECTIONS
            .iter()
            .copied()
            .filter(|section| !self.full_experiment_plan.contains_key(*section))
            .collect()
    }
}

// 文件名中不可移植的字符，与空白一样作为分隔
const UNSAFE_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// 想法名称 -> 缓存文件名：小写，连续空白替换为单个下划线。
/// 路径分隔符等字符按空白处理，只由`.`组成的片段被丢弃，结果总是单个文件名。
pub fn plan_file_name(idea_name: &str) -> String {
    let lowered: String = idea_name
        .to_lowercase()
        .chars()
        .map(|c| {
            if UNSAFE_FILE_CHARS.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();
    let normalized = lowered
        .split_whitespace()
        .filter(|part| !part.chars().all(|c| c == '.'))
        .collect::<Vec<_>>()
        .join("_");
    if normalized.is_empty() {
        return "untitled.json".to_string();
    }
    format!("{}.json", normalized)
}
