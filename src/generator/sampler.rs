//! 带种子的随机抽样：grounding论文与示例想法

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value};

use crate::types::Paper;

/// 示例想法最多嵌入的条数
pub const MAX_EXAMPLE_IDEAS: usize = 20;

/// 从按相关性降序排列的论文库中取前`2k`篇，打乱后返回前`k`篇。
/// 论文库不足`2k`篇时从全部论文中抽样，不足`k`篇时全部返回。
pub fn sample_grounding<R>(papers: &[Paper], k: usize, rng: &mut R) -> Vec<Paper>
where
    R: Rng + ?Sized,
{
    let pool_size = papers.len().min(k.saturating_mul(2));
    let mut pool = papers[..pool_size].to_vec();
    pool.shuffle(rng);
    pool.truncate(k);
    pool
}

/// 打乱示例想法并截断到`limit`条，返回缩进的JSON文本
pub fn shuffle_examples<R>(
    examples: Map<String, Value>,
    limit: usize,
    rng: &mut R,
) -> Result<String, serde_json::Error>
where
    R: Rng + ?Sized,
{
    let mut entries: Vec<(String, Value)> = examples.into_iter().collect();
    entries.shuffle(rng);
    entries.truncate(limit);
    let shuffled: Map<String, Value> = entries.into_iter().collect();
    serde_json::to_string_pretty(&shuffled)
}
