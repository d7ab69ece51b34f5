use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// 一批研究想法：简短名称 -> 想法描述，保持模型输出的顺序
pub type Idea = Map<String, Value>;

/// 想法缓存文件，每个主题一份，只追加不改写
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IdeaCache {
    pub topic_description: String,
    #[serde(default)]
    pub ideas: Vec<Idea>,
}

impl IdeaCache {
    pub fn new(topic_description: impl Into<String>) -> Self {
        Self {
            topic_description: topic_description.into(),
            ideas: Vec::new(),
        }
    }

    /// 追加一批新想法（追加语义，同一批次重复追加会产生重复条目）
    pub fn append(&mut self, batch: Idea) {
        self.ideas.push(batch);
    }

    /// 已有的想法名称，按首次出现顺序去重
    pub fn idea_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.ideas
            .iter()
            .flat_map(|batch| batch.keys())
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect()
    }

    /// 累计生成的想法条数（不去重）
    pub fn total_ideas(&self) -> usize {
        self.ideas.iter().map(|batch| batch.len()).sum()
    }
}

/// 想法文件中`ideas`字段的两种形态
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdeaCollection {
    Batches(Vec<Idea>),
    Flat(Idea),
}

#[derive(Debug, Deserialize)]
struct RawIdeaLibrary {
    topic_description: String,
    ideas: IdeaCollection,
}

/// 供计划扩展使用的想法索引：名称 -> 原始想法
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(from = "RawIdeaLibrary")]
pub struct IdeaLibrary {
    pub topic_description: String,
    pub ideas: Idea,
}

impl From<RawIdeaLibrary> for IdeaLibrary {
    fn from(raw: RawIdeaLibrary) -> Self {
        let ideas = match raw.ideas {
            IdeaCollection::Flat(ideas) => ideas,
            IdeaCollection::Batches(batches) => {
                let mut flat = Map::new();
                for (name, idea) in batches.into_iter().flatten() {
                    flat.entry(name).or_insert(idea);
                }
                flat
            }
        };
        Self {
            topic_description: raw.topic_description,
            ideas,
        }
    }
}

impl IdeaLibrary {
    pub fn get(&self, idea_name: &str) -> Option<&Value> {
        self.ideas.get(idea_name)
    }

    pub fn names(&self) -> Vec<String> {
        self.ideas.keys().cloned().collect()
    }
}
