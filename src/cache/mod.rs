//! JSON缓存文件读写。这里的“缓存”指持久化的生成结果，而非性能缓存。
//!
//! 所有写入先落到同目录下的`.tmp`文件，再原子重命名覆盖目标文件，
//! 读者不会看到写了一半的文档。多个进程同时写同一文件时仍以最后一次写入为准。

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::GenerationError;
use crate::types::plan::plan_file_name;
use crate::types::{ExperimentPlanRecord, Idea, IdeaCache};

/// 读取JSON文档，文件不存在时返回MissingResource
pub async fn read_json<T>(path: &Path) -> Result<T, GenerationError>
where
    T: DeserializeOwned,
{
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GenerationError::MissingResource(format!(
                "cache file not found: {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

/// 读取JSON文档，文件不存在时返回None
pub async fn read_json_if_exists<T>(path: &Path) -> Result<Option<T>, GenerationError>
where
    T: DeserializeOwned,
{
    match read_json(path).await {
        Ok(value) => Ok(Some(value)),
        Err(GenerationError::MissingResource(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// 原子写入JSON文档，按需创建父目录
pub async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), GenerationError>
where
    T: Serialize,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).await?;
    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), "cache file written");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}

/// 将新生成的一批想法追加进想法缓存并落盘。已有文件中的批次总是保留。
pub async fn merge_idea_cache(
    path: &Path,
    topic_description: &str,
    batch: Idea,
) -> Result<IdeaCache, GenerationError> {
    let mut cache = read_json_if_exists::<IdeaCache>(path)
        .await?
        .unwrap_or_else(|| IdeaCache::new(topic_description));

    cache.append(batch);
    write_json_atomic(path, &cache).await?;
    Ok(cache)
}

/// 某个主题下的实验计划缓存目录：`<root>/<cache_name>/<idea>.json`
#[derive(Debug, Clone)]
pub struct PlanCache {
    dir: PathBuf,
}

impl PlanCache {
    pub fn new(root: impl AsRef<Path>, cache_name: &str) -> Self {
        Self {
            dir: root.as_ref().join(cache_name),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, idea_name: &str) -> PathBuf {
        self.dir.join(plan_file_name(idea_name))
    }

    pub async fn save(&self, record: &ExperimentPlanRecord) -> Result<PathBuf, GenerationError> {
        let path = self.path_for(&record.idea_name);
        write_json_atomic(&path, record).await?;
        Ok(path)
    }

    pub async fn load(&self, idea_name: &str) -> Result<ExperimentPlanRecord, GenerationError> {
        read_json(&self.path_for(idea_name)).await
    }
}
