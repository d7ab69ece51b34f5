use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::GenerationError;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "together")]
    Together,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Together => write!(f, "together"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "together" => Ok(LLMProvider::Together),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl LLMProvider {
    /// 未显式配置API KEY时读取的环境变量
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "OPENAI_API_KEY",
            LLMProvider::Anthropic => "ANTHROPIC_API_KEY",
            LLMProvider::Together => "TOGETHER_API_KEY",
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// API凭据文件路径
    pub keys_path: PathBuf,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY，为空时从凭据文件或环境变量读取
    pub api_key: String,

    /// LLM API基地址，仅OpenAI兼容接口使用
    pub api_base_url: Option<String>,

    /// 模型名称
    pub model: String,

    /// 最大输出tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    pub top_p: f64,

    /// 采样种子，同时用于本地随机采样
    pub seed: u64,

    /// 最大尝试次数（包含首次调用）
    pub retry_attempts: u32,

    /// 重试间隔（毫秒），固定不递增
    pub retry_delay_ms: u64,

    /// 单次调用超时时间（秒），0表示不限制
    pub timeout_seconds: u64,

    /// 模型输出无法解析为JSON时，是否计入同一重试预算再次调用
    pub retry_on_malformed_response: bool,
}

impl Config {
    /// 从文件加载配置，文件中未出现的字段取默认值
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_over(path, Self::default())
    }

    /// 从文件加载配置，文件中出现的字段覆盖`base`中的对应字段
    pub fn from_file_over(path: &Path, base: Self) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let overlay: toml::Table =
            toml::from_str(&content).context("Failed to parse config file")?;
        let mut merged = match toml::Value::try_from(&base)
            .context("Failed to serialize base config")?
        {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge_tables(&mut merged, overlay);

        let config: Config = toml::Value::Table(merged)
            .try_into()
            .context("Failed to parse config file")?;
        Ok(config)
    }

    /// 显式指定的配置文件优先，其次是工作目录下的astro.toml，都没有时返回`base`
    pub fn load(explicit: Option<&Path>, base: Self) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file_over(path, base);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("astro.toml");
        if default_config_path.exists() {
            return Self::from_file_over(&default_config_path, base);
        }
        Ok(base)
    }

    /// 解析调用所需的API KEY
    pub fn resolve_api_key(&self) -> Result<String, GenerationError> {
        if !self.llm.api_key.trim().is_empty() {
            return Ok(self.llm.api_key.clone());
        }

        if self.keys_path.exists() {
            let credentials = Credentials::from_file(&self.keys_path)?;
            if let Some(key) = credentials.key_for(self.llm.provider) {
                return Ok(key.to_string());
            }
        }

        std::env::var(self.llm.provider.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::MissingResource(format!(
                    "no API key for provider {} (checked config, {:?} and ${})",
                    self.llm.provider,
                    self.keys_path,
                    self.llm.provider.api_key_env()
                ))
            })
    }
}

/// 递归合并TOML表，`overlay`中的值优先
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(overlay_table) => match base.get_mut(&key) {
                Some(toml::Value::Table(base_table)) => merge_tables(base_table, overlay_table),
                _ => {
                    base.insert(key, toml::Value::Table(overlay_table));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// 凭据文件内容，未使用的字段会被忽略
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub anthropic_key: Option<String>,
    #[serde(default)]
    pub together_key: Option<String>,
}

impl Credentials {
    pub fn from_file(path: &Path) -> Result<Self, GenerationError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn key_for(&self, provider: LLMProvider) -> Option<&str> {
        let key = match provider {
            LLMProvider::OpenAI => &self.api_key,
            LLMProvider::Anthropic => &self.anthropic_key,
            LLMProvider::Together => &self.together_key,
        };
        key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            keys_path: PathBuf::from("keys.json"),
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Anthropic,
            api_key: String::new(),
            api_base_url: None,
            model: String::from("claude-3-opus-20240229"),
            max_tokens: 30000,
            temperature: 1.0,
            top_p: 1.0,
            seed: 2024,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 0,
            retry_on_malformed_response: true,
        }
    }
}

impl LLMConfig {
    /// 计划扩展使用的预设：确定性采样，较短输出
    pub fn plan_preset() -> Self {
        Self {
            provider: LLMProvider::OpenAI,
            model: String::from("gpt-4-1106-preview"),
            max_tokens: 4096,
            temperature: 0.0,
            ..Self::default()
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
