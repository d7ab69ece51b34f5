use thiserror::Error;

/// 生成流程中可能出现的错误
#[derive(Error, Debug)]
pub enum GenerationError {
    /// 模型服务调用失败（网络、限流、服务端错误等），可重试
    #[error("LLM API error: {0}")]
    TransientApi(String),

    /// 单次调用超时，可重试
    #[error("LLM call timed out after {0}s")]
    Timeout(u64),

    /// 模型返回的内容不是合法JSON
    #[error("malformed model response ({source}): {excerpt}")]
    MalformedResponse {
        excerpt: String,
        #[source]
        source: serde_json::Error,
    },

    /// 模型返回的JSON结构不符合预期
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// 缺失的缓存文件、想法名称或凭据
    #[error("missing resource: {0}")]
    MissingResource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// 是否属于瞬时错误（重试策略会再次尝试）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::TransientApi(_) | GenerationError::Timeout(_)
        )
    }

    /// 模型输出无法按预期解析
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            GenerationError::MalformedResponse { .. } | GenerationError::UnexpectedShape(_)
        )
    }
}
