/// Token估算器：在服务端不返回用量时，用于估算调用费用
pub struct TokenEstimator {
    rules: TokenCalculationRules,
}

/// Token计算规则
#[derive(Debug, Clone)]
pub struct TokenCalculationRules {
    /// ASCII字符的平均token比例（字符数/token数）
    pub ascii_char_per_token: f64,
    /// 非ASCII字符（希腊字母、数学符号、CJK等）的平均token比例
    pub non_ascii_char_per_token: f64,
    /// 每段文本的固定开销（角色标记等）
    pub base_token_overhead: usize,
}

impl Default for TokenCalculationRules {
    fn default() -> Self {
        Self {
            // 基于GPT/Claude系列模型在英文科技文本上的经验值
            ascii_char_per_token: 4.0,
            non_ascii_char_per_token: 1.0,
            base_token_overhead: 8,
        }
    }
}

/// Token估算结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEstimation {
    pub estimated_tokens: usize,
    pub ascii_char_count: usize,
    pub non_ascii_char_count: usize,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator {
    pub fn new() -> Self {
        Self {
            rules: TokenCalculationRules::default(),
        }
    }

    pub fn with_rules(rules: TokenCalculationRules) -> Self {
        Self { rules }
    }

    /// 估算文本的token数量，空文本不计开销
    pub fn estimate_tokens(&self, text: &str) -> TokenEstimation {
        let ascii_char_count = text.chars().filter(char::is_ascii).count();
        let non_ascii_char_count = text.chars().count() - ascii_char_count;

        if ascii_char_count + non_ascii_char_count == 0 {
            return TokenEstimation {
                estimated_tokens: 0,
                ascii_char_count,
                non_ascii_char_count,
            };
        }

        let ascii_tokens =
            (ascii_char_count as f64 / self.rules.ascii_char_per_token).ceil() as usize;
        let non_ascii_tokens =
            (non_ascii_char_count as f64 / self.rules.non_ascii_char_per_token).ceil() as usize;

        TokenEstimation {
            estimated_tokens: ascii_tokens + non_ascii_tokens + self.rules.base_token_overhead,
            ascii_char_count,
            non_ascii_char_count,
        }
    }
}
