use serde::{Deserialize, Serialize};

/// 检索得到的论文记录
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Paper {
    #[serde(rename = "paperId", default, skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    /// 相关性分数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// 文献调研缓存文件，由外部检索排序工具产出，按相关性降序排列
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LiteratureReview {
    pub topic_description: String,
    #[serde(default)]
    pub paper_bank: Vec<Paper>,
}

/// 将论文列表格式化为可嵌入prompt的文本
pub fn format_papers(papers: &[Paper], include_score: bool, include_id: bool) -> String {
    let mut output = String::new();
    for paper in papers {
        if include_id && let Some(id) = &paper.paper_id {
            output.push_str(&format!("paperId: {}\n", id.trim()));
        }
        output.push_str(&format!("title: {}\n", paper.title.trim()));
        let abstract_text = paper.abstract_text.as_deref().unwrap_or("").trim();
        output.push_str(&format!("abstract: {}\n", abstract_text));
        if include_score && let Some(score) = paper.score {
            output.push_str(&format!("relevance score: {}\n", score));
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str) -> Paper {
        Paper {
            paper_id: Some(format!("id-{}", title)),
            title: format!("  {}  ", title),
            abstract_text: Some("An abstract.".to_string()),
            score: Some(7.0),
        }
    }

    #[test]
    fn test_format_papers_without_score_and_id() {
        let text = format_papers(&[paper("Quasars")], false, false);
        assert_eq!(text, "title: Quasars\nabstract: An abstract.\n\n");
    }

    #[test]
    fn test_format_papers_with_score_and_id() {
        let text = format_papers(&[paper("Quasars")], true, true);
        assert!(text.starts_with("paperId: id-Quasars\n"));
        assert!(text.contains("relevance score: 7\n"));
    }

    #[test]
    fn test_missing_abstract_is_tolerated() {
        let json = r#"{"topic_description": "t", "paper_bank": [{"title": "A", "abstract": null}]}"#;
        let review: LiteratureReview = serde_json::from_str(json).unwrap();
        assert_eq!(review.paper_bank.len(), 1);
        assert_eq!(
            format_papers(&review.paper_bank, false, false),
            "title: A\nabstract: \n\n"
        );
    }
}
