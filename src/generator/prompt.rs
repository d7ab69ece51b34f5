//! Prompt组装：纯函数，不做任何IO

use serde_json::Value;

use crate::types::Paper;
use crate::types::paper::format_papers;

/// 研究方法类别，决定prompt中的方法指引段落
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResearchMethod {
    Observational,
    Theoretical,
    DataAnalysis,
    #[default]
    General,
}

impl ResearchMethod {
    /// 精确匹配，无法识别的取值一律视为General
    pub fn parse(value: &str) -> Self {
        match value {
            "observational" => ResearchMethod::Observational,
            "theoretical" => ResearchMethod::Theoretical,
            "data_analysis" => ResearchMethod::DataAnalysis,
            _ => ResearchMethod::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchMethod::Observational => "observational",
            ResearchMethod::Theoretical => "theoretical",
            ResearchMethod::DataAnalysis => "data_analysis",
            ResearchMethod::General => "general",
        }
    }

    fn idea_guidance(&self) -> &'static str {
        match self {
            ResearchMethod::Observational => IDEA_OBSERVATIONAL,
            ResearchMethod::Theoretical => IDEA_THEORETICAL,
            ResearchMethod::DataAnalysis => IDEA_DATA_ANALYSIS,
            ResearchMethod::General => IDEA_GENERAL,
        }
    }

    fn plan_guidance(&self) -> &'static str {
        match self {
            ResearchMethod::Observational => PLAN_OBSERVATIONAL,
            ResearchMethod::Theoretical => PLAN_THEORETICAL,
            ResearchMethod::DataAnalysis => PLAN_DATA_ANALYSIS,
            ResearchMethod::General => PLAN_GENERAL,
        }
    }
}

impl From<&str> for ResearchMethod {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl std::fmt::Display for ResearchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub const IDEA_OBSERVATIONAL: &str = "Focus on novel observational astronomy ideas for now. The proposed method section should specify how to set up the observations, what instruments to use, and how to analyze the data. Try to leverage existing astronomical facilities when possible.\n";
pub const IDEA_THEORETICAL: &str = "Focus on novel theoretical astrophysics ideas for now. The proposed method section should specify what physical models to develop, what simulations to run, and how to connect theory with observational constraints.\n";
pub const IDEA_DATA_ANALYSIS: &str = "Focus on novel astronomical data analysis ideas for now. The proposed method section should specify how to process and analyze existing astronomical datasets using advanced computational techniques like machine learning, statistics, or computer vision.\n";
pub const IDEA_GENERAL: &str = "Focus on proposing novel methods in astrophysics research, which can include observational astronomy, theoretical modeling, computational simulations, or data analysis techniques. The proposed method section should specify all the details involved, such as what instruments or datasets to use, what physical models to develop, and how to evaluate the results.\n";

pub const PLAN_OBSERVATIONAL: &str = "When designing the research plan, focus on observational astronomy. Prefer using existing telescopes and instruments rather than proposing to build new ones. Consider the practical aspects of telescope proposal requirements, expected signal-to-noise ratios, and data reduction techniques. Be realistic about the observing time allocations that would be feasible for a student project.\n";
pub const PLAN_THEORETICAL: &str = "When designing the research plan, focus on theoretical astrophysics. Develop analytical models or numerical simulations that can be implemented with reasonable computational resources. Make sure to include validation steps that connect the theoretical work to existing observational constraints.\n";
pub const PLAN_DATA_ANALYSIS: &str = "When designing the research plan, focus on astronomical data analysis. Utilize existing public datasets from astronomical surveys or archives. Consider computational requirements and specify appropriate statistical or machine learning methods. Ensure that data preprocessing steps are clearly described.\n";
pub const PLAN_GENERAL: &str = "When designing the research plan, consider a comprehensive approach that might combine observations, theory, and data analysis as appropriate for the problem. Be realistic about the resources required and make sure the plan is feasible for a student project.\n";

/// 想法生成prompt的输入
#[derive(Debug, Clone)]
pub struct IdeaPromptInput<'a> {
    pub topic_description: &'a str,
    pub method: ResearchMethod,
    /// 示例想法，原样嵌入
    pub examples: &'a str,
    pub ideas_n: usize,
    /// 用于grounding的论文，None表示关闭RAG
    pub grounding_papers: Option<&'a [Paper]>,
    /// 需要避免重复的已有想法名称
    pub existing_ideas: &'a [String],
    /// 要求每个想法相互独立（Anthropic模型倾向于生成相互引用的想法）
    pub standalone_ideas: bool,
}

pub fn compose_idea_prompt(input: &IdeaPromptInput<'_>) -> String {
    let topic = input.topic_description;
    let mut prompt = format!(
        "You are an expert researcher in astrophysics and astronomy. Now I want you to help me brainstorm some new research project ideas on the topic of: {}.\n\n",
        topic
    );

    if let Some(papers) = input.grounding_papers {
        prompt.push_str(
            "Here are some relevant papers on this topic just for your background knowledge:\n",
        );
        prompt.push_str(&format_papers(papers, false, false));
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "You should generate {} different ideas on this topic. Try to be creative and diverse in the idea generation, and do not repeat any similar ideas. ",
        input.ideas_n
    ));
    if input.grounding_papers.is_some() {
        prompt.push_str("The above papers are only for inspiration and you should not cite them and just make some incremental modifications. Instead, you should make sure your ideas are novel and distinct from the prior literature. ");
    }
    prompt.push_str("You should aim for projects that can potentially win best paper awards at top astronomy and astrophysics journals and conferences like ApJ, MNRAS, and AAS.\n");
    prompt.push_str("Each idea should be described as: (1) Problem: State the problem statement, which should be closely related to the topic description and something that current astronomical methods struggle to address well. (2) Existing Methods: Mention some existing astronomical datasets, observational techniques, or analysis methods if there are any. (3) Motivation: Explain the inspiration of the proposed method and why it would work well for addressing this astrophysical problem. (4) Proposed Method: Propose your new method and describe it in detail. The proposed method should be maximally different from all existing work and baselines, and be more advanced and effective than the baselines. You should be as creative as possible in proposing new methods, we love unhinged ideas that sound crazy but are grounded in physical principles. This should be the most detailed section of the proposal. (5) Experiment Plan: Specify the experiment steps, which may include observations, simulations, data analysis techniques, validation methods, and evaluation metrics.\n");
    prompt.push_str("You can follow these examples to get a sense of how the ideas should be formatted (but don't borrow the ideas themselves):\n");
    prompt.push_str(input.examples);
    prompt.push('\n');
    prompt.push_str(&format!(
        "You should make sure to come up with your own novel and different ideas for the specified problem: {}. You should try to tackle important problems that are well recognized in the field of astrophysics and considered challenging for current methods. For example, think of novel solutions for problems with existing observational data and analysis techniques. In rare cases, you can propose to tackle a new problem, but you will have to justify why it is important and how to set up proper evaluation.\n",
        topic
    ));

    if input.standalone_ideas {
        prompt.push_str(
            "You should make each idea standalone and not dependent on the other ideas.\n",
        );
    }
    prompt.push_str(input.method.idea_guidance());

    if !input.existing_ideas.is_empty() {
        prompt.push_str(&format!(
            "You should avoid repeating the following existing ideas and try to be different and diverse: {}\n",
            input.existing_ideas.join("; ")
        ));
    }

    prompt.push_str(&format!(
        "Please write down your {} ideas (each idea should be described as one paragraph. Output the ideas in json format as a dictionary, where you should generate a short idea name (e.g., \"Multi-Wavelength Quasar Variability\", or \"Galactic Dark Matter Substructure\") as the key and the actual idea description as the value (following the above format). Do not repeat idea names or contents.",
        input.ideas_n
    ));
    prompt
}

/// 实验计划prompt的输入
#[derive(Debug, Clone)]
pub struct PlanPromptInput<'a> {
    pub topic_description: &'a str,
    pub idea: &'a Value,
    pub method: ResearchMethod,
    /// 完整计划示例，原样嵌入
    pub demo_examples: &'a str,
}

pub fn compose_plan_prompt(input: &PlanPromptInput<'_>) -> String {
    let mut prompt = format!(
        "You are an expert researcher in astrophysics and astronomy. Your job is to expand a brief project idea into a full research proposal with detailed experiment plans so that your students can follow the steps and execute the full project. I will provide you with an idea on the topic of: {}.\n\n",
        input.topic_description
    );
    prompt.push_str("The idea is:\n");
    prompt.push_str(&render_idea(input.idea));
    prompt.push('\n');
    prompt.push_str(PLAN_SECTION_GUIDE);
    prompt.push_str(input.method.plan_guidance());
    prompt.push_str("Be consistent in your methodology and experiment design. For example, if you propose to use a specific telescope or instrument, make sure it's appropriate for the wavelength and sensitivity requirements of your project.\n");
    prompt.push_str("Below are a few examples of how the full research plans should look like:\n");
    prompt.push_str(input.demo_examples);
    prompt.push_str("\n\n");
    prompt.push_str("Now please write down your research plan in JSON format (keys should be the section names, just like the above examples). Make sure to be as detailed as possible so that a student can directly follow the plan to implement the project.");
    prompt
}

const PLAN_SECTION_GUIDE: &str = "Now you should come up with the full research plan covering:
1. Title: A concise statement of the main research question to be used as the paper title.
2. Problem Statement: Clearly define the astrophysical problem your research intends to address. Explain clearly why this problem is interesting and important in the context of modern astronomy.
3. Motivation: Explain why existing methods (both classic ones and recent ones) are not good enough to solve the problem, and explain the inspiration behind the new proposed method. You should also motivate why the proposed method would work better than existing approaches on the problem.
4. Proposed Method: Explain how the proposed method works, describing all the steps in detail. Make sure every step is clearly described and feasible to implement using available astronomical facilities, datasets, or computational resources.
5. Step-by-Step Experiment Plan: Break down every single step of the research, making sure every step is executable. Cover all essential details such as the observations needed, instruments to use, datasets to analyze, simulations to run, and metrics to evaluate success. For observational plans, specify telescope requirements, exposure times, and data reduction steps. For theoretical work, describe model development and validation approaches. For data analysis, provide specific techniques and tools to use.
6. Test Case Examples: Give two concrete examples. The first example should show how the baseline method fails on a specific astronomical scenario or dataset. If there are multiple baselines, give examples for all of them. The second example should show how the proposed method succeeds on the same case. For each test case, include the input and the expected output. You should also provide an explanation for why the outputs from the proposed method are better. If the proposed method has multiple steps, break them down into intermediate steps.
7. Fallback Plan: Propose some alternative plans for what the students should do if the proposed method didn't manage to satisfy the success criteria. For example, you can suggest additional analysis to help debug why the proposed method didn't work, which could inform alternative new methods, or how to turn the project into an analysis paper by offering interesting results even if the main hypothesis isn't confirmed. Write a coherent paragraph rather than a list of bullet points.
The research plan should not include any background introduction (you can skip the literature review, paper writing tips, and ethical discussion). Just give instructions on the research and experiments.
";

// 渲染想法时跳过的字段
const SKIPPED_IDEA_KEYS: [&str; 3] = ["score", "Test Case Examples", "Fallback Plan"];

/// 将想法渲染为prompt文本：字符串原样返回，结构化想法渲染为缩进的`key: value`行
pub fn render_idea(idea: &Value) -> String {
    match idea {
        Value::String(text) => text.clone(),
        Value::Object(_) => {
            let mut output = String::new();
            render_value_into(&mut output, idea, 0);
            output
        }
        other => other.to_string(),
    }
}

fn render_value_into(output: &mut String, value: &Value, indent_level: usize) {
    let Value::Object(map) = value else {
        return;
    };
    let indent = "  ".repeat(indent_level);

    for (key, value) in map {
        if SKIPPED_IDEA_KEYS.contains(&key.as_str()) {
            continue;
        }
        match value {
            Value::String(text) => output.push_str(&format!("{}{}: {}\n", indent, key, text)),
            Value::Number(_) | Value::Bool(_) => {
                output.push_str(&format!("{}{}: {}\n", indent, key, value))
            }
            Value::Array(items) => {
                output.push_str(&format!("{}{}:\n", indent, key));
                for item in items {
                    match item {
                        Value::Object(_) => render_value_into(output, item, indent_level + 1),
                        Value::String(text) => {
                            output.push_str(&format!("{}  - {}\n", indent, text))
                        }
                        other => output.push_str(&format!("{}  - {}\n", indent, other)),
                    }
                }
            }
            Value::Object(_) => {
                output.push_str(&format!("{}{}:\n", indent, key));
                render_value_into(output, value, indent_level + 1);
            }
            Value::Null => {}
        }
    }
}
