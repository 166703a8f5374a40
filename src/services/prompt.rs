//! 评审提示词构建

use crate::models::PaperData;

const REVIEW_INSTRUCTIONS: &str = r#"Your task is to assess a research paper based on its content and the code. The evaluation criteria are two fold:
1. Validity: Does the manuscript have flaws which should prohibit its publication? If so, please provide details.
2. Data and methodology: Please comment on the validity of the approach, quality of the data and quality of presentation. Is the reporting of data and methodology sufficiently detailed and transparent to enable reproducing the results?

-> You may criticize up to 10 aspects, where we denote each aspect as an "item". An item should consist of a claim and an evidence. Each claim should be a criticism of the paper with respect to the evaluation criteria, and each evidence should be either a citation or an experimental result that you acquire by running the source code of this paper.

Some of the paper's content is provided as URLs (e.g., images). Download and read those files where needed."#;

const REVIEW_STEPS: &str = r#"Please conduct a systematic review following these steps:

1. **Setup and Code Analysis**: Clone and analyze the provided code repository
2. **Content Analysis**: Examine the paper content, figures, and methodology
3. **Literature Review**: Compare claims with established literature
4. **Reproducibility Testing**: Attempt to reproduce key results
5. **Critical Assessment**: Document specific items with concrete evidence in critical_assessment.md

For each critical item, provide:
- **Claim**: Specific statement from the paper being criticized
- **Evidence**: Concrete evidence from code execution, literature citations, or experimental analysis
- **Impact**: Assessment of how this affects the paper's validity

Include a References section with citations to support your criticisms."#;

/// 构建评审提示词
pub fn build_review_prompt(paper: &PaperData) -> Result<String, serde_json::Error> {
    let paper_json = serde_json::to_string_pretty(paper)?;

    Ok(format!(
        "{}\n\nPaper content:\n```\n{}\n```\n\n{}",
        REVIEW_INSTRUCTIONS, paper_json, REVIEW_STEPS
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_paper_fields() {
        let paper: PaperData = serde_json::from_str(
            r#"{"title": "DIGIT", "code": ["https://github.com/example/digit"], "abstract": "precise"}"#,
        )
        .unwrap();

        let prompt = build_review_prompt(&paper).unwrap();

        assert!(prompt.contains("\"title\": \"DIGIT\""));
        assert!(prompt.contains("https://github.com/example/digit"));
        assert!(prompt.contains("\"abstract\": \"precise\""));
        assert!(prompt.contains("critical_assessment.md"));
    }
}
