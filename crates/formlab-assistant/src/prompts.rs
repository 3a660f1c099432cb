//! Prompt builders.
//!
//! Prompts are written in Korean because the reference material and the
//! expected answers are Korean.

use formlab_core::card::ProductCard;
use formlab_core::document::TextDocument;
use formlab_core::enums::AnalysisTopic;
use formlab_core::formulation::Formulation;
use formlab_core::label::LabelSheet;
use formlab_core::process::ProcessStep;

/// Characters of the labeling standard quoted in a label review.
pub const LABEL_REFERENCE_CHARS: usize = 2000;

/// Inputs to a process analysis.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub topic: AnalysisTopic,
    /// Free-form question; replaces the topic title when present.
    pub question: Option<&'a str>,
    pub formulation: Option<&'a Formulation>,
    pub steps: &'a [ProcessStep],
    pub documents: &'a [TextDocument],
}

impl AnalysisRequest<'_> {
    /// The question actually asked.
    pub fn question(&self) -> &str {
        self.question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(self.topic.title())
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn formulation_block(f: &Formulation) -> String {
    let name = if f.name.trim().is_empty() { "미정" } else { f.name.trim() };
    format!(
        "현재 제품: {name}\nBrix: {}, pH: {}\n원료: {}\n",
        optional(f.metadata.brix),
        optional(f.metadata.ph),
        f.names().collect::<Vec<_>>().join(", ")
    )
}

pub fn process_analysis_prompt(req: &AnalysisRequest<'_>) -> String {
    let formulation = req.formulation.map(formulation_block).unwrap_or_default();
    let steps = req
        .steps
        .iter()
        .map(|s| format!("- {}: 위해요소={}, 관리기준={}", s.name, s.risk, s.control))
        .collect::<Vec<_>>()
        .join("\n");
    let references = if req.documents.is_empty() {
        "(참조 문서 없음)".to_string()
    } else {
        let blocks: Vec<String> = req.documents.iter().map(TextDocument::prompt_block).collect();
        format!("참조 문서 내용:\n\n{}", blocks.join("\n\n"))
    };

    format!(
        "당신은 식품공학 R&D 연구원이자 HACCP 전문가입니다.\n\n\
         {formulation}\n\
         공정 단계:\n{steps}\n\n\
         {references}\n\n\
         분석 요청: {question}\n\n\
         다음 형식으로 상세 분석해주세요:\n\
         1. 현황 분석\n\
         2. 핵심 리스크 요인 (구체적)\n\
         3. 관리 기준 적정성 평가\n\
         4. 개선 권고사항\n\
         5. 문서 기반 근거 (있는 경우)\n\n\
         전문적이고 구체적으로 작성하되, 한국어로 답변하세요.",
        question = req.question(),
    )
}

pub fn label_review_prompt(sheet: &LabelSheet, reference: Option<&TextDocument>) -> String {
    let label = sheet
        .iter()
        .map(|(field, value)| format!("- {}: {}", field.korean(), value.trim()))
        .collect::<Vec<_>>()
        .join("\n");
    let reference = reference
        .map(|doc| doc.truncated(LABEL_REFERENCE_CHARS).to_string())
        .unwrap_or_else(|| "(기준 문서 없음)".to_string());

    format!(
        "당신은 식품표시 전문가입니다. 아래 표시사항이 '식품등의 표시기준'에 적합한지 검토하세요.\n\n\
         [작성된 표시사항]\n{label}\n\n\
         [식품등의 표시기준 참고]\n{reference}\n\n\
         다음을 분석해주세요:\n\
         1. 필수 표시항목 누락 여부\n\
         2. 각 항목별 기준 충족 여부 (구체적)\n\
         3. 영양성분 표시 적정성\n\
         4. 알레르기 표시 적정성\n\
         5. 개선 필요 사항\n\
         6. 종합 판정 (적합/부적합/조건부적합)\n\n\
         한국어로 전문적으로 작성하세요."
    )
}

/// Asks for a formulation in the JSON shape of
/// [`CardFormulation`](formlab_core::card::CardFormulation).
pub fn card_prompt(card: &ProductCard, total_volume: &str) -> String {
    format!(
        "당신은 음료 R&D 연구원입니다. 시판 제품 '{name}'({category})과 유사한 제품의 \
         예상 배합비를 {total_volume} 기준으로 작성하세요.\n\
         제품 설명: {desc}\n\n\
         설명 없이 아래 형식의 JSON 객체 하나만 출력하세요. pct 합계는 100이어야 합니다.\n\
         {{\"productName\": \"...\", \"concept\": \"...\", \"totalVolume\": \"{total_volume}\", \
         \"brix\": 0.0, \"pH\": 0.0, \"calories\": 0, \"shelfLife\": \"...\", \
         \"ingredients\": [{{\"name\": \"...\", \"amount\": \"...\", \"pct\": 0.0, \
         \"function\": \"...\", \"grade\": \"...\"}}]}}",
        name = card.name,
        category = card.category,
        desc = card.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use formlab_core::enums::RiskLevel;
    use formlab_core::formulation::FormulationBuilder;
    use formlab_core::label::LabelField;

    fn steps() -> Vec<ProcessStep> {
        vec![ProcessStep {
            id: 5,
            icon: String::new(),
            name: "살균".to_string(),
            risk: "미생물 잔존".to_string(),
            control: "95℃ 30초".to_string(),
            level: RiskLevel::High,
        }]
    }

    #[test]
    fn analysis_prompt_quotes_steps_and_documents() {
        let steps = steps();
        let docs = vec![TextDocument::new("haccp.txt", "살균 온도 기록")];
        let f = FormulationBuilder::new()
            .name("레몬 소다")
            .ingredient("정제수", 90.0)
            .ingredient("설탕", 10.0)
            .brix(10.2)
            .build();
        let req = AnalysisRequest {
            topic: AnalysisTopic::Sterilization,
            question: None,
            formulation: Some(&f),
            steps: &steps,
            documents: &docs,
        };
        let prompt = process_analysis_prompt(&req);
        assert!(prompt.contains("현재 제품: 레몬 소다"));
        assert!(prompt.contains("Brix: 10.2, pH: -"));
        assert!(prompt.contains("원료: 정제수, 설탕"));
        assert!(prompt.contains("- 살균: 위해요소=미생물 잔존, 관리기준=95℃ 30초"));
        assert!(prompt.contains("[document: haccp.txt]"));
        assert!(prompt.contains("분석 요청: 살균 공정 적정성"));
    }

    #[test]
    fn custom_question_wins_over_topic() {
        let steps = steps();
        let req = AnalysisRequest {
            topic: AnalysisTopic::Custom,
            question: Some("  탄산음료 살균 온도 기준은?  "),
            formulation: None,
            steps: &steps,
            documents: &[],
        };
        assert_eq!(req.question(), "탄산음료 살균 온도 기준은?");
        assert!(process_analysis_prompt(&req).contains("(참조 문서 없음)"));

        let blank = AnalysisRequest { question: Some(" "), ..req };
        assert_eq!(blank.question(), "사용자 정의 질문");
    }

    #[test]
    fn label_prompt_truncates_reference() {
        let sheet = LabelSheet::new().set(LabelField::ProductName, "레몬 소다");
        let long = "가".repeat(LABEL_REFERENCE_CHARS + 50);
        let doc = TextDocument::new("기준.txt", long);
        let prompt = label_review_prompt(&sheet, Some(&doc));
        assert!(prompt.contains("- 제품명: 레몬 소다"));
        let excerpt = prompt
            .split("[식품등의 표시기준 참고]\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        assert_eq!(excerpt.chars().count(), LABEL_REFERENCE_CHARS);
        assert!(excerpt.chars().all(|c| c == '가'));
    }

    #[test]
    fn card_prompt_embeds_schema() {
        let card = ProductCard {
            id: "cola".to_string(),
            name: "코카콜라".to_string(),
            emoji: String::new(),
            category: "탄산음료".to_string(),
            description: "클래식 콜라".to_string(),
        };
        let prompt = card_prompt(&card, "500ml");
        assert!(prompt.contains("'코카콜라'(탄산음료)"));
        assert!(prompt.contains("\"totalVolume\": \"500ml\""));
        assert!(prompt.contains("\"ingredients\": [{"));
    }
}
