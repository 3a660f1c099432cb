//! Deterministic answers used when the assistant is unavailable.

use std::fmt::Write;

use formlab_core::document::TextDocument;
use formlab_core::label::{LabelField, LabelSheet};
use formlab_core::process::ccp_steps;

use crate::prompts::AnalysisRequest;

const PROCESS_DISCLAIMER: &str =
    "⚠️ *본 분석은 참고 자료이며, 최종 판단은 식품안전 전문가의 검토가 필요합니다.*";
const LABEL_DISCLAIMER: &str = "⚠️ *참고용 분석이며, 최종 판단은 식약처 기준을 따르세요.*";

/// Fields a label review reports on, with the mark used when one is blank.
const REVIEWED_FIELDS: &[(LabelField, &str)] = &[
    (LabelField::ProductName, "❌ 누락"),
    (LabelField::FoodType, "❌ 누락"),
    (LabelField::Company, "❌ 누락"),
    (LabelField::ShelfLife, "❌ 누락"),
    (LabelField::Volume, "❌ 누락"),
    (LabelField::Ingredients, "❌ 누락"),
    (LabelField::Nutrition, "❌ 누락"),
    (LabelField::Allergens, "⚠️ 확인필요"),
    (LabelField::Storage, "❌ 누락"),
];

/// Sheets with more filled fields than this read as mostly complete.
const MOSTLY_FILLED: usize = 7;

pub fn process_analysis(req: &AnalysisRequest<'_>) -> String {
    let mut out = String::new();
    let subject = match req.formulation {
        Some(f) if !f.name.trim().is_empty() => format!("제품 \"{}\" 기준 ", f.name.trim()),
        _ => "일반 음료 ".to_string(),
    };

    let _ = writeln!(out, "## {} 분석 결과\n", req.question());
    let _ = writeln!(out, "### 1. 현황 분석");
    let _ = writeln!(out, "{subject}제조공정 {}단계를 검토하였습니다.\n", req.steps.len());

    let _ = writeln!(out, "### 2. 핵심 리스크 요인");
    for (i, step) in ccp_steps(req.steps).into_iter().enumerate() {
        let _ = writeln!(
            out,
            "- **{} (CCP-{})**: {}. 관리기준 {} 준수 필수",
            step.name,
            i + 1,
            step.risk,
            step.control
        );
    }
    let _ = writeln!(out, "- **계량·배합**: 배합 오차 시 품질 편차 발생, 전자저울 캘리브레이션 필수\n");

    let ph = req.formulation.and_then(|f| f.metadata.ph);
    let _ = writeln!(out, "### 3. 관리 기준 적정성");
    match ph {
        Some(ph) => {
            let _ = writeln!(out, "- 살균 조건: 적정 (pH {ph} 기준)");
        }
        None => {
            let _ = writeln!(out, "- 살균 조건: 확인 필요");
        }
    }
    let _ = writeln!(out, "- 모니터링: CCP별 연속 온도 기록장치(RTD) 설치 권장");
    let _ = writeln!(out, "- 검증: 월 1회 이상 미생물 한도 시험 실시\n");

    let _ = writeln!(out, "### 4. 개선 권고사항");
    let _ = writeln!(out, "1. 살균 공정의 F₀값 계산 및 검증 실시");
    let _ = writeln!(out, "2. 자동 배합 시스템 도입으로 계량 오차 최소화");
    let _ = writeln!(out, "3. 밀봉 후 기밀시험 100% 전수검사 실시");
    let _ = writeln!(out, "4. HACCP 팀 정기교육 (분기 1회 이상)\n");

    let _ = writeln!(out, "### 5. 문서 기반 근거");
    if req.documents.is_empty() {
        let _ = writeln!(
            out,
            "참조 문서가 없습니다. 공정 문서를 함께 제공하면 더 정확한 분석이 가능합니다.\n"
        );
    } else {
        let names: Vec<&str> = req.documents.iter().map(|d| d.name.as_str()).collect();
        let _ = writeln!(out, "제공된 문서 ({})를 참조하였습니다.\n", names.join(", "));
    }

    out.push_str(PROCESS_DISCLAIMER);
    out.push('\n');
    out
}

pub fn label_review(sheet: &LabelSheet, reference: Option<&TextDocument>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## 표시사항 적합성 검토 결과\n");

    let _ = writeln!(out, "### 1. 필수 표시항목 점검");
    for (field, blank_mark) in REVIEWED_FIELDS {
        let mark = if sheet.is_filled(*field) { "✅" } else { blank_mark };
        let _ = writeln!(out, "- {}: {mark}", field.korean());
    }

    let _ = writeln!(out, "\n### 2. 개선 필요 사항");
    let _ = writeln!(out, "- 영양성분 9가지 항목 전부 기재 여부 확인 필요");
    let _ = writeln!(out, "- 원재료명 함량순 배열 확인 필요");
    if sheet.is_filled(LabelField::Caffeine) {
        let _ = writeln!(out, "- 카페인 함량 표시 확인 필요");
    } else {
        let _ = writeln!(out, "- 카페인 해당 여부 확인");
    }
    if reference.is_none() {
        let _ = writeln!(out, "- 표시기준 원문이 없어 조항 대조는 생략됨");
    }

    let filled = LabelField::ALL.iter().filter(|f| sheet.is_filled(**f)).count();
    let summary = if filled > MOSTLY_FILLED { "대부분 작성됨" } else { "보완 필요" };
    let _ = writeln!(out, "\n### 3. 종합");
    let _ = writeln!(
        out,
        "기본 항목은 {summary}. 세부 기준 충족 여부는 전문가 최종 확인 권장.\n"
    );

    out.push_str(LABEL_DISCLAIMER);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use formlab_core::enums::{AnalysisTopic, RiskLevel};
    use formlab_core::formulation::FormulationBuilder;
    use formlab_core::process::ProcessStep;

    fn step(name: &str, level: RiskLevel) -> ProcessStep {
        ProcessStep {
            id: 1,
            icon: String::new(),
            name: name.to_string(),
            risk: "미생물 오염".to_string(),
            control: "온도 기록".to_string(),
            level,
        }
    }

    #[test]
    fn process_fallback_lists_ccps_in_order() {
        let steps = vec![
            step("원료 입고", RiskLevel::Mid),
            step("살균", RiskLevel::High),
            step("충전·밀봉", RiskLevel::High),
        ];
        let f = FormulationBuilder::new()
            .name("콜라")
            .ingredient("정제수", 100.0)
            .ph(3.2)
            .build();
        let req = AnalysisRequest {
            topic: AnalysisTopic::Ccp,
            question: None,
            formulation: Some(&f),
            steps: &steps,
            documents: &[],
        };
        let text = process_analysis(&req);
        assert!(text.starts_with("## HACCP CCP 검토 분석 결과"));
        assert!(text.contains("제품 \"콜라\" 기준 제조공정 3단계"));
        assert!(text.contains("**살균 (CCP-1)**"));
        assert!(text.contains("**충전·밀봉 (CCP-2)**"));
        assert!(!text.contains("원료 입고 (CCP"));
        assert!(text.contains("적정 (pH 3.2 기준)"));
        assert!(text.contains("참조 문서가 없습니다"));
    }

    #[test]
    fn process_fallback_names_documents() {
        let docs = vec![TextDocument::new("a.txt", ""), TextDocument::new("b.txt", "")];
        let req = AnalysisRequest {
            topic: AnalysisTopic::Overall,
            question: None,
            formulation: None,
            steps: &[],
            documents: &docs,
        };
        let text = process_analysis(&req);
        assert!(text.contains("일반 음료 제조공정 0단계"));
        assert!(text.contains("살균 조건: 확인 필요"));
        assert!(text.contains("제공된 문서 (a.txt, b.txt)"));
    }

    #[test]
    fn label_fallback_marks_blank_fields() {
        let sheet = LabelSheet::new()
            .set(LabelField::ProductName, "레몬 소다")
            .set(LabelField::Allergens, "-")
            .set(LabelField::Caffeine, "32mg");
        let text = label_review(&sheet, None);
        assert!(text.contains("- 제품명: ✅"));
        assert!(text.contains("- 식품유형: ❌ 누락"));
        assert!(text.contains("- 알레르기: ⚠️ 확인필요"));
        assert!(text.contains("카페인 함량 표시 확인 필요"));
        assert!(text.contains("기본 항목은 보완 필요"));
    }
}
