//! Asking the assistant with a fallback.

use serde::Serialize;
use tracing::warn;

use formlab_core::card::{CardFormulation, ProductCard};
use formlab_core::document::TextDocument;
use formlab_core::label::LabelSheet;

use crate::client::Assistant;
use crate::error::{AssistantError, Result};
use crate::fallback;
use crate::prompts::{self, AnalysisRequest};

/// Outcome of a request: the model's answer, or the fallback used instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "kebab-case")]
pub enum AssistantReply<T = String> {
    Answered(T),
    Unavailable(T),
}

impl<T> AssistantReply<T> {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Answered(v) | Self::Unavailable(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Answered(v) | Self::Unavailable(v) => v,
        }
    }
}

/// Sends `prompt`; any failure yields `fallback()` as [`AssistantReply::Unavailable`].
pub fn ask<A, F>(assistant: &A, prompt: &str, fallback: F) -> AssistantReply
where
    A: Assistant + ?Sized,
    F: FnOnce() -> String,
{
    match assistant.complete(prompt) {
        Ok(text) => AssistantReply::Answered(text),
        Err(e) => {
            warn!(error = %e, "assistant unavailable, using fallback");
            AssistantReply::Unavailable(fallback())
        }
    }
}

pub fn analyze_process<A: Assistant + ?Sized>(
    assistant: &A,
    req: &AnalysisRequest<'_>,
) -> AssistantReply {
    ask(assistant, &prompts::process_analysis_prompt(req), || {
        fallback::process_analysis(req)
    })
}

pub fn review_label<A: Assistant + ?Sized>(
    assistant: &A,
    sheet: &LabelSheet,
    reference: Option<&TextDocument>,
) -> AssistantReply {
    ask(assistant, &prompts::label_review_prompt(sheet, reference), || {
        fallback::label_review(sheet, reference)
    })
}

/// Drafts a formulation for `card`. An answer that does not parse as a
/// formulation counts as unavailable and `default` is returned.
pub fn generate_card<A: Assistant + ?Sized>(
    assistant: &A,
    card: &ProductCard,
    default: CardFormulation,
) -> AssistantReply<CardFormulation> {
    let prompt = prompts::card_prompt(card, &default.total_volume);
    let parsed = assistant
        .complete(&prompt)
        .and_then(|text| parse_card_answer(&text));
    match parsed {
        Ok(mut formulation) => {
            if formulation.product_name.trim().is_empty() {
                formulation.product_name = default.product_name;
            }
            if formulation.concept.trim().is_empty() {
                formulation.concept = default.concept;
            }
            if formulation.total_volume.trim().is_empty() {
                formulation.total_volume = default.total_volume;
            }
            AssistantReply::Answered(formulation)
        }
        Err(e) => {
            warn!(card = %card.id, error = %e, "no usable card answer, using default formulation");
            AssistantReply::Unavailable(default)
        }
    }
}

/// Parses the JSON object in `text`, tolerating surrounding prose or a code
/// fence.
pub fn parse_card_answer(text: &str) -> Result<CardFormulation> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &text[s..=e],
        _ => return Err(AssistantError::Malformed("no JSON object in answer".to_string())),
    };
    let formulation: CardFormulation =
        serde_json::from_str(json).map_err(|e| AssistantError::Malformed(e.to_string()))?;
    if formulation.ingredients.is_empty() {
        return Err(AssistantError::Malformed("formulation has no ingredients".to_string()));
    }
    Ok(formulation)
}
