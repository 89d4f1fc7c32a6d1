//! Shape and number checks on a service reply. A reply that fails any check
//! is discarded whole.

use scenario_core::NarrativeBlock;
use signal_engine::citations::is_backed_by;

use crate::error::{NarrativeError, NarrativeResult};
use crate::provider::NarrativeResponse;

pub const MAX_HEADLINE_WORDS: usize = 12;
pub const MIN_ANSWER_SENTENCES: usize = 2;
pub const MAX_ANSWER_SENTENCES: usize = 4;
pub const CONFIDENCE_LEVELS: [&str; 3] = ["high", "medium", "low"];

/// Sentences end at `.`, `!` or `?` followed by whitespace or the end of text,
/// so decimals such as `82.0%` do not split.
pub fn sentence_count(text: &str) -> usize {
    let chars: Vec<char> = text.trim().chars().collect();
    let mut count = 0;
    let mut pending = false;
    for (i, c) in chars.iter().enumerate() {
        let closes = matches!(c, '.' | '!' | '?')
            && chars.get(i + 1).map_or(true, |next| next.is_whitespace());
        if closes {
            if pending {
                count += 1;
            }
            pending = false;
        } else if !c.is_whitespace() {
            pending = true;
        }
    }
    if pending {
        count += 1;
    }
    count
}

fn invalid(reason: String) -> NarrativeError {
    NarrativeError::InvalidResponse(reason)
}

pub fn validate_response(response: &NarrativeResponse, block: &NarrativeBlock) -> NarrativeResult<()> {
    let words = response.headline.split_whitespace().count();
    if words == 0 {
        return Err(invalid("headline is empty".to_string()));
    }
    if words > MAX_HEADLINE_WORDS {
        return Err(invalid(format!("headline has {words} words")));
    }

    let sentences = sentence_count(&response.answer);
    if !(MIN_ANSWER_SENTENCES..=MAX_ANSWER_SENTENCES).contains(&sentences) {
        return Err(invalid(format!("answer has {sentences} sentences")));
    }

    if !CONFIDENCE_LEVELS.contains(&response.confidence.as_str()) {
        return Err(invalid(format!("unknown confidence {:?}", response.confidence)));
    }

    let texts = [&response.headline, &response.answer]
        .into_iter()
        .chain(&response.key_metrics)
        .chain(&response.drivers);
    for text in texts {
        if !is_backed_by(text, &block.citations) {
            return Err(invalid(format!("uncited number in {text:?}")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{Citation, FindingSeverity};

    fn block() -> NarrativeBlock {
        NarrativeBlock {
            id: "finding-runway".to_string(),
            category: "runway".to_string(),
            severity: Some(FindingSeverity::Neutral),
            headline: "Runway is adequate".to_string(),
            body: "Median runway is 20 months, with a downside case of 14 months.".to_string(),
            citations: vec![
                Citation {
                    label: "Runway P50".to_string(),
                    value: "20 months".to_string(),
                },
                Citation {
                    label: "Runway P10".to_string(),
                    value: "14 months".to_string(),
                },
            ],
        }
    }

    fn response() -> NarrativeResponse {
        NarrativeResponse {
            headline: "Runway gives the plan room to work".to_string(),
            answer: "The median case funds 20 months of operations. Even the downside keeps 14 months in hand.".to_string(),
            key_metrics: vec!["20 months".to_string(), "14 months".to_string()],
            drivers: vec!["Steady burn".to_string()],
            confidence: "medium".to_string(),
        }
    }

    #[test]
    fn test_sentence_count() {
        assert_eq!(sentence_count("One. Two! Three?"), 3);
        assert_eq!(sentence_count("Survival is 82.0% today. It was lower."), 2);
        assert_eq!(sentence_count("No terminator at all"), 1);
        assert_eq!(sentence_count("   "), 0);
        assert_eq!(sentence_count("Wait... what?"), 2);
    }

    #[test]
    fn test_accepts_faithful_response() {
        validate_response(&response(), &block()).unwrap();
    }

    #[test]
    fn test_rejects_long_headline() {
        let mut r = response();
        r.headline = "one two three four five six seven eight nine ten eleven twelve thirteen".to_string();
        assert!(validate_response(&r, &block()).is_err());
        r.headline = "  ".to_string();
        assert!(validate_response(&r, &block()).is_err());
    }

    #[test]
    fn test_rejects_sentence_count() {
        let mut r = response();
        r.answer = "Only one sentence here.".to_string();
        assert!(validate_response(&r, &block()).is_err());
        r.answer = "A. B. C. D. E.".to_string();
        assert!(validate_response(&r, &block()).is_err());
    }

    #[test]
    fn test_rejects_unknown_confidence() {
        let mut r = response();
        r.confidence = "certain".to_string();
        assert!(validate_response(&r, &block()).is_err());
    }

    #[test]
    fn test_rejects_tampered_numbers() {
        let mut r = response();
        r.answer = "The median case funds 22 months of operations. Even the downside keeps 14 months.".to_string();
        assert!(matches!(
            validate_response(&r, &block()),
            Err(NarrativeError::InvalidResponse(_))
        ));

        let mut r = response();
        r.key_metrics.push("$4.0M".to_string());
        assert!(validate_response(&r, &block()).is_err());
    }
}
