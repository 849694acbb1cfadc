//! Moderator reply parsing for consensus analysis.
//!
//! The moderator is asked to answer in a labelled line format (see
//! [`PromptTemplate::consensus_prompt`](crate::prompt::PromptTemplate::consensus_prompt)).
//! Models do not always comply, so every field is pulled out by its own
//! extractor and falls back to its zero value on its own. Nothing in here
//! can fail: the worst case is a "no consensus" verdict.
//!
//! | Label | Extractor | Zero value |
//! |-------|-----------|------------|
//! | `CONSENSUS` | [`parse_consensus_flag`] | `false` |
//! | `AGREEMENT_LEVEL` | [`parse_agreement_level`] | `0.0` |
//! | `AGREEMENT_POINTS` | [`parse_bullet_list`] | empty |
//! | `DISAGREEMENT_POINTS` | [`parse_bullet_list`] | empty |
//! | `MAJORITY_VIEW` | [`parse_text_field`] | empty |
//! | `MINORITY_VIEW` | [`parse_text_field`] | `None` |

use super::verdict::ConsensusVerdict;

pub const LABEL_CONSENSUS: &str = "CONSENSUS";
pub const LABEL_AGREEMENT_LEVEL: &str = "AGREEMENT_LEVEL";
pub const LABEL_AGREEMENT_POINTS: &str = "AGREEMENT_POINTS";
pub const LABEL_DISAGREEMENT_POINTS: &str = "DISAGREEMENT_POINTS";
pub const LABEL_MAJORITY_VIEW: &str = "MAJORITY_VIEW";
pub const LABEL_MINORITY_VIEW: &str = "MINORITY_VIEW";

const KNOWN_LABELS: &[&str] = &[
    LABEL_CONSENSUS,
    LABEL_AGREEMENT_LEVEL,
    LABEL_AGREEMENT_POINTS,
    LABEL_DISAGREEMENT_POINTS,
    LABEL_MAJORITY_VIEW,
    LABEL_MINORITY_VIEW,
];

/// Parse a full moderator reply into a verdict.
pub fn parse_consensus_response(response: &str) -> ConsensusVerdict {
    ConsensusVerdict {
        reached: parse_consensus_flag(response),
        agreement_level: parse_agreement_level(response),
        agreement_points: parse_bullet_list(response, LABEL_AGREEMENT_POINTS),
        disagreement_points: parse_bullet_list(response, LABEL_DISAGREEMENT_POINTS),
        majority_view: parse_text_field(response, LABEL_MAJORITY_VIEW).unwrap_or_default(),
        minority_view: parse_text_field(response, LABEL_MINORITY_VIEW),
    }
}

/// `CONSENSUS: YES|NO`. Anything but an explicit yes is `false`.
pub fn parse_consensus_flag(response: &str) -> bool {
    field_value(response, LABEL_CONSENSUS)
        .map(|v| v.to_uppercase().starts_with("YES"))
        .unwrap_or(false)
}

/// `AGREEMENT_LEVEL: 0-100`, returned as `0.0..=1.0`.
///
/// Accepts `75`, `75%`, `75/100` and fractions such as `0.75`.
pub fn parse_agreement_level(response: &str) -> f64 {
    let Some(value) = field_value(response, LABEL_AGREEMENT_LEVEL) else {
        return 0.0;
    };

    let Some(start) = value.find(|c: char| c.is_ascii_digit()) else {
        return 0.0;
    };
    if value[..start].trim_end().ends_with('-') {
        return 0.0;
    }

    let number: String = value[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let Ok(parsed) = number.trim_end_matches('.').parse::<f64>() else {
        return 0.0;
    };

    if number.contains('.') && parsed <= 1.0 {
        return parsed.clamp(0.0, 1.0);
    }

    parsed.clamp(0.0, 100.0) / 100.0
}

/// Bullet items following `label`, up to the next known label.
///
/// An inline value on the label line itself counts as one item, unless it
/// is a placeholder such as "none".
pub fn parse_bullet_list(response: &str, label: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_section = false;

    for line in response.lines() {
        if let Some((key, value)) = split_label(line) {
            if KNOWN_LABELS.contains(&key.as_str()) {
                in_section = key == label;
                if in_section && !is_placeholder(&value) {
                    items.push(value);
                }
                continue;
            }
        }

        if !in_section {
            continue;
        }

        if let Some(item) = strip_bullet(line)
            && !is_placeholder(item)
        {
            items.push(item.to_string());
        }
    }

    items
}

/// Single-line free text after `label`; `None` when absent or a placeholder.
pub fn parse_text_field(response: &str, label: &str) -> Option<String> {
    field_value(response, label).filter(|v| !is_placeholder(v))
}

/// Value of the first line whose label matches.
fn field_value(response: &str, label: &str) -> Option<String> {
    response
        .lines()
        .filter_map(split_label)
        .find(|(key, _)| key == label)
        .map(|(_, value)| value)
}

/// Split `"**Agreement level**: 80"` into `("AGREEMENT_LEVEL", "80")`.
///
/// Bullet items are never labels, so `- Consensus: hire slowly` stays an item.
fn split_label(line: &str) -> Option<(String, String)> {
    if strip_bullet(line).is_some() {
        return None;
    }
    let cleaned = line
        .trim()
        .trim_start_matches(['#', '>', '-', '*', ' '])
        .replace("**", "");
    let (key, value) = cleaned.split_once(':')?;

    let key: String = key
        .trim()
        .chars()
        .map(|c| {
            if c == ' ' || c == '-' {
                '_'
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect();

    if key.is_empty() || !key.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        return None;
    }

    Some((key, value.trim().trim_matches('*').trim().to_string()))
}

fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let rest = if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("• "))
    {
        rest
    } else {
        let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        trimmed[digits..]
            .strip_prefix(". ")
            .or_else(|| trimmed[digits..].strip_prefix(") "))?
    };
    let rest = rest.trim();
    if rest.is_empty() { None } else { Some(rest) }
}

fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    lowered.is_empty()
        || matches!(
            lowered.trim_end_matches('.'),
            "none" | "n/a" | "na" | "-" | "nothing"
        )
}
