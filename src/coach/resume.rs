use super::types::{KeywordMatch, ResumeAnalysis, SectionFeedback};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawAnalysis {
    overall_score: Option<f64>,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    keyword_match: RawKeywordMatch,
    sections: Vec<RawSection>,
    ai_insights: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawKeywordMatch {
    score: Option<f64>,
    matched: Vec<String>,
    missing: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSection {
    name: String,
    quality: Option<f64>,
    suggestions: Vec<String>,
}

fn clamp_score(value: Option<f64>) -> u8 {
    match value {
        Some(v) if v.is_finite() => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let score = v.round().clamp(0.0, 100.0) as u8;
            score
        }
        _ => 0,
    }
}

/// Slice the JSON object out of a model reply that may wrap it in a
/// Markdown fence or surround it with prose.
fn extract_json_object(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let unfenced = match trimmed.find("```") {
        Some(start) => {
            let after = &trimmed[start + 3..];
            let body_start = after.find('\n').map_or(0, |i| i + 1);
            let body = &after[body_start..];
            body.find("```").map_or(body, |end| &body[..end])
        }
        None => trimmed,
    };

    let open = unfenced.find('{')?;
    let close = unfenced.rfind('}')?;
    (close > open).then(|| &unfenced[open..=close])
}

pub fn parse_resume_analysis(raw: &str) -> Result<ResumeAnalysis, String> {
    let json = extract_json_object(raw).ok_or_else(|| "reply contained no JSON object".to_string())?;
    let parsed: RawAnalysis =
        serde_json::from_str(json).map_err(|error| format!("invalid analysis JSON: {error}"))?;

    Ok(ResumeAnalysis {
        overall_score: clamp_score(parsed.overall_score),
        strengths: parsed.strengths,
        weaknesses: parsed.weaknesses,
        keyword_match: KeywordMatch {
            score: clamp_score(parsed.keyword_match.score),
            matched: parsed.keyword_match.matched,
            missing: parsed.keyword_match.missing,
        },
        sections: parsed
            .sections
            .into_iter()
            .filter(|section| !section.name.trim().is_empty())
            .map(|section| SectionFeedback {
                name: section.name,
                quality: clamp_score(section.quality),
                suggestions: section.suggestions,
            })
            .collect(),
        ai_insights: parsed.ai_insights.unwrap_or_default().trim().to_string(),
    })
}
