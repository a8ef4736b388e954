use super::types::{PLAN_LENGTH_DAYS, UserContext};
use crate::safety::{EmotionalState, Tone};
use std::fmt::Write;

const BASE_RULES: &str = "You are Next Chapter, a career recovery coach for people who were recently laid off.
Rules:
- Reply in at most 150 words.
- Give one or two concrete next steps the user can take today.
- Do not give legal, medical, or investment advice; suggest a qualified professional instead.
- Never ask for Social Security numbers, card numbers, or passwords.";

fn persona(tone: Tone) -> &'static str {
    match tone {
        Tone::Hype => {
            "Voice: hype. Be warm and energetic. Reflect the user's strengths back to them, \
             celebrate small wins, and end on an encouraging note."
        }
        Tone::Pragmatist => {
            "Voice: pragmatist. Be calm and practical. Focus on clear, ordered steps and \
             realistic expectations."
        }
        Tone::ToughLove => {
            "Voice: tough love. Be direct and respectful. Acknowledge the frustration once, \
             then steer the user toward what they control and hold them to a specific action."
        }
    }
}

/// System prompt for one coach exchange.
pub fn coach_system_prompt(tone: Tone, context: &UserContext, state: &EmotionalState) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(BASE_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(persona(tone));
    prompt.push_str("\n\nContext:");

    if let Some(name) = context
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        let _ = write!(prompt, "\n- The user's name is {name}.");
    }
    if let Some(days) = context.days_since_layoff {
        let _ = write!(prompt, "\n- Days since layoff: {days}.");
    }
    if let Some(day) = context.plan_day {
        if day <= PLAN_LENGTH_DAYS {
            let _ = write!(
                prompt,
                "\n- Recovery plan progress: Day {day} of {PLAN_LENGTH_DAYS}."
            );
        } else {
            let _ = write!(
                prompt,
                "\n- The user has finished the {PLAN_LENGTH_DAYS}-day plan (day {day})."
            );
        }
    }
    if state.requires_support && !state.triggers.is_empty() {
        let _ = write!(
            prompt,
            "\n- The user sounds {} (signals: {}).",
            state.primary,
            state.triggers.join(", ")
        );
    }
    prompt
}

pub fn resume_analysis_system_prompt(target_role: &str) -> String {
    format!(
        "You are an expert resume reviewer helping a job seeker target the role \"{target_role}\".
Respond with a single JSON object and nothing else, using exactly these fields:
{{
  \"overallScore\": number 0-100,
  \"strengths\": [string],
  \"weaknesses\": [string],
  \"keywordMatch\": {{ \"score\": number 0-100, \"matched\": [string], \"missing\": [string] }},
  \"sections\": [{{ \"name\": string, \"quality\": number 0-100, \"suggestions\": [string] }}],
  \"aiInsights\": string
}}"
    )
}

pub fn rewrite_section_system_prompt(section_name: &str, target_role: &str) -> String {
    format!(
        "You are an expert resume writer. Rewrite the user's \"{section_name}\" section for a \
         \"{target_role}\" role. Use strong action verbs and quantified results, keep facts \
         unchanged, and reply with only the rewritten section text."
    )
}
