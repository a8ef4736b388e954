use crate::safety::{Tone, normalize};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseCategory {
    Rejection,
    Interview,
    Money,
    Networking,
    Resume,
    Motivation,
    Overwhelm,
    General,
}

/// Canned reply used when the upstream model is unavailable.
/// Triggers are stored in normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CachedResponse {
    pub trigger: &'static str,
    pub response: &'static str,
    pub tone: Tone,
    pub category: ResponseCategory,
}

pub const GENERIC_FALLBACK: CachedResponse = CachedResponse {
    trigger: "",
    response: "Take it one step at a time. Pick one small thing you can finish in the next hour, \
        like sending one message or updating one line of your resume, and let that be today's win. \
        Progress counts even when it's quiet.",
    tone: Tone::Pragmatist,
    category: ResponseCategory::General,
};

static CACHED_RESPONSES: [CachedResponse; 14] = [
    CachedResponse {
        trigger: "rejected",
        response: "Getting rejected hurts, and it also means you're in the game. Every no narrows \
            the field to the yes that fits. You're closer than you were yesterday!",
        tone: Tone::Hype,
        category: ResponseCategory::Rejection,
    },
    CachedResponse {
        trigger: "rejection",
        response: "Rejection is feedback, not a verdict. Look at the last three applications: \
            what do they have in common? Adjust one thing and send the next one today.",
        tone: Tone::ToughLove,
        category: ResponseCategory::Rejection,
    },
    CachedResponse {
        trigger: "interview",
        response: "Prepare three short stories that show a problem you solved, what you did, and \
            the result. Practice them out loud once, then stop rehearsing.",
        tone: Tone::Pragmatist,
        category: ResponseCategory::Interview,
    },
    CachedResponse {
        trigger: "nervous",
        response: "Nerves mean you care, and that energy is an asset. They already liked you \
            enough to talk to you. Walk in like the person they hoped to meet!",
        tone: Tone::Hype,
        category: ResponseCategory::Interview,
    },
    CachedResponse {
        trigger: "money",
        response: "Write down your monthly essentials and what you have in the bank. Knowing your \
            runway in weeks turns a vague worry into a plan you can act on.",
        tone: Tone::Pragmatist,
        category: ResponseCategory::Money,
    },
    CachedResponse {
        trigger: "bills",
        response: "Call your biggest creditors this week and ask about hardship options. Waiting \
            makes it harder. One phone call now saves you stress later.",
        tone: Tone::ToughLove,
        category: ResponseCategory::Money,
    },
    CachedResponse {
        trigger: "network",
        response: "Reach out to two former colleagues this week. Keep it simple: say what you're \
            looking for and ask who they think you should talk to.",
        tone: Tone::Pragmatist,
        category: ResponseCategory::Networking,
    },
    CachedResponse {
        trigger: "linkedin",
        response: "Scrolling LinkedIn isn't networking. Send three personal messages today \
            instead of reading posts about other people's wins.",
        tone: Tone::ToughLove,
        category: ResponseCategory::Networking,
    },
    CachedResponse {
        trigger: "resume",
        response: "Lead each bullet with a result and a number where you can. Tailor the top \
            third of your resume to the role you want most.",
        tone: Tone::Pragmatist,
        category: ResponseCategory::Resume,
    },
    CachedResponse {
        trigger: "cover letter",
        response: "Keep cover letters to three short paragraphs: why this company, what you bring, \
            and one concrete example. Reuse the structure, not the words.",
        tone: Tone::Pragmatist,
        category: ResponseCategory::Resume,
    },
    CachedResponse {
        trigger: "motivation",
        response: "You've already survived the hardest day, the day it happened. Motivation \
            follows action, so start one tiny task and let the momentum build!",
        tone: Tone::Hype,
        category: ResponseCategory::Motivation,
    },
    CachedResponse {
        trigger: "unmotivated",
        response: "You don't need to feel motivated to do the next thing. Set a 20-minute timer, \
            do one task, and then decide whether to keep going.",
        tone: Tone::ToughLove,
        category: ResponseCategory::Motivation,
    },
    CachedResponse {
        trigger: "overwhelm",
        response: "When everything feels urgent, pick just three tasks for today and write them \
            down. Anything else can wait until tomorrow's list.",
        tone: Tone::Pragmatist,
        category: ResponseCategory::Overwhelm,
    },
    CachedResponse {
        trigger: "too much",
        response: "It's a lot, and you're still here handling it. That's strength. Take a breath, \
            do one small thing, and celebrate it!",
        tone: Tone::Hype,
        category: ResponseCategory::Overwhelm,
    },
];

pub fn cached_responses() -> &'static [CachedResponse] {
    &CACHED_RESPONSES
}

/// Best canned reply for `message`: entries whose trigger occurs in the
/// normalized message, preferring the selected tone, then the longest
/// trigger, then table order. Never fails.
pub fn select_cached_response(message: &str, tone: Tone) -> &'static CachedResponse {
    let haystack = normalize(message);
    let mut best: Option<&'static CachedResponse> = None;

    for entry in CACHED_RESPONSES.iter() {
        if !haystack.contains(entry.trigger) {
            continue;
        }
        best = match best {
            None => Some(entry),
            Some(current) => {
                let rank = |e: &CachedResponse| (e.tone == tone, e.trigger.len());
                // Strictly greater keeps the earlier entry on ties.
                if rank(entry) > rank(current) {
                    Some(entry)
                } else {
                    Some(current)
                }
            }
        };
    }

    best.unwrap_or(&GENERIC_FALLBACK)
}
