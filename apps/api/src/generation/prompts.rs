// All LLM prompt constants for the generation and hashtag gateways.

use serde_json::json;

use crate::generation::tone::Tone;
use crate::llm_client::JsonSchema;

/// Number of variants requested per draft.
pub const VARIANT_COUNT: usize = 3;

/// Number of hashtags requested per post.
pub const HASHTAG_COUNT: usize = 10;

/// Tone-independent part of the rewrite system instruction.
const GHOSTWRITER_PRINCIPLES: &str = r#"You are an expert LinkedIn ghostwriter known for "Zero Cringe" content. Rewrite rough drafts into high-performing, authentic LinkedIn posts.

Principles:
- NO corporate jargon (synergy, delighted to announce, humbled)
- NO fake toxic positivity or hustle culture
- Focus on storytelling, vulnerability, or technical insights based on tone
- Use short paragraphs and clear hooks"#;

/// Rewrite prompt template. Replace `{count}`, `{tone}` and `{draft}` before sending.
const OPTIMIZE_PROMPT_TEMPLATE: &str = r##"Rewrite the following draft into {count} distinct variations using the "{tone}" tone.

Draft: "{draft}"

Return JSON ONLY in this EXACT shape (no extra fields):
{
  "posts": [
    {
      "headline": "A scroll-stopping first line",
      "content": "The full post body",
      "tags": ["#Tag"],
      "toneExplanation": "Why this version works for the chosen tone"
    }
  ]
}

HARD RULES:
1. Return exactly {count} objects in "posts"
2. Each "tags" list has between 3 and 5 hashtags
3. Every field is a string except "tags", which is a list of strings"##;

/// Hashtag prompt template. Replace `{count}` and `{content}` before sending.
const HASHTAG_PROMPT_TEMPLATE: &str = r##"Analyze the following LinkedIn post and suggest {count} trending, high-reach hashtags. Focus on niche tags with good engagement, not generic ones like #business.

Post: "{content}"

Return JSON ONLY in the shape: { "hashtags": ["#tag"] }"##;

/// A fully assembled prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// The fixed system instruction: principles plus every tone's description.
pub fn optimize_system_instruction() -> String {
    let tones = Tone::ALL
        .iter()
        .map(|tone| format!("- {}: {}", tone.label(), tone.description()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{GHOSTWRITER_PRINCIPLES}\n\nTones:\n{tones}")
}

pub fn build_optimize_prompt(draft: &str, tone: Tone) -> Prompt {
    Prompt {
        system: optimize_system_instruction(),
        user: OPTIMIZE_PROMPT_TEMPLATE
            .replace("{count}", &VARIANT_COUNT.to_string())
            .replace("{tone}", tone.label())
            .replace("{draft}", draft),
    }
}

pub fn build_hashtag_prompt(content: &str) -> String {
    HASHTAG_PROMPT_TEMPLATE
        .replace("{count}", &HASHTAG_COUNT.to_string())
        .replace("{content}", content)
}

/// Schema for schema-constrained providers. Strict mode needs an object at the top.
pub fn posts_schema() -> JsonSchema {
    JsonSchema {
        name: "optimized_posts",
        schema: json!({
            "type": "object",
            "properties": {
                "posts": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "headline": {"type": "string"},
                            "content": {"type": "string"},
                            "tags": {"type": "array", "items": {"type": "string"}},
                            "toneExplanation": {"type": "string"}
                        },
                        "required": ["headline", "content", "tags", "toneExplanation"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["posts"],
            "additionalProperties": false
        }),
    }
}

pub fn hashtags_schema() -> JsonSchema {
    JsonSchema {
        name: "hashtag_suggestions",
        schema: json!({
            "type": "object",
            "properties": {
                "hashtags": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["hashtags"],
            "additionalProperties": false
        }),
    }
}
