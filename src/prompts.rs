//! Prompt assembly for post and hook generation.
//!
//! The output-schema descriptions here are contracts with the fallback
//! orchestrator: post prompts ask for exactly 2 variants, hook prompts
//! for exactly 3, both as JSON objects with fixed field names.

use crate::types::{PostLength, Tone};

/// Post structure templates the user can pick by id.
pub const TEMPLATE_IDS: &[&str] = &["story-lesson", "contrarian-take", "listicle", "how-to"];

/// System/user prompt pair handed to the orchestrator as opaque strings.
#[derive(Debug)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

fn tone_modifiers(tone: Tone) -> &'static str {
    match tone {
        Tone::Friendly => {
            r#"- Use "I", "you", "we" pronouns
- Include 1-2 relevant emojis
- Sound like you're chatting with a colleague over coffee
- Be warm, encouraging, and approachable
- Use contractions (I'm, you're, it's)"#
        }
        Tone::Smart => {
            r#"- Lead with a counterintuitive insight or observation
- Use analytical language
- Sound like an expert sharing valuable knowledge
- Avoid emojis
- Be thought-provoking without being preachy"#
        }
        Tone::Professional => {
            r#"- Use formal, polished language
- Focus on achievements, skills, and results
- Avoid emojis entirely
- Sound like a thought leader or executive
- Be concise and results-oriented"#
        }
        Tone::Storytelling => {
            r#"- Start with a relatable struggle, moment, or question
- Build a narrative arc (setup -> tension -> resolution)
- Use vivid, sensory details
- Create emotional connection
- Use "I" perspective for authenticity"#
        }
    }
}

fn template_instructions(template_id: &str) -> Option<&'static str> {
    match template_id {
        "story-lesson" => Some(
            "Structure each post as a personal story that lands on a lesson: \
             open in the middle of a specific moment, walk through what happened, \
             and close with the takeaway the reader can apply.",
        ),
        "contrarian-take" => Some(
            "Structure each post as a contrarian take: open by naming the popular \
             opinion, state clearly why it's wrong or incomplete, and back the \
             counter-position with a concrete example or result.",
        ),
        "listicle" => Some(
            "Structure each post as a short numbered list (3-5 items). One line of \
             setup, then the items, each a single punchy sentence, then a closing \
             line that ties them together.",
        ),
        "how-to" => Some(
            "Structure each post as a practical how-to: name the outcome up front, \
             then give the steps in order, each concrete enough to act on today.",
        ),
        _ => None,
    }
}

fn build_system_prompt(length: PostLength) -> String {
    let (min, max) = length.char_range();
    format!(
        r##"You are an expert LinkedIn content strategist specializing in creating engaging, authentic posts that drive meaningful engagement.

CRITICAL RULES:
1. Character limit: {min}-{max} characters (strict)
2. First 140 characters MUST hook the reader (mobile preview)
3. Use short paragraphs (2-3 lines max)
4. End with a clear, engaging question or CTA
5. Sound human, not robotic
6. Keep hashtags out of the post text; put 3-5 relevant ones in the "hashtags" field
7. Avoid overly salesy language or generic platitudes

OUTPUT FORMAT:
Return exactly 2 distinct versions of the post as a JSON object with this structure:
{{
  "posts": [
    {{
      "hook": "First 1-2 lines",
      "body": "Main content with line breaks (excluding hook and cta)",
      "cta": "Closing question or CTA",
      "full": "Complete post text including hook, body, and cta",
      "hashtags": "#space #separated #hashtags"
    }},
    {{ ... }}
  ]
}}"##
    )
}

/// Build the prompt pair for a post-generation request. `reference_post`
/// turns on brand-voice mimicry; `template_id` (already validated) adds
/// structure instructions.
pub fn build_post_prompt(
    topic: &str,
    tone: Tone,
    length: PostLength,
    reference_post: Option<&str>,
    template_id: Option<&str>,
) -> PromptPair {
    let mut user = format!(
        "Topic: {topic}\nTone: {tone}\nTarget length: {length}\n\n\
         Additional instructions for {tone} tone:\n{modifiers}\n",
        tone = tone.as_str(),
        length = length.as_str(),
        modifiers = tone_modifiers(tone),
    );

    if let Some(instructions) = template_id.and_then(template_instructions) {
        user.push_str("\nPost structure:\n");
        user.push_str(instructions);
        user.push('\n');
    }

    if let Some(reference) = reference_post {
        user.push_str(&format!(
            "\nBrand voice: the user writes like the reference post below. \
             Mirror its sentence rhythm, vocabulary, and formatting habits \
             without copying its content.\n\
             --- REFERENCE POST ---\n{reference}\n--- END REFERENCE ---\n"
        ));
    }

    user.push_str(
        "\nGenerate 2 LinkedIn posts about this topic.\n\
         Version 1: Lead with a personal angle or story.\n\
         Version 2: Lead with an insight or observation.\n",
    );

    PromptPair {
        system: build_system_prompt(length),
        user,
    }
}

/// Build the prompt pair for a hook-rewrite request: 3 alternative
/// openers for an existing post body.
pub fn build_hook_prompt(body: &str, tone: Tone) -> PromptPair {
    let system = r#"You are an expert LinkedIn content strategist. The user gives you the body of a LinkedIn post; you write alternative opening hooks for it.

CRITICAL RULES:
1. Each hook is at most 140 characters (mobile preview cutoff)
2. Each hook must make the reader want the rest of the post
3. Stay consistent with the post's content - never promise what the body doesn't deliver

OUTPUT FORMAT:
Return exactly 3 hooks as a JSON object with this structure:
{
  "hooks": [
    { "style": "Question", "content": "..." },
    { "style": "Bold statement", "content": "..." },
    { "style": "Statistic", "content": "..." }
  ]
}"#
    .to_string();

    let user = format!(
        "Post body:\n{body}\n\nTone: {tone}\n\n\
         Additional instructions for {tone} tone:\n{modifiers}\n\n\
         Write 3 alternative hooks for this post, one per style.",
        tone = tone.as_str(),
        modifiers = tone_modifiers(tone),
    );

    PromptPair { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_length_range() {
        let pair = build_post_prompt("rust", Tone::Smart, PostLength::Short, None, None);
        assert!(pair.system.contains("600-900 characters"));
        let pair = build_post_prompt("rust", Tone::Smart, PostLength::Long, None, None);
        assert!(pair.system.contains("1200-1500 characters"));
    }

    #[test]
    fn system_prompt_asks_for_two_posts_with_schema() {
        let pair = build_post_prompt("rust", Tone::Professional, PostLength::Medium, None, None);
        assert!(pair.system.contains("exactly 2 distinct versions"));
        for field in ["\"hook\"", "\"body\"", "\"cta\"", "\"full\"", "\"hashtags\""] {
            assert!(pair.system.contains(field), "missing field {field}");
        }
    }

    #[test]
    fn user_prompt_carries_topic_and_tone_modifiers() {
        let pair = build_post_prompt(
            "burnout in engineering teams",
            Tone::Friendly,
            PostLength::Medium,
            None,
            None,
        );
        assert!(pair.user.contains("burnout in engineering teams"));
        assert!(pair.user.contains("colleague over coffee"));
        assert!(!pair.user.contains("REFERENCE POST"));
    }

    #[test]
    fn reference_post_enables_brand_voice_block() {
        let pair = build_post_prompt(
            "topic",
            Tone::Smart,
            PostLength::Medium,
            Some("My old post text."),
            None,
        );
        assert!(pair.user.contains("Brand voice"));
        assert!(pair.user.contains("My old post text."));
    }

    #[test]
    fn known_templates_add_structure_unknown_add_nothing() {
        for id in TEMPLATE_IDS {
            let pair = build_post_prompt("t", Tone::Smart, PostLength::Medium, None, Some(id));
            assert!(pair.user.contains("Post structure:"), "template {id}");
        }
        let pair = build_post_prompt("t", Tone::Smart, PostLength::Medium, None, Some("nope"));
        assert!(!pair.user.contains("Post structure:"));
    }

    #[test]
    fn hook_prompt_asks_for_three_styles() {
        let pair = build_hook_prompt("The post body.", Tone::Storytelling);
        assert!(pair.system.contains("exactly 3 hooks"));
        assert!(pair.system.contains("140 characters"));
        for style in ["Question", "Bold statement", "Statistic"] {
            assert!(pair.system.contains(style));
        }
        assert!(pair.user.contains("The post body."));
    }
}
