//! Prompt templates for time-contextual delivery.
//!
//! Each time slot has its own template carrying that slot's tone
//! directive. Templates use `{time}` and `{achievement}` placeholders,
//! filled in by [`build_prompt`]. The slot-to-template mapping is static
//! data.

use jar_models::{DeliveryContext, TimeSlot};

/// System prompt defining the assistant persona.
pub const SYSTEM_PROMPT: &str = "\
You are the user's personal hype-person and confidence assistant. Your job:

1. Remind them they have always been capable, by retelling their own \
recorded achievements in fresh ways.
2. Counter the morning \"worth reset\" that makes them forget how much \
they have already done.
3. Sound like a warm friend, not a formal coach. No toxic positivity.
4. Keep messages short and clear, with an emoji or two.

Ground everything in the real achievement you are given. You are not \
inventing a story; you are helping them remember one that already \
happened.";

const MORNING_PROMPT: &str = "\
It is {time}, the start of their day. They may be waking up with the \
\"worth reset\" in full effect, short on energy, maybe a touch of \
impostor syndrome.

Here is one of their real achievements:
{achievement}

Task: restate this achievement in 1-2 sentences (80 words max) so they \
feel seen, energized, and reminded of what they can do. Use 1-2 emoji. \
Output the message only, no preamble.";

const NOON_PROMPT: &str = "\
It is {time}. They have been working for a while and may be tired, \
distracted, or doubting their progress.

Here is one of their strengths in action:
{achievement}

Task: in 1-2 sentences (60 words max), refocus them: say why this \
ability matters right now and what pattern it reveals. Short and \
punchy. One emoji.";

const AFTERNOON_PROMPT: &str = "\
It is {time}, deep in the afternoon dip. They may be questioning \
today's output.

Look back at this achievement of theirs:
{achievement}

Task: in 2-3 sentences (100 words max), reassure them: connect the \
achievement to a core trait, remind them the trait is still there even \
when tired, and hand them enough energy to keep going. 1-2 emoji.";

const EVENING_PROMPT: &str = "\
It is {time} and the day is winding down. They may be reviewing the \
day too harshly, or feeling their worth depends on today's output.

Here is one of their real achievements:
{achievement}

Task: in 2-4 sentences (120 words max), wind the day down: say what \
this achievement shows about who they are (not just what they did), \
and that they have earned their rest. Warm, reassuring tone. 1-2 emoji.";

/// Returns the prompt template for a slot.
pub fn prompt_for(slot: TimeSlot) -> &'static str {
    match slot {
        TimeSlot::Morning => MORNING_PROMPT,
        TimeSlot::Noon => NOON_PROMPT,
        TimeSlot::Afternoon => AFTERNOON_PROMPT,
        TimeSlot::Evening => EVENING_PROMPT,
    }
}

/// Fills the slot's template with the delivery context.
pub fn build_prompt(ctx: &DeliveryContext) -> String {
    let time = format!("{} {}", ctx.slot.label(), ctx.display_time());
    let mut prompt = prompt_for(ctx.slot)
        .replace("{time}", &time)
        .replace("{achievement}", &ctx.milestone.text);

    if let Some(note) = &ctx.note {
        prompt.push_str("\n\nContext from them today: ");
        prompt.push_str(note);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use jar_models::Milestone;

    #[test]
    fn test_each_slot_has_distinct_template() {
        let prompts: Vec<&str> = TimeSlot::ALL.iter().map(|s| prompt_for(*s)).collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_build_prompt_substitutes_placeholders() {
        let ctx = DeliveryContext::at(8, 0, Milestone::new("Shipped the parser", "Work", 1));
        let prompt = build_prompt(&ctx);
        assert!(prompt.contains("Shipped the parser"));
        assert!(prompt.contains("morning 08:00"));
        assert!(!prompt.contains("{achievement}"));
        assert!(!prompt.contains("{time}"));
    }

    #[test]
    fn test_build_prompt_appends_note() {
        let ctx = DeliveryContext::at(12, 0, Milestone::new("Ran a 10k", "Health", 1))
            .with_note("presentation at 3pm");
        let prompt = build_prompt(&ctx);
        assert!(prompt.contains("presentation at 3pm"));
    }
}
