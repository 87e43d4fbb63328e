//! Scripted assistant replies.
//!
//! Input is classified by case-insensitive keyword matching against a fixed,
//! ordered list of intents; the first intent that matches answers. Unmatched
//! input gets one of a few fallback replies chosen by a [`ReplyPicker`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Language, Product, Step, StepNumber};

use crate::i18n::{t, t_with};

/// What the responder needs to know about the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatContext {
    pub current_step: StepNumber,
    pub completed_count: usize,
    pub language: Language,
}

/// Chooses among fallback replies
pub trait ReplyPicker: Send {
    /// Index in `0..choices`; `choices` is never zero.
    fn pick(&mut self, choices: usize) -> usize;
}

/// Walks through the fallback replies in order
#[derive(Debug, Default)]
pub struct CyclingPicker {
    next: usize,
}

impl ReplyPicker for CyclingPicker {
    fn pick(&mut self, choices: usize) -> usize {
        let index = self.next % choices;
        self.next = self.next.wrapping_add(1);
        index
    }
}

/// Random fallback replies from a reproducible seed
#[derive(Debug)]
pub struct SeededPicker {
    rng: StdRng,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplyPicker for SeededPicker {
    fn pick(&mut self, choices: usize) -> usize {
        self.rng.gen_range(0..choices)
    }
}

/// Recognized kinds of question, in matching priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Progress,
    Parts,
    Tools,
    Time,
    Difficulty,
    Media,
    Safety,
    Fallback,
}

const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Progress, &["step", "current"]),
    (Intent::Parts, &["panel", "base", "shelf"]),
    (Intent::Tools, &["tool", "screw"]),
    (Intent::Time, &["time", "long"]),
    (Intent::Difficulty, &["hard", "difficult", "stuck"]),
    (Intent::Media, &["video", "show"]),
    (Intent::Safety, &["safe", "danger"]),
];

pub fn classify(text: &str) -> Intent {
    let lowered = text.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Fallback)
}

/// Numbered list, one item per line
pub(crate) fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reply to a free-text chat message. Never fails: missing step data falls back to generic text.
pub fn respond(
    text: &str,
    ctx: &ChatContext,
    product: &Product,
    picker: &mut dyn ReplyPicker,
) -> String {
    let step = product.step(ctx.current_step);
    let instruction = step.map(|s| s.instruction.as_str()).unwrap_or_default();

    match classify(text) {
        Intent::Progress => progress_reply(ctx, product, instruction),
        Intent::Parts => parts_reply(step),
        Intent::Tools => format!(
            "You'll need these tools: {}. Make sure you have everything ready before starting.",
            product.tools.join(", ")
        ),
        Intent::Time => {
            let per_step = product
                .estimated_time_min
                .div_ceil(product.total_steps().max(1));
            format!(
                "This assembly typically takes {} minutes total. Step {} should take about {per_step} minutes.",
                product.estimated_time_min, ctx.current_step
            )
        }
        Intent::Difficulty => match step.map(Step::tips).filter(|tips| !tips.is_empty()) {
            Some(tips) => format!(
                "Don't worry! Here are some tips for this step:\n{}",
                numbered(tips)
            ),
            None => "This step can be tricky, but take it slow. Would you like me to show you the video or 3D view?".to_string(),
        },
        Intent::Media => "I can help you view different media for this step. Use the tabs above to switch between Image, Video, and 3D views.".to_string(),
        Intent::Safety => match step.map(Step::safety).filter(|items| !items.is_empty()) {
            Some(items) => format!("Safety reminders:\n{}", numbered(items)),
            None => "Always follow safety guidelines. If you're unsure about anything, don't hesitate to contact human support.".to_string(),
        },
        Intent::Fallback => fallback_reply(ctx, instruction, picker),
    }
}

fn progress_reply(ctx: &ChatContext, product: &Product, instruction: &str) -> String {
    let progress = t_with(
        ctx.language,
        "chatbot.progress",
        &[
            ("step", ctx.current_step.to_string()),
            ("total", product.total_steps().to_string()),
        ],
    );
    let mut reply = format!("{progress}\n\n{instruction}");
    if ctx.language != Language::En {
        reply.push_str(&format!(
            "\n\n{}: {instruction}",
            t(ctx.language, "guide.tabs.image")
        ));
    }
    reply
}

fn parts_reply(step: Option<&Step>) -> String {
    let parts = step
        .map(|s| s.three_d.highlight.join(", "))
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "the highlighted parts".to_string());
    let tip = step
        .and_then(|s| s.tips().first())
        .map(String::as_str)
        .unwrap_or("Take your time and follow the instructions carefully.");
    format!("For this step, focus on: {parts}. {tip}")
}

fn fallback_reply(ctx: &ChatContext, instruction: &str, picker: &mut dyn ReplyPicker) -> String {
    let replies = [
        format!("I'm here to help with Step {}! {instruction}", ctx.current_step)
            .trim_end()
            .to_string(),
        format!(
            "You're doing great! {} steps completed so far.",
            ctx.completed_count
        ),
        "Need more specific help? Try asking about tools, safety, or describing what you're having trouble with.".to_string(),
        "I can help explain the current step, show you tips, or guide you to the right media view.".to_string(),
    ];
    let index = picker.pick(replies.len()).min(replies.len() - 1);
    replies[index].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn ctx(step: StepNumber) -> ChatContext {
        ChatContext {
            current_step: step,
            completed_count: 0,
            language: Language::En,
        }
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("What is the current STEP?"), Intent::Progress);
        // "step" outranks "tool"
        assert_eq!(classify("which tool for this step"), Intent::Progress);
        assert_eq!(classify("Where does the shelf go"), Intent::Parts);
        assert_eq!(classify("Which screwdriver?"), Intent::Tools);
        assert_eq!(classify("how long will it take"), Intent::Time);
        assert_eq!(classify("I'm stuck"), Intent::Difficulty);
        assert_eq!(classify("play the video"), Intent::Media);
        assert_eq!(classify("is it dangerous"), Intent::Safety);
        assert_eq!(classify("hello there"), Intent::Fallback);
    }

    #[test]
    fn test_tools_reply_lists_every_tool() {
        let product = fixtures::sample_product();
        let mut picker = CyclingPicker::default();
        for step in 1..=product.total_steps() {
            let reply = respond("Which tools do I need?", &ctx(step), &product, &mut picker);
            for tool in &product.tools {
                assert!(reply.contains(tool.as_str()), "missing {tool} in {reply}");
            }
        }
    }

    #[test]
    fn test_progress_reply_includes_instruction() {
        let product = fixtures::sample_product();
        let mut picker = CyclingPicker::default();
        let reply = respond("what's my current step", &ctx(2), &product, &mut picker);
        assert!(reply.starts_with("You're on Step 2 of 5."));
        assert!(reply.contains(&product.steps[1].instruction));
    }

    #[test]
    fn test_progress_reply_localized() {
        let product = fixtures::sample_product();
        let mut picker = CyclingPicker::default();
        let context = ChatContext {
            language: Language::Tr,
            ..ctx(1)
        };
        let reply = respond("step?", &context, &product, &mut picker);
        assert!(reply.starts_with("5 adımın 1. adımındasınız."));
        assert!(reply.contains("Görsel: "));
    }

    #[test]
    fn test_time_reply_rounds_up_per_step() {
        let product = fixtures::sample_product(); // 90 min / 5 steps
        let mut picker = CyclingPicker::default();
        let reply = respond("how much time?", &ctx(3), &product, &mut picker);
        assert!(reply.contains("90 minutes total"));
        assert!(reply.contains("Step 3 should take about 18 minutes"));
    }

    #[test]
    fn test_missing_tips_and_safety_degrade() {
        let product = fixtures::product_without_extras(3);
        let mut picker = CyclingPicker::default();

        let stuck = respond("this is hard", &ctx(1), &product, &mut picker);
        assert!(stuck.starts_with("This step can be tricky"));

        let safety = respond("is this safe?", &ctx(1), &product, &mut picker);
        assert!(safety.starts_with("Always follow safety guidelines"));

        let parts = respond("which panel", &ctx(1), &product, &mut picker);
        assert_eq!(
            parts,
            "For this step, focus on: the highlighted parts. Take your time and follow the instructions carefully."
        );
    }

    #[test]
    fn test_tips_are_numbered() {
        let product = fixtures::sample_product();
        let mut picker = CyclingPicker::default();
        let reply = respond("I'm stuck", &ctx(2), &product, &mut picker);
        assert!(reply.contains("\n1. "));
        assert!(reply.contains("\n2. "));
    }

    #[test]
    fn test_fallback_cycles_deterministically() {
        let product = fixtures::sample_product();
        let mut picker = CyclingPicker::default();
        let first = respond("hello", &ctx(1), &product, &mut picker);
        assert!(first.starts_with("I'm here to help with Step 1!"));
        let second = respond("hello", &ctx(1), &product, &mut picker);
        assert_eq!(second, "You're doing great! 0 steps completed so far.");
    }

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let product = fixtures::sample_product();
        let mut a = SeededPicker::new(42);
        let mut b = SeededPicker::new(42);
        for _ in 0..10 {
            assert_eq!(
                respond("hmm", &ctx(1), &product, &mut a),
                respond("hmm", &ctx(1), &product, &mut b)
            );
        }
    }

    #[test]
    fn test_out_of_range_step_does_not_panic() {
        let product = fixtures::sample_product();
        let mut picker = CyclingPicker::default();
        let reply = respond("hello", &ctx(99), &product, &mut picker);
        assert_eq!(reply, "I'm here to help with Step 99!");
    }
}
