use crate::models::profile::Profile;
use crate::models::question::{
    CategoryQuota, Question, QuestionCategory, QuestionSlot, QUESTIONS_PER_QUIZ,
    QUESTIONS_PER_STAGE, STAGE_COUNT,
};
use crate::services::embed_service::ProfileEncoder;
use crate::services::generation_service::TextGenerator;
use std::sync::Arc;
use std::time::Instant;

pub const MAX_PER_CATEGORY: usize = 4;
pub const DEFAULT_MAX_LENGTH: usize = 100;
/// Topic label interpolated into every prompt. Never derived from the embedding.
pub const DETECTED_TOPIC: &str = "tech";
const MIN_QUESTION_CHARS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    #[error("text generation failed: {0}")]
    Upstream(#[from] crate::error::Error),
    #[error("generated question too short ({0} chars)")]
    TooShort(usize),
    #[error("generated text is not a \"What\" question")]
    NotAQuestion,
}

struct AnswerRule {
    category: QuestionCategory,
    keywords: &'static [&'static str],
    options: [&'static str; 4],
    correct: usize,
}

// Evaluated top to bottom against the lowercased question text; first match wins.
// Every rule marks index 0 as correct. Known defect, kept for client compatibility.
const ANSWER_RULES: [AnswerRule; 4] = [
    AnswerRule {
        category: QuestionCategory::Blockchain,
        keywords: &["hackathon", "base"],
        options: ["Base", "Ethereum", "Polygon", "Solana"],
        correct: 0,
    },
    AnswerRule {
        category: QuestionCategory::Technology,
        keywords: &["ai", "distilbert"],
        options: ["DistilBERT", "TensorFlow", "PyTorch", "Scikit-learn"],
        correct: 0,
    },
    AnswerRule {
        category: QuestionCategory::Location,
        keywords: &["sf", "city"],
        options: ["San Francisco", "New York", "London", "Tokyo"],
        correct: 0,
    },
    AnswerRule {
        category: QuestionCategory::Interest,
        keywords: &[],
        options: ["AI", "Blockchain", "Web3", "Gaming"],
        correct: 0,
    },
];

const DEFAULT_OPTIONS: [&str; 4] = ["Tech", "Sports", "Music", "Food"];

struct FallbackQuestion {
    template: &'static str,
    options: [&'static str; 4],
    correct: usize,
}

const FALLBACK_BANK: [FallbackQuestion; 3] = [
    FallbackQuestion {
        template: "What topic does {basename} frequently post about?",
        options: ["Tech", "Sports", "Music", "Food"],
        correct: 0,
    },
    FallbackQuestion {
        template: "What city is {basename} based in?",
        options: ["San Francisco", "New York", "London", "Tokyo"],
        correct: 0,
    },
    FallbackQuestion {
        template: "What field is {basename} passionate about?",
        options: ["AI", "Blockchain", "Web3", "Gaming"],
        correct: 0,
    },
];

/// Question text, options and correct index for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// Assigns a category to each of the 15 slots.
///
/// Category for slot (stage, position) is `available[(stage + position) % available.len()]`
/// where `available` holds the categories still under the quota, in canonical order.
pub fn plan_slots() -> Vec<QuestionSlot> {
    let mut quota = CategoryQuota::new(MAX_PER_CATEGORY);
    let mut slots = Vec::with_capacity(QUESTIONS_PER_QUIZ);
    for stage in 1..=STAGE_COUNT {
        for position in 1..=QUESTIONS_PER_STAGE {
            let available = quota.available();
            let idx = (stage as usize + position as usize) % available.len();
            let category = available[idx];
            quota.record(category);
            slots.push(QuestionSlot {
                stage,
                position,
                question_id: (stage - 1) * QUESTIONS_PER_STAGE + position,
                category,
            });
        }
    }
    slots
}

pub fn build_prompt(
    category: QuestionCategory,
    input_text: &str,
    topic: &str,
    basename: &str,
) -> String {
    match category {
        QuestionCategory::Interest => format!(
            "question: What is a key interest of {} based on: {} [HL] {} [HL]",
            basename, input_text, topic
        ),
        QuestionCategory::Technology => format!(
            "question: What technology is discussed in: {} [HL] {} [HL]",
            input_text, topic
        ),
        QuestionCategory::Blockchain => format!(
            "question: What blockchain platform is mentioned in the posts: {} [HL] {} [HL]",
            input_text, topic
        ),
        QuestionCategory::Location => format!(
            "question: What location is mentioned in: {} [HL] {} [HL]",
            input_text, topic
        ),
    }
}

/// Trims, appends a missing `?`, then rejects short or non-"What" text.
pub fn validate_candidate(raw: &str) -> Result<String, GenerationFailure> {
    let mut text = raw.trim().to_string();
    if !text.ends_with('?') {
        text.push('?');
    }
    let len = text.chars().count();
    if len < MIN_QUESTION_CHARS {
        return Err(GenerationFailure::TooShort(len));
    }
    if !text.starts_with("What") {
        return Err(GenerationFailure::NotAQuestion);
    }
    Ok(text)
}

pub fn select_options(category: QuestionCategory, question_text: &str) -> (Vec<String>, usize) {
    let lowered = question_text.to_lowercase();
    let rule = ANSWER_RULES
        .iter()
        .find(|r| r.category == category || r.keywords.iter().any(|k| lowered.contains(k)));
    match rule {
        Some(r) => (to_owned_options(&r.options), r.correct),
        None => (to_owned_options(&DEFAULT_OPTIONS), 0),
    }
}

pub fn fallback_question(stage: u8, position: u8, basename: &str) -> ComposedQuestion {
    let idx = (stage as usize * QUESTIONS_PER_STAGE as usize + position as usize) % FALLBACK_BANK.len();
    let entry = &FALLBACK_BANK[idx];
    ComposedQuestion {
        text: entry.template.replace("{basename}", basename),
        options: to_owned_options(&entry.options),
        correct_answer: entry.correct,
    }
}

fn to_owned_options(options: &[&str; 4]) -> Vec<String> {
    options.iter().map(|o| o.to_string()).collect()
}

#[derive(Clone)]
pub struct QuestionService {
    generator: Arc<dyn TextGenerator>,
    encoder: Option<Arc<dyn ProfileEncoder>>,
    max_length: usize,
}

impl QuestionService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            encoder: None,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn ProfileEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Always returns exactly 15 questions; generation problems are replaced
    /// with fallback questions and never surface to the caller.
    pub async fn generate_questions(&self, profile: &Profile) -> Vec<Question> {
        let started = Instant::now();
        let profile_text = profile.prompt_text();
        let topic = self.detect_topic(&profile_text).await;
        let context = profile.personalized_context();

        let mut questions = Vec::with_capacity(QUESTIONS_PER_QUIZ);
        let mut fallbacks = 0usize;
        for slot in plan_slots() {
            let prompt = build_prompt(slot.category, &profile_text, topic, &profile.basename);
            let composed = match self.compose(&slot, &prompt).await {
                Ok(q) => q,
                Err(e) => {
                    tracing::warn!(
                        question_id = slot.question_id,
                        category = %slot.category,
                        error = %e,
                        "Using fallback question"
                    );
                    fallbacks += 1;
                    fallback_question(slot.stage, slot.position, &profile.basename)
                }
            };
            questions.push(Question {
                stage: slot.stage,
                question_id: slot.question_id,
                question_text: composed.text,
                options: composed.options,
                correct_answer: composed.correct_answer,
                personalized_context: context.clone(),
            });
        }

        tracing::info!(
            fallbacks,
            "Generated {} questions in {:.2} seconds",
            questions.len(),
            started.elapsed().as_secs_f64()
        );
        questions
    }

    async fn compose(
        &self,
        slot: &QuestionSlot,
        prompt: &str,
    ) -> Result<ComposedQuestion, GenerationFailure> {
        let raw = self.generator.generate(prompt, self.max_length).await?;
        tracing::debug!(question_id = slot.question_id, raw = %raw, "Candidate received");
        let text = validate_candidate(&raw)?;
        let (options, correct_answer) = select_options(slot.category, &text);
        Ok(ComposedQuestion {
            text,
            options,
            correct_answer,
        })
    }

    async fn detect_topic(&self, profile_text: &str) -> &'static str {
        if let Some(encoder) = &self.encoder {
            match encoder.embed(profile_text).await {
                Ok(v) => tracing::debug!(dimensions = v.len(), "Profile embedded"),
                Err(e) => tracing::warn!("Profile embedding failed: {:?}", e),
            }
        }
        DETECTED_TOPIC
    }
}
