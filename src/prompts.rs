use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

const EXPAND_SYSTEM: &str = r#"You are a creative prompt variation generator specializing in cinematic scenes with a SINGLE HUMAN SUBJECT walking forward on a fashion runway. For each aspect, create a dramatically different variation that takes the base prompt to its absolute limit while ALWAYS maintaining a single human subject, centered in the frame, FACING THE CAMERA, and walking forward like on a fashion runway.

For example:
- Don't change the subject to anything non-human - always keep a single human as the central figure
- Don't change the walking motion - the human must always be walking forward FACING THE CAMERA like on a fashion runway
- Don't add multiple subjects - focus on a single human character
- ALWAYS maintain the fashion runway style walk with the subject facing the camera
- DO vary the lighting, environment, time period, weather, clothing, and artistic style dramatically
- DO vary the appearance of the human (clothing, age, style) while keeping them human, centered, and facing the camera

IMPORTANT: Your response must be a valid JSON object with this exact structure:
{
  "basePrompt": "the detailed prompt you've created, must include a single human subject, centered, facing the camera, and walking forward like on a fashion runway, epic, cinematic",
  "aspects": [
    "wildly different setting/environment while maintaining the centered human walking forward on a runway, facing camera",
    "dramatically different lighting/atmosphere with the same fashion runway walking style, facing camera",
    "completely transformed time period/era with the human subject walking a runway, facing camera",
    "radically different clothing/appearance for the human subject while maintaining the runway walk, facing camera",
    "extreme artistic style variation while keeping the human subject centered on a runway, facing camera"
  ]
}"#;

const EXPAND_USER: &str = r#"Create a detailed, epic, cinematic prompt based on this brief description: "{brief}".

The prompt MUST feature a SINGLE HUMAN SUBJECT, CENTERED in the frame, FACING THE CAMERA, and WALKING FORWARD like on a FASHION SHOW RUNWAY as the central action. The human must remain human (not transformed into anything non-human) and must be walking directly toward the camera as if on a fashion runway.

Then, generate exactly 5 different aspects that could be varied to create dramatically different versions. Each aspect should focus on varying the SETTING or APPEARANCE of the human character, while maintaining the core elements (single human subject, centered, facing camera, runway-style walking).

Remember to respond with a valid JSON object containing the basePrompt and 5 aspects."#;

const VARIATIONS_SYSTEM: &str = r#"You are a creative prompt variation generator that specializes in creating epic, cinematic scenes with a SINGLE HUMAN SUBJECT walking forward on a fashion runway. For each variator, create a wild and unexpected variation that transforms the original prompt while ALWAYS maintaining a single human subject, centered in the frame, FACING THE CAMERA, and walking forward like on a fashion show runway.

IMPORTANT: Your response must be a valid JSON object with this exact structure:
{
  "variations": [
    {
      "variation": "string containing the modified prompt, must include a single human subject, centered, facing the camera, and walking forward like on a fashion runway, epic, cinematic",
      "reasoning": "string explaining the transformation"
    }
  ]
}

Guidelines for variations (while keeping the single human subject walking forward on a runway):
- ALWAYS keep a single human as the central figure - never transform them into anything non-human
- ALWAYS keep the human centered in the frame and FACING THE CAMERA
- ALWAYS maintain the forward walking motion like on a fashion runway
- ALWAYS ensure the subject is walking directly toward the camera
- DO vary the environment and setting dramatically
- DO vary the lighting, weather, and atmosphere
- DO vary the clothing and appearance of the human (while keeping them human)
- DO vary the artistic style and visual treatment
- NEVER add multiple subjects or change the core runway walking action

You must generate exactly 5 variations, one per variator and in the same order as the variators, each one with a different setting or appearance, but ALL must feature a single human subject, centered, facing the camera, and walking forward like on a fashion runway!"#;

const VARIATIONS_USER: &str = r#"Base prompt: "{base_prompt}"
Create EXTREMELY DIFFERENT variations targeting these aspects: {aspects}

Push each variation to its absolute limit - be creative, be wild, be ridiculous!
Remember to respond with a valid JSON object containing exactly 5 mind-bending variations."#;

const VIDEO_MOTION: &str =
    "subject walking forward fashion runway model style, facing camera, epic, cinematic";

const KEYWORD_SUFFIX: &str = ", single human subject, centered, facing the camera, and walking forward like on a fashion runway, epic, cinematic";

/// Prompt-engineering text used by the pipeline. Every field can be
/// overridden from a JSON file; absent keys keep the built-in runway
/// templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub expand_system: String,
    /// `{brief}` is replaced by the caller's description.
    pub expand_user: String,
    pub expand_temperature: f32,
    pub variations_system: String,
    /// `{base_prompt}` and `{aspects}` are replaced before sending.
    pub variations_user: String,
    pub variations_temperature: f32,
    pub video_motion: String,
    /// Empty list disables keyword repair.
    pub required_keywords: Vec<String>,
    pub keyword_suffix: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            expand_system: EXPAND_SYSTEM.to_string(),
            expand_user: EXPAND_USER.to_string(),
            expand_temperature: 0.8,
            variations_system: VARIATIONS_SYSTEM.to_string(),
            variations_user: VARIATIONS_USER.to_string(),
            variations_temperature: 1.0,
            video_motion: VIDEO_MOTION.to_string(),
            required_keywords: ["human", "walking", "facing", "runway"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            keyword_suffix: KEYWORD_SUFFIX.to_string(),
        }
    }
}

impl PromptTemplates {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).await.with_context(|| {
            format!("Failed to read prompt templates: {}", path.as_ref().display())
        })?;
        let templates: PromptTemplates = serde_json::from_str(&content).with_context(|| {
            format!("Invalid prompt templates: {}", path.as_ref().display())
        })?;
        Ok(templates)
    }

    pub fn expand_user_message(&self, brief: &str) -> String {
        self.expand_user.replace("{brief}", brief)
    }

    pub fn variations_user_message(&self, base_prompt: &str, aspects: &[String]) -> String {
        self.variations_user
            .replace("{base_prompt}", base_prompt)
            .replace("{aspects}", &aspects.join(", "))
    }

    /// Appends the keyword suffix when `text` misses any required keyword.
    pub fn repair(&self, text: &mut String) -> bool {
        if self.required_keywords.is_empty() {
            return false;
        }
        let lower = text.to_lowercase();
        let complete = self
            .required_keywords
            .iter()
            .all(|k| lower.contains(&k.to_lowercase()));
        if complete {
            return false;
        }
        text.push_str(&self.keyword_suffix);
        true
    }

    /// Templates with keyword repair switched off.
    pub fn without_repair(mut self) -> Self {
        self.required_keywords.clear();
        self
    }
}
