use crate::api::LanguageModel;
use crate::error::{GenerationError, Result};
use crate::prompts::PromptTemplates;
use crate::schema::{self, ExpandedPrompt};
use crate::{logi, logok};

/// Turns a brief description into a detailed base prompt plus five aspects
/// to vary. One language-model call, no retry.
pub async fn expand_prompt(
    llm: &dyn LanguageModel,
    templates: &PromptTemplates,
    brief: &str,
) -> Result<ExpandedPrompt> {
    if brief.trim().is_empty() {
        return Err(GenerationError::InvalidArgument(
            "Brief description must not be empty".to_string(),
        ));
    }

    logi(format!("Expanding brief description into detailed prompt: {}", brief));
    let raw = llm
        .complete_json(
            &templates.expand_system,
            &templates.expand_user_message(brief),
            templates.expand_temperature,
        )
        .await?;

    let value = schema::parse_reply(&raw)?;
    let mut expanded = schema::decode_expansion(&value)?;

    if templates.repair(&mut expanded.base_prompt) {
        logi("Base prompt was missing required keywords; suffix appended");
    }
    logok(format!(
        "Expanded prompt ready ({} aspects)",
        expanded.aspects.len()
    ));
    Ok(expanded)
}
