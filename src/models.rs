use serde::{Deserialize, Deserializer, Serialize};

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    /// Absent and `null` both mean no videos.
    #[serde(default, deserialize_with = "null_as_false")]
    pub generate_videos: bool,
    /// Caller-chosen aspects; when present, prompt expansion is skipped.
    #[serde(default)]
    pub variators: Option<Vec<String>>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_videos(mut self, generate_videos: bool) -> Self {
        self.generate_videos = generate_videos;
        self
    }

    pub fn with_variators(mut self, variators: Vec<String>) -> Self {
        self.variators = Some(variators);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageSet {
    pub original: Option<String>,
    pub upscaled: Option<String>,
}

/// Media produced for one variation, matched to it by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaResult {
    pub images: ImageSet,
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariationResult {
    pub text: String,
    pub reasoning: String,
    pub images: ImageSet,
    pub video: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBundle {
    pub results: Vec<VariationResult>,
    pub base_prompt: String,
    pub aspects: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_optional_fields() {
        let req: GenerateRequest = serde_json::from_value(json!({"prompt": "a logo"})).unwrap();
        assert_eq!(req.prompt, "a logo");
        assert!(!req.generate_videos);
        assert!(req.variators.is_none());

        let req: GenerateRequest = serde_json::from_value(json!({
            "prompt": "a logo",
            "generateVideos": true,
            "variators": ["a", "b"]
        }))
        .unwrap();
        assert!(req.generate_videos);
        assert_eq!(req.variators.unwrap().len(), 2);
    }

    #[test]
    fn request_treats_null_optionals_as_unset() {
        let req: GenerateRequest = serde_json::from_value(json!({
            "prompt": "a logo",
            "generateVideos": null,
            "variators": null
        }))
        .unwrap();
        assert!(!req.generate_videos);
        assert!(req.variators.is_none());

        let err = serde_json::from_value::<GenerateRequest>(json!({
            "prompt": "a logo",
            "generateVideos": "yes"
        }));
        assert!(err.is_err());
    }

    #[test]
    fn bundle_serializes_with_camel_case_and_null_media() {
        let bundle = ResponseBundle {
            results: vec![VariationResult {
                text: "t".into(),
                reasoning: "r".into(),
                images: ImageSet::default(),
                video: None,
            }],
            base_prompt: "base".into(),
            aspects: vec!["a".into()],
        };
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(
            value,
            json!({
                "results": [{
                    "text": "t",
                    "reasoning": "r",
                    "images": {"original": null, "upscaled": null},
                    "video": null
                }],
                "basePrompt": "base",
                "aspects": ["a"]
            })
        );
    }
}
