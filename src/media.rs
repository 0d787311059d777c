use crate::api::MediaGenerator;
use crate::error::Result;
use crate::models::{ImageSet, MediaResult};
use crate::schema::Variation;
use crate::{logi, logok, logw};
use futures::future::{join_all, try_join_all};

/// Generates an image for `text` and upscales it.
///
/// Failures never escape: a failed or empty generation yields `None`, and a
/// failed upscale leaves `upscaled` empty while keeping the original.
pub async fn generate_image(media: &dyn MediaGenerator, text: &str) -> Option<ImageSet> {
    let original = match media.generate_image(text).await {
        Ok(Some(url)) => url,
        Ok(None) => {
            logw("No image generated in output");
            return None;
        }
        Err(err) => {
            logw(format!("Image generation error: {}", err));
            return None;
        }
    };

    let upscaled = match media.upscale_image(&original).await {
        Ok(url) => url,
        Err(err) => {
            logw(format!("Image upscaling error: {}", err));
            None
        }
    };

    Some(ImageSet {
        original: Some(original),
        upscaled,
    })
}

/// Seeds a short clip from `image_url`. Unlike image generation, errors are
/// returned to the caller and fail the whole request.
pub async fn image_to_video(
    media: &dyn MediaGenerator,
    image_url: &str,
    motion_prompt: &str,
) -> Result<Option<String>> {
    Ok(media.image_to_video(image_url, motion_prompt).await?)
}

/// Fans out image generation across all variations, then (optionally) video
/// generation across every variation that got an upscaled image. Result `i`
/// always belongs to `variations[i]`.
pub async fn render_media(
    media: &dyn MediaGenerator,
    variations: &[Variation],
    generate_videos: bool,
    motion_prompt: &str,
) -> Result<Vec<MediaResult>> {
    logi(format!(
        "Starting parallel image generation ({} variations)",
        variations.len()
    ));
    let images: Vec<ImageSet> = join_all(
        variations
            .iter()
            .map(|variation| generate_image(media, &variation.text)),
    )
    .await
    .into_iter()
    .map(Option::unwrap_or_default)
    .collect();
    logok(format!(
        "Images ready: {}/{} with originals",
        images.iter().filter(|i| i.original.is_some()).count(),
        images.len()
    ));

    let videos: Vec<Option<String>> = if generate_videos {
        logi("Starting parallel video generation");
        let videos = try_join_all(images.iter().map(|image| async move {
            match image.upscaled.as_deref() {
                Some(url) => image_to_video(media, url, motion_prompt).await,
                None => Ok(None),
            }
        }))
        .await?;
        logok(format!(
            "Videos ready: {}/{}",
            videos.iter().filter(|v| v.is_some()).count(),
            videos.len()
        ));
        videos
    } else {
        vec![None; images.len()]
    };

    Ok(images
        .into_iter()
        .zip(videos)
        .map(|(images, video)| MediaResult { images, video })
        .collect())
}
