use crate::catalog::catalog;
use crate::data_url;
use crate::models::{GenerationRequest, StylistOptions};

/// Language the model is asked to write its rationale in.
pub const RATIONALE_LANGUAGE: &str = "Chinese (Simplified)";

/// Catalog prompt for the selected style, or the raw id when the catalog has no such entry.
pub fn resolve_style_text(style_id: &str) -> &str {
    match catalog().get(style_id) {
        Some(style) => style.prompt,
        None => {
            tracing::warn!("⚠️ Style '{}' not in catalog, using id as description", style_id);
            style_id
        }
    }
}

pub fn build_instruction(options: &StylistOptions) -> String {
    let style = resolve_style_text(&options.style_id);
    let refinements = &options.refinements;
    format!(
        "You are a senior hair stylist and photo retoucher.\n\
        \n\
        Task:\n\
        1. Study the face shape of the person in the attached photo.\n\
        2. Edit the photo so the person wears the new hairstyle described below.\n\
        \n\
        Target look:\n\
        - Gender: {gender}\n\
        - Hairstyle: {style}\n\
        - Hair color: {color} (blend it naturally with the existing lighting)\n\
        \n\
        Refinements:\n\
        - Bangs / fringe: {bangs}\n\
        - Volume / density: {volume}\n\
        - Root lift: {root_lift}\n\
        - Hair quality: {quality} (soft hair lies flatter and silkier, coarse hair holds its shape more stiffly)\n\
        \n\
        Rules:\n\
        - Fit the style to the face shape. If the requested bangs or volume would not flatter it, adjust them slightly while keeping the requested style recognisable.\n\
        - Keep facial features, skin tone and expression exactly as they are. Change only the hair.\n\
        - The result must be photorealistic and high resolution.\n\
        \n\
        Respond with:\n\
        1. The edited image.\n\
        2. A short explanation written in {language} of why this style and color suit the person's face shape.",
        gender = options.gender,
        style = style,
        color = options.color,
        bangs = refinements.bangs.as_str(),
        volume = refinements.volume.as_str(),
        root_lift = refinements.root_lift.as_str(),
        quality = refinements.quality.as_str(),
        language = RATIONALE_LANGUAGE,
    )
}

/// Turns an uploaded photo plus style selection into one outbound request. Never fails; a
/// malformed payload is left for the model to reject.
pub fn build_request(image: &str, options: &StylistOptions) -> GenerationRequest {
    let mime_type = data_url::mime_type(image).unwrap_or(data_url::DEFAULT_UPLOAD_MIME).to_string();
    GenerationRequest {
        image_data: data_url::strip_prefix(image).to_string(),
        mime_type,
        prompt: build_instruction(options),
    }
}
