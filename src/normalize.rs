//! Flattens a multi-part model response into a [`GenerationResult`].
//!
//! Parts are scanned once, in order. When a response carries several images (or several text
//! fragments) the last one wins.

use crate::data_url;
use crate::gemini::{GeminiResponse, Part};
use crate::models::GenerationResult;

/// Rendered results are always labelled PNG, whatever the model reported.
pub const RESULT_MIME: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePart<'a> {
    Image { data: &'a str, mime_type: &'a str },
    Text(&'a str),
}

/// Content parts of the first candidate, with unknown part kinds and empty text dropped.
pub fn response_parts(response: &GeminiResponse) -> impl Iterator<Item = ResponsePart<'_>> {
    response
        .candidates
        .first()
        .into_iter()
        .flat_map(|c| c.content.parts.iter())
        .filter_map(|part| match part {
            Part::Inline { inline_data } => Some(ResponsePart::Image {
                data: inline_data.data.as_str(),
                mime_type: inline_data.mime_type.as_str(),
            }),
            Part::Text { text } if !text.is_empty() => Some(ResponsePart::Text(text.as_str())),
            _ => None,
        })
}

pub fn normalize(response: &GeminiResponse) -> GenerationResult {
    let mut result = GenerationResult::default();
    for part in response_parts(response) {
        match part {
            ResponsePart::Image { data, mime_type } => {
                tracing::debug!("🎯 Found image data with mime type: {}", mime_type);
                result.image_url = Some(data_url::wrap(RESULT_MIME, data));
            }
            ResponsePart::Text(text) => result.text_analysis = Some(text.to_string()),
        }
    }
    result
}
