use base64::Engine;

/// MIME type assumed for uploads that arrive without a data-URL header.
pub const DEFAULT_UPLOAD_MIME: &str = "image/jpeg";

/// Payload after the first `,`, or the input unchanged when there is no comma.
///
/// A header with nothing after the comma yields an empty payload rather than the whole input;
/// callers treat an empty payload as a missing image.
pub fn strip_prefix(input: &str) -> &str {
    match input.split_once(',') {
        Some((_, payload)) => payload,
        None => input,
    }
}

/// MIME type from a `data:<mime>;base64,` header.
pub fn mime_type(input: &str) -> Option<&str> {
    let (header, _) = input.split_once(',')?;
    let header = header.strip_prefix("data:")?;
    let mime = header.split(';').next().unwrap_or_default().trim();
    if mime.is_empty() { None } else { Some(mime) }
}

pub fn wrap(mime: &str, base64_payload: &str) -> String {
    format!("data:{mime};base64,{base64_payload}")
}

pub fn encode(mime: &str, bytes: &[u8]) -> String {
    wrap(mime, &base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Short log-friendly view of a large base64 string.
pub fn preview(data: &str) -> String {
    if data.len() > 50 {
        let head: String = data.chars().take(50).collect();
        format!("{}...[{} chars total]", head, data.len())
    } else {
        data.to_string()
    }
}
