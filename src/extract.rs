//! Body extraction — pick the best readable text out of a provider message.
//!
//! Walks the message's body tree, preferring the first `text/plain`
//! part and falling back to the first `text/html` part with markup
//! stripped. Pure — no I/O, no side effects.

use base64::Engine as _;
use base64::{alphabet, engine};

use crate::error::ExtractError;
use crate::mailbox::{MessagePart, RawMessage};

const MIME_PLAIN: &str = "text/plain";
const MIME_HTML: &str = "text/html";

/// The provider emits URL-safe base64, sometimes padded and sometimes
/// not, so the decoder accepts both.
const BODY_ENGINE: engine::GeneralPurpose = engine::GeneralPurpose::new(
    &alphabet::URL_SAFE,
    engine::GeneralPurposeConfig::new()
        .with_decode_padding_mode(engine::DecodePaddingMode::Indifferent),
);

/// Extract the human-readable body of a message.
///
/// Plain text wins when both representations exist; HTML is
/// tag-stripped; a message with no usable part yields an empty string.
/// A payload that cannot be decoded to UTF-8 text is an error — the
/// caller skips that message and continues the scan.
pub fn extract_body(message: &RawMessage) -> Result<String, ExtractError> {
    let Some(payload) = &message.payload else {
        return Ok(String::new());
    };

    let mut plain: Option<&str> = None;
    let mut html: Option<&str> = None;
    collect_text_parts(payload, &mut plain, &mut html);

    // Only the representation actually used gets decoded, so a corrupt
    // part of the losing representation cannot fail the message.
    if let Some(data) = plain {
        return decode_text(data);
    }
    if let Some(data) = html {
        return Ok(strip_html(&decode_text(data)?));
    }
    Ok(String::new())
}

/// Depth-first walk recording the first plain and first HTML payloads.
/// Parts with any other MIME type are ignored.
fn collect_text_parts<'a>(
    part: &'a MessagePart,
    plain: &mut Option<&'a str>,
    html: &mut Option<&'a str>,
) {
    if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
        match part.mime_type.as_str() {
            MIME_PLAIN if plain.is_none() => *plain = Some(data),
            MIME_HTML if html.is_none() => *html = Some(data),
            _ => {}
        }
    }
    for child in &part.parts {
        if plain.is_some() && html.is_some() {
            return;
        }
        collect_text_parts(child, plain, html);
    }
}

fn decode_text(data: &str) -> Result<String, ExtractError> {
    let bytes = BODY_ENGINE.decode(data)?;
    Ok(String::from_utf8(bytes)?)
}

/// Strip markup from HTML content.
///
/// A plain char-walk: anything between `<` and `>` is dropped, the rest
/// is kept with whitespace normalized. Never fails, however malformed
/// the markup — an unclosed tag simply swallows the remainder.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
