//! The project-specific "partial" message base (spec.md §4.2), built from a
//! [`Message`]'s `signed_fields` list rather than from RFC-9421 HTTP
//! component identifiers. This is what [`crate::verifier::Verifier`] hashes
//! and verifies the signature over when the caller signed the envelope
//! fields directly instead of an RFC-9421 HTTP request.

use sage_types::Message;

/// Builds the partial signature base: one `name: value` line per entry in
/// [`Message::signed_fields`], in the order listed, joined by `"\n"`.
///
/// Names not recognized as a standard slot or a `header.<Name>` reference
/// are skipped silently — forward-compatibility slots a newer signer may
/// have listed that this verifier doesn't yet know how to render.
pub fn build_partial_base(message: &Message) -> String {
    let mut lines = Vec::with_capacity(message.signed_fields().len());
    for field in message.signed_fields() {
        if let Some(line) = render_field(message, field) {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// The single-field `body` base used by the minimal verification fast path
/// (spec.md §4.4 "QuickVerify"), which does not consult `signed_fields`.
pub fn build_body_only_base(message: &Message) -> String {
    format!("body: {}", String::from_utf8_lossy(message.body()))
}

fn render_field(message: &Message, field: &str) -> Option<String> {
    match field {
        "agent_did" => Some(format!("agent_did: {}", message.agent_did())),
        "message_id" => Some(format!("message_id: {}", message.message_id())),
        "timestamp" => Some(format!(
            "timestamp: {}",
            message.timestamp().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
        )),
        "nonce" => Some(format!("nonce: {}", message.nonce())),
        "body" => Some(format!(
            "body: {}",
            String::from_utf8_lossy(message.body())
        )),
        other => other.strip_prefix("header.").and_then(|header_name| {
            message
                .headers()
                .get(header_name)
                .map(|value| format!("{header_name}: {value}"))
        }),
    }
}
