//! Rendering structured requests to prompt text and parsing labeled output.
//!
//! The engine's generation contract is field-shaped: ordered named inputs in,
//! named output fields back. For a plain chat-completions endpoint that
//! contract is carried in-band: the prompt lists each input as a labeled
//! block and instructs the model to reply with one labeled line per output
//! field; the reply is parsed back by scanning for those labels.

use confab_types::generate::{GenerationOutput, GenerationRequest};

/// Render the task description and output-field instructions as the system
/// prompt.
pub fn render_system(request: &GenerationRequest) -> String {
    let field_list = request
        .outputs
        .iter()
        .map(|name| format!("{name}: <{name}>"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\n\nReply with exactly these labeled fields, in order, each starting on its own line:\n{field_list}",
        request.description
    )
}

/// Render the ordered input fields as the user message.
pub fn render_user(request: &GenerationRequest) -> String {
    request
        .inputs
        .iter()
        .map(|field| format!("{}: {}", field.name, field.value))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse a model reply into the requested output fields.
///
/// A field starts at a line beginning with `<name>:` (ASCII
/// case-insensitive) and
/// runs until the next field label or end of text; values are trimmed. Text
/// before the first label is dropped. If the reply contains none of the
/// requested labels, the whole trimmed reply becomes the last requested
/// field (the answer-class field), so plain unlabeled replies still carry
/// an answer.
pub fn parse_output(text: &str, outputs: &[String]) -> GenerationOutput {
    let mut fields: Vec<(String, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        // Match the label on the original line, never a lowercased copy:
        // case-folding can change byte lengths, so slicing by the label
        // length is only safe against the text actually matched.
        let label = outputs.iter().find_map(|name| {
            let prefix = trimmed.get(..name.len())?;
            if !prefix.eq_ignore_ascii_case(name) {
                return None;
            }
            let value = trimmed[name.len()..].strip_prefix(':')?;
            Some((name.clone(), value.trim_start()))
        });
        match label {
            Some((name, rest)) => fields.push((name, vec![rest])),
            None => {
                if let Some((_, lines)) = fields.last_mut() {
                    lines.push(line);
                }
            }
        }
    }

    if fields.is_empty() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return GenerationOutput::new();
        }
        let Some(answer_field) = outputs.last() else {
            return GenerationOutput::new();
        };
        return GenerationOutput::new().with_field(answer_field, trimmed);
    }

    let mut output = GenerationOutput::new();
    for (name, lines) in fields {
        output = output.with_field(name, lines.join("\n").trim());
    }
    output
}
