//! `@@` attributes in member and class comments
//!
//! After the optional macro, a comment is free text interleaved with attributes:
//!
//!     // GETSET(int, Count) counts things @@ReadOnly @@Json {"Key": "count"}
//!
//! Each attribute is `@@Name`, optionally followed by a `{…}` JSON object payload, then free
//! text up to the next `@@`. Free text that no attribute consumes ends up in `raw_command`.

use crate::regen::error::{ParserError, ParserResult};
use crate::regen::model::{AccessMode, EnumClassDescriptor, PropertyDescriptor};
use crate::regen::scanning::{Leading, TextCursor, ATTRIBUTE_MARKER};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Payload literals only know double quoted strings.
const PAYLOAD_QUOTES: [char; 1] = ['"'];

/// One parsed `@@` attribute
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Attribute<'a> {
    pub name: &'a str,
    /// Offset of the `@@` marker
    pub offset: usize,
    pub payload: Option<Map<String, Value>>,
    /// Free text following the attribute (and its payload), trimmed
    pub text: &'a str,
}

/// The free text and attributes of one comment
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Annotation<'a> {
    pub text: Vec<&'a str>,
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> Annotation<'a> {
    /// Read the rest of a comment: leading free text, then every attribute.
    pub fn scan(cursor: &mut TextCursor<'a>, source: &str) -> ParserResult<Self> {
        let mut annotation = Annotation::default();
        push_text(&mut annotation.text, cursor.take_until_attribute());

        while cursor.leading() == Leading::Attribute {
            let offset = cursor.offset();
            cursor.advance(ATTRIBUTE_MARKER.len());
            let name = cursor.identifier().ok_or_else(|| {
                ParserError::syntax(source, cursor.offset(), "expected attribute name after `@@`")
            })?;
            cursor.skip_whitespace();

            let payload = if cursor.peek_char() == Some('{') {
                Some(parse_payload(cursor, source, name)?)
            } else {
                None
            };

            annotation.attributes.push(Attribute {
                name,
                offset,
                payload,
                text: cursor.take_until_attribute().trim(),
            });
        }

        Ok(annotation)
    }

    /// Free text left for `raw_command`: leading text plus whatever follows attributes
    /// other than `@@Command`, or the last `@@Command` text when there is one.
    pub fn raw_command(&self) -> String {
        if let Some(command) = self
            .attributes
            .iter()
            .rev()
            .find(|attribute| attribute.name == "Command")
        {
            return command.text.to_string();
        }
        let mut parts = self.text.clone();
        for attribute in &self.attributes {
            push_text(&mut parts, attribute.text);
        }
        parts.join(" ")
    }
}

fn push_text<'a>(parts: &mut Vec<&'a str>, text: &'a str) {
    let text = text.trim();
    if !text.is_empty() {
        parts.push(text);
    }
}

fn parse_payload(
    cursor: &mut TextCursor<'_>,
    source: &str,
    name: &str,
) -> ParserResult<Map<String, Value>> {
    let offset = cursor.offset();
    let literal = cursor.balanced(&PAYLOAD_QUOTES).ok_or_else(|| {
        ParserError::syntax(source, offset, format!("unterminated payload of `@@{name}`"))
    })?;
    match serde_json::from_str::<Value>(literal) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParserError::syntax(
            source,
            offset,
            format!("payload of `@@{name}` must be an object"),
        )),
        Err(err) => Err(ParserError::syntax(
            source,
            offset,
            format!("invalid payload of `@@{name}`: {err}"),
        )),
    }
}

/// Payload values that name types are usually strings; anything else is kept as JSON text.
fn string_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn required_key(
    attribute: &Attribute<'_>,
    source: &str,
    key: &str,
) -> ParserResult<String> {
    attribute
        .payload
        .as_ref()
        .and_then(|payload| payload.get(key))
        .map(string_value)
        .ok_or_else(|| ParserError::key_not_found(source, attribute.offset, attribute.name, key))
}

fn optional_key(attribute: &Attribute<'_>, key: &str) -> Option<String> {
    attribute
        .payload
        .as_ref()
        .and_then(|payload| payload.get(key))
        .map(string_value)
}

fn is_independent(attribute: &Attribute<'_>) -> bool {
    attribute
        .payload
        .as_ref()
        .and_then(|payload| payload.get("IsIndependent"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Apply member attributes to a property.
pub(crate) fn apply_to_property(
    annotation: &Annotation<'_>,
    source: &str,
    property: &mut PropertyDescriptor,
) -> ParserResult<()> {
    for attribute in &annotation.attributes {
        match attribute.name {
            "ReadOnly" => restrict(property, AccessMode::ReadOnly),
            "WriteOnly" => restrict(property, AccessMode::WriteOnly),
            "NoAccess" => restrict(property, AccessMode::NoAccess),
            "Inherit" => property.is_inherited = true,
            "NoHistory" => property.is_no_history = true,
            "NoJson" => property.is_no_json = true,
            "Command" => {}
            "Json" => {
                if let Some(payload) = &attribute.payload {
                    property.json_attributes.extend(payload.clone());
                }
            }
            "ActionResult" => {
                property.redo_result = Some(required_key(attribute, source, "Redo")?);
                property.undo_result = optional_key(attribute, "Undo");
            }
            "Log" | "Action" | "Thread" => {
                warn!(
                    attribute = attribute.name,
                    member = %property.enum_name,
                    "class attribute on a member is ignored"
                );
            }
            other => {
                warn!(attribute = other, member = %property.enum_name, "unknown attribute ignored");
            }
        }
    }
    property.raw_command = annotation.raw_command();
    Ok(())
}

fn restrict(property: &mut PropertyDescriptor, mode: AccessMode) {
    property.requested_access = property.requested_access.restrict(mode);
}

/// Apply class attributes to a declaration. Returns the free text of the comment.
pub(crate) fn apply_to_class(
    annotation: &Annotation<'_>,
    source: &str,
    class: &mut EnumClassDescriptor,
) -> ParserResult<String> {
    for attribute in &annotation.attributes {
        match attribute.name {
            "Json" => {
                class.is_json = true;
                if let Some(payload) = &attribute.payload {
                    class.json_attributes.extend(payload.clone());
                }
            }
            "Inherit" => class.inherit_class = Some(required_key(attribute, source, "Class")?),
            "Log" => class.is_log_independent = is_independent(attribute),
            "Action" => class.is_action_manager_independent = is_independent(attribute),
            "Thread" => class.is_thread_manager_independent = is_independent(attribute),
            "Command" => {}
            "ReadOnly" | "WriteOnly" | "NoAccess" | "NoHistory" | "NoJson" | "ActionResult" => {
                debug!(
                    attribute = attribute.name,
                    class = %class.name,
                    "member attribute on a declaration is ignored"
                );
            }
            other => {
                warn!(attribute = other, class = %class.name, "unknown attribute ignored");
            }
        }
    }
    Ok(annotation.raw_command())
}
