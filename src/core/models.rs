//! The Slack message exchanged between the ingress and egress relays.
//!
//! Every field is optional on the wire. `None` is never serialized, so a field
//! that was absent stays absent and a field sent as `""`, `false` or `[]` is
//! re-encoded exactly as received.

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;

use crate::errors::RelayError;

/// A chat message as accepted by a Slack incoming webhook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, rename = "mrkdwn", skip_serializing_if = "Option::is_none")]
    pub markdown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_names: Option<LinkNames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_user: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_broadcast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    /// Credential for the downstream API, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Slack accepts `link_names` as either `true`/`false` or `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkNames {
    Flag(bool),
    Count(i64),
}

/// A legacy Slack attachment block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<AttachmentField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrkdwn_in: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<bool>,
}

impl Message {
    /// Parse a message from its JSON wire form.
    ///
    /// Absent keys decode to `None` and unknown keys are ignored. Malformed
    /// JSON or a known key carrying the wrong type is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Decode`] when `raw` is not a JSON object of this shape.
    pub fn decode(raw: &[u8]) -> Result<Self, RelayError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Canonical JSON encoding, as published to the bus and posted to Slack.
    ///
    /// Characters SQS refuses in a message body are written as `\uXXXX`
    /// escapes, so the output is always a legal SQS body and decodes back to
    /// the same message.
    ///
    /// # Errors
    ///
    /// Serializing a plain struct of strings, bools and integers does not fail
    /// in practice; the error is surfaced as [`RelayError::Decode`] if it does.
    pub fn encode(&self) -> Result<Vec<u8>, RelayError> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, SqsSafeFormatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }

    /// The only rule the relay enforces: a sender identity must be present.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Validation`] when `username` is absent or empty.
    pub fn validate(&self) -> Result<(), RelayError> {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => Ok(()),
            _ => Err(RelayError::Validation("Username is empty".to_string())),
        }
    }
}

/// Whether SQS accepts `c` in a message body.
///
/// Allowed: `#x9 | #xA | #xD | #x20-#xD7FF | #xE000-#xFFFD | #x10000+`.
#[must_use]
pub fn is_sqs_body_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..=char::MAX
    )
}

/// Compact JSON formatter that escapes characters SQS rejects.
///
/// serde_json already escapes control characters; this covers the rest
/// (the noncharacters U+FFFE and U+FFFF).
struct SqsSafeFormatter;

impl Formatter for SqsSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if !is_sqs_body_char(c) {
                writer.write_all(fragment[start..i].as_bytes())?;
                write!(writer, "\\u{:04x}", u32::from(c))?;
                start = i + c.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Shape reminder appended to rejection details.
pub const MESSAGE_FORMAT_HINT: &str = r##"{"username":"<required>","channel":"#general","text":"hello","icon_emoji":":robot_face:","attachments":[{"title":"...","text":"..."}]}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_minimal_message() {
        let msg = Message::decode(br#"{"username":"bot","text":"hi"}"#).unwrap();
        assert_eq!(msg.username.as_deref(), Some("bot"));
        assert_eq!(msg.text.as_deref(), Some("hi"));
        assert!(msg.channel.is_none());
        assert!(msg.attachments.is_none());
    }

    #[test]
    fn absent_and_empty_fields_stay_distinct() {
        let msg = Message::decode(br#"{"username":"bot","text":"","attachments":[]}"#).unwrap();
        assert_eq!(msg.text.as_deref(), Some(""));
        assert_eq!(msg.attachments, Some(Vec::new()));
        assert!(msg.channel.is_none());

        let encoded = String::from_utf8(msg.encode().unwrap()).unwrap();
        assert_eq!(encoded, r#"{"username":"bot","text":"","attachments":[]}"#);
    }

    #[test]
    fn link_names_keeps_its_wire_form() {
        let as_int = Message::decode(br#"{"username":"bot","link_names":1}"#).unwrap();
        assert_eq!(as_int.link_names, Some(LinkNames::Count(1)));
        assert!(String::from_utf8(as_int.encode().unwrap()).unwrap().contains(r#""link_names":1"#));

        let as_bool = Message::decode(br#"{"username":"bot","link_names":true}"#).unwrap();
        assert_eq!(as_bool.link_names, Some(LinkNames::Flag(true)));
        assert!(String::from_utf8(as_bool.encode().unwrap()).unwrap().contains(r#""link_names":true"#));
    }

    #[test]
    fn mistyped_field_is_a_decode_error() {
        let err = Message::decode(br#"{"username":"bot","as_user":"yes"}"#).unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));

        let err = Message::decode(br#"{"username":"bot","attachments":{"title":"x"}}"#).unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(Message::decode(b"not-json"), Err(RelayError::Decode(_))));
        assert!(matches!(Message::decode(b"[1,2]"), Err(RelayError::Decode(_))));
        assert!(matches!(Message::decode(b""), Err(RelayError::Decode(_))));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let msg = Message::decode(br#"{"username":"bot","blocks":[{"type":"divider"}]}"#).unwrap();
        assert_eq!(msg.username.as_deref(), Some("bot"));
    }

    #[test]
    fn empty_username_fails_validation_regardless_of_content() {
        let msg = Message {
            username: Some(String::new()),
            channel: Some("#ops".to_string()),
            text: Some("deploy finished".to_string()),
            attachments: Some(vec![Attachment {
                title: Some("build".to_string()),
                ..Attachment::default()
            }]),
            ..Message::default()
        };
        assert!(matches!(msg.validate(), Err(RelayError::Validation(_))));
        assert!(Message::default().validate().is_err());
    }

    #[test]
    fn username_alone_is_valid() {
        let msg = Message {
            username: Some("bot".to_string()),
            text: Some(String::new()),
            ..Message::default()
        };
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn noncharacters_are_escaped_for_sqs() {
        let msg = Message::decode(br#"{"username":"bot","text":"a\uffffb\ufffec"}"#).unwrap();
        assert!(msg.validate().is_ok());
        assert_eq!(msg.text.as_deref(), Some("a\u{FFFF}b\u{FFFE}c"));

        let encoded = String::from_utf8(msg.encode().unwrap()).unwrap();
        assert!(encoded.chars().all(is_sqs_body_char), "encoded: {encoded:?}");
        assert_eq!(encoded, r#"{"username":"bot","text":"a\uffffb\ufffec"}"#);
        assert_eq!(Message::decode(encoded.as_bytes()).unwrap(), msg);
    }

    #[test]
    fn legal_unicode_is_written_raw() {
        let msg = Message {
            username: Some("bot".to_string()),
            text: Some("caf\u{e9} \u{1F680} \u{FFFD}".to_string()),
            ..Message::default()
        };
        let encoded = String::from_utf8(msg.encode().unwrap()).unwrap();
        assert_eq!(encoded, "{\"username\":\"bot\",\"text\":\"caf\u{e9} \u{1F680} \u{FFFD}\"}");
    }

    #[test]
    fn fully_populated_message_survives_encoding() {
        let msg = Message {
            username: Some("deploy-bot".to_string()),
            channel: Some("#releases".to_string()),
            text: Some("v1.2.3 is live".to_string()),
            markdown: Some(true),
            parse: Some("full".to_string()),
            link_names: Some(LinkNames::Count(1)),
            as_user: Some(false),
            icon_url: Some("https://example.com/icon.png".to_string()),
            icon_emoji: Some(":rocket:".to_string()),
            thread_ts: Some("1700000000.000100".to_string()),
            reply_broadcast: Some(true),
            unfurl_links: Some(false),
            unfurl_media: Some(true),
            attachments: Some(vec![Attachment {
                fallback: Some("release notes".to_string()),
                color: Some("good".to_string()),
                title: Some("Changelog".to_string()),
                title_link: Some("https://example.com/changelog".to_string()),
                fields: Some(vec![AttachmentField {
                    title: Some("Env".to_string()),
                    value: Some("prod".to_string()),
                    short: Some(true),
                }]),
                ts: Some(1_700_000_000),
                mrkdwn_in: Some(vec!["text".to_string()]),
                ..Attachment::default()
            }]),
            token: Some("xoxb-secret".to_string()),
        };

        let encoded = msg.encode().unwrap();
        assert_eq!(Message::decode(&encoded).unwrap(), msg);
    }
}
