use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::debug;

use agtrace_types::{EventType, QualityScore};

use crate::digest::{PayloadDigest, PayloadHasher};
use crate::error::PayloadError;

/// The off-chain fields carried by an event.
///
/// Field declaration order is the serialization order. Optional fields that
/// are `None` are skipped rather than written as empty values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Written as a number. Read from either a number or a numeric string,
    /// since form-based clients record the raw input text.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "score_from_number_or_text"
    )]
    pub quality_score: Option<QualityScore>,
    #[serde(
        rename = "certificateHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
    /// Raw role code of the recording actor.
    #[serde(default)]
    pub role: u8,
}

/// A built payload: the structured fields plus their canonical serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPayload {
    event_type: EventType,
    fields: PayloadFields,
    serialized: String,
}

impl EventPayload {
    /// The event type the payload was built for. Not part of the serialized
    /// form; the ledger records the type separately.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn fields(&self) -> &PayloadFields {
        &self.fields
    }

    /// Canonical serialized form, submitted as the event's data reference.
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    pub fn into_string(self) -> String {
        self.serialized
    }

    /// Digest of the serialized bytes.
    pub fn digest(&self) -> PayloadDigest {
        PayloadHasher::EVENT.hash(self.serialized.as_bytes())
    }

    /// Best-effort decode of a recorded data reference.
    ///
    /// Returns `None` for references that are not payload JSON (plain hashes,
    /// free text, payloads written by older clients).
    pub fn parse(data_ref: &str) -> Option<PayloadFields> {
        serde_json::from_str(data_ref).ok()
    }
}

/// Builder for [`EventPayload`].
///
/// ```rust
/// use agtrace_payload::EventPayloadBuilder;
/// use agtrace_types::EventType;
///
/// let payload = EventPayloadBuilder::new(EventType::Shipment, "Ada", 1)
///     .location("Lagos Warehouse")
///     .notes("")
///     .build()
///     .unwrap();
/// assert_eq!(
///     payload.as_str(),
///     r#"{"location":"Lagos Warehouse","recordedBy":"Ada","role":1}"#
/// );
/// ```
#[derive(Clone, Debug)]
pub struct EventPayloadBuilder {
    event_type: EventType,
    actor_label: String,
    actor_role: u8,
    notes: Option<String>,
    location: Option<String>,
    quality_score: Option<QualityScore>,
    certificate_ref: Option<String>,
}

impl EventPayloadBuilder {
    pub fn new(event_type: EventType, actor_label: impl Into<String>, actor_role: u8) -> Self {
        Self {
            event_type,
            actor_label: actor_label.into(),
            actor_role,
            notes: None,
            location: None,
            quality_score: None,
            certificate_ref: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn quality_score(mut self, score: Option<QualityScore>) -> Self {
        self.quality_score = score;
        self
    }

    pub fn certificate_ref(mut self, certificate_ref: impl Into<String>) -> Self {
        self.certificate_ref = Some(certificate_ref.into());
        self
    }

    pub fn build(self) -> Result<EventPayload, PayloadError> {
        let fields = PayloadFields {
            notes: non_blank(self.notes),
            location: non_blank(self.location),
            quality_score: self.quality_score,
            certificate_ref: non_blank(self.certificate_ref),
            recorded_by: non_blank(Some(self.actor_label)),
            role: self.actor_role,
        };

        if self.event_type != EventType::QualityCheck
            && (fields.quality_score.is_some() || fields.certificate_ref.is_some())
        {
            debug!(
                event_type = %self.event_type,
                "quality fields supplied for a non quality-check event"
            );
        }

        let serialized = serde_json::to_string(&fields)
            .map_err(|e| PayloadError::Serialization(e.to_string()))?;

        Ok(EventPayload {
            event_type: self.event_type,
            fields,
            serialized,
        })
    }
}

fn score_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<QualityScore>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(u8),
        Text(String),
    }

    let raw = match Option::<RawScore>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawScore::Number(n)) => n,
        Some(RawScore::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<u8>().map_err(de::Error::custom)?
        }
    };
    QualityScore::new(raw).map(Some).map_err(de::Error::custom)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality_check() -> EventPayloadBuilder {
        EventPayloadBuilder::new(EventType::QualityCheck, "Ngozi", 4)
    }

    #[test]
    fn full_payload_has_fixed_field_order() {
        let payload = quality_check()
            .notes("Moisture within limits")
            .location("Ibadan Lab")
            .quality_score(Some(QualityScore::new(8).unwrap()))
            .certificate_ref("CERT-001")
            .build()
            .unwrap();

        assert_eq!(
            payload.as_str(),
            r#"{"notes":"Moisture within limits","location":"Ibadan Lab","qualityScore":8,"certificateHash":"CERT-001","recordedBy":"Ngozi","role":4}"#
        );
    }

    #[test]
    fn empty_and_absent_fields_are_omitted() {
        let payload = quality_check()
            .notes("   ")
            .location("")
            .certificate_ref("")
            .build()
            .unwrap();

        assert_eq!(payload.as_str(), r#"{"recordedBy":"Ngozi","role":4}"#);
        assert!(!payload.as_str().contains("notes"));
        assert!(!payload.as_str().contains("\"\""));
    }

    #[test]
    fn blank_actor_label_is_omitted_but_role_kept() {
        let payload = EventPayloadBuilder::new(EventType::Sale, "", 3)
            .location("Market")
            .build()
            .unwrap();
        assert_eq!(payload.as_str(), r#"{"location":"Market","role":3}"#);
    }

    #[test]
    fn values_are_trimmed() {
        let payload = EventPayloadBuilder::new(EventType::Shipment, " Ada ", 1)
            .location("  Port Harcourt ")
            .build()
            .unwrap();
        assert_eq!(payload.fields().location.as_deref(), Some("Port Harcourt"));
        assert_eq!(payload.fields().recorded_by.as_deref(), Some("Ada"));
    }

    #[test]
    fn identical_inputs_are_byte_identical() {
        let build = || {
            quality_check()
                .notes("n")
                .location("l")
                .quality_score(Some(QualityScore::new(5).unwrap()))
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(a.as_str().as_bytes(), b.as_str().as_bytes());
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn different_inputs_have_different_digests() {
        let a = quality_check().location("A").build().unwrap();
        let b = quality_check().location("B").build().unwrap();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn quality_fields_are_kept_for_other_types() {
        let payload = EventPayloadBuilder::new(EventType::Processing, "Ada", 2)
            .quality_score(Some(QualityScore::new(3).unwrap()))
            .build()
            .unwrap();
        assert_eq!(payload.event_type(), EventType::Processing);
        assert!(payload.as_str().contains(r#""qualityScore":3"#));
    }

    #[test]
    fn parse_recovers_fields() {
        let payload = quality_check()
            .location("Ibadan Lab")
            .quality_score(Some(QualityScore::new(9).unwrap()))
            .build()
            .unwrap();
        let parsed = EventPayload::parse(payload.as_str()).unwrap();
        assert_eq!(&parsed, payload.fields());
    }

    #[test]
    fn parse_rejects_opaque_references() {
        assert!(EventPayload::parse("0xdeadbeef").is_none());
        assert!(EventPayload::parse("").is_none());
        assert!(EventPayload::parse(r#"{"qualityScore":42}"#).is_none());
        assert!(EventPayload::parse(r#"{"qualityScore":"great"}"#).is_none());
    }

    #[test]
    fn parse_accepts_text_quality_scores() {
        let recorded = r#"{"notes":"","location":"Ibadan Lab","qualityScore":"8","certificateHash":"CERT-9","recordedBy":"Ngozi","role":4}"#;
        let fields = EventPayload::parse(recorded).unwrap();
        assert_eq!(fields.quality_score, Some(QualityScore::new(8).unwrap()));
        assert_eq!(fields.certificate_ref.as_deref(), Some("CERT-9"));
        assert_eq!(fields.role, 4);

        let blank = EventPayload::parse(r#"{"qualityScore":" ","role":4}"#).unwrap();
        assert_eq!(blank.quality_score, None);
        let null = EventPayload::parse(r#"{"qualityScore":null,"role":4}"#).unwrap();
        assert_eq!(null.quality_score, None);
    }
}
