use serde::Deserialize;
use tracing::debug;

use agtrace_payload::EventPayloadBuilder;
use agtrace_types::{Actor, EventType, QualityScore};

use crate::error::{ServiceError, ServiceResult};

/// User-entered fields of the "record event" form.
#[derive(Clone, Debug, Deserialize)]
pub struct EventForm {
    pub event_type: EventType,
    #[serde(default)]
    pub notes: String,
    pub location: String,
    #[serde(default)]
    pub quality_score: Option<u8>,
    #[serde(default)]
    pub certificate_ref: String,
}

impl EventForm {
    pub fn new(event_type: EventType, location: impl Into<String>) -> Self {
        Self {
            event_type,
            notes: String::new(),
            location: location.into(),
            quality_score: None,
            certificate_ref: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_quality(mut self, score: Option<u8>, certificate_ref: impl Into<String>) -> Self {
        self.quality_score = score;
        self.certificate_ref = certificate_ref.into();
        self
    }

    /// Validate the form and prepare a payload builder for `actor`.
    ///
    /// Location is required. Quality score and certificate reference are only
    /// carried for quality checks and silently dropped otherwise.
    pub fn into_builder(self, actor: &Actor) -> ServiceResult<EventPayloadBuilder> {
        if self.location.trim().is_empty() {
            return Err(ServiceError::Validation("location is required".into()));
        }

        let mut builder = EventPayloadBuilder::new(self.event_type, &actor.label, actor.role_code)
            .notes(self.notes)
            .location(self.location);

        if self.event_type == EventType::QualityCheck {
            let score = self
                .quality_score
                .map(QualityScore::new)
                .transpose()
                .map_err(|e| ServiceError::Validation(e.to_string()))?;
            builder = builder
                .quality_score(score)
                .certificate_ref(self.certificate_ref);
        } else if self.quality_score.is_some() || !self.certificate_ref.trim().is_empty() {
            debug!(event_type = %self.event_type, "dropping quality fields from form");
        }

        Ok(builder)
    }
}
