use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::batch::BatchId;
use crate::error::TypeError;
use crate::temporal::EpochSeconds;

/// Kind of supply-chain event.
///
/// The ledger identifies event kinds by small integer codes. Those codes are
/// converted to this enum at the gateway boundary with [`EventType::try_from`];
/// an unknown code is a data-integrity problem and is never coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    /// Recorded together with the batch itself.
    Harvest,
    Shipment,
    Processing,
    QualityCheck,
    Sale,
}

impl EventType {
    /// All event types in code order.
    pub const ALL: [EventType; 5] = [
        EventType::Harvest,
        EventType::Shipment,
        EventType::Processing,
        EventType::QualityCheck,
        EventType::Sale,
    ];

    /// Ledger code for this event type.
    pub fn code(&self) -> u8 {
        match self {
            Self::Harvest => 0,
            Self::Shipment => 1,
            Self::Processing => 2,
            Self::QualityCheck => 3,
            Self::Sale => 4,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Harvest => "Harvest",
            Self::Shipment => "Shipment",
            Self::Processing => "Processing",
            Self::QualityCheck => "Quality Check",
            Self::Sale => "Sale",
        }
    }
}

impl TryFrom<u8> for EventType {
    type Error = TypeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.code() == code)
            .ok_or(TypeError::UnknownEventType(code))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One append-only entry in a batch's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyChainEvent {
    /// The batch this event refers to.
    pub batch_id: BatchId,
    pub event_type: EventType,
    pub actor: ActorId,
    /// Assigned by the ledger.
    pub timestamp: EpochSeconds,
    /// Opaque reference to off-chain context, usually a serialized payload.
    pub data_ref: String,
}

/// Inspection score attached to quality checks (1 to 10 inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QualityScore(u8);

impl QualityScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(score: u8) -> Result<Self, TypeError> {
        if !(Self::MIN..=Self::MAX).contains(&score) {
            return Err(TypeError::InvalidQualityScore(score));
        }
        Ok(Self(score))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for QualityScore {
    type Error = TypeError;

    fn try_from(score: u8) -> Result<Self, Self::Error> {
        Self::new(score)
    }
}

impl From<QualityScore> for u8 {
    fn from(score: QualityScore) -> Self {
        score.0
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for ty in EventType::ALL {
            assert_eq!(EventType::try_from(ty.code()).unwrap(), ty);
        }
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert_eq!(
            EventType::try_from(5),
            Err(TypeError::UnknownEventType(5))
        );
        assert_eq!(
            EventType::try_from(200),
            Err(TypeError::UnknownEventType(200))
        );
    }

    #[test]
    fn labels() {
        assert_eq!(EventType::QualityCheck.label(), "Quality Check");
        assert_eq!(format!("{}", EventType::Sale), "Sale");
    }

    #[test]
    fn quality_score_bounds() {
        assert!(QualityScore::new(0).is_err());
        assert!(QualityScore::new(11).is_err());
        assert_eq!(QualityScore::new(1).unwrap().get(), 1);
        assert_eq!(QualityScore::new(10).unwrap().get(), 10);
    }

    #[test]
    fn event_serializes_with_plain_fields() {
        let event = SupplyChainEvent {
            batch_id: BatchId::new(3).unwrap(),
            event_type: EventType::Shipment,
            actor: ActorId::new("0xfeed"),
            timestamp: EpochSeconds::new(10),
            data_ref: String::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["batch_id"], 3);
        assert_eq!(json["actor"], "0xfeed");
        assert_eq!(json["timestamp"], 10);
    }
}
