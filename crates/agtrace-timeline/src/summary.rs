use serde::Serialize;

use agtrace_types::Batch;

use crate::format::format_timestamp;

/// Header card for a batch page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub id: String,
    pub product_type: String,
    pub creator_display: String,
    pub created_display: String,
}

pub fn summarize(batch: &Batch) -> BatchSummary {
    BatchSummary {
        id: batch.id.to_string(),
        product_type: batch.product_type.clone(),
        creator_display: batch.creator.short(),
        created_display: format_timestamp(batch.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agtrace_types::{ActorId, BatchId, EpochSeconds};

    #[test]
    fn summary_fields() {
        let batch = Batch {
            id: BatchId::new(42).unwrap(),
            product_type: "Cocoa beans".into(),
            creator: ActorId::new("0x9f3c00000000000000000000000000000000a7e1"),
            created_at: EpochSeconds::zero(),
        };
        let s = summarize(&batch);
        assert_eq!(s.id, "#42");
        assert_eq!(s.product_type, "Cocoa beans");
        assert_eq!(s.creator_display, "0x9f3c...a7e1");
        assert_eq!(s.created_display, "1970-01-01 00:00:00 UTC");
    }
}
