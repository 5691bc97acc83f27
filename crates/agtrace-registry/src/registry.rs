use serde::Serialize;
use tracing::trace;

use agtrace_types::{EventType, Role};

use crate::table::{EligibilityRule, ELIGIBILITY};

// ---------------------------------------------------------------------------
// EventTypeOption
// ---------------------------------------------------------------------------

/// An event type a caller may record, paired with its display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EventTypeOption {
    pub event_type: EventType,
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// EventTypeRegistry
// ---------------------------------------------------------------------------

/// Read-only view over the role eligibility table.
///
/// The registry has no state beyond the static table and no side effects, so
/// it is `Copy` and can be handed to every layer that needs it.
#[derive(Clone, Copy, Debug)]
pub struct EventTypeRegistry {
    rules: &'static [EligibilityRule],
}

impl EventTypeRegistry {
    pub fn new() -> Self {
        Self {
            rules: &ELIGIBILITY,
        }
    }

    /// Event types the given role may record, in code order.
    ///
    /// An absent role yields an empty list: the caller simply has nothing to
    /// record. Harvest is never included.
    pub fn eligible_event_types(&self, role: Option<Role>) -> Vec<EventTypeOption> {
        let Some(role) = role else {
            trace!("no role supplied; no event types eligible");
            return Vec::new();
        };

        let options: Vec<_> = self
            .rules
            .iter()
            .filter(|rule| rule.offered && rule.permits(role))
            .map(|rule| EventTypeOption {
                event_type: rule.event_type,
                label: rule.event_type.label(),
            })
            .collect();

        trace!(%role, count = options.len(), "resolved eligible event types");
        options
    }

    /// Eligible event types for a raw identity-layer role code.
    pub fn eligible_for_code(&self, role_code: u8) -> Vec<EventTypeOption> {
        self.eligible_event_types(Role::from_code(role_code))
    }

    /// Returns `true` if `role` may record `event_type` through the event
    /// workflow.
    pub fn is_authorized(&self, role: Option<Role>, event_type: EventType) -> bool {
        self.eligible_event_types(role)
            .iter()
            .any(|opt| opt.event_type == event_type)
    }

    /// The role set configured for `event_type`.
    pub fn roles_for(&self, event_type: EventType) -> &'static [Role] {
        self.rules
            .iter()
            .find(|rule| rule.event_type == event_type)
            .map(|rule| rule.roles)
            .unwrap_or(&[])
    }
}

impl Default for EventTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(options: Vec<EventTypeOption>) -> Vec<EventType> {
        options.into_iter().map(|o| o.event_type).collect()
    }

    #[test]
    fn producer_may_ship() {
        let registry = EventTypeRegistry::new();
        assert_eq!(
            types(registry.eligible_event_types(Some(Role::Producer))),
            vec![EventType::Shipment]
        );
    }

    #[test]
    fn processor_may_process_and_check_quality() {
        let registry = EventTypeRegistry::new();
        assert_eq!(
            types(registry.eligible_for_code(2)),
            vec![EventType::Processing, EventType::QualityCheck]
        );
    }

    #[test]
    fn retailer_may_sell() {
        let registry = EventTypeRegistry::new();
        assert_eq!(
            types(registry.eligible_event_types(Some(Role::Retailer))),
            vec![EventType::Sale]
        );
    }

    #[test]
    fn certifier_may_check_quality() {
        let registry = EventTypeRegistry::new();
        assert_eq!(
            types(registry.eligible_event_types(Some(Role::Certifier))),
            vec![EventType::QualityCheck]
        );
    }

    #[test]
    fn absent_or_unknown_role_gets_nothing() {
        let registry = EventTypeRegistry::new();
        assert!(registry.eligible_event_types(None).is_empty());
        assert!(registry.eligible_for_code(0).is_empty());
        assert!(registry.eligible_for_code(9).is_empty());
    }

    #[test]
    fn labels_come_from_event_type() {
        let registry = EventTypeRegistry::new();
        let options = registry.eligible_event_types(Some(Role::Certifier));
        assert_eq!(options[0].label, "Quality Check");
    }

    #[test]
    fn harvest_is_never_authorized() {
        let registry = EventTypeRegistry::new();
        for role in Role::ALL {
            assert!(!registry.is_authorized(Some(role), EventType::Harvest));
        }
        assert_eq!(registry.roles_for(EventType::Harvest), &[Role::Producer]);
    }

    #[test]
    fn retailer_cannot_process() {
        let registry = EventTypeRegistry::new();
        assert!(!registry.is_authorized(Some(Role::Retailer), EventType::Processing));
        assert!(registry.is_authorized(Some(Role::Processor), EventType::Processing));
    }

    mod proptest_eligibility {
        use proptest::prelude::*;

        use super::*;

        fn arb_role() -> impl Strategy<Value = Option<Role>> {
            prop_oneof![
                Just(None),
                Just(Some(Role::Producer)),
                Just(Some(Role::Processor)),
                Just(Some(Role::Retailer)),
                Just(Some(Role::Certifier)),
            ]
        }

        proptest! {
            #[test]
            fn prop_only_permitted_types_returned(role in arb_role()) {
                let registry = EventTypeRegistry::new();
                for option in registry.eligible_event_types(role) {
                    prop_assert!(option.event_type != EventType::Harvest);
                    let role = role.expect("options are only returned for a role");
                    prop_assert!(registry.roles_for(option.event_type).contains(&role));
                }
            }

            #[test]
            fn prop_raw_codes_never_panic(code in any::<u8>()) {
                let registry = EventTypeRegistry::new();
                let options = registry.eligible_for_code(code);
                prop_assert!(options.len() <= 2);
                if Role::from_code(code).is_none() {
                    prop_assert!(options.is_empty());
                }
            }
        }
    }
}
