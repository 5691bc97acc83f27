use agtrace_types::{EventType, Role};

/// One row of the eligibility table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EligibilityRule {
    pub event_type: EventType,
    /// Roles permitted to record this event type. Never empty.
    pub roles: &'static [Role],
    /// Whether the event type may be recorded through the event workflow.
    /// Harvest is recorded alongside batch creation and is never offered.
    pub offered: bool,
}

impl EligibilityRule {
    /// Returns `true` if `role` appears in this rule's role set.
    pub fn permits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The static role eligibility table, in event type code order.
pub const ELIGIBILITY: [EligibilityRule; 5] = [
    EligibilityRule {
        event_type: EventType::Harvest,
        roles: &[Role::Producer],
        offered: false,
    },
    EligibilityRule {
        event_type: EventType::Shipment,
        roles: &[Role::Producer],
        offered: true,
    },
    EligibilityRule {
        event_type: EventType::Processing,
        roles: &[Role::Processor],
        offered: true,
    },
    EligibilityRule {
        event_type: EventType::QualityCheck,
        roles: &[Role::Processor, Role::Certifier],
        offered: true,
    },
    EligibilityRule {
        event_type: EventType::Sale,
        roles: &[Role::Retailer],
        offered: true,
    },
];
