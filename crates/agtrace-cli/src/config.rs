use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use agtrace_gateway::{InMemoryGatewayConfig, InMemoryLedgerGateway};
use agtrace_payload::EventPayloadBuilder;
use agtrace_service::ServiceConfig;
use agtrace_types::{Actor, ActorId, EventType};

/// Contents of the `--config` TOML file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub service: ServiceConfig,
    pub identity: IdentityConfig,
    pub ledger: LedgerConfig,
}

/// The caller the CLI acts as.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub label: String,
    pub address: ActorId,
    /// Raw role code: 1 producer, 2 processor, 3 retailer, 4 certifier.
    pub role: u8,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            label: "Local Producer".into(),
            address: InMemoryGatewayConfig::default().signer,
            role: 1,
        }
    }
}

impl IdentityConfig {
    pub fn actor(&self) -> Actor {
        Actor::new(self.label.clone(), self.address.clone(), self.role)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    #[serde(flatten)]
    pub gateway: InMemoryGatewayConfig,
    pub batches: Vec<BatchSeed>,
}

/// A batch to create on the in-memory ledger at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSeed {
    pub product_type: String,
    #[serde(default)]
    pub events: Vec<EventSeed>,
}

/// A pre-recorded event. Seeded events bypass role checks, which is how
/// harvests get onto the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventSeed {
    pub event_type: EventType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub recorded_by: String,
    #[serde(default)]
    pub role: u8,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Configuration used when no file is given: a producer identity and a
    /// handful of harvested batches.
    pub fn demo() -> Self {
        let harvest = |location: &str, farmer: &str| EventSeed {
            event_type: EventType::Harvest,
            location: location.into(),
            notes: String::new(),
            recorded_by: farmer.into(),
            role: 1,
        };
        let mut config = Self::default();
        config.ledger.gateway.start_time = Some(1_717_200_000);
        config.ledger.gateway.tick_secs = 6 * 3_600;
        config.ledger.batches = vec![
            BatchSeed {
                product_type: "Cocoa beans".into(),
                events: vec![
                    harvest("Ondo, NG", "Adaeze Farms"),
                    EventSeed {
                        event_type: EventType::Shipment,
                        location: "Lagos port".into(),
                        notes: "Reefer container 14".into(),
                        recorded_by: "Adaeze Farms".into(),
                        role: 1,
                    },
                ],
            },
            BatchSeed {
                product_type: "Cassava".into(),
                events: vec![harvest("Oyo, NG", "Bello Cooperative")],
            },
            BatchSeed {
                product_type: "Arabica coffee".into(),
                events: Vec::new(),
            },
        ];
        config
    }

    /// Gateway settings with the configured identity as the signing account.
    ///
    /// The ledger records the signer as the actor of every submitted event, so
    /// it always follows `[identity].address`.
    pub fn gateway_config(&self) -> InMemoryGatewayConfig {
        if self.ledger.gateway.signer != self.identity.address {
            debug!(
                ledger_signer = %self.ledger.gateway.signer,
                identity = %self.identity.address,
                "using identity address as ledger signer"
            );
        }
        InMemoryGatewayConfig {
            signer: self.identity.address.clone(),
            ..self.ledger.gateway.clone()
        }
    }

    /// Build the in-memory ledger and create the seeded batches.
    pub fn build_ledger(&self) -> anyhow::Result<InMemoryLedgerGateway> {
        let config = self.gateway_config();
        let signer = config.signer.clone();
        let gateway = InMemoryLedgerGateway::new(config);
        for seed in &self.ledger.batches {
            let batch = gateway.create_batch(&seed.product_type)?;
            for event in &seed.events {
                let payload = EventPayloadBuilder::new(event.event_type, &event.recorded_by, event.role)
                    .location(&event.location)
                    .notes(&event.notes)
                    .build()?;
                gateway.append_record(batch.id, event.event_type.code(), signer.clone(), payload.as_str())?;
            }
            debug!(batch = %batch.id, events = seed.events.len(), "seeded batch");
        }
        Ok(gateway)
    }
}
