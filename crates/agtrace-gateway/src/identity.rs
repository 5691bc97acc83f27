use async_trait::async_trait;

use agtrace_types::Actor;

use crate::traits::IdentityProvider;

/// Identity provider that always reports the same caller.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    actor: Option<Actor>,
}

impl StaticIdentity {
    pub fn new(actor: Actor) -> Self {
        Self { actor: Some(actor) }
    }

    /// No caller signed in.
    pub fn anonymous() -> Self {
        Self { actor: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_actor(&self) -> Option<Actor> {
        self.actor.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agtrace_types::{ActorId, Role};

    #[tokio::test]
    async fn static_identity_reports_actor() {
        let identity = StaticIdentity::new(Actor::new("Ada", ActorId::new("0x01"), 1));
        let actor = identity.current_actor().await.unwrap();
        assert_eq!(actor.label, "Ada");
        assert_eq!(actor.role(), Some(Role::Producer));
    }

    #[tokio::test]
    async fn anonymous_has_no_actor() {
        assert!(StaticIdentity::anonymous().current_actor().await.is_none());
    }
}
