//! InteractionLedger + PairRegistry - record a decision, detect mutual
//! acceptance, and fan out the resulting notifications.

use std::sync::Arc;

use crate::domain::foundation::{PairingId, Timestamp, UserId};
use crate::domain::matching::{Decision, DecisionKind, MatchingError, PairKey, Pairing};
use crate::ports::{CounterpartInfo, DecisionLedger, Notifier, PairingStore, ProfileStore};

/// Result of recording a decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub decision: Decision,
    /// Whether a pairing exists for this pair after the call.
    pub paired: bool,
    pub pairing_id: Option<PairingId>,
    /// True only for the call that actually created the pairing; the
    /// losing side of a race sees `paired` without `newly_paired`.
    pub newly_paired: bool,
}

/// Handles the decision flow: upsert, reciprocal check, pairing creation.
pub struct DecisionHandler {
    ledger: Arc<dyn DecisionLedger>,
    pairings: Arc<dyn PairingStore>,
    profiles: Arc<dyn ProfileStore>,
    notifier: Arc<dyn Notifier>,
}

impl DecisionHandler {
    pub fn new(
        ledger: Arc<dyn DecisionLedger>,
        pairings: Arc<dyn PairingStore>,
        profiles: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            ledger,
            pairings,
            profiles,
            notifier,
        }
    }

    /// Record `actor`'s decision about `target`.
    ///
    /// The upsert is idempotent per ordered pair. An Accept additionally
    /// checks for the reciprocal Accept: absent, the target gets a one-way
    /// `interest` notification; present, the pairing is created through the
    /// store's insert-if-absent so that concurrent mutual accepts yield
    /// exactly one record, and only the creating call emits `paired`.
    pub async fn handle(
        &self,
        actor: UserId,
        target: UserId,
        kind: DecisionKind,
    ) -> Result<DecisionOutcome, MatchingError> {
        if actor == target {
            return Err(MatchingError::InvalidTarget);
        }

        let decision = self
            .ledger
            .upsert(actor, target, kind, Timestamp::now())
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?;

        if kind == DecisionKind::Reject {
            return Ok(DecisionOutcome {
                decision,
                paired: false,
                pairing_id: None,
                newly_paired: false,
            });
        }

        let reciprocal = self
            .ledger
            .find(&target, &actor)
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?;

        match reciprocal {
            Some(d) if d.is_accept() => {
                let key = PairKey::new(actor, target).ok_or(MatchingError::InvalidTarget)?;
                let candidate = Pairing::new(PairingId::new(), key, Timestamp::now());
                let insert = self
                    .pairings
                    .insert_if_absent(candidate)
                    .await
                    .map_err(|e| MatchingError::Store(e.to_string()))?;

                let pairing = insert.pairing().clone();
                let newly_paired = insert.is_created();

                if newly_paired {
                    tracing::info!(pairing_id = %pairing.id, "mutual accept, pairing created");
                    self.notify_paired(&pairing).await;
                }

                Ok(DecisionOutcome {
                    decision,
                    paired: true,
                    pairing_id: Some(pairing.id),
                    newly_paired,
                })
            }
            _ => {
                self.notify_interest(&actor, &target).await;
                Ok(DecisionOutcome {
                    decision,
                    paired: false,
                    pairing_id: None,
                    newly_paired: false,
                })
            }
        }
    }

    /// Emit `paired` to both members with each other's display info.
    ///
    /// Runs only after the pairing committed; a profile fetch failure
    /// downgrades to a dropped notification, never an error.
    async fn notify_paired(&self, pairing: &Pairing) {
        let [a, b] = pairing.members();
        let (profile_a, profile_b) =
            match (self.profiles.fetch(&a).await, self.profiles.fetch(&b).await) {
                (Ok(Some(pa)), Ok(Some(pb))) => (pa, pb),
                _ => {
                    tracing::warn!(pairing_id = %pairing.id, "skipping paired notification, profile fetch failed");
                    return;
                }
            };

        self.notifier
            .paired(
                pairing.id,
                a,
                CounterpartInfo {
                    id: b,
                    name: profile_b.name,
                    photo: profile_b.photo,
                },
            )
            .await;
        self.notifier
            .paired(
                pairing.id,
                b,
                CounterpartInfo {
                    id: a,
                    name: profile_a.name,
                    photo: profile_a.photo,
                },
            )
            .await;
    }

    /// One-way interest ping to the target's channel.
    async fn notify_interest(&self, actor: &UserId, target: &UserId) {
        match self.profiles.fetch(actor).await {
            Ok(Some(profile)) => {
                self.notifier.interest(*target, profile.name).await;
            }
            _ => {
                tracing::debug!(actor = %actor, "skipping interest notification, profile fetch failed");
            }
        }
    }
}
