//! Database-backed credit ledger tests.
//!
//! The redeem/restore/resize guarantees live in transactional SQL, so
//! they are exercised here against a real PostgreSQL. Ignored by
//! default; point `DATABASE_URL` at a disposable database and run:
//!
//! ```sh
//! cargo test -- --ignored
//! ```

#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

use sqlx::PgPool;
use uuid::Uuid;

use fairway_gateway::domain::CodeGenerator;
use fairway_gateway::domain::entities::{EventType, SponsorCredit};
use fairway_gateway::error::RegistryError;
use fairway_gateway::persistence::sponsors::NewSponsor;
use fairway_gateway::persistence::teams::NewTeam;
use fairway_gateway::persistence::{MIGRATOR, SponsorStore, TeamStore};
use fairway_gateway::service::CreditLedger;

struct Harness {
    sponsors: SponsorStore,
    teams: TeamStore,
    ledger: CreditLedger,
    event_year_id: Uuid,
}

impl Harness {
    async fn new() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
        let pool = PgPool::connect(&url).await.expect("connect");
        MIGRATOR.run(&pool).await.expect("migrate");

        let event_year_id: Uuid = sqlx::query_scalar(
            "INSERT INTO event_years (year) VALUES (2026) \
             ON CONFLICT (year) DO UPDATE SET year = EXCLUDED.year RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .expect("event year");

        Self {
            sponsors: SponsorStore::new(pool.clone()),
            teams: TeamStore::new(pool.clone()),
            ledger: CreditLedger::new(pool, CodeGenerator::new("FROG")),
            event_year_id,
        }
    }

    async fn sponsor(&self, name: &str) -> Uuid {
        let sponsor = self
            .sponsors
            .insert(&NewSponsor {
                event_year_id: self.event_year_id,
                name: name.to_string(),
                contact_name: None,
                contact_email: None,
                package_id: None,
                payment_method: None,
                payment_status: None,
                total_credits: 0,
                access_token: Uuid::new_v4().simple().to_string(),
            })
            .await
            .expect("sponsor insert");
        sponsor.id
    }

    async fn team(&self) -> Uuid {
        let team = self
            .teams
            .insert(&NewTeam {
                event_year_id: self.event_year_id,
                event_type: EventType::SatSun,
                name: None,
                sponsor_id: None,
                session_preference: None,
                notes: None,
            })
            .await
            .expect("team insert");
        team.id
    }

    async fn credit(&self, credit_id: Uuid) -> SponsorCredit {
        self.ledger.store().get(credit_id).await.expect("credit")
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn redeem_is_idempotent_for_the_same_team_only() {
    let h = Harness::new().await;
    let sponsor_id = h.sponsor("Idempotence LLC").await;
    let issued = h.ledger.issue(sponsor_id, 1).await.expect("issue");
    let credit = issued.first().expect("one credit");
    let team_a = h.team().await;
    let team_b = h.team().await;

    let first = h
        .ledger
        .redeem(credit.id, team_a, "captain@example.com")
        .await
        .expect("first redeem");

    // Repeating the claim for the same team succeeds without moving the
    // redemption timestamp.
    let second = h
        .ledger
        .redeem(credit.id, team_a, "captain@example.com")
        .await
        .expect("repeat redeem");
    assert_eq!(second.redeemed_at, first.redeemed_at);
    assert_eq!(second.redeemed_by_team_id, Some(team_a));

    // A different team loses.
    let err = h
        .ledger
        .redeem(credit.id, team_b, "other@example.com")
        .await;
    assert!(matches!(err, Err(RegistryError::CodeAlreadyUsed(_))));

    // Both sides of the link agree.
    let team = h.teams.get(team_a).await.expect("team");
    assert_eq!(team.credit_id, Some(credit.id));
    assert_eq!(team.sponsor_id, Some(sponsor_id));
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn restore_returns_the_credit_to_the_pool() {
    let h = Harness::new().await;
    let sponsor_id = h.sponsor("Round Trip Inc").await;
    let issued = h.ledger.issue(sponsor_id, 1).await.expect("issue");
    let credit = issued.first().expect("one credit");
    let team_id = h.team().await;

    h.ledger
        .redeem(credit.id, team_id, "captain@example.com")
        .await
        .expect("redeem");
    h.ledger.restore(credit.id, team_id).await.expect("restore");

    // Available again, with the captain email kept as history.
    let restored = h.credit(credit.id).await;
    assert!(restored.is_available());
    assert_eq!(restored.redeemed_at, None);
    assert_eq!(restored.captain_email.as_deref(), Some("captain@example.com"));

    let team = h.teams.get(team_id).await.expect("team");
    assert_eq!(team.credit_id, None);
    assert_eq!(team.sponsor_id, None);

    // Restoring a credit the team no longer holds is a no-op.
    h.ledger
        .restore(credit.id, team_id)
        .await
        .expect("repeat restore");
    assert!(h.credit(credit.id).await.is_available());
}

#[tokio::test]
#[ignore = "requires PostgreSQL via DATABASE_URL"]
async fn resize_pool_guards_used_credits_and_moves_exact_counts() {
    let h = Harness::new().await;
    let sponsor_id = h.sponsor("Resize & Sons").await;
    let issued = h.ledger.issue(sponsor_id, 5).await.expect("issue");

    // Redeem three of the five.
    let mut redeemed_ids = Vec::new();
    for credit in issued.iter().take(3) {
        let team_id = h.team().await;
        h.ledger
            .redeem(credit.id, team_id, "captain@example.com")
            .await
            .expect("redeem");
        redeemed_ids.push(credit.id);
    }

    // 5 total / 3 used: shrinking to 2 is rejected.
    let err = h.ledger.resize_pool(sponsor_id, 2).await;
    assert!(matches!(
        err,
        Err(RegistryError::CannotReduceBelowUsed {
            used: 3,
            requested: 2
        })
    ));

    // Shrinking to 3 deletes exactly the 2 unused credits.
    let codes = h.ledger.resize_pool(sponsor_id, 3).await.expect("shrink");
    assert!(codes.is_empty());
    let remaining = h
        .ledger
        .store()
        .list_for_sponsor(sponsor_id)
        .await
        .expect("list");
    assert_eq!(remaining.len(), 3);
    for credit in &remaining {
        assert!(redeemed_ids.contains(&credit.id), "redeemed credit survived");
    }

    // Growing back to 5 issues exactly 2 fresh codes.
    let codes = h.ledger.resize_pool(sponsor_id, 5).await.expect("grow");
    assert_eq!(codes.len(), 2);
    let pool_size = h
        .ledger
        .store()
        .list_for_sponsor(sponsor_id)
        .await
        .expect("list")
        .len();
    assert_eq!(pool_size, 5);

    let sponsor = h.sponsors.get(sponsor_id).await.expect("sponsor");
    assert_eq!(sponsor.total_credits, 5);
}
