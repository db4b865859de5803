//! Credit ledger: lifecycle of sponsor credits as a capacity-constrained
//! allocation pool.
//!
//! The ledger is the only writer of `sponsor_credits` redemption state and
//! of `teams.credit_id`. Redemption is an atomic conditional update — the
//! row is claimed only while still unclaimed, and a zero-row result means
//! someone else won — so "at most one redemption per code" holds without
//! trusting any earlier read. Redeem, restore, and resize each run in a
//! single transaction that keeps `team.credit_id` and
//! `credit.redeemed_by_team_id` in agreement.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::codes::CodeGenerator;
use crate::domain::entities::SponsorCredit;
use crate::error::RegistryError;
use crate::persistence::CreditStore;

/// Ledger for sponsor credit pools.
#[derive(Debug, Clone)]
pub struct CreditLedger {
    pool: PgPool,
    store: CreditStore,
    codes: CodeGenerator,
}

impl CreditLedger {
    /// Creates a ledger over the given pool and code generator.
    #[must_use]
    pub fn new(pool: PgPool, codes: CodeGenerator) -> Self {
        let store = CreditStore::new(pool.clone());
        Self { pool, store, codes }
    }

    /// Returns the read-only credit store.
    #[must_use]
    pub const fn store(&self) -> &CreditStore {
        &self.store
    }

    /// Issues `count` new credits for a sponsor, each with a unique
    /// redemption code and no captain email.
    ///
    /// In-batch duplicates are avoided by the generator; a collision with
    /// a historical code hits the unique constraint (`ON CONFLICT DO
    /// NOTHING`) and is re-rolled. Does not touch
    /// `sponsors.total_credits` — that stays the caller's bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn issue(
        &self,
        sponsor_id: Uuid,
        count: usize,
    ) -> Result<Vec<SponsorCredit>, RegistryError> {
        let mut issued = Vec::with_capacity(count);
        while issued.len() < count {
            let code = self.codes.generate();
            let inserted = sqlx::query_as::<_, SponsorCredit>(
                "INSERT INTO sponsor_credits (sponsor_id, redemption_code) VALUES ($1, $2) \
                 ON CONFLICT (redemption_code) DO NOTHING RETURNING *",
            )
            .bind(sponsor_id)
            .bind(&code)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from_sqlx)?;

            if let Some(credit) = inserted {
                issued.push(credit);
            }
        }

        tracing::info!(%sponsor_id, count = issued.len(), "credits issued");
        Ok(issued)
    }

    /// Looks up a code and checks it is still available.
    ///
    /// The reservation is logical, not a lock: the credit may still be
    /// claimed by someone else between this call and [`redeem`], which is
    /// why [`redeem`] re-checks atomically.
    ///
    /// [`redeem`]: CreditLedger::redeem
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidCode`] for an unknown code,
    /// [`RegistryError::CodeAlreadyUsed`] for a claimed one, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn validate_and_reserve(&self, code: &str) -> Result<SponsorCredit, RegistryError> {
        let credit = self
            .store
            .find_by_code(code)
            .await?
            .ok_or_else(|| RegistryError::InvalidCode(code.to_string()))?;

        if !credit.is_available() {
            return Err(RegistryError::CodeAlreadyUsed(credit.redemption_code));
        }
        Ok(credit)
    }

    /// Claims a credit for a team and links the team to it, atomically.
    ///
    /// The credit row is updated only while unclaimed (or already claimed
    /// by the same team, making the call idempotent — `redeemed_at` is not
    /// overwritten on a repeat). Zero rows affected means the code was
    /// claimed by another team in the window since validation. The same
    /// transaction sets `teams.sponsor_id`/`teams.credit_id` so both sides
    /// of the link always agree.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CodeAlreadyUsed`] when another team holds
    /// the credit, [`RegistryError::CreditNotFound`] if the credit row is
    /// gone, or [`RegistryError::Persistence`] on database failure.
    pub async fn redeem(
        &self,
        credit_id: Uuid,
        team_id: Uuid,
        captain_email: &str,
    ) -> Result<SponsorCredit, RegistryError> {
        let mut tx = self.pool.begin().await.map_err(RegistryError::from_sqlx)?;

        let claimed = sqlx::query_as::<_, SponsorCredit>(
            "UPDATE sponsor_credits SET \
             redeemed_by_team_id = $2, \
             redeemed_at = COALESCE(redeemed_at, NOW()), \
             captain_email = $3 \
             WHERE id = $1 AND (redeemed_by_team_id IS NULL OR redeemed_by_team_id = $2) \
             RETURNING *",
        )
        .bind(credit_id)
        .bind(team_id)
        .bind(captain_email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RegistryError::from_sqlx)?;

        let Some(credit) = claimed else {
            tx.rollback().await.map_err(RegistryError::from_sqlx)?;
            // Zero rows: either claimed by another team or deleted.
            return match self.store.get(credit_id).await {
                Ok(other) => Err(RegistryError::CodeAlreadyUsed(other.redemption_code)),
                Err(err) => Err(err),
            };
        };

        sqlx::query("UPDATE teams SET sponsor_id = $2, credit_id = $3 WHERE id = $1")
            .bind(team_id)
            .bind(credit.sponsor_id)
            .bind(credit.id)
            .execute(&mut *tx)
            .await
            .map_err(RegistryError::from_sqlx)?;

        tx.commit().await.map_err(RegistryError::from_sqlx)?;

        tracing::info!(%credit_id, %team_id, code = %credit.redemption_code, "credit redeemed");
        Ok(credit)
    }

    /// Returns a credit to the pool after a team withdrawal.
    ///
    /// Nulls the redemption fields only while the credit is still held by
    /// the withdrawing team; `captain_email` and `email_sent_at` history
    /// is preserved. If another team reclaimed the credit in the interim
    /// this is a logged no-op. The team's `credit_id`/`sponsor_id` are
    /// cleared in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Persistence`] on database failure.
    pub async fn restore(&self, credit_id: Uuid, team_id: Uuid) -> Result<(), RegistryError> {
        let mut tx = self.pool.begin().await.map_err(RegistryError::from_sqlx)?;

        let result = sqlx::query(
            "UPDATE sponsor_credits SET redeemed_by_team_id = NULL, redeemed_at = NULL \
             WHERE id = $1 AND redeemed_by_team_id = $2",
        )
        .bind(credit_id)
        .bind(team_id)
        .execute(&mut *tx)
        .await
        .map_err(RegistryError::from_sqlx)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(RegistryError::from_sqlx)?;
            tracing::warn!(%credit_id, %team_id, "credit not restored; not held by this team");
            return Ok(());
        }

        sqlx::query(
            "UPDATE teams SET sponsor_id = NULL, credit_id = NULL \
             WHERE id = $1 AND credit_id = $2",
        )
        .bind(team_id)
        .bind(credit_id)
        .execute(&mut *tx)
        .await
        .map_err(RegistryError::from_sqlx)?;

        tx.commit().await.map_err(RegistryError::from_sqlx)?;

        tracing::info!(%credit_id, %team_id, "credit restored");
        Ok(())
    }

    /// Resizes a sponsor's credit pool to `new_total`.
    ///
    /// Shrinking deletes only unused credits, most recently created first;
    /// redeemed credits are never touched, and shrinking below the used
    /// count is rejected. Growing issues the difference as fresh codes.
    /// `sponsors.total_credits` is updated in the same transaction.
    /// Returns the newly issued codes (empty when shrinking).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SponsorNotFound`] for an unknown sponsor,
    /// [`RegistryError::CannotReduceBelowUsed`] when `new_total` is below
    /// the redeemed count, [`RegistryError::Validation`] for a negative
    /// total, or [`RegistryError::Persistence`] on database failure.
    pub async fn resize_pool(
        &self,
        sponsor_id: Uuid,
        new_total: i32,
    ) -> Result<Vec<String>, RegistryError> {
        if new_total < 0 {
            return Err(RegistryError::Validation(
                "total_credits must not be negative".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(RegistryError::from_sqlx)?;

        // Row lock serializes concurrent resizes for the same sponsor.
        let exists = sqlx::query_scalar::<_, i32>(
            "SELECT total_credits FROM sponsors WHERE id = $1 FOR UPDATE",
        )
        .bind(sponsor_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RegistryError::from_sqlx)?;

        if exists.is_none() {
            tx.rollback().await.map_err(RegistryError::from_sqlx)?;
            return Err(RegistryError::SponsorNotFound(sponsor_id.to_string()));
        }

        let used = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sponsor_credits \
             WHERE sponsor_id = $1 AND redeemed_by_team_id IS NOT NULL",
        )
        .bind(sponsor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RegistryError::from_sqlx)?;

        let current = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sponsor_credits WHERE sponsor_id = $1",
        )
        .bind(sponsor_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RegistryError::from_sqlx)?;

        let plan = match plan_resize(used, current, i64::from(new_total)) {
            Ok(plan) => plan,
            Err(err) => {
                tx.rollback().await.map_err(RegistryError::from_sqlx)?;
                return Err(err);
            }
        };

        let mut new_codes = Vec::new();
        match plan {
            ResizePlan::Shrink(excess) => {
                sqlx::query(
                    "DELETE FROM sponsor_credits WHERE id IN ( \
                         SELECT id FROM sponsor_credits \
                         WHERE sponsor_id = $1 AND redeemed_by_team_id IS NULL \
                         ORDER BY created_at DESC, id DESC LIMIT $2)",
                )
                .bind(sponsor_id)
                .bind(excess)
                .execute(&mut *tx)
                .await
                .map_err(RegistryError::from_sqlx)?;
            }
            ResizePlan::Grow(shortfall) => {
                while (new_codes.len() as i64) < shortfall {
                    let code = self.codes.generate();
                    let inserted = sqlx::query_scalar::<_, String>(
                        "INSERT INTO sponsor_credits (sponsor_id, redemption_code) VALUES ($1, $2) \
                         ON CONFLICT (redemption_code) DO NOTHING RETURNING redemption_code",
                    )
                    .bind(sponsor_id)
                    .bind(&code)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(RegistryError::from_sqlx)?;

                    if let Some(code) = inserted {
                        new_codes.push(code);
                    }
                }
            }
            ResizePlan::Keep => {}
        }

        sqlx::query("UPDATE sponsors SET total_credits = $2 WHERE id = $1")
            .bind(sponsor_id)
            .bind(new_total)
            .execute(&mut *tx)
            .await
            .map_err(RegistryError::from_sqlx)?;

        tx.commit().await.map_err(RegistryError::from_sqlx)?;

        tracing::info!(
            %sponsor_id,
            from = current,
            to = new_total,
            issued = new_codes.len(),
            "credit pool resized"
        );
        Ok(new_codes)
    }

    /// Stamps the invite-sent timestamp on a credit.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CreditNotFound`] for an unknown credit, or
    /// [`RegistryError::Persistence`] on database failure.
    pub async fn mark_invite_sent(&self, credit_id: Uuid) -> Result<(), RegistryError> {
        self.store.mark_invite_sent(credit_id).await
    }
}

/// Planned mutation for a pool resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResizePlan {
    /// Delete this many unused credits.
    Shrink(i64),
    /// Issue this many fresh credits.
    Grow(i64),
    /// Pool already at the requested size.
    Keep,
}

/// Decides what a resize must do given the redeemed count, the current
/// pool size, and the requested size. Rejects a negative request and any
/// request below the redeemed count; shrinking only ever removes unused
/// credits.
fn plan_resize(used: i64, current: i64, requested: i64) -> Result<ResizePlan, RegistryError> {
    if requested < 0 {
        return Err(RegistryError::Validation(
            "total_credits must not be negative".to_string(),
        ));
    }
    if requested < used {
        return Err(RegistryError::CannotReduceBelowUsed { used, requested });
    }
    if requested < current {
        Ok(ResizePlan::Shrink(current - requested))
    } else if requested > current {
        Ok(ResizePlan::Grow(requested - current))
    } else {
        Ok(ResizePlan::Keep)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn resize_rejects_request_below_redeemed_count() {
        // Pool of 5 with 3 redeemed cannot shrink to 2.
        let plan = plan_resize(3, 5, 2);
        assert!(matches!(
            plan,
            Err(RegistryError::CannotReduceBelowUsed {
                used: 3,
                requested: 2
            })
        ));
    }

    #[test]
    fn resize_shrink_deletes_exactly_the_excess() {
        // Pool of 5 with 3 redeemed shrinking to 3 deletes the 2 unused.
        assert!(matches!(plan_resize(3, 5, 3), Ok(ResizePlan::Shrink(2))));
    }

    #[test]
    fn resize_grow_issues_exactly_the_shortfall() {
        // Pool of 5 growing to 7 issues 2 fresh codes.
        assert!(matches!(plan_resize(3, 5, 7), Ok(ResizePlan::Grow(2))));
    }

    #[test]
    fn resize_to_current_size_is_a_keep() {
        assert!(matches!(plan_resize(3, 5, 5), Ok(ResizePlan::Keep)));
    }

    #[test]
    fn resize_rejects_negative_request() {
        assert!(matches!(
            plan_resize(0, 0, -1),
            Err(RegistryError::Validation(_))
        ));
    }

    #[test]
    fn resize_allows_shrinking_exactly_to_the_used_count() {
        assert!(matches!(plan_resize(4, 6, 4), Ok(ResizePlan::Shrink(2))));
    }
}
