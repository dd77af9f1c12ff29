//! Checkout recording: the single write path for payment events.
//!
//! A payment provider delivers the same checkout event more than once —
//! retries, redeliveries, and replay tooling all hit the same handler.
//! Instead of a read-then-write check (racy) the insert itself is the
//! idempotency guard: the `payments.session_id` UNIQUE constraint turns a
//! replay into an ignored insert inside one transaction, and the caller is
//! told which of the two happened.
//!
//! Transport concerns (HTTP route, signature verification) belong to the
//! embedding application; this module only records what a verified event
//! says.

use crate::store::{Store, StoreError};
use chrono::Utc;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The facts a completed checkout event carries, already verified and
/// decoded by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// External session id — the idempotency key.
    pub session_id: String,
    pub customer_email: String,
    pub customer_name: Option<String>,
    pub customer_id: String,
    pub price_id: String,
    /// Amount in the provider's smallest currency unit.
    pub amount_total: i64,
    pub status: String,
}

/// What [`Store::record_checkout`] did with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutOutcome {
    /// First delivery: user upserted, payment row written.
    Recorded,
    /// Replay of a session id that is already on file; nothing written to
    /// `payments`.
    AlreadyRecorded,
}

/// A user row as the billing tables see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub customer_id: String,
    pub price_id: String,
    pub status: String,
}

impl Store {
    /// Record a completed checkout: upsert the user, insert the payment,
    /// all in one transaction keyed on the external session id.
    pub fn record_checkout(
        &mut self,
        session: &CheckoutSession,
    ) -> Result<CheckoutOutcome, StoreError> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        // An empty name on a replay must not wipe one we already stored.
        tx.execute(
            "INSERT INTO users (email, full_name, customer_id, price_id, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)
             ON CONFLICT(email) DO UPDATE SET
                 customer_id = excluded.customer_id,
                 price_id    = excluded.price_id,
                 status      = excluded.status,
                 full_name   = CASE WHEN excluded.full_name <> ''
                                    THEN excluded.full_name
                                    ELSE users.full_name END,
                 updated_at  = excluded.updated_at",
            params![
                session.customer_email,
                session.customer_name.as_deref().unwrap_or(""),
                session.customer_id,
                session.price_id,
                now,
            ],
        )?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO payments (session_id, amount, status, price_id, user_email, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.session_id,
                session.amount_total,
                session.status,
                session.price_id,
                session.customer_email,
                now,
            ],
        )?;

        tx.commit()?;

        if inserted > 0 {
            info!(
                "Recorded payment for session '{}' ({})",
                session.session_id, session.customer_email
            );
            Ok(CheckoutOutcome::Recorded)
        } else {
            debug!(
                "Replayed session '{}' ignored — payment already on file",
                session.session_id
            );
            Ok(CheckoutOutcome::AlreadyRecorded)
        }
    }

    /// Look up a billing user by email. `Ok(None)` when unknown.
    pub fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        use rusqlite::OptionalExtension;
        let user = self
            .conn
            .query_row(
                "SELECT id, email, full_name, customer_id, price_id, status
                 FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        full_name: row.get(2)?,
                        customer_id: row.get(3)?,
                        price_id: row.get(4)?,
                        status: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> CheckoutSession {
        CheckoutSession {
            session_id: id.to_string(),
            customer_email: "jo@example.com".into(),
            customer_name: Some("Jo Example".into()),
            customer_id: "cus_123".into(),
            price_id: "price_pro".into(),
            amount_total: 1900,
            status: "complete".into(),
        }
    }

    #[test]
    fn first_delivery_is_recorded() {
        let mut store = Store::open_in_memory().unwrap();
        let outcome = store.record_checkout(&session("cs_1")).unwrap();
        assert_eq!(outcome, CheckoutOutcome::Recorded);

        let user = store.get_user("jo@example.com").unwrap().unwrap();
        assert_eq!(user.full_name, "Jo Example");
        assert_eq!(user.status, "active");
        assert_eq!(user.price_id, "price_pro");
    }

    #[test]
    fn replay_is_ignored() {
        let mut store = Store::open_in_memory().unwrap();
        assert_eq!(
            store.record_checkout(&session("cs_1")).unwrap(),
            CheckoutOutcome::Recorded
        );
        assert_eq!(
            store.record_checkout(&session("cs_1")).unwrap(),
            CheckoutOutcome::AlreadyRecorded
        );

        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM payments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1, "replay must not duplicate the payment row");
    }

    #[test]
    fn distinct_sessions_both_record() {
        let mut store = Store::open_in_memory().unwrap();
        store.record_checkout(&session("cs_1")).unwrap();
        let outcome = store.record_checkout(&session("cs_2")).unwrap();
        assert_eq!(outcome, CheckoutOutcome::Recorded);
    }

    #[test]
    fn upsert_updates_plan_but_keeps_name_on_anonymous_replay() {
        let mut store = Store::open_in_memory().unwrap();
        store.record_checkout(&session("cs_1")).unwrap();

        let mut upgraded = session("cs_2");
        upgraded.customer_name = None;
        upgraded.price_id = "price_team".into();
        store.record_checkout(&upgraded).unwrap();

        let user = store.get_user("jo@example.com").unwrap().unwrap();
        assert_eq!(user.price_id, "price_team");
        assert_eq!(user.full_name, "Jo Example", "empty name must not clobber");
    }

    #[test]
    fn unknown_user_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_user("nobody@example.com").unwrap().is_none());
    }
}
