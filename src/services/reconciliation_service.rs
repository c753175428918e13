//! Maps contact records pushed by the sibling CRM onto local contacts.
//!
//! Matching is deliberately fuzzy. The order of the strategies below decides
//! which local record gets merged, so it must not be reordered or tightened.

use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{info, warn};

use crate::dto::webhook_dto::InboundContact;
use crate::error::Result;
use crate::models::contact::Contact;

/// Brand row with its owner's name, as seen by the brand matcher.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BrandCandidate {
    pub id: i64,
    pub name: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMatch {
    LocalId,
    Email,
    FullName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandMatch {
    BrandName,
    CompanyName,
    CleanedCompanyName,
    FirstToken,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationOutcome {
    pub contact_id: Option<i64>,
    pub matched_by: Option<ContactMatch>,
    pub brand_ids: Vec<i64>,
    pub unmatched_labels: Vec<String>,
}

impl ReconciliationOutcome {
    pub fn matched(&self) -> bool {
        self.contact_id.is_some()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Strips the legal-form noise the sibling CRM leaves in advertiser labels:
/// commas and the literal substrings `UAB` and `LT`.
pub fn clean_company_label(label: &str) -> String {
    label
        .replace(',', "")
        .replace("UAB", "")
        .replace("LT", "")
        .trim()
        .to_string()
}

/// First hit wins, in this order:
/// a. label is a case-insensitive substring of a brand name
/// b. label equals the owning company's name exactly
/// c. cleaned label is a case-insensitive substring of a company name
/// d. label's first word is a case-insensitive substring of a brand name
///
/// Ties resolve to the earliest candidate in `brands`. An empty label, or one
/// that is empty once cleaned, hits the first candidate.
pub fn match_brand<'a>(
    label: &str,
    brands: &'a [BrandCandidate],
) -> Option<(&'a BrandCandidate, BrandMatch)> {
    if let Some(b) = brands.iter().find(|b| contains_ci(&b.name, label)) {
        return Some((b, BrandMatch::BrandName));
    }

    if let Some(b) = brands.iter().find(|b| b.company_name == label) {
        return Some((b, BrandMatch::CompanyName));
    }

    let cleaned = clean_company_label(label);
    if let Some(b) = brands.iter().find(|b| contains_ci(&b.company_name, &cleaned)) {
        return Some((b, BrandMatch::CleanedCompanyName));
    }

    let first_token = label.split_whitespace().next()?;
    brands
        .iter()
        .find(|b| contains_ci(&b.name, first_token))
        .map(|b| (b, BrandMatch::FirstToken))
}

#[derive(Clone)]
pub struct ReconciliationService {
    pool: PgPool,
}

impl ReconciliationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Merges `incoming` into at most one existing contact. Never creates one.
    pub async fn reconcile_contact(&self, incoming: &InboundContact) -> Result<ReconciliationOutcome> {
        let mut tx = self.pool.begin().await?;

        let Some((contact, matched_by)) = find_contact(&mut *tx, incoming).await? else {
            info!(
                id = ?incoming.id,
                email = ?incoming.email(),
                first_name = ?incoming.first_name(),
                last_name = ?incoming.last_name(),
                "no local contact matched inbound update; nothing changed"
            );
            return Ok(ReconciliationOutcome::default());
        };
        info!(contact_id = contact.id, matched_by = ?matched_by, "matched inbound contact");

        let mut email = incoming.email();
        if let Some(taken) = email {
            if email_taken_by_other(&mut *tx, taken, contact.id).await? {
                warn!(
                    contact_id = contact.id,
                    email = taken,
                    "incoming email belongs to another contact; keeping stored email"
                );
                email = None;
            }
        }

        sqlx::query(
            r#"
            UPDATE client_contacts
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                linkedin_url = COALESCE($6, linkedin_url),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(contact.id)
        .bind(incoming.first_name())
        .bind(incoming.last_name())
        .bind(email)
        .bind(incoming.phone())
        .bind(incoming.linkedin_url())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM contact_brands WHERE contact_id = $1")
            .bind(contact.id)
            .execute(&mut *tx)
            .await?;

        let candidates = sqlx::query_as::<_, BrandCandidate>(
            r#"
            SELECT b.id, b.name, c.name AS company_name
            FROM brands b
            JOIN companies c ON c.id = b.company_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut outcome = ReconciliationOutcome {
            contact_id: Some(contact.id),
            matched_by: Some(matched_by),
            ..Default::default()
        };

        for label in incoming.brand_labels() {
            match match_brand(label, &candidates) {
                Some((brand, how)) => {
                    info!(contact_id = contact.id, label, brand_id = brand.id, strategy = ?how, "brand label matched");
                    sqlx::query(
                        "INSERT INTO contact_brands (contact_id, brand_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                    )
                    .bind(contact.id)
                    .bind(brand.id)
                    .execute(&mut *tx)
                    .await?;
                    if !outcome.brand_ids.contains(&brand.id) {
                        outcome.brand_ids.push(brand.id);
                    }
                }
                None => {
                    warn!(contact_id = contact.id, label, "brand label matched nothing; dropped");
                    outcome.unmatched_labels.push(label.to_string());
                }
            }
        }

        tx.commit().await?;
        Ok(outcome)
    }
}

async fn email_taken_by_other(conn: &mut PgConnection, email: &str, contact_id: i64) -> Result<bool> {
    let holder = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM client_contacts WHERE email = $1 AND id <> $2 LIMIT 1",
    )
    .bind(email)
    .bind(contact_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(holder.is_some())
}

async fn find_contact(
    conn: &mut PgConnection,
    incoming: &InboundContact,
) -> Result<Option<(Contact, ContactMatch)>> {
    if let Some(id) = incoming.local_id() {
        let found = sqlx::query_as::<_, Contact>("SELECT * FROM client_contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(c) = found {
            return Ok(Some((c, ContactMatch::LocalId)));
        }
    }

    if let Some(email) = incoming.email() {
        let found = sqlx::query_as::<_, Contact>(
            "SELECT * FROM client_contacts WHERE email = $1 ORDER BY id LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some(c) = found {
            return Ok(Some((c, ContactMatch::Email)));
        }
    }

    if let (Some(first), Some(last)) = (incoming.first_name(), incoming.last_name()) {
        let found = sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM client_contacts
            WHERE first_name = $1 AND last_name = $2
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(first)
        .bind(last)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some(c) = found {
            return Ok(Some((c, ContactMatch::FullName)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, name: &str, company: &str) -> BrandCandidate {
        BrandCandidate {
            id,
            name: name.to_string(),
            company_name: company.to_string(),
        }
    }

    fn catalog() -> Vec<BrandCandidate> {
        vec![
            candidate(1, "Fizz Cola", "Beverages Group"),
            candidate(2, "Acme Rockets", "Acme"),
            candidate(3, "Road Runner Seeds", "Acme"),
            candidate(4, "Nordic Bank Premium", "Nordic Finance"),
        ]
    }

    #[test]
    fn brand_name_substring_wins_first() {
        let brands = catalog();
        let (b, how) = match_brand("fizz", &brands).unwrap();
        assert_eq!((b.id, how), (1, BrandMatch::BrandName));
    }

    #[test]
    fn exact_company_name_is_second() {
        let brands = catalog();
        let (b, how) = match_brand("Nordic Finance", &brands).unwrap();
        assert_eq!((b.id, how), (4, BrandMatch::CompanyName));
    }

    #[test]
    fn legal_form_noise_is_stripped_for_company_match() {
        let brands = vec![candidate(10, "Rockets", "Acme"), candidate(11, "Other", "Other Co")];
        let (b, how) = match_brand("UAB Acme, LT", &brands).unwrap();
        assert_eq!((b.id, how), (10, BrandMatch::CleanedCompanyName));
        assert_eq!(clean_company_label("UAB Acme, LT"), "Acme");
    }

    #[test]
    fn first_token_is_last_resort() {
        let brands = catalog();
        let (b, how) = match_brand("Nordic Ventures Ltd", &brands).unwrap();
        assert_eq!((b.id, how), (4, BrandMatch::FirstToken));
    }

    #[test]
    fn ties_resolve_to_store_order() {
        let brands = catalog();
        let (b, how) = match_brand("Acme", &brands).unwrap();
        assert_eq!((b.id, how), (2, BrandMatch::BrandName));
        let same_company = vec![candidate(3, "Seeds", "Acme"), candidate(2, "Rockets", "Acme")];
        let (b, _) = match_brand("UAB Acme", &same_company).unwrap();
        assert_eq!(b.id, 3);
    }

    #[test]
    fn unrelated_labels_yield_none() {
        let brands = catalog();
        assert!(match_brand("Zeta Unknown", &brands).is_none());
        assert!(match_brand("anything", &[]).is_none());
    }

    #[test]
    fn blank_labels_hit_the_first_brand() {
        let brands = vec![candidate(1, "Fizz", "Acme"), candidate(2, "Buzz", "Other")];
        let (b, how) = match_brand("", &brands).unwrap();
        assert_eq!((b.id, how), (1, BrandMatch::BrandName));
    }

    #[test]
    fn label_that_cleans_to_nothing_hits_the_first_company() {
        let brands = vec![candidate(1, "Qq", "Zz"), candidate(2, "Ww", "Yy")];
        let (b, how) = match_brand("UAB, LT", &brands).unwrap();
        assert_eq!((b.id, how), (1, BrandMatch::CleanedCompanyName));
    }
}
