//! Sample data for a fresh database.
//!
//! Each table group seeds only when its table is empty, so the settings
//! page can re-run this safely. Inserts within a group run inside one
//! transaction; a group that fails leaves nothing behind and a later
//! re-run converges.

use chrono::Utc;
use tracing::info;

use crate::db::{CrmDb, DbError, NewCompany, NewContact, NewDeal, Stage};

const SAMPLE_COMPANY_A: &str = "Helios Energie GmbH";
const SAMPLE_COMPANY_B: &str = "Nordpark Immobilien";

/// Insert illustrative rows into each empty table.
pub fn ensure_sample_data(db: &CrmDb) -> Result<(), DbError> {
    if db.count_companies()? == 0 {
        db.with_transaction(|db| {
            db.insert_company(&NewCompany {
                name: SAMPLE_COMPANY_A.to_string(),
                industry: Some("Energy".to_string()),
                city: Some("Freiburg".to_string()),
                country: Some("DE".to_string()),
                website: Some("https://helios-energie.example".to_string()),
            })?;
            db.insert_company(&NewCompany {
                name: SAMPLE_COMPANY_B.to_string(),
                industry: Some("Real Estate".to_string()),
                city: Some("Leipzig".to_string()),
                country: Some("DE".to_string()),
                website: Some("https://nordpark.example".to_string()),
            })?;
            Ok(())
        })?;
        info!("seeded sample companies");
    }

    if db.count_contacts()? == 0 {
        let company_a = db.company_id_by_name(SAMPLE_COMPANY_A)?;
        let company_b = db.company_id_by_name(SAMPLE_COMPANY_B)?;
        db.with_transaction(|db| {
            db.insert_contact(&NewContact {
                first_name: Some("Maren".to_string()),
                last_name: Some("Vogt".to_string()),
                email: Some("maren.vogt@example.com".to_string()),
                phone: Some("+49 761 20941".to_string()),
                role: Some("Project lead".to_string()),
                company_id: company_a,
            })?;
            db.insert_contact(&NewContact {
                first_name: Some("Jonas".to_string()),
                last_name: Some("Brandt".to_string()),
                email: Some("jonas.brandt@example.com".to_string()),
                phone: Some("+49 341 88217".to_string()),
                role: Some("Engineering".to_string()),
                company_id: company_b,
            })?;
            Ok(())
        })?;
        info!("seeded sample contacts");
    }

    if db.count_deals()? == 0 {
        let company_id = db.company_id_by_name(SAMPLE_COMPANY_A)?;
        db.with_transaction(|db| {
            db.insert_deal(&NewDeal {
                name: "Rooftop PV + storage".to_string(),
                company_id,
                contact_id: None,
                amount: 180_000.0,
                stage: Stage::Qualified,
                probability: 30,
                expected_close: Some(Utc::now().date_naive().to_string()),
            })?;
            Ok(())
        })?;
        info!("seeded sample deal");
    }

    Ok(())
}
