use super::*;

impl CrmDb {
    // =========================================================================
    // Deals
    // =========================================================================

    /// Insert a deal and return its generated id.
    pub fn insert_deal(&self, deal: &NewDeal) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO deals (name, company_id, contact_id, amount, stage, probability, expected_close)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                deal.name,
                deal.company_id,
                deal.contact_id,
                deal.amount,
                deal.stage.as_str(),
                deal.probability,
                deal.expected_close,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All deals with company and contact names, newest first.
    pub fn list_deals(&self) -> Result<Vec<DealRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.name, co.name, c.first_name || ' ' || c.last_name,
                    d.amount, d.stage, d.probability, d.expected_close, d.created_at
             FROM deals d
             LEFT JOIN companies co ON d.company_id = co.id
             LEFT JOIN contacts c ON d.contact_id = c.id
             ORDER BY d.created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DealRow {
                id: row.get(0)?,
                name: row.get(1)?,
                company: row.get(2)?,
                contact: row.get(3)?,
                amount: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                stage: parse_enum_col(5, row.get::<_, String>(5)?)?,
                probability: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
                expected_close: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?;

        let mut deals = Vec::new();
        for row in rows {
            deals.push(row?);
        }
        Ok(deals)
    }

    /// Deal picker entries, newest first.
    pub fn deal_options(&self) -> Result<Vec<EntityOption>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM deals ORDER BY created_at DESC")?;

        let rows = stmt.query_map([], |row| {
            Ok(EntityOption {
                id: row.get(0)?,
                label: row.get(1)?,
            })
        })?;

        let mut options = Vec::new();
        for row in rows {
            options.push(row?);
        }
        Ok(options)
    }

    pub fn count_deals(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM deals", [], |row| row.get(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deal(name: &str, stage: Stage, amount: f64) -> NewDeal {
        NewDeal {
            name: name.to_string(),
            company_id: None,
            contact_id: None,
            amount,
            stage,
            probability: 30,
            expected_close: Some("2026-10-01".to_string()),
        }
    }

    #[test]
    fn test_insert_and_list_deal() {
        let db = test_db();
        let id = db
            .insert_deal(&sample_deal("Rooftop PV", Stage::Qualified, 180_000.0))
            .expect("insert");
        assert!(id > 0);

        let deals = db.list_deals().expect("list");
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].name, "Rooftop PV");
        assert_eq!(deals[0].stage, Stage::Qualified);
        assert_eq!(deals[0].amount, 180_000.0);
        assert_eq!(deals[0].probability, 30);
        assert_eq!(deals[0].company, None);
    }

    #[test]
    fn test_every_stage_is_accepted() {
        let db = test_db();
        for stage in Stage::ALL {
            db.insert_deal(&sample_deal(stage.as_str(), stage, 100.0))
                .expect("insert");
        }
        assert_eq!(db.count_deals().expect("count"), 5);
    }

    #[test]
    fn test_stage_outside_enumerated_set_is_rejected() {
        let db = test_db();
        // The closed enum makes this unrepresentable through the typed path;
        // the CHECK constraint backstops raw inserts.
        let err = db
            .conn_ref()
            .execute(
                "INSERT INTO deals (name, stage) VALUES ('Bogus deal', 'Negotiation')",
                [],
            )
            .unwrap_err();
        assert!(err.to_string().contains("CHECK"));
        assert_eq!(db.count_deals().expect("count"), 0);
    }

    #[test]
    fn test_deal_joins_company_and_contact_names() {
        let db = test_db();
        let company_id = db
            .insert_company(&NewCompany {
                name: "Helios Energie GmbH".to_string(),
                industry: None,
                city: None,
                country: None,
                website: None,
            })
            .expect("company");
        let contact_id = db
            .insert_contact(&NewContact {
                first_name: Some("Maren".to_string()),
                last_name: Some("Vogt".to_string()),
                email: None,
                phone: None,
                role: None,
                company_id: Some(company_id),
            })
            .expect("contact");

        let mut deal = sample_deal("Rooftop PV", Stage::Proposal, 90_000.0);
        deal.company_id = Some(company_id);
        deal.contact_id = Some(contact_id);
        db.insert_deal(&deal).expect("deal");

        let deals = db.list_deals().expect("list");
        assert_eq!(deals[0].company.as_deref(), Some("Helios Energie GmbH"));
        assert_eq!(deals[0].contact.as_deref(), Some("Maren Vogt"));
    }

    #[test]
    fn test_deleting_company_nulls_deal_reference() {
        let db = test_db();
        let company_id = db
            .insert_company(&NewCompany {
                name: "Helios Energie GmbH".to_string(),
                industry: None,
                city: None,
                country: None,
                website: None,
            })
            .expect("company");
        let mut deal = sample_deal("Rooftop PV", Stage::New, 10_000.0);
        deal.company_id = Some(company_id);
        db.insert_deal(&deal).expect("deal");

        db.conn_ref()
            .execute("DELETE FROM companies WHERE id = ?1", params![company_id])
            .expect("delete company");

        let deals = db.list_deals().expect("list");
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].company, None);
    }
}
