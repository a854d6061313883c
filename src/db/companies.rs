use super::*;

impl CrmDb {
    // =========================================================================
    // Companies
    // =========================================================================

    /// Insert a company and return its generated id.
    pub fn insert_company(&self, company: &NewCompany) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO companies (name, industry, city, country, website)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                company.name,
                company.industry,
                company.city,
                company.country,
                company.website,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All companies, newest first.
    pub fn list_companies(&self) -> Result<Vec<Company>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, industry, city, country, website, created_at
             FROM companies
             ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Company {
                id: row.get(0)?,
                name: row.get(1)?,
                industry: row.get(2)?,
                city: row.get(3)?,
                country: row.get(4)?,
                website: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        let mut companies = Vec::new();
        for row in rows {
            companies.push(row?);
        }
        Ok(companies)
    }

    /// Company picker entries, name ascending.
    pub fn company_options(&self) -> Result<Vec<EntityOption>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM companies ORDER BY name ASC")?;

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

    /// Look up a company id by exact name. Seed helper.
    pub fn company_id_by_name(&self, name: &str) -> Result<Option<i64>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM companies WHERE name = ?1")?;
        let mut rows = stmt.query_map(params![name], |row| row.get(0))?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn count_companies(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            industry: Some("Energy".to_string()),
            city: Some("Freiburg".to_string()),
            country: Some("DE".to_string()),
            website: Some("https://example.org".to_string()),
        }
    }

    #[test]
    fn test_insert_and_list_company() {
        let db = test_db();
        let id = db.insert_company(&sample_company("Helios Energie GmbH")).expect("insert");
        assert!(id > 0);

        let companies = db.list_companies().expect("list");
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].id, id);
        assert_eq!(companies[0].name, "Helios Energie GmbH");
        assert_eq!(companies[0].industry.as_deref(), Some("Energy"));
        assert!(!companies[0].created_at.is_empty());
    }

    #[test]
    fn test_duplicate_name_fails_and_leaves_table_unchanged() {
        let db = test_db();
        db.insert_company(&sample_company("Helios Energie GmbH")).expect("first insert");

        let err = db
            .insert_company(&sample_company("Helios Energie GmbH"))
            .unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));
        assert_eq!(db.count_companies().expect("count"), 1);
    }

    #[test]
    fn test_company_options_sorted_by_name() {
        let db = test_db();
        db.insert_company(&sample_company("Zephyr Bau")).expect("insert");
        db.insert_company(&sample_company("Anker Logistik")).expect("insert");

        let options = db.company_options().expect("options");
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Anker Logistik", "Zephyr Bau"]);
    }

    #[test]
    fn test_company_id_by_name() {
        let db = test_db();
        let id = db.insert_company(&sample_company("Helios Energie GmbH")).expect("insert");
        assert_eq!(
            db.company_id_by_name("Helios Energie GmbH").expect("lookup"),
            Some(id)
        );
        assert_eq!(db.company_id_by_name("Nobody").expect("lookup"), None);
    }
}
