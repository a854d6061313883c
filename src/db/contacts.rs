use super::*;

impl CrmDb {
    // =========================================================================
    // Contacts
    // =========================================================================

    /// Insert a contact and return its generated id.
    pub fn insert_contact(&self, contact: &NewContact) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO contacts (first_name, last_name, email, phone, role, company_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                contact.first_name,
                contact.last_name,
                contact.email,
                contact.phone,
                contact.role,
                contact.company_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All contacts with their company name, newest first.
    pub fn list_contacts(&self) -> Result<Vec<ContactRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.first_name, c.last_name, c.email, c.phone, c.role,
                    co.name, c.created_at
             FROM contacts c
             LEFT JOIN companies co ON c.company_id = co.id
             ORDER BY c.created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ContactRow {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                email: row.get(3)?,
                phone: row.get(4)?,
                role: row.get(5)?,
                company: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row?);
        }
        Ok(contacts)
    }

    /// Contact picker entries ("First Last"), name ascending.
    pub fn contact_options(&self) -> Result<Vec<EntityOption>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, first_name || ' ' || last_name AS name
             FROM contacts
             ORDER BY name ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(EntityOption {
                id: row.get(0)?,
                label: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?;

        let mut options = Vec::new();
        for row in rows {
            options.push(row?);
        }
        Ok(options)
    }

    pub fn count_contacts(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?)
    }
}
