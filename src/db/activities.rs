use super::*;

impl CrmDb {
    // =========================================================================
    // Activities
    // =========================================================================

    /// Insert an activity and return its generated id.
    pub fn insert_activity(&self, activity: &NewActivity) -> Result<i64, DbError> {
        self.conn.execute(
            "INSERT INTO activities (deal_id, contact_id, company_id, activity_type,
                                     title, description, due_date, done)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                activity.deal_id,
                activity.contact_id,
                activity.company_id,
                activity.kind.as_str(),
                activity.title,
                activity.description,
                activity.due_date,
                activity.done as i32,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All activities with their association names, newest first.
    pub fn list_activities(&self) -> Result<Vec<ActivityRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.activity_type, a.title, a.description, a.due_date, a.done,
                    co.name, d.name, c.first_name || ' ' || c.last_name, a.created_at
             FROM activities a
             LEFT JOIN companies co ON a.company_id = co.id
             LEFT JOIN deals d ON a.deal_id = d.id
             LEFT JOIN contacts c ON a.contact_id = c.id
             ORDER BY a.created_at DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ActivityRow {
                id: row.get(0)?,
                kind: parse_enum_col(1, row.get::<_, String>(1)?)?,
                title: row.get(2)?,
                description: row.get(3)?,
                due_date: row.get(4)?,
                done: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
                company: row.get(6)?,
                deal: row.get(7)?,
                contact: row.get(8)?,
                created_at: row.get(9)?,
            })
        })?;

        let mut activities = Vec::new();
        for row in rows {
            activities.push(row?);
        }
        Ok(activities)
    }
}
