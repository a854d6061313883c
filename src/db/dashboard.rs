use super::*;

impl CrmDb {
    // =========================================================================
    // Dashboard aggregation
    // =========================================================================

    /// Sum of deal amounts per stage, in pipeline order.
    /// Stages without deals are absent from the result (no zero-fill).
    pub fn pipeline_by_stage(&self) -> Result<Vec<StageTotal>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT stage, SUM(amount) FROM deals GROUP BY stage")?;

        let rows = stmt.query_map([], |row| {
            Ok(StageTotal {
                stage: parse_enum_col(0, row.get::<_, String>(0)?)?,
                total: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            })
        })?;

        let mut totals = Vec::new();
        for row in rows {
            totals.push(row?);
        }
        totals.sort_by_key(|t| t.stage as u8);
        Ok(totals)
    }

    /// Deal count plus open and won sums.
    ///
    /// Open excludes the terminal stages (Won, Lost); the won figure is an
    /// all-time total, deliberately unwindowed.
    pub fn deal_totals(&self) -> Result<DealTotals, DbError> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN stage NOT IN ('Won', 'Lost') THEN amount END), 0),
                    COALESCE(SUM(CASE WHEN stage = 'Won' THEN amount END), 0)
             FROM deals",
            [],
            |row| {
                Ok(DealTotals {
                    deal_count: row.get(0)?,
                    open_total: row.get(1)?,
                    won_total: row.get(2)?,
                })
            },
        )?)
    }

    /// The next due open activities: not done, due date present, earliest
    /// first. Ties on due_date break by id so output is deterministic.
    pub fn upcoming_activities(&self, limit: u32) -> Result<Vec<UpcomingActivity>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, activity_type, title, due_date
             FROM activities
             WHERE done = 0 AND due_date IS NOT NULL
             ORDER BY due_date ASC, id ASC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok(UpcomingActivity {
                id: row.get(0)?,
                kind: parse_enum_col(1, row.get::<_, String>(1)?)?,
                title: row.get(2)?,
                due_date: row.get(3)?,
            })
        })?;

        let mut upcoming = Vec::new();
        for row in rows {
            upcoming.push(row?);
        }
        Ok(upcoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(stage: Stage, amount: f64) -> NewDeal {
        NewDeal {
            name: format!("{} deal", stage.as_str()),
            company_id: None,
            contact_id: None,
            amount,
            stage,
            probability: 10,
            expected_close: None,
        }
    }

    fn activity(title: &str, due_date: Option<&str>, done: bool) -> NewActivity {
        NewActivity {
            deal_id: None,
            contact_id: None,
            company_id: None,
            kind: ActivityKind::Task,
            title: title.to_string(),
            description: None,
            due_date: due_date.map(String::from),
            done,
        }
    }

    #[test]
    fn test_pipeline_by_stage_sums_and_omits_empty_stages() {
        let db = test_db();
        db.insert_deal(&deal(Stage::Qualified, 100.0)).expect("insert");
        db.insert_deal(&deal(Stage::Qualified, 50.0)).expect("insert");
        db.insert_deal(&deal(Stage::Won, 200.0)).expect("insert");

        let totals = db.pipeline_by_stage().expect("aggregate");
        assert_eq!(totals.len(), 2, "stages with no deals must be absent");
        assert_eq!(totals[0].stage, Stage::Qualified);
        assert_eq!(totals[0].total, 150.0);
        assert_eq!(totals[1].stage, Stage::Won);
        assert_eq!(totals[1].total, 200.0);
    }

    #[test]
    fn test_pipeline_by_stage_empty_when_no_deals() {
        let db = test_db();
        assert!(db.pipeline_by_stage().expect("aggregate").is_empty());
    }

    #[test]
    fn test_deal_totals_open_excludes_won_and_lost() {
        let db = test_db();
        db.insert_deal(&deal(Stage::Qualified, 100.0)).expect("insert");
        db.insert_deal(&deal(Stage::Qualified, 50.0)).expect("insert");
        db.insert_deal(&deal(Stage::Won, 200.0)).expect("insert");
        db.insert_deal(&deal(Stage::Lost, 75.0)).expect("insert");

        let totals = db.deal_totals().expect("totals");
        assert_eq!(totals.deal_count, 4);
        assert_eq!(totals.open_total, 150.0);
        assert_eq!(totals.won_total, 200.0);
    }

    #[test]
    fn test_deal_totals_on_empty_table() {
        let db = test_db();
        let totals = db.deal_totals().expect("totals");
        assert_eq!(totals.deal_count, 0);
        assert_eq!(totals.open_total, 0.0);
        assert_eq!(totals.won_total, 0.0);
    }

    #[test]
    fn test_upcoming_returns_ten_earliest_of_twelve() {
        let db = test_db();
        // Insert out of order so the sort is doing the work.
        for day in [7, 3, 11, 1, 9, 5, 12, 2, 10, 4, 8, 6] {
            let due = format!("2026-09-{day:02}");
            db.insert_activity(&activity(&format!("task {day}"), Some(&due), false))
                .expect("insert");
        }

        let upcoming = db.upcoming_activities(10).expect("query");
        assert_eq!(upcoming.len(), 10);
        let dues: Vec<&str> = upcoming.iter().map(|a| a.due_date.as_str()).collect();
        let expected: Vec<String> = (1..=10).map(|d| format!("2026-09-{d:02}")).collect();
        assert_eq!(dues, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_upcoming_excludes_done_and_undated() {
        let db = test_db();
        db.insert_activity(&activity("done early", Some("2026-01-01"), true))
            .expect("insert");
        db.insert_activity(&activity("no date", None, false))
            .expect("insert");
        db.insert_activity(&activity("open", Some("2026-09-15"), false))
            .expect("insert");

        let upcoming = db.upcoming_activities(10).expect("query");
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "open");
    }

    #[test]
    fn test_upcoming_ties_break_by_id() {
        let db = test_db();
        let first = db
            .insert_activity(&activity("first", Some("2026-09-01"), false))
            .expect("insert");
        let second = db
            .insert_activity(&activity("second", Some("2026-09-01"), false))
            .expect("insert");

        let upcoming = db.upcoming_activities(10).expect("query");
        assert_eq!(upcoming[0].id, first);
        assert_eq!(upcoming[1].id, second);
    }
}
