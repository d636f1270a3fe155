//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rusqlite::params;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn add(db: &Database, title: &str, category: &str, amount: f64, when: DateTime<Utc>) -> Expense {
        db.insert_expense(&NewExpense::new(title, category, amount, when))
            .unwrap()
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_expenses().unwrap().is_empty());
        assert_eq!(db.count_expenses().unwrap(), 0);
    }

    #[test]
    fn test_expenses_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'title', 'category', 'amount', 'incurred_on', 'notes', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 7, "expenses table should have 7 expected columns");
    }

    #[test]
    fn test_insert_and_get_expense() {
        let db = Database::in_memory().unwrap();

        let stored = db
            .insert_expense(
                &NewExpense::new("Groceries", "Food", 54.2, at(2024, 1, 6, 10))
                    .with_notes("weekly shop"),
            )
            .unwrap();

        assert!(stored.id > 0);
        assert_eq!(stored.title, "Groceries");
        assert_eq!(stored.category, "Food");
        assert_eq!(stored.amount, 54.2);
        assert_eq!(stored.incurred_on, at(2024, 1, 6, 10));
        assert_eq!(stored.notes, "weekly shop");

        let fetched = db.get_expense(stored.id).unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[test]
    fn test_insert_defaults_notes_to_empty() {
        let db = Database::in_memory().unwrap();
        let stored = add(&db, "Bus", "Transport", 2.75, at(2024, 1, 2, 8));
        assert_eq!(stored.notes, "");
    }

    #[test]
    fn test_insert_sets_created_at() {
        let db = Database::in_memory().unwrap();
        let before = Utc::now() - chrono::Duration::seconds(1);
        let stored = add(&db, "Bus", "Transport", 2.75, at(2020, 1, 2, 8));
        assert!(stored.created_at >= before);
        assert_ne!(stored.created_at, stored.incurred_on);
    }

    #[test]
    fn test_insert_rejects_missing_fields() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_expense(&NewExpense::new("", "Food", 1.0, at(2024, 1, 1, 0)));
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert_eq!(db.count_expenses().unwrap(), 0);
    }

    #[test]
    fn test_get_expense_not_found() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_expense(999).unwrap().is_none());
    }

    #[test]
    fn test_list_orders_by_incurred_desc() {
        let db = Database::in_memory().unwrap();
        add(&db, "Old", "Misc", 1.0, at(2024, 1, 1, 0));
        add(&db, "New", "Misc", 1.0, at(2024, 3, 1, 0));
        add(&db, "Mid", "Misc", 1.0, at(2024, 2, 1, 0));

        let titles: Vec<String> = db
            .list_expenses()
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[test]
    fn test_search_expenses_by_category_and_text() {
        let db = Database::in_memory().unwrap();
        add(&db, "Coffee", "Food", 4.0, at(2024, 1, 1, 9));
        add(&db, "Coffee beans", "Groceries", 12.0, at(2024, 1, 2, 9));
        add(&db, "Train", "Transport", 30.0, at(2024, 1, 3, 9));

        let food = db
            .search_expenses(&ExpenseFilter::new().category(Some("food")))
            .unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].title, "Coffee");

        let coffee = db
            .search_expenses(&ExpenseFilter::new().search(Some("coffee")))
            .unwrap();
        assert_eq!(coffee.len(), 2);
    }

    #[test]
    fn test_search_expenses_by_date_range_is_inclusive() {
        let db = Database::in_memory().unwrap();
        add(&db, "A", "Misc", 1.0, at(2024, 1, 1, 23));
        add(&db, "B", "Misc", 1.0, at(2024, 1, 15, 0));
        add(&db, "C", "Misc", 1.0, at(2024, 1, 31, 23));
        add(&db, "D", "Misc", 1.0, at(2024, 2, 1, 0));

        let january = db
            .search_expenses(
                &ExpenseFilter::new()
                    .from(NaiveDate::from_ymd_opt(2024, 1, 1))
                    .to(NaiveDate::from_ymd_opt(2024, 1, 31)),
            )
            .unwrap();
        let titles: Vec<&str> = january.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_update_expense_partial() {
        let db = Database::in_memory().unwrap();
        let stored = add(&db, "Dinner", "Food", 40.0, at(2024, 1, 5, 19));

        let updated = db
            .update_expense(
                stored.id,
                &ExpenseUpdate {
                    amount: Some(45.5),
                    notes: Some("with tip".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.amount, 45.5);
        assert_eq!(updated.notes, "with tip");
        assert_eq!(updated.title, "Dinner");
        assert_eq!(updated.category, "Food");
        assert_eq!(updated.incurred_on, stored.incurred_on);
        assert_eq!(updated.created_at, stored.created_at);
    }

    #[test]
    fn test_update_expense_full() {
        let db = Database::in_memory().unwrap();
        let stored = add(&db, "Dinner", "Food", 40.0, at(2024, 1, 5, 19));

        let updated = db
            .update_expense(
                stored.id,
                &ExpenseUpdate {
                    title: Some("Lunch".to_string()),
                    category: Some("Work".to_string()),
                    amount: Some(15.0),
                    incurred_on: Some(at(2024, 1, 8, 12)),
                    notes: Some(String::new()),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Lunch");
        assert_eq!(updated.category, "Work");
        assert_eq!(updated.incurred_on, at(2024, 1, 8, 12));
        assert_eq!(updated.created_at, stored.created_at);
    }

    #[test]
    fn test_update_expense_not_found() {
        let db = Database::in_memory().unwrap();
        let result = db
            .update_expense(
                42,
                &ExpenseUpdate {
                    amount: Some(1.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_expense_validates() {
        let db = Database::in_memory().unwrap();
        let stored = add(&db, "Dinner", "Food", 40.0, at(2024, 1, 5, 19));

        let result = db.update_expense(
            stored.id,
            &ExpenseUpdate {
                category: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let unchanged = db.get_expense(stored.id).unwrap().unwrap();
        assert_eq!(unchanged.category, "Food");
    }

    #[test]
    fn test_empty_update_returns_current_record() {
        let db = Database::in_memory().unwrap();
        let stored = add(&db, "Dinner", "Food", 40.0, at(2024, 1, 5, 19));
        let same = db
            .update_expense(stored.id, &ExpenseUpdate::default())
            .unwrap()
            .unwrap();
        assert_eq!(same, stored);
    }

    #[test]
    fn test_delete_expense() {
        let db = Database::in_memory().unwrap();
        let stored = add(&db, "Movie", "Fun", 12.0, at(2024, 1, 5, 20));

        let deleted = db.delete_expense(stored.id).unwrap().unwrap();
        assert_eq!(deleted, stored);
        assert!(db.get_expense(stored.id).unwrap().is_none());

        // Second delete finds nothing
        assert!(db.delete_expense(stored.id).unwrap().is_none());
    }

    #[test]
    fn test_spending_by_day() {
        let db = Database::in_memory().unwrap();
        add(&db, "Late", "Food", 10.0, at(2024, 1, 6, 22));
        add(&db, "Early", "Food", 5.0, at(2024, 1, 6, 7));
        add(&db, "Earlier day", "Fun", 20.0, at(2024, 1, 5, 12));

        let days = db.spending_by_day().unwrap();
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].date, "2024-01-05");
        assert_eq!(days[0].total, 20.0);
        assert_eq!(days[0].entries.len(), 1);

        assert_eq!(days[1].date, "2024-01-06");
        assert_eq!(days[1].total, 15.0);
        let titles: Vec<&str> = days[1].entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }

    #[test]
    fn test_spending_by_category() {
        let db = Database::in_memory().unwrap();
        add(&db, "A", "Food", 10.0, at(2024, 1, 1, 0));
        add(&db, "B", "Food", 2.5, at(2024, 1, 2, 0));
        add(&db, "C", "Rent", 900.0, at(2024, 1, 3, 0));

        let totals = db.spending_by_category().unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Food"], 12.5);
        assert_eq!(totals["Rent"], 900.0);
    }

    #[test]
    fn test_spending_by_category_empty() {
        let db = Database::in_memory().unwrap();
        assert!(db.spending_by_category().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_incurred_on_is_skipped() {
        let db = Database::in_memory().unwrap();
        add(&db, "Good", "Food", 10.0, at(2024, 1, 6, 12));

        {
            let conn = db.conn().unwrap();
            conn.execute(
                "INSERT INTO expenses (title, category, amount, incurred_on) VALUES (?1, ?2, ?3, ?4)",
                params!["Bad", "Food", 99.0, "not a date"],
            )
            .unwrap();
        }

        assert_eq!(db.count_expenses().unwrap(), 2);

        let listed = db.list_expenses().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Good");

        let history = db.forecast_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].amount, 10.0);

        let days = db.spending_by_day().unwrap();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_forecast_history_matches_store() {
        let db = Database::in_memory().unwrap();
        add(&db, "Sat 1", "Food", 100.0, at(2024, 1, 6, 12));
        add(&db, "Sat 2", "Food", 50.0, at(2024, 1, 13, 12));

        let history = db.forecast_history().unwrap();
        let averages = crate::forecast::weekday_averages(&history);
        assert_eq!(averages[6], 75.0);
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();
        db.log_audit("cli", "create", Some("expense"), Some(1), Some("title=A"))
            .unwrap();
        db.log_audit("api", "list", Some("expense"), None, None)
            .unwrap();

        let entries = db.list_audit_log(10).unwrap();
        assert_eq!(entries.len(), 2);
        // Same-second timestamps fall back to id ordering
        assert_eq!(entries[0].action, "list");
        assert_eq!(entries[1].actor, "cli");
        assert_eq!(entries[1].entity_id, Some(1));

        assert_eq!(db.list_audit_log(1).unwrap().len(), 1);
    }

    #[test]
    fn test_insert_expenses_batch() {
        let db = Database::in_memory().unwrap();
        let batch = vec![
            NewExpense::new("Market", "Food", 100.0, at(2024, 1, 6, 9)),
            NewExpense::new(" Cinema ", "Fun", 50.0, at(2024, 1, 13, 18)).with_notes("popcorn"),
        ];

        assert_eq!(db.insert_expenses(&batch).unwrap(), 2);

        let stored = db.list_expenses().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].title, "Cinema");
        assert_eq!(stored[0].notes, "popcorn");
        assert_eq!(db.insert_expenses(&[]).unwrap(), 0);
    }

    #[test]
    fn test_insert_expenses_is_all_or_nothing() {
        let db = Database::in_memory().unwrap();
        let batch = vec![
            NewExpense::new("Market", "Food", 100.0, at(2024, 1, 6, 9)),
            NewExpense::new("", "Food", 5.0, at(2024, 1, 7, 9)),
        ];

        let result = db.insert_expenses(&batch);
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert_eq!(db.count_expenses().unwrap(), 0);
    }

    #[test]
    fn test_insert_expenses_rolls_back_on_store_failure() {
        let db = Database::in_memory().unwrap();
        // Reject the second row at the storage layer, after validation passed
        db.conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_refund BEFORE INSERT ON expenses \
                 WHEN NEW.title = 'Refund' BEGIN SELECT RAISE(ABORT, 'refund rejected'); END;",
            )
            .unwrap();

        let batch = vec![
            NewExpense::new("Market", "Food", 100.0, at(2024, 1, 6, 9)),
            NewExpense::new("Refund", "Food", -5.0, at(2024, 1, 7, 9)),
        ];

        assert!(matches!(
            db.insert_expenses(&batch),
            Err(Error::Database(_))
        ));
        assert_eq!(db.count_expenses().unwrap(), 0);
    }

    #[test]
    fn test_in_memory_scratch_removed_on_drop() {
        let db = Database::in_memory().unwrap();
        let path = std::path::PathBuf::from(db.path());
        let dir = path.parent().unwrap().to_path_buf();
        add(&db, "Lunch", "Food", 12.0, at(2024, 1, 8, 12));
        assert!(path.exists());

        // Clones share the scratch directory
        let copy = db.clone();
        drop(db);
        assert!(dir.exists());
        assert_eq!(copy.count_expenses().unwrap(), 1);

        drop(copy);
        assert!(!dir.exists());
    }

    #[test]
    fn test_unencrypted_database_reports_plaintext() {
        let db = Database::in_memory().unwrap();
        assert!(!db.is_encrypted().unwrap());
    }

    #[test]
    fn test_encrypted_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("encrypted.db");
        let path = path.to_str().unwrap();

        // Create an encrypted database
        {
            let db = Database::new_with_key(path, Some("test-passphrase")).unwrap();
            assert!(db.is_encrypted().unwrap());
            add(&db, "Lunch", "Food", 12.0, at(2024, 1, 8, 12));
            assert_eq!(db.count_expenses().unwrap(), 1);
        }

        // Reopen with the same key
        {
            let db = Database::new_with_key(path, Some("test-passphrase")).unwrap();
            let expenses = db.list_expenses().unwrap();
            assert_eq!(expenses.len(), 1);
            assert_eq!(expenses[0].title, "Lunch");
        }

        // Opening without a key fails (file is actually encrypted)
        {
            let result = Database::new_with_key(path, None);
            assert!(
                result.is_err(),
                "Should fail to open encrypted db without key"
            );
        }

        // Opening with the wrong key fails
        {
            let result = Database::new_with_key(path, Some("wrong-passphrase"));
            assert!(
                result.is_err(),
                "Should fail to open encrypted db with wrong key"
            );
        }
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let key1 = derive_key("my-secret").unwrap();
        let key2 = derive_key("my-secret").unwrap();
        assert_eq!(key1, key2);
        assert!(key1.chars().all(|c| c.is_ascii_hexdigit()));

        // Different passphrase = different key
        let key3 = derive_key("other-secret").unwrap();
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_encryption_required_by_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("required.db");
        let path = path.to_str().unwrap();

        std::env::remove_var(DB_KEY_ENV);

        let err_msg = match Database::new(path) {
            Err(e) => e.to_string(),
            Ok(_) => panic!("Database::new() should fail without {}", DB_KEY_ENV),
        };
        assert!(
            err_msg.contains(DB_KEY_ENV),
            "Error should mention the key variable: {}",
            err_msg
        );

        assert!(Database::new_unencrypted(path).is_ok());
    }
}
