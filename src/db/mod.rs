use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use crate::models::{AppSettings, Customer, Document};
use crate::utils::now_rfc3339;

pub const CUSTOMERS: &str = "customers";
pub const DOCUMENTS: &str = "documents";

const SETTINGS_RECORD_KEY: &str = "app_settings";
const SEED_MARKER_KEY: &str = "seeded_at";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut db = Database { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )?;

        let migrations = vec![
            (
                "001_create_records.sql",
                include_str!(concat!(
                    env!("CARGO_MANIFEST_DIR"),
                    "/migrations/001_create_records.sql"
                )),
            ),
            (
                "002_create_settings.sql",
                include_str!(concat!(
                    env!("CARGO_MANIFEST_DIR"),
                    "/migrations/002_create_settings.sql"
                )),
            ),
        ];

        for (name, sql) in migrations {
            let applied: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM schema_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            if applied.is_none() {
                let tx = self.conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, datetime('now'))",
                    params![name],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    }

    // Seeds the three collections on first use only. The marker key keeps
    // later launches from resurrecting mock data after the user deletes it.
    pub fn seed_defaults(&self) -> Result<()> {
        if self.get_setting(SEED_MARKER_KEY)?.is_some() {
            return Ok(());
        }

        for customer in mock_customers() {
            self.save_customer(&customer)?;
        }
        self.save_settings(&AppSettings::default())?;
        self.set_setting(SEED_MARKER_KEY, &now_rfc3339())?;
        tracing::info!("seeded default customers and settings");
        Ok(())
    }

    // --- generic record layer ------------------------------------------------

    fn get_collection(&self, collection: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM records WHERE collection = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map(params![collection], |row| row.get::<_, String>(0))?;
        let mut bodies = Vec::new();
        for row in rows {
            bodies.push(row?);
        }
        Ok(bodies)
    }

    fn find_record(&self, collection: &str, id: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM records WHERE collection = ?1 AND id = ?2")?;
        let body = stmt
            .query_row(params![collection, id], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(body)
    }

    // Replace in place when the id is known (keeps the record's position),
    // append with the next sequence number otherwise.
    fn save_record(&self, collection: &str, id: &str, body: &str) -> Result<()> {
        let now = now_rfc3339();
        let updated = self.conn.execute(
            "UPDATE records SET body = ?3, updated_at = ?4 WHERE collection = ?1 AND id = ?2",
            params![collection, id, body, now],
        )?;
        if updated == 0 {
            self.conn.execute(
                "INSERT INTO records (collection, id, seq, body, created_at, updated_at)
                 VALUES (
                    ?1, ?2,
                    (SELECT COALESCE(MAX(seq), 0) + 1 FROM records WHERE collection = ?1),
                    ?3, ?4, ?4
                 )",
                params![collection, id, body, now],
            )?;
        }
        Ok(())
    }

    fn delete_record(&self, collection: &str, id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2",
            params![collection, id],
        )?;
        Ok(())
    }

    // --- customers -----------------------------------------------------------

    pub fn get_customers(&self) -> Result<Vec<Customer>> {
        let mut customers = Vec::new();
        for body in self.get_collection(CUSTOMERS)? {
            customers.push(serde_json::from_str(&body)?);
        }
        Ok(customers)
    }

    pub fn save_customer(&self, customer: &Customer) -> Result<()> {
        let body = serde_json::to_string(customer)?;
        self.save_record(CUSTOMERS, &customer.id, &body)
    }

    pub fn delete_customer(&self, id: &str) -> Result<()> {
        self.delete_record(CUSTOMERS, id)
    }

    // --- documents -----------------------------------------------------------

    pub fn get_documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for body in self.get_collection(DOCUMENTS)? {
            documents.push(serde_json::from_str(&body)?);
        }
        Ok(documents)
    }

    pub fn get_document(&self, id: &str) -> Result<Option<Document>> {
        match self.find_record(DOCUMENTS, id)? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    pub fn save_document(&self, document: &Document) -> Result<()> {
        let body = serde_json::to_string(document)?;
        self.save_record(DOCUMENTS, &document.id, &body)
    }

    pub fn delete_document(&self, id: &str) -> Result<()> {
        self.delete_record(DOCUMENTS, id)
    }

    // --- settings ------------------------------------------------------------

    pub fn get_settings(&self) -> Result<AppSettings> {
        match self.get_setting(SETTINGS_RECORD_KEY)? {
            Some(body) => Ok(serde_json::from_str(&body)?),
            None => Ok(AppSettings::default()),
        }
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let body = serde_json::to_string(settings)?;
        self.set_setting(SETTINGS_RECORD_KEY, &body)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn delete_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn mock_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: "123 Maple St".to_string(),
            notes: None,
        },
        Customer {
            id: "2".to_string(),
            name: "Acme Corp".to_string(),
            email: "billing@acme.com".to_string(),
            phone: "555-0900".to_string(),
            address: "456 Industrial Blvd".to_string(),
            notes: None,
        },
        Customer {
            id: "3".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane.smith@email.com".to_string(),
            phone: "555-0202".to_string(),
            address: "789 Oak Ln".to_string(),
            notes: None,
        },
    ]
}
