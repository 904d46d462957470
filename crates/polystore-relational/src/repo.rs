//! Customer repository
//!
//! Row-level persistence for [`Customer`]; identity is assigned by SQLite
//! on first save. Callers are expected to run inside a transaction managed
//! by the chained coordinator; the repository itself never begins or ends
//! native transactions.

use chrono::DateTime;
use polystore_core::model::Customer;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::errors::{from_rusqlite, Result};

/// SQLite repository for customers
pub struct CustomerRepo;

impl CustomerRepo {
    /// Persist a customer, returning it with its assigned row id
    pub fn save(conn: &Connection, customer: &Customer) -> Result<Customer> {
        match customer.id {
            Some(id) => {
                conn.execute(
                    "UPDATE customers SET first_name = ?1, last_name = ?2 WHERE id = ?3",
                    rusqlite::params![customer.first_name, customer.last_name, id],
                )
                .map_err(from_rusqlite)?;
                Ok(customer.clone())
            }
            None => {
                conn.execute(
                    "INSERT INTO customers (first_name, last_name, created_at)
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![
                        customer.first_name,
                        customer.last_name,
                        customer.created_at.timestamp(),
                    ],
                )
                .map_err(from_rusqlite)?;
                let mut saved = customer.clone();
                saved.id = Some(conn.last_insert_rowid());
                Ok(saved)
            }
        }
    }

    /// All customers in id order
    pub fn find_all(conn: &Connection) -> Result<Vec<Customer>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, first_name, last_name, created_at FROM customers ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let customers = stmt
            .query_map([], row_to_customer)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(customers)
    }

    /// Look up one customer by row id
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Customer>> {
        conn.query_row(
            "SELECT id, first_name, last_name, created_at FROM customers WHERE id = ?",
            [id],
            row_to_customer,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All customers with the given last name, in id order
    pub fn find_by_last_name(conn: &Connection, last_name: &str) -> Result<Vec<Customer>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, first_name, last_name, created_at FROM customers
                 WHERE last_name = ? ORDER BY id",
            )
            .map_err(from_rusqlite)?;
        let customers = stmt
            .query_map([last_name], row_to_customer)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(customers)
    }

    /// Remove every customer row
    pub fn delete_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM customers", [])
            .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Number of customer rows
    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}

fn row_to_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    let created_at: i64 = row.get(3)?;
    Ok(Customer {
        id: Some(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}
