//! Storage of bookable fields.
//!
//! The admission core only reads resources. Creation and deletion exist for
//! seeding and administration.

use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::money::Money;
use crate::reservation::ResourceId;
use crate::resource::{validate_name, Resource};

use super::connection::Database;
use super::operations::{conversion_error, datetime_to_unix_secs};
use super::schema::INSERT_RESOURCE;

const SELECT_RESOURCE: &str = r"
    SELECT id, name, hourly_rate
    FROM resources
    WHERE id = ? AND deleted_at IS NULL
";

const LIST_RESOURCES: &str = r"
    SELECT id, name, hourly_rate
    FROM resources
    WHERE deleted_at IS NULL
    ORDER BY id
";

const SOFT_DELETE_RESOURCE: &str = r"
    UPDATE resources
    SET deleted_at = ?
    WHERE id = ? AND deleted_at IS NULL
";

fn row_to_resource(row: &rusqlite::Row<'_>) -> rusqlite::Result<Resource> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let rate: String = row.get(2)?;

    let rate = Money::from_str(&rate).map_err(|e| conversion_error(2, e))?;
    Resource::new(ResourceId(id), name, rate).map_err(|e| conversion_error(1, e))
}

impl Database {
    /// Registers a field using an existing connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or a storage error.
    pub fn create_resource_simple(
        conn: &Connection,
        name: &str,
        hourly_rate: Money,
    ) -> Result<Resource> {
        let name = validate_name(name)?;
        conn.execute(
            INSERT_RESOURCE,
            params![
                name,
                hourly_rate.amount().to_string(),
                datetime_to_unix_secs(chrono::Utc::now())
            ],
        )?;
        Ok(Resource::new(ResourceId(conn.last_insert_rowid()), name, hourly_rate)?)
    }

    /// Registers a field.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or a storage error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldbook::database::{Database, DatabaseConfig};
    /// use fieldbook::Money;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/fieldbook.db")).unwrap();
    /// let field = db.create_resource("Field A", Money::from_units(35_000)).unwrap();
    /// println!("created field {}", field.id());
    /// ```
    pub fn create_resource(&mut self, name: &str, hourly_rate: Money) -> Result<Resource> {
        self.in_immediate_transaction(|tx| Self::create_resource_simple(tx, name, hourly_rate))
    }

    /// Retrieves a live resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_resource(conn: &Connection, id: ResourceId) -> Result<Option<Resource>> {
        let mut stmt = conn.prepare_cached(SELECT_RESOURCE)?;
        let mut rows = stmt.query_map([id.value()], row_to_resource)?;

        match rows.next() {
            Some(Ok(resource)) => Ok(Some(resource)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Like [`Database::get_resource`] but fails when the field is missing.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no live resource has this id.
    pub fn require_resource(conn: &Connection, id: ResourceId) -> Result<Resource> {
        Self::get_resource(conn, id)?.ok_or(Error::ResourceNotFound { id })
    }

    /// Lists live resources ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_resources(conn: &Connection) -> Result<Vec<Resource>> {
        let mut stmt = conn.prepare(LIST_RESOURCES)?;
        let resources = stmt
            .query_map([], row_to_resource)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(resources)
    }

    /// Soft-deletes a resource. Existing reservations are kept, but new
    /// admissions on the field fail with `ResourceNotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn delete_resource(&mut self, id: ResourceId) -> Result<bool> {
        self.in_immediate_transaction(|tx| {
            let rows = tx.execute(
                SOFT_DELETE_RESOURCE,
                params![datetime_to_unix_secs(chrono::Utc::now()), id.value()],
            )?;
            Ok(rows > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_test_database;

    #[test]
    fn test_create_and_get_resource() {
        let mut db = create_test_database();
        let created = db
            .create_resource(" Field A ", "35000".parse().unwrap())
            .unwrap();
        assert_eq!(created.name(), "Field A");

        let loaded = Database::get_resource(db.connection(), created.id())
            .unwrap()
            .unwrap();
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_create_resource_rejects_blank_name() {
        let mut db = create_test_database();
        let err = db.create_resource("   ", Money::ZERO).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(Database::list_resources(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn test_require_resource_missing() {
        let db = create_test_database();
        let err = Database::require_resource(db.connection(), ResourceId(5)).unwrap_err();
        assert_eq!(err.to_string(), "field 5 not found");
    }

    #[test]
    fn test_list_and_delete_resources() {
        let mut db = create_test_database();
        let a = db.create_resource("A", Money::from_units(1)).unwrap();
        let b = db.create_resource("B", Money::from_units(2)).unwrap();

        let all = Database::list_resources(db.connection()).unwrap();
        assert_eq!(all, vec![a.clone(), b.clone()]);

        assert!(db.delete_resource(a.id()).unwrap());
        assert!(!db.delete_resource(a.id()).unwrap());
        assert_eq!(Database::list_resources(db.connection()).unwrap(), vec![b]);
        assert!(Database::get_resource(db.connection(), a.id()).unwrap().is_none());
    }
}
