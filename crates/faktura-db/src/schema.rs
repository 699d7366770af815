//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity. UUIDs,
//! timestamps, and decimal amounts are stored as strings — the entities
//! are the source of truth for ids and time, and amounts must round-trip
//! without floating-point drift. Enums are stored as strings with ASSERT
//! constraints. The UNIQUE indexes are the authoritative uniqueness
//! guard for organisation numbers, user emails, invoice numbers, and
//! membership pairs.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD first_name ON TABLE user TYPE string;
DEFINE FIELD last_name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD created_at ON TABLE user TYPE string;
DEFINE FIELD updated_at ON TABLE user TYPE string;
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Companies
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD org_num ON TABLE company TYPE string;
DEFINE FIELD name ON TABLE company TYPE string;
DEFINE FIELD email ON TABLE company TYPE option<string>;
DEFINE FIELD phone_number ON TABLE company TYPE option<string>;
DEFINE FIELD address ON TABLE company TYPE option<string>;
DEFINE FIELD city ON TABLE company TYPE option<string>;
DEFINE FIELD country ON TABLE company TYPE option<string>;
DEFINE FIELD created_at ON TABLE company TYPE string;
DEFINE FIELD updated_at ON TABLE company TYPE string;
DEFINE INDEX idx_company_org_num ON TABLE company \
    COLUMNS org_num UNIQUE;

-- =======================================================================
-- Company memberships (user <-> company association)
-- =======================================================================
DEFINE TABLE company_member SCHEMAFULL;
DEFINE FIELD user_id ON TABLE company_member TYPE string;
DEFINE FIELD company_id ON TABLE company_member TYPE string;
DEFINE FIELD created_at ON TABLE company_member TYPE string;
DEFINE INDEX idx_member_pair ON TABLE company_member \
    COLUMNS user_id, company_id UNIQUE;

-- =======================================================================
-- Clients (billing counterparts, owned by a company)
-- =======================================================================
DEFINE TABLE client SCHEMAFULL;
DEFINE FIELD company_id ON TABLE client TYPE string;
DEFINE FIELD first_name ON TABLE client TYPE string;
DEFINE FIELD last_name ON TABLE client TYPE string;
DEFINE FIELD email ON TABLE client TYPE string;
DEFINE FIELD address ON TABLE client TYPE option<string>;
DEFINE FIELD city ON TABLE client TYPE option<string>;
DEFINE FIELD country ON TABLE client TYPE option<string>;
DEFINE FIELD phone_number ON TABLE client TYPE option<string>;
DEFINE FIELD created_at ON TABLE client TYPE string;
DEFINE FIELD updated_at ON TABLE client TYPE string;
DEFINE INDEX idx_client_company ON TABLE client COLUMNS company_id;

-- =======================================================================
-- Invoices (line items are embedded: items never exist on their own)
-- =======================================================================
DEFINE TABLE invoice SCHEMAFULL;
DEFINE FIELD company_id ON TABLE invoice TYPE string;
DEFINE FIELD client_id ON TABLE invoice TYPE string;
DEFINE FIELD number ON TABLE invoice TYPE string;
DEFINE FIELD due_date ON TABLE invoice TYPE string;
DEFINE FIELD status ON TABLE invoice TYPE string \
    ASSERT $value IN ['created', 'sent', 'paid', 'cancelled'];
DEFINE FIELD items ON TABLE invoice TYPE array;
DEFINE FIELD items.* ON TABLE invoice FLEXIBLE TYPE object;
DEFINE FIELD amount ON TABLE invoice TYPE string;
DEFINE FIELD created_at ON TABLE invoice TYPE string;
DEFINE FIELD updated_at ON TABLE invoice TYPE string;
DEFINE INDEX idx_invoice_number ON TABLE invoice \
    COLUMNS number UNIQUE;
DEFINE INDEX idx_invoice_company ON TABLE invoice COLUMNS company_id;
DEFINE INDEX idx_invoice_client ON TABLE invoice COLUMNS client_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
