//! Database schema definitions

/// SQL to create the invoices table.
///
/// Line items are stored as a JSON array in `items`; invoices are
/// self-contained documents, no relational structure is needed.
pub const CREATE_INVOICES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id              INTEGER NOT NULL PRIMARY KEY,
    invoice_number  TEXT NOT NULL,
    business_name   TEXT NOT NULL,
    client_name     TEXT,
    invoice_date    TEXT NOT NULL,
    invoice_time    TEXT,
    currency        TEXT NOT NULL,
    items           TEXT NOT NULL,
    total           TEXT NOT NULL
)
"#;

/// SQL to create the single-slot draft table
pub const CREATE_DRAFT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS draft (
    slot            INTEGER NOT NULL PRIMARY KEY CHECK (slot = 0),
    payload         TEXT NOT NULL,
    saved_at        TEXT NOT NULL
)
"#;

/// SQL to create the usage ledger table, keyed by (month, day, action)
pub const CREATE_USAGE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS usage_counts (
    month           CHAR(7) NOT NULL,
    day             CHAR(10) NOT NULL,
    action          TEXT NOT NULL,
    count           INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (month, day, action)
)
"#;

/// SQL to create the properties table
pub const CREATE_PROPERTIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS properties (
    store_id        CHAR(32) NOT NULL PRIMARY KEY,
    version         CHAR(10),
    created_timestamp TEXT,
    update_timestamp  TEXT
)
"#;

/// SQL to create the settings key-value table
pub const CREATE_SETTINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key             TEXT NOT NULL PRIMARY KEY,
    value           TEXT NOT NULL
)
"#;

/// Secondary indexes on invoices, maintained for future query support
pub const CREATE_INVOICE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices (invoice_date)",
    "CREATE INDEX IF NOT EXISTS idx_invoices_client ON invoices (client_name)",
    "CREATE INDEX IF NOT EXISTS idx_invoices_number ON invoices (invoice_number)",
];

/// All table creation statements in order
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_INVOICES_TABLE,
    CREATE_DRAFT_TABLE,
    CREATE_USAGE_TABLE,
    CREATE_PROPERTIES_TABLE,
    CREATE_SETTINGS_TABLE,
];
