pub const SCHEMA: &str = r#"
-- Leads; rowid doubles as insertion order for stable sort tie-breaks
CREATE TABLE IF NOT EXISTS leads (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    name_normalized TEXT NOT NULL,   -- Unicode lowercase of name, for search
    email TEXT NOT NULL UNIQUE,   -- stored lowercase
    phone TEXT,
    status TEXT NOT NULL DEFAULT 'New'
        CHECK (status IN ('New', 'Contacted', 'Qualified', 'Lost', 'Converted')),
    stage TEXT NOT NULL DEFAULT 'Lead'
        CHECK (stage IN ('Lead', 'Prospect', 'Customer')),
    source TEXT NOT NULL DEFAULT 'Website'
        CHECK (source IN ('Website', 'Ads', 'Referral', 'Cold Call', 'Other')),
    notes TEXT,

    -- Fixed-width RFC 3339 UTC, so text order is time order
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,

    CHECK (updated_at >= created_at)
);

CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at);
CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);
CREATE INDEX IF NOT EXISTS idx_leads_stage ON leads(stage);
CREATE INDEX IF NOT EXISTS idx_leads_source ON leads(source);
"#;
