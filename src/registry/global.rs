use crate::model::{ServiceId, TableDescriptor};

pub const TENANT: ServiceId = ServiceId::new("tenant");
pub const INDUSTRY_DEV_PRODUCTIVITY_REPORT: ServiceId =
    ServiceId::new("industry_dev_productivity_report");

pub const DESCRIPTORS: &[TableDescriptor] = &[
    TableDescriptor::global(
        TENANT,
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.tenants(
            id          VARCHAR PRIMARY KEY,
            tenantname  VARCHAR NOT NULL,
            createdat   BIGINT NOT NULL DEFAULT extract(epoch from now())
        )"#],
    ),
    TableDescriptor::inventory(
        INDUSTRY_DEV_PRODUCTIVITY_REPORT,
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.industry_dev_productivity_reports(
            id          UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            interval    VARCHAR NOT NULL,
            score       INTEGER NOT NULL,
            report      JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_industry_dev_productivity_reports_interval_idx \
             ON {schema}.industry_dev_productivity_reports(interval)",
        ],
    ),
];
