use crate::model::{ServiceId, TableDescriptor};

use super::platform::INTEGRATION;
use super::scm::USER_IDENTITY;

pub const ORG_VERSIONS: ServiceId = ServiceId::new("org_versions");
pub const ORG_USERS: ServiceId = ServiceId::new("org_users");
pub const TICKET_CATEGORIZATION_SCHEME: ServiceId = ServiceId::new("ticket_categorization_scheme");
pub const DEV_PRODUCTIVITY_PROFILE: ServiceId = ServiceId::new("dev_productivity_profile");

pub const DESCRIPTORS: &[TableDescriptor] = &[
    TableDescriptor::tenant(
        ORG_VERSIONS,
        &[],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.org_version_counter(
            id          UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            type        VARCHAR NOT NULL,
            version     INTEGER NOT NULL,
            active      BOOLEAN NOT NULL DEFAULT false,
            created_at  TIMESTAMP NOT NULL DEFAULT (now() at time zone 'UTC'),
            updated_at  TIMESTAMP NOT NULL DEFAULT (now() at time zone 'UTC'),
            UNIQUE (type, version)
        )"#],
    ),
    TableDescriptor::tenant(
        ORG_USERS,
        &[ORG_VERSIONS, INTEGRATION, USER_IDENTITY],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.org_users(
            id             UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            ref_id         INTEGER NOT NULL,
            full_name      VARCHAR(150) NOT NULL,
            email          VARCHAR(150) NOT NULL,
            custom_fields  JSONB,
            versions       INTEGER[] NOT NULL,
            active         BOOL NOT NULL,
            created_at     TIMESTAMP NOT NULL DEFAULT (now() at time zone 'UTC'),
            updated_at     TIMESTAMP NOT NULL DEFAULT (now() at time zone 'UTC')
        )"#,
            r#"CREATE TABLE IF NOT EXISTS {schema}.org_user_cloud_id_mapping(
            id                   UUID NOT NULL DEFAULT uuid_generate_v4(),
            org_user_id          UUID NOT NULL REFERENCES {schema}.org_users(id) ON DELETE CASCADE,
            integration_user_id  UUID REFERENCES {schema}.integration_users(id) ON DELETE RESTRICT,
            mapping_status       user_mapping_status_t,
            UNIQUE (org_user_id, integration_user_id)
        )"#,
        ],
    ),
    TableDescriptor::tenant(
        TICKET_CATEGORIZATION_SCHEME,
        &[],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.ticket_categorization_schemes(
            id             UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            default_scheme BOOLEAN NOT NULL DEFAULT false,
            name           TEXT NOT NULL,
            config         JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
            "CREATE UNIQUE INDEX IF NOT EXISTS ticket_categorization_schemes_default_scheme_index \
             ON {schema}.ticket_categorization_schemes (default_scheme) WHERE default_scheme = true",
            "CREATE UNIQUE INDEX IF NOT EXISTS ticket_categorization_schemes_name_index \
             ON {schema}.ticket_categorization_schemes (UPPER(name))",
        ],
    ),
    TableDescriptor::tenant(
        DEV_PRODUCTIVITY_PROFILE,
        &[TICKET_CATEGORIZATION_SCHEME],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.dev_productivity_profiles(
            id                              UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            name                            VARCHAR NOT NULL,
            description                     VARCHAR,
            is_predefined                   BOOLEAN DEFAULT false,
            ticket_categorization_scheme_id UUID REFERENCES {schema}.ticket_categorization_schemes(id) ON DELETE RESTRICT,
            index                           INTEGER NOT NULL DEFAULT 1,
            enabled                         BOOLEAN DEFAULT true,
            settings                        JSONB NOT NULL DEFAULT '{}'::jsonb,
            created_at                      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now(),
            updated_at                      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now()
        )"#],
    ),
];
