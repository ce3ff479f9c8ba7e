use crate::model::{ServiceId, TableDescriptor};

use super::platform::INTEGRATION;

pub const USER_IDENTITY: ServiceId = ServiceId::new("user_identity");
pub const GIT_REPOSITORY: ServiceId = ServiceId::new("git_repository");
pub const SONARQUBE_PROJECT: ServiceId = ServiceId::new("sonarqube_project");
pub const SONARQUBE_ISSUE: ServiceId = ServiceId::new("sonarqube_issue");

pub const DESCRIPTORS: &[TableDescriptor] = &[
    TableDescriptor::tenant(
        USER_IDENTITY,
        &[INTEGRATION],
        &[
            r#"DO $$ BEGIN
            IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'user_mapping_status_t') THEN
                CREATE TYPE user_mapping_status_t AS ENUM ('AUTO', 'MANUAL');
            END IF;
        END $$"#,
            r#"CREATE TABLE IF NOT EXISTS {schema}.integration_users(
            id                    UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            integration_id        INTEGER NOT NULL REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            cloud_id              VARCHAR NOT NULL,
            display_name          VARCHAR NOT NULL,
            original_display_name VARCHAR NOT NULL,
            emails                VARCHAR[],
            mapping_status        user_mapping_status_t,
            created_at            BIGINT NOT NULL DEFAULT EXTRACT(epoch FROM now()),
            updated_at            BIGINT NOT NULL DEFAULT EXTRACT(epoch FROM now()),
            UNIQUE (integration_id, cloud_id)
        )"#,
            "CREATE INDEX IF NOT EXISTS integration_users_compound_idx \
             ON {schema}.integration_users(integration_id, cloud_id, original_display_name)",
            "CREATE SEQUENCE IF NOT EXISTS {schema}.sequence_num_ext_user_id",
        ],
    ),
    TableDescriptor::tenant(
        GIT_REPOSITORY,
        &[INTEGRATION],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.gitrepositories(
            id             INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            cloudid        VARCHAR NOT NULL,
            name           VARCHAR NOT NULL,
            integrationid  INTEGER NOT NULL REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            ownername      VARCHAR,
            ownertype      VARCHAR,
            htmlurl        VARCHAR,
            masterbranch   VARCHAR,
            cloudcreatedat BIGINT,
            cloudpushedat  BIGINT,
            cloudupdatedat BIGINT,
            size           INTEGER,
            repotype       VARCHAR,
            isprivate      BOOLEAN NOT NULL,
            createdat      BIGINT DEFAULT extract(epoch from now())
        )"#,
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_gitrepositories_compound_idx \
             ON {schema}.gitrepositories (integrationid, cloudid)",
            r#"CREATE TABLE IF NOT EXISTS {schema}.gittechnologies(
            id             INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            repo_id        VARCHAR NOT NULL,
            name           VARCHAR NOT NULL,
            integration_id INTEGER NOT NULL REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            updated_at     BIGINT DEFAULT extract(epoch from now()),
            created_at     BIGINT DEFAULT extract(epoch from now()),
            UNIQUE (name, repo_id, integration_id)
        )"#,
        ],
    ),
    TableDescriptor::tenant(
        SONARQUBE_PROJECT,
        &[INTEGRATION],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.sonarqube_projects(
            id                UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            integration_id    INTEGER NOT NULL REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            organization      VARCHAR NOT NULL,
            key               VARCHAR NOT NULL,
            name              VARCHAR NOT NULL,
            visibility        VARCHAR,
            last_analysis_date TIMESTAMP WITH TIME ZONE,
            revision          VARCHAR,
            created_at        TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now(),
            UNIQUE (integration_id, key)
        )"#],
    ),
    TableDescriptor::tenant(
        SONARQUBE_ISSUE,
        &[SONARQUBE_PROJECT],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.sonarqube_issues(
            id              UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            integration_id  INTEGER NOT NULL REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            project         VARCHAR NOT NULL,
            key             VARCHAR NOT NULL,
            type            VARCHAR,
            severity        VARCHAR,
            status          VARCHAR,
            effort          VARCHAR,
            author          VARCHAR,
            tags            VARCHAR[],
            issue_created_at TIMESTAMP WITH TIME ZONE,
            created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now(),
            UNIQUE (integration_id, key)
        )"#],
    ),
];
