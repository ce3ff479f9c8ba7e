use crate::model::{ServiceId, TableDescriptor};

pub const USER: ServiceId = ServiceId::new("user");
pub const INTEGRATION: ServiceId = ServiceId::new("integration");
pub const PRODUCT: ServiceId = ServiceId::new("product");
pub const DASHBOARD_WIDGET: ServiceId = ServiceId::new("dashboard_widget");
pub const TENANT_CONFIG: ServiceId = ServiceId::new("tenant_config");
pub const KUDOS: ServiceId = ServiceId::new("kudos");
pub const TAGS: ServiceId = ServiceId::new("tags");
pub const TAG_ITEM: ServiceId = ServiceId::new("tag_item");
pub const SECTIONS: ServiceId = ServiceId::new("sections");

pub const DESCRIPTORS: &[TableDescriptor] = &[
    TableDescriptor::tenant(
        USER,
        &[],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.users(
            id                    INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            email                 VARCHAR(50) NOT NULL UNIQUE,
            bcryptpassword        BYTEA NOT NULL,
            firstname             VARCHAR(50) NOT NULL,
            lastname              VARCHAR(50) NOT NULL,
            passwordreset         JSONB NOT NULL,
            usertype              VARCHAR NOT NULL,
            samlauthenabled       BOOLEAN NOT NULL,
            passwordauthenabled   BOOLEAN NOT NULL,
            mfa_enabled           BOOLEAN DEFAULT false,
            scopes                JSONB NOT NULL DEFAULT '{}'::JSONB,
            metadata              JSONB NOT NULL DEFAULT '{}'::JSONB,
            updatedat             BIGINT DEFAULT extract(epoch from now()),
            createdat             BIGINT DEFAULT extract(epoch from now())
        )"#,
            "CREATE INDEX IF NOT EXISTS users_updatedat_idx ON {schema}.users(updatedat)",
        ],
    ),
    TableDescriptor::tenant(
        INTEGRATION,
        &[],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.integrations(
            id                 INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name               VARCHAR(50) UNIQUE NOT NULL,
            description        VARCHAR(140),
            status             VARCHAR(50) NOT NULL,
            application        VARCHAR(50) NOT NULL,
            url                VARCHAR NOT NULL,
            satellite          BOOLEAN NOT NULL DEFAULT false,
            metadata           JSONB,
            authentication     VARCHAR(50) NOT NULL DEFAULT 'unknown',
            linked_credentials INTEGER REFERENCES {schema}.integrations(id),
            updatedat          BIGINT DEFAULT extract(epoch from now()),
            createdat          BIGINT DEFAULT extract(epoch from now())
        )"#,
            "CREATE INDEX IF NOT EXISTS integrations_updatedat_idx ON {schema}.integrations(updatedat)",
            r#"CREATE TABLE IF NOT EXISTS {schema}.integration_configs(
            id                UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            integration_id    INTEGER NOT NULL REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            config            JSONB,
            repository_config JSONB,
            custom_hygienes   JSONB,
            metadata          JSONB,
            createdat         BIGINT DEFAULT extract(epoch from now()),
            UNIQUE(integration_id)
        )"#,
        ],
    ),
    TableDescriptor::tenant(
        PRODUCT,
        &[USER],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.products(
            id            INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name          VARCHAR NOT NULL,
            key           VARCHAR NOT NULL,
            orgIdentifier VARCHAR NOT NULL,
            owner_id      INTEGER REFERENCES {schema}.users(id) ON DELETE SET NULL,
            description   VARCHAR,
            updatedat     BIGINT DEFAULT extract(epoch from now()),
            createdat     BIGINT DEFAULT extract(epoch from now()),
            bootstrapped  BOOLEAN NOT NULL DEFAULT false,
            immutable     BOOLEAN NOT NULL DEFAULT false,
            disabled      BOOLEAN NOT NULL DEFAULT false,
            demo          BOOLEAN NOT NULL DEFAULT false
        )"#,
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_products_name_orgidentifier_idx ON {schema}.products (name, orgIdentifier)",
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_products_key_orgidentifier_idx ON {schema}.products (key, orgIdentifier)",
        ],
    ),
    TableDescriptor::tenant(
        DASHBOARD_WIDGET,
        &[USER],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.dashboards(
            id          INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name        VARCHAR(100) NOT NULL,
            owner_id    INTEGER REFERENCES {schema}.users(id) ON DELETE SET NULL,
            demo        BOOLEAN NOT NULL DEFAULT false,
            query       JSONB,
            metadata    JSONB,
            public      BOOLEAN NOT NULL DEFAULT false,
            type        VARCHAR(50) NOT NULL,
            createdat   BIGINT DEFAULT extract(epoch from now()),
            updated_at  BIGINT DEFAULT extract(epoch from now())
        )"#,
            r#"CREATE TABLE IF NOT EXISTS {schema}.widgets(
            id           UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            name         VARCHAR(100) NOT NULL,
            type         VARCHAR(50) NOT NULL,
            query        JSONB,
            metadata     JSONB,
            display_info JSONB,
            dashboardid  INTEGER NOT NULL REFERENCES {schema}.dashboards(id) ON DELETE CASCADE,
            createdat    BIGINT DEFAULT extract(epoch from now())
        )"#,
            "CREATE INDEX IF NOT EXISTS widgets_dashboardid_idx ON {schema}.widgets (dashboardid)",
        ],
    ),
    TableDescriptor::tenant(
        TENANT_CONFIG,
        &[DASHBOARD_WIDGET],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.tenant_configs(
            id          INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name        VARCHAR NOT NULL UNIQUE,
            value       VARCHAR NOT NULL,
            createdat   BIGINT DEFAULT extract(epoch from now())
        )"#],
    ),
    TableDescriptor::tenant(
        KUDOS,
        &[DASHBOARD_WIDGET],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.kudos(
            id            UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            level         VARCHAR NOT NULL,
            author        VARCHAR NOT NULL,
            type          VARCHAR NOT NULL,
            icon          VARCHAR,
            breadcrumbs   VARCHAR,
            dashboard_id  INTEGER REFERENCES {schema}.dashboards(id) ON DELETE CASCADE,
            body          VARCHAR,
            expiration    TIMESTAMPTZ,
            anonymous_link BOOLEAN NOT NULL DEFAULT false,
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
            r#"CREATE TABLE IF NOT EXISTS {schema}.kudos_sharings(
            id          UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            kudos_id    UUID NOT NULL REFERENCES {schema}.kudos(id) ON DELETE CASCADE,
            type        VARCHAR NOT NULL,
            target      VARCHAR NOT NULL,
            created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )"#,
        ],
    ),
    TableDescriptor::tenant(
        TAGS,
        &[],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.tags(
            id          INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            name        VARCHAR NOT NULL UNIQUE,
            createdat   BIGINT DEFAULT extract(epoch from now())
        )"#],
    ),
    TableDescriptor::tenant(
        TAG_ITEM,
        &[TAGS],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.tagitems(
            id          UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            itemid      VARCHAR NOT NULL,
            itemtype    VARCHAR NOT NULL,
            tagid       INTEGER NOT NULL REFERENCES {schema}.tags(id) ON DELETE CASCADE,
            createdat   BIGINT DEFAULT extract(epoch from now()),
            UNIQUE(itemid, itemtype, tagid)
        )"#,
            "CREATE INDEX IF NOT EXISTS tagitems_itemid_itemtype_idx ON {schema}.tagitems (itemid, itemtype)",
        ],
    ),
    TableDescriptor::tenant(
        SECTIONS,
        &[],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.sections(
            id          UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            name        VARCHAR NOT NULL,
            type        VARCHAR NOT NULL,
            attachment  VARCHAR,
            description VARCHAR NOT NULL,
            createdat   BIGINT DEFAULT extract(epoch from now())
        )"#,
            r#"CREATE TABLE IF NOT EXISTS {schema}.questions(
            id               UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            name             VARCHAR NOT NULL,
            type             VARCHAR NOT NULL,
            severity         VARCHAR NOT NULL,
            options          JSONB NOT NULL,
            verifiable       BOOLEAN NOT NULL,
            verificationmode VARCHAR NOT NULL,
            number           INT NOT NULL,
            section_id       UUID REFERENCES {schema}.sections(id) ON DELETE CASCADE,
            required         BOOLEAN NOT NULL DEFAULT FALSE,
            createdat        BIGINT DEFAULT extract(epoch from now())
        )"#,
            "CREATE INDEX IF NOT EXISTS questions_section_id_idx ON {schema}.questions (section_id)",
        ],
    ),
];
