use crate::model::{ServiceId, TableDescriptor};

use super::platform::{INTEGRATION, PRODUCT};

pub const CICD_INSTANCES: ServiceId = ServiceId::new("cicd_instances");
pub const CICD_JOBS: ServiceId = ServiceId::new("cicd_jobs");
pub const CICD_JOB_RUNS: ServiceId = ServiceId::new("cicd_job_runs");
pub const CICD_JOB_RUN_STAGE: ServiceId = ServiceId::new("cicd_job_run_stage");

pub const DESCRIPTORS: &[TableDescriptor] = &[
    TableDescriptor::tenant(
        CICD_INSTANCES,
        &[INTEGRATION],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.cicd_instances(
            id                UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            name              VARCHAR,
            url               VARCHAR,
            integration_id    INTEGER REFERENCES {schema}.integrations(id) ON DELETE CASCADE,
            type              VARCHAR,
            config            JSONB NOT NULL DEFAULT '{}'::jsonb,
            config_updated_at TIMESTAMP WITH TIME ZONE,
            details           JSONB NOT NULL DEFAULT '{}'::jsonb,
            last_hb_at        TIMESTAMP WITH TIME ZONE,
            created_at        TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now(),
            updated_at        TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now()
        )"#],
    ),
    TableDescriptor::tenant(
        CICD_JOBS,
        &[CICD_INSTANCES, PRODUCT],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.cicd_jobs(
            id                       UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            project_name             VARCHAR,
            job_name                 VARCHAR NOT NULL,
            job_full_name            VARCHAR NOT NULL,
            job_normalized_full_name VARCHAR,
            branch_name              VARCHAR,
            module_name              VARCHAR,
            cicd_instance_id         UUID REFERENCES {schema}.cicd_instances(id) ON DELETE CASCADE,
            scm_url                  VARCHAR,
            scm_user_id              VARCHAR,
            created_at               TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now(),
            updated_at               TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now()
        )"#,
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_cicd_jobs_cicd_instance_id_job_full_name_idx \
             ON {schema}.cicd_jobs (COALESCE(cicd_instance_id, '00000000-0000-0000-0000-000000000000'), job_full_name)",
        ],
    ),
    TableDescriptor::tenant(
        CICD_JOB_RUNS,
        &[CICD_JOBS],
        &[
            r#"CREATE TABLE IF NOT EXISTS {schema}.cicd_job_runs(
            id              UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            cicd_job_id     UUID NOT NULL REFERENCES {schema}.cicd_jobs(id) ON DELETE CASCADE,
            job_run_number  BIGINT NOT NULL,
            status          VARCHAR,
            start_time      TIMESTAMP WITH TIME ZONE,
            duration        INTEGER,
            end_time        TIMESTAMP WITH TIME ZONE,
            cicd_user_id    VARCHAR,
            source          VARCHAR,
            reference_id    VARCHAR,
            scm_commit_ids  VARCHAR[],
            ci              BOOLEAN,
            cd              BOOLEAN,
            metadata        JSONB,
            created_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now(),
            updated_at      TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT now()
        )"#,
            r#"CREATE TABLE IF NOT EXISTS {schema}.cicd_job_run_params(
            id              UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            cicd_job_run_id UUID NOT NULL REFERENCES {schema}.cicd_job_runs(id) ON DELETE CASCADE,
            type            VARCHAR NOT NULL,
            name            VARCHAR NOT NULL,
            value           VARCHAR NOT NULL
        )"#,
        ],
    ),
    TableDescriptor::tenant(
        CICD_JOB_RUN_STAGE,
        &[CICD_JOB_RUNS],
        &[r#"CREATE TABLE IF NOT EXISTS {schema}.cicd_job_run_stages(
            id              UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
            cicd_job_run_id UUID NOT NULL REFERENCES {schema}.cicd_job_runs(id) ON DELETE CASCADE,
            stage_id        VARCHAR(50) NOT NULL,
            name            VARCHAR(50) NOT NULL,
            description     VARCHAR(200) NOT NULL,
            result          VARCHAR(30) NOT NULL,
            state           VARCHAR(30) NOT NULL,
            duration        BIGINT NOT NULL,
            start_time      BIGINT NOT NULL,
            url             VARCHAR(500) NOT NULL,
            full_path       JSONB NOT NULL,
            child_job_runs  UUID[],
            CONSTRAINT unq_stage UNIQUE(cicd_job_run_id, stage_id)
        )"#],
    ),
];
