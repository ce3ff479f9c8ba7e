use crate::error::SetupError;
use crate::model::EnsureTenantSchemaRequest;
use crate::store::traits::SeedStore;

/// Tenant config entry holding the company display name
pub const COMPANY_NAME_CONFIG: &str = "COMPANY_NAME";

/// Seed the default rows of a freshly created tenant schema.
///
/// Writes the `COMPANY_NAME` config and, when an email was supplied, the
/// admin user. Both writes tolerate existing rows so a retried bootstrap does
/// not duplicate them. Returns whether a new admin user was inserted.
pub async fn seed_tenant_defaults<S: SeedStore + ?Sized>(
    store: &S,
    request: &EnsureTenantSchemaRequest,
) -> Result<bool, SetupError> {
    let schema = request.tenant_id.as_str();

    store
        .upsert_tenant_config(schema, COMPANY_NAME_CONFIG, &request.tenant_name)
        .await?;

    let user_created = match request.default_user.to_admin_user() {
        Some(user) => {
            let inserted = store.insert_admin_user(schema, &user).await?;
            if inserted {
                log::info!("[{}] Created admin user {}", schema, user.email);
            } else {
                log::info!("[{}] Admin user {} already exists", schema, user.email);
            }
            inserted
        }
        None => {
            log::warn!("[{}] No default user email given; skipping admin user", schema);
            false
        }
    };

    Ok(user_created)
}
