use std::collections::BTreeSet;

use crate::error::SetupError;
use crate::model::{quote_ident, SchemaType, ServiceId};

/// Placeholder substituted with the target schema in DDL and grant templates.
pub const SCHEMA_PLACEHOLDER: &str = "{schema}";

/// A registered table manager: the tables it owns, where they live and which
/// other managers must have provisioned their tables first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescriptor {
    pub id: ServiceId,
    pub schema_type: SchemaType,
    pub references: &'static [ServiceId],
    /// Idempotent DDL templates, executed in order
    pub ddl: &'static [&'static str],
}

impl TableDescriptor {
    pub const fn tenant(
        id: ServiceId,
        references: &'static [ServiceId],
        ddl: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            schema_type: SchemaType::TenantSpecific,
            references,
            ddl,
        }
    }

    pub const fn inventory(id: ServiceId, ddl: &'static [&'static str]) -> Self {
        Self {
            id,
            schema_type: SchemaType::LevelopsInventorySchema,
            references: &[],
            ddl,
        }
    }

    pub const fn global(id: ServiceId, ddl: &'static [&'static str]) -> Self {
        Self {
            id,
            schema_type: SchemaType::Global,
            references: &[],
            ddl,
        }
    }

    pub fn is_tenant_specific(&self) -> bool {
        self.schema_type == SchemaType::TenantSpecific
    }

    /// The requirement set this descriptor is keyed under in the dependency graph
    pub fn requirements(&self) -> BTreeSet<ServiceId> {
        self.references.iter().copied().collect()
    }

    /// Resolve the schema this descriptor's tables live in.
    ///
    /// Tenant-specific descriptors need a tenant id; the others always use their
    /// fixed schema and ignore the tenant.
    pub fn schema_for<'a>(&self, tenant_id: Option<&'a str>) -> Result<&'a str, SetupError> {
        match self.schema_type.fixed_schema_name() {
            Some(schema) => Ok(schema),
            None => tenant_id.ok_or_else(|| {
                SetupError::InvalidArgument(format!(
                    "'{}' is tenant specific and needs a tenant id",
                    self.id
                ))
            }),
        }
    }

    pub fn render_ddl(&self, schema: &str) -> Vec<String> {
        let schema = quote_ident(schema);
        self.ddl
            .iter()
            .map(|statement| statement.replace(SCHEMA_PLACEHOLDER, &schema))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ServiceId = ServiceId::new("a");
    const B: ServiceId = ServiceId::new("b");

    #[test]
    fn test_render_ddl_substitutes_every_placeholder() {
        let descriptor = TableDescriptor::tenant(
            B,
            &[A],
            &["CREATE TABLE IF NOT EXISTS {schema}.b(a_id INTEGER REFERENCES {schema}.a(id))"],
        );

        assert_eq!(
            descriptor.render_ddl("acme"),
            vec![r#"CREATE TABLE IF NOT EXISTS "acme".b(a_id INTEGER REFERENCES "acme".a(id))"#]
        );
    }

    #[test]
    fn test_render_ddl_quotes_digit_leading_schema() {
        let descriptor = TableDescriptor::tenant(
            A,
            &[],
            &["CREATE TABLE IF NOT EXISTS {schema}.a(id SERIAL PRIMARY KEY)"],
        );

        assert_eq!(
            descriptor.render_ddl("123abc"),
            vec![r#"CREATE TABLE IF NOT EXISTS "123abc".a(id SERIAL PRIMARY KEY)"#]
        );
    }

    #[test]
    fn test_requirements_are_a_set() {
        let descriptor = TableDescriptor::tenant(B, &[A, A], &[]);
        assert_eq!(descriptor.requirements(), BTreeSet::from([A]));
        assert!(TableDescriptor::tenant(A, &[], &[]).requirements().is_empty());
    }

    #[test]
    fn test_schema_resolution() {
        let tenant = TableDescriptor::tenant(A, &[], &[]);
        assert_eq!(tenant.schema_for(Some("acme")).unwrap(), "acme");
        assert!(matches!(
            tenant.schema_for(None),
            Err(SetupError::InvalidArgument(_))
        ));

        let inventory = TableDescriptor::inventory(B, &[]);
        assert_eq!(inventory.schema_for(None).unwrap(), "_levelops");
        assert_eq!(inventory.schema_for(Some("acme")).unwrap(), "_levelops");
        assert!(!inventory.is_tenant_specific());
    }
}
