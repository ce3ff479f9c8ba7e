use serde::Serialize;
use std::fmt;

/// Schema holding the LevelOps inventory tables shared by all tenants.
pub const LEVELOPS_INVENTORY_SCHEMA: &str = "_levelops";

/// Schema holding global tables such as the tenant registry.
pub const GLOBAL_SCHEMA: &str = "public";

/// Stable identity of a registered table manager.
///
/// Used as the key of requirement sets, so it must stay cheap to copy, hash
/// and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceId(&'static str);

impl ServiceId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Quote a schema or table name as a PostgreSQL identifier, so names such as
/// `123abc` stay valid in generated SQL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    TenantSpecific,
    LevelopsInventorySchema,
    Global,
}

impl SchemaType {
    /// Schema name for descriptors that do not live in a tenant schema
    pub fn fixed_schema_name(&self) -> Option<&'static str> {
        match self {
            SchemaType::TenantSpecific => None,
            SchemaType::LevelopsInventorySchema => Some(LEVELOPS_INVENTORY_SCHEMA),
            SchemaType::Global => Some(GLOBAL_SCHEMA),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_serializes_as_plain_string() {
        let id = ServiceId::new("integration");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"integration\"");
        assert_eq!(id.to_string(), "integration");
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("acme"), "\"acme\"");
        assert_eq!(quote_ident("123abc"), "\"123abc\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_fixed_schema_names() {
        assert_eq!(SchemaType::TenantSpecific.fixed_schema_name(), None);
        assert_eq!(
            SchemaType::LevelopsInventorySchema.fixed_schema_name(),
            Some("_levelops")
        );
        assert_eq!(SchemaType::Global.fixed_schema_name(), Some("public"));
    }
}
