use crate::error::SetupError;
use crate::model::{quote_ident, SCHEMA_PLACEHOLDER};
use crate::store::traits::SchemaStore;

pub const READONLY_ROLE: &str = "levelops_readonly";
pub const WRITE_ROLE: &str = "levelops_write";

/// Built-in grant templates. Role creation comes first; every later statement
/// is scoped to the `{schema}` placeholder.
pub const DEFAULT_GRANT_TEMPLATES: &[&str] = &[
    r#"DO $$
BEGIN
    IF NOT EXISTS (SELECT FROM pg_catalog.pg_roles WHERE rolname = 'levelops_readonly') THEN
        CREATE ROLE levelops_readonly;
    END IF;
END
$$"#,
    r#"DO $$
BEGIN
    IF NOT EXISTS (SELECT FROM pg_catalog.pg_roles WHERE rolname = 'levelops_write') THEN
        CREATE ROLE levelops_write;
    END IF;
END
$$"#,
    "GRANT USAGE ON SCHEMA {schema} TO levelops_readonly",
    "GRANT SELECT ON ALL TABLES IN SCHEMA {schema} TO levelops_readonly",
    "GRANT SELECT ON ALL SEQUENCES IN SCHEMA {schema} TO levelops_readonly",
    "ALTER DEFAULT PRIVILEGES IN SCHEMA {schema} GRANT SELECT ON TABLES TO GROUP levelops_readonly",
    "GRANT USAGE ON SCHEMA {schema} TO levelops_write",
    "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA {schema} TO levelops_write",
    "GRANT USAGE, SELECT, UPDATE ON ALL SEQUENCES IN SCHEMA {schema} TO levelops_write",
    "ALTER DEFAULT PRIVILEGES IN SCHEMA {schema} GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO GROUP levelops_write",
    "ALTER DEFAULT PRIVILEGES IN SCHEMA {schema} GRANT USAGE, SELECT, UPDATE ON SEQUENCES TO GROUP levelops_write",
];

/// Validated, ordered list of grant templates applied to every tenant schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantStatements {
    templates: Vec<String>,
}

impl GrantStatements {
    pub fn new(templates: Vec<String>) -> Result<Self, SetupError> {
        validate_grant_templates(&templates)?;
        Ok(Self { templates })
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub fn render(&self, schema: &str) -> Vec<String> {
        let schema = quote_ident(schema);
        self.templates
            .iter()
            .map(|template| template.replace(SCHEMA_PLACEHOLDER, &schema))
            .collect()
    }

    /// Execute every statement in order. The first failure aborts the rest.
    pub async fn apply<S: SchemaStore + ?Sized>(&self, store: &S, schema: &str) -> Result<(), SetupError> {
        for statement in self.render(schema) {
            store.execute_statement(&statement).await?;
        }
        log::info!(
            "[{}] Applied {} grant statement(s) for roles {} and {}",
            schema,
            self.templates.len(),
            READONLY_ROLE,
            WRITE_ROLE
        );
        Ok(())
    }
}

impl Default for GrantStatements {
    fn default() -> Self {
        Self {
            templates: DEFAULT_GRANT_TEMPLATES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Reject grant templates that cannot run as intended against PostgreSQL:
/// blank statements, unbalanced single quotes, schema-scoped grants without
/// the `{schema}` placeholder, and grants to a role that is only created
/// further down the list.
pub fn validate_grant_templates<T: AsRef<str>>(templates: &[T]) -> Result<(), SetupError> {
    if templates.is_empty() {
        return Err(SetupError::InvalidArgument(
            "Grant statement list is empty".to_string(),
        ));
    }

    for (index, template) in templates.iter().enumerate() {
        let template = template.as_ref();
        if template.trim().is_empty() {
            return Err(invalid(index, "statement is empty"));
        }
        if template.matches('\'').count() % 2 != 0 {
            return Err(invalid(index, "unbalanced single quote"));
        }
        if is_grant(template) && !template.contains(SCHEMA_PLACEHOLDER) {
            return Err(invalid(index, "grant is missing the {schema} placeholder"));
        }
    }

    for role in [READONLY_ROLE, WRITE_ROLE] {
        let created_at = templates
            .iter()
            .position(|t| creates_role(t.as_ref(), role));
        let first_grant = templates
            .iter()
            .position(|t| is_grant(t.as_ref()) && t.as_ref().contains(role));
        if let (Some(created_at), Some(first_grant)) = (created_at, first_grant) {
            if first_grant < created_at {
                return Err(invalid(
                    first_grant,
                    &format!("grants to role {} before it is created", role),
                ));
            }
        }
    }

    Ok(())
}

fn is_grant(template: &str) -> bool {
    let upper = template.trim_start().to_ascii_uppercase();
    upper.starts_with("GRANT") || upper.starts_with("ALTER DEFAULT PRIVILEGES")
}

fn creates_role(template: &str, role: &str) -> bool {
    template
        .to_ascii_uppercase()
        .contains(&format!("CREATE ROLE {}", role.to_ascii_uppercase()))
}

fn invalid(index: usize, reason: &str) -> SetupError {
    SetupError::InvalidArgument(format!("Grant statement #{}: {}", index + 1, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_default_templates_are_valid() {
        assert!(validate_grant_templates(DEFAULT_GRANT_TEMPLATES).is_ok());
        assert_eq!(
            GrantStatements::default().templates().len(),
            DEFAULT_GRANT_TEMPLATES.len()
        );
    }

    #[test]
    fn test_render_substitutes_schema() {
        let rendered = GrantStatements::default().render("acme");

        assert!(rendered[0].contains("CREATE ROLE levelops_readonly"));
        assert!(rendered
            .contains(&r#"GRANT SELECT ON ALL TABLES IN SCHEMA "acme" TO levelops_readonly"#.to_string()));
        assert!(rendered.iter().all(|s| !s.contains(SCHEMA_PLACEHOLDER)));

        let rendered = GrantStatements::default().render("123abc");
        assert!(rendered.contains(&r#"GRANT USAGE ON SCHEMA "123abc" TO levelops_write"#.to_string()));
    }

    #[test]
    fn test_stray_quote_is_rejected() {
        let templates = vec![
            "GRANT USAGE ON SCHEMA {schema} TO levelops_write".to_string(),
            "ALTER DEFAULT PRIVILEGES IN SCHEMA {schema} GRANT SELECT ON TABLES TO GROUP levelops_write'"
                .to_string(),
        ];

        let err = GrantStatements::new(templates).unwrap_err();
        assert!(err.to_string().contains("#2"));
        assert!(err.to_string().contains("unbalanced single quote"));
    }

    #[test]
    fn test_grant_without_placeholder_is_rejected() {
        let err = validate_grant_templates(&["GRANT USAGE ON SCHEMA acme TO levelops_readonly"]).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_empty_templates_are_rejected() {
        assert!(validate_grant_templates::<&str>(&[]).is_err());
        assert!(validate_grant_templates(&["  "]).is_err());
    }

    #[test]
    fn test_grant_before_role_creation_is_rejected() {
        let templates = [
            "GRANT USAGE ON SCHEMA {schema} TO levelops_write",
            "CREATE ROLE levelops_write",
        ];

        let err = validate_grant_templates(&templates).unwrap_err();
        assert!(err.to_string().contains("before it is created"));
    }

    #[tokio::test]
    async fn test_apply_executes_in_order() {
        let store = MemoryStore::new();
        let grants = GrantStatements::new(vec![
            "CREATE ROLE levelops_readonly".to_string(),
            "GRANT USAGE ON SCHEMA {schema} TO levelops_readonly".to_string(),
        ])
        .unwrap();

        grants.apply(&store, "acme").await.unwrap();

        assert_eq!(
            store.executed_statements(),
            vec![
                "CREATE ROLE levelops_readonly".to_string(),
                r#"GRANT USAGE ON SCHEMA "acme" TO levelops_readonly"#.to_string(),
            ]
        );
    }
}
