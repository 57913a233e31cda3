//! Builder for tenant-scoped WHERE clauses with numbered placeholders.

use sqlx::any::AnyArguments;
use sqlx::query::{Query, QueryScalar};
use sqlx::Any;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    Int(i64),
    Text(String),
}

/// Conditions joined with AND. The first one always restricts `tenant_id`.
#[derive(Debug, Clone)]
pub(crate) struct SqlFilter {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl SqlFilter {
    pub(crate) fn for_tenant(tenant_id: i64) -> Self {
        let mut filter = Self {
            conditions: Vec::new(),
            binds: Vec::new(),
        };
        filter.push("tenant_id = {}", BindValue::Int(tenant_id));
        filter
    }

    /// Adds a condition; `{}` in `template` becomes the next placeholder.
    pub(crate) fn push(&mut self, template: &str, value: BindValue) {
        self.binds.push(value);
        let placeholder = format!("${}", self.binds.len());
        self.conditions.push(template.replace("{}", &placeholder));
    }

    pub(crate) fn where_sql(&self) -> String {
        format!(" WHERE {}", self.conditions.join(" AND "))
    }

    /// Placeholder number for the first value bound after the filter.
    pub(crate) fn next_placeholder(&self) -> usize {
        self.binds.len() + 1
    }

    pub(crate) fn bind_to<'q>(
        &self,
        mut query: Query<'q, Any, AnyArguments<'q>>,
    ) -> Query<'q, Any, AnyArguments<'q>> {
        for value in &self.binds {
            query = match value {
                BindValue::Int(v) => query.bind(*v),
                BindValue::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }

    pub(crate) fn bind_scalar<'q, O>(
        &self,
        mut query: QueryScalar<'q, Any, O, AnyArguments<'q>>,
    ) -> QueryScalar<'q, Any, O, AnyArguments<'q>> {
        for value in &self.binds {
            query = match value {
                BindValue::Int(v) => query.bind(*v),
                BindValue::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }
}

/// Escapes LIKE wildcards in user input; pair with `ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
