// --- File: crates/vetclinic_audit/src/logic.rs ---
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use vetclinic_common::models::NewAuditLog;
use vetclinic_common::{validation_error, Pagination, VetClinicError};
use vetclinic_db::{AuditLogFilter, AuditLogRepository};

/// Query string of `GET /audit-logs`. Values stay raw strings so that bad
/// pagination input falls back to defaults instead of failing the request.
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    /// RFC 3339 or unix seconds
    pub from: Option<String>,
    /// RFC 3339 or unix seconds
    pub to: Option<String>,
}

impl AuditLogQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.limit.as_deref(), self.offset.as_deref())
    }

    /// Builds the repository filter from the whitelisted parameters.
    pub fn filter(&self) -> Result<AuditLogFilter, VetClinicError> {
        let filter = AuditLogFilter {
            user_id: parse_id("user_id", self.user_id.as_deref())?,
            action: non_empty(self.action.as_deref()),
            entity_type: non_empty(self.entity_type.as_deref()),
            entity_id: parse_id("entity_id", self.entity_id.as_deref())?,
            from: parse_timestamp("from", self.from.as_deref())?,
            to: parse_timestamp("to", self.to.as_deref())?,
        };

        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(validation_error("'from' must not be after 'to'"));
            }
        }
        Ok(filter)
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_id(name: &str, raw: Option<&str>) -> Result<Option<i64>, VetClinicError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| validation_error(format!("Invalid {}: {}", name, value))),
    }
}

/// Accepts RFC 3339 (`2024-05-01T00:00:00Z`) or unix seconds.
pub fn parse_timestamp(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, VetClinicError> {
    let Some(value) = non_empty(raw) else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(Some)
        .ok_or_else(|| validation_error(format!("Invalid '{}' timestamp: {}", name, value)))
}

/// Stores an audit entry for a mutation that already succeeded.
///
/// A failure here is logged and swallowed; the mutation's response must not
/// depend on it.
pub async fn record_quietly<R: AuditLogRepository>(repo: &R, entry: NewAuditLog) {
    let action = entry.action.clone();
    let tenant_id = entry.tenant_id;
    if let Err(e) = repo.record(entry).await {
        warn!(
            "Failed to record audit log '{}' for tenant {}: {}",
            action, tenant_id, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vetclinic_common::HttpStatusCode;

    #[test]
    fn test_filter_whitelist() {
        let query = AuditLogQuery {
            user_id: Some("12".into()),
            action: Some(" specialty.created ".into()),
            entity_type: Some("".into()),
            from: Some("2024-05-01T00:00:00Z".into()),
            to: Some("1714608000".into()),
            ..Default::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.user_id, Some(12));
        assert_eq!(filter.action.as_deref(), Some("specialty.created"));
        assert_eq!(filter.entity_type, None);
        assert_eq!(filter.from, Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
        assert_eq!(filter.to, Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_user = AuditLogQuery {
            user_id: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(bad_user.filter().unwrap_err().status_code(), 400);

        let bad_time = AuditLogQuery {
            from: Some("yesterday".into()),
            ..Default::default()
        };
        assert_eq!(bad_time.filter().unwrap_err().status_code(), 400);

        let inverted = AuditLogQuery {
            from: Some("2024-06-01T00:00:00Z".into()),
            to: Some("2024-05-01T00:00:00Z".into()),
            ..Default::default()
        };
        assert_eq!(inverted.filter().unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_pagination_from_query() {
        let query = AuditLogQuery {
            limit: Some("9999".into()),
            offset: Some("oops".into()),
            ..Default::default()
        };
        assert_eq!(query.pagination(), Pagination { limit: 500, offset: 0 });
    }
}
