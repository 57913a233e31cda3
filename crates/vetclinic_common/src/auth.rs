// --- File: crates/vetclinic_common/src/auth.rs ---

//! Tenant and permission context for every authenticated request.
//!
//! Identity is established by the upstream gateway, which forwards the
//! tenant, user and granted permissions as headers. Handlers take an
//! [`AuthContext`] argument and call [`AuthContext::require`] before doing
//! any work.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use tracing::warn;

use crate::error::{forbidden, VetClinicError};

pub const TENANT_HEADER: &str = "X-Tenant-Id";
pub const USER_HEADER: &str = "X-User-Id";
pub const PERMISSIONS_HEADER: &str = "X-User-Permissions";
const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";
const USER_AGENT_HEADER: &str = "User-Agent";

/// Permission names checked by the controllers.
pub mod permissions {
    pub const AUDIT_LOGS_READ: &str = "audit_logs.read";
    pub const BILLING_READ: &str = "billing.read";
    pub const BILLING_MANAGE: &str = "billing.manage";
    pub const SPECIALTIES_READ: &str = "specialties.read";
    pub const SPECIALTIES_WRITE: &str = "specialties.write";
    pub const CLINIC_READ: &str = "clinic.read";
    pub const CLINIC_WRITE: &str = "clinic.write";
    pub const STATS_READ: &str = "stats.read";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub tenant_id: i64,
    pub user_id: Option<i64>,
    pub permissions: Vec<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl AuthContext {
    /// Builds the context from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, VetClinicError> {
        let tenant_raw = header_str(headers, TENANT_HEADER).ok_or_else(|| {
            VetClinicError::AuthError(format!("Missing {} header", TENANT_HEADER))
        })?;
        let tenant_id = tenant_raw
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| VetClinicError::AuthError(format!("Invalid {} header", TENANT_HEADER)))?;

        let user_id = match header_str(headers, USER_HEADER) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!("Ignoring non-numeric {} header: {}", USER_HEADER, raw);
                    None
                }
            },
            None => None,
        };

        let permissions = header_str(headers, PERMISSIONS_HEADER)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        // First hop of X-Forwarded-For is the client.
        let ip_address = header_str(headers, FORWARDED_FOR_HEADER)
            .and_then(|raw| raw.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string);

        Ok(Self {
            tenant_id,
            user_id,
            permissions,
            ip_address,
            user_agent: header_str(headers, USER_AGENT_HEADER).map(str::to_string),
        })
    }

    /// `true` if `permission` is granted exactly, through `*`, or through
    /// `<resource>.*`.
    pub fn has_permission(&self, permission: &str) -> bool {
        let resource = permission.split('.').next().unwrap_or(permission);
        self.permissions.iter().any(|granted| {
            granted == "*"
                || granted == permission
                || granted
                    .strip_suffix(".*")
                    .is_some_and(|prefix| prefix == resource)
        })
    }

    /// Fails with 403 unless `permission` is granted.
    pub fn require(&self, permission: &str) -> Result<(), VetClinicError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            warn!(
                tenant_id = self.tenant_id,
                user_id = ?self.user_id,
                "Permission denied: {}",
                permission
            );
            Err(forbidden(format!("Missing permission: {}", permission)))
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = VetClinicError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        AuthContext::from_headers(&parts.headers)
    }
}
