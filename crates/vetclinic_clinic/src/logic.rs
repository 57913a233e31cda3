// --- File: crates/vetclinic_clinic/src/logic.rs ---
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use vetclinic_common::models::ClinicConfiguration;
use vetclinic_common::{validation_error, Pagination, VetClinicError};
use vetclinic_db::{NewSpecialty, SpecialtyChanges, SpecialtyFilter};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MIN_APPOINTMENT_MINUTES: i64 = 5;
pub const MAX_APPOINTMENT_MINUTES: i64 = 480;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// --- Specialties ---

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Default, Deserialize)]
pub struct SpecialtyListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
    /// `true` or `false`
    pub active: Option<String>,
    /// Case-insensitive name substring
    pub search: Option<String>,
}

impl SpecialtyListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.limit.as_deref(), self.offset.as_deref())
    }

    pub fn filter(&self) -> Result<SpecialtyFilter, VetClinicError> {
        let is_active = match self.active.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_bool(raw).ok_or_else(|| {
                validation_error(format!("Invalid active: {}", raw))
            })?),
        };
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(SpecialtyFilter { is_active, search })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Deserialize)]
pub struct CreateSpecialtyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSpecialtyRequest {
    pub name: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Trims and checks a specialty name.
pub fn validate_name(raw: Option<&str>) -> Result<String, VetClinicError> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(validation_error("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(validation_error(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Trims a description; blank descriptions are stored as `None`.
pub fn validate_description(raw: Option<&str>) -> Result<Option<String>, VetClinicError> {
    let Some(description) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(validation_error(format!(
            "Description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(Some(description.to_string()))
}

impl CreateSpecialtyRequest {
    pub fn into_new_specialty(self, tenant_id: i64) -> Result<NewSpecialty, VetClinicError> {
        Ok(NewSpecialty {
            tenant_id,
            name: validate_name(self.name.as_deref())?,
            description: validate_description(self.description.as_deref())?,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

impl UpdateSpecialtyRequest {
    pub fn into_changes(self) -> Result<SpecialtyChanges, VetClinicError> {
        let name = match self.name {
            Some(raw) => Some(validate_name(Some(&raw))?),
            None => None,
        };
        let description = match self.description {
            Some(raw) => Some(validate_description(raw.as_deref())?),
            None => None,
        };
        Ok(SpecialtyChanges {
            name,
            description,
            is_active: self.is_active,
        })
    }
}

/// The submitted changes as recorded in the audit log.
pub fn specialty_changes_json(changes: &SpecialtyChanges) -> Value {
    let mut recorded = Map::new();
    if let Some(name) = &changes.name {
        recorded.insert("name".to_string(), Value::from(name.clone()));
    }
    if let Some(description) = &changes.description {
        recorded.insert("description".to_string(), Value::from(description.clone()));
    }
    if let Some(is_active) = changes.is_active {
        recorded.insert("is_active".to_string(), Value::from(is_active));
    }
    Value::Object(recorded)
}

// --- Clinic configuration ---

/// Partial update of the clinic configuration; absent fields keep their
/// current value.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClinicConfigurationRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub clinic_name: Option<Option<String>>,
    /// IANA zone name, e.g. "Europe/Berlin"
    pub timezone: Option<String>,
    /// ISO 4217 code, e.g. "EUR"
    pub currency: Option<String>,
    pub appointment_duration_minutes: Option<i64>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub business_hours: Option<Value>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub settings: Option<Value>,
}

pub fn validate_timezone(raw: &str) -> Result<String, VetClinicError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<Tz>()
        .map(|tz| tz.name().to_string())
        .map_err(|_| validation_error(format!("Invalid timezone: {}", trimmed)))
}

pub fn validate_currency(raw: &str) -> Result<String, VetClinicError> {
    let trimmed = raw.trim();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(validation_error(
            "Currency must be a three-letter ISO 4217 code",
        ))
    }
}

fn require_object(field: &str, value: Value) -> Result<Value, VetClinicError> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(validation_error(format!("{} must be a JSON object", field)))
    }
}

impl UpdateClinicConfigurationRequest {
    /// Validates the update and applies it on top of `current`.
    ///
    /// Returns the new configuration and the changed fields for the audit log.
    pub fn apply_to(
        self,
        current: &ClinicConfiguration,
    ) -> Result<(ClinicConfiguration, Value), VetClinicError> {
        let mut next = current.clone();
        let mut changed = Map::new();

        if let Some(name) = self.clinic_name {
            next.clinic_name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
            if let Some(n) = &next.clinic_name {
                if n.chars().count() > MAX_NAME_LEN {
                    return Err(validation_error(format!(
                        "clinic_name must be at most {} characters",
                        MAX_NAME_LEN
                    )));
                }
            }
        }
        if let Some(tz) = self.timezone {
            next.timezone = validate_timezone(&tz)?;
        }
        if let Some(currency) = self.currency {
            next.currency = validate_currency(&currency)?;
        }
        if let Some(minutes) = self.appointment_duration_minutes {
            if !(MIN_APPOINTMENT_MINUTES..=MAX_APPOINTMENT_MINUTES).contains(&minutes) {
                return Err(validation_error(format!(
                    "appointment_duration_minutes must be between {} and {}",
                    MIN_APPOINTMENT_MINUTES, MAX_APPOINTMENT_MINUTES
                )));
            }
            next.appointment_duration_minutes = minutes;
        }
        if let Some(hours) = self.business_hours {
            next.business_hours = require_object("business_hours", hours)?;
        }
        if let Some(settings) = self.settings {
            next.settings = require_object("settings", settings)?;
        }

        if next.clinic_name != current.clinic_name {
            changed.insert("clinic_name".to_string(), Value::from(next.clinic_name.clone()));
        }
        if next.timezone != current.timezone {
            changed.insert("timezone".to_string(), Value::from(next.timezone.clone()));
        }
        if next.currency != current.currency {
            changed.insert("currency".to_string(), Value::from(next.currency.clone()));
        }
        if next.appointment_duration_minutes != current.appointment_duration_minutes {
            changed.insert(
                "appointment_duration_minutes".to_string(),
                Value::from(next.appointment_duration_minutes),
            );
        }
        if next.business_hours != current.business_hours {
            changed.insert("business_hours".to_string(), next.business_hours.clone());
        }
        if next.settings != current.settings {
            changed.insert("settings".to_string(), next.settings.clone());
        }

        Ok((next, Value::Object(changed)))
    }
}
