//! Role-based KPI filtering

use crate::error::AccessError;
use kpi_form::{Notice, Surface};
use kpi_literal::parse_list;
use kpi_store::{KpiRecord, RecordKey, RoleRecord};

/// Decode a role's allow list
///
/// Items may be strings or integers; integers are compared by their decimal
/// text. A malformed list is an error, never a partial list.
///
/// # Errors
/// Returns [`AccessError::AllowList`] or [`AccessError::AllowListItem`].
pub fn allowed_ids(role: &RoleRecord) -> Result<Vec<String>, AccessError> {
    let items = parse_list(&role.allowed_kpis_text).map_err(|source| AccessError::AllowList {
        role_id: role.role_id,
        source,
    })?;
    items
        .iter()
        .map(|item| {
            item.as_identifier().ok_or(AccessError::AllowListItem {
                role_id: role.role_id,
                found: item.kind_name(),
            })
        })
        .collect()
}

/// Records whose id is in `allowed`, in their original order
#[must_use]
pub fn filter_records(allowed: &[String], records: &[KpiRecord]) -> Vec<KpiRecord> {
    records
        .iter()
        .filter(|r| allowed.iter().any(|id| *id == r.kpi_id))
        .cloned()
        .collect()
}

/// What one role may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessView {
    /// Role display name
    pub role_name: String,
    /// Decoded allow list
    pub allowed_ids: Vec<String>,
    /// Accessible records in table order
    pub records: Vec<KpiRecord>,
}

impl AccessView {
    /// Whether nothing is accessible
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct KPI names, first-seen order
    #[must_use]
    pub fn kpi_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.kpi_name.as_str()) {
                names.push(&record.kpi_name);
            }
        }
        names
    }

    /// Distinct dates recorded for a KPI, first-seen order
    #[must_use]
    pub fn dates_for(&self, kpi_name: &str) -> Vec<&str> {
        let mut dates: Vec<&str> = Vec::new();
        for record in self.records.iter().filter(|r| r.kpi_name == kpi_name) {
            if !dates.contains(&record.value_date.as_str()) {
                dates.push(&record.value_date);
            }
        }
        dates
    }

    /// KPI id used by the rows of a KPI name
    #[must_use]
    pub fn kpi_id_for(&self, kpi_name: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.kpi_name == kpi_name)
            .map(|r| r.kpi_id.as_str())
    }

    /// The accessible record for a key
    ///
    /// # Errors
    /// Returns [`AccessError::KpiNotFound`] if the KPI is not accessible at
    /// all, and [`AccessError::DateNotFound`] if it has no row on that date.
    pub fn record(&self, key: &RecordKey) -> Result<&KpiRecord, AccessError> {
        let mut same_kpi = self
            .records
            .iter()
            .filter(|r| r.kpi_name == key.kpi_name)
            .peekable();
        if same_kpi.peek().is_none() {
            return Err(AccessError::KpiNotFound {
                kpi_name: key.kpi_name.clone(),
            });
        }
        same_kpi
            .find(|r| r.value_date == key.value_date)
            .ok_or_else(|| AccessError::DateNotFound {
                kpi_name: key.kpi_name.clone(),
                value_date: key.value_date.clone(),
            })
    }
}

/// Maps a role to the KPI records it may see
#[derive(Debug, Clone, Copy)]
pub struct AccessFilter<'a> {
    roles: &'a [RoleRecord],
}

impl<'a> AccessFilter<'a> {
    /// Create filter over the role table
    #[inline]
    #[must_use]
    pub fn new(roles: &'a [RoleRecord]) -> Self {
        Self { roles }
    }

    /// Role row by exact id
    ///
    /// # Errors
    /// Returns [`AccessError::RoleNotFound`].
    pub fn role(&self, role_id: i64) -> Result<&'a RoleRecord, AccessError> {
        self.roles
            .iter()
            .find(|r| r.role_id == role_id)
            .ok_or(AccessError::RoleNotFound { role_id })
    }

    /// Resolve the role, decode its allow list and filter `records`
    ///
    /// Tells the user which role is active.
    ///
    /// # Errors
    /// Returns [`AccessError`] for an unknown role or a bad allow list.
    pub fn execute(
        &self,
        role_id: i64,
        records: &[KpiRecord],
        surface: &mut dyn Surface,
    ) -> Result<AccessView, AccessError> {
        let view = self.view(role_id, records)?;
        surface.notify(Notice::info(format!(
            "Your current role is: {}",
            view.role_name
        )));
        Ok(view)
    }

    /// Same as [`AccessFilter::execute`] without notifying anyone
    ///
    /// # Errors
    /// Returns [`AccessError`] for an unknown role or a bad allow list.
    pub fn view(&self, role_id: i64, records: &[KpiRecord]) -> Result<AccessView, AccessError> {
        let role = self.role(role_id)?;
        let allowed = allowed_ids(role)?;
        let records = filter_records(&allowed, records);
        tracing::debug!(
            role = role_id,
            allowed = ?allowed,
            kept = records.len(),
            "filtered KPI records"
        );
        Ok(AccessView {
            role_name: role.role_name.clone(),
            allowed_ids: allowed,
            records,
        })
    }
}
