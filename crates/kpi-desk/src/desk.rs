//! The KPI desk
//!
//! Runs one user's session:
//!
//! ```text
//! gate → role → action → access filter → KPI + date → schema → form → write-back
//! ```
//!
//! Reference tables are read from the in-memory store on every action, so
//! a session always sees its own writes.

use crate::config::DeskConfig;
use crate::error::DeskError;
use chrono::NaiveDate;
use kpi_access::{AccessFilter, AccessView, CredentialGate, RoleResolver, TemplateResolver};
use kpi_form::{
    CellRegistry, Form, FormGenerator, FormSession, Notice, Prompt, Surface, ValidationError,
};
use kpi_literal::{Literal, LiteralMap};
use kpi_store::{KpiRecord, KpiSchema, KpiStore, RecordKey, RowVersion};

/// Date format of new value dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An admitted user and their role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Login identifier
    pub identifier: String,
    /// Resolved role id
    pub role_id: i64,
}

/// Entries of the action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Edit values of an existing (KPI, date)
    UpdateKpis,
    /// Record values for a new date
    EnterNew,
}

impl Action {
    /// All actions in menu order
    pub const ALL: [Self; 2] = [Self::UpdateKpis, Self::EnterNew];

    /// Menu label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UpdateKpis => "Update KPIs",
            Self::EnterNew => "Enter new value to KPIs",
        }
    }
}

/// How an action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A row was written
    Written {
        /// Row key
        key: RecordKey,
        /// Version of the new row
        version: RowVersion,
    },
    /// The user cancelled or declined; nothing was written
    Discarded,
    /// The role sees no KPI records
    NoAccess,
}

/// Role-gated KPI data entry over one data directory
#[derive(Debug)]
pub struct KpiDesk {
    config: DeskConfig,
    store: KpiStore,
    registry: CellRegistry,
}

impl KpiDesk {
    /// Load the store named by `config`
    ///
    /// # Errors
    /// Returns [`DeskError`] for invalid configuration or unreadable tables.
    pub fn open(config: DeskConfig) -> Result<Self, DeskError> {
        config.validate()?;
        let store = KpiStore::open(&config.data_dir, &config.tables, config.delimiter)?;
        Ok(Self {
            config,
            store,
            registry: CellRegistry::with_defaults(),
        })
    }

    /// With a custom cell registry
    #[must_use]
    pub fn with_registry(mut self, registry: CellRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &KpiStore {
        &self.store
    }

    /// Re-read every table from disk
    ///
    /// # Errors
    /// Returns [`DeskError::Store`] if a table became unreadable.
    pub fn reload(&mut self) -> Result<(), DeskError> {
        self.store.reload()?;
        Ok(())
    }

    /// Admit a user and resolve their role
    ///
    /// `Ok(None)` is a refusal, already reported on the surface.
    ///
    /// # Errors
    /// Returns [`DeskError`] if the user table cannot be decoded or the
    /// admitted user has no role.
    pub fn login(
        &self,
        identifier: &str,
        surface: &mut dyn Surface,
    ) -> Result<Option<Session>, DeskError> {
        let users = self.store.users()?;
        if !CredentialGate::from_users(&users).admit(identifier, surface) {
            return Ok(None);
        }
        let role_id = RoleResolver::new(&users).resolve(identifier)?;
        tracing::debug!(user = identifier, role = role_id, "resolved role");
        Ok(Some(Session {
            identifier: identifier.to_string(),
            role_id,
        }))
    }

    /// Show the action menu and run the chosen action
    ///
    /// # Errors
    /// Returns the chosen action's error.
    pub fn run(
        &mut self,
        session: &Session,
        surface: &mut dyn Surface,
    ) -> Result<Outcome, DeskError> {
        let labels: Vec<String> = Action::ALL.iter().map(|a| a.label().to_string()).collect();
        let Some(action) = surface
            .choose("Select what you want to do", &labels)
            .and_then(|i| Action::ALL.get(i).copied())
        else {
            return Ok(Outcome::Discarded);
        };
        match action {
            Action::UpdateKpis => self.update_kpi(session, surface),
            Action::EnterNew => self.enter_new(session, surface),
        }
    }

    /// Records the session's role may see, in table order
    ///
    /// # Errors
    /// Returns [`DeskError`] for an unknown role or a malformed allow list.
    pub fn accessible_records(&self, session: &Session) -> Result<Vec<KpiRecord>, DeskError> {
        let roles = self.store.roles()?;
        let records = self.store.kpi_records()?;
        Ok(AccessFilter::new(&roles).view(session.role_id, &records)?.records)
    }

    /// Edit the values of an existing (KPI, date)
    ///
    /// # Errors
    /// Returns [`DeskError`] for lookup, schema and write-back failures,
    /// including [`kpi_store::StoreError::VersionConflict`] if the row
    /// changed on disk during the edit.
    pub fn update_kpi(
        &mut self,
        session: &Session,
        surface: &mut dyn Surface,
    ) -> Result<Outcome, DeskError> {
        let view = self.access(session, surface)?;
        if view.is_empty() {
            return Ok(no_access(surface));
        }

        let Some(kpi_name) = choose_str(surface, "Select KPI", &view.kpi_names()) else {
            return Ok(Outcome::Discarded);
        };
        let dates = view.dates_for(&kpi_name);
        let Some(value_date) = choose_str(surface, "Select KPI date", &dates) else {
            return Ok(Outcome::Discarded);
        };

        let key = RecordKey::new(kpi_name, value_date);
        let record = view.record(&key)?.clone();
        let original = record.values().map_err(|source| DeskError::Values {
            key: key.to_string(),
            source,
        })?;
        let form = self.form_for(&key.kpi_name)?;
        form.check_values(&original)?;

        match FormSession::new(form, &original).run(surface) {
            Some(updated) => {
                let expected = Some(record.version());
                self.write(&key, &record.kpi_id, &updated, expected, surface)
            }
            None => Ok(Outcome::Discarded),
        }
    }

    /// Record values of an accessible KPI for a date it has no row for
    ///
    /// The date is asked until it is a valid `YYYY-MM-DD` date not yet
    /// recorded for the KPI. Fields left empty are stored as `None`.
    ///
    /// # Errors
    /// Returns [`DeskError`] for lookup, schema and write-back failures.
    pub fn enter_new(
        &mut self,
        session: &Session,
        surface: &mut dyn Surface,
    ) -> Result<Outcome, DeskError> {
        let view = self.access(session, surface)?;
        if view.is_empty() {
            return Ok(no_access(surface));
        }

        let Some(kpi_name) = choose_str(surface, "Select KPI", &view.kpi_names()) else {
            return Ok(Outcome::Discarded);
        };
        let kpi_id = view
            .kpi_id_for(&kpi_name)
            .map(str::to_string)
            .ok_or_else(|| kpi_access::AccessError::KpiNotFound {
                kpi_name: kpi_name.clone(),
            })?;

        let form = self.form_for(&kpi_name)?;
        let Some(value_date) = self.prompt_new_date(&kpi_name, surface)? else {
            return Ok(Outcome::Discarded);
        };
        let key = RecordKey::new(kpi_name, value_date);

        let blank: LiteralMap = form
            .labels()
            .into_iter()
            .map(|label| (label.to_string(), Literal::None))
            .collect();
        let session = FormSession::new(form, &blank).with_confirm_label("Save new values");
        match session.run(surface) {
            Some(values) => self.write(&key, &kpi_id, &values, None, surface),
            None => Ok(Outcome::Discarded),
        }
    }

    fn access(
        &self,
        session: &Session,
        surface: &mut dyn Surface,
    ) -> Result<AccessView, DeskError> {
        let roles = self.store.roles()?;
        let records = self.store.kpi_records()?;
        Ok(AccessFilter::new(&roles).execute(session.role_id, &records, surface)?)
    }

    fn schema_for(&self, kpi_name: &str) -> Result<KpiSchema, DeskError> {
        let schemas = self.store.schemas()?;
        Ok(TemplateResolver::new(&schemas).resolve(kpi_name)?)
    }

    fn form_for(&self, kpi_name: &str) -> Result<Form, DeskError> {
        let schema = self.schema_for(kpi_name)?;
        Ok(FormGenerator::new(&self.registry).generate(&schema)?)
    }

    fn prompt_new_date(
        &self,
        kpi_name: &str,
        surface: &mut dyn Surface,
    ) -> Result<Option<String>, DeskError> {
        let prompt = Prompt::new("KPI value date").with_placeholder("Example: YYYY-MM-DD");
        loop {
            let Some(raw) = surface.prompt(&prompt) else {
                return Ok(None);
            };
            let date = match parse_value_date(&raw) {
                Ok(date) => date,
                Err(err) if !err.is_fatal() => {
                    surface.notify(Notice::error(format!(
                        "The input value '{}' is not valid.",
                        raw.trim()
                    )));
                    continue;
                }
                Err(err) => return Err(err),
            };
            let key = RecordKey::new(kpi_name, date.clone());
            if self.store.find(&key)?.is_some() {
                surface.notify(Notice::error(format!(
                    "{kpi_name} already has a value dated {date}"
                )));
                continue;
            }
            return Ok(Some(date));
        }
    }

    fn write(
        &mut self,
        key: &RecordKey,
        kpi_id: &str,
        values: &LiteralMap,
        expected: Option<RowVersion>,
        surface: &mut dyn Surface,
    ) -> Result<Outcome, DeskError> {
        match self.store.upsert(key, kpi_id, values, expected) {
            Ok(version) => {
                surface.notify(Notice::success("KPI data updated successfully!"));
                Ok(Outcome::Written {
                    key: key.clone(),
                    version,
                })
            }
            Err(err) => {
                let err = DeskError::from(err);
                if err.is_conflict() {
                    surface.notify(Notice::error(format!(
                        "{key} was changed by someone else; nothing was saved"
                    )));
                }
                tracing::error!(key = %key, error = %err, "write-back failed");
                Err(err)
            }
        }
    }
}

/// Parse a `YYYY-MM-DD` date and return it in canonical form
///
/// # Errors
/// Returns [`DeskError::Validation`].
pub fn parse_value_date(raw: &str) -> Result<String, DeskError> {
    let input = raw.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| {
            DeskError::Validation(ValidationError::NotADate {
                input: input.to_string(),
                expected: "YYYY-MM-DD",
            })
        })
}

fn choose_str(surface: &mut dyn Surface, label: &str, options: &[&str]) -> Option<String> {
    let owned: Vec<String> = options.iter().map(|o| (*o).to_string()).collect();
    let index = surface.choose(label, &owned)?;
    owned.into_iter().nth(index)
}

fn no_access(surface: &mut dyn Surface) -> Outcome {
    surface.notify(Notice::warning("No KPIs are available for your role"));
    Outcome::NoAccess
}
