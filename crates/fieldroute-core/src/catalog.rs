use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schedule::WeeklySchedule;
use crate::store::{validate_tier, Coordinates, Store};
use crate::weekday::Weekday;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub id: String,
    pub name: String,
    pub tier: Option<i16>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StoreConfig {
    #[must_use]
    pub fn to_store(&self) -> Store {
        Store {
            id: self.id.clone(),
            name: self.name.clone(),
            tier: self.tier,
            coordinates: Coordinates::from_parts(self.latitude, self.longitude),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    /// The zonal manager this supervisor reports to.
    pub manager_id: String,
}

/// Initial planned days for one (supervisor, store) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitPlanConfig {
    pub supervisor_id: String,
    pub store_id: String,
    pub days: Vec<Weekday>,
}

/// Reference data loaded into the database by `db seed`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub stores: Vec<StoreConfig>,
    #[serde(default)]
    pub managers: Vec<ManagerConfig>,
    #[serde(default)]
    pub supervisors: Vec<SupervisorConfig>,
    #[serde(default)]
    pub visits: Vec<VisitPlanConfig>,
}

impl CatalogFile {
    /// Groups the initial visit plans into one schedule per supervisor, in
    /// file order.
    #[must_use]
    pub fn initial_schedules(&self) -> BTreeMap<String, WeeklySchedule> {
        let mut schedules: BTreeMap<String, WeeklySchedule> = BTreeMap::new();
        for plan in &self.visits {
            let schedule = schedules.entry(plan.supervisor_id.clone()).or_default();
            for day in &plan.days {
                schedule.insert(plan.store_id.clone(), *day);
            }
        }
        schedules
    }
}

/// Load and validate the reference catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML held in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    let mut store_ids = HashSet::new();
    for store in &catalog.stores {
        require_non_empty("store id", &store.id)?;
        require_non_empty("store name", &store.name)?;
        if !store_ids.insert(store.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store id: '{}'",
                store.id
            )));
        }
        if let Some(tier) = store.tier {
            validate_tier(tier).map_err(|e| {
                ConfigError::Validation(format!("store '{}' has {e}", store.id))
            })?;
        }
        match (store.latitude, store.longitude) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::Validation(format!(
                    "store '{}' must set both latitude and longitude, or neither",
                    store.id
                )));
            }
            _ => {}
        }
        if let Some(coords) = Coordinates::from_parts(store.latitude, store.longitude) {
            if !coords.is_valid() {
                return Err(ConfigError::Validation(format!(
                    "store '{}' has out-of-range coordinates",
                    store.id
                )));
            }
        }
    }

    let mut manager_ids = HashSet::new();
    for manager in &catalog.managers {
        require_non_empty("manager id", &manager.id)?;
        require_non_empty("manager name", &manager.name)?;
        if !manager_ids.insert(manager.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate manager id: '{}'",
                manager.id
            )));
        }
    }

    let mut supervisor_ids = HashSet::new();
    for supervisor in &catalog.supervisors {
        require_non_empty("supervisor id", &supervisor.id)?;
        require_non_empty("supervisor name", &supervisor.name)?;
        if !supervisor_ids.insert(supervisor.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate supervisor id: '{}'",
                supervisor.id
            )));
        }
        if !manager_ids.contains(supervisor.manager_id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "supervisor '{}' reports to unknown manager '{}'",
                supervisor.id, supervisor.manager_id
            )));
        }
    }

    let mut planned_pairs = HashSet::new();
    for plan in &catalog.visits {
        if !supervisor_ids.contains(plan.supervisor_id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "visit plan references unknown supervisor '{}'",
                plan.supervisor_id
            )));
        }
        if !store_ids.contains(plan.store_id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "visit plan references unknown store '{}'",
                plan.store_id
            )));
        }
        if !planned_pairs.insert((plan.supervisor_id.as_str(), plan.store_id.as_str())) {
            return Err(ConfigError::Validation(format!(
                "duplicate visit plan for supervisor '{}' and store '{}'",
                plan.supervisor_id, plan.store_id
            )));
        }
    }

    Ok(())
}

fn require_non_empty(what: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{what} must be non-empty")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
