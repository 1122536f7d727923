//! Cross-module contract index.
//!
//! The index is built once per run from the parsed records and is
//! read-only afterwards. All tables are keyed by ordered maps, so the
//! index is independent of the order in which records were supplied.

use forge_core::{AccessLevel, ApiBinding, DriverRecord, ManifestKind, ManifestRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Contract key to the set of module names involved.
pub type ModuleTable = BTreeMap<String, BTreeSet<String>>;

/// One registration of an RPC method.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ApiOwner {
    /// Module or driver name
    pub owner: String,
    /// Whether the owner is a module or a driver
    pub kind: ManifestKind,
    /// C++ handler expression
    pub handler: String,
    /// Required access level
    pub access_level: AccessLevel,
}

/// Global publisher/subscriber and API ownership tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContractIndex {
    event_publishers: ModuleTable,
    event_subscribers: ModuleTable,
    state_publishers: ModuleTable,
    state_subscribers: ModuleTable,
    api_owners: BTreeMap<String, Vec<ApiOwner>>,
}

impl ContractIndex {
    /// Aggregates the contracts of every record.
    ///
    /// Drivers contribute API registrations only.
    ///
    /// # Examples
    ///
    /// ```
    /// use forge_core::{EventSpec, ManifestRecord};
    /// use forge_manifest::ContractIndex;
    ///
    /// let mut sensors = ManifestRecord::new("Sensors");
    /// sensors.events.publishes.insert("sensor.updated".into(), EventSpec::default());
    /// let mut display = ManifestRecord::new("Display");
    /// display.events.subscribes.insert("sensor.updated".into(), EventSpec::default());
    ///
    /// let index = ContractIndex::build(&[sensors, display], &[]);
    /// assert!(index.event_publishers()["sensor.updated"].contains("Sensors"));
    /// assert!(index.event_subscribers()["sensor.updated"].contains("Display"));
    /// ```
    #[must_use]
    pub fn build(modules: &[ManifestRecord], drivers: &[DriverRecord]) -> Self {
        let mut index = Self::default();

        for module in modules {
            let name = &module.name;
            insert_all(&mut index.event_publishers, module.events.publishes.keys(), name);
            insert_all(&mut index.event_subscribers, module.events.subscribes.keys(), name);
            insert_all(&mut index.state_publishers, module.shared_state.publishes.keys(), name);
            insert_all(&mut index.state_subscribers, module.shared_state.subscribes.keys(), name);

            for api in &module.apis {
                index.add_api(api, name, ManifestKind::Module);
            }
        }

        for driver in drivers {
            for api in &driver.apis {
                index.add_api(api, &driver.name, ManifestKind::Driver);
            }
        }

        for owners in index.api_owners.values_mut() {
            owners.sort();
        }

        debug!(
            "Indexed {} event(s), {} state key(s), {} API method(s)",
            index.events().len(),
            index.states().len(),
            index.api_owners.len()
        );
        index
    }

    fn add_api(&mut self, api: &ApiBinding, owner: &str, kind: ManifestKind) {
        self.api_owners
            .entry(api.method.clone())
            .or_default()
            .push(ApiOwner {
                owner: owner.to_string(),
                kind,
                handler: api.handler.clone(),
                access_level: api.access_level.clone(),
            });
    }

    /// Event name to publishing modules.
    #[must_use]
    pub const fn event_publishers(&self) -> &ModuleTable {
        &self.event_publishers
    }

    /// Event name to subscribing modules.
    #[must_use]
    pub const fn event_subscribers(&self) -> &ModuleTable {
        &self.event_subscribers
    }

    /// State key to writing modules.
    #[must_use]
    pub const fn state_publishers(&self) -> &ModuleTable {
        &self.state_publishers
    }

    /// State key to reading modules.
    #[must_use]
    pub const fn state_subscribers(&self) -> &ModuleTable {
        &self.state_subscribers
    }

    /// RPC method to every registration of it.
    #[must_use]
    pub const fn api_owners(&self) -> &BTreeMap<String, Vec<ApiOwner>> {
        &self.api_owners
    }

    /// Every event name that is published or subscribed, sorted.
    #[must_use]
    pub fn events(&self) -> BTreeSet<&str> {
        self.event_publishers
            .keys()
            .chain(self.event_subscribers.keys())
            .map(String::as_str)
            .collect()
    }

    /// Every state key that is written or read, sorted.
    #[must_use]
    pub fn states(&self) -> BTreeSet<&str> {
        self.state_publishers
            .keys()
            .chain(self.state_subscribers.keys())
            .map(String::as_str)
            .collect()
    }

    /// Returns `true` if no module declares any contract.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event_publishers.is_empty()
            && self.event_subscribers.is_empty()
            && self.state_publishers.is_empty()
            && self.state_subscribers.is_empty()
            && self.api_owners.is_empty()
    }
}

fn insert_all<'a>(table: &mut ModuleTable, keys: impl Iterator<Item = &'a String>, module: &str) {
    for key in keys {
        table
            .entry(key.clone())
            .or_default()
            .insert(module.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{EventSpec, StateSpec};

    fn api(method: &str, handler: &str) -> ApiBinding {
        ApiBinding {
            method: method.to_string(),
            handler: handler.to_string(),
            access_level: AccessLevel::default(),
        }
    }

    fn sample() -> (Vec<ManifestRecord>, Vec<DriverRecord>) {
        let mut sensors = ManifestRecord::new("Sensors");
        sensors
            .events
            .publishes
            .insert("sensor.updated".into(), EventSpec::default());
        sensors
            .shared_state
            .publishes
            .insert("temp.evap".into(), StateSpec::default());
        sensors.apis.push(api("sensors.read", "SensorRpc::read"));

        let mut display = ManifestRecord::new("Display");
        display
            .events
            .subscribes
            .insert("sensor.updated".into(), EventSpec::default());
        display
            .shared_state
            .subscribes
            .insert("temp.evap".into(), StateSpec::default());
        display
            .shared_state
            .subscribes
            .insert("door.open".into(), StateSpec::default());

        let mut driver = DriverRecord::new("NTC");
        driver.apis.push(api("sensors.read", "Ntc::read"));

        (vec![sensors, display], vec![driver])
    }

    #[test]
    fn test_build_tables() {
        let (modules, drivers) = sample();
        let index = ContractIndex::build(&modules, &drivers);

        assert_eq!(index.event_publishers()["sensor.updated"].len(), 1);
        assert!(index.state_subscribers()["door.open"].contains("Display"));
        assert!(!index.state_publishers().contains_key("door.open"));
        assert_eq!(
            index.states().into_iter().collect::<Vec<_>>(),
            vec!["door.open", "temp.evap"]
        );
        assert_eq!(index.events().len(), 1);
    }

    #[test]
    fn test_api_owners_keep_every_registration() {
        let (modules, drivers) = sample();
        let index = ContractIndex::build(&modules, &drivers);
        let owners = &index.api_owners()["sensors.read"];
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].owner, "NTC");
        assert_eq!(owners[0].kind, ManifestKind::Driver);
        assert_eq!(owners[1].owner, "Sensors");
    }

    #[test]
    fn test_order_independent() {
        let (mut modules, mut drivers) = sample();
        let forward = ContractIndex::build(&modules, &drivers);
        modules.reverse();
        drivers.reverse();
        let backward = ContractIndex::build(&modules, &drivers);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_index() {
        let index = ContractIndex::build(&[ManifestRecord::new("Idle")], &[]);
        assert!(index.is_empty());
    }
}
