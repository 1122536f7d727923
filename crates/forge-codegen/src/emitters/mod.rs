//! Built-in emitters, one per artifact.

mod api_registry;
mod contract;
mod docs;
mod event_helpers;
mod module_info;
mod ui;

pub use api_registry::{API_REGISTRY_FILE, ApiRegistryEmitter};
pub use contract::{SYSTEM_CONTRACT_FILE, SystemContractEmitter};
pub use docs::{
    EVENTS_DOC_FILE, EventsDocEmitter, README_FILE, ReadmeEmitter, STATES_DOC_FILE,
    StatesDocEmitter,
};
pub use event_helpers::{EVENT_HELPERS_FILE, EventHelperEmitter};
pub use module_info::{MODULE_INFO_FILE, ModuleInfoEmitter};
pub use ui::{
    COMPONENT_FACTORIES_FILE, ComponentFactoryEmitter, UI_COMPONENTS_FILE, UiComponent,
    UiRegistryEmitter, collect_components,
};
