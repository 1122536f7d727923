//! Cross-module consistency validation.
//!
//! The validator consumes the immutable [`ContractIndex`] and the parsed
//! [`ManifestSet`] and produces a severity-sorted list of
//! [`Issue`](forge_core::Issue)s. Any ERROR blocks code generation.
//!
//! # Examples
//!
//! ```
//! use forge_core::{EventSpec, ManifestRecord};
//! use forge_manifest::{ContractIndex, ManifestSet};
//! use forge_validator::ConsistencyValidator;
//!
//! let mut display = ManifestRecord::new("Display");
//! display.events.subscribes.insert("z.w".into(), EventSpec::default());
//!
//! let set = ManifestSet::new(vec![display], vec![], vec![]);
//! let index = ContractIndex::build(&set.modules, &set.drivers);
//! let outcome = ConsistencyValidator::new(&index, &set).validate();
//!
//! assert!(outcome.has_fatal_errors());
//! assert_eq!(outcome.issues().len(), 1);
//! ```
//!
//! [`ContractIndex`]: forge_manifest::ContractIndex
//! [`ManifestSet`]: forge_manifest::ManifestSet

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod report;
mod resolver;
mod rules;
mod validator;

pub use report::{REPORT_JSON_FILE, REPORT_MARKDOWN_FILE, ValidationReport};
pub use resolver::DependencyResolver;
pub use validator::{ConsistencyValidator, ValidationOutcome};
