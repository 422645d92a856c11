//! VM Details Core Library
//!
//! This crate builds the display-ready details of a vCenter virtual machine:
//! compute, storage, network and provenance, flattened into labeled fields.
//!
//! # Overview
//!
//! A [`VirtualMachine`] from the vSphere inventory, together with the
//! [`DeploymentService`] it was created from, is turned into [`VmDetails`]
//! by a [`VmDetailsBuilder`]. The builder asks an [`IpResolver`] for the
//! VM's primary address so that the matching network entry can be flagged.
//!
//! # Modules
//!
//! - [`error`] - Error types and Result alias
//! - [`inventory`] - vSphere VM object model
//! - [`deployment`] - Deployment service descriptors and provenance fields
//! - [`details`] - Output value objects
//! - [`builder`] - Details builder
//! - [`ip`] - Primary IP resolution
//! - [`snapshot`] - Snapshot tree and current-snapshot path
//! - [`vlan`] - VLAN id representation
//! - [`units`] - Size formatting
//!
//! # Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//! use vmdetails_core::{DeploymentService, GuestIpResolver, VirtualMachine, VmDetailsBuilder};
//!
//! let vm = VirtualMachine::load(Path::new("/path/to/vm.json")).unwrap();
//! let deployment = DeploymentService::load(Path::new("/path/to/deployment.json")).unwrap();
//!
//! let details = VmDetailsBuilder::new(GuestIpResolver)
//!     .create(&vm, &vm.name, &HashMap::new(), &HashMap::new(), &deployment)
//!     .unwrap();
//! ```

pub mod builder;
pub mod deployment;
pub mod details;
pub mod error;
pub mod inventory;
pub mod ip;
pub mod snapshot;
pub mod units;
pub mod vlan;

pub use error::{Error, Result};

// Re-export the main entry points for convenience
pub use builder::VmDetailsBuilder;
pub use deployment::{DeploymentAttribute, DeploymentModel, DeploymentService};
pub use details::{VmDataField, VmDetails, VmNetworkData};
pub use inventory::{GuestNicInfo, Network, VirtualMachine};
pub use ip::{GuestIpResolver, IpMatchFunction, IpResolver, IpResult};
pub use snapshot::{SnapshotRef, SnapshotTree};
pub use vlan::VlanId;
