//! Display-ready VM details.
//!
//! These are the value objects handed to the orchestration layer. Field
//! order within every sequence is display order.

use serde::{Deserialize, Serialize};

pub const CURRENT_SNAPSHOT_KEY: &str = "Current Snapshot";
pub const CPU_KEY: &str = "CPU";
pub const MEMORY_KEY: &str = "Memory";
pub const DISK_SIZE_KEY: &str = "Disk Size";
pub const GUEST_OS_KEY: &str = "Guest OS";
pub const MAC_ADDRESS_KEY: &str = "MAC Address";
pub const VLAN_NAME_KEY: &str = "VLAN Name";
pub const RESERVED_NETWORK_KEY: &str = "Reserved Network";
pub const IP_KEY: &str = "IP";

/// A single labeled attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmDataField {
    pub key: String,
    pub value: String,
    /// Hidden fields are carried but not shown to the user.
    #[serde(default)]
    pub hidden: bool,
}

impl VmDataField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            hidden: false,
        }
    }

    /// A field that is not shown to the user.
    pub fn hidden(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(key, value)
        }
    }
}

/// Display form of a boolean field value.
pub fn bool_to_str(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Network data for one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmNetworkData {
    /// MAC address of the interface.
    pub interface_id: String,
    /// VLAN id of the connected network.
    pub network_id: String,
    /// Whether the interface carries the VM's primary IP.
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub network_data: Vec<VmDataField>,
}

/// Everything shown about a VM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmDetails {
    pub app_name: String,
    /// Set by the caller when the details could not be built.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub vm_instance_data: Vec<VmDataField>,
    #[serde(default)]
    pub vm_network_data: Vec<VmNetworkData>,
}

impl VmDetails {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    /// Details carrying only an error message.
    pub fn failed(app_name: impl Into<String>, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(app_name)
        }
    }

    /// Look up an instance field by key.
    pub fn instance_field(&self, key: &str) -> Option<&VmDataField> {
        self.vm_instance_data.iter().find(|field| field.key == key)
    }

    /// The network entry carrying the primary IP, if any.
    pub fn primary_network(&self) -> Option<&VmNetworkData> {
        self.vm_network_data.iter().find(|network| network.is_primary)
    }
}

impl VmNetworkData {
    /// Look up a network field by key.
    pub fn field(&self, key: &str) -> Option<&VmDataField> {
        self.network_data.iter().find(|field| field.key == key)
    }
}
