//! vSphere inventory model.
//!
//! This module holds the subset of the vSphere `VirtualMachine` object graph
//! needed to describe a VM: summary configuration, hardware devices, guest
//! networking, snapshot tree and attached networks. Field names follow the
//! vSphere API so that inventory dumps deserialize directly.

use crate::error::{Error, Result};
use crate::snapshot::{snapshot_path, SnapshotInfo, SnapshotTree};
use crate::vlan::VlanId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A virtual machine as reported by vCenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    /// Inventory name of the VM.
    #[serde(default)]
    pub name: String,
    /// Summary of the VM configuration.
    pub summary: VmSummary,
    /// Full configuration; absent while the VM is being created.
    #[serde(default)]
    pub config: Option<VmConfigInfo>,
    /// State reported by the guest agent.
    #[serde(default)]
    pub guest: GuestInfo,
    /// Snapshot state; absent when the VM has no snapshots.
    #[serde(default)]
    pub snapshot: Option<SnapshotInfo>,
    /// Networks the VM is attached to.
    #[serde(default)]
    pub network: Vec<Network>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSummary {
    pub config: VmConfigSummary,
}

/// Compute settings from the VM summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmConfigSummary {
    /// Number of virtual CPUs.
    pub num_cpu: u32,
    /// Memory size in megabytes.
    #[serde(rename = "memorySizeMB")]
    pub memory_size_mb: i64,
    /// Full name of the guest operating system.
    #[serde(default)]
    pub guest_full_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmConfigInfo {
    #[serde(default)]
    pub hardware: VirtualHardware,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualHardware {
    /// Attached virtual devices, in controller order.
    #[serde(default)]
    pub device: Vec<VirtualDevice>,
}

/// A virtual hardware device, tagged by its vSphere type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum VirtualDevice {
    VirtualDisk(VirtualDisk),
    /// Any device type not inspected here.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDisk {
    #[serde(default)]
    pub label: String,
    /// Capacity in kilobytes.
    #[serde(rename = "capacityInKB")]
    pub capacity_in_kb: i64,
}

/// Guest agent information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestInfo {
    /// Primary IP address reported by the guest.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Network interfaces reported by the guest.
    #[serde(default)]
    pub net: Vec<GuestNicInfo>,
}

/// A network interface as seen from inside the guest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestNicInfo {
    /// Name of the network the interface is connected to.
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub mac_address: String,
    /// Addresses assigned to the interface, primary first.
    #[serde(default)]
    pub ip_address: Vec<String>,
}

impl GuestNicInfo {
    pub fn new(network: impl Into<String>, mac_address: impl Into<String>) -> Self {
        Self {
            network: Some(network.into()),
            mac_address: mac_address.into(),
            ip_address: Vec::new(),
        }
    }

    /// Add an address to the interface.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address.push(ip.into());
        self
    }

    /// The first address of the interface, if any.
    pub fn first_ip(&self) -> Option<&str> {
        self.ip_address.first().map(String::as_str)
    }
}

/// A network a VM can attach to.
///
/// Only distributed port groups carry VLAN configuration; standard
/// networks and any other network type (e.g. NSX opaque networks) expose
/// none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", from = "NetworkRepr")]
pub enum Network {
    #[serde(rename = "Network")]
    Standard(StandardNetwork),
    DistributedVirtualPortgroup(DistributedVirtualPortgroup),
    /// A network type not inspected here.
    Other(OtherNetwork),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherNetwork {
    pub name: String,
}

/// Known network types by tag, falling back to a bare name.
#[derive(Deserialize)]
#[serde(untagged)]
enum NetworkRepr {
    Known(KnownNetwork),
    Other(OtherNetwork),
}

#[derive(Deserialize)]
#[serde(tag = "_type")]
enum KnownNetwork {
    #[serde(rename = "Network")]
    Standard(StandardNetwork),
    DistributedVirtualPortgroup(DistributedVirtualPortgroup),
}

impl From<NetworkRepr> for Network {
    fn from(repr: NetworkRepr) -> Self {
        match repr {
            NetworkRepr::Known(KnownNetwork::Standard(network)) => Network::Standard(network),
            NetworkRepr::Known(KnownNetwork::DistributedVirtualPortgroup(portgroup)) => {
                Network::DistributedVirtualPortgroup(portgroup)
            }
            NetworkRepr::Other(network) => Network::Other(network),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardNetwork {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributedVirtualPortgroup {
    pub name: String,
    #[serde(default)]
    pub config: Option<DvPortgroupConfigInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvPortgroupConfigInfo {
    #[serde(default)]
    pub default_port_config: Option<DvsPortSetting>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DvsPortSetting {
    #[serde(default)]
    pub vlan: Option<VlanSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanSpec {
    #[serde(default)]
    pub vlan_id: Option<VlanId>,
}

impl Network {
    /// A standard network without VLAN configuration.
    pub fn standard(name: impl Into<String>) -> Self {
        Network::Standard(StandardNetwork { name: name.into() })
    }

    /// A distributed port group with the given default VLAN id.
    pub fn portgroup(name: impl Into<String>, vlan_id: Option<VlanId>) -> Self {
        Network::DistributedVirtualPortgroup(DistributedVirtualPortgroup {
            name: name.into(),
            config: Some(DvPortgroupConfigInfo {
                default_port_config: Some(DvsPortSetting {
                    vlan: Some(VlanSpec { vlan_id }),
                }),
            }),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Network::Standard(network) => &network.name,
            Network::DistributedVirtualPortgroup(portgroup) => &portgroup.name,
            Network::Other(network) => &network.name,
        }
    }

    /// The default VLAN id of the network, if it exposes one.
    pub fn vlan_id(&self) -> Option<&VlanId> {
        match self {
            Network::Standard(_) | Network::Other(_) => None,
            Network::DistributedVirtualPortgroup(portgroup) => portgroup
                .config
                .as_ref()?
                .default_port_config
                .as_ref()?
                .vlan
                .as_ref()?
                .vlan_id
                .as_ref(),
        }
    }
}

impl VirtualMachine {
    /// Create a VM with the given summary settings and no devices,
    /// networks or snapshots.
    pub fn new(
        name: impl Into<String>,
        num_cpu: u32,
        memory_size_mb: i64,
        guest_full_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: VmSummary {
                config: VmConfigSummary {
                    num_cpu,
                    memory_size_mb,
                    guest_full_name: guest_full_name.into(),
                },
            },
            config: None,
            guest: GuestInfo::default(),
            snapshot: None,
            network: Vec::new(),
        }
    }

    /// Parse a VM from a JSON inventory dump.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a VM from a JSON inventory dump on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::inventory(format!("{}: {}", path.display(), e)))
    }

    /// Attach a hardware device.
    pub fn with_device(mut self, device: VirtualDevice) -> Self {
        self.config
            .get_or_insert_with(VmConfigInfo::default)
            .hardware
            .device
            .push(device);
        self
    }

    /// Attach a virtual disk of the given capacity.
    pub fn with_disk(self, capacity_in_kb: i64) -> Self {
        let label = format!("Hard disk {}", self.disks().count() + 1);
        self.with_device(VirtualDevice::VirtualDisk(VirtualDisk {
            label,
            capacity_in_kb,
        }))
    }

    /// Add a guest-reported network interface.
    pub fn with_guest_nic(mut self, nic: GuestNicInfo) -> Self {
        self.guest.net.push(nic);
        self
    }

    /// Set the guest-reported primary IP address.
    pub fn with_guest_ip(mut self, ip: impl Into<String>) -> Self {
        self.guest.ip_address = Some(ip.into());
        self
    }

    /// Attach a network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.network.push(network);
        self
    }

    /// Set the snapshot tree and the current snapshot.
    pub fn with_snapshots(mut self, roots: Vec<SnapshotTree>, current: Option<&str>) -> Self {
        self.snapshot = Some(SnapshotInfo {
            root_snapshot_list: roots,
            current_snapshot: current.map(crate::snapshot::SnapshotRef::new),
        });
        self
    }

    /// Memory size in kilobytes.
    pub fn memory_size_kb(&self) -> i64 {
        self.summary.config.memory_size_mb * 1024
    }

    /// Virtual disks attached to the VM.
    pub fn disks(&self) -> impl Iterator<Item = &VirtualDisk> {
        self.config
            .iter()
            .flat_map(|config| config.hardware.device.iter())
            .filter_map(|device| match device {
                VirtualDevice::VirtualDisk(disk) => Some(disk),
                _ => None,
            })
    }

    /// Capacity of the first virtual disk in kilobytes, or 0 without disks.
    pub fn first_disk_capacity_kb(&self) -> i64 {
        self.disks().next().map(|disk| disk.capacity_in_kb).unwrap_or(0)
    }

    /// Path of names from the snapshot root to the current snapshot.
    pub fn current_snapshot_path(&self) -> Option<String> {
        let info = self.snapshot.as_ref()?;
        snapshot_path(&info.root_snapshot_list, info.current_snapshot.as_ref())
    }

    /// Display form of the VLAN id of the attached network named
    /// `network_name`.
    ///
    /// Returns `None` when no attached network has that name or the network
    /// exposes no VLAN id.
    pub fn vlan_id(&self, network_name: &str) -> Option<String> {
        self.network
            .iter()
            .find(|network| network.name() == network_name)?
            .vlan_id()
            .map(VlanId::to_string)
    }
}
