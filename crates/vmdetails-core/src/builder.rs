//! VM details builder.
//!
//! Turns a VM from the inventory, plus its deployment context, into the
//! [`VmDetails`] shown to the user:
//! 1. Instance data: provenance, current snapshot, CPU, memory, disk, guest OS
//! 2. Network data: one entry per guest interface on a sandbox (`QS_`) or
//!    reserved network with a known VLAN
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use vmdetails_core::{DeploymentService, GuestIpResolver, VirtualMachine, VmDetailsBuilder};
//!
//! let vm = VirtualMachine::new("web-01", 2, 4096, "Ubuntu Linux (64-bit)");
//! let deployment = DeploymentService::new("vCenter VM From Template")
//!     .with_attribute("vCenter Template", "Templates/ubuntu-22.04");
//!
//! let builder = VmDetailsBuilder::new(GuestIpResolver);
//! let details = builder
//!     .create(&vm, "web", &HashMap::new(), &HashMap::new(), &deployment)
//!     .unwrap();
//!
//! assert_eq!(details.vm_instance_data[0].value, "ubuntu-22.04");
//! ```

use std::collections::HashMap;

use crate::deployment::DeploymentService;
use crate::details::{
    bool_to_str, VmDataField, VmDetails, VmNetworkData, CPU_KEY, CURRENT_SNAPSHOT_KEY, DISK_SIZE_KEY,
    GUEST_OS_KEY, IP_KEY, MAC_ADDRESS_KEY, MEMORY_KEY, RESERVED_NETWORK_KEY, VLAN_NAME_KEY,
};
use crate::error::Result;
use crate::inventory::VirtualMachine;
use crate::ip::IpResolver;
use crate::units::kb_to_str;

/// Platform attribute listing reserved network names, `;`-separated.
pub const RESERVED_NETWORKS_ATTRIBUTE: &str = "Reserved Networks";

/// Custom parameter holding the primary IP pattern.
pub const IP_REGEX_PARAM: &str = "ip_regex";

/// Name prefix of networks created for sandboxes.
pub const SANDBOX_NETWORK_PREFIX: &str = "QS_";

/// Builds [`VmDetails`] using an IP resolver for the primary address.
#[derive(Debug, Clone, Default)]
pub struct VmDetailsBuilder<R> {
    ip_resolver: R,
}

impl<R: IpResolver> VmDetailsBuilder<R> {
    pub fn new(ip_resolver: R) -> Self {
        Self { ip_resolver }
    }

    /// Build the details of `vm`.
    ///
    /// # Arguments
    ///
    /// * `vm` - The VM to describe.
    /// * `name` - Application name recorded in the result.
    /// * `vcenter_attributes` - vCenter resource attributes (reserved networks).
    /// * `vm_custom_params` - Custom deployment parameters (`ip_regex`).
    /// * `deployment_service` - How the VM was deployed.
    ///
    /// # Errors
    ///
    /// Returns an error only if the IP resolver fails. Missing optional data
    /// yields empty fields instead.
    pub fn create(
        &self,
        vm: &VirtualMachine,
        name: &str,
        vcenter_attributes: &HashMap<String, String>,
        vm_custom_params: &HashMap<String, String>,
        deployment_service: &DeploymentService,
    ) -> Result<VmDetails> {
        let mut details = VmDetails::new(name);
        details.vm_instance_data = vm_instance_data(vm, deployment_service);
        details.vm_network_data = self.vm_network_data(vm, vcenter_attributes, vm_custom_params)?;

        tracing::debug!(
            app = %name,
            instance_fields = details.vm_instance_data.len(),
            networks = details.vm_network_data.len(),
            "Built VM details"
        );
        Ok(details)
    }

    fn vm_network_data(
        &self,
        vm: &VirtualMachine,
        vcenter_attributes: &HashMap<String, String>,
        vm_custom_params: &HashMap<String, String>,
    ) -> Result<Vec<VmNetworkData>> {
        let primary_ip = self.primary_ip(vm, vm_custom_params)?;
        let reserved_networks = reserved_networks(vcenter_attributes);
        let mut data_list = Vec::new();

        for nic in &vm.guest.net {
            let Some(vlan_name) = nic.network.as_deref() else {
                tracing::debug!(mac = %nic.mac_address, "Skipping interface without network");
                continue;
            };

            let vlan_id = match vm.vlan_id(vlan_name) {
                Some(vlan_id) if !vlan_id.is_empty() => vlan_id,
                _ => {
                    tracing::debug!(network = %vlan_name, "Skipping interface without VLAN id");
                    continue;
                }
            };

            let is_reserved = reserved_networks.contains(&vlan_name);
            if !vlan_name.starts_with(SANDBOX_NETWORK_PREFIX) && !is_reserved {
                tracing::debug!(network = %vlan_name, "Skipping interface on unmanaged network");
                continue;
            }

            let mut data = VmNetworkData {
                interface_id: nic.mac_address.clone(),
                network_id: vlan_id,
                ..Default::default()
            };
            data.network_data.push(VmDataField::new(MAC_ADDRESS_KEY, &nic.mac_address));
            data.network_data.push(VmDataField::new(VLAN_NAME_KEY, vlan_name));
            data.network_data.push(VmDataField::hidden(
                RESERVED_NETWORK_KEY,
                bool_to_str(is_reserved),
            ));

            if let Some(ip) = nic.first_ip().filter(|ip| !ip.is_empty()) {
                data.network_data.push(VmDataField::new(IP_KEY, ip));
                data.is_primary = primary_ip.as_deref() == Some(ip);
            }

            data_list.push(data);
        }

        Ok(data_list)
    }

    fn primary_ip(
        &self,
        vm: &VirtualMachine,
        vm_custom_params: &HashMap<String, String>,
    ) -> Result<Option<String>> {
        let regex = vm_custom_params.get(IP_REGEX_PARAM).map(String::as_str);
        let match_function = self.ip_resolver.ip_match_function(regex)?;
        let result = self.ip_resolver.get_ip(vm, None, &match_function)?;
        Ok(result.ip_address)
    }
}

/// Build the instance data fields, in display order.
pub fn vm_instance_data(vm: &VirtualMachine, deployment_service: &DeploymentService) -> Vec<VmDataField> {
    let mut data = Vec::new();

    if let Some(field) = deployment_service.provenance_field() {
        data.push(field);
    }

    let snapshot = vm.current_snapshot_path();
    tracing::trace!(vm = %vm.name, snapshot = ?snapshot, "Current snapshot path");

    let summary = &vm.summary.config;
    data.push(VmDataField::new(CURRENT_SNAPSHOT_KEY, snapshot.unwrap_or_default()));
    data.push(VmDataField::new(CPU_KEY, format!("{} vCPU", summary.num_cpu)));
    data.push(VmDataField::new(MEMORY_KEY, kb_to_str(vm.memory_size_kb())));
    data.push(VmDataField::new(DISK_SIZE_KEY, kb_to_str(vm.first_disk_capacity_kb())));
    data.push(VmDataField::new(GUEST_OS_KEY, &summary.guest_full_name));

    data
}

/// Reserved network names from the vCenter attributes.
///
/// A missing or empty attribute yields a single empty name, so an interface
/// reporting an empty network name counts as reserved.
pub fn reserved_networks(vcenter_attributes: &HashMap<String, String>) -> Vec<&str> {
    vcenter_attributes
        .get(RESERVED_NETWORKS_ATTRIBUTE)
        .map(String::as_str)
        .unwrap_or("")
        .split(';')
        .collect()
}
