//! Integration tests for building VM details.

use std::collections::HashMap;

use vmdetails_core::error::{Error, Result};
use vmdetails_core::{
    DeploymentService, GuestIpResolver, GuestNicInfo, IpMatchFunction, IpResolver, IpResult,
    Network, SnapshotTree, VirtualMachine, VlanId, VmDataField, VmDetails, VmDetailsBuilder,
};

/// Resolver returning a fixed address and recording nothing.
struct FixedIp(Option<&'static str>);

impl IpResolver for FixedIp {
    fn get_ip(
        &self,
        _vm: &VirtualMachine,
        _default_network: Option<&str>,
        _match_function: &IpMatchFunction,
    ) -> Result<IpResult> {
        Ok(IpResult {
            ip_address: self.0.map(str::to_string),
        })
    }
}

/// Resolver that always fails.
struct FailingResolver;

impl IpResolver for FailingResolver {
    fn get_ip(
        &self,
        _vm: &VirtualMachine,
        _default_network: Option<&str>,
        _match_function: &IpMatchFunction,
    ) -> Result<IpResult> {
        Err(Error::ip_resolution("guest tools not running"))
    }
}

fn base_vm() -> VirtualMachine {
    VirtualMachine::new("web-01", 4, 8192, "CentOS 7 (64-bit)").with_disk(40 * 1024 * 1024)
}

fn no_attrs() -> HashMap<String, String> {
    HashMap::new()
}

fn reserved(names: &str) -> HashMap<String, String> {
    HashMap::from([("Reserved Networks".to_string(), names.to_string())])
}

fn build(vm: &VirtualMachine, attrs: &HashMap<String, String>, primary: Option<&'static str>) -> VmDetails {
    VmDetailsBuilder::new(FixedIp(primary))
        .create(vm, "web", attrs, &no_attrs(), &DeploymentService::new("Custom"))
        .expect("Failed to build details")
}

fn keys(fields: &[VmDataField]) -> Vec<&str> {
    fields.iter().map(|f| f.key.as_str()).collect()
}

fn with_model(model: &str, attribute: &str, value: &str) -> VmDetails {
    let deployment = DeploymentService::new(model).with_attribute(attribute, value);
    VmDetailsBuilder::new(FixedIp(None))
        .create(&base_vm(), "web", &no_attrs(), &no_attrs(), &deployment)
        .expect("Failed to build details")
}

#[test]
fn test_app_name_and_no_error() {
    let details = build(&base_vm(), &no_attrs(), None);
    assert_eq!(details.app_name, "web");
    assert_eq!(details.error, None);
}

#[test]
fn test_instance_data_order_and_values() {
    let vm = base_vm().with_snapshots(
        vec![SnapshotTree::new("A", "snapshot-1")
            .with_child(SnapshotTree::new("B", "snapshot-2").with_child(SnapshotTree::new("C", "snapshot-3")))],
        Some("snapshot-3"),
    );
    let details = build(&vm, &no_attrs(), None);

    assert_eq!(
        details.vm_instance_data,
        vec![
            VmDataField::new("Current Snapshot", "A/B/C"),
            VmDataField::new("CPU", "4 vCPU"),
            VmDataField::new("Memory", "8 GB"),
            VmDataField::new("Disk Size", "40 GB"),
            VmDataField::new("Guest OS", "CentOS 7 (64-bit)"),
        ]
    );
}

#[test]
fn test_small_memory_and_no_disk() {
    let vm = VirtualMachine::new("tiny", 1, 512, "Other Linux (32-bit)");
    let details = build(&vm, &no_attrs(), None);

    let memory = details.instance_field("Memory").unwrap();
    assert_eq!(memory.value, "512 MB");
    let disk = details.instance_field("Disk Size").unwrap();
    assert_eq!(disk.value, "0 KB");
}

#[test]
fn test_clone_from_vm_provenance() {
    let details = with_model("vCenter Clone VM From VM", "vCenter VM", "Folder/source-vm");
    assert_eq!(details.vm_instance_data[0], VmDataField::new("Cloned VM Name", "Folder/source-vm"));
    assert_eq!(
        keys(&details.vm_instance_data),
        vec!["Cloned VM Name", "Current Snapshot", "CPU", "Memory", "Disk Size", "Guest OS"]
    );
}

#[test]
fn test_linked_clone_provenance() {
    let details = with_model("VCenter Deploy VM From Linked Clone", "vCenter VM", "golden");
    assert_eq!(details.vm_instance_data[0], VmDataField::new("Cloned VM Name", "golden"));
}

#[test]
fn test_image_provenance() {
    let details = with_model("vCenter VM From Image", "vCenter Image", "images/base.ova");
    assert_eq!(details.vm_instance_data[0], VmDataField::new("Base Image Name", "images/base.ova"));
}

#[test]
fn test_template_provenance() {
    let details = with_model("vCenter VM From Template", "vCenter Template", "DC/Templates/win2019");
    assert_eq!(details.vm_instance_data[0], VmDataField::new("Template Name", "win2019"));
}

#[test]
fn test_unknown_model_adds_no_provenance() {
    let details = with_model("Generic Deployment", "vCenter VM", "source-vm");
    assert_eq!(
        keys(&details.vm_instance_data),
        vec!["Current Snapshot", "CPU", "Memory", "Disk Size", "Guest OS"]
    );
}

#[test]
fn test_sandbox_network_entry() {
    let vm = base_vm()
        .with_network(Network::portgroup("QS_Sandbox", Some(VlanId::Number(12))))
        .with_guest_nic(GuestNicInfo::new("QS_Sandbox", "00:50:56:01:02:03").with_ip("10.1.0.7"));
    let details = build(&vm, &no_attrs(), Some("10.1.0.7"));

    assert_eq!(details.vm_network_data.len(), 1);
    let network = &details.vm_network_data[0];
    assert_eq!(network.interface_id, "00:50:56:01:02:03");
    assert_eq!(network.network_id, "12");
    assert!(network.is_primary);
    assert_eq!(
        network.network_data,
        vec![
            VmDataField::new("MAC Address", "00:50:56:01:02:03"),
            VmDataField::new("VLAN Name", "QS_Sandbox"),
            VmDataField::hidden("Reserved Network", "False"),
            VmDataField::new("IP", "10.1.0.7"),
        ]
    );
}

#[test]
fn test_reserved_network_entry() {
    let vm = base_vm()
        .with_network(Network::portgroup("Storage", Some(VlanId::Range { start: 100, end: 110 })))
        .with_guest_nic(GuestNicInfo::new("Storage", "00:50:56:0a:0b:0c").with_ip("192.168.5.5"));
    let details = build(&vm, &reserved("Mgmt;Storage"), Some("10.1.0.7"));

    let network = &details.vm_network_data[0];
    assert_eq!(network.network_id, "100-110");
    assert!(!network.is_primary);
    assert_eq!(
        network.field("Reserved Network"),
        Some(&VmDataField::hidden("Reserved Network", "True"))
    );
}

#[test]
fn test_unmanaged_network_excluded() {
    let vm = base_vm()
        .with_network(Network::portgroup("Production", Some(VlanId::Number(5))))
        .with_guest_nic(GuestNicInfo::new("Production", "mac-1").with_ip("10.0.0.1"));
    let details = build(&vm, &reserved("Mgmt"), None);
    assert!(details.vm_network_data.is_empty());
}

#[test]
fn test_unresolvable_vlan_excluded() {
    let vm = base_vm()
        .with_network(Network::standard("QS_Standard"))
        .with_network(Network::portgroup("Mgmt", None))
        .with_guest_nic(GuestNicInfo::new("QS_Standard", "mac-1"))
        .with_guest_nic(GuestNicInfo::new("Mgmt", "mac-2"))
        .with_guest_nic(GuestNicInfo::new("QS_Detached", "mac-3"));
    let details = build(&vm, &reserved("Mgmt"), None);
    assert!(details.vm_network_data.is_empty());
}

#[test]
fn test_empty_vlan_id_excluded() {
    let vm = base_vm()
        .with_network(Network::portgroup("QS_Untagged", Some(VlanId::Number(0))))
        .with_guest_nic(GuestNicInfo::new("QS_Untagged", "mac-1"));
    let details = build(&vm, &no_attrs(), None);
    assert!(details.vm_network_data.is_empty());
}

#[test]
fn test_interface_without_address() {
    let vm = base_vm()
        .with_network(Network::portgroup("QS_NoIp", Some(VlanId::Number(33))))
        .with_guest_nic(GuestNicInfo::new("QS_NoIp", "mac-1"));
    let details = build(&vm, &no_attrs(), None);

    let network = &details.vm_network_data[0];
    assert!(!network.is_primary);
    assert_eq!(keys(&network.network_data), vec!["MAC Address", "VLAN Name", "Reserved Network"]);
}

#[test]
fn test_primary_flag_on_matching_interface_only() {
    let vm = base_vm()
        .with_network(Network::portgroup("QS_A", Some(VlanId::Number(1))))
        .with_network(Network::portgroup("QS_B", Some(VlanId::Number(2))))
        .with_guest_nic(GuestNicInfo::new("QS_A", "mac-a").with_ip("10.0.0.1"))
        .with_guest_nic(GuestNicInfo::new("QS_B", "mac-b").with_ip("10.0.0.2").with_ip("10.0.0.3"));
    let details = build(&vm, &no_attrs(), Some("10.0.0.2"));

    let flags: Vec<(&str, bool)> = details
        .vm_network_data
        .iter()
        .map(|n| (n.interface_id.as_str(), n.is_primary))
        .collect();
    assert_eq!(flags, vec![("mac-a", false), ("mac-b", true)]);
    assert_eq!(details.primary_network().unwrap().network_id, "2");
}

#[test]
fn test_only_first_address_is_reported() {
    let vm = base_vm()
        .with_network(Network::portgroup("QS_A", Some(VlanId::Number(1))))
        .with_guest_nic(GuestNicInfo::new("QS_A", "mac-a").with_ip("10.0.0.1").with_ip("10.0.0.9"));
    let details = build(&vm, &no_attrs(), Some("10.0.0.9"));

    let network = &details.vm_network_data[0];
    assert_eq!(network.field("IP").unwrap().value, "10.0.0.1");
    assert!(!network.is_primary);
}

#[test]
fn test_network_entries_follow_guest_order() {
    let vm = base_vm()
        .with_network(Network::portgroup("QS_A", Some(VlanId::Number(1))))
        .with_network(Network::portgroup("QS_B", Some(VlanId::Number(2))))
        .with_guest_nic(GuestNicInfo::new("QS_B", "mac-b"))
        .with_guest_nic(GuestNicInfo::new("QS_A", "mac-a"));
    let details = build(&vm, &no_attrs(), None);

    let ids: Vec<&str> = details.vm_network_data.iter().map(|n| n.network_id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
}

#[test]
fn test_empty_reserved_attribute_reserves_empty_name() {
    let vm = base_vm()
        .with_network(Network::portgroup("", Some(VlanId::Number(9))))
        .with_guest_nic(GuestNicInfo::new("", "mac-1"));
    let details = build(&vm, &reserved(""), None);

    assert_eq!(details.vm_network_data.len(), 1);
    assert_eq!(
        details.vm_network_data[0].field("Reserved Network").unwrap().value,
        "True"
    );
}

#[test]
fn test_trunk_vlan_list() {
    let vlan = VlanId::List(vec![Some(VlanId::Number(10)), None, Some(VlanId::Number(12))]);
    let vm = base_vm()
        .with_network(Network::portgroup("QS_Trunk", Some(vlan)))
        .with_guest_nic(GuestNicInfo::new("QS_Trunk", "mac-1"));
    let details = build(&vm, &no_attrs(), None);
    assert_eq!(details.vm_network_data[0].network_id, "10,12");
}

#[test]
fn test_resolver_error_propagates() {
    let err = VmDetailsBuilder::new(FailingResolver)
        .create(&base_vm(), "web", &no_attrs(), &no_attrs(), &DeploymentService::new("Custom"))
        .unwrap_err();
    assert!(matches!(err, Error::IpResolution { .. }));
}

#[test]
fn test_invalid_ip_regex_propagates() {
    let params = HashMap::from([("ip_regex".to_string(), "10.(".to_string())]);
    let err = VmDetailsBuilder::new(GuestIpResolver)
        .create(&base_vm(), "web", &no_attrs(), &params, &DeploymentService::new("Custom"))
        .unwrap_err();
    assert!(err.to_string().contains("ip_regex"));
}

#[test]
fn test_guest_resolver_with_regex() {
    let params = HashMap::from([("ip_regex".to_string(), r"192\.168\..*".to_string())]);
    let vm = base_vm()
        .with_guest_ip("10.0.0.1")
        .with_network(Network::portgroup("QS_A", Some(VlanId::Number(1))))
        .with_network(Network::portgroup("QS_B", Some(VlanId::Number(2))))
        .with_guest_nic(GuestNicInfo::new("QS_A", "mac-a").with_ip("10.0.0.1"))
        .with_guest_nic(GuestNicInfo::new("QS_B", "mac-b").with_ip("192.168.1.20"));

    let details = VmDetailsBuilder::new(GuestIpResolver)
        .create(&vm, "web", &no_attrs(), &params, &DeploymentService::new("Custom"))
        .expect("Failed to build details");

    assert_eq!(details.primary_network().unwrap().interface_id, "mac-b");
}

#[test]
fn test_failed_details_for_caller() {
    let err = VmDetailsBuilder::new(FailingResolver)
        .create(&base_vm(), "web", &no_attrs(), &no_attrs(), &DeploymentService::new("Custom"))
        .unwrap_err();
    let details = VmDetails::failed("web", &err);
    assert_eq!(details.error.as_deref(), Some("IP resolution error: guest tools not running"));
}
