//! Primary IP resolution.
//!
//! The builder only needs the VM's primary address; how it is found is up
//! to an [`IpResolver`]. [`GuestIpResolver`] works from the addresses the
//! guest agent already reported.

use crate::error::{Error, Result};
use crate::inventory::VirtualMachine;
use regex::Regex;
use std::net::Ipv4Addr;

/// Decides which addresses are acceptable as a primary IP.
#[derive(Debug, Clone, Default)]
pub struct IpMatchFunction {
    regex: Option<Regex>,
}

impl IpMatchFunction {
    /// Build a match function from an optional user-supplied pattern.
    ///
    /// Without a pattern (or with a blank one) any IPv4 address matches.
    /// A pattern is anchored at the start of the address only.
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let regex = match pattern.map(str::trim).filter(|p| !p.is_empty()) {
            Some(pattern) => Some(
                Regex::new(&format!("^(?:{})", pattern))
                    .map_err(|e| Error::ip_resolution(format!("invalid ip_regex '{}': {}", pattern, e)))?,
            ),
            None => None,
        };
        Ok(Self { regex })
    }

    pub fn matches(&self, ip: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(ip),
            None => ip.parse::<Ipv4Addr>().is_ok(),
        }
    }
}

/// Result of a primary IP lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpResult {
    /// The resolved address, `None` when nothing matched.
    pub ip_address: Option<String>,
}

/// Resolves the primary IP address of a VM.
pub trait IpResolver {
    /// Build the match function for a user-supplied pattern.
    fn ip_match_function(&self, regex: Option<&str>) -> Result<IpMatchFunction> {
        IpMatchFunction::new(regex)
    }

    /// Find the primary IP of `vm`, ignoring interfaces on `default_network`.
    fn get_ip(
        &self,
        vm: &VirtualMachine,
        default_network: Option<&str>,
        match_function: &IpMatchFunction,
    ) -> Result<IpResult>;
}

/// Resolves the primary IP from guest-reported addresses.
///
/// The guest's own primary address is preferred; otherwise interface
/// addresses are tried in reported order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestIpResolver;

impl IpResolver for GuestIpResolver {
    fn get_ip(
        &self,
        vm: &VirtualMachine,
        default_network: Option<&str>,
        match_function: &IpMatchFunction,
    ) -> Result<IpResult> {
        let nic_ips = vm
            .guest
            .net
            .iter()
            .filter(|nic| default_network.is_none() || nic.network.as_deref() != default_network)
            .flat_map(|nic| nic.ip_address.iter());

        let ip_address = vm
            .guest
            .ip_address
            .iter()
            .chain(nic_ips)
            .find(|ip| match_function.matches(ip))
            .cloned();

        tracing::debug!(vm = %vm.name, ip = ?ip_address, "Resolved primary IP from guest");
        Ok(IpResult { ip_address })
    }
}
