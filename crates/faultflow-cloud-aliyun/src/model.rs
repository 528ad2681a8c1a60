//! Response bodies of the describe calls
//!
//! Only the fields the status probes read are modelled. ECS wraps every list
//! in an object named after the element (`{"Disks": {"Disk": [...]}}`).

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstanceStatusResponse {
    pub instance_statuses: InstanceStatuses,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceStatuses {
    pub instance_status: Vec<InstanceStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InstanceStatus {
    pub instance_id: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeDisksResponse {
    pub disks: Disks,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Disks {
    pub disk: Vec<Disk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Disk {
    pub disk_id: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeNetworkInterfacesResponse {
    pub network_interface_sets: NetworkInterfaceSets,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkInterfaceSets {
    pub network_interface_set: Vec<NetworkInterfaceSet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkInterfaceSet {
    pub network_interface_id: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkInterfaceAttribute {
    pub network_interface_id: String,
    pub status: String,
    /// Primary private address
    pub private_ip_address: String,
    pub private_ip_sets: PrivateIpSets,
    pub security_group_ids: SecurityGroupIds,
}

impl NetworkInterfaceAttribute {
    /// Primary and secondary private addresses
    pub fn private_addresses(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.private_ip_address.as_str())
            .chain(
                self.private_ip_sets
                    .private_ip_set
                    .iter()
                    .map(|set| set.private_ip_address.as_str()),
            )
            .filter(|ip| !ip.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrivateIpSets {
    pub private_ip_set: Vec<PrivateIpSet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrivateIpSet {
    pub private_ip_address: String,
    pub primary: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroupIds {
    pub security_group_id: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeInstancesResponse {
    pub instances: Instances,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Instances {
    pub instance: Vec<Instance>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Instance {
    pub instance_id: String,
    pub status: String,
    pub public_ip_address: IpAddressList,
    pub security_group_ids: SecurityGroupIds,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IpAddressList {
    pub ip_address: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeEipAddressesResponse {
    pub eip_addresses: EipAddresses,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EipAddresses {
    pub eip_address: Vec<EipAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EipAddress {
    pub allocation_id: String,
    pub ip_address: String,
    pub instance_id: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DescribeVSwitchesResponse {
    #[serde(rename = "VSwitches")]
    pub vswitches: VSwitches,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VSwitches {
    #[serde(rename = "VSwitch")]
    pub vswitch: Vec<VSwitch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VSwitch {
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    #[serde(rename = "Status")]
    pub status: String,
}
