// Device introspection and interface documents

use serde::{Deserialize, Serialize};

/// Version pair of an interface in a device's introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceVersion {
    pub major: u32,
    pub minor: u32,
}

/// One interface implemented by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionEntry {
    pub name: String,
    pub major: u32,
    pub minor: u32,
}

/// Interface document from Realm Management, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceDescriptor(pub serde_json::Value);

/// Device counters from AppEngine, used only as a liveness probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStats {
    #[serde(default)]
    pub total_devices: u64,
    #[serde(default)]
    pub connected_devices: u64,
}
