use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const LABEL_WIDTH: usize = 30;
const NULL_TEXT: &str = "NULL";

/// The five IPv4 values stored under an interface's Tcpip registry key.
///
/// Every field is optional: `None` means the value was not present in the
/// registry, while an empty list or string means it was present but empty.
/// Restoring a record must preserve that difference.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default, Debug)]
pub struct ConfigRecord {
    #[serde(rename = "EnableDHCP", default)]
    pub enable_dhcp: Option<i32>,
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<Vec<String>>,
    #[serde(rename = "DefaultGateway", default)]
    pub default_gateway: Option<Vec<String>>,
    #[serde(rename = "NameServer", default)]
    pub name_server: Option<String>,
    #[serde(rename = "SubnetMask", default)]
    pub subnet_mask: Option<Vec<String>>,
}

impl ConfigRecord {
    pub fn to_document(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn from_document(doc: Value) -> serde_json::Result<Self> {
        serde_json::from_value(doc)
    }

    pub fn format_for_display(&self) -> String {
        let mut text = String::new();
        push_line(&mut text, "DHCP", self.enable_dhcp.map(|v| v.to_string()));
        push_line(&mut text, "IP Address", self.ip_address.as_deref().map(concat));
        push_line(
            &mut text,
            "Gateway",
            self.default_gateway.as_deref().map(concat),
        );
        push_line(&mut text, "DNS", self.name_server.clone());
        push_line(&mut text, "Subnet", self.subnet_mask.as_deref().map(concat));
        text
    }
}

fn concat(values: &[String]) -> String {
    values.concat()
}

pub(crate) fn format_line(label: &str, value: Option<&str>) -> String {
    format!(
        "{:<width$.width$} \t:\t {:<width$}",
        label,
        value.unwrap_or(NULL_TEXT),
        width = LABEL_WIDTH
    )
}

fn push_line(text: &mut String, label: &str, value: Option<String>) {
    text.push_str(&format_line(label, value.as_deref()));
    text.push('\n');
}

/// Physical media type of an interface, as reported by the IANA ifType.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InterfaceType {
    Ethernet,
    Ethernet3Megabit,
    FastEthernetT,
    FastEthernetFx,
    GigabitEthernet,
    Wireless80211,
    Wman,
    Wwanpp,
    Wwanpp2,
    Ppp,
    Loopback,
    Tunnel,
    Other(u32),
}

impl InterfaceType {
    pub fn from_if_type(if_type: u32) -> Self {
        match if_type {
            6 => InterfaceType::Ethernet,
            23 => InterfaceType::Ppp,
            24 => InterfaceType::Loopback,
            26 => InterfaceType::Ethernet3Megabit,
            62 => InterfaceType::FastEthernetT,
            69 => InterfaceType::FastEthernetFx,
            71 => InterfaceType::Wireless80211,
            117 => InterfaceType::GigabitEthernet,
            131 => InterfaceType::Tunnel,
            237 => InterfaceType::Wman,
            243 => InterfaceType::Wwanpp,
            244 => InterfaceType::Wwanpp2,
            other => InterfaceType::Other(other),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperationalStatus {
    Up,
    Down,
    Testing,
    Unknown,
    Dormant,
    NotPresent,
    LowerLayerDown,
}

impl OperationalStatus {
    pub fn from_oper_status(status: i32) -> Self {
        match status {
            1 => OperationalStatus::Up,
            2 => OperationalStatus::Down,
            3 => OperationalStatus::Testing,
            5 => OperationalStatus::Dormant,
            6 => OperationalStatus::NotPresent,
            7 => OperationalStatus::LowerLayerDown,
            _ => OperationalStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalStatus::Up => "Up",
            OperationalStatus::Down => "Down",
            OperationalStatus::Testing => "Testing",
            OperationalStatus::Unknown => "Unknown",
            OperationalStatus::Dormant => "Dormant",
            OperationalStatus::NotPresent => "NotPresent",
            OperationalStatus::LowerLayerDown => "LowerLayerDown",
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of a host network interface.
#[derive(Clone, PartialEq, Debug)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub description: String,
    pub status: OperationalStatus,
    /// Adapter GUID, used as the registry key name.
    pub id: String,
    pub interface_type: InterfaceType,
    pub physical_address: Vec<u8>,
}

impl InterfaceDescriptor {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.description)
    }

    pub fn mac_address(&self) -> String {
        format_mac_address(&self.physical_address)
    }

    /// Descriptive properties recorded alongside a backup.
    pub fn properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("Name".to_string(), Value::from(self.name.clone()));
        props.insert(
            "Description".to_string(),
            Value::from(self.description.clone()),
        );
        props.insert("Status".to_string(), Value::from(self.status.as_str()));
        props.insert("ID".to_string(), Value::from(self.id.clone()));
        props.insert("MAC".to_string(), Value::from(self.mac_address()));
        props
    }

    pub fn format_for_display(&self) -> String {
        let mut text = String::new();
        for (name, value) in self.properties() {
            let value = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            push_line(&mut text, &name, value);
        }
        text
    }
}

/// Formats a hardware address as colon separated uppercase hex octets.
pub fn format_mac_address(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
