use crate::ipv4::types::ConfigRecord;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{0} does not exist")]
    KeyNotFound(String),
    #[error("Interface identifier is missing")]
    MissingInterfaceId,
    #[error("Registry value {name} has type {found}, expected {expected}")]
    UnexpectedType {
        name: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("Registry value {0} is malformed")]
    Malformed(&'static str),
    #[error("Registry access is not supported on this platform")]
    Unsupported,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

pub const INTERFACES_KEY: &str = r"SYSTEM\CurrentControlSet\Services\Tcpip\Parameters\Interfaces";

const ENABLE_DHCP: &str = "EnableDHCP";
const IP_ADDRESS: &str = "IPAddress";
const DEFAULT_GATEWAY: &str = "DefaultGateway";
const NAME_SERVER: &str = "NameServer";
const SUBNET_MASK: &str = "SubnetMask";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueKind {
    String,
    Dword,
    MultiString,
    Other(u32),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("REG_SZ"),
            ValueKind::Dword => f.write_str("REG_DWORD"),
            ValueKind::MultiString => f.write_str("REG_MULTI_SZ"),
            ValueKind::Other(code) => write!(f, "type {}", code),
        }
    }
}

/// A registry value as stored: its declared type and raw payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawValue {
    pub kind: ValueKind,
    pub bytes: Vec<u8>,
}

/// An open registry key. The handle is released when the value is dropped.
pub trait InterfaceKey {
    /// Returns `None` when no value with this name exists.
    fn get_raw(&self, name: &str) -> Result<Option<RawValue>>;
    fn set_raw(&self, name: &str, value: &RawValue) -> Result<()>;
    /// Deleting a value that does not exist is not an error.
    fn delete(&self, name: &str) -> Result<()>;
}

/// Store holding the per-interface Tcpip parameters.
pub trait RegistryStore {
    type Key: InterfaceKey;

    /// Opens an existing key below `HKEY_LOCAL_MACHINE` for reading and writing.
    fn open_key(&self, path: &str) -> Result<Self::Key>;

    fn load(&self, interface_id: &str) -> Result<ConfigRecord> {
        let key = self.open_key(&interface_key_path(interface_id)?)?;
        read_record(&key)
    }

    fn save(&self, interface_id: &str, record: &ConfigRecord) -> Result<()> {
        let key = self.open_key(&interface_key_path(interface_id)?)?;
        write_record(&key, record)
    }
}

pub fn interface_key_path(interface_id: &str) -> Result<String> {
    let id = interface_id.trim();
    if id.is_empty() {
        return Err(RegistryError::MissingInterfaceId);
    }
    Ok(format!(r"{}\{}", INTERFACES_KEY, id.to_lowercase()))
}

pub fn display_path(path: &str) -> String {
    format!(r"HKEY_LOCAL_MACHINE\{}", path)
}

fn read_record<K: InterfaceKey>(key: &K) -> Result<ConfigRecord> {
    Ok(ConfigRecord {
        enable_dhcp: key
            .get_raw(ENABLE_DHCP)?
            .map(|v| decode_dword(ENABLE_DHCP, &v))
            .transpose()?,
        ip_address: key
            .get_raw(IP_ADDRESS)?
            .map(|v| decode_multi_string(IP_ADDRESS, &v))
            .transpose()?,
        default_gateway: key
            .get_raw(DEFAULT_GATEWAY)?
            .map(|v| decode_multi_string(DEFAULT_GATEWAY, &v))
            .transpose()?,
        name_server: key
            .get_raw(NAME_SERVER)?
            .map(|v| decode_string(NAME_SERVER, &v))
            .transpose()?,
        subnet_mask: key
            .get_raw(SUBNET_MASK)?
            .map(|v| decode_multi_string(SUBNET_MASK, &v))
            .transpose()?,
    })
}

// No rollback: a failure part way leaves the earlier values written.
fn write_record<K: InterfaceKey>(key: &K, record: &ConfigRecord) -> Result<()> {
    write_or_delete(key, ENABLE_DHCP, record.enable_dhcp.map(encode_dword))?;
    write_or_delete(
        key,
        IP_ADDRESS,
        record.ip_address.as_deref().map(encode_multi_string),
    )?;
    write_or_delete(
        key,
        DEFAULT_GATEWAY,
        record.default_gateway.as_deref().map(encode_multi_string),
    )?;
    write_or_delete(
        key,
        NAME_SERVER,
        record.name_server.as_deref().map(encode_string),
    )?;
    write_or_delete(
        key,
        SUBNET_MASK,
        record.subnet_mask.as_deref().map(encode_multi_string),
    )?;
    Ok(())
}

fn write_or_delete<K: InterfaceKey>(key: &K, name: &str, value: Option<RawValue>) -> Result<()> {
    match value {
        Some(value) => {
            tracing::debug!("Writing registry value {} ({})", name, value.kind);
            key.set_raw(name, &value)
        }
        None => {
            tracing::debug!("Deleting registry value {}", name);
            key.delete(name)
        }
    }
}

fn expect_kind(name: &'static str, value: &RawValue, expected: ValueKind) -> Result<()> {
    if value.kind != expected {
        return Err(RegistryError::UnexpectedType {
            name,
            expected,
            found: value.kind,
        });
    }
    Ok(())
}

pub fn encode_dword(value: i32) -> RawValue {
    RawValue {
        kind: ValueKind::Dword,
        bytes: value.to_le_bytes().to_vec(),
    }
}

pub fn decode_dword(name: &'static str, value: &RawValue) -> Result<i32> {
    expect_kind(name, value, ValueKind::Dword)?;
    let bytes: [u8; 4] = value
        .bytes
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or(RegistryError::Malformed(name))?;
    Ok(i32::from_le_bytes(bytes))
}

pub fn encode_string(value: &str) -> RawValue {
    let mut units: Vec<u16> = value.encode_utf16().collect();
    units.push(0);
    RawValue {
        kind: ValueKind::String,
        bytes: units_to_bytes(&units),
    }
}

pub fn decode_string(name: &'static str, value: &RawValue) -> Result<String> {
    expect_kind(name, value, ValueKind::String)?;
    let units = bytes_to_units(&value.bytes);
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    Ok(String::from_utf16_lossy(&units[..end]))
}

/// Each string is NUL terminated and the list ends with one more NUL, so an
/// empty list is a single NUL and `[""]` is two.
pub fn encode_multi_string(values: &[String]) -> RawValue {
    let mut units = Vec::new();
    for value in values {
        units.extend(value.encode_utf16());
        units.push(0);
    }
    units.push(0);
    RawValue {
        kind: ValueKind::MultiString,
        bytes: units_to_bytes(&units),
    }
}

pub fn decode_multi_string(name: &'static str, value: &RawValue) -> Result<Vec<String>> {
    expect_kind(name, value, ValueKind::MultiString)?;
    let mut units = bytes_to_units(&value.bytes);
    // list terminator
    if units.last() == Some(&0) {
        units.pop();
    }
    if units.is_empty() {
        return Ok(Vec::new());
    }
    // terminator of the last string
    if units.last() == Some(&0) {
        units.pop();
    }
    Ok(units
        .split(|&u| u == 0)
        .map(String::from_utf16_lossy)
        .collect())
}

fn units_to_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|u| u.to_le_bytes()).collect()
}

fn bytes_to_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// The live registry of this host.
#[derive(Clone, Copy, Default, Debug)]
pub struct WindowsRegistry;

#[cfg(target_os = "windows")]
pub struct WindowsKey(winreg::RegKey);

#[cfg(target_os = "windows")]
impl RegistryStore for WindowsRegistry {
    type Key = WindowsKey;

    fn open_key(&self, path: &str) -> Result<WindowsKey> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WRITE};

        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        match hklm.open_subkey_with_flags(path, KEY_READ | KEY_WRITE) {
            Ok(key) => Ok(WindowsKey(key)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RegistryError::KeyNotFound(display_path(path)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(target_os = "windows")]
impl InterfaceKey for WindowsKey {
    fn get_raw(&self, name: &str) -> Result<Option<RawValue>> {
        use winreg::enums::RegType;

        match self.0.get_raw_value(name) {
            Ok(value) => {
                let kind = match value.vtype {
                    RegType::REG_SZ => ValueKind::String,
                    RegType::REG_DWORD => ValueKind::Dword,
                    RegType::REG_MULTI_SZ => ValueKind::MultiString,
                    other => ValueKind::Other(other as u32),
                };
                Ok(Some(RawValue {
                    kind,
                    bytes: value.bytes,
                }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_raw(&self, name: &str, value: &RawValue) -> Result<()> {
        use winreg::RegValue;
        use winreg::enums::RegType;

        let vtype = match value.kind {
            ValueKind::String => RegType::REG_SZ,
            ValueKind::Dword => RegType::REG_DWORD,
            ValueKind::MultiString => RegType::REG_MULTI_SZ,
            ValueKind::Other(_) => return Err(RegistryError::Malformed("value type")),
        };
        self.0.set_raw_value(
            name,
            &RegValue {
                bytes: value.bytes.clone(),
                vtype,
            },
        )?;
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        match self.0.delete_value(name) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(not(target_os = "windows"))]
pub struct WindowsKey;

#[cfg(not(target_os = "windows"))]
impl RegistryStore for WindowsRegistry {
    type Key = WindowsKey;

    fn open_key(&self, _path: &str) -> Result<WindowsKey> {
        Err(RegistryError::Unsupported)
    }
}

#[cfg(not(target_os = "windows"))]
impl InterfaceKey for WindowsKey {
    fn get_raw(&self, _name: &str) -> Result<Option<RawValue>> {
        Err(RegistryError::Unsupported)
    }

    fn set_raw(&self, _name: &str, _value: &RawValue) -> Result<()> {
        Err(RegistryError::Unsupported)
    }

    fn delete(&self, _name: &str) -> Result<()> {
        Err(RegistryError::Unsupported)
    }
}
