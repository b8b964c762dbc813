use crate::ipv4::types::{InterfaceDescriptor, InterfaceType};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Windows API error: {0}")]
    WindowsApi(String),
    #[error("Invalid description filter: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Physical media types offered for backup.
pub const DEFAULT_VALID_TYPES: [InterfaceType; 8] = [
    InterfaceType::Ethernet,
    InterfaceType::Ethernet3Megabit,
    InterfaceType::FastEthernetFx,
    InterfaceType::GigabitEthernet,
    InterfaceType::Wireless80211,
    InterfaceType::Wman,
    InterfaceType::Wwanpp,
    InterfaceType::Wwanpp2,
];

/// Descriptions of virtual, VPN, Hyper-V and Bluetooth adapters.
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"virtual|(-|_)?\bvpn\b(-|_)?|hyper-v|bluetooth";

pub fn compile_exclude_pattern(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Keeps interfaces of a valid media type whose description does not match
/// the exclusion pattern. Either filter is skipped when not given.
pub fn filter_interfaces(
    interfaces: Vec<InterfaceDescriptor>,
    valid_types: Option<&[InterfaceType]>,
    exclude: Option<&Regex>,
) -> Vec<InterfaceDescriptor> {
    interfaces
        .into_iter()
        .filter(|i| valid_types.is_none_or(|types| types.contains(&i.interface_type)))
        .filter(|i| exclude.is_none_or(|re| !re.is_match(&i.description)))
        .collect()
}

pub fn list_interfaces(
    valid_types: Option<&[InterfaceType]>,
    exclude_pattern: Option<&str>,
) -> Result<Vec<InterfaceDescriptor>> {
    let exclude = exclude_pattern.map(compile_exclude_pattern).transpose()?;
    let interfaces = get_network_interfaces()?;
    let filtered = filter_interfaces(interfaces, valid_types, exclude.as_ref());
    tracing::debug!("Found {} selectable network interfaces", filtered.len());
    Ok(filtered)
}

/// Lists interfaces with the default media types and exclusion pattern, or
/// `exclude_pattern` in place of the default one when given.
pub fn list_default_interfaces(exclude_pattern: Option<&str>) -> Result<Vec<InterfaceDescriptor>> {
    list_interfaces(
        Some(&DEFAULT_VALID_TYPES),
        Some(exclude_pattern.unwrap_or(DEFAULT_EXCLUDE_PATTERN)),
    )
}

#[cfg(target_os = "windows")]
pub fn get_network_interfaces() -> Result<Vec<InterfaceDescriptor>> {
    use crate::ipv4::types::OperationalStatus;
    use windows::Win32::NetworkManagement::IpHelper::{
        GAA_FLAG_INCLUDE_GATEWAYS, GAA_FLAG_INCLUDE_PREFIX, GetAdaptersAddresses,
        IP_ADAPTER_ADDRESSES_LH,
    };
    use windows::Win32::Networking::WinSock::AF_UNSPEC;

    const ERROR_BUFFER_OVERFLOW: u32 = 111;
    const MAX_ATTEMPTS: usize = 3;

    let flags = GAA_FLAG_INCLUDE_PREFIX | GAA_FLAG_INCLUDE_GATEWAYS;
    let mut buffer_size: u32 = 15000;
    // u64 elements keep the buffer aligned for IP_ADAPTER_ADDRESSES_LH.
    let mut buffer: Vec<u64> = Vec::new();

    let mut result = ERROR_BUFFER_OVERFLOW;
    for _ in 0..MAX_ATTEMPTS {
        buffer.resize((buffer_size as usize).div_ceil(8), 0);
        result = unsafe {
            GetAdaptersAddresses(
                AF_UNSPEC.0 as u32,
                flags,
                None,
                Some(buffer.as_mut_ptr() as *mut IP_ADAPTER_ADDRESSES_LH),
                &mut buffer_size,
            )
        };
        if result != ERROR_BUFFER_OVERFLOW {
            break;
        }
    }

    if result != 0 {
        return Err(NetworkError::WindowsApi(format!(
            "GetAdaptersAddresses failed with code {}",
            result
        )));
    }

    let mut interfaces = Vec::new();

    unsafe {
        let mut current = buffer.as_ptr() as *const IP_ADAPTER_ADDRESSES_LH;

        while !current.is_null() {
            let adapter = &*current;

            let name = wide_to_string(adapter.FriendlyName.0);
            let description = wide_to_string(adapter.Description.0);

            let id = if !adapter.AdapterName.is_null() {
                let c_str = std::ffi::CStr::from_ptr(adapter.AdapterName.0 as *const i8);
                c_str.to_string_lossy().to_string()
            } else {
                String::new()
            };

            let address_len = (adapter.PhysicalAddressLength as usize)
                .min(adapter.PhysicalAddress.len());

            interfaces.push(InterfaceDescriptor {
                name,
                description,
                status: OperationalStatus::from_oper_status(adapter.OperStatus.0),
                id,
                interface_type: InterfaceType::from_if_type(adapter.IfType),
                physical_address: adapter.PhysicalAddress[..address_len].to_vec(),
            });

            current = adapter.Next;
        }
    }

    Ok(interfaces)
}

#[cfg(target_os = "windows")]
unsafe fn wide_to_string(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe {
        let len = (0..).take_while(|&i| *ptr.offset(i) != 0).count();
        let slice = std::slice::from_raw_parts(ptr, len);
        String::from_utf16_lossy(slice)
    }
}

#[cfg(not(target_os = "windows"))]
pub fn get_network_interfaces() -> Result<Vec<InterfaceDescriptor>> {
    Err(NetworkError::WindowsApi(
        "Not supported on this platform".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipv4::types::OperationalStatus;

    fn interface(
        name: &str,
        description: &str,
        interface_type: InterfaceType,
    ) -> InterfaceDescriptor {
        InterfaceDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            status: OperationalStatus::Up,
            id: format!("{{{}}}", name),
            interface_type,
            physical_address: vec![0, 1, 2, 3, 4, 5],
        }
    }

    fn sample_interfaces() -> Vec<InterfaceDescriptor> {
        vec![
            interface("eth0", "Intel(R) Ethernet Connection", InterfaceType::Ethernet),
            interface("wlan0", "Intel(R) Wi-Fi 6 AX201", InterfaceType::Wireless80211),
            interface("lo", "Software Loopback Interface 1", InterfaceType::Loopback),
            interface("eth1", "Hyper-V Virtual Ethernet Adapter", InterfaceType::Ethernet),
            interface("eth2", "Contoso VPN Adapter", InterfaceType::Ethernet),
            interface(
                "pan0",
                "Bluetooth Device (Personal Area Network)",
                InterfaceType::Ethernet,
            ),
            interface("wwan0", "Mobile Broadband Modem", InterfaceType::Wwanpp2),
        ]
    }

    fn names(interfaces: &[InterfaceDescriptor]) -> Vec<&str> {
        interfaces.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let filtered = filter_interfaces(sample_interfaces(), None, None);
        assert_eq!(filtered, sample_interfaces());
    }

    #[test]
    fn test_type_filter_keeps_only_ethernet() {
        let filtered =
            filter_interfaces(sample_interfaces(), Some(&[InterfaceType::Ethernet]), None);
        assert_eq!(names(&filtered), ["eth0", "eth1", "eth2", "pan0"]);
        assert!(
            filtered
                .iter()
                .all(|i| i.interface_type == InterfaceType::Ethernet)
        );
    }

    #[test]
    fn test_exclude_pattern_is_case_insensitive() {
        let exclude = compile_exclude_pattern("vpn adapter").unwrap();
        let filtered = filter_interfaces(sample_interfaces(), None, Some(&exclude));
        assert!(!names(&filtered).contains(&"eth2"));
        assert_eq!(filtered.len(), sample_interfaces().len() - 1);
    }

    #[test]
    fn test_default_filters_compose() {
        let exclude = compile_exclude_pattern(DEFAULT_EXCLUDE_PATTERN).unwrap();
        let filtered =
            filter_interfaces(sample_interfaces(), Some(&DEFAULT_VALID_TYPES), Some(&exclude));
        assert_eq!(names(&filtered), ["eth0", "wlan0", "wwan0"]);
    }

    #[test]
    fn test_default_pattern_matches_vpn_token_only() {
        let exclude = compile_exclude_pattern(DEFAULT_EXCLUDE_PATTERN).unwrap();
        assert!(exclude.is_match("VPN Client Adapter"));
        assert!(exclude.is_match("Acme VPN-Miniport"));
        assert!(!exclude.is_match("Acme VPN_Miniport"));
        assert!(exclude.is_match("acme-vpn"));
        assert!(exclude.is_match("VMware Virtual Ethernet Adapter"));
        assert!(exclude.is_match("HYPER-V Switch"));
        assert!(!exclude.is_match("OpenVPNTap Driver"));
        assert!(!exclude.is_match("Realtek PCIe GbE Family Controller"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            compile_exclude_pattern("(unclosed"),
            Err(NetworkError::InvalidPattern(_))
        ));
    }

    #[test]
    #[cfg(target_os = "windows")]
    fn test_get_network_interfaces() {
        match get_network_interfaces() {
            Ok(interfaces) => {
                for interface in interfaces {
                    assert!(!interface.id.is_empty());
                }
            }
            Err(e) => {
                println!("Warning: Could not get network interfaces: {}", e);
            }
        }
    }
}
