use crate::error::{WifiError, WifiResult};
use crate::wifi::handle::{WlanHandle, guid_string, ssid_to_string, wide};
use crate::wifi::types::LinkInfo;
use std::net::Ipv4Addr;
use windows::{
    Win32::{
        Foundation::{ERROR_BUFFER_OVERFLOW, ERROR_SUCCESS},
        NetworkManagement::{IpHelper::*, WiFi::*},
        Networking::WinSock::{AF_INET, SOCKADDR_IN},
    },
    core::{GUID, PCWSTR},
};

/// Ask the service to join using a registered profile
pub fn connect_profile(handle: &WlanHandle, profile: &str) -> WifiResult<()> {
    let profile_wide = wide(profile);

    unsafe {
        let connection_params = WLAN_CONNECTION_PARAMETERS {
            wlanConnectionMode: wlan_connection_mode_profile,
            strProfile: PCWSTR(profile_wide.as_ptr()),
            pDot11Ssid: std::ptr::null_mut(),
            pDesiredBssidList: std::ptr::null_mut(),
            dot11BssType: dot11_BSS_type_infrastructure,
            dwFlags: 0,
        };

        let result = WlanConnect(handle.as_raw(), handle.interface(), &connection_params, None);
        if result != ERROR_SUCCESS.0 {
            return Err(WifiError::ConnectionFailed { code: result });
        }
    }
    Ok(())
}

/// Disconnect from the current network
pub fn disconnect(handle: &WlanHandle) -> WifiResult<()> {
    unsafe {
        let result = WlanDisconnect(handle.as_raw(), handle.interface(), None);
        if result != ERROR_SUCCESS.0 {
            return Err(WifiError::DisconnectFailed { code: result });
        }
    }
    Ok(())
}

/// Current association, if the interface is connected
pub fn current_link(handle: &WlanHandle) -> Option<LinkInfo> {
    let mut link = None;

    unsafe {
        let mut data_size = 0;
        let mut data_ptr: *mut std::ffi::c_void = std::ptr::null_mut();
        let mut opcode_value_type = wlan_opcode_value_type_invalid;

        let result = WlanQueryInterface(
            handle.as_raw(),
            handle.interface(),
            wlan_intf_opcode_current_connection,
            None,
            &mut data_size,
            &mut data_ptr,
            Some(&mut opcode_value_type),
        );

        // Fails with ERROR_INVALID_STATE while not associated
        if result == ERROR_SUCCESS.0 && !data_ptr.is_null() {
            let attributes = &*(data_ptr as *const WLAN_CONNECTION_ATTRIBUTES);
            if attributes.isState == wlan_interface_state_connected {
                let association = &attributes.wlanAssociationAttributes;
                link = Some(LinkInfo {
                    ssid: ssid_to_string(&association.dot11Ssid),
                    ip: interface_ipv4(handle.interface()),
                    bssid: Some(association.dot11Bssid),
                    link_speed: Some(association.ulTxRate / 1000), // Kbps to Mbps
                });
            }
            WlanFreeMemory(data_ptr);
        }
    }

    link
}

/// First IPv4 address bound to the adapter behind a WLAN interface
pub fn interface_ipv4(interface: &GUID) -> Option<Ipv4Addr> {
    let adapter_name = guid_string(interface);
    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let mut size: u32 = 16 * 1024;

    // The adapter list can grow between the size query and the real call
    for _ in 0..3 {
        // u64 words keep the buffer aligned for IP_ADAPTER_ADDRESSES_LH
        let mut buffer = vec![0u64; (size as usize).div_ceil(8)];
        let first = buffer.as_mut_ptr() as *mut IP_ADAPTER_ADDRESSES_LH;

        let result = unsafe {
            GetAdaptersAddresses(AF_INET.0 as u32, flags, None, Some(first), &mut size)
        };
        if result == ERROR_BUFFER_OVERFLOW.0 {
            continue;
        }
        if result != ERROR_SUCCESS.0 {
            return None;
        }

        // SAFETY: the list and every pointer in it live inside `buffer`
        unsafe {
            let mut adapter = first;
            while !adapter.is_null() {
                let entry = &*adapter;
                if entry
                    .AdapterName
                    .to_string()
                    .is_ok_and(|name| name.eq_ignore_ascii_case(&adapter_name))
                {
                    return first_ipv4(entry.FirstUnicastAddress);
                }
                adapter = entry.Next;
            }
        }
        return None;
    }
    None
}

unsafe fn first_ipv4(mut unicast: *mut IP_ADAPTER_UNICAST_ADDRESS_LH) -> Option<Ipv4Addr> {
    while !unicast.is_null() {
        // SAFETY: walked from a list the caller holds alive
        let entry = unsafe { &*unicast };
        let sockaddr = entry.Address.lpSockaddr;
        if !sockaddr.is_null() && unsafe { (*sockaddr).sa_family } == AF_INET {
            let sin = unsafe { &*(sockaddr as *const SOCKADDR_IN) };
            // S_addr is in network byte order
            let octets = unsafe { sin.sin_addr.S_un.S_addr }.to_ne_bytes();
            return Some(Ipv4Addr::from(octets));
        }
        unicast = entry.Next;
    }
    None
}
