use crate::error::{WifiError, WifiResult, wlan_reason_text};
use crate::wifi::handle::{WlanHandle, ssid_to_string};
use crate::wifi::types::ConnectionEvent;
use tokio::sync::mpsc::UnboundedSender;
use windows::Win32::{Foundation::ERROR_SUCCESS, NetworkManagement::WiFi::*};

/// Registration for ACM connection notifications.
/// Unregisters and frees the forwarding channel on drop.
#[derive(Debug)]
pub struct WifiListener {
    handle: WlanHandle,
    context: *mut std::ffi::c_void,
}

impl Drop for WifiListener {
    fn drop(&mut self) {
        unsafe {
            let _ = WlanRegisterNotification(
                self.handle.as_raw(),
                WLAN_NOTIFICATION_SOURCE_NONE,
                true,
                None,
                None,
                None,
                None,
            );
            let _ = Box::from_raw(self.context as *mut UnboundedSender<ConnectionEvent>);
        }
    }
}

unsafe extern "system" fn notification_callback(
    data: *mut L2_NOTIFICATION_DATA,
    context: *mut std::ffi::c_void,
) {
    if data.is_null() || context.is_null() {
        return;
    }

    // SAFETY: both checked for null above; context is the boxed sender
    // created in start_wifi_listener and outlives the registration.
    let (data, sender) = unsafe {
        (
            &*data,
            &*(context as *const UnboundedSender<ConnectionEvent>),
        )
    };

    if data.NotificationSource != WLAN_NOTIFICATION_SOURCE_ACM {
        return;
    }

    let code = data.NotificationCode;
    let complete = wlan_notification_acm_connection_complete.0 as u32;
    let attempt_fail = wlan_notification_acm_connection_attempt_fail.0 as u32;
    let disconnected = wlan_notification_acm_disconnected.0 as u32;

    if code != complete && code != attempt_fail && code != disconnected {
        return;
    }
    if data.dwDataSize < std::mem::size_of::<WLAN_CONNECTION_NOTIFICATION_DATA>() as u32 {
        return;
    }

    // SAFETY: pData is a WLAN_CONNECTION_NOTIFICATION_DATA for these codes
    // and its size was checked above.
    let conn_data = unsafe { &*(data.pData as *const WLAN_CONNECTION_NOTIFICATION_DATA) };
    let ssid = ssid_to_string(&conn_data.dot11Ssid);

    let event = if code == disconnected {
        ConnectionEvent::Disconnected(ssid)
    } else if code == attempt_fail || conn_data.wlanReasonCode != 0 {
        // connection_complete also fires for unsuccessful attempts
        ConnectionEvent::Failed {
            ssid,
            reason_code: conn_data.wlanReasonCode,
            reason_str: wlan_reason_text(conn_data.wlanReasonCode).to_string(),
        }
    } else {
        ConnectionEvent::Connected(ssid)
    };
    let _ = sender.send(event);
}

/// Start forwarding connection notifications into `sender`
pub fn start_wifi_listener(sender: UnboundedSender<ConnectionEvent>) -> WifiResult<WifiListener> {
    let wlan_handle = WlanHandle::open()?;

    let context = Box::into_raw(Box::new(sender));

    unsafe {
        let result = WlanRegisterNotification(
            wlan_handle.as_raw(),
            WLAN_NOTIFICATION_SOURCE_ACM,
            false,
            Some(notification_callback),
            Some(context as *mut std::ffi::c_void),
            None,
            None,
        );

        if result != ERROR_SUCCESS.0 {
            let _ = Box::from_raw(context);
            return Err(WifiError::NotificationRegistrationFailed { code: result });
        }
    }

    Ok(WifiListener {
        handle: wlan_handle,
        context: context as *mut std::ffi::c_void,
    })
}
