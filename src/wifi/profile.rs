use crate::error::{WifiError, WifiResult};
use crate::wifi::handle::{WlanHandle, wide};
use crate::wifi::types::SecurityClass;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use secrecy::{ExposeSecret, SecretString};
use std::io::Cursor;
use windows::{
    Win32::{Foundation::ERROR_SUCCESS, NetworkManagement::WiFi::*},
    core::PCWSTR,
};

/// authentication / encryption pair used in the profile for each class
fn auth_encryption(security: SecurityClass) -> WifiResult<(&'static str, &'static str)> {
    let pair = match security {
        SecurityClass::Open => ("open", "none"),
        SecurityClass::Wep => ("open", "WEP"),
        SecurityClass::Wpa => ("WPAPSK", "TKIP"),
        SecurityClass::Wpa2 | SecurityClass::Mixed | SecurityClass::Unknown => ("WPA2PSK", "AES"),
        SecurityClass::Wpa3 => ("WPA3SAE", "AES"),
        SecurityClass::Enterprise => return Err(WifiError::UnsupportedSecurity(security)),
    };
    Ok(pair)
}

const PROFILE_PREFIX: &str = "wifipick-";

/// Name of the profile written for a join attempt. Never the bare SSID, so
/// a profile the user saved for the same network is left alone.
pub fn temporary_profile_name(ssid: &str) -> String {
    format!("{PROFILE_PREFIX}{ssid}")
}

/// Profiles this radio registered, removed again on an erasing disconnect
#[derive(Debug, Default)]
pub struct ProfileLedger {
    owned: Vec<String>,
}

impl ProfileLedger {
    /// Remember a profile after it was written. Names without our prefix
    /// belong to the user and are never taken over.
    pub fn record(&mut self, name: &str) -> bool {
        if !name.starts_with(PROFILE_PREFIX) {
            return false;
        }
        if !self.owns(name) {
            self.owned.push(name.to_string());
        }
        true
    }

    pub fn owns(&self, name: &str) -> bool {
        self.owned.iter().any(|p| p == name)
    }

    /// Hand over every owned name and forget them
    pub fn take_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.owned)
    }
}

/// Build a manual-connect profile for one join attempt
pub fn create_profile_xml(
    profile_name: &str,
    ssid: &str,
    security: SecurityClass,
    password: Option<&SecretString>,
) -> WifiResult<String> {
    let (auth, cipher) = auth_encryption(security)?;

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let _ = writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)));

    let mut wlan_profile = BytesStart::new("WLANProfile");
    wlan_profile.push_attribute((
        "xmlns",
        "http://www.microsoft.com/networking/WLAN/profile/v1",
    ));
    let _ = writer.write_event(Event::Start(wlan_profile));

    write_element(&mut writer, "name", profile_name);

    let _ = writer.write_event(Event::Start(BytesStart::new("SSIDConfig")));
    let _ = writer.write_event(Event::Start(BytesStart::new("SSID")));
    write_element(&mut writer, "name", ssid);
    let _ = writer.write_event(Event::End(BytesEnd::new("SSID")));
    let _ = writer.write_event(Event::End(BytesEnd::new("SSIDConfig")));

    write_element(&mut writer, "connectionType", "ESS");
    write_element(&mut writer, "connectionMode", "manual");

    let _ = writer.write_event(Event::Start(BytesStart::new("MSM")));
    let _ = writer.write_event(Event::Start(BytesStart::new("security")));
    let _ = writer.write_event(Event::Start(BytesStart::new("authEncryption")));
    write_element(&mut writer, "authentication", auth);
    write_element(&mut writer, "encryption", cipher);
    write_element(&mut writer, "useOneX", "false");
    let _ = writer.write_event(Event::End(BytesEnd::new("authEncryption")));

    if let Some(pwd) = password.filter(|_| !security.is_open()) {
        let key_type = if security == SecurityClass::Wep {
            "networkKey"
        } else {
            "passPhrase"
        };
        let _ = writer.write_event(Event::Start(BytesStart::new("sharedKey")));
        write_element(&mut writer, "keyType", key_type);
        write_element(&mut writer, "protected", "false");
        write_element(&mut writer, "keyMaterial", pwd.expose_secret());
        let _ = writer.write_event(Event::End(BytesEnd::new("sharedKey")));
    }

    let _ = writer.write_event(Event::End(BytesEnd::new("security")));
    let _ = writer.write_event(Event::End(BytesEnd::new("MSM")));
    let _ = writer.write_event(Event::End(BytesEnd::new("WLANProfile")));

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, value: &str) {
    let _ = writer.write_event(Event::Start(BytesStart::new(name)));
    let _ = writer.write_event(Event::Text(BytesText::new(value)));
    let _ = writer.write_event(Event::End(BytesEnd::new(name)));
}

/// Register (or overwrite) a profile on the interface
pub fn set_profile(handle: &WlanHandle, xml: &str) -> WifiResult<()> {
    let xml_wide = wide(xml);
    unsafe {
        let mut reason_code = 0;
        let result = WlanSetProfile(
            handle.as_raw(),
            handle.interface(),
            0,
            PCWSTR(xml_wide.as_ptr()),
            None,
            true,
            None,
            &mut reason_code,
        );

        if result != ERROR_SUCCESS.0 {
            return Err(WifiError::ProfileRejected {
                code: result,
                reason: reason_code,
            });
        }
    }
    Ok(())
}

/// Remove a profile by name
pub fn delete_profile(handle: &WlanHandle, name: &str) -> WifiResult<()> {
    let name_wide = wide(name);
    unsafe {
        let result = WlanDeleteProfile(
            handle.as_raw(),
            handle.interface(),
            PCWSTR(name_wide.as_ptr()),
            None,
        );
        if result != ERROR_SUCCESS.0 {
            return Err(WifiError::ProfileDeleteFailed {
                name: name.to_string(),
                code: result,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_profile_carries_passphrase() {
        let pw = SecretString::from("s3cret");
        let name = temporary_profile_name("Home");
        let xml = create_profile_xml(&name, "Home", SecurityClass::Wpa2, Some(&pw)).unwrap();
        assert!(xml.contains("<name>wifipick-Home</name>"));
        assert!(xml.contains("<SSID><name>Home</name></SSID>"));
        assert!(xml.contains("<authentication>WPA2PSK</authentication>"));
        assert!(xml.contains("<keyMaterial>s3cret</keyMaterial>"));
        assert!(xml.contains("<connectionMode>manual</connectionMode>"));
    }

    #[test]
    fn open_profile_has_no_key() {
        let xml = create_profile_xml("wifipick-Cafe", "Cafe", SecurityClass::Open, None).unwrap();
        assert!(xml.contains("<encryption>none</encryption>"));
        assert!(!xml.contains("sharedKey"));
    }

    #[test]
    fn enterprise_is_rejected() {
        assert!(matches!(
            create_profile_xml("wifipick-Corp", "Corp", SecurityClass::Enterprise, None),
            Err(WifiError::UnsupportedSecurity(SecurityClass::Enterprise))
        ));
    }

    #[test]
    fn join_profile_never_reuses_the_network_name() {
        for ssid in ["Home", "wifipick", ""] {
            assert_ne!(temporary_profile_name(ssid), ssid);
        }
    }

    #[test]
    fn ledger_only_owns_profiles_it_wrote() {
        let mut ledger = ProfileLedger::default();

        // a profile the user saved for "Home" is never scheduled for removal
        assert!(!ledger.record("Home"));
        assert!(!ledger.owns("Home"));

        let ours = temporary_profile_name("Home");
        assert!(ledger.record(&ours));
        assert!(ledger.record(&ours));
        assert_eq!(ledger.take_all(), [ours.clone()]);
        assert!(!ledger.owns(&ours));
        assert!(ledger.take_all().is_empty());
    }
}
