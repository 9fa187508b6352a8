use serde::{Deserialize, Serialize};

/// Platform capabilities needed for motion-triggered background scanning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    FineLocation,
    BackgroundLocation,
    ActivityRecognition,
    ReadPhoneState,
    PostNotifications,
    BluetoothScan,
    Bluetooth,
    BluetoothAdmin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::FineLocation => "fine-location",
            Permission::BackgroundLocation => "background-location",
            Permission::ActivityRecognition => "activity-recognition",
            Permission::ReadPhoneState => "read-phone-state",
            Permission::PostNotifications => "post-notifications",
            Permission::BluetoothScan => "bluetooth-scan",
            Permission::Bluetooth => "bluetooth",
            Permission::BluetoothAdmin => "bluetooth-admin",
        }
    }
}

/// Platform-version switches that change which permissions exist at all.
#[derive(Debug, Clone, Copy)]
pub struct PlatformCaps {
    /// Notifications need a runtime grant on newer platform versions.
    pub runtime_notification_permission: bool,
    /// Newer platforms expose a dedicated bluetooth-scan permission; older
    /// ones use the legacy bluetooth + bluetooth-admin pair.
    pub granular_bluetooth: bool,
}

impl Default for PlatformCaps {
    fn default() -> Self {
        Self {
            runtime_notification_permission: true,
            granular_bluetooth: true,
        }
    }
}

/// Permissions requested up front when enabling auto-scan.
pub fn basic_permissions(caps: PlatformCaps) -> Vec<Permission> {
    let mut needed = vec![
        Permission::FineLocation,
        Permission::ActivityRecognition,
        Permission::ReadPhoneState,
    ];

    if caps.runtime_notification_permission {
        needed.push(Permission::PostNotifications);
    }

    if caps.granular_bluetooth {
        needed.push(Permission::BluetoothScan);
    } else {
        needed.push(Permission::Bluetooth);
        needed.push(Permission::BluetoothAdmin);
    }

    needed
}

/// Background location has to be requested separately.
pub fn additional_permissions() -> Vec<Permission> {
    vec![Permission::BackgroundLocation]
}

/// Denial of these blocks auto-scan outright; the rest degrade gracefully.
pub fn blocking_permissions() -> Vec<Permission> {
    vec![Permission::FineLocation, Permission::ActivityRecognition]
}

/// Synchronous view of the platform's grant state, supplied by the embedding
/// shell. Re-evaluated on every check; never cached by this crate.
pub trait PermissionChecker: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;

    fn missing(&self, required: &[Permission]) -> Vec<Permission> {
        required
            .iter()
            .copied()
            .filter(|p| !self.is_granted(*p))
            .collect()
    }
}

/// True when every permission auto-scan needs (basic + background) is granted.
pub fn has_auto_scan_permissions(checker: &dyn PermissionChecker, caps: PlatformCaps) -> bool {
    checker.missing(&basic_permissions(caps)).is_empty()
        && checker.missing(&additional_permissions()).is_empty()
}
