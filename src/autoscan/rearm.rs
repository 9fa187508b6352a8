//! Re-arms the motion listener after the device restarts or the app is
//! updated, both of which clear platform activity-transition registrations.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::permissions::{has_auto_scan_permissions, PermissionChecker, PlatformCaps};
use crate::settings::SettingsStore;

use super::listener::MotionListener;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemRestartEvent {
    BootCompleted,
    PackageReplaced,
    Other(String),
}

impl SystemRestartEvent {
    fn as_str(&self) -> &str {
        match self {
            SystemRestartEvent::BootCompleted => "boot-completed",
            SystemRestartEvent::PackageReplaced => "package-replaced",
            SystemRestartEvent::Other(action) => action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RearmAction {
    Rearm,
    NoOp,
}

/// Pure decision: re-arm only when the user left auto-scan enabled and every
/// required permission still holds. A revoked permission leaves the flag as
/// it is; the listener stays unarmed until the user revisits the toggle.
pub fn restart_action(auto_scan_enabled: Option<bool>, permissions_granted: bool) -> RearmAction {
    if auto_scan_enabled == Some(true) && permissions_granted {
        RearmAction::Rearm
    } else {
        RearmAction::NoOp
    }
}

/// Restart hook invoked by the platform dispatch adapter. The arm call is
/// fire-and-forget; its completion is logged from the spawned task. The
/// returned handle lets callers observe completion; the hook itself never
/// awaits it.
pub fn handle_restart<L>(
    event: SystemRestartEvent,
    settings: &SettingsStore,
    permissions: &dyn PermissionChecker,
    caps: PlatformCaps,
    listener: Arc<L>,
) -> Option<JoinHandle<()>>
where
    L: MotionListener + 'static,
{
    if matches!(event, SystemRestartEvent::Other(_)) {
        warn!("Received event with unexpected action: {}", event.as_str());
        return None;
    }

    let auto_scan_enabled = settings.auto_scan_enabled();
    let permissions_granted = has_auto_scan_permissions(permissions, caps);

    debug!(
        "Received event: {}, auto scan enabled: {:?}, permissions granted: {}",
        event.as_str(),
        auto_scan_enabled,
        permissions_granted
    );

    match restart_action(auto_scan_enabled, permissions_granted) {
        RearmAction::NoOp => None,
        RearmAction::Rearm => {
            info!("Re-enabling activity transition listener");

            Some(tokio::spawn(async move {
                match listener.arm().await {
                    Ok(()) => info!("Activity transition listener enabled: true"),
                    Err(err) => {
                        warn!("Activity transition listener enabled: false ({err:?})")
                    }
                }
            }))
        }
    }
}
