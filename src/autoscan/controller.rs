use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;

use crate::notify::{Notice, NoticeSink};
use crate::permissions::{
    additional_permissions, basic_permissions, blocking_permissions, Permission,
    PermissionChecker, PlatformCaps,
};
use crate::settings::SettingsStore;

use super::listener::{arm_with_timeout, ArmOutcome, AuxServices, MotionListener};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AutoScanState {
    Disabled,
    PendingBasicPermissions,
    PendingAdditionalPermissions,
    Enabled,
}

/// Drives the auto-scan toggle: permission gating, arming the platform
/// motion listener with a bounded timeout, and persisting the enabled flag.
///
/// No operation returns an error; platform failures are logged and surfaced
/// as user notices, leaving the state machine in a well-defined state.
pub struct AutoScanController<L, A> {
    settings: Arc<SettingsStore>,
    permissions: Arc<dyn PermissionChecker>,
    notices: Arc<dyn NoticeSink>,
    listener: L,
    services: A,
    caps: PlatformCaps,
    state: AutoScanState,
}

impl<L: MotionListener, A: AuxServices> AutoScanController<L, A> {
    pub fn new(
        settings: Arc<SettingsStore>,
        permissions: Arc<dyn PermissionChecker>,
        notices: Arc<dyn NoticeSink>,
        listener: L,
        services: A,
        caps: PlatformCaps,
    ) -> Self {
        let state = if settings.auto_scan_enabled() == Some(true) {
            AutoScanState::Enabled
        } else {
            AutoScanState::Disabled
        };

        Self {
            settings,
            permissions,
            notices,
            listener,
            services,
            caps,
            state,
        }
    }

    pub fn state(&self) -> AutoScanState {
        self.state
    }

    /// User flipped the toggle on. Depending on what is already granted this
    /// either arms the listener directly or parks in a pending state until
    /// the shell reports the permission-dialog outcome.
    pub async fn request_enable(&mut self) {
        if self.state == AutoScanState::Enabled {
            return;
        }

        // If the auxiliary services layer is not available, try to make it
        // available before doing anything
        if !self.services.is_available() {
            if let Err(err) = self.services.make_available().await {
                warn!("Failed to make auxiliary services available, cannot enable auto-scan: {err:?}");
                return;
            }
        }

        if !self.missing_basic().is_empty() {
            self.state = AutoScanState::PendingBasicPermissions;
        } else if !self.missing_additional().is_empty() {
            self.state = AutoScanState::PendingAdditionalPermissions;
        } else {
            self.try_enable().await;
        }
    }

    /// Shell reports that the basic permission dialog closed; the checker is
    /// re-queried for the outcome. Denial of a blocking permission (fine
    /// location or activity recognition) cancels the enable attempt.
    pub async fn resolve_basic_permissions(&mut self) {
        let missing = self.missing_basic();
        let blocked = blocking_permissions()
            .iter()
            .any(|p| missing.contains(p));

        if blocked {
            self.state = AutoScanState::Disabled;
            self.notices.notify(Notice::PermissionsNotGranted);
        } else if !self.missing_additional().is_empty() {
            self.state = AutoScanState::PendingAdditionalPermissions;
        } else {
            self.try_enable().await;
        }
    }

    /// Shell reports that the background-location dialog closed.
    pub async fn resolve_additional_permissions(&mut self) {
        if self.missing_additional().is_empty() {
            self.try_enable().await;
        } else {
            self.state = AutoScanState::Disabled;
            self.notices.notify(Notice::PermissionsNotGranted);
        }
    }

    /// User flipped the toggle off. Disarming has no failure branch.
    pub async fn request_disable(&mut self) {
        self.listener.disarm().await;

        if let Err(err) = self.settings.set_auto_scan_enabled(false) {
            error!("Failed to persist auto-scan flag: {err:?}");
        }

        self.state = AutoScanState::Disabled;

        info!("Disabled activity transition listener");
    }

    async fn try_enable(&mut self) {
        match arm_with_timeout(&self.listener).await {
            ArmOutcome::Armed => {
                if let Err(err) = self.settings.set_auto_scan_enabled(true) {
                    error!("Failed to persist auto-scan flag: {err:?}");
                }

                self.state = AutoScanState::Enabled;

                info!("Enabled activity transition listener");
            }
            ArmOutcome::TimedOut | ArmOutcome::PlatformRejected => {
                // Flag stays untouched; never partially enabled.
                self.state = AutoScanState::Disabled;
                self.notices.notify(Notice::AutoScanEnableFailed);
            }
        }
    }

    fn missing_basic(&self) -> Vec<Permission> {
        self.permissions.missing(&basic_permissions(self.caps))
    }

    fn missing_additional(&self) -> Vec<Permission> {
        self.permissions.missing(&additional_permissions())
    }
}
