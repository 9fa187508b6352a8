use anyhow::Result;
use log::warn;
use tokio::time::{timeout, Duration};

/// Deadline imposed on the platform arm call. The underlying API may never
/// complete (stub implementations of the auxiliary services layer), so the
/// caller bounds it instead of trusting the platform.
pub const ARM_TIMEOUT: Duration = Duration::from_secs(2);

/// Platform activity-recognition listener. `arm` registers for motion
/// transition events; `disarm` unregisters and is treated as
/// always-succeeding by callers.
pub trait MotionListener: Send + Sync {
    fn arm(&self) -> impl std::future::Future<Output = Result<()>> + Send;
    fn disarm(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// Auxiliary services layer hosting the location/motion APIs. Making it
/// available is a user-interaction step, so no caller-side timeout applies.
pub trait AuxServices: Send + Sync {
    fn is_available(&self) -> bool;
    fn make_available(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Result of an arm attempt; timeout is a definite failure, distinct from
/// the platform rejecting the registration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArmOutcome {
    Armed,
    TimedOut,
    PlatformRejected,
}

pub async fn arm_with_timeout<L: MotionListener>(listener: &L) -> ArmOutcome {
    match timeout(ARM_TIMEOUT, listener.arm()).await {
        Ok(Ok(())) => ArmOutcome::Armed,
        Ok(Err(err)) => {
            warn!("Platform rejected activity transition listener: {err:?}");
            ArmOutcome::PlatformRejected
        }
        Err(_) => {
            warn!(
                "Arming activity transition listener timed out after {}s",
                ARM_TIMEOUT.as_secs()
            );
            ArmOutcome::TimedOut
        }
    }
}
