mod controller;
mod listener;
mod rearm;

pub use controller::{AutoScanController, AutoScanState};
pub use listener::{arm_with_timeout, ArmOutcome, AuxServices, MotionListener, ARM_TIMEOUT};
pub use rearm::{handle_restart, restart_action, RearmAction, SystemRestartEvent};
