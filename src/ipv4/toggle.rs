use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Upper bound for a single disable or enable command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);
/// Pause between disabling and re-enabling an interface.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Turns a named interface off and on. Each call reports success as a bool.
#[allow(async_fn_in_trait)]
pub trait InterfaceSwitch {
    async fn disable(&self, interface_name: &str) -> bool;
    async fn enable(&self, interface_name: &str) -> bool;
}

/// Switches interfaces with `netsh interface set interface`.
#[derive(Clone, Copy, Default, Debug)]
pub struct Netsh;

impl Netsh {
    async fn set_interface(&self, interface_name: &str, state: &str) -> bool {
        let mut command = Command::new("netsh");
        command
            .args(["interface", "set", "interface", interface_name, state])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        match command.status().await {
            Ok(status) if status.success() => true,
            Ok(status) => {
                tracing::warn!(
                    "netsh {} for \"{}\" exited with {}",
                    state,
                    interface_name,
                    status
                );
                false
            }
            Err(e) => {
                tracing::warn!("Failed to start netsh: {}", e);
                false
            }
        }
    }
}

impl InterfaceSwitch for Netsh {
    async fn disable(&self, interface_name: &str) -> bool {
        self.set_interface(interface_name, "disable").await
    }

    async fn enable(&self, interface_name: &str) -> bool {
        self.set_interface(interface_name, "enable").await
    }
}

/// Disables then re-enables an interface. Returns false as soon as a step
/// fails or exceeds [`COMMAND_TIMEOUT`]; nothing is retried.
pub async fn restart<S: InterfaceSwitch>(switch: &S, interface_name: &str) -> bool {
    tracing::info!("Restarting interface \"{}\"", interface_name);

    if !bounded("disable", interface_name, switch.disable(interface_name)).await {
        return false;
    }

    tokio::time::sleep(SETTLE_DELAY).await;

    bounded("enable", interface_name, switch.enable(interface_name)).await
}

async fn bounded(step: &str, interface_name: &str, command: impl Future<Output = bool>) -> bool {
    match tokio::time::timeout(COMMAND_TIMEOUT, command).await {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!("Failed to {} interface \"{}\"", step, interface_name);
            false
        }
        Err(_) => {
            tracing::warn!(
                "Timed out after {:?} trying to {} interface \"{}\"",
                COMMAND_TIMEOUT,
                step,
                interface_name
            );
            false
        }
    }
}
