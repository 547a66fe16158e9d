use async_channel::{Sender, TrySendError};
use cardkit::host::HostError;
use cardkit::{ServiceCall, ServiceCaller};

/// Hands service calls from the UI thread to the background runtime.
#[derive(Debug, Clone)]
pub struct SocketHost {
    tx: Sender<ServiceCall>,
}

impl SocketHost {
    pub fn new(tx: Sender<ServiceCall>) -> Self {
        Self { tx }
    }
}

impl ServiceCaller for SocketHost {
    fn call_service(&self, call: ServiceCall) -> Result<(), HostError> {
        self.tx.try_send(call).map_err(|e| match e {
            TrySendError::Full(call) => HostError::Busy(call.domain, call.service),
            TrySendError::Closed(_) => HostError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardkit::host::ScriptId;

    #[test]
    fn test_calls_reach_the_runtime() {
        let (tx, rx) = async_channel::bounded(1);
        let host = SocketHost::new(tx);
        let call = ServiceCall::run_script(&ScriptId::from("fan_power"));

        host.call_service(call.clone()).unwrap();
        assert!(matches!(
            host.call_service(call.clone()),
            Err(HostError::Busy(domain, _)) if domain == "homeassistant"
        ));
        assert_eq!(rx.try_recv().unwrap(), call);

        drop(rx);
        assert!(matches!(host.call_service(call), Err(HostError::Closed)));
    }
}
