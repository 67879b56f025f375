use crate::proxy::{FirstAvailable, LoadBalancePolicy, RandomRobin, RoundRobin};
use std::convert::TryFrom;
use tokio::time::Duration;

#[derive(Clone, Default)]
pub struct ProxyOptions {
    /// Upper bound for a single attempt at a single replica.
    pub rpc_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

pub(super) struct ProxyOptionsValidated {
    pub rpc_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ProxyOptionsValidated {
    fn validate(&self) -> Result<(), &'static str> {
        if self.rpc_timeout == Duration::from_millis(0) {
            return Err("RPC timeout must be non-zero");
        }
        if self.connect_timeout == Duration::from_millis(0) {
            return Err("Connect timeout must be non-zero");
        }
        if self.connect_timeout > self.rpc_timeout {
            return Err("Connect timeout must not be greater than RPC timeout");
        }

        Ok(())
    }
}

impl TryFrom<ProxyOptions> for ProxyOptionsValidated {
    type Error = &'static str;

    fn try_from(options: ProxyOptions) -> Result<Self, Self::Error> {
        let values = ProxyOptionsValidated {
            rpc_timeout: options.rpc_timeout.unwrap_or(Duration::from_millis(2000)),
            connect_timeout: options.connect_timeout.unwrap_or(Duration::from_millis(500)),
        };

        values.validate()?;
        Ok(values)
    }
}

/// Which policy a new proxy picks replicas with. Each proxy gets its own policy instance.
pub enum LoadBalancePolicyConfig {
    RoundRobin,
    RandomRobin,
    FirstAvailable,
    Custom(Box<dyn LoadBalancePolicy>),
}

impl Default for LoadBalancePolicyConfig {
    fn default() -> Self {
        LoadBalancePolicyConfig::RoundRobin
    }
}

impl LoadBalancePolicyConfig {
    pub(super) fn build(self) -> Box<dyn LoadBalancePolicy> {
        match self {
            LoadBalancePolicyConfig::RoundRobin => Box::new(RoundRobin::new()),
            LoadBalancePolicyConfig::RandomRobin => Box::new(RandomRobin),
            LoadBalancePolicyConfig::FirstAvailable => Box::new(FirstAvailable),
            LoadBalancePolicyConfig::Custom(policy) => policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let values = ProxyOptionsValidated::try_from(ProxyOptions::default()).unwrap();

        assert_eq!(values.rpc_timeout, Duration::from_millis(2000));
        assert_eq!(values.connect_timeout, Duration::from_millis(500));
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        let zero_rpc = ProxyOptions {
            rpc_timeout: Some(Duration::from_millis(0)),
            connect_timeout: Some(Duration::from_millis(0)),
        };
        assert!(ProxyOptionsValidated::try_from(zero_rpc).is_err());

        let zero_connect = ProxyOptions {
            connect_timeout: Some(Duration::from_millis(0)),
            ..ProxyOptions::default()
        };
        assert!(ProxyOptionsValidated::try_from(zero_connect).is_err());
    }

    #[test]
    fn connect_timeout_must_fit_in_rpc_timeout() {
        let options = ProxyOptions {
            rpc_timeout: Some(Duration::from_millis(100)),
            connect_timeout: Some(Duration::from_millis(200)),
        };

        assert_eq!(
            ProxyOptionsValidated::try_from(options).err(),
            Some("Connect timeout must not be greater than RPC timeout")
        );
    }
}
