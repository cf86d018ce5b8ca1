// Daemon configuration, read from environment variables only.

use anyhow::Result;
use dyndns_provider_aws::S3Location;
use std::net::SocketAddr;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub config_source: String,
    pub config_file: Option<String>,
    pub s3_location: Option<S3Location>,
    pub dns_backend: String,
    pub trust_forwarded_for: String,
    pub script_file: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            listen_addr: lookup("DYNDNS_LISTEN_ADDR")
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            config_source: lookup("DYNDNS_CONFIG_SOURCE").unwrap_or_else(|| "s3".to_string()),
            config_file: lookup("DYNDNS_CONFIG_FILE"),
            s3_location: S3Location::from_lookup(&lookup).ok(),
            dns_backend: lookup("DYNDNS_DNS_BACKEND").unwrap_or_else(|| "route53".to_string()),
            trust_forwarded_for: lookup("DYNDNS_TRUST_FORWARDED_FOR")
                .unwrap_or_else(|| "false".to_string()),
            script_file: lookup("DYNDNS_SCRIPT_FILE").filter(|p| !p.is_empty()),
            log_level: lookup("DYNDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Validate the configuration
    ///
    /// Checks that every selected component has what it needs to start:
    /// - Listen address parses as `ip:port`
    /// - Config source and DNS backend names are known
    /// - Source-specific settings (file path, S3 location) are present
    ///
    /// AWS credentials are not checked here; the SDK resolves them lazily.
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "DYNDNS_LISTEN_ADDR '{}' is not a valid socket address. \
                Example: export DYNDNS_LISTEN_ADDR=0.0.0.0:8080",
                self.listen_addr
            );
        }

        match self.config_source.as_str() {
            "s3" => {
                if self.s3_location.is_none() {
                    anyhow::bail!(
                        "You have to configure the environment variables \
                        CONFIG_S3_REGION, CONFIG_S3_BUCKET and CONFIG_S3_KEY."
                    );
                }
            }
            "file" => {
                if self.config_file.as_ref().is_none_or(|p| p.is_empty()) {
                    anyhow::bail!(
                        "DYNDNS_CONFIG_FILE is required when DYNDNS_CONFIG_SOURCE=file. \
                        Set it via: export DYNDNS_CONFIG_FILE=/etc/dyndns/config.json"
                    );
                }
            }
            _ => anyhow::bail!(
                "DYNDNS_CONFIG_SOURCE '{}' is not supported. \
                Supported sources: s3, file",
                self.config_source
            ),
        }

        match self.dns_backend.as_str() {
            "route53" | "memory" => {}
            _ => anyhow::bail!(
                "DYNDNS_DNS_BACKEND '{}' is not supported. \
                Supported backends: route53, memory",
                self.dns_backend
            ),
        }

        if self.trust_forwarded_for().is_none() {
            anyhow::bail!(
                "DYNDNS_TRUST_FORWARDED_FOR '{}' is not valid. Valid values: true, false",
                self.trust_forwarded_for
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DYNDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Whether the source IP is taken from `X-Forwarded-For`
    pub fn trust_forwarded_for(&self) -> Option<bool> {
        match self.trust_forwarded_for.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        }
    }

    /// Whether any selected component talks to AWS
    pub fn uses_aws(&self) -> bool {
        self.config_source == "s3" || self.dns_backend == "route53"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const S3: [(&str, &str); 3] = [
        ("CONFIG_S3_REGION", "eu-central-1"),
        ("CONFIG_S3_BUCKET", "bucket"),
        ("CONFIG_S3_KEY", "config.json"),
    ];

    #[test]
    fn test_defaults_need_s3_location() {
        let cfg = config(&[]);
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.config_source, "s3");
        assert_eq!(cfg.dns_backend, "route53");
        assert_eq!(cfg.trust_forwarded_for(), Some(false));

        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "You have to configure the environment variables \
             CONFIG_S3_REGION, CONFIG_S3_BUCKET and CONFIG_S3_KEY."
        );
    }

    #[test]
    fn test_complete_s3_route53_config() {
        let cfg = config(&S3);
        cfg.validate().unwrap();
        assert!(cfg.uses_aws());
        assert_eq!(cfg.s3_location.unwrap().bucket, "bucket");
    }

    #[test]
    fn test_file_and_memory_stay_off_aws() {
        let cfg = config(&[
            ("DYNDNS_CONFIG_SOURCE", "file"),
            ("DYNDNS_CONFIG_FILE", "/etc/dyndns/config.json"),
            ("DYNDNS_DNS_BACKEND", "memory"),
        ]);
        cfg.validate().unwrap();
        assert!(!cfg.uses_aws());
    }

    #[test]
    fn test_file_source_requires_path() {
        let cfg = config(&[
            ("DYNDNS_CONFIG_SOURCE", "file"),
            ("DYNDNS_DNS_BACKEND", "memory"),
        ]);
        assert!(cfg.validate().unwrap_err().to_string().contains("DYNDNS_CONFIG_FILE"));
    }

    #[test]
    fn test_route53_without_static_credentials() {
        let cfg = config(&[
            ("DYNDNS_CONFIG_SOURCE", "file"),
            ("DYNDNS_CONFIG_FILE", "/etc/dyndns/config.json"),
        ]);
        cfg.validate().unwrap();
        assert!(cfg.uses_aws());
    }

    #[test]
    fn test_rejects_unknown_values() {
        let base = [
            ("DYNDNS_CONFIG_SOURCE", "file"),
            ("DYNDNS_CONFIG_FILE", "/etc/dyndns/config.json"),
            ("DYNDNS_DNS_BACKEND", "memory"),
        ];

        let cases = [
            ("DYNDNS_LISTEN_ADDR", "localhost", "DYNDNS_LISTEN_ADDR"),
            ("DYNDNS_CONFIG_SOURCE", "consul", "DYNDNS_CONFIG_SOURCE"),
            ("DYNDNS_DNS_BACKEND", "bind", "DYNDNS_DNS_BACKEND"),
            ("DYNDNS_TRUST_FORWARDED_FOR", "maybe", "DYNDNS_TRUST_FORWARDED_FOR"),
            ("DYNDNS_LOG_LEVEL", "verbose", "DYNDNS_LOG_LEVEL"),
        ];

        for (key, value, expected) in cases {
            let mut pairs: Vec<(&str, &str)> =
                base.iter().copied().filter(|(k, _)| *k != key).collect();
            pairs.push((key, value));
            let err = config(&pairs).validate().unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "{}={} should be rejected, got: {}",
                key,
                value,
                err
            );
        }
    }

    #[test]
    fn test_script_file() {
        assert_eq!(config(&[]).script_file, None);
        assert_eq!(config(&[("DYNDNS_SCRIPT_FILE", "")]).script_file, None);
        assert_eq!(
            config(&[("DYNDNS_SCRIPT_FILE", "/usr/share/dyndns/dyndns.sh")])
                .script_file
                .as_deref(),
            Some("/usr/share/dyndns/dyndns.sh")
        );
    }
}
