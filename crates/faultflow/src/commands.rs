use colored::Colorize;
use faultflow_cloud::{ActionSpec, Executor};
use faultflow_cloud_aliyun::{AliyunChannel, EcsClientConfig};
use faultflow_config::Settings;
use std::sync::Arc;

/// Every registered action description, grouped by provider
pub fn registry() -> Vec<&'static ActionSpec> {
    #[allow(unused_mut)]
    let mut specs = faultflow_cloud_aliyun::specs();
    #[cfg(feature = "aws")]
    specs.extend(faultflow_cloud_aws::specs());
    specs
}

/// Executors of one provider, wired to a channel built from the settings
pub fn executors(provider: &str, settings: &Settings) -> Vec<Box<dyn Executor>> {
    match provider {
        "aliyun" => {
            let channel = AliyunChannel::new(EcsClientConfig {
                endpoint: settings.aliyun.endpoint.clone(),
                timeout: settings.aliyun.timeout(),
            });
            faultflow_cloud_aliyun::executors(Arc::new(channel))
        }
        #[cfg(feature = "aws")]
        "aws" => {
            let channel = faultflow_cloud_aws::AwsChannel::new(faultflow_cloud_aws::Ec2ClientConfig {
                endpoint_url: settings.aws.endpoint_url.clone(),
                timeout: settings.aws.timeout(),
            });
            faultflow_cloud_aws::executors(Arc::new(channel))
        }
        _ => Vec::new(),
    }
}

pub fn list() {
    let mut provider = "";
    for spec in registry() {
        if spec.provider != provider {
            provider = spec.provider;
            println!("{}", provider.bold());
        }
        println!(
            "  {:<18} {}",
            spec.kind.cyan(),
            spec.operations.names().join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executors_match_registry() {
        let settings = Settings::default();
        let aliyun = executors("aliyun", &settings);
        let kinds: Vec<_> = registry()
            .iter()
            .filter(|s| s.provider == "aliyun")
            .map(|s| s.kind)
            .collect();
        let names: Vec<_> = aliyun.iter().map(|e| e.name()).collect();
        assert_eq!(names, kinds);
    }

    #[test]
    fn test_unknown_provider_has_no_executors() {
        assert!(executors("gcp", &Settings::default()).is_empty());
    }

    #[cfg(feature = "aws")]
    #[test]
    fn test_aws_registered() {
        let names: Vec<_> = executors("aws", &Settings::default())
            .iter()
            .map(|e| e.name())
            .collect();
        assert_eq!(names, vec!["ec2"]);
    }
}
