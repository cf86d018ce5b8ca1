// # AWS Provider
//
// Route53 DNS backend and S3 configuration source for the dynamic DNS
// service, built on the AWS SDK.
//
// ## Components
//
// - `sdk`: shared SDK configuration with the default credentials chain
// - `route53`: `DnsBackend` reading and upserting the hostname's record
// - `s3`: `ConfigSource` fetching the JSON configuration object
//
// ## Security Requirements
//
// - Credentials are resolved by the SDK and NEVER appear in logs

pub mod route53;
pub mod s3;
pub mod sdk;

pub use route53::Route53Backend;
pub use s3::{S3ConfigSource, S3Location};
pub use sdk::{DEFAULT_REGION, load_sdk_config};
