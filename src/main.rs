use clap::Parser;
use log::{error, info};
use push_cloudwatch_metric::cloudwatch::CloudwatchPublisher;
use push_cloudwatch_metric::config::PushConfig;
use push_cloudwatch_metric::credentials::{FileCredentialSource, DEFAULT_CREDENTIAL_PATH};
use push_cloudwatch_metric::identity::ImdsMetadataSource;
use push_cloudwatch_metric::{main_runner, Collaborators, Outcome};
use std::path::PathBuf;
use std::process::ExitCode;

/// Post the given metrics to CloudWatch
#[derive(Debug, Parser)]
struct Opt {
    /// Namespace the metrics will be posted to
    namespace: String,

    /// Comma separated metric names
    name: String,

    /// Comma separated metric values, one float per name
    #[arg(allow_hyphen_values = true)]
    value: String,

    /// Comma separated units, missing trailing units default to None
    #[arg(short, long)]
    unit: Option<String>,

    /// Extra name=value pairs attached to every metric, i.e. name1=value1,name2=value2
    #[arg(short, long)]
    dimensions: Option<String>,

    /// Attach the instance id to dimensions to make an instance specific metric
    #[arg(short, long = "instance_specific")]
    instance_specific: bool,

    /// AWS credential file path
    #[arg(short, long, default_value = DEFAULT_CREDENTIAL_PATH)]
    credential: PathBuf,

    /// List metric info to be posted without pushing to CloudWatch
    #[arg(short, long)]
    verify: bool,
}

impl From<Opt> for PushConfig {
    fn from(opt: Opt) -> Self {
        PushConfig {
            namespace: opt.namespace,
            names: opt.name,
            values: opt.value,
            units: opt.unit,
            dimensions: opt.dimensions,
            credential_path: opt.credential,
            instance_specific: opt.instance_specific,
            verify: opt.verify,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_default_env().init();

    let config = PushConfig::from(Opt::parse());
    let credentials = FileCredentialSource::new(&config.credential_path);
    let metadata = ImdsMetadataSource::default();
    let mut publisher = CloudwatchPublisher::default();
    let collaborators = Collaborators {
        credentials: &credentials,
        metadata: &metadata,
        publisher: &mut publisher,
    };

    match main_runner(&config, collaborators).await {
        Ok(Outcome::Verified(summary)) => {
            print!("{}", summary);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Published(count)) => {
            info!("Done, {} metric(s) sent", count);
            ExitCode::SUCCESS
        }
        Err(err) => {
            if err.is_input_error() {
                error!("Invalid arguments: {:?}", err);
            } else {
                error!("Failed to push metrics: {:?}", err);
            }
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
