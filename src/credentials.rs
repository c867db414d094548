use crate::error::PushError;

use log::debug;
use std::fmt;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Credential file used when `-c` is not given
pub const DEFAULT_CREDENTIAL_PATH: &str = "/opt/aws-scripts-mon/cloudwatch-creds";

const ACCESS_KEY_FIELD: &str = "AWSAccessKeyId";
const SECRET_KEY_FIELD: &str = "AWSSecretKey";

/// Static AWS key pair, held only for the lifetime of one invocation
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_key", &"** redacted **")
            .finish()
    }
}

/// Anything that yields credential file lines
pub trait CredentialSource {
    fn lines(&self) -> Result<Vec<String>, PushError>;
}

/// Credential lines read from a file on disk
pub struct FileCredentialSource {
    path: PathBuf,
}

impl FileCredentialSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CredentialSource for FileCredentialSource {
    fn lines(&self) -> Result<Vec<String>, PushError> {
        let to_error = |source| PushError::CredentialFile {
            path: self.path.clone(),
            source,
        };
        let file = File::open(&self.path).map_err(to_error)?;
        debug!("Reading credentials from {}", self.path.display());
        std::io::BufReader::new(file)
            .lines()
            .collect::<Result<Vec<String>, std::io::Error>>()
            .map_err(to_error)
    }
}

/// Extract the access key pair from `KEY=VALUE` lines.
///
/// Unknown keys are ignored and a later occurrence wins.
pub fn resolve_credentials<I, S>(lines: I) -> Result<Credentials, PushError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut access_key_id = String::new();
    let mut secret_key = String::new();
    for line in lines {
        let Some((key, value)) = line.as_ref().split_once('=') else {
            continue;
        };
        match key.trim() {
            ACCESS_KEY_FIELD => access_key_id = value.trim().to_string(),
            SECRET_KEY_FIELD => secret_key = value.trim().to_string(),
            _ => {}
        }
    }
    if access_key_id.is_empty() || secret_key.is_empty() {
        return Err(PushError::MissingCredentialField);
    }
    Ok(Credentials {
        access_key_id,
        secret_key,
    })
}
