//! Where live run payloads come from

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Result, StageGraphError};

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Raw payload provider polled once per tick.
pub trait RunSource {
    /// Run status: `{ "stages": [...], "complete": bool }` or a bare stage array
    fn fetch_run(&self) -> Result<String>;

    /// Flat step list for the run
    fn fetch_steps(&self) -> Result<String>;
}

/// Re-reads JSON files on every fetch. Without a steps file the run has no
/// steps.
#[derive(Debug, Clone)]
pub struct FileSource {
    run_path: PathBuf,
    steps_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(run_path: impl Into<PathBuf>, steps_path: Option<PathBuf>) -> Self {
        Self {
            run_path: run_path.into(),
            steps_path,
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| StageGraphError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })
}

impl RunSource for FileSource {
    fn fetch_run(&self) -> Result<String> {
        read_file(&self.run_path)
    }

    fn fetch_steps(&self) -> Result<String> {
        match &self.steps_path {
            Some(path) => read_file(path),
            None => Ok("[]".to_string()),
        }
    }
}

/// Polls `<base>/stages` and `<base>/steps` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    stages_url: String,
    steps_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("stagegraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StageGraphError::Fetch {
                url: base_url.to_string(),
                source: e,
            })?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            stages_url: format!("{base}/stages"),
            steps_url: format!("{base}/steps"),
        })
    }

    fn get(&self, url: &str) -> Result<String> {
        let fetch_error = |e| StageGraphError::Fetch {
            url: url.to_string(),
            source: e,
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(fetch_error)
    }
}

impl RunSource for HttpSource {
    fn fetch_run(&self) -> Result<String> {
        self.get(&self.stages_url)
    }

    fn fetch_steps(&self) -> Result<String> {
        self.get(&self.steps_url)
    }
}
