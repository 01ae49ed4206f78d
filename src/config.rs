use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::enumeration::Strategy;
use crate::pipeline::{EnsembleConfig, MarkovConfig, SamplingConfig};

/// Run settings as found in a `config.json`. Unrecognised keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub input_file: PathBuf,
    pub algorithm_to_use: Strategy,
    pub graphlet_size: usize,
    #[serde(default)]
    pub use_sampling: bool,
    #[serde(default)]
    pub sample_size: usize,
    #[serde(default = "default_count")]
    pub num_of_samples: usize,
    #[serde(default)]
    pub use_markov_graph_generation: bool,
    #[serde(default)]
    pub markov_steps: usize,
    #[serde(default = "default_count")]
    pub num_of_markov_graphs: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_count() -> usize {
    1
}

fn default_top() -> usize {
    10
}

fn default_parallel() -> bool {
    true
}

impl RunConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        read_json(path).with_context(|| format!("load run configuration from {:?}", path))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse run configuration")
    }

    /// `input_file` as given when absolute, otherwise relative to the directory
    /// holding the configuration file.
    pub fn resolve_input(&self, config_path: &Path) -> PathBuf {
        if self.input_file.is_absolute() {
            return self.input_file.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.input_file),
            None => self.input_file.clone(),
        }
    }

    /// Disabled sampling means one sample spanning the graph; disabled Markov
    /// generation means one unmodified graph.
    pub fn ensemble_config(&self) -> Result<EnsembleConfig> {
        if self.graphlet_size == 0 {
            bail!("graphlet_size must be at least 1");
        }
        let sampling = if self.use_sampling {
            if self.num_of_samples == 0 {
                bail!("num_of_samples must be at least 1 when sampling is enabled");
            }
            if self.sample_size < self.graphlet_size {
                bail!(
                    "sample_size {} is smaller than graphlet_size {}",
                    self.sample_size,
                    self.graphlet_size
                );
            }
            Some(SamplingConfig {
                size: self.sample_size,
                samples: self.num_of_samples,
            })
        } else {
            None
        };
        let markov = if self.use_markov_graph_generation {
            if self.num_of_markov_graphs == 0 {
                bail!("num_of_markov_graphs must be at least 1 when Markov generation is enabled");
            }
            Some(MarkovConfig {
                steps: self.markov_steps,
                graphs: self.num_of_markov_graphs,
            })
        } else {
            None
        };

        Ok(EnsembleConfig {
            graphlet_size: self.graphlet_size,
            strategy: self.algorithm_to_use,
            markov,
            sampling,
            seed: self.seed,
            parallel: self.parallel,
        })
    }
}

fn read_json<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path).with_context(|| format!("open json file {:?}", path))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("deserialize json file {:?}", path))
}
