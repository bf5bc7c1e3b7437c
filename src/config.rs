use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::{Lowercase, Unquote};
use crate::error::ConfigError;
use crate::userknn::DEFAULT_NEIGHBORHOOD_SIZE_K;

// Set some default values
const DEFAULT_PORT: usize = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";
// The web front-end asks for six books per request.
const DEFAULT_NUM_ITEMS_TO_RECOMMEND: usize = 6;
const DEFAULT_TEST_USER_FRACTION: f64 = 0.1;
const DEFAULT_LIKE_THRESHOLD: f64 = 8.0;
const DEFAULT_QUERY_FRACTION: f64 = 0.5;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_METRIC_LENGTH: usize = 10;

pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
}

pub struct ServerConfig {
    pub host: String,
    pub port: usize,
    pub num_workers: usize,
}

pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RatingsLayout {
    /// One row per user, one column per item.
    Matrix,
    /// One `User-ID,ISBN,Book-Rating` row per rating.
    Triples,
}

pub struct DataConfig {
    pub ratings_path: String,
    pub ratings_layout: RatingsLayout,
    pub books_path: String,
}

pub struct ModelConfig {
    pub neighborhood_size_k: usize,
    pub num_items_to_recommend: usize,
}

pub struct EvaluationConfig {
    pub test_user_fraction: f64,
    pub like_threshold: f64,
    pub query_fraction: f64,
    pub seed: u64,
    pub metric_length: usize,
}

impl AppConfig {
    /// Reads the optional config file at `config_path` and applies
    /// environment overrides on top of it.
    pub fn new(config_path: &str) -> Result<AppConfig, ConfigError> {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(config_path) {
            let config_text =
                ConfigText::new(config_file, config_path).map_err(|e| ConfigError::File {
                    path: config_path.to_string(),
                    message: e.to_string(),
                })?;
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "ratings_path"]),
                OsStr::new("RATINGS_DATA"),
            ),
            (
                ConfPath::from(&["data", "books_path"]),
                OsStr::new("BOOKS_DATA"),
            ),
            (
                ConfPath::from(&["server", "num_workers"]),
                OsStr::new("NUM_WORKERS"),
            ),
            (ConfPath::from(&["log", "level"]), OsStr::new("LOG_LEVEL")),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    /// Parses configuration text only, without environment overrides.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<AppConfig, ConfigError> {
        let mut conf = Config::default();
        let config_text = ConfigText::new(reader, source_name).map_err(|e| ConfigError::File {
            path: source_name.to_string(),
            message: e.to_string(),
        })?;
        conf.add_source(config_text);
        AppConfig::parse(conf)
    }

    fn parse(conf: Config) -> Result<AppConfig, ConfigError> {
        Ok(AppConfig {
            server: ServerConfig::parse(&conf, ConfPath::from(&["server"])),
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"]))?,
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"])),
        })
    }
}

fn required(conf: &Config, path: &ConfPath, key: &str) -> Result<String, ConfigError> {
    conf.get(path.push(key))
        .unquote()
        .value()
        .map_err(|e| ConfigError::Value {
            key: key.to_string(),
            message: e.to_string(),
        })
}

impl ServerConfig {
    fn parse(conf: &Config, path: ConfPath) -> ServerConfig {
        ServerConfig {
            host: conf
                .get(path.push("host"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from("0.0.0.0")),
            port: conf.get(path.push("port")).trim().value().unwrap_or(DEFAULT_PORT),
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| sys_info::cpu_num().map(|qty| qty as usize).unwrap_or(1).max(1)),
        }
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .lowercase()
                .value()
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<DataConfig, ConfigError> {
        let layout: String = conf
            .get(path.push("ratings_layout"))
            .unquote()
            .lowercase()
            .value()
            .unwrap_or_else(|_| "matrix".to_string());
        let ratings_layout = match layout.as_str() {
            "matrix" => RatingsLayout::Matrix,
            "triples" => RatingsLayout::Triples,
            other => {
                return Err(ConfigError::Value {
                    key: "ratings_layout".to_string(),
                    message: format!("expected 'matrix' or 'triples', got '{}'", other),
                })
            }
        };

        Ok(DataConfig {
            ratings_path: required(conf, &path, "ratings_path")?,
            ratings_layout,
            books_path: required(conf, &path, "books_path")?,
        })
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            neighborhood_size_k: conf
                .get(path.push("neighborhood_size_k"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NEIGHBORHOOD_SIZE_K),
            num_items_to_recommend: conf
                .get(path.push("num_items_to_recommend"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_ITEMS_TO_RECOMMEND),
        }
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> EvaluationConfig {
        EvaluationConfig {
            test_user_fraction: conf
                .get(path.push("test_user_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_TEST_USER_FRACTION),
            like_threshold: conf
                .get(path.push("like_threshold"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_LIKE_THRESHOLD),
            query_fraction: conf
                .get(path.push("query_fraction"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_QUERY_FRACTION),
            seed: conf.get(path.push("seed")).trim().value().unwrap_or(DEFAULT_SEED),
            metric_length: conf
                .get(path.push("metric_length"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_METRIC_LENGTH),
        }
    }
}
