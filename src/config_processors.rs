use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem};

/// Strips surrounding double quotes from configuration strings.
pub trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    /// Values written as `"value"` become `value`. Surrounding whitespace is
    /// removed either way.
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|v| {
            let v = v.trim();
            let inner = v
                .strip_prefix('"')
                .and_then(|rest| rest.strip_suffix('"'))
                .unwrap_or(v);
            MapAction::Replace(vec![inner.to_owned()])
        })
    }
}

/// Lowercases keyword-like configuration values such as `log.level`.
pub trait Lowercase
where
    Self: Sized,
{
    fn lowercase(self) -> Result<StringItem, ConfigError>;
}

impl Lowercase for Result<StringItem, ConfigError> {
    fn lowercase(self) -> Result<StringItem, ConfigError> {
        self?.map(|v| MapAction::Replace(vec![v.to_lowercase()]))
    }
}
