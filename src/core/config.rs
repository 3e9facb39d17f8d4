use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default ceiling for an archive's uncompressed/compressed size ratio.
pub const DEFAULT_MAX_ZIP_RATIO: f64 = 200.0;

/// Default absolute tolerance for debit/credit comparisons (0.01).
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.01);

/// Cooperative cancellation flag, checked by the parser at every end-event.
///
/// Clones share the same flag, so one clone can be handed to the parse and
/// another kept by the caller.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every parse holding this flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parameters for loading a SAF-T document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Maximum Σuncompressed / Σcompressed ratio accepted for ZIP input.
    pub max_zip_ratio: f64,
    /// Run resolver, parser and validator but skip the export sink.
    pub validate_only: bool,
    /// XSD used for schema pre-validation; requires a `SchemaValidator`.
    pub xsd_path: Option<PathBuf>,
    /// Absolute tolerance for all balance checks.
    pub tolerance: Decimal,
    /// How many worst offenders a balance diagnostic lists.
    pub max_offenders: usize,
    #[serde(skip)]
    pub cancellation: Option<Cancellation>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_zip_ratio: DEFAULT_MAX_ZIP_RATIO,
            validate_only: false,
            xsd_path: None,
            tolerance: DEFAULT_TOLERANCE,
            max_offenders: 10,
            cancellation: None,
        }
    }
}

impl LoadConfig {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(Cancellation::is_cancelled)
    }
}

/// Builder for [`LoadConfig`].
///
/// # Example
///
/// ```
/// use saft_ledger::LoadConfigBuilder;
/// use rust_decimal_macros::dec;
///
/// let config = LoadConfigBuilder::new()
///     .max_zip_ratio(50.0)
///     .tolerance(dec!(0.05))
///     .validate_only(true)
///     .build();
/// assert!(config.validate_only);
/// ```
#[derive(Debug, Default)]
pub struct LoadConfigBuilder {
    config: LoadConfig,
}

impl LoadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_zip_ratio(mut self, ratio: f64) -> Self {
        self.config.max_zip_ratio = ratio;
        self
    }

    pub fn validate_only(mut self, validate_only: bool) -> Self {
        self.config.validate_only = validate_only;
        self
    }

    pub fn xsd_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.xsd_path = Some(path.into());
        self
    }

    pub fn tolerance(mut self, tolerance: Decimal) -> Self {
        self.config.tolerance = tolerance.abs();
        self
    }

    pub fn max_offenders(mut self, n: usize) -> Self {
        self.config.max_offenders = n;
        self
    }

    pub fn cancellation(mut self, cancellation: Cancellation) -> Self {
        self.config.cancellation = Some(cancellation);
        self
    }

    pub fn build(self) -> LoadConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = LoadConfig::default();
        assert_eq!(c.max_zip_ratio, 200.0);
        assert_eq!(c.tolerance, dec!(0.01));
        assert!(!c.validate_only);
        assert!(!c.is_cancelled());
    }

    #[test]
    fn cancellation_is_shared_between_clones() {
        let flag = Cancellation::new();
        let config = LoadConfigBuilder::new().cancellation(flag.clone()).build();
        assert!(!config.is_cancelled());
        flag.cancel();
        assert!(config.is_cancelled());
    }

    #[test]
    fn serde_round_trip_drops_cancellation() {
        let config = LoadConfigBuilder::new()
            .xsd_path("SAF-T.xsd")
            .tolerance(dec!(-0.5))
            .cancellation(Cancellation::new())
            .build();
        let json = serde_json::to_string(&config).unwrap();
        let back: LoadConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tolerance, dec!(0.5));
        assert_eq!(back.xsd_path, Some(PathBuf::from("SAF-T.xsd")));
        assert!(back.cancellation.is_none());
    }
}
