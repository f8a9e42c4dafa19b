//! Typed accessors for the ingest performance-test settings
//!
//! [`TestProperties`] wraps a [`PropertyStore`] and exposes five settings:
//!
//! | Setting | Key | Missing on read |
//! |---|---|---|
//! | metrics listener class | [`keys::METRICS_LISTENER_CLASS`] | `None` |
//! | batch size | [`keys::BATCH_SIZE`] | [`Error::MalformedValue`] |
//! | R-MAT probabilities | [`keys::RMAT_PROBABILITIES`] | [`DEFAULT_RMAT_PROBABILITIES`] |
//! | R-MAT include entities | [`keys::RMAT_INCLUDE_ENTITIES`] | `false` |
//! | R-MAT max node id | [`keys::RMAT_MAX_NODE_ID`] | [`Error::MalformedValue`] |
//!
//! Setters validate before writing, so a rejected value never reaches the
//! store. Getters parse whatever text is stored, including text written
//! directly into the store by other tooling.

use crate::constants::{
    DEFAULT_RMAT_PROBABILITIES, RMAT_PROBABILITY_COUNT, RMAT_SUM_MAX, RMAT_SUM_MIN,
};
use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use crate::store::{MemoryStore, PropertyStore};
use std::path::Path;

/// Fixed store keys for each setting
pub mod keys {
    pub const METRICS_LISTENER_CLASS: &str = "gaffer.performancetesting.ingest.metricsListener";
    pub const BATCH_SIZE: &str = "gaffer.performancetesting.ingest.batchSize";
    pub const RMAT_PROBABILITIES: &str = "gaffer.performancetesting.ingest.rmat.probabilities";
    pub const RMAT_INCLUDE_ENTITIES: &str =
        "gaffer.performancetesting.ingest.rmat.includeEntities";
    pub const RMAT_MAX_NODE_ID: &str = "gaffer.performancetesting.ingest.rmat.maxNodeId";

    /// Every key, in declaration order
    pub const ALL: [&str; 5] = [
        METRICS_LISTENER_CLASS,
        BATCH_SIZE,
        RMAT_PROBABILITIES,
        RMAT_INCLUDE_ENTITIES,
        RMAT_MAX_NODE_ID,
    ];
}

/// Typed view over a property store.
///
/// # Example
///
/// ```
/// use perftest_props::TestProperties;
///
/// let mut props = TestProperties::new();
/// props.set_batch_size(500)?;
/// props.set_rmat_probabilities(Some(&[0.25, 0.25, 0.25, 0.25]))?;
/// props.set_rmat_include_entities(true);
/// props.set_rmat_max_node_id(1_000_000);
///
/// assert_eq!(props.batch_size()?, 500);
/// assert_eq!(props.rmat_probabilities()?, vec![0.25; 4]);
/// assert!(props.rmat_include_entities());
/// assert_eq!(props.rmat_max_node_id()?, 1_000_000);
/// # Ok::<(), perftest_props::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestProperties<S: PropertyStore = MemoryStore> {
    store: S,
}

impl TestProperties<MemoryStore> {
    /// Create accessors over a fresh, empty in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: PropertyStore> TestProperties<S> {
    /// Wrap an existing store.
    ///
    /// Pass `&mut store` to mutate a store owned elsewhere in place.
    pub fn from_store(store: S) -> Self {
        Self { store }
    }

    /// Read-only access to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }

    // -------------------------------------------------------------------------
    // Metrics listener
    // -------------------------------------------------------------------------

    /// Name of the metrics listener implementation, if configured
    pub fn metrics_listener_class(&self) -> Option<&str> {
        self.store.get(keys::METRICS_LISTENER_CLASS)
    }

    pub fn set_metrics_listener_class(&mut self, name: impl Into<String>) {
        self.store.set(keys::METRICS_LISTENER_CLASS, name.into());
    }

    // -------------------------------------------------------------------------
    // Batch size
    // -------------------------------------------------------------------------

    /// Number of elements ingested per batch
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedValue`] if the value is missing or not an integer.
    pub fn batch_size(&self) -> Result<i32> {
        self.parse_required(keys::BATCH_SIZE, "not a 32-bit integer")
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `batch_size <= 0`.
    pub fn set_batch_size(&mut self, batch_size: i32) -> Result<()> {
        if batch_size <= 0 {
            return Err(Error::InvalidArgument(
                "The batch size must be greater than 0.".into(),
            ));
        }
        self.store.set(keys::BATCH_SIZE, batch_size.to_string());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // R-MAT probabilities
    // -------------------------------------------------------------------------

    /// R-MAT edge-placement probabilities, in stored order.
    ///
    /// Falls back to [`DEFAULT_RMAT_PROBABILITIES`] when unset. A value written
    /// directly to the store is returned as parsed, without count or range checks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedValue`] if any stored segment is not a number.
    pub fn rmat_probabilities(&self) -> Result<Vec<f64>> {
        match self.store.get(keys::RMAT_PROBABILITIES) {
            None => Ok(DEFAULT_RMAT_PROBABILITIES.to_vec()),
            Some(raw) => string_to_double_array(Some(raw)).map_err(|e| match e {
                Error::MalformedValue { reason, .. } => {
                    Error::malformed(keys::RMAT_PROBABILITIES, Some(raw), reason)
                }
                other => other,
            }),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless `values` holds exactly four
    /// strictly positive entries whose sum lies in `[0.999999999, 1.00000001]`.
    pub fn set_rmat_probabilities(&mut self, values: Option<&[f64]>) -> Result<()> {
        let values = match values {
            Some(v) if v.len() == RMAT_PROBABILITY_COUNT => v,
            _ => {
                return Err(Error::InvalidArgument(
                    "Probabilities should be non-null and of length 4.".into(),
                ))
            }
        };
        // `!(v > 0.0)` also rejects NaN
        if values.iter().any(|&v| !(v > 0.0)) {
            return Err(Error::InvalidArgument(
                "Every entry in probabilities must be strictly positive.".into(),
            ));
        }
        let sum = compensated_sum(values);
        if !(RMAT_SUM_MIN..=RMAT_SUM_MAX).contains(&sum) {
            return Err(Error::InvalidArgument(
                "The entries in probabilities must sum to 1.".into(),
            ));
        }
        let text = double_array_to_string(Some(values))?;
        self.store.set(keys::RMAT_PROBABILITIES, text);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // R-MAT include entities
    // -------------------------------------------------------------------------

    /// Whether entities are generated alongside edges.
    ///
    /// Only `"true"` (any ASCII case) reads as `true`; missing or other text is `false`.
    pub fn rmat_include_entities(&self) -> bool {
        self.store
            .get(keys::RMAT_INCLUDE_ENTITIES)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn set_rmat_include_entities(&mut self, include_entities: bool) {
        self.store.set(keys::RMAT_INCLUDE_ENTITIES, include_entities.to_string());
    }

    // -------------------------------------------------------------------------
    // R-MAT max node id
    // -------------------------------------------------------------------------

    /// Largest node identifier the generator may emit
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedValue`] if the value is missing or not an integer.
    pub fn rmat_max_node_id(&self) -> Result<i64> {
        self.parse_required(keys::RMAT_MAX_NODE_ID, "not a 64-bit integer")
    }

    pub fn set_rmat_max_node_id(&mut self, max_node_id: i64) {
        self.store.set(keys::RMAT_MAX_NODE_ID, max_node_id.to_string());
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Copy every entry of the underlying store into a [`MemoryStore`]
    pub fn to_memory_store(&self) -> MemoryStore {
        self.store
            .keys()
            .into_iter()
            .filter_map(|k| {
                let v = self.store.get(&k)?.to_owned();
                Some((k, v))
            })
            .collect()
    }

    /// Write the whole underlying store to `path` using `backend`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save<B: StorageBackend>(&self, path: impl AsRef<Path>, backend: &B) -> Result<()> {
        backend.write(path.as_ref(), &self.to_memory_store())
    }

    fn parse_required<T: std::str::FromStr>(&self, key: &str, reason: &str) -> Result<T> {
        let raw = self
            .store
            .get(key)
            .ok_or_else(|| Error::malformed(key, None, "no value set"))?;
        raw.parse()
            .map_err(|_| Error::malformed(key, Some(raw), reason))
    }
}

impl<S: PropertyStore> From<S> for TestProperties<S> {
    fn from(store: S) -> Self {
        Self::from_store(store)
    }
}

// =============================================================================
// Array <-> string helpers
// =============================================================================

/// Join `values` with commas using shortest round-trip formatting.
///
/// ```
/// use perftest_props::double_array_to_string;
///
/// let text = double_array_to_string(Some(&[0.1, 0.2, 0.3, 0.4]))?;
/// assert_eq!(text, "0.1,0.2,0.3,0.4");
/// # Ok::<(), perftest_props::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `values` is `None`.
pub fn double_array_to_string(values: Option<&[f64]>) -> Result<String> {
    let values = values.ok_or_else(|| {
        Error::InvalidArgument("Cannot convert null array to a string".into())
    })?;
    Ok(values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(","))
}

/// Split `s` on commas and parse each segment as `f64`, preserving order.
///
/// Trailing empty segments are dropped, so `"0.5,0.5,"` reads as two values;
/// empty segments anywhere else are an error. Each segment is trimmed of
/// ASCII control characters and spaces, then must be a decimal number,
/// `NaN` or `Infinity` (optionally signed, optionally suffixed with one of
/// `f`, `F`, `d`, `D`). Count and range are not checked.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `s` is `None`, or
/// [`Error::MalformedValue`] if any segment is not a number.
pub fn string_to_double_array(s: Option<&str>) -> Result<Vec<f64>> {
    let s = s.ok_or_else(|| {
        Error::InvalidArgument("Cannot convert null string to an array of doubles".into())
    })?;

    let mut segments: Vec<&str> = s.split(',').collect();
    if !s.is_empty() {
        while segments.last().is_some_and(|seg| seg.is_empty()) {
            segments.pop();
        }
    }

    segments
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            parse_double(item).ok_or_else(|| {
                Error::malformed(
                    "<array>",
                    Some(s),
                    format!("segment {i} ('{item}') is not a number"),
                )
            })
        })
        .collect()
}

/// Parse one decimal segment.
///
/// Stricter than `f64::from_str`: spellings such as `inf` or `nan` are rejected.
fn parse_double(raw: &str) -> Option<f64> {
    let text = raw.trim_matches(|c: char| c <= ' ');
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if matches!(unsigned, "NaN" | "Infinity") {
        return text.parse().ok();
    }

    let digits = unsigned.strip_suffix(['f', 'F', 'd', 'D']).unwrap_or(unsigned);
    let numeric = !digits.is_empty()
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric {
        return None;
    }
    text[..text.len() - (unsigned.len() - digits.len())].parse().ok()
}

/// Kahan summation of `values`
fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for &v in values {
        let y = v - compensation;
        let t = sum + y;
        compensation = (t - sum) - y;
        sum = t;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props_with(key: &str, value: &str) -> TestProperties {
        TestProperties::from_store([(key, value)].into_iter().collect())
    }

    #[test]
    fn test_metrics_listener_absent_then_set() {
        let mut props = TestProperties::new();
        assert_eq!(props.metrics_listener_class(), None);

        props.set_metrics_listener_class("com.example.Listener");
        assert_eq!(props.metrics_listener_class(), Some("com.example.Listener"));
    }

    #[test]
    fn test_batch_size_rejects_non_positive_without_writing() {
        let mut props = TestProperties::new();
        props.set_batch_size(10).unwrap();

        for bad in [0, -1, i32::MIN] {
            let err = props.set_batch_size(bad).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        assert_eq!(props.batch_size().unwrap(), 10);
    }

    #[test]
    fn test_batch_size_missing_is_malformed() {
        let props = TestProperties::new();
        let err = props.batch_size().unwrap_err();
        assert!(matches!(err, Error::MalformedValue { value: None, .. }));
    }

    #[test]
    fn test_batch_size_garbage_is_malformed() {
        for raw in ["abc", "", " 5", "5.0", "2147483648"] {
            let props = props_with(keys::BATCH_SIZE, raw);
            assert!(props.batch_size().unwrap_err().is_malformed_value(), "{raw:?}");
        }
    }

    #[test]
    fn test_batch_size_accepts_signed_text() {
        let props = props_with(keys::BATCH_SIZE, "+42");
        assert_eq!(props.batch_size().unwrap(), 42);
    }

    #[test]
    fn test_probabilities_default_when_unset() {
        let props = TestProperties::new();
        assert_eq!(
            props.rmat_probabilities().unwrap(),
            DEFAULT_RMAT_PROBABILITIES.to_vec()
        );
    }

    #[test]
    fn test_probabilities_stored_as_joined_text() {
        let mut props = TestProperties::new();
        props
            .set_rmat_probabilities(Some(&[0.1, 0.2, 0.3, 0.4]))
            .unwrap();

        assert_eq!(
            props.store().get(keys::RMAT_PROBABILITIES),
            Some("0.1,0.2,0.3,0.4")
        );
        assert_eq!(props.rmat_probabilities().unwrap(), vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_probabilities_wrong_length() {
        let mut props = TestProperties::new();
        assert!(props.set_rmat_probabilities(None).unwrap_err().is_invalid_argument());
        assert!(props
            .set_rmat_probabilities(Some(&[0.5, 0.5]))
            .unwrap_err()
            .is_invalid_argument());
        assert!(props
            .set_rmat_probabilities(Some(&[0.2; 5]))
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_probabilities_non_positive_entry() {
        let mut props = TestProperties::new();
        let cases = [
            [0.0, 0.5, 0.25, 0.25],
            [-0.1, 0.6, 0.25, 0.25],
            [f64::NAN, 0.5, 0.25, 0.25],
        ];
        for bad in cases {
            let err = props.set_rmat_probabilities(Some(&bad)).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        assert_eq!(props.store().get(keys::RMAT_PROBABILITIES), None);
    }

    #[test]
    fn test_probabilities_sum_tolerance() {
        let mut props = TestProperties::new();
        assert!(props
            .set_rmat_probabilities(Some(&[0.125; 4]))
            .unwrap_err()
            .is_invalid_argument());
        assert!(props
            .set_rmat_probabilities(Some(&[0.25, 0.25, 0.25, 0.2500001]))
            .is_err());

        // Inside the band on both sides
        props
            .set_rmat_probabilities(Some(&[0.25, 0.25, 0.25, 0.2499999995]))
            .unwrap();
        props
            .set_rmat_probabilities(Some(&[0.25, 0.25, 0.25, 0.250000005]))
            .unwrap();
    }

    #[test]
    fn test_probabilities_stored_text_is_trusted() {
        let props = props_with(keys::RMAT_PROBABILITIES, "0.5, 0.5");
        assert_eq!(props.rmat_probabilities().unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_probabilities_malformed_segment() {
        let props = props_with(keys::RMAT_PROBABILITIES, "0.25,x,0.25,0.25");
        match props.rmat_probabilities().unwrap_err() {
            Error::MalformedValue { key, value, .. } => {
                assert_eq!(key, keys::RMAT_PROBABILITIES);
                assert_eq!(value.as_deref(), Some("0.25,x,0.25,0.25"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_include_entities_lenient() {
        let mut props = TestProperties::new();
        assert!(!props.rmat_include_entities());

        props.set_rmat_include_entities(true);
        assert!(props.rmat_include_entities());
        props.set_rmat_include_entities(false);
        assert!(!props.rmat_include_entities());

        assert!(!props_with(keys::RMAT_INCLUDE_ENTITIES, "garbage").rmat_include_entities());
        assert!(props_with(keys::RMAT_INCLUDE_ENTITIES, "TRUE").rmat_include_entities());
        assert!(!props_with(keys::RMAT_INCLUDE_ENTITIES, " true").rmat_include_entities());
    }

    #[test]
    fn test_max_node_id_extremes() {
        let mut props = TestProperties::new();
        props.set_rmat_max_node_id(i64::MAX);
        assert_eq!(props.rmat_max_node_id().unwrap(), 9_223_372_036_854_775_807);

        props.set_rmat_max_node_id(-5);
        assert_eq!(props.rmat_max_node_id().unwrap(), -5);
    }

    #[test]
    fn test_max_node_id_missing_is_malformed() {
        let props = TestProperties::new();
        assert!(props.rmat_max_node_id().unwrap_err().is_malformed_value());
    }

    #[test]
    fn test_array_to_string_null() {
        assert!(double_array_to_string(None).unwrap_err().is_invalid_argument());
        assert_eq!(double_array_to_string(Some(&[])).unwrap(), "");
    }

    #[test]
    fn test_string_to_array() {
        assert!(string_to_double_array(None).unwrap_err().is_invalid_argument());
        assert_eq!(
            string_to_double_array(Some("0.1,0.2,0.3,0.4")).unwrap(),
            vec![0.1, 0.2, 0.3, 0.4]
        );
        assert!(string_to_double_array(Some("0.1,,0.2"))
            .unwrap_err()
            .is_malformed_value());
    }

    #[test]
    fn test_string_to_array_drops_trailing_empty_segments() {
        assert_eq!(
            string_to_double_array(Some("0.25,0.25,0.25,0.25,")).unwrap(),
            vec![0.25; 4]
        );
        assert_eq!(string_to_double_array(Some("1,2,,,")).unwrap(), vec![1.0, 2.0]);
        assert_eq!(string_to_double_array(Some(",")).unwrap(), Vec::<f64>::new());

        // Interior empties and a lone empty string still fail
        assert!(string_to_double_array(Some(",1")).unwrap_err().is_malformed_value());
        assert!(string_to_double_array(Some("")).unwrap_err().is_malformed_value());
        // Whitespace is not an empty segment
        assert!(string_to_double_array(Some("1, ")).unwrap_err().is_malformed_value());
    }

    #[test]
    fn test_probabilities_trailing_comma_in_store() {
        let props = props_with(keys::RMAT_PROBABILITIES, "0.25,0.25,0.25,0.25,");
        assert_eq!(props.rmat_probabilities().unwrap(), vec![0.25; 4]);
    }

    #[test]
    fn test_string_to_array_number_spellings() {
        let parsed = string_to_double_array(Some("NaN,-Infinity,+1.5,2d,3F,1e2,.5")).unwrap();
        assert!(parsed[0].is_nan());
        assert_eq!(parsed[1], f64::NEG_INFINITY);
        assert_eq!(&parsed[2..], &[1.5, 2.0, 3.0, 100.0, 0.5]);

        for bad in ["inf", "nan", "NAN", "infinity", "1.5ff", "0x10", "f", "1_000"] {
            assert!(
                string_to_double_array(Some(bad)).unwrap_err().is_malformed_value(),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_string_to_array_trims_only_ascii_controls_and_space() {
        assert_eq!(
            string_to_double_array(Some("\t0.5\n, 0.5\r")).unwrap(),
            vec![0.5, 0.5]
        );
        assert!(string_to_double_array(Some("\u{a0}0.5"))
            .unwrap_err()
            .is_malformed_value());
    }

    #[test]
    fn test_compensated_sum() {
        let tenths = [0.1; 10];
        assert_ne!(tenths.iter().sum::<f64>(), 1.0);
        assert_eq!(compensated_sum(&tenths), 1.0);
        assert_eq!(compensated_sum(&[0.25; 4]), 1.0);
        assert_eq!(compensated_sum(&[]), 0.0);
    }

    #[test]
    fn test_borrowed_store_sees_writes() {
        let mut store = MemoryStore::new();
        {
            let mut props = TestProperties::from_store(&mut store);
            props.set_batch_size(7).unwrap();
        }
        assert_eq!(store.get(keys::BATCH_SIZE), Some("7"));
    }
}
