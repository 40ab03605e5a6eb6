//! Regression test parameters and comparisons

use layoutfix_core::Polygon;
use layoutfix_mask::Mask;

/// Bookkeeping for one regression test
///
/// Tracks the test name, the number of comparisons made and every
/// failure so far. A failed comparison does not stop the test; call
/// [`RegParams::cleanup`] at the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "plausibilize")
    pub test_name: String,
    /// Comparisons made so far; the failing one is reported by number
    index: usize,
    failures: Vec<String>,
}

impl RegParams {
    /// Start the regression test `test_name`
    pub fn new(test_name: &str) -> Self {
        eprintln!("\n=== {test_name}_reg ===");
        Self {
            test_name: test_name.to_string(),
            index: 0,
            failures: Vec::new(),
        }
    }

    /// Number of comparisons made so far
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, what: &str, detail: String) -> bool {
        let msg = format!(
            "{}_reg: {} comparison #{} failed\n{}",
            self.test_name, what, self.index, detail
        );
        eprintln!("{msg}");
        self.failures.push(msg);
        false
    }

    /// Check that `actual` lies within `delta` of `expected`
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if (expected - actual).abs() <= delta {
            return true;
        }
        self.fail(
            "value",
            format!("expected {expected} (+/- {delta}), got {actual}"),
        )
    }

    /// Compare two polygons up to `tolerance`
    ///
    /// See [`Polygon::almost_equals`]; vertex order does not matter.
    pub fn compare_polygons(&mut self, expected: &Polygon, actual: &Polygon, tolerance: f64) -> bool {
        self.index += 1;
        if !expected.almost_equals(actual, tolerance) {
            return self.fail(
                "polygon",
                format!("expected {:?}\nactual   {:?}", expected.points(), actual.points()),
            );
        }
        true
    }

    /// Compare two masks for exact equality
    pub fn compare_masks(&mut self, expected: &Mask, actual: &Mask) -> bool {
        self.index += 1;
        if expected.width() != actual.width() || expected.height() != actual.height() {
            return self.fail(
                "mask",
                format!(
                    "dimension mismatch: {}x{} vs {}x{}",
                    expected.width(),
                    expected.height(),
                    actual.width(),
                    actual.height()
                ),
            );
        }
        for y in 0..expected.height() {
            for x in 0..expected.width() {
                if expected.get(x, y) != actual.get(x, y) {
                    return self.fail("mask", format!("pixel mismatch at ({}, {})", x, y));
                }
            }
        }
        true
    }

    /// Compare two string sequences, e.g. region ids in reading order
    pub fn compare_strings<A, B>(&mut self, expected: &[A], actual: &[B]) -> bool
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        self.index += 1;
        let same = expected.len() == actual.len()
            && expected
                .iter()
                .zip(actual.iter())
                .all(|(e, a)| e.as_ref() == a.as_ref());
        if !same {
            let expected: Vec<&str> = expected.iter().map(AsRef::as_ref).collect();
            let actual: Vec<&str> = actual.iter().map(AsRef::as_ref).collect();
            return self.fail(
                "string",
                format!("expected {:?}\nactual   {:?}", expected, actual),
            );
        }
        true
    }

    /// Check a condition
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            return self.fail("condition", what.to_string());
        }
        true
    }

    /// Report the outcome, returning whether every comparison passed
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("{}_reg: ok after {} comparisons", self.test_name, self.index);
            return true;
        }
        eprintln!(
            "{}_reg: {} of {} comparisons failed",
            self.test_name,
            self.failures.len(),
            self.index
        );
        for failure in &self.failures {
            eprintln!("  {failure}");
        }
        false
    }

    /// Check whether no comparison has failed yet
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure messages so far
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
