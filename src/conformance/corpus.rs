//! Corpus-based conformance testing.
//!
//! A corpus is a JSON file of test vectors. Each vector names an operation,
//! its input, and the expected outcome: either `{"ok": {...}}` with the
//! exact output text or `{"err": {"code": N}}` with the expected error
//! code. Outputs are compared as raw strings, never as parsed values, so
//! key order and number formatting are checked byte for byte.

use crate::assemble::assemble_array;
use crate::error::{CanonResult, ErrorCode};
use crate::json::{
    canonical_string_with, is_canonical_text, parse_with_limits, to_json_string, CanonOptions,
    KeyOrder, Limits,
};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Corpus manifest with metadata.
#[derive(Debug, Deserialize)]
pub struct CorpusManifest {
    /// Format version of the corpus file.
    pub format_version: String,
    /// Free-form description of what the corpus covers.
    #[serde(default)]
    pub description: String,
}

/// A corpus containing test vectors.
#[derive(Debug, Deserialize)]
pub struct Corpus {
    /// Corpus metadata.
    pub manifest: CorpusManifest,
    /// List of test vectors.
    pub vectors: Vec<TestVector>,
}

/// A single test vector.
#[derive(Debug, Deserialize)]
pub struct TestVector {
    /// Unique identifier for the test.
    pub id: String,
    /// Operation to test: `canonicalize`, `assemble`, `parse_json` or
    /// `is_canonical`.
    pub op: String,
    /// Input parameters for the operation.
    pub input: VectorInput,
    /// Expected result (success or error).
    pub expected: Expected,
}

/// Inputs a vector may carry. Which fields are required depends on the op.
#[derive(Debug, Default, Deserialize)]
pub struct VectorInput {
    /// JSON text to parse.
    #[serde(default)]
    pub json: Option<String>,
    /// Pre-serialized fragments for `assemble`.
    #[serde(default)]
    pub fragments: Vec<String>,
    /// `"code_point"` (default) or `"utf16"`.
    #[serde(default)]
    pub key_order: Option<String>,
    /// Override for the nesting depth limit.
    #[serde(default)]
    pub max_depth: Option<u64>,
}

/// Expected outcome of a vector.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expected {
    /// Operation succeeds.
    Ok(ExpectedOk),
    /// Operation fails with the given code.
    Err(ExpectedErr),
}

/// Expected success payload.
#[derive(Debug, Default, Deserialize)]
pub struct ExpectedOk {
    /// Exact output text.
    #[serde(default)]
    pub text: Option<String>,
    /// Expected verdict for `is_canonical`.
    #[serde(default)]
    pub canonical: Option<bool>,
}

/// Expected failure payload.
#[derive(Debug, Deserialize)]
pub struct ExpectedErr {
    /// Numeric error code.
    pub code: u32,
}

/// What an operation produced.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Text(String),
    Verdict(bool),
}

/// Result of running a single test vector.
#[derive(Debug)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Test failed with mismatch.
    Fail {
        /// Expected result from the corpus.
        expected: String,
        /// Actual result produced.
        actual: String,
    },
    /// Test was skipped (operation not recognized).
    Skip {
        /// Reason for skipping.
        reason: String,
    },
    /// Vector is malformed and could not be run.
    Error {
        /// Error message.
        message: String,
    },
}

impl TestResult {
    /// Returns true if this is a passing result.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if this is a failing result.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Results from running the corpus.
#[derive(Debug, Default)]
pub struct CorpusResults {
    /// Number of tests that passed.
    pub passed: usize,
    /// Number of tests that failed.
    pub failed: usize,
    /// Number of tests that were skipped.
    pub skipped: usize,
    /// Number of tests that errored.
    pub errors: usize,
    /// Detailed results for each test.
    pub details: Vec<(String, TestResult)>,
}

impl CorpusResults {
    /// Create a new empty results container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test result.
    pub fn record(&mut self, id: &str, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Fail { .. } => self.failed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Error { .. } => self.errors += 1,
        }
        self.details.push((id.to_string(), result));
    }

    /// Get total number of tests run.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    /// Returns true if nothing failed or errored. Skips do not count.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Get a summary string of the results.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped, {} errors (total: {})",
            self.passed,
            self.failed,
            self.skipped,
            self.errors,
            self.total()
        )
    }

    /// Get failures only.
    pub fn failures(&self) -> Vec<&(String, TestResult)> {
        self.details.iter().filter(|(_, r)| r.is_fail()).collect()
    }

    /// Get errors only.
    pub fn error_details(&self) -> Vec<&(String, TestResult)> {
        self.details
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Error { .. }))
            .collect()
    }
}

/// Corpus runner that executes test vectors.
pub struct CorpusRunner {
    corpus: Corpus,
}

impl CorpusRunner {
    /// Load corpus from a file path.
    ///
    /// A missing file is `E900_FileNotFound`; a file that is not a valid
    /// corpus is `E100_InvalidJSON`.
    pub fn load<P: AsRef<Path>>(path: P) -> CanonResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ErrorCode::E900_FileNotFound(path.display().to_string()),
            _ => ErrorCode::from(e),
        })?;
        Self::from_json(&content)
    }

    /// Build a runner from corpus text.
    pub fn from_json(content: &str) -> CanonResult<Self> {
        let corpus: Corpus = serde_json::from_str(content).map_err(|e| {
            tracing::debug!(error = %e, "corpus does not match the vector schema");
            ErrorCode::E100_InvalidJSON
        })?;
        tracing::debug!(
            vectors = corpus.vectors.len(),
            format_version = %corpus.manifest.format_version,
            "loaded corpus"
        );
        Ok(Self { corpus })
    }

    /// Get the corpus manifest.
    pub fn manifest(&self) -> &CorpusManifest {
        &self.corpus.manifest
    }

    /// Get the number of test vectors.
    pub fn vector_count(&self) -> usize {
        self.corpus.vectors.len()
    }

    /// Run all test vectors and return results.
    pub fn run_all(&self) -> CorpusResults {
        let mut results = CorpusResults::new();

        for vector in &self.corpus.vectors {
            let result = run_vector(vector);
            if !result.is_pass() {
                tracing::debug!(id = %vector.id, ?result, "vector did not pass");
            }
            results.record(&vector.id, result);
        }

        results
    }
}

/// Run a single test vector.
fn run_vector(vector: &TestVector) -> TestResult {
    let actual = match vector.op.as_str() {
        "canonicalize" => run_canonicalize(&vector.input),
        "assemble" => Ok(Ok(Outcome::Text(assemble_array(&vector.input.fragments)))),
        "parse_json" => run_parse_json(&vector.input),
        "is_canonical" => run_is_canonical(&vector.input),
        _ => {
            return TestResult::Skip {
                reason: format!("Unknown operation: {}", vector.op),
            }
        }
    };

    match actual {
        Ok(actual) => compare(&vector.expected, actual),
        Err(message) => TestResult::Error { message },
    }
}

/// Outer `Err` is a malformed vector; inner result is the operation's.
type RunOutcome = Result<CanonResult<Outcome>, String>;

fn run_canonicalize(input: &VectorInput) -> RunOutcome {
    let json = required_json(input)?;
    let options = options_for(input)?;
    Ok(parse_with_limits(json.as_bytes(), options.limits)
        .and_then(|value| canonical_string_with(&value, &options))
        .map(Outcome::Text))
}

fn run_parse_json(input: &VectorInput) -> RunOutcome {
    let json = required_json(input)?;
    let options = options_for(input)?;
    Ok(parse_with_limits(json.as_bytes(), options.limits)
        .map(|value| Outcome::Text(to_json_string(&value))))
}

fn run_is_canonical(input: &VectorInput) -> RunOutcome {
    let json = required_json(input)?;
    let options = options_for(input)?;
    Ok(is_canonical_text(json.as_bytes(), &options).map(Outcome::Verdict))
}

fn required_json(input: &VectorInput) -> Result<&str, String> {
    input
        .json
        .as_deref()
        .ok_or_else(|| "Missing 'json' in input".to_string())
}

fn options_for(input: &VectorInput) -> Result<CanonOptions, String> {
    let key_order = match input.key_order.as_deref() {
        None | Some("code_point") => KeyOrder::CodePoint,
        Some("utf16") => KeyOrder::Utf16,
        Some(other) => return Err(format!("Unknown key_order: {}", other)),
    };
    let limits = match input.max_depth {
        Some(depth) => Limits::standard().with_max_depth(depth),
        None => Limits::standard(),
    };
    Ok(CanonOptions::default()
        .with_limits(limits)
        .with_key_order(key_order))
}

fn compare(expected: &Expected, actual: CanonResult<Outcome>) -> TestResult {
    match (expected, actual) {
        (Expected::Err(want), Err(got)) if want.code == got.code() => TestResult::Pass,
        (Expected::Err(want), Err(got)) => TestResult::Fail {
            expected: format!("error {}", want.code),
            actual: format!("error {} ({})", got.code(), got),
        },
        (Expected::Err(want), Ok(outcome)) => TestResult::Fail {
            expected: format!("error {}", want.code),
            actual: describe(&outcome),
        },
        (Expected::Ok(_), Err(got)) => TestResult::Fail {
            expected: "ok".to_string(),
            actual: format!("error {} ({})", got.code(), got),
        },
        (Expected::Ok(want), Ok(outcome)) => {
            let wanted = match (&want.text, want.canonical) {
                (Some(text), _) => Outcome::Text(text.clone()),
                (None, Some(flag)) => Outcome::Verdict(flag),
                (None, None) => {
                    return TestResult::Error {
                        message: "Expected 'ok' needs 'text' or 'canonical'".to_string(),
                    }
                }
            };
            if wanted == outcome {
                TestResult::Pass
            } else {
                TestResult::Fail {
                    expected: describe(&wanted),
                    actual: describe(&outcome),
                }
            }
        }
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Text(text) => text.clone(),
        Outcome::Verdict(flag) => flag.to_string(),
    }
}
