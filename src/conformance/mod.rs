//! Conformance testing against a corpus of test vectors.
//!
//! See [`corpus`] for the file format.

pub mod corpus;

pub use corpus::{
    Corpus, CorpusManifest, CorpusResults, CorpusRunner, Expected, TestResult, TestVector,
};
