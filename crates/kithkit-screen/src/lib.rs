// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic pre-publication and pre-install risk detection for
//! kithkit skill archives.
//!
//! [`lint_archive`] runs the deterministic checks (structure, naming,
//! scope, pattern scanning, unicode) a catalog maintainer runs before
//! signing a skill. [`rubric::build_review_context`] packages a skill for
//! an external reviewing agent against the fixed eight-category rubric;
//! [`detector::PatternDetector`] is the reference implementation that
//! agent's structured output is shaped like, and [`selftest::run_selftest`]
//! scores it against a fixed set of graded adversarial cases.

pub mod detector;
pub mod lint;
pub mod naming;
pub mod patterns;
pub mod risk;
pub mod rubric;
pub mod scanner;
pub mod scope;
pub mod selftest;
pub mod structure;
pub mod unicode;

pub use detector::{Confidence, Detector, PatternDetector, ReviewFinding};
pub use lint::{lint_archive, CheckResults, LintResult, Score};
pub use risk::{aggregate_risk, recommend};
pub use rubric::{build_review_context, RubricCategory, ReviewContext, DATA_MARKER};
pub use selftest::{adversarial_cases, run_selftest, AdversarialCase, SelfTestSummary, Tier, TierSummary};
