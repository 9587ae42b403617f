// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A collection of all possible errors encountered during verification.
//!
//! Only malformed inputs are reported through [`Error`]: objects whose
//! shape or coordinates cannot be decoded are not proofs at all. Every
//! other failure kind (a point off the curve, a public-input count
//! mismatch, a failed pairing, a failed gate check) makes the verifier
//! return `false` with a logged diagnostic.

/// Defines all possible errors that can be encountered while decoding a
/// proof or a verification key.
#[derive(Debug)]
pub enum Error {
    // Decoding errors
    /// This error occurs when a scalar leaf of the object form is not a
    /// decimal big-integer string.
    ScalarMalformed {
        /// Name of the offending field.
        label: &'static str,
    },
    /// This error occurs when a curve point of the object form does not
    /// consist of two or three decimal coordinate strings.
    PointMalformed {
        /// Name of the offending field.
        label: &'static str,
    },
    /// This error occurs when the verification key names a curve that the
    /// dispatcher does not know about.
    UnknownCurve {
        /// The curve name found in the verification key.
        name: String,
    },
    /// This error occurs when a custom-gate entry carries an id that is
    /// not present in the gate registry.
    UnknownGate {
        /// The gate id found in the proof.
        id: String,
    },
    /// This error occurs when the proof carries custom gates but their
    /// number differs from the verification key's `Qk` commitments.
    GateCountMismatch {
        /// Number of custom-gate entries in the proof.
        proof_gates: usize,
        /// Number of `Qk` selector commitments in the verification key.
        vk_selectors: usize,
    },

    // Domain errors
    /// This error occurs when the verification key's `power` exceeds the
    /// two-adicity of the scalar field, so no evaluation domain of size
    /// `2^power` exists.
    InvalidEvalDomainSize {
        /// Log size of the group
        log_size_of_group: u32,
        /// Two adacity generated
        adacity: u32,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScalarMalformed { label } => {
                write!(f, "scalar field element `{}` is malformed", label)
            }
            Self::PointMalformed { label } => {
                write!(f, "curve point `{}` is malformed", label)
            }
            Self::UnknownCurve { name } => {
                write!(f, "unknown curve `{}`", name)
            }
            Self::UnknownGate { id } => {
                write!(f, "unknown custom gate `{}`", id)
            }
            Self::GateCountMismatch {
                proof_gates,
                vk_selectors,
            } => write!(
                f,
                "proof carries {} custom gates but the verification key \
                has {} Qk commitments",
                proof_gates, vk_selectors
            ),
            Self::InvalidEvalDomainSize {
                log_size_of_group,
                adacity,
            } => write!(
                f,
                "Log-size of the EvaluationDomain group > TWO_ADACITY\
            Size: {:?} > TWO_ADACITY = {:?}",
                log_size_of_group, adacity
            ),
        }
    }
}

impl std::error::Error for Error {}
