// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! In-memory object forms as produced by the snarkjs serializer.
//!
//! Proofs and verification keys arrive as nested records whose leaves are
//! decimal big-integer strings; G1 elements are pairs or triples of such
//! strings and G2 elements are pairs or triples of `[c0, c1]` pairs. The
//! verifier does not define a file format: these types only fix the shape
//! that `serde_json` (or any other serde backend) decodes into.

use crate::error::Error;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Object form of a PLONK proof.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProofObject {
    /// Commitment to the left wire polynomial.
    #[serde(rename = "A")]
    pub a: Vec<String>,
    /// Commitment to the right wire polynomial.
    #[serde(rename = "B")]
    pub b: Vec<String>,
    /// Commitment to the output wire polynomial.
    #[serde(rename = "C")]
    pub c: Vec<String>,
    /// Commitment to the grand-product polynomial.
    #[serde(rename = "Z")]
    pub z: Vec<String>,
    /// Commitments to the three quotient splits.
    #[serde(rename = "T1")]
    pub t1: Vec<String>,
    #[serde(rename = "T2")]
    pub t2: Vec<String>,
    #[serde(rename = "T3")]
    pub t3: Vec<String>,
    /// KZG opening proof at `xi`.
    #[serde(rename = "Wxi")]
    pub wxi: Vec<String>,
    /// KZG opening proof at `xi * omega`.
    #[serde(rename = "Wxiw")]
    pub wxiw: Vec<String>,
    pub eval_a: String,
    pub eval_b: String,
    pub eval_c: String,
    pub eval_s1: String,
    pub eval_s2: String,
    pub eval_zw: String,
    pub eval_r: String,
    /// Per-gate sub-proofs, in the order of the verification key's `Qk`
    /// commitments. Absent or empty means the plain protocol.
    #[serde(rename = "customGates", default)]
    pub custom_gates: Vec<CustomGateObject>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub curve: Option<String>,
}

/// One custom-gate entry of a proof: the registry id plus a gate-specific
/// payload that only the gate's own decoder understands.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CustomGateObject {
    pub id: String,
    #[serde(default)]
    pub proof: serde_json::Value,
}

/// Object form of a PLONK verification key.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VerificationKeyObject {
    #[serde(default)]
    pub protocol: Option<String>,
    /// Curve name used for dispatch, e.g. `"bn128"` or `"bls12381"`.
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    /// The circuit domain has size `2^power`.
    pub power: u32,
    pub k1: String,
    pub k2: String,
    #[serde(rename = "Qm")]
    pub qm: Vec<String>,
    #[serde(rename = "Ql")]
    pub ql: Vec<String>,
    #[serde(rename = "Qr")]
    pub qr: Vec<String>,
    #[serde(rename = "Qo")]
    pub qo: Vec<String>,
    #[serde(rename = "Qc")]
    pub qc: Vec<String>,
    #[serde(rename = "S1")]
    pub s1: Vec<String>,
    #[serde(rename = "S2")]
    pub s2: Vec<String>,
    #[serde(rename = "S3")]
    pub s3: Vec<String>,
    /// Custom-gate selector commitments, one per registered gate.
    #[serde(rename = "Qk", default)]
    pub qk: Vec<Vec<String>>,
    /// The `[x]_2` element from the trusted setup.
    #[serde(rename = "X_2")]
    pub x_2: Vec<Vec<String>>,
    /// The serializer also records the domain generator; the verifier
    /// takes it from the curve library's root-of-unity tables instead.
    #[serde(default)]
    pub w: Option<String>,
}

/// Parses a decimal big-integer string into a prime field element,
/// reducing modulo the field order.
pub(crate) fn field_from_str<F>(
    label: &'static str,
    source: &str,
) -> Result<F, Error>
where
    F: PrimeField + FromStr,
{
    <F as FromStr>::from_str(source)
        .map_err(|_| Error::ScalarMalformed { label })
}

/// Canonicalises a sequence of public signals into the scalar field.
pub fn decode_public_signals<F>(signals: &[String]) -> Result<Vec<F>, Error>
where
    F: PrimeField + FromStr,
{
    signals
        .iter()
        .map(|signal| field_from_str("publicSignals", signal))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Fr;
    use num_traits::Zero;

    #[test]
    fn public_signals_reduce_modulo_r() {
        // The BN254 scalar field order itself canonicalises to zero.
        let signals = vec![
            "21888242871839275222246405745257275088548364400416034343698204186575808495617"
                .to_string(),
            "9".to_string(),
        ];
        let decoded = decode_public_signals::<Fr>(&signals).unwrap();
        assert_eq!(decoded[0], Fr::zero());
        assert_eq!(decoded[1], Fr::from(9u64));
    }

    #[test]
    fn non_decimal_signals_are_malformed() {
        let signals = vec!["12a".to_string()];
        assert!(matches!(
            decode_public_signals::<Fr>(&signals),
            Err(Error::ScalarMalformed { .. })
        ));
    }

    #[test]
    fn proof_objects_decode_from_snarkjs_json() {
        let raw = r#"{
            "A": ["1", "2", "1"],
            "B": ["1", "2", "1"],
            "C": ["1", "2", "1"],
            "Z": ["1", "2", "1"],
            "T1": ["1", "2", "1"],
            "T2": ["1", "2", "1"],
            "T3": ["1", "2", "1"],
            "Wxi": ["1", "2", "1"],
            "Wxiw": ["1", "2", "1"],
            "eval_a": "3",
            "eval_b": "4",
            "eval_c": "5",
            "eval_s1": "6",
            "eval_s2": "7",
            "eval_zw": "8",
            "eval_r": "9",
            "protocol": "plonk",
            "curve": "bn128"
        }"#;
        let proof: ProofObject = serde_json::from_str(raw).unwrap();
        assert_eq!(proof.a, vec!["1", "2", "1"]);
        assert_eq!(proof.eval_zw, "8");
        assert!(proof.custom_gates.is_empty());
    }

    #[test]
    fn verification_key_objects_decode_from_snarkjs_json() {
        let raw = r#"{
            "protocol": "plonk",
            "curve": "bn128",
            "nPublic": 1,
            "power": 3,
            "k1": "2",
            "k2": "3",
            "Qm": ["1", "2", "1"],
            "Ql": ["1", "2", "1"],
            "Qr": ["1", "2", "1"],
            "Qo": ["1", "2", "1"],
            "Qc": ["1", "2", "1"],
            "S1": ["1", "2", "1"],
            "S2": ["1", "2", "1"],
            "S3": ["1", "2", "1"],
            "X_2": [["1", "0"], ["2", "0"], ["1", "0"]],
            "w": "19540430494807482326159819597004422086093766032135589407132600596362845576832"
        }"#;
        let vk: VerificationKeyObject = serde_json::from_str(raw).unwrap();
        assert_eq!(vk.n_public, 1);
        assert_eq!(vk.power, 3);
        assert!(vk.qk.is_empty());
        assert_eq!(vk.x_2.len(), 3);
    }
}
