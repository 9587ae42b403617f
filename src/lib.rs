// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Pure-Rust verifier for PLONK proofs produced by the snarkjs
//! tool-chain.
//!
//! Given a verification key, a vector of public signals and a proof, the
//! verifier returns a single boolean that is true iff the proof convinces
//! it that the prover knew a witness satisfying the circuit the key
//! describes. Challenges are derived with the Ethereum-style Keccak-256
//! transcript, so results agree with the JavaScript and on-chain
//! verifiers bit-for-bit.
//!
//! Structural decoding failures are reported as [`Error`]s; every
//! algebraic failure (a point off the curve, a public-input count
//! mismatch, a failed pairing, a failed custom-gate check) simply yields
//! `false` together with a `tracing` diagnostic.
//!
//! ```
//! use ark_plonk_verifier::{verify, ProofObject, VerificationKeyObject};
//!
//! let vk: VerificationKeyObject = serde_json::from_value(serde_json::json!({
//!     "protocol": "plonk", "curve": "bn128", "nPublic": 1, "power": 3,
//!     "k1": "2", "k2": "3",
//!     "Qm": ["1", "2", "1"], "Ql": ["1", "2", "1"], "Qr": ["1", "2", "1"],
//!     "Qo": ["1", "2", "1"], "Qc": ["1", "2", "1"],
//!     "S1": ["1", "2", "1"], "S2": ["1", "2", "1"], "S3": ["1", "2", "1"],
//!     "X_2": [
//!         ["10857046999023057135944570762232829481370756359578518086990519993285655852781",
//!          "11559732032986387107991004021392285783925812861821192530917403151452391805634"],
//!         ["8495653923123431417604973247489272438418190587263600148770280649306958101930",
//!          "4082367875863433681332203403145435568316851327593401208105741076214120093531"],
//!         ["1", "0"]
//!     ]
//! })).unwrap();
//! let proof: ProofObject = serde_json::from_value(serde_json::json!({
//!     "A": ["1", "2", "1"], "B": ["1", "2", "1"], "C": ["1", "2", "1"],
//!     "Z": ["1", "2", "1"], "T1": ["1", "2", "1"], "T2": ["1", "2", "1"],
//!     "T3": ["1", "2", "1"], "Wxi": ["1", "2", "1"], "Wxiw": ["1", "2", "1"],
//!     "eval_a": "1", "eval_b": "2", "eval_c": "3", "eval_s1": "4",
//!     "eval_s2": "5", "eval_zw": "6", "eval_r": "7",
//!     "protocol": "plonk", "curve": "bn128"
//! })).unwrap();
//!
//! // Well-typed input always verifies totally; this proof is just wrong.
//! let accepted = verify(&vk, &["9".to_string()], &proof).unwrap();
//! assert!(!accepted);
//! ```

pub mod curve;
pub mod error;
pub mod object;
pub mod proof_system;
pub mod transcript;

pub use curve::{normalised_curve_name, PlonkCurve};
pub use error::Error;
pub use object::{
    decode_public_signals, CustomGateObject, ProofObject,
    VerificationKeyObject,
};
pub use proof_system::{
    Challenges, CustomGate, Proof, ProofEvaluations, VerificationKey,
};

use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;

/// Collection of structs/objects that most callers will need.
pub mod prelude {
    pub use crate::curve::PlonkCurve;
    pub use crate::error::Error;
    pub use crate::object::{ProofObject, VerificationKeyObject};
    pub use crate::proof_system::{
        Challenges, CustomGate, Proof, ProofEvaluations, VerificationKey,
    };
    pub use crate::verify;
}

/// Verifies a snarkjs PLONK proof, dispatching on the curve named in the
/// verification key.
///
/// At least `"bn128"` (with its `"bn254"`/`"altbn128"` aliases) and
/// `"bls12381"` are supported. An `Err` means the input could not be
/// decoded into a proof at all; a decodable but unconvincing proof is
/// `Ok(false)`.
pub fn verify(
    vk: &VerificationKeyObject,
    public_signals: &[String],
    proof: &ProofObject,
) -> Result<bool, Error> {
    match normalised_curve_name(&vk.curve).as_str() {
        "bn128" | "bn254" | "altbn128" => {
            verify_with::<Bn254>(vk, public_signals, proof)
        }
        "bls12381" => verify_with::<Bls12_381>(vk, public_signals, proof),
        _ => Err(Error::UnknownCurve {
            name: vk.curve.clone(),
        }),
    }
}

/// Decodes the object forms against a concrete curve and runs the
/// verification pipeline.
pub fn verify_with<E>(
    vk: &VerificationKeyObject,
    public_signals: &[String],
    proof: &ProofObject,
) -> Result<bool, Error>
where
    E: PlonkCurve,
{
    let vk = VerificationKey::<E>::from_object(vk)?;
    let proof = Proof::<E>::from_object(proof, &vk)?;
    let public_inputs = decode_public_signals::<E::Fr>(public_signals)?;
    Ok(proof.verify(&vk, &public_inputs))
}

/// Instantiates a set of generic test functions over a concrete pairing
/// engine, suffixing every generated test name.
///
/// ```ignore
/// batch_test!([test_foo, test_bar] => (Bn254, bn254));
/// ```
#[macro_export]
macro_rules! batch_test {
    ( [$($test_fn:ident),* $(,)?] => ($engine:ty, $suffix:ident) ) => {
        paste::paste! {
            $(
                #[test]
                fn [<$test_fn _ $suffix>]() {
                    $test_fn::<$engine>()
                }
            )*
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_curves_are_rejected_by_the_dispatcher() {
        let raw = serde_json::json!({
            "protocol": "plonk", "curve": "pallas", "nPublic": 0,
            "power": 3, "k1": "2", "k2": "3",
            "Qm": ["1", "2", "1"], "Ql": ["1", "2", "1"],
            "Qr": ["1", "2", "1"], "Qo": ["1", "2", "1"],
            "Qc": ["1", "2", "1"], "S1": ["1", "2", "1"],
            "S2": ["1", "2", "1"], "S3": ["1", "2", "1"],
            "X_2": [["1", "0"], ["2", "0"], ["1", "0"]]
        });
        let vk: VerificationKeyObject =
            serde_json::from_value(raw).unwrap();
        let proof = serde_json::json!({
            "A": ["1", "2", "1"], "B": ["1", "2", "1"],
            "C": ["1", "2", "1"], "Z": ["1", "2", "1"],
            "T1": ["1", "2", "1"], "T2": ["1", "2", "1"],
            "T3": ["1", "2", "1"], "Wxi": ["1", "2", "1"],
            "Wxiw": ["1", "2", "1"],
            "eval_a": "1", "eval_b": "2", "eval_c": "3",
            "eval_s1": "4", "eval_s2": "5", "eval_zw": "6", "eval_r": "7"
        });
        let proof: ProofObject = serde_json::from_value(proof).unwrap();
        assert!(matches!(
            verify(&vk, &[], &proof),
            Err(Error::UnknownCurve { name }) if name == "pallas"
        ));
    }
}
