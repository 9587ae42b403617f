// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Custom gates.
//!
//! A custom gate extends the arithmetic gate with an extra selector
//! commitment `Qk[i]` in the verification key and a gate-specific
//! sub-proof in the proof. Gates are modelled as a closed union: each
//! variant encapsulates its own sub-proof decoder, its scalar factor for
//! the linearisation commitment, and a pairing-free local check. The
//! registry maps the id string stored in the proof to a variant
//! constructor; new gates are added by extending the union.

use crate::curve::PlonkCurve;
use crate::error::Error;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Read, SerializationError, Write,
};
use num_traits::Zero;

/// The set of registered custom gates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CustomGate {
    /// Gate with no algebraic contribution and a trivially true local
    /// check. It leaves the plain protocol untouched and is mainly useful
    /// to exercise the custom-gate plumbing end-to-end.
    NoOp,
}

impl CustomGate {
    /// Instantiates a gate from the registry and decodes its sub-proof.
    ///
    /// An id that is not registered, or a sub-proof the gate's own
    /// decoder cannot parse, is malformed.
    pub fn decode(
        id: &str,
        proof: &serde_json::Value,
    ) -> Result<Self, Error> {
        match id {
            // The no-op gate carries no sub-proof data.
            "noop" => {
                let _ = proof;
                Ok(Self::NoOp)
            }
            _ => Err(Error::UnknownGate { id: id.to_string() }),
        }
    }

    /// The registry id of this gate.
    pub fn id(&self) -> &'static str {
        match self {
            Self::NoOp => "noop",
        }
    }

    /// The scalar multiplying this gate's `Qk[i]` commitment in the
    /// linearisation commitment. The wire evaluations arrive pre-scaled
    /// by the batching challenge `v`.
    pub fn plonk_factor<E>(
        &self,
        _a_eval: E::Fr,
        _b_eval: E::Fr,
        _c_eval: E::Fr,
    ) -> E::Fr
    where
        E: PlonkCurve,
    {
        match self {
            Self::NoOp => E::Fr::zero(),
        }
    }

    /// The gate's local check, independent of the main pairing. Overall
    /// acceptance is the conjunction of the pairing result and every
    /// gate's verdict.
    pub fn verify_proof(&self) -> bool {
        match self {
            Self::NoOp => true,
        }
    }
}

impl CanonicalSerialize for CustomGate {
    fn serialize<W: Write>(
        &self,
        mut writer: W,
    ) -> Result<(), SerializationError> {
        match self {
            Self::NoOp => 0u8.serialize(&mut writer),
        }
    }

    fn serialized_size(&self) -> usize {
        1
    }
}

impl CanonicalDeserialize for CustomGate {
    fn deserialize<R: Read>(
        mut reader: R,
    ) -> Result<Self, SerializationError> {
        match u8::deserialize(&mut reader)? {
            0 => Ok(Self::NoOp),
            _ => Err(SerializationError::InvalidData),
        }
    }
}
