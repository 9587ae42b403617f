// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The circuit-specific verification key produced by the preprocessing
//! stage of the snarkjs tool-chain.

use crate::curve::PlonkCurve;
use crate::error::Error;
use crate::object::{field_from_str, VerificationKeyObject};
use ark_ff::{FftField, FftParameters};
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Read, SerializationError, Write,
};

/// PLONK circuit verification key.
///
/// The key is purely referenced by the verifier and never mutated after
/// decoding.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(
    Clone(bound = ""),
    Debug(bound = ""),
    Eq(bound = ""),
    PartialEq(bound = "")
)]
pub struct VerificationKey<E>
where
    E: PlonkCurve,
{
    /// The circuit domain has size `n = 2^power`.
    pub power: u32,

    /// Number of public inputs of the circuit.
    pub n_public: usize,

    /// First coset generator of the permutation argument.
    pub k1: E::Fr,

    /// Second coset generator of the permutation argument.
    pub k2: E::Fr,

    /// Commitment to the multiplication selector polynomial.
    pub q_m_comm: Commitment<E>,

    /// Commitment to the left selector polynomial.
    pub q_l_comm: Commitment<E>,

    /// Commitment to the right selector polynomial.
    pub q_r_comm: Commitment<E>,

    /// Commitment to the output selector polynomial.
    pub q_o_comm: Commitment<E>,

    /// Commitment to the constant selector polynomial.
    pub q_c_comm: Commitment<E>,

    /// Commitment to the first permutation polynomial.
    pub left_sigma_comm: Commitment<E>,

    /// Commitment to the second permutation polynomial.
    pub right_sigma_comm: Commitment<E>,

    /// Commitment to the third permutation polynomial.
    pub out_sigma_comm: Commitment<E>,

    /// Commitments to the custom-gate selector polynomials, one per
    /// registered gate.
    pub q_k_comms: Vec<Commitment<E>>,

    /// The `[x]_2` element committed by the trusted setup.
    pub x_2: E::G2Affine,
}

impl<E> VerificationKey<E>
where
    E: PlonkCurve,
{
    /// Decodes the object form, canonicalising every scalar leaf into the
    /// field and every commitment into an affine G1 element.
    pub fn from_object(
        object: &VerificationKeyObject,
    ) -> Result<Self, Error> {
        let adacity = <E::Fr as FftField>::FftParams::TWO_ADICITY;
        if object.power > adacity {
            return Err(Error::InvalidEvalDomainSize {
                log_size_of_group: object.power,
                adacity,
            });
        }
        let q_k_comms = object
            .qk
            .iter()
            .map(|coords| E::g1_from_object("Qk", coords).map(Commitment))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            power: object.power,
            n_public: object.n_public,
            k1: field_from_str("k1", &object.k1)?,
            k2: field_from_str("k2", &object.k2)?,
            q_m_comm: Commitment(E::g1_from_object("Qm", &object.qm)?),
            q_l_comm: Commitment(E::g1_from_object("Ql", &object.ql)?),
            q_r_comm: Commitment(E::g1_from_object("Qr", &object.qr)?),
            q_o_comm: Commitment(E::g1_from_object("Qo", &object.qo)?),
            q_c_comm: Commitment(E::g1_from_object("Qc", &object.qc)?),
            left_sigma_comm: Commitment(E::g1_from_object(
                "S1", &object.s1,
            )?),
            right_sigma_comm: Commitment(E::g1_from_object(
                "S2", &object.s2,
            )?),
            out_sigma_comm: Commitment(E::g1_from_object(
                "S3", &object.s3,
            )?),
            q_k_comms,
            x_2: E::g2_from_object("X_2", &object.x_2)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Bn254;

    fn vk_object() -> VerificationKeyObject {
        let point: Vec<String> =
            ["1", "2", "1"].iter().map(|s| s.to_string()).collect();
        let pair = |c0: &str, c1: &str| -> Vec<String> {
            vec![c0.to_string(), c1.to_string()]
        };
        VerificationKeyObject {
            protocol: Some("plonk".to_string()),
            curve: "bn128".to_string(),
            n_public: 1,
            power: 3,
            k1: "2".to_string(),
            k2: "3".to_string(),
            qm: point.clone(),
            ql: point.clone(),
            qr: point.clone(),
            qo: point.clone(),
            qc: point.clone(),
            s1: point.clone(),
            s2: point.clone(),
            s3: point,
            qk: Vec::new(),
            x_2: vec![pair("1", "0"), pair("2", "0"), pair("1", "0")],
            w: None,
        }
    }

    #[test]
    fn decodes_the_object_form() {
        let vk = VerificationKey::<Bn254>::from_object(&vk_object()).unwrap();
        assert_eq!(vk.power, 3);
        assert_eq!(vk.n_public, 1);
        assert_eq!(vk.k1, ark_bn254::Fr::from(2u64));
        assert_eq!(vk.k2, ark_bn254::Fr::from(3u64));
        assert!(vk.q_k_comms.is_empty());
    }

    #[test]
    fn oversized_domains_are_rejected() {
        let mut object = vk_object();
        object.power = 99;
        assert!(matches!(
            VerificationKey::<Bn254>::from_object(&object),
            Err(Error::InvalidEvalDomainSize {
                log_size_of_group: 99,
                ..
            })
        ));
    }

    #[test]
    fn malformed_coset_generators_are_rejected() {
        let mut object = vk_object();
        object.k1 = "two".to_string();
        assert!(matches!(
            VerificationKey::<Bn254>::from_object(&object),
            Err(Error::ScalarMalformed { label: "k1" })
        ));
    }
}
