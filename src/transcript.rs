// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! Keccak-256 based Fiat-Shamir transcript.
//!
//! Unlike a running-state transcript, the snarkjs schedule hashes one
//! densely packed buffer per challenge: appended elements accumulate
//! until [`Transcript::challenge`] hashes the buffer, reduces the digest
//! into `Fr` and clears the buffer for the next round. Scalars are
//! serialized big-endian at the scalar field's fixed width, G1 elements
//! as two big-endian base-field coordinates in affine form.
//!
//! The hash is the original Keccak-256 (padding byte `0x01`), not the
//! FIPS-202 SHA3-256 variant, so challenges agree byte-for-byte with the
//! Ethereum-style verifiers emitted by snarkjs.

use crate::curve::PlonkCurve;
use ark_ff::{BigInteger, PrimeField};
use core::marker::PhantomData;
use sha3::{Digest, Keccak256};

/// Per-challenge transcript buffer.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Debug(bound = ""), Default(bound = ""))]
pub struct Transcript<E>
where
    E: PlonkCurve,
{
    buf: Vec<u8>,

    /// Type Parameter Marker
    __: PhantomData<E>,
}

impl<E> Transcript<E>
where
    E: PlonkCurve,
{
    /// Builds an empty [`Transcript`].
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            __: PhantomData,
        }
    }

    /// Appends a scalar, big-endian at the width of `Fr`.
    pub fn append_scalar(&mut self, scalar: &E::Fr) {
        self.buf
            .extend_from_slice(&scalar.into_repr().to_bytes_be());
    }

    /// Appends a G1 element in affine uncompressed form.
    pub fn append_point(&mut self, point: &E::G1Affine) {
        E::g1_write_uncompressed(point, &mut self.buf);
    }

    /// Hashes the accumulated buffer, interprets the 32-byte digest as a
    /// big-endian integer reduced modulo `r`, and clears the buffer.
    pub fn challenge(&mut self) -> E::Fr {
        let digest = Keccak256::digest(&self.buf);
        self.buf.clear();
        E::Fr::from_be_bytes_mod_order(digest.as_slice())
    }
}

/// Big-endian hex rendering of a scalar, for diagnostics.
pub(crate) fn scalar_to_hex<F>(scalar: &F) -> String
where
    F: PrimeField,
{
    hex::encode(scalar.into_repr().to_bytes_be())
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_bn254::Bn254;
    use ark_ec::{AffineCurve, PairingEngine};
    use num_traits::One;

    type Fr = ark_bn254::Fr;

    #[test]
    fn challenge_is_keccak_of_the_packed_buffer() {
        let mut transcript = Transcript::<Bn254>::new();
        transcript.append_scalar(&Fr::one());
        let challenge = transcript.challenge();

        let mut expected_buf = [0u8; 32];
        expected_buf[31] = 1;
        let expected = Fr::from_be_bytes_mod_order(
            Keccak256::digest(&expected_buf).as_slice(),
        );
        assert_eq!(challenge, expected);
    }

    #[test]
    fn point_encoding_is_affine_uncompressed() {
        let mut transcript = Transcript::<Bn254>::new();
        transcript.append_point(
            &<Bn254 as PairingEngine>::G1Affine::prime_subgroup_generator(),
        );
        let challenge = transcript.challenge();

        let mut expected_buf = [0u8; 64];
        expected_buf[31] = 1;
        expected_buf[63] = 2;
        let expected = Fr::from_be_bytes_mod_order(
            Keccak256::digest(&expected_buf).as_slice(),
        );
        assert_eq!(challenge, expected);
    }

    #[test]
    fn buffer_is_consumed_by_each_challenge() {
        let mut transcript = Transcript::<Bn254>::new();
        transcript.append_scalar(&Fr::one());
        let first = transcript.challenge();
        // The buffer was cleared, so the next challenge hashes nothing.
        let second = transcript.challenge();
        let empty = Fr::from_be_bytes_mod_order(
            Keccak256::digest(&[] as &[u8]).as_slice(),
        );
        assert_ne!(first, second);
        assert_eq!(second, empty);
    }

    #[test]
    fn identical_schedules_agree() {
        let mut left = Transcript::<Bn254>::new();
        let mut right = Transcript::<Bn254>::new();
        for i in 1..5u64 {
            left.append_scalar(&Fr::from(i));
            right.append_scalar(&Fr::from(i));
        }
        assert_eq!(left.challenge(), right.challenge());
    }
}
