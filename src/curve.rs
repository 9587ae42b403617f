// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! The narrow contract this crate consumes from a pairing-friendly curve
//! library: decoding points from the external object form, validating
//! them, and serializing them for the transcript.
//!
//! The verifier itself is generic over [`PlonkCurve`]; concrete curves are
//! selected by the name stored in the verification key, mirroring the
//! snarkjs `getCurveFromName` dispatcher.

use crate::error::Error;
use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use ark_ec::short_weierstrass_jacobian::GroupAffine;
use ark_ec::{PairingEngine, SWModelParameters};
use ark_ff::{BigInteger, Field, Fp2, Fp2Parameters, PrimeField};
use num_traits::{One, Zero};
use std::str::FromStr;

/// Curve capabilities required by the verifier on top of
/// [`PairingEngine`].
///
/// G1 elements travel through the Fiat-Shamir transcript and therefore
/// need an exact affine big-endian encoding; G2 elements are only ever
/// consumed as pairing inputs and stay opaque after decoding.
pub trait PlonkCurve: PairingEngine {
    /// Canonical lowercase curve name as emitted by the snarkjs
    /// tool-chain.
    const NAME: &'static str;

    /// Decodes a G1 element from two or three decimal coordinate strings.
    fn g1_from_object(
        label: &'static str,
        coords: &[String],
    ) -> Result<Self::G1Affine, Error>;

    /// Decodes a G2 element from two or three pairs of decimal coordinate
    /// strings.
    fn g2_from_object(
        label: &'static str,
        coords: &[Vec<String>],
    ) -> Result<Self::G2Affine, Error>;

    /// Checks that `point` satisfies the curve equation and lies in the
    /// prime-order subgroup.
    fn g1_is_valid(point: &Self::G1Affine) -> bool;

    /// Appends the affine uncompressed encoding of `point` to `buf`: both
    /// base-field coordinates big-endian at fixed width, with no infinity
    /// flag. The point at infinity encodes as all zeroes.
    fn g1_write_uncompressed(point: &Self::G1Affine, buf: &mut Vec<u8>);
}

/// Strips `-` and `_` and lowercases `name`, so that the aliases used in
/// the wild ("bn128", "bn254", "BLS12-381", ...) compare equal.
pub fn normalised_curve_name(name: &str) -> String {
    name.to_lowercase().replace(|c| c == '-' || c == '_', "")
}

fn coordinate<F>(label: &'static str, source: &str) -> Result<F, Error>
where
    F: PrimeField + FromStr,
{
    <F as FromStr>::from_str(source)
        .map_err(|_| Error::PointMalformed { label })
}

/// Decodes a short-Weierstrass point from the object form.
///
/// Three coordinates are read as jacobian `(X, Y, Z)` with `Z = 0`
/// denoting the point at infinity; two coordinates are read as affine.
/// The snarkjs serializer always emits `Z = 1`.
pub(crate) fn sw_g1_from_object<P>(
    label: &'static str,
    coords: &[String],
) -> Result<GroupAffine<P>, Error>
where
    P: SWModelParameters,
    P::BaseField: PrimeField + FromStr,
{
    let (x, y, z) = match coords {
        [x, y] => (x.as_str(), y.as_str(), None),
        [x, y, z] => (x.as_str(), y.as_str(), Some(z.as_str())),
        _ => return Err(Error::PointMalformed { label }),
    };
    let x = coordinate::<P::BaseField>(label, x)?;
    let y = coordinate::<P::BaseField>(label, y)?;
    let z = match z {
        Some(z) => coordinate::<P::BaseField>(label, z)?,
        None => P::BaseField::one(),
    };
    normalise_jacobian(label, x, y, z)
}

/// Decodes a point over a quadratic extension field from the object form,
/// where every coordinate is a `[c0, c1]` pair of decimal strings.
pub(crate) fn sw_g2_from_object<Q, P>(
    label: &'static str,
    coords: &[Vec<String>],
) -> Result<GroupAffine<P>, Error>
where
    Q: Fp2Parameters,
    Q::Fp: FromStr,
    P: SWModelParameters<BaseField = Fp2<Q>>,
{
    let pair = |pair: &Vec<String>| -> Result<Fp2<Q>, Error> {
        match pair.as_slice() {
            [c0, c1] => Ok(Fp2::new(
                coordinate::<Q::Fp>(label, c0)?,
                coordinate::<Q::Fp>(label, c1)?,
            )),
            _ => Err(Error::PointMalformed { label }),
        }
    };
    let (x, y, z) = match coords {
        [x, y] => (pair(x)?, pair(y)?, Fp2::one()),
        [x, y, z] => (pair(x)?, pair(y)?, pair(z)?),
        _ => return Err(Error::PointMalformed { label }),
    };
    normalise_jacobian(label, x, y, z)
}

/// Turns jacobian `(X, Y, Z)` into the affine `(X / Z^2, Y / Z^3)`
/// without checking the curve equation; validity is the structural
/// validator's concern.
fn normalise_jacobian<P>(
    label: &'static str,
    x: P::BaseField,
    y: P::BaseField,
    z: P::BaseField,
) -> Result<GroupAffine<P>, Error>
where
    P: SWModelParameters,
{
    if z.is_zero() {
        return Ok(GroupAffine::zero());
    }
    if z.is_one() {
        return Ok(GroupAffine::new(x, y, false));
    }
    let z_inv = z.inverse().ok_or(Error::PointMalformed { label })?;
    let z_inv_square = z_inv.square();
    Ok(GroupAffine::new(
        x * z_inv_square,
        y * z_inv_square * z_inv,
        false,
    ))
}

pub(crate) fn sw_affine_is_valid<P>(point: &GroupAffine<P>) -> bool
where
    P: SWModelParameters,
{
    point.is_on_curve() && point.is_in_correct_subgroup_assuming_on_curve()
}

pub(crate) fn write_sw_affine<P>(point: &GroupAffine<P>, buf: &mut Vec<u8>)
where
    P: SWModelParameters,
    P::BaseField: PrimeField,
{
    if point.infinity {
        let width = P::BaseField::zero().into_repr().to_bytes_be().len();
        buf.resize(buf.len() + 2 * width, 0);
    } else {
        buf.extend_from_slice(&point.x.into_repr().to_bytes_be());
        buf.extend_from_slice(&point.y.into_repr().to_bytes_be());
    }
}

impl PlonkCurve for Bn254 {
    const NAME: &'static str = "bn128";

    fn g1_from_object(
        label: &'static str,
        coords: &[String],
    ) -> Result<Self::G1Affine, Error> {
        sw_g1_from_object::<ark_bn254::g1::Parameters>(label, coords)
    }

    fn g2_from_object(
        label: &'static str,
        coords: &[Vec<String>],
    ) -> Result<Self::G2Affine, Error> {
        sw_g2_from_object::<
            ark_bn254::Fq2Parameters,
            ark_bn254::g2::Parameters,
        >(label, coords)
    }

    fn g1_is_valid(point: &Self::G1Affine) -> bool {
        sw_affine_is_valid(point)
    }

    fn g1_write_uncompressed(point: &Self::G1Affine, buf: &mut Vec<u8>) {
        write_sw_affine(point, buf)
    }
}

impl PlonkCurve for Bls12_381 {
    const NAME: &'static str = "bls12381";

    fn g1_from_object(
        label: &'static str,
        coords: &[String],
    ) -> Result<Self::G1Affine, Error> {
        sw_g1_from_object::<ark_bls12_381::g1::Parameters>(label, coords)
    }

    fn g2_from_object(
        label: &'static str,
        coords: &[Vec<String>],
    ) -> Result<Self::G2Affine, Error> {
        sw_g2_from_object::<
            ark_bls12_381::Fq2Parameters,
            ark_bls12_381::g2::Parameters,
        >(label, coords)
    }

    fn g1_is_valid(point: &Self::G1Affine) -> bool {
        sw_affine_is_valid(point)
    }

    fn g1_write_uncompressed(point: &Self::G1Affine, buf: &mut Vec<u8>) {
        write_sw_affine(point, buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ark_ec::AffineCurve;

    #[test]
    fn curve_names_normalise_to_known_aliases() {
        assert_eq!(normalised_curve_name("BLS12-381"), "bls12381");
        assert_eq!(normalised_curve_name("bn128"), "bn128");
        assert_eq!(normalised_curve_name("ALT_BN128"), "altbn128");
    }

    #[test]
    fn decodes_the_bn254_generator_from_decimal_strings() {
        let coords: Vec<String> =
            ["1", "2", "1"].iter().map(|s| s.to_string()).collect();
        let point = Bn254::g1_from_object("A", &coords).unwrap();
        assert_eq!(
            point,
            <Bn254 as PairingEngine>::G1Affine::prime_subgroup_generator()
        );
        assert!(Bn254::g1_is_valid(&point));
    }

    #[test]
    fn normalises_jacobian_coordinates() {
        // The generator (1, 2) written with Z = 2: X = Z^2, Y = 2 * Z^3.
        let coords: Vec<String> =
            ["4", "16", "2"].iter().map(|s| s.to_string()).collect();
        let point = Bn254::g1_from_object("A", &coords).unwrap();
        assert_eq!(
            point,
            <Bn254 as PairingEngine>::G1Affine::prime_subgroup_generator()
        );
    }

    #[test]
    fn zero_z_decodes_to_the_point_at_infinity() {
        let coords: Vec<String> =
            ["0", "1", "0"].iter().map(|s| s.to_string()).collect();
        let point = Bn254::g1_from_object("A", &coords).unwrap();
        assert!(point.infinity);
    }

    #[test]
    fn rejects_non_decimal_coordinates_and_bad_arity() {
        let bad: Vec<String> =
            ["1", "0x02", "1"].iter().map(|s| s.to_string()).collect();
        assert!(matches!(
            Bn254::g1_from_object("A", &bad),
            Err(Error::PointMalformed { label: "A" })
        ));
        let short: Vec<String> = vec!["1".to_string()];
        assert!(matches!(
            Bn254::g1_from_object("A", &short),
            Err(Error::PointMalformed { label: "A" })
        ));
    }

    #[test]
    fn off_curve_points_decode_but_do_not_validate() {
        let coords: Vec<String> =
            ["0", "0", "1"].iter().map(|s| s.to_string()).collect();
        let point = Bn254::g1_from_object("A", &coords).unwrap();
        assert!(!Bn254::g1_is_valid(&point));
    }

    #[test]
    fn uncompressed_encoding_is_fixed_width_big_endian() {
        let generator =
            <Bn254 as PairingEngine>::G1Affine::prime_subgroup_generator();
        let mut buf = Vec::new();
        Bn254::g1_write_uncompressed(&generator, &mut buf);
        assert_eq!(buf.len(), 64);
        assert_eq!(buf[31], 1);
        assert_eq!(buf[63], 2);

        let mut bls_buf = Vec::new();
        Bls12_381::g1_write_uncompressed(
            &<Bls12_381 as PairingEngine>::G1Affine::prime_subgroup_generator(),
            &mut bls_buf,
        );
        assert_eq!(bls_buf.len(), 96);
    }
}
