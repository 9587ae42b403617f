// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE
// or https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Copyright (c) ZK-INFRA. All rights reserved.

//! A Proof stores the commitments to all of the elements that
//! are needed to univocally identify a prove of some statement.
//!
//! This module contains the `Proof` structure decoded from the snarkjs
//! object form and the full verification pipeline: challenge derivation,
//! Lagrange and public-input evaluation, reconstruction of the quotient
//! value and of the linearisation commitment, batching, and the final
//! pairing equation.

use crate::curve::PlonkCurve;
use crate::error::Error;
use crate::object::{field_from_str, ProofObject};
use crate::proof_system::gate::CustomGate;
use crate::proof_system::VerificationKey;
use crate::transcript::{scalar_to_hex, Transcript};
use ark_ec::msm::VariableBaseMSM;
use ark_ec::{AffineCurve, ProjectiveCurve};
use ark_ff::{fields::batch_inversion, Field, PrimeField};
use ark_poly::{EvaluationDomain, GeneralEvaluationDomain};
use ark_poly_commit::kzg10::Commitment;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Read, SerializationError, Write,
};
use itertools::izip;
use num_traits::{One, Zero};
use tracing::{debug, warn};

/// Subset of all of the evaluations added to the proof.
///
/// All evaluations are taken at the challenge point `xi`, except
/// [`permutation_eval`](Self::permutation_eval) which is the grand-product
/// polynomial evaluated at `xi * omega`.
#[derive(
    CanonicalDeserialize,
    CanonicalSerialize,
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
)]
pub struct ProofEvaluations<F>
where
    F: PrimeField,
{
    /// Evaluation of the left wire polynomial at `xi`.
    pub a_eval: F,

    /// Evaluation of the right wire polynomial at `xi`.
    pub b_eval: F,

    /// Evaluation of the output wire polynomial at `xi`.
    pub c_eval: F,

    /// Evaluation of the first permutation polynomial at `xi`.
    pub left_sigma_eval: F,

    /// Evaluation of the second permutation polynomial at `xi`.
    pub right_sigma_eval: F,

    /// Evaluation of the grand-product polynomial at `xi * omega`.
    pub permutation_eval: F,

    /// Evaluation of the linearisation polynomial at `xi`.
    pub linearisation_polynomial_eval: F,
}

/// A Proof is a composition of `Commitment`s to the Witness, Permutation,
/// Quotient and Opening polynomials as well as the [`ProofEvaluations`].
///
/// It's main goal is to allow the verifier to formally check that the
/// secret witnesses used to generate the proof satisfy the circuit
/// described by the verification key, succintly and without acquiring any
/// kind of knowledge about the witness.
#[derive(CanonicalDeserialize, CanonicalSerialize, derivative::Derivative)]
#[derivative(
    Clone(bound = ""),
    Debug(bound = ""),
    Eq(bound = ""),
    PartialEq(bound = "")
)]
pub struct Proof<E>
where
    E: PlonkCurve,
{
    /// Commitment to the witness polynomial for the left wires.
    pub a_comm: Commitment<E>,

    /// Commitment to the witness polynomial for the right wires.
    pub b_comm: Commitment<E>,

    /// Commitment to the witness polynomial for the output wires.
    pub c_comm: Commitment<E>,

    /// Commitment to the permutation polynomial.
    pub z_comm: Commitment<E>,

    /// Commitment to the quotient polynomial.
    pub t_1_comm: Commitment<E>,

    /// Commitment to the quotient polynomial.
    pub t_2_comm: Commitment<E>,

    /// Commitment to the quotient polynomial.
    pub t_3_comm: Commitment<E>,

    /// Commitment to the opening proof polynomial.
    pub w_xi_comm: Commitment<E>,

    /// Commitment to the shifted opening proof polynomial.
    pub w_xi_omega_comm: Commitment<E>,

    /// Subset of all of the evaluations added to the proof.
    pub evaluations: ProofEvaluations<E::Fr>,

    /// Decoded custom gates, in the order of the verification key's `Qk`
    /// commitments. Empty for the plain protocol.
    pub custom_gates: Vec<CustomGate>,
}

/// Challenges derived from the Fiat-Shamir transcript.
///
/// The challenges are a pure function of the proof and the public signals
/// and are reproducible byte-for-byte across implementations.
#[derive(derivative::Derivative)]
#[derivative(Clone(bound = ""), Copy(bound = ""), Debug(bound = ""))]
pub struct Challenges<E>
where
    E: PlonkCurve,
{
    /// Permutation challenge.
    pub beta: E::Fr,

    /// Permutation challenge.
    pub gamma: E::Fr,

    /// Quotient challenge.
    pub alpha: E::Fr,

    /// Evaluation point challenge.
    pub xi: E::Fr,

    /// Powers of the opening batching challenge: `v[0]` is `v1` and
    /// `v[i] = v1^{i+1}`.
    pub v: [E::Fr; 6],

    /// Opening separation challenge.
    pub u: E::Fr,
}

impl<E> Challenges<E>
where
    E: PlonkCurve,
{
    /// Replays the prover's transcript.
    ///
    /// In order for the verifier and prover to have the same view in the
    /// non-interactive setting, both parties must hash the same elements
    /// in the same order: each challenge is the Keccak-256 digest of the
    /// prover messages it depends on, reduced into the scalar field.
    pub fn derive(proof: &Proof<E>, public_inputs: &[E::Fr]) -> Self {
        let mut transcript = Transcript::<E>::new();

        for input in public_inputs {
            transcript.append_scalar(input);
        }
        transcript.append_point(&proof.a_comm.0);
        transcript.append_point(&proof.b_comm.0);
        transcript.append_point(&proof.c_comm.0);
        let beta = transcript.challenge();

        transcript.append_scalar(&beta);
        let gamma = transcript.challenge();

        transcript.append_point(&proof.z_comm.0);
        let alpha = transcript.challenge();

        transcript.append_point(&proof.t_1_comm.0);
        transcript.append_point(&proof.t_2_comm.0);
        transcript.append_point(&proof.t_3_comm.0);
        let xi = transcript.challenge();

        transcript.append_scalar(&proof.evaluations.a_eval);
        transcript.append_scalar(&proof.evaluations.b_eval);
        transcript.append_scalar(&proof.evaluations.c_eval);
        transcript.append_scalar(&proof.evaluations.left_sigma_eval);
        transcript.append_scalar(&proof.evaluations.right_sigma_eval);
        transcript.append_scalar(&proof.evaluations.permutation_eval);
        transcript
            .append_scalar(&proof.evaluations.linearisation_polynomial_eval);
        let v_1 = transcript.challenge();

        let mut v = [v_1; 6];
        for i in 1..v.len() {
            v[i] = v[i - 1] * v_1;
        }

        transcript.append_point(&proof.w_xi_comm.0);
        transcript.append_point(&proof.w_xi_omega_comm.0);
        let u = transcript.challenge();

        Self {
            beta,
            gamma,
            alpha,
            xi,
            v,
            u,
        }
    }
}

impl<E> Proof<E>
where
    E: PlonkCurve,
{
    /// Decodes the object form into curve-native elements.
    ///
    /// Custom-gate entries are instantiated through the gate registry and
    /// must match the verification key's `Qk` commitments in number; their
    /// order pairs the i-th entry with `Qk[i]`.
    pub fn from_object(
        object: &ProofObject,
        vk: &VerificationKey<E>,
    ) -> Result<Self, Error> {
        let custom_gates = object
            .custom_gates
            .iter()
            .map(|entry| CustomGate::decode(&entry.id, &entry.proof))
            .collect::<Result<Vec<_>, Error>>()?;
        if !custom_gates.is_empty()
            && custom_gates.len() != vk.q_k_comms.len()
        {
            return Err(Error::GateCountMismatch {
                proof_gates: custom_gates.len(),
                vk_selectors: vk.q_k_comms.len(),
            });
        }
        Ok(Self {
            a_comm: Commitment(E::g1_from_object("A", &object.a)?),
            b_comm: Commitment(E::g1_from_object("B", &object.b)?),
            c_comm: Commitment(E::g1_from_object("C", &object.c)?),
            z_comm: Commitment(E::g1_from_object("Z", &object.z)?),
            t_1_comm: Commitment(E::g1_from_object("T1", &object.t1)?),
            t_2_comm: Commitment(E::g1_from_object("T2", &object.t2)?),
            t_3_comm: Commitment(E::g1_from_object("T3", &object.t3)?),
            w_xi_comm: Commitment(E::g1_from_object("Wxi", &object.wxi)?),
            w_xi_omega_comm: Commitment(E::g1_from_object(
                "Wxiw",
                &object.wxiw,
            )?),
            evaluations: ProofEvaluations {
                a_eval: field_from_str("eval_a", &object.eval_a)?,
                b_eval: field_from_str("eval_b", &object.eval_b)?,
                c_eval: field_from_str("eval_c", &object.eval_c)?,
                left_sigma_eval: field_from_str(
                    "eval_s1",
                    &object.eval_s1,
                )?,
                right_sigma_eval: field_from_str(
                    "eval_s2",
                    &object.eval_s2,
                )?,
                permutation_eval: field_from_str(
                    "eval_zw",
                    &object.eval_zw,
                )?,
                linearisation_polynomial_eval: field_from_str(
                    "eval_r",
                    &object.eval_r,
                )?,
            },
            custom_gates,
        })
    }

    /// Checks that every G1 element of the proof satisfies the curve
    /// equation and lies in the prime-order subgroup.
    ///
    /// The scalar-valued fields are implicitly well-formed: decoding
    /// canonicalises them into the field.
    pub fn is_well_formed(&self) -> bool {
        let elements = [
            ("A", &self.a_comm),
            ("B", &self.b_comm),
            ("C", &self.c_comm),
            ("Z", &self.z_comm),
            ("T1", &self.t_1_comm),
            ("T2", &self.t_2_comm),
            ("T3", &self.t_3_comm),
            ("Wxi", &self.w_xi_comm),
            ("Wxiw", &self.w_xi_omega_comm),
        ];
        for (label, commitment) in elements {
            if !E::g1_is_valid(&commitment.0) {
                debug!(
                    point = label,
                    "proof element fails the curve or subgroup check"
                );
                return false;
            }
        }
        true
    }

    /// Performs the verification of a [`Proof`] returning a boolean
    /// result.
    ///
    /// The pipeline is linear and any stage's failure short-circuits to
    /// rejection: structural validation, challenge derivation, Lagrange
    /// and public-input evaluation, quotient reconstruction, the batched
    /// commitments, the pairing equation and finally the custom-gate
    /// sub-verifications.
    pub fn verify(
        &self,
        vk: &VerificationKey<E>,
        public_inputs: &[E::Fr],
    ) -> bool {
        if !self.is_well_formed() {
            return false;
        }
        if public_inputs.len() != vk.n_public {
            debug!(
                found = public_inputs.len(),
                expected = vk.n_public,
                "invalid public input count"
            );
            return false;
        }
        let domain =
            match GeneralEvaluationDomain::<E::Fr>::new(1 << vk.power) {
                Some(domain) => domain,
                None => {
                    debug!(
                        power = vk.power,
                        "no evaluation domain of the requested size"
                    );
                    return false;
                }
            };

        let challenges = Challenges::derive(self, public_inputs);
        debug!(
            beta = %scalar_to_hex(&challenges.beta),
            gamma = %scalar_to_hex(&challenges.gamma),
            alpha = %scalar_to_hex(&challenges.alpha),
            xi = %scalar_to_hex(&challenges.xi),
            v1 = %scalar_to_hex(&challenges.v[0]),
            u = %scalar_to_hex(&challenges.u),
            "derived transcript challenges"
        );

        // Compute the vanishing polynomial evaluated at `xi` by `power`
        // repeated squarings.
        let mut xin = challenges.xi;
        for _ in 0..vk.power {
            xin.square_in_place();
        }
        let zh = xin - E::Fr::one();
        let zh_inv = match zh.inverse() {
            Some(inverse) => inverse,
            None => {
                debug!("evaluation challenge landed inside the domain");
                return false;
            }
        };

        let lagranges = lagrange_evaluations(
            &domain,
            challenges.xi,
            zh,
            core::cmp::max(1, vk.n_public),
        );
        let pi_eval =
            compute_public_input_evaluation(public_inputs, &lagranges);
        let t_eval = self.compute_quotient_evaluation(
            pi_eval,
            &challenges,
            lagranges[0],
            zh_inv,
        );

        let d_comm = self.compute_linearisation_commitment(
            vk,
            &challenges,
            lagranges[0],
        );
        let f_comm =
            self.compute_batched_commitment(vk, &challenges, xin, d_comm);
        let e_scalar = self.compute_batched_evaluation(t_eval, &challenges);
        let e_comm = E::G1Affine::prime_subgroup_generator()
            .mul(e_scalar.into_repr());

        // A1 = Wxi + u * Wxiw
        // B1 = xi * Wxi + u * xi * omega * Wxiw + F - E
        let u_xi_omega = challenges.u * challenges.xi * domain.element(1);
        let a_1 = self.w_xi_comm.0.into_projective()
            + self.w_xi_omega_comm.0.mul(challenges.u.into_repr());
        let b_1 = self.w_xi_comm.0.mul(challenges.xi.into_repr())
            + self.w_xi_omega_comm.0.mul(u_xi_omega.into_repr())
            + f_comm
            - e_comm;

        let pairs = [
            (
                E::G1Prepared::from((-a_1).into_affine()),
                E::G2Prepared::from(vk.x_2),
            ),
            (
                E::G1Prepared::from(b_1.into_affine()),
                E::G2Prepared::from(E::G2Affine::prime_subgroup_generator()),
            ),
        ];
        if !E::product_of_pairings(&pairs).is_one() {
            warn!("pairing equation does not hold");
            return false;
        }

        for gate in &self.custom_gates {
            if !gate.verify_proof() {
                debug!(
                    gate = gate.id(),
                    "custom gate rejected its sub-proof"
                );
                return false;
            }
        }

        true
    }

    /// Reconstructs the quotient polynomial evaluated at `xi` from the
    /// claimed evaluations and the challenges.
    fn compute_quotient_evaluation(
        &self,
        pi_eval: E::Fr,
        challenges: &Challenges<E>,
        l1_eval: E::Fr,
        zh_inv: E::Fr,
    ) -> E::Fr {
        let alpha_sq = challenges.alpha.square();

        // r + PI(xi)
        let a = self.evaluations.linearisation_polynomial_eval + pi_eval;

        // a + beta * sigma_1 + gamma
        let beta_sig1 = challenges.beta * self.evaluations.left_sigma_eval;
        let b_0 = self.evaluations.a_eval + beta_sig1 + challenges.gamma;

        // b + beta * sigma_2 + gamma
        let beta_sig2 = challenges.beta * self.evaluations.right_sigma_eval;
        let b_1 = self.evaluations.b_eval + beta_sig2 + challenges.gamma;

        // c + gamma
        let b_2 = self.evaluations.c_eval + challenges.gamma;

        let b = challenges.alpha
            * b_0
            * b_1
            * b_2
            * self.evaluations.permutation_eval;

        // l_1(xi) * alpha^2
        let c = l1_eval * alpha_sq;

        (a - b - c) * zh_inv
    }

    /// Computes the commitment to the linearisation polynomial `[D]_1` by
    /// a multi-scalar combination of the selector, permutation and
    /// grand-product commitments.
    fn compute_linearisation_commitment(
        &self,
        vk: &VerificationKey<E>,
        challenges: &Challenges<E>,
        l1_eval: E::Fr,
    ) -> E::G1Projective {
        let evals = &self.evaluations;
        let v = challenges.v[0];

        let mut scalars =
            Vec::with_capacity(8 + self.custom_gates.len());
        let mut points = Vec::with_capacity(8 + self.custom_gates.len());

        scalars.push(evals.a_eval * evals.b_eval * v);
        points.push(vk.q_m_comm.0);

        // Each registered gate contributes its own factor against the
        // matching `Qk` selector commitment.
        for (gate, selector) in izip!(&self.custom_gates, &vk.q_k_comms) {
            scalars.push(gate.plonk_factor::<E>(
                evals.a_eval * v,
                evals.b_eval * v,
                evals.c_eval * v,
            ));
            points.push(selector.0);
        }

        scalars.push(evals.a_eval * v);
        points.push(vk.q_l_comm.0);

        scalars.push(evals.b_eval * v);
        points.push(vk.q_r_comm.0);

        scalars.push(evals.c_eval * v);
        points.push(vk.q_o_comm.0);

        scalars.push(v);
        points.push(vk.q_c_comm.0);

        // (a + beta * xi + gamma)(b + beta * k1 * xi + gamma)
        // (c + beta * k2 * xi + gamma) * alpha * v + l_1 * alpha^2 * v + u
        let beta_xi = challenges.beta * challenges.xi;
        let s6_a = evals.a_eval + beta_xi + challenges.gamma;
        let s6_b = evals.b_eval + beta_xi * vk.k1 + challenges.gamma;
        let s6_c = evals.c_eval + beta_xi * vk.k2 + challenges.gamma;
        let s6 = s6_a * s6_b * s6_c * challenges.alpha * v
            + l1_eval * challenges.alpha.square() * v
            + challenges.u;
        scalars.push(s6);
        points.push(self.z_comm.0);

        // (a + beta * sigma_1 + gamma)(b + beta * sigma_2 + gamma)
        // * alpha * v * beta * z(xi * omega)
        let s7_a = evals.a_eval
            + challenges.beta * evals.left_sigma_eval
            + challenges.gamma;
        let s7_b = evals.b_eval
            + challenges.beta * evals.right_sigma_eval
            + challenges.gamma;
        let s7 = s7_a
            * s7_b
            * challenges.alpha
            * v
            * challenges.beta
            * evals.permutation_eval;
        scalars.push(-s7);
        points.push(vk.out_sigma_comm.0);

        let scalars_repr =
            scalars.iter().map(E::Fr::into_repr).collect::<Vec<_>>();
        VariableBaseMSM::multi_scalar_mul(&points, &scalars_repr)
    }

    /// Computes the batched commitment
    /// `F = T1 + xin * T2 + xin^2 * T3 + D + v^2 * A + v^3 * B + v^4 * C
    /// + v^5 * S1 + v^6 * S2`.
    fn compute_batched_commitment(
        &self,
        vk: &VerificationKey<E>,
        challenges: &Challenges<E>,
        xin: E::Fr,
        d_comm: E::G1Projective,
    ) -> E::G1Projective {
        let v = &challenges.v;
        let scalars = [xin, xin.square(), v[1], v[2], v[3], v[4], v[5]];
        let points = [
            self.t_2_comm.0,
            self.t_3_comm.0,
            self.a_comm.0,
            self.b_comm.0,
            self.c_comm.0,
            vk.left_sigma_comm.0,
            vk.right_sigma_comm.0,
        ];
        let scalars_repr =
            scalars.iter().map(E::Fr::into_repr).collect::<Vec<_>>();
        VariableBaseMSM::multi_scalar_mul(&points, &scalars_repr)
            + self.t_1_comm.0.into_projective()
            + d_comm
    }

    /// Computes the batched evaluation that `E = s * G1::one` commits to:
    /// `s = t + v * r + v^2 * a + v^3 * b + v^4 * c + v^5 * sigma_1
    /// + v^6 * sigma_2 + u * z(xi * omega)`.
    fn compute_batched_evaluation(
        &self,
        t_eval: E::Fr,
        challenges: &Challenges<E>,
    ) -> E::Fr {
        let evals = &self.evaluations;
        let v = &challenges.v;
        t_eval
            + v[0] * evals.linearisation_polynomial_eval
            + v[1] * evals.a_eval
            + v[2] * evals.b_eval
            + v[3] * evals.c_eval
            + v[4] * evals.left_sigma_eval
            + v[5] * evals.right_sigma_eval
            + challenges.u * evals.permutation_eval
    }
}

/// Evaluates the first `count` Lagrange basis polynomials at `xi`:
///
/// ```text
/// L_i(xi) = omega^(i-1) * zh / (n * (xi - omega^(i-1)))
/// ```
///
/// The denominators are inverted in a single batch. They are all non-zero
/// whenever `zh` is: `zh != 0` means `xi` is outside the domain, so no
/// `xi - omega^(i-1)` can vanish.
pub(crate) fn lagrange_evaluations<F>(
    domain: &GeneralEvaluationDomain<F>,
    xi: F,
    zh: F,
    count: usize,
) -> Vec<F>
where
    F: PrimeField,
{
    let n = F::from(domain.size() as u64);
    let omega = domain.element(1);

    let mut roots = Vec::with_capacity(count);
    let mut denominators = Vec::with_capacity(count);
    let mut root = F::one();
    for _ in 0..count {
        roots.push(root);
        denominators.push(n * (xi - root));
        root *= omega;
    }
    batch_inversion(&mut denominators);

    izip!(roots, denominators)
        .map(|(root, inverse)| root * zh * inverse)
        .collect()
}

/// Computes `PI(xi) = -sum_i w_i * L_i(xi)`. The leading negation matches
/// the convention used by the linearisation step.
pub(crate) fn compute_public_input_evaluation<F>(
    public_inputs: &[F],
    lagranges: &[F],
) -> F
where
    F: PrimeField,
{
    izip!(public_inputs, lagranges)
        .fold(F::zero(), |pi_eval, (input, lagrange)| {
            pi_eval - *input * *lagrange
        })
}
