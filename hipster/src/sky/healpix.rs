//! HEALPix nested-scheme implementation of [`SkyIndex`].
//!
//! Follows the Gorski et al. (2005) ring/face decomposition. The 12 base
//! faces are laid out as:
//! - 0–3: north polar cap
//! - 4–7: equatorial belt
//! - 8–11: south polar cap
//!
//! Angles use the physics convention: `theta` is the colatitude in `[0, π]`,
//! `phi` the longitude in `[0, 2π)`.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use super::{SkyIndex, Vec3};

/// Ring number (in units of nside) of each base face's southern vertex.
const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];
/// Longitude index (in units of π/4) of each base face's center.
const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// HEALPix pixelization with nested cell numbering.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedHealpix;

impl NestedHealpix {
    pub fn new() -> Self {
        Self
    }
}

impl SkyIndex for NestedHealpix {
    fn vector_to_cell(&self, order: u8, vector: &Vec3) -> u64 {
        let [x, y, z] = *vector;
        let norm = (x * x + y * y + z * z).sqrt();
        let phi = y.atan2(x);
        z_phi_to_cell(order, z / norm, phi)
    }

    fn cell_to_vector(&self, order: u8, cell: u64) -> Vec3 {
        let (z, phi) = cell_center_z_phi(order, cell);
        let sin_theta = ((1.0 - z) * (1.0 + z)).max(0.0).sqrt();
        [sin_theta * phi.cos(), sin_theta * phi.sin(), z]
    }

    fn cell_to_angle(&self, order: u8, cell: u64) -> (f64, f64) {
        let (z, phi) = cell_center_z_phi(order, cell);
        let sin_theta = ((1.0 - z) * (1.0 + z)).max(0.0).sqrt();
        (sin_theta.atan2(z), phi)
    }
}

fn nside(order: u8) -> i64 {
    1i64 << order
}

/// Wrap a longitude into `[0, 2π)`.
fn wrap_phi(phi: f64) -> f64 {
    let wrapped = phi.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn z_phi_to_cell(order: u8, z: f64, phi: f64) -> u64 {
    let ns = nside(order);
    let za = z.abs();
    let tt = wrap_phi(phi) / FRAC_PI_2; // [0, 4)

    let (face, ix, iy) = if za <= 2.0 / 3.0 {
        // Equatorial belt: index the ascending and descending edge lines
        let temp1 = ns as f64 * (0.5 + tt);
        let temp2 = ns as f64 * (z * 0.75);
        let jp = (temp1 - temp2) as i64;
        let jm = (temp1 + temp2) as i64;
        let ifp = jp >> order;
        let ifm = jm >> order;
        let face = if ifp == ifm {
            ifp | 4
        } else if ifp < ifm {
            ifp
        } else {
            ifm + 8
        };
        let ix = jm & (ns - 1);
        let iy = ns - (jp & (ns - 1)) - 1;
        (face, ix, iy)
    } else {
        // Polar caps
        let ntt = (tt as i64).min(3);
        let tp = tt - ntt as f64;
        let tmp = ns as f64 * (3.0 * (1.0 - za)).sqrt();
        let jp = ((tp * tmp) as i64).min(ns - 1);
        let jm = (((1.0 - tp) * tmp) as i64).min(ns - 1);
        if z >= 0.0 {
            (ntt, ns - jm - 1, ns - jp - 1)
        } else {
            (ntt + 8, jp, jm)
        }
    };

    compose_nested(order, face as u64, ix as u64, iy as u64)
}

/// Center of a nested cell as `(z, phi)` with `z = cos(theta)`.
fn cell_center_z_phi(order: u8, cell: u64) -> (f64, f64) {
    let ns = nside(order);
    let (face, ix, iy) = decompose_nested(order, cell);
    let (face, ix, iy) = (face as usize, ix as i64, iy as i64);

    let npix = 12 * ns * ns;
    let fact2 = 4.0 / npix as f64;
    let fact1 = (ns << 1) as f64 * fact2;

    // Ring index counted from the north pole
    let jr = (JRLL[face] << order) - ix - iy - 1;

    let (nr, z) = if jr < ns {
        (jr, 1.0 - (jr * jr) as f64 * fact2)
    } else if jr > 3 * ns {
        let nr = 4 * ns - jr;
        (nr, (nr * nr) as f64 * fact2 - 1.0)
    } else {
        (ns, (2 * ns - jr) as f64 * fact1)
    };

    let mut tmp = JPLL[face] * nr + ix - iy;
    if tmp < 0 {
        tmp += 8 * nr;
    }
    let phi = FRAC_PI_4 * tmp as f64 / nr as f64;

    (z, wrap_phi(phi))
}

fn compose_nested(order: u8, face: u64, ix: u64, iy: u64) -> u64 {
    (face << (2 * order as u32)) | spread_bits(ix) | (spread_bits(iy) << 1)
}

fn decompose_nested(order: u8, cell: u64) -> (u64, u64, u64) {
    let shift = 2 * order as u32;
    let face = cell >> shift;
    let local = cell & ((1u64 << shift) - 1);
    (face, compact_bits(local), compact_bits(local >> 1))
}

/// Interleave the low 32 bits of `v` into the even bit positions.
fn spread_bits(v: u64) -> u64 {
    let mut out = 0;
    for i in 0..32 {
        out |= ((v >> i) & 1) << (2 * i);
    }
    out
}

/// Inverse of [`spread_bits`]: gather the even bit positions.
fn compact_bits(v: u64) -> u64 {
    let mut out = 0;
    for i in 0..32 {
        out |= ((v >> (2 * i)) & 1) << i;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sky::cell_count;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_spread_compact_inverse() {
        for v in [0u64, 1, 2, 3, 0b1011, 511, 0xFFFF] {
            assert_eq!(compact_bits(spread_bits(v)), v);
        }
        assert_eq!(spread_bits(0b11), 0b0101);
    }

    #[test]
    fn test_x_axis_is_in_equatorial_face_4() {
        let hp = NestedHealpix;
        assert_eq!(hp.vector_to_cell(0, &[1.0, 0.0, 0.0]), 4);
    }

    #[test]
    fn test_poles() {
        let hp = NestedHealpix;
        let north = hp.vector_to_cell(0, &[0.0, 0.0, 1.0]);
        let south = hp.vector_to_cell(0, &[0.0, 0.0, -1.0]);
        assert!(north <= 3);
        assert!(south >= 8);
    }

    #[test]
    fn test_base_face_centers() {
        let hp = NestedHealpix;

        let (theta, phi) = hp.cell_to_angle(0, 0);
        assert!((theta - (2.0f64 / 3.0).acos()).abs() < EPS);
        assert!((phi - PI / 4.0).abs() < EPS);

        let (theta, phi) = hp.cell_to_angle(0, 4);
        assert!((theta - PI / 2.0).abs() < EPS);
        assert!(phi.abs() < EPS);

        let (theta, phi) = hp.cell_to_angle(0, 11);
        assert!((theta - (-2.0f64 / 3.0).acos()).abs() < EPS);
        assert!((phi - 7.0 * PI / 4.0).abs() < EPS);
    }

    #[test]
    fn test_order_one_known_centers() {
        let hp = NestedHealpix;

        // Southern sub-cell of face 0
        let (theta, phi) = hp.cell_to_angle(1, 0);
        assert!((theta.cos() - 1.0 / 3.0).abs() < EPS);
        assert!((phi - PI / 4.0).abs() < EPS);

        // Northern sub-cell of face 0 touches the pole ring
        let (theta, phi) = hp.cell_to_angle(1, 3);
        assert!((theta.cos() - 11.0 / 12.0).abs() < EPS);
        assert!((phi - PI / 4.0).abs() < EPS);
    }

    #[test]
    fn test_center_round_trip_all_cells() {
        let hp = NestedHealpix;
        for order in 0..=4u8 {
            for cell in 0..cell_count(order) {
                let v = hp.cell_to_vector(order, cell);
                assert_eq!(hp.vector_to_cell(order, &v), cell, "order {}", order);
            }
        }
    }

    #[test]
    fn test_child_centers_fall_in_parent() {
        let hp = NestedHealpix;
        for order in 0..=3u8 {
            for cell in 0..cell_count(order) {
                for child in cell * 4..cell * 4 + 4 {
                    let v = hp.cell_to_vector(order + 1, child);
                    assert_eq!(hp.vector_to_cell(order, &v), cell);
                }
            }
        }
    }

    #[test]
    fn test_center_vectors_are_unit() {
        let hp = NestedHealpix;
        for cell in 0..cell_count(2) {
            let [x, y, z] = hp.cell_to_vector(2, cell);
            assert!(((x * x + y * y + z * z) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_vector_need_not_be_normalized() {
        let hp = NestedHealpix;
        let v = hp.cell_to_vector(3, 321);
        let scaled = [v[0] * 7.5, v[1] * 7.5, v[2] * 7.5];
        assert_eq!(hp.vector_to_cell(3, &scaled), 321);
    }

    #[test]
    fn test_angles_in_range() {
        let hp = NestedHealpix;
        for cell in 0..cell_count(3) {
            let (theta, phi) = hp.cell_to_angle(3, cell);
            assert!((0.0..=PI).contains(&theta));
            assert!((0.0..TAU).contains(&phi));
        }
    }

    #[test]
    fn test_deep_order_round_trip() {
        let hp = NestedHealpix;
        let order = 18;
        for cell in [0u64, 12_345_678, cell_count(order) - 1] {
            let v = hp.cell_to_vector(order, cell);
            assert_eq!(hp.vector_to_cell(order, &v), cell);
        }
    }
}
