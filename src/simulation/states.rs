//! Core state types for the N-body simulation.
//!
//! - `Vector`: three components tagged with the coordinate system they live in
//! - `Body`: mass, position, velocity and accumulated acceleration
//! - `System`: the ordered list of bodies and the current simulation time `t`
//!
//! Geometry (distances, collisions, integration) only makes sense on
//! Cartesian vectors. Spherical input is converted exactly once, when a
//! `Body` is constructed.

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::SimError;

pub type NVec3 = Vector3<f64>;

/// Coordinate system a `Vector`'s components are expressed in.
///
/// Spherical components are `(r, theta, phi)` with `theta` the azimuth in the
/// x-y plane and `phi` the polar angle from +z.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    Cartesian,
    Spherical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    pub e: NVec3, // components (e1, e2, e3)
    pub system: CoordinateSystem, // what the components mean
}

impl Vector {
    pub fn new(e1: f64, e2: f64, e3: f64, system: CoordinateSystem) -> Self {
        Self {
            e: NVec3::new(e1, e2, e3),
            system,
        }
    }

    pub fn cartesian(e1: f64, e2: f64, e3: f64) -> Self {
        Self::new(e1, e2, e3, CoordinateSystem::Cartesian)
    }

    pub fn spherical(r: f64, theta: f64, phi: f64) -> Self {
        Self::new(r, theta, phi, CoordinateSystem::Spherical)
    }

    /// The zero Cartesian vector
    pub fn zeros() -> Self {
        Self {
            e: NVec3::zeros(),
            system: CoordinateSystem::Cartesian,
        }
    }

    pub fn e1(&self) -> f64 {
        self.e.x
    }

    pub fn e2(&self) -> f64 {
        self.e.y
    }

    pub fn e3(&self) -> f64 {
        self.e.z
    }

    pub fn is_cartesian(&self) -> bool {
        self.system == CoordinateSystem::Cartesian
    }

    /// Displacement `other - self` and the Euclidean distance between the two.
    ///
    /// Both vectors must be Cartesian. The distance is returned unsoftened;
    /// callers dividing by it are responsible for the zero case.
    pub fn distance_to(&self, other: &Vector) -> Result<(NVec3, f64), SimError> {
        for v in [self, other] {
            if !v.is_cartesian() {
                return Err(SimError::CoordinateMismatch {
                    expected: CoordinateSystem::Cartesian,
                    found: v.system,
                });
            }
        }
        let d = other.e - self.e;
        Ok((d, d.norm()))
    }

    /// Independent Cartesian-tagged copy with the same components.
    pub fn deep_copy(&self) -> Vector {
        Vector {
            e: self.e,
            system: CoordinateSystem::Cartesian,
        }
    }
}

/// Convert a spherical position/velocity pair to Cartesian, in place.
///
/// Position `(r, theta, phi)` maps to
/// `(r cos(theta) sin(phi), r sin(theta) sin(phi), r cos(phi))`.
/// Velocity components `(v_r, v_theta, v_phi)` are taken along the local unit
/// vectors `r_hat`, `theta_hat` (azimuthal) and `phi_hat` (polar) at the
/// position, and rotated into the Cartesian frame.
///
/// Both inputs must be Spherical. On success both are re-tagged Cartesian, so
/// a second call fails instead of transforming twice.
pub fn convert_spherical_to_cartesian(position: &mut Vector, velocity: &mut Vector) -> Result<(), SimError> {
    for v in [&*position, &*velocity] {
        if v.system != CoordinateSystem::Spherical {
            return Err(SimError::CoordinateMismatch {
                expected: CoordinateSystem::Spherical,
                found: v.system,
            });
        }
    }

    let (r, theta, phi) = (position.e.x, position.e.y, position.e.z);
    let (v_r, v_theta, v_phi) = (velocity.e.x, velocity.e.y, velocity.e.z);

    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();

    // local orthonormal basis at (theta, phi)
    let r_hat = NVec3::new(cos_t * sin_p, sin_t * sin_p, cos_p);
    let theta_hat = NVec3::new(-sin_t, cos_t, 0.0);
    let phi_hat = NVec3::new(cos_t * cos_p, sin_t * cos_p, -sin_p);

    position.e = r * r_hat;
    position.system = CoordinateSystem::Cartesian;

    velocity.e = v_r * r_hat + v_theta * theta_hat + v_phi * phi_hat;
    velocity.system = CoordinateSystem::Cartesian;

    Ok(())
}

#[derive(Debug, Clone)]
pub struct Body {
    pub m: f64, // mass
    pub x: Vector, // position
    pub v: Vector, // velocity
    pub a: Vector, // accumulated acceleration, always Cartesian
}

impl Body {
    /// Build a body, converting spherical input to Cartesian.
    ///
    /// Fails with `InvalidMass` unless `m > 0`, and with `CoordinateMismatch`
    /// when only one of the two vectors is spherical.
    pub fn new(m: f64, mut x: Vector, mut v: Vector) -> Result<Self, SimError> {
        // also rejects NaN
        if !(m > 0.0) {
            return Err(SimError::InvalidMass(m));
        }
        if !x.is_cartesian() || !v.is_cartesian() {
            convert_spherical_to_cartesian(&mut x, &mut v)?;
        }
        Ok(Self {
            m,
            x,
            v,
            a: Vector::zeros(),
        })
    }

    /// Copy used for RK4 snapshots: same mass, position and velocity,
    /// zeroed acceleration, nothing shared with `self`.
    pub fn deep_copy(&self) -> Body {
        Body {
            m: self.m,
            x: self.x.deep_copy(),
            v: self.v.deep_copy(),
            a: Vector::zeros(),
        }
    }

    pub fn reset_acceleration(&mut self) {
        self.a = Vector::zeros();
    }

    pub fn momentum(&self) -> NVec3 {
        self.m * self.v.e
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // order is only significant for output
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.bodies.iter().map(Body::momentum).sum()
    }
}
