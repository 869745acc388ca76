//! Resource quantities and the depletable allocation pool.
//!
//! [`Resources`] is the plain per-turn record attached to every production
//! unit (wanted, allocated, consumed). [`ResourceConstraints`] is the shared
//! pool a turn allocates from. It is deliberately not `Copy`: allocation
//! functions take it by value and hand back what is left, so only one
//! consumer can hold the pool at any time.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Clamp a quantity to a finite, non-negative value.
#[inline]
pub(crate) fn non_negative(v: f64) -> f64 {
    if v.is_nan() || v < 0.0 { 0.0 } else { v }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Quantities of every resource a production unit can want, be allocated,
/// or consume in one turn. Fields a unit kind never touches stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    /// Physical units operating (or wanting to operate).
    pub nbr_of_units: u64,
    pub fuel: f64,
    /// Professional labor.
    pub pro: f64,
    /// Unskilled labor.
    pub usk: f64,
    /// Automation standing in for unskilled labor.
    pub aut: f64,
    /// Raw ore mass (mines).
    pub ore: f64,
    /// Metals drawn into a factory cache.
    pub metals: f64,
    /// Non-metals drawn into a factory cache.
    pub non_metals: f64,
}

impl Resources {
    pub const ZERO: Resources = Resources {
        nbr_of_units: 0,
        fuel: 0.0,
        pro: 0.0,
        usk: 0.0,
        aut: 0.0,
        ore: 0.0,
        metals: 0.0,
        non_metals: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// True when every field of `self` is no greater than the matching
    /// field of `limit`.
    pub fn fits_within(&self, limit: &Resources) -> bool {
        self.nbr_of_units <= limit.nbr_of_units
            && self.fuel <= limit.fuel
            && self.pro <= limit.pro
            && self.usk <= limit.usk
            && self.aut <= limit.aut
            && self.ore <= limit.ore
            && self.metals <= limit.metals
            && self.non_metals <= limit.non_metals
    }

    /// Unskilled labor slots filled, whether by workers or automation.
    pub fn labor(&self) -> f64 {
        self.usk + self.aut
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(mut self, rhs: Resources) -> Resources {
        self += rhs;
        self
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        self.nbr_of_units += rhs.nbr_of_units;
        self.fuel += rhs.fuel;
        self.pro += rhs.pro;
        self.usk += rhs.usk;
        self.aut += rhs.aut;
        self.ore += rhs.ore;
        self.metals += rhs.metals;
        self.non_metals += rhs.non_metals;
    }
}

impl std::iter::Sum for Resources {
    fn sum<I: Iterator<Item = Resources>>(iter: I) -> Self {
        iter.fold(Resources::ZERO, |acc, r| acc + r)
    }
}

// ---------------------------------------------------------------------------
// ResourceConstraints
// ---------------------------------------------------------------------------

/// The depletable pool a turn allocates from.
///
/// Every allocation call takes the pool by value, subtracts what it grants,
/// and returns the remainder. Balances never go below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConstraints {
    /// Upper bound on the units any single production unit may operate.
    /// Not decremented by allocation.
    pub nbr_of_units: u64,
    pub fuel: f64,
    pub pro: f64,
    pub usk: f64,
    pub aut: f64,
    pub ore: f64,
    pub metals: f64,
    pub non_metals: f64,
}

impl Default for ResourceConstraints {
    fn default() -> Self {
        Self::empty()
    }
}

impl ResourceConstraints {
    /// A pool with nothing in it and no unit ceiling.
    pub fn empty() -> Self {
        Self {
            nbr_of_units: u64::MAX,
            fuel: 0.0,
            pro: 0.0,
            usk: 0.0,
            aut: 0.0,
            ore: 0.0,
            metals: 0.0,
            non_metals: 0.0,
        }
    }

    pub fn with_unit_ceiling(mut self, n: u64) -> Self {
        self.nbr_of_units = n;
        self
    }

    pub fn with_fuel(mut self, v: f64) -> Self {
        self.fuel = non_negative(v);
        self
    }

    pub fn with_pro(mut self, v: f64) -> Self {
        self.pro = non_negative(v);
        self
    }

    pub fn with_usk(mut self, v: f64) -> Self {
        self.usk = non_negative(v);
        self
    }

    pub fn with_aut(mut self, v: f64) -> Self {
        self.aut = non_negative(v);
        self
    }

    pub fn with_ore(mut self, v: f64) -> Self {
        self.ore = non_negative(v);
        self
    }

    pub fn with_metals(mut self, v: f64) -> Self {
        self.metals = non_negative(v);
        self
    }

    pub fn with_non_metals(mut self, v: f64) -> Self {
        self.non_metals = non_negative(v);
        self
    }

    /// Unskilled labor available from workers and automation combined.
    pub fn labor(&self) -> f64 {
        self.usk + self.aut
    }

    /// Subtract a granted allocation. The unit count is a ceiling and is
    /// left alone.
    pub(crate) fn draw(&mut self, granted: &Resources) {
        self.fuel = non_negative(self.fuel - granted.fuel);
        self.pro = non_negative(self.pro - granted.pro);
        self.usk = non_negative(self.usk - granted.usk);
        self.aut = non_negative(self.aut - granted.aut);
        self.ore = non_negative(self.ore - granted.ore);
        self.metals = non_negative(self.metals - granted.metals);
        self.non_metals = non_negative(self.non_metals - granted.non_metals);
    }

    /// Return banked materials to the pool.
    pub(crate) fn release_materials(&mut self, metals: f64, non_metals: f64) {
        self.metals += non_negative(metals);
        self.non_metals += non_negative(non_metals);
    }

    /// The pool viewed as a [`Resources`] record, for bounds checks.
    pub fn as_resources(&self) -> Resources {
        Resources {
            nbr_of_units: self.nbr_of_units,
            fuel: self.fuel,
            pro: self.pro,
            usk: self.usk,
            aut: self.aut,
            ore: self.ore,
            metals: self.metals,
            non_metals: self.non_metals,
        }
    }
}
