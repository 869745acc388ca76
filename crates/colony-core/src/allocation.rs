//! The shared allocation algorithm.
//!
//! Every production unit decides how many of its physical units can run this
//! turn with the same fixed-point clamp: start from a ceiling, and for each
//! resource whose pool cannot cover `cost * n`, cut `n` down to what the pool
//! does cover. Repeat until a whole pass changes nothing. Each pass either
//! lowers `n` or ends the loop, so it settles on the binding constraint in at
//! most one pass per resource (plus the confirming pass).
//!
//! Labor is split in two: professionals are a fixed requirement, while the
//! unskilled slots can be filled by workers or automation interchangeably.
//! Automation is used first because it carries no wage.

use crate::resources::{ResourceConstraints, Resources, non_negative};

/// Per-unit, per-turn operating costs of one production unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCosts {
    pub fuel: f64,
    pub pro: f64,
    /// Unskilled slots per unit, fillable by `usk` or `aut`.
    pub labor: f64,
}

/// One resource taking part in the clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub per_unit: f64,
    pub available: f64,
}

impl Limit {
    pub fn new(per_unit: f64, available: f64) -> Self {
        Self {
            per_unit,
            available,
        }
    }
}

/// Largest unit count, no greater than `ceiling`, that every limit can pay
/// for. A limit whose per-unit cost is zero (or not a finite positive
/// number) never constrains.
pub fn clamp_units(ceiling: u64, limits: &[Limit]) -> u64 {
    let mut n = ceiling;
    loop {
        let mut reduced = false;
        for limit in limits {
            if n == 0 {
                return 0;
            }
            if !(limit.per_unit.is_finite() && limit.per_unit > 0.0) {
                continue;
            }
            let available = non_negative(limit.available);
            if limit.per_unit * n as f64 <= available {
                continue;
            }
            let mut fit = ((available / limit.per_unit).floor() as u64).min(n - 1);
            // Rounding in the division can leave `fit` one off either way.
            while fit > 0 && limit.per_unit * fit as f64 > available {
                fit -= 1;
            }
            while fit + 1 < n && limit.per_unit * (fit + 1) as f64 <= available {
                fit += 1;
            }
            n = fit;
            reduced = true;
        }
        if !reduced {
            return n;
        }
    }
}

/// The fuel, professional and unskilled-labor limits every unit kind shares.
pub fn operating_limits(costs: &UnitCosts, pool: &ResourceConstraints) -> [Limit; 3] {
    [
        Limit::new(costs.fuel, pool.fuel),
        Limit::new(costs.pro, pool.pro),
        Limit::new(costs.labor, pool.labor()),
    ]
}

/// What `n` units would want if nothing were scarce. Both `usk` and `aut`
/// carry the full unskilled requirement since either can fill it.
pub fn operating_want(n: u64, costs: &UnitCosts) -> Resources {
    let units = n as f64;
    Resources {
        nbr_of_units: n,
        fuel: units * costs.fuel,
        pro: units * costs.pro,
        usk: units * costs.labor,
        aut: units * costs.labor,
        ..Resources::ZERO
    }
}

/// Fuel and labor granted to `n` operating units, drawing automation before
/// unskilled workers. `n` must already have been clamped against `pool`.
pub fn operating_grant(n: u64, costs: &UnitCosts, pool: &ResourceConstraints) -> Resources {
    if n == 0 {
        return Resources::ZERO;
    }
    let units = n as f64;
    let labor = units * costs.labor;
    let aut = labor.min(pool.aut);
    let usk = non_negative(labor - aut).min(pool.usk);
    Resources {
        nbr_of_units: n,
        fuel: (units * costs.fuel).min(pool.fuel),
        pro: (units * costs.pro).min(pool.pro),
        usk,
        aut,
        ..Resources::ZERO
    }
}
