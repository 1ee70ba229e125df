//! Usable discharge power of a battery offered to the reserve market.

use crate::config::BatteryConfig;

/// Capacity left after the reserved share is held back (MWh).
pub fn usable_capacity_mwh(battery: &BatteryConfig) -> f64 {
    battery.capacity_mwh * (1.0 - battery.reserved_capacity_pct / 100.0)
}

/// Power the battery can reliably deliver (MW).
///
/// Output is capped by both the nameplate rating and the energy-equivalent
/// power of the usable capacity after efficiency losses, then derated by
/// availability.
///
/// # Examples
///
/// ```
/// use afrr_sim::config::BatteryConfig;
/// use afrr_sim::model::power::effective_power_mw;
///
/// let battery = BatteryConfig {
///     capacity_mwh: 2.0,
///     power_rating_mw: 1.0,
///     efficiency_pct: 90.0,
///     reserved_capacity_pct: 10.0,
///     availability_pct: 95.0,
/// };
/// assert!((effective_power_mw(&battery) - 0.95).abs() < 1e-12);
/// ```
pub fn effective_power_mw(battery: &BatteryConfig) -> f64 {
    let energy_limited_mw = usable_capacity_mwh(battery) * battery.efficiency_pct / 100.0;
    battery.power_rating_mw.min(energy_limited_mw) * battery.availability_pct / 100.0
}

/// Reserve energy offered per day at `operating_hours_per_day` (MWh).
pub fn daily_reserve_mwh(battery: &BatteryConfig, operating_hours_per_day: f64) -> f64 {
    effective_power_mw(battery) * operating_hours_per_day
}
