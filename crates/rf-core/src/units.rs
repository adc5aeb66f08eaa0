// rf-core/src/units.rs

use uom::si::f64::VolumeRate as UomVolumeRate;

// Public canonical unit types (SI, f64)
pub type VolumeRate = UomVolumeRate;

/// Volume rate in cubic metres per second.
#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

/// Raw value of a volume rate in cubic metres per second.
#[inline]
pub fn as_m3ps(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    q.get::<cubic_meter_per_second>()
}
