//! Integer compensation formulas.
//!
//! All intermediate products keep their 32 or 64 bit width and wrap on
//! overflow, as the vendor reference code does on two's complement targets.

use crate::calibration::CalibrationData;

/// Upper bound of the humidity accumulator before the final shift (100 %RH in Q22.22).
pub const HUMIDITY_MAX: i32 = 419_430_400;

/// Fine temperature produced by `compensate_temperature`.
///
/// Pressure and humidity take it by value, so they can only run once the
/// temperature of the same measurement has been compensated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FineTemperature(pub i32);

/// Returns temperature in 0.01 DegC and the fine temperature.
pub fn compensate_temperature(adc_t: i32, calib: &CalibrationData) -> (i32, FineTemperature) {
    let t1 = calib.dig_t1 as i32;
    let t2 = calib.dig_t2 as i32;
    let t3 = calib.dig_t3 as i32;

    let var1 = ((adc_t >> 3).wrapping_sub(t1 << 1)).wrapping_mul(t2) >> 11;
    let delta = (adc_t >> 4).wrapping_sub(t1);
    let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(t3)) >> 14;

    let t_fine = var1.wrapping_add(var2);
    let temperature = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;
    (temperature, FineTemperature(t_fine))
}

/// Pressure in Pa as Q24.8, or `None` when the first stage divisor is zero.
///
/// Callers report `None` as a `0` reading.
pub fn compensate_pressure(adc_p: i32, calib: &CalibrationData, t_fine: FineTemperature) -> Option<i32> {
    let p1 = calib.dig_p1 as i64;
    let p2 = calib.dig_p2 as i64;
    let p3 = calib.dig_p3 as i64;
    let p4 = calib.dig_p4 as i64;
    let p5 = calib.dig_p5 as i64;
    let p6 = calib.dig_p6 as i64;
    let p7 = calib.dig_p7 as i64;
    let p8 = calib.dig_p8 as i64;
    let p9 = calib.dig_p9 as i64;

    let mut var1 = t_fine.0 as i64 - 128_000;
    let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
    var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
    var2 = var2.wrapping_add(p4 << 35);
    var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8).wrapping_add(var1.wrapping_mul(p2) << 12);
    var1 = ((1i64 << 47).wrapping_add(var1)).wrapping_mul(p1) >> 33;
    if var1 == 0 {
        return None;
    }

    let mut p = 1_048_576 - adc_p as i64;
    p = ((p << 31).wrapping_sub(var2)).wrapping_mul(3125).wrapping_div(var1);
    var1 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
    var2 = p8.wrapping_mul(p) >> 19;
    p = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);
    Some(p as i32)
}

/// Relative humidity in %RH as Q22.10.
pub fn compensate_humidity(adc_h: i32, calib: &CalibrationData, t_fine: FineTemperature) -> i32 {
    let h1 = calib.dig_h1 as i32;
    let h2 = calib.dig_h2 as i32;
    let h3 = calib.dig_h3 as i32;
    let h4 = calib.dig_h4 as i32;
    let h5 = calib.dig_h5 as i32;
    let h6 = calib.dig_h6 as i32;

    let v = t_fine.0.wrapping_sub(76_800);

    let offset = (adc_h << 14)
        .wrapping_sub(h4 << 20)
        .wrapping_sub(h5.wrapping_mul(v))
        .wrapping_add(16_384)
        >> 15;
    let scale = (v.wrapping_mul(h6) >> 10).wrapping_mul((v.wrapping_mul(h3) >> 11).wrapping_add(32_768)) >> 10;
    let scale = scale.wrapping_add(2_097_152).wrapping_mul(h2).wrapping_add(8_192) >> 14;

    let mut x = offset.wrapping_mul(scale);
    let square = ((x >> 15).wrapping_mul(x >> 15) >> 7).wrapping_mul(h1) >> 4;
    x = x.wrapping_sub(square);

    x.max(0).min(HUMIDITY_MAX) >> 12
}
