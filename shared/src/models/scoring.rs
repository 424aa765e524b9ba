//! Score blending shared by the recommenders

/// Blend two 0-100 scores with integer weights in tenths, truncating.
///
/// `blend(95, 7, 70)` is `floor(95 * 0.7 + 70 * 0.3) = 87`. Integer maths
/// keeps the truncation exact; `f64` lands just below the integer for inputs
/// such as `1 * 0.7 + 31 * 0.3`.
pub fn blend(primary: u8, primary_tenths: u8, secondary: u8) -> u8 {
    debug_assert!(primary_tenths <= 10);
    let secondary_tenths = 10 - u16::from(primary_tenths);
    let total = u16::from(primary) * u16::from(primary_tenths)
        + u16::from(secondary) * secondary_tenths;
    // At most 100 * 10 / 10
    (total / 10) as u8
}

/// Weather suitability used by the breeding recommender
pub fn breeding_weather_suitability(weather_available: bool) -> u8 {
    if weather_available {
        70
    } else {
        50
    }
}

/// Weather score used by the replacement recommender
pub fn replacement_weather_score(weather_available: bool) -> u8 {
    if weather_available {
        75
    } else {
        50
    }
}
