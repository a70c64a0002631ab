//! WMO weather interpretation codes
//!
//! Lookup tables for the codes returned by Open-Meteo.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Human readable description for a WMO code
pub fn description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Pictographic label for a WMO code
pub fn emoji(code: i32) -> &'static str {
    match code {
        0 => "☀️",
        1 => "🌤️",
        2 => "⛅",
        3 => "☁️",
        45 | 48 => "🌫️",
        51 | 53 | 80 => "🌦️",
        55 | 56 | 57 | 61 | 63 | 66 | 81 => "🌧️",
        65 | 67 | 82 | 95 | 96 | 99 => "⛈️",
        71 | 77 | 85 => "🌨️",
        73 | 75 | 86 => "❄️",
        _ => "🌡️",
    }
}

/// Rain, drizzle and freezing rain codes
pub fn is_rain(code: i32) -> bool {
    (51..=67).contains(&code)
}

/// Snow fall and snow shower codes
pub fn is_snow(code: i32) -> bool {
    (71..=86).contains(&code)
}

/// Coarse phrase describing how the weather feels, used in assistant prompts.
///
/// Temperature extremes win over the sky condition.
pub fn weather_context(code: i32, temperature: f64) -> &'static str {
    if temperature < 0.0 {
        return "freezing cold";
    }
    if temperature < 10.0 {
        return "cold";
    }
    if temperature > 30.0 {
        return "very hot";
    }
    if temperature > 25.0 {
        return "warm";
    }

    if is_rain(code) {
        return "rainy";
    }
    if is_snow(code) {
        return "snowy";
    }
    if code >= 95 {
        return "stormy";
    }
    if code == 0 || code == 1 {
        return "sunny and clear";
    }

    "mild"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_descriptions() {
        assert_eq!(description(0), "Clear sky");
        assert_eq!(description(3), "Overcast");
        assert_eq!(description(95), "Thunderstorm");
        assert_eq!(description(99), "Thunderstorm with heavy hail");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(description(42), "Unknown");
        assert_eq!(emoji(42), "🌡️");
        assert_eq!(description(-1), "Unknown");
    }

    #[test]
    fn test_emoji_groups() {
        assert_eq!(emoji(0), "☀️");
        assert_eq!(emoji(61), "🌧️");
        assert_eq!(emoji(95), "⛈️");
        assert_eq!(emoji(73), "❄️");
        assert_eq!(emoji(45), "🌫️");
    }

    #[test]
    fn test_weather_context_temperature_first() {
        assert_eq!(weather_context(61, -3.0), "freezing cold");
        assert_eq!(weather_context(0, 5.0), "cold");
        assert_eq!(weather_context(0, 33.0), "very hot");
        assert_eq!(weather_context(61, 27.0), "warm");
    }

    #[test]
    fn test_weather_context_conditions() {
        assert_eq!(weather_context(63, 15.0), "rainy");
        assert_eq!(weather_context(75, 15.0), "snowy");
        assert_eq!(weather_context(95, 15.0), "stormy");
        assert_eq!(weather_context(1, 15.0), "sunny and clear");
        assert_eq!(weather_context(3, 15.0), "mild");
    }
}
