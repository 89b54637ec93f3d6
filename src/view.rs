//! Text rendering of the application state
//!
//! Pure functions from already-fetched data to display strings. Weather
//! codes are passed through untranslated; icon mapping is a concern of the
//! embedding shell.

use crate::controller::AppState;
use crate::models::{CurrentConditions, DailyForecast, HourlyForecast, Location};
use crate::suggest::{SearchSession, SuggestionPhase};

/// Shown when no weather has been fetched yet
pub const IDLE_MESSAGE: &str = "Search a city or allow location to load weather";
/// Shown while a weather flow is in progress
pub const LOADING_MESSAGE: &str = "Loading...";
/// Marks the current hour in the hourly strip
const NOW_MARKER: &str = "<- now";

/// Render the whole application state
#[must_use]
pub fn render_app(state: &AppState, current_hour: u32) -> String {
    if state.is_loading {
        return LOADING_MESSAGE.to_string();
    }
    match &state.weather {
        Some(weather) => {
            let mut out = render_current(state.location.as_ref(), &weather.current);
            out.push('\n');
            out.push_str(&render_hourly(&weather.hourly, current_hour));
            out.push('\n');
            out.push_str(&render_daily(&weather.daily));
            out
        }
        None => IDLE_MESSAGE.to_string(),
    }
}

/// Render current conditions with the location header
#[must_use]
pub fn render_current(location: Option<&Location>, current: &CurrentConditions) -> String {
    let mut out = String::from("Current Weather\n");
    if let Some(location) = location {
        match &location.country {
            Some(country) => out.push_str(&format!("{}, {}\n", location.name, country)),
            None => out.push_str(&format!("{}\n", location.name)),
        }
    }
    out.push_str(&format!(
        "Temp: {:.1} C  Humidity: {}%  Wind: {:.1} km/h",
        current.temperature, current.humidity, current.wind_speed
    ));
    out
}

/// Render the first 24 hourly entries, marking the current hour
#[must_use]
pub fn render_hourly(hourly: &HourlyForecast, current_hour: u32) -> String {
    let mut out = String::from("Hourly Forecast\n");
    let now_index = hourly.current_hour_index(current_hour);

    for (i, (time, temperature)) in hourly
        .time
        .iter()
        .zip(hourly.temperature.iter())
        .take(24)
        .enumerate()
    {
        let clock = time.split('T').nth(1).unwrap_or(time);
        let marker = if now_index == Some(i) { NOW_MARKER } else { "" };
        out.push_str(&format!("{clock}  {temperature:>3.0} C  {marker}\n"));
    }
    out
}

/// Render the daily grid of max/min temperatures
#[must_use]
pub fn render_daily(daily: &DailyForecast) -> String {
    let mut out = String::from("Weekly Forecast\n");
    for (i, date) in daily.time.iter().enumerate() {
        let max = daily.temperature_max.get(i).copied().unwrap_or_default();
        let min = daily.temperature_min.get(i).copied().unwrap_or_default();
        out.push_str(&format!("{date}  max {max:.0} C  min {min:.0} C\n"));
    }
    out
}

/// Render the suggestion dropdown for the current session
///
/// Empty when the dropdown is dismissed or has nothing to show yet.
#[must_use]
pub fn render_suggestions(session: &SearchSession) -> String {
    if !session.is_open {
        return String::new();
    }
    if session.is_loading() {
        return String::from("Loading suggestions...\n");
    }
    if session.phase != SuggestionPhase::Open {
        return String::new();
    }
    if session.suggestions.is_empty() {
        return String::from("No matches\n");
    }

    let mut out = String::new();
    for (i, place) in session.suggestions.iter().enumerate() {
        let region = place.region_line();
        if region.is_empty() {
            out.push_str(&format!("{}. {}\n", i + 1, place.name));
        } else {
            out.push_str(&format!("{}. {} ({})\n", i + 1, place.name, region));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Place;

    fn hourly_day() -> HourlyForecast {
        HourlyForecast {
            time: (0..24).map(|h| format!("2024-05-01T{h:02}:00")).collect(),
            temperature: (0..24).map(|h| h as f32).collect(),
            humidity: vec![60; 24],
            wind_speed: vec![10.0; 24],
            weather_code: vec![2; 24],
            visibility: vec![24140.0; 24],
        }
    }

    #[test]
    fn test_hourly_marks_exactly_the_current_entry() {
        let rendered = render_hourly(&hourly_day(), 5);
        let marked: Vec<usize> = rendered
            .lines()
            .skip(1)
            .enumerate()
            .filter(|(_, line)| line.contains("<- now"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(marked, vec![5]);
    }

    #[test]
    fn test_hourly_without_matching_hour_marks_nothing() {
        let mut hourly = hourly_day();
        hourly.time = (0..24).map(|_| "2024-05-01".to_string()).collect();
        let rendered = render_hourly(&hourly, 5);
        assert!(!rendered.contains("<- now"));
    }

    #[test]
    fn test_app_idle_and_loading_states() {
        let mut state = AppState::default();
        assert_eq!(render_app(&state, 0), IDLE_MESSAGE);

        state.is_loading = true;
        assert_eq!(render_app(&state, 0), LOADING_MESSAGE);
    }

    #[test]
    fn test_current_header_with_and_without_country() {
        let current = CurrentConditions {
            temperature: 18.3,
            humidity: 55,
            wind_speed: 12.5,
            weather_code: 2,
        };

        let with_country = Location::with_country("Paris", "France");
        let rendered = render_current(Some(&with_country), &current);
        assert!(rendered.contains("Paris, France"));
        assert!(rendered.contains("Temp: 18.3 C"));

        let name_only = Location::new("Paris");
        let rendered = render_current(Some(&name_only), &current);
        assert!(rendered.contains("Paris\n"));
        assert!(!rendered.contains("Paris,"));
    }

    #[test]
    fn test_daily_grid() {
        let daily = DailyForecast {
            time: vec!["2024-05-01".into(), "2024-05-02".into()],
            weather_code: vec![2, 61],
            temperature_max: vec![19.2, 16.8],
            temperature_min: vec![9.4, 10.2],
            wind_speed_max: vec![18.0, 22.4],
            wind_speed_min: vec![4.1, 6.0],
        };
        let rendered = render_daily(&daily);
        assert!(rendered.contains("2024-05-01  max 19 C  min 9 C"));
        assert!(rendered.contains("2024-05-02  max 17 C  min 10 C"));
    }

    #[test]
    fn test_suggestions_rendering() {
        let mut session = SearchSession {
            query: "paris".to_string(),
            suggestions: Vec::new(),
            is_open: false,
            phase: SuggestionPhase::Closed,
        };
        assert!(render_suggestions(&session).is_empty());

        // Reopened by refocus with nothing fetched yet: nothing to show
        session.is_open = true;
        assert!(render_suggestions(&session).is_empty());

        session.phase = SuggestionPhase::Querying;
        assert!(render_suggestions(&session).contains("Loading"));

        session.phase = SuggestionPhase::Open;
        assert_eq!(render_suggestions(&session), "No matches\n");

        session.suggestions = vec![Place {
            name: "Paris".to_string(),
            country: Some("France".to_string()),
            admin1: Some("Ile-de-France".to_string()),
            latitude: 48.85,
            longitude: 2.35,
        }];
        assert_eq!(render_suggestions(&session), "1. Paris (Ile-de-France, France)\n");
    }
}
