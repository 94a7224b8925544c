use serde::Deserialize;

use super::location::current_city;
use super::SkillContext;

const WEATHER_URL: &str = "https://api.weatherapi.com/v1/current.json";

#[derive(Deserialize)]
struct WeatherResponse {
    current: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    condition: Condition,
    temp_c: f64,
    wind_kph: f64,
}

#[derive(Deserialize)]
struct Condition {
    text: String,
}

fn report(city: &str, weather: &CurrentWeather) -> String {
    format!(
        "Currently in {}, it's {} with a temperature of {} degrees Celsius and wind speed of {} kilometers per hour.",
        city,
        weather.condition.text.to_lowercase(),
        weather.temp_c,
        weather.wind_kph
    )
}

async fn fetch_current(ctx: &SkillContext, city: &str) -> Result<WeatherResponse, reqwest::Error> {
    ctx.http
        .get(WEATHER_URL)
        .query(&[("key", ctx.weather_api_key.as_str()), ("q", city)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

/// Current conditions for `location`, or for the IP-geolocated city when the
/// command named no place.
pub async fn get_weather(ctx: &SkillContext, location: Option<&str>) -> String {
    if ctx.weather_api_key.is_empty() {
        log::warn!(target: ctx.log.target(), "WEATHER_API_KEY not found in environment variables");
    }

    let city = match location {
        Some(city) => Some(city.to_string()),
        None => current_city(ctx).await.unwrap_or_else(|e| {
            log::warn!(target: ctx.log.target(), "Location lookup for weather failed: {}", e);
            None
        }),
    };
    let Some(city) = city else {
        return "Could not determine your location for weather report.".to_string();
    };

    match fetch_current(ctx, &city).await {
        Ok(data) => report(&city, &data.current),
        Err(e) => {
            log::warn!(target: ctx.log.target(), "Weather lookup for {} failed: {}", city, e);
            "Could not fetch weather data.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_wording() {
        let data: WeatherResponse = serde_json::from_str(
            r#"{"current": {"condition": {"text": "Partly cloudy"}, "temp_c": 28.5, "wind_kph": 11.2, "humidity": 70}}"#,
        )
        .unwrap();
        assert_eq!(
            report("Mumbai", &data.current),
            "Currently in Mumbai, it's partly cloudy with a temperature of 28.5 degrees Celsius and wind speed of 11.2 kilometers per hour."
        );
    }
}
