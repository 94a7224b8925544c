use serde::Deserialize;

use super::SkillContext;

const IPINFO_URL: &str = "https://ipinfo.io/json";

#[derive(Deserialize)]
struct IpInfo {
    #[serde(default)]
    city: Option<String>,
}

/// City of the machine's public IP address, if the lookup service knows it.
pub async fn current_city(ctx: &SkillContext) -> Result<Option<String>, reqwest::Error> {
    let info: IpInfo = ctx
        .http
        .get(IPINFO_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(info.city.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()))
}

pub async fn get_location(ctx: &SkillContext) -> String {
    match current_city(ctx).await {
        Ok(Some(city)) => format!("You are currently in {}.", city),
        Ok(None) => "Could not fetch location data.".to_string(),
        Err(e) => {
            log::warn!(target: ctx.log.target(), "Location lookup failed: {}", e);
            "Could not fetch location data.".to_string()
        }
    }
}
