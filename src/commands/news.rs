use serde::Deserialize;

use super::SkillContext;

const NEWS_URL: &str = "https://newsapi.org/v2/top-headlines";
const HEADLINE_COUNT: usize = 3;

#[derive(Deserialize)]
struct HeadlinesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
}

fn summarize(articles: Vec<Article>) -> Option<String> {
    let titles: Vec<String> = articles
        .into_iter()
        .filter_map(|a| a.title)
        .map(|t| t.trim().trim_end_matches('.').to_string())
        .filter(|t| !t.is_empty())
        .take(HEADLINE_COUNT)
        .collect();
    if titles.is_empty() {
        return None;
    }
    Some(format!("Here are the top headlines. {}.", titles.join(". ")))
}

async fn fetch_headlines(ctx: &SkillContext) -> Result<HeadlinesResponse, reqwest::Error> {
    ctx.http
        .get(NEWS_URL)
        .header("X-Api-Key", &ctx.news_api_key)
        .header("User-Agent", "assistly")
        .query(&[("sources", ctx.news_source.as_str()), ("language", "en")])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

pub async fn get_news(ctx: &SkillContext) -> String {
    if ctx.news_api_key.is_empty() {
        log::warn!(target: ctx.log.target(), "NEWS_API_KEY not found in environment variables");
    }

    match fetch_headlines(ctx).await {
        Ok(data) => summarize(data.articles).unwrap_or_else(|| "Could not fetch news.".to_string()),
        Err(e) => {
            log::warn!(target: ctx.log.target(), "News lookup failed: {}", e);
            "Could not fetch news.".to_string()
        }
    }
}
