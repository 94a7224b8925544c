use url::Url;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

pub fn google_search_url(query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(GOOGLE_SEARCH_URL, &[("q", query)])
}

pub fn youtube_search_url(query: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(YOUTUBE_SEARCH_URL, &[("search_query", query)])
}

fn open_in_browser(url: Result<Url, url::ParseError>) -> Result<(), String> {
    let url = url.map_err(|e| e.to_string())?;
    open::that(url.as_str()).map_err(|e| e.to_string())
}

pub fn search_google(query: Option<&str>) -> String {
    let Some(query) = query else {
        return "No search query provided.".to_string();
    };
    match open_in_browser(google_search_url(query)) {
        Ok(()) => format!("Searching \"{}\" on Google", query),
        Err(e) => {
            log::warn!("Failed to open browser for search: {}", e);
            "Could not open the browser.".to_string()
        }
    }
}

pub fn youtube_player(query: Option<&str>) -> String {
    let Some(query) = query else {
        return "No content specified for YouTube playback.".to_string();
    };
    match open_in_browser(youtube_search_url(query)) {
        Ok(()) => format!("Playing \"{}\" on YouTube", query),
        Err(e) => {
            log::warn!("Failed to open browser for YouTube: {}", e);
            "Could not open the browser.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_urls_are_encoded() {
        assert_eq!(
            google_search_url("rust & tokio").unwrap().as_str(),
            "https://www.google.com/search?q=rust+%26+tokio"
        );
        assert_eq!(
            youtube_search_url("despacito").unwrap().as_str(),
            "https://www.youtube.com/results?search_query=despacito"
        );
    }

    #[test]
    fn test_missing_query_never_opens_anything() {
        assert_eq!(search_google(None), "No search query provided.");
        assert_eq!(youtube_player(None), "No content specified for YouTube playback.");
    }
}
