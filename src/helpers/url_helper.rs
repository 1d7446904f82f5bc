use reqwest::Url;

pub struct UrlHelper;

impl UrlHelper {
    pub fn is_valid_webhook_url(url: &str) -> bool {
        Url::parse(url)
            .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
            .unwrap_or(false)
    }
}
