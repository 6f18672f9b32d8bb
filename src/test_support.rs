//! Fixtures shared by the pipeline and server tests.

use crate::config::{CategoryRule, Config, DEFAULT_CONFIG_YAML, SourceDescriptor};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Default configuration plus a `test` source whose front page is
/// `{server_uri}/front` and whose links resolve against `https://source.test/`.
pub fn fixture_config(server_uri: &str, language: &str) -> Config {
    let mut config = Config::from_yaml(DEFAULT_CONFIG_YAML).unwrap();
    config.translation.endpoint = format!("{server_uri}/translate");
    config.sources.push(SourceDescriptor {
        id: "test".to_string(),
        name: "Source Test".to_string(),
        country: String::new(),
        description: String::new(),
        url: format!("{server_uri}/front"),
        link_base: Some("https://source.test/".to_string()),
        language: language.to_string(),
        accept_language: "ja".to_string(),
        selectors: vec![".news_item".to_string()],
        blocklist: vec!["ログイン".to_string()],
        text_blocklist: vec![],
        delimiters: vec!["。".to_string()],
        categories: vec![CategoryRule {
            label: "economics".to_string(),
            keywords: vec!["株価".to_string()],
        }],
    });
    config.validate().unwrap();
    config
}

/// Six distinct `.news_item` anchors linking to `/s/1` … `/s/6`; the second
/// one mentions 株価.
pub fn headline_fixture() -> String {
    let anchors: String = ["A", "B 株価", "C", "D", "E", "F"]
        .iter()
        .enumerate()
        .map(|(i, label)| {
            format!(
                r#"<li><a class="news_item" href="/s/{}">Headline {label} (十五文字以上のテキスト)</a></li>"#,
                i + 1
            )
        })
        .collect();
    format!("<html><body><ul>{anchors}</ul></body></html>")
}

pub async fn mount_front(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/front"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}
