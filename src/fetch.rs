//! Wikipedia page-summary lookup and image download.
//!
//! Two blocking requests per author: the page summary for an image URL, then
//! the image itself. Errors bubble up as `anyhow` and the run loop turns them
//! into a per-author failure.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Write;
use std::time::Instant;

/// Sent on every request; Wikimedia rejects anonymous clients.
pub const USER_AGENT: &str = "quote-avatar-fetcher/1.0";

/// Where author portraits come from.
pub trait ImageSource {
    /// Resolve an article title to an image URL, `None` when the article has
    /// no image.
    fn image_url(&self, title: &str) -> Result<Option<String>>;

    /// Stream the image at `url` into `sink`, returning the byte count.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;
}

#[derive(Debug, Default, Deserialize)]
struct PageSummary {
    #[serde(default)]
    thumbnail: Option<SummaryImage>,
    #[serde(default)]
    originalimage: Option<SummaryImage>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryImage {
    #[serde(default)]
    source: Option<String>,
}

impl PageSummary {
    /// Prefer the thumbnail, fall back to the original image.
    fn image_url(self) -> Option<String> {
        let source = |image: Option<SummaryImage>| {
            image
                .and_then(|image| image.source)
                .filter(|source| !source.is_empty())
        };
        source(self.thumbnail).or_else(|| source(self.originalimage))
    }
}

/// Extract the preferred image URL from a page-summary JSON body.
pub fn summary_image_url(body: &[u8]) -> Result<Option<String>> {
    let summary: PageSummary =
        serde_json::from_slice(body).context("parse page summary JSON")?;
    Ok(summary.image_url())
}

/// Page-summary URL for an article title.
pub fn summary_url(api_base: &str, title: &str) -> String {
    format!(
        "{}/page/summary/{}",
        api_base.trim_end_matches('/'),
        urlencoding::encode(title)
    )
}

/// `ImageSource` backed by the Wikipedia REST API.
pub struct WikipediaClient {
    agent: ureq::Agent,
    api_base: String,
    user_agent: String,
}

impl WikipediaClient {
    pub fn new(api_base: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into(),
            user_agent: user_agent.into(),
        }
    }

    fn get(&self, url: &str) -> Result<ureq::http::Response<ureq::Body>> {
        self.agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .with_context(|| format!("GET {url}"))
    }
}

impl ImageSource for WikipediaClient {
    fn image_url(&self, title: &str) -> Result<Option<String>> {
        let url = summary_url(&self.api_base, title);
        let start = Instant::now();
        let mut response = self.get(&url)?;
        let body = response
            .body_mut()
            .read_to_vec()
            .with_context(|| format!("read page summary for {title}"))?;
        tracing::debug!(
            title,
            elapsed_ms = start.elapsed().as_millis(),
            body_bytes = body.len(),
            "page summary fetched"
        );
        summary_image_url(&body).with_context(|| format!("page summary for {title}"))
    }

    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        let start = Instant::now();
        let mut response = self.get(url)?;
        let mut reader = response.body_mut().as_reader();
        let bytes = std::io::copy(&mut reader, sink).with_context(|| format!("download {url}"))?;
        tracing::debug!(
            url,
            elapsed_ms = start.elapsed().as_millis(),
            bytes,
            "image downloaded"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    struct Canned {
        status: &'static str,
        content_type: &'static str,
        body: Vec<u8>,
    }

    /// Serve `responses` in order, one connection each, returning the request
    /// heads that were received.
    fn serve(listener: TcpListener, responses: Vec<Canned>) -> JoinHandle<Vec<String>> {
        thread::spawn(move || {
            let mut heads = Vec::new();
            for canned in responses {
                let (mut stream, _) = listener.accept().expect("accept");
                let mut head = String::new();
                {
                    let mut reader = BufReader::new(&stream);
                    loop {
                        let mut line = String::new();
                        let read = reader.read_line(&mut line).expect("read request line");
                        if read == 0 || line == "\r\n" {
                            break;
                        }
                        head.push_str(&line);
                    }
                }
                let preamble = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    canned.status,
                    canned.content_type,
                    canned.body.len()
                );
                stream.write_all(preamble.as_bytes()).expect("write head");
                stream.write_all(&canned.body).expect("write body");
                heads.push(head);
            }
            heads
        })
    }

    fn local_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));
        (listener, base)
    }

    fn sends_user_agent(head: &str) -> bool {
        head.to_ascii_lowercase()
            .lines()
            .any(|line| line == format!("user-agent: {USER_AGENT}"))
    }

    #[test]
    fn client_looks_up_and_downloads_with_user_agent() {
        let (listener, base) = local_listener();
        let summary = format!(r#"{{"title": "Rumi", "thumbnail": {{"source": "{base}/thumb/rumi.jpg"}}}}"#);
        let server = serve(
            listener,
            vec![
                Canned {
                    status: "200 OK",
                    content_type: "application/json",
                    body: summary.into_bytes(),
                },
                Canned {
                    status: "200 OK",
                    content_type: "image/jpeg",
                    body: b"jpeg bytes".to_vec(),
                },
            ],
        );
        let client = WikipediaClient::new(base.clone(), USER_AGENT);

        let url = client.image_url("Rumi").expect("lookup").expect("image url");
        assert_eq!(url, format!("{base}/thumb/rumi.jpg"));
        let mut image = Vec::new();
        let bytes = client.download(&url, &mut image).expect("download");
        assert_eq!(bytes, 10);
        assert_eq!(image, b"jpeg bytes");

        let heads = server.join().expect("server thread");
        assert_eq!(heads.len(), 2);
        assert!(heads[0].starts_with("GET /page/summary/Rumi HTTP/1.1"), "{}", heads[0]);
        assert!(heads[1].starts_with("GET /thumb/rumi.jpg HTTP/1.1"), "{}", heads[1]);
        for head in &heads {
            assert!(sends_user_agent(head), "{head}");
        }
    }

    #[test]
    fn client_treats_error_status_as_failure() {
        let (listener, base) = local_listener();
        let server = serve(
            listener,
            vec![Canned {
                status: "404 Not Found",
                content_type: "application/problem+json",
                body: br#"{"type": "not_found"}"#.to_vec(),
            }],
        );
        let client = WikipediaClient::new(base, USER_AGENT);

        assert!(client.image_url("No_Such_Article").is_err());
        let heads = server.join().expect("server thread");
        assert!(sends_user_agent(&heads[0]), "{}", heads[0]);
    }

    #[test]
    fn thumbnail_is_preferred() {
        let body = br#"{
            "title": "Alan Watts",
            "thumbnail": {"source": "https://upload.example/thumb.jpg", "width": 320},
            "originalimage": {"source": "https://upload.example/full.jpg"}
        }"#;
        assert_eq!(
            summary_image_url(body).unwrap().as_deref(),
            Some("https://upload.example/thumb.jpg")
        );
    }

    #[test]
    fn original_image_is_the_fallback() {
        let body = br#"{"originalimage": {"source": "https://upload.example/full.jpg"}}"#;
        assert_eq!(
            summary_image_url(body).unwrap().as_deref(),
            Some("https://upload.example/full.jpg")
        );
    }

    #[test]
    fn empty_thumbnail_source_falls_back() {
        let body = br#"{
            "thumbnail": {"source": ""},
            "originalimage": {"source": "https://upload.example/full.jpg"}
        }"#;
        assert_eq!(
            summary_image_url(body).unwrap().as_deref(),
            Some("https://upload.example/full.jpg")
        );
    }

    #[test]
    fn summary_without_images_has_no_url() {
        let body = br#"{"title": "Bible", "extract": "..."}"#;
        assert_eq!(summary_image_url(body).unwrap(), None);
        assert_eq!(summary_image_url(br#"{"thumbnail": {}}"#).unwrap(), None);
    }

    #[test]
    fn malformed_summary_is_an_error() {
        assert!(summary_image_url(b"<html>").is_err());
    }

    #[test]
    fn summary_url_escapes_titles() {
        assert_eq!(
            summary_url("https://en.wikipedia.org/api/rest_v1/", "Terence_(playwright)"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/Terence_%28playwright%29"
        );
        assert_eq!(
            summary_url("http://localhost", "Nicolás_Gómez_Dávila"),
            "http://localhost/page/summary/Nicol%C3%A1s_G%C3%B3mez_D%C3%A1vila"
        );
    }
}
