//! HTTP transport for PFL queries.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use super::{Mode, Query, Source};

/// What: Transport failure while talking to the PFL server.
#[derive(Debug)]
pub enum FetchError {
    /// The request URL could not be built from the base URL.
    Url(String),
    /// Client construction, connection or body decoding failed.
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Status {
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Request URL.
        url: String,
    },
    /// The server answered with an empty body.
    Empty,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(msg) => write!(f, "invalid request URL: {msg}"),
            Self::Http(err) => write!(f, "{err}"),
            Self::Status { status, url } => write!(f, "{url} returned HTTP {status}"),
            Self::Empty => write!(f, "got no data from the server"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Url(_) | Self::Status { .. } | Self::Empty => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// What: Fully described request for one PFL query.
///
/// Details:
/// - `url` already contains the encoded query string; it is also exposed to
///   templates as `req_url` and used as the link for listings that have none.
/// - `form` is set only for the HTML file search, which is a POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PflRequest {
    /// Absolute request URL.
    pub url: String,
    /// Form fields for POST requests.
    pub form: Option<Vec<(&'static str, String)>>,
}

impl PflRequest {
    /// What: Build the request for a source/mode/query combination.
    ///
    /// Inputs:
    /// - `base_url`: Server root, e.g. `http://www.portagefilelist.de`.
    /// - `source`, `mode`, `query`: What to ask.
    ///
    /// Output:
    /// - The request, or `FetchError::Url` when `base_url` is not a URL.
    ///
    /// # Errors
    /// - Returns `FetchError::Url` when the base URL cannot be parsed or joined.
    pub fn build(
        base_url: &str,
        source: Source,
        mode: Mode,
        query: &Query,
    ) -> Result<Self, FetchError> {
        let (endpoint, pairs, flag, form) = match (source, query) {
            (Source::PflHtml, Query::File { filename }) => {
                let mut form = vec![("file", filename.clone())];
                if mode == Mode::Uniq {
                    form.push(("unique_packages", "on".to_string()));
                }
                ("site/query/file/", Vec::new(), Some("do"), Some(form))
            }
            (Source::PflHtml, Query::Package { category, package }) => (
                "site/query/listPackageVersions/",
                vec![("category", category.clone()), ("package", package.clone())],
                Some("do"),
                None,
            ),
            (
                Source::PflHtml,
                Query::PackageVersion {
                    category,
                    package,
                    version,
                },
            ) => (
                "site/query/listPackageFiles/",
                vec![
                    ("category", category.clone()),
                    ("package", package.clone()),
                    ("version", version.clone()),
                ],
                Some("do"),
                None,
            ),
            (Source::PflJson, Query::File { filename }) => (
                "site/query/robotFile",
                vec![("file", filename.clone())],
                (mode == Mode::Uniq).then_some("unique_packages"),
                None,
            ),
            (Source::PflJson, Query::Package { category, package }) => (
                "site/query/robotListPackageVersions",
                vec![("category", category.clone()), ("package", package.clone())],
                None,
                None,
            ),
            (
                Source::PflJson,
                Query::PackageVersion {
                    category,
                    package,
                    version,
                },
            ) => (
                "site/query/robotListPackageFiles",
                vec![
                    ("category", category.clone()),
                    ("package", package.clone()),
                    ("version", version.clone()),
                ],
                None,
                None,
            ),
        };

        let root = format!("{}/", base_url.trim_end_matches('/'));
        let mut url = Url::parse(&root)
            .and_then(|u| u.join(endpoint))
            .map_err(|e| FetchError::Url(format!("{base_url}: {e}")))?;
        if !pairs.is_empty() || flag.is_some() {
            let mut qp = url.query_pairs_mut();
            for (k, v) in &pairs {
                qp.append_pair(k, v);
            }
            if let Some(flag) = flag {
                qp.append_key_only(flag);
            }
        }
        Ok(Self {
            url: url.to_string(),
            form,
        })
    }
}

/// What: Build the shared HTTP client.
///
/// Output:
/// - Client with an `efile/<version>` user agent, gzip support and a 30s timeout.
///
/// # Errors
/// - Returns `FetchError::Http` if the TLS backend cannot be initialised.
pub fn http_client() -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("efile/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?)
}

/// What: Send a PFL request and return the decoded body.
///
/// Inputs:
/// - `client`: Shared HTTP client.
/// - `request`: Prepared request.
///
/// Output:
/// - Response body as text.
///
/// # Errors
/// - `FetchError::Http` on connection/decoding failures.
/// - `FetchError::Status` on non-success HTTP status.
/// - `FetchError::Empty` when the body is empty.
pub async fn fetch(client: &reqwest::Client, request: &PflRequest) -> Result<String, FetchError> {
    tracing::info!(url = %request.url, post = request.form.is_some(), "sending request to the server");
    let builder = match &request.form {
        Some(form) => client.post(&request.url).form(form),
        None => client.get(&request.url),
    };
    let resp = builder.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: request.url.clone(),
        });
    }
    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Err(FetchError::Empty);
    }
    tracing::info!(bytes = body.len(), "result retrieved");
    Ok(body)
}

/// What: Write the raw response body next to the logs for debugging.
///
/// Inputs:
/// - `dir`: Target directory (created if missing).
/// - `source`: Source, used to pick the file extension.
/// - `body`: Raw response.
///
/// Output:
/// - Path of the written file.
///
/// # Errors
/// - Propagates I/O errors from directory creation or writing.
pub fn dump_response(dir: &Path, source: Source, body: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("last_response.{}", source.extension()));
    std::fs::write(&path, body)?;
    tracing::debug!(path = %path.display(), "raw response saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: HTML file search posts the filename with the unique flag.
    ///
    /// - Input: `pfl_html`, `uniq`, filename `libfoo.so`
    /// - Output: URL ends with `?do`; form carries `file` and `unique_packages`
    fn html_file_search_is_post() {
        let q = Query::File {
            filename: "libfoo.so".into(),
        };
        let req = PflRequest::build("http://pfl.test", Source::PflHtml, Mode::Uniq, &q)
            .expect("request");
        assert_eq!(req.url, "http://pfl.test/site/query/file/?do");
        let form = req.form.expect("form");
        assert!(form.contains(&("file", "libfoo.so".to_string())));
        assert!(form.contains(&("unique_packages", "on".to_string())));

        let all = PflRequest::build("http://pfl.test/", Source::PflHtml, Mode::AllVer, &q)
            .expect("request");
        assert_eq!(all.form.expect("form").len(), 1);
    }

    #[test]
    /// What: JSON endpoints encode parameters into the query string.
    fn json_requests_encode_query() {
        let q = Query::PackageVersion {
            category: "dev-lang".into(),
            package: "foo".into(),
            version: "1.0".into(),
        };
        let req = PflRequest::build("http://pfl.test", Source::PflJson, Mode::CpvToF, &q)
            .expect("request");
        assert_eq!(
            req.url,
            "http://pfl.test/site/query/robotListPackageFiles?category=dev-lang&package=foo&version=1.0"
        );
        assert!(req.form.is_none());

        let file = Query::File {
            filename: "a b".into(),
        };
        let req = PflRequest::build("http://pfl.test", Source::PflJson, Mode::Uniq, &file)
            .expect("request");
        assert_eq!(
            req.url,
            "http://pfl.test/site/query/robotFile?file=a+b&unique_packages"
        );
    }

    #[test]
    /// What: A malformed base URL is reported instead of panicking.
    fn bad_base_url_is_error() {
        let q = Query::File {
            filename: "x".into(),
        };
        assert!(PflRequest::build("not a url", Source::PflJson, Mode::Uniq, &q).is_err());
    }
}
