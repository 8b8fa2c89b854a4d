//! Record extraction from the PFL robot JSON API.

use serde::Deserialize;
use serde_json::Value;

use super::html::query_parts;
use super::{Mode, PLACEHOLDER_PATH, Query, Record};
use crate::error::EfileError;

/// Tag list that the server sends either as an array or as a single string.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum Tags {
    /// No value.
    #[default]
    None,
    /// A single comma-separated string.
    One(String),
    /// An array of tags.
    Many(Vec<String>),
}

impl Tags {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::One(s) => super::comma_split(&s),
            Self::Many(v) => v,
        }
    }
}

/// Error object of a failed robot query.
#[derive(Debug, Deserialize)]
struct ServerError {
    #[serde(default)]
    code: Value,
    #[serde(default)]
    message: Value,
}

/// One row of a robot query result.
#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(default)]
    category: String,
    #[serde(default)]
    package: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    file: String,
    #[serde(default, rename = "type")]
    file_types: Tags,
    #[serde(default)]
    archs: Tags,
    #[serde(default)]
    useflags: Tags,
}

/// Top-level robot response.
#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    error: Option<ServerError>,
    #[serde(default)]
    result: Option<Vec<JsonRecord>>,
}

/// What: JSON truthiness as the server uses it for error codes.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// What: Render a JSON scalar for an error message without quotes.
fn plain(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// What: Extract flat records from a robot JSON response.
///
/// Inputs:
/// - `body`: Raw JSON text.
/// - `mode`: Query mode deciding which fields come from the query.
/// - `query`: Resolved query.
///
/// Output:
/// - Records in response order; empty when `result` is missing or empty.
///
/// # Errors
/// - `EfileError::Parse` when the body is not valid JSON of the expected shape.
/// - `EfileError::Server` when the response carries an error object with a code.
pub fn parse_json(body: &str, mode: Mode, query: &Query) -> Result<Vec<Record>, EfileError> {
    let response: Response = serde_json::from_str(body).map_err(|e| EfileError::Parse {
        format: "json",
        message: e.to_string(),
    })?;
    if let Some(err) = response.error
        && is_truthy(&err.code)
    {
        return Err(EfileError::Server {
            code: plain(&err.code),
            message: plain(&err.message),
        });
    }

    let ((query_c, query_p), query_v) = query_parts(query);
    let records: Vec<Record> = response
        .result
        .unwrap_or_default()
        .into_iter()
        .map(|j| {
            let (category, package) = match mode {
                Mode::Uniq | Mode::AllVer => (j.category, j.package),
                Mode::CpvToF | Mode::CpToV => (query_c.clone(), query_p.clone()),
            };
            let version = match mode {
                Mode::Uniq => String::new(),
                Mode::AllVer | Mode::CpToV => j.version,
                Mode::CpvToF => query_v.clone(),
            };
            let path = if mode == Mode::CpToV {
                PLACEHOLDER_PATH.to_string()
            } else {
                format!("{}/{}", j.path.trim_end_matches('/'), j.file)
            };
            Record {
                category,
                package,
                version,
                path,
                file_types: j.file_types.into_vec(),
                architectures: j.archs.into_vec(),
                use_flags: j.useflags.into_vec(),
                cp_link: String::new(),
                version_link: String::new(),
            }
        })
        .collect();
    tracing::debug!(count = records.len(), "parsed json records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Robot file results join path and file and accept both tag shapes.
    ///
    /// - Input: Two rows, one with array tags and one with a string tag
    /// - Output: Two records with joined paths and split tags
    fn parses_file_results() {
        let body = r#"{"result":[
            {"category":"dev-lang","package":"foo","version":"1.0","path":"/usr/bin","file":"foo",
             "type":["obj"],"archs":["amd64","x86"],"useflags":["ssl"]},
            {"category":"dev-lang","package":"foo","version":"2.0.","path":"/usr/bin/","file":"foo",
             "archs":"amd64, arm64"}
        ]}"#;
        let q = Query::File {
            filename: "foo".into(),
        };
        let records = parse_json(body, Mode::AllVer, &q).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "/usr/bin/foo");
        assert_eq!(records[0].architectures, ["amd64", "x86"]);
        assert_eq!(records[1].path, "/usr/bin/foo");
        assert_eq!(records[1].version, "2.0.");
        assert_eq!(records[1].architectures, ["amd64", "arm64"]);
        assert!(records[1].file_types.is_empty());

        let uniq = parse_json(body, Mode::Uniq, &q).expect("parse");
        assert!(uniq.iter().all(|r| r.version.is_empty()));
    }

    #[test]
    /// What: A server error object with a code is fatal; a null code is not.
    fn server_error_is_reported() {
        let q = Query::File {
            filename: "x".into(),
        };
        let err = parse_json(r#"{"error":{"code":42,"message":"bad"}}"#, Mode::Uniq, &q)
            .expect_err("server error");
        assert!(err.to_string().contains("42: bad"));
        let ok = parse_json(r#"{"error":{"code":null},"result":[]}"#, Mode::Uniq, &q).expect("ok");
        assert!(ok.is_empty());
    }

    #[test]
    /// What: Garbage input is a parse error.
    fn invalid_json_is_parse_error() {
        let q = Query::File {
            filename: "x".into(),
        };
        assert!(matches!(
            parse_json("<html>", Mode::Uniq, &q),
            Err(EfileError::Parse { format: "json", .. })
        ));
    }

    #[test]
    /// What: Version listings take CP from the query.
    fn version_listing_from_query() {
        let q = Query::Package {
            category: "dev-lang".into(),
            package: "foo".into(),
        };
        let records = parse_json(r#"{"result":[{"version":"3.1"}]}"#, Mode::CpToV, &q).expect("parse");
        assert_eq!(records[0].category, "dev-lang");
        assert_eq!(records[0].version, "3.1");
        assert_eq!(records[0].path, PLACEHOLDER_PATH);
    }
}
