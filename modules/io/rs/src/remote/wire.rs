use readcov_core_rs::loc::IntervalOp;
use readcov_core_rs::source::{ApiError, Cursor, Page, ReadAlignment, SourceLocus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReadsRequest<'a> {
    pub readset_ids: &'a [String],
    pub sequence_name: &'a str,
    pub sequence_start: u64,
    pub sequence_end: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<&'a str>,
}

impl<'a> SearchReadsRequest<'a> {
    pub fn new(readset_ids: &'a [String], locus: &'a SourceLocus, cursor: Option<&'a Cursor>) -> Self {
        Self {
            readset_ids,
            sequence_name: locus.contig(),
            sequence_start: locus.interval().start(),
            sequence_end: locus.interval().end(),
            page_token: cursor.map(Cursor::as_str),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReadsResponse {
    #[serde(default)]
    pub reads: Vec<WireRead>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRead {
    #[serde(deserialize_with = "int64")]
    pub position: u64,
    #[serde(default)]
    pub aligned_bases: String,
}

// 64-bit integers may arrive either as JSON numbers or as decimal strings
fn int64<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(u64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(x) => Ok(x),
        Int64::Text(x) => x.parse().map_err(serde::de::Error::custom),
    }
}

impl From<SearchReadsResponse> for Page {
    fn from(response: SearchReadsResponse) -> Self {
        let reads = response
            .reads
            .into_iter()
            .map(|read| ReadAlignment::new(read.position, read.aligned_bases.len() as u64))
            .collect();
        Page::new(reads, response.next_page_token.map(Cursor::new))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Turn an upstream response into a page or an error.
///
/// The body must be JSON whatever the status, otherwise the response is malformed. 404 and 400 are
/// then classified by status alone. Any other non-success status is an upstream error that carries
/// the message of the `{"error": {"code", "message"}}` envelope when the body has one.
pub fn classify(status: u16, body: &str, url: &str) -> Result<Page, ApiError> {
    let content: serde_json::Value = serde_json::from_str(body)
        .map_err(|err| ApiError::MalformedResponse(format!("{url} (status {status}): {err}")))?;

    match status {
        404 => Err(ApiError::NotFound(url.to_string())),
        400 => Err(ApiError::BadRequest(url.to_string())),
        200..=299 => serde_json::from_value::<SearchReadsResponse>(content)
            .map(Page::from)
            .map_err(|err| ApiError::MalformedResponse(err.to_string())),
        _ => {
            let message = match serde_json::from_value::<ErrorEnvelope>(content) {
                Ok(ErrorEnvelope { error }) => {
                    let code = error
                        .code
                        .map_or_else(|| "unknown".to_string(), |x| x.to_string());
                    log::error!(
                        "Error Code: {} Message: {}",
                        code,
                        error.message.as_deref().unwrap_or("")
                    );
                    error.message
                }
                Err(_) => {
                    log::error!("Upstream returned status {status} without an error description");
                    None
                }
            };
            Err(ApiError::Upstream {
                status: Some(status),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readcov_core_rs::source::ApiErrorKind;

    const URL: &str = "http://localhost/reads/search";

    #[test]
    fn test_request_body() {
        let locus = SourceLocus::try_from(("chr17".to_string(), 41196312, 41277500)).unwrap();
        let ids = vec!["CJDmkYn8ChCh4IH4hOf4gacB".to_string()];

        let first = serde_json::to_value(SearchReadsRequest::new(&ids, &locus, None)).unwrap();
        assert_eq!(
            first,
            serde_json::json!({
                "readsetIds": ["CJDmkYn8ChCh4IH4hOf4gacB"],
                "sequenceName": "chr17",
                "sequenceStart": 41196312,
                "sequenceEnd": 41277500
            })
        );

        let cursor = Cursor::from("token");
        let next = serde_json::to_value(SearchReadsRequest::new(&ids, &locus, Some(&cursor))).unwrap();
        assert_eq!(next["pageToken"], "token");
    }

    #[test]
    fn test_success() {
        let body = r#"{
            "reads": [
                {"position": 10, "alignedBases": "ACGT", "name": "ignored"},
                {"position": "12", "alignedBases": ""}
            ],
            "nextPageToken": "abc"
        }"#;
        let page = classify(200, body, URL).unwrap();
        assert_eq!(
            page.reads(),
            &vec![ReadAlignment::new(10, 4), ReadAlignment::new(12, 0)]
        );
        assert_eq!(page.next_cursor(), &Some(Cursor::from("abc")));

        // Missing fields mean an empty last page
        let page = classify(200, "{}", URL).unwrap();
        assert!(page.reads().is_empty());
        assert!(page.is_last());
    }

    #[test]
    fn test_errors() {
        let kind = |status, body| classify(status, body, URL).unwrap_err().kind();

        assert_eq!(kind(404, "{}"), ApiErrorKind::NotFound);
        assert_eq!(kind(400, r#"{"error": {"code": 400}}"#), ApiErrorKind::BadRequest);
        assert_eq!(kind(200, "<html>"), ApiErrorKind::MalformedResponse);
        assert_eq!(kind(200, r#"{"reads": 1}"#), ApiErrorKind::MalformedResponse);
        assert_eq!(kind(503, r#"{"status": "unavailable"}"#), ApiErrorKind::UpstreamError);

        let err = classify(500, r#"{"error": {"code": 500, "message": "Backend error"}}"#, URL);
        assert_eq!(
            err.unwrap_err(),
            ApiError::Upstream {
                status: Some(500),
                message: Some("Backend error".to_string())
            }
        );

        let err = classify(403, r#""forbidden""#, URL);
        assert_eq!(
            err.unwrap_err(),
            ApiError::Upstream {
                status: Some(403),
                message: None
            }
        );
    }

    #[test]
    fn test_non_json_body_is_malformed_for_any_status() {
        for status in [200, 400, 404, 500, 503] {
            let err = classify(status, "<html>Bad Gateway</html>", URL).unwrap_err();
            assert_eq!(err.kind(), ApiErrorKind::MalformedResponse, "status {status}");
        }
        assert_eq!(
            classify(404, "", URL).unwrap_err().kind(),
            ApiErrorKind::MalformedResponse
        );
    }
}
