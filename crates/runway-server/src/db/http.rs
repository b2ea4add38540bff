use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;

use runway_core::{CellValue, SheetKind, SheetRange};

use super::backend::{BackendError, SheetBackend};

/// Spreadsheet REST client (Sheets v4 request shapes).
///
/// Authentication is a bearer token obtained elsewhere.
pub struct HttpSheets {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<CellValue>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: &'a [Vec<CellValue>],
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

impl HttpSheets {
    pub fn new(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }

    /// `{base}/{spreadsheet}{suffix}/{tail...}` with each segment percent-encoded
    fn endpoint(&self, suffix: &str, tail: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {e}", self.api_base)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.api_base.clone()))?;
            segments.pop_if_empty();
            segments.push(&format!("{}{suffix}", self.spreadsheet_id));
            segments.extend(tail);
        }
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SheetBackend for HttpSheets {
    async fn read_range(&self, range: &SheetRange) -> Result<Vec<Vec<CellValue>>, BackendError> {
        let a1 = range.to_a1()?;
        let url = self.endpoint("", &["values", &a1])?;
        tracing::debug!(range = %a1, "reading range");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")])
            .send()
            .await?;
        let body: ValueRange = Self::check(response).await?.json().await?;
        Ok(body.values)
    }

    async fn write_range(
        &self,
        range: &SheetRange,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), BackendError> {
        let a1 = range.to_a1()?;
        let url = self.endpoint("", &["values", &a1])?;
        tracing::debug!(range = %a1, rows = values.len(), "writing range");

        let body = ValueRangeBody {
            range: &a1,
            major_dimension: "ROWS",
            values: &values,
        };
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn append_row(
        &self,
        sheet: SheetKind,
        values: Vec<CellValue>,
    ) -> Result<(), BackendError> {
        let target = format!("{}:append", sheet.sheet_name());
        let url = self.endpoint("", &["values", &target])?;
        tracing::debug!(sheet = %sheet, cells = values.len(), "appending row");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [values] }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn sheet_id(&self, sheet: SheetKind) -> Result<i64, BackendError> {
        let url = self.endpoint("", &[])?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await?;
        let body: Spreadsheet = Self::check(response).await?.json().await?;

        body.sheets
            .into_iter()
            .map(|entry| entry.properties)
            .find(|props| props.title == sheet.sheet_name())
            .map(|props| props.sheet_id)
            .ok_or_else(|| BackendError::UnknownSheet(sheet.sheet_name().to_string()))
    }

    async fn delete_rows(
        &self,
        sheet_id: i64,
        start: usize,
        end: usize,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(":batchUpdate", &[])?;
        tracing::debug!(sheet_id, start, end, "deleting rows");

        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": start,
                        "endIndex": end,
                    }
                }
            }]
        });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Bytes,
        http::{HeaderMap, Method, StatusCode, Uri},
        Json, Router,
    };
    use runway_core::CellRange;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Captured {
        method: Method,
        uri: Uri,
        auth: Option<String>,
        body: Bytes,
    }

    impl Captured {
        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    /// Serve `reply` with `status` for every request and record what arrives
    async fn stub(status: StatusCode, reply: Value) -> (HttpSheets, Arc<Mutex<Vec<Captured>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
                let log = log.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    log.lock().unwrap().push(Captured {
                        method,
                        uri,
                        auth,
                        body,
                    });
                    (status, Json(reply))
                }
            },
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let base = format!("http://{addr}/v4/spreadsheets");
        (HttpSheets::new(base, "abc123", "token"), seen)
    }

    fn last(seen: &Arc<Mutex<Vec<Captured>>>) -> Captured {
        seen.lock().unwrap().last().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let (sheets, _) = stub(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;

        let err = sheets
            .read_range(&SheetRange::sheet(SheetKind::Inputs))
            .await
            .unwrap_err();
        match err {
            BackendError::Status { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let err = sheets.delete_rows(1, 1, 2).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_read_requests_unformatted_values() {
        let reply = json!({ "range": "Inputs", "values": [["name"], ["Retail", 7]] });
        let (sheets, seen) = stub(StatusCode::OK, reply).await;

        let rows = sheets
            .read_range(&SheetRange::sheet(SheetKind::Inputs))
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![
                vec![CellValue::from("name")],
                vec![CellValue::from("Retail"), CellValue::Number(7.0)],
            ]
        );

        let request = last(&seen);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/v4/spreadsheets/abc123/values/Inputs");
        assert_eq!(request.uri.query(), Some("valueRenderOption=UNFORMATTED_VALUE"));
        assert_eq!(request.auth.as_deref(), Some("Bearer token"));
    }

    #[tokio::test]
    async fn test_append_sends_raw_row() {
        let (sheets, seen) = stub(StatusCode::OK, json!({})).await;

        sheets
            .append_row(
                SheetKind::Models,
                vec![CellValue::from("Base"), CellValue::Number(10.0)],
            )
            .await
            .unwrap();

        let request = last(&seen);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.uri.path(), "/v4/spreadsheets/abc123/values/Models:append");
        let query = request.uri.query().unwrap_or_default();
        assert!(query.contains("valueInputOption=RAW"));
        assert!(query.contains("insertDataOption=INSERT_ROWS"));
        assert_eq!(request.json(), json!({ "values": [["Base", 10.0]] }));
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one_row() {
        let (sheets, seen) = stub(StatusCode::OK, json!({})).await;

        sheets.delete_rows(1001, 3, 4).await.unwrap();

        let request = last(&seen);
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.uri.path(), "/v4/spreadsheets/abc123:batchUpdate");
        assert_eq!(
            request.json()["requests"][0]["deleteDimension"]["range"],
            json!({
                "sheetId": 1001,
                "dimension": "ROWS",
                "startIndex": 3,
                "endIndex": 4,
            })
        );
    }

    fn client() -> HttpSheets {
        HttpSheets::new("https://sheets.example.com/v4/spreadsheets/", "abc123", "token")
    }

    #[test]
    fn test_value_endpoints() {
        let sheets = client();
        let a1 = SheetRange::cells(SheetKind::Inputs, CellRange::row_span(2, 9, 2))
            .to_a1()
            .unwrap();
        let url = sheets.endpoint("", &["values", &a1]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/abc123/values/Inputs!J3:K3"
        );

        let url = sheets.endpoint("", &["values", "Models:append"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/abc123/values/Models:append"
        );
    }

    #[test]
    fn test_batch_update_endpoint() {
        let url = client().endpoint(":batchUpdate", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.com/v4/spreadsheets/abc123:batchUpdate"
        );
    }

    #[test]
    fn test_value_range_without_values() {
        let body: ValueRange = serde_json::from_str(r#"{"range":"Curves!A1:Z1000"}"#).unwrap();
        assert!(body.values.is_empty());
    }
}
