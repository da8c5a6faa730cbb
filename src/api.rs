// API client module: wire types for the RiskGo gateway and a small
// blocking HTTP client that posts one analysis request and decodes the
// scenario map it gets back.

use crate::config::Config;
use crate::error::{RiskError, RiskResult};
use reqwest::blocking::Client;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Option kind as typed by the operator. Anything other than CALL or PUT
/// is kept as `Unknown` so the caller can warn about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
    Unknown(String),
}

impl OptionKind {
    /// Upper-case the input and map it onto the closed set.
    pub fn from_input(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        match upper.as_str() {
            "CALL" => OptionKind::Call,
            "PUT" => OptionKind::Put,
            _ => OptionKind::Unknown(upper),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OptionKind::Call => "CALL",
            OptionKind::Put => "PUT",
            OptionKind::Unknown(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, OptionKind::Unknown(_))
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OptionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One option contract attached to the position.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OptionLeg {
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub strike: f64,
    /// Free-form date text, the gateway expects YYYY-MM-DD.
    pub expiry: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: String,
    /// Negative for a short position.
    pub quantity: f64,
    pub beta: f64,
    pub legs: Vec<OptionLeg>,
}

/// Body of `POST /api/analyze_portfolio`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub positions: Vec<Position>,
    pub scenario_range: Vec<f64>,
    pub volatility: f64,
}

/// Ticker -> scenario label -> metrics. Only the top level is decoded on
/// receipt; per-ticker records are decoded when the report is rendered.
pub type AnalysisResponse = BTreeMap<String, serde_json::Value>;

/// Wrap a single position into a request using the configured scenario grid.
pub fn build_request(config: &Config, position: Position, volatility: f64) -> AnalysisRequest {
    AnalysisRequest {
        positions: vec![position],
        scenario_range: config.scenario_range.clone(),
        volatility,
    }
}

/// Blocking client bound to the gateway's analysis endpoint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> RiskResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RiskError::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(ApiClient {
            client,
            endpoint: config.gateway_url.clone(),
        })
    }

    /// POST the request and decode the response map. Refusals, timeouts,
    /// error statuses and bad bodies all come back as `RiskError::Transport`.
    pub fn submit(&self, req: &AnalysisRequest) -> RiskResult<AnalysisResponse> {
        log::debug!(
            "posting {} position(s) to {}",
            req.positions.len(),
            self.endpoint
        );
        let res = self
            .client
            .post(&self.endpoint)
            .json(req)
            .send()
            .map_err(RiskError::transport)?;
        if !res.status().is_success() {
            let status = res.status();
            let txt = res.text().unwrap_or_default();
            return Err(RiskError::transport(format!("{} - {}", status, txt)));
        }
        let resp: AnalysisResponse = res.json().map_err(RiskError::transport)?;
        log::info!("gateway returned results for {} ticker(s)", resp.len());
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve exactly one HTTP response on an ephemeral port and return the
    /// endpoint URL plus a handle yielding the raw request body.
    fn one_shot_server(
        status: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(v) = lower.strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
            }
            let mut req_body = vec![0u8; content_length];
            reader.read_exact(&mut req_body).unwrap();
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            String::from_utf8(req_body).unwrap()
        });
        (format!("http://{}/api/analyze_portfolio", addr), handle)
    }

    fn client_for(url: String) -> ApiClient {
        let config = Config {
            gateway_url: url,
            timeout_secs: Some(5),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn sample_position() -> Position {
        Position {
            ticker: "AAPL".into(),
            quantity: 100.0,
            beta: 1.0,
            legs: vec![OptionLeg {
                kind: OptionKind::Call,
                strike: 180.0,
                expiry: "2026-06-19".into(),
            }],
        }
    }

    #[test]
    fn test_option_kind_case_folding() {
        assert_eq!(OptionKind::from_input("call"), OptionKind::Call);
        assert_eq!(OptionKind::from_input("Put"), OptionKind::Put);
        assert_eq!(
            OptionKind::from_input("straddle"),
            OptionKind::Unknown("STRADDLE".into())
        );
        assert!(!OptionKind::from_input("x").is_known());
    }

    #[test]
    fn test_build_request_has_one_position_and_fixed_grid() {
        let config = Config::default();
        let mut position = sample_position();
        position.quantity = -3.0;
        position.ticker = "ZZZ".into();
        let req = build_request(&config, position, 0.0);
        assert_eq!(req.positions.len(), 1);
        assert_eq!(req.scenario_range, vec![-0.10, -0.05, 0.0, 0.05, 0.10]);
        assert_eq!(req.volatility, 0.0);
    }

    #[test]
    fn test_request_wire_shape() {
        let mut position = sample_position();
        position.legs.push(OptionLeg {
            kind: OptionKind::Unknown("FOO".into()),
            strike: -1.0,
            expiry: "soon".into(),
        });
        let req = build_request(&Config::default(), position, 0.3);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "positions": [{
                    "ticker": "AAPL",
                    "quantity": 100.0,
                    "beta": 1.0,
                    "legs": [
                        {"type": "CALL", "strike": 180.0, "expiry": "2026-06-19"},
                        {"type": "FOO", "strike": -1.0, "expiry": "soon"}
                    ]
                }],
                "scenario_range": [-0.10, -0.05, 0.0, 0.05, 0.10],
                "volatility": 0.3
            })
        );
    }

    #[test]
    fn test_submit_decodes_response() {
        let (url, server) = one_shot_server(
            "200 OK",
            r#"{"AAPL": {"0.00": {"pnl": 1.5, "delta": 0.5, "gamma": 0.02, "theta": -0.1}},
                "MSFT": 7}"#,
        );
        let client = client_for(url);
        let req = build_request(&Config::default(), sample_position(), 0.3);
        let resp = client.submit(&req).unwrap();
        assert_eq!(resp.len(), 2);
        assert_eq!(resp["AAPL"]["0.00"]["pnl"], json!(1.5));

        let sent: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
        assert_eq!(sent["positions"][0]["legs"][0]["type"], json!("CALL"));
        assert_eq!(sent["volatility"], json!(0.3));
    }

    #[test]
    fn test_error_status_is_transport() {
        let (url, server) = one_shot_server("500 Internal Server Error", r#"{"error": "boom"}"#);
        let client = client_for(url);
        let req = build_request(&Config::default(), sample_position(), 0.3);
        let err = client.submit(&req).unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("500"));
        server.join().unwrap();
    }

    #[test]
    fn test_non_object_body_is_transport() {
        let (url, server) = one_shot_server("200 OK", "[1, 2, 3]");
        let client = client_for(url);
        let req = build_request(&Config::default(), sample_position(), 0.3);
        assert!(client.submit(&req).unwrap_err().is_transport());
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_gateway_is_transport() {
        // Bind then drop to get a port nobody is listening on.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = client_for(format!("http://127.0.0.1:{}/api/analyze_portfolio", port));
        let req = build_request(&Config::default(), sample_position(), 0.3);
        assert!(client.submit(&req).unwrap_err().is_transport());
    }
}
