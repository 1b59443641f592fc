//! Header pairs and header-size estimation.
//!
//! DevTools does not report header sizes. For HTTP/0.9-1.1 they are
//! estimated by rebuilding the literal header block; for newer protocols
//! (HPACK/QPACK compressed) there is no meaningful estimate and the size is
//! `-1`.

use crate::model::Headers;

use super::document::Header;

/// Expands a header map into `{name, value}` pairs, one per value.
pub fn header_pairs(headers: &Headers) -> Vec<Header> {
    headers
        .pairs()
        .map(|(name, value)| Header {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect()
}

/// Matches `http/[01].[01]` (lowercase, any separator), i.e. the protocol
/// tokens DevTools reports for plain HTTP/0.9, 1.0 and 1.1.
pub fn is_plain_http(protocol: &str) -> bool {
    let b = protocol.as_bytes();
    b.len() == 8
        && b.starts_with(b"http/")
        && matches!(b[5], b'0' | b'1')
        && matches!(b[7], b'0' | b'1')
}

/// `start_line CRLF (name: value CRLF)* CRLF`.
fn header_block(start_line: &str, pairs: &[Header]) -> String {
    let mut lines = Vec::with_capacity(pairs.len() + 3);
    lines.push(start_line.to_string());
    lines.extend(pairs.iter().map(|h| format!("{}: {}", h.name, h.value)));
    lines.push(String::new());
    lines.push(String::new());
    lines.join("\r\n")
}

pub fn raw_request(method: &str, url: &str, protocol: &str, pairs: &[Header]) -> String {
    header_block(&format!("{method} {url} {protocol}"), pairs)
}

pub fn raw_response(protocol: &str, status: i64, status_text: &str, pairs: &[Header]) -> String {
    header_block(&format!("{protocol} {status} {status_text}"), pairs)
}

/// Request and response header pairs with their estimated sizes.
#[derive(Debug, Clone)]
pub struct HeaderBlocks {
    pub request: Vec<Header>,
    pub request_size: i64,
    pub response: Vec<Header>,
    pub response_size: i64,
}

pub struct StatusLines<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub protocol: &'a str,
    pub status: i64,
    pub status_text: &'a str,
}

pub fn measure(lines: &StatusLines<'_>, request: &Headers, response: &Headers) -> HeaderBlocks {
    let request_pairs = header_pairs(request);
    let response_pairs = header_pairs(response);
    let (request_size, response_size) = if is_plain_http(lines.protocol) {
        (
            raw_request(lines.method, lines.url, lines.protocol, &request_pairs).len() as i64,
            raw_response(lines.protocol, lines.status, lines.status_text, &response_pairs).len()
                as i64,
        )
    } else {
        (-1, -1)
    };
    HeaderBlocks {
        request: request_pairs,
        request_size,
        response: response_pairs,
        response_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_http_detection() {
        assert!(is_plain_http("http/1.1"));
        assert!(is_plain_http("http/1.0"));
        assert!(is_plain_http("http/0.9"));
        assert!(!is_plain_http("h2"));
        assert!(!is_plain_http("h3"));
        assert!(!is_plain_http("HTTP/1.1"));
        assert!(!is_plain_http("http/2.0"));
        assert!(!is_plain_http("unknown"));
    }

    #[test]
    fn multi_valued_headers_become_ordered_pairs() {
        let h: Headers = serde_json::from_str(r#"{"set-cookie": ["a=1", "b=2"]}"#).unwrap();
        let pairs = header_pairs(&h);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].value, "a=1");
        assert_eq!(pairs[1].value, "b=2");
        assert!(pairs.iter().all(|p| p.name == "set-cookie"));
    }

    #[test]
    fn http11_header_size_is_reconstruction_length() {
        let request: Headers = [("Host", "example.com"), ("Accept", "*/*")].into_iter().collect();
        let response: Headers = [("Content-Type", "text/html")].into_iter().collect();
        let lines = StatusLines {
            method: "GET",
            url: "https://example.com/",
            protocol: "http/1.1",
            status: 200,
            status_text: "OK",
        };
        let blocks = measure(&lines, &request, &response);

        let expected_request =
            "GET https://example.com/ http/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n";
        let expected_response = "http/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n";
        assert_eq!(blocks.request_size, expected_request.len() as i64);
        assert_eq!(blocks.response_size, expected_response.len() as i64);
        assert_eq!(blocks.response_size, 44);
    }

    #[test]
    fn h2_header_size_is_unavailable() {
        let h: Headers = [("a", "b")].into_iter().collect();
        let lines = StatusLines {
            method: "GET",
            url: "https://example.com/",
            protocol: "h2",
            status: 200,
            status_text: "",
        };
        let blocks = measure(&lines, &h, &h);
        assert_eq!(blocks.request_size, -1);
        assert_eq!(blocks.response_size, -1);
        assert_eq!(blocks.request.len(), 1);
    }
}
