//! Body and transfer sizes.
//!
//! DevTools reports the decoded body size (sum of `dataReceived` chunks) and
//! the total on-the-wire size (`encodedDataLength`). HAR wants the encoded
//! body size, which is only derivable when the header size is known.

use crate::model::Headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    pub request_body_size: i64,
    /// Encoded response body size, `-1` when unknown.
    pub response_body_size: i64,
    pub transfer_size: Option<i64>,
    /// Decoded minus encoded body size; absent when it cannot be computed.
    pub compression: Option<i64>,
}

pub struct Sizes {
    pub response_headers_size: i64,
    pub encoded_length: Option<i64>,
    pub decoded_length: i64,
    pub failed: bool,
}

pub fn compute(sizes: &Sizes, request_headers: &Headers) -> Payload {
    let mut transfer_size = sizes.encoded_length;
    let (response_body_size, compression) = if sizes.response_headers_size == -1 {
        (-1, None)
    } else if sizes.failed {
        // loadingFailed carries no encodedDataLength: only the headers made it.
        transfer_size = Some(sizes.response_headers_size);
        (0, Some(0))
    } else {
        match sizes.encoded_length {
            Some(encoded) => {
                let body = encoded - sizes.response_headers_size;
                (body, Some(sizes.decoded_length - body))
            }
            None => (-1, None),
        }
    };

    Payload {
        request_body_size: request_body_size(request_headers),
        response_body_size,
        transfer_size,
        compression,
    }
}

/// Numeric `Content-Length` of the request, `-1` when absent or unparsable.
pub fn request_body_size(headers: &Headers) -> i64 {
    headers
        .get_first("content-length")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(-1)
}
