//! Query string and POST body parsing.

use url::{form_urlencoded, Url};

use super::document::{Param, PostData, QueryParam};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Query parameters in order, one per occurrence (duplicates kept).
/// URLs that do not parse yield no parameters.
pub fn parse_query_string(request_url: &str) -> Vec<QueryParam> {
    let Ok(url) = Url::parse(request_url) else {
        return Vec::new();
    };
    url.query_pairs()
        .map(|(name, value)| QueryParam {
            name: name.into_owned(),
            value: value.into_owned(),
        })
        .collect()
}

/// Archives a request body. Only exact `application/x-www-form-urlencoded`
/// bodies are split into params; anything else is kept as opaque text.
pub fn parse_post_data(post_data: Option<&str>, content_type: Option<&str>) -> Option<PostData> {
    let text = post_data?;
    let params = if content_type == Some(FORM_URLENCODED) {
        form_urlencoded::parse(text.as_bytes())
            .map(|(name, value)| Param {
                name: name.into_owned(),
                value: value.into_owned(),
            })
            .collect()
    } else {
        Vec::new()
    };
    Some(PostData {
        mime_type: content_type.map(String::from),
        params,
        text: text.to_string(),
    })
}
