/// Locate the JSON array in an LLM response by the first `[` and last `]`.
///
/// Models often wrap payloads in prose or code fences despite being asked
/// not to; slicing between the outermost brackets recovers the payload
/// without attempting to parse the wrapper.
#[must_use]
pub fn extract_json_array(response: &str) -> Option<&str> {
    extract_between(response, '[', ']')
}

/// Locate the JSON object in an LLM response by the first `{` and last `}`
#[must_use]
pub fn extract_json_object(response: &str) -> Option<&str> {
    extract_between(response, '{', '}')
}

fn extract_between(response: &str, open: char, close: char) -> Option<&str> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}
