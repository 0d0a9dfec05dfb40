//! Share URL plumbing: reading the one-shot import query, stripping it
//! from the address bar, and assembling the outgoing share link.

/// Decode `%XX` escapes. Invalid escapes pass through literally, and a
/// sequence that does not form UTF-8 falls back to the raw input.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(byte) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

/// Extract the `markers` and `lines` values from a `location.search`
/// string. `None` when neither parameter is present (no import).
pub fn parse_share_params(search: &str) -> Option<(String, String)> {
    let search = search.strip_prefix('?').unwrap_or(search);
    let mut markers = None;
    let mut lines = None;
    for pair in search.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            match key {
                "markers" => markers = Some(percent_decode(value)),
                "lines" => lines = Some(percent_decode(value)),
                _ => {}
            }
        }
    }
    if markers.is_none() && lines.is_none() {
        return None;
    }
    Some((markers.unwrap_or_default(), lines.unwrap_or_default()))
}

/// Read the current share parameters from the address bar.
pub fn current_share_params() -> Option<(String, String)> {
    let search = web_sys::window()?.location().search().ok()?;
    parse_share_params(&search)
}

/// Replace the current history entry with the bare path, consuming the
/// one-shot import query so a reload does not re-import.
pub fn strip_query() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(path) = window.location().pathname() else {
        return;
    };
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path));
    }
}

/// Full share link for the current snapshot query.
pub fn share_url(query: &str) -> Option<String> {
    let origin = web_sys::window()?.location().origin().ok()?;
    Some(format!("{}/?{}", origin, query))
}
