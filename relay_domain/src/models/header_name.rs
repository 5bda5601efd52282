/// Canonical form of a header name: the first letter and every letter
/// following a hyphen are upper-cased, everything else is lower-cased.
///
/// `content-type` and `CONTENT-TYPE` both become `Content-Type`. Names
/// containing a space or a byte outside visible ASCII are returned unchanged.
pub fn canonical_header_name(name: impl AsRef<str>) -> String {
    let name = name.as_ref();
    if !name.bytes().all(|b| b.is_ascii_graphic()) {
        return name.to_owned();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() };
            upper = c == '-';
            out
        })
        .collect()
}
