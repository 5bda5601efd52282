use std::collections::BTreeMap;

use crate::models::canonical_header_name;

/// Header name to a single value. Ordered so that the serialized form is
/// stable between calls.
pub type FlatHeaderMap = BTreeMap<String, String>;

/// Collapses a multi-valued header sequence into a [`FlatHeaderMap`].
///
/// Names are canonicalized before comparison. Only the first value seen for
/// each name is kept, later values are dropped. Values that are not valid
/// UTF-8 are decoded lossily.
pub fn collapse_first_value<I, N, V>(headers: I) -> FlatHeaderMap
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut flat = FlatHeaderMap::new();
    for (name, value) in headers {
        flat.entry(canonical_header_name(name))
            .or_insert_with(|| String::from_utf8_lossy(value.as_ref()).into_owned());
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_value_per_name() {
        let flat = collapse_first_value(vec![
            ("x", "a"),
            ("x", "b"),
            ("content-length", "42"),
        ]);

        assert_eq!(flat.len(), 2);
        assert_eq!(flat["X"], "a");
        assert_eq!(flat["Content-Length"], "42");
    }

    #[test]
    fn merges_names_differing_only_in_case() {
        let flat = collapse_first_value(vec![
            ("X-Test", "v1"),
            ("x-test", "v2"),
        ]);

        assert_eq!(flat.len(), 1);
        assert_eq!(flat["X-Test"], "v1");
    }

    #[test]
    fn decodes_invalid_utf8_lossily() {
        let flat = collapse_first_value(vec![("x-raw", &b"ok\xff"[..])]);
        assert_eq!(flat["X-Raw"], "ok\u{fffd}");
    }
}
