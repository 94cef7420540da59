//! Object key construction.
//!
//! Keys use `/` as the segment delimiter. `join` never emits empty segments
//! or doubled delimiters, so keys built from user-supplied fragments and the
//! configured storage prefix stay canonical.

/// Segment delimiter for object keys.
pub const DELIMITER: char = '/';

/// Ensure `value` ends with the delimiter.
///
/// Missing or empty input yields an empty string. Whitespace-only input is
/// treated as content and still gets the delimiter appended.
pub fn delimit(value: Option<&str>) -> String {
    match value {
        None | Some("") => String::new(),
        Some(v) if v.ends_with(DELIMITER) => v.to_string(),
        Some(v) => format!("{v}{DELIMITER}"),
    }
}

/// Join fragments into one key, collapsing delimiter runs.
///
/// A leading delimiter survives only when the first non-empty fragment starts
/// with one, and a trailing delimiter only when the last non-empty fragment
/// ends with one. Outer delimiters decorate segments and never stand alone:
/// fragments holding no segment at all join to `""`, so `join(["/"])` is blank.
pub fn join<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parts: Vec<S> = parts
        .into_iter()
        .filter(|part| !part.as_ref().is_empty())
        .collect();

    let segments: Vec<&str> = parts
        .iter()
        .flat_map(|part| part.as_ref().split(DELIMITER))
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return String::new();
    }

    let mut joined = segments.join("/");
    if parts
        .first()
        .is_some_and(|p| p.as_ref().starts_with(DELIMITER))
    {
        joined.insert(0, DELIMITER);
    }
    if parts.last().is_some_and(|p| p.as_ref().ends_with(DELIMITER)) {
        joined.push(DELIMITER);
    }
    joined
}

/// Anchor `object_key` beneath the configured storage prefix exactly once.
///
/// With an empty prefix a leading delimiter on `object_key` is kept, as
/// `join` would; callers that take keys from URLs strip it first.
pub fn get_path(prefix: &str, object_key: &str) -> String {
    join([delimit(Some(prefix)).as_str(), object_key])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimit_returns_blank_without_input() {
        assert_eq!(delimit(None), "");
        assert_eq!(delimit(Some("")), "");
    }

    #[test]
    fn delimit_keeps_existing_delimiter() {
        assert_eq!(delimit(Some("1234/")), "1234/");
        assert_eq!(delimit(Some("/")), "/");
    }

    #[test]
    fn delimit_appends_delimiter() {
        assert_eq!(delimit(Some("1234")), "1234/");
        assert_eq!(delimit(Some("    ")), "    /");
    }

    #[test]
    fn delimit_is_idempotent() {
        for input in ["a", "a/", "    ", "nested/key", "/"] {
            let once = delimit(Some(input));
            assert_eq!(delimit(Some(&once)), once);
        }
    }

    #[test]
    fn join_without_parts_is_blank() {
        assert_eq!(join(Vec::<&str>::new()), "");
        assert_eq!(join(["", ""]), "");
    }

    #[test]
    fn join_single_part() {
        assert_eq!(join(["a"]), "a");
    }

    #[test]
    fn join_uses_delimiter() {
        assert_eq!(join(["my", "file", "path"]), "my/file/path");
        assert_eq!(join(["my", "", "path"]), "my/path");
        assert_eq!(join(["my", "file/path/123", "abc"]), "my/file/path/123/abc");
    }

    #[test]
    fn join_drops_zero_length_segments() {
        assert_eq!(join(["my", "file//123", "abc"]), "my/file/123/abc");
        assert_eq!(join(["my/", "/path"]), "my/path");
    }

    #[test]
    fn join_keeps_requested_outer_delimiters() {
        assert_eq!(join(["/root", "obj"]), "/root/obj");
        assert_eq!(join(["dir", "sub/"]), "dir/sub/");
        assert_eq!(join(["", "/root", "obj/", ""]), "/root/obj/");
    }

    #[test]
    fn join_of_bare_delimiters_is_blank() {
        assert_eq!(join(["/"]), "");
        assert_eq!(join(["//", "", "/"]), "");
        assert_eq!(join(["/", "a"]), "/a");
        assert_eq!(join(["a", "/"]), "a/");
    }

    #[test]
    fn join_keeps_whitespace_segments() {
        assert_eq!(join(["  ", "x"]), "  /x");
    }

    #[test]
    fn get_path_anchors_under_prefix() {
        assert_eq!(get_path("abc", "obj"), "abc/obj");
        assert_eq!(get_path("abc/", "obj"), "abc/obj");
        assert_eq!(get_path("", "obj"), "obj");
        assert_eq!(get_path("a/b//", "c/d"), "a/b/c/d");
    }

    #[test]
    fn get_path_leading_delimiter_depends_on_prefix() {
        assert_eq!(get_path("abc", "/obj"), "abc/obj");
        assert_eq!(get_path("", "/obj"), "/obj");
        assert_eq!(get_path("", "/"), "");
    }

    #[test]
    fn get_path_matches_join_of_delimited_prefix() {
        for prefix in ["abc", "abc/", "x/y", ""] {
            let expected = join([delimit(Some(prefix)), "obj".to_string()]);
            assert_eq!(get_path(prefix, "obj"), expected);
        }
    }
}
