//! Overlap-aware path consolidation
//!
//! Each level of a validator error tree contributes a fragment of the final
//! property path, and fragments from neighbouring levels often repeat the
//! same segments (`["a", "b"]` from a parent, `["b", "c"]` from its child).
//! Plain concatenation would produce `a/b/b/c`; consolidation yields `a/b/c`.

/// Separator used when a segment list is finalized into a path string
pub const PATH_SEPARATOR: &str = "/";

/// Merge `suffix` into `base`, skipping segments the two already share
///
/// The last occurrence of `suffix[0]` in `base` anchors the overlap. From
/// there the following suffix segments are compared position by position
/// with the following base segments:
///
/// - every suffix segment matched: `base` is returned unchanged
/// - the match ran off the end of `base`: the unmatched rest of `suffix` is appended
/// - the match broke inside `base`, or there is no anchor: all of `suffix` is appended
///
/// # Examples
///
/// ```rust
/// use errtree_core::consolidate_path;
///
/// let base = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let suffix = vec!["b".to_string(), "c".to_string(), "d".to_string()];
/// assert_eq!(consolidate_path(&base, suffix.as_slice()), vec!["a", "b", "c", "d"]);
/// ```
pub fn consolidate_path<S: AsRef<str>>(base: &[String], suffix: &[S]) -> Vec<String> {
    let appended = |from: usize| -> Vec<String> {
        base.iter()
            .cloned()
            .chain(suffix[from..].iter().map(|s| s.as_ref().to_string()))
            .collect()
    };

    let Some(first) = suffix.first() else {
        return base.to_vec();
    };
    let Some(anchor) = base.iter().rposition(|segment| segment == first.as_ref()) else {
        return appended(0);
    };

    let mut matched = 1;
    while matched < suffix.len()
        && anchor + matched < base.len()
        && base[anchor + matched] == suffix[matched].as_ref()
    {
        matched += 1;
    }

    if matched == suffix.len() {
        base.to_vec()
    } else if anchor + matched == base.len() {
        appended(matched)
    } else {
        appended(0)
    }
}

/// Join segments into a finalized path string
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_partial_overlap_appends_remainder() {
        let result = consolidate_path(&segs(&["a", "b", "c"]), &["b", "c", "d"]);
        assert_eq!(result, segs(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_disjoint_concatenates() {
        let result = consolidate_path(&segs(&["a", "b"]), &["x", "y"]);
        assert_eq!(result, segs(&["a", "b", "x", "y"]));
    }

    #[test]
    fn test_fully_contained_is_unchanged() {
        let result = consolidate_path(&segs(&["a", "b", "c"]), &["b", "c"]);
        assert_eq!(result, segs(&["a", "b", "c"]));
    }

    #[test]
    fn test_contained_in_the_middle_is_unchanged() {
        let result = consolidate_path(&segs(&["a", "b", "c", "d"]), &["b", "c"]);
        assert_eq!(result, segs(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_break_inside_base_appends_everything() {
        // "b" anchors at index 1, but base continues with "c" rather than "x"
        let result = consolidate_path(&segs(&["a", "b", "c"]), &["b", "x"]);
        assert_eq!(result, segs(&["a", "b", "c", "b", "x"]));
    }

    #[test]
    fn test_anchor_uses_last_occurrence() {
        let result = consolidate_path(&segs(&["b", "a", "b"]), &["b", "c"]);
        assert_eq!(result, segs(&["b", "a", "b", "c"]));
    }

    #[test]
    fn test_empty_inputs() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(consolidate_path(&empty, &["a"]), segs(&["a"]));
        assert_eq!(consolidate_path(&segs(&["a"]), &empty), segs(&["a"]));
        assert!(consolidate_path::<String>(&empty, &[]).is_empty());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path(&["/x", "version"]), "/x/version");
        assert_eq!(join_path::<&str>(&[]), "");
        assert_eq!(join_path(&segs(&["a"])), "a");
    }
}
