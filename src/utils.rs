use crate::record::APEX;

/// Returns the sub-name as it must appear in a URL path.
///
/// The apex of a zone has an empty sub-name, which can't be a path segment.
pub(crate) fn path_subname(subname: &str) -> &str {
    if subname.is_empty() { APEX } else { subname }
}
