/// Registry host every target reference lives under.
pub const GHCR_HOST: &str = "ghcr.io";

/// Returns the trailing `repository[:tag]` segment of an image reference,
/// i.e. everything after the final `/`, or the whole reference if it has none.
pub fn repository_segment(source_reference: &str) -> &str {
    match source_reference.rfind('/') {
        Some(index) => &source_reference[index + 1..],
        None => source_reference,
    }
}

/// Derives the GHCR reference a source image is copied to.
///
/// The organization is lowercased and prefixed with `ghcr.io/` unless it already
/// carries that prefix, so feeding an earlier result's organization back in never
/// double-prefixes. The repository name is lowercased too since GHCR rejects
/// uppercase names; the tag or digest keeps its case.
///
/// Never fails: empty inputs yield a degenerate but well-formed string.
pub fn resolve_target(source_reference: &str, target_org: &str) -> String {
    let host_prefix = format!("{}/", GHCR_HOST);
    let lowered = target_org.to_lowercase();
    let org = lowered
        .strip_prefix(&host_prefix)
        .unwrap_or(lowered.as_str())
        .trim_end_matches('/');

    format!(
        "{}{}/{}",
        host_prefix,
        org,
        normalize_segment(repository_segment(source_reference))
    )
}

fn normalize_segment(segment: &str) -> String {
    match segment.find([':', '@']) {
        Some(index) => {
            let (name, suffix) = segment.split_at(index);
            format!("{}{}", name.to_lowercase(), suffix)
        }
        None => segment.to_lowercase(),
    }
}
