use cloudcode_types::protocol::Content;

/// Drop empty parts, then contents left without parts.
/// Returns `(pruned_parts, pruned_contents)`.
pub fn sanitize_contents(contents: &mut Vec<Content>) -> (usize, usize) {
    let mut pruned_parts = 0;
    for content in contents.iter_mut() {
        let before = content.parts.len();
        content.parts.retain(|p| !p.is_empty());
        pruned_parts += before - content.parts.len();
    }

    let before = contents.len();
    contents.retain(|c| !c.parts.is_empty());
    (pruned_parts, before - contents.len())
}
