use ammonia;

/// Strips unsafe markup from user- or admin-supplied text before it is stored.
///
/// Whitelist-based: safe tags such as <b> survive, <script> and event
/// attributes are removed along with script content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_script_tags() {
        let cleaned = clean_html("Which planet?<script>alert(1)</script>");
        assert_eq!(cleaned, "Which planet?");
    }
}
