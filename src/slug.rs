/// URL slug for a listing title: lowercase, strip anything that is not
/// alphanumeric/space/hyphen, hyphenate runs of whitespace, collapse hyphens.
pub fn slugify(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == ' ' || ch == '-' {
            cleaned.push(ch);
        }
    }

    let mut slug = String::with_capacity(cleaned.len());
    let mut last_hyphen = true;
    for ch in cleaned.trim().chars() {
        if ch == ' ' || ch == '-' {
            if !last_hyphen {
                slug.push('-');
                last_hyphen = true;
            }
        } else {
            slug.push(ch);
            last_hyphen = false;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}
