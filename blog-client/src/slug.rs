/// Derives the URL slug of a post from its title.
///
/// Lowercases the title, drops every character outside `[a-z0-9 -]`, and joins the
/// remaining words with single hyphens. The result never starts or ends with a hyphen.
/// Two titles may produce the same slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut separator = false;

    for c in title.to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => {
                if separator && !slug.is_empty() {
                    slug.push('-');
                }
                separator = false;
                slug.push(c);
            }
            ' ' | '-' => separator = true,
            _ => {}
        }
    }

    slug
}
