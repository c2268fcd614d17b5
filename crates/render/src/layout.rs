//! Shared navigation bar and footer.

/// Static navigation links as (href, label).
pub const NAV_LINKS: [(&str, &str); 3] = [
    ("availability.html", "Availability"),
    ("competitors.html", "Competitors"),
    ("pricing.html", "Pricing"),
];

const SOCIAL_LINKS: [&str; 3] = ["Twitter", "LinkedIn", "GitHub"];

/// Markup for the fixed navigation bar.
pub fn navbar_markup() -> String {
    let links: String = NAV_LINKS
        .iter()
        .map(|(href, label)| {
            format!(
                "<a href=\"{href}\" class=\"text-slate-700 hover:text-slate-900\">{label}</a>"
            )
        })
        .collect();

    format!(
        "<nav class=\"fixed top-0 inset-x-0 z-50 bg-white/90 backdrop-blur nav-shadow\">\
         <div class=\"max-w-7xl mx-auto px-4 sm:px-6 lg:px-8\">\
         <div class=\"flex items-center justify-between h-16\">\
         <a href=\"index.html\" class=\"flex items-center gap-2\">\
         <span class=\"font-semibold text-slate-900\">Comparely</span></a>\
         <div class=\"hidden md:flex items-center gap-6\">{links}\
         <a href=\"register.html\" class=\"ml-2 inline-flex items-center px-3 py-1.5 rounded-md btn-gradient\">Register</a>\
         </div></div></div></nav>"
    )
}

/// Markup for the fixed footer, stamped with `year`.
pub fn footer_markup(year: i32) -> String {
    let links: String = SOCIAL_LINKS
        .iter()
        .map(|name| format!("<a class=\"footer-link\" href=\"#\">{name}</a>"))
        .collect();

    format!(
        "<footer class=\"mt-24 border-t border-slate-200\">\
         <div class=\"max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-10\">\
         <div class=\"flex flex-col md:flex-row items-center justify-between gap-4\">\
         <p class=\"text-sm text-slate-600\">© {year} Comparely. Built for data-driven brands.</p>\
         <div class=\"flex items-center gap-4 text-slate-600\">{links}</div>\
         </div></div></footer>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navbar_links() {
        let nav = navbar_markup();
        assert!(nav.contains("href=\"index.html\""));
        assert!(nav.contains(">Comparely</span>"));
        for (href, label) in NAV_LINKS {
            assert!(nav.contains(&format!("href=\"{href}\"")));
            assert!(nav.contains(&format!(">{label}</a>")));
        }
        assert!(nav.contains("href=\"register.html\""));
    }

    #[test]
    fn test_footer_year() {
        let footer = footer_markup(2031);
        assert!(footer.contains("© 2031 Comparely. Built for data-driven brands."));
        assert_eq!(footer.matches("footer-link").count(), 3);
    }
}
