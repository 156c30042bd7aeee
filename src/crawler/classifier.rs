//! Parked-page heuristic
//!
//! Flags fetched pages that are registrar placeholders, domain-for-sale
//! landers, or otherwise too empty to be a real business page. This is a
//! heuristic: false positives and negatives are expected and acceptable.

/// Raw HTML shorter than this cannot be a real business page
const MIN_HTML_LEN: usize = 500;

/// Visible text shorter than this cannot be a real business page
const MIN_TEXT_LEN: usize = 100;

/// Phrases that indicate a registrar/parking placeholder
const PARKING_CUES: &[&str] = &[
    "domain for sale",
    "buy this domain",
    "this domain is available",
    "search for domains",
    "godaddy",
    "namecheap",
    "sedo",
    "parking page",
    "website coming soon",
    "coming soon",
    "suspended page",
    "not found",
    "404",
];

/// Phrases that indicate real business content
const BUSINESS_CUES: &[&str] = &[
    "contact",
    "services",
    "about",
    "gallery",
    "projects",
    "estimate",
    "testimonials",
    "our team",
    "call us",
    "get a quote",
];

/// Classifies a fetched page as a non-business placeholder
///
/// Length floors catch empty shells outright. Past those, a page is parked
/// only when a parking cue appears AND no business cue does: the asymmetric
/// rule keeps legitimate small sites that happen to mention "domain" or a
/// registrar from being rejected, while still catching obvious placeholders.
pub fn is_parked(raw_html: &str, text: &str) -> bool {
    if raw_html.len() < MIN_HTML_LEN || text.len() < MIN_TEXT_LEN {
        return true;
    }

    let lower = text.to_lowercase();

    let has_parking_cue = PARKING_CUES.iter().any(|cue| lower.contains(cue));
    if !has_parking_cue {
        return false;
    }

    let has_business_cue = BUSINESS_CUES.iter().any(|cue| lower.contains(cue));

    !has_business_cue
}
