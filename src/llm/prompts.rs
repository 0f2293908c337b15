//! Fixed prompt templates.

/// Listing extraction prompt. `{content}` is replaced with the page text.
pub const EXTRACTION_PROMPT: &str = r#"Extract business information from the following text. Output ONLY a valid JSON array of objects, where each object has keys: name, address, phone, email, services, website_url.

Extract every single business listing, including all names, addresses, phones, and details. List as many as possible.

If information is not available, use null or empty string.

Do not include any text before or after the JSON array.

Text: {content}"#;

/// Location prompt. `{content}` is replaced with the first part of the page text.
pub const LOCATION_PROMPT: &str = "Extract the primary city or location from this text. Return only the city name, nothing else. If none, say 'unknown'. Text: {content}";

/// Fill a template's `{content}` placeholder.
pub fn render(template: &str, content: &str) -> String {
    template.replace("{content}", content)
}
