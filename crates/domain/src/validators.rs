pub fn validate_source_label(label: &str) -> Result<(), String> {
    if label.trim().is_empty() {
        return Err("Source label cannot be empty".to_string());
    }
    if label.len() > 200 {
        return Err("Source label cannot exceed 200 characters".to_string());
    }
    Ok(())
}

pub fn validate_source_url(url: &str) -> Result<(), String> {
    if url.len() > 2048 {
        return Err("URL cannot exceed 2048 characters".to_string());
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }
    Ok(())
}

/// Domain names as they appear in a corpus row; anything with whitespace or
/// no label at all is rejected.
pub fn is_plausible_domain(name: &str) -> bool {
    let name = name.trim_end_matches('.');
    !name.is_empty()
        && name.len() <= 253
        && !name.chars().any(char::is_whitespace)
        && name.split('.').all(|label| !label.is_empty() && label.len() <= 63)
}
