//! CLI output formatting utilities

use crate::api::types::UserCard;
use crate::models::RouterResult;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print a routed result with hydrated user cards
pub fn print_recommendations(result: &RouterResult, cards: &[UserCard]) {
    println!("{}", result.text);

    if cards.is_empty() {
        return;
    }

    println!();
    for card in cards {
        println!(
            "  - {} | {} | {}",
            card.user_id,
            card.name,
            card.title.as_deref().unwrap_or("N/A")
        );
        if let Some(reason) = &card.reason {
            println!("    Reason:   {reason}");
        }
        println!(
            "    Company:  {} | School: {} | Location: {}",
            card.company.as_deref().unwrap_or("N/A"),
            card.school.as_deref().unwrap_or("N/A"),
            card.location.as_deref().unwrap_or("N/A")
        );
        if let Some(bio) = &card.bio {
            println!("    Bio:      {}", truncate_str(bio, 80));
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("✅ {message}");
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("❌ {message}");
}

/// Print an informational message
pub fn print_info(message: &str) {
    println!("ℹ️  {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_short() {
        assert_eq!(truncate_str("short", 10), "short");
    }

    #[test]
    fn test_truncate_str_long() {
        assert_eq!(truncate_str("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        // Must not panic on multi-byte boundaries
        let s = "héllo wörld";
        let truncated = truncate_str(s, 4);
        assert!(truncated.starts_with("héll"));
    }
}
