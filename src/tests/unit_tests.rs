//! Pure unit tests (no database required)
//!
//! These tests verify core functionality without external dependencies.

#[cfg(test)]
mod unit_tests {
    // ====== Error Handling Tests ======

    #[test]
    fn test_invalid_field_error_display() {
        use crate::errors::NetRecError;

        let error = NetRecError::invalid_field("email", &["company", "school", "location"]);
        let display = format!("{error}");
        assert!(display.contains("email"));
        assert!(display.contains("company, school, location"));
    }

    #[test]
    fn test_user_not_found_error() {
        use crate::errors::NetRecError;

        let error = NetRecError::UserNotFound("u042".to_string());
        assert_eq!(format!("{error}"), "User not found: u042");
    }

    #[test]
    fn test_custom_error() {
        use crate::errors::NetRecError;

        let error = NetRecError::Custom("Test error".to_string());
        let display = format!("{error}");
        assert!(display.contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        use std::io;

        use crate::errors::NetRecError;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let net_err: NetRecError = io_err.into();

        assert!(matches!(net_err, NetRecError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        use crate::errors::NetRecError;

        let parse_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let net_err: NetRecError = parse_err.into();
        assert!(matches!(net_err, NetRecError::Serialization(_)));
    }

    // ====== Model Tests ======

    #[test]
    fn test_recommendation_serializes_as_pair() {
        use crate::models::Recommendation;

        let rec = Recommendation::new("u001", "Same company: Acme");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["user_id"], "u001");
        assert_eq!(json["reason"], "Same company: Acme");
    }

    #[test]
    fn test_router_result_roundtrip() {
        use crate::models::Recommendation;
        use crate::models::RouterResult;

        let result = RouterResult {
            text: "Found 1 recommended user(s) across 1 retrieval call(s).".to_string(),
            recommendations: vec![Recommendation::new("u002", "Shared School: MIT")],
        };

        let json = serde_json::to_string(&result).unwrap();
        let parsed: RouterResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.recommendations, result.recommendations);
    }

    #[test]
    fn test_bio_document_jsonl_shape() {
        use crate::models::BioDocument;

        let line = r#"{"user_id":"u001","bio":"Engineer.","sources":["intro","resume"]}"#;
        let document: BioDocument = serde_json::from_str(line).unwrap();
        assert_eq!(document.user_id, "u001");
        assert_eq!(document.sources, vec!["intro", "resume"]);
    }
}
