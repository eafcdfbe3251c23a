//! Applies hand-curated related searches on top of scraped ones

use crate::models::{OverrideMap, TutorMap, TutorRecord};

/// Merge overrides into the automated tutor records.
///
/// An override replaces a tutor's related searches wholesale. Tutors that
/// only exist as overrides are added without a Scryfall URI; tutors without
/// an override pass through untouched.
pub fn merge_overrides<S: Clone>(automated: &TutorMap<S>, overrides: &OverrideMap<S>) -> TutorMap<S> {
    let mut merged = automated.clone();

    for (tutor, custom) in overrides {
        match merged.get_mut(tutor) {
            Some(record) => {
                log::debug!("Overriding related searches for {}", tutor);
                record.related_searches = custom.related_searches.clone();
            }
            None => {
                log::debug!("Adding override-only tutor {}", tutor);
                merged.insert(
                    tutor.clone(),
                    TutorRecord {
                        scryfall_uri: None,
                        related_searches: custom.related_searches.clone(),
                    },
                );
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OverrideRecord, ResolvedSearches};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_override_replaces_related_searches() {
        let mut automated = TutorMap::new();
        automated.insert(
            "T".to_string(),
            TutorRecord {
                scryfall_uri: Some("https://scryfall.com/card/t".to_string()),
                related_searches: strings(&["q"]),
            },
        );
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "T".to_string(),
            OverrideRecord {
                related_searches: strings(&["B"]),
            },
        );

        let merged = merge_overrides(&automated, &overrides);

        assert_eq!(merged["T"].related_searches, strings(&["B"]));
        assert_eq!(
            merged["T"].scryfall_uri.as_deref(),
            Some("https://scryfall.com/card/t")
        );
        // input untouched
        assert_eq!(automated["T"].related_searches, strings(&["q"]));
    }

    #[test]
    fn test_override_is_wholesale_for_resolved_searches() {
        let mut automated = TutorMap::new();
        automated.insert(
            "T".to_string(),
            TutorRecord {
                scryfall_uri: None,
                related_searches: ResolvedSearches::from_iter([("q", strings(&["A"]))]),
            },
        );
        let replacement = ResolvedSearches::from_iter([("r", strings(&["B"]))]);
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "T".to_string(),
            OverrideRecord {
                related_searches: replacement.clone(),
            },
        );

        let merged = merge_overrides(&automated, &overrides);

        assert_eq!(merged["T"].related_searches, replacement);
        assert!(merged["T"].related_searches.get("q").is_none());
    }

    #[test]
    fn test_override_only_tutor_is_added_without_uri() {
        let automated: TutorMap<Vec<String>> = TutorMap::new();
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "Custom Tutor".to_string(),
            OverrideRecord {
                related_searches: strings(&["t:land"]),
            },
        );

        let merged = merge_overrides(&automated, &overrides);

        assert_eq!(merged.len(), 1);
        assert!(merged["Custom Tutor"].scryfall_uri.is_none());
        assert_eq!(merged["Custom Tutor"].related_searches, strings(&["t:land"]));
    }

    #[test]
    fn test_no_overrides_passes_through() {
        let mut automated = TutorMap::new();
        automated.insert(
            "Demonic Tutor".to_string(),
            TutorRecord {
                scryfall_uri: None,
                related_searches: strings(&["t:sorcery"]),
            },
        );

        let merged = merge_overrides(&automated, &OverrideMap::new());
        assert_eq!(merged, automated);
    }

    #[test]
    fn test_reads_override_file_shape() {
        let json = r#"{ "Gamble": { "relatedSearches": ["f:commander", "-t:land"] } }"#;
        let overrides: OverrideMap<Vec<String>> = serde_json::from_str(json).unwrap();
        assert_eq!(overrides["Gamble"].related_searches, strings(&["f:commander", "-t:land"]));
    }
}
