use crate::contract::model::{DirectoryQuery, UserProfile};

/// Narrow `profiles` to the records matching `query`.
///
/// Search is a case-insensitive substring match over display name, email and
/// role tag (any of them); the role filter is an exact, case-sensitive match
/// on the tag. Both apply when both are set. The result is a fresh vector in
/// input order; `profiles` is never touched.
pub fn filter_profiles(profiles: &[UserProfile], query: &DirectoryQuery) -> Vec<UserProfile> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    let role = query.role.as_deref().filter(|r| !r.is_empty());

    profiles
        .iter()
        .filter(|p| needle.as_deref().map_or(true, |n| matches_search(p, n)))
        .filter(|p| role.map_or(true, |r| p.role == r))
        .cloned()
        .collect()
}

/// `needle` must already be lower-cased.
fn matches_search(profile: &UserProfile, needle: &str) -> bool {
    [
        profile.display_name_or_empty(),
        profile.email_or_empty(),
        profile.role.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::Role;

    fn sample() -> Vec<UserProfile> {
        vec![
            UserProfile::new("1", Role::Trainer)
                .with_display_name("Jess")
                .with_email("j@x.com"),
            UserProfile::new("2", Role::Client)
                .with_display_name("Sam")
                .with_email("s@x.com"),
        ]
    }

    fn ids(profiles: &[UserProfile]) -> Vec<&str> {
        profiles.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn search_matches_display_name_case_insensitively() {
        let result = filter_profiles(&sample(), &DirectoryQuery::new().search("sam"));
        assert_eq!(ids(&result), vec!["2"]);

        let result = filter_profiles(&sample(), &DirectoryQuery::new().search("  JESS "));
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn search_matches_email_and_role() {
        let result = filter_profiles(&sample(), &DirectoryQuery::new().search("s@x"));
        assert_eq!(ids(&result), vec!["2"]);

        let result = filter_profiles(&sample(), &DirectoryQuery::new().search("TRAIN"));
        assert_eq!(ids(&result), vec!["1"]);

        let result = filter_profiles(&sample(), &DirectoryQuery::new().search("x.com"));
        assert_eq!(ids(&result), vec!["1", "2"]);
    }

    #[test]
    fn role_filter_is_exact() {
        let result = filter_profiles(&sample(), &DirectoryQuery::new().role("trainer"));
        assert_eq!(ids(&result), vec!["1"]);

        assert!(filter_profiles(&sample(), &DirectoryQuery::new().role("Trainer")).is_empty());
        assert!(filter_profiles(&sample(), &DirectoryQuery::new().role("train")).is_empty());
    }

    #[test]
    fn search_and_role_combine() {
        let query = DirectoryQuery::new().search("x.com").role("client");
        assert_eq!(ids(&filter_profiles(&sample(), &query)), vec!["2"]);

        let query = DirectoryQuery::new().search("jess").role("client");
        assert!(filter_profiles(&sample(), &query).is_empty());
    }

    #[test]
    fn blank_criteria_return_everything_in_order() {
        let all = sample();
        for query in [
            DirectoryQuery::new(),
            DirectoryQuery::new().search(""),
            DirectoryQuery::new().search("   \t"),
            DirectoryQuery::new().role(""),
        ] {
            assert_eq!(filter_profiles(&all, &query), all);
        }
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let profiles = vec![
            UserProfile::new("a", Role::Nutritionist),
            UserProfile::new("b", Role::Client).with_email("nina@x.com"),
        ];

        let result = filter_profiles(&profiles, &DirectoryQuery::new().search("nina"));
        assert_eq!(ids(&result), vec!["b"]);

        // role tag still searchable without name or email
        let result = filter_profiles(&profiles, &DirectoryQuery::new().search("nutri"));
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn unknown_and_missing_role_tags_stay_listed() {
        let mut profiles = sample();
        profiles.push(UserProfile::new("3", Role::Client).with_role_tag("coach"));
        profiles.push(
            UserProfile::new("4", Role::Client)
                .with_role_tag("")
                .with_display_name("Legacy"),
        );

        let result = filter_profiles(&profiles, &DirectoryQuery::new());
        assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);

        let result = filter_profiles(&profiles, &DirectoryQuery::new().role("coach"));
        assert_eq!(ids(&result), vec!["3"]);

        let result = filter_profiles(&profiles, &DirectoryQuery::new().search("legacy"));
        assert_eq!(ids(&result), vec!["4"]);
    }

    #[test]
    fn filtering_is_pure() {
        let all = sample();
        let before = all.clone();
        let query = DirectoryQuery::new().search("s");

        let first = filter_profiles(&all, &query);
        let second = filter_profiles(&all, &query);

        assert_eq!(first, second);
        assert_eq!(all, before);
        assert!(first.iter().all(|p| all.iter().any(|q| q.id == p.id)));
    }
}
