use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const BIO_CHAR_LIMIT: usize = 100;
pub const POSTS_CHAR_LIMIT: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub basename: String,
    pub bio: String,
    pub posts: Vec<String>,
}

impl Profile {
    /// Text fed to the models: the bio cut to 100 characters and the
    /// space-joined posts cut to 150.
    pub fn prompt_text(&self) -> String {
        let bio = truncate_chars(&self.bio, BIO_CHAR_LIMIT);
        let joined = self.posts.join(" ");
        let posts = truncate_chars(&joined, POSTS_CHAR_LIMIT);
        format!("Bio: {} Posts: {}", bio, posts)
    }

    pub fn personalized_context(&self) -> String {
        format!("Based on {}'s X posts", self.basename)
    }
}

pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(bio: &str, posts: &[&str]) -> Profile {
        Profile {
            user_id: "u1".into(),
            basename: "alex.base".into(),
            bio: bio.into(),
            posts: posts.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn bio_and_posts_are_cut_to_their_limits() {
        let p = profile(&"A".repeat(200), &["x".repeat(120).as_str(), &"y".repeat(120)]);
        let text = p.prompt_text();
        let expected = format!(
            "Bio: {} Posts: {} {}",
            "A".repeat(100),
            "x".repeat(120),
            "y".repeat(29)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn short_fields_are_untouched() {
        let p = profile("Building AI in SF", &["hi", "base hackathon"]);
        assert_eq!(p.prompt_text(), "Bio: Building AI in SF Posts: hi base hackathon");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let bio = "é".repeat(150);
        assert_eq!(truncate_chars(&bio, 100).chars().count(), 100);
        assert_eq!(truncate_chars("🙂🙂", 1), "🙂");
    }
}
