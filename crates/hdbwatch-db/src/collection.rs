/// The logical collections the scrapers write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    NewsArticles,
    Reviews,
    Lemon8RawPosts,
    Lemon8DirtyData,
}

impl Collection {
    pub const ALL: [Self; 4] = [
        Self::NewsArticles,
        Self::Reviews,
        Self::Lemon8RawPosts,
        Self::Lemon8DirtyData,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewsArticles => "newsarticles",
            Self::Reviews => "reviews",
            Self::Lemon8RawPosts => "lemon8_raw_posts",
            Self::Lemon8DirtyData => "lemon8_dirty_data",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
