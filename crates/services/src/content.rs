use drill_core::model::Question;
use std::collections::BTreeMap;

/// Read-only supplier of stock questions, keyed by catalog position.
///
/// The engine only ever reads from this collaborator; writable content lives
/// in the custom question store.
pub trait ContentSource: Send + Sync {
    /// Questions filed under the exact (track, framework, level) key.
    fn questions(&self, track: &str, framework: &str, level: &str) -> Vec<Question>;

    /// Number of questions under the key; overridable when counting is
    /// cheaper than materializing.
    fn question_count(&self, track: &str, framework: &str, level: &str) -> usize {
        self.questions(track, framework, level).len()
    }

    /// All known tracks, sorted.
    fn tracks(&self) -> Vec<String>;

    /// Frameworks available under a track, sorted.
    fn frameworks(&self, track: &str) -> Vec<String>;

    /// Levels available under a track and framework, sorted.
    fn levels(&self, track: &str, framework: &str) -> Vec<String>;
}

/// In-memory content bank, used by tests and by embedders that compile their
/// question bank straight into the binary.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    banks: BTreeMap<(String, String, String), Vec<Question>>,
}

impl StaticContent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `questions` under the given catalog position. Keys are matched
    /// case-insensitively.
    #[must_use]
    pub fn with_questions(
        mut self,
        track: &str,
        framework: &str,
        level: &str,
        questions: Vec<Question>,
    ) -> Self {
        self.banks
            .entry(Self::key(track, framework, level))
            .or_default()
            .extend(questions);
        self
    }

    fn key(track: &str, framework: &str, level: &str) -> (String, String, String) {
        (
            track.to_ascii_lowercase(),
            framework.to_ascii_lowercase(),
            level.to_ascii_lowercase(),
        )
    }
}

impl ContentSource for StaticContent {
    fn questions(&self, track: &str, framework: &str, level: &str) -> Vec<Question> {
        self.banks
            .get(&Self::key(track, framework, level))
            .cloned()
            .unwrap_or_default()
    }

    fn question_count(&self, track: &str, framework: &str, level: &str) -> usize {
        self.banks
            .get(&Self::key(track, framework, level))
            .map_or(0, Vec::len)
    }

    fn tracks(&self) -> Vec<String> {
        let mut tracks: Vec<String> = self.banks.keys().map(|key| key.0.clone()).collect();
        tracks.dedup();
        tracks
    }

    fn frameworks(&self, track: &str) -> Vec<String> {
        let track = track.to_ascii_lowercase();
        let mut frameworks: Vec<String> = self
            .banks
            .keys()
            .filter(|key| key.0 == track)
            .map(|key| key.1.clone())
            .collect();
        frameworks.dedup();
        frameworks
    }

    fn levels(&self, track: &str, framework: &str) -> Vec<String> {
        let track = track.to_ascii_lowercase();
        let framework = framework.to_ascii_lowercase();
        let mut levels: Vec<String> = self
            .banks
            .keys()
            .filter(|key| key.0 == track && key.1 == framework)
            .map(|key| key.2.clone())
            .collect();
        levels.dedup();
        levels
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
