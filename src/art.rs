use include_dir::{include_dir, Dir};
use itertools::Itertools;

static ASSET_DIR: Dir = include_dir!("src/assets");

// Pose art ships with inconsistent naming, so every load walks a fixed
// fallback chain instead of assuming one canonical location.
const PATH_PREFIXES: &[&str] = &["poses/", "art/", ""];
const EXTENSIONS: &[&str] = &["txt", "TXT", "ascii"];

/// A place pose art can be loaded from. Locations may carry a `?r=` query
/// suffix; stores are expected to ignore it.
pub trait ArtStore {
    fn load(&self, location: &str) -> Option<String>;
}

/// Loads art out of the embedded asset directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedArtStore;

impl ArtStore for EmbeddedArtStore {
    fn load(&self, location: &str) -> Option<String> {
        let path = location.split('?').next().unwrap_or(location);
        ASSET_DIR
            .get_file(path)
            .and_then(|f| f.contents_utf8())
            .map(str::to_string)
    }
}

/// What gets rendered in the placeholder when every candidate fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtDiagnostic {
    pub pose_id: String,
    pub candidates_tried: usize,
    pub last_candidate: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    /// No pose assigned yet.
    Idle,
    /// Candidates remain to be attempted.
    Pending,
    Resolved(String),
    /// Terminal until the pose changes.
    NotFound(ArtDiagnostic),
}

/// Walks the ordered candidate list for a pose's art, one attempt per
/// load-failure callback. A pose change resets the sequence from candidate 0
/// and clears any terminal state.
#[derive(Debug)]
pub struct ArtResolver {
    pose_id: Option<String>,
    candidates: Vec<String>,
    next: usize,
    nonce: u64,
    state: ResolveState,
}

impl ArtResolver {
    pub fn new() -> Self {
        Self {
            pose_id: None,
            candidates: Vec::new(),
            next: 0,
            nonce: 0,
            state: ResolveState::Idle,
        }
    }

    pub fn state(&self) -> &ResolveState {
        &self.state
    }

    pub fn pose_id(&self) -> Option<&str> {
        self.pose_id.as_deref()
    }

    /// Assigns the pose whose art should be resolved. Re-assigning the same
    /// pose keeps the current attempt state.
    pub fn set_pose(&mut self, pose_id: &str) {
        if self.pose_id.as_deref() == Some(pose_id) {
            return;
        }

        self.nonce = self.nonce.wrapping_add(1);
        self.pose_id = Some(pose_id.to_string());
        self.candidates = candidates_for(pose_id, self.nonce);
        self.next = 0;
        self.state = ResolveState::Pending;
    }

    /// The candidate the caller should attempt next, if any.
    pub fn current_candidate(&self) -> Option<&str> {
        match self.state {
            ResolveState::Pending => self.candidates.get(self.next).map(String::as_str),
            _ => None,
        }
    }

    pub fn on_load_success(&mut self, art: String) {
        if matches!(self.state, ResolveState::Pending) {
            self.state = ResolveState::Resolved(art);
        }
    }

    pub fn on_load_failure(&mut self) {
        if !matches!(self.state, ResolveState::Pending) {
            return;
        }

        self.next += 1;
        if self.next >= self.candidates.len() {
            self.state = ResolveState::NotFound(ArtDiagnostic {
                pose_id: self.pose_id.clone().unwrap_or_default(),
                candidates_tried: self.candidates.len(),
                last_candidate: self.candidates.last().cloned().unwrap_or_default(),
            });
        }
    }

    /// Drives the attempt loop to completion against a synchronous store.
    pub fn resolve_with<S: ArtStore>(&mut self, store: &S) {
        while let Some(candidate) = self.current_candidate().map(str::to_string) {
            match store.load(&candidate) {
                Some(art) => self.on_load_success(art),
                None => self.on_load_failure(),
            }
        }
    }
}

impl Default for ArtResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn candidates_for(pose_id: &str, nonce: u64) -> Vec<String> {
    PATH_PREFIXES
        .iter()
        .cartesian_product(EXTENSIONS.iter())
        .map(|(prefix, ext)| format!("{}{}.{}?r={}", prefix, pose_id, ext, nonce))
        .collect()
}
