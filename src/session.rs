use crate::dataset::{Dataset, Pose, QuizOption, Region};
use crate::shuffle::shuffled;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

pub const DEFAULT_QUESTION_CAP: u32 = 36;
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1500;
pub const CORRECT_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Practice,
    Review,
    Summary,
}

/// One missed practice question, immutable once appended. Review walks these
/// in order.
#[derive(Debug, Clone, PartialEq)]
pub struct WrongAnswerRecord {
    pub pose_id: String,
    pub chosen_option_id: String,
    pub correct_option: QuizOption,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub question_cap: u32,
    pub advance_delay_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_cap: DEFAULT_QUESTION_CAP,
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
        }
    }
}

/// The mutable session core. Only [`Session`] mutates this, in response to
/// discrete events.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: Mode,
    pub region: Region,
    /// Pose ids not yet completed this practice pass; head is the current pose.
    pub queue: Vec<String>,
    pub current_pose_id: Option<String>,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub total_answered: u32,
    pub elapsed_secs: u64,
    pub shuffled_options: Vec<QuizOption>,
    pub selected_option_id: Option<String>,
    pub is_answered: bool,
    pub is_correct: bool,
    pub wrong_answers: Vec<WrongAnswerRecord>,
    pub review_index: usize,
    pub seen_counts: HashMap<String, u32>,
}

impl SessionState {
    fn initial(region: Region) -> Self {
        Self {
            mode: Mode::Practice,
            region,
            queue: Vec::new(),
            current_pose_id: None,
            score: 0,
            streak: 0,
            best_streak: 0,
            total_answered: 0,
            elapsed_secs: 0,
            shuffled_options: Vec::new(),
            selected_option_id: None,
            is_answered: false,
            is_correct: false,
            wrong_answers: Vec::new(),
            review_index: 0,
            seen_counts: HashMap::new(),
        }
    }
}

/// Deferred auto-advance after a correct practice answer. Tagged with the
/// generation it was scheduled under; a mismatch on tick drops it instead of
/// firing, so a stale callback can never mutate a since-replaced question.
#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    remaining_ms: u64,
    generation: u64,
}

/// Owns the quiz state machine: practice queue, scoring, timer, wrong-answer
/// log, review traversal, and the transition to summary.
#[derive(Debug)]
pub struct Session {
    pub state: SessionState,
    dataset: Dataset,
    settings: SessionSettings,
    rng: StdRng,
    pending_advance: Option<PendingAdvance>,
    generation: u64,
    tick_ms: u64,
}

impl Session {
    pub fn new(dataset: Dataset, settings: SessionSettings, region: Region) -> Self {
        Self::with_rng(dataset, settings, region, StdRng::from_entropy())
    }

    /// Deterministic constructor for tests and the `--seed` flag.
    pub fn with_seed(
        dataset: Dataset,
        settings: SessionSettings,
        region: Region,
        seed: u64,
    ) -> Self {
        Self::with_rng(dataset, settings, region, StdRng::seed_from_u64(seed))
    }

    fn with_rng(dataset: Dataset, settings: SessionSettings, region: Region, rng: StdRng) -> Self {
        let mut session = Self {
            state: SessionState::initial(region),
            dataset,
            settings,
            rng,
            pending_advance: None,
            generation: 0,
            tick_ms: 0,
        };
        session.start();
        session
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn current_pose(&self) -> Option<&Pose> {
        self.state
            .current_pose_id
            .as_deref()
            .and_then(|id| self.dataset.pose(id))
    }

    /// The option flagged correct in the active set, if the set is well formed.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.state.shuffled_options.iter().find(|o| o.correct)
    }

    /// Milliseconds until the scheduled auto-advance fires, if one is pending.
    pub fn pending_advance_ms(&self) -> Option<u64> {
        self.pending_advance.map(|p| p.remaining_ms)
    }

    /// The region questions are actually drawn from right now. Review pins it
    /// to the missed question's stored region, overriding the user selection.
    pub fn active_region(&self) -> Region {
        if self.state.mode == Mode::Review {
            self.state
                .wrong_answers
                .get(self.state.review_index)
                .map(|r| r.region)
                .unwrap_or(self.state.region)
        } else {
            self.state.region
        }
    }

    /// (Re)starts a practice session: fresh shuffled queue over every pose,
    /// all counters reset. Reachable from summary via restart.
    pub fn start(&mut self) {
        let ids = self.dataset.pose_ids();
        let region = self.state.region;

        self.state = SessionState::initial(region);
        self.state.queue = shuffled(&ids, &mut self.rng);
        self.state.current_pose_id = self.state.queue.first().cloned();
        self.tick_ms = 0;
        self.load_question();
    }

    /// Prepares the current question for display: resolves the active region,
    /// fetches and shuffles its option set, clears the answered state, and
    /// counts the exposure. Invoked by every transition that changes pose,
    /// region, mode, or review index.
    fn load_question(&mut self) {
        // a new generation invalidates any pending auto-advance
        self.generation = self.generation.wrapping_add(1);
        self.pending_advance = None;

        let Some(pose_id) = self.state.current_pose_id.clone() else {
            self.state.shuffled_options.clear();
            return;
        };

        let region = self.active_region();
        let options: Vec<QuizOption> = self
            .dataset
            .options_for(&pose_id, region)
            .map(|s| s.to_vec())
            .unwrap_or_default();

        self.state.shuffled_options = shuffled(&options, &mut self.rng);
        self.state.selected_option_id = None;
        self.state.is_answered = false;
        self.state.is_correct = false;
        *self.state.seen_counts.entry(pose_id).or_insert(0) += 1;
    }

    /// Answers the current question. Ignored once answered; a set with no
    /// flagged-correct option (a data bug) degrades to a no-op.
    pub fn submit(&mut self, option_id: &str) {
        if self.state.is_answered
            || self.state.mode == Mode::Summary
            || self.state.current_pose_id.is_none()
        {
            return;
        }

        let Some(correct) = self.correct_option().cloned() else {
            return;
        };

        let is_correct = correct.id == option_id;
        self.state.is_answered = true;
        self.state.selected_option_id = Some(option_id.to_string());
        self.state.is_correct = is_correct;
        self.state.total_answered += 1;

        if self.state.mode != Mode::Practice {
            // review records correctness only; advancing stays explicit
            return;
        }

        if is_correct {
            self.state.score += CORRECT_POINTS;
            self.state.streak += 1;
            self.state.best_streak = self.state.best_streak.max(self.state.streak);
            self.pending_advance = Some(PendingAdvance {
                remaining_ms: self.settings.advance_delay_ms,
                generation: self.generation,
            });
        } else {
            self.state.streak = 0;
            let record = WrongAnswerRecord {
                pose_id: self.state.current_pose_id.clone().unwrap_or_default(),
                chosen_option_id: option_id.to_string(),
                correct_option: correct,
                region: self.state.region,
            };
            self.state.wrong_answers.push(record);
        }
    }

    /// Moves to the next question, or to summary when the pass is over.
    pub fn advance(&mut self) {
        match self.state.mode {
            Mode::Summary => {}
            Mode::Review => {
                if self.state.review_index + 1 < self.state.wrong_answers.len() {
                    self.state.review_index += 1;
                    self.state.current_pose_id = Some(
                        self.state.wrong_answers[self.state.review_index]
                            .pose_id
                            .clone(),
                    );
                    self.load_question();
                } else {
                    self.to_summary();
                }
            }
            Mode::Practice => {
                if let Some(current) = self.state.current_pose_id.clone() {
                    self.state.queue.retain(|id| id != &current);
                }

                if self.state.queue.is_empty()
                    || self.state.total_answered >= self.settings.question_cap
                {
                    self.to_summary();
                } else {
                    self.state.current_pose_id = self.state.queue.first().cloned();
                    self.load_question();
                }
            }
        }
    }

    /// Ends the practice pass immediately. The caller is responsible for the
    /// user confirmation; this is the post-confirmation transition.
    pub fn finish_early(&mut self) {
        if self.state.mode == Mode::Practice {
            self.to_summary();
        }
    }

    /// Enters review over the wrong-answer log. Only available from summary
    /// and only when there is something to review.
    pub fn start_review(&mut self) {
        if self.state.mode != Mode::Summary || self.state.wrong_answers.is_empty() {
            return;
        }

        self.state.mode = Mode::Review;
        self.state.review_index = 0;
        self.state.current_pose_id = Some(self.state.wrong_answers[0].pose_id.clone());
        self.load_question();
    }

    /// Switches the active region (practice only). On an already-answered
    /// question this also clears the answered/selected state so the learner
    /// sees a fresh question in the new region. NOTE: the rendered selector is
    /// disabled while answered, yet this handler still supports the call; the
    /// dual intent is preserved from the original pending product
    /// clarification (see DESIGN.md).
    pub fn change_region(&mut self, region: Region) {
        if self.state.mode != Mode::Practice {
            return;
        }
        if region == self.state.region && !self.state.is_answered {
            return;
        }

        self.state.region = region;
        self.load_question();
    }

    /// Advances wall-clock state. The elapsed counter only runs during
    /// practice; a due auto-advance fires here, and a stale one (scheduled
    /// under an older generation) is dropped.
    pub fn on_tick(&mut self, elapsed_ms: u64) {
        if self.state.mode == Mode::Practice {
            self.tick_ms += elapsed_ms;
            while self.tick_ms >= 1000 {
                self.tick_ms -= 1000;
                self.state.elapsed_secs += 1;
            }
        }

        if let Some(pending) = self.pending_advance {
            if pending.generation != self.generation {
                self.pending_advance = None;
            } else if pending.remaining_ms <= elapsed_ms {
                self.pending_advance = None;
                self.advance();
            } else {
                self.pending_advance = Some(PendingAdvance {
                    remaining_ms: pending.remaining_ms - elapsed_ms,
                    generation: pending.generation,
                });
            }
        }
    }

    fn to_summary(&mut self) {
        self.state.mode = Mode::Summary;
        // teardown for scheduled work: nothing pending may outlive the pass
        self.generation = self.generation.wrapping_add(1);
        self.pending_advance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RegionOverride;
    use assert_matches::assert_matches;

    fn option(id: &str, text: &str, correct: bool) -> QuizOption {
        QuizOption {
            id: id.to_string(),
            text: text.to_string(),
            correct,
        }
    }

    fn pose(id: &str, name: &str) -> Pose {
        Pose {
            id: id.to_string(),
            name: name.to_string(),
            aliases: vec![],
            options: vec![
                option("c1", "Lateral deltoid", true),
                option("w1", "Biceps brachii", false),
                option("w2", "Triceps brachii", false),
                option("w3", "Upper trapezius", false),
            ],
        }
    }

    fn two_pose_dataset() -> Dataset {
        Dataset::from_parts(
            vec![pose("p1", "Pose One (Alias One)"), pose("p2", "Pose Two")],
            HashMap::new(),
            vec![],
        )
    }

    fn test_session(dataset: Dataset) -> Session {
        Session::with_seed(dataset, SessionSettings::default(), Region::UpperBody, 42)
    }

    /// Answers the current question correctly regardless of shuffle order.
    fn answer_correctly(session: &mut Session) {
        let correct_id = session.correct_option().unwrap().id.clone();
        session.submit(&correct_id);
    }

    /// Answers with some option that is not the correct one.
    fn answer_incorrectly(session: &mut Session) {
        let wrong_id = session
            .state
            .shuffled_options
            .iter()
            .find(|o| !o.correct)
            .unwrap()
            .id
            .clone();
        session.submit(&wrong_id);
    }

    #[test]
    fn test_start_invariants() {
        let session = test_session(two_pose_dataset());
        let state = &session.state;

        assert_eq!(state.mode, Mode::Practice);
        assert_eq!(state.score, 0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.best_streak, 0);
        assert_eq!(state.total_answered, 0);
        assert_eq!(state.elapsed_secs, 0);
        assert!(state.wrong_answers.is_empty());
        assert!(!state.is_answered);
        assert!(state.selected_option_id.is_none());

        // queue holds every pose id exactly once
        let mut queue = state.queue.clone();
        queue.sort();
        assert_eq!(queue, vec!["p1".to_string(), "p2".to_string()]);

        // current pose is the queue head and already counted as seen
        let head = state.queue[0].clone();
        assert_eq!(state.current_pose_id.as_deref(), Some(head.as_str()));
        assert_eq!(state.seen_counts.get(&head), Some(&1));
    }

    #[test]
    fn test_options_are_shuffled_permutation_of_set() {
        let session = test_session(two_pose_dataset());

        let mut ids: Vec<&str> = session
            .state
            .shuffled_options
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["c1", "w1", "w2", "w3"]);
    }

    #[test]
    fn test_correct_practice_answer() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);

        let state = &session.state;
        assert!(state.is_answered);
        assert!(state.is_correct);
        assert_eq!(state.score, CORRECT_POINTS);
        assert_eq!(state.streak, 1);
        assert_eq!(state.best_streak, 1);
        assert_eq!(state.total_answered, 1);
        assert!(state.wrong_answers.is_empty());
        assert_eq!(session.pending_advance_ms(), Some(DEFAULT_ADVANCE_DELAY_MS));
    }

    #[test]
    fn test_auto_advance_fires_after_delay() {
        let mut session = test_session(two_pose_dataset());
        let first = session.state.current_pose_id.clone().unwrap();

        answer_correctly(&mut session);

        // partial delay: nothing happens yet
        session.on_tick(1000);
        assert_eq!(session.state.current_pose_id.as_ref(), Some(&first));
        assert_eq!(session.pending_advance_ms(), Some(500));

        session.on_tick(500);
        assert!(session.pending_advance_ms().is_none());
        assert_ne!(session.state.current_pose_id.as_ref(), Some(&first));
        assert!(!session.state.is_answered);
    }

    #[test]
    fn test_incorrect_practice_answer() {
        let mut session = test_session(two_pose_dataset());
        let current = session.state.current_pose_id.clone().unwrap();

        answer_correctly(&mut session);
        session.on_tick(DEFAULT_ADVANCE_DELAY_MS); // advance to second pose
        answer_incorrectly(&mut session);

        let state = &session.state;
        assert!(state.is_answered);
        assert!(!state.is_correct);
        assert_eq!(state.streak, 0);
        assert_eq!(state.best_streak, 1);
        assert_eq!(state.total_answered, 2);
        assert!(session.pending_advance_ms().is_none());

        assert_eq!(state.wrong_answers.len(), 1);
        let record = &state.wrong_answers[0];
        assert_ne!(record.pose_id, current);
        assert_eq!(record.correct_option.id, "c1");
        assert_eq!(record.region, Region::UpperBody);
        assert!(record.chosen_option_id.starts_with('w'));
    }

    #[test]
    fn test_submit_ignored_when_already_answered() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        let score = session.state.score;
        let answered = session.state.total_answered;

        answer_correctly(&mut session);
        assert_eq!(session.state.score, score);
        assert_eq!(session.state.total_answered, answered);
    }

    #[test]
    fn test_submit_with_unknown_option_id_counts_as_incorrect() {
        let mut session = test_session(two_pose_dataset());

        session.submit("nonexistent-option");

        assert!(session.state.is_answered);
        assert!(!session.state.is_correct);
        assert_eq!(session.state.wrong_answers.len(), 1);
    }

    #[test]
    fn test_missing_correct_option_is_a_no_op() {
        let malformed = Dataset::from_parts(
            vec![Pose {
                id: "p1".into(),
                name: "Broken".into(),
                aliases: vec![],
                options: vec![option("a", "A", false), option("b", "B", false)],
            }],
            HashMap::new(),
            vec![],
        );
        let mut session = test_session(malformed);

        session.submit("a");

        assert!(!session.state.is_answered);
        assert_eq!(session.state.total_answered, 0);
        assert_eq!(session.state.score, 0);
    }

    #[test]
    fn test_queue_exhaustion_transitions_to_summary() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        session.advance();
        assert_eq!(session.state.mode, Mode::Practice);

        answer_correctly(&mut session);
        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);
        assert_eq!(session.state.score, 2 * CORRECT_POINTS);
        assert_eq!(session.state.best_streak, 2);
    }

    #[test]
    fn test_question_cap_transitions_to_summary() {
        let settings = SessionSettings {
            question_cap: 1,
            ..SessionSettings::default()
        };
        let mut session = Session::with_seed(two_pose_dataset(), settings, Region::UpperBody, 42);

        answer_correctly(&mut session);
        session.advance();

        // one pose still unseen, but the cap has been reached
        assert_eq!(session.state.mode, Mode::Summary);
        assert_eq!(session.state.queue.len(), 1);
    }

    #[test]
    fn test_streak_tracking_across_questions() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        session.advance();
        answer_incorrectly(&mut session);

        assert_eq!(session.state.streak, 0);
        assert_eq!(session.state.best_streak, 1);
    }

    #[test]
    fn test_finish_early() {
        let mut session = test_session(two_pose_dataset());

        session.finish_early();
        assert_eq!(session.state.mode, Mode::Summary);

        // no-op outside practice
        session.finish_early();
        assert_eq!(session.state.mode, Mode::Summary);
    }

    #[test]
    fn test_finish_early_cancels_pending_advance() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        assert!(session.pending_advance_ms().is_some());

        session.finish_early();
        session.on_tick(DEFAULT_ADVANCE_DELAY_MS);

        assert_eq!(session.state.mode, Mode::Summary);
        assert!(session.pending_advance_ms().is_none());
    }

    #[test]
    fn test_review_visits_records_in_order() {
        let mut session = test_session(two_pose_dataset());

        answer_incorrectly(&mut session);
        session.advance();
        answer_incorrectly(&mut session);
        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);

        let recorded: Vec<String> = session
            .state
            .wrong_answers
            .iter()
            .map(|r| r.pose_id.clone())
            .collect();
        assert_eq!(recorded.len(), 2);

        session.start_review();
        assert_eq!(session.state.mode, Mode::Review);
        assert_eq!(session.state.review_index, 0);
        assert_eq!(session.state.current_pose_id.as_ref(), Some(&recorded[0]));

        session.advance();
        assert_eq!(session.state.review_index, 1);
        assert_eq!(session.state.current_pose_id.as_ref(), Some(&recorded[1]));

        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);
    }

    #[test]
    fn test_review_submit_does_not_score_or_auto_advance() {
        let mut session = test_session(two_pose_dataset());

        answer_incorrectly(&mut session);
        session.advance();
        answer_incorrectly(&mut session);
        session.advance();
        session.start_review();

        let score = session.state.score;
        let wrong_count = session.state.wrong_answers.len();

        answer_correctly(&mut session);

        assert!(session.state.is_answered);
        assert!(session.state.is_correct);
        assert_eq!(session.state.score, score);
        assert_eq!(session.state.streak, 0);
        assert_eq!(session.state.wrong_answers.len(), wrong_count);
        assert!(session.pending_advance_ms().is_none());
        // review submissions still count toward total answered
        assert_eq!(session.state.total_answered, 3);
    }

    #[test]
    fn test_start_review_requires_summary_and_mistakes() {
        let mut session = test_session(two_pose_dataset());

        // not in summary yet
        session.start_review();
        assert_eq!(session.state.mode, Mode::Practice);

        // summary with no mistakes
        answer_correctly(&mut session);
        session.advance();
        answer_correctly(&mut session);
        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);

        session.start_review();
        assert_eq!(session.state.mode, Mode::Summary);
    }

    #[test]
    fn test_review_pins_region_to_record() {
        let overrides: HashMap<String, RegionOverride> = [(
            "p1".to_string(),
            RegionOverride {
                trunk: Some(vec![
                    option("t1", "Rectus abdominis", true),
                    option("t2", "External obliques", false),
                ]),
                lower_body: None,
            },
        )]
        .into_iter()
        .collect();
        let dataset = Dataset::from_parts(vec![pose("p1", "Pose One")], overrides, vec![]);
        let mut session = test_session(dataset);

        session.change_region(Region::Trunk);
        assert_eq!(session.correct_option().unwrap().id, "t1");

        answer_incorrectly(&mut session);
        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);

        session.start_review();

        // user-selected region no longer matters in review: the record's
        // trunk region drives the option set
        assert_eq!(session.active_region(), Region::Trunk);
        assert_eq!(session.correct_option().unwrap().id, "t1");
        assert_eq!(session.state.wrong_answers[0].region, Region::Trunk);
    }

    #[test]
    fn test_change_region_reloads_options() {
        let overrides: HashMap<String, RegionOverride> = [(
            "p1".to_string(),
            RegionOverride {
                trunk: Some(vec![
                    option("t1", "Rectus abdominis", true),
                    option("t2", "External obliques", false),
                ]),
                lower_body: None,
            },
        )]
        .into_iter()
        .collect();
        let dataset = Dataset::from_parts(vec![pose("p1", "Pose One")], overrides, vec![]);
        let mut session = test_session(dataset);

        assert_eq!(session.correct_option().unwrap().id, "c1");

        session.change_region(Region::Trunk);
        assert_eq!(session.state.region, Region::Trunk);
        assert_eq!(session.correct_option().unwrap().id, "t1");

        // lower body has no override: falls back to the default set
        session.change_region(Region::LowerBody);
        assert_eq!(session.correct_option().unwrap().id, "c1");
    }

    #[test]
    fn test_change_region_clears_answered_state() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        assert!(session.state.is_answered);

        session.change_region(Region::Trunk);

        assert!(!session.state.is_answered);
        assert!(session.state.selected_option_id.is_none());
        assert_eq!(session.state.region, Region::Trunk);
    }

    #[test]
    fn test_change_region_same_region_unanswered_is_no_op() {
        let mut session = test_session(two_pose_dataset());
        let head = session.state.current_pose_id.clone().unwrap();
        let seen_before = *session.state.seen_counts.get(&head).unwrap();

        session.change_region(Region::UpperBody);

        assert_eq!(*session.state.seen_counts.get(&head).unwrap(), seen_before);
    }

    #[test]
    fn test_change_region_ignored_outside_practice() {
        let mut session = test_session(two_pose_dataset());
        answer_incorrectly(&mut session);
        session.advance();
        answer_incorrectly(&mut session);
        session.advance();
        session.start_review();

        session.change_region(Region::LowerBody);
        assert_eq!(session.state.region, Region::UpperBody);
    }

    #[test]
    fn test_change_region_cancels_pending_advance() {
        let mut session = test_session(two_pose_dataset());
        let first = session.state.current_pose_id.clone().unwrap();

        answer_correctly(&mut session);
        assert!(session.pending_advance_ms().is_some());

        session.change_region(Region::Trunk);
        assert!(session.pending_advance_ms().is_none());

        // the stale advance must not fire: still on the same pose
        session.on_tick(DEFAULT_ADVANCE_DELAY_MS);
        assert_eq!(session.state.current_pose_id.as_ref(), Some(&first));
        assert!(!session.state.is_answered);
    }

    #[test]
    fn test_elapsed_timer_only_runs_in_practice() {
        let mut session = test_session(two_pose_dataset());

        session.on_tick(100);
        assert_eq!(session.state.elapsed_secs, 0);
        for _ in 0..25 {
            session.on_tick(100);
        }
        assert_eq!(session.state.elapsed_secs, 2);

        session.finish_early();
        for _ in 0..20 {
            session.on_tick(100);
        }
        assert_eq!(session.state.elapsed_secs, 2);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        session.advance();
        answer_incorrectly(&mut session);
        session.on_tick(5000);
        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);

        session.start();

        let state = &session.state;
        assert_eq!(state.mode, Mode::Practice);
        assert_eq!(state.score, 0);
        assert_eq!(state.streak, 0);
        assert_eq!(state.best_streak, 0);
        assert_eq!(state.total_answered, 0);
        assert_eq!(state.elapsed_secs, 0);
        assert!(state.wrong_answers.is_empty());
        assert_eq!(state.queue.len(), 2);
    }

    #[test]
    fn test_answered_region_change_counts_another_exposure() {
        let mut session = test_session(two_pose_dataset());
        let head = session.state.current_pose_id.clone().unwrap();

        answer_correctly(&mut session);
        session.change_region(Region::Trunk);

        assert_eq!(*session.state.seen_counts.get(&head).unwrap(), 2);
    }

    #[test]
    fn test_empty_dataset_session_is_inert() {
        let empty = Dataset::from_parts(vec![], HashMap::new(), vec![]);
        let mut session = test_session(empty);

        assert!(session.state.current_pose_id.is_none());
        assert!(session.state.shuffled_options.is_empty());

        session.submit("anything");
        assert_eq!(session.state.total_answered, 0);

        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);
    }

    #[test]
    fn test_full_session_example_scenario() {
        // the two-pose walk: correct, then incorrect, then review the miss
        let mut session = test_session(two_pose_dataset());

        answer_correctly(&mut session);
        assert_eq!(session.state.score, 10);
        assert_eq!(session.state.streak, 1);

        session.on_tick(DEFAULT_ADVANCE_DELAY_MS); // auto-advance
        assert_eq!(session.state.mode, Mode::Practice);

        answer_incorrectly(&mut session);
        assert_eq!(session.state.wrong_answers.len(), 1);
        assert_eq!(session.state.streak, 0);

        session.advance();
        assert_eq!(session.state.mode, Mode::Summary);

        let missed = session.state.wrong_answers[0].pose_id.clone();
        session.start_review();
        assert_eq!(
            session.state.current_pose_id.as_deref(),
            Some(missed.as_str())
        );

        answer_correctly(&mut session);
        assert!(session.state.is_correct);

        session.advance();
        assert_matches!(session.state.mode, Mode::Summary);
    }
}
