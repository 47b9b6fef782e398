//! Application state behind the recorder / test case / execution screens.
//!
//! [`Workbench`] is a cheap, clonable handle. State lives behind a std mutex
//! that is never held across an `.await`; store calls and timers run outside
//! the lock and write their results back when they complete.

use crate::application::use_cases::execution_simulator::ExecutionSimulator;
use crate::application::use_cases::recording_simulator::{RecordingSimulator, RecordingSink};
use crate::application::use_cases::test_case_synthesizer::synthesize_test_case;
use crate::domain::error::{AppError, Result};
use crate::domain::notification::Severity;
use crate::domain::recording::{Action, Recording, RecordingDraft};
use crate::domain::test_case::{TestCase, TestCaseDraft};
use crate::domain::workbench::{RecorderPhase, StopReason, Tab};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::notifier::Notifier;
use crate::infrastructure::random::RandomSource;
use crate::infrastructure::scheduler::{Scheduler, TimerHandle};
use crate::infrastructure::store::Stores;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

const MISSING_RECORDING_FIELDS: &str = "Please enter recording name and URL";

#[derive(Default)]
struct WorkbenchState {
    active_tab: Tab,
    recordings: Vec<Recording>,
    test_cases: Vec<TestCase>,
    pending_loads: u32,
    error: Option<String>,
    phase: RecorderPhase,
    draft: RecordingDraft,
    selected_recording: Option<Recording>,
    modal_open: bool,
    test_case_draft: TestCaseDraft,
    recorder_timer: Option<TimerHandle>,
}

/// Point-in-time copy of the workbench state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchSnapshot {
    pub active_tab: Tab,
    pub recordings: Vec<Recording>,
    pub test_cases: Vec<TestCase>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: RecorderPhase,
    pub is_recording: bool,
    pub draft: RecordingDraft,
    pub selected_recording: Option<Recording>,
    pub modal_open: bool,
    pub test_case_draft: TestCaseDraft,
}

struct WorkbenchInner {
    state: Mutex<WorkbenchState>,
    stores: Stores,
    notifier: Arc<dyn Notifier>,
    recorder: RecordingSimulator,
    executor: ExecutionSimulator,
}

#[derive(Clone)]
pub struct Workbench {
    inner: Arc<WorkbenchInner>,
}

impl Workbench {
    pub fn new(
        stores: Stores,
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
        notifier: Arc<dyn Notifier>,
        config: &AppConfig,
    ) -> Self {
        let recorder = RecordingSimulator::new(
            Arc::clone(&scheduler),
            Arc::clone(&random),
            config.recorder.clone(),
        );
        let executor = ExecutionSimulator::new(
            scheduler,
            random,
            Arc::clone(&notifier),
            config.execution.clone(),
        );
        Self {
            inner: Arc::new(WorkbenchInner {
                state: Mutex::new(WorkbenchState::default()),
                stores,
                notifier,
                recorder,
                executor,
            }),
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Loads recordings and test cases. Both loads are attempted; the first
    /// failure, if any, is returned once both are done.
    pub async fn initialize(&self) -> Result<()> {
        let recordings = self.load_recordings().await;
        let test_cases = self.load_test_cases().await;
        recordings?;
        test_cases?;
        Ok(())
    }

    pub async fn load_recordings(&self) -> Result<usize> {
        self.with_state(|state| state.pending_loads += 1)?;
        let result = self.inner.stores.recordings.get_all().await;
        self.with_state(|state| state.pending_loads = state.pending_loads.saturating_sub(1))?;

        match result {
            Ok(recordings) => {
                let count = recordings.len();
                self.with_state(|state| state.recordings = recordings)?;
                info!(count, "Recordings loaded");
                Ok(count)
            }
            Err(err) => {
                self.with_state(|state| state.recordings.clear())?;
                self.report_failure("Failed to load recordings", &err);
                Err(err)
            }
        }
    }

    pub async fn load_test_cases(&self) -> Result<usize> {
        self.with_state(|state| state.pending_loads += 1)?;
        let result = self.inner.stores.test_cases.get_all().await;
        self.with_state(|state| state.pending_loads = state.pending_loads.saturating_sub(1))?;

        match result {
            Ok(test_cases) => {
                let count = test_cases.len();
                self.with_state(|state| state.test_cases = test_cases)?;
                info!(count, "Test cases loaded");
                Ok(count)
            }
            Err(err) => {
                self.with_state(|state| state.test_cases.clear())?;
                self.report_failure("Failed to load test cases", &err);
                Err(err)
            }
        }
    }

    pub fn switch_tab(&self, tab: Tab) -> Result<()> {
        self.with_state(|state| state.active_tab = tab)
    }

    pub fn set_recording_name(&self, name: &str) -> Result<()> {
        self.edit_recording_draft(|draft| draft.name = name.to_string())
    }

    pub fn set_recording_url(&self, url: &str) -> Result<()> {
        self.edit_recording_draft(|draft| draft.url = url.to_string())
    }

    /// `Idle -> Recording`. Requires a name and a URL; any other phase is
    /// rejected so a second run can never be armed on top of the first.
    pub fn start_recording(&self) -> Result<()> {
        let claimed = self.with_state(|state| {
            if state.phase != RecorderPhase::Idle {
                return Err(AppError::InvalidTransition(format!(
                    "Cannot start recording while {}",
                    state.phase.as_str()
                )));
            }
            if !state.draft.is_ready() {
                return Err(AppError::ValidationError(
                    MISSING_RECORDING_FIELDS.to_string(),
                ));
            }
            state.phase = RecorderPhase::Recording;
            state.draft.actions.clear();
            Ok(state.draft.clone())
        })?;

        match claimed.and_then(|draft| self.arm_recorder().map(|()| draft)) {
            Ok(draft) => {
                info!(name = %draft.name, url = %draft.url, "Recording started");
                self.notify(
                    Severity::Success,
                    "Recording started! Capturing user interactions...",
                );
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Recording start rejected");
                self.notify(Severity::Error, err.message());
                Err(err)
            }
        }
    }

    /// `Recording -> Stopping -> Idle`. Cancels the pending ticks and hands
    /// the captured actions to the recording store.
    pub async fn stop_recording(&self) -> Result<Recording> {
        let timer = self.with_state(|state| {
            if state.phase != RecorderPhase::Recording {
                return Err(AppError::InvalidTransition(format!(
                    "Cannot stop recording while {}",
                    state.phase.as_str()
                )));
            }
            state.phase = RecorderPhase::Stopping;
            Ok(state.recorder_timer.take())
        })??;

        if let Some(timer) = timer {
            timer.cancel();
        }
        self.persist_recording(StopReason::Manual).await
    }

    /// Synthesizes a test case from `recording` and opens the editor with it.
    pub fn generate_test_case(&self, recording: &Recording) -> Result<TestCaseDraft> {
        let draft = synthesize_test_case(recording);
        self.with_state(|state| {
            state.selected_recording = Some(recording.clone());
            state.test_case_draft = draft.clone();
            state.modal_open = true;
        })?;
        info!(
            recording_id = %recording.id,
            steps = draft.steps.len(),
            "Test case draft generated"
        );
        Ok(draft)
    }

    /// Opens the editor on the current draft, for hand-written test cases.
    pub fn open_test_case_modal(&self) -> Result<()> {
        self.with_state(|state| state.modal_open = true)
    }

    pub fn close_test_case_modal(&self) -> Result<()> {
        self.with_state(|state| state.modal_open = false)
    }

    pub fn edit_test_case_draft<F>(&self, edit: F) -> Result<TestCaseDraft>
    where
        F: FnOnce(&mut TestCaseDraft),
    {
        self.with_state(|state| {
            edit(&mut state.test_case_draft);
            state.test_case_draft.clone()
        })
    }

    /// Persists the draft through the test case store, then closes the editor.
    pub async fn save_test_case(&self) -> Result<TestCase> {
        let draft = self.with_state(|state| {
            if !state.modal_open {
                return Err(AppError::InvalidTransition(
                    "Test case editor is not open".to_string(),
                ));
            }
            if !state.test_case_draft.has_title() {
                return Err(AppError::ValidationError(
                    "Test case title is required".to_string(),
                ));
            }
            Ok(state.test_case_draft.clone())
        })?;

        let draft = match draft {
            Ok(draft) => draft,
            Err(err) => {
                warn!(error = %err, "Test case save rejected");
                self.notify(Severity::Error, err.message());
                return Err(err);
            }
        };

        match self.inner.stores.test_cases.create(draft).await {
            Ok(saved) => {
                self.with_state(|state| {
                    state.test_cases.insert(0, saved.clone());
                    state.modal_open = false;
                    state.test_case_draft = TestCaseDraft::default();
                })?;
                info!(test_case_id = %saved.id, title = %saved.title, "Test case saved");
                self.notify(Severity::Success, "Test case generated and saved!");
                Ok(saved)
            }
            Err(err) => {
                self.report_failure("Failed to save test case", &err);
                Err(err)
            }
        }
    }

    pub async fn delete_recording(&self, id: &str) -> Result<()> {
        match self.inner.stores.recordings.delete(id).await {
            Ok(_) => {
                self.with_state(|state| {
                    state.recordings.retain(|recording| recording.id != id);
                    if state
                        .selected_recording
                        .as_ref()
                        .is_some_and(|selected| selected.id == id)
                    {
                        state.selected_recording = None;
                    }
                })?;
                info!(recording_id = %id, "Recording deleted");
                self.notify(Severity::Success, "Recording deleted");
                Ok(())
            }
            Err(err) => {
                self.report_failure("Failed to delete recording", &err);
                Err(err)
            }
        }
    }

    pub async fn delete_test_case(&self, id: &str) -> Result<()> {
        match self.inner.stores.test_cases.delete(id).await {
            Ok(_) => {
                self.with_state(|state| state.test_cases.retain(|test_case| test_case.id != id))?;
                info!(test_case_id = %id, "Test case deleted");
                self.notify(Severity::Success, "Test case deleted");
                Ok(())
            }
            Err(err) => {
                self.report_failure("Failed to delete test case", &err);
                Err(err)
            }
        }
    }

    /// Announces the run and schedules a simulated outcome. Creates no
    /// execution record and leaves the test case untouched.
    pub fn execute_test(&self, test_case: &TestCase) -> Result<TimerHandle> {
        self.notify(
            Severity::Info,
            &format!("Executing test: {}", test_case.title),
        );
        self.inner.executor.run(test_case).map_err(|err| {
            self.report_failure("Failed to execute test", &err);
            err
        })
    }

    /// Simulates a run of every loaded test case and reports the totals.
    pub fn run_all_tests(&self) -> Result<TimerHandle> {
        let test_cases = self.with_state(|state| state.test_cases.clone())?;
        self.notify(Severity::Info, "Running all test cases...");
        self.inner.executor.run_suite(test_cases).map_err(|err| {
            self.report_failure("Failed to run test suite", &err);
            err
        })
    }

    /// Cancels a recording run that is still armed and returns the recorder
    /// to `Idle`. Captured actions stay in the draft unsaved.
    pub fn shutdown(&self) {
        let timer = self.with_state(|state| {
            if state.phase == RecorderPhase::Recording {
                state.phase = RecorderPhase::Idle;
            }
            state.recorder_timer.take()
        });
        if let Ok(Some(timer)) = timer {
            timer.cancel();
            info!("Cancelled pending recording ticks");
        }
    }

    pub fn snapshot(&self) -> Result<WorkbenchSnapshot> {
        self.with_state(|state| WorkbenchSnapshot {
            active_tab: state.active_tab,
            recordings: state.recordings.clone(),
            test_cases: state.test_cases.clone(),
            loading: state.pending_loads > 0,
            error: state.error.clone(),
            phase: state.phase,
            is_recording: state.phase == RecorderPhase::Recording,
            draft: state.draft.clone(),
            selected_recording: state.selected_recording.clone(),
            modal_open: state.modal_open,
            test_case_draft: state.test_case_draft.clone(),
        })
    }

    pub fn active_tab(&self) -> Tab {
        self.read(|state| state.active_tab)
    }

    pub fn phase(&self) -> RecorderPhase {
        self.read(|state| state.phase)
    }

    pub fn is_recording(&self) -> bool {
        self.phase() == RecorderPhase::Recording
    }

    pub fn is_loading(&self) -> bool {
        self.read(|state| state.pending_loads > 0)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error.clone())
    }

    pub fn recordings(&self) -> Vec<Recording> {
        self.read(|state| state.recordings.clone())
    }

    pub fn test_cases(&self) -> Vec<TestCase> {
        self.read(|state| state.test_cases.clone())
    }

    pub fn recording_draft(&self) -> RecordingDraft {
        self.read(|state| state.draft.clone())
    }

    pub fn selected_recording(&self) -> Option<Recording> {
        self.read(|state| state.selected_recording.clone())
    }

    pub fn is_modal_open(&self) -> bool {
        self.read(|state| state.modal_open)
    }

    pub fn test_case_draft(&self) -> TestCaseDraft {
        self.read(|state| state.test_case_draft.clone())
    }

    fn edit_recording_draft<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut RecordingDraft),
    {
        self.with_state(|state| {
            if state.phase != RecorderPhase::Idle {
                return Err(AppError::InvalidTransition(
                    "Recording details are locked while recording".to_string(),
                ));
            }
            edit(&mut state.draft);
            Ok(())
        })?
    }

    /// Arms the simulator for a run already claimed under the lock. The lock is
    /// not held while scheduling; the phase goes back to `Idle` when no timer
    /// could be scheduled.
    fn arm_recorder(&self) -> Result<()> {
        let sink: Arc<dyn RecordingSink> = Arc::new(self.clone());
        match self.inner.recorder.arm(sink) {
            Ok(timer) => self.with_state(|state| {
                if state.phase == RecorderPhase::Recording && state.recorder_timer.is_none() {
                    state.recorder_timer = Some(timer);
                } else {
                    timer.cancel();
                }
            }),
            Err(err) => {
                self.with_state(|state| state.phase = RecorderPhase::Idle)?;
                Err(err)
            }
        }
    }

    async fn persist_recording(&self, reason: StopReason) -> Result<Recording> {
        let new_recording = self.with_state(|state| state.draft.to_new_recording())?;
        let action_count = new_recording.actions.len();

        match self.inner.stores.recordings.create(new_recording).await {
            Ok(saved) => {
                self.with_state(|state| {
                    state.recordings.insert(0, saved.clone());
                    state.draft = RecordingDraft::default();
                    state.phase = RecorderPhase::Idle;
                })?;
                info!(
                    recording_id = %saved.id,
                    actions = action_count,
                    reason = ?reason,
                    "Recording saved"
                );
                self.notify(Severity::Success, "Recording saved successfully!");
                Ok(saved)
            }
            Err(err) => {
                self.with_state(|state| state.phase = RecorderPhase::Idle)?;
                self.report_failure("Failed to save recording", &err);
                Err(err)
            }
        }
    }

    fn report_failure(&self, notice: &str, err: &AppError) {
        error!(error = %err, "{}", notice);
        if let Err(lock_err) = self.with_state(|state| state.error = Some(err.message().to_string()))
        {
            error!(error = %lock_err, "Failed to record workbench error");
        }
        self.notify(Severity::Error, notice);
    }

    fn notify(&self, severity: Severity, message: &str) {
        self.inner.notifier.notify(severity, message);
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut WorkbenchState) -> R) -> Result<R> {
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| AppError::Internal("Workbench state lock poisoned".to_string()))?;
        Ok(f(&mut state))
    }

    fn read<R: Default>(&self, f: impl FnOnce(&WorkbenchState) -> R) -> R {
        self.inner
            .state
            .lock()
            .map(|state| f(&state))
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordingSink for Workbench {
    fn record_tick(&self, build: &mut (dyn FnMut(usize) -> Action + Send)) -> bool {
        self.with_state(|state| {
            if state.phase != RecorderPhase::Recording {
                return false;
            }
            let position = state.draft.actions.len() + 1;
            state.draft.actions.push(build(position));
            true
        })
        .unwrap_or(false)
    }

    async fn finish(&self, reason: StopReason) {
        // The timer handle belongs to the task running this call, so it is
        // released rather than cancelled.
        let claimed = self
            .with_state(|state| {
                if state.phase != RecorderPhase::Recording {
                    return false;
                }
                state.phase = RecorderPhase::Stopping;
                state.recorder_timer = None;
                true
            })
            .unwrap_or(false);

        if claimed {
            info!(reason = ?reason, "Recording stopped automatically");
            if let Err(err) = self.persist_recording(reason).await {
                debug!(error = %err, "Automatic stop left the recording unsaved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_case::TestCaseStatus;
    use crate::infrastructure::notifier::MemoryNotifier;
    use crate::infrastructure::random::SequenceRandom;
    use crate::infrastructure::scheduler::TokioScheduler;
    use crate::infrastructure::store::seeds::SeedCatalog;
    use std::time::Duration;

    struct Harness {
        workbench: Workbench,
        notifier: MemoryNotifier,
    }

    fn harness_with(seeds: SeedCatalog, draws: Vec<f64>) -> Harness {
        let config = AppConfig::default();
        let scheduler = TokioScheduler::shared();
        let notifier = MemoryNotifier::new();
        let stores = Stores::new(seeds, &config.stores, Arc::clone(&scheduler));
        let workbench = Workbench::new(
            stores,
            scheduler,
            Arc::new(SequenceRandom::new(draws)),
            Arc::new(notifier.clone()),
            &config,
        );
        Harness {
            workbench,
            notifier,
        }
    }

    fn harness() -> Harness {
        harness_with(SeedCatalog::default(), vec![0.1, 0.3, 0.5, 0.7, 0.9])
    }

    fn ready(workbench: &Workbench) {
        workbench.set_recording_name("Login flow").unwrap();
        workbench.set_recording_url("https://ex.com").unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_loads_seeded_stores() {
        let h = harness_with(SeedCatalog::embedded().unwrap(), vec![0.5]);
        assert!(!h.workbench.is_loading());

        h.workbench.initialize().await.unwrap();

        assert!(!h.workbench.is_loading());
        assert_eq!(h.workbench.recordings().len(), 3);
        assert_eq!(h.workbench.test_cases().len(), 2);
        assert_eq!(h.workbench.error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_flag_is_set_while_in_flight() {
        let h = harness();
        let workbench = h.workbench.clone();
        let load = tokio::spawn(async move { workbench.load_recordings().await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(h.workbench.is_loading());
        assert_eq!(load.await.unwrap().unwrap(), 0);
        assert!(!h.workbench.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_without_name_or_url_is_rejected() {
        let h = harness();
        h.workbench.set_recording_name("Login flow").unwrap();

        let err = h.workbench.start_recording().unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(!h.workbench.is_recording());
        assert_eq!(
            h.notifier.last().map(|n| n.message),
            Some(MISSING_RECORDING_FIELDS.to_string())
        );

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert!(h.workbench.recording_draft().actions.is_empty());
        assert!(h.workbench.recordings().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recording_stops_itself_after_ceiling() {
        let h = harness();
        ready(&h.workbench);

        h.workbench.start_recording().unwrap();
        assert!(h.workbench.is_recording());

        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(h.workbench.recording_draft().actions.len(), 2);

        tokio::time::sleep(Duration::from_millis(6_000)).await;
        assert_eq!(h.workbench.phase(), RecorderPhase::Idle);

        let recordings = h.workbench.recordings();
        assert_eq!(recordings.len(), 1);
        assert_eq!(recordings[0].name, "Login flow");
        assert_eq!(recordings[0].actions.len(), 5);
        assert_eq!(recordings[0].duration, 10);
        assert_eq!(recordings[0].actions[4].value, "Action 5");
        assert_eq!(h.workbench.recording_draft(), RecordingDraft::default());
        assert_eq!(h.workbench.stores().recordings.len(), 1);
        assert_eq!(
            h.notifier.messages(),
            vec![
                "Recording started! Capturing user interactions...".to_string(),
                "Recording saved successfully!".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_stop_cancels_pending_ticks() {
        let h = harness();
        ready(&h.workbench);
        h.workbench.start_recording().unwrap();

        tokio::time::sleep(Duration::from_millis(4_500)).await;
        let saved = h.workbench.stop_recording().await.unwrap();
        assert_eq!(saved.actions.len(), 2);
        assert_eq!(saved.duration, 4);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(h.workbench.recording_draft().actions.is_empty());
        assert_eq!(h.workbench.recordings().len(), 1);
        assert_eq!(h.workbench.recordings()[0].actions.len(), 2);
        assert_eq!(h.workbench.phase(), RecorderPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_machine_rejects_overlapping_transitions() {
        let h = harness();
        assert!(matches!(
            h.workbench.stop_recording().await,
            Err(AppError::InvalidTransition(_))
        ));

        ready(&h.workbench);
        h.workbench.start_recording().unwrap();
        assert!(matches!(
            h.workbench.start_recording(),
            Err(AppError::InvalidTransition(_))
        ));
        assert!(matches!(
            h.workbench.set_recording_name("other"),
            Err(AppError::InvalidTransition(_))
        ));

        tokio::time::sleep(Duration::from_millis(2_100)).await;
        let (first, second) = tokio::join!(
            h.workbench.stop_recording(),
            h.workbench.stop_recording()
        );
        assert!(first.is_ok() ^ second.is_ok());
        assert_eq!(h.workbench.recordings().len(), 1);
        assert_eq!(h.workbench.recordings()[0].actions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_then_save_test_case() {
        let h = harness();
        ready(&h.workbench);
        h.workbench.start_recording().unwrap();
        tokio::time::sleep(Duration::from_millis(4_100)).await;
        let recording = h.workbench.stop_recording().await.unwrap();

        let draft = h.workbench.generate_test_case(&recording).unwrap();
        assert_eq!(draft.title, "AI Generated: Login flow");
        assert_eq!(draft.steps.len(), 2);
        assert!(h.workbench.is_modal_open());
        assert_eq!(
            h.workbench.selected_recording().map(|r| r.id),
            Some(recording.id.clone())
        );

        let edited = h
            .workbench
            .edit_test_case_draft(|draft| draft.description = "Reviewed".to_string())
            .unwrap();
        assert_eq!(edited.description, "Reviewed");

        let saved = h.workbench.save_test_case().await.unwrap();
        assert_eq!(saved.status, TestCaseStatus::Draft);
        assert_eq!(saved.steps.len(), 2);
        assert!(!h.workbench.is_modal_open());
        assert_eq!(h.workbench.test_case_draft(), TestCaseDraft::default());
        assert_eq!(h.workbench.test_cases()[0].id, saved.id);

        let stored = h.workbench.stores().test_cases.get_by_id(&saved.id).await.unwrap();
        assert_eq!(stored, saved);
        assert_eq!(
            h.notifier.last().map(|n| n.message),
            Some("Test case generated and saved!".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_requires_title_and_open_editor() {
        let h = harness();
        assert!(matches!(
            h.workbench.save_test_case().await,
            Err(AppError::InvalidTransition(_))
        ));

        h.workbench.open_test_case_modal().unwrap();
        let err = h.workbench.save_test_case().await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(h.workbench.is_modal_open());
        assert!(h.workbench.stores().test_cases.is_empty());

        h.workbench
            .edit_test_case_draft(|draft| draft.title = "Manual check".to_string())
            .unwrap();
        let saved = h.workbench.save_test_case().await.unwrap();
        assert_eq!(saved.title, "Manual check");
        assert!(saved.steps.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_only_notifies() {
        let h = harness_with(SeedCatalog::embedded().unwrap(), vec![0.1]);
        h.workbench.initialize().await.unwrap();
        let test_case = h.workbench.test_cases()[0].clone();
        let executions_before = h.workbench.stores().executions.len();

        h.workbench.execute_test(&test_case).unwrap().wait().await;

        assert_eq!(
            h.notifier.messages(),
            vec![
                format!("Executing test: {}", test_case.title),
                format!("Test passed: {}", test_case.title),
            ]
        );
        assert_eq!(h.workbench.stores().executions.len(), executions_before);
        let stored = h.workbench.stores().test_cases.get_by_id(&test_case.id).await.unwrap();
        assert_eq!(stored.status, test_case.status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_all_reports_summary() {
        let h = harness_with(SeedCatalog::embedded().unwrap(), vec![0.1, 0.95]);
        h.workbench.initialize().await.unwrap();

        h.workbench.run_all_tests().unwrap().wait().await;
        assert_eq!(
            h.notifier.messages(),
            vec![
                "Running all test cases...".to_string(),
                "Test suite completed: 1 passed, 1 failed".to_string(),
            ]
        );
        assert_eq!(h.workbench.stores().executions.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_ids_surface_as_errors() {
        let h = harness();
        let err = h.workbench.delete_recording("nonexistent").await.unwrap_err();
        assert_eq!(err, AppError::NotFound("Recording not found".to_string()));
        assert_eq!(h.workbench.error(), Some("Recording not found".to_string()));
        assert_eq!(
            h.notifier.last().map(|n| (n.severity, n.message)),
            Some((Severity::Error, "Failed to delete recording".to_string()))
        );

        let err = h.workbench.delete_test_case("nonexistent").await.unwrap_err();
        assert_eq!(err.message(), "Test case not found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_recording_clears_selection() {
        let h = harness_with(SeedCatalog::embedded().unwrap(), vec![0.5]);
        h.workbench.initialize().await.unwrap();
        let recording = h.workbench.recordings()[0].clone();
        h.workbench.generate_test_case(&recording).unwrap();

        h.workbench.delete_recording(&recording.id).await.unwrap();
        assert_eq!(h.workbench.recordings().len(), 2);
        assert!(h.workbench.selected_recording().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_tab_and_snapshot() {
        let h = harness();
        assert_eq!(h.workbench.active_tab(), Tab::Recorder);
        h.workbench.switch_tab(Tab::Execution).unwrap();

        let snapshot = h.workbench.snapshot().unwrap();
        assert_eq!(snapshot.active_tab, Tab::Execution);
        assert!(!snapshot.is_recording);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["activeTab"], "execution");
        assert_eq!(json["phase"], "idle");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_armed_run() {
        let h = harness();
        ready(&h.workbench);
        h.workbench.start_recording().unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;

        h.workbench.shutdown();
        assert_eq!(h.workbench.phase(), RecorderPhase::Idle);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(h.workbench.recording_draft().actions.len(), 1);
        assert!(h.workbench.recordings().is_empty());

        h.workbench.start_recording().unwrap();
        assert!(h.workbench.is_recording());
        assert!(h.workbench.recording_draft().actions.is_empty());
    }

    #[test]
    fn test_start_without_runtime_leaves_workbench_usable() {
        let h = harness();
        ready(&h.workbench);

        let err = h.workbench.start_recording().unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(h.workbench.phase(), RecorderPhase::Idle);
        assert_eq!(
            h.notifier.last().map(|n| n.severity),
            Some(Severity::Error)
        );

        h.workbench.switch_tab(Tab::TestCases).unwrap();
        h.workbench.set_recording_name("Retry").unwrap();
        assert_eq!(h.workbench.active_tab(), Tab::TestCases);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_keeps_list_empty_and_reports() {
        let h = harness_with(SeedCatalog::embedded().unwrap(), vec![0.5]);
        h.workbench.stores().recordings.poison();

        let err = h.workbench.initialize().await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(!h.workbench.is_loading());
        assert!(h.workbench.recordings().is_empty());
        assert_eq!(h.workbench.test_cases().len(), 2);
        assert_eq!(
            h.workbench.error(),
            Some("Recording store lock poisoned".to_string())
        );
        assert_eq!(
            h.notifier.messages(),
            vec!["Failed to load recordings".to_string()]
        );

        h.workbench.stores().test_cases.poison();
        assert!(h.workbench.load_test_cases().await.is_err());
        assert!(h.workbench.test_cases().is_empty());
        assert_eq!(
            h.workbench.error(),
            Some("Test case store lock poisoned".to_string())
        );
        assert_eq!(
            h.notifier.last().map(|n| n.message),
            Some("Failed to load test cases".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_keeps_draft_and_returns_to_idle() {
        let h = harness();
        ready(&h.workbench);
        h.workbench.start_recording().unwrap();
        tokio::time::sleep(Duration::from_millis(4_500)).await;
        h.workbench.stores().recordings.poison();

        let err = h.workbench.stop_recording().await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(h.workbench.phase(), RecorderPhase::Idle);

        let draft = h.workbench.recording_draft();
        assert_eq!(draft.name, "Login flow");
        assert_eq!(draft.actions.len(), 2);
        assert!(h.workbench.recordings().is_empty());
        assert_eq!(
            h.workbench.error(),
            Some("Recording store lock poisoned".to_string())
        );
        assert_eq!(
            h.notifier.last().map(|n| (n.severity, n.message)),
            Some((Severity::Error, "Failed to save recording".to_string()))
        );
    }
}
