//! Scripted walk through the workbench, used by the `testpilot` binary.

use crate::domain::error::{AppError, Result};
use crate::domain::workbench::{RecorderPhase, Tab};
use crate::infrastructure::bootstrap::AppContext;
use std::time::Duration;
use tracing::info;

pub const DEMO_RECORDING_NAME: &str = "Demo checkout flow";
pub const DEMO_RECORDING_URL: &str = "https://demo-shop.example.com/checkout";

/// Records until the simulator stops on its own, turns the recording into a
/// saved test case, runs it, then runs the whole suite.
pub async fn run_session(context: &AppContext) -> Result<()> {
    let workbench = &context.workbench;
    workbench.initialize().await?;

    workbench.set_recording_name(DEMO_RECORDING_NAME)?;
    workbench.set_recording_url(DEMO_RECORDING_URL)?;
    workbench.start_recording()?;

    let recorder = &context.config.recorder;
    let poll = recorder.tick().max(Duration::from_millis(100));
    while workbench.phase() != RecorderPhase::Idle {
        tokio::time::sleep(poll).await;
    }

    let recording = workbench
        .recordings()
        .into_iter()
        .find(|recording| recording.name == DEMO_RECORDING_NAME)
        .ok_or_else(|| AppError::Internal("Demo recording was not saved".to_string()))?;
    info!(
        recording_id = %recording.id,
        actions = recording.actions.len(),
        "Demo recording captured"
    );

    workbench.switch_tab(Tab::TestCases)?;
    workbench.generate_test_case(&recording)?;
    let test_case = workbench.save_test_case().await?;

    workbench.switch_tab(Tab::Execution)?;
    workbench.execute_test(&test_case)?.wait().await;
    workbench.run_all_tests()?.wait().await;

    workbench.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::bootstrap::setup_with_seeds;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::scheduler::TokioScheduler;
    use crate::infrastructure::store::seeds::SeedCatalog;

    #[tokio::test(start_paused = true)]
    async fn test_session_reaches_suite_summary() {
        let config = AppConfig {
            random_seed: Some(42),
            ..AppConfig::default()
        };
        let context = setup_with_seeds(
            config,
            SeedCatalog::embedded().unwrap(),
            TokioScheduler::shared(),
        );

        run_session(&context).await.unwrap();

        let messages = context.notifications.messages();
        assert_eq!(
            messages.first().map(String::as_str),
            Some("Recording started! Capturing user interactions...")
        );
        assert!(messages
            .last()
            .is_some_and(|message| message.starts_with("Test suite completed: ")));
        assert_eq!(context.workbench.recordings().len(), 4);
        assert_eq!(context.workbench.test_cases().len(), 3);
        assert_eq!(context.workbench.active_tab(), Tab::Execution);
    }
}
