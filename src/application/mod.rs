pub mod use_cases;

pub use use_cases::execution_simulator::ExecutionSimulator;
pub use use_cases::recording_simulator::RecordingSimulator;
pub use use_cases::test_case_synthesizer::synthesize_test_case;
pub use use_cases::workbench::{Workbench, WorkbenchSnapshot};
