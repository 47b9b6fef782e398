pub mod execution_simulator;
pub mod recording_simulator;
pub mod test_case_synthesizer;
pub mod workbench;
