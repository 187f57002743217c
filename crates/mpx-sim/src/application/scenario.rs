//! Scripted multi-seat scenarios and their report.
//!
//! A [`Scenario`] is an ordered list of [`Step`]s.  Each step drives a
//! [`SimulatedCompositor`] and returns whether the state it expects holds.
//! The runner stops a scenario at the first step that returns `false` or an
//! error, and every scenario starts from a fresh compositor so results do not
//! depend on run order.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use mpx_core::{GrabMode, Position, RegistryError, SeatId, DEFAULT_SEAT_NAME};

use crate::application::compositor::{
    Motion, SimulatedCompositor, DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH,
};
use crate::domain::{
    virtual_device::{standard_test_devices, VirtualDevice},
    window::VirtualWindow,
};

/// Why a scenario step could not run to a verdict.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("seat '{0}' does not exist")]
    UnknownSeat(String),
    #[error("virtual device '{0}' does not exist")]
    UnknownDevice(String),
}

pub type StepFn = fn(&mut SimulatedCompositor) -> Result<bool, ScenarioError>;

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub description: &'static str,
    pub run: StepFn,
}

impl Step {
    pub const fn new(description: &'static str, run: StepFn) -> Self {
        Self { description, run }
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub steps: Vec<Step>,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub description: String,
    pub steps_passed: usize,
    pub steps_total: usize,
    pub passed: bool,
    pub errors: Vec<String>,
}

/// Runs every step of `scenario` against `compositor`, stopping at the first
/// failure.
pub fn run_steps(compositor: &mut SimulatedCompositor, scenario: &Scenario) -> ScenarioResult {
    let mut result = ScenarioResult {
        name: scenario.name.to_string(),
        description: scenario.description.to_string(),
        steps_passed: 0,
        steps_total: scenario.steps.len(),
        passed: false,
        errors: Vec::new(),
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        match (step.run)(compositor) {
            Ok(true) => result.steps_passed += 1,
            Ok(false) => {
                result
                    .errors
                    .push(format!("Step {number} ({}) returned false", step.description));
                break;
            }
            Err(e) => {
                result
                    .errors
                    .push(format!("Step {number} ({}) failed: {e}", step.description));
                break;
            }
        }
    }

    result.passed = result.steps_passed == result.steps_total;
    result
}

// ── ScenarioRunner ────────────────────────────────────────────────────────────

/// Runs scenarios on fresh compositors and collects their results.
#[derive(Debug)]
pub struct ScenarioRunner {
    display: (u32, u32),
    results: Vec<ScenarioResult>,
    last_compositor: Option<SimulatedCompositor>,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_WIDTH, DEFAULT_DISPLAY_HEIGHT)
    }
}

impl ScenarioRunner {
    /// Every scenario gets a compositor with a `width × height` display.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: (width, height),
            results: Vec::new(),
            last_compositor: None,
        }
    }

    /// Runs one scenario.  Returns `true` if all of its steps passed.
    pub fn run(&mut self, scenario: &Scenario) -> bool {
        info!(scenario = scenario.name, "running scenario");
        let mut compositor = SimulatedCompositor::new(self.display.0, self.display.1);
        let result = run_steps(&mut compositor, scenario);

        if result.passed {
            info!(scenario = scenario.name, "scenario PASSED");
        } else {
            warn!(scenario = scenario.name, errors = ?result.errors, "scenario FAILED");
        }

        let passed = result.passed;
        self.results.push(result);
        self.last_compositor = Some(compositor);
        passed
    }

    /// Runs every scenario in order.  Returns `true` if all passed.
    pub fn run_all<'a>(&mut self, scenarios: impl IntoIterator<Item = &'a Scenario>) -> bool {
        scenarios
            .into_iter()
            .fold(true, |all_passed, scenario| self.run(scenario) && all_passed)
    }

    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// The compositor the most recent scenario ran on, in its final state.
    pub fn last_compositor(&self) -> Option<&SimulatedCompositor> {
        self.last_compositor.as_ref()
    }

    pub fn report(&self) -> String {
        let mut lines = vec![
            "=== Scenario Report ===".to_string(),
            String::new(),
            format!("Total: {}/{} passed", self.passed_count(), self.results.len()),
            String::new(),
        ];

        for result in &self.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            lines.push(format!("[{status}] {}", result.name));
            if !result.description.is_empty() {
                lines.push(format!("       {}", result.description));
            }
            lines.push(format!(
                "       Steps: {}/{}",
                result.steps_passed, result.steps_total
            ));
            for error in &result.errors {
                lines.push(format!("       Error: {error}"));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

// ── Pre-built scenarios ───────────────────────────────────────────────────────

fn seat(comp: &SimulatedCompositor, name: &str) -> Result<SeatId, ScenarioError> {
    comp.seat_id(name)
        .ok_or_else(|| ScenarioError::UnknownSeat(name.to_string()))
}

fn cursor(comp: &SimulatedCompositor, name: &str) -> Result<Position, ScenarioError> {
    let seat_id = seat(comp, name)?;
    Ok(comp.registry().get_seat(seat_id)?.cursor.position())
}

fn test_device(id: &str) -> Result<VirtualDevice, ScenarioError> {
    standard_test_devices()
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| ScenarioError::UnknownDevice(id.to_string()))
}

/// Creates `aux` and puts `mouse1` on `seat0`, `mouse2` on `aux`.
fn two_mice_on_two_seats(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
    comp.registry_mut().create_seat("aux");
    comp.connect_device(test_device("mouse1")?, DEFAULT_SEAT_NAME)?;
    comp.connect_device(test_device("mouse2")?, "aux")?;
    Ok(comp.registry().seat_count() == 2)
}

/// Two pointers move independently.
pub fn basic_dual_pointer() -> Scenario {
    fn move_both(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        comp.move_pointer("mouse1", Motion::Absolute { x: 100.0, y: 100.0 });
        comp.move_pointer("mouse2", Motion::Absolute { x: 500.0, y: 500.0 });
        Ok(cursor(comp, DEFAULT_SEAT_NAME)? == Position::new(100.0, 100.0)
            && cursor(comp, "aux")? == Position::new(500.0, 500.0))
    }

    fn move_one(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        comp.move_pointer("mouse1", Motion::Relative { dx: 50.0, dy: 0.0 });
        Ok(cursor(comp, DEFAULT_SEAT_NAME)?.x == 150.0 && cursor(comp, "aux")?.x == 500.0)
    }

    Scenario {
        name: "basic_dual_pointer",
        description: "Two pointers move independently",
        steps: vec![
            Step::new("set up two seats with one mouse each", two_mice_on_two_seats),
            Step::new("move both pointers to different positions", move_both),
            Step::new("moving one pointer leaves the other alone", move_one),
        ],
    }
}

/// Grabbing one seat's pointer leaves the other seat free.
pub fn grab_isolation() -> Scenario {
    fn setup(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        let ready = two_mice_on_two_seats(comp)?;
        let (width, height) = comp.display_size();
        comp.create_window(VirtualWindow::new("game", "Fullscreen Game", 0, 0, width, height));
        Ok(ready)
    }

    fn grab_seat0(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        let seat0 = seat(comp, DEFAULT_SEAT_NAME)?;
        let granted = comp.request_grab("game", seat0, GrabMode::PointerLock)?;
        Ok(granted && comp.registry().get_seat(seat0)?.is_pointer_grabbed())
    }

    fn aux_not_grabbed(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        let aux = seat(comp, "aux")?;
        Ok(!comp.registry().get_seat(aux)?.is_pointer_grabbed())
    }

    fn aux_moves(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        comp.move_pointer("mouse2", Motion::Absolute { x: 960.0, y: 540.0 });
        Ok(cursor(comp, "aux")? == Position::new(960.0, 540.0))
    }

    Scenario {
        name: "grab_isolation",
        description: "A pointer grab on one seat does not affect another",
        steps: vec![
            Step::new("set up two seats and a fullscreen window", setup),
            Step::new("window grabs the seat0 pointer", grab_seat0),
            Step::new("aux pointer is not grabbed", aux_not_grabbed),
            Step::new("aux pointer still moves", aux_moves),
        ],
    }
}

/// A device is connected, unplugged and plugged back in.
pub fn device_hotplug() -> Scenario {
    fn hotplug_mouse() -> VirtualDevice {
        VirtualDevice::mouse("mouse_hotplug", "Hotplug Mouse")
    }

    fn connect(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        comp.connect_device(hotplug_mouse(), DEFAULT_SEAT_NAME)?;
        Ok(comp.device("mouse_hotplug").is_some())
    }

    fn disconnect(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        comp.disconnect_device("mouse_hotplug")?;
        let connected = comp.device("mouse_hotplug").is_some_and(|d| d.is_connected);
        Ok(!connected && comp.registry().get_device("mouse_hotplug").is_err())
    }

    fn reconnect(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        let seat_id = comp.connect_device(hotplug_mouse(), DEFAULT_SEAT_NAME)?;
        let connected = comp.device("mouse_hotplug").is_some_and(|d| d.is_connected);
        Ok(connected && seat_id == Some(comp.registry().default_seat_id()))
    }

    Scenario {
        name: "device_hotplug",
        description: "Devices can be connected and disconnected at runtime",
        steps: vec![
            Step::new("connect a mouse", connect),
            Step::new("disconnect it", disconnect),
            Step::new("reconnect it", reconnect),
        ],
    }
}

/// Each seat's keyboard reaches only that seat, and focusing a window on one
/// seat leaves the other seat's focus alone.
pub fn keyboard_focus_isolation() -> Scenario {
    fn setup(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        comp.registry_mut().create_seat("aux");
        comp.connect_device(test_device("keyboard1")?, DEFAULT_SEAT_NAME)?;
        comp.connect_device(test_device("keyboard2")?, "aux")?;
        comp.create_window(VirtualWindow::new("editor", "Editor", 0, 0, 960, 1080));
        comp.create_window(VirtualWindow::new("term", "Terminal", 960, 0, 960, 1080));
        Ok(true)
    }

    fn focus_per_seat(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        let seat0 = seat(comp, DEFAULT_SEAT_NAME)?;
        let aux = seat(comp, "aux")?;
        Ok(comp.focus_window("editor", seat0)? && comp.focus_window("term", aux)?)
    }

    fn keys_stay_on_their_seat(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        let seat0 = seat(comp, DEFAULT_SEAT_NAME)?;
        let aux = seat(comp, "aux")?;
        let first = comp.press_key("keyboard1", 30, true);
        let second = comp.press_key("keyboard2", 31, true);
        let editor_focus = comp.registry().get_seat(seat0)?.focus.keyboard_focus.clone();
        Ok(first == Some(seat0) && second == Some(aux) && editor_focus.as_deref() == Some("editor"))
    }

    Scenario {
        name: "keyboard_focus_isolation",
        description: "Keyboards and focus are per seat",
        steps: vec![
            Step::new("set up two seats with one keyboard each", setup),
            Step::new("each seat focuses its own window", focus_per_seat),
            Step::new("key presses reach only their own seat", keys_stay_on_their_seat),
        ],
    }
}

/// Every pre-built scenario, in report order.
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        basic_dual_pointer(),
        grab_isolation(),
        device_hotplug(),
        keyboard_focus_isolation(),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        Ok(true)
    }

    fn never(_: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        Ok(false)
    }

    fn missing_seat(comp: &mut SimulatedCompositor) -> Result<bool, ScenarioError> {
        seat(comp, "nope").map(|_| true)
    }

    #[test]
    fn test_run_steps_stops_at_first_false() {
        // Arrange
        let scenario = Scenario {
            name: "stops",
            description: "",
            steps: vec![
                Step::new("ok", always),
                Step::new("bad", never),
                Step::new("unreached", always),
            ],
        };

        // Act
        let result = run_steps(&mut SimulatedCompositor::default(), &scenario);

        // Assert
        assert!(!result.passed);
        assert_eq!(result.steps_passed, 1);
        assert_eq!(result.steps_total, 3);
        assert_eq!(result.errors, vec!["Step 2 (bad) returned false".to_string()]);
    }

    #[test]
    fn test_step_error_is_reported() {
        let scenario = Scenario {
            name: "errors",
            description: "",
            steps: vec![Step::new("look up seat", missing_seat)],
        };

        let result = run_steps(&mut SimulatedCompositor::default(), &scenario);

        assert!(!result.passed);
        assert_eq!(
            result.errors,
            vec!["Step 1 (look up seat) failed: seat 'nope' does not exist".to_string()]
        );
    }

    #[test]
    fn test_empty_scenario_passes() {
        let scenario = Scenario {
            name: "empty",
            description: "",
            steps: Vec::new(),
        };
        assert!(run_steps(&mut SimulatedCompositor::default(), &scenario).passed);
    }

    #[test]
    fn test_each_builtin_scenario_passes() {
        for scenario in builtin_scenarios() {
            let result = run_steps(&mut SimulatedCompositor::default(), &scenario);
            assert!(result.passed, "{}: {:?}", result.name, result.errors);
        }
    }

    #[test]
    fn test_runner_isolates_scenarios_and_counts() {
        // Arrange
        let mut runner = ScenarioRunner::default();
        let failing = Scenario {
            name: "failing",
            description: "always fails",
            steps: vec![Step::new("fail", never)],
        };

        // Act
        let first = runner.run(&basic_dual_pointer());
        let second = runner.run(&basic_dual_pointer());
        let third = runner.run(&failing);

        // Assert
        assert!(first && second, "second run must not see the first run's seats");
        assert!(!third);
        assert_eq!(runner.passed_count(), 2);
        assert!(!runner.all_passed());
        let last = runner.last_compositor().unwrap();
        assert_eq!(last.registry().seat_count(), 1);
    }

    #[test]
    fn test_report_layout() {
        // Arrange
        let mut runner = ScenarioRunner::default();
        runner.run(&device_hotplug());
        runner.run(&Scenario {
            name: "broken",
            description: "",
            steps: vec![Step::new("fail", never), Step::new("skip", always)],
        });

        // Act
        let report = runner.report();

        // Assert
        let expected = "\
=== Scenario Report ===

Total: 1/2 passed

[PASS] device_hotplug
       Devices can be connected and disconnected at runtime
       Steps: 3/3

[FAIL] broken
       Steps: 0/2
       Error: Step 1 (fail) returned false
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_run_all_runs_every_scenario_even_after_failure() {
        let mut runner = ScenarioRunner::default();
        let failing = Scenario {
            name: "failing",
            description: "",
            steps: vec![Step::new("fail", never)],
        };
        let scenarios = vec![failing, grab_isolation()];

        assert!(!runner.run_all(&scenarios));
        assert_eq!(runner.results().len(), 2);
        assert!(runner.results()[1].passed);
    }
}
