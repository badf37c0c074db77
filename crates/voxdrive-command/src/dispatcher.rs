use voxdrive_core::ActuatorCommand;

/// One keyword and the command it produces.
pub struct DispatchRule {
    pub keyword: &'static str,
    pub build: fn(i64) -> ActuatorCommand,
}

fn stop(_magnitude: i64) -> ActuatorCommand {
    ActuatorCommand::Stop
}

/// Checked top to bottom; the first keyword contained in the text wins.
pub static DISPATCH_RULES: [DispatchRule; 9] = [
    DispatchRule { keyword: "stop", build: stop },
    // drivetrain
    DispatchRule { keyword: "forward", build: ActuatorCommand::MoveForward },
    DispatchRule { keyword: "backward", build: ActuatorCommand::MoveBackward },
    DispatchRule { keyword: "right", build: ActuatorCommand::TurnRight },
    DispatchRule { keyword: "left", build: ActuatorCommand::TurnLeft },
    // stabilizer
    DispatchRule { keyword: "lift", build: ActuatorCommand::Lift },
    DispatchRule { keyword: "lower", build: ActuatorCommand::Lower },
    // claw
    DispatchRule { keyword: "close", build: ActuatorCommand::CloseClaw },
    DispatchRule { keyword: "open", build: ActuatorCommand::OpenClaw },
];

pub fn matching_rule(normalized: &str) -> Option<&'static DispatchRule> {
    DISPATCH_RULES
        .iter()
        .find(|rule| normalized.contains(rule.keyword))
}

pub fn dispatch(normalized: &str, magnitude: i64) -> ActuatorCommand {
    matching_rule(normalized)
        .map(|rule| (rule.build)(magnitude))
        .unwrap_or(ActuatorCommand::NoOp)
}
