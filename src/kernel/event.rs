use super::time::CountdownId;
use crate::directory::types::DirectorySnapshot;
use crate::sensors::hub::SensorError;
use crate::sensors::raw::SensorReading;

/// Everything that enters the kernel queue. Sensor callbacks, user commands
/// and countdown ticks all arrive here and are processed one at a time.
#[derive(Debug, Clone)]
pub enum Event {
    Sensor(SensorReading),
    Command(UserCommand),
    /// One second of the countdown identified by the id has elapsed.
    CountdownTick(CountdownId),
    SensorUnavailable(SensorError),
    /// The profile or contact list changed in the directory.
    DirectoryChanged(DirectorySnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    StartMonitoring,
    StopMonitoring,
    /// "I am safe" on the confirmation screen.
    ConfirmSafe,
    /// "Trigger emergency immediately".
    ForceEmergency,
    /// Abort from the emergency screen.
    Abort,
    ToggleOff,
    ToggleOn,
    Reset,
}

impl UserCommand {
    /// Parses the console harness vocabulary.
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "start" => Some(UserCommand::StartMonitoring),
            "stop" => Some(UserCommand::StopMonitoring),
            "safe" => Some(UserCommand::ConfirmSafe),
            "sos" => Some(UserCommand::ForceEmergency),
            "abort" => Some(UserCommand::Abort),
            "off" => Some(UserCommand::ToggleOff),
            "on" => Some(UserCommand::ToggleOn),
            "reset" => Some(UserCommand::Reset),
            _ => None,
        }
    }
}

impl From<SensorReading> for Event {
    fn from(reading: SensorReading) -> Self {
        Event::Sensor(reading)
    }
}

impl From<UserCommand> for Event {
    fn from(cmd: UserCommand) -> Self {
        Event::Command(cmd)
    }
}
