//! Typed commands produced by the control panel, hotkeys, tray and OS events

use std::sync::mpsc::Sender;

use crate::state::Preset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetBrightness(i32),
    SetColorTemperature(i32),
    /// Relative brightness change, saturating at the domain bounds
    StepBrightness(i32),
    ApplyPreset(Preset),
    SetAutostart(bool),
    /// The monitor topology changed; recreate every overlay
    RebuildOverlays,
    /// Recreate overlays if any window disappeared behind our back
    VerifyOverlays,
    ShowControls,
    Exit,
}

/// What the UI loop should do after a command was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowControls,
    Exit,
}

/// Delivers commands to the thread that owns the overlays.
///
/// Implementations must be callable from any thread.
pub trait CommandSink: Send + Sync {
    fn post(&self, command: Command);
}

impl CommandSink for Sender<Command> {
    fn post(&self, command: Command) {
        if self.send(command).is_err() {
            tracing::debug!(?command, "Command dropped, receiver gone");
        }
    }
}

// Packing for message-queue transport: the tag travels in one word
// (WPARAM), the full i32 payload in the other (LPARAM).
const TAG_SET_BRIGHTNESS: usize = 1;
const TAG_SET_COLOR_TEMPERATURE: usize = 2;
const TAG_STEP_BRIGHTNESS: usize = 3;
const TAG_APPLY_PRESET: usize = 4;
const TAG_SET_AUTOSTART: usize = 5;
const TAG_REBUILD: usize = 6;
const TAG_VERIFY: usize = 7;
const TAG_SHOW_CONTROLS: usize = 8;
const TAG_EXIT: usize = 9;

impl Command {
    /// Split into `(tag, payload)` words, e.g. a window message's WPARAM and LPARAM
    pub fn to_words(self) -> (usize, isize) {
        let (tag, payload) = match self {
            Command::SetBrightness(v) => (TAG_SET_BRIGHTNESS, v),
            Command::SetColorTemperature(v) => (TAG_SET_COLOR_TEMPERATURE, v),
            Command::StepBrightness(v) => (TAG_STEP_BRIGHTNESS, v),
            Command::ApplyPreset(p) => (TAG_APPLY_PRESET, p.index() as i32),
            Command::SetAutostart(on) => (TAG_SET_AUTOSTART, i32::from(on)),
            Command::RebuildOverlays => (TAG_REBUILD, 0),
            Command::VerifyOverlays => (TAG_VERIFY, 0),
            Command::ShowControls => (TAG_SHOW_CONTROLS, 0),
            Command::Exit => (TAG_EXIT, 0),
        };
        (tag, payload as isize)
    }

    /// Inverse of [`to_words`](Self::to_words). `None` for an unknown tag or
    /// a payload that no command could have produced.
    pub fn from_words(tag: usize, payload: isize) -> Option<Self> {
        let value = i32::try_from(payload).ok()?;
        let command = match tag {
            TAG_SET_BRIGHTNESS => Command::SetBrightness(value),
            TAG_SET_COLOR_TEMPERATURE => Command::SetColorTemperature(value),
            TAG_STEP_BRIGHTNESS => Command::StepBrightness(value),
            TAG_APPLY_PRESET => {
                Command::ApplyPreset(Preset::from_index(usize::try_from(value).ok()?)?)
            }
            TAG_SET_AUTOSTART => match value {
                0 => Command::SetAutostart(false),
                1 => Command::SetAutostart(true),
                _ => return None,
            },
            TAG_REBUILD => Command::RebuildOverlays,
            TAG_VERIFY => Command::VerifyOverlays,
            TAG_SHOW_CONTROLS => Command::ShowControls,
            TAG_EXIT => Command::Exit,
            _ => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn unpack(command: Command) -> Option<Command> {
        let (tag, payload) = command.to_words();
        Command::from_words(tag, payload)
    }

    #[test]
    fn test_every_command_survives_packing() {
        let mut commands = vec![
            Command::SetAutostart(true),
            Command::SetAutostart(false),
            Command::RebuildOverlays,
            Command::VerifyOverlays,
            Command::ShowControls,
            Command::Exit,
        ];
        commands.extend(Preset::ALL.map(Command::ApplyPreset));
        for value in [i32::MIN, -1, 0, 50, (1 << 24) + 50, i32::MAX] {
            commands.push(Command::SetBrightness(value));
            commands.push(Command::SetColorTemperature(value));
            commands.push(Command::StepBrightness(value));
        }

        for command in commands {
            assert_eq!(unpack(command), Some(command), "{command:?}");
        }
    }

    #[test]
    fn test_preset_packs_by_index() {
        assert_eq!(
            Command::ApplyPreset(Preset::Night).to_words(),
            (TAG_APPLY_PRESET, 2)
        );
    }

    #[test]
    fn test_malformed_words() {
        assert_eq!(Command::from_words(0, 0), None);
        assert_eq!(Command::from_words(0xFF, 0), None);
        assert_eq!(Command::from_words(TAG_APPLY_PRESET, 7), None);
        assert_eq!(Command::from_words(TAG_APPLY_PRESET, -1), None);
        assert_eq!(Command::from_words(TAG_SET_AUTOSTART, 2), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_payload_beyond_i32_is_rejected() {
        let payload = i64::from(i32::MAX) as isize + 1;
        assert_eq!(Command::from_words(TAG_SET_BRIGHTNESS, payload), None);
    }

    #[test]
    fn test_channel_sink_from_other_thread() {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || tx.post(Command::RebuildOverlays))
            .join()
            .unwrap();
        assert_eq!(rx.recv().unwrap(), Command::RebuildOverlays);
    }
}
