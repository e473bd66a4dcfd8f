// Pointer commands and the backend that performs them on the real desktop.
// Every command is best-effort: `dispatch` logs a failure and moves on, and the
// gesture state has already advanced as if the command had worked.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::ScreenSize;

/// What the gesture pipeline asks the OS to do. All buttons are the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCommand {
    /// Absolute screen position.
    Move { x: i32, y: i32 },
    /// Single click at wherever the cursor currently is.
    Click,
    ButtonDown,
    ButtonUp,
}

pub trait PointerActuator {
    fn execute(&mut self, command: &PointerCommand) -> Result<()>;
}

/// Run commands in order. Failures are ignored on purpose: no retry and no
/// rollback of gesture state.
pub fn dispatch<A: PointerActuator + ?Sized>(actuator: &mut A, commands: &[PointerCommand]) {
    for command in commands {
        if let Err(e) = actuator.execute(command) {
            debug!(?command, error = %e, "pointer command failed, ignoring");
        }
    }
}

pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| Error::PointerInit(e.to_string()))?;
        Ok(Self { enigo })
    }

    /// Size of the main display as the OS reports it.
    pub fn screen_size(&self) -> Result<ScreenSize> {
        let (w, h) = self
            .enigo
            .main_display()
            .map_err(|e| Error::PointerInit(format!("main display size: {e}")))?;
        Ok(ScreenSize { width: w.max(0) as u32, height: h.max(0) as u32 })
    }
}

impl PointerActuator for EnigoPointer {
    fn execute(&mut self, command: &PointerCommand) -> Result<()> {
        let res = match *command {
            PointerCommand::Move { x, y } => self.enigo.move_mouse(x, y, Coordinate::Abs),
            PointerCommand::Click => self.enigo.button(Button::Left, Direction::Click),
            PointerCommand::ButtonDown => self.enigo.button(Button::Left, Direction::Press),
            PointerCommand::ButtonUp => self.enigo.button(Button::Left, Direction::Release),
        };
        res.map_err(|e| Error::Pointer(format!("{command:?}: {e}")))
    }
}

/// Records commands instead of performing them; can be told to fail.
#[cfg(test)]
pub(crate) struct RecordingPointer {
    pub executed: Vec<PointerCommand>,
    pub fail: bool,
}

#[cfg(test)]
impl PointerActuator for RecordingPointer {
    fn execute(&mut self, command: &PointerCommand) -> Result<()> {
        self.executed.push(*command);
        if self.fail {
            return Err(Error::Pointer("unreachable desktop".into()));
        }
        Ok(())
    }
}
