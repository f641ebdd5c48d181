//! WinClick Service Bridge
//!
//! The OS-level clicker used by `WINCLICK`. One async call: synthesise a
//! click at absolute screen coordinates.

use async_trait::async_trait;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickButton {
    Left,
    Right,
    Middle,
}

impl ClickButton {
    pub fn parse(s: &str) -> Option<ClickButton> {
        match s.to_ascii_uppercase().as_str() {
            "LEFT" => Some(ClickButton::Left),
            "RIGHT" => Some(ClickButton::Right),
            "MIDDLE" | "CENTER" => Some(ClickButton::Middle),
            _ => None,
        }
    }
}

#[async_trait]
pub trait WinClickService: Send + Sync {
    async fn click(&self, x: u32, y: u32, button: ClickButton) -> Result<(), EngineError>;
}

pub struct NullWinClickService;

#[async_trait]
impl WinClickService for NullWinClickService {
    async fn click(&self, _x: u32, _y: u32, _button: ClickButton) -> Result<(), EngineError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_an_alias_for_middle() {
        assert_eq!(ClickButton::parse("CENTER"), Some(ClickButton::Middle));
        assert_eq!(ClickButton::parse("MIDDLE"), Some(ClickButton::Middle));
    }

    #[test]
    fn unrecognised_button_is_none() {
        assert_eq!(ClickButton::parse("SCROLL"), None);
    }
}
